mod components;

use std::sync::OnceLock;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect, Alignment},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Table, Wrap},
    Frame,
};

use crate::app::{App, Field, Group, Popup};
use crate::format::{format_euro, format_euro_ganz, format_euro_signed, format_prozent};
use crate::theme::Theme;

use components::{empfehlung_hinweis, key_hints, value_row};

// Theme is fixed for the lifetime of the process
static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme built from config. Only the first call has an effect.
pub fn init_theme(theme: Theme) {
    if THEME.set(theme).is_err() {
        tracing::debug!("Theme already initialized");
    }
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn warning() -> Color { theme().warning }
fn danger() -> Color { theme().danger }
fn success() -> Color { theme().success }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1),               // Info line
            Constraint::Min(10),                 // Form + results
            Constraint::Length(1),               // Footer
        ])
        .split(area);

    // Stack the columns on narrow terminals
    let direction = if area.width < 90 { Direction::Vertical } else { Direction::Horizontal };
    let columns = Layout::default()
        .direction(direction)
        .constraints([
            Constraint::Percentage(45),          // Eingaben
            Constraint::Percentage(55),          // Ergebnis
        ])
        .split(chunks[1]);

    draw_info_line(f, app, chunks[0]);
    draw_form(f, app, columns[0]);
    draw_results(f, app, columns[1]);
    draw_footer(f, app, chunks[2]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f),
        Popup::ConfirmReset => draw_confirm_popup(f),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Priority: status message > summary
    let line = if let Some(ref status) = app.status_message {
        Line::from(vec![
            Span::styled(status, Style::default().fg(warning())),
        ])
    } else {
        let r = &app.results;
        Line::from(vec![
            Span::styled("Eigenkapital-Rechner", Style::default().fg(accent()).add_modifier(Modifier::BOLD)),
            Span::styled(" │ ", Style::default().fg(text_dim())),
            Span::styled(format!("Darlehen {}", format_euro(r.darlehensbetrag)), Style::default().fg(text())),
            Span::styled(" │ ", Style::default().fg(text_dim())),
            Span::styled(format!("Rate {} / Monat", format_euro(r.monatliche_rate)), Style::default().fg(text())),
        ])
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

/// Number of content lines a group needs (fields plus hint lines)
fn group_height(group: Group) -> u16 {
    let lines: u16 = group
        .fields()
        .map(|field| if has_hint(field) { 2 } else { 1 })
        .sum();
    lines + 2
}

fn has_hint(field: Field) -> bool {
    matches!(field, Field::NebenkostenProzent | Field::Jahresmiete)
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let mut constraints: Vec<Constraint> = Group::ALL
        .iter()
        .map(|g| Constraint::Length(group_height(*g)))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (group, chunk) in Group::ALL.iter().zip(chunks.iter()) {
        draw_group(f, app, *group, *chunk);
    }
}

fn draw_group(f: &mut Frame, app: &App, group: Group, area: Rect) {
    let is_active = app.focus.group() == group;
    let border_color = if is_active { accent() } else { inactive() };
    let title_style = if is_active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(header())
    };

    let block = Block::default()
        .title(Span::styled(format!(" {} ", group.title()), title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    // Label column width so values line up
    let label_width = Field::ALL.iter().map(|f| f.label().chars().count()).max().unwrap_or(0) + 2;

    let mut lines: Vec<Line> = Vec::new();
    for field in group.fields() {
        let focused = app.focus == field;
        let cursor = if focused { "_" } else { "" };
        let value = app.buffer(field);

        let row_style = if focused {
            Style::default().bg(bg_selected()).fg(text())
        } else {
            Style::default()
        };

        let label_color = if focused { accent() } else { text_dim() };
        let value_text = if value.is_empty() && !focused && field.is_optional() {
            Span::styled("–", Style::default().fg(inactive()))
        } else {
            Span::styled(format!("{}{}", value, cursor), Style::default().fg(text()))
        };

        lines.push(
            Line::from(vec![
                Span::styled(format!(" {:<width$}", field.label(), width = label_width), Style::default().fg(label_color)),
                value_text,
                Span::styled(format!(" {}", field.unit()), Style::default().fg(text_dim())),
            ])
            .style(row_style),
        );

        if let Some(hint) = field_hint(app, field) {
            lines.push(Line::from(Span::styled(
                format!(" {:<width$}{}", "", hint, width = label_width),
                Style::default().fg(text_dim()),
            )));
        } else if has_hint(field) {
            lines.push(Line::from(""));
        }
    }

    let content = Paragraph::new(lines).block(block);
    f.render_widget(content, area);
}

/// Derived helper value shown below an input
fn field_hint(app: &App, field: Field) -> Option<String> {
    match field {
        Field::NebenkostenProzent => Some(format!("= {}", format_euro_ganz(app.results.nebenkosten))),
        Field::Jahresmiete => app
            .monatsmiete()
            .map(|m| format!("= {} / Monat", format_euro_ganz(m))),
        _ => None,
    }
}

fn draw_results(f: &mut Frame, app: &App, area: Rect) {
    let has_cashflow = app.results.monatlicher_cashflow.is_some();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                                   // Quote gauge
            Constraint::Length(5),                                   // Empfehlung
            Constraint::Length(6),                                   // Key figures
            Constraint::Length(if has_cashflow { 3 } else { 0 }),    // Cashflow
            Constraint::Length(6),                                   // Overview
            Constraint::Min(0),
        ])
        .split(area);

    draw_quote_gauge(f, app, chunks[0]);
    draw_empfehlung(f, app, chunks[1]);
    draw_key_figures(f, app, chunks[2]);
    if has_cashflow {
        draw_cashflow(f, app, chunks[3]);
    }
    draw_overview(f, app, chunks[4]);
}

fn draw_quote_gauge(f: &mut Frame, app: &App, area: Rect) {
    let r = &app.results;
    let color = theme().empfehlung_color(r.empfehlung);

    let block = Block::default()
        .title(Span::styled(" Ihre Eigenkapitalquote (Skala 0% – 30%+) ", Style::default().fg(header())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(color).bg(bg_selected()))
        .ratio(r.quote_fortschritt())
        .label(Span::styled(
            format_prozent(r.ek_quote),
            Style::default().fg(text()).add_modifier(Modifier::BOLD),
        ));

    f.render_widget(gauge, area);
}

fn draw_empfehlung(f: &mut Frame, app: &App, area: Rect) {
    let r = &app.results;
    let color = theme().empfehlung_color(r.empfehlung);

    let block = Block::default()
        .title(Span::styled(format!(" {} ", r.empfehlung.label()), Style::default().fg(color).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let content = Paragraph::new(Line::from(Span::styled(empfehlung_hinweis(r), Style::default().fg(text()))))
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(content, area);
}

fn draw_key_figures(f: &mut Frame, app: &App, area: Rect) {
    let r = &app.results;

    let block = Block::default()
        .title(Span::styled(" Finanzierung ", Style::default().fg(header())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));

    let rows = vec![
        value_row("Darlehensbetrag", format_euro(r.darlehensbetrag), text_dim(), text()),
        value_row("Beleihungsauslauf", format_prozent(r.beleihungsauslauf), text_dim(), text()),
        value_row(
            "Aktueller Zinssatz",
            format!("{} (Stufe {})", format_prozent(r.aktueller_zinssatz), r.zins_stufe.label()),
            text_dim(),
            text(),
        ),
        value_row("Monatliche Rate", format_euro(r.monatliche_rate), text_dim(), accent()),
    ];

    let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .block(block);

    f.render_widget(table, area);
}

fn draw_cashflow(f: &mut Frame, app: &App, area: Rect) {
    let Some(cashflow) = app.results.monatlicher_cashflow else {
        return;
    };
    let color = theme().cashflow_color(cashflow);

    let block = Block::default()
        .title(Span::styled(" Monatlicher Cashflow ", Style::default().fg(header())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let content = Paragraph::new(Line::from(Span::styled(
        format!(" {}", format_euro_signed(cashflow)),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(block);

    f.render_widget(content, area);
}

fn draw_overview(f: &mut Frame, app: &App, area: Rect) {
    let r = &app.results;

    let block = Block::default()
        .title(Span::styled(" Eigenkapital-Übersicht ", Style::default().fg(header())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));

    let rows = vec![
        value_row("Gesamtkosten", format_euro(r.gesamtkosten), text_dim(), text()),
        value_row("Mindest-EK (Nebenkosten)", format_euro(r.ek_minimum), text_dim(), text()),
        value_row("Empfohlenes EK (20%)", format_euro(r.ek_20_prozent), text_dim(), text()),
        value_row("Optimales EK (30%)", format_euro(r.ek_30_prozent), text_dim(), text()),
    ];

    let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .block(block);

    f.render_widget(table, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: &[(&'static str, &'static str)] = match app.popup {
        Popup::None => &[
            ("↑↓", "Feld"),
            ("0-9 ,", "Eingabe"),
            ("⌫", "Löschen"),
            ("x", "Leeren"),
            ("r", "Reset"),
            ("h", "Hilfe"),
            ("q", "Beenden"),
        ],
        Popup::Help => &[("Esc", "Schließen")],
        Popup::ConfirmReset => &[("y", "Ja"), ("n", "Nein")],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else if area.width < 80 { 5 } else { hints.len() };

    let hint_spans = key_hints(&hints[..max_hints.min(hints.len())], accent(), text_dim());

    let footer = Paragraph::new(Line::from(hint_spans))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 40 { 95 } else { 80 },
        area
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(format!("═══ {} ═══", title), Style::default().fg(header()).add_modifier(Modifier::BOLD)))
    };
    let entry = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<22}", key), Style::default().fg(accent())),
            Span::raw(desc),
        ])
    };

    let help_text = vec![
        section("Navigation"),
        entry("↑/↓ j/k Tab", "Nächstes / vorheriges Eingabefeld"),
        entry("Enter", "Zum nächsten Feld"),
        Line::from(""),
        section("Eingabe"),
        entry("0-9 , .", "Wert eingeben (Komma oder Punkt als Dezimaltrenner)"),
        entry("-", "Negatives Vorzeichen (nur am Anfang)"),
        entry("Backspace", "Letztes Zeichen löschen"),
        entry("x / Entf", "Feld leeren (optionale Felder: Standardwert)"),
        Line::from(""),
        section("Aktionen"),
        entry("r", "Alle Eingaben auf Startwerte zurücksetzen"),
        entry("q / Esc", "Beenden"),
        Line::from(""),
        section("Berechnung"),
        Line::from(Span::raw("  Zinsstufe nach Beleihungsauslauf: > 90% → Zins 100%, > 70% → Zins 80%, sonst Zins 60%")),
        Line::from(Span::raw("  Monatliche Rate = Darlehen × (Zins + 2% Tilgung) / 12")),
        Line::from(Span::raw("  Empfehlung nach EK-Quote: < 10% kritisch, < 20% ausreichend, < 30% gut")),
        Line::from(""),
        section("Kommandozeile"),
        entry("eigenkapital --json", "Ergebnis als JSON ausgeben"),
        entry("--kaufpreis 450000", "Startwert überschreiben (auch --eigenkapital, --jahresmiete ...)"),
        entry("--init-config", "Konfigurationsvorlage anlegen"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Drücke ", Style::default().fg(text_dim())),
            Span::styled("h", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" zum Schließen", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" Eigenkapital-Rechner Hilfe ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn draw_confirm_popup(f: &mut Frame) {
    let popup_area = centered_rect(40, 20, f.area());

    f.render_widget(Clear, popup_area);

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("Alle Eingaben auf die Startwerte zurücksetzen?", Style::default().fg(warning()))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
            Span::raw(" Ja   "),
            Span::styled("n", Style::default().fg(danger()).add_modifier(Modifier::BOLD)),
            Span::raw(" Nein"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Zurücksetzen ", Style::default().fg(warning())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(warning())),
    )
    .wrap(Wrap { trim: true })
    .alignment(Alignment::Center);

    f.render_widget(confirm, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
