use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;

use crate::calculator::{Calculator, EigenkapitalInputs, EigenkapitalResults};

/// Seconds a status message stays in the info line
const STATUS_TIMEOUT_SECONDS: u64 = 3;

/// Longest accepted buffer, keeps the input boxes readable
const MAX_INPUT_LEN: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    KaufpreisNebenkosten,
    Finanzierung,
    Einnahmen,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::KaufpreisNebenkosten, Group::Finanzierung, Group::Einnahmen];

    pub fn title(self) -> &'static str {
        match self {
            Group::KaufpreisNebenkosten => "Kaufpreis & Nebenkosten",
            Group::Finanzierung => "Finanzierung",
            Group::Einnahmen => "Erwartete Einnahmen (Optional)",
        }
    }

    pub fn fields(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |f| f.group() == self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Kaufpreis,
    NebenkostenProzent,
    EigenkapitalVorhanden,
    Zinssatz100,
    Zinssatz80,
    Zinssatz60,
    Jahresmiete,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Kaufpreis,
        Field::NebenkostenProzent,
        Field::EigenkapitalVorhanden,
        Field::Zinssatz100,
        Field::Zinssatz80,
        Field::Zinssatz60,
        Field::Jahresmiete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Kaufpreis => "Kaufpreis",
            Field::NebenkostenProzent => "Kaufnebenkosten (inkl. Makler)",
            Field::EigenkapitalVorhanden => "Vorhandenes Eigenkapital",
            Field::Zinssatz100 => "Zins 100%",
            Field::Zinssatz80 => "Zins 80%",
            Field::Zinssatz60 => "Zins 60%",
            Field::Jahresmiete => "Jahresmiete (Kaltmiete)",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Field::Kaufpreis | Field::EigenkapitalVorhanden | Field::Jahresmiete => "€",
            _ => "%",
        }
    }

    pub fn group(self) -> Group {
        match self {
            Field::Kaufpreis | Field::NebenkostenProzent => Group::KaufpreisNebenkosten,
            Field::Jahresmiete => Group::Einnahmen,
            _ => Group::Finanzierung,
        }
    }

    /// Optional fields pass "empty" through as absent so the calculator
    /// applies its default; required fields read empty as 0.
    pub fn is_optional(self) -> bool {
        !matches!(self, Field::Kaufpreis | Field::EigenkapitalVorhanden)
    }

    fn index(self) -> usize {
        Field::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Field {
        Field::ALL[(self.index() + 1) % Field::ALL.len()]
    }

    fn prev(self) -> Field {
        let len = Field::ALL.len();
        Field::ALL[(self.index() + len - 1) % len]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    ConfirmReset,
}

pub struct App {
    pub focus: Field,
    pub popup: Popup,

    // One text buffer per field, indexed like Field::ALL
    buffers: [String; 7],

    // Reset target (default input set, possibly from config/CLI)
    pub startwerte: EigenkapitalInputs,

    calculator: Calculator,
    pub results: EigenkapitalResults,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
}

impl App {
    pub fn new(startwerte: EigenkapitalInputs) -> Self {
        let mut calculator = Calculator::new();
        let results = calculator.calculate(&startwerte);

        let mut app = Self {
            focus: Field::Kaufpreis,
            popup: Popup::None,
            buffers: Default::default(),
            startwerte,
            calculator,
            results,
            status_message: None,
            status_message_time: None,
        };
        app.load_buffers();
        app
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn buffer(&self, field: Field) -> &str {
        &self.buffers[field.index()]
    }

    /// Fill all buffers from the start values
    fn load_buffers(&mut self) {
        let s = &self.startwerte;
        let values = [
            Some(s.kaufpreis),
            s.nebenkosten_prozent,
            Some(s.eigenkapital_vorhanden),
            s.zinssatz_100,
            s.zinssatz_80,
            s.zinssatz_60,
            s.jahresmiete.filter(|m| *m > 0.0),
        ];
        for (buffer, value) in self.buffers.iter_mut().zip(values) {
            *buffer = value.map(format_input).unwrap_or_default();
        }
    }

    /// Current form state as calculator inputs
    pub fn inputs(&self) -> EigenkapitalInputs {
        let value = |field: Field| parse_input(self.buffer(field));

        EigenkapitalInputs {
            kaufpreis: value(Field::Kaufpreis).unwrap_or(0.0),
            nebenkosten_prozent: value(Field::NebenkostenProzent),
            eigenkapital_vorhanden: value(Field::EigenkapitalVorhanden).unwrap_or(0.0),
            zinssatz_100: value(Field::Zinssatz100),
            zinssatz_80: value(Field::Zinssatz80),
            zinssatz_60: value(Field::Zinssatz60),
            jahresmiete: value(Field::Jahresmiete),
        }
    }

    /// Expected monthly rent, for the hint below the rent field
    pub fn monatsmiete(&self) -> Option<f64> {
        parse_input(self.buffer(Field::Jahresmiete))
            .filter(|m| *m > 0.0)
            .map(|m| (m / 12.0).round())
    }

    fn recalculate(&mut self) {
        let inputs = self.inputs();
        self.results = self.calculator.calculate(&inputs);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.popup != Popup::None {
            self.handle_popup_key(key);
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter | KeyCode::Char('j') => {
                self.focus = self.focus.next();
            }
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
                self.focus = self.focus.prev();
            }

            KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, ',' | '.' | '-') => {
                self.insert_char(c);
            }
            KeyCode::Backspace => {
                self.buffers[self.focus.index()].pop();
                self.recalculate();
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                self.buffers[self.focus.index()].clear();
                self.recalculate();
            }

            KeyCode::Char('r') => self.popup = Popup::ConfirmReset,
            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,

            _ => {}
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        match self.popup {
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')) {
                    self.popup = Popup::None;
                }
            }
            Popup::ConfirmReset => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.reset();
                    self.popup = Popup::None;
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.popup = Popup::None;
                }
                _ => {}
            },
            Popup::None => {}
        }
    }

    /// Append a typed character to the focused buffer and recompute.
    /// At most one decimal separator; a minus sign only in front.
    fn insert_char(&mut self, c: char) {
        let buffer = &mut self.buffers[self.focus.index()];
        if buffer.len() >= MAX_INPUT_LEN {
            return;
        }

        let accepted = match c {
            ',' | '.' => !buffer.contains([',', '.']),
            '-' => buffer.is_empty(),
            _ => true,
        };

        if accepted {
            buffer.push(c);
            self.recalculate();
        }
    }

    /// Restore every field to its start value
    pub fn reset(&mut self) {
        self.load_buffers();
        self.focus = Field::Kaufpreis;
        self.recalculate();
        tracing::info!("Inputs reset to start values");
        self.set_status("Eingaben zurückgesetzt");
    }

    pub fn tick(&mut self) {
        // Clear status message after timeout
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_TIMEOUT_SECONDS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}

/// Parse a form buffer. `,` counts as decimal separator; empty or
/// non-numeric input is absent.
pub fn parse_input(s: &str) -> Option<f64> {
    let normalized = s.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render a value into a form buffer (`3,8`, `300000`)
fn format_input(value: f64) -> String {
    format!("{}", value).replace('.', ",")
}
