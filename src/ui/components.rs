//! Reusable UI component helpers

use ratatui::{
    style::{Color, Style},
    text::Span,
    widgets::Row,
};

use crate::calculator::{Empfehlung, EigenkapitalResults};
use crate::format::format_euro;

/// Explanation shown below the recommendation label
pub fn empfehlung_hinweis(results: &EigenkapitalResults) -> String {
    match results.empfehlung {
        Empfehlung::Kritisch => format!(
            "Sie sollten mindestens {} mehr Eigenkapital einbringen, um die Nebenkosten zu decken.",
            format_euro(results.fehlbetrag_minimum)
        ),
        Empfehlung::Ausreichend => format!(
            "Finanzierung möglich, aber mit höheren Zinsen. Für bessere Konditionen fehlen noch {}.",
            format_euro(results.fehlbetrag_20)
        ),
        Empfehlung::Gut => {
            "Solide Eigenkapitalquote! Sie erhalten gute Finanzierungskonditionen.".to_string()
        }
        Empfehlung::SehrGut => {
            "Optimale Finanzierungsvoraussetzungen! Sie profitieren von den besten Zinskonditionen."
                .to_string()
        }
    }
}

/// Two-column label/value row
pub fn value_row(label: &str, value: String, label_color: Color, value_color: Color) -> Row<'static> {
    Row::new(vec![
        Span::styled(label.to_string(), Style::default().fg(label_color)),
        Span::styled(value, Style::default().fg(value_color)),
    ])
}

/// Footer legend: `key action │ key action │ ...`
pub fn key_hints(hints: &[(&'static str, &'static str)], key_color: Color, text_color: Color) -> Vec<Span<'static>> {
    hints
        .iter()
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(key_color)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_color)),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{calculate, EigenkapitalInputs};

    #[test]
    fn test_hinweis_mentions_shortfall() {
        let results = calculate(&EigenkapitalInputs::default());
        assert_eq!(results.empfehlung, Empfehlung::Ausreichend);
        assert!(empfehlung_hinweis(&results).contains("6.000,00 €"));

        let kritisch = calculate(&EigenkapitalInputs {
            eigenkapital_vorhanden: 10_000.0,
            ..EigenkapitalInputs::default()
        });
        assert!(empfehlung_hinweis(&kritisch).contains("20.000,00 €"));
    }

    #[test]
    fn test_key_hints_pairs() {
        let spans = key_hints(&[("q", "Quit"), ("h", "Help")], Color::Yellow, Color::Gray);
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].content, "q");
        assert_eq!(spans[3].content, " Help │ ");
    }
}
