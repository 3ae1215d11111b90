use serde::{Deserialize, Serialize};

use super::tiers::ZinsStufe;

/// Inputs of one calculation. Optional fields fall back to the
/// documented defaults when `None`; an explicit `Some(0.0)` is taken as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EigenkapitalInputs {
    pub kaufpreis: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nebenkosten_prozent: Option<f64>,
    pub eigenkapital_vorhanden: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zinssatz_100: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zinssatz_80: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zinssatz_60: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jahresmiete: Option<f64>,
}

pub const DEFAULT_NEBENKOSTEN_PROZENT: f64 = 10.0;
pub const DEFAULT_ZINSSATZ_100: f64 = 4.5;
pub const DEFAULT_ZINSSATZ_80: f64 = 3.8;
pub const DEFAULT_ZINSSATZ_60: f64 = 3.2;

impl Default for EigenkapitalInputs {
    /// The start values of the form and the reset target.
    fn default() -> Self {
        Self {
            kaufpreis: 300_000.0,
            nebenkosten_prozent: Some(DEFAULT_NEBENKOSTEN_PROZENT),
            eigenkapital_vorhanden: 60_000.0,
            zinssatz_100: Some(DEFAULT_ZINSSATZ_100),
            zinssatz_80: Some(DEFAULT_ZINSSATZ_80),
            zinssatz_60: Some(DEFAULT_ZINSSATZ_60),
            jahresmiete: None,
        }
    }
}

/// Recommendation tier derived from the equity ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Empfehlung {
    Kritisch,
    Ausreichend,
    Gut,
    SehrGut,
}

impl Empfehlung {
    pub fn label(self) -> &'static str {
        match self {
            Empfehlung::Kritisch => "Kritisch",
            Empfehlung::Ausreichend => "Ausreichend",
            Empfehlung::Gut => "Gut",
            Empfehlung::SehrGut => "Sehr gut",
        }
    }
}

/// Derived figures of one calculation. Never mutated, always replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenkapitalResults {
    pub kaufpreis: f64,
    pub nebenkosten: f64,
    pub gesamtkosten: f64,
    pub eigenkapital_vorhanden: f64,
    pub ek_quote: f64,
    pub ek_minimum: f64,
    pub ek_20_prozent: f64,
    pub ek_30_prozent: f64,
    pub darlehensbetrag: f64,
    pub beleihungsauslauf: f64,
    pub zins_stufe: ZinsStufe,
    pub aktueller_zinssatz: f64,
    pub monatliche_rate: f64,
    /// `None` when no rent was assumed, which is not the same as zero cashflow.
    pub monatlicher_cashflow: Option<f64>,
    pub empfehlung: Empfehlung,
    pub fehlbetrag_minimum: f64,
    pub fehlbetrag_20: f64,
}

impl EigenkapitalResults {
    /// Progress of the equity ratio towards 30 %, clamped to `0.0..=1.0`.
    pub fn quote_fortschritt(&self) -> f64 {
        let ratio = self.ek_quote / 30.0;
        if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        }
    }
}
