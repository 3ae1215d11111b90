//! Threshold tables for the interest-rate tier and the recommendation tier.
//!
//! Both tables are evaluated top-down and the first matching row wins.

use serde::{Deserialize, Serialize};

use super::types::Empfehlung;

/// Principal repayment added on top of the interest rate (percentage points).
pub const TILGUNG_PROZENT: f64 = 2.0;

/// Which of the three configured interest rates applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZinsStufe {
    #[serde(rename = "zinssatz_100")]
    Voll,
    #[serde(rename = "zinssatz_80")]
    Achtzig,
    #[serde(rename = "zinssatz_60")]
    Sechzig,
}

impl ZinsStufe {
    pub fn label(self) -> &'static str {
        match self {
            ZinsStufe::Voll => "100%",
            ZinsStufe::Achtzig => "80%",
            ZinsStufe::Sechzig => "60%",
        }
    }
}

// beleihungsauslauf > threshold
const ZINS_STAFFEL: [(f64, ZinsStufe); 2] = [
    (90.0, ZinsStufe::Voll),
    (70.0, ZinsStufe::Achtzig),
];

// ek_quote < threshold
const EMPFEHLUNG_STAFFEL: [(f64, Empfehlung); 3] = [
    (10.0, Empfehlung::Kritisch),
    (20.0, Empfehlung::Ausreichend),
    (30.0, Empfehlung::Gut),
];

/// Rate tier for a loan-to-value percentage. Exact boundaries fall into the
/// lower tier.
pub fn zins_stufe(beleihungsauslauf: f64) -> ZinsStufe {
    ZINS_STAFFEL
        .iter()
        .find(|(schwelle, _)| beleihungsauslauf > *schwelle)
        .map(|(_, stufe)| *stufe)
        .unwrap_or(ZinsStufe::Sechzig)
}

/// Recommendation for an (unrounded) equity ratio in percent.
pub fn empfehlung(ek_quote: f64) -> Empfehlung {
    EMPFEHLUNG_STAFFEL
        .iter()
        .find(|(schwelle, _)| ek_quote < *schwelle)
        .map(|(_, empfehlung)| *empfehlung)
        .unwrap_or(Empfehlung::SehrGut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zins_stufe_boundaries() {
        assert_eq!(zins_stufe(100.0), ZinsStufe::Voll);
        assert_eq!(zins_stufe(90.01), ZinsStufe::Voll);
        assert_eq!(zins_stufe(90.0), ZinsStufe::Achtzig);
        assert_eq!(zins_stufe(70.01), ZinsStufe::Achtzig);
        assert_eq!(zins_stufe(70.0), ZinsStufe::Sechzig);
        assert_eq!(zins_stufe(0.0), ZinsStufe::Sechzig);
    }

    #[test]
    fn test_empfehlung_boundaries() {
        assert_eq!(empfehlung(0.0), Empfehlung::Kritisch);
        assert_eq!(empfehlung(9.99), Empfehlung::Kritisch);
        assert_eq!(empfehlung(10.0), Empfehlung::Ausreichend);
        assert_eq!(empfehlung(19.99), Empfehlung::Ausreichend);
        assert_eq!(empfehlung(20.0), Empfehlung::Gut);
        assert_eq!(empfehlung(30.0), Empfehlung::SehrGut);
        assert_eq!(empfehlung(100.0), Empfehlung::SehrGut);
    }

    #[test]
    fn test_negative_quote_is_kritisch() {
        assert_eq!(empfehlung(-5.0), Empfehlung::Kritisch);
    }
}
