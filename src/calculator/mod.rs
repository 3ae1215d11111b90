pub mod tiers;
pub mod types;

pub use tiers::ZinsStufe;
pub use types::{Empfehlung, EigenkapitalInputs, EigenkapitalResults};

use types::{
    DEFAULT_NEBENKOSTEN_PROZENT, DEFAULT_ZINSSATZ_100, DEFAULT_ZINSSATZ_60, DEFAULT_ZINSSATZ_80,
};

/// Round half away from zero to a fixed number of decimals
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn euro(value: f64) -> f64 {
    round_to(value, 2)
}

fn prozent(value: f64) -> f64 {
    round_to(value, 1)
}

/// Compute all financing figures for one set of inputs.
///
/// Pure and infallible: out-of-range numbers are not rejected, division by a
/// zero purchase price or total cost yields 0. Every intermediate value is
/// kept unrounded, rounding happens only when the result record is built.
pub fn calculate(inputs: &EigenkapitalInputs) -> EigenkapitalResults {
    let kaufpreis = inputs.kaufpreis;
    let eigenkapital = inputs.eigenkapital_vorhanden;
    let nebenkosten_prozent = inputs.nebenkosten_prozent.unwrap_or(DEFAULT_NEBENKOSTEN_PROZENT);
    let zinssatz_100 = inputs.zinssatz_100.unwrap_or(DEFAULT_ZINSSATZ_100);
    let zinssatz_80 = inputs.zinssatz_80.unwrap_or(DEFAULT_ZINSSATZ_80);
    let zinssatz_60 = inputs.zinssatz_60.unwrap_or(DEFAULT_ZINSSATZ_60);
    let jahresmiete = inputs.jahresmiete.unwrap_or(0.0);

    let nebenkosten = kaufpreis * nebenkosten_prozent / 100.0;
    let gesamtkosten = kaufpreis + nebenkosten;
    let ek_minimum = nebenkosten;
    let ek_20_prozent = gesamtkosten * 0.20;
    let ek_30_prozent = gesamtkosten * 0.30;

    let ek_quote = if gesamtkosten > 0.0 {
        eigenkapital / gesamtkosten * 100.0
    } else {
        0.0
    };

    let darlehensbetrag = (gesamtkosten - eigenkapital).max(0.0);
    let beleihungsauslauf = if kaufpreis > 0.0 {
        darlehensbetrag / kaufpreis * 100.0
    } else {
        0.0
    };

    let zins_stufe = tiers::zins_stufe(beleihungsauslauf);
    let aktueller_zinssatz = match zins_stufe {
        ZinsStufe::Voll => zinssatz_100,
        ZinsStufe::Achtzig => zinssatz_80,
        ZinsStufe::Sechzig => zinssatz_60,
    };

    let annuitaet_prozent = aktueller_zinssatz + tiers::TILGUNG_PROZENT;
    let monatliche_rate = darlehensbetrag * annuitaet_prozent / 100.0 / 12.0;

    let monatlicher_cashflow = if jahresmiete > 0.0 {
        Some(jahresmiete / 12.0 - monatliche_rate)
    } else {
        None
    };

    let empfehlung = tiers::empfehlung(ek_quote);

    let fehlbetrag_minimum = (ek_minimum - eigenkapital).max(0.0);
    let fehlbetrag_20 = (ek_20_prozent - eigenkapital).max(0.0);

    EigenkapitalResults {
        kaufpreis,
        nebenkosten: euro(nebenkosten),
        gesamtkosten: euro(gesamtkosten),
        eigenkapital_vorhanden: eigenkapital,
        ek_quote: prozent(ek_quote),
        ek_minimum: euro(ek_minimum),
        ek_20_prozent: euro(ek_20_prozent),
        ek_30_prozent: euro(ek_30_prozent),
        darlehensbetrag: euro(darlehensbetrag),
        beleihungsauslauf: prozent(beleihungsauslauf),
        zins_stufe,
        aktueller_zinssatz,
        monatliche_rate: euro(monatliche_rate),
        monatlicher_cashflow: monatlicher_cashflow.map(euro),
        empfehlung,
        fehlbetrag_minimum: euro(fehlbetrag_minimum),
        fehlbetrag_20: euro(fehlbetrag_20),
    }
}

/// Memoizing front for [`calculate`]: keeps the last input/result pair and
/// skips the computation while the inputs stay equal.
#[derive(Debug, Default)]
pub struct Calculator {
    last: Option<(EigenkapitalInputs, EigenkapitalResults)>,
    recomputations: u64,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calculate(&mut self, inputs: &EigenkapitalInputs) -> EigenkapitalResults {
        if let Some((cached_inputs, cached_results)) = &self.last {
            if cached_inputs == inputs {
                tracing::debug!("Inputs unchanged, reusing cached results");
                return cached_results.clone();
            }
        }

        let results = calculate(inputs);
        self.recomputations += 1;
        tracing::debug!(
            recomputations = self.recomputations,
            ek_quote = results.ek_quote,
            beleihungsauslauf = results.beleihungsauslauf,
            empfehlung = ?results.empfehlung,
            "Recomputed equity figures"
        );
        self.last = Some((inputs.clone(), results.clone()));
        results
    }

    /// Number of times the inputs actually had to be recomputed
    #[cfg(test)]
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn inputs(kaufpreis: f64, eigenkapital: f64) -> EigenkapitalInputs {
        EigenkapitalInputs {
            kaufpreis,
            eigenkapital_vorhanden: eigenkapital,
            ..EigenkapitalInputs::default()
        }
    }

    #[test]
    fn test_default_scenario() {
        let results = calculate(&EigenkapitalInputs::default());

        assert!(approx(results.nebenkosten, 30_000.0));
        assert!(approx(results.gesamtkosten, 330_000.0));
        assert!(approx(results.ek_quote, 18.2));
        assert!(approx(results.darlehensbetrag, 270_000.0));
        assert!(approx(results.beleihungsauslauf, 90.0));
        // exactly 90 % stays in the 80 % tier
        assert_eq!(results.zins_stufe, ZinsStufe::Achtzig);
        assert!(approx(results.aktueller_zinssatz, 3.8));
        assert!(approx(results.monatliche_rate, 1305.0));
        assert_eq!(results.monatlicher_cashflow, None);
        assert_eq!(results.empfehlung, Empfehlung::Ausreichend);
        assert!(approx(results.ek_minimum, 30_000.0));
        assert!(approx(results.ek_20_prozent, 66_000.0));
        assert!(approx(results.ek_30_prozent, 99_000.0));
        assert!(approx(results.fehlbetrag_minimum, 0.0));
        assert!(approx(results.fehlbetrag_20, 6_000.0));
        assert!(approx(results.kaufpreis, 300_000.0));
        assert!(approx(results.eigenkapital_vorhanden, 60_000.0));
    }

    #[test]
    fn test_cashflow_with_rent() {
        let input = EigenkapitalInputs {
            jahresmiete: Some(18_000.0),
            ..EigenkapitalInputs::default()
        };
        let results = calculate(&input);
        let cashflow = results.monatlicher_cashflow.expect("cashflow with rent");
        assert!(approx(cashflow, 195.0));
    }

    #[test]
    fn test_negative_cashflow() {
        let input = EigenkapitalInputs {
            jahresmiete: Some(12_000.0),
            ..EigenkapitalInputs::default()
        };
        let cashflow = calculate(&input).monatlicher_cashflow.unwrap();
        assert!(approx(cashflow, -305.0));
    }

    #[test]
    fn test_zero_rent_means_no_cashflow() {
        let input = EigenkapitalInputs {
            jahresmiete: Some(0.0),
            ..EigenkapitalInputs::default()
        };
        assert_eq!(calculate(&input).monatlicher_cashflow, None);
    }

    #[test]
    fn test_full_equity() {
        let input = inputs(300_000.0, 330_000.0);
        let results = calculate(&input);

        assert!(approx(results.darlehensbetrag, 0.0));
        assert!(approx(results.monatliche_rate, 0.0));
        assert!(approx(results.beleihungsauslauf, 0.0));
        assert!(approx(results.ek_quote, 100.0));
        assert_eq!(results.empfehlung, Empfehlung::SehrGut);
        assert_eq!(results.zins_stufe, ZinsStufe::Sechzig);
    }

    #[test]
    fn test_loan_never_negative() {
        let results = calculate(&inputs(100_000.0, 500_000.0));
        assert_eq!(results.darlehensbetrag, 0.0);
        assert_eq!(results.fehlbetrag_minimum, 0.0);
        assert_eq!(results.fehlbetrag_20, 0.0);
    }

    #[test]
    fn test_zero_purchase_price() {
        let results = calculate(&inputs(0.0, 10_000.0));
        assert_eq!(results.gesamtkosten, 0.0);
        assert_eq!(results.ek_quote, 0.0);
        assert_eq!(results.beleihungsauslauf, 0.0);
        assert_eq!(results.darlehensbetrag, 0.0);
        assert_eq!(results.empfehlung, Empfehlung::Kritisch);
    }

    #[test]
    fn test_total_cost_identity() {
        for (kaufpreis, prozent) in [(250_000.0, 7.5), (123_456.78, 12.0), (1.0, 0.0)] {
            let input = EigenkapitalInputs {
                kaufpreis,
                nebenkosten_prozent: Some(prozent),
                ..EigenkapitalInputs::default()
            };
            let results = calculate(&input);
            let expected = kaufpreis + kaufpreis * prozent / 100.0;
            assert!((results.gesamtkosten - expected).abs() <= 0.005);
        }
    }

    #[test]
    fn test_explicit_zero_nebenkosten_is_honored() {
        let input = EigenkapitalInputs {
            nebenkosten_prozent: Some(0.0),
            ..EigenkapitalInputs::default()
        };
        let results = calculate(&input);
        assert_eq!(results.nebenkosten, 0.0);
        assert_eq!(results.gesamtkosten, 300_000.0);
    }

    #[test]
    fn test_absent_optionals_use_defaults() {
        let input = EigenkapitalInputs {
            kaufpreis: 300_000.0,
            nebenkosten_prozent: None,
            eigenkapital_vorhanden: 60_000.0,
            zinssatz_100: None,
            zinssatz_80: None,
            zinssatz_60: None,
            jahresmiete: None,
        };
        assert_eq!(calculate(&input), calculate(&EigenkapitalInputs::default()));
    }

    #[test]
    fn test_rate_tier_above_ninety() {
        // 300k price, 10 % costs, 30k equity -> 300k loan, 100 % LTV
        let results = calculate(&inputs(300_000.0, 30_000.0));
        assert_eq!(results.zins_stufe, ZinsStufe::Voll);
        assert!(approx(results.aktueller_zinssatz, 4.5));
        assert!(approx(results.monatliche_rate, 1625.0));
        assert_eq!(results.empfehlung, Empfehlung::Kritisch);
    }

    #[test]
    fn test_rate_tier_just_above_ninety() {
        // loan 270_030 on 300k price -> 90.01 % LTV
        let results = calculate(&inputs(300_000.0, 59_970.0));
        assert!(approx(results.beleihungsauslauf, 90.0));
        assert_eq!(results.zins_stufe, ZinsStufe::Voll);
        assert!(approx(results.aktueller_zinssatz, 4.5));
    }

    #[test]
    fn test_rate_tier_sixty() {
        let results = calculate(&inputs(300_000.0, 150_000.0));
        assert!(approx(results.beleihungsauslauf, 60.0));
        assert_eq!(results.zins_stufe, ZinsStufe::Sechzig);
        assert!(approx(results.aktueller_zinssatz, 3.2));
    }

    #[test]
    fn test_recommendation_boundary_at_twenty() {
        let input = EigenkapitalInputs {
            kaufpreis: 100_000.0,
            nebenkosten_prozent: Some(0.0),
            eigenkapital_vorhanden: 20_000.0,
            ..EigenkapitalInputs::default()
        };
        let results = calculate(&input);
        assert!(approx(results.ek_quote, 20.0));
        assert_eq!(results.empfehlung, Empfehlung::Gut);
    }

    #[test]
    fn test_kritisch_shortfall() {
        let results = calculate(&inputs(300_000.0, 10_000.0));
        assert_eq!(results.empfehlung, Empfehlung::Kritisch);
        assert!(approx(results.fehlbetrag_minimum, 20_000.0));
        assert!(approx(results.fehlbetrag_20, 56_000.0));
    }

    #[test]
    fn test_rounding_applied_last() {
        let input = EigenkapitalInputs {
            kaufpreis: 333_333.0,
            nebenkosten_prozent: Some(7.57),
            eigenkapital_vorhanden: 12_345.67,
            ..EigenkapitalInputs::default()
        };
        let results = calculate(&input);
        for value in [
            results.nebenkosten,
            results.gesamtkosten,
            results.darlehensbetrag,
            results.monatliche_rate,
        ] {
            assert!(approx(value, round_to(value, 2)));
        }
        assert!(approx(results.ek_quote, round_to(results.ek_quote, 1)));
        assert!(approx(results.beleihungsauslauf, round_to(results.beleihungsauslauf, 1)));
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(18.181818, 1), 18.2);
    }

    #[test]
    fn test_nan_input_does_not_panic() {
        let results = calculate(&inputs(f64::NAN, 0.0));
        assert_eq!(results.ek_quote, 0.0);
        assert_eq!(results.beleihungsauslauf, 0.0);
    }

    #[test]
    fn test_pure_function() {
        let input = EigenkapitalInputs {
            jahresmiete: Some(14_400.0),
            ..inputs(420_000.0, 95_000.0)
        };
        assert_eq!(calculate(&input), calculate(&input));
    }

    #[test]
    fn test_calculator_memoizes_equal_inputs() {
        let mut calculator = Calculator::new();
        let input = EigenkapitalInputs::default();

        let first = calculator.calculate(&input);
        let second = calculator.calculate(&input.clone());
        assert_eq!(first, second);
        assert_eq!(calculator.recomputations(), 1);

        let changed = EigenkapitalInputs {
            eigenkapital_vorhanden: 90_000.0,
            ..input
        };
        let third = calculator.calculate(&changed);
        assert_eq!(calculator.recomputations(), 2);
        assert_ne!(first, third);
    }

    #[test]
    fn test_results_json_shape() {
        let results = calculate(&EigenkapitalInputs::default());
        let json = serde_json::to_value(&results).unwrap();

        assert_eq!(json["empfehlung"], "ausreichend");
        assert_eq!(json["zins_stufe"], "zinssatz_80");
        assert!(json["monatlicher_cashflow"].is_null());
        assert_eq!(json["monatliche_rate"], 1305.0);
    }

    #[test]
    fn test_quote_fortschritt() {
        let results = calculate(&EigenkapitalInputs::default());
        assert!((results.quote_fortschritt() - 18.2 / 30.0).abs() < 1e-9);

        let full = calculate(&inputs(300_000.0, 330_000.0));
        assert_eq!(full.quote_fortschritt(), 1.0);
    }
}
