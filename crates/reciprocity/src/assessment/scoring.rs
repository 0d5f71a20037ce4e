use serde::{Deserialize, Serialize};

use super::domain::{Classification, DomainScores};

/// Output of the scoring engine: the coerced inputs plus the derived figures,
/// serialized with the wire/database field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    #[serde(flatten)]
    pub inputs: DomainScores,
    #[serde(rename = "IOS")]
    pub ios: f64,
    #[serde(rename = "EOS")]
    pub eos: f64,
    #[serde(rename = "DIFF")]
    pub diff: f64,
    #[serde(rename = "CONFIDENCE")]
    pub confidence: f64,
    #[serde(rename = "CLASSIFICATION")]
    pub classification: Classification,
}

/// Score one set of domain inputs.
///
/// ```text
/// IOS = 0.40*TP + 0.25*BI + 0.20*PS + 0.15*SC
/// EOS = 0.40*OE + 0.30*LC + 0.20*SC + 0.10*BI
/// CONFIDENCE = max(0, 100 - |IOS - EOS|)
/// ```
///
/// Classification is decided on the unrounded values; IOS, EOS, DIFF, and
/// CONFIDENCE are then rounded to one decimal. Pure and deterministic.
pub fn score(inputs: &DomainScores) -> ScoreCard {
    let ios = 0.40 * inputs.tp + 0.25 * inputs.bi + 0.20 * inputs.ps + 0.15 * inputs.sc;
    let eos = 0.40 * inputs.oe + 0.30 * inputs.lc + 0.20 * inputs.sc + 0.10 * inputs.bi;
    let diff = ios - eos;
    let confidence = (100.0 - diff.abs()).max(0.0);
    let classification = classify(ios, eos, diff, inputs.oe);

    ScoreCard {
        inputs: *inputs,
        ios: round1(ios),
        eos: round1(eos),
        diff: round1(diff),
        confidence: round1(confidence),
        classification,
    }
}

/// First matching rule wins; the order is part of the instrument.
fn classify(ios: f64, eos: f64, diff: f64, oe: f64) -> Classification {
    if oe >= 80.0 {
        Classification::HighRiskImmediate
    } else if ios >= 70.0 && eos <= 45.0 {
        Classification::IndividualDriven
    } else if eos >= 70.0 && ios <= 45.0 {
        Classification::EnvironmentDriven
    } else if ios >= 50.0 && eos >= 50.0 {
        Classification::MixedOrigin
    } else if diff.abs() < 10.0 && ios < 50.0 && eos < 50.0 {
        Classification::AmbiguousLowSignal
    } else {
        Classification::NeedsDeeperAssessment
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
