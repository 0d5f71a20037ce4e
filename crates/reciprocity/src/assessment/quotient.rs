//! Reciprocity Quotient: a standalone four-slider diagnostic, log-normalized
//! onto a 0..=100 gauge.

/// The four slider inputs, each on a 1..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotientInputs {
    pub perceived_input: u8,
    pub perceived_return: u8,
    pub systemic_trust: u8,
    pub self_regulation: u8,
}

impl QuotientInputs {
    /// Clamps each value onto the slider scale.
    pub fn new(
        perceived_input: u8,
        perceived_return: u8,
        systemic_trust: u8,
        self_regulation: u8,
    ) -> Self {
        Self {
            perceived_input: perceived_input.clamp(1, 5),
            perceived_return: perceived_return.clamp(1, 5),
            systemic_trust: systemic_trust.clamp(1, 5),
            self_regulation: self_regulation.clamp(1, 5),
        }
    }
}

impl Default for QuotientInputs {
    fn default() -> Self {
        Self::new(3, 3, 3, 3)
    }
}

/// Gauge band for a quotient percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotientTier {
    UnderReciprocity,
    ReactiveReciprocity,
    DevelopingEquilibrium,
    ReciprocalSynergy,
    RegenerativeCollaboration,
}

impl QuotientTier {
    pub const fn from_percent(percent: u8) -> Self {
        match percent {
            0..=39 => Self::UnderReciprocity,
            40..=54 => Self::ReactiveReciprocity,
            55..=69 => Self::DevelopingEquilibrium,
            70..=84 => Self::ReciprocalSynergy,
            _ => Self::RegenerativeCollaboration,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UnderReciprocity => "Under-Reciprocity",
            Self::ReactiveReciprocity => "Reactive Reciprocity",
            Self::DevelopingEquilibrium => "Developing Equilibrium",
            Self::ReciprocalSynergy => "Reciprocal Synergy",
            Self::RegenerativeCollaboration => "Regenerative Collaboration",
        }
    }

    pub const fn interpretation(self) -> &'static str {
        match self {
            Self::UnderReciprocity => "Energy deficit detected; giving more than you receive.",
            Self::ReactiveReciprocity => "Awareness of imbalance; strategies inconsistent.",
            Self::DevelopingEquilibrium => "Emerging balance but fragile in places.",
            Self::ReciprocalSynergy => "Healthy reciprocity; maintenance recommended.",
            Self::RegenerativeCollaboration => "High reciprocity; consider scaling and sustaining.",
        }
    }
}

/// One computed reading of the gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotientReading {
    pub inputs: QuotientInputs,
    /// `(return * trust) / (input * self_regulation)`, before normalization.
    pub raw_ratio: f64,
    pub percent: u8,
    pub tier: QuotientTier,
}

impl QuotientReading {
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "Reciprocity Quotient: {}% ({})",
            self.percent,
            self.tier.label()
        ));
        lines.push(self.tier.interpretation().to_string());
        lines.push(String::new());
        lines.push("Profile:".to_string());
        lines.push(format!(
            "- Perceived Input: {} (1-5 scale)",
            self.inputs.perceived_input
        ));
        lines.push(format!(
            "- Perceived Return: {} (1-5 scale)",
            self.inputs.perceived_return
        ));
        lines.push(format!(
            "- Systemic Trust: {} (1-5 scale)",
            self.inputs.systemic_trust
        ));
        lines.push(format!(
            "- Self-Regulation: {} (1-5 scale)",
            self.inputs.self_regulation
        ));
        lines.join("\n")
    }
}

/// Ratio endpoints for the 1..=5 scales: `(1*1)/(5*5)` and `(5*5)/(1*1)`.
const MIN_RAW: f64 = 0.04;
const MAX_RAW: f64 = 25.0;

/// Compute the quotient: take the return-to-input ratio, log-normalize it
/// between the scale endpoints, and read the result as a percentage.
pub fn compute(inputs: QuotientInputs) -> QuotientReading {
    let raw_ratio = (f64::from(inputs.perceived_return) * f64::from(inputs.systemic_trust))
        / (f64::from(inputs.perceived_input) * f64::from(inputs.self_regulation));
    let safe_ratio = raw_ratio.max(1e-6);
    let norm = (safe_ratio.ln() - MIN_RAW.ln()) / (MAX_RAW.ln() - MIN_RAW.ln());
    let percent = (norm.clamp(0.0, 1.0) * 100.0).round() as u8;

    QuotientReading {
        inputs,
        raw_ratio,
        percent,
        tier: QuotientTier::from_percent(percent),
    }
}
