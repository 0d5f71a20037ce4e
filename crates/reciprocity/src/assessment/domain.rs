use serde::{Deserialize, Serialize};

/// The six scored domains of the instrument. Serialized under their short
/// codes, which are also the column names in the assessments table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "TP")]
    ThreatPerception,
    #[serde(rename = "BI")]
    BehavioralIndicators,
    #[serde(rename = "OE")]
    ObjectiveExposure,
    #[serde(rename = "LC")]
    LeadershipClarity,
    #[serde(rename = "SC")]
    SocialClimate,
    #[serde(rename = "PS")]
    PhysiologicalStress,
}

impl Domain {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::ThreatPerception,
            Self::BehavioralIndicators,
            Self::ObjectiveExposure,
            Self::LeadershipClarity,
            Self::SocialClimate,
            Self::PhysiologicalStress,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::ThreatPerception => "TP",
            Self::BehavioralIndicators => "BI",
            Self::ObjectiveExposure => "OE",
            Self::LeadershipClarity => "LC",
            Self::SocialClimate => "SC",
            Self::PhysiologicalStress => "PS",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ThreatPerception => "Threat Perception",
            Self::BehavioralIndicators => "Behavioral Indicators",
            Self::ObjectiveExposure => "Objective Exposure",
            Self::LeadershipClarity => "Leadership Clarity",
            Self::SocialClimate => "Social Climate",
            Self::PhysiologicalStress => "Physiological Stress",
        }
    }
}

/// Which rater answered a perspective section of the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaterGroup {
    #[serde(rename = "self")]
    SelfReport,
    #[serde(rename = "coworker")]
    Coworker,
    #[serde(rename = "supervisor")]
    Supervisor,
}

impl RaterGroup {
    pub const fn ordered() -> [Self; 3] {
        [Self::SelfReport, Self::Coworker, Self::Supervisor]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SelfReport => "self",
            Self::Coworker => "coworker",
            Self::Supervisor => "supervisor",
        }
    }

    pub const fn heading(self) -> &'static str {
        match self {
            Self::SelfReport => "Self-Report",
            Self::Coworker => "Coworker Assessment",
            Self::Supervisor => "Supervisor Assessment",
        }
    }
}

/// One recorded answer. Scale answers hold the raw slider value; any reverse
/// adjustment happens at aggregation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Scale(f64),
    Text(String),
}

impl Answer {
    pub fn as_scale(&self) -> Option<f64> {
        match self {
            Answer::Scale(value) => Some(*value),
            Answer::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(value) => Some(value),
            Answer::Scale(_) => None,
        }
    }
}

/// The six domain inputs the scoring engine consumes, each in 0..=100.
/// Missing fields deserialize to zero so partial payloads score the way the
/// service always has.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainScores {
    #[serde(rename = "TP")]
    pub tp: f64,
    #[serde(rename = "BI")]
    pub bi: f64,
    #[serde(rename = "OE")]
    pub oe: f64,
    #[serde(rename = "LC")]
    pub lc: f64,
    #[serde(rename = "SC")]
    pub sc: f64,
    #[serde(rename = "PS")]
    pub ps: f64,
}

impl DomainScores {
    pub fn get(&self, domain: Domain) -> f64 {
        match domain {
            Domain::ThreatPerception => self.tp,
            Domain::BehavioralIndicators => self.bi,
            Domain::ObjectiveExposure => self.oe,
            Domain::LeadershipClarity => self.lc,
            Domain::SocialClimate => self.sc,
            Domain::PhysiologicalStress => self.ps,
        }
    }

    pub fn set(&mut self, domain: Domain, value: f64) {
        match domain {
            Domain::ThreatPerception => self.tp = value,
            Domain::BehavioralIndicators => self.bi = value,
            Domain::ObjectiveExposure => self.oe = value,
            Domain::LeadershipClarity => self.lc = value,
            Domain::SocialClimate => self.sc = value,
            Domain::PhysiologicalStress => self.ps = value,
        }
    }
}

/// Categorical outcome of the scoring engine. Serialized as the exact display
/// string stored in the CLASSIFICATION column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "High-Risk Immediate")]
    HighRiskImmediate,
    #[serde(rename = "Individual-driven")]
    IndividualDriven,
    #[serde(rename = "Environment-driven")]
    EnvironmentDriven,
    #[serde(rename = "Mixed-origin")]
    MixedOrigin,
    #[serde(rename = "Ambiguous / Low signal")]
    AmbiguousLowSignal,
    #[serde(rename = "Mixed / Needs deeper assessment")]
    NeedsDeeperAssessment,
}

impl Classification {
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighRiskImmediate => "High-Risk Immediate",
            Self::IndividualDriven => "Individual-driven",
            Self::EnvironmentDriven => "Environment-driven",
            Self::MixedOrigin => "Mixed-origin",
            Self::AmbiguousLowSignal => "Ambiguous / Low signal",
            Self::NeedsDeeperAssessment => "Mixed / Needs deeper assessment",
        }
    }

    /// Inverse of `label`, used when reading persisted rows.
    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "High-Risk Immediate" => Some(Self::HighRiskImmediate),
            "Individual-driven" => Some(Self::IndividualDriven),
            "Environment-driven" => Some(Self::EnvironmentDriven),
            "Mixed-origin" => Some(Self::MixedOrigin),
            "Ambiguous / Low signal" => Some(Self::AmbiguousLowSignal),
            "Mixed / Needs deeper assessment" => Some(Self::NeedsDeeperAssessment),
            _ => None,
        }
    }
}
