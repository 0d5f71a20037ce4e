use super::domain::{Domain, RaterGroup};

/// How an item is answered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuestionKind {
    /// Numeric slider over an inclusive range.
    Scale { min: f64, max: f64 },
    /// Free-form text.
    Text,
}

/// Probe surfaced when a displayed score crosses its threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowUpRule {
    pub threshold: f64,
    pub prompt: &'static str,
}

/// One item of the interview script.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionTemplate {
    pub id: &'static str,
    pub prompt: &'static str,
    pub help: Option<&'static str>,
    pub kind: QuestionKind,
    /// Domain the answer aggregates into; `None` for context and insight items.
    pub domain: Option<Domain>,
    /// Reverse-keyed: the instrument reads this answer as `100 - value`.
    pub reverse: bool,
    pub follow_up: Option<FollowUpRule>,
}

impl QuestionTemplate {
    /// Value the instrument works with: reverse-keyed items flip the scale.
    pub fn displayed_value(&self, value: f64) -> f64 {
        if self.reverse {
            100.0 - value
        } else {
            value
        }
    }

    /// Probe prompt to ask next, when `value` lands strictly above the
    /// question's follow-up threshold.
    pub fn follow_up_for(&self, value: f64) -> Option<&'static str> {
        let rule = self.follow_up.as_ref()?;
        (self.displayed_value(value) > rule.threshold).then_some(rule.prompt)
    }
}

/// A titled block of questions presented together.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Set on the blocks whose answers feed a per-group aggregate.
    pub rater_group: Option<RaterGroup>,
    pub questions: Vec<QuestionTemplate>,
}

/// The guided interview script: an ordered list of sections.
#[derive(Debug, Clone)]
pub struct AssessmentScript {
    sections: Vec<SectionTemplate>,
}

impl AssessmentScript {
    /// The standard Romanishan Reciprocity instrument.
    pub fn standard() -> Self {
        Self {
            sections: standard_sections(),
        }
    }

    pub fn sections(&self) -> &[SectionTemplate] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&SectionTemplate> {
        self.sections.get(index)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn question(&self, id: &str) -> Option<&QuestionTemplate> {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter())
            .find(|question| question.id == id)
    }

    pub fn sections_for_group(
        &self,
        group: RaterGroup,
    ) -> impl Iterator<Item = &SectionTemplate> {
        self.sections
            .iter()
            .filter(move |section| section.rater_group == Some(group))
    }
}

const SCALE: QuestionKind = QuestionKind::Scale {
    min: 0.0,
    max: 100.0,
};

fn standard_sections() -> Vec<SectionTemplate> {
    vec![
        SectionTemplate {
            id: "context",
            title: "Intake & Context",
            description: "Capture who we are assessing and context for this session.",
            rater_group: None,
            questions: vec![
                QuestionTemplate {
                    id: "subject_name",
                    prompt: "Participant full name",
                    help: Some("Name or identifier (not necessarily legal name)"),
                    kind: QuestionKind::Text,
                    domain: None,
                    reverse: false,
                    follow_up: None,
                },
                QuestionTemplate {
                    id: "role",
                    prompt: "Participant role / job title",
                    help: Some("Their position or role in the organization"),
                    kind: QuestionKind::Text,
                    domain: None,
                    reverse: false,
                    follow_up: None,
                },
                QuestionTemplate {
                    id: "context_short",
                    prompt: "Briefly describe what brought you here today (one sentence).",
                    help: None,
                    kind: QuestionKind::Text,
                    domain: None,
                    reverse: false,
                    follow_up: None,
                },
            ],
        },
        SectionTemplate {
            id: "baseline",
            title: "Baseline Emotional & Cognitive State",
            description: "Assess participant's general stress, anxiety, and self-perception.",
            rater_group: None,
            questions: vec![
                QuestionTemplate {
                    id: "stress_level",
                    prompt: "On a scale from 0-100, how stressed or anxious have you felt at work this week?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::PhysiologicalStress),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 70.0,
                        prompt: "Can you describe a specific incident that caused this stress?",
                    }),
                },
                QuestionTemplate {
                    id: "misunderstood",
                    prompt: "How often do you feel misunderstood or misjudged by colleagues?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::ThreatPerception),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 75.0,
                        prompt: "Give a concrete example of a situation where you felt misunderstood.",
                    }),
                },
                QuestionTemplate {
                    id: "performance_worry",
                    prompt: "How often do you worry about your performance or making mistakes?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::BehavioralIndicators),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 70.0,
                        prompt: "Describe a recent moment that made you worry.",
                    }),
                },
            ],
        },
        SectionTemplate {
            id: "perception",
            title: "Threat Perception & Cognitive Patterns",
            description: "Questions to explore internal perception of threat or negative intent.",
            rater_group: None,
            questions: vec![
                QuestionTemplate {
                    id: "q_tp_1",
                    prompt: "Think about a minor mistake you recently made. How likely did you feel it would lead to serious consequences?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::ThreatPerception),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 75.0,
                        prompt: "Can you describe what worst-case scenario you imagined?",
                    }),
                },
                QuestionTemplate {
                    id: "q_tp_2",
                    prompt: "When colleagues are silent, how often do you assume negative intent?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::ThreatPerception),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 70.0,
                        prompt: "Give an example of a situation where you felt this way.",
                    }),
                },
                QuestionTemplate {
                    id: "q_tp_3",
                    prompt: "When thinking about upcoming tasks, how often do you anticipate the worst possible outcome?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::ThreatPerception),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 70.0,
                        prompt: "Describe a recent task and your expectations.",
                    }),
                },
            ],
        },
        SectionTemplate {
            id: "behavioral",
            title: "Behavioral Patterns & Consistency",
            description: "Assess task performance, avoidance behaviors, and consistency.",
            rater_group: None,
            questions: vec![
                QuestionTemplate {
                    id: "q_bi_1",
                    prompt: "Reflect on your work quality: is it steady and consistent over time?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::BehavioralIndicators),
                    reverse: true,
                    follow_up: None,
                },
                QuestionTemplate {
                    id: "q_bi_2",
                    prompt: "Do you sometimes avoid tasks because you fear criticism?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::BehavioralIndicators),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 70.0,
                        prompt: "Give an example of a task you avoided recently.",
                    }),
                },
                QuestionTemplate {
                    id: "q_bi_3",
                    prompt: "Have you received any recent warnings or near-misses?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::BehavioralIndicators),
                    reverse: false,
                    follow_up: None,
                },
            ],
        },
        SectionTemplate {
            id: "environment",
            title: "Objective Exposure & Leadership Clarity",
            description: "Capture objective incidents and clarity of leadership/role expectations.",
            rater_group: None,
            questions: vec![
                QuestionTemplate {
                    id: "q_oe_1",
                    prompt: "Have you experienced disrespect, threats, or bullying at work recently?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::ObjectiveExposure),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 70.0,
                        prompt: "Describe a specific incident if comfortable.",
                    }),
                },
                QuestionTemplate {
                    id: "q_lc_1",
                    prompt: "How clearly does your manager provide feedback and expectations?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::LeadershipClarity),
                    reverse: true,
                    follow_up: None,
                },
                QuestionTemplate {
                    id: "q_lc_2",
                    prompt: "Are your responsibilities and role expectations clearly documented?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::LeadershipClarity),
                    reverse: true,
                    follow_up: None,
                },
                QuestionTemplate {
                    id: "q_oe_2",
                    prompt: "Are there formal HR records or warnings involving you recently?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::ObjectiveExposure),
                    reverse: false,
                    follow_up: None,
                },
            ],
        },
        SectionTemplate {
            id: "social",
            title: "Team Climate & Social Influence",
            description: "How team dynamics and social rumors affect perception.",
            rater_group: None,
            questions: vec![
                QuestionTemplate {
                    id: "q_sc_1",
                    prompt: "How often do negative stories or rumors spread on your team?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::SocialClimate),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 70.0,
                        prompt: "Provide an example if possible.",
                    }),
                },
                QuestionTemplate {
                    id: "q_sc_2",
                    prompt: "When someone struggles, does the team generally support them?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::SocialClimate),
                    reverse: true,
                    follow_up: None,
                },
            ],
        },
        SectionTemplate {
            id: "physio",
            title: "Physiological / Acute Stress",
            description: "Capture acute stress symptoms and physiological response.",
            rater_group: None,
            questions: vec![
                QuestionTemplate {
                    id: "q_ps_1",
                    prompt: "Have you had trouble sleeping due to work worries?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::PhysiologicalStress),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 70.0,
                        prompt: "Describe a specific instance if comfortable.",
                    }),
                },
                QuestionTemplate {
                    id: "q_ps_2",
                    prompt: "Do you experience rapid heartbeat, panic, or tension related to work?",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::PhysiologicalStress),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 70.0,
                        prompt: "Describe when this typically occurs.",
                    }),
                },
            ],
        },
        SectionTemplate {
            id: "self_role_fit",
            title: "Role Alignment & Satisfaction",
            description: "Evaluate if the participant is in the right role and environment for optimal performance and satisfaction.",
            rater_group: Some(RaterGroup::SelfReport),
            questions: vec![
                QuestionTemplate {
                    id: "self_strength_alignment",
                    prompt: "I feel my skills and strengths are fully utilized in my role.",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::BehavioralIndicators),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 65.0,
                        prompt: "Explain any areas where you feel underutilized.",
                    }),
                },
                QuestionTemplate {
                    id: "self_happiness",
                    prompt: "I feel motivated and satisfied in my current role and department.",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::PhysiologicalStress),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 65.0,
                        prompt: "Describe sources of dissatisfaction if any.",
                    }),
                },
                QuestionTemplate {
                    id: "self_stress_origin",
                    prompt: "The main sources of my stress are internal (my own approach) or external (environment/workplace).",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::ThreatPerception),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 70.0,
                        prompt: "Provide examples that clarify the source.",
                    }),
                },
            ],
        },
        SectionTemplate {
            id: "coworker",
            title: "Peer Perspective (Covert)",
            description: "Covert questions to evaluate performance, team dynamics, and environmental stressors from peers.",
            rater_group: Some(RaterGroup::Coworker),
            questions: vec![
                QuestionTemplate {
                    id: "peer_initiative",
                    prompt: "The participant volunteers for challenging tasks.",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::LeadershipClarity),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 80.0,
                        prompt: "Provide an example of when this occurred.",
                    }),
                },
                QuestionTemplate {
                    id: "peer_conflict_subtle",
                    prompt: "The participant shows subtle frustration with team processes.",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::SocialClimate),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 70.0,
                        prompt: "Explain what you observed.",
                    }),
                },
                QuestionTemplate {
                    id: "peer_hidden_bias",
                    prompt: "Participant contributions are sometimes downplayed.",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::SocialClimate),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 65.0,
                        prompt: "Give an example.",
                    }),
                },
                QuestionTemplate {
                    id: "peer_alignment",
                    prompt: "The participant is in a role suited to their skills.",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::LeadershipClarity),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 60.0,
                        prompt: "Describe misalignment observed.",
                    }),
                },
            ],
        },
        SectionTemplate {
            id: "supervisor",
            title: "Immediate Supervisor Perspective (Covert)",
            description: "Covert questions to evaluate environmental factors and performance from supervisor perspective.",
            rater_group: Some(RaterGroup::Supervisor),
            questions: vec![
                QuestionTemplate {
                    id: "leader_motivation",
                    prompt: "The participant performs at their full potential.",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::BehavioralIndicators),
                    reverse: true,
                    follow_up: Some(FollowUpRule {
                        threshold: 70.0,
                        prompt: "Describe instances suggesting underperformance.",
                    }),
                },
                QuestionTemplate {
                    id: "leader_hidden_stress",
                    prompt: "The participant shows stress that is not openly communicated.",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::PhysiologicalStress),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 65.0,
                        prompt: "Provide examples.",
                    }),
                },
                QuestionTemplate {
                    id: "leader_role_fit",
                    prompt: "The participant's current role aligns with strengths.",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::ThreatPerception),
                    reverse: true,
                    follow_up: Some(FollowUpRule {
                        threshold: 60.0,
                        prompt: "Describe any misalignment.",
                    }),
                },
                QuestionTemplate {
                    id: "leader_environmental_impact",
                    prompt: "Team or organizational dynamics limit the participant's performance.",
                    help: None,
                    kind: SCALE,
                    domain: Some(Domain::ObjectiveExposure),
                    reverse: false,
                    follow_up: Some(FollowUpRule {
                        threshold: 70.0,
                        prompt: "Provide context or incidents.",
                    }),
                },
            ],
        },
        SectionTemplate {
            id: "reflection",
            title: "Reflection & Insight",
            description: "Capture awareness of perception versus objective facts.",
            rater_group: None,
            questions: vec![
                QuestionTemplate {
                    id: "insight_1",
                    prompt: "How confident are you that your concerns are caused by external actions rather than personal perceptions?",
                    help: None,
                    kind: SCALE,
                    domain: None,
                    reverse: false,
                    follow_up: None,
                },
                QuestionTemplate {
                    id: "insight_text",
                    prompt: "Please briefly describe an example that illustrates your perspective (optional):",
                    help: None,
                    kind: QuestionKind::Text,
                    domain: None,
                    reverse: false,
                    follow_up: None,
                },
            ],
        },
    ]
}
