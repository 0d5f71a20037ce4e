use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::aggregate::{combined_aggregate, group_aggregate};
use super::domain::{Answer, Domain, DomainScores, RaterGroup};
use super::scoring::{score, ScoreCard};
use super::script::AssessmentScript;

/// Version tag written into every persisted dossier.
pub const DOSSIER_SCHEMA_VERSION: u32 = 1;

/// Aggregates and scores for a single rater perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOutcome {
    pub group: RaterGroup,
    pub aggregates: DomainScores,
    pub scores: ScoreCard,
}

/// Everything the summary screen shows: per-group and combined results plus
/// the resolved follow-up notes.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentOutcome {
    pub subject_name: Option<String>,
    pub subject_role: Option<String>,
    /// Ordered self, coworker, supervisor.
    pub groups: Vec<GroupOutcome>,
    pub combined_aggregates: DomainScores,
    pub combined_scores: ScoreCard,
    /// `(question prompt, note)` pairs in question-id order.
    pub follow_up_notes: Vec<(String, String)>,
}

impl AssessmentOutcome {
    pub fn compute(
        script: &AssessmentScript,
        responses: &BTreeMap<&'static str, Answer>,
        follow_ups: &BTreeMap<&'static str, String>,
    ) -> Self {
        let self_report = group_entry(script, responses, RaterGroup::SelfReport);
        let coworker = group_entry(script, responses, RaterGroup::Coworker);
        let supervisor = group_entry(script, responses, RaterGroup::Supervisor);

        let combined_aggregates = combined_aggregate(
            &self_report.aggregates,
            &coworker.aggregates,
            &supervisor.aggregates,
        );
        let combined_scores = score(&combined_aggregates);

        let follow_up_notes = follow_ups
            .iter()
            .map(|(&id, note)| {
                let prompt = script
                    .question(id)
                    .map(|question| question.prompt)
                    .unwrap_or(id);
                (prompt.to_string(), note.clone())
            })
            .collect();

        Self {
            subject_name: text_of(responses, "subject_name"),
            subject_role: text_of(responses, "role"),
            groups: vec![self_report, coworker, supervisor],
            combined_aggregates,
            combined_scores,
            follow_up_notes,
        }
    }

    pub fn group(&self, group: RaterGroup) -> Option<&GroupOutcome> {
        self.groups.iter().find(|entry| entry.group == group)
    }

    /// Clinician-facing summary lines, one perspective after another.
    pub fn narrative_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(format!(
            "Participant: {} | Role: {}",
            self.subject_name.as_deref().unwrap_or("(unnamed)"),
            self.subject_role.as_deref().unwrap_or("N/A"),
        ));
        for entry in &self.groups {
            lines.push(format!("--- {} ---", entry.group.heading()));
            push_score_lines(&mut lines, &entry.scores);
        }
        lines.push("--- Combined / Overall ---".to_string());
        push_score_lines(&mut lines, &self.combined_scores);
        lines
    }

    /// Printable plain-text report, the same layout the exported PDF uses.
    pub fn render_text(&self, timestamp: &str) -> String {
        let mut lines = Vec::new();
        lines.push("Romanishan Reciprocity Assessment Report".to_string());
        lines.push(timestamp.to_string());
        lines.push("-".repeat(40));
        lines.push(format!(
            "Participant: {}",
            self.subject_name.as_deref().unwrap_or("(unnamed)")
        ));
        lines.push(format!(
            "Role: {}",
            self.subject_role.as_deref().unwrap_or("N/A")
        ));
        lines.push(String::new());

        lines.push("Summary".to_string());
        for line in self.narrative_lines() {
            lines.push(format!("- {line}"));
        }

        lines.push(String::new());
        lines.push("Domain Aggregates (0-100)".to_string());
        for entry in &self.groups {
            lines.push(aggregate_line(aggregate_label(entry.group), &entry.aggregates));
        }
        lines.push(aggregate_line("Combined / Overall", &self.combined_aggregates));

        lines.push(String::new());
        lines.push("Follow-up notes".to_string());
        for (prompt, note) in &self.follow_up_notes {
            let text = if note.is_empty() { "(none)" } else { note.as_str() };
            lines.push(format!("{prompt}: {text}"));
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

fn group_entry(
    script: &AssessmentScript,
    responses: &BTreeMap<&'static str, Answer>,
    group: RaterGroup,
) -> GroupOutcome {
    let aggregates = group_aggregate(script, responses, group);
    GroupOutcome {
        group,
        aggregates,
        scores: score(&aggregates),
    }
}

fn push_score_lines(lines: &mut Vec<String>, scores: &ScoreCard) {
    lines.push(format!(
        "Classification: {} (Confidence {}%)",
        scores.classification.label(),
        scores.confidence,
    ));
    lines.push(format!("IOS: {} | EOS: {}", scores.ios, scores.eos));
}

fn aggregate_line(label: &str, scores: &DomainScores) -> String {
    let cells: Vec<String> = Domain::ordered()
        .into_iter()
        .map(|domain| format!("{} {}", domain.code(), scores.get(domain)))
        .collect();
    format!("{label}: {}", cells.join(", "))
}

fn aggregate_label(group: RaterGroup) -> &'static str {
    match group {
        RaterGroup::SelfReport => "Self report",
        RaterGroup::Coworker => "Coworker assessment",
        RaterGroup::Supervisor => "Supervisor assessment",
    }
}

fn text_of(responses: &BTreeMap<&'static str, Answer>, id: &str) -> Option<String> {
    responses
        .get(id)
        .and_then(Answer::as_text)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Persisted snapshot of a finished interview: raw responses and notes plus
/// the derived figures, versioned so later readers can tell shapes apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDossier {
    pub schema_version: u32,
    pub responses: BTreeMap<String, Answer>,
    pub follow_ups: BTreeMap<String, String>,
    pub groups: Vec<GroupOutcome>,
    pub combined_aggregates: DomainScores,
    pub combined_scores: ScoreCard,
}

impl AssessmentDossier {
    /// Dossier for a submission that carries only domain aggregates, with no
    /// per-question record.
    pub fn from_scores(inputs: &DomainScores) -> Self {
        Self {
            schema_version: DOSSIER_SCHEMA_VERSION,
            responses: BTreeMap::new(),
            follow_ups: BTreeMap::new(),
            groups: Vec::new(),
            combined_aggregates: *inputs,
            combined_scores: score(inputs),
        }
    }
}
