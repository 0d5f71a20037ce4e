use std::collections::BTreeMap;

use super::domain::Answer;
use super::report::{AssessmentDossier, AssessmentOutcome, DOSSIER_SCHEMA_VERSION};
use super::script::{AssessmentScript, QuestionKind, QuestionTemplate, SectionTemplate};

/// Where the interview currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Intro,
    Login,
    Section(usize),
    Summary,
    Done,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unknown question `{0}`")]
    UnknownQuestion(String),
    #[error("question `{0}` belongs to another section")]
    OutOfSection(String),
    #[error("question `{id}` expects a {expected} answer")]
    WrongKind { id: String, expected: &'static str },
    #[error("value {value} for `{id}` is outside {min}..={max}")]
    OutOfRange {
        id: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("question `{0}` has no pending follow-up")]
    NoFollowUp(String),
    #[error("cannot {action} from {stage:?}")]
    InvalidTransition { stage: Stage, action: &'static str },
}

/// One guided walk through the interview script.
///
/// The session advances section by section; only questions in the current
/// section accept answers. Answers survive Back and Edit so a participant can
/// revise earlier sections, and follow-up notes stay recorded even when a
/// revised answer no longer triggers the probe.
#[derive(Debug)]
pub struct InterviewSession {
    script: AssessmentScript,
    stage: Stage,
    section_index: usize,
    responses: BTreeMap<&'static str, Answer>,
    follow_ups: BTreeMap<&'static str, String>,
}

impl InterviewSession {
    /// Fresh session over the standard instrument.
    pub fn new() -> Self {
        Self::with_script(AssessmentScript::standard())
    }

    pub fn with_script(script: AssessmentScript) -> Self {
        Self {
            script,
            stage: Stage::Intro,
            section_index: 0,
            responses: BTreeMap::new(),
            follow_ups: BTreeMap::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn script(&self) -> &AssessmentScript {
        &self.script
    }

    pub fn current_section(&self) -> Option<&SectionTemplate> {
        match self.stage {
            Stage::Section(index) => self.script.section(index),
            _ => None,
        }
    }

    pub fn responses(&self) -> &BTreeMap<&'static str, Answer> {
        &self.responses
    }

    pub fn follow_ups(&self) -> &BTreeMap<&'static str, String> {
        &self.follow_ups
    }

    /// Start the interview at the first section.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        match self.stage {
            Stage::Intro => {
                self.section_index = 0;
                self.stage = Stage::Section(0);
                Ok(())
            }
            stage => Err(SessionError::InvalidTransition {
                stage,
                action: "begin",
            }),
        }
    }

    /// Step aside to authenticate. Reachable from the intro screen and from
    /// the summary, where a rejected submission prompts a sign-in.
    pub fn open_login(&mut self) -> Result<(), SessionError> {
        match self.stage {
            Stage::Intro | Stage::Summary => {
                self.stage = Stage::Login;
                Ok(())
            }
            stage => Err(SessionError::InvalidTransition {
                stage,
                action: "open login",
            }),
        }
    }

    /// Return from the login screen to wherever the interview stood.
    pub fn finish_login(&mut self) -> Result<(), SessionError> {
        match self.stage {
            Stage::Login => {
                self.stage = Stage::Section(self.section_index);
                Ok(())
            }
            stage => Err(SessionError::InvalidTransition {
                stage,
                action: "finish login",
            }),
        }
    }

    /// Advance to the next section, or to the summary after the last one.
    pub fn next(&mut self) -> Result<(), SessionError> {
        match self.stage {
            Stage::Section(index) if index + 1 < self.script.section_count() => {
                self.section_index = index + 1;
                self.stage = Stage::Section(self.section_index);
                Ok(())
            }
            Stage::Section(_) => {
                self.stage = Stage::Summary;
                Ok(())
            }
            stage => Err(SessionError::InvalidTransition {
                stage,
                action: "advance",
            }),
        }
    }

    /// Step back one section; a no-op on the first.
    pub fn back(&mut self) -> Result<(), SessionError> {
        match self.stage {
            Stage::Section(index) => {
                if index > 0 {
                    self.section_index = index - 1;
                    self.stage = Stage::Section(self.section_index);
                }
                Ok(())
            }
            stage => Err(SessionError::InvalidTransition {
                stage,
                action: "go back",
            }),
        }
    }

    /// Reopen the interview from the summary, starting over at section one
    /// with all answers retained.
    pub fn edit(&mut self) -> Result<(), SessionError> {
        match self.stage {
            Stage::Summary => {
                self.section_index = 0;
                self.stage = Stage::Section(0);
                Ok(())
            }
            stage => Err(SessionError::InvalidTransition {
                stage,
                action: "edit",
            }),
        }
    }

    /// Close the session once the summary has been persisted.
    pub fn complete(&mut self) -> Result<(), SessionError> {
        match self.stage {
            Stage::Summary => {
                self.stage = Stage::Done;
                Ok(())
            }
            stage => Err(SessionError::InvalidTransition {
                stage,
                action: "complete",
            }),
        }
    }

    /// Record an answer for a question in the current section, validating
    /// kind and range. Returns the follow-up prompt when the answer lands
    /// strictly above the question's threshold.
    pub fn record_answer(
        &mut self,
        id: &str,
        answer: Answer,
    ) -> Result<Option<&'static str>, SessionError> {
        let question = self.current_question(id, "answer")?;
        match (question.kind, &answer) {
            (QuestionKind::Scale { min, max }, Answer::Scale(value)) => {
                if !(min..=max).contains(value) {
                    return Err(SessionError::OutOfRange {
                        id: id.to_string(),
                        value: *value,
                        min,
                        max,
                    });
                }
            }
            (QuestionKind::Text, Answer::Text(_)) => {}
            (QuestionKind::Scale { .. }, Answer::Text(_)) => {
                return Err(SessionError::WrongKind {
                    id: id.to_string(),
                    expected: "scale",
                });
            }
            (QuestionKind::Text, Answer::Scale(_)) => {
                return Err(SessionError::WrongKind {
                    id: id.to_string(),
                    expected: "text",
                });
            }
        }

        let prompt = match &answer {
            Answer::Scale(value) => question.follow_up_for(*value),
            Answer::Text(_) => None,
        };
        let key = question.id;
        self.responses.insert(key, answer);
        Ok(prompt)
    }

    /// Attach free-text to a fired follow-up probe in the current section.
    pub fn record_follow_up(
        &mut self,
        id: &str,
        note: impl Into<String>,
    ) -> Result<(), SessionError> {
        let question = self.current_question(id, "annotate")?;
        let fired = self
            .responses
            .get(question.id)
            .and_then(Answer::as_scale)
            .and_then(|value| question.follow_up_for(value))
            .is_some();
        if !fired {
            return Err(SessionError::NoFollowUp(id.to_string()));
        }
        let key = question.id;
        self.follow_ups.insert(key, note.into());
        Ok(())
    }

    /// Probes that have fired without a note yet, as `(question id, prompt)`.
    pub fn pending_follow_ups(&self) -> Vec<(&'static str, &'static str)> {
        let mut pending = Vec::new();
        for section in self.script.sections() {
            for question in &section.questions {
                if self.follow_ups.contains_key(question.id) {
                    continue;
                }
                let fired = self
                    .responses
                    .get(question.id)
                    .and_then(Answer::as_scale)
                    .and_then(|value| question.follow_up_for(value));
                if let Some(prompt) = fired {
                    pending.push((question.id, prompt));
                }
            }
        }
        pending
    }

    pub fn subject_name(&self) -> Option<&str> {
        self.text_response("subject_name")
    }

    pub fn subject_role(&self) -> Option<&str> {
        self.text_response("role")
    }

    /// Scores and aggregates over everything recorded so far.
    pub fn outcome(&self) -> AssessmentOutcome {
        AssessmentOutcome::compute(&self.script, &self.responses, &self.follow_ups)
    }

    /// Serializable snapshot of the session for persistence.
    pub fn dossier(&self) -> AssessmentDossier {
        let outcome = self.outcome();
        AssessmentDossier {
            schema_version: DOSSIER_SCHEMA_VERSION,
            responses: self
                .responses
                .iter()
                .map(|(id, answer)| (id.to_string(), answer.clone()))
                .collect(),
            follow_ups: self
                .follow_ups
                .iter()
                .map(|(id, note)| (id.to_string(), note.clone()))
                .collect(),
            groups: outcome.groups,
            combined_aggregates: outcome.combined_aggregates,
            combined_scores: outcome.combined_scores,
        }
    }

    fn text_response(&self, id: &str) -> Option<&str> {
        self.responses
            .get(id)
            .and_then(Answer::as_text)
            .filter(|text| !text.is_empty())
    }

    fn current_question(
        &self,
        id: &str,
        action: &'static str,
    ) -> Result<&QuestionTemplate, SessionError> {
        let Stage::Section(index) = self.stage else {
            return Err(SessionError::InvalidTransition {
                stage: self.stage,
                action,
            });
        };
        if self.script.question(id).is_none() {
            return Err(SessionError::UnknownQuestion(id.to_string()));
        }
        self.script
            .section(index)
            .and_then(|section| section.questions.iter().find(|question| question.id == id))
            .ok_or_else(|| SessionError::OutOfSection(id.to_string()))
    }
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_at_section(target: &str) -> InterviewSession {
        let mut session = InterviewSession::new();
        session.begin().unwrap();
        while session
            .current_section()
            .map(|section| section.id != target)
            .unwrap_or(false)
        {
            session.next().unwrap();
        }
        session
    }

    #[test]
    fn full_walk_reaches_done() {
        let mut session = InterviewSession::new();
        assert_eq!(session.stage(), Stage::Intro);
        session.begin().unwrap();

        let total = session.script().section_count();
        for index in 0..total {
            assert_eq!(session.stage(), Stage::Section(index));
            let questions: Vec<(&'static str, QuestionKind)> = session
                .current_section()
                .unwrap()
                .questions
                .iter()
                .map(|question| (question.id, question.kind))
                .collect();
            for (id, kind) in questions {
                let answer = match kind {
                    QuestionKind::Scale { .. } => Answer::Scale(50.0),
                    QuestionKind::Text => Answer::Text("noted".to_string()),
                };
                session.record_answer(id, answer).unwrap();
            }
            session.next().unwrap();
        }

        assert_eq!(session.stage(), Stage::Summary);
        session.complete().unwrap();
        assert_eq!(session.stage(), Stage::Done);
    }

    #[test]
    fn back_is_a_no_op_on_the_first_section() {
        let mut session = InterviewSession::new();
        session.begin().unwrap();
        session.back().unwrap();
        assert_eq!(session.stage(), Stage::Section(0));
        session.next().unwrap();
        session.back().unwrap();
        assert_eq!(session.stage(), Stage::Section(0));
    }

    #[test]
    fn edit_reopens_at_the_first_section_with_answers_kept() {
        let mut session = InterviewSession::new();
        session.begin().unwrap();
        session
            .record_answer("subject_name", Answer::Text("Avery Cole".to_string()))
            .unwrap();
        for _ in 0..session.script().section_count() {
            session.next().unwrap();
        }
        assert_eq!(session.stage(), Stage::Summary);
        session.edit().unwrap();
        assert_eq!(session.stage(), Stage::Section(0));
        assert_eq!(session.subject_name(), Some("Avery Cole"));
    }

    #[test]
    fn login_detour_returns_to_where_the_interview_stood() {
        let mut session = InterviewSession::new();
        session.open_login().unwrap();
        assert_eq!(session.stage(), Stage::Login);
        session.finish_login().unwrap();
        assert_eq!(session.stage(), Stage::Section(0));

        for _ in 0..session.script().section_count() {
            session.next().unwrap();
        }
        assert_eq!(session.stage(), Stage::Summary);
        let last = session.script().section_count() - 1;
        session.open_login().unwrap();
        session.finish_login().unwrap();
        assert_eq!(session.stage(), Stage::Section(last));
    }

    #[test]
    fn answers_validate_kind_and_range() {
        let mut session = InterviewSession::new();
        session.begin().unwrap();
        session.next().unwrap(); // baseline

        let err = session
            .record_answer("stress_level", Answer::Scale(120.0))
            .unwrap_err();
        assert!(matches!(err, SessionError::OutOfRange { .. }));

        let err = session
            .record_answer("stress_level", Answer::Text("high".to_string()))
            .unwrap_err();
        assert!(matches!(err, SessionError::WrongKind { expected: "scale", .. }));

        let err = session
            .record_answer("no_such_question", Answer::Scale(10.0))
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownQuestion(_)));

        // q_tp_1 lives two sections ahead.
        let err = session
            .record_answer("q_tp_1", Answer::Scale(10.0))
            .unwrap_err();
        assert!(matches!(err, SessionError::OutOfSection(_)));
    }

    #[test]
    fn follow_up_fires_and_collects_a_note() {
        let mut session = session_at_section("baseline");
        let prompt = session
            .record_answer("stress_level", Answer::Scale(80.0))
            .unwrap();
        assert_eq!(
            prompt,
            Some("Can you describe a specific incident that caused this stress?")
        );
        assert_eq!(session.pending_follow_ups().len(), 1);

        session
            .record_follow_up("stress_level", "Deadline moved up twice")
            .unwrap();
        assert!(session.pending_follow_ups().is_empty());
    }

    #[test]
    fn withdrawn_trigger_blocks_new_notes_but_keeps_old_ones() {
        let mut session = session_at_section("baseline");
        session
            .record_answer("stress_level", Answer::Scale(80.0))
            .unwrap();
        session
            .record_follow_up("stress_level", "Deadline moved up twice")
            .unwrap();

        let prompt = session
            .record_answer("stress_level", Answer::Scale(40.0))
            .unwrap();
        assert_eq!(prompt, None);
        let err = session
            .record_follow_up("stress_level", "later note")
            .unwrap_err();
        assert!(matches!(err, SessionError::NoFollowUp(_)));
        assert_eq!(
            session.follow_ups().get("stress_level").map(String::as_str),
            Some("Deadline moved up twice")
        );
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut session = session_at_section("baseline");
        let prompt = session
            .record_answer("stress_level", Answer::Scale(70.0))
            .unwrap();
        assert_eq!(prompt, None);
    }

    #[test]
    fn no_answers_outside_a_section_stage() {
        let mut session = InterviewSession::new();
        let err = session
            .record_answer("subject_name", Answer::Text("x".to_string()))
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
    }

    #[test]
    fn complete_requires_the_summary_stage() {
        let mut session = InterviewSession::new();
        session.begin().unwrap();
        let err = session.complete().unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                stage: Stage::Section(0),
                ..
            }
        ));
    }
}
