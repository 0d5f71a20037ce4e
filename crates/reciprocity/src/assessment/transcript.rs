use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::Answer;
use super::script::QuestionKind;
use super::session::{InterviewSession, SessionError};

#[derive(Debug)]
pub enum TranscriptError {
    Io(std::io::Error),
    Csv(csv::Error),
    Session(SessionError),
    Value { id: String, value: String },
}

impl std::fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptError::Io(err) => write!(f, "failed to read transcript: {}", err),
            TranscriptError::Csv(err) => write!(f, "invalid transcript CSV data: {}", err),
            TranscriptError::Session(err) => write!(f, "could not replay transcript: {}", err),
            TranscriptError::Value { id, value } => write!(
                f,
                "question `{}` expects a numeric value, got `{}`",
                id, value
            ),
        }
    }
}

impl std::error::Error for TranscriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranscriptError::Io(err) => Some(err),
            TranscriptError::Csv(err) => Some(err),
            TranscriptError::Session(err) => Some(err),
            TranscriptError::Value { .. } => None,
        }
    }
}

impl From<std::io::Error> for TranscriptError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TranscriptError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<SessionError> for TranscriptError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

/// Replays a recorded interview from CSV into a session parked at the
/// summary stage.
///
/// Expected columns: `question_id,value,follow_up`. Rows may appear in any
/// order; blank values leave the question unanswered. Follow-up notes whose
/// answer never fired the probe are dropped with a warning, since recorded
/// interviews keep notes even after an answer was revised downward.
pub struct TranscriptImporter;

impl TranscriptImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<InterviewSession, TranscriptError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<InterviewSession, TranscriptError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows: BTreeMap<String, TranscriptRow> = BTreeMap::new();
        for record in csv_reader.deserialize::<TranscriptRow>() {
            let row = record?;
            rows.insert(row.question_id.clone(), row);
        }

        let mut session = InterviewSession::new();
        for id in rows.keys() {
            if session.script().question(id).is_none() {
                return Err(SessionError::UnknownQuestion(id.clone()).into());
            }
        }

        session.begin()?;
        loop {
            let Some(section) = session.current_section() else {
                break;
            };
            let questions: Vec<(&'static str, QuestionKind)> = section
                .questions
                .iter()
                .map(|question| (question.id, question.kind))
                .collect();

            for (id, kind) in questions {
                let Some(row) = rows.get(id) else {
                    continue;
                };
                if let Some(value) = row.value.as_deref() {
                    let answer = match kind {
                        QuestionKind::Scale { .. } => {
                            let parsed =
                                value.parse::<f64>().map_err(|_| TranscriptError::Value {
                                    id: id.to_string(),
                                    value: value.to_string(),
                                })?;
                            Answer::Scale(parsed)
                        }
                        QuestionKind::Text => Answer::Text(value.to_string()),
                    };
                    session.record_answer(id, answer)?;
                }
                if let Some(note) = row.follow_up.clone() {
                    match session.record_follow_up(id, note) {
                        Ok(()) => {}
                        Err(SessionError::NoFollowUp(_)) => {
                            tracing::warn!(
                                question = id,
                                "dropping follow-up note without a fired probe"
                            );
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
            }
            session.next()?;
        }

        Ok(session)
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptRow {
    question_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    value: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    follow_up: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
