use crate::infra::{SqliteAssessmentRepository, SqliteDatabase};
use chrono::Local;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input};
use reciprocity::assessment::quotient;
use reciprocity::assessment::{
    score, Answer, DomainScores, InterviewSession, QuestionKind, TranscriptImporter,
};
use reciprocity::config::AppConfig;
use reciprocity::error::AppError;
use reciprocity::records::{AssessmentRepository, DEFAULT_LIST_LIMIT};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct InterviewArgs {
    /// Replay a recorded transcript CSV (question_id,value,follow_up) instead of prompting
    #[arg(long)]
    pub(crate) transcript: Option<PathBuf>,
    /// Write the rendered report to a file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Threat Perception aggregate (0-100)
    #[arg(long, default_value_t = 0.0)]
    pub(crate) tp: f64,
    /// Behavioral Indicators aggregate (0-100)
    #[arg(long, default_value_t = 0.0)]
    pub(crate) bi: f64,
    /// Objective Exposure aggregate (0-100)
    #[arg(long, default_value_t = 0.0)]
    pub(crate) oe: f64,
    /// Leadership Clarity aggregate (0-100)
    #[arg(long, default_value_t = 0.0)]
    pub(crate) lc: f64,
    /// Social Climate aggregate (0-100)
    #[arg(long, default_value_t = 0.0)]
    pub(crate) sc: f64,
    /// Physiological Stress aggregate (0-100)
    #[arg(long, default_value_t = 0.0)]
    pub(crate) ps: f64,
    /// Print the full score card as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct QuotientArgs {
    /// Perceived input (1-5)
    #[arg(long, default_value_t = 3)]
    pub(crate) perceived_input: u8,
    /// Perceived return (1-5)
    #[arg(long, default_value_t = 3)]
    pub(crate) perceived_return: u8,
    /// Systemic trust (1-5)
    #[arg(long, default_value_t = 3)]
    pub(crate) systemic_trust: u8,
    /// Self-regulation (1-5)
    #[arg(long, default_value_t = 3)]
    pub(crate) self_regulation: u8,
}

#[derive(Args, Debug)]
pub(crate) struct RecentArgs {
    /// Maximum number of rows to list
    #[arg(long, default_value_t = 20)]
    pub(crate) limit: usize,
}

/// Walk the guided interview (or replay a transcript) and print the report.
pub(crate) fn run_interview(args: InterviewArgs) -> Result<(), AppError> {
    let InterviewArgs { transcript, output } = args;

    let session = match transcript {
        Some(path) => TranscriptImporter::from_path(path)?,
        None => interactive_session()?,
    };

    let outcome = session.outcome();
    let timestamp = Local::now().format("%Y-%m-%d %H:%M").to_string();
    let report = outcome.render_text(&timestamp);

    match output {
        Some(path) => {
            std::fs::write(&path, &report)?;
            println!("Report written to {}", path.display());
        }
        None => println!("{report}"),
    }
    Ok(())
}

fn interactive_session() -> Result<InterviewSession, AppError> {
    let mut session = InterviewSession::new();

    println!("Romanishan Reciprocity guided interview");
    println!("Scale questions take 0-100; leave a text answer empty to skip it.");
    session.begin()?;

    loop {
        let Some(section) = session.current_section() else {
            break;
        };
        let title = section.title;
        let description = section.description;
        let questions: Vec<(&'static str, &'static str, Option<&'static str>, QuestionKind)> =
            section
                .questions
                .iter()
                .map(|question| (question.id, question.prompt, question.help, question.kind))
                .collect();

        println!("\n== {title} ==");
        if !description.is_empty() {
            println!("{description}");
        }

        for (id, prompt, help, kind) in questions {
            if let Some(help) = help {
                println!("  ({help})");
            }
            let probe = match kind {
                QuestionKind::Scale { min, max } => {
                    let value: f64 = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(format!("{prompt} [{min:.0}-{max:.0}]"))
                        .validate_with(|value: &f64| {
                            if (min..=max).contains(value) {
                                Ok(())
                            } else {
                                Err(format!("enter a value between {min:.0} and {max:.0}"))
                            }
                        })
                        .interact_text()
                        .map_err(prompt_error)?;
                    session.record_answer(id, Answer::Scale(value))?
                }
                QuestionKind::Text => {
                    let value: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(prompt)
                        .allow_empty(true)
                        .interact_text()
                        .map_err(prompt_error)?;
                    if value.trim().is_empty() {
                        continue;
                    }
                    session.record_answer(id, Answer::Text(value))?
                }
            };

            if let Some(probe) = probe {
                let note: String = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt(probe)
                    .allow_empty(true)
                    .interact_text()
                    .map_err(prompt_error)?;
                if !note.trim().is_empty() {
                    session.record_follow_up(id, note)?;
                }
            }
        }
        session.next()?;
    }

    Ok(session)
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        tp,
        bi,
        oe,
        lc,
        sc,
        ps,
        json,
    } = args;
    let inputs = DomainScores {
        tp,
        bi,
        oe,
        lc,
        sc,
        ps,
    };
    let card = score(&inputs);

    if json {
        match serde_json::to_string_pretty(&card) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("score payload unavailable: {err}"),
        }
        return Ok(());
    }

    println!("IOS {} | EOS {} | DIFF {}", card.ios, card.eos, card.diff);
    println!("Confidence: {}%", card.confidence);
    println!("Classification: {}", card.classification.label());
    Ok(())
}

pub(crate) fn run_quotient(args: QuotientArgs) -> Result<(), AppError> {
    let QuotientArgs {
        perceived_input,
        perceived_return,
        systemic_trust,
        self_regulation,
    } = args;
    let inputs = quotient::QuotientInputs::new(
        perceived_input,
        perceived_return,
        systemic_trust,
        self_regulation,
    );
    println!("{}", quotient::compute(inputs).render_text());
    Ok(())
}

/// Render the most recent submissions from the configured database, one
/// summary line per row.
pub(crate) fn run_recent(args: RecentArgs) -> Result<(), AppError> {
    let RecentArgs { limit } = args;
    let config = AppConfig::load()?;
    let database = Arc::new(SqliteDatabase::open(&config.database.path)?);
    let repository = SqliteAssessmentRepository::new(database);

    let rows = repository
        .recent(limit.clamp(1, DEFAULT_LIST_LIMIT))
        .map_err(|err| AppError::Storage(err.to_string()))?;

    if rows.is_empty() {
        println!("No submissions recorded.");
        return Ok(());
    }
    for row in rows {
        println!("{}", row.summary_line());
    }
    Ok(())
}

fn prompt_error(err: dialoguer::Error) -> AppError {
    AppError::Io(std::io::Error::other(err))
}
