use std::collections::BTreeMap;
use std::io::Cursor;

use reciprocity::assessment::report::DOSSIER_SCHEMA_VERSION;
use reciprocity::assessment::{
    Answer, Classification, InterviewSession, RaterGroup, Stage, TranscriptImporter,
};

// Answer sheet for one sitting: moderate self-reported strain against a
// calmer picture from the raters. Only stress_level and self_stress_origin
// land above their probe thresholds.
fn scripted_answers() -> Vec<(&'static str, Answer)> {
    let text = |value: &str| Answer::Text(value.to_string());
    vec![
        ("subject_name", text("Imani Weber")),
        ("role", text("Dispatch Coordinator")),
        (
            "context_short",
            text("Team lead asked for a workload review after two escalations."),
        ),
        ("stress_level", Answer::Scale(72.0)),
        ("misunderstood", Answer::Scale(55.0)),
        ("performance_worry", Answer::Scale(64.0)),
        ("q_tp_1", Answer::Scale(60.0)),
        ("q_tp_2", Answer::Scale(45.0)),
        ("q_tp_3", Answer::Scale(58.0)),
        ("q_bi_1", Answer::Scale(70.0)),
        ("q_bi_2", Answer::Scale(35.0)),
        ("q_bi_3", Answer::Scale(10.0)),
        ("q_oe_1", Answer::Scale(20.0)),
        ("q_lc_1", Answer::Scale(65.0)),
        ("q_lc_2", Answer::Scale(80.0)),
        ("q_oe_2", Answer::Scale(5.0)),
        ("q_sc_1", Answer::Scale(40.0)),
        ("q_sc_2", Answer::Scale(75.0)),
        ("q_ps_1", Answer::Scale(66.0)),
        ("q_ps_2", Answer::Scale(48.0)),
        ("self_strength_alignment", Answer::Scale(55.0)),
        ("self_happiness", Answer::Scale(45.0)),
        ("self_stress_origin", Answer::Scale(75.0)),
        ("peer_initiative", Answer::Scale(50.0)),
        ("peer_conflict_subtle", Answer::Scale(30.0)),
        ("peer_hidden_bias", Answer::Scale(20.0)),
        ("peer_alignment", Answer::Scale(58.0)),
        ("leader_motivation", Answer::Scale(60.0)),
        ("leader_hidden_stress", Answer::Scale(52.0)),
        ("leader_role_fit", Answer::Scale(68.0)),
        ("leader_environmental_impact", Answer::Scale(35.0)),
        ("insight_1", Answer::Scale(50.0)),
        (
            "insight_text",
            text("Mostly the rota; the team itself is supportive."),
        ),
    ]
}

fn probe_notes() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "stress_level",
            "Escalation on the night shift went to the director.",
        ),
        (
            "self_stress_origin",
            "Most pressure traces back to the rota changes.",
        ),
    ]
}

fn completed_session() -> InterviewSession {
    let answers: BTreeMap<&str, Answer> = scripted_answers().into_iter().collect();
    let notes: BTreeMap<&str, &str> = probe_notes().into_iter().collect();

    let mut session = InterviewSession::new();
    session.begin().expect("interview begins");
    loop {
        let Some(section) = session.current_section() else {
            break;
        };
        let ids: Vec<&'static str> = section.questions.iter().map(|question| question.id).collect();
        for id in ids {
            let answer = answers
                .get(id)
                .expect("every question has a scripted answer")
                .clone();
            let fired = session.record_answer(id, answer).expect("answer records");
            if fired.is_some() {
                let note = notes.get(id).expect("fired probe has a scripted note");
                session.record_follow_up(id, *note).expect("note records");
            }
        }
        session.next().expect("section advances");
    }
    session
}

#[test]
fn guided_walk_lands_on_the_hand_scored_profile() {
    let session = completed_session();
    assert_eq!(session.stage(), Stage::Summary);
    assert_eq!(session.subject_name(), Some("Imani Weber"));
    assert_eq!(session.subject_role(), Some("Dispatch Coordinator"));
    assert_eq!(session.follow_ups().len(), 2);
    assert!(session.pending_follow_ups().is_empty());

    let outcome = session.outcome();

    let self_report = outcome.group(RaterGroup::SelfReport).expect("self group");
    assert_eq!(self_report.aggregates.tp, 75.0);
    assert_eq!(self_report.aggregates.bi, 55.0);
    assert_eq!(self_report.aggregates.ps, 45.0);
    assert_eq!(self_report.scores.ios, 52.8);

    let coworker = outcome.group(RaterGroup::Coworker).expect("coworker group");
    assert_eq!(coworker.aggregates.lc, 54.0);
    assert_eq!(coworker.aggregates.sc, 25.0);

    // Reverse-keyed supervisor items flip before pooling: raw 60 reads as 40
    // for BI and raw 68 as 32 for TP.
    let supervisor = outcome
        .group(RaterGroup::Supervisor)
        .expect("supervisor group");
    assert_eq!(supervisor.aggregates.tp, 32.0);
    assert_eq!(supervisor.aggregates.bi, 40.0);
    assert_eq!(supervisor.aggregates.oe, 35.0);
    assert_eq!(supervisor.aggregates.ps, 52.0);

    assert_eq!(outcome.combined_aggregates.tp, 36.0);
    assert_eq!(outcome.combined_aggregates.bi, 32.0);
    assert_eq!(outcome.combined_aggregates.oe, 12.0);
    assert_eq!(outcome.combined_aggregates.lc, 18.0);
    assert_eq!(outcome.combined_aggregates.sc, 8.0);
    assert_eq!(outcome.combined_aggregates.ps, 32.0);

    assert_eq!(outcome.combined_scores.ios, 30.0);
    assert_eq!(outcome.combined_scores.eos, 15.0);
    assert_eq!(outcome.combined_scores.diff, 15.0);
    assert_eq!(outcome.combined_scores.confidence, 85.0);
    assert_eq!(
        outcome.combined_scores.classification,
        Classification::NeedsDeeperAssessment
    );
}

#[test]
fn rendered_report_reflects_the_walk() {
    let session = completed_session();
    let text = session.outcome().render_text("2025-03-11 14:05");

    assert!(text.starts_with("Romanishan Reciprocity Assessment Report\n2025-03-11 14:05\n"));
    assert!(text.contains("Participant: Imani Weber"));
    assert!(text.contains("Role: Dispatch Coordinator"));
    assert!(text.contains("Combined / Overall: TP 36, BI 32, OE 12, LC 18, SC 8, PS 32"));
    assert!(text.contains(
        "Can you describe a specific incident that caused this stress?: \
         Escalation on the night shift went to the director."
    ));
    assert!(text.contains("Most pressure traces back to the rota changes."));
}

#[test]
fn transcript_replay_matches_the_live_walk() {
    let notes: BTreeMap<&str, &str> = probe_notes().into_iter().collect();
    let mut csv = String::from("question_id,value,follow_up\n");
    for (id, answer) in scripted_answers() {
        let value = match &answer {
            Answer::Scale(value) => value.to_string(),
            Answer::Text(text) => text.clone(),
        };
        let note = notes.get(id).copied().unwrap_or("");
        csv.push_str(&format!("{id},{value},{note}\n"));
    }

    let replayed = TranscriptImporter::from_reader(Cursor::new(csv)).expect("transcript replays");
    assert_eq!(replayed.stage(), Stage::Summary);

    let live = completed_session();
    assert_eq!(replayed.responses(), live.responses());
    assert_eq!(replayed.follow_ups(), live.follow_ups());
    assert_eq!(replayed.outcome(), live.outcome());
}

#[test]
fn dossier_snapshot_keeps_raw_answers_and_derived_scores() {
    let session = completed_session();
    let dossier = session.dossier();
    assert_eq!(dossier.schema_version, DOSSIER_SCHEMA_VERSION);
    assert_eq!(dossier.responses.len(), scripted_answers().len());
    assert_eq!(dossier.follow_ups.len(), 2);
    assert_eq!(dossier.combined_scores, session.outcome().combined_scores);

    let json = serde_json::to_value(&dossier).expect("dossier serializes");
    assert_eq!(json["responses"]["subject_name"], "Imani Weber");
    assert_eq!(json["responses"]["stress_level"], 72.0);
    assert_eq!(
        json["follow_ups"]["stress_level"],
        "Escalation on the night shift went to the director."
    );
    assert_eq!(json["groups"][0]["group"], "self");
    assert_eq!(json["combined_scores"]["IOS"], 30.0);
    assert_eq!(json["combined_scores"]["DIFF"], 15.0);
    assert_eq!(
        json["combined_scores"]["CLASSIFICATION"],
        "Mixed / Needs deeper assessment"
    );
}
