use std::collections::BTreeMap;

use super::domain::{Answer, Domain, DomainScores, RaterGroup};
use super::script::AssessmentScript;

/// Per-domain mean of displayed values for one rater group, rounded to whole
/// points. Only the sections keyed to the group contribute; unanswered
/// questions are skipped and a domain with no scored answer aggregates to
/// zero, so every report carries the full six-domain profile.
pub fn group_aggregate(
    script: &AssessmentScript,
    responses: &BTreeMap<&'static str, Answer>,
    group: RaterGroup,
) -> DomainScores {
    let mut sums = DomainScores::default();
    let mut counts = DomainScores::default();

    for section in script.sections_for_group(group) {
        for question in &section.questions {
            let Some(domain) = question.domain else {
                continue;
            };
            let Some(value) = responses.get(question.id).and_then(Answer::as_scale) else {
                continue;
            };
            sums.set(domain, sums.get(domain) + question.displayed_value(value));
            counts.set(domain, counts.get(domain) + 1.0);
        }
    }

    let mut aggregate = DomainScores::default();
    for domain in Domain::ordered() {
        let count = counts.get(domain);
        if count > 0.0 {
            aggregate.set(domain, (sums.get(domain) / count).round());
        }
    }
    aggregate
}

/// Combined profile across the three perspectives: the whole-point mean of
/// the already-rounded group aggregates, domain by domain.
pub fn combined_aggregate(
    self_report: &DomainScores,
    coworker: &DomainScores,
    supervisor: &DomainScores,
) -> DomainScores {
    let mut combined = DomainScores::default();
    for domain in Domain::ordered() {
        let sum = self_report.get(domain) + coworker.get(domain) + supervisor.get(domain);
        combined.set(domain, (sum / 3.0).round());
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responses(pairs: &[(&'static str, f64)]) -> BTreeMap<&'static str, Answer> {
        pairs
            .iter()
            .map(|(id, value)| (*id, Answer::Scale(*value)))
            .collect()
    }

    #[test]
    fn supervisor_aggregate_flips_reverse_keyed_items() {
        let script = AssessmentScript::standard();
        let answers = responses(&[
            ("leader_motivation", 30.0),
            ("leader_hidden_stress", 40.0),
            ("leader_role_fit", 90.0),
            ("leader_environmental_impact", 55.0),
        ]);
        let agg = group_aggregate(&script, &answers, RaterGroup::Supervisor);
        assert_eq!(agg.bi, 70.0);
        assert_eq!(agg.ps, 40.0);
        assert_eq!(agg.tp, 10.0);
        assert_eq!(agg.oe, 55.0);
        assert_eq!(agg.lc, 0.0);
        assert_eq!(agg.sc, 0.0);
    }

    #[test]
    fn means_round_to_whole_points() {
        let script = AssessmentScript::standard();
        let answers = responses(&[
            ("peer_conflict_subtle", 70.0),
            ("peer_hidden_bias", 65.0),
            ("peer_initiative", 80.0),
            ("peer_alignment", 50.0),
        ]);
        let agg = group_aggregate(&script, &answers, RaterGroup::Coworker);
        // (70 + 65) / 2 = 67.5 rounds up.
        assert_eq!(agg.sc, 68.0);
        assert_eq!(agg.lc, 65.0);
    }

    #[test]
    fn self_aggregate_reads_only_the_role_alignment_section() {
        let script = AssessmentScript::standard();
        let answers = responses(&[("stress_level", 90.0), ("self_happiness", 40.0)]);
        let agg = group_aggregate(&script, &answers, RaterGroup::SelfReport);
        // The baseline PS answer does not pool into the self perspective.
        assert_eq!(agg.ps, 40.0);
    }

    #[test]
    fn unanswered_questions_do_not_drag_the_mean() {
        let script = AssessmentScript::standard();
        let answers = responses(&[("peer_initiative", 80.0)]);
        let agg = group_aggregate(&script, &answers, RaterGroup::Coworker);
        assert_eq!(agg.lc, 80.0);
    }

    #[test]
    fn empty_responses_aggregate_to_zero() {
        let script = AssessmentScript::standard();
        let agg = group_aggregate(&script, &BTreeMap::new(), RaterGroup::SelfReport);
        assert_eq!(agg, DomainScores::default());
    }

    #[test]
    fn combined_is_the_rounded_mean_of_group_values() {
        let mut a = DomainScores::default();
        let mut b = DomainScores::default();
        let mut c = DomainScores::default();
        a.tp = 10.0;
        b.tp = 20.0;
        c.tp = 31.0;
        a.oe = 10.0;
        b.oe = 20.0;
        c.oe = 32.0;
        let combined = combined_aggregate(&a, &b, &c);
        assert_eq!(combined.tp, 20.0);
        assert_eq!(combined.oe, 21.0);
        assert_eq!(combined.bi, 0.0);
    }
}
