use crate::model::answer::AnswerMap;
use crate::model::party::{Party, PartyPositions};
use crate::model::question::Question;
use crate::model::result::{
    AxisContribution, AxisCoverage, Confidence, PartyScore, QuizResult,
};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

pub const SPREAD_THRESHOLD: f64 = 0.1;
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.2;
pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Ranked parties surfaced next to the primary result.
pub const ALTERNATIVE_COUNT: usize = 2;
/// Axis contributions surfaced in the display summary.
pub const TOP_AXIS_COUNT: usize = 3;

/// Score a sparse answer mapping against every party.
///
/// `parties` must arrive pre-sorted by name; the ranking is a stable sort,
/// so tied parties keep that input order and identical inputs always
/// reproduce the identical result. `questions` is the survey's ordered
/// question list and resolves axis, weight and direction per answered id.
pub fn compute_scores(
    answers: &AnswerMap,
    parties: &[Party],
    positions: &PartyPositions,
    questions: &[Question],
) -> QuizResult {
    let axis_weights = answered_axis_weights(answers, questions);

    let mut all_scores: Vec<PartyScore> = parties
        .iter()
        .map(|party| score_party(party, answers, positions, questions, &axis_weights))
        .collect();
    all_scores.sort_by(|a, b| b.alignment_score.total_cmp(&a.alignment_score));

    let primary = all_scores.first().cloned().unwrap_or_default();
    let alternatives: Vec<PartyScore> = all_scores
        .iter()
        .skip(1)
        .take(ALTERNATIVE_COUNT)
        .cloned()
        .collect();

    let answered = questions
        .iter()
        .filter(|question| answers.contains_key(&question.id))
        .count();
    let coverage = if questions.is_empty() {
        0.0
    } else {
        answered as f64 / questions.len() as f64
    };
    let margin = match (all_scores.first(), all_scores.get(1)) {
        (Some(top), Some(second)) => top.alignment_score - second.alignment_score,
        // No runner-up to be confused with: the full score spread.
        (Some(_), None) => 2.0,
        _ => 0.0,
    };

    let top_axes = top_axes(&primary, &axis_weights);
    let answered_axes = answered_axes(answers, questions);

    QuizResult {
        primary,
        alternatives,
        all_scores,
        confidence: classify_confidence(margin, coverage),
        timestamp_ms: now_ms(),
        top_axes,
        answered_axes,
    }
}

/// More answers plus a bigger lead never lower the rating.
pub fn classify_confidence(margin: f64, coverage: f64) -> Confidence {
    if coverage < LOW_CONFIDENCE_THRESHOLD || margin < SPREAD_THRESHOLD {
        Confidence::Low
    } else if coverage >= MEDIUM_CONFIDENCE_THRESHOLD {
        Confidence::High
    } else {
        Confidence::Medium
    }
}

/// Sum of weights of answered questions per axis: the normalization
/// denominator shared by every party.
fn answered_axis_weights<'q>(
    answers: &AnswerMap,
    questions: &'q [Question],
) -> HashMap<&'q str, f64> {
    let mut weights: HashMap<&str, f64> = HashMap::new();
    for question in questions {
        if answers.contains_key(&question.id) {
            *weights.entry(question.axis.as_str()).or_insert(0.0) += question.weight;
        }
    }
    weights
}

fn score_party(
    party: &Party,
    answers: &AnswerMap,
    positions: &PartyPositions,
    questions: &[Question],
    axis_weights: &HashMap<&str, f64>,
) -> PartyScore {
    let mut axis_sums: HashMap<&str, f64> = HashMap::new();
    for question in questions {
        let Some(answer) = answers.get(&question.id) else {
            continue;
        };
        let stance = positions.stance(&party.id, &question.axis).unwrap_or(0.0);
        let contribution =
            answer.value() * question.direction.sign() * stance * question.weight;
        *axis_sums.entry(question.axis.as_str()).or_insert(0.0) += contribution;
    }

    let mut axis_scores = HashMap::new();
    let mut weighted_total = 0.0;
    let mut weight_total = 0.0;
    for (axis, sum) in &axis_sums {
        let Some(denominator) = axis_weights.get(axis).copied().filter(|w| *w > 0.0) else {
            continue;
        };
        let normalized = (sum / denominator).clamp(-1.0, 1.0);
        axis_scores.insert((*axis).to_string(), normalized);
        weighted_total += normalized * denominator;
        weight_total += denominator;
    }

    let alignment_score = if weight_total > 0.0 {
        (weighted_total / weight_total).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    PartyScore {
        party: party.clone(),
        alignment_score,
        axis_scores,
    }
}

fn top_axes(primary: &PartyScore, axis_weights: &HashMap<&str, f64>) -> Vec<AxisContribution> {
    let mut contributions: Vec<AxisContribution> = primary
        .axis_scores
        .iter()
        .map(|(axis_id, score)| AxisContribution {
            axis_id: axis_id.clone(),
            score: *score,
            weight: axis_weights.get(axis_id.as_str()).copied().unwrap_or(0.0),
        })
        .collect();
    contributions.sort_by(|a, b| {
        (b.score.abs() * b.weight).total_cmp(&(a.score.abs() * a.weight))
    });
    contributions.truncate(TOP_AXIS_COUNT);
    contributions
}

/// Per-axis answered/total counts, in first-appearance order of the survey.
fn answered_axes(answers: &AnswerMap, questions: &[Question]) -> Vec<AxisCoverage> {
    let mut coverage: Vec<AxisCoverage> = Vec::new();
    for question in questions {
        let answered = answers.contains_key(&question.id);
        match coverage
            .iter_mut()
            .find(|entry| entry.axis_id == question.axis)
        {
            Some(entry) => {
                entry.total_questions += 1;
                if answered {
                    entry.questions_answered += 1;
                }
            }
            None => coverage.push(AxisCoverage {
                axis_id: question.axis.clone(),
                questions_answered: usize::from(answered),
                total_questions: 1,
            }),
        }
    }
    coverage
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::{Confidence, classify_confidence, compute_scores};
    use crate::model::answer::{AnswerMap, AnswerValue};
    use crate::model::party::{Party, PartyPositions};
    use crate::model::question::{AnswerOption, Direction, Question};
    use std::collections::HashMap;

    fn party(id: &str, name: &str) -> Party {
        Party {
            id: id.to_string(),
            name: name.to_string(),
            short: id.to_uppercase(),
            description_key: format!("parties.{id}.description"),
            ideology_key: format!("parties.{id}.ideology"),
            colour: "#333333".to_string(),
            logo: None,
            website: format!("https://example.org/{id}"),
        }
    }

    fn question(id: &str, axis: &str, weight: f64) -> Question {
        directed_question(id, axis, weight, Direction::Positive)
    }

    fn directed_question(id: &str, axis: &str, weight: f64, direction: Direction) -> Question {
        Question {
            id: id.to_string(),
            text: id.to_string(),
            text_key: format!("questions.{id}"),
            axis: axis.to_string(),
            weight,
            direction,
            options: AnswerOption::standard(),
        }
    }

    fn positions(entries: &[(&str, &[(&str, f64)])]) -> PartyPositions {
        let mut map = HashMap::new();
        for (party_id, stances) in entries {
            map.insert(
                party_id.to_string(),
                stances
                    .iter()
                    .map(|(axis, stance)| (axis.to_string(), *stance))
                    .collect(),
            );
        }
        PartyPositions::new(map)
    }

    fn answers(entries: &[(&str, AnswerValue)]) -> AnswerMap {
        entries
            .iter()
            .map(|(id, value)| (id.to_string(), *value))
            .collect()
    }

    fn two_party_setup() -> (Vec<Party>, PartyPositions, Vec<Question>) {
        let parties = vec![party("left", "Alpha Left"), party("right", "Beta Right")];
        let positions = positions(&[
            ("left", &[("economic", -0.8), ("social", -0.4)]),
            ("right", &[("economic", 0.8), ("social", 0.6)]),
        ]);
        let questions = vec![
            question("q1", "economic", 1.0),
            question("q2", "economic", 1.5),
            question("q3", "social", 1.0),
            question("q4", "social", 0.5),
        ];
        (parties, positions, questions)
    }

    #[test]
    fn zero_answers_scores_every_party_neutral_with_low_confidence() {
        let (parties, positions, questions) = two_party_setup();
        let result = compute_scores(&AnswerMap::new(), &parties, &positions, &questions);

        assert!(
            result
                .all_scores
                .iter()
                .all(|score| score.alignment_score == 0.0)
        );
        assert_eq!(result.confidence, Confidence::Low);
        assert!(result.top_axes.is_empty());
        assert_eq!(result.answered_axes.len(), 2);
        assert_eq!(result.answered_axes[0].questions_answered, 0);
        assert_eq!(result.answered_axes[0].total_questions, 2);
    }

    #[test]
    fn all_agree_saturates_toward_the_aligned_party() {
        let (parties, positions, questions) = two_party_setup();
        let full = answers(&[
            ("q1", AnswerValue::StronglyAgree),
            ("q2", AnswerValue::StronglyAgree),
            ("q3", AnswerValue::StronglyAgree),
            ("q4", AnswerValue::StronglyAgree),
        ]);
        let result = compute_scores(&full, &parties, &positions, &questions);

        assert_eq!(result.primary.party.id, "right");
        for score in &result.all_scores {
            assert!(score.alignment_score >= -1.0 && score.alignment_score <= 1.0);
        }
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn all_disagree_mirrors_the_ranking() {
        let (parties, positions, questions) = two_party_setup();
        let full = answers(&[
            ("q1", AnswerValue::StronglyDisagree),
            ("q2", AnswerValue::StronglyDisagree),
            ("q3", AnswerValue::StronglyDisagree),
            ("q4", AnswerValue::StronglyDisagree),
        ]);
        let result = compute_scores(&full, &parties, &positions, &questions);

        assert_eq!(result.primary.party.id, "left");
        for score in &result.all_scores {
            assert!(score.alignment_score >= -1.0 && score.alignment_score <= 1.0);
        }
    }

    #[test]
    fn scores_are_sorted_descending_and_primary_leads() {
        let (parties, positions, questions) = two_party_setup();
        let mixed = answers(&[
            ("q1", AnswerValue::Agree),
            ("q3", AnswerValue::Disagree),
        ]);
        let result = compute_scores(&mixed, &parties, &positions, &questions);

        assert_eq!(result.primary, result.all_scores[0]);
        for pair in result.all_scores.windows(2) {
            assert!(pair[0].alignment_score >= pair[1].alignment_score);
        }
        assert_eq!(result.alternatives.len(), 1);
        assert_eq!(result.alternatives[0], result.all_scores[1]);
    }

    #[test]
    fn single_answer_yields_a_bounded_score() {
        let (parties, positions, questions) = two_party_setup();
        let single = answers(&[("q2", AnswerValue::StronglyAgree)]);
        let result = compute_scores(&single, &parties, &positions, &questions);

        for score in &result.all_scores {
            assert!(score.alignment_score.abs() <= 1.0);
            assert_eq!(score.axis_scores.len(), 1);
        }
        assert_eq!(result.primary.party.id, "right");
    }

    #[test]
    fn untouched_axes_are_excluded_not_zeroed() {
        let (parties, positions, questions) = two_party_setup();
        // Only economic questions answered; right scores 0.8 there. If the
        // social axis were averaged in as zero, alignment would be diluted.
        let economic_only = answers(&[
            ("q1", AnswerValue::StronglyAgree),
            ("q2", AnswerValue::StronglyAgree),
        ]);
        let result = compute_scores(&economic_only, &parties, &positions, &questions);

        let right = result
            .all_scores
            .iter()
            .find(|score| score.party.id == "right")
            .expect("right party is scored");
        assert!((right.alignment_score - 0.8).abs() < 1e-9);
        assert!(!right.axis_scores.contains_key("social"));
    }

    #[test]
    fn ties_keep_the_by_name_input_order() {
        let parties = vec![party("a", "Aardvark"), party("b", "Bontebok")];
        let positions = positions(&[
            ("a", &[("economic", 0.5)]),
            ("b", &[("economic", 0.5)]),
        ]);
        let questions = vec![question("q1", "economic", 1.0)];
        let tied = answers(&[("q1", AnswerValue::Agree)]);

        let result = compute_scores(&tied, &parties, &positions, &questions);
        assert_eq!(result.all_scores[0].party.id, "a");
        assert_eq!(result.all_scores[1].party.id, "b");
    }

    #[test]
    fn negative_direction_flips_the_contribution() {
        let parties = vec![party("right", "Beta Right")];
        let positions = positions(&[("right", &[("economic", 0.8)])]);
        let questions = vec![directed_question(
            "q1",
            "economic",
            1.0,
            Direction::Negative,
        )];
        let agree = answers(&[("q1", AnswerValue::StronglyAgree)]);

        let result = compute_scores(&agree, &parties, &positions, &questions);
        assert!((result.primary.alignment_score + 0.8).abs() < 1e-9);
    }

    #[test]
    fn missing_stance_counts_as_neutral() {
        let parties = vec![party("novel", "New Party")];
        let positions = positions(&[("novel", &[("economic", 0.4)])]);
        let questions = vec![
            question("q1", "economic", 1.0),
            question("q3", "social", 1.0),
        ];
        let both = answers(&[
            ("q1", AnswerValue::StronglyAgree),
            ("q3", AnswerValue::StronglyAgree),
        ]);

        let result = compute_scores(&both, &parties, &positions, &questions);
        // economic 0.4 and social 0.0 average to 0.2 across equal weights.
        assert!((result.primary.alignment_score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn top_axes_rank_by_contribution_magnitude() {
        let (parties, positions, questions) = two_party_setup();
        let full = answers(&[
            ("q1", AnswerValue::StronglyAgree),
            ("q2", AnswerValue::StronglyAgree),
            ("q3", AnswerValue::Agree),
            ("q4", AnswerValue::Agree),
        ]);
        let result = compute_scores(&full, &parties, &positions, &questions);

        assert!(!result.top_axes.is_empty());
        assert_eq!(result.top_axes[0].axis_id, "economic");
        for pair in result.top_axes.windows(2) {
            assert!(
                pair[0].score.abs() * pair[0].weight
                    >= pair[1].score.abs() * pair[1].weight
            );
        }
    }

    #[test]
    fn confidence_is_monotonic_in_margin_and_coverage() {
        assert_eq!(classify_confidence(0.05, 1.0), Confidence::Low);
        assert_eq!(classify_confidence(0.3, 0.1), Confidence::Low);
        assert_eq!(classify_confidence(0.3, 0.3), Confidence::Medium);
        assert_eq!(classify_confidence(0.3, 0.8), Confidence::High);
        assert_eq!(classify_confidence(0.1, 0.5), Confidence::High);
    }

    #[test]
    fn single_party_confidence_rests_on_coverage_alone() {
        let parties = vec![party("only", "Only Party")];
        let positions = positions(&[("only", &[("economic", 0.5)])]);
        let questions = vec![question("q1", "economic", 1.0)];
        let answered = answers(&[("q1", AnswerValue::Agree)]);

        let result = compute_scores(&answered, &parties, &positions, &questions);
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.alternatives.is_empty());
    }
}
