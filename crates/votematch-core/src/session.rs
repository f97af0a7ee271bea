use crate::codec::{self, AnswerDecodeError};
use crate::model::answer::{AnswerMap, AnswerValue};
use crate::model::party::{Party, PartyPositions};
use crate::model::question::Question;
use crate::model::result::QuizResult;
use crate::scoring;
use crate::survey::SurveyMode;

/// Orchestrates one pass through a survey: the question pointer, the sparse
/// answer mapping and the completion flag. All the interesting work happens
/// in the codec, scoring and survey modules; this type only sequences them.
#[derive(Debug, Clone)]
pub struct QuizSession {
    mode: SurveyMode,
    questions: Vec<Question>,
    answers: AnswerMap,
    current_index: usize,
    completed: bool,
}

impl QuizSession {
    pub fn new(mode: SurveyMode, questions: Vec<Question>) -> Self {
        Self {
            mode,
            questions,
            answers: AnswerMap::new(),
            current_index: 0,
            completed: false,
        }
    }

    pub fn mode(&self) -> SurveyMode {
        self.mode
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_ids(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.id.clone()).collect()
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Percentage of the survey already passed, for progress display.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.current_index as f64 / self.questions.len() as f64 * 100.0
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn can_proceed(&self) -> bool {
        self.current_question()
            .map(|question| self.answers.contains_key(&question.id))
            .unwrap_or(false)
    }

    /// Record an answer. Ids outside the survey are refused so stray input
    /// cannot distort coverage.
    pub fn answer(&mut self, question_id: &str, value: AnswerValue) -> bool {
        if !self.questions.iter().any(|q| q.id == question_id) {
            return false;
        }
        self.answers.insert(question_id.to_string(), value);
        true
    }

    pub fn next_question(&mut self) {
        if self.current_index < self.questions.len().saturating_sub(1) {
            self.current_index += 1;
        } else {
            self.completed = true;
        }
    }

    pub fn previous_question(&mut self) {
        if self.current_index > 0 {
            self.current_index -= 1;
        }
    }

    pub fn skip_question(&mut self) {
        self.next_question();
    }

    pub fn reset(&mut self) {
        self.answers.clear();
        self.current_index = 0;
        self.completed = false;
    }

    pub fn compute_scores(&self, parties: &[Party], positions: &PartyPositions) -> QuizResult {
        scoring::compute_scores(&self.answers, parties, positions, &self.questions)
    }

    /// Share token over the session's question order.
    pub fn encode_answers(&self) -> String {
        let values: Vec<Option<AnswerValue>> = self
            .questions
            .iter()
            .map(|question| self.answers.get(&question.id).copied())
            .collect();
        codec::encode_answers(&values)
    }

    /// Apply a share token produced for this question order. On failure the
    /// session keeps its current answers untouched.
    pub fn load_encoded_answers(&mut self, token: &str) -> Result<(), AnswerDecodeError> {
        let ids = self.question_ids();
        let decoded = codec::decode_answers(token, &ids)?;
        self.completed = decoded.len() == self.questions.len() && !self.questions.is_empty();
        self.answers = decoded;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::QuizSession;
    use crate::model::answer::AnswerValue;
    use crate::model::question::{AnswerOption, Direction, Question};
    use crate::survey::SurveyMode;

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            text: id.to_string(),
            text_key: format!("questions.{id}"),
            axis: "economic".to_string(),
            weight: 1.0,
            direction: Direction::Positive,
            options: AnswerOption::standard(),
        }
    }

    fn session(count: usize) -> QuizSession {
        let questions = (1..=count).map(|n| question(&format!("q{n}"))).collect();
        QuizSession::new(SurveyMode::Full, questions)
    }

    #[test]
    fn walks_questions_and_completes_at_the_end() {
        let mut session = session(3);
        assert_eq!(session.current_question().map(|q| q.id.as_str()), Some("q1"));
        assert!(!session.can_proceed());

        assert!(session.answer("q1", AnswerValue::Agree));
        assert!(session.can_proceed());
        session.next_question();
        session.skip_question();
        assert!(!session.is_completed());
        session.next_question();
        assert!(session.is_completed());
    }

    #[test]
    fn previous_stops_at_the_first_question() {
        let mut session = session(2);
        session.previous_question();
        assert_eq!(session.current_index(), 0);
        session.next_question();
        session.previous_question();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn refuses_answers_for_unknown_questions() {
        let mut session = session(2);
        assert!(!session.answer("q99", AnswerValue::Neutral));
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn progress_is_a_percentage_of_questions_passed() {
        let mut session = session(4);
        assert_eq!(session.progress(), 0.0);
        session.next_question();
        assert_eq!(session.progress(), 25.0);
    }

    #[test]
    fn reset_clears_answers_pointer_and_completion() {
        let mut session = session(2);
        session.answer("q1", AnswerValue::Agree);
        session.next_question();
        session.next_question();
        assert!(session.is_completed());

        session.reset();
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.current_index(), 0);
        assert!(!session.is_completed());
    }

    #[test]
    fn share_token_round_trips_through_a_fresh_session() {
        let mut session = session(4);
        session.answer("q1", AnswerValue::StronglyAgree);
        session.answer("q3", AnswerValue::Neutral);
        let token = session.encode_answers();

        let mut restored = self::session(4);
        restored
            .load_encoded_answers(&token)
            .expect("token decodes");
        assert_eq!(restored.answered_count(), 2);
        assert_eq!(
            restored.answers().get("q1"),
            Some(&AnswerValue::StronglyAgree)
        );
        assert_eq!(restored.answers().get("q3"), Some(&AnswerValue::Neutral));
        assert!(!restored.is_completed());
    }

    #[test]
    fn loading_a_complete_token_marks_the_session_completed() {
        let mut session = session(2);
        session.answer("q1", AnswerValue::Agree);
        session.answer("q2", AnswerValue::Disagree);
        let token = session.encode_answers();

        let mut restored = self::session(2);
        restored
            .load_encoded_answers(&token)
            .expect("token decodes");
        assert!(restored.is_completed());
    }

    #[test]
    fn a_rejected_token_leaves_answers_untouched() {
        let mut session = session(2);
        session.answer("q1", AnswerValue::Agree);

        assert!(session.load_encoded_answers("not base64!").is_err());
        assert_eq!(session.answered_count(), 1);
    }
}
