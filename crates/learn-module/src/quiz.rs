//! Quiz grading and attempt state.

use crate::models::{AnswerValue, QuestionId, QuestionKind, QuizQuestion};
use std::collections::HashMap;

/// Minimum score (percent) counted as a pass.
pub const PASSING_SCORE: u8 = 70;

/// Decide whether a submitted answer is correct for a question.
///
/// Pure; unknown shapes fail closed.
pub fn check_answer(question: &QuizQuestion, answer: &AnswerValue) -> bool {
    match question.kind {
        QuestionKind::MultipleChoice | QuestionKind::TrueFalse => matches!(
            (answer, &question.correct_answer),
            (AnswerValue::Text(a), AnswerValue::Text(k)) if a == k
        ),
        QuestionKind::FillBlank => {
            let Some(submitted) = answer.as_text() else {
                return false;
            };
            let submitted = submitted.trim().to_lowercase();
            match &question.correct_answer {
                AnswerValue::Text(k) => k.trim().to_lowercase() == submitted,
                AnswerValue::List(keys) => {
                    keys.iter().any(|k| k.trim().to_lowercase() == submitted)
                }
            }
        }
        QuestionKind::DragDrop => {
            let (Some(submitted), Some(key)) =
                (answer.as_list(), question.correct_answer.as_list())
            else {
                return false;
            };
            // Graded as a set: both sides are sorted before comparison.
            let mut submitted: Vec<&String> = submitted.iter().collect();
            let mut key: Vec<&String> = key.iter().collect();
            submitted.sort();
            key.sort();
            submitted == key
        }
        QuestionKind::Code => false,
    }
}

/// Grading result for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResult {
    /// Question graded.
    pub question_id: QuestionId,
    /// The answer that was graded (empty text when none was given).
    pub answer: AnswerValue,
    /// Whether it was correct.
    pub correct: bool,
}

/// Outcome of a submitted attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    /// Per-question results, in question order.
    pub results: Vec<QuestionResult>,
    /// Percentage score, 0-100.
    pub score: u8,
    /// Whether the score meets [`PASSING_SCORE`].
    pub passed: bool,
}

impl QuizOutcome {
    /// Number of correctly answered questions.
    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| r.correct).count()
    }
}

/// One quiz attempt over a fixed question set.
///
/// Two states: in progress (answers collected, position movable) and
/// submitted (results frozen until [`QuizSession::retry`]).
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    answers: HashMap<QuestionId, AnswerValue>,
    revealed_hints: HashMap<QuestionId, usize>,
    outcome: Option<QuizOutcome>,
    /// Countdown in seconds; `None` when the quiz is untimed.
    remaining_secs: Option<u32>,
    time_limit_mins: Option<u32>,
    previous_score: Option<u8>,
}

impl QuizSession {
    /// Start an attempt over a question set.
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current: 0,
            answers: HashMap::new(),
            revealed_hints: HashMap::new(),
            outcome: None,
            remaining_secs: None,
            time_limit_mins: None,
            previous_score: None,
        }
    }

    /// Set a time limit in minutes. The countdown starts immediately.
    pub fn with_time_limit(mut self, minutes: u32) -> Self {
        self.time_limit_mins = Some(minutes);
        self.remaining_secs = Some(minutes * 60);
        self
    }

    /// Carry the score of an earlier attempt, for feedback.
    pub fn with_previous_score(mut self, score: u8) -> Self {
        self.previous_score = Some(score);
        self
    }

    /// Whether the attempt has been submitted.
    pub fn is_submitted(&self) -> bool {
        self.outcome.is_some()
    }

    /// Number of questions in the set.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Current question position.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question at the current position.
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    /// All questions in the set.
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// The submitted outcome, if any.
    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    /// Score of an earlier attempt, if one was carried in.
    pub fn previous_score(&self) -> Option<u8> {
        self.previous_score
    }

    /// Seconds left on the countdown, if the quiz is timed.
    pub fn remaining_secs(&self) -> Option<u32> {
        self.remaining_secs
    }

    /// Number of questions with a recorded answer.
    pub fn answered_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| self.answers.contains_key(&q.id))
            .count()
    }

    /// The recorded answer for a question.
    pub fn answer_for(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }

    /// Record (or replace) an answer. Position is unchanged.
    ///
    /// No-op once submitted or for an unknown question id.
    pub fn answer(&mut self, question_id: &str, value: impl Into<AnswerValue>) -> bool {
        if self.is_submitted() || !self.questions.iter().any(|q| q.id == question_id) {
            return false;
        }
        self.answers.insert(question_id.to_string(), value.into());
        true
    }

    /// Move to the next question; no-op at the last one or once submitted.
    pub fn next(&mut self) -> bool {
        if self.is_submitted() || self.current + 1 >= self.questions.len() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move to the previous question; no-op at the first one or once
    /// submitted.
    pub fn previous(&mut self) -> bool {
        if self.is_submitted() || self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Reveal the next hint for a question, if any remain.
    ///
    /// Hints are handed out in order; nothing is revealed once submitted.
    pub fn reveal_hint(&mut self, question_id: &str) -> Option<&str> {
        if self.is_submitted() {
            return None;
        }
        let question = self.questions.iter().find(|q| q.id == question_id)?;
        let shown = self.revealed_hints.entry(question.id.clone()).or_insert(0);
        let hint = question.hints.get(*shown)?;
        *shown += 1;
        Some(hint.as_str())
    }

    /// Number of hints already revealed for a question.
    pub fn hints_revealed(&self, question_id: &str) -> usize {
        self.revealed_hints.get(question_id).copied().unwrap_or(0)
    }

    /// Grade every question and freeze the attempt.
    ///
    /// Missing answers are graded as empty submissions. Returns the outcome
    /// exactly once; a second call is a no-op returning `None`.
    pub fn submit(&mut self) -> Option<QuizOutcome> {
        if self.is_submitted() {
            return None;
        }
        let results: Vec<QuestionResult> = self
            .questions
            .iter()
            .map(|q| {
                let answer = self
                    .answers
                    .get(&q.id)
                    .cloned()
                    .unwrap_or_else(AnswerValue::empty);
                let correct = check_answer(q, &answer);
                QuestionResult {
                    question_id: q.id.clone(),
                    answer,
                    correct,
                }
            })
            .collect();

        let total = self.questions.len();
        let correct = results.iter().filter(|r| r.correct).count();
        let score = if total == 0 {
            0
        } else {
            ((correct as f64 / total as f64) * 100.0).round() as u8
        };

        let outcome = QuizOutcome {
            results,
            score,
            passed: score >= PASSING_SCORE,
        };
        self.outcome = Some(outcome.clone());
        Some(outcome)
    }

    /// Discard the submitted outcome and start over.
    ///
    /// Valid only after submission; the last score becomes the previous
    /// score and the countdown restarts. The retry policy itself lives
    /// with the caller.
    pub fn retry(&mut self) -> bool {
        let Some(outcome) = self.outcome.take() else {
            return false;
        };
        self.previous_score = Some(outcome.score);
        self.answers.clear();
        self.revealed_hints.clear();
        self.current = 0;
        self.remaining_secs = self.time_limit_mins.map(|m| m * 60);
        true
    }

    /// Advance the countdown by one second.
    ///
    /// Reaching zero forces an implicit [`QuizSession::submit`], whose
    /// outcome is returned. Untimed or submitted sessions ignore ticks.
    pub fn tick(&mut self) -> Option<QuizOutcome> {
        if self.is_submitted() {
            return None;
        }
        let remaining = self.remaining_secs.as_mut()?;
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            return self.submit();
        }
        None
    }
}
