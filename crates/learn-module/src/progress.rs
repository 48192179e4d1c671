//! Derived progress metrics over a progress snapshot.
//!
//! Everything here is a pure function of the static module and a
//! [`StudentProgress`] snapshot, recomputed on every call. Divisions with a
//! zero denominator are defined as 0, never NaN.

use crate::models::{Module, StudentProgress};
use serde::{Deserialize, Serialize};

/// Letter grade for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Map a score to its letter grade (inclusive lower bounds).
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::A
        } else if score >= 80.0 {
            Self::B
        } else if score >= 70.0 {
            Self::C
        } else if score >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }

    /// Get the letter.
    pub fn letter(&self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::F => 'F',
        }
    }
}

/// Point-in-time progress summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    /// Sections reached over total sections, index-based. Coarser than the
    /// navigator's fractional module progress; both are surfaced.
    pub section_pct: f64,
    /// Completed objectives over total objectives.
    pub objective_pct: f64,
    /// Scored quiz sections over sections carrying a quiz.
    pub quiz_pct: f64,
    /// Unweighted mean of the three percentages above.
    pub overall_pct: f64,
    /// Mean of all recorded quiz scores; 0 when none are recorded.
    pub average_quiz_score: f64,
    /// Letter grade for the average quiz score.
    pub grade: Grade,
    /// Scored quiz sections.
    pub completed_quizzes: usize,
    /// Sections carrying a quiz.
    pub total_quizzes: usize,
    /// Time spent against the module's estimated duration, capped at 100.
    pub time_efficiency_pct: f64,
}

impl ProgressReport {
    /// Derive a report from a snapshot. No mutation occurs here.
    pub fn compute(module: &Module, progress: &StudentProgress) -> Self {
        let total_sections = module.sections.len();
        let section_pct = pct(progress.current_section, total_sections);

        let objective_pct = pct(
            progress.completed_objectives.len(),
            module.learning_objectives.len(),
        );

        let total_quizzes = module.quiz_section_count();
        let completed_quizzes = module
            .sections
            .iter()
            .filter(|s| s.has_quiz() && progress.quiz_scores.contains_key(&s.id))
            .count();
        let quiz_pct = pct(completed_quizzes, total_quizzes);

        let overall_pct = (section_pct + objective_pct + quiz_pct) / 3.0;

        let average_quiz_score = if progress.quiz_scores.is_empty() {
            0.0
        } else {
            progress.quiz_scores.values().map(|&s| s as f64).sum::<f64>()
                / progress.quiz_scores.len() as f64
        };

        let time_efficiency_pct = if module.estimated_duration == 0 {
            0.0
        } else {
            let spent_minutes = progress.time_spent as f64 / 60.0;
            (spent_minutes / module.estimated_duration as f64 * 100.0).min(100.0)
        };

        Self {
            section_pct,
            objective_pct,
            quiz_pct,
            overall_pct,
            average_quiz_score,
            grade: Grade::from_score(average_quiz_score),
            completed_quizzes,
            total_quizzes,
            time_efficiency_pct,
        }
    }

    /// Whether every tracked dimension is complete.
    pub fn is_complete(&self) -> bool {
        self.overall_pct >= 100.0
    }
}

fn pct(done: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        done as f64 / total as f64 * 100.0
    }
}
