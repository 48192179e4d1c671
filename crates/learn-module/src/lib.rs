//! # learn-module
//!
//! The learning-module progress engine: a pure state model for traversing
//! structured learning content, independent of any rendering layer.
//!
//! ## Components
//!
//! - [`ModuleSession`] - one student's live viewing session, owner of the
//!   progress snapshot
//! - [`QuizSession`] - attempt state machine over a question set, with
//!   grading via [`check_answer`]
//! - [`Navigator`] - section/content cursor with the skip/sequential
//!   policy gate
//! - [`ProgressReport`] - derived percentages and letter grade
//! - [`Notebook`] / [`ResourceLibrary`] - notes with search, resource
//!   filtering and grouping
//!
//! ## Architecture
//!
//! All state transitions are synchronous and single-threaded; the two
//! per-second timers (viewing time, quiz countdown) are driven by the
//! owner's `tick()` and die with it. Persistence goes through the
//! [`ProgressStore`] boundary: snapshots are pushed fire-and-forget after
//! every mutating transition, and nothing inside the engine awaits,
//! retries or reconciles.

mod models;
mod navigation;
mod notes;
mod progress;
mod quiz;
mod resources;
mod session;
mod store;
mod tracker;

pub use models::{
    AnswerValue, BlockMetadata, ContentBlock, ContentBody, Difficulty, InteractiveElement,
    InteractiveKind, LearningObjective, Level, Module, ModuleId, ModuleSettings, ObjectiveId,
    QuestionId, QuestionKind, QuizQuestion, Resource, ResourceId, ResourceKind, Section,
    SectionId, StudentId, StudentProgress,
};
pub use navigation::Navigator;
pub use notes::{parse_tags, Note, NoteId, Notebook};
pub use progress::{Grade, ProgressReport};
pub use quiz::{check_answer, QuestionResult, QuizOutcome, QuizSession, PASSING_SCORE};
pub use resources::ResourceLibrary;
pub use session::{ModuleSession, FINAL_ASSESSMENT_KEY};
pub use store::{NullStore, ProgressStore, StoreError};
pub use tracker::{format_duration, TimeTracker};
