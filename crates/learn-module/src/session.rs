//! One student's live viewing session over a module.

use crate::models::{
    AnswerValue, ContentBlock, Module, ModuleSettings, QuizQuestion, Section, StudentProgress,
};
use crate::navigation::Navigator;
use crate::notes::{Note, NoteId, Notebook};
use crate::progress::ProgressReport;
use crate::quiz::{QuizOutcome, QuizSession};
use crate::resources::ResourceLibrary;
use crate::store::{ProgressStore, StoreError};
use crate::tracker::TimeTracker;
use tracing::debug;

/// Score slot used for the module-level final assessment.
pub const FINAL_ASSESSMENT_KEY: &str = "final-assessment";

struct ActiveQuiz {
    score_key: String,
    quiz: QuizSession,
}

/// Exclusive owner of one [`StudentProgress`] snapshot.
///
/// Every mutating transition re-derives the snapshot, stamps the access
/// time, pushes it through the store (fire-and-forget) and notifies the
/// progress listener. Ephemeral quiz state is discarded on section changes
/// without any rollback; nothing is durable until the store has it.
pub struct ModuleSession<S: ProgressStore> {
    module: Module,
    settings: ModuleSettings,
    store: S,
    progress: StudentProgress,
    navigator: Navigator,
    notebook: Notebook,
    resources: ResourceLibrary,
    tracker: TimeTracker,
    active_quiz: Option<ActiveQuiz>,
    allow_retry: bool,
    quiz_time_limit_mins: Option<u32>,
    on_progress: Option<Box<dyn FnMut(&StudentProgress)>>,
    on_complete: Option<Box<dyn FnMut(u8)>>,
}

impl<S: ProgressStore> ModuleSession<S> {
    /// Open a session, resuming a stored snapshot when one exists.
    pub fn open(
        module: Module,
        student_id: impl Into<String>,
        settings: ModuleSettings,
        store: S,
    ) -> Result<Self, StoreError> {
        let student_id = student_id.into();
        let progress = store
            .load(&module.id, &student_id)?
            .unwrap_or_else(|| StudentProgress::new(module.id.clone(), student_id.clone()));
        let navigator = Navigator::resume(&module, &progress);
        let notebook = Notebook::hydrate(&progress.notes);
        let tracker = TimeTracker::new(progress.time_spent);
        let resources = ResourceLibrary::new(module.resources.clone());
        debug!(module = %module.id, student = %student_id, "opened module session");

        Ok(Self {
            module,
            settings,
            store,
            progress,
            navigator,
            notebook,
            resources,
            tracker,
            active_quiz: None,
            allow_retry: true,
            quiz_time_limit_mins: None,
            on_progress: None,
            on_complete: None,
        })
    }

    /// Set whether submitted quizzes may be retried.
    pub fn with_allow_retry(mut self, allow: bool) -> Self {
        self.allow_retry = allow;
        self
    }

    /// Apply a countdown, in minutes, to every quiz started afterwards.
    pub fn with_quiz_time_limit(mut self, minutes: u32) -> Self {
        self.quiz_time_limit_mins = Some(minutes);
        self
    }

    /// Called after any mutation affecting persisted fields.
    pub fn set_progress_listener(&mut self, listener: impl FnMut(&StudentProgress) + 'static) {
        self.on_progress = Some(Box::new(listener));
    }

    /// Called exactly once per quiz submission with the achieved score.
    pub fn set_completion_listener(&mut self, listener: impl FnMut(u8) + 'static) {
        self.on_complete = Some(Box::new(listener));
    }

    // Accessors

    /// The module under view.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Viewer policy switches.
    pub fn settings(&self) -> &ModuleSettings {
        &self.settings
    }

    /// The last committed snapshot.
    pub fn progress(&self) -> &StudentProgress {
        &self.progress
    }

    /// The navigation cursor.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// The session notebook.
    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    /// The module's resource library.
    pub fn resources(&self) -> &ResourceLibrary {
        &self.resources
    }

    /// Mutable resource library (favorites are session-local state).
    pub fn resources_mut(&mut self) -> &mut ResourceLibrary {
        &mut self.resources
    }

    /// The section under the cursor.
    pub fn current_section(&self) -> Option<&Section> {
        self.navigator.current_section(&self.module)
    }

    /// The content block under the cursor.
    pub fn current_block(&self) -> Option<&ContentBlock> {
        self.navigator.current_block(&self.module)
    }

    /// Derive the current progress report.
    pub fn report(&self) -> ProgressReport {
        ProgressReport::compute(&self.module, &self.progress)
    }

    // Navigation

    /// Step forward one content block. Leaving a section discards any
    /// quiz in flight.
    pub fn advance(&mut self) -> bool {
        let from = self.navigator.section_index();
        if !self.navigator.advance(&self.module) {
            return false;
        }
        if self.navigator.section_index() != from {
            self.active_quiz = None;
        }
        self.commit();
        true
    }

    /// Step backward one content block. Leaving a section discards any
    /// quiz in flight.
    pub fn retreat(&mut self) -> bool {
        let from = self.navigator.section_index();
        if !self.navigator.retreat(&self.module) {
            return false;
        }
        if self.navigator.section_index() != from {
            self.active_quiz = None;
        }
        self.commit();
        true
    }

    /// Whether a jump to `index` would be authorized.
    pub fn can_jump_to(&self, index: usize) -> bool {
        self.navigator.can_jump_to(&self.module, &self.settings, index)
    }

    /// Jump to a section, subject to the navigator's policy gate.
    pub fn jump_to_section(&mut self, index: usize) -> bool {
        let from = self.navigator.section_index();
        if !self
            .navigator
            .jump_to_section(&self.module, &self.settings, index)
        {
            return false;
        }
        if self.navigator.section_index() != from {
            self.active_quiz = None;
        }
        self.commit();
        true
    }

    // Bookmarks and objectives

    /// Toggle the bookmark for the current (section, content) pair.
    ///
    /// Returns the new state, or `None` when bookmarking is disabled or
    /// there is no valid position.
    pub fn toggle_bookmark(&mut self) -> Option<bool> {
        if !self.settings.enable_bookmarks {
            return None;
        }
        let key = self.navigator.bookmark_key(&self.module)?;
        let set = self.progress.toggle_bookmark(&key);
        self.commit();
        Some(set)
    }

    /// Whether the current position is bookmarked.
    pub fn is_current_bookmarked(&self) -> bool {
        self.navigator
            .bookmark_key(&self.module)
            .map(|key| self.progress.is_bookmarked(&key))
            .unwrap_or(false)
    }

    /// Flip completion of a module objective. Returns the new state, or
    /// `None` for an unknown objective.
    pub fn toggle_objective(&mut self, objective_id: &str) -> Option<bool> {
        if !self
            .module
            .learning_objectives
            .iter()
            .any(|o| o.id == objective_id)
        {
            return None;
        }
        let completed = self.progress.toggle_objective(objective_id);
        self.commit();
        Some(completed)
    }

    // Notes

    /// Add a note. Refused when note taking is disabled or blank.
    pub fn add_note(&mut self, content: &str, tags: Vec<String>) -> Option<NoteId> {
        if !self.settings.enable_notes {
            return None;
        }
        let id = self.notebook.add(content, tags)?;
        self.commit();
        Some(id)
    }

    /// Edit a note in place.
    pub fn edit_note(&mut self, id: NoteId, content: &str) -> bool {
        if !self.settings.enable_notes || !self.notebook.edit(id, content) {
            return false;
        }
        self.commit();
        true
    }

    /// Delete a note.
    pub fn remove_note(&mut self, id: NoteId) -> bool {
        if !self.settings.enable_notes || !self.notebook.remove(id) {
            return false;
        }
        self.commit();
        true
    }

    /// Search notes by content and tags.
    pub fn search_notes(&self, term: &str) -> Vec<&Note> {
        self.notebook.search(term)
    }

    // Time tracking

    /// Start accumulating viewing time. Ignored when tracking is off.
    pub fn play(&mut self) {
        if self.settings.time_tracking {
            self.tracker.play();
        }
    }

    /// Stop accumulating viewing time.
    pub fn pause(&mut self) {
        self.tracker.pause();
    }

    /// Toggle play/pause. Ignored when tracking is off.
    pub fn toggle_playback(&mut self) {
        if self.settings.time_tracking {
            self.tracker.toggle();
        }
    }

    /// Content interaction implies the student is engaged.
    pub fn mark_interaction(&mut self) {
        self.play();
    }

    /// Whether viewing time is accumulating.
    pub fn is_playing(&self) -> bool {
        self.tracker.is_playing()
    }

    /// Accumulated viewing time in seconds.
    pub fn time_spent_secs(&self) -> u64 {
        self.tracker.seconds()
    }

    /// Advance both timers by one second.
    ///
    /// An expiring quiz countdown submits implicitly; its outcome is
    /// returned and recorded exactly as an explicit submission would be.
    pub fn tick(&mut self) -> Option<QuizOutcome> {
        let advanced = self.tracker.tick();
        let forced = self
            .active_quiz
            .as_mut()
            .and_then(|active| active.quiz.tick().map(|o| (active.score_key.clone(), o)));

        if let Some((key, outcome)) = forced {
            self.finish_quiz(&key, &outcome);
            return Some(outcome);
        }
        if advanced {
            self.commit();
        }
        None
    }

    // Quizzes

    /// Start (or restart) the current section's quiz.
    pub fn start_section_quiz(&mut self) -> bool {
        let Some(section) = self.navigator.current_section(&self.module) else {
            return false;
        };
        if !section.has_quiz() {
            return false;
        }
        let key = section.id.clone();
        let questions = section.quiz.clone();
        self.install_quiz(key, questions);
        true
    }

    /// Start the module-level final assessment, if one exists.
    pub fn start_final_assessment(&mut self) -> bool {
        if !self.module.has_final_assessment() {
            return false;
        }
        let questions = self.module.final_assessment.clone();
        self.install_quiz(FINAL_ASSESSMENT_KEY.to_string(), questions);
        true
    }

    fn install_quiz(&mut self, score_key: String, questions: Vec<QuizQuestion>) {
        let mut quiz = QuizSession::new(questions);
        if let Some(minutes) = self.quiz_time_limit_mins {
            quiz = quiz.with_time_limit(minutes);
        }
        if let Some(&previous) = self.progress.quiz_scores.get(&score_key) {
            quiz = quiz.with_previous_score(previous);
        }
        self.active_quiz = Some(ActiveQuiz { score_key, quiz });
        self.mark_interaction();
    }

    /// The quiz in flight, if any.
    pub fn active_quiz(&self) -> Option<&QuizSession> {
        self.active_quiz.as_ref().map(|a| &a.quiz)
    }

    /// Record an answer on the quiz in flight.
    pub fn answer_question(&mut self, question_id: &str, value: impl Into<AnswerValue>) -> bool {
        self.active_quiz
            .as_mut()
            .map(|a| a.quiz.answer(question_id, value))
            .unwrap_or(false)
    }

    /// Move to the next quiz question.
    pub fn quiz_next(&mut self) -> bool {
        self.active_quiz
            .as_mut()
            .map(|a| a.quiz.next())
            .unwrap_or(false)
    }

    /// Move to the previous quiz question.
    pub fn quiz_previous(&mut self) -> bool {
        self.active_quiz
            .as_mut()
            .map(|a| a.quiz.previous())
            .unwrap_or(false)
    }

    /// Reveal the next hint for a question on the quiz in flight.
    pub fn reveal_hint(&mut self, question_id: &str) -> Option<&str> {
        self.active_quiz.as_mut()?.quiz.reveal_hint(question_id)
    }

    /// Submit the quiz in flight, recording its score.
    pub fn submit_quiz(&mut self) -> Option<QuizOutcome> {
        let (key, outcome) = {
            let active = self.active_quiz.as_mut()?;
            let outcome = active.quiz.submit()?;
            (active.score_key.clone(), outcome)
        };
        self.finish_quiz(&key, &outcome);
        Some(outcome)
    }

    /// Retry the submitted quiz in flight, if retries are allowed.
    pub fn retry_quiz(&mut self) -> bool {
        if !self.allow_retry {
            return false;
        }
        self.active_quiz
            .as_mut()
            .map(|a| a.quiz.retry())
            .unwrap_or(false)
    }

    /// Discard the quiz in flight without grading it.
    pub fn abandon_quiz(&mut self) {
        self.active_quiz = None;
    }

    fn finish_quiz(&mut self, score_key: &str, outcome: &QuizOutcome) {
        self.progress.record_quiz_score(score_key, outcome.score);
        debug!(quiz = %score_key, score = outcome.score, "quiz submitted");
        if let Some(listener) = self.on_complete.as_mut() {
            listener(outcome.score);
        }
        self.commit();
    }

    /// Re-derive the snapshot and push it out.
    fn commit(&mut self) {
        self.progress.current_section = self.navigator.section_index();
        self.progress.notes = self.notebook.contents();
        self.progress.time_spent = self.tracker.seconds();
        self.progress.touch();
        self.store.save(&self.progress);
        if let Some(listener) = self.on_progress.as_mut() {
            listener(&self.progress);
        }
    }
}
