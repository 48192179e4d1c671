//! Data models for learning modules.
//!
//! Struct shapes mirror the JSON documents served by the LMS backend, so
//! everything here derives `Serialize`/`Deserialize` with the wire's
//! camelCase field names and kebab-case type tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifiers are assigned by the backend and treated as opaque strings.
pub type ModuleId = String;
pub type SectionId = String;
pub type ObjectiveId = String;
pub type QuestionId = String;
pub type ResourceId = String;
pub type StudentId = String;

/// Module difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

/// Difficulty rating for questions and content blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// A structured unit of learning content composed of ordered sections.
///
/// Immutable once loaded; section order defines traversal order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Unique identifier.
    pub id: ModuleId,
    /// Module title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Subject area.
    pub subject: String,
    /// Difficulty level.
    pub level: Level,
    /// Estimated duration in minutes.
    pub estimated_duration: u32,
    /// Goals a student can mark complete independent of traversal.
    #[serde(default)]
    pub learning_objectives: Vec<LearningObjective>,
    /// Ordered sections.
    pub sections: Vec<Section>,
    /// Optional module-level quiz taken after the last section.
    #[serde(default)]
    pub final_assessment: Vec<QuizQuestion>,
    /// Supplementary resources.
    #[serde(default)]
    pub resources: Vec<Resource>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Module {
    /// Get a section by position.
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Look a section up by identifier.
    pub fn section_by_id(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Number of sections carrying a quiz.
    pub fn quiz_section_count(&self) -> usize {
        self.sections.iter().filter(|s| s.has_quiz()).count()
    }

    /// Whether a module-level final assessment exists.
    pub fn has_final_assessment(&self) -> bool {
        !self.final_assessment.is_empty()
    }
}

/// An ordered sub-unit of a module containing content blocks and an
/// optional quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Unique identifier.
    pub id: SectionId,
    /// Section title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Ordered content blocks. Non-empty for any section reachable during
    /// normal traversal.
    pub content: Vec<ContentBlock>,
    /// Section quiz; empty means no quiz.
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
    /// Estimated time in minutes.
    pub estimated_time: u32,
    /// Whether the section is required.
    pub is_required: bool,
}

impl Section {
    /// Whether this section ends with a quiz.
    pub fn has_quiz(&self) -> bool {
        !self.quiz.is_empty()
    }

    /// Whether any content block contains video.
    pub fn has_video(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b.body, ContentBody::Video(_)))
    }

    /// Whether any content block contains code.
    pub fn has_code(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b.body, ContentBody::Code(_)))
    }

    /// Whether any content block is interactive.
    pub fn has_interactive(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b.body, ContentBody::Interactive(_)))
    }
}

/// One discrete piece of displayable content within a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    /// Unique identifier within the section.
    pub id: String,
    /// The content payload, tagged by kind.
    #[serde(flatten)]
    pub body: ContentBody,
    /// Optional metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BlockMetadata>,
}

/// Content payload variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum ContentBody {
    /// Markdown/plain text body.
    Text(String),
    /// Heading text.
    Heading(String),
    /// Image URL.
    Image(String),
    /// Video URL.
    Video(String),
    /// Source code listing.
    Code(String),
    /// Embedded interactive element.
    Interactive(InteractiveElement),
    /// Inline quiz question.
    Quiz(QuizQuestion),
}

impl ContentBody {
    /// Get the kind tag as it appears on the wire.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Heading(_) => "heading",
            Self::Image(_) => "image",
            Self::Video(_) => "video",
            Self::Code(_) => "code",
            Self::Interactive(_) => "interactive",
            Self::Quiz(_) => "quiz",
        }
    }
}

/// Kind of embedded interactive element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractiveKind {
    Simulation,
    Diagram,
    CodeEditor,
    Video,
    Animation,
    VirtualLab,
}

/// An embedded interactive element; its payload is opaque to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveElement {
    /// Unique identifier.
    pub id: String,
    /// Element kind.
    #[serde(rename = "type")]
    pub kind: InteractiveKind,
    /// Display title.
    pub title: String,
    /// Renderer-specific configuration.
    #[serde(default)]
    pub config: serde_json::Value,
}

/// Optional per-block metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMetadata {
    /// Estimated time in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
    /// Difficulty rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Question type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    FillBlank,
    DragDrop,
    Code,
}

/// A submitted or expected answer: a single text value or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    /// The empty text answer, standing in for a missing submission.
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Whether the answer carries nothing.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(t) => t.trim().is_empty(),
            Self::List(l) => l.is_empty(),
        }
    }

    /// View as a single text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::List(_) => None,
        }
    }

    /// View as an ordered list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Text(_) => None,
            Self::List(l) => Some(l),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// A quiz question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// Unique identifier.
    pub id: QuestionId,
    /// Question type.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Prompt text.
    #[serde(rename = "question")]
    pub prompt: String,
    /// Ordered answer options, where the type uses them.
    #[serde(default)]
    pub options: Vec<String>,
    /// The accepted answer(s).
    pub correct_answer: AnswerValue,
    /// Explanation shown after grading.
    #[serde(default)]
    pub explanation: String,
    /// Point value.
    pub points: u32,
    /// Difficulty rating.
    pub difficulty: Difficulty,
    /// Optional hints, in reveal order.
    #[serde(default)]
    pub hints: Vec<String>,
}

/// A named learning goal. Completion is tracked on [`StudentProgress`],
/// not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningObjective {
    /// Unique identifier.
    pub id: ObjectiveId,
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
}

/// Resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Pdf,
    Link,
    Video,
    Audio,
    Document,
}

impl ResourceKind {
    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Link => "Link",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Document => "Document",
        }
    }
}

/// A supplementary resource attached to a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Unique identifier.
    pub id: ResourceId,
    /// Display title.
    pub title: String,
    /// Resource type.
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    /// Location.
    pub url: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional human-readable size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Viewer policy switches, delivered alongside the module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSettings {
    /// Whether a student may jump to any section.
    pub allow_skipping: bool,
    /// Whether jumps more than one section ahead are rejected outright.
    pub require_sequential_progress: bool,
    /// Whether progress indicators are shown.
    pub show_progress: bool,
    /// Whether note taking is enabled.
    pub enable_notes: bool,
    /// Whether bookmarking is enabled.
    pub enable_bookmarks: bool,
    /// Whether viewing time is tracked.
    pub time_tracking: bool,
}

impl Default for ModuleSettings {
    fn default() -> Self {
        Self {
            allow_skipping: true,
            require_sequential_progress: false,
            show_progress: true,
            enable_notes: true,
            enable_bookmarks: true,
            time_tracking: true,
        }
    }
}

/// The persisted record of one student's state within one module.
///
/// Exclusively owned by the viewing session that loaded it; every mutating
/// transition re-derives the snapshot before it is pushed to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgress {
    /// Module reference.
    pub module_id: ModuleId,
    /// Student reference.
    pub student_id: StudentId,
    /// Completed objective identifiers, in completion order.
    pub completed_objectives: Vec<ObjectiveId>,
    /// Current section index, 0-based.
    pub current_section: usize,
    /// Quiz score (0-100) per section identifier.
    pub quiz_scores: HashMap<SectionId, u8>,
    /// Cumulative time spent in seconds.
    pub time_spent: u64,
    /// Last access timestamp.
    pub last_accessed: DateTime<Utc>,
    /// Free-text notes.
    pub notes: Vec<String>,
    /// Bookmark keys (`sectionId-contentId`), in creation order.
    pub bookmarks: Vec<String>,
}

impl StudentProgress {
    /// Create a fresh record for a student opening a module for the first
    /// time.
    pub fn new(module_id: impl Into<ModuleId>, student_id: impl Into<StudentId>) -> Self {
        Self {
            module_id: module_id.into(),
            student_id: student_id.into(),
            completed_objectives: Vec::new(),
            current_section: 0,
            quiz_scores: HashMap::new(),
            time_spent: 0,
            last_accessed: Utc::now(),
            notes: Vec::new(),
            bookmarks: Vec::new(),
        }
    }

    /// Flip an objective's completion state. Returns the new state.
    pub fn toggle_objective(&mut self, id: &str) -> bool {
        if let Some(pos) = self.completed_objectives.iter().position(|o| o == id) {
            self.completed_objectives.remove(pos);
            false
        } else {
            self.completed_objectives.push(id.to_string());
            true
        }
    }

    /// Whether an objective is marked complete.
    pub fn is_objective_complete(&self, id: &str) -> bool {
        self.completed_objectives.iter().any(|o| o == id)
    }

    /// Flip a bookmark's presence. Returns whether it is now set.
    pub fn toggle_bookmark(&mut self, key: &str) -> bool {
        if let Some(pos) = self.bookmarks.iter().position(|b| b == key) {
            self.bookmarks.remove(pos);
            false
        } else {
            self.bookmarks.push(key.to_string());
            true
        }
    }

    /// Whether a bookmark key is present.
    pub fn is_bookmarked(&self, key: &str) -> bool {
        self.bookmarks.iter().any(|b| b == key)
    }

    /// Record (or overwrite) a quiz score for a section.
    pub fn record_quiz_score(&mut self, section_id: impl Into<SectionId>, score: u8) {
        self.quiz_scores.insert(section_id.into(), score.min(100));
    }

    /// Refresh the last-accessed timestamp.
    pub fn touch(&mut self) {
        self.last_accessed = Utc::now();
    }
}
