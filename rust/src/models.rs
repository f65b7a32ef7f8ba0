//! Core data types for the study-plan scheduler.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kind of a node in the lesson graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    #[default]
    Lesson,
    PracticeExam,
}

/// A student's progress on a single node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryStatus {
    #[default]
    Pending,
    NeedsReview,
    Mastered,
}

impl MasteryStatus {
    pub fn is_mastered(self) -> bool {
        self == MasteryStatus::Mastered
    }
}

/// Rendered lesson type in the output plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    Reading,
    Video,
    Quiz,
    PracticeExam,
}

impl LessonKind {
    /// Derive the lesson type from the shape of its content payload.
    ///
    /// Objects carrying `video_url`/`video` are videos, objects carrying
    /// `questions`/`quiz` are quizzes, everything else reads as text.
    pub fn from_payload(payload: Option<&Value>) -> Self {
        let Some(Value::Object(map)) = payload else {
            return LessonKind::Reading;
        };
        if map.contains_key("video_url") || map.contains_key("video") {
            LessonKind::Video
        } else if map.contains_key("questions") || map.contains_key("quiz") {
            LessonKind::Quiz
        } else {
            LessonKind::Reading
        }
    }
}

/// A unit of study content in a course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LessonNode {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub module_ref: String,
    /// Static duration estimate; the configured default applies when absent.
    #[serde(default)]
    pub estimated_minutes: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub intrinsic_exam_value: f64,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub node_type: NodeType,
    #[serde(default)]
    pub content_payload: Option<Value>,
}

impl LessonNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>, module_ref: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            module_ref: module_ref.into(),
            estimated_minutes: None,
            intrinsic_exam_value: 0.0,
            node_type: NodeType::Lesson,
            content_payload: None,
        }
    }

    pub fn with_minutes(mut self, minutes: f64) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    pub fn with_exam_value(mut self, value: f64) -> Self {
        self.intrinsic_exam_value = value;
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.content_payload = Some(payload);
        self
    }

    /// Module quizzes are tagged by naming convention: a title containing
    /// "module quiz" or an id containing "module-quiz".
    pub fn is_module_quiz(&self) -> bool {
        self.title.to_lowercase().contains("module quiz")
            || self.id.to_lowercase().contains("module-quiz")
    }
}

/// A prerequisite edge: `child_id` requires `parent_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub parent_id: String,
    pub child_id: String,
}

impl DependencyEdge {
    pub fn new(parent_id: impl Into<String>, child_id: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            child_id: child_id.into(),
        }
    }
}

/// Per-student progress on a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserNodeState {
    pub node_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mastery_status: MasteryStatus,
    /// Familiarity in [0, 1]; the configured default applies when absent.
    #[serde(default)]
    pub familiarity_score: Option<f64>,
}

impl UserNodeState {
    pub fn new(node_id: impl Into<String>, mastery_status: MasteryStatus, familiarity: f64) -> Self {
        Self {
            node_id: node_id.into(),
            mastery_status,
            familiarity_score: Some(familiarity),
        }
    }
}
