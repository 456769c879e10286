//! Task records and board containers.
//!
//! A task lives in exactly one quadrant of the board. The record shape here
//! is what the task repository stores and what queue payloads carry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QuadrantError;

/// The four fixed board containers.
///
/// Stable string codes (`q1`..`q4`) are used in payloads and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    /// Urgent and important ("do first").
    #[serde(rename = "q1")]
    UrgentImportant,
    /// Important but not urgent ("schedule").
    #[serde(rename = "q2")]
    ImportantOnly,
    /// Urgent but not important ("delegate").
    #[serde(rename = "q3")]
    UrgentOnly,
    /// Neither urgent nor important ("eliminate").
    #[serde(rename = "q4")]
    Neither,
}

impl Quadrant {
    /// All quadrants in board order.
    pub const ALL: [Self; 4] = [
        Self::UrgentImportant,
        Self::ImportantOnly,
        Self::UrgentOnly,
        Self::Neither,
    ];

    /// Stable storage/payload code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UrgentImportant => "q1",
            Self::ImportantOnly => "q2",
            Self::UrgentOnly => "q3",
            Self::Neither => "q4",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::UrgentImportant => "Urgent & Important",
            Self::ImportantOnly => "Important",
            Self::UrgentOnly => "Urgent",
            Self::Neither => "Neither",
        }
    }

    /// Parse a storage code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is not one of `q1`..`q4`.
    pub fn parse(code: &str) -> Result<Self, QuadrantError> {
        match code {
            "q1" => Ok(Self::UrgentImportant),
            "q2" => Ok(Self::ImportantOnly),
            "q3" => Ok(Self::UrgentOnly),
            "q4" => Ok(Self::Neither),
            other => Err(QuadrantError::Queue(format!("unknown quadrant: {other}"))),
        }
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A task record as stored by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    pub quadrant: Quadrant,
    /// Position within the quadrant's ordered list.
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new task with a fresh id, placed at the given position.
    #[must_use]
    pub fn new(title: impl Into<String>, quadrant: Quadrant, position: u32) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            notes: String::new(),
            quadrant,
            position,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Lightweight reference used by transient drag state.
    #[must_use]
    pub fn reference(&self) -> TaskRef {
        TaskRef {
            id: self.id.clone(),
            quadrant: self.quadrant,
        }
    }
}

/// Identifies a task without owning the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    pub id: String,
    pub quadrant: Quadrant,
}

/// Optional field updates applied to an existing task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl TaskFields {
    /// True when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.notes.is_none() && self.position.is_none()
    }

    /// Apply these fields to a task record, bumping `updated_at`.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(notes) = &self.notes {
            task.notes.clone_from(notes);
        }
        if let Some(position) = self.position {
            task.position = position;
        }
        task.updated_at = Some(Utc::now());
    }
}
