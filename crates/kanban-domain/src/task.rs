use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::section::SectionId;

pub type TaskId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id", alias = "id")]
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    /// Serialized rich-text document, stored as the editor hands it over.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub section: Option<SectionId>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, section: impl Into<SectionId>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            content: String::new(),
            section: Some(section.into()),
            created_at: Utc::now(),
        }
    }

    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref content) = patch.content {
            self.content = content.clone();
        }
    }

    /// Creation date as shown in the task editor header.
    pub fn created_label(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }
}
