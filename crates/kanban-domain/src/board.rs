use serde::{Deserialize, Serialize};

use crate::section::Section;

/// Server-assigned identifier. Opaque to the client.
pub type BoardId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(rename = "_id", alias = "id")]
    pub id: BoardId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub favourite: bool,
    /// Only populated when the board is fetched on its own.
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Board {
    pub fn new(id: impl Into<BoardId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            icon: String::new(),
            favourite: false,
            sections: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_favourite(mut self, favourite: bool) -> Self {
        self.favourite = favourite;
        self
    }

    pub fn apply_patch(&mut self, patch: &BoardPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(ref icon) = patch.icon {
            self.icon = icon.clone();
        }
        if let Some(favourite) = patch.favourite {
            self.favourite = favourite;
        }
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }
}

/// Partial board update. Unset fields are left alone and never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favourite: Option<bool>,
}

impl BoardPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn icon(icon: impl Into<String>) -> Self {
        Self {
            icon: Some(icon.into()),
            ..Default::default()
        }
    }

    pub fn favourite(favourite: bool) -> Self {
        Self {
            favourite: Some(favourite),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.icon.is_none()
            && self.favourite.is_none()
    }

    /// The same patch minus the favourite flag.
    pub fn display_fields(&self) -> Self {
        Self {
            favourite: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_wire_board() {
        let board: Board = serde_json::from_value(json!({
            "_id": "64f0c1",
            "title": "Roadmap",
            "icon": "🚀",
            "favourite": true,
            "position": 3
        }))
        .unwrap();

        assert_eq!(board.id, "64f0c1");
        assert_eq!(board.title, "Roadmap");
        assert_eq!(board.description, "");
        assert!(board.favourite);
        assert!(board.sections.is_empty());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let value = serde_json::to_value(BoardPatch::title("Q3")).unwrap();
        assert_eq!(value, json!({ "title": "Q3" }));

        let value = serde_json::to_value(BoardPatch::favourite(false)).unwrap();
        assert_eq!(value, json!({ "favourite": false }));
    }

    #[test]
    fn test_apply_patch() {
        let mut board = Board::new("b1", "Old").with_icon("📃");
        board.apply_patch(&BoardPatch {
            title: Some("New".into()),
            icon: Some("🔥".into()),
            ..Default::default()
        });

        assert_eq!(board.title, "New");
        assert_eq!(board.icon, "🔥");
        assert_eq!(board.description, "");
        assert!(!board.favourite);
    }

    #[test]
    fn test_display_fields_drops_favourite() {
        let patch = BoardPatch {
            title: Some("x".into()),
            favourite: Some(true),
            ..Default::default()
        };
        let display = patch.display_fields();
        assert_eq!(display.title.as_deref(), Some("x"));
        assert!(display.favourite.is_none());
        assert!(BoardPatch::default().is_empty());
    }
}
