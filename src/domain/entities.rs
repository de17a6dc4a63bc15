//! Domain entities persisted next to the tree

use serde::{Deserialize, Serialize};

use crate::domain::attributes::Color;
use crate::domain::document::TreeDocument;
use crate::domain::error::{DomainError, DomainResult};

/// Canvas-wide drawing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeSettings {
    /// Canvas background
    pub background_color: Color,
    /// Size nodes to fit their label instead of their fixed width/height
    pub node_resize: bool,
    /// Vertical distance between levels
    pub level_height: u32,
    /// Horizontal gap between siblings
    pub sibling_space: u32,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            background_color: Color::white(),
            node_resize: false,
            level_height: 48,
            sibling_space: 5,
        }
    }
}

impl TreeSettings {
    pub fn validate(&self) -> DomainResult<()> {
        if self.level_height < 1 {
            return Err(DomainError::InvalidSettings {
                message: "level height must be at least 1".into(),
            });
        }
        if self.sibling_space < 1 {
            return Err(DomainError::InvalidSettings {
                message: "sibling space must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Everything written to the data file: the tree plus its settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedData {
    pub tree: TreeDocument,
    #[serde(default)]
    pub tree_settings: TreeSettings,
}

impl SavedData {
    pub fn new(tree: TreeDocument, tree_settings: TreeSettings) -> Self {
        Self {
            tree,
            tree_settings,
        }
    }

    pub fn from_json(json: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> DomainResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_saved_data_without_settings_when_parsing_then_uses_defaults() {
        let json = r#"{"tree": {"rootId": 0, "nodes": []}}"#;
        let data = SavedData::from_json(json).unwrap();
        assert_eq!(data.tree_settings, TreeSettings::default());
    }

    #[test]
    fn given_partial_settings_when_parsing_then_fills_missing_fields() {
        let json = r##"{"backgroundColor": "#101010", "siblingSpace": 12}"##;
        let settings: TreeSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.background_color.as_str(), "#101010");
        assert_eq!(settings.sibling_space, 12);
        assert_eq!(settings.level_height, 48);
        assert!(!settings.node_resize);
    }

    #[test]
    fn given_zero_level_height_when_validating_then_rejects() {
        let settings = TreeSettings {
            level_height: 0,
            ..TreeSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(DomainError::InvalidSettings { .. })
        ));
        assert!(TreeSettings::default().validate().is_ok());
    }
}
