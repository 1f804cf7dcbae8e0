//! Display templates.
//!
//! A display template describes editor-configurable rendering options for a
//! base type, a content type, or a structural composition node. The `tag`
//! selects a rendering variant; the fragment generator never reads templates.

use crate::model::BaseType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Structural node types inside a composition grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Row,
    Column,
}

/// What a display template applies to. Exactly one target is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayTemplateTarget {
    BaseType(BaseType),
    ContentType(String),
    NodeType(NodeType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplaySettingEditor {
    Select,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettingChoice {
    pub display_name: String,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySetting {
    pub display_name: String,
    pub editor: DisplaySettingEditor,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub choices: IndexMap<String, DisplaySettingChoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTemplateDefinition {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub target: DisplayTemplateTarget,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub settings: IndexMap<String, DisplaySetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl DisplayTemplateDefinition {
    pub fn new(key: impl Into<String>, target: DisplayTemplateTarget) -> Self {
        Self {
            key: key.into(),
            display_name: None,
            target,
            is_default: false,
            settings: IndexMap::new(),
            tag: None,
        }
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn setting(mut self, key: impl Into<String>, setting: DisplaySetting) -> Self {
        self.settings.insert(key.into(), setting);
        self
    }

    #[must_use]
    pub fn default_template(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// A `{key, value}` pair as returned in a composition node's `displaySettings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettingEntry {
    pub key: String,
    pub value: String,
}

/// Converts the `displaySettings` list of a composition node into a map.
///
/// Later entries win when a key repeats.
pub fn parse_display_settings(entries: &[DisplaySettingEntry]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|entry| (entry.key.clone(), entry.value.clone()))
        .collect()
}
