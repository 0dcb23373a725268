use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A node in the standard section hierarchy.
///
/// Sections either hold sub-sections or questions, never both, so
/// `question_count` is zero for every node with children.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SectionNode {
    pub id: String,
    pub section_number: String,
    pub title: String,
    #[serde(default)]
    pub children: Vec<SectionNode>,
    #[serde(default)]
    pub question_count: u32,
}

impl SectionNode {
    /// Build a leaf section holding `question_count` questions.
    #[must_use]
    pub fn leaf(
        id: impl Into<String>,
        section_number: impl Into<String>,
        title: impl Into<String>,
        question_count: u32,
    ) -> Self {
        Self {
            id: id.into(),
            section_number: section_number.into(),
            title: title.into(),
            children: Vec::new(),
            question_count,
        }
    }

    /// Build a parent section over `children`.
    #[must_use]
    pub fn branch(
        id: impl Into<String>,
        section_number: impl Into<String>,
        title: impl Into<String>,
        children: Vec<Self>,
    ) -> Self {
        Self {
            id: id.into(),
            section_number: section_number.into(),
            title: title.into(),
            children,
            question_count: 0,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
