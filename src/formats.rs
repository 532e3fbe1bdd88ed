use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub phases: Vec<Phase>,
    pub sections: Vec<Section>,
    pub topics: Vec<Topic>,
    pub relations: Vec<serde_json::Value>,
    pub reasonings: Vec<serde_json::Value>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub description: String,
    pub phase_id: String,
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub phase_id: String,
    pub section_id: String,
    pub extraction_prompt: String,
    pub status: TopicStatus,
    pub error: Option<String>,
    pub index: usize,
    pub tags: Vec<String>,
}

/// Lifecycle state of a topic. Conversion only ever produces `Pending`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    #[default]
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSummary {
    pub phases: usize,
    pub sections: usize,
    pub topics: usize,
    pub tags: usize,
}

impl Template {
    #[must_use]
    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            phases: self.phases.len(),
            sections: self.sections.len(),
            topics: self.topics.len(),
            tags: self.tags.len(),
        }
    }
}
