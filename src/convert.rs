use std::collections::BTreeSet;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{CollectedValidationError, ConvertError};
use crate::formats::{Phase, Section, Template, Topic, TopicStatus};
use crate::table::{Row, Table};
use crate::validate::validate_table;

pub const DEFAULT_CATEGORY: &str = "general";

const PALETTE: [&str; 8] = [
    "#4287f5", "#3db063", "#f5a742", "#f54242", "#9c42f5", "#42c5f5", "#e67e22", "#7a7a7a",
];

/// Random RFC 4122 v4 identifier.
#[must_use]
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Phase color for the `i`-th distinct phase; cycles through the palette.
#[must_use]
pub fn color_by_index(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

/// Assigns one fresh identifier per distinct name, remembering first-seen order.
#[derive(Debug, Clone, Default)]
pub struct NameToIdMapper {
    ids: IndexMap<String, String>,
}

impl NameToIdMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create_id(&mut self, name: &str) -> &str {
        if !self.ids.contains_key(name) {
            self.ids.insert(name.to_owned(), generate_id());
        }
        &self.ids[name]
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ids.keys().map(String::as_str)
    }
}

/// How rows are matched to an existing topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TopicIdentity {
    /// A topic title names one topic across the whole file. A title that recurs
    /// under another phase or section keeps its first association and only
    /// gains tags.
    #[default]
    ByTitle,
    /// A topic is identified by phase, section and title together.
    BySection,
}

impl TopicIdentity {
    fn key(self, phase: &str, section: &str, topic: &str) -> String {
        match self {
            Self::ByTitle => topic.to_owned(),
            Self::BySection => serde_json::json!([phase, section, topic]).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub category: String,
    pub topic_identity: TopicIdentity,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_owned(),
            topic_identity: TopicIdentity::default(),
        }
    }
}

/// Converts CSV text with the default category and topic identity.
pub fn convert(text: &str, name: &str, description: &str) -> Result<Template, ConvertError> {
    convert_with(text, name, description, &ConvertOptions::default())
}

pub fn convert_with(
    text: &str,
    name: &str,
    description: &str,
    options: &ConvertOptions,
) -> Result<Template, ConvertError> {
    convert_bytes(text.as_bytes(), name, description, options)
}

pub fn convert_bytes(
    bytes: &[u8],
    name: &str,
    description: &str,
    options: &ConvertOptions,
) -> Result<Template, ConvertError> {
    let table = match Table::parse(bytes) {
        Ok(table) => table,
        Err(err) => {
            return Err(CollectedValidationError {
                errors: vec![err.to_string()],
            }
            .into());
        }
    };

    let report = validate_table(&table);
    for warning in &report.warnings {
        tracing::warn!("{warning}");
    }
    if !report.is_valid {
        return Err(CollectedValidationError {
            errors: report.errors,
        }
        .into());
    }
    if let Some(stats) = report.statistics {
        tracing::info!(
            rows = stats.total_rows,
            phases = stats.phase_count,
            sections = stats.section_count,
            topics = stats.topic_count,
            "csv validated"
        );
    }

    let mut ctx = ConversionContext::new(options.topic_identity);
    for row in table.rows() {
        ctx.push(&row);
    }

    let template = ctx.finish(name, description, &options.category);
    tracing::debug!(id = %template.id, summary = ?template.summary(), "template assembled");
    Ok(template)
}

/// Reads a CSV file and converts it.
pub fn convert_file(
    path: &Path,
    name: &str,
    description: &str,
    options: &ConvertOptions,
) -> Result<Template, ConvertError> {
    let bytes = std::fs::read(path).map_err(|source| ConvertError::Io {
        path: path.to_owned(),
        source,
    })?;
    convert_bytes(&bytes, name, description, options)
}

/// State threaded through a single conversion pass.
#[derive(Debug)]
struct ConversionContext {
    topic_identity: TopicIdentity,
    phase_ids: NameToIdMapper,
    section_ids: NameToIdMapper,
    topic_ids: NameToIdMapper,
    phases: IndexMap<String, Phase>,
    sections: IndexMap<String, Vec<Section>>,
    topics: IndexMap<String, Topic>,
    tags: BTreeSet<String>,
    next_topic_index: usize,
}

impl ConversionContext {
    fn new(topic_identity: TopicIdentity) -> Self {
        Self {
            topic_identity,
            phase_ids: NameToIdMapper::new(),
            section_ids: NameToIdMapper::new(),
            topic_ids: NameToIdMapper::new(),
            phases: IndexMap::new(),
            sections: IndexMap::new(),
            topics: IndexMap::new(),
            tags: BTreeSet::new(),
            next_topic_index: 1,
        }
    }

    fn push(&mut self, row: &Row<'_>) {
        let tag = row.get("tags").unwrap_or_default();
        let phase_name = row.get("phase").unwrap_or_default();
        let section_name = row.get("section").unwrap_or_default();
        let topic_name = row.get("topic").unwrap_or_default();

        let phase_id = self.phase_ids.get_or_create_id(phase_name).to_owned();
        let section_id = self.section_ids.get_or_create_id(section_name).to_owned();
        let topic_key = self
            .topic_identity
            .key(phase_name, section_name, topic_name);
        let topic_id = self.topic_ids.get_or_create_id(&topic_key).to_owned();

        if !self.phases.contains_key(&phase_id) {
            let color = color_by_index(self.phases.len());
            self.phases.insert(
                phase_id.clone(),
                Phase {
                    id: phase_id.clone(),
                    name: phase_name.to_owned(),
                    description: String::new(),
                    color: color.to_owned(),
                },
            );
        }

        // Section ids are keyed by name alone while section lists are kept per
        // phase. A section name that shows up again under another phase is
        // listed there too, sharing the id but carrying that phase's id and
        // its own 1-based position in that phase.
        let phase_sections = self.sections.entry(phase_id.clone()).or_default();
        if !phase_sections.iter().any(|s| s.id == section_id) {
            let index = phase_sections.len() + 1;
            phase_sections.push(Section {
                id: section_id.clone(),
                name: section_name.to_owned(),
                description: String::new(),
                phase_id: phase_id.clone(),
                index,
            });
        }

        if !self.topics.contains_key(&topic_id) {
            let index = self.next_topic_index;
            self.next_topic_index += 1;
            self.topics.insert(
                topic_id.clone(),
                Topic {
                    id: topic_id.clone(),
                    title: topic_name.to_owned(),
                    phase_id,
                    section_id,
                    extraction_prompt: row.get("prompt").unwrap_or_default().to_owned(),
                    status: TopicStatus::Pending,
                    error: None,
                    index,
                    tags: Vec::new(),
                },
            );
        }

        if tag.is_empty() {
            return;
        }
        if let Some(topic) = self.topics.get_mut(&topic_id)
            && !topic.tags.iter().any(|t| t == tag)
        {
            topic.tags.push(tag.to_owned());
        }
        self.tags.insert(tag.to_owned());
    }

    fn finish(mut self, name: &str, description: &str, category: &str) -> Template {
        let sections = self
            .phases
            .keys()
            .flat_map(|phase_id| self.sections.swap_remove(phase_id).unwrap_or_default())
            .collect::<Vec<_>>();

        Template {
            id: generate_id(),
            name: name.to_owned(),
            description: description.to_owned(),
            category: category.to_owned(),
            phases: self.phases.into_values().collect(),
            sections,
            topics: self.topics.into_values().collect(),
            relations: Vec::new(),
            reasonings: Vec::new(),
            tags: self.tags.into_iter().collect(),
        }
    }
}
