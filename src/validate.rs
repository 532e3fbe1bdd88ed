use std::collections::HashSet;

use serde::Serialize;

use crate::table::Table;

pub const REQUIRED_COLUMNS: [&str; 3] = ["phase", "section", "topic"];
pub const OPTIONAL_COLUMNS: [&str; 2] = ["prompt", "tags"];

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_rows: usize,
    pub phase_count: usize,
    pub section_count: usize,
    pub topic_count: usize,
}

impl ValidationResult {
    fn failed(error: String) -> Self {
        Self {
            is_valid: false,
            errors: vec![error],
            warnings: Vec::new(),
            statistics: None,
        }
    }
}

pub fn validate(text: &str) -> ValidationResult {
    validate_bytes(text.as_bytes())
}

pub fn validate_bytes(bytes: &[u8]) -> ValidationResult {
    match Table::parse(bytes) {
        Ok(table) => validate_table(&table),
        Err(err) => ValidationResult::failed(err.to_string()),
    }
}

/// Structural and per-row checks over an already parsed table.
pub fn validate_table(table: &Table) -> ValidationResult {
    if table.is_empty() {
        return ValidationResult::failed("CSV contains no data rows".to_owned());
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for column in REQUIRED_COLUMNS {
        if !table.has_column(column) {
            errors.push(format!("Missing required column: {column}"));
        }
    }

    let unknown = table
        .headers()
        .iter()
        .map(String::as_str)
        .filter(|h| !REQUIRED_COLUMNS.contains(h) && !OPTIONAL_COLUMNS.contains(h))
        .collect::<Vec<_>>();
    if !unknown.is_empty() {
        warnings.push(format!(
            "Unrecognized columns will be ignored: {}",
            unknown.join(", ")
        ));
    }

    let duplicates = table.duplicate_headers();
    if !duplicates.is_empty() {
        warnings.push(format!(
            "Duplicate columns, the last one is used: {}",
            duplicates.join(", ")
        ));
    }

    let mut phases = HashSet::new();
    let mut sections = HashSet::new();
    let mut topics = HashSet::new();

    for (idx, row) in table.rows().enumerate() {
        // Row 1 is the header line.
        let line = idx + 2;

        for (field, seen) in [
            ("phase", &mut phases),
            ("section", &mut sections),
            ("topic", &mut topics),
        ] {
            match row.non_empty(field) {
                Some(value) => {
                    seen.insert(value);
                }
                None => errors.push(format!("Row {line}: missing required field '{field}'")),
            }
        }

        if row.non_empty("prompt").is_none() {
            warnings.push(format!("Row {line}: prompt is empty"));
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        statistics: Some(Statistics {
            total_rows: table.len(),
            phase_count: phases.len(),
            section_count: sections.len(),
            topic_count: topics.len(),
        }),
    }
}
