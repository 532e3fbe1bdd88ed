/// A parsed CSV document: trimmed headers plus trimmed data rows.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<csv::StringRecord>,
}

/// Why a CSV document could not be read as a table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("CSV parse error: line {line} has {found} columns, expected {expected}")]
    RaggedRow {
        line: u64,
        expected: u64,
        found: u64,
    },
    #[error("CSV parse error: invalid UTF-8 on line {line}")]
    InvalidEncoding { line: u64 },
    #[error("CSV parse error: {0}")]
    Malformed(String),
}

impl From<csv::Error> for ParseFailure {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line()).unwrap_or(0);
        match err.kind() {
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => Self::RaggedRow {
                line,
                expected: *expected_len,
                found: *len,
            },
            csv::ErrorKind::Utf8 { .. } => Self::InvalidEncoding { line },
            _ => Self::Malformed(err.to_string()),
        }
    }
}

impl Table {
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseFailure> {
        // Flexible so whitespace-only lines reach us as one empty field;
        // column counts are checked below.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_owned())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if is_blank(&record) {
                continue;
            }
            if record.len() != headers.len() {
                return Err(ParseFailure::RaggedRow {
                    line: record.position().map(|pos| pos.line()).unwrap_or(0),
                    expected: headers.len() as u64,
                    found: record.len() as u64,
                });
            }
            rows.push(record);
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |record| Row {
            table: self,
            record,
        })
    }

    /// A repeated header resolves to its last column.
    fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().rposition(|h| h == column)
    }

    /// Header names that appear more than once, in first-seen order.
    pub fn duplicate_headers(&self) -> Vec<&str> {
        let mut duplicates = Vec::new();
        for (idx, header) in self.headers.iter().enumerate() {
            if self.headers[..idx].contains(header) && !duplicates.contains(&header.as_str()) {
                duplicates.push(header.as_str());
            }
        }
        duplicates
    }
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}

/// One data row, addressed by header name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    record: &'a csv::StringRecord,
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.table.column_index(column)?;
        self.record.get(idx)
    }

    /// Like [`Row::get`], but treats an empty cell as absent.
    pub fn non_empty(&self, column: &str) -> Option<&'a str> {
        self.get(column).filter(|v| !v.is_empty())
    }
}
