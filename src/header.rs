use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::formats::columns;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRecord {
    pub id: String,
    pub title: String,
    pub date: String,
    pub authors: String,
}

impl HeaderRecord {
    /// Deposition date from the HEADER record (`DD-MON-YY`).
    pub fn deposition_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%d-%b-%y").ok()
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    title: String,
    authors: String,
    date: Option<String>,
}

impl Accumulator {
    fn fold_line(self, line: &str) -> Self {
        match columns(line, 0, 6).trim() {
            "HEADER" if self.date.is_none() => Self {
                date: Some(columns(line, 50, 59).trim().to_string()),
                ..self
            },
            "TITLE" => Self {
                title: append_segment(self.title, line),
                ..self
            },
            "AUTHOR" => Self {
                authors: append_segment(self.authors, line),
                ..self
            },
            _ => self,
        }
    }
}

/// Extracts title, deposition date and authors from the fixed-column header
/// records of a PDB file. Missing records leave the field empty.
pub fn extract_header(id: &str, text: &str) -> HeaderRecord {
    let acc = text
        .split('\n')
        .fold(Accumulator::default(), Accumulator::fold_line);
    HeaderRecord {
        id: id.to_string(),
        title: acc.title.trim().to_string(),
        date: acc.date.unwrap_or_default(),
        authors: acc.authors.trim().to_string(),
    }
}

fn append_segment(mut buffer: String, line: &str) -> String {
    buffer.push_str(columns(line, 10, 70).trim());
    buffer.push(' ');
    buffer
}
