use std::io::{self, Write};

use serde::Serialize;

use crate::formats::TertiaryStructure;
use crate::header::HeaderRecord;
use crate::normalize::SequencePayload;
use crate::query::SearchResult;

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_structures(structures: &[TertiaryStructure]) -> io::Result<()> {
        Self::print_json(&structures)
    }

    pub fn print_header(header: &HeaderRecord) -> io::Result<()> {
        Self::print_json(header)
    }

    pub fn print_search(result: &SearchResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_sequences(payload: &SequencePayload) -> io::Result<()> {
        Self::print_json(payload)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
