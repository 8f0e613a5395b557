mod fasta;
mod genbank;
mod pdb;

use serde::Serialize;
use thiserror::Error;

use crate::domain::MoleculeKind;

pub use fasta::parse_fasta;
pub use genbank::parse_genbank;
pub use pdb::parse_pdb;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("no {0} found")]
    NotFound(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Molecule {
    pub name: String,
    pub kind: MoleculeKind,
    pub sequence: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Molecule {
    pub fn new(name: impl Into<String>, kind: MoleculeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            sequence: String::new(),
            source: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atom {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Residue {
    pub name: String,
    pub number: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insertion_code: Option<char>,
    pub atoms: Vec<Atom>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TertiaryStructure {
    pub chain: String,
    pub molecule: Molecule,
    pub residues: Vec<Residue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenbankRecord {
    pub locus: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organism: Option<String>,
    pub molecule: Molecule,
}

pub trait RecordParser: Send + Sync {
    fn parse_pdb(&self, text: &str) -> Result<Vec<TertiaryStructure>, FormatError>;
    fn parse_fasta(&self, text: &str, kind: MoleculeKind) -> Result<Vec<Molecule>, FormatError>;
    fn parse_genbank(&self, text: &str) -> Result<GenbankRecord, FormatError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlatFileParser;

impl RecordParser for FlatFileParser {
    fn parse_pdb(&self, text: &str) -> Result<Vec<TertiaryStructure>, FormatError> {
        parse_pdb(text)
    }

    fn parse_fasta(&self, text: &str, kind: MoleculeKind) -> Result<Vec<Molecule>, FormatError> {
        parse_fasta(text, kind)
    }

    fn parse_genbank(&self, text: &str) -> Result<GenbankRecord, FormatError> {
        parse_genbank(text)
    }
}

/// Half-open, 0-based column range of a fixed-width line, clamped to the line
/// length and to char boundaries.
pub(crate) fn columns(line: &str, start: usize, end: usize) -> &str {
    let start = floor_boundary(line, start);
    let end = floor_boundary(line, end).max(start);
    &line[start..end]
}

fn floor_boundary(line: &str, index: usize) -> usize {
    let mut index = index.min(line.len());
    while !line.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_clamp_to_line() {
        assert_eq!(columns("TITLE", 0, 6), "TITLE");
        assert_eq!(columns("AB", 10, 70), "");
        assert_eq!(columns("", 0, 6), "");
    }

    #[test]
    fn columns_respect_char_boundaries() {
        assert_eq!(columns("ÅÅÅ", 1, 3), "Å");
    }
}
