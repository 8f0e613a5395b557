use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::CymolError;

/// A PDB structure identifier, either the classic four-character code or the
/// extended `PDB_` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StructureId(String);

impl StructureId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StructureId {
    type Err = CymolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase();
        let is_alnum = |code: &str| !code.is_empty() && code.chars().all(|ch| ch.is_ascii_alphanumeric());
        let is_valid = match normalized.strip_prefix("PDB_") {
            Some(code) => code.len() == 8 && is_alnum(code),
            None => normalized.len() == 4 && is_alnum(&normalized),
        };
        if !is_valid {
            return Err(CymolError::InvalidStructureId(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

impl TryFrom<String> for StructureId {
    type Error = CymolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StructureId> for String {
    fn from(id: StructureId) -> Self {
        id.0
    }
}

/// Inclusion filter for the chain-type clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum TriState {
    #[serde(rename = "Y", alias = "yes")]
    Yes,
    #[serde(rename = "N", alias = "no")]
    No,
    #[default]
    #[serde(rename = "?", alias = "unspecified")]
    Unspecified,
}

impl TriState {
    pub fn as_flag(self) -> &'static str {
        match self {
            TriState::Yes => "Y",
            TriState::No => "N",
            TriState::Unspecified => "?",
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MoleculeKind {
    Dna,
    Rna,
    Protein,
}

impl fmt::Display for MoleculeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoleculeKind::Dna => write!(f, "DNA"),
            MoleculeKind::Rna => write!(f, "RNA"),
            MoleculeKind::Protein => write!(f, "protein"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}
