use std::sync::LazyLock;

use regex::Regex;

use super::{FormatError, GenbankRecord, Molecule};
use crate::domain::MoleculeKind;

static LOCUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^LOCUS\s+(\S+)(?:\s+\d+\s+(bp|aa)(?:\s+(\S+))?)?").expect("valid LOCUS regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Definition,
    Origin,
    Other,
}

/// Parses the first record of a GenBank flat file.
pub fn parse_genbank(text: &str) -> Result<GenbankRecord, FormatError> {
    let mut record: Option<GenbankRecord> = None;
    let mut section = Section::Other;

    for line in text.lines() {
        if line.starts_with("//") {
            break;
        }
        if let Some(caps) = LOCUS_RE.captures(line) {
            let locus = caps[1].to_string();
            let kind = match (caps.get(2).map(|m| m.as_str()), caps.get(3).map(|m| m.as_str())) {
                (Some("aa"), _) => MoleculeKind::Protein,
                (_, Some(mol_type)) if mol_type.contains("RNA") => MoleculeKind::Rna,
                _ => MoleculeKind::Dna,
            };
            record = Some(GenbankRecord {
                locus: locus.clone(),
                accession: None,
                definition: None,
                organism: None,
                molecule: Molecule::new(locus, kind),
            });
            section = Section::Other;
            continue;
        }
        let Some(current) = record.as_mut() else {
            continue;
        };

        let is_keyword_line = line.chars().next().is_some_and(|ch| !ch.is_whitespace());
        if is_keyword_line {
            let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let rest = rest.trim();
            section = match keyword {
                "DEFINITION" => {
                    current.definition = Some(rest.to_string());
                    Section::Definition
                }
                "ACCESSION" => {
                    current.accession = rest.split_whitespace().next().map(str::to_string);
                    Section::Other
                }
                "ORIGIN" => Section::Origin,
                _ => Section::Other,
            };
            continue;
        }

        let trimmed = line.trim();
        if let Some(organism) = trimmed.strip_prefix("ORGANISM") {
            current.organism = Some(organism.trim().to_string());
            section = Section::Other;
            continue;
        }
        match section {
            Section::Definition => {
                if let Some(definition) = current.definition.as_mut() {
                    definition.push(' ');
                    definition.push_str(trimmed);
                }
            }
            Section::Origin => current.molecule.sequence.extend(
                trimmed
                    .chars()
                    .filter(|ch| ch.is_ascii_alphabetic())
                    .map(|ch| ch.to_ascii_uppercase()),
            ),
            Section::Other => {}
        }
    }

    record.ok_or(FormatError::NotFound("LOCUS line"))
}
