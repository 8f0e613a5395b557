use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::MoleculeKind;
use crate::error::CymolError;
use crate::formats::{GenbankRecord, Molecule, RecordParser, TertiaryStructure};

/// Text E-utilities embeds in an otherwise successful reply when it is overloaded.
pub const UNAVAILABLE_MARKER: &str = "Temporarily Unavailable";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", content = "records", rename_all = "lowercase")]
pub enum SequencePayload {
    Fasta(Vec<Molecule>),
    GenBank(GenbankRecord),
}

pub fn structure_source(id: &str) -> String {
    format!("db:structure:{id}")
}

pub fn tag_provenance(structures: Vec<TertiaryStructure>, source: &str) -> Vec<TertiaryStructure> {
    structures
        .into_iter()
        .map(|mut structure| {
            structure.source = Some(source.to_string());
            structure.molecule.source = Some(source.to_string());
            structure
        })
        .collect()
}

pub fn normalize_structures<P: RecordParser>(
    parser: &P,
    id: &str,
    text: &str,
) -> Result<Vec<TertiaryStructure>, CymolError> {
    let structures = parser.parse_pdb(text).map_err(|err| CymolError::Parse {
        id: id.to_string(),
        message: err.to_string(),
    })?;
    Ok(tag_provenance(structures, &structure_source(id)))
}

pub fn is_unavailable(text: &str) -> bool {
    text.contains(UNAVAILABLE_MARKER)
}

pub fn normalize_sequences<P: RecordParser>(
    parser: &P,
    database: &str,
    return_type: &str,
    label: &str,
    text: &str,
) -> Result<SequencePayload, CymolError> {
    if is_unavailable(text) {
        return Err(CymolError::ServiceUnavailable);
    }
    let parse_error = |err: crate::formats::FormatError| CymolError::Parse {
        id: label.to_string(),
        message: err.to_string(),
    };

    match (database, return_type) {
        ("nucleotide", "fasta") => parser
            .parse_fasta(text, MoleculeKind::Dna)
            .map(SequencePayload::Fasta)
            .map_err(parse_error),
        (_, "gb") => {
            let record = parser.parse_genbank(text).map_err(parse_error)?;
            if record.organism.is_none() {
                warn!(locus = %record.locus, "GenBank record has no organism");
                debug!(content = %text, "raw GenBank content");
            }
            Ok(SequencePayload::GenBank(record))
        }
        _ => Err(CymolError::UnsupportedCombination {
            database: database.to_string(),
            return_type: return_type.to_string(),
        }),
    }
}
