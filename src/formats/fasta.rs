use super::{FormatError, Molecule};
use crate::domain::MoleculeKind;

pub fn parse_fasta(text: &str, kind: MoleculeKind) -> Result<Vec<Molecule>, FormatError> {
    let mut molecules: Vec<Molecule> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            molecules.push(Molecule::new(header.trim(), kind));
            continue;
        }
        let Some(current) = molecules.last_mut() else {
            return Err(FormatError::Malformed {
                line: index + 1,
                message: "sequence data before the first header".to_string(),
            });
        };
        current
            .sequence
            .extend(line.chars().filter(|ch| !ch.is_whitespace()));
    }
    Ok(molecules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_records() {
        let text = ">NR_024570.1 Homo sapiens RNU1\nATACTTACCTG\nGCAGGGGAG\n\n>second\nACGT\n";
        let molecules = parse_fasta(text, MoleculeKind::Dna).unwrap();
        assert_eq!(molecules.len(), 2);
        assert_eq!(molecules[0].name, "NR_024570.1 Homo sapiens RNU1");
        assert_eq!(molecules[0].sequence, "ATACTTACCTGGCAGGGGAG");
        assert_eq!(molecules[0].kind, MoleculeKind::Dna);
        assert_eq!(molecules[1].sequence, "ACGT");
    }

    #[test]
    fn empty_text_has_no_molecules() {
        assert!(parse_fasta("", MoleculeKind::Dna).unwrap().is_empty());
    }

    #[test]
    fn sequence_without_header_is_rejected() {
        let err = parse_fasta("ACGT\n>late\n", MoleculeKind::Dna).unwrap_err();
        assert_eq!(
            err,
            FormatError::Malformed {
                line: 1,
                message: "sequence data before the first header".to_string(),
            }
        );
    }
}
