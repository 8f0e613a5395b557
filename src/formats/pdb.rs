use super::{Atom, FormatError, Molecule, Residue, TertiaryStructure, columns};
use crate::domain::MoleculeKind;

const WATER: &str = "HOH";

const STANDARD_RESIDUES: &[&str] = &[
    "A", "C", "G", "U", "I", "DA", "DC", "DG", "DT", "DI", "DU", "ALA", "ARG", "ASN", "ASP",
    "CYS", "GLN", "GLU", "GLY", "HIS", "ILE", "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR",
    "TRP", "TYR", "VAL", "SEC", "PYL",
];

// Modified residue -> parent residue.
const MODIFIED_RESIDUES: &[(&str, &str)] = &[
    ("MSE", "MET"),
    ("SEP", "SER"),
    ("TPO", "THR"),
    ("PTR", "TYR"),
    ("HYP", "PRO"),
    ("MLY", "LYS"),
    ("CSO", "CYS"),
    ("PSU", "U"),
    ("5MU", "U"),
    ("H2U", "U"),
    ("4SU", "U"),
    ("OMU", "U"),
    ("5MC", "C"),
    ("OMC", "C"),
    ("OMG", "G"),
    ("2MG", "G"),
    ("M2G", "G"),
    ("7MG", "G"),
    ("1MA", "A"),
];

/// Reads the polymer records of the first model, one structure per chain in
/// order of first appearance. Ions and ligands are skipped.
pub fn parse_pdb(text: &str) -> Result<Vec<TertiaryStructure>, FormatError> {
    let mut chains: Vec<(String, Vec<Residue>)> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let hetero = match columns(line, 0, 6).trim() {
            "ENDMDL" => break,
            "ATOM" => false,
            "HETATM" => true,
            _ => continue,
        };

        let residue_name = columns(line, 17, 20).trim();
        if residue_name == WATER || (hetero && parent_residue(residue_name).is_none()) {
            continue;
        }
        let atom = Atom {
            name: columns(line, 12, 16).trim().to_string(),
            x: coordinate(line, 30, 38, line_no)?,
            y: coordinate(line, 38, 46, line_no)?,
            z: coordinate(line, 46, 54, line_no)?,
        };
        let number = columns(line, 22, 26)
            .trim()
            .parse::<i32>()
            .map_err(|_| malformed(line_no, "invalid residue sequence number"))?;
        let insertion_code = columns(line, 26, 27).chars().find(|ch| !ch.is_whitespace());
        let chain_id = match columns(line, 21, 22).trim() {
            "" => "A",
            id => id,
        };

        let slot = match chains.iter().position(|(id, _)| id == chain_id) {
            Some(slot) => slot,
            None => {
                chains.push((chain_id.to_string(), Vec::new()));
                chains.len() - 1
            }
        };
        let residues = &mut chains[slot].1;
        match residues.last_mut() {
            Some(residue)
                if residue.number == number && residue.insertion_code == insertion_code =>
            {
                residue.atoms.push(atom);
            }
            _ => residues.push(Residue {
                name: residue_name.to_string(),
                number,
                insertion_code,
                atoms: vec![atom],
            }),
        }
    }

    if chains.is_empty() {
        return Err(FormatError::NotFound("ATOM records"));
    }

    Ok(chains
        .into_iter()
        .map(|(chain, residues)| {
            let kind = infer_kind(&residues);
            let mut molecule = Molecule::new(chain.clone(), kind);
            molecule.sequence = residues
                .iter()
                .map(|residue| one_letter(&residue.name, kind))
                .collect();
            TertiaryStructure {
                chain,
                molecule,
                residues,
                source: None,
            }
        })
        .collect())
}

fn coordinate(line: &str, start: usize, end: usize, line_no: usize) -> Result<f64, FormatError> {
    columns(line, start, end)
        .trim()
        .parse::<f64>()
        .map_err(|_| malformed(line_no, "invalid coordinate"))
}

fn malformed(line: usize, message: &str) -> FormatError {
    FormatError::Malformed {
        line,
        message: message.to_string(),
    }
}

fn parent_residue(name: &str) -> Option<&'static str> {
    STANDARD_RESIDUES
        .iter()
        .find(|standard| **standard == name)
        .copied()
        .or_else(|| {
            MODIFIED_RESIDUES
                .iter()
                .find(|(modified, _)| *modified == name)
                .map(|(_, parent)| *parent)
        })
}

fn infer_kind(residues: &[Residue]) -> MoleculeKind {
    let (mut rna, mut dna, mut protein) = (0usize, 0usize, 0usize);
    for residue in residues {
        match parent_residue(&residue.name).unwrap_or(residue.name.as_str()) {
            "A" | "C" | "G" | "U" | "I" => rna += 1,
            "DA" | "DC" | "DG" | "DT" | "DI" | "DU" => dna += 1,
            _ => protein += 1,
        }
    }
    if rna >= dna && rna >= protein && rna > 0 {
        MoleculeKind::Rna
    } else if dna >= protein && dna > 0 {
        MoleculeKind::Dna
    } else {
        MoleculeKind::Protein
    }
}

fn one_letter(residue: &str, kind: MoleculeKind) -> char {
    let residue = parent_residue(residue).unwrap_or(residue);
    match kind {
        MoleculeKind::Rna | MoleculeKind::Dna => match residue.trim_start_matches('D') {
            "A" => 'A',
            "C" => 'C',
            "G" => 'G',
            "U" => 'U',
            "T" => 'T',
            _ => 'N',
        },
        MoleculeKind::Protein => match residue {
            "ALA" => 'A',
            "ARG" => 'R',
            "ASN" => 'N',
            "ASP" => 'D',
            "CYS" => 'C',
            "GLN" => 'Q',
            "GLU" => 'E',
            "GLY" => 'G',
            "HIS" => 'H',
            "ILE" => 'I',
            "LEU" => 'L',
            "LYS" => 'K',
            "MET" => 'M',
            "PHE" => 'F',
            "PRO" => 'P',
            "SER" => 'S',
            "THR" => 'T',
            "TRP" => 'W',
            "TYR" => 'Y',
            "VAL" => 'V',
            "SEC" => 'U',
            "PYL" => 'O',
            _ => 'X',
        },
    }
}
