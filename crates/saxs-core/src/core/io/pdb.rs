use crate::core::models::bead::TwoBeadSite;
use crate::core::models::residue::{ResidueError, ResidueType};
use crate::core::utils::identifiers::{electron_count, element_from_atom_name, is_backbone_atom};
use nalgebra::{Point3, Vector3};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Residue {residue} has no C-alpha atom")]
    MissingCAlpha { residue: String },
    #[error("Residue {residue} is not a standard amino acid: {source}")]
    NonStandardResidue {
        residue: String,
        source: ResidueError,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for an ATOM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdbAtom {
    pub name: String,
    pub element: Option<String>,
    pub position: Point3<f64>,
}

impl PdbAtom {
    fn electrons(&self) -> Option<u32> {
        self.element
            .clone()
            .or_else(|| element_from_atom_name(&self.name))
            .and_then(|element| electron_count(&element))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdbResidue {
    pub chain_id: char,
    pub number: isize,
    pub insertion_code: Option<char>,
    pub name: String,
    atoms: Vec<PdbAtom>,
}

impl PdbResidue {
    pub fn atoms(&self) -> &[PdbAtom] {
        &self.atoms
    }

    pub fn atom(&self, name: &str) -> Option<&PdbAtom> {
        self.atoms.iter().find(|atom| atom.name == name)
    }

    pub fn label(&self) -> String {
        match self.insertion_code {
            Some(code) => format!("{}:{}{} {}", self.chain_id, self.number, code, self.name),
            None => format!("{}:{} {}", self.chain_id, self.number, self.name),
        }
    }

    pub fn residue_type(&self) -> Result<ResidueType, PdbError> {
        self.name
            .parse()
            .map_err(|source| PdbError::NonStandardResidue {
                residue: self.label(),
                source,
            })
    }

    pub fn c_alpha(&self) -> Result<Point3<f64>, PdbError> {
        self.atom("CA")
            .map(|atom| atom.position)
            .ok_or_else(|| PdbError::MissingCAlpha {
                residue: self.label(),
            })
    }

    /// Electron-weighted centroid of the side-chain atoms, if the residue has any.
    pub fn side_chain_centre(&self) -> Option<Point3<f64>> {
        let mut weighted_sum = Vector3::zeros();
        let mut total_electrons = 0.0;
        for atom in self.atoms.iter().filter(|atom| !is_backbone_atom(&atom.name)) {
            let Some(electrons) = atom.electrons() else {
                warn!(
                    "Skipping atom '{}' of residue {} with unknown element in side-chain centre.",
                    atom.name,
                    self.label()
                );
                continue;
            };
            weighted_sum += atom.position.coords * electrons as f64;
            total_electrons += electrons as f64;
        }
        (total_electrons > 0.0).then(|| Point3::from(weighted_sum / total_electrons))
    }
}

/// Protein residues of the first model of a PDB file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbStructure {
    residues: Vec<PdbResidue>,
}

impl PdbStructure {
    /// Reads the `ATOM` records of the first model.
    ///
    /// Reading stops at the first `ENDMDL` or `END` record. `HETATM` records are ignored.
    /// Repeated atom names within a residue (alternate locations) and residue records that
    /// reappear after another residue are logged and skipped, keeping the first occurrence.
    pub fn read_from(reader: &mut impl BufRead) -> Result<Self, PdbError> {
        let mut residues: Vec<PdbResidue> = Vec::new();
        let mut seen_residues: HashSet<(char, isize, Option<char>)> = HashSet::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            match record_type {
                "ATOM" => {}
                "ENDMDL" | "END" => break,
                _ => continue,
            }

            if line.len() < 54 {
                return Err(PdbError::Parse {
                    line: line_num,
                    kind: PdbParseErrorKind::LineTooShort,
                });
            }

            let atom_name = slice_and_trim(&line, 12, 16);
            let res_name = slice_and_trim(&line, 17, 20);
            let chain_id = slice_and_trim(&line, 21, 22).chars().next().unwrap_or(' ');
            let res_seq_str = slice_and_trim(&line, 22, 26);
            let insertion_code = slice_and_trim(&line, 26, 27).chars().next();
            let element = slice_and_trim(&line, 76, 78);

            let number: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::InvalidInt {
                    columns: "23-26".into(),
                    value: res_seq_str.into(),
                },
            })?;
            let mut coords = [0.0; 3];
            for (axis, (start, columns)) in [(30, "31-38"), (38, "39-46"), (46, "47-54")]
                .into_iter()
                .enumerate()
            {
                let value_str = slice_and_trim(&line, start, start + 8);
                coords[axis] = value_str.parse().map_err(|_| PdbError::Parse {
                    line: line_num,
                    kind: PdbParseErrorKind::InvalidFloat {
                        columns: columns.into(),
                        value: value_str.into(),
                    },
                })?;
            }

            let key = (chain_id, number, insertion_code);
            let continues_last = residues.last().is_some_and(|r| {
                (r.chain_id, r.number, r.insertion_code) == key && r.name == res_name
            });
            if !continues_last {
                if !seen_residues.insert(key) {
                    warn!(
                        "Line {}: duplicate record for residue {}:{} {}; keeping the first one.",
                        line_num, chain_id, number, res_name
                    );
                    continue;
                }
                residues.push(PdbResidue {
                    chain_id,
                    number,
                    insertion_code,
                    name: res_name.to_string(),
                    atoms: Vec::new(),
                });
            }

            let Some(residue) = residues.last_mut() else {
                continue;
            };
            if residue.atom(atom_name).is_some() {
                warn!(
                    "Line {}: duplicate atom '{}' in residue {}; keeping the first one.",
                    line_num,
                    atom_name,
                    residue.label()
                );
                continue;
            }
            residue.atoms.push(PdbAtom {
                name: atom_name.to_string(),
                element: (!element.is_empty()).then(|| element.to_string()),
                position: Point3::new(coords[0], coords[1], coords[2]),
            });
        }

        if residues.is_empty() {
            return Err(PdbError::MissingRecord("ATOM records".into()));
        }
        debug!("Read {} residues from PDB input.", residues.len());
        Ok(Self { residues })
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, PdbError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    pub fn residues(&self) -> &[PdbResidue] {
        &self.residues
    }

    pub fn sequence(&self) -> Result<Vec<ResidueType>, PdbError> {
        self.residues.iter().map(PdbResidue::residue_type).collect()
    }

    /// One bead per residue, at the C-alpha atom.
    pub fn c_alpha_sites(&self) -> Result<Vec<Point3<f64>>, PdbError> {
        self.residues.iter().map(PdbResidue::c_alpha).collect()
    }

    /// Backbone (C-alpha) and side-chain centre-of-electrons sites per residue.
    ///
    /// Residues without side-chain atoms (glycine, truncated residues) place their
    /// side-chain bead on the C-alpha atom.
    pub fn two_bead_sites(&self) -> Result<Vec<TwoBeadSite>, PdbError> {
        self.residues
            .iter()
            .map(|residue| {
                let backbone = residue.c_alpha()?;
                let side_chain = residue.side_chain_centre().unwrap_or_else(|| {
                    if residue.name != "GLY" {
                        warn!(
                            "Residue {} has no side-chain atoms; using its C-alpha position.",
                            residue.label()
                        );
                    }
                    backbone
                });
                Ok(TwoBeadSite::new(backbone, side_chain))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TOLERANCE: f64 = 1e-9;

    fn atom_line(serial: usize, name: &str, res: &str, chain: char, seq: isize, xyz: [f64; 3], element: &str) -> String {
        format!(
            "ATOM  {:>5} {:<4} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00 20.00          {:>2}",
            serial, name, res, chain, seq, xyz[0], xyz[1], xyz[2], element
        )
    }

    fn read(content: &str) -> Result<PdbStructure, PdbError> {
        PdbStructure::read_from(&mut Cursor::new(content.as_bytes()))
    }

    fn two_residue_pdb() -> String {
        [
            "HEADER    TEST".to_string(),
            atom_line(1, "N", "GLY", 'A', 1, [0.0, 0.0, 0.0], "N"),
            atom_line(2, "CA", "GLY", 'A', 1, [1.0, 0.0, 0.0], "C"),
            atom_line(3, "C", "GLY", 'A', 1, [2.0, 0.0, 0.0], "C"),
            atom_line(4, "N", "SER", 'A', 2, [3.0, 0.0, 0.0], "N"),
            atom_line(5, "CA", "SER", 'A', 2, [4.0, 1.0, 0.0], "C"),
            atom_line(6, "CB", "SER", 'A', 2, [4.0, 2.0, 0.0], "C"),
            atom_line(7, "OG", "SER", 'A', 2, [4.0, 2.0, 1.4], "O"),
            "HETATM    8  O   HOH A 101      10.000  10.000  10.000  1.00 20.00           O".to_string(),
            "END".to_string(),
        ]
        .join("\n")
    }

    #[test]
    fn reads_residues_sequence_and_c_alpha_sites() {
        let structure = read(&two_residue_pdb()).unwrap();
        assert_eq!(structure.residues().len(), 2);
        assert_eq!(
            structure.sequence().unwrap(),
            vec![ResidueType::Glycine, ResidueType::Serine]
        );
        let sites = structure.c_alpha_sites().unwrap();
        assert_eq!(sites, vec![Point3::new(1.0, 0.0, 0.0), Point3::new(4.0, 1.0, 0.0)]);
    }

    #[test]
    fn two_bead_sites_use_electron_weighted_side_chain_centre() {
        let structure = read(&two_residue_pdb()).unwrap();
        let sites = structure.two_bead_sites().unwrap();

        assert_eq!(sites[0].backbone, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(sites[0].side_chain, sites[0].backbone);

        let expected_z = 8.0 * 1.4 / 14.0;
        let centre = sites[1].side_chain;
        assert!((centre.x - 4.0).abs() < TOLERANCE);
        assert!((centre.y - 2.0).abs() < TOLERANCE);
        assert!((centre.z - expected_z).abs() < TOLERANCE);
    }

    #[test]
    fn element_is_guessed_from_atom_name_when_column_is_blank() {
        let content = [
            atom_line(1, "CA", "SER", 'A', 1, [0.0, 0.0, 0.0], ""),
            atom_line(2, "CB", "SER", 'A', 1, [0.0, 0.0, 0.0], ""),
            atom_line(3, "OG", "SER", 'A', 1, [0.0, 0.0, 1.4], ""),
        ]
        .join("\n");
        let structure = read(&content).unwrap();
        let centre = structure.residues()[0].side_chain_centre().unwrap();
        assert!((centre.z - 8.0 * 1.4 / 14.0).abs() < TOLERANCE);
    }

    #[test]
    fn reading_stops_after_first_model() {
        let content = [
            "MODEL        1".to_string(),
            atom_line(1, "CA", "ALA", 'A', 1, [0.0, 0.0, 0.0], "C"),
            "ENDMDL".to_string(),
            "MODEL        2".to_string(),
            atom_line(1, "CA", "ALA", 'A', 1, [5.0, 5.0, 5.0], "C"),
            atom_line(2, "CA", "ALA", 'A', 2, [6.0, 5.0, 5.0], "C"),
            "ENDMDL".to_string(),
        ]
        .join("\n");
        let structure = read(&content).unwrap();
        assert_eq!(structure.residues().len(), 1);
        assert_eq!(
            structure.c_alpha_sites().unwrap(),
            vec![Point3::new(0.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn duplicate_atoms_and_residues_keep_first_occurrence() {
        let content = [
            atom_line(1, "CA", "ALA", 'A', 1, [0.0, 0.0, 0.0], "C"),
            atom_line(2, "CA", "ALA", 'A', 1, [9.0, 9.0, 9.0], "C"),
            atom_line(3, "CA", "ALA", 'A', 2, [3.8, 0.0, 0.0], "C"),
            atom_line(4, "CA", "ALA", 'A', 1, [7.0, 7.0, 7.0], "C"),
        ]
        .join("\n");
        let structure = read(&content).unwrap();
        assert_eq!(
            structure.c_alpha_sites().unwrap(),
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(3.8, 0.0, 0.0)]
        );
    }

    #[test]
    fn missing_c_alpha_is_reported() {
        let content = atom_line(1, "N", "ALA", 'B', 7, [0.0, 0.0, 0.0], "N");
        let structure = read(&content).unwrap();
        match structure.c_alpha_sites() {
            Err(PdbError::MissingCAlpha { residue }) => assert_eq!(residue, "B:7 ALA"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn non_standard_residue_fails_sequence_extraction() {
        let content = atom_line(1, "CA", "MSE", 'A', 1, [0.0, 0.0, 0.0], "C");
        let structure = read(&content).unwrap();
        assert!(matches!(
            structure.sequence(),
            Err(PdbError::NonStandardResidue { .. })
        ));
    }

    #[test]
    fn malformed_records_are_rejected() {
        assert!(matches!(
            read("ATOM      1  CA  ALA A   1"),
            Err(PdbError::Parse {
                kind: PdbParseErrorKind::LineTooShort,
                ..
            })
        ));

        let bad_float = atom_line(1, "CA", "ALA", 'A', 1, [0.0, 0.0, 0.0], "C")
            .replacen("   0.000", "   x.xxx", 1);
        assert!(matches!(
            read(&bad_float),
            Err(PdbError::Parse {
                kind: PdbParseErrorKind::InvalidFloat { .. },
                ..
            })
        ));
    }

    #[test]
    fn file_without_atoms_is_rejected() {
        assert!(matches!(
            read("HEADER    EMPTY\nEND\n"),
            Err(PdbError::MissingRecord(_))
        ));
    }
}
