use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the 20 standard amino acids.
///
/// The discriminants follow the column order of the tabulated form factors
/// (ALA, CYS, ASP, ... TYR), so [`ResidueType::index`] can address table columns directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResidueType {
    Alanine,       // ALA, A
    Cysteine,      // CYS, C
    AsparticAcid,  // ASP, D
    GlutamicAcid,  // GLU, E
    Phenylalanine, // PHE, F
    Glycine,       // GLY, G
    Histidine,     // HIS, H
    Isoleucine,    // ILE, I
    Lysine,        // LYS, K
    Leucine,       // LEU, L
    Methionine,    // MET, M
    Asparagine,    // ASN, N
    Proline,       // PRO, P
    Glutamine,     // GLN, Q
    Arginine,      // ARG, R
    Serine,        // SER, S
    Threonine,     // THR, T
    Valine,        // VAL, V
    Tryptophan,    // TRP, W
    Tyrosine,      // TYR, Y
}

static THREE_LETTER_CODES: Map<&'static str, ResidueType> = phf_map! {
    "ALA" => ResidueType::Alanine,
    "CYS" => ResidueType::Cysteine,
    "ASP" => ResidueType::AsparticAcid,
    "GLU" => ResidueType::GlutamicAcid,
    "PHE" => ResidueType::Phenylalanine,
    "GLY" => ResidueType::Glycine,
    "HIS" => ResidueType::Histidine,
    "ILE" => ResidueType::Isoleucine,
    "LYS" => ResidueType::Lysine,
    "LEU" => ResidueType::Leucine,
    "MET" => ResidueType::Methionine,
    "ASN" => ResidueType::Asparagine,
    "PRO" => ResidueType::Proline,
    "GLN" => ResidueType::Glutamine,
    "ARG" => ResidueType::Arginine,
    "SER" => ResidueType::Serine,
    "THR" => ResidueType::Threonine,
    "VAL" => ResidueType::Valine,
    "TRP" => ResidueType::Tryptophan,
    "TYR" => ResidueType::Tyrosine,
};

static ONE_LETTER_CODES: Map<&'static str, ResidueType> = phf_map! {
    "A" => ResidueType::Alanine,
    "C" => ResidueType::Cysteine,
    "D" => ResidueType::AsparticAcid,
    "E" => ResidueType::GlutamicAcid,
    "F" => ResidueType::Phenylalanine,
    "G" => ResidueType::Glycine,
    "H" => ResidueType::Histidine,
    "I" => ResidueType::Isoleucine,
    "K" => ResidueType::Lysine,
    "L" => ResidueType::Leucine,
    "M" => ResidueType::Methionine,
    "N" => ResidueType::Asparagine,
    "P" => ResidueType::Proline,
    "Q" => ResidueType::Glutamine,
    "R" => ResidueType::Arginine,
    "S" => ResidueType::Serine,
    "T" => ResidueType::Threonine,
    "V" => ResidueType::Valine,
    "W" => ResidueType::Tryptophan,
    "Y" => ResidueType::Tyrosine,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResidueError {
    #[error("Residue code '{0}' has an invalid length (expected 1 or 3 characters)")]
    InvalidLength(String),
    #[error("Unknown residue code '{0}'")]
    Unknown(String),
    #[error("Backbone pseudo-residue 'BB' is only valid in the two-bead model")]
    BackboneNotAllowed,
}

impl ResidueType {
    /// All residue types in form-factor table order.
    pub const ALL: [ResidueType; 20] = [
        ResidueType::Alanine,
        ResidueType::Cysteine,
        ResidueType::AsparticAcid,
        ResidueType::GlutamicAcid,
        ResidueType::Phenylalanine,
        ResidueType::Glycine,
        ResidueType::Histidine,
        ResidueType::Isoleucine,
        ResidueType::Lysine,
        ResidueType::Leucine,
        ResidueType::Methionine,
        ResidueType::Asparagine,
        ResidueType::Proline,
        ResidueType::Glutamine,
        ResidueType::Arginine,
        ResidueType::Serine,
        ResidueType::Threonine,
        ResidueType::Valine,
        ResidueType::Tryptophan,
        ResidueType::Tyrosine,
    ];

    /// Position of this residue in the tabulated form-factor columns (0-19).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn three_letter_code(self) -> &'static str {
        match self {
            ResidueType::Alanine => "ALA",
            ResidueType::Cysteine => "CYS",
            ResidueType::AsparticAcid => "ASP",
            ResidueType::GlutamicAcid => "GLU",
            ResidueType::Phenylalanine => "PHE",
            ResidueType::Glycine => "GLY",
            ResidueType::Histidine => "HIS",
            ResidueType::Isoleucine => "ILE",
            ResidueType::Lysine => "LYS",
            ResidueType::Leucine => "LEU",
            ResidueType::Methionine => "MET",
            ResidueType::Asparagine => "ASN",
            ResidueType::Proline => "PRO",
            ResidueType::Glutamine => "GLN",
            ResidueType::Arginine => "ARG",
            ResidueType::Serine => "SER",
            ResidueType::Threonine => "THR",
            ResidueType::Valine => "VAL",
            ResidueType::Tryptophan => "TRP",
            ResidueType::Tyrosine => "TYR",
        }
    }

    pub fn one_letter_code(self) -> char {
        match self {
            ResidueType::Alanine => 'A',
            ResidueType::Cysteine => 'C',
            ResidueType::AsparticAcid => 'D',
            ResidueType::GlutamicAcid => 'E',
            ResidueType::Phenylalanine => 'F',
            ResidueType::Glycine => 'G',
            ResidueType::Histidine => 'H',
            ResidueType::Isoleucine => 'I',
            ResidueType::Lysine => 'K',
            ResidueType::Leucine => 'L',
            ResidueType::Methionine => 'M',
            ResidueType::Asparagine => 'N',
            ResidueType::Proline => 'P',
            ResidueType::Glutamine => 'Q',
            ResidueType::Arginine => 'R',
            ResidueType::Serine => 'S',
            ResidueType::Threonine => 'T',
            ResidueType::Valine => 'V',
            ResidueType::Tryptophan => 'W',
            ResidueType::Tyrosine => 'Y',
        }
    }

    /// Parses a one-letter sequence string such as `"MQIFVK"`.
    ///
    /// Whitespace is ignored so that wrapped FASTA-style sequences can be passed as-is.
    pub fn parse_sequence(sequence: &str) -> Result<Vec<Self>, ResidueError> {
        sequence
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_string().parse())
            .collect()
    }

    /// Parses a list of residue codes, each either one or three letters long.
    pub fn parse_codes<S: AsRef<str>>(codes: &[S]) -> Result<Vec<Self>, ResidueError> {
        codes.iter().map(|code| code.as_ref().parse()).collect()
    }
}

impl FromStr for ResidueType {
    type Err = ResidueError;

    /// Accepts one-letter (`"G"`) or three-letter (`"GLY"`) codes, case-insensitively.
    /// Surrounding whitespace counts towards the code length.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.to_ascii_uppercase();
        let table = match code.chars().count() {
            1 => &ONE_LETTER_CODES,
            3 => &THREE_LETTER_CODES,
            _ => return Err(ResidueError::InvalidLength(s.to_string())),
        };
        table
            .get(code.as_str())
            .copied()
            .ok_or_else(|| ResidueError::Unknown(s.to_string()))
    }
}

impl fmt::Display for ResidueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.three_letter_code())
    }
}
