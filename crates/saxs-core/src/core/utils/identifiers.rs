use phf::{Map, Set, phf_map, phf_set};

static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "H", "HN", "CA", "HA", "C", "O", "OXT", "H1", "H2", "H3", "NT",
    "HT1", "HT2", "HT3", "OT1", "OT2", "HC", "HOXT", "HA1", "HA2", "HA3", "1HA", "2HA",
};

// Electrons per neutral atom, i.e. the atomic number.
static ELECTRON_COUNTS: Map<&'static str, u32> = phf_map! {
    "H" => 1, "D" => 1,
    "C" => 6, "N" => 7, "O" => 8,
    "F" => 9, "NA" => 11, "MG" => 12, "P" => 15, "S" => 16, "CL" => 17,
    "K" => 19, "CA" => 20, "MN" => 25, "FE" => 26, "ZN" => 30, "SE" => 34,
};

pub fn is_backbone_atom(atom_name: &str) -> bool {
    BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

/// Number of electrons of a neutral atom of `element` (e.g. `"C"`, `"Se"`).
pub fn electron_count(element: &str) -> Option<u32> {
    ELECTRON_COUNTS
        .get(element.trim().to_ascii_uppercase().as_str())
        .copied()
}

/// Element symbol guessed from a PDB atom name when the element column is blank.
///
/// Protein atom names start with their element letter (`CA` is a carbon, `SD` a sulfur),
/// except for names padded with a leading digit such as `1HB`.
pub fn element_from_atom_name(atom_name: &str) -> Option<String> {
    atom_name
        .trim()
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_backbone_atom_recognizes_standard_backbone_atoms() {
        assert!(is_backbone_atom("N"));
        assert!(is_backbone_atom("CA"));
        assert!(is_backbone_atom("C"));
        assert!(is_backbone_atom("O"));
        assert!(is_backbone_atom("OXT"));
    }

    #[test]
    fn is_backbone_atom_trims_whitespace_and_rejects_side_chain_atoms() {
        assert!(is_backbone_atom(" CA "));
        assert!(!is_backbone_atom("CB"));
        assert!(!is_backbone_atom("SG"));
        assert!(!is_backbone_atom(""));
    }

    #[test]
    fn electron_count_matches_atomic_numbers() {
        assert_eq!(electron_count("C"), Some(6));
        assert_eq!(electron_count("n"), Some(7));
        assert_eq!(electron_count(" O"), Some(8));
        assert_eq!(electron_count("S"), Some(16));
        assert_eq!(electron_count("Se"), Some(34));
        assert_eq!(electron_count("Xx"), None);
    }

    #[test]
    fn element_from_atom_name_uses_first_letter() {
        assert_eq!(element_from_atom_name("CG1").as_deref(), Some("C"));
        assert_eq!(element_from_atom_name("1HB").as_deref(), Some("H"));
        assert_eq!(element_from_atom_name(" OD1").as_deref(), Some("O"));
        assert_eq!(element_from_atom_name("12"), None);
    }
}
