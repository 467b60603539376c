use super::residue::{ResidueError, ResidueType};
use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Code used for the backbone pseudo-residue of the two-bead model.
pub const BACKBONE_CODE: &str = "BB";

/// What a single bead represents: a whole residue / side chain, or a backbone site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeadIdentity {
    Residue(ResidueType),
    Backbone,
}

impl FromStr for BeadIdentity {
    type Err = ResidueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(BACKBONE_CODE) {
            Ok(BeadIdentity::Backbone)
        } else {
            s.parse().map(BeadIdentity::Residue)
        }
    }
}

impl fmt::Display for BeadIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeadIdentity::Residue(residue) => write!(f, "{}", residue),
            BeadIdentity::Backbone => write!(f, "{}", BACKBONE_CODE),
        }
    }
}

/// Coarse-graining model a bead's form factor is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeadModel {
    /// One bead per residue, located at the C-alpha site.
    OneBead,
    /// Two beads per residue: backbone site and side-chain centre of electrons.
    TwoBead,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BeadError {
    #[error(transparent)]
    Residue(#[from] ResidueError),
    #[error("{0} is not a valid model type; '1' (one-bead) or '2' (two-bead) are allowed")]
    InvalidModelType(u8),
}

impl TryFrom<u8> for BeadModel {
    type Error = BeadError;

    fn try_from(flag: u8) -> Result<Self, Self::Error> {
        match flag {
            1 => Ok(BeadModel::OneBead),
            2 => Ok(BeadModel::TwoBead),
            other => Err(BeadError::InvalidModelType(other)),
        }
    }
}

impl fmt::Display for BeadModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeadModel::OneBead => write!(f, "one-bead"),
            BeadModel::TwoBead => write!(f, "two-bead"),
        }
    }
}

/// A bead with a resolved identity and model, i.e. everything needed to look up its
/// form factor. Backbone beads only exist in the two-bead model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeadSpec {
    identity: BeadIdentity,
    model: BeadModel,
}

impl BeadSpec {
    pub fn new(identity: BeadIdentity, model: BeadModel) -> Result<Self, BeadError> {
        if identity == BeadIdentity::Backbone && model == BeadModel::OneBead {
            return Err(ResidueError::BackboneNotAllowed.into());
        }
        Ok(Self { identity, model })
    }

    pub fn one_bead(residue: ResidueType) -> Self {
        Self {
            identity: BeadIdentity::Residue(residue),
            model: BeadModel::OneBead,
        }
    }

    pub fn side_chain(residue: ResidueType) -> Self {
        Self {
            identity: BeadIdentity::Residue(residue),
            model: BeadModel::TwoBead,
        }
    }

    pub fn backbone() -> Self {
        Self {
            identity: BeadIdentity::Backbone,
            model: BeadModel::TwoBead,
        }
    }

    /// Builds a bead from a textual residue code and a numeric model flag (`1` or `2`).
    pub fn from_code(code: &str, model_flag: u8) -> Result<Self, BeadError> {
        let model = BeadModel::try_from(model_flag)?;
        let identity: BeadIdentity = code.parse()?;
        Self::new(identity, model)
    }

    pub fn identity(&self) -> BeadIdentity {
        self.identity
    }

    pub fn model(&self) -> BeadModel {
        self.model
    }
}

/// The two sites of one residue in the two-bead model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoBeadSite {
    pub backbone: Point3<f64>,
    pub side_chain: Point3<f64>,
}

impl TwoBeadSite {
    pub fn new(backbone: Point3<f64>, side_chain: Point3<f64>) -> Self {
        Self {
            backbone,
            side_chain,
        }
    }

    /// Pairs a stacked `2N` site list (all backbone sites, then all side-chain sites).
    ///
    /// Returns `None` for an odd number of points.
    pub fn from_stacked(points: &[Point3<f64>]) -> Option<Vec<Self>> {
        if points.len() % 2 != 0 {
            return None;
        }
        let (backbone, side_chain) = points.split_at(points.len() / 2);
        Some(
            backbone
                .iter()
                .zip(side_chain)
                .map(|(bb, sc)| Self::new(*bb, *sc))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bead_identity_parses_backbone_code_and_residues() {
        assert_eq!("BB".parse::<BeadIdentity>(), Ok(BeadIdentity::Backbone));
        assert_eq!("bb".parse::<BeadIdentity>(), Ok(BeadIdentity::Backbone));
        assert_eq!(
            "LYS".parse::<BeadIdentity>(),
            Ok(BeadIdentity::Residue(ResidueType::Lysine))
        );
        assert!(matches!(
            "B".parse::<BeadIdentity>(),
            Err(ResidueError::Unknown(_))
        ));
    }

    #[test]
    fn model_flags_other_than_one_and_two_are_rejected() {
        assert_eq!(BeadModel::try_from(1), Ok(BeadModel::OneBead));
        assert_eq!(BeadModel::try_from(2), Ok(BeadModel::TwoBead));
        assert_eq!(BeadModel::try_from(0), Err(BeadError::InvalidModelType(0)));
        assert_eq!(BeadModel::try_from(3), Err(BeadError::InvalidModelType(3)));
    }

    #[test]
    fn backbone_bead_is_rejected_in_one_bead_model() {
        let result = BeadSpec::new(BeadIdentity::Backbone, BeadModel::OneBead);
        assert_eq!(
            result,
            Err(BeadError::Residue(ResidueError::BackboneNotAllowed))
        );
        assert!(BeadSpec::new(BeadIdentity::Backbone, BeadModel::TwoBead).is_ok());
    }

    #[test]
    fn from_code_combines_code_and_flag() {
        let bead = BeadSpec::from_code("G", 2).unwrap();
        assert_eq!(bead, BeadSpec::side_chain(ResidueType::Glycine));
        assert_eq!(BeadSpec::from_code("BB", 2).unwrap(), BeadSpec::backbone());
        assert_eq!(
            BeadSpec::from_code("ALA", 1).unwrap(),
            BeadSpec::one_bead(ResidueType::Alanine)
        );
        assert_eq!(
            BeadSpec::from_code("ALA", 7),
            Err(BeadError::InvalidModelType(7))
        );
        assert!(matches!(
            BeadSpec::from_code("ALAN", 1),
            Err(BeadError::Residue(ResidueError::InvalidLength(_)))
        ));
    }

    #[test]
    fn from_stacked_pairs_backbone_block_with_side_chain_block() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let sites = TwoBeadSite::from_stacked(&points).unwrap();
        assert_eq!(
            sites,
            vec![
                TwoBeadSite::new(points[0], points[2]),
                TwoBeadSite::new(points[1], points[3]),
            ]
        );
        assert!(TwoBeadSite::from_stacked(&points[..3]).is_none());
    }
}
