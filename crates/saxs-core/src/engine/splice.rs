use super::error::EngineError;
use crate::core::utils::geometry::{
    DIRECTION_EPSILON, centroid, is_finite_point, random_alignment, weighted_contact_point,
};
use nalgebra::{Point3, Unit, Vector3};
use rand::Rng;
use tracing::trace;

/// Chain end at which a bead is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceSite {
    Start,
    End,
}

impl SpliceSite {
    /// Accepts `0` for the first bead and `-1` or `chain_len - 1` for the last one.
    pub fn from_bead_id(bead_id: isize, chain_len: usize) -> Result<Self, EngineError> {
        let last = chain_len as isize - 1;
        match bead_id {
            0 => Ok(SpliceSite::Start),
            -1 => Ok(SpliceSite::End),
            id if id == last => Ok(SpliceSite::End),
            _ => Err(EngineError::UnsupportedBead { bead_id, chain_len }),
        }
    }

    fn removed_index(self, chain_len: usize) -> usize {
        match self {
            SpliceSite::Start => 0,
            SpliceSite::End => chain_len - 1,
        }
    }

    fn neighbor_index(self, chain_len: usize) -> usize {
        match self {
            SpliceSite::Start => 1,
            SpliceSite::End => chain_len - 2,
        }
    }
}

/// Where and in which direction a conglomerate is attached to a chain end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainAttachment {
    pub point: Point3<f64>,
    /// Points from the removed bead's neighbour towards the removed bead.
    pub direction: Unit<Vector3<f64>>,
}

fn checked_size(sizes: &[f64], index: usize) -> Result<f64, EngineError> {
    let size = sizes[index];
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(EngineError::InvalidBeadSize { index, size })
    }
}

fn validate_chain(locations: &[Point3<f64>], sizes: &[f64]) -> Result<(), EngineError> {
    if locations.len() < 2 {
        return Err(EngineError::ChainTooShort {
            len: locations.len(),
        });
    }
    if sizes.len() != locations.len() {
        return Err(EngineError::ShapeMismatch {
            what: "chain sizes",
            expected: locations.len(),
            found: sizes.len(),
        });
    }
    if let Some(bead) = locations.iter().position(|p| !is_finite_point(p)) {
        return Err(EngineError::NonFiniteCoordinate { conformer: 0, bead });
    }
    Ok(())
}

/// Attachment point and outward direction at the chosen chain end.
pub fn chain_attachment(
    locations: &[Point3<f64>],
    sizes: &[f64],
    site: SpliceSite,
) -> Result<ChainAttachment, EngineError> {
    validate_chain(locations, sizes)?;
    let removed = site.removed_index(locations.len());
    let neighbor = site.neighbor_index(locations.len());
    let removed_size = checked_size(sizes, removed)?;
    let neighbor_size = checked_size(sizes, neighbor)?;

    let point = weighted_contact_point(
        &locations[removed],
        removed_size,
        &locations[neighbor],
        neighbor_size,
    );
    let direction = Unit::try_new(locations[removed] - locations[neighbor], DIRECTION_EPSILON)
        .ok_or_else(|| {
            EngineError::DegenerateGeometry(format!(
                "beads {} and {} of the chain coincide",
                removed, neighbor
            ))
        })?;
    Ok(ChainAttachment { point, direction })
}

/// Replaces a terminal chain bead by a rigid conglomerate.
///
/// The conglomerate is rotated so that the direction from its attachment point to its
/// centroid lines up with the chain's outward direction, then translated so that its
/// attachment point coincides with the chain attachment point. The roll about that axis
/// is drawn from `rng`.
///
/// Returns the remaining chain beads, unchanged and in order, followed by the moved
/// conglomerate beads.
pub fn replace_bead(
    conglomerate: &[Point3<f64>],
    conglomerate_attachment: &Point3<f64>,
    chain_locations: &[Point3<f64>],
    chain_sizes: &[f64],
    site: SpliceSite,
    rng: &mut impl Rng,
) -> Result<Vec<Point3<f64>>, EngineError> {
    let attachment = chain_attachment(chain_locations, chain_sizes, site)?;

    let center = centroid(conglomerate).ok_or(EngineError::EmptyStructure)?;
    if let Some(bead) = conglomerate.iter().position(|p| !is_finite_point(p)) {
        return Err(EngineError::NonFiniteCoordinate { conformer: 0, bead });
    }
    if !is_finite_point(conglomerate_attachment) {
        return Err(EngineError::DegenerateGeometry(
            "conglomerate attachment point is not finite".into(),
        ));
    }

    let offset = center - conglomerate_attachment;
    let extent = offset.norm();
    let conglomerate_direction = Unit::try_new(offset, DIRECTION_EPSILON).ok_or_else(|| {
        EngineError::DegenerateGeometry(
            "conglomerate attachment point coincides with its centroid".into(),
        )
    })?;

    let rotation = random_alignment(&conglomerate_direction, &attachment.direction, rng);
    let placed_center = attachment.point + attachment.direction.into_inner() * extent;
    trace!(
        extent,
        "Placing conglomerate of {} beads at {:?}.",
        conglomerate.len(),
        placed_center
    );

    let removed = site.removed_index(chain_locations.len());
    let mut spliced = Vec::with_capacity(chain_locations.len() - 1 + conglomerate.len());
    spliced.extend(
        chain_locations
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != removed)
            .map(|(_, p)| *p),
    );
    spliced.extend(
        conglomerate
            .iter()
            .map(|p| placed_center + rotation * (p - center)),
    );
    Ok(spliced)
}
