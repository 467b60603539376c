use crate::engine::error::EngineError;
use crate::engine::splice::{self, SpliceSite};
use nalgebra::Point3;
use rand::{Rng, thread_rng};
use tracing::{debug, instrument};

/// Replaces the first (`bead_id = 0`) or last (`-1` or `len - 1`) chain bead by
/// `conglomerate`, using the thread-local RNG for the roll about the attachment axis.
///
/// See [`replace_bead_with_rng`] for a reproducible variant.
pub fn replace_bead(
    conglomerate: &[Point3<f64>],
    conglomerate_attachment: &Point3<f64>,
    chain_locations: &[Point3<f64>],
    chain_sizes: &[f64],
    bead_id: isize,
) -> Result<Vec<Point3<f64>>, EngineError> {
    replace_bead_with_rng(
        conglomerate,
        conglomerate_attachment,
        chain_locations,
        chain_sizes,
        bead_id,
        &mut thread_rng(),
    )
}

#[instrument(skip_all, name = "replace_bead", fields(bead_id = bead_id))]
pub fn replace_bead_with_rng(
    conglomerate: &[Point3<f64>],
    conglomerate_attachment: &Point3<f64>,
    chain_locations: &[Point3<f64>],
    chain_sizes: &[f64],
    bead_id: isize,
    rng: &mut impl Rng,
) -> Result<Vec<Point3<f64>>, EngineError> {
    let site = SpliceSite::from_bead_id(bead_id, chain_locations.len())?;
    debug!(
        "Splicing {} conglomerate beads at the {:?} of a {}-bead chain.",
        conglomerate.len(),
        site,
        chain_locations.len()
    );
    splice::replace_bead(
        conglomerate,
        conglomerate_attachment,
        chain_locations,
        chain_sizes,
        site,
        rng,
    )
}

/// Splices the same conglomerate into every conformer of a chain ensemble.
///
/// All conformers share `chain_sizes`; each placement draws its own roll from `rng`.
#[instrument(skip_all, name = "splice_ensemble")]
pub fn splice_ensemble(
    conglomerate: &[Point3<f64>],
    conglomerate_attachment: &Point3<f64>,
    chains: &[Vec<Point3<f64>>],
    chain_sizes: &[f64],
    bead_id: isize,
    rng: &mut impl Rng,
) -> Result<Vec<Vec<Point3<f64>>>, EngineError> {
    if chains.is_empty() {
        return Err(EngineError::EmptyEnsemble);
    }
    chains
        .iter()
        .map(|chain| {
            replace_bead_with_rng(
                conglomerate,
                conglomerate_attachment,
                chain,
                chain_sizes,
                bead_id,
                rng,
            )
        })
        .collect()
}
