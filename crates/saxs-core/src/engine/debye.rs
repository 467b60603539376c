use super::config::QSampling;
use super::distance::{distance_matrices, mean_sinc_matrix};
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use crate::core::formfactor::table::FormFactorTable;
use crate::core::models::bead::BeadSpec;
use crate::core::models::curve::ScatteringCurve;
use crate::core::utils::geometry::is_finite_point;
use nalgebra::{DVector, Point3};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Below this magnitude `sin(x) / x` is replaced by its limit 1.
const SINC_EPSILON: f64 = 1e-12;

/// Unnormalized cardinal sine, `sin(x) / x` with `sinc(0) = 1`.
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x.abs() < SINC_EPSILON {
        1.0
    } else {
        x.sin() / x
    }
}

fn validate_inputs(beads: &[BeadSpec], conformers: &[Vec<Point3<f64>>]) -> Result<(), EngineError> {
    if beads.is_empty() {
        return Err(EngineError::EmptyStructure);
    }
    if conformers.is_empty() {
        return Err(EngineError::EmptyEnsemble);
    }
    for (conformer, points) in conformers.iter().enumerate() {
        if points.len() != beads.len() {
            return Err(EngineError::ShapeMismatch {
                what: "conformer coordinates",
                expected: beads.len(),
                found: points.len(),
            });
        }
        if let Some(bead) = points.iter().position(|p| !is_finite_point(p)) {
            return Err(EngineError::NonFiniteCoordinate { conformer, bead });
        }
    }
    Ok(())
}

/// Ensemble-averaged Debye intensity for an arbitrary bead list.
///
/// For every sampled `q`:
///
/// `I(q) = sum_ij f_i(q) f_j(q) <sinc(d_ij q)>`
///
/// where `<.>` is the mean over conformers. Each conformer lists one location per bead,
/// in the order of `beads`. A single structure is an ensemble of one conformer.
///
/// Pairwise distances are computed once per conformer and reused for every `q`. With
/// the `parallel` feature the `q` samples are evaluated concurrently.
///
/// # Errors
///
/// Returns [`EngineError::EmptyStructure`], [`EngineError::EmptyEnsemble`],
/// [`EngineError::ShapeMismatch`] when a conformer does not match the bead list,
/// [`EngineError::NonFiniteCoordinate`], or [`EngineError::FormFactor`] when a bead's
/// model has no loaded table.
#[instrument(skip_all, name = "debye_curve")]
pub fn evaluate_curve(
    table: &FormFactorTable,
    beads: &[BeadSpec],
    conformers: &[Vec<Point3<f64>>],
    sampling: &QSampling,
    reporter: &ProgressReporter,
) -> Result<ScatteringCurve, EngineError> {
    validate_inputs(beads, conformers)?;
    let profiles = beads
        .iter()
        .map(|&bead| table.profile(bead))
        .collect::<Result<Vec<_>, _>>()?;

    let q_values = sampling.values();
    debug!(
        beads = beads.len(),
        conformers = conformers.len(),
        samples = q_values.len(),
        "Evaluating Debye sums over q in [{}, {}].",
        sampling.q_min(),
        sampling.q_max()
    );

    let distances = distance_matrices(conformers);

    reporter.report(Progress::SweepStart {
        samples: q_values.len() as u64,
        beads: beads.len(),
        conformers: conformers.len(),
    });

    let intensity_at = |q: f64| -> f64 {
        let form_factors =
            DVector::from_iterator(profiles.len(), profiles.iter().map(|profile| profile.at(q)));
        let mean_sinc = mean_sinc_matrix(&distances, q);
        let intensity = form_factors.dot(&(mean_sinc * &form_factors));
        reporter.report(Progress::SampleComputed);
        intensity
    };

    let iterator = q_values.iter();

    #[cfg(feature = "parallel")]
    let iterator = q_values.par_iter();

    let intensity: Vec<f64> = iterator.map(|&q| intensity_at(q)).collect();

    reporter.report(Progress::SweepFinish);

    Ok(ScatteringCurve::new(q_values, intensity))
}
