use crate::core::formfactor::table::FormFactorTable;
use crate::core::models::bead::{BeadSpec, TwoBeadSite};
use crate::core::models::curve::ScatteringCurve;
use crate::core::models::residue::ResidueType;
use crate::engine::config::QSampling;
use crate::engine::debye::evaluate_curve;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::Point3;
use tracing::{info, instrument};

fn one_bead_list(sequence: &[ResidueType]) -> Vec<BeadSpec> {
    sequence.iter().map(|&r| BeadSpec::one_bead(r)).collect()
}

/// Backbone beads for the whole sequence first, then one side-chain bead per residue.
fn two_bead_list(sequence: &[ResidueType]) -> Vec<BeadSpec> {
    std::iter::repeat_n(BeadSpec::backbone(), sequence.len())
        .chain(sequence.iter().map(|&r| BeadSpec::side_chain(r)))
        .collect()
}

fn stack_two_bead_sites(
    sequence: &[ResidueType],
    sites: &[TwoBeadSite],
) -> Result<Vec<Point3<f64>>, EngineError> {
    if sites.len() != sequence.len() {
        return Err(EngineError::ShapeMismatch {
            what: "two-bead sites",
            expected: sequence.len(),
            found: sites.len(),
        });
    }
    Ok(sites
        .iter()
        .map(|s| s.backbone)
        .chain(sites.iter().map(|s| s.side_chain))
        .collect())
}

/// Resolves per-bead residue codes and model flags (`1` one-bead, `2` two-bead).
///
/// `BB` selects the backbone profile and is only accepted with flag `2`.
pub fn blend_beads<S: AsRef<str>>(
    codes: &[S],
    model_flags: &[u8],
) -> Result<Vec<BeadSpec>, EngineError> {
    if model_flags.len() != codes.len() {
        return Err(EngineError::ShapeMismatch {
            what: "model flags",
            expected: codes.len(),
            found: model_flags.len(),
        });
    }
    codes
        .iter()
        .zip(model_flags)
        .map(|(code, &flag)| BeadSpec::from_code(code.as_ref(), flag).map_err(EngineError::from))
        .collect()
}

fn run_ensemble(
    table: &FormFactorTable,
    beads: &[BeadSpec],
    conformers: &[Vec<Point3<f64>>],
    sampling: &QSampling,
    reporter: &ProgressReporter,
) -> Result<ScatteringCurve, EngineError> {
    reporter.report(Progress::StageStart {
        name: "Ensemble Debye Sums",
    });
    info!(
        "Averaging {} beads over {} conformers at {} q samples.",
        beads.len(),
        conformers.len(),
        sampling.points()
    );
    let curve = evaluate_curve(table, beads, conformers, sampling, reporter)?;
    reporter.report(Progress::StageFinish);
    Ok(curve)
}

/// One-bead curve of a single structure: one C-alpha location per residue.
#[instrument(skip_all, name = "one_bead_curve")]
pub fn scattering_curve(
    table: &FormFactorTable,
    sequence: &[ResidueType],
    locations: &[Point3<f64>],
    sampling: &QSampling,
) -> Result<ScatteringCurve, EngineError> {
    evaluate_curve(
        table,
        &one_bead_list(sequence),
        &[locations.to_vec()],
        sampling,
        &ProgressReporter::new(),
    )
}

/// One-bead curve averaged over conformers sharing `sequence`.
///
/// The sinc term of every bead pair is averaged over the ensemble before it is weighted
/// by the pair's form factors.
#[instrument(skip_all, name = "one_bead_ensemble_curve")]
pub fn scattering_curve_ensemble(
    table: &FormFactorTable,
    sequence: &[ResidueType],
    ensemble: &[Vec<Point3<f64>>],
    sampling: &QSampling,
    reporter: &ProgressReporter,
) -> Result<ScatteringCurve, EngineError> {
    run_ensemble(table, &one_bead_list(sequence), ensemble, sampling, reporter)
}

/// Two-bead curve of a single structure: `2N` beads, backbone sites first.
#[instrument(skip_all, name = "two_bead_curve")]
pub fn scattering_curve_two_bead(
    table: &FormFactorTable,
    sequence: &[ResidueType],
    sites: &[TwoBeadSite],
    sampling: &QSampling,
) -> Result<ScatteringCurve, EngineError> {
    let points = stack_two_bead_sites(sequence, sites)?;
    evaluate_curve(
        table,
        &two_bead_list(sequence),
        &[points],
        sampling,
        &ProgressReporter::new(),
    )
}

#[instrument(skip_all, name = "two_bead_ensemble_curve")]
pub fn scattering_curve_two_bead_ensemble(
    table: &FormFactorTable,
    sequence: &[ResidueType],
    ensemble: &[Vec<TwoBeadSite>],
    sampling: &QSampling,
    reporter: &ProgressReporter,
) -> Result<ScatteringCurve, EngineError> {
    let conformers = ensemble
        .iter()
        .map(|sites| stack_two_bead_sites(sequence, sites))
        .collect::<Result<Vec<_>, _>>()?;
    run_ensemble(table, &two_bead_list(sequence), &conformers, sampling, reporter)
}

/// Curve of a structure mixing one-bead and two-bead representations.
///
/// Each entry of `codes` is paired with its model flag and its location.
///
/// # Errors
///
/// Fails with [`EngineError::Bead`] for unknown codes or flags other than `1` and `2`,
/// and with [`EngineError::ShapeMismatch`] when the three inputs differ in length.
#[instrument(skip_all, name = "blended_curve")]
pub fn scattering_curve_one_two_blend<S: AsRef<str>>(
    table: &FormFactorTable,
    codes: &[S],
    model_flags: &[u8],
    locations: &[Point3<f64>],
    sampling: &QSampling,
) -> Result<ScatteringCurve, EngineError> {
    let beads = blend_beads(codes, model_flags)?;
    evaluate_curve(
        table,
        &beads,
        &[locations.to_vec()],
        sampling,
        &ProgressReporter::new(),
    )
}

#[instrument(skip_all, name = "blended_ensemble_curve")]
pub fn scattering_curve_one_two_blend_ensemble<S: AsRef<str>>(
    table: &FormFactorTable,
    codes: &[S],
    model_flags: &[u8],
    ensemble: &[Vec<Point3<f64>>],
    sampling: &QSampling,
    reporter: &ProgressReporter,
) -> Result<ScatteringCurve, EngineError> {
    let beads = blend_beads(codes, model_flags)?;
    run_ensemble(table, &beads, ensemble, sampling, reporter)
}
