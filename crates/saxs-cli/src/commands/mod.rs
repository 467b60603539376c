pub mod curve;
pub mod ensemble;
pub mod splice;

use crate::cli::{BeadArgs, ModelArg};
use crate::error::{CliError, Result};
use saxsbead::core::formfactor::table::{FormFactorTable, TableLoadError};
use saxsbead::core::io::coords;
use saxsbead::core::models::bead::BeadModel;
use saxsbead::core::models::curve::ScatteringCurve;
use saxsbead::core::models::residue::ResidueType;
use saxsbead::engine::config::TableConfig;
use saxsbead::engine::error::EngineError;
use std::path::Path;
use tracing::info;

/// Parses `--sequence`: a one-letter string, or comma-separated one- or three-letter codes.
pub(crate) fn parse_sequence(sequence: &str) -> Result<Vec<ResidueType>> {
    let parsed = if sequence.contains(',') {
        let codes: Vec<&str> = sequence.split(',').map(str::trim).collect();
        ResidueType::parse_codes(&codes)
    } else {
        ResidueType::parse_sequence(sequence)
    };
    parsed.map_err(|e| CliError::Argument(format!("Invalid --sequence '{}': {}", sequence, e)))
}

pub(crate) fn required_sequence(beads: &BeadArgs) -> Result<Vec<ResidueType>> {
    let sequence = beads.sequence.as_deref().ok_or_else(|| {
        CliError::Argument("--sequence is required for coordinate (CSV) input.".to_string())
    })?;
    parse_sequence(sequence)
}

pub(crate) fn required_blend(beads: &BeadArgs) -> Result<(&[String], &[u8])> {
    if beads.codes.is_empty() || beads.flags.is_empty() {
        return Err(CliError::Argument(
            "The blend model requires both --codes and --flags.".to_string(),
        ));
    }
    Ok((&beads.codes, &beads.flags))
}

/// Form-factor tables read by `model`; for the blend model, those named by `--flags`.
pub(crate) fn required_models(model: ModelArg, beads: &BeadArgs) -> Result<Vec<BeadModel>> {
    let mut models = match model {
        ModelArg::One => vec![BeadModel::OneBead],
        ModelArg::Two => vec![BeadModel::TwoBead],
        ModelArg::Blend => {
            let (_, flags) = required_blend(beads)?;
            flags
                .iter()
                .map(|&flag| BeadModel::try_from(flag))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(EngineError::from)?
        }
    };
    models.sort_by_key(|model| *model == BeadModel::TwoBead);
    models.dedup();
    Ok(models)
}

/// Loads only the form-factor tables `model` reads.
pub(crate) fn load_tables(
    tables: &TableConfig,
    model: ModelArg,
    beads: &BeadArgs,
) -> Result<FormFactorTable> {
    let models = required_models(model, beads)?;
    info!("Loading form-factor tables for {:?}...", models);
    tables.load_models(&models).map_err(|e| match e {
        TableLoadError::MissingTable { model } => CliError::Config(format!(
            "The {} form-factor table is required for this model, either as `form-factors.{}` in the config file or via --{}-table.",
            model, model, model
        )),
        other => other.into(),
    })
}

/// Optionally normalizes `curve` and writes it as `q,intensity` CSV.
pub(crate) fn write_curve(curve: ScatteringCurve, normalize: bool, output: &Path) -> Result<()> {
    let curve = if normalize {
        curve.normalized().ok_or_else(|| {
            CliError::Argument(
                "Cannot normalize: the intensity at the smallest q is zero or not finite."
                    .to_string(),
            )
        })?
    } else {
        curve
    };

    info!("Writing {} curve samples to {:?}", curve.len(), output);
    coords::write_curve_to_path(output, &curve)?;
    println!(
        "✓ Scattering curve ({} samples) written to: {}",
        curve.len(),
        output.display()
    );
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_accepts_one_letter_strings_and_code_lists() {
        assert_eq!(
            parse_sequence("GA").unwrap(),
            vec![ResidueType::Glycine, ResidueType::Alanine]
        );
        assert_eq!(
            parse_sequence("GLY, ala").unwrap(),
            vec![ResidueType::Glycine, ResidueType::Alanine]
        );
        assert!(matches!(parse_sequence("GZ"), Err(CliError::Argument(_))));
    }

    #[test]
    fn required_models_follow_the_model_and_blend_flags() {
        let beads = BeadArgs::default();
        assert_eq!(
            required_models(ModelArg::One, &beads).unwrap(),
            vec![BeadModel::OneBead]
        );
        assert_eq!(
            required_models(ModelArg::Two, &beads).unwrap(),
            vec![BeadModel::TwoBead]
        );

        let blend = |flags: Vec<u8>| BeadArgs {
            codes: vec!["A".to_string(); flags.len()],
            flags,
            ..BeadArgs::default()
        };
        assert_eq!(
            required_models(ModelArg::Blend, &blend(vec![1, 1])).unwrap(),
            vec![BeadModel::OneBead]
        );
        assert_eq!(
            required_models(ModelArg::Blend, &blend(vec![2, 1, 2])).unwrap(),
            vec![BeadModel::OneBead, BeadModel::TwoBead]
        );
        assert!(matches!(
            required_models(ModelArg::Blend, &blend(vec![1, 3])),
            Err(CliError::Engine(_))
        ));
    }

    #[test]
    fn unconfigured_table_for_the_model_is_a_config_error() {
        let tables = TableConfig {
            one_bead_path: Some("one.csv".into()),
            two_bead_path: None,
        };
        match load_tables(&tables, ModelArg::Two, &BeadArgs::default()) {
            Err(CliError::Config(msg)) => assert!(msg.contains("--two-bead-table")),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_bead_arguments_are_reported() {
        let beads = BeadArgs::default();
        assert!(matches!(
            required_sequence(&beads),
            Err(CliError::Argument(_))
        ));
        assert!(matches!(required_blend(&beads), Err(CliError::Argument(_))));
    }
}
