use super::{load_tables, required_blend, required_sequence, write_curve};
use crate::cli::{EnsembleArgs, ModelArg};
use crate::config::PartialCurveConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use saxsbead::core::io::coords;
use saxsbead::core::models::bead::TwoBeadSite;
use saxsbead::engine::progress::ProgressReporter;
use saxsbead::workflows::scattering;
use tracing::info;

pub fn run(args: EnsembleArgs) -> Result<()> {
    let config = PartialCurveConfig::load(args.settings.config.as_deref())?
        .merge_with_cli(&args.settings)?;

    let table = load_tables(&config.tables, args.model, &args.beads)?;

    info!("Loading conformers from {:?}", &args.input);
    let conformers = coords::read_ensemble_from_path(&args.input)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Averaging {:?} scattering curve over {} conformers...",
        args.model,
        conformers.len()
    );
    let curve = match args.model {
        ModelArg::One => {
            let sequence = required_sequence(&args.beads)?;
            scattering::scattering_curve_ensemble(
                &table,
                &sequence,
                &conformers,
                &config.sampling,
                &reporter,
            )?
        }
        ModelArg::Two => {
            let sequence = required_sequence(&args.beads)?;
            let ensemble = conformers
                .iter()
                .enumerate()
                .map(|(index, points)| {
                    TwoBeadSite::from_stacked(points).ok_or_else(|| {
                        CliError::Argument(format!(
                            "Conformer {} has an odd number of two-bead sites ({}).",
                            index,
                            points.len()
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            scattering::scattering_curve_two_bead_ensemble(
                &table,
                &sequence,
                &ensemble,
                &config.sampling,
                &reporter,
            )?
        }
        ModelArg::Blend => {
            let (codes, flags) = required_blend(&args.beads)?;
            scattering::scattering_curve_one_two_blend_ensemble(
                &table,
                codes,
                flags,
                &conformers,
                &config.sampling,
                &reporter,
            )?
        }
    };

    write_curve(curve, args.normalize, &args.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::commands::test_support::{read_curve, write_constant_tables};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn ensemble_args(args: &[&str]) -> EnsembleArgs {
        let mut full = vec!["saxs", "ensemble"];
        full.extend_from_slice(args);
        match Cli::parse_from(full).command {
            Commands::Ensemble(ensemble) => ensemble,
            _ => panic!("Expected 'ensemble' subcommand"),
        }
    }

    #[test]
    fn one_bead_ensemble_curve_is_written() {
        let dir = tempdir().unwrap();
        let (one, two) = write_constant_tables(dir.path());
        let input = dir.path().join("conformers.csv");
        fs::write(
            &input,
            "conformer,x,y,z\n0,0,0,0\n0,4,0,0\n1,0,0,0\n1,0,8,0\n",
        )
        .unwrap();
        let output = dir.path().join("curve.csv");

        run(ensemble_args(&[
            "-i", input.to_str().unwrap(),
            "-o", output.to_str().unwrap(),
            "-s", "KK",
            "--one-bead-table", one.to_str().unwrap(),
            "--two-bead-table", two.to_str().unwrap(),
            "--q-max", "0.4",
            "--points", "3",
        ]))
        .unwrap();

        let curve = read_curve(&output);
        assert_eq!(curve.len(), 3);
        let q = curve[2].0;
        assert!((q - 0.4).abs() < 1e-12);
        let expected = 2.0 + ((4.0 * q).sin() / (4.0 * q) + (8.0 * q).sin() / (8.0 * q));
        assert!((curve[2].1 - expected).abs() < 1e-9);
    }

    #[test]
    fn one_bead_ensemble_needs_only_the_one_bead_table() {
        let dir = tempdir().unwrap();
        let (one, _) = write_constant_tables(dir.path());
        let input = dir.path().join("conformers.csv");
        fs::write(&input, "conformer,x,y,z\n0,0,0,0\n0,4,0,0\n").unwrap();
        let output = dir.path().join("curve.csv");

        run(ensemble_args(&[
            "-i", input.to_str().unwrap(),
            "-o", output.to_str().unwrap(),
            "-s", "GG",
            "--one-bead-table", one.to_str().unwrap(),
            "--points", "2",
        ]))
        .unwrap();

        assert_eq!(read_curve(&output).len(), 2);
    }

    #[test]
    fn two_bead_ensemble_rejects_odd_site_counts() {
        let dir = tempdir().unwrap();
        let (one, two) = write_constant_tables(dir.path());
        let input = dir.path().join("conformers.csv");
        fs::write(&input, "conformer,x,y,z\n0,0,0,0\n0,1,0,0\n0,2,0,0\n").unwrap();

        let result = run(ensemble_args(&[
            "-i", input.to_str().unwrap(),
            "-o", dir.path().join("curve.csv").to_str().unwrap(),
            "--model", "two",
            "-s", "A",
            "--one-bead-table", one.to_str().unwrap(),
            "--two-bead-table", two.to_str().unwrap(),
        ]));
        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
