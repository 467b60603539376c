use super::{load_tables, required_blend, required_sequence, write_curve};
use crate::cli::{CurveArgs, ModelArg};
use crate::config::PartialCurveConfig;
use crate::error::{CliError, Result};
use saxsbead::core::formfactor::table::FormFactorTable;
use saxsbead::core::io::coords;
use saxsbead::core::io::pdb::{PdbError, PdbStructure};
use saxsbead::core::models::bead::TwoBeadSite;
use saxsbead::core::models::curve::ScatteringCurve;
use saxsbead::engine::config::QSampling;
use saxsbead::workflows::scattering;
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: CurveArgs) -> Result<()> {
    let config = PartialCurveConfig::load(args.settings.config.as_deref())?
        .merge_with_cli(&args.settings)?;

    let table = load_tables(&config.tables, args.model, &args.beads)?;

    println!("Computing {:?} scattering curve...", args.model);
    let curve = if is_pdb(&args.input) {
        curve_from_pdb(&args, &table, &config.sampling)?
    } else {
        curve_from_csv(&args, &table, &config.sampling)?
    };

    write_curve(curve, args.normalize, &args.output)
}

fn is_pdb(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdb") || ext.eq_ignore_ascii_case("ent"))
}

fn curve_from_pdb(
    args: &CurveArgs,
    table: &FormFactorTable,
    sampling: &QSampling,
) -> Result<ScatteringCurve> {
    let parse_error = |e: PdbError| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    };

    info!("Loading input structure from {:?}", &args.input);
    let structure = PdbStructure::read_from_path(&args.input).map_err(parse_error)?;
    let sequence = structure.sequence().map_err(parse_error)?;
    if args.beads.sequence.is_some() {
        warn!("Ignoring --sequence: the residue sequence is taken from the PDB file.");
    }
    info!("Structure has {} residues.", sequence.len());

    let curve = match args.model {
        ModelArg::One => {
            let locations = structure.c_alpha_sites().map_err(parse_error)?;
            scattering::scattering_curve(table, &sequence, &locations, sampling)?
        }
        ModelArg::Two => {
            let sites = structure.two_bead_sites().map_err(parse_error)?;
            scattering::scattering_curve_two_bead(table, &sequence, &sites, sampling)?
        }
        ModelArg::Blend => {
            return Err(CliError::Argument(
                "The blend model takes CSV coordinates together with --codes and --flags."
                    .to_string(),
            ));
        }
    };
    Ok(curve)
}

fn curve_from_csv(
    args: &CurveArgs,
    table: &FormFactorTable,
    sampling: &QSampling,
) -> Result<ScatteringCurve> {
    info!("Loading bead coordinates from {:?}", &args.input);
    let points = coords::read_points_from_path(&args.input)?;

    let curve = match args.model {
        ModelArg::One => {
            let sequence = required_sequence(&args.beads)?;
            scattering::scattering_curve(table, &sequence, &points, sampling)?
        }
        ModelArg::Two => {
            let sequence = required_sequence(&args.beads)?;
            let sites = TwoBeadSite::from_stacked(&points).ok_or_else(|| {
                CliError::Argument(format!(
                    "Two-bead input needs an even number of sites (backbone block, then side-chain block), got {}.",
                    points.len()
                ))
            })?;
            scattering::scattering_curve_two_bead(table, &sequence, &sites, sampling)?
        }
        ModelArg::Blend => {
            let (codes, flags) = required_blend(&args.beads)?;
            scattering::scattering_curve_one_two_blend(table, codes, flags, &points, sampling)?
        }
    };
    Ok(curve)
}
