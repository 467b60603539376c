use crate::cli::{AnchorArgs, SpliceArgs};
use crate::error::{CliError, Result};
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, thread_rng};
use saxsbead::core::io::coords::{self, SizedChain};
use saxsbead::workflows::splice;
use tracing::info;

/// Maps `--bead` to a bead id: `start`, `end`, or a signed index.
fn parse_bead(bead: &str) -> Result<isize> {
    match bead.trim().to_ascii_lowercase().as_str() {
        "start" | "first" => Ok(0),
        "end" | "last" => Ok(-1),
        other => other.parse().map_err(|_| {
            CliError::Argument(format!(
                "Invalid --bead '{}'. Expected 'start', 'end' or an index.",
                bead
            ))
        }),
    }
}

fn resolve_anchor(anchor: &AnchorArgs, conglomerate: &[Point3<f64>]) -> Result<Point3<f64>> {
    if let Some(coords) = &anchor.anchor {
        return match coords.as_slice() {
            [x, y, z] => Ok(Point3::new(*x, *y, *z)),
            _ => Err(CliError::Argument(format!(
                "--anchor expects three comma-separated coordinates, got {}.",
                coords.len()
            ))),
        };
    }
    let index = anchor.anchor_index.unwrap_or(0);
    conglomerate.get(index).copied().ok_or_else(|| {
        CliError::Argument(format!(
            "--anchor-index {} is out of range for a conglomerate of {} beads.",
            index,
            conglomerate.len()
        ))
    })
}

pub fn run(args: SpliceArgs) -> Result<()> {
    info!("Loading chain from {:?}", &args.chain);
    let chain = coords::read_sized_chain_from_path(&args.chain)?;
    info!("Loading conglomerate from {:?}", &args.conglomerate);
    let conglomerate = coords::read_points_from_path(&args.conglomerate)?;

    let anchor = resolve_anchor(&args.anchor, &conglomerate)?;
    let bead_id = parse_bead(&args.bead)?;

    match args.seed {
        Some(seed) => {
            info!("Using seeded RNG (seed = {}).", seed);
            splice_with(&args, &chain, &conglomerate, &anchor, bead_id, &mut StdRng::seed_from_u64(seed))
        }
        None => splice_with(&args, &chain, &conglomerate, &anchor, bead_id, &mut thread_rng()),
    }
}

fn splice_with(
    args: &SpliceArgs,
    chain: &SizedChain,
    conglomerate: &[Point3<f64>],
    anchor: &Point3<f64>,
    bead_id: isize,
    rng: &mut impl Rng,
) -> Result<()> {
    match &args.conformers {
        Some(path) => {
            info!("Loading chain conformers from {:?}", path);
            let chains = coords::read_ensemble_from_path(path)?;
            let spliced =
                splice::splice_ensemble(conglomerate, anchor, &chains, &chain.sizes, bead_id, rng)?;
            coords::write_ensemble_to_path(&args.output, &spliced)?;
            println!(
                "✓ {} spliced conformers written to: {}",
                spliced.len(),
                args.output.display()
            );
        }
        None => {
            let spliced = splice::replace_bead_with_rng(
                conglomerate,
                anchor,
                &chain.locations,
                &chain.sizes,
                bead_id,
                rng,
            )?;
            coords::write_points_to_path(&args.output, &spliced)?;
            println!(
                "✓ Spliced chain ({} beads) written to: {}",
                spliced.len(),
                args.output.display()
            );
        }
    }
    Ok(())
}
