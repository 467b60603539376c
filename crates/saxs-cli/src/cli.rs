use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "saxs - Small-angle X-ray scattering curves for coarse-grained protein bead models.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the scattering curve of a single structure (PDB or CSV coordinates).
    Curve(CurveArgs),
    /// Compute the ensemble-averaged scattering curve of a set of conformers.
    Ensemble(EnsembleArgs),
    /// Replace the first or last bead of a chain by a rigid conglomerate.
    Splice(SpliceArgs),
}

/// Bead representation used to compute a curve.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelArg {
    /// One bead per residue at the C-alpha site.
    One,
    /// Backbone and side-chain beads per residue.
    Two,
    /// Per-bead choice given by --codes and --flags.
    Blend,
}

/// Form-factor tables and q sampling shared by the curve commands.
#[derive(Args, Debug, Default)]
pub struct CurveSettingsArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the one-bead form-factor table (CSV).
    #[arg(long, value_name = "PATH")]
    pub one_bead_table: Option<PathBuf>,

    /// Override the two-bead form-factor table (CSV).
    #[arg(long, value_name = "PATH")]
    pub two_bead_table: Option<PathBuf>,

    /// Override the smallest sampled q (inverse Angstrom).
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub q_min: Option<f64>,

    /// Override the largest sampled q (inverse Angstrom).
    #[arg(long, value_name = "FLOAT")]
    pub q_max: Option<f64>,

    /// Override the number of q samples.
    #[arg(short = 'n', long, value_name = "INT")]
    pub points: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S sampling.points=50
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Bead identities for the selected model.
#[derive(Args, Debug, Default)]
pub struct BeadArgs {
    /// Residue sequence, either one-letter ("MQIFVK") or comma-separated codes ("MET,GLN").
    /// Required for CSV input with the one- and two-bead models.
    #[arg(short = 's', long, value_name = "SEQUENCE")]
    pub sequence: Option<String>,

    /// Per-bead residue codes for the blend model; "BB" marks a backbone bead.
    #[arg(long, value_name = "CODE,...", value_delimiter = ',')]
    pub codes: Vec<String>,

    /// Per-bead model flags for the blend model: 1 (one-bead) or 2 (two-bead).
    #[arg(long, value_name = "FLAG,...", value_delimiter = ',')]
    pub flags: Vec<u8>,
}

/// Arguments for the `curve` subcommand.
#[derive(Args, Debug)]
pub struct CurveArgs {
    /// Input structure: a .pdb/.ent file or an x,y,z CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output q,intensity CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Bead model.
    #[arg(short, long, value_enum, default_value_t = ModelArg::One)]
    pub model: ModelArg,

    /// Divide every intensity by the intensity at the smallest q.
    #[arg(long)]
    pub normalize: bool,

    #[command(flatten)]
    pub beads: BeadArgs,

    #[command(flatten)]
    pub settings: CurveSettingsArgs,
}

/// Arguments for the `ensemble` subcommand.
#[derive(Args, Debug)]
pub struct EnsembleArgs {
    /// Conformers as a conformer,x,y,z CSV file. Two-bead conformers list all backbone
    /// sites before all side-chain sites.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output q,intensity CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Bead model.
    #[arg(short, long, value_enum, default_value_t = ModelArg::One)]
    pub model: ModelArg,

    /// Divide every intensity by the intensity at the smallest q.
    #[arg(long)]
    pub normalize: bool,

    #[command(flatten)]
    pub beads: BeadArgs,

    #[command(flatten)]
    pub settings: CurveSettingsArgs,
}

/// Arguments for the `splice` subcommand.
#[derive(Args, Debug)]
pub struct SpliceArgs {
    /// Chain beads with sizes as an x,y,z,size CSV file.
    #[arg(long, required = true, value_name = "PATH")]
    pub chain: PathBuf,

    /// Conformers of the chain (conformer,x,y,z); each is spliced using the sizes from --chain.
    #[arg(long, value_name = "PATH")]
    pub conformers: Option<PathBuf>,

    /// Conglomerate beads as an x,y,z CSV file.
    #[arg(long, required = true, value_name = "PATH")]
    pub conglomerate: PathBuf,

    #[command(flatten)]
    pub anchor: AnchorArgs,

    /// Bead to replace: "start", "end", or a bead index (0, -1 or the last index).
    #[arg(short, long, default_value = "end", allow_hyphen_values = true)]
    pub bead: String,

    /// Seed for the random orientation about the attachment axis.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Path for the output CSV file (x,y,z, or conformer,x,y,z with --conformers).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

/// Attachment point of the conglomerate, given either explicitly or as one of its beads.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct AnchorArgs {
    /// Attachment point coordinates.
    #[arg(long, value_name = "X,Y,Z", value_delimiter = ',', allow_negative_numbers = true)]
    pub anchor: Option<Vec<f64>>,

    /// Index of the conglomerate bead used as the attachment point.
    #[arg(long, value_name = "INDEX")]
    pub anchor_index: Option<usize>,
}
