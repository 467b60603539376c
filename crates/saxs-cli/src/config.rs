use crate::cli::CurveSettingsArgs;
use crate::error::{CliError, Result};
use saxsbead::engine::config::{CurveConfig, CurveConfigBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialFormFactorConfig {
    #[serde(rename = "one-bead")]
    one_bead: Option<PathBuf>,
    #[serde(rename = "two-bead")]
    two_bead: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSamplingConfig {
    #[serde(rename = "q-min")]
    q_min: Option<f64>,
    #[serde(rename = "q-max")]
    q_max: Option<f64>,
    points: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialCurveConfig {
    #[serde(rename = "form-factors")]
    form_factors: Option<PartialFormFactorConfig>,
    sampling: Option<PartialSamplingConfig>,
}

impl PartialCurveConfig {
    /// Reads a TOML configuration file. Relative table paths are resolved against the
    /// directory containing the file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        if let (Some(base), Some(tables)) = (path.parent(), config.form_factors.as_mut()) {
            for table in [&mut tables.one_bead, &mut tables.two_bead]
                .into_iter()
                .flatten()
            {
                if table.is_relative() {
                    *table = base.join(&*table);
                }
            }
        }
        Ok(config)
    }

    /// Loads `path` when given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli(mut self, args: &CurveSettingsArgs) -> Result<CurveConfig> {
        self.apply_set_values(&args.set_values)?;

        let tables = self.form_factors.take().unwrap_or_default();
        let sampling = self.sampling.take().unwrap_or_default();

        let one_bead = args.one_bead_table.clone().or(tables.one_bead);
        let two_bead = args.two_bead_table.clone().or(tables.two_bead);
        if one_bead.is_none() && two_bead.is_none() {
            return Err(CliError::Config(
                "No form-factor table configured. Set `form-factors.one-bead` and/or `form-factors.two-bead` in the config file, or pass --one-bead-table / --two-bead-table.".to_string(),
            ));
        }

        let mut builder = CurveConfigBuilder::new();
        if let Some(path) = one_bead {
            builder = builder.one_bead_table(path);
        }
        if let Some(path) = two_bead {
            builder = builder.two_bead_table(path);
        }
        if let Some(q_min) = args.q_min.or(sampling.q_min) {
            builder = builder.q_min(q_min);
        }
        if let Some(q_max) = args.q_max.or(sampling.q_max) {
            builder = builder.q_max(q_max);
        }
        if let Some(points) = args.points.or(sampling.points) {
            builder = builder.points(points);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let invalid = |kind: &str| {
                CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
            };

            match key {
                "form-factors.one-bead" => {
                    self.form_factors
                        .get_or_insert_with(Default::default)
                        .one_bead = Some(PathBuf::from(value_str));
                }
                "form-factors.two-bead" => {
                    self.form_factors
                        .get_or_insert_with(Default::default)
                        .two_bead = Some(PathBuf::from(value_str));
                }
                "sampling.q-min" => {
                    self.sampling.get_or_insert_with(Default::default).q_min =
                        Some(value_str.parse().map_err(|_| invalid("float"))?);
                }
                "sampling.q-max" => {
                    self.sampling.get_or_insert_with(Default::default).q_max =
                        Some(value_str.parse().map_err(|_| invalid("float"))?);
                }
                "sampling.points" => {
                    self.sampling.get_or_insert_with(Default::default).points =
                        Some(value_str.parse().map_err(|_| invalid("integer"))?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
