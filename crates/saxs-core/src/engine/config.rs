use crate::core::formfactor::table::{FormFactorTable, TableLoadError};
use crate::core::models::bead::BeadModel;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_Q_MIN: f64 = 0.0;
pub const DEFAULT_Q_MAX: f64 = 0.5;
pub const DEFAULT_POINTS: usize = 20;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("At least one q sample is required")]
    NoSamples,
    #[error("q range bounds must be finite, got [{q_min}, {q_max}]")]
    NonFiniteRange { q_min: f64, q_max: f64 },
    #[error("q_min ({q_min}) must not exceed q_max ({q_max})")]
    InvertedRange { q_min: f64, q_max: f64 },
}

/// Evenly spaced `q` samples over `[q_min, q_max]`, both ends included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QSampling {
    q_min: f64,
    q_max: f64,
    points: usize,
}

impl Default for QSampling {
    fn default() -> Self {
        Self {
            q_min: DEFAULT_Q_MIN,
            q_max: DEFAULT_Q_MAX,
            points: DEFAULT_POINTS,
        }
    }
}

impl QSampling {
    pub fn new(q_min: f64, q_max: f64, points: usize) -> Result<Self, ConfigError> {
        if points == 0 {
            return Err(ConfigError::NoSamples);
        }
        if !q_min.is_finite() || !q_max.is_finite() {
            return Err(ConfigError::NonFiniteRange { q_min, q_max });
        }
        if q_min > q_max {
            return Err(ConfigError::InvertedRange { q_min, q_max });
        }
        Ok(Self {
            q_min,
            q_max,
            points,
        })
    }

    pub fn q_min(&self) -> f64 {
        self.q_min
    }

    pub fn q_max(&self) -> f64 {
        self.q_max
    }

    pub fn points(&self) -> usize {
        self.points
    }

    /// The sampled `q` values. A single point samples `q_min`; otherwise the last value
    /// is exactly `q_max`.
    pub fn values(&self) -> Vec<f64> {
        if self.points == 1 {
            return vec![self.q_min];
        }
        let step = (self.q_max - self.q_min) / (self.points - 1) as f64;
        (0..self.points)
            .map(|i| {
                if i == self.points - 1 {
                    self.q_max
                } else {
                    self.q_min + step * i as f64
                }
            })
            .collect()
    }
}

/// Form-factor table locations. Only the tables of the models a computation uses
/// need to be configured.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableConfig {
    pub one_bead_path: Option<PathBuf>,
    pub two_bead_path: Option<PathBuf>,
}

impl TableConfig {
    pub fn path(&self, model: BeadModel) -> Option<&Path> {
        match model {
            BeadModel::OneBead => self.one_bead_path.as_deref(),
            BeadModel::TwoBead => self.two_bead_path.as_deref(),
        }
    }

    /// Loads every configured table.
    pub fn load(&self) -> Result<FormFactorTable, TableLoadError> {
        FormFactorTable::load(self.one_bead_path.as_deref(), self.two_bead_path.as_deref())
    }

    /// Loads only the tables of `models`; tables of other models are not read.
    ///
    /// # Errors
    ///
    /// Returns [`TableLoadError::MissingTable`] for a requested model without a
    /// configured path, or any error from reading the requested tables.
    pub fn load_models(&self, models: &[BeadModel]) -> Result<FormFactorTable, TableLoadError> {
        let mut selected = TableConfig::default();
        for &model in models {
            let path = self
                .path(model)
                .ok_or(TableLoadError::MissingTable { model })?
                .to_path_buf();
            match model {
                BeadModel::OneBead => selected.one_bead_path = Some(path),
                BeadModel::TwoBead => selected.two_bead_path = Some(path),
            }
        }
        selected.load()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurveConfig {
    pub tables: TableConfig,
    pub sampling: QSampling,
}

#[derive(Default)]
pub struct CurveConfigBuilder {
    one_bead_path: Option<PathBuf>,
    two_bead_path: Option<PathBuf>,
    q_min: Option<f64>,
    q_max: Option<f64>,
    points: Option<usize>,
}

impl CurveConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn one_bead_table(mut self, path: PathBuf) -> Self {
        self.one_bead_path = Some(path);
        self
    }
    pub fn two_bead_table(mut self, path: PathBuf) -> Self {
        self.two_bead_path = Some(path);
        self
    }
    pub fn q_min(mut self, q_min: f64) -> Self {
        self.q_min = Some(q_min);
        self
    }
    pub fn q_max(mut self, q_max: f64) -> Self {
        self.q_max = Some(q_max);
        self
    }
    pub fn points(mut self, points: usize) -> Self {
        self.points = Some(points);
        self
    }

    /// At least one table path is required; unset sampling parameters take their
    /// defaults.
    pub fn build(self) -> Result<CurveConfig, ConfigError> {
        if self.one_bead_path.is_none() && self.two_bead_path.is_none() {
            return Err(ConfigError::MissingParameter("form_factor_table"));
        }
        let tables = TableConfig {
            one_bead_path: self.one_bead_path,
            two_bead_path: self.two_bead_path,
        };
        let sampling = QSampling::new(
            self.q_min.unwrap_or(DEFAULT_Q_MIN),
            self.q_max.unwrap_or(DEFAULT_Q_MAX),
            self.points.unwrap_or(DEFAULT_POINTS),
        )?;
        Ok(CurveConfig { tables, sampling })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formfactor::table::fixtures::one_bead_csv;
    use std::fs;
    use tempfile::tempdir;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn default_sampling_covers_reference_grid() {
        let values = QSampling::default().values();
        assert_eq!(values.len(), 20);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[19], 0.5);
        assert!(f64_approx_equal(values[1], 0.5 / 19.0));
    }

    #[test]
    fn single_point_samples_q_min() {
        let sampling = QSampling::new(0.1, 0.4, 1).unwrap();
        assert_eq!(sampling.values(), vec![0.1]);
    }

    #[test]
    fn equal_bounds_give_constant_q() {
        let sampling = QSampling::new(0.2, 0.2, 4).unwrap();
        assert_eq!(sampling.values(), vec![0.2; 4]);
    }

    #[test]
    fn invalid_sampling_is_rejected() {
        assert_eq!(QSampling::new(0.0, 0.5, 0), Err(ConfigError::NoSamples));
        assert!(matches!(
            QSampling::new(0.5, 0.1, 5),
            Err(ConfigError::InvertedRange { .. })
        ));
        assert!(matches!(
            QSampling::new(f64::NAN, 0.1, 5),
            Err(ConfigError::NonFiniteRange { .. })
        ));
    }

    #[test]
    fn builder_requires_a_table_path() {
        assert_eq!(
            CurveConfigBuilder::new().points(5).build(),
            Err(ConfigError::MissingParameter("form_factor_table"))
        );

        let config = CurveConfigBuilder::new()
            .two_bead_table(PathBuf::from("two.csv"))
            .build()
            .unwrap();
        assert_eq!(config.tables.one_bead_path, None);
        assert_eq!(config.tables.path(BeadModel::TwoBead), Some(Path::new("two.csv")));
    }

    #[test]
    fn load_models_reads_only_the_requested_tables() {
        let dir = tempdir().unwrap();
        let one_path = dir.path().join("one_bead.csv");
        fs::write(&one_path, one_bead_csv()).unwrap();
        let tables = TableConfig {
            one_bead_path: Some(one_path),
            two_bead_path: Some(dir.path().join("absent.csv")),
        };

        let table = tables.load_models(&[BeadModel::OneBead]).unwrap();
        assert!(table.has_model(BeadModel::OneBead));
        assert!(!table.has_model(BeadModel::TwoBead));

        assert!(matches!(
            tables.load_models(&[BeadModel::OneBead, BeadModel::TwoBead]),
            Err(TableLoadError::Io { .. })
        ));
    }

    #[test]
    fn load_models_reports_unconfigured_tables() {
        let tables = TableConfig {
            one_bead_path: Some(PathBuf::from("one.csv")),
            two_bead_path: None,
        };
        assert!(matches!(
            tables.load_models(&[BeadModel::TwoBead]),
            Err(TableLoadError::MissingTable {
                model: BeadModel::TwoBead
            })
        ));
    }

    #[test]
    fn builder_fills_sampling_defaults_and_overrides() {
        let config = CurveConfigBuilder::new()
            .one_bead_table(PathBuf::from("one.csv"))
            .two_bead_table(PathBuf::from("two.csv"))
            .points(5)
            .build()
            .unwrap();
        assert_eq!(config.tables.one_bead_path, Some(PathBuf::from("one.csv")));
        assert_eq!(config.sampling.q_min(), DEFAULT_Q_MIN);
        assert_eq!(config.sampling.q_max(), DEFAULT_Q_MAX);
        assert_eq!(config.sampling.points(), 5);
    }

    #[test]
    fn builder_validates_sampling() {
        let result = CurveConfigBuilder::new()
            .one_bead_table(PathBuf::from("one.csv"))
            .two_bead_table(PathBuf::from("two.csv"))
            .q_min(1.0)
            .build();
        assert!(matches!(result, Err(ConfigError::InvertedRange { .. })));
    }
}
