use super::interpolation::Profile;
use crate::core::models::bead::{BeadIdentity, BeadModel, BeadSpec};
use crate::core::models::residue::{ResidueError, ResidueType};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Column slot of the backbone pseudo-residue in a two-bead profile set.
const BACKBONE_SLOT: usize = 20;

#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{origin}': {source}")]
    Csv { origin: String, source: csv::Error },
    #[error("Form-factor table '{origin}' must start with a 'q' column")]
    MissingQColumn { origin: String },
    #[error("Form-factor table '{origin}' has an unrecognized column '{column}': {source}")]
    UnknownColumn {
        origin: String,
        column: String,
        source: ResidueError,
    },
    #[error("One-bead form-factor table '{origin}' must not contain a backbone column")]
    UnexpectedBackboneColumn { origin: String },
    #[error("Form-factor table '{origin}' contains column '{column}' more than once")]
    DuplicateColumn { origin: String, column: String },
    #[error("Form-factor table '{origin}' is missing the column for '{column}'")]
    MissingColumn { origin: String, column: String },
    #[error("Form-factor table '{origin}' contains no data rows")]
    Empty { origin: String },
    #[error("Invalid number '{value}' in column '{column}' on line {line} of '{origin}'")]
    InvalidValue {
        origin: String,
        line: usize,
        column: String,
        value: String,
    },
    #[error("Non-finite value in column '{column}' on line {line} of '{origin}'")]
    NonFiniteValue {
        origin: String,
        line: usize,
        column: String,
    },
    #[error("The q grid of '{origin}' is not strictly increasing at line {line}")]
    NonIncreasingGrid { origin: String, line: usize },
    #[error("At least one form-factor table is required")]
    NoTables,
    #[error("No path configured for the {model} form-factor table")]
    MissingTable { model: BeadModel },
    #[error("Expected a {expected} profile set, found a {found} one")]
    ModelMismatch {
        expected: BeadModel,
        found: BeadModel,
    },
}

/// All tabulated profiles of one bead model, sharing a single `q` grid.
///
/// Columns are stored by residue index (see [`ResidueType::index`]); two-bead sets carry
/// one extra column for the backbone pseudo-residue.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSet {
    model: BeadModel,
    grid: Vec<f64>,
    columns: Vec<Vec<f64>>,
}

impl ProfileSet {
    /// Parses a CSV table whose first column is `q` and whose remaining columns are
    /// named by residue codes (one- or three-letter) or `BB`.
    ///
    /// # Arguments
    ///
    /// * `reader` - Source of the CSV text.
    /// * `model` - Bead model the table belongs to; only two-bead tables may carry `BB`.
    /// * `origin` - Human-readable name of the source used in error messages.
    ///
    /// # Errors
    ///
    /// Returns a [`TableLoadError`] describing the first malformed header, missing
    /// residue column, unparsable or non-finite value, or non-increasing `q` value.
    pub fn from_reader(
        reader: impl Read,
        model: BeadModel,
        origin: &str,
    ) -> Result<Self, TableLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| TableLoadError::Csv {
                origin: origin.to_string(),
                source: e,
            })?
            .clone();

        let mut header_iter = headers.iter();
        match header_iter.next() {
            Some(first) if first.eq_ignore_ascii_case("q") => {}
            _ => {
                return Err(TableLoadError::MissingQColumn {
                    origin: origin.to_string(),
                });
            }
        }

        let slot_count = match model {
            BeadModel::OneBead => ResidueType::ALL.len(),
            BeadModel::TwoBead => ResidueType::ALL.len() + 1,
        };
        let mut slot_of_column = Vec::with_capacity(headers.len() - 1);
        let mut seen = vec![false; slot_count];
        for name in header_iter {
            let identity: BeadIdentity =
                name.parse()
                    .map_err(|source| TableLoadError::UnknownColumn {
                        origin: origin.to_string(),
                        column: name.to_string(),
                        source,
                    })?;
            let slot = match (identity, model) {
                (BeadIdentity::Residue(residue), _) => residue.index(),
                (BeadIdentity::Backbone, BeadModel::TwoBead) => BACKBONE_SLOT,
                (BeadIdentity::Backbone, BeadModel::OneBead) => {
                    return Err(TableLoadError::UnexpectedBackboneColumn {
                        origin: origin.to_string(),
                    });
                }
            };
            if std::mem::replace(&mut seen[slot], true) {
                return Err(TableLoadError::DuplicateColumn {
                    origin: origin.to_string(),
                    column: name.to_string(),
                });
            }
            slot_of_column.push(slot);
        }

        if let Some(missing) = seen.iter().position(|present| !present) {
            let column = ResidueType::from_index(missing)
                .map(|r| r.three_letter_code().to_string())
                .unwrap_or_else(|| BeadIdentity::Backbone.to_string());
            return Err(TableLoadError::MissingColumn {
                origin: origin.to_string(),
                column,
            });
        }

        let mut grid = Vec::new();
        let mut columns = vec![Vec::new(); slot_count];
        for (row_index, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| TableLoadError::Csv {
                origin: origin.to_string(),
                source: e,
            })?;
            let line = row_index + 2;

            let mut values = Vec::with_capacity(record.len());
            for (field, column) in record.iter().zip(headers.iter()) {
                let value: f64 = field.parse().map_err(|_| TableLoadError::InvalidValue {
                    origin: origin.to_string(),
                    line,
                    column: column.to_string(),
                    value: field.to_string(),
                })?;
                if !value.is_finite() {
                    return Err(TableLoadError::NonFiniteValue {
                        origin: origin.to_string(),
                        line,
                        column: column.to_string(),
                    });
                }
                values.push(value);
            }

            let q = values[0];
            if grid.last().is_some_and(|&previous| q <= previous) {
                return Err(TableLoadError::NonIncreasingGrid {
                    origin: origin.to_string(),
                    line,
                });
            }
            grid.push(q);
            for (&slot, &value) in slot_of_column.iter().zip(&values[1..]) {
                columns[slot].push(value);
            }
        }

        if grid.is_empty() {
            return Err(TableLoadError::Empty {
                origin: origin.to_string(),
            });
        }

        debug!(
            "Loaded {} form-factor table '{}' with {} q points in [{}, {}].",
            model,
            origin,
            grid.len(),
            grid[0],
            grid[grid.len() - 1]
        );

        Ok(Self {
            model,
            grid,
            columns,
        })
    }

    pub fn from_path(path: &Path, model: BeadModel) -> Result<Self, TableLoadError> {
        let origin = path.to_string_lossy().to_string();
        let file = File::open(path).map_err(|e| TableLoadError::Io {
            path: origin.clone(),
            source: e,
        })?;
        Self::from_reader(file, model, &origin)
    }

    pub fn model(&self) -> BeadModel {
        self.model
    }

    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    fn slot_profile(&self, slot: usize) -> Profile<'_> {
        Profile::new(&self.grid, &self.columns[slot])
    }
}

/// Failure to resolve a bead's form factor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormFactorError {
    #[error(transparent)]
    Residue(#[from] ResidueError),
    #[error("No {model} form-factor table was loaded")]
    TableNotLoaded { model: BeadModel },
}

/// The one-bead and two-bead form-factor tables.
///
/// Either table may be absent when the computations at hand never use its model;
/// lookups against a missing table fail with [`FormFactorError::TableNotLoaded`].
/// Read-only after construction and `Send + Sync`, so a single instance can be shared
/// by every curve computation of a process.
#[derive(Debug, Clone, PartialEq)]
pub struct FormFactorTable {
    one_bead: Option<ProfileSet>,
    two_bead: Option<ProfileSet>,
}

impl FormFactorTable {
    pub fn new(
        one_bead: Option<ProfileSet>,
        two_bead: Option<ProfileSet>,
    ) -> Result<Self, TableLoadError> {
        for (set, expected) in [
            (&one_bead, BeadModel::OneBead),
            (&two_bead, BeadModel::TwoBead),
        ] {
            match set {
                Some(set) if set.model != expected => {
                    return Err(TableLoadError::ModelMismatch {
                        expected,
                        found: set.model,
                    });
                }
                _ => {}
            }
        }
        if one_bead.is_none() && two_bead.is_none() {
            return Err(TableLoadError::NoTables);
        }
        Ok(Self { one_bead, two_bead })
    }

    /// Loads the tables whose paths are given.
    pub fn load(
        one_bead_path: Option<&Path>,
        two_bead_path: Option<&Path>,
    ) -> Result<Self, TableLoadError> {
        let one_bead = one_bead_path
            .map(|path| ProfileSet::from_path(path, BeadModel::OneBead))
            .transpose()?;
        let two_bead = two_bead_path
            .map(|path| ProfileSet::from_path(path, BeadModel::TwoBead))
            .transpose()?;
        Self::new(one_bead, two_bead)
    }

    pub fn from_readers(one_bead: impl Read, two_bead: impl Read) -> Result<Self, TableLoadError> {
        let one_bead = ProfileSet::from_reader(one_bead, BeadModel::OneBead, "<one-bead>")?;
        let two_bead = ProfileSet::from_reader(two_bead, BeadModel::TwoBead, "<two-bead>")?;
        Self::new(Some(one_bead), Some(two_bead))
    }

    pub fn has_model(&self, model: BeadModel) -> bool {
        self.profile_set(model).is_ok()
    }

    fn profile_set(&self, model: BeadModel) -> Result<&ProfileSet, FormFactorError> {
        let set = match model {
            BeadModel::OneBead => self.one_bead.as_ref(),
            BeadModel::TwoBead => self.two_bead.as_ref(),
        };
        set.ok_or(FormFactorError::TableNotLoaded { model })
    }

    /// The tabulated profile a bead's form factor is interpolated from.
    pub fn profile(&self, bead: BeadSpec) -> Result<Profile<'_>, FormFactorError> {
        let set = self.profile_set(bead.model())?;
        let slot = match bead.identity() {
            BeadIdentity::Residue(residue) => residue.index(),
            // `BeadSpec` never pairs the backbone with the one-bead model.
            BeadIdentity::Backbone => BACKBONE_SLOT,
        };
        Ok(set.slot_profile(slot))
    }

    /// One-bead form factor of `residue` at scattering vector `q`.
    pub fn form_factor(&self, residue: ResidueType, q: f64) -> Result<f64, FormFactorError> {
        self.form_factor_for(BeadSpec::one_bead(residue), q)
    }

    /// Two-bead form factor of a side chain or of the backbone site at `q`.
    pub fn form_factor_two_bead(
        &self,
        identity: BeadIdentity,
        q: f64,
    ) -> Result<f64, FormFactorError> {
        let bead = match identity {
            BeadIdentity::Residue(residue) => BeadSpec::side_chain(residue),
            BeadIdentity::Backbone => BeadSpec::backbone(),
        };
        self.form_factor_for(bead, q)
    }

    pub fn form_factor_for(&self, bead: BeadSpec, q: f64) -> Result<f64, FormFactorError> {
        Ok(self.profile(bead)?.at(q))
    }

    /// One-bead form factor looked up by textual residue code.
    ///
    /// # Errors
    ///
    /// Fails for codes that are not 1 or 3 characters long, unknown codes, the
    /// backbone code `BB` (which has no one-bead form factor) and a missing one-bead
    /// table.
    pub fn form_factor_by_code(&self, code: &str, q: f64) -> Result<f64, FormFactorError> {
        match code.parse::<BeadIdentity>()? {
            BeadIdentity::Residue(residue) => self.form_factor(residue, q),
            BeadIdentity::Backbone => Err(ResidueError::BackboneNotAllowed.into()),
        }
    }

    /// Two-bead form factor looked up by textual residue code or `BB`.
    pub fn form_factor_two_bead_by_code(
        &self,
        code: &str,
        q: f64,
    ) -> Result<f64, FormFactorError> {
        let identity: BeadIdentity = code.parse()?;
        self.form_factor_two_bead(identity, q)
    }

    /// Tabulated `q` range `(first, last)` of the given model, if its table is loaded.
    pub fn q_range(&self, model: BeadModel) -> Option<(f64, f64)> {
        let grid = &self.profile_set(model).ok()?.grid;
        Some((grid[0], grid[grid.len() - 1]))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub const GRID_STEP: f64 = 0.05;
    pub const GRID_POINTS: usize = 11;

    /// Synthetic one-bead form factor: linear in `q` on the tabulated range.
    pub fn one_bead_value(residue: ResidueType, q: f64) -> f64 {
        let q = q.clamp(0.0, GRID_STEP * (GRID_POINTS - 1) as f64);
        (residue.index() + 1) as f64 * (1.0 - q)
    }

    pub fn two_bead_value(identity: BeadIdentity, q: f64) -> f64 {
        let q = q.clamp(0.0, GRID_STEP * (GRID_POINTS - 1) as f64);
        match identity {
            BeadIdentity::Backbone => 4.0 - 2.0 * q,
            BeadIdentity::Residue(residue) => 0.5 * (residue.index() + 1) as f64 * (1.0 - q),
        }
    }

    pub fn one_bead_csv() -> String {
        let mut csv = String::from("q");
        for residue in ResidueType::ALL {
            csv.push_str(&format!(",{}", residue.three_letter_code()));
        }
        csv.push('\n');
        for i in 0..GRID_POINTS {
            let q = i as f64 * GRID_STEP;
            csv.push_str(&format!("{}", q));
            for residue in ResidueType::ALL {
                csv.push_str(&format!(",{}", one_bead_value(residue, q)));
            }
            csv.push('\n');
        }
        csv
    }

    pub fn two_bead_csv() -> String {
        let mut csv = String::from("q,BB");
        for residue in ResidueType::ALL {
            csv.push_str(&format!(",{}", residue.one_letter_code()));
        }
        csv.push('\n');
        for i in 0..GRID_POINTS {
            let q = i as f64 * GRID_STEP;
            csv.push_str(&format!("{},{}", q, two_bead_value(BeadIdentity::Backbone, q)));
            for residue in ResidueType::ALL {
                csv.push_str(&format!(
                    ",{}",
                    two_bead_value(BeadIdentity::Residue(residue), q)
                ));
            }
            csv.push('\n');
        }
        csv
    }

    pub fn synthetic_table() -> FormFactorTable {
        FormFactorTable::from_readers(one_bead_csv().as_bytes(), two_bead_csv().as_bytes())
            .expect("synthetic tables must load")
    }
}
