use crate::core::models::curve::ScatteringCurve;
use crate::core::utils::geometry::is_finite_point;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CoordinateError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error for '{origin}': {source}")]
    Csv { origin: String, source: csv::Error },
    #[error("'{origin}' contains no coordinate rows")]
    Empty { origin: String },
    #[error("Non-finite value on line {line} of '{origin}'")]
    NonFinite { origin: String, line: usize },
    #[error(
        "Conformer {conformer} on line {line} of '{origin}' breaks the contiguous 0-based numbering"
    )]
    NonContiguousConformer {
        origin: String,
        line: usize,
        conformer: usize,
    },
    #[error("Conformer {conformer} in '{origin}' has {found} beads, expected {expected}")]
    RaggedEnsemble {
        origin: String,
        conformer: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Deserialize)]
struct PointRecord {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Deserialize)]
struct SizedPointRecord {
    x: f64,
    y: f64,
    z: f64,
    size: f64,
}

#[derive(Debug, Deserialize)]
struct ConformerPointRecord {
    conformer: usize,
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Serialize)]
struct PointRow {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Serialize)]
struct ConformerPointRow {
    conformer: usize,
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Serialize)]
struct CurveRow {
    q: f64,
    intensity: f64,
}

/// Bead locations paired with their sizes, as used by bead replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct SizedChain {
    pub locations: Vec<Point3<f64>>,
    pub sizes: Vec<f64>,
}

fn open(path: &Path) -> Result<(File, String), CoordinateError> {
    let origin = path.to_string_lossy().to_string();
    let file = File::open(path).map_err(|e| CoordinateError::Io {
        path: origin.clone(),
        source: e,
    })?;
    Ok((file, origin))
}

fn create(path: &Path) -> Result<(File, String), CoordinateError> {
    let origin = path.to_string_lossy().to_string();
    let file = File::create(path).map_err(|e| CoordinateError::Io {
        path: origin.clone(),
        source: e,
    })?;
    Ok((file, origin))
}

fn read_records<T: for<'de> Deserialize<'de>>(
    reader: impl Read,
    origin: &str,
) -> Result<Vec<(usize, T)>, CoordinateError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let records = csv_reader
        .deserialize::<T>()
        .enumerate()
        .map(|(row_index, record)| {
            record
                .map(|r| (row_index + 2, r))
                .map_err(|e| CoordinateError::Csv {
                    origin: origin.to_string(),
                    source: e,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if records.is_empty() {
        return Err(CoordinateError::Empty {
            origin: origin.to_string(),
        });
    }
    Ok(records)
}

fn checked_point(x: f64, y: f64, z: f64, line: usize, origin: &str) -> Result<Point3<f64>, CoordinateError> {
    let point = Point3::new(x, y, z);
    if is_finite_point(&point) {
        Ok(point)
    } else {
        Err(CoordinateError::NonFinite {
            origin: origin.to_string(),
            line,
        })
    }
}

/// Reads an `x,y,z` CSV file into a list of points.
pub fn read_points(reader: impl Read, origin: &str) -> Result<Vec<Point3<f64>>, CoordinateError> {
    read_records::<PointRecord>(reader, origin)?
        .into_iter()
        .map(|(line, r)| checked_point(r.x, r.y, r.z, line, origin))
        .collect()
}

pub fn read_points_from_path(path: &Path) -> Result<Vec<Point3<f64>>, CoordinateError> {
    let (file, origin) = open(path)?;
    read_points(file, &origin)
}

/// Reads an `x,y,z,size` CSV file.
pub fn read_sized_chain(reader: impl Read, origin: &str) -> Result<SizedChain, CoordinateError> {
    let records = read_records::<SizedPointRecord>(reader, origin)?;
    let mut locations = Vec::with_capacity(records.len());
    let mut sizes = Vec::with_capacity(records.len());
    for (line, r) in records {
        locations.push(checked_point(r.x, r.y, r.z, line, origin)?);
        if !r.size.is_finite() {
            return Err(CoordinateError::NonFinite {
                origin: origin.to_string(),
                line,
            });
        }
        sizes.push(r.size);
    }
    Ok(SizedChain { locations, sizes })
}

pub fn read_sized_chain_from_path(path: &Path) -> Result<SizedChain, CoordinateError> {
    let (file, origin) = open(path)?;
    read_sized_chain(file, &origin)
}

/// Reads a `conformer,x,y,z` CSV file into one point list per conformer.
///
/// Conformer ids must start at 0 and appear as contiguous blocks in increasing order,
/// and every conformer must have the same number of beads.
pub fn read_ensemble(
    reader: impl Read,
    origin: &str,
) -> Result<Vec<Vec<Point3<f64>>>, CoordinateError> {
    let mut conformers: Vec<Vec<Point3<f64>>> = Vec::new();
    for (line, r) in read_records::<ConformerPointRecord>(reader, origin)? {
        let current = conformers.len().checked_sub(1);
        if Some(r.conformer) != current {
            if r.conformer != conformers.len() {
                return Err(CoordinateError::NonContiguousConformer {
                    origin: origin.to_string(),
                    line,
                    conformer: r.conformer,
                });
            }
            conformers.push(Vec::new());
        }
        let point = checked_point(r.x, r.y, r.z, line, origin)?;
        if let Some(conformer) = conformers.last_mut() {
            conformer.push(point);
        }
    }

    let expected = conformers[0].len();
    if let Some((index, conformer)) = conformers
        .iter()
        .enumerate()
        .find(|(_, c)| c.len() != expected)
    {
        return Err(CoordinateError::RaggedEnsemble {
            origin: origin.to_string(),
            conformer: index,
            expected,
            found: conformer.len(),
        });
    }

    debug!(
        "Read {} conformers of {} beads from '{}'.",
        conformers.len(),
        expected,
        origin
    );
    Ok(conformers)
}

pub fn read_ensemble_from_path(path: &Path) -> Result<Vec<Vec<Point3<f64>>>, CoordinateError> {
    let (file, origin) = open(path)?;
    read_ensemble(file, &origin)
}

pub fn write_points(
    writer: impl Write,
    points: &[Point3<f64>],
    origin: &str,
) -> Result<(), CoordinateError> {
    let csv_err = |e| CoordinateError::Csv {
        origin: origin.to_string(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);
    for p in points {
        csv_writer
            .serialize(PointRow {
                x: p.x,
                y: p.y,
                z: p.z,
            })
            .map_err(csv_err)?;
    }
    csv_writer.flush().map_err(|e| CoordinateError::Io {
        path: origin.to_string(),
        source: e,
    })
}

pub fn write_points_to_path(path: &Path, points: &[Point3<f64>]) -> Result<(), CoordinateError> {
    let (file, origin) = create(path)?;
    write_points(file, points, &origin)
}

/// Writes conformers as `conformer,x,y,z` rows, the layout [`read_ensemble`] accepts.
pub fn write_ensemble(
    writer: impl Write,
    conformers: &[Vec<Point3<f64>>],
    origin: &str,
) -> Result<(), CoordinateError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (conformer, points) in conformers.iter().enumerate() {
        for p in points {
            csv_writer
                .serialize(ConformerPointRow {
                    conformer,
                    x: p.x,
                    y: p.y,
                    z: p.z,
                })
                .map_err(|e| CoordinateError::Csv {
                    origin: origin.to_string(),
                    source: e,
                })?;
        }
    }
    csv_writer.flush().map_err(|e| CoordinateError::Io {
        path: origin.to_string(),
        source: e,
    })
}

pub fn write_ensemble_to_path(
    path: &Path,
    conformers: &[Vec<Point3<f64>>],
) -> Result<(), CoordinateError> {
    let (file, origin) = create(path)?;
    write_ensemble(file, conformers, &origin)
}

/// Writes a curve as `q,intensity` rows.
pub fn write_curve(
    writer: impl Write,
    curve: &ScatteringCurve,
    origin: &str,
) -> Result<(), CoordinateError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (q, intensity) in curve.iter() {
        csv_writer
            .serialize(CurveRow { q, intensity })
            .map_err(|e| CoordinateError::Csv {
                origin: origin.to_string(),
                source: e,
            })?;
    }
    csv_writer.flush().map_err(|e| CoordinateError::Io {
        path: origin.to_string(),
        source: e,
    })
}

pub fn write_curve_to_path(path: &Path, curve: &ScatteringCurve) -> Result<(), CoordinateError> {
    let (file, origin) = create(path)?;
    write_curve(file, curve, &origin)
}
