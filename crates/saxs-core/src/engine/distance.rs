use super::debye::sinc;
use nalgebra::{DMatrix, Point3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Symmetric matrix of pairwise Euclidean distances with a zero diagonal.
pub fn distance_matrix(points: &[Point3<f64>]) -> DMatrix<f64> {
    let n = points.len();
    let mut distances = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let d = nalgebra::distance(&points[i], &points[j]);
            distances[(i, j)] = d;
            distances[(j, i)] = d;
        }
    }
    distances
}

pub fn distance_matrices(conformers: &[Vec<Point3<f64>>]) -> Vec<DMatrix<f64>> {
    let iterator = conformers.iter();

    #[cfg(feature = "parallel")]
    let iterator = conformers.par_iter();

    iterator.map(|points| distance_matrix(points)).collect()
}

/// Element-wise mean over conformers of `sinc(d_ij * q)`.
///
/// All matrices must share one shape and the slice must not be empty.
pub fn mean_sinc_matrix(distances: &[DMatrix<f64>], q: f64) -> DMatrix<f64> {
    let (rows, cols) = distances.first().map_or((0, 0), |d| d.shape());
    let mut sum = DMatrix::zeros(rows, cols);
    for matrix in distances {
        sum.zip_apply(matrix, |s, d| *s += sinc(d * q));
    }
    if !distances.is_empty() {
        sum /= distances.len() as f64;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn distance_matrix_is_symmetric_with_zero_diagonal() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
        ];
        let d = distance_matrix(&points);
        assert_eq!(d.shape(), (3, 3));
        for i in 0..3 {
            assert_eq!(d[(i, i)], 0.0);
            for j in 0..3 {
                assert_eq!(d[(i, j)], d[(j, i)]);
            }
        }
        assert!((d[(0, 1)] - 5.0).abs() < TOLERANCE);
        assert!((d[(0, 2)] - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn distance_matrices_keep_conformer_order() {
        let conformers = vec![
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)],
        ];
        let matrices = distance_matrices(&conformers);
        assert_eq!(matrices.len(), 2);
        assert_eq!(matrices[0][(0, 1)], 1.0);
        assert_eq!(matrices[1][(0, 1)], 2.0);
    }

    #[test]
    fn mean_sinc_matrix_averages_before_combining() {
        let a = distance_matrix(&[Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)]);
        let b = distance_matrix(&[Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0)]);
        let q = 0.7;
        let mean = mean_sinc_matrix(&[a, b], q);
        let expected = 0.5 * ((0.7f64).sin() / 0.7 + (2.1f64).sin() / 2.1);
        assert!((mean[(0, 1)] - expected).abs() < TOLERANCE);
        assert!((mean[(1, 0)] - expected).abs() < TOLERANCE);
        assert_eq!(mean[(0, 0)], 1.0);
    }

    #[test]
    fn mean_sinc_matrix_accumulates_every_conformer() {
        let matrices: Vec<_> = (1..=50)
            .map(|k| {
                let step = 0.1 * k as f64;
                distance_matrix(&[
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(step, 0.0, 0.0),
                    Point3::new(0.0, 2.0 * step, 0.0),
                ])
            })
            .collect();
        let q = 0.35;
        let mean = mean_sinc_matrix(&matrices, q);

        assert_eq!(mean.shape(), (3, 3));
        for i in 0..3 {
            for j in 0..3 {
                let expected = matrices.iter().map(|m| sinc(m[(i, j)] * q)).sum::<f64>()
                    / matrices.len() as f64;
                assert!((mean[(i, j)] - expected).abs() < TOLERANCE);
            }
        }
        assert_eq!(mean_sinc_matrix(&[], q).shape(), (0, 0));
    }

    #[test]
    fn mean_sinc_matrix_at_zero_q_is_all_ones() {
        let d = distance_matrix(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(5.0, 0.0, 0.0),
        ]);
        let mean = mean_sinc_matrix(&[d], 0.0);
        assert!(mean.iter().all(|&v| v == 1.0));
    }
}
