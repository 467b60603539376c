use nalgebra::{Matrix3, Point3, Rotation3, Unit, Vector3};
use rand::Rng;
use std::f64::consts::PI;

/// Below this norm a vector is treated as having no direction.
pub const DIRECTION_EPSILON: f64 = 1e-9;

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Size-weighted split point of the segment `a`-`b`.
///
/// Each end is weighted by the *other* bead's size, so the point divides the segment in
/// the ratio of the two radii and lies on the surface where two touching spheres meet.
pub fn weighted_contact_point(
    a: &Point3<f64>,
    size_a: f64,
    b: &Point3<f64>,
    size_b: f64,
) -> Point3<f64> {
    Point3::from((a.coords * size_b + b.coords * size_a) / (size_a + size_b))
}

pub fn is_finite_point(p: &Point3<f64>) -> bool {
    p.coords.iter().all(|c| c.is_finite())
}

/// Draws a vector uniformly distributed on the unit sphere.
///
/// Inverse-transform sampling: `x` uniform in [-1, 1] and the azimuth `pi * u` with `u`
/// uniform in [-1, 1].
pub fn random_unit_vector(rng: &mut impl Rng) -> Unit<Vector3<f64>> {
    let x: f64 = rng.gen_range(-1.0..=1.0);
    let phi: f64 = rng.gen_range(-1.0..=1.0);
    let scale = (1.0 - x * x).max(0.0).sqrt();
    let y = scale * (PI * phi).sin();
    let z = scale * (PI * phi).cos();
    Unit::new_normalize(Vector3::new(x, y, z))
}

/// Right-handed orthonormal frame whose first axis is `direction`.
///
/// The rotation maps the reference x axis onto `direction`; its inverse maps `direction`
/// back onto x. The two perpendicular axes are built from a random unit vector, so the
/// frame's roll about `direction` is uniformly random.
pub fn random_frame_along(direction: &Unit<Vector3<f64>>, rng: &mut impl Rng) -> Rotation3<f64> {
    let axis: &Vector3<f64> = direction.as_ref();
    let perpendicular = loop {
        let helper = random_unit_vector(rng);
        if let Some(p) = Unit::try_new(helper.into_inner().cross(axis), DIRECTION_EPSILON) {
            break p.into_inner();
        }
    };
    let third = axis.cross(&perpendicular);
    Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[*axis, perpendicular, third]))
}

/// Rotation taking `from` onto `to`, with a random roll about `to`.
pub fn random_alignment(
    from: &Unit<Vector3<f64>>,
    to: &Unit<Vector3<f64>>,
    rng: &mut impl Rng,
) -> Rotation3<f64> {
    let to_reference = random_frame_along(from, rng).inverse();
    let from_reference = random_frame_along(to, rng);
    from_reference * to_reference
}
