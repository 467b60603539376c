/// Piecewise-linear interpolation of `ys` over the increasing grid `xs`.
///
/// Queries below the first or above the last grid point return the corresponding edge
/// value. `xs` must be non-empty, strictly increasing and as long as `ys`.
pub fn interpolate_clamped(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert!(!xs.is_empty());
    debug_assert_eq!(xs.len(), ys.len());

    if x.is_nan() {
        return f64::NAN;
    }
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }

    // xs[0] < x < xs[last], so `upper` lies in 1..=last.
    let upper = xs.partition_point(|&grid_x| grid_x <= x);
    let lower = upper - 1;
    let t = (x - xs[lower]) / (xs[upper] - xs[lower]);
    ys[lower] + t * (ys[upper] - ys[lower])
}

/// A single tabulated profile borrowed from a table.
#[derive(Debug, Clone, Copy)]
pub struct Profile<'a> {
    grid: &'a [f64],
    values: &'a [f64],
}

impl<'a> Profile<'a> {
    pub(crate) fn new(grid: &'a [f64], values: &'a [f64]) -> Self {
        Self { grid, values }
    }

    #[inline]
    pub fn at(&self, q: f64) -> f64 {
        interpolate_clamped(self.grid, self.values, q)
    }

    pub fn grid(&self) -> &'a [f64] {
        self.grid
    }

    pub fn values(&self) -> &'a [f64] {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    const XS: [f64; 4] = [0.0, 0.1, 0.2, 0.3];
    const YS: [f64; 4] = [10.0, 8.0, 9.0, 2.0];

    #[test]
    fn returns_tabulated_values_at_grid_points() {
        for (x, y) in XS.iter().zip(YS.iter()) {
            assert!(f64_approx_equal(interpolate_clamped(&XS, &YS, *x), *y));
        }
    }

    #[test]
    fn interpolates_linearly_between_grid_points() {
        assert!(f64_approx_equal(interpolate_clamped(&XS, &YS, 0.05), 9.0));
        assert!(f64_approx_equal(interpolate_clamped(&XS, &YS, 0.175), 8.75));
        assert!(f64_approx_equal(interpolate_clamped(&XS, &YS, 0.25), 5.5));
    }

    #[test]
    fn interpolated_values_lie_between_neighbouring_grid_values() {
        for window in 0..XS.len() - 1 {
            let (lo, hi) = (YS[window].min(YS[window + 1]), YS[window].max(YS[window + 1]));
            for step in 1..10 {
                let x = XS[window] + (XS[window + 1] - XS[window]) * step as f64 / 10.0;
                let y = interpolate_clamped(&XS, &YS, x);
                assert!(y >= lo - TOLERANCE && y <= hi + TOLERANCE);
            }
        }
    }

    #[test]
    fn clamps_outside_the_grid() {
        assert_eq!(interpolate_clamped(&XS, &YS, -1.0), 10.0);
        assert_eq!(interpolate_clamped(&XS, &YS, 0.31), 2.0);
        assert_eq!(interpolate_clamped(&XS, &YS, 100.0), 2.0);
    }

    #[test]
    fn single_point_grid_is_constant() {
        assert_eq!(interpolate_clamped(&[0.2], &[3.5], 0.0), 3.5);
        assert_eq!(interpolate_clamped(&[0.2], &[3.5], 0.2), 3.5);
        assert_eq!(interpolate_clamped(&[0.2], &[3.5], 0.4), 3.5);
    }

    #[test]
    fn nan_query_yields_nan() {
        assert!(interpolate_clamped(&XS, &YS, f64::NAN).is_nan());
    }

    #[test]
    fn profile_delegates_to_interpolation() {
        let profile = Profile::new(&XS, &YS);
        assert!(f64_approx_equal(profile.at(0.05), 9.0));
        assert_eq!(profile.grid().len(), 4);
        assert_eq!(profile.values()[3], 2.0);
    }
}
