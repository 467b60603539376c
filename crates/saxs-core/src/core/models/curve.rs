/// A computed scattering curve: intensities `I(q)` sampled at increasing `q` values.
///
/// Units follow the form-factor tables: `q` in inverse Angstrom, intensity in the
/// squared units of the form factors.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatteringCurve {
    q: Vec<f64>,
    intensity: Vec<f64>,
}

impl ScatteringCurve {
    pub(crate) fn new(q: Vec<f64>, intensity: Vec<f64>) -> Self {
        debug_assert_eq!(q.len(), intensity.len());
        Self { q, intensity }
    }

    pub fn q_values(&self) -> &[f64] {
        &self.q
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensity
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.q.iter().copied().zip(self.intensity.iter().copied())
    }

    /// Divides every intensity by the first one, `I(q) / I(q_min)`.
    ///
    /// Returns `None` when the first intensity is zero or not finite.
    pub fn normalized(&self) -> Option<ScatteringCurve> {
        let first = *self.intensity.first()?;
        if first == 0.0 || !first.is_finite() {
            return None;
        }
        Some(Self::new(
            self.q.clone(),
            self.intensity.iter().map(|i| i / first).collect(),
        ))
    }

    /// Splits the curve into its `(q, I(q))` sequences.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.q, self.intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_divides_by_first_intensity() {
        let curve = ScatteringCurve::new(vec![0.0, 0.1, 0.2], vec![4.0, 2.0, 1.0]);
        let normalized = curve.normalized().unwrap();
        assert_eq!(normalized.q_values(), &[0.0, 0.1, 0.2]);
        assert_eq!(normalized.intensities(), &[1.0, 0.5, 0.25]);
    }

    #[test]
    fn normalized_returns_none_for_zero_forward_intensity() {
        let curve = ScatteringCurve::new(vec![0.0, 0.1], vec![0.0, 1.0]);
        assert!(curve.normalized().is_none());
    }

    #[test]
    fn iter_and_into_parts_preserve_order() {
        let curve = ScatteringCurve::new(vec![0.0, 0.5], vec![9.0, 3.0]);
        let pairs: Vec<_> = curve.iter().collect();
        assert_eq!(pairs, vec![(0.0, 9.0), (0.5, 3.0)]);
        assert_eq!(curve.len(), 2);
        assert!(!curve.is_empty());
        let (q, i) = curve.into_parts();
        assert_eq!(q, vec![0.0, 0.5]);
        assert_eq!(i, vec![9.0, 3.0]);
    }
}
