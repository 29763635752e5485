/// A per-example target or prediction value.
///
/// Scalar regression uses `f64`, multi-output regression uses `Vec<f64>`.
/// All arithmetic is componentwise; vector values combined together must have
/// the same length.
pub trait Output: Clone + std::fmt::Debug + Send + Sync {
    /// Number of components (always 1 for scalars).
    fn width(&self) -> usize;

    /// Adds `other` to `self` componentwise.
    fn add_assign(&mut self, other: &Self);

    /// Multiplies every component by `factor`.
    fn scale(&mut self, factor: f64);

    /// Componentwise `(self - truth)^2`.
    fn squared_error(&self, truth: &Self) -> Self;

    /// Returns `true` if any component is NaN.
    fn has_nan(&self) -> bool;
}

impl Output for f64 {
    fn width(&self) -> usize {
        1
    }

    fn add_assign(&mut self, other: &Self) {
        *self += *other;
    }

    fn scale(&mut self, factor: f64) {
        *self *= factor;
    }

    fn squared_error(&self, truth: &Self) -> Self {
        (self - truth).powi(2)
    }

    fn has_nan(&self) -> bool {
        self.is_nan()
    }
}

impl Output for Vec<f64> {
    fn width(&self) -> usize {
        self.len()
    }

    fn add_assign(&mut self, other: &Self) {
        debug_assert_eq!(self.len(), other.len());
        for (x, y) in self.iter_mut().zip(other.iter()) {
            *x += *y;
        }
    }

    fn scale(&mut self, factor: f64) {
        for x in self.iter_mut() {
            *x *= factor;
        }
    }

    fn squared_error(&self, truth: &Self) -> Self {
        debug_assert_eq!(self.len(), truth.len());
        self.iter()
            .zip(truth.iter())
            .map(|(x, y)| (x - y).powi(2))
            .collect()
    }

    fn has_nan(&self) -> bool {
        self.iter().any(|x| x.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_ops_are_componentwise() {
        let mut v = vec![1.0, 2.0];
        v.add_assign(&vec![3.0, 4.0]);
        v.scale(0.5);
        assert_eq!(v, vec![2.0, 3.0]);
        assert_eq!(v.squared_error(&vec![0.0, 5.0]), vec![4.0, 4.0]);
        assert!(!v.has_nan());
        assert_eq!(v.width(), 2);
        assert_eq!(Output::width(&7.0_f64), 1);
        assert!(vec![0.0, f64::NAN].has_nan());
    }

    #[test]
    fn scalar_nan_propagates_into_squared_error() {
        assert!(f64::NAN.squared_error(&1.0).has_nan());
        assert_eq!(3.0_f64.squared_error(&1.0), 4.0);
    }
}
