use crate::output::Output;

/// Componentwise mean of `xs`, or `None` if `xs` is empty.
pub fn mean<'a, T: 'a + Output>(xs: impl IntoIterator<Item = &'a T>) -> Option<T> {
    let mut xs = xs.into_iter();
    let mut total = xs.next()?.clone();
    let mut count = 1;
    for x in xs {
        count += 1;
        total.add_assign(x);
    }
    total.scale(1.0 / count as f64);
    Some(total)
}

pub fn variance(xs: impl Iterator<Item = f64> + Clone) -> f64 {
    let n = xs.clone().count();
    assert_ne!(n, 0);
    let m = xs.clone().sum::<f64>() / n as f64;
    xs.map(|x| (x - m).powi(2)).sum::<f64>() / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_nothing_is_absent() {
        assert_eq!(mean::<f64>(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(
            mean(&[vec![1.0, 0.0], vec![3.0, 4.0]]),
            Some(vec![2.0, 2.0])
        );
    }

    #[test]
    fn variance_works() {
        assert_eq!(variance([1.0, 1.0].iter().copied()), 0.0);
        assert_eq!(variance([1.0, 3.0].iter().copied()), 1.0);
    }
}
