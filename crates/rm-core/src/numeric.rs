/// Floating point type used for every engine quantity.
pub type Real = f64;

/// Strictly positive and finite.
pub fn is_positive_finite(v: Real) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_finite() {
        assert!(is_positive_finite(1e-9));
        assert!(!is_positive_finite(0.0));
        assert!(!is_positive_finite(-2.0));
        assert!(!is_positive_finite(Real::INFINITY));
        assert!(!is_positive_finite(Real::NAN));
    }
}
