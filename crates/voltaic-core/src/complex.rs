//! Phasor helpers over `num_complex::Complex<f64>`.

use num_complex::Complex;

use crate::EPSILON;

/// Build a phasor from a magnitude and a phase in degrees.
pub fn polar_deg(magnitude: f64, phase_deg: f64) -> Complex<f64> {
    Complex::from_polar(magnitude, phase_deg.to_radians())
}

/// Reciprocal of `z`, or `None` when `|z|^2` is below the degeneracy floor.
///
/// Assembly paths treat a degenerate reciprocal as a zero stamp (an inductor
/// at f → 0 contributes nothing); callers that cannot do so surface it as an
/// arithmetic error.
pub fn checked_recip(z: Complex<f64>) -> Option<Complex<f64>> {
    if z.norm_sqr() < EPSILON {
        None
    } else {
        Some(z.inv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_deg_quadrants() {
        let z = polar_deg(2.0, 90.0);
        assert!(z.re.abs() < 1e-12);
        assert!((z.im - 2.0).abs() < 1e-12);

        let z = polar_deg(1.0, -45.0);
        assert!((z.re - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!((z.im + std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn recip_of_near_zero_is_degenerate() {
        assert!(checked_recip(Complex::new(0.0, 0.0)).is_none());
        assert!(checked_recip(Complex::new(1e-9, 0.0)).is_none());

        let r = checked_recip(Complex::new(0.0, 2.0)).unwrap();
        assert!((r - Complex::new(0.0, -0.5)).norm() < 1e-12);
    }
}
