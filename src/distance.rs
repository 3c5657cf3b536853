use std::f64::consts::PI;

use crate::cluster::ClusteredJet;
use crate::event::RecoJet;

/// A distance between a clustered jet and a reconstructed jet
pub trait Distance {
    fn distance(&self, jet: &ClusteredJet, candidate: &RecoJet) -> f64;
}

/// The angular distance ΔR in the rapidity-azimuth plane
///
/// The rapidity of the clustered jet is compared to the pseudorapidity
/// of the reconstructed jet.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct DeltaR;

impl Distance for DeltaR {
    fn distance(&self, jet: &ClusteredJet, candidate: &RecoJet) -> f64 {
        delta_r(
            candidate.eta.into(),
            candidate.phi.into(),
            jet.rap(),
            jet.phi(),
        )
    }
}

/// Azimuthal difference φ1 - φ2 mapped to [-π, π]
///
/// The result is NaN if either angle is not finite.
pub fn delta_phi(phi1: f64, phi2: f64) -> f64 {
    let dphi = phi1 - phi2;
    // reduce the magnitude to keep delta_phi(a, b) == -delta_phi(b, a)
    let mut abs = dphi.abs() % (2. * PI);
    if abs > PI {
        abs -= 2. * PI;
    }
    dphi.signum() * abs
}

/// ΔR = sqrt(Δy² + Δφ²)
pub fn delta_r(y1: f64, phi1: f64, y2: f64, phi2: f64) -> f64 {
    let dy = y1 - y2;
    let dphi = delta_phi(phi1, phi2);
    (dy * dy + dphi * dphi).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wraparound() {
        let short_way = 2. * PI - 6.;
        assert_abs_diff_eq!(delta_r(0., 3., 0., -3.), short_way, epsilon = 1e-12);
        assert_abs_diff_eq!(delta_r(0., -3., 0., 3.), short_way, epsilon = 1e-12);
        assert_abs_diff_eq!(delta_r(0., 3., 0., -3.), 0.283, epsilon = 1e-3);
        assert_abs_diff_eq!(delta_phi(3., -3.), -short_way, epsilon = 1e-12);
    }

    #[test]
    fn symmetric() {
        let points = [(0.1, 0.2), (-2.3, 3.1), (1.7, -3.1), (0., 0.)];
        for &(y1, phi1) in &points {
            for &(y2, phi2) in &points {
                assert_eq!(delta_r(y1, phi1, y2, phi2), delta_r(y2, phi2, y1, phi1));
            }
        }
    }

    #[test]
    fn rapidity_only() {
        assert_abs_diff_eq!(delta_r(1.5, 0.3, -0.5, 0.3), 2., epsilon = 1e-15);
    }

    #[test]
    fn multiple_turns() {
        assert_abs_diff_eq!(delta_phi(0.1 + 4. * PI, 0.), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(delta_phi(-0.1 - 4. * PI, 0.), -0.1, epsilon = 1e-12);
    }

    #[test]
    fn boundary() {
        assert_eq!(delta_phi(PI, 0.), PI);
        assert_eq!(delta_phi(0., PI), -PI);
    }

    #[test]
    fn huge_angles() {
        for phi in [1e30, -1e30, f64::MAX, 1e17] {
            let dphi = delta_phi(phi, 0.);
            assert!((-PI..=PI).contains(&dphi), "{phi}: {dphi}");
        }
        assert!(delta_phi(f64::INFINITY, 0.).is_nan());
        assert!(delta_phi(0., f64::NEG_INFINITY).is_nan());
        assert!(delta_r(0., f64::NAN, 0., 0.).is_nan());
    }
}
