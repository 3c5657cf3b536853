use std::f64::consts::PI;

use jetty::PseudoJet;
use noisy_float::prelude::*;

/// Rapidity assigned to massless momenta along the beam axis
const MAX_RAP: f64 = 1e5;

/// A basic four-vector
///
/// The zero component is the energy component. The remainder are
/// the spatial components
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default)]
pub struct FourVector {
    pt: N64,
    p: [N64; 4],
}

impl FourVector {
    /// Four-vector from momentum components and energy
    pub fn from_pxpypze(px: f64, py: f64, pz: f64, e: f64) -> Self {
        [n64(e), n64(px), n64(py), n64(pz)].into()
    }

    /// The energy component
    pub fn e(&self) -> f64 {
        self.p[0].raw()
    }

    pub fn px(&self) -> f64 {
        self.p[1].raw()
    }

    pub fn py(&self) -> f64 {
        self.p[2].raw()
    }

    pub fn pz(&self) -> f64 {
        self.p[3].raw()
    }

    /// The scalar transverse momentum
    pub fn pt(&self) -> f64 {
        self.pt.raw()
    }

    /// The square \sum v_i^2 with i = 1,2 of the transverse momentum
    pub fn pt2(&self) -> f64 {
        self.px() * self.px() + self.py() * self.py()
    }

    /// The invariant mass square v_0^2 - \sum v_i^2 with i = 1,2,3
    pub fn m_sq(&self) -> f64 {
        self.e() * self.e() - self.pt2() - self.pz() * self.pz()
    }

    /// The rapidity 1/2 log((E + pz)/(E - pz))
    ///
    /// Massless momenta along the beam axis get a large finite rapidity,
    /// and a negative mass square is treated as zero.
    pub fn rap(&self) -> f64 {
        let (e, pz, pt2) = (self.e(), self.pz(), self.pt2());
        if e == pz.abs() && pt2 == 0. {
            let max_rap = MAX_RAP + pz.abs();
            return if pz >= 0. { max_rap } else { -max_rap };
        }
        let m2 = f64::max(self.m_sq(), 0.);
        let e_plus_pz = e + pz.abs();
        let rap = 0.5 * ((pt2 + m2) / (e_plus_pz * e_plus_pz)).ln();
        if pz > 0. {
            -rap
        } else {
            rap
        }
    }

    /// The azimuthal angle in (-π, π]
    pub fn phi(&self) -> f64 {
        if self.pt2() == 0. {
            return 0.;
        }
        let phi = self.py().atan2(self.px());
        // atan2 is already in [-π, π], but -π should be reported as π
        if phi <= -PI {
            phi + 2. * PI
        } else {
            phi
        }
    }

    fn update_pt(&mut self) {
        self.pt = (self.p[1] * self.p[1] + self.p[2] * self.p[2]).sqrt();
    }
}

impl std::convert::From<[N64; 4]> for FourVector {
    fn from(p: [N64; 4]) -> FourVector {
        let mut res = FourVector {
            p,
            pt: std::default::Default::default(),
        };
        res.update_pt();
        res
    }
}

impl std::ops::Index<usize> for FourVector {
    type Output = N64;

    fn index(&self, i: usize) -> &Self::Output {
        &self.p[i]
    }
}

impl From<PseudoJet> for FourVector {
    fn from(p: PseudoJet) -> Self {
        [p.e(), p.px(), p.py(), p.pz()].into()
    }
}

impl From<FourVector> for PseudoJet {
    fn from(p: FourVector) -> Self {
        (&p).into()
    }
}

impl From<&FourVector> for PseudoJet {
    fn from(p: &FourVector) -> Self {
        [p[0], p[1], p[2], p[3]].into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn kinematics() {
        let p = FourVector::from_pxpypze(3., 4., 0., 10.);
        assert_eq!(p.pt(), 5.);
        assert_eq!(p.rap(), 0.);
        assert_abs_diff_eq!(p.phi(), 4f64.atan2(3.), epsilon = 1e-15);
        assert_eq!(p.m_sq(), 75.);
    }

    #[test]
    fn rapidity_sign() {
        let e = 55.;
        let pz = e * 0.1f64.tanh();
        let forward = FourVector::from_pxpypze(50., 0., pz, e);
        let backward = FourVector::from_pxpypze(50., 0., -pz, e);
        assert_abs_diff_eq!(forward.rap(), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(backward.rap(), -0.1, epsilon = 1e-12);
    }

    #[test]
    fn beam_axis() {
        let p = FourVector::from_pxpypze(0., 0., 7., 7.);
        assert!(p.rap() > MAX_RAP);
        assert_eq!(p.phi(), 0.);
        let p = FourVector::from_pxpypze(0., 0., -7., 7.);
        assert!(p.rap() < -MAX_RAP);
    }

    #[test]
    fn phi_range() {
        let p = FourVector::from_pxpypze(-1., -1e-300, 0., 2.);
        assert!(p.phi() > -PI && p.phi() <= PI);
        let p = FourVector::from_pxpypze(-1., 0., 0., 2.);
        assert_eq!(p.phi(), PI);
    }
}
