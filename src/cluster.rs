use std::{
    fmt::{self, Display},
    str::FromStr,
};

use jetty::{anti_kt_f, cambridge_aachen_f, kt_f, Cluster, PseudoJet};
use log::trace;
use thiserror::Error;

use crate::{event::Parton, four_vector::FourVector, traits::Clustering};

/// Default clustering of partons into jets
#[derive(Clone, Debug, Default)]
pub struct DefaultClustering {
    jet_def: JetDefinition,
    parton_status: Option<i32>,
}

impl DefaultClustering {
    /// Construct a new clustering using the given jet definition
    pub fn new(jet_def: JetDefinition) -> Self {
        Self {
            jet_def,
            parton_status: None,
        }
    }

    /// Only cluster partons with the given status code
    pub fn with_parton_status(mut self, status: i32) -> Self {
        self.parton_status = Some(status);
        self
    }

    fn is_clustered(&self, parton: &Parton) -> bool {
        match self.parton_status {
            Some(status) => parton.status == status,
            None => true,
        }
    }
}

impl Clustering for DefaultClustering {
    type Error = std::convert::Infallible;

    fn cluster(&self, partons: &[Parton]) -> Result<Vec<ClusteredJet>, Self::Error> {
        let input: Vec<PseudoJet> = partons
            .iter()
            .enumerate()
            .filter(|(_, p)| self.is_clustered(p))
            .map(|(idx, p)| {
                trace!("parton {idx}: {p:?}");
                p.momentum().into()
            })
            .collect();
        if input.is_empty() {
            return Ok(Vec::new());
        }
        let jets = cluster(input, &self.jet_def)
            .into_iter()
            .map(ClusteredJet::from)
            .collect();
        Ok(jets)
    }
}

/// A jet obtained from clustering partons
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default)]
pub struct ClusteredJet {
    p: FourVector,
}

impl ClusteredJet {
    pub fn pt(&self) -> f64 {
        self.p.pt()
    }

    pub fn rap(&self) -> f64 {
        self.p.rap()
    }

    /// Azimuthal angle in (-π, π]
    pub fn phi(&self) -> f64 {
        self.p.phi()
    }

    pub fn e(&self) -> f64 {
        self.p.e()
    }
}

impl From<FourVector> for ClusteredJet {
    fn from(p: FourVector) -> Self {
        Self { p }
    }
}

impl From<PseudoJet> for ClusteredJet {
    fn from(p: PseudoJet) -> Self {
        FourVector::from(p).into()
    }
}

/// Placeholder for an unknown jet algorithm
#[derive(Debug, Clone, Error)]
pub struct UnknownJetAlgorithm(String);

impl Display for UnknownJetAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown jet algorithm: {}", self.0)
    }
}

impl FromStr for JetAlgorithm {
    type Err = UnknownJetAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anti_kt" | "antikt" | "anti-kt" => Ok(Self::AntiKt),
            "kt" => Ok(Self::Kt),
            "Cambridge/Aachen" | "Cambridge-Aachen" | "Cambridge_Aachen"
            | "cambridge/aachen" | "cambridge-aachen" | "cambridge_aachen" => {
                Ok(Self::CambridgeAachen)
            }
            _ => Err(UnknownJetAlgorithm(s.to_string())),
        }
    }
}

/// Jet clustering algorithms
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum JetAlgorithm {
    /// The [anti-kt](https://arxiv.org/abs/0802.1189) algorithm
    #[default]
    AntiKt,
    /// The [Cambridge](https://arxiv.org/abs/hep-ph/9707323)/[Aachen](https://arxiv.org/abs/hep-ph/9907280) algorithm
    CambridgeAachen,
    /// The [kt](https://arxiv.org/abs/hep-ph/9305266) algorithm
    Kt,
}

/// Definition of a jet
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct JetDefinition {
    /// Jet algorithm
    pub algorithm: JetAlgorithm,
    /// Jet radius parameter
    pub radius: f64,
    /// Minimum jet transverse momentum
    ///
    /// Jets with exactly this transverse momentum are kept.
    pub min_pt: f64,
}

impl Default for JetDefinition {
    fn default() -> Self {
        Self {
            algorithm: JetAlgorithm::AntiKt,
            radius: 0.4,
            min_pt: 0.,
        }
    }
}

/// Cluster the given `partons` into inclusive jets
pub fn cluster(
    partons: Vec<PseudoJet>,
    jet_def: &JetDefinition,
) -> Vec<PseudoJet> {
    let minpt2 = jet_def.min_pt * jet_def.min_pt;
    let cut = |jet: PseudoJet| jet.pt2() >= minpt2;
    let r = jet_def.radius;
    match jet_def.algorithm {
        JetAlgorithm::AntiKt => partons.cluster_if(anti_kt_f(r), cut),
        JetAlgorithm::Kt => partons.cluster_if(kt_f(r), cut),
        JetAlgorithm::CambridgeAachen => {
            partons.cluster_if(cambridge_aachen_f(r), cut)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn parton(pt: f32, y: f32, phi: f32, status: i32) -> Parton {
        // massless
        Parton {
            px: pt * phi.cos(),
            py: pt * phi.sin(),
            pz: pt * y.sinh(),
            e: pt * y.cosh(),
            status,
        }
    }

    #[test]
    fn parse_algorithm() {
        assert_eq!("anti-kt".parse::<JetAlgorithm>().unwrap(), JetAlgorithm::AntiKt);
        assert_eq!("antikt".parse::<JetAlgorithm>().unwrap(), JetAlgorithm::AntiKt);
        assert_eq!("kt".parse::<JetAlgorithm>().unwrap(), JetAlgorithm::Kt);
        assert_eq!(
            "cambridge-aachen".parse::<JetAlgorithm>().unwrap(),
            JetAlgorithm::CambridgeAachen
        );
        assert!("siscone".parse::<JetAlgorithm>().is_err());
    }

    #[test]
    fn no_partons() {
        let jets = DefaultClustering::default().cluster(&[]).unwrap();
        assert!(jets.is_empty());
    }

    #[test]
    fn single_parton() {
        let p = parton(50., 0.1, 0.2, 23);
        let jets = DefaultClustering::default().cluster(&[p]).unwrap();
        assert_eq!(jets.len(), 1);
        let jet = jets[0];
        assert_abs_diff_eq!(jet.pt(), 50., epsilon = 1e-4);
        assert_abs_diff_eq!(jet.rap(), 0.1, epsilon = 1e-5);
        assert_abs_diff_eq!(jet.phi(), 0.2, epsilon = 1e-5);
        assert_abs_diff_eq!(jet.e(), f64::from(p.e), epsilon = 1e-9);
    }

    #[test]
    fn merge_close_partons() {
        let partons = [
            parton(60., 0.0, 0.0, 23),
            parton(20., 0.1, 0.1, 23),
            parton(30., 0.0, 2.0, 23),
        ];
        let mut jets = DefaultClustering::default().cluster(&partons).unwrap();
        jets.sort_by(|a, b| b.pt().total_cmp(&a.pt()));
        assert_eq!(jets.len(), 2);
        let e_sum = f64::from(partons[0].e) + f64::from(partons[1].e);
        assert_abs_diff_eq!(jets[0].e(), e_sum, epsilon = 1e-4);
        assert_abs_diff_eq!(jets[1].pt(), 30., epsilon = 1e-4);
    }

    #[test]
    fn separate_partons() {
        let partons = [
            parton(60., 0.0, 0.0, 23),
            parton(20., 0.0, 0.5, 23),
        ];
        let jets = DefaultClustering::default().cluster(&partons).unwrap();
        assert_eq!(jets.len(), 2);
    }

    #[test]
    fn status_filter() {
        let partons = [
            parton(60., 0.0, 0.0, 71),
            parton(30., 0.0, 2.0, 23),
        ];
        let clustering = DefaultClustering::default().with_parton_status(71);
        let jets = clustering.cluster(&partons).unwrap();
        assert_eq!(jets.len(), 1);
        assert_abs_diff_eq!(jets[0].pt(), 60., epsilon = 1e-4);

        let clustering = DefaultClustering::default().with_parton_status(1);
        assert!(clustering.cluster(&partons).unwrap().is_empty());
    }

    #[test]
    fn min_pt() {
        let partons = [
            parton(60., 0.0, 0.0, 23),
            parton(10., 0.0, 2.0, 23),
        ];
        let jet_def = JetDefinition { min_pt: 20., ..Default::default() };
        let jets = DefaultClustering::new(jet_def).cluster(&partons).unwrap();
        assert_eq!(jets.len(), 1);
    }
}
