use log::debug;
use typed_builder::TypedBuilder;

use crate::{
    cluster::ClusteredJet,
    distance::{DeltaR, Distance},
    event::{Event, JetCollection, RecoJet},
};

/// Thresholds for matching clustered jets to reconstructed jets
#[derive(Debug, Copy, Clone, PartialEq, TypedBuilder)]
pub struct MatchCriteria {
    /// Clustered jets need a transverse momentum above this value
    #[builder(default = 20.)]
    pub min_parton_jet_pt: f64,
    /// Reconstructed jets need a transverse momentum above this value
    #[builder(default = 30.)]
    pub min_reco_jet_pt: f64,
    /// Matches need a distance strictly below this value
    #[builder(default = 0.35)]
    pub max_delta_r: f64,
}

impl Default for MatchCriteria {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Nearest reconstructed jet in one collection
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Match {
    /// Position of the jet in its collection
    pub index: usize,
    pub jet: RecoJet,
    pub delta_r: f64,
}

/// A clustered jet with its nearest calorimeter and generator jets
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MatchedJet {
    pub parton_jet: ClusteredJet,
    pub calo: Match,
    pub gen: Match,
}

/// Nearest-neighbour matching by linear search
#[derive(Debug, Copy, Clone)]
pub struct Matcher<D = DeltaR> {
    criteria: MatchCriteria,
    distance: D,
}

impl Matcher<DeltaR> {
    /// Matcher using the angular distance ΔR
    pub fn new(criteria: MatchCriteria) -> Self {
        Self::with_distance(criteria, DeltaR)
    }
}

impl<D: Distance> Matcher<D> {
    /// Matcher using a custom distance
    pub fn with_distance(criteria: MatchCriteria, distance: D) -> Self {
        Self { criteria, distance }
    }

    pub fn criteria(&self) -> &MatchCriteria {
        &self.criteria
    }

    /// Whether the clustered jet is hard enough to be matched at all
    pub fn considers(&self, jet: &ClusteredJet) -> bool {
        jet.pt() > self.criteria.min_parton_jet_pt
    }

    /// Find the closest candidate above the momentum threshold
    ///
    /// Returns `None` if no candidate passes the threshold. Of several
    /// equally close candidates the first one is chosen. Candidates at
    /// an undefined (NaN) distance are ignored.
    pub fn nearest(
        &self,
        jet: &ClusteredJet,
        candidates: &[RecoJet],
    ) -> Option<Match> {
        candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| f64::from(c.pt) > self.criteria.min_reco_jet_pt)
            .map(|(index, c)| Match {
                index,
                jet: *c,
                delta_r: self.distance.distance(jet, c),
            })
            .filter(|m| !m.delta_r.is_nan())
            .min_by(|a, b| a.delta_r.total_cmp(&b.delta_r))
    }

    /// Match a clustered jet to both jet collections of the event
    ///
    /// Succeeds only if the clustered jet is considered and both
    /// nearest neighbours are closer than the maximum distance.
    pub fn match_jet(
        &self,
        jet: &ClusteredJet,
        event: &Event,
    ) -> Option<MatchedJet> {
        if !self.considers(jet) {
            return None;
        }
        let calo = self.nearest_in(jet, event, JetCollection::Calo);
        let gen = self.nearest_in(jet, event, JetCollection::Gen);
        let (Some(calo), Some(gen)) = (calo, gen) else {
            return None;
        };
        let max_dr = self.criteria.max_delta_r;
        if calo.delta_r < max_dr && gen.delta_r < max_dr {
            Some(MatchedJet {
                parton_jet: *jet,
                calo,
                gen,
            })
        } else {
            None
        }
    }

    /// Match all clustered jets of an event
    pub fn match_event(
        &self,
        jets: &[ClusteredJet],
        event: &Event,
    ) -> Vec<MatchedJet> {
        jets.iter()
            .filter_map(|jet| self.match_jet(jet, event))
            .collect()
    }

    fn nearest_in(
        &self,
        jet: &ClusteredJet,
        event: &Event,
        collection: JetCollection,
    ) -> Option<Match> {
        let nearest = self.nearest(jet, event.jets(collection));
        match nearest {
            Some(m) => debug!(
                "event {}: min ΔR to {collection} jet = {} (jet {})",
                event.id(),
                m.delta_r,
                m.index
            ),
            None => debug!(
                "event {}: no {collection} jet above {} GeV",
                event.id(),
                self.criteria.min_reco_jet_pt
            ),
        }
        nearest
    }
}
