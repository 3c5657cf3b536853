use crate::four_vector::FourVector;

use std::default::Default;
use std::convert::From;

use strum::Display;

/// A generator-level parton
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct Parton {
    pub px: f32,
    pub py: f32,
    pub pz: f32,
    pub e: f32,
    pub status: i32,
}

impl Parton {
    pub fn momentum(&self) -> FourVector {
        FourVector::from_pxpypze(
            self.px.into(),
            self.py.into(),
            self.pz.into(),
            self.e.into(),
        )
    }
}

/// A jet as stored in the event file
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct RecoJet {
    pub pt: f32,
    pub eta: f32,
    pub phi: f32,
    pub e: f32,
}

/// The independently reconstructed jet collections of an event
#[derive(
    Copy, Clone, Debug, Display, Eq, PartialEq, Ord, PartialOrd, Hash,
)]
#[strum(serialize_all = "lowercase")]
pub enum JetCollection {
    /// Calorimeter-based (particle-flow) jets
    Calo,
    /// Generator-level truth jets
    Gen,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct EventBuilder {
    id: usize,
    partons: Vec<Parton>,
    calo_jets: Vec<RecoJet>,
    gen_jets: Vec<RecoJet>,
}

impl EventBuilder {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_capacity(id: usize, cap: usize) -> Self {
        Self {
            id,
            partons: Vec::with_capacity(cap),
            ..Default::default()
        }
    }

    pub fn add_parton(&mut self, parton: Parton) -> &mut Self {
        self.partons.push(parton);
        self
    }

    pub fn add_jet(
        &mut self,
        collection: JetCollection,
        jet: RecoJet,
    ) -> &mut Self {
        match collection {
            JetCollection::Calo => self.calo_jets.push(jet),
            JetCollection::Gen => self.gen_jets.push(jet),
        }
        self
    }

    pub fn build(self) -> Event {
        Event {
            id: self.id,
            partons: self.partons,
            calo_jets: self.calo_jets,
            gen_jets: self.gen_jets,
        }
    }
}

impl From<EventBuilder> for Event {
    fn from(b: EventBuilder) -> Self {
        b.build()
    }
}

/// One entry of the event tree
///
/// All sequences refer to the same collision and are ordered as in
/// the source file.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Event {
    id: usize,
    partons: Vec<Parton>,
    calo_jets: Vec<RecoJet>,
    gen_jets: Vec<RecoJet>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry number in the source tree
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn partons(&self) -> &[Parton] {
        self.partons.as_slice()
    }

    pub fn jets(&self, collection: JetCollection) -> &[RecoJet] {
        match collection {
            JetCollection::Calo => &self.calo_jets,
            JetCollection::Gen => &self.gen_jets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build() {
        let jet = RecoJet { pt: 40., eta: 0.11, phi: 0.19, e: 45. };
        let mut ev = EventBuilder::new(3);
        ev.add_parton(Parton { px: 1., e: 1., ..Default::default() })
            .add_jet(JetCollection::Calo, jet);
        let ev = ev.build();

        assert_eq!(ev.id(), 3);
        assert_eq!(ev.partons().len(), 1);
        assert_eq!(ev.jets(JetCollection::Calo), &[jet]);
        assert!(ev.jets(JetCollection::Gen).is_empty());
    }

    #[test]
    fn collection_names() {
        assert_eq!(JetCollection::Calo.to_string(), "calo");
        assert_eq!(JetCollection::Gen.to_string(), "gen");
    }
}
