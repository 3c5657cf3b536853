use crate::{cluster::ClusteredJet, event::Parton, matching::MatchedJet};

pub trait Rewind {
    type Error;

    fn rewind(&mut self) -> Result<(), Self::Error>;
}

/// Clustering of partons into jets
pub trait Clustering {
    type Error;

    fn cluster(&self, partons: &[Parton]) -> Result<Vec<ClusteredJet>, Self::Error>;
}

/// Output of matched jets
pub trait WriteMatch {
    type Error;

    fn write(&mut self, m: &MatchedJet) -> Result<(), Self::Error>;

    /// Called once after the last matched jet
    fn finish(&mut self) -> Result<(), Self::Error>;
}

/// Progress indicator
pub trait Progress {
    fn inc(&self, i: u64);
    fn finish(&self);
}
