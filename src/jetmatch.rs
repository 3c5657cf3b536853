use std::convert::From;
use std::fmt::{self, Display};
use std::iter::Iterator;

use log::{debug, info};
use thiserror::Error;

use crate::distance::Distance;
use crate::event::Event;
use crate::matching::Matcher;
use crate::progress_bar::{Progress, ProgressBar};
use crate::traits::*;

#[derive(Clone, Debug)]
pub struct JetMatchBuilder<R, C, D, W> {
    pub reader: R,
    pub clustering: C,
    pub matcher: Matcher<D>,
    pub writer: W,
}

impl<R, C, D, W> JetMatchBuilder<R, C, D, W> {
    pub fn build(self) -> JetMatch<R, C, D, W> {
        JetMatch {
            reader: self.reader,
            clustering: self.clustering,
            matcher: self.matcher,
            writer: self.writer,
        }
    }
}

impl<R, C, D, W> From<JetMatch<R, C, D, W>> for JetMatchBuilder<R, C, D, W> {
    fn from(b: JetMatch<R, C, D, W>) -> Self {
        JetMatchBuilder {
            reader: b.reader,
            clustering: b.clustering,
            matcher: b.matcher,
            writer: b.writer,
        }
    }
}

/// Event loop: cluster partons, match the jets, write the matches
#[derive(Clone, Debug)]
pub struct JetMatch<R, C, D, W> {
    reader: R,
    clustering: C,
    matcher: Matcher<D>,
    writer: W,
}

impl<R, C, D, W> From<JetMatchBuilder<R, C, D, W>> for JetMatch<R, C, D, W> {
    fn from(b: JetMatchBuilder<R, C, D, W>) -> Self {
        b.build()
    }
}

/// Counts collected while running the event loop
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Summary {
    /// Number of events read
    pub nevents: usize,
    /// Number of partons in all events
    pub npartons: usize,
    /// Number of jets obtained from clustering
    pub njets: usize,
    /// Number of jets above the minimum transverse momentum for matching
    pub nconsidered: usize,
    /// Number of matched jets written
    pub nmatched: usize,
}

impl Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} events, {} partons, {} clustered jets, {} considered for matching, {} matched",
            self.nevents, self.npartons, self.njets, self.nconsidered, self.nmatched
        )
    }
}

#[derive(Debug, Error)]
pub enum JetMatchError<E1, E2, E3, E4> {
    #[error("Failed to read event: {0}")]
    ReadErr(E1),
    #[error("Failed to rewind reader: {0}")]
    RewindErr(E2),
    #[error("Failed to cluster event: {0}")]
    ClusteringErr(E3),
    #[error("Failed to write matched jet: {0}")]
    WriteErr(E4),
}

impl<R, C, D, W, E> JetMatch<R, C, D, W>
where
    R: Iterator<Item = Result<Event, E>> + Rewind,
    C: Clustering,
    D: Distance,
    W: WriteMatch,
{
    pub fn run(
        &mut self,
    ) -> Result<Summary, JetMatchError<E, <R as Rewind>::Error, C::Error, W::Error>> {
        use JetMatchError::*;

        self.reader.rewind().map_err(RewindErr)?;

        let mut summary = Summary::default();
        let (nexpected, _) = self.reader.size_hint();
        let progress = ProgressBar::new(nexpected as u64, "events processed:");
        for event in &mut self.reader {
            let event = event.map_err(ReadErr)?;
            summary.nevents += 1;
            summary.npartons += event.partons().len();

            let jets = self
                .clustering
                .cluster(event.partons())
                .map_err(ClusteringErr)?;
            debug!("event {}: {} clustered jets", event.id(), jets.len());
            summary.njets += jets.len();
            summary.nconsidered +=
                jets.iter().filter(|j| self.matcher.considers(j)).count();

            for matched in self.matcher.match_event(&jets, &event) {
                self.writer.write(&matched).map_err(WriteErr)?;
                summary.nmatched += 1;
            }
            progress.inc(1);
        }
        progress.finish();
        self.writer.finish().map_err(WriteErr)?;
        info!("Processed {} events", summary.nevents);
        Ok(summary)
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}
