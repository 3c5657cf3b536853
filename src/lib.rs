//! `jetmatch` clusters simulated partons into jets and matches them to
//! reconstructed jets.
//!
//! For each event in a ROOT tree, the partons are clustered with the
//! anti-kt algorithm. Each sufficiently hard parton jet is matched to
//! the nearest calorimeter jet and the nearest generator-level jet in
//! the rapidity-azimuth plane. If both are close enough, the
//! kinematics of the parton jet and the calorimeter jet are written as
//! one line of a text file.
//!
//! ## Most relevant modules
//!
//! - [prelude] exports a list of the most relevant classes and objects
//! - [jetmatch] contains the event loop
//! - [reader] reads events from ROOT files
//! - [cluster] for jet clustering
//! - [matching] for the nearest-neighbour matching
//! - [writer] for writing matched jets to a text file
//!

/// Jet clustering
pub mod cluster;
/// ROOT directories
pub mod directory;
/// Distance functions
pub mod distance;
/// Collider event class
pub mod event;
/// Four-vector class
pub mod four_vector;
/// Event loop matching clustered jets to reconstructed jets
pub mod jetmatch;
/// Nearest-neighbour matching of jets
pub mod matching;
/// Most important exports
pub mod prelude;
/// Progress bar
pub mod progress_bar;
/// Event readers
pub mod reader;
/// Common traits
pub mod traits;
/// Writer for matched jets
pub mod writer;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_REV: Option<&str> = option_env!("VERGEN_GIT_SHA");
pub const GIT_BRANCH: Option<&str> = option_env!("VERGEN_GIT_BRANCH");
