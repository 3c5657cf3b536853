pub use crate::{
    cluster::{DefaultClustering, JetAlgorithm, JetDefinition},
    jetmatch::{JetMatch, JetMatchBuilder, Summary},
    matching::{MatchCriteria, Matcher},
    reader::{BranchNames, TreeReader},
    traits::*,
    writer::{FileWriter, TextWriter},
};
