use std::convert::From;
use std::path::PathBuf;

use clap::Parser;
use jetmatch::cluster::JetAlgorithm;
use jetmatch::matching::MatchCriteria;
use jetmatch::reader::DEFAULT_TREE;

#[derive(Debug, Copy, Clone, Parser)]
pub(crate) struct JetDefinition {
    /// Jet algorithm.
    #[clap(
        short = 'a',
        long,
        default_value = "anti-kt",
        help = "Jet algorithm.\nPossible settings are 'anti-kt', 'kt', 'Cambridge-Aachen'."
    )]
    pub jetalgorithm: JetAlgorithm,
    /// Jet radius parameter.
    #[clap(short = 'R', long, default_value = "0.4")]
    pub jetradius: f64,
    /// Minimum jet transverse momentum in GeV.
    #[clap(long, default_value = "0.")]
    pub jetpt: f64,
}

impl From<JetDefinition> for jetmatch::cluster::JetDefinition {
    fn from(j: JetDefinition) -> Self {
        Self {
            algorithm: j.jetalgorithm,
            radius: j.jetradius,
            min_pt: j.jetpt,
        }
    }
}

#[derive(Debug, Copy, Clone, Parser)]
pub(crate) struct MatchOpt {
    /// Minimum transverse momentum in GeV of parton jets to be matched.
    #[clap(long, default_value = "20.")]
    pub parton_jet_pt: f64,
    /// Minimum transverse momentum in GeV of reconstructed jets.
    #[clap(long, default_value = "30.")]
    pub reco_jet_pt: f64,
    /// Maximum angular distance ΔR between matched jets.
    #[clap(long, default_value = "0.35")]
    pub max_delta_r: f64,
}

impl From<MatchOpt> for MatchCriteria {
    fn from(m: MatchOpt) -> Self {
        MatchCriteria::builder()
            .min_parton_jet_pt(m.parton_jet_pt)
            .min_reco_jet_pt(m.reco_jet_pt)
            .max_delta_r(m.max_delta_r)
            .build()
    }
}

#[derive(Debug, Parser)]
#[clap(about, author, version)]
pub(crate) struct Opt {
    /// Directory containing the input file.
    #[clap(long, default_value = "./data/raw", value_parser)]
    pub(crate) indir: PathBuf,

    /// Directory for the output file.
    #[clap(long, default_value = "./data/processed", value_parser)]
    pub(crate) outdir: PathBuf,

    /// Path of the event tree inside the input file.
    #[clap(long, default_value = DEFAULT_TREE)]
    pub(crate) tree: String,

    #[clap(flatten)]
    pub(crate) jet_def: JetDefinition,

    #[clap(flatten)]
    pub(crate) criteria: MatchOpt,

    /// Only cluster partons with this status code.
    #[clap(long)]
    pub(crate) parton_status: Option<i32>,

    /// Verbosity level
    ///
    /// Possible values with increasing amount of output are
    /// 'off', 'error', 'warn', 'info', 'debug', 'trace'.
    #[clap(short, long, default_value = "info")]
    pub(crate) loglevel: String,

    /// Input ROOT file, relative to the input directory
    #[clap(name = "INFILE", value_parser)]
    pub(crate) infile: PathBuf,

    /// Output text file, relative to the output directory
    #[clap(name = "OUTFILE", value_parser)]
    pub(crate) outfile: PathBuf,
}

impl Opt {
    pub(crate) fn input_path(&self) -> PathBuf {
        self.indir.join(&self.infile)
    }

    pub(crate) fn output_path(&self) -> PathBuf {
        self.outdir.join(&self.outfile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opt = Opt::parse_from(["jetmatch", "events.root", "matched.txt"]);
        assert_eq!(opt.input_path(), PathBuf::from("./data/raw/events.root"));
        assert_eq!(
            opt.output_path(),
            PathBuf::from("./data/processed/matched.txt")
        );
        assert_eq!(opt.tree, "demo/eventTree");
        assert_eq!(opt.parton_status, None);

        let jet_def: jetmatch::cluster::JetDefinition = opt.jet_def.into();
        assert_eq!(jet_def, Default::default());
        let criteria: MatchCriteria = opt.criteria.into();
        assert_eq!(criteria, MatchCriteria::default());
    }

    #[test]
    fn custom() {
        let opt = Opt::parse_from([
            "jetmatch",
            "--indir",
            "/in",
            "-a",
            "kt",
            "-R",
            "0.6",
            "--max-delta-r",
            "0.2",
            "--parton-status",
            "71",
            "a.root",
            "b.txt",
        ]);
        assert_eq!(opt.input_path(), PathBuf::from("/in/a.root"));
        assert_eq!(opt.jet_def.jetalgorithm, JetAlgorithm::Kt);
        assert_eq!(opt.jet_def.jetradius, 0.6);
        assert_eq!(opt.criteria.max_delta_r, 0.2);
        assert_eq!(opt.parton_status, Some(71));
    }

    #[test]
    fn missing_outfile() {
        assert!(Opt::try_parse_from(["jetmatch", "a.root"]).is_err());
    }
}
