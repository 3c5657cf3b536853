mod opt;

use crate::opt::Opt;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use jetmatch::{prelude::*, GIT_BRANCH, GIT_REV, VERSION};
use log::{debug, info};

fn main() -> Result<()> {
    let args = argfile::expand_args_from(
        std::env::args_os(),
        argfile::parse_fromfile,
        argfile::PREFIX,
    )
    .with_context(|| "Failed to read argument file")?;
    let opt = Opt::parse_from(args);

    let env = Env::default().filter_or("JETMATCH_LOG", &opt.loglevel);
    env_logger::init_from_env(env);

    if let (Some(rev), Some(branch)) = (GIT_REV, GIT_BRANCH) {
        info!("jetmatch {VERSION} rev {rev} ({branch})");
    } else {
        info!("jetmatch {VERSION}");
    }

    debug!("settings: {:#?}", opt);

    let infile = opt.input_path();
    let reader = TreeReader::open(&infile, &opt.tree, &BranchNames::default())
        .with_context(|| format!("Failed to read events from {infile:?}"))?;

    let mut clustering = DefaultClustering::new(opt.jet_def.into());
    if let Some(status) = opt.parton_status {
        clustering = clustering.with_parton_status(status);
    }
    let matcher = Matcher::new(opt.criteria.into());

    let outfile = opt.output_path();
    let writer = FileWriter::create(&outfile)?;

    let mut jetmatch = JetMatchBuilder {
        reader,
        clustering,
        matcher,
        writer,
    }
    .build();
    let summary = jetmatch
        .run()
        .with_context(|| format!("Failed to match jets from {infile:?} to {outfile:?}"))?;
    info!("{summary}");
    info!("done");
    Ok(())
}
