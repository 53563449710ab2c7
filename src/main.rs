use anyhow::Context;
use clap::Parser;
use meteo_normalizer::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).context("meteo-normalizer failed")
}
