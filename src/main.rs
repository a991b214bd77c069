use clap::Parser;

use citepage::{cli::Cli, config::Config, fetch::ScholarFetcher, pipeline};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    // Configuration problems (including an unknown style) are the only fatal
    // errors; per-profile fetch failures are handled inside the pipeline.
    let config = Config::load(&args.config)?;
    let fetcher = ScholarFetcher::default();
    pipeline::run(&config, &fetcher)?;
    Ok(())
}
