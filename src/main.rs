mod args;
mod fixtures;

use clap::Parser;
use log::debug;

use crate::args::Args;
use crate::fixtures::run_generation;

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    debug!("args: {:?}", args);

    if let Err(e) = run_generation(&args) {
        debug!("run_generation failed: {:?}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
