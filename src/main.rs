use clap::Parser;
use coursevault_lib::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        log::LevelFilter::Debug
    } else if cli.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    // RUST_LOG, when set, wins over the flags.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    run(cli)
}
