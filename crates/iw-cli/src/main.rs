//! iw-build command line

use std::path::PathBuf;
use std::process;

use clap::Parser;
use iw_cli::{BuildOptions, build_site};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "iw-build")]
#[command(about = "Compile a rendered documentation site with interactive widgets into a deployment")]
#[command(version)]
struct Args {
    /// Rendered site directory
    #[arg(long, value_name = "DIR")]
    site: PathBuf,

    /// Output directory for the deployment
    #[arg(short, long, value_name = "DIR")]
    out: PathBuf,

    /// Root of the client-side widget assets
    #[arg(long, value_name = "DIR")]
    assets: PathBuf,

    /// Site configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = BuildOptions {
        site: args.site,
        out: args.out,
        assets: args.assets,
        config: args.config,
    };

    if let Err(e) = build_site(&options) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
