//! `mni2tal` – label electrode coordinates with Talairach Daemon regions.
//!
//! Reads a tab-delimited file of MNI coordinates, converts them to Talairach
//! space, hands them to the Java Talairach Daemon client and moves the
//! labelled result to `<coords stem>_brod_areas.txt`.
//!
//! Settings are merged in this order, later wins:
//! `~/.talairach/config.toml` → `TAL_*` environment variables → flags.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::debug;

use talairach_daemon::TalairachClient;
use talairach_runtime::{LabelPipeline, LabelReport, PipelineOptions, init_tracing};

/// Convert MNI coordinates to Talairach space and look up their brain areas.
#[derive(Parser, Debug)]
#[command(name = "mni2tal", version)]
struct Args {
    /// Tab-delimited coordinates file, one electrode per line
    #[arg(long)]
    coords: PathBuf,

    /// File to write the Talairach coordinates to; read by the client
    #[arg(long = "tal-file", alias = "temp")]
    tal_file: Option<PathBuf>,

    /// Final labels file [default: <coords stem>_brod_areas.txt]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to the Talairach client (talairach.jar)
    #[arg(long)]
    client: Option<PathBuf>,

    /// Java launcher used to run the client
    #[arg(long)]
    java: Option<PathBuf>,

    /// Coordinates are already in Talairach space
    #[arg(long)]
    tal: bool,

    /// Cube range in which to search for an area (see http://www.talairach.org/manual.html)
    #[arg(long)]
    cube_range: Option<u32>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Store the effective client/java/cube-range/tal-file settings in the config file
    #[arg(long)]
    save_config: bool,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose > 0 { "debug" } else { "info" };
    let _guard = init_tracing("mni2tal", default_level);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let mut cfg = config::load()?.unwrap_or_default();
    config::apply_env_overrides(&mut cfg);
    apply_args(&mut cfg, &args);
    debug!(?cfg, "effective configuration");

    if args.save_config {
        config::save(&cfg)?;
        println!(
            "  {} Config saved to {}",
            "✓".green().bold(),
            config::config_path().display().to_string().bold()
        );
    }

    let classpath = cfg.client.clone().ok_or_else(|| {
        format!(
            "no Talairach client configured; pass --client <talairach.jar>, set TAL_CLIENT, or add `client` to {}",
            config::config_path().display()
        )
    })?;
    let client = TalairachClient::new(classpath).with_java(&cfg.java);

    let options = PipelineOptions {
        coords: args.coords,
        tal_file: cfg.tal_file,
        output: args.output,
        already_talairach: args.tal,
        cube_range: cfg.cube_range,
    };

    let report = LabelPipeline::new(client)
        .run(&options)
        .map_err(|e| e.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        println!("{json}");
    } else {
        print_summary(&report);
    }
    Ok(())
}

/// Flags override whatever the config file and environment provided.
fn apply_args(cfg: &mut config::Config, args: &Args) {
    if let Some(client) = &args.client {
        cfg.client = Some(client.clone());
    }
    if let Some(java) = &args.java {
        cfg.java = java.clone();
    }
    if let Some(range) = args.cube_range {
        cfg.cube_range = range;
    }
    if let Some(tal_file) = &args.tal_file {
        cfg.tal_file = tal_file.clone();
    }
}

fn print_summary(report: &LabelReport) {
    let space = if report.transformed {
        "MNI → Talairach"
    } else {
        "Talairach input"
    };
    println!(
        "  {} {} electrode(s) labelled ({}, cube range {})",
        "✓".green().bold(),
        report.points,
        space.dimmed(),
        report.cube_range
    );
    println!(
        "  Output file can be found under {}",
        report.output_file.display().to_string().bold()
    );
}
