use clap::{Parser, Subcommand};
use std::path::PathBuf;

use imgcheck_cli::run_verification;
use imgcheck_core::compare::{run_image_comparison, run_raw_comparison, DEFAULT_TOLERANCE};
use imgcheck_core::config::{load_harness_config, set_verbose, Config};
use imgcheck_core::verbose_println;

#[derive(Parser)]
#[command(name = "imgcheck")]
#[command(version, about = "Regression checker for simulated detector images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a structured detector image against its reference
    Compare {
        /// Reference image
        #[arg(value_name = "REFERENCE")]
        reference: PathBuf,

        /// Image under test
        #[arg(value_name = "TEST")]
        test: PathBuf,

        /// Maximum allowed count of differing samples (exclusive)
        #[arg(short, long, value_name = "N", default_value_t = DEFAULT_TOLERANCE)]
        tolerance: usize,

        /// Echo instrument metadata while loading
        #[arg(long)]
        verbose: bool,
    },

    /// Compare a raw serialized array against its reference (statistics only)
    CompareRaw {
        /// Reference array file
        #[arg(value_name = "REFERENCE")]
        reference: PathBuf,

        /// Array file under test
        #[arg(value_name = "TEST")]
        test: PathBuf,

        /// Enable debug output
        #[arg(long)]
        verbose: bool,
    },

    /// Run the simulation and check every output against its reference
    Verify {
        /// Harness config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Root of the reference data tree (overrides the environment)
        #[arg(long, value_name = "DIR")]
        reference_root: Option<PathBuf>,

        /// Compare existing simulation outputs without re-running it
        #[arg(long)]
        skip_simulation: bool,

        /// Enable debug output
        #[arg(long)]
        verbose: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare {
            reference,
            test,
            tolerance,
            verbose,
        } => cmd_compare(reference, test, tolerance, verbose),

        Commands::CompareRaw {
            reference,
            test,
            verbose,
        } => cmd_compare_raw(reference, test, verbose),

        Commands::Verify {
            config,
            reference_root,
            skip_simulation,
            verbose,
        } => cmd_verify(config, reference_root, skip_simulation, verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_compare(
    reference: PathBuf,
    test: PathBuf,
    tolerance: usize,
    verbose: bool,
) -> Result<(), String> {
    set_verbose(verbose);
    run_image_comparison(reference.as_path(), test.as_path(), tolerance)
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn cmd_compare_raw(reference: PathBuf, test: PathBuf, verbose: bool) -> Result<(), String> {
    set_verbose(verbose);
    run_raw_comparison(reference.as_path(), test.as_path()).map_err(|e| e.to_string())?;
    Ok(())
}

fn cmd_verify(
    config_path: Option<PathBuf>,
    reference_root: Option<PathBuf>,
    skip_simulation: bool,
    verbose: bool,
) -> Result<(), String> {
    set_verbose(verbose);

    // Explicit flag wins; otherwise the environment must supply the root
    let config = match reference_root {
        Some(root) => Config::new(root),
        None => Config::from_env()?,
    };

    let handle = load_harness_config(config_path.as_deref());
    match &handle.source {
        Some(source) => verbose_println!("Loaded harness config from {}", source.display()),
        None => verbose_println!("Using built-in harness defaults"),
    }
    for warning in &handle.warnings {
        verbose_println!("Config warning: {}", warning);
    }

    run_verification(&config, &handle.config, skip_simulation)
}
