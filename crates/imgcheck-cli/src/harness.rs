//! Verification harness
//!
//! Thin glue around the comparison engine: invoke the external simulation
//! command, then check each produced image against its reference, in order.
//! The simulation writes its outputs into the current directory; the
//! references live under the configured data root.

use std::path::Path;
use std::process::Command;

use imgcheck_core::compare::run_image_comparison;
use imgcheck_core::config::{Config, HarnessConfig, SimulationCommand, VerifyStage};

/// Run the external simulation command, in fast/reduced-fidelity mode when
/// `quick` is set. The command's stdout/stderr pass straight through.
pub fn run_simulation(command: &SimulationCommand, quick: bool) -> Result<(), String> {
    if command.program.is_empty() {
        return Err("Harness config does not name a simulation command".to_string());
    }

    let mut invocation = Command::new(&command.program);
    invocation.args(&command.args);
    if quick {
        invocation.args(&command.quick_args);
    }

    println!("Running simulation: {}", command.program);
    let status = invocation
        .status()
        .map_err(|e| format!("Failed to launch simulation '{}': {}", command.program, e))?;

    if !status.success() {
        return Err(format!(
            "Simulation '{}' exited with {}",
            command.program, status
        ));
    }

    Ok(())
}

/// Run the full verification sequence: simulation, then the primary image,
/// then each intermediate image. Prints `OK` when everything passed; the
/// first failure aborts the run.
pub fn run_verification(
    config: &Config,
    harness: &HarnessConfig,
    skip_simulation: bool,
) -> Result<(), String> {
    println!("========================================");
    println!("IMGCHECK VERIFICATION");
    println!("========================================");

    if skip_simulation {
        println!("Skipping simulation; comparing existing outputs");
    } else {
        run_simulation(&harness.simulation, true)?;
    }

    let total = 1 + harness.stages.len();
    check_stage(config, &harness.primary, 1, total)?;
    for (i, stage) in harness.stages.iter().enumerate() {
        check_stage(config, stage, i + 2, total)?;
    }

    println!("OK");
    Ok(())
}

fn check_stage(
    config: &Config,
    stage: &VerifyStage,
    index: usize,
    total: usize,
) -> Result<(), String> {
    if let Some(description) = &stage.description {
        println!("\n[{}/{}] {}", index, total, description);
    }

    let reference = config.reference_path(&stage.file);
    let test = Path::new(&stage.file);
    run_image_comparison(reference.as_path(), test, stage.tolerance)
        .map_err(|e| e.to_string())?;

    Ok(())
}
