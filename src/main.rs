/*!
 * Trap Kernel - Main Entry Point
 *
 * Replays a JSON trap script against the kernel:
 * - user console on stdin/stdout
 * - files served from the storage directory
 * - run summary written to stderr
 */

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use trap_kernel::{init_tracing, Kernel, KernelConfig, LocalFS, StdConsole, TrapScript};

fn main() -> Result<()> {
    // Initialize structured tracing
    init_tracing();

    let script_path = std::env::args()
        .nth(1)
        .context("usage: trap-kernel <script.json>")?;

    let config = KernelConfig::from_env().context("invalid kernel configuration")?;
    info!(
        max_open_files = config.max_open_files,
        max_read_size = config.max_read_size,
        storage_path = %config.storage_path.display(),
        "Trap kernel starting"
    );

    if let Err(e) = std::fs::create_dir_all(&config.storage_path) {
        warn!(error = %e, "Could not create storage directory");
    }
    let filesystem = Arc::new(LocalFS::new(&config.storage_path));

    let mut kernel = Kernel::builder()
        .with_config(config)
        .with_console(StdConsole::new())
        .with_filesystem(filesystem)
        .build()
        .context("failed to build kernel")?;

    let script = TrapScript::from_file(&script_path)
        .with_context(|| format!("failed to load {script_path}"))?;
    let (report, _machine) = script.run(&mut kernel)?;

    match report.halted {
        Some(reason) => info!(%reason, traps = report.records.len(), "Machine halted"),
        None => info!(traps = report.records.len(), "Script finished without halting"),
    }

    eprintln!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
