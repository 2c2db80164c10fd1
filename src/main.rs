mod config;
mod hold;
mod logging;
mod meminfo;

use std::{process::ExitCode, time::Duration};

use anyhow::{Context, Result};

use crate::{config::Config, hold::ResidentRegion};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_anyhow_with_source!(e, "fatal error, exiting");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cfg = Config::from_env()?;

    let snapshot = meminfo::read(&cfg.meminfo_path)
        .with_context(|| format!("read memory metrics from {}", cfg.meminfo_path.display()))?;

    println!("Total Memory: {} kB", snapshot.total_kb);

    let size_bytes = hold::target_bytes(cfg.percent, snapshot.total_kb);
    println!(
        "Allocating and using {} MB of memory",
        size_bytes / (1024 * 1024)
    );

    let len = usize::try_from(size_bytes).context("allocation size exceeds address space")?;
    let mut region = ResidentRegion::allocate(len).context("allocate resident region")?;
    // První průchod přivlastní fyzické stránky hned po alokaci.
    region.touch_pass();

    println!("Memory allocated and in use. Press Ctrl+C to exit.");

    // Žádná kooperativní cesta ven - smyčka běží, dokud proces někdo nezabije.
    let every = Duration::from_secs(cfg.touch_interval_secs);
    loop {
        tokio::time::sleep(every).await;
        region.touch_pass();
        tracing::debug!(bytes = region.len(), "touch pass complete");
    }
}
