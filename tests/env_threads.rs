//! End-to-end coverage of the `HOSTPOOL_THREADS` override. The variable is
//! read at first pool construction, so each case runs in a child process
//! with the variable set in its environment.

use std::process::Command;

use anyhow::{Context, Result};

use hostpool::{DEFAULT_WORKER_THREADS, OpenGate, SharedPool};

const CASE_VAR: &str = "HOSTPOOL_ENV_CASE";

fn runs_as_child(case: &str) -> bool {
    std::env::var(CASE_VAR).as_deref() == Ok(case)
}

fn run_child(case: &str, threads_value: &str) -> Result<()> {
    let exe = std::env::current_exe().context("locating test binary")?;
    let status = Command::new(exe)
        .args([case, "--exact", "--nocapture"])
        .env(CASE_VAR, case)
        .env("HOSTPOOL_THREADS", threads_value)
        .status()
        .context("spawning env-override child")?;
    anyhow::ensure!(status.success(), "child case {case} failed");
    Ok(())
}

#[test]
fn env_override_controls_lazy_worker_count() -> Result<()> {
    if runs_as_child("env_override_controls_lazy_worker_count") {
        let cell = SharedPool::new(OpenGate::new());
        assert_eq!(cell.acquire().current_num_threads(), 5);
        return Ok(());
    }
    run_child("env_override_controls_lazy_worker_count", "5")
}

#[test]
fn unparseable_env_override_falls_back_to_default() -> Result<()> {
    if runs_as_child("unparseable_env_override_falls_back_to_default") {
        let cell = SharedPool::new(OpenGate::new());
        assert_eq!(
            cell.acquire().current_num_threads(),
            DEFAULT_WORKER_THREADS
        );
        return Ok(());
    }
    run_child("unparseable_env_override_falls_back_to_default", "many")
}
