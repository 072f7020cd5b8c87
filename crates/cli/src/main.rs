// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `lcm`: a thin, one-shot-invocation command line over the scheduler,
//! storage, topology, and monitor crates. Each subcommand opens the store
//! fresh, performs one operation, and exits - the daemon-style concurrent
//! request serialization described for the RPC surface belongs to the
//! (external) REST layer that fronts this binary, not to this process.

mod app;
mod commands;
mod inventory;
mod object_key;
mod power;

use anyhow::Result;
use app::App;
use clap::{Parser, Subcommand};
use commands::jobs::RunJobsArgs;
use commands::query::{TargetArgs, TargetsArgs, TransitionConsequencesArgs};
use commands::state::SetStateArgs;

#[derive(Parser)]
#[command(name = "lcm", version, about = "Storage cluster job scheduler control plane")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive one or more objects to a new state under one Command.
    SetState(SetStateArgs),
    /// Instantiate a non-state-change job directly under one Command.
    RunJobs(RunJobsArgs),
    /// States each target could transition to from its committed state.
    AvailableTransitions(TargetsArgs),
    /// Job descriptors directly runnable against each target.
    AvailableJobs(TargetsArgs),
    /// Read and write locks currently held on one object.
    GetLocks(TargetArgs),
    /// Preview the jobs a transition would produce, without persisting.
    GetTransitionConsequences(TransitionConsequencesArgs),
    /// Run the Power Monitor Supervisor in the foreground.
    Monitor,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let app = App::open()?;

    match cli.command {
        Commands::SetState(args) => commands::state::set_state(&app, args),
        Commands::RunJobs(args) => commands::jobs::run_jobs(&app, args),
        Commands::AvailableTransitions(args) => commands::query::available_transitions(&app, args),
        Commands::AvailableJobs(args) => commands::query::available_jobs(&app, args),
        Commands::GetLocks(args) => commands::query::get_locks(&app, args),
        Commands::GetTransitionConsequences(args) => commands::query::get_transition_consequences(&app, args),
        Commands::Monitor => commands::monitor::monitor(app).await,
    }
}
