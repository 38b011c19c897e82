//! List built-in state metadata.

use clap::Args;
use vtdgraph_config::{STATES, state_slug};

/// List states with their codes and district counts.
#[derive(Args)]
pub struct StatesArgs {}

/// Run the states command.
pub fn run(_args: StatesArgs) -> anyhow::Result<()> {
    println!("{:<22} {:<4} {:<4} {:>9}  Directory", "State", "Code", "FIPS", "Districts");
    println!("{}", "-".repeat(64));
    for state in &STATES {
        println!(
            "{:<22} {:<4} {:<4} {:>9}  {}",
            state.name,
            state.code,
            state.fips,
            state.districts,
            state_slug(state.name)
        );
    }
    Ok(())
}
