//! Validate an .idx file.

use clap::Args;
use vtdgraph_io::read_idx;

/// Validate an .idx file.
#[derive(Args)]
pub struct VerifyArgs {
    /// Path to the .idx file
    pub file: std::path::PathBuf,
}

/// Run the verify command.
pub fn run(args: VerifyArgs) -> anyhow::Result<()> {
    let graph = read_idx(&args.file)?;

    if let Some((a, b)) = graph.asymmetric_pair() {
        anyhow::bail!(
            "{}: node {a} lists {b} as a neighbor but {b} does not list {a}",
            args.file.display()
        );
    }

    println!(
        "OK: {} ({}), {} nodes, {} edges, {} districts, checksum {:#010X}",
        args.file.display(),
        graph.header.state,
        graph.header.node_count,
        graph.edge_count(),
        graph.header.district_count,
        graph.header.checksum
    );
    Ok(())
}
