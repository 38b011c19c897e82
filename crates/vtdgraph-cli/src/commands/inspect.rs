//! Display .idx header and node data.

use clap::Args;
use vtdgraph_io::{DebugMirror, read_idx, scan_idx};

use super::format_bytes;

/// Display .idx file contents.
#[derive(Args)]
pub struct InspectArgs {
    /// Path to the .idx file
    pub file: std::path::PathBuf,

    /// Print one node's record and data
    #[arg(long)]
    pub node: Option<u32>,

    /// Print the whole file as the debug JSON mirror
    #[arg(long)]
    pub json: bool,
}

/// Run the inspect command.
pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let scan = scan_idx(&args.file)?;
    let header = scan.header;

    println!("File:       {}", args.file.display());
    println!("Size:       {}", format_bytes(scan.len));
    println!("Magic:      {:08X}", header.magic);
    println!(
        "Checksum:   {:#010X} ({})",
        header.checksum,
        if scan.checksum_ok() {
            "ok".to_string()
        } else {
            format!("MISMATCH, payload hashes to {:#010X}", scan.actual_checksum)
        }
    );
    println!("State:      {}", header.state);
    println!("Nodes:      {}", header.node_count);
    println!("Districts:  {}", header.district_count);

    if args.node.is_none() && !args.json {
        return Ok(());
    }

    let graph = read_idx(&args.file)?;
    if let Some(id) = args.node {
        let (Some(record), Some(node)) = (
            graph.records.get(id as usize),
            graph.nodes.get(id as usize),
        ) else {
            anyhow::bail!("node {id} out of range (file has {})", header.node_count);
        };
        let d = node.demographics;
        println!();
        println!("Node {id}");
        println!("  Offset:       {}", record.offset);
        println!("  Area:         {}", node.area);
        println!("  Neighbors:    {:?}", node.neighbors);
        println!(
            "  Demographics: total {}, black {}, native american {}, asian {}, white {}, other {}",
            d.total, d.black, d.native_american, d.asian, d.white, d.other
        );
    }
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&DebugMirror::from_decoded(&graph))?
        );
    }
    Ok(())
}
