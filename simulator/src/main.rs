use anyhow::Context;
use clap::Parser;
use generator::profile::build_packets_from_config;
use sink::jsonl::JsonLinesSink;
use std::path::PathBuf;
use workflow::capture::{read_capture, write_capture};
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod sink;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline driver for the Puck packet decoder")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Decode a raw capture of back-to-back packets instead of generating one
    #[arg(long)]
    replay: Option<PathBuf>,
    /// Save the generated packet stream as a raw capture
    #[arg(long)]
    record: Option<PathBuf>,
    #[arg(long, default_value_t = 0.5)]
    min_range: f64,
    #[arg(long, default_value_t = 100.0)]
    max_range: f64,
    /// Rotation rate in Hz
    #[arg(long, default_value_t = 10.0)]
    frequency: f64,
    /// Number of packets to generate
    #[arg(long, default_value_t = 754)]
    packets: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Where to write one JSON summary line per sweep
    #[arg(long, default_value = "tools/data/sweeps.jsonl")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.min_range, args.max_range, args.frequency, args.packets)
    };
    if args.workflow.is_none() {
        workflow_config.generator.seed = args.seed;
    }

    let packets: Vec<Vec<u8>> = if let Some(path) = &args.replay {
        read_capture(path)?
    } else {
        let generated = build_packets_from_config(&workflow_config.generator)?;
        log::info!(
            "Generated {} packets, ~{:.1} per revolution",
            generated.len(),
            workflow_config.generator.packets_per_revolution()
        );
        if let Some(path) = &args.record {
            write_capture(path, &generated)?;
            log::info!("Recorded {} packets to {}", generated.len(), path.display());
        }
        generated.iter().map(|packet| packet.to_vec()).collect()
    };

    let mut sink = JsonLinesSink::create(&args.output)
        .with_context(|| format!("creating sweep output {}", args.output.display()))?;
    let runner = Runner::new(workflow_config);
    let result = runner.execute(&packets, &mut sink)?;
    let (_, summaries) = sink
        .finish()
        .with_context(|| format!("writing sweep output {}", args.output.display()))?;

    println!(
        "Decoded {} packets -> sweeps {}, dropped {}, filtered points {}, open sweep points {}",
        result.packets,
        result.sweeps_emitted,
        result.dropped,
        result.points_filtered,
        result.open_sweep_points
    );
    if let Some(last) = summaries.last() {
        println!(
            "Last sweep {} -> {} points over {:.4}s",
            last.sequence, last.point_count, last.duration
        );
    }

    Ok(())
}
