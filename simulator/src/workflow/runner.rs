use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use puckcore::prelude::SweepSink;
use puckcore::processing::{DecodeOutcome, SweepAssembler};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub packets: usize,
    pub dropped: usize,
    pub sweeps_emitted: usize,
    pub points_filtered: usize,
    /// Points left in the unfinished last sweep.
    pub open_sweep_points: usize,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Feeds packets in order through one decoder.
    pub fn execute<B, S>(&self, packets: &[B], sink: &mut S) -> anyhow::Result<WorkflowResult>
    where
        B: AsRef<[u8]>,
        S: SweepSink,
    {
        let mut assembler =
            SweepAssembler::new(self.config.decoder).context("creating sweep assembler")?;

        for (index, packet) in packets.iter().enumerate() {
            let outcome = assembler
                .decode(packet.as_ref(), sink)
                .with_context(|| format!("decoding packet {}", index))?;
            if let DecodeOutcome::Started { firing } = outcome {
                log::info!("First full revolution begins at packet {} firing {}", index, firing);
            }
        }

        let metrics = assembler.metrics();
        Ok(WorkflowResult {
            packets: packets.len(),
            dropped: metrics.packets_dropped,
            sweeps_emitted: metrics.sweeps_emitted,
            points_filtered: metrics.points_filtered,
            open_sweep_points: assembler.state().sweep().point_count(),
        })
    }
}
