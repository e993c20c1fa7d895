use log::error;
use puckcore::output::Sweep;
use puckcore::prelude::SweepSink;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::sink::model::SweepSummary;

/// Writes one JSON summary line per completed sweep and keeps the summaries.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    summaries: Vec<SweepSummary>,
    failure: Option<io::Error>,
}

impl JsonLinesSink<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            summaries: Vec::new(),
            failure: None,
        }
    }

    /// Flushes the writer and reports the first write failure, if any.
    pub fn finish(mut self) -> io::Result<(W, Vec<SweepSummary>)> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok((self.writer, self.summaries))
    }

    fn write_line(&mut self, summary: &SweepSummary) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, summary)?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write> SweepSink for JsonLinesSink<W> {
    fn consume(&mut self, sweep: Sweep) {
        let summary = SweepSummary::from_sweep(&sweep);
        if self.failure.is_none() {
            if let Err(err) = self.write_line(&summary) {
                error!("writing sweep {} summary failed: {}", summary.sequence, err);
                self.failure = Some(err);
            }
        }
        self.summaries.push(summary);
    }
}
