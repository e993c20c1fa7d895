//! Sweep boundary state machine.
//!
//! Azimuth grows monotonically during a revolution, so the first firing
//! whose azimuth is below the previous one starts a new sweep. The very
//! first revolution is incomplete and is never emitted: points are only
//! kept once a wraparound has been seen.

use std::ops::Range;

use crate::geometry::{ChannelGeometryTable, CHANNEL_COUNT, FIRING_INTERVAL};
use crate::output::Sweep;
use crate::packet::layout::FIRINGS_PER_PACKET;
use crate::packet::RawPacketParser;
use crate::prelude::{DecodeResult, DecoderConfig, PacketError, SweepSink};
use crate::processing::azimuth::{AzimuthInterpolator, FiringSet};
use crate::processing::projector::PointProjector;
use crate::telemetry::{LogManager, Metrics, MetricsRecorder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerPhase {
    AwaitingFirstRevolution,
    Accumulating,
}

/// What a call to [`SweepAssembler::decode`] did with its packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// A block header was wrong; the packet was ignored.
    Dropped { block: usize, header: u16 },
    /// No revolution boundary seen yet; the packet's points were discarded.
    Discarded,
    /// First boundary found at `firing`; accumulation starts there.
    Started { firing: usize },
    /// Every firing was appended to the open sweep.
    Accumulated,
    /// The open sweep was completed and handed to the sink, and a new one
    /// opened at `firing`.
    SweepEmitted {
        firing: usize,
        sequence: u64,
        points: usize,
    },
}

/// Effect of one packet on the decoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub outcome: DecodeOutcome,
    pub appended: usize,
    pub filtered: usize,
}

/// State carried from one packet to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderState {
    phase: AssemblerPhase,
    last_azimuth: f64,
    packet_start_time: f64,
    sweep: Sweep,
}

impl DecoderState {
    pub fn new(altitudes: [f64; CHANNEL_COUNT]) -> Self {
        Self {
            phase: AssemblerPhase::AwaitingFirstRevolution,
            last_azimuth: 0.0,
            packet_start_time: 0.0,
            sweep: Sweep::new(0, altitudes),
        }
    }

    pub fn phase(&self) -> AssemblerPhase {
        self.phase
    }

    pub fn last_azimuth(&self) -> f64 {
        self.last_azimuth
    }

    /// Seconds elapsed in the open sweep before the next packet.
    pub fn packet_start_time(&self) -> f64 {
        self.packet_start_time
    }

    /// The sweep currently being accumulated.
    pub fn sweep(&self) -> &Sweep {
        &self.sweep
    }

    /// Applies one packet's firings.
    pub fn advance<S: SweepSink + ?Sized>(
        &mut self,
        firings: &FiringSet,
        projector: &PointProjector,
        sink: &mut S,
    ) -> Step {
        let boundary = self.find_boundary(firings);
        let last_firing_azimuth = firings.azimuth(FIRINGS_PER_PACKET - 1);

        match self.phase {
            AssemblerPhase::AwaitingFirstRevolution => {
                if boundary == FIRINGS_PER_PACKET {
                    return Step {
                        outcome: DecodeOutcome::Discarded,
                        appended: 0,
                        filtered: 0,
                    };
                }

                self.phase = AssemblerPhase::Accumulating;
                let (appended, filtered) =
                    self.append(firings, boundary..FIRINGS_PER_PACKET, projector);
                self.last_azimuth = last_firing_azimuth;
                Step {
                    outcome: DecodeOutcome::Started { firing: boundary },
                    appended,
                    filtered,
                }
            }
            AssemblerPhase::Accumulating => {
                let (mut appended, mut filtered) = self.append(firings, 0..boundary, projector);
                if boundary == FIRINGS_PER_PACKET {
                    return Step {
                        outcome: DecodeOutcome::Accumulated,
                        appended,
                        filtered,
                    };
                }

                let next = self.sweep.successor();
                let completed = std::mem::replace(&mut self.sweep, next);
                let sequence = completed.sequence;
                let points = completed.point_count();
                sink.consume(completed);

                self.packet_start_time = 0.0;
                self.last_azimuth = last_firing_azimuth;

                let (more_appended, more_filtered) =
                    self.append(firings, boundary..FIRINGS_PER_PACKET, projector);
                appended += more_appended;
                filtered += more_filtered;

                Step {
                    outcome: DecodeOutcome::SweepEmitted {
                        firing: boundary,
                        sequence,
                        points,
                    },
                    appended,
                    filtered,
                }
            }
        }
    }

    /// Index of the first firing below the running azimuth, or
    /// `FIRINGS_PER_PACKET` when the packet does not wrap. Updates the
    /// running azimuth for every firing passed.
    fn find_boundary(&mut self, firings: &FiringSet) -> usize {
        for (index, firing) in firings.iter().enumerate() {
            if firing.azimuth < self.last_azimuth {
                return index;
            }
            self.last_azimuth = firing.azimuth;
        }
        FIRINGS_PER_PACKET
    }

    /// Projects firings in `range` into the open sweep and advances the
    /// packet start time by the range length. Returns (appended, filtered).
    fn append(
        &mut self,
        firings: &FiringSet,
        range: Range<usize>,
        projector: &PointProjector,
    ) -> (usize, usize) {
        let mut appended = 0;
        let mut filtered = 0;

        for index in range.clone() {
            let firing = firings.get(index);
            for channel in 0..CHANNEL_COUNT {
                let point = projector.project(
                    index,
                    channel,
                    firing.distance[channel],
                    firing.channel_azimuth[channel],
                    firing.intensity[channel],
                    self.packet_start_time,
                );
                match point {
                    Some(point) => {
                        self.sweep
                            .push(ChannelGeometryTable::remap(channel), point);
                        appended += 1;
                    }
                    None => filtered += 1,
                }
            }
        }

        self.packet_start_time += FIRING_INTERVAL * range.len() as f64;
        (appended, filtered)
    }
}

/// Turns a stream of raw packets into complete sweeps.
///
/// Packets must arrive in order and from one producer at a time.
pub struct SweepAssembler {
    config: DecoderConfig,
    projector: PointProjector,
    interpolator: AzimuthInterpolator,
    state: DecoderState,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl SweepAssembler {
    pub fn new(config: DecoderConfig) -> DecodeResult<Self> {
        config.validate()?;
        let projector = PointProjector::new(ChannelGeometryTable::puck(), &config);
        let state = DecoderState::new(projector.geometry().physical_altitudes());
        Ok(Self {
            config,
            projector,
            interpolator: AzimuthInterpolator::new(),
            state,
            logger: LogManager::new("puckcore::assembler"),
            metrics: MetricsRecorder::new(),
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn state(&self) -> &DecoderState {
        &self.state
    }

    pub fn phase(&self) -> AssemblerPhase {
        self.state.phase()
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.snapshot()
    }

    /// Decodes one packet, handing any completed sweep to `sink` before
    /// returning.
    ///
    /// A buffer of the wrong size is a caller error and is returned as
    /// `Err`. A packet with a bad block header is dropped with a warning.
    /// Neither touches the decoder state.
    pub fn decode<S: SweepSink + ?Sized>(
        &mut self,
        packet: &[u8],
        sink: &mut S,
    ) -> DecodeResult<DecodeOutcome> {
        let blocks = match RawPacketParser::parse(packet) {
            Ok(blocks) => blocks,
            Err(PacketError::InvalidHeader { block, header }) => {
                self.metrics.record_dropped();
                self.logger.warn(&format!(
                    "Skip invalid packet: block {} header is {:#06x}",
                    block, header
                ));
                return Ok(DecodeOutcome::Dropped { block, header });
            }
            Err(err) => return Err(err.into()),
        };

        let firings = self.interpolator.interpolate(&blocks);
        let step = self.state.advance(firings, &self.projector, sink);

        self.metrics.record_decoded();
        self.metrics.record_filtered(step.filtered);
        match step.outcome {
            DecodeOutcome::Started { firing } => {
                self.logger.record(&format!(
                    "First revolution boundary at firing {}, start publishing sweep data",
                    firing
                ));
            }
            DecodeOutcome::SweepEmitted {
                sequence, points, ..
            } => {
                self.metrics.record_sweep();
                self.logger
                    .detail(&format!("Sweep {} emitted with {} points", sequence, points));
            }
            _ => {}
        }

        Ok(step.outcome)
    }

    /// Forgets the open sweep and waits for a fresh revolution boundary.
    pub fn reset(&mut self) {
        self.state = DecoderState::new(self.projector.geometry().physical_altitudes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::layout::{BLOCKS_PER_PACKET, FIRINGS_PER_BLOCK, PACKET_SIZE};
    use crate::packet::PacketBuilder;
    use crate::prelude::DecodeError;

    /// 0.2 m, below the default minimum range.
    const TOO_CLOSE: u16 = 100;
    /// 120 m, beyond the default maximum range.
    const TOO_FAR: u16 = 60_000;
    const VALID_PER_FIRING: usize = CHANNEL_COUNT - 2;

    fn packet(block_degrees: [f64; BLOCKS_PER_PACKET]) -> [u8; PACKET_SIZE] {
        let mut builder = PacketBuilder::new();
        for (block, &degrees) in block_degrees.iter().enumerate() {
            builder.set_azimuth_degrees(block, degrees);
            for firing in 0..FIRINGS_PER_BLOCK {
                for channel in 0..CHANNEL_COUNT {
                    let raw = match channel {
                        0 => TOO_CLOSE,
                        5 => TOO_FAR,
                        _ => 5000 + channel as u16 * 10,
                    };
                    builder.set_return(block, firing, channel, raw, channel as u8 * 10);
                }
            }
        }
        builder.build()
    }

    fn linear(start: f64, step: f64) -> [f64; BLOCKS_PER_PACKET] {
        std::array::from_fn(|block| start + step * block as f64)
    }

    /// Four packets: no wrap, wrap at firing 8, inside [1°, 45°], wrap at firing 3.
    fn scenario() -> Vec<[u8; PACKET_SIZE]> {
        let second = [
            340.0, 344.0, 348.0, 352.0, 2.0, 6.0, 10.0, 14.0, 18.0, 22.0, 26.0, 30.0,
        ];
        let fourth = [
            200.0, 359.0, 3.0, 5.0, 7.0, 9.0, 11.0, 13.0, 15.0, 17.0, 19.0, 21.0,
        ];
        vec![
            packet(linear(10.0, 28.0)),
            packet(second),
            packet(linear(33.0, 1.0)),
            packet(fourth),
        ]
    }

    fn assembler() -> SweepAssembler {
        SweepAssembler::new(DecoderConfig::default()).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = DecoderConfig {
            min_range: 10.0,
            max_range: 10.0,
            ..Default::default()
        };
        assert!(matches!(
            SweepAssembler::new(config),
            Err(DecodeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn monotonic_packets_never_emit() {
        let mut decoder = assembler();
        let mut sweeps: Vec<Sweep> = Vec::new();

        for start in [10.0, 60.0, 110.0] {
            let outcome = decoder.decode(&packet(linear(start, 4.0)), &mut sweeps).unwrap();
            assert_eq!(outcome, DecodeOutcome::Discarded);
        }

        assert!(sweeps.is_empty());
        assert_eq!(decoder.phase(), AssemblerPhase::AwaitingFirstRevolution);
        assert!(decoder.state().sweep().is_empty());
        assert_eq!(decoder.state().packet_start_time(), 0.0);
    }

    #[test]
    fn round_trip_scenario_emits_one_complete_sweep() {
        let packets = scenario();
        let mut decoder = assembler();
        let mut sweeps: Vec<Sweep> = Vec::new();

        assert_eq!(
            decoder.decode(&packets[0], &mut sweeps).unwrap(),
            DecodeOutcome::Discarded
        );
        assert_eq!(decoder.phase(), AssemblerPhase::AwaitingFirstRevolution);

        assert_eq!(
            decoder.decode(&packets[1], &mut sweeps).unwrap(),
            DecodeOutcome::Started { firing: 8 }
        );
        assert_eq!(decoder.phase(), AssemblerPhase::Accumulating);
        assert_eq!(
            decoder.state().sweep().point_count(),
            16 * VALID_PER_FIRING
        );

        assert_eq!(
            decoder.decode(&packets[2], &mut sweeps).unwrap(),
            DecodeOutcome::Accumulated
        );
        assert!(sweeps.is_empty());

        let expected_points = (16 + 24 + 3) * VALID_PER_FIRING;
        assert_eq!(
            decoder.decode(&packets[3], &mut sweeps).unwrap(),
            DecodeOutcome::SweepEmitted {
                firing: 3,
                sequence: 0,
                points: expected_points,
            }
        );

        assert_eq!(sweeps.len(), 1);
        let sweep = &sweeps[0];
        assert_eq!(sweep.sequence, 0);
        assert_eq!(sweep.point_count(), expected_points);
        // raw channels 0 and 5 are out of range
        assert!(sweep.scans[ChannelGeometryTable::remap(0)].points.is_empty());
        assert!(sweep.scans[ChannelGeometryTable::remap(5)].points.is_empty());

        let open = decoder.state().sweep();
        assert_eq!(open.sequence, 1);
        assert_eq!(open.point_count(), 21 * VALID_PER_FIRING);
        assert!((decoder.state().packet_start_time() - 21.0 * FIRING_INTERVAL).abs() < 1e-12);

        let metrics = decoder.metrics();
        assert_eq!(metrics.packets_decoded, 4);
        assert_eq!(metrics.sweeps_emitted, 1);
        assert_eq!(metrics.points_filtered, (16 + 24 + 24) * 2);
    }

    #[test]
    fn emitted_sweep_azimuths_wrap_at_most_once_at_the_end() {
        let mut decoder = assembler();
        let mut sweeps: Vec<Sweep> = Vec::new();
        for packet in scenario() {
            decoder.decode(&packet, &mut sweeps).unwrap();
        }

        for scan in &sweeps[0].scans {
            let azimuths: Vec<f64> = scan.points.iter().map(|p| p.azimuth).collect();
            let drops: Vec<usize> = azimuths
                .windows(2)
                .enumerate()
                .filter(|(_, pair)| pair[1] < pair[0])
                .map(|(index, _)| index + 1)
                .collect();
            assert!(drops.len() <= 1);
            if let Some(&index) = drops.first() {
                assert_eq!(index, azimuths.len() - 1);
            }
        }
    }

    #[test]
    fn emitted_points_respect_range_limits() {
        let mut decoder = assembler();
        let mut sweeps: Vec<Sweep> = Vec::new();
        for packet in scenario() {
            decoder.decode(&packet, &mut sweeps).unwrap();
        }
        let config = *decoder.config();
        assert!(sweeps[0]
            .points()
            .all(|p| p.distance >= config.min_range && p.distance <= config.max_range));
    }

    #[test]
    fn points_are_projected_from_decoded_returns() {
        let mut decoder = assembler();
        let mut sweeps: Vec<Sweep> = Vec::new();
        let packets = scenario();
        decoder.decode(&packets[0], &mut sweeps).unwrap();
        decoder.decode(&packets[1], &mut sweeps).unwrap();

        // first point of raw channel 3 comes from firing 8 (block 4, 2°)
        let point = decoder.state().sweep().scans[ChannelGeometryTable::remap(3)].points[0];
        let altitude = 3.0f64.to_radians();
        let distance = f64::from(5000u16 + 30) * 0.002;
        let firing_azimuth = 2.0f64.to_radians();
        // firing 9 sits 2° further on
        let azimuth = firing_azimuth
            + 3.0 * crate::geometry::CHANNEL_INTERVAL / FIRING_INTERVAL * 2.0f64.to_radians();

        assert!((point.distance - distance).abs() < 1e-9);
        assert!((point.azimuth - azimuth).abs() < 1e-9);
        assert!((point.x - distance * altitude.cos() * azimuth.cos()).abs() < 1e-9);
        assert!((point.y + distance * altitude.cos() * azimuth.sin()).abs() < 1e-9);
        assert!((point.z - distance * altitude.sin()).abs() < 1e-9);
        assert_eq!(point.intensity, 30);
        let time = 8.0 * FIRING_INTERVAL + 3.0 * crate::geometry::CHANNEL_INTERVAL;
        assert!((point.time - time).abs() < 1e-12);
    }

    #[test]
    fn invalid_header_leaves_state_untouched() {
        let packets = scenario();
        let mut decoder = assembler();
        let mut sweeps: Vec<Sweep> = Vec::new();
        decoder.decode(&packets[0], &mut sweeps).unwrap();
        decoder.decode(&packets[1], &mut sweeps).unwrap();
        let before = decoder.state().clone();

        let mut corrupt = packets[3];
        corrupt[5 * 100] = 0x00;
        let outcome = decoder.decode(&corrupt, &mut sweeps).unwrap();

        assert_eq!(
            outcome,
            DecodeOutcome::Dropped {
                block: 5,
                header: 0xEE00
            }
        );
        assert_eq!(decoder.state(), &before);
        assert!(sweeps.is_empty());
        assert_eq!(decoder.metrics().packets_dropped, 1);
    }

    #[test]
    fn wrong_length_fails_fast() {
        let mut decoder = assembler();
        let mut sweeps: Vec<Sweep> = Vec::new();
        let before = decoder.state().clone();

        let err = decoder.decode(&[0u8; 512], &mut sweeps).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Packet(PacketError::Length {
                expected: PACKET_SIZE,
                actual: 512
            })
        );
        assert_eq!(decoder.state(), &before);
    }

    #[test]
    fn wrap_between_packets_emits_without_closing_firings() {
        let mut decoder = assembler();
        let mut sweeps: Vec<Sweep> = Vec::new();
        decoder.decode(&packet(linear(300.0, 4.0)), &mut sweeps).unwrap();
        decoder.decode(&packet(linear(350.0, 0.5)), &mut sweeps).unwrap();
        decoder.decode(&packet(linear(10.0, 5.0)), &mut sweeps).unwrap();
        let open_points = decoder.state().sweep().point_count();

        let outcome = decoder.decode(&packet(linear(1.0, 0.5)), &mut sweeps).unwrap();
        assert!(matches!(
            outcome,
            DecodeOutcome::SweepEmitted { firing: 0, .. }
        ));
        assert_eq!(sweeps[0].point_count(), open_points);
        assert_eq!(
            decoder.state().sweep().point_count(),
            24 * VALID_PER_FIRING
        );
    }

    #[test]
    fn decoding_is_deterministic() {
        let run = || {
            let mut decoder = assembler();
            let mut sweeps: Vec<Sweep> = Vec::new();
            for packet in scenario() {
                decoder.decode(&packet, &mut sweeps).unwrap();
            }
            sweeps
        };

        let first = run();
        let second = run();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn reset_returns_to_awaiting_first_revolution() {
        let mut decoder = assembler();
        let mut sweeps: Vec<Sweep> = Vec::new();
        for packet in scenario().iter().take(2) {
            decoder.decode(packet, &mut sweeps).unwrap();
        }
        assert_eq!(decoder.phase(), AssemblerPhase::Accumulating);

        decoder.reset();
        assert_eq!(decoder.phase(), AssemblerPhase::AwaitingFirstRevolution);
        assert!(decoder.state().sweep().is_empty());
        assert_eq!(decoder.state().last_azimuth(), 0.0);
    }
}
