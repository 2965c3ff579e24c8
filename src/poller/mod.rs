//! Periodic snapshot polling
//!
//! Each [`PollStream`] runs on its own interval task. Every tick spawns the
//! fetch separately, so a slow backend reply never delays the next tick and
//! requests for one stream may overlap. Results are delivered over a single
//! channel in completion order; the consumer applies them to a
//! [`PanelModel`] so the most recently resolved reply wins.
//!
//! A failed fetch is logged and dropped. It does not stop its stream, does
//! not touch other streams and is not retried before the next tick.

mod model;
mod source;

pub use model::{PanelModel, Region};
pub use source::SnapshotSource;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::gateway::ReadEndpoint;
use crate::state::{CpuStats, DiskUsage, LogSnapshot, OperationalState, SysInfo};

/// One independently scheduled read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollStream {
    State,
    Log,
    FfmpegLog,
    CpuStats,
    DiskUsage,
    /// Fetched once at start, never on a timer
    SysInfo,
}

/// A decoded reply for one stream
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    State(OperationalState),
    Log(LogSnapshot),
    FfmpegLog(LogSnapshot),
    CpuStats(CpuStats),
    DiskUsage(DiskUsage),
    SysInfo(SysInfo),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollEvent {
    pub stream: PollStream,
    /// Tick number within the stream; later ticks may arrive first
    pub seq: u64,
    pub snapshot: Snapshot,
}

impl PollStream {
    pub const PERIODIC: [PollStream; 5] = [
        PollStream::State,
        PollStream::Log,
        PollStream::FfmpegLog,
        PollStream::CpuStats,
        PollStream::DiskUsage,
    ];

    pub fn endpoint(&self) -> ReadEndpoint {
        match self {
            PollStream::State => ReadEndpoint::LoadState,
            PollStream::Log => ReadEndpoint::GetLog,
            PollStream::FfmpegLog => ReadEndpoint::GetFfmpegLog,
            PollStream::CpuStats => ReadEndpoint::GetCpuStats,
            PollStream::DiskUsage => ReadEndpoint::GetDiskUsage,
            PollStream::SysInfo => ReadEndpoint::GetSysInfo,
        }
    }
}

impl fmt::Display for PollStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint().as_str())
    }
}

/// Handle to the running poll tasks. Dropping it stops polling.
pub struct Poller {
    tasks: Vec<JoinHandle<()>>,
}

impl Poller {
    /// Starts every periodic stream plus the one-off system info fetch.
    ///
    /// The first tick of each stream fires immediately.
    pub fn spawn<S: SnapshotSource>(
        source: Arc<S>,
        interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<PollEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let mut tasks: Vec<JoinHandle<()>> = PollStream::PERIODIC
            .into_iter()
            .map(|stream| {
                tokio::spawn(Self::run_stream(
                    source.clone(),
                    stream,
                    interval,
                    sender.clone(),
                ))
            })
            .collect();

        tasks.push(tokio::spawn(Self::poll_once(
            source,
            PollStream::SysInfo,
            1,
            sender,
        )));

        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            streams = PollStream::PERIODIC.len(),
            "Poller started"
        );

        (Self { tasks }, receiver)
    }

    /// Stops all interval tasks. Fetches already in flight finish on their
    /// own and their results are discarded once the receiver is gone.
    pub fn shutdown(mut self) {
        self.abort_all();
    }

    fn abort_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    async fn run_stream<S: SnapshotSource>(
        source: Arc<S>,
        stream: PollStream,
        interval: Duration,
        sender: mpsc::UnboundedSender<PollEvent>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut seq = 0u64;

        loop {
            ticker.tick().await;
            if sender.is_closed() {
                tracing::debug!(stream = %stream, "Poll receiver closed, stopping stream");
                break;
            }

            seq += 1;
            tokio::spawn(Self::poll_once(source.clone(), stream, seq, sender.clone()));
        }
    }

    async fn poll_once<S: SnapshotSource>(
        source: Arc<S>,
        stream: PollStream,
        seq: u64,
        sender: mpsc::UnboundedSender<PollEvent>,
    ) {
        match source.fetch(stream).await {
            Ok(snapshot) => {
                if sender.send(PollEvent { stream, seq, snapshot }).is_err() {
                    tracing::debug!(stream = %stream, seq, "Dropping poll result, receiver closed");
                }
            }
            Err(e) => {
                tracing::warn!(stream = %stream, seq, error = %e, "Poll failed");
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.abort_all();
    }
}
