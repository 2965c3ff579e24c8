use super::{PollEvent, Snapshot};
use crate::interlock::{self, PanelView};
use crate::state::{CpuStats, DiskUsage, LogSnapshot};

/// Display region touched by a poll result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Controls,
    Log,
    FfmpegLog,
    Stats,
    Disk,
    SysInfo,
}

/// The one in-memory record of what the panel shows.
///
/// Every state snapshot is re-rendered into a fresh [`PanelView`]; other
/// regions are replaced whole. Results are applied in the order they are
/// received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelModel {
    pub view: Option<PanelView>,
    pub log: Option<String>,
    pub ffmpeg_log: Option<String>,
    pub cpu: Option<CpuStats>,
    pub disk: Option<DiskUsage>,
    pub sys_info: Option<String>,
}

impl PanelModel {
    /// Applies one poll result. Returns the region that changed, if any.
    pub fn apply(&mut self, event: PollEvent) -> Option<Region> {
        match event.snapshot {
            Snapshot::State(state) => {
                replace(&mut self.view, interlock::render(&state), Region::Controls)
            }
            Snapshot::Log(log) => apply_log(&mut self.log, &log, Region::Log),
            Snapshot::FfmpegLog(log) => apply_log(&mut self.ffmpeg_log, &log, Region::FfmpegLog),
            Snapshot::CpuStats(stats) => replace(&mut self.cpu, stats, Region::Stats),
            Snapshot::DiskUsage(disk) => replace(&mut self.disk, disk, Region::Disk),
            Snapshot::SysInfo(info) => match info.text() {
                Some(text) => replace(&mut self.sys_info, text.to_string(), Region::SysInfo),
                None => {
                    tracing::warn!(payload = ?info, "System info unavailable");
                    None
                }
            },
        }
    }
}

fn apply_log(slot: &mut Option<String>, log: &LogSnapshot, region: Region) -> Option<Region> {
    match log {
        LogSnapshot::Error { error } => {
            tracing::warn!(region = ?region, error = %error, "Backend reported log error");
            None
        }
        LogSnapshot::Log { .. } => match log.text() {
            Some(text) => replace(slot, text.to_string(), region),
            None => None,
        },
    }
}

fn replace<T: PartialEq>(slot: &mut Option<T>, value: T, region: Region) -> Option<Region> {
    if slot.as_ref() == Some(&value) {
        return None;
    }
    *slot = Some(value);
    Some(region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interlock::ControlId;
    use crate::poller::PollStream;
    use crate::state::OperationalState;

    fn event(stream: PollStream, snapshot: Snapshot) -> PollEvent {
        PollEvent {
            stream,
            seq: 1,
            snapshot,
        }
    }

    #[test]
    fn test_state_renders_controls() {
        let mut model = PanelModel::default();
        let state = OperationalState {
            recording: true,
            ..Default::default()
        };

        let region = model.apply(event(PollStream::State, Snapshot::State(state)));
        assert_eq!(region, Some(Region::Controls));

        let view = model.view.as_ref().unwrap();
        assert_eq!(view.enabled_controls(), vec![ControlId::Record]);
        assert!(!view.shared.form_controls_enabled);
    }

    #[test]
    fn test_unchanged_state_is_idempotent() {
        let mut model = PanelModel::default();
        let snapshot = Snapshot::State(OperationalState {
            file_streaming: true,
            ..Default::default()
        });

        model.apply(event(PollStream::State, snapshot.clone()));
        let first = model.view.clone();
        for _ in 0..3 {
            assert_eq!(model.apply(event(PollStream::State, snapshot.clone())), None);
            assert_eq!(model.view, first);
        }
    }

    #[test]
    fn test_log_error_keeps_last_text() {
        let mut model = PanelModel::default();
        model.apply(event(
            PollStream::Log,
            Snapshot::Log(LogSnapshot::Log {
                log: "Stream started!".into(),
            }),
        ));

        let region = model.apply(event(
            PollStream::Log,
            Snapshot::Log(LogSnapshot::Error {
                error: "permission denied".into(),
            }),
        ));
        assert_eq!(region, None);
        assert_eq!(model.log.as_deref(), Some("Stream started!"));

        let region = model.apply(event(
            PollStream::Log,
            Snapshot::Log(LogSnapshot::Log { log: String::new() }),
        ));
        assert_eq!(region, None);
        assert_eq!(model.log.as_deref(), Some("Stream started!"));
    }

    #[test]
    fn test_regions_are_disjoint() {
        let mut model = PanelModel::default();
        model.apply(event(
            PollStream::FfmpegLog,
            Snapshot::FfmpegLog(LogSnapshot::Log {
                log: "frame=100".into(),
            }),
        ));
        model.apply(event(
            PollStream::CpuStats,
            Snapshot::CpuStats(CpuStats {
                cpu_usage: 33.0,
                memory_usage_percent: 51.5,
            }),
        ));

        assert_eq!(model.ffmpeg_log.as_deref(), Some("frame=100"));
        assert!(model.log.is_none());
        assert!(model.view.is_none());
        assert_eq!(model.cpu.map(|c| c.cpu_usage), Some(33.0));
    }
}
