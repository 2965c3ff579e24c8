use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{PanelError, Result};
use crate::interlock::ControlId;

/// Read-only endpoints relayed with `GET`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadEndpoint {
    LoadState,
    GetLog,
    GetFfmpegLog,
    GetSysInfo,
    GetDiskUsage,
    GetCpuStats,
}

/// Body-less commands relayed with `POST`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    StartStream,
    StopStream,
    StartRecording,
    StopRecording,
    StartRecord,
    StopRecord,
    StartStreamRecord,
    StopStreamRecord,
    StartFileStream,
    StopFileStream,
    Reboot,
    Poweroff,
    Restart,
}

/// Any body-less `POST` the gateway relays: a named command or a
/// `toggle_<control>` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    Command(Command),
    Toggle(ControlId),
}

impl ReadEndpoint {
    pub const ALL: [ReadEndpoint; 6] = [
        ReadEndpoint::LoadState,
        ReadEndpoint::GetLog,
        ReadEndpoint::GetFfmpegLog,
        ReadEndpoint::GetSysInfo,
        ReadEndpoint::GetDiskUsage,
        ReadEndpoint::GetCpuStats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadEndpoint::LoadState => "load_state",
            ReadEndpoint::GetLog => "get_log",
            ReadEndpoint::GetFfmpegLog => "get_ffmpeg_log",
            ReadEndpoint::GetSysInfo => "get_sys_info",
            ReadEndpoint::GetDiskUsage => "get_disk_usage",
            ReadEndpoint::GetCpuStats => "get_cpu_stats",
        }
    }
}

impl Command {
    pub const ALL: [Command; 13] = [
        Command::StartStream,
        Command::StopStream,
        Command::StartRecording,
        Command::StopRecording,
        Command::StartRecord,
        Command::StopRecord,
        Command::StartStreamRecord,
        Command::StopStreamRecord,
        Command::StartFileStream,
        Command::StopFileStream,
        Command::Reboot,
        Command::Poweroff,
        Command::Restart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::StartStream => "start_stream",
            Command::StopStream => "stop_stream",
            Command::StartRecording => "start_recording",
            Command::StopRecording => "stop_recording",
            Command::StartRecord => "start_record",
            Command::StopRecord => "stop_record",
            Command::StartStreamRecord => "start_stream_record",
            Command::StopStreamRecord => "stop_stream_record",
            Command::StartFileStream => "start_file_stream",
            Command::StopFileStream => "stop_file_stream",
            Command::Reboot => "reboot",
            Command::Poweroff => "poweroff",
            Command::Restart => "restart",
        }
    }
}

impl PostAction {
    pub fn path(&self) -> String {
        match self {
            PostAction::Command(command) => command.as_str().to_string(),
            PostAction::Toggle(control) => control.toggle_path(),
        }
    }

    pub fn is_toggle(&self) -> bool {
        matches!(self, PostAction::Toggle(_))
    }
}

impl FromStr for ReadEndpoint {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        ReadEndpoint::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| PanelError::UnknownAction(s.to_string()))
    }
}

impl FromStr for Command {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        Command::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| PanelError::UnknownAction(s.to_string()))
    }
}

impl FromStr for PostAction {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.strip_prefix("toggle_") {
            Some(control) => control
                .parse()
                .map(PostAction::Toggle)
                .map_err(|_| PanelError::UnknownAction(s.to_string())),
            None => s.parse().map(PostAction::Command),
        }
    }
}

impl fmt::Display for ReadEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PostAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Form body of `POST /delete_file`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteFileRequest {
    pub directory: String,
    pub filename: String,
}

impl DeleteFileRequest {
    /// Both fields must name a single path component
    pub fn validate(&self) -> Result<()> {
        validate_component("directory", &self.directory)?;
        validate_component("filename", &self.filename)
    }

    /// URL-encoded body forwarded to the backend
    pub fn to_form_body(&self) -> String {
        format!(
            "directory={}&filename={}",
            urlencoding::encode(&self.directory),
            urlencoding::encode(&self.filename)
        )
    }
}

fn validate_component(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PanelError::invalid_request(format!("{} is required", field)));
    }
    if value.contains('/') || value.contains('\\') || value == "." || value == ".." {
        return Err(PanelError::invalid_request(format!(
            "{} must be a single path component, got '{}'",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_action_parsing() {
        assert_eq!(
            "start_stream".parse::<PostAction>().unwrap(),
            PostAction::Command(Command::StartStream)
        );
        assert_eq!(
            "toggle_stream_record".parse::<PostAction>().unwrap(),
            PostAction::Toggle(ControlId::StreamRecord)
        );
        assert!("toggle_reboot".parse::<PostAction>().is_err());
        assert!("update_config".parse::<PostAction>().is_err());
        assert!("load_state".parse::<PostAction>().is_err());
    }

    #[test]
    fn test_paths_round_trip() {
        for command in Command::ALL {
            let action = PostAction::Command(command);
            assert_eq!(action.path().parse::<PostAction>().unwrap(), action);
        }
        for control in ControlId::ALL {
            let action = PostAction::Toggle(control);
            assert!(action.is_toggle());
            assert_eq!(action.path().parse::<PostAction>().unwrap(), action);
        }
        for endpoint in ReadEndpoint::ALL {
            assert_eq!(endpoint.as_str().parse::<ReadEndpoint>().unwrap(), endpoint);
        }
    }

    #[test]
    fn test_delete_request_validation() {
        let ok = DeleteFileRequest {
            directory: "clips".to_string(),
            filename: "a.mp4".to_string(),
        };
        assert!(ok.validate().is_ok());
        assert_eq!(ok.to_form_body(), "directory=clips&filename=a.mp4");

        let traversal = DeleteFileRequest {
            directory: "..".to_string(),
            filename: "a.mp4".to_string(),
        };
        assert!(matches!(
            traversal.validate(),
            Err(PanelError::InvalidRequest(_))
        ));

        let nested = DeleteFileRequest {
            directory: "clips".to_string(),
            filename: "../../etc/passwd".to_string(),
        };
        assert!(nested.validate().is_err());

        let empty = DeleteFileRequest {
            directory: "clips".to_string(),
            filename: " ".to_string(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_form_body_is_encoded() {
        let req = DeleteFileRequest {
            directory: "recordings".to_string(),
            filename: "stream 1&2.mp4".to_string(),
        };
        assert_eq!(
            req.to_form_body(),
            "directory=recordings&filename=stream%201%262.mp4"
        );
    }
}
