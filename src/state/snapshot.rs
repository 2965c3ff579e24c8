use serde::{Deserialize, Deserializer, Serialize};

/// Payload of `get_log` and `get_ffmpeg_log`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogSnapshot {
    Log { log: String },
    Error { error: String },
}

/// Payload of `get_sys_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SysInfo {
    Info { info: String },
    Error { error: String },
}

/// Payload of `get_disk_usage`. Values are kept as display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskUsage {
    #[serde(deserialize_with = "display_string")]
    pub filesystem: String,
    #[serde(deserialize_with = "display_string")]
    pub size: String,
    #[serde(deserialize_with = "display_string")]
    pub used: String,
    #[serde(deserialize_with = "display_string")]
    pub available: String,
}

/// Payload of `get_cpu_stats`, both values in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuStats {
    pub cpu_usage: f64,
    pub memory_usage_percent: f64,
}

impl LogSnapshot {
    /// Log text worth displaying. An empty log leaves the region untouched.
    pub fn text(&self) -> Option<&str> {
        match self {
            LogSnapshot::Log { log } if !log.is_empty() => Some(log),
            _ => None,
        }
    }
}

impl SysInfo {
    pub fn text(&self) -> Option<&str> {
        match self {
            SysInfo::Info { info } if !info.is_empty() => Some(info),
            _ => None,
        }
    }
}

fn display_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_variants() {
        let log: LogSnapshot = serde_json::from_str(r#"{"log": "line 1\nline 2"}"#).unwrap();
        assert_eq!(log.text(), Some("line 1\nline 2"));

        let err: LogSnapshot = serde_json::from_str(r#"{"error": "No such file"}"#).unwrap();
        assert_eq!(err, LogSnapshot::Error { error: "No such file".to_string() });
        assert_eq!(err.text(), None);
    }

    #[test]
    fn test_empty_log_has_no_text() {
        let log = LogSnapshot::Log { log: String::new() };
        assert_eq!(log.text(), None);
    }

    #[test]
    fn test_disk_usage_accepts_numbers() {
        let json = r#"{"filesystem": "/dev/root", "size": "29G", "used": 1024, "available": "27G"}"#;
        let disk: DiskUsage = serde_json::from_str(json).unwrap();
        assert_eq!(disk.filesystem, "/dev/root");
        assert_eq!(disk.used, "1024");
    }

    #[test]
    fn test_cpu_stats() {
        let stats: CpuStats =
            serde_json::from_str(r#"{"cpu_usage": 12.5, "memory_usage_percent": 40}"#).unwrap();
        assert_eq!(stats.cpu_usage, 12.5);
        assert_eq!(stats.memory_usage_percent, 40.0);
    }

    #[test]
    fn test_sys_info_error() {
        let info: SysInfo = serde_json::from_str(r#"{"error": "vcgencmd missing"}"#).unwrap();
        assert_eq!(info.text(), None);
    }
}
