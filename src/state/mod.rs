mod operational;
mod snapshot;

pub use operational::OperationalState;
pub use snapshot::{CpuStats, DiskUsage, LogSnapshot, SysInfo};
