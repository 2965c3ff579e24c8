use futures::future::BoxFuture;
use futures::FutureExt;

use super::{PollStream, Snapshot};
use crate::error::Result;
use crate::gateway::BackendClient;

/// Anything that can produce a snapshot for a poll stream
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch(&self, stream: PollStream) -> BoxFuture<'_, Result<Snapshot>>;
}

/// Polls over HTTP. The same paths are served by the backend and by the
/// gateway, so this works pointed at either.
impl SnapshotSource for BackendClient {
    fn fetch(&self, stream: PollStream) -> BoxFuture<'_, Result<Snapshot>> {
        async move {
            let path = stream.endpoint().as_str();
            let snapshot = match stream {
                PollStream::State => Snapshot::State(self.get_json(path).await?),
                PollStream::Log => Snapshot::Log(self.get_json(path).await?),
                PollStream::FfmpegLog => Snapshot::FfmpegLog(self.get_json(path).await?),
                PollStream::CpuStats => Snapshot::CpuStats(self.get_json(path).await?),
                PollStream::DiskUsage => Snapshot::DiskUsage(self.get_json(path).await?),
                PollStream::SysInfo => Snapshot::SysInfo(self.get_json(path).await?),
            };
            Ok(snapshot)
        }
        .boxed()
    }
}
