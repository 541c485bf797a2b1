use ::async_trait::async_trait;
use ::derive_new::new;
use ::domain::VideoId;
use ::domain::ViewerId;
use ::use_cases::gateways::HistoryLedger;

use crate::utils::aliases::Fallible;

/// Logs the write and succeeds. The orchestrator treats history as
/// fire-and-forget either way.
#[derive(new)]
pub struct TracingHistoryLedger;

#[async_trait]
impl HistoryLedger for TracingHistoryLedger {
    async fn record(&self, viewer: &ViewerId, video: &VideoId) -> Fallible<()> {
        ::tracing::info!(%viewer, %video, "watch history appended");
        Ok(())
    }
}

/// Always fails; exists to prove failures never reach playback state.
#[derive(new)]
pub struct FailingHistoryLedger;

#[async_trait]
impl HistoryLedger for FailingHistoryLedger {
    async fn record(&self, _viewer: &ViewerId, _video: &VideoId) -> Fallible<()> {
        Err(::anyhow::anyhow!("history service unavailable"))
    }
}

/// Remembers every write. Test support.
#[derive(new, Default)]
pub struct RecordingHistoryLedger {
    #[new(default)]
    entries: ::std::sync::Mutex<Vec<(ViewerId, VideoId)>>,
}

impl RecordingHistoryLedger {
    pub fn entries(&self) -> Vec<(ViewerId, VideoId)> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryLedger for RecordingHistoryLedger {
    async fn record(&self, viewer: &ViewerId, video: &VideoId) -> Fallible<()> {
        self.entries.lock().unwrap().push((viewer.clone(), video.clone()));
        Ok(())
    }
}
