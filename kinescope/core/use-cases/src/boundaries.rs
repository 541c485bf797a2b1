use ::async_trait::async_trait;
use ::domain::Quality;
use ::domain::Route;
use ::domain::Video;
use ::domain::VideoId;

use crate::models::descriptors::TabMode;
use crate::models::events::DiagnosticEvent;
use crate::models::events::SurfaceEvent;
use crate::utils::aliases::Fallible;

#[async_trait]
pub trait Accept<Request>: Send + Sync {
    async fn accept(self: ::std::sync::Arc<Self>, request: Request) -> Fallible<()>;
}

#[async_trait]
pub trait Update<Event>: Send + Sync {
    async fn update(&self, event: &Event) -> Fallible<()>;
}

pub trait WatchView: Update<SurfaceEvent> + Update<DiagnosticEvent> {}

impl<View> WatchView for View where View: Update<SurfaceEvent> + Update<DiagnosticEvent> {}

/// Navigating to a video id: load it and make it the global session.
#[derive(Debug, Clone)]
pub struct WatchRequestModel {
    pub video_id: VideoId,
    pub route: Route,
}

/// Everything else a mounted watch surface can ask for, dispatched through
/// a single match so a new interaction is a compile-time-checked change.
#[derive(Debug, Clone)]
pub enum SurfaceCommand {
    TogglePlay,

    SeekStart,
    SeekPreview { position_seconds: f64 },
    SeekCommit { position_seconds: f64 },

    SelectQuality { quality: Quality },
    SetRate { rate: f64 },
    SetVolume { volume: f64 },
    ToggleMute,

    SkipAd,
    /// The ad element reached its natural end.
    AdFinished,

    ToggleTheatre,
    ToggleFullscreen,
    ToggleSettings,
    PointerMoved,
    SelectTab { tab: TabMode },

    Enqueue { video: Video },
    RemoveFromQueue { video_id: VideoId },
    Reorder { videos: Vec<Video> },
    SeedUpNext,

    RouteChanged { route: Route },
    OpenMiniplayer,
    CloseMiniplayer,
}
