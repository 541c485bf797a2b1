use ::async_trait::async_trait;
use ::domain::AdCreative;
use ::domain::Channel;
use ::domain::ChannelId;
use ::domain::Route;
use ::domain::Timestamp;
use ::domain::Video;
use ::domain::VideoId;
use ::domain::ViewerId;

use crate::models::events::MediaEvent;
use crate::utils::aliases::BoxedStream;
use crate::utils::aliases::Fallible;
use crate::utils::aliases::MaybeOwnedString;

/// Read side of the data service. Records in, no side effects.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn video(&self, id: &VideoId) -> Fallible<Video>;

    async fn channel(&self, id: &ChannelId) -> Fallible<Channel>;

    async fn memberships(&self, viewer: &ViewerId) -> Fallible<::std::collections::HashSet<ChannelId>>;

    async fn ad_candidates(&self, viewer: &ViewerId, video: &VideoId) -> Fallible<Vec<AdCreative>>;

    async fn up_next(&self, video: &VideoId) -> Fallible<Vec<Video>>;
}

/// Write side of the data service. Fire-and-forget from the orchestrator's
/// perspective: failures are logged, never surfaced as playback errors.
#[async_trait]
pub trait HistoryLedger: Send + Sync {
    async fn record(&self, viewer: &ViewerId, video: &VideoId) -> Fallible<()>;
}

/// The one underlying media element backing the session. Commands go down,
/// `MediaEvent`s come back up through `events`.
#[async_trait]
pub trait MediaPipeline: Send + Sync {
    async fn load(&self, url: MaybeOwnedString) -> Fallible<()>;

    async fn play(&self) -> Fallible<()>;

    async fn pause(&self) -> Fallible<()>;

    async fn seek(&self, position_seconds: f64) -> Fallible<()>;

    async fn set_volume(&self, volume: f64) -> Fallible<()>;

    async fn set_muted(&self, muted: bool) -> Fallible<()>;

    async fn set_rate(&self, rate: f64) -> Fallible<()>;

    async fn events(&self) -> Fallible<BoxedStream<MediaEvent>>;
}

/// Routing is owned elsewhere; the orchestrator only reads the current
/// route and requests navigation.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn current_route(&self) -> Route;

    async fn navigate(&self, route: Route) -> Fallible<()>;
}

pub trait Clock: Send + Sync {
    fn wall(&self) -> Timestamp;

    fn monotonic_ms(&self) -> u64;
}
