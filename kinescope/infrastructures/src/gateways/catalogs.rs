use ::async_trait::async_trait;
use ::domain::AdCreative;
use ::domain::Channel;
use ::domain::ChannelId;
use ::domain::Video;
use ::domain::VideoId;
use ::domain::ViewerId;
use ::use_cases::errors::WatchError;
use ::use_cases::gateways::Catalog;

use crate::utils::aliases::Fallible;

/// In-memory catalog seeded with demo records. Failure modes are
/// injectable so the retry and fail-open paths can be exercised.
#[derive(Default)]
pub struct FixtureCatalog {
    videos: ::std::collections::HashMap<VideoId, Video>,
    channels: ::std::collections::HashMap<ChannelId, Channel>,
    memberships: ::std::collections::HashMap<ViewerId, ::std::collections::HashSet<ChannelId>>,
    ads: Vec<AdCreative>,
    up_next: ::std::collections::HashMap<VideoId, Vec<VideoId>>,

    /// Remaining transient failures per video id, consumed fetch by fetch.
    transient_failures: ::std::sync::Mutex<::std::collections::HashMap<VideoId, u32>>,
    membership_outage: bool,
    ad_outage: bool,
}

impl FixtureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(mut self, video: Video) -> Self {
        self.videos.insert(video.id.clone(), video);
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.insert(channel.id.clone(), channel);
        self
    }

    pub fn with_membership(mut self, viewer: ViewerId, channel: ChannelId) -> Self {
        self.memberships.entry(viewer).or_default().insert(channel);
        self
    }

    pub fn with_ad(mut self, creative: AdCreative) -> Self {
        self.ads.push(creative);
        self
    }

    pub fn with_up_next(mut self, video: VideoId, pool: Vec<VideoId>) -> Self {
        self.up_next.insert(video, pool);
        self
    }

    pub fn with_transient_failures(self, video: VideoId, failures: u32) -> Self {
        self.transient_failures.lock().unwrap().insert(video, failures);
        self
    }

    pub fn with_membership_outage(mut self) -> Self {
        self.membership_outage = true;
        self
    }

    pub fn with_ad_outage(mut self) -> Self {
        self.ad_outage = true;
        self
    }

    pub fn videos(&self) -> Vec<Video> {
        let mut videos: Vec<Video> = self.videos.values().cloned().collect();
        videos.sort_by(|a, b| a.id.cmp(&b.id));
        videos
    }
}

#[async_trait]
impl Catalog for FixtureCatalog {
    async fn video(&self, id: &VideoId) -> Fallible<Video> {
        {
            let mut failures = self.transient_failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(id) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(WatchError::TransientFetch { context: format!("video {id}").into() }.into());
                }
            }
        }

        self.videos
            .get(id)
            .cloned()
            .ok_or_else(|| WatchError::NotFound { id: id.clone() }.into())
    }

    async fn channel(&self, id: &ChannelId) -> Fallible<Channel> {
        self.channels
            .get(id)
            .cloned()
            .ok_or_else(|| WatchError::NotFound { id: id.clone() }.into())
    }

    async fn memberships(
        &self, viewer: &ViewerId,
    ) -> Fallible<::std::collections::HashSet<ChannelId>> {
        if self.membership_outage {
            return Err(WatchError::TransientFetch { context: "memberships".into() }.into());
        }

        Ok(self.memberships.get(viewer).cloned().unwrap_or_default())
    }

    async fn ad_candidates(&self, _viewer: &ViewerId, _video: &VideoId) -> Fallible<Vec<AdCreative>> {
        if self.ad_outage {
            return Err(WatchError::AdLoad { reason: "ad service unavailable".into() }.into());
        }

        Ok(self.ads.clone())
    }

    async fn up_next(&self, video: &VideoId) -> Fallible<Vec<Video>> {
        let pool = self.up_next.get(video).cloned().unwrap_or_default();

        Ok(pool.iter().filter_map(|id| self.videos.get(id).cloned()).collect())
    }
}
