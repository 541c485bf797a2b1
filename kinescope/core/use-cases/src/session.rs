use ::domain::PlaybackProgress;
use ::domain::Quality;
use ::domain::Route;
use ::domain::Video;

/// The single globally-owned record of what is playing and where it came
/// from. Whichever view is mounted (full page or miniplayer) reads and
/// drives this one record; there is never a second clock for a session.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub video: Video,
    pub origin_route: Route,

    pub playing: bool,
    pub volume: f64,
    pub muted: bool,
    pub quality: Option<Quality>,
    pub rate: f64,
    pub progress: PlaybackProgress,
}

/// Single-writer owner of the at-most-one [`PlaybackSession`]. "Exactly one
/// active session" is a replace invariant here, not a convention observed
/// at call sites.
#[derive(Debug, Default)]
pub struct SessionStore {
    session: Option<PlaybackSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditionally replaces any existing session; two videos never
    /// share one. Defaults: playing intent, full volume, unmuted, highest
    /// available quality, normal rate, zero progress.
    pub fn play_video(&mut self, video: Video, origin_route: Route) -> &PlaybackSession {
        let quality = video.highest_quality();

        self.session.insert(PlaybackSession {
            video,
            origin_route,
            playing: true,
            volume: 1.0,
            muted: false,
            quality,
            rate: 1.0,
            progress: PlaybackProgress::default(),
        })
    }

    /// Ends the floating view and real playback with it.
    pub fn close_player(&mut self) -> Option<PlaybackSession> {
        self.session.take()
    }

    /// A navigation request back to the owning route; no state change.
    pub fn open_player(&self) -> Option<Route> {
        self.session.as_ref().map(|session| session.origin_route.clone())
    }

    /// Derived on every call, never cached: a cached value goes stale the
    /// moment the viewer navigates back.
    pub fn miniplayer_visible(&self, current_route: &Route) -> bool {
        self.session
            .as_ref()
            .map(|session| session.origin_route != *current_route)
            .unwrap_or(false)
    }

    pub fn current(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut PlaybackSession> {
        self.session.as_mut()
    }

    pub fn set_progress(&mut self, progress: PlaybackProgress) {
        if let Some(session) = self.session.as_mut() {
            session.progress = progress;
        }
    }

    pub fn set_playing(&mut self, playing: bool) {
        if let Some(session) = self.session.as_mut() {
            session.playing = playing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::domain::Rendition;
    use ::domain::VideoMetadata;
    use ::domain::Visibility;

    fn video(id: &'static str) -> Video {
        Video {
            id: id.into(),
            channel: "c1".into(),
            metadata: VideoMetadata { title: id.into() },
            renditions: vec![
                Rendition { quality: Quality::Q1080, url: "hi".into() },
                Rendition { quality: Quality::Q480, url: "lo".into() },
            ]
            .into(),
            duration_seconds: 120.0,
            is_live: false,
            visibility: Visibility::Public,
            premiere_time: None,
        }
    }

    #[test]
    fn miniplayer_follows_the_route_comparison() {
        let mut store = SessionStore::new();
        store.play_video(video("v1"), "/watch/v1".into());

        assert!(!store.miniplayer_visible(&"/watch/v1".into()));
        assert!(store.miniplayer_visible(&"/".into()));
        assert!(store.miniplayer_visible(&"/channel/c1".into()));
    }

    #[test]
    fn close_clears_the_session_regardless_of_route() {
        let mut store = SessionStore::new();
        store.play_video(video("v1"), "/watch/v1".into());

        assert!(store.close_player().is_some());
        assert!(!store.miniplayer_visible(&"/".into()));
        assert!(store.current().is_none());
    }

    #[test]
    fn play_video_replaces_rather_than_merges() {
        let mut store = SessionStore::new();
        store.play_video(video("v1"), "/watch/v1".into());
        store.current_mut().unwrap().volume = 0.3;
        store.current_mut().unwrap().muted = true;

        store.play_video(video("v2"), "/watch/v2".into());

        let session = store.current().unwrap();
        assert_eq!(session.video.id, "v2");
        assert_eq!(session.origin_route, "/watch/v2");
        assert!(session.playing);
        assert_eq!(session.volume, 1.0);
        assert!(!session.muted);
        assert_eq!(session.progress, PlaybackProgress::default());
    }

    #[test]
    fn sessions_start_at_the_highest_rung_of_the_ladder() {
        let mut store = SessionStore::new();
        store.play_video(video("v1"), "/watch/v1".into());

        assert_eq!(store.current().unwrap().quality, Some(Quality::Q1080));
    }

    #[test]
    fn open_player_points_back_at_the_owning_route() {
        let mut store = SessionStore::new();
        assert_eq!(store.open_player(), None);

        store.play_video(video("v1"), "/watch/v1".into());
        assert_eq!(store.open_player(), Some("/watch/v1".into()));
    }
}
