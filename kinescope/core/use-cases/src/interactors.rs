use ::async_trait::async_trait;
use ::domain::ChannelId;
use ::domain::PlaybackProgress;
use ::domain::Route;
use ::domain::Video;
use ::domain::Viewer;
use ::futures_util::StreamExt as _;

use crate::ads::AdDecision;
use crate::ads::AdGate;
use crate::availability::Availability;
use crate::boundaries::Accept;
use crate::boundaries::SurfaceCommand;
use crate::boundaries::WatchRequestModel;
use crate::boundaries::WatchView;
use crate::errors::WatchError;
use crate::gateways::Catalog;
use crate::gateways::Clock;
use crate::gateways::HistoryLedger;
use crate::gateways::MediaPipeline;
use crate::gateways::Navigator;
use crate::models::descriptors::TabMode;
use crate::models::events::DiagnosticEvent;
use crate::models::events::DiagnosticLevel;
use crate::models::events::MediaEvent;
use crate::models::events::SurfaceEvent;
use crate::queue::PlayQueue;
use crate::session::SessionStore;
use crate::utils::aliases::Fallible;
use crate::utils::aliases::MaybeOwnedString;
use crate::utils::tasks::ScopedTask;

pub const CONTROLS_IDLE_HIDE_MS: u64 = 3_000;

pub const DEFAULT_TICK_PERIOD: ::std::time::Duration = ::std::time::Duration::from_millis(250);

/// Composition root of the watch surface: binds the media pipeline, the
/// content and ad gates, the queue and the session store, and owns the
/// ephemeral UI state no other component may share.
pub struct WatchSurfaceInteractor {
    pub view: ::std::sync::Arc<dyn WatchView>,

    pub catalog: ::std::sync::Arc<dyn Catalog>,
    pub history: ::std::sync::Arc<dyn HistoryLedger>,
    pub pipeline: ::std::sync::Arc<dyn MediaPipeline>,
    pub navigator: ::std::sync::Arc<dyn Navigator>,
    pub clock: ::std::sync::Arc<dyn Clock>,

    pub viewer: Viewer,

    pub sessions: ::std::sync::Arc<::tokio::sync::Mutex<SessionStore>>,
    pub queue: ::std::sync::Arc<::tokio::sync::Mutex<PlayQueue>>,

    pub tick_period: ::std::time::Duration,

    state: ::tokio::sync::Mutex<SurfaceState>,
}

#[derive(Default)]
struct SurfaceState {
    /// Bumped on every load and close; stale timers and pumps compare
    /// against it and drop out.
    generation: u64,

    video: Option<Video>,
    memberships: Option<::std::collections::HashSet<ChannelId>>,

    availability: Option<Availability>,
    ad: AdGate,
    ui: UiState,

    quality_fallback_used: bool,

    /// Whether the route owning the session is the current route. Per-frame
    /// work only runs while the full surface is mounted.
    mounted: bool,

    premiere_ticker: Option<ScopedTask>,
    ad_ticker: Option<ScopedTask>,
    playback_ticker: Option<ScopedTask>,
    media_pump: Option<ScopedTask>,
}

struct UiState {
    scrub_preview: Option<f64>,
    settings_open: bool,
    theatre: bool,
    fullscreen: bool,
    controls_visible: bool,
    tab: TabMode,
    last_pointer_ms: u64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            scrub_preview: None,
            settings_open: false,
            theatre: false,
            fullscreen: false,
            controls_visible: true,
            tab: TabMode::default(),
            last_pointer_ms: 0,
        }
    }
}

impl SurfaceState {
    /// Resets everything owned by the previous video. Dropping the scoped
    /// tasks aborts them; leaking per-frame work across video changes is a
    /// correctness bug, not a performance one.
    fn begin_load(&mut self, mut video: Video) {
        // A refetch may omit the premiere instant; the merged record keeps
        // the one already cached. This is the only mutation a fetched
        // record ever sees.
        if let Some(cached) = self.video.as_ref() {
            if cached.id == video.id && video.premiere_time.is_none() {
                video.premiere_time = cached.premiere_time;
            }
        }

        self.generation += 1;
        self.video = Some(video);
        self.memberships = None;
        self.availability = None;
        self.ad = AdGate::default();
        self.ui = UiState::default();
        self.quality_fallback_used = false;
        self.mounted = true;
        self.premiere_ticker = None;
        self.ad_ticker = None;
        self.playback_ticker = None;
        self.media_pump = None;
    }

    fn end_session(&mut self) {
        self.generation += 1;
        self.video = None;
        self.memberships = None;
        self.availability = None;
        self.ad = AdGate::default();
        self.ui = UiState::default();
        self.mounted = false;
        self.premiere_ticker = None;
        self.ad_ticker = None;
        self.playback_ticker = None;
        self.media_pump = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickKind {
    Premiere,
    Ad,
    Playback,
}

/// Timer-driven nudge, tagged with the generation that armed it.
#[derive(Debug, Clone, Copy)]
struct Tick {
    kind: TickKind,
    generation: u64,
}

/// A media element report, tagged likewise.
#[derive(Debug)]
struct FromPipeline {
    event: MediaEvent,
    generation: u64,
}

impl WatchSurfaceInteractor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        view: ::std::sync::Arc<dyn WatchView>,
        catalog: ::std::sync::Arc<dyn Catalog>,
        history: ::std::sync::Arc<dyn HistoryLedger>,
        pipeline: ::std::sync::Arc<dyn MediaPipeline>,
        navigator: ::std::sync::Arc<dyn Navigator>,
        clock: ::std::sync::Arc<dyn Clock>,
        viewer: Viewer,
        sessions: ::std::sync::Arc<::tokio::sync::Mutex<SessionStore>>,
        queue: ::std::sync::Arc<::tokio::sync::Mutex<PlayQueue>>,
        tick_period: ::std::time::Duration,
    ) -> Self {
        Self {
            view,
            catalog,
            history,
            pipeline,
            navigator,
            clock,
            viewer,
            sessions,
            queue,
            tick_period,
            state: ::tokio::sync::Mutex::new(SurfaceState::default()),
        }
    }

    async fn warn(&self, message: impl Into<MaybeOwnedString>) -> Fallible<()> {
        let message = message.into();
        ::tracing::warn!(%message);
        self.view.update(&DiagnosticEvent { level: DiagnosticLevel::Warning, message }).await
    }

    /// Metadata reads are the only failures allowed to change the surface's
    /// top-level state; transient ones get exactly one automatic retry.
    async fn fetch_video(&self, id: &::domain::VideoId) -> Fallible<Video> {
        match self.catalog.video(id).await {
            Err(error) if WatchError::is_transient(&error) => {
                ::tracing::debug!(video = %id, "transient fetch failure, retrying once");
                self.catalog.video(id).await
            }
            result => result,
        }
    }

    fn spawn_ticker(self: ::std::sync::Arc<Self>, kind: TickKind, generation: u64) -> ScopedTask {
        let period = self.tick_period;
        let weak = ::std::sync::Arc::downgrade(&self);
        drop(self);

        ScopedTask::spawn(async move {
            let mut interval = ::tokio::time::interval(period);
            interval.tick().await;

            loop {
                interval.tick().await;

                let Some(interactor) = weak.upgrade() else { break };

                // Each tick is handled on its own task: dropping this
                // ticker mid-transition must not cancel the transition it
                // just triggered.
                ::tokio::spawn(async move {
                    if let Err(error) = interactor.accept(Tick { kind, generation }).await {
                        ::tracing::warn!(%error, "tick handling failed");
                    }
                });
            }
        })
    }

    fn spawn_media_pump(self: ::std::sync::Arc<Self>, generation: u64) -> ScopedTask {
        let weak = ::std::sync::Arc::downgrade(&self);
        drop(self);

        ScopedTask::spawn(async move {
            let mut stream = {
                let Some(interactor) = weak.upgrade() else { return };
                match interactor.pipeline.events().await {
                    Ok(stream) => stream,
                    Err(error) => {
                        ::tracing::warn!(%error, "media event stream unavailable");
                        return;
                    }
                }
            };

            while let Some(event) = stream.next().await {
                let Some(interactor) = weak.upgrade() else { break };

                if let Err(error) = interactor.accept(FromPipeline { event, generation }).await {
                    ::tracing::warn!(%error, "media event handling failed");
                }
            }
        })
    }

    /// Recomputes the content gate and acts on the outcome. Called on load
    /// and on every premiere tick while locked.
    async fn apply_availability(
        self: ::std::sync::Arc<Self>, state: &mut SurfaceState, generation: u64,
    ) -> Fallible<()> {
        let Some(video) = state.video.clone() else { return Ok(()) };

        let availability = Availability::evaluate(&video, self.clock.wall(), state.memberships.as_ref());

        let kind_changed = state
            .availability
            .map(|previous| ::std::mem::discriminant(&previous) != ::std::mem::discriminant(&availability))
            .unwrap_or(true);
        state.availability = Some(availability);

        if kind_changed {
            self.view.update(&SurfaceEvent::AvailabilityChanged { availability }).await?;
        }

        match availability {
            Availability::LockedPremiere { remaining_seconds } => {
                self.view.update(&SurfaceEvent::PremiereCountdown { remaining_seconds }).await?;
                if state.premiere_ticker.is_none() {
                    state.premiere_ticker =
                        Some(::std::sync::Arc::clone(&self).spawn_ticker(TickKind::Premiere, generation));
                }
                Ok(())
            }
            // Terminal until membership data changes externally; no timer.
            Availability::LockedMembership => {
                state.premiere_ticker = None;
                Ok(())
            }
            Availability::Live | Availability::Vod => {
                state.premiere_ticker = None;
                self.arm_playback(state, generation).await
            }
            Availability::Ended => Ok(()),
        }
    }

    /// Content is unlocked: resolve the ad gate, then hand the element to
    /// either the ad or the content.
    async fn arm_playback(
        self: ::std::sync::Arc<Self>, state: &mut SurfaceState, generation: u64,
    ) -> Fallible<()> {
        let Some(video) = state.video.clone() else { return Ok(()) };

        let candidates = match self.catalog.ad_candidates(&self.viewer.id, &video.id).await {
            Ok(candidates) => candidates,
            Err(error) => {
                // Fail open: content availability outranks ad delivery.
                self.warn(format!("ad candidates unavailable, skipping gate: {error:#}")).await?;
                Vec::new()
            }
        };

        match state.ad.begin(self.viewer.is_premium, &candidates, self.clock.monotonic_ms()) {
            AdDecision::Interposed { creative } => {
                self.view.update(&SurfaceEvent::AdStarted { creative }).await?;
                state.ad_ticker = Some(::std::sync::Arc::clone(&self).spawn_ticker(TickKind::Ad, generation));
                Ok(())
            }
            AdDecision::Permitted => self.start_content(state, generation).await,
        }
    }

    /// Points the media element at the session's selected rendition and
    /// starts it. Every `play` issued to the pipeline in this file is
    /// guarded on the ad gate being hidden.
    async fn start_content(
        self: ::std::sync::Arc<Self>, state: &mut SurfaceState, generation: u64,
    ) -> Fallible<()> {
        let target = {
            let sessions = self.sessions.lock().await;
            sessions.current().and_then(|session| {
                let rendition = session
                    .quality
                    .and_then(|quality| session.video.rendition(quality))
                    .or_else(|| session.video.renditions.first());

                rendition.map(|rendition| {
                    (
                        rendition.url.clone(),
                        session.progress.played_seconds,
                        session.volume,
                        session.muted,
                        session.rate,
                        session.playing,
                    )
                })
            })
        };

        let Some((url, position, volume, muted, rate, playing)) = target else {
            return Ok(());
        };

        self.pipeline.load(url).await?;
        self.pipeline.set_volume(volume).await?;
        self.pipeline.set_muted(muted).await?;
        self.pipeline.set_rate(rate).await?;
        if position > 0.0 {
            self.pipeline.seek(position).await?;
        }

        state.media_pump = Some(::std::sync::Arc::clone(&self).spawn_media_pump(generation));

        if playing && state.ad.playback_permitted() {
            self.pipeline.play().await?;
            if state.mounted && state.playback_ticker.is_none() {
                state.playback_ticker =
                    Some(::std::sync::Arc::clone(&self).spawn_ticker(TickKind::Playback, generation));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Accept<WatchRequestModel> for WatchSurfaceInteractor {
    async fn accept(self: ::std::sync::Arc<Self>, request: WatchRequestModel) -> Fallible<()> {
        self.view.update(&SurfaceEvent::Loading { video_id: request.video_id.clone() }).await?;

        let video = match self.fetch_video(&request.video_id).await {
            Ok(video) => video,
            Err(error) if WatchError::is_not_found(&error) => {
                return self.view.update(&SurfaceEvent::ContentNotFound { video_id: request.video_id }).await;
            }
            Err(error) => {
                self.warn(format!("loading {} failed: {error:#}", request.video_id)).await?;
                return self.view.update(&SurfaceEvent::LoadFailed { video_id: request.video_id }).await;
            }
        };

        let mut state = self.state.lock().await;
        state.begin_load(video.clone());
        let generation = state.generation;

        {
            let mut sessions = self.sessions.lock().await;
            sessions.play_video(video.clone(), request.route.clone());
        }
        self.view.update(&SurfaceEvent::SessionReplaced { video_id: video.id.clone() }).await?;
        self.view.update(&SurfaceEvent::MiniplayerVisibility { visible: false }).await?;

        // History is telemetry. It must never gate playback, so it rides a
        // detached task and failures stop at a warning.
        {
            let history = ::std::sync::Arc::clone(&self.history);
            let viewer = self.viewer.id.clone();
            let video_id = video.id.clone();
            ::tokio::spawn(async move {
                if let Err(error) = history.record(&viewer, &video_id).await {
                    ::tracing::warn!(%error, "watch-history write failed");
                }
            });
        }

        // Issued together, resolved in whatever order; each result lands
        // independently of the other.
        let (channel, memberships) = ::tokio::join!(
            self.catalog.channel(&video.channel),
            self.catalog.memberships(&self.viewer.id),
        );
        match channel {
            Ok(channel) => self.view.update(&SurfaceEvent::ChannelLoaded { channel }).await?,
            Err(error) => self.warn(format!("channel fetch failed: {error:#}")).await?,
        }
        state.memberships = match memberships {
            Ok(memberships) => Some(memberships),
            Err(error) => {
                self.warn(format!("membership fetch failed: {error:#}")).await?;
                None
            }
        };

        ::std::sync::Arc::clone(&self).apply_availability(&mut state, generation).await
    }
}

#[async_trait]
impl Accept<Tick> for WatchSurfaceInteractor {
    async fn accept(self: ::std::sync::Arc<Self>, tick: Tick) -> Fallible<()> {
        let mut state = self.state.lock().await;
        if tick.generation != state.generation {
            return Ok(());
        }

        match tick.kind {
            TickKind::Premiere => {
                if matches!(state.availability, Some(Availability::LockedPremiere { .. })) {
                    ::std::sync::Arc::clone(&self).apply_availability(&mut state, tick.generation).await
                } else {
                    Ok(())
                }
            }

            TickKind::Ad => {
                if state.ad.tick(self.clock.monotonic_ms()) {
                    self.view.update(&SurfaceEvent::AdSkippable).await?;
                }
                Ok(())
            }

            TickKind::Playback => {
                // Re-check the precondition the ticker is scoped to.
                if !state.ad.playback_permitted() || !state.mounted {
                    return Ok(());
                }
                let progress = {
                    let sessions = self.sessions.lock().await;
                    match sessions.current() {
                        Some(session) if session.playing => session.progress,
                        _ => return Ok(()),
                    }
                };

                let now_ms = self.clock.monotonic_ms();
                if state.ui.controls_visible
                    && now_ms.saturating_sub(state.ui.last_pointer_ms) >= CONTROLS_IDLE_HIDE_MS
                {
                    state.ui.controls_visible = false;
                    self.view.update(&SurfaceEvent::ControlsVisibility { visible: false }).await?;
                }

                self.view.update(&SurfaceEvent::AmbientSample { played_seconds: progress.played_seconds }).await
            }
        }
    }
}

#[async_trait]
impl Accept<FromPipeline> for WatchSurfaceInteractor {
    async fn accept(self: ::std::sync::Arc<Self>, feed: FromPipeline) -> Fallible<()> {
        let mut state = self.state.lock().await;
        if feed.generation != state.generation {
            return Ok(());
        }

        match feed.event {
            MediaEvent::DurationKnown { seconds } => {
                ::tracing::debug!(seconds, "media element reported duration");
                Ok(())
            }

            MediaEvent::Progress { position_seconds, buffered_fraction } => {
                let duration = state.video.as_ref().map(|video| video.duration_seconds).unwrap_or(0.0);
                let progress = PlaybackProgress {
                    played_seconds: position_seconds,
                    played_fraction: if duration > 0.0 {
                        (position_seconds / duration).clamp(0.0, 1.0)
                    } else {
                        0.0
                    },
                    loaded_fraction: buffered_fraction.clamp(0.0, 1.0),
                };

                {
                    let mut sessions = self.sessions.lock().await;
                    sessions.set_progress(progress);
                }

                // While a scrub is in flight the handle belongs to the
                // human; the session keeps accruing progress silently.
                if state.ui.scrub_preview.is_none() {
                    self.view.update(&SurfaceEvent::ProgressUpdated { progress }).await?;
                }
                Ok(())
            }

            MediaEvent::EndOfStream => {
                state.availability = Some(Availability::Ended);
                state.playback_ticker = None;
                self.view
                    .update(&SurfaceEvent::AvailabilityChanged { availability: Availability::Ended })
                    .await?;

                let next = { self.queue.lock().await.take_next() };
                match next {
                    Some(video) => {
                        let route: Route = format!("/watch/{}", video.id).into();
                        self.view.update(&SurfaceEvent::AutoAdvanced { video_id: video.id.clone() }).await?;
                        self.navigator.navigate(route.clone()).await?;

                        // Full reload, off this handler: replacing the media
                        // pump must not cancel the load it started.
                        let interactor = ::std::sync::Arc::clone(&self);
                        ::tokio::spawn(async move {
                            let request = WatchRequestModel { video_id: video.id, route };
                            if let Err(error) = interactor.accept(request).await {
                                ::tracing::warn!(%error, "auto-advance load failed");
                            }
                        });
                        Ok(())
                    }
                    None => {
                        {
                            let mut sessions = self.sessions.lock().await;
                            sessions.set_playing(false);
                        }
                        self.pipeline.pause().await?;
                        self.view.update(&SurfaceEvent::PlaybackStopped).await
                    }
                }
            }

            MediaEvent::Failed { reason } => {
                self.warn(format!("media playback failed: {reason}")).await?;

                if !state.quality_fallback_used {
                    state.quality_fallback_used = true;

                    let fallback = {
                        let mut sessions = self.sessions.lock().await;
                        sessions.current_mut().and_then(|session| {
                            let current = session.quality?;
                            let rendition = session.video.next_lower_rendition(current)?;
                            let url = rendition.url.clone();
                            session.quality = Some(rendition.quality);
                            Some((url, session.progress.played_seconds, session.playing))
                        })
                    };

                    if let Some((url, position, playing)) = fallback {
                        self.pipeline.load(url).await?;
                        if position > 0.0 {
                            self.pipeline.seek(position).await?;
                        }
                        if playing && state.ad.playback_permitted() {
                            self.pipeline.play().await?;
                        }
                        return Ok(());
                    }
                }

                // Non-fatal: the inline error replaces the player body, the
                // rest of the page stays usable.
                {
                    let mut sessions = self.sessions.lock().await;
                    sessions.set_playing(false);
                }
                state.playback_ticker = None;
                self.view.update(&SurfaceEvent::InlinePlaybackError { message: reason }).await
            }
        }
    }
}

#[async_trait]
impl Accept<SurfaceCommand> for WatchSurfaceInteractor {
    async fn accept(self: ::std::sync::Arc<Self>, command: SurfaceCommand) -> Fallible<()> {
        let mut state = self.state.lock().await;
        let generation = state.generation;

        match command {
            SurfaceCommand::TogglePlay => {
                // The gate owns the element while an ad shows; content
                // intent cannot reach the pipeline. Locked content has no
                // element to drive at all.
                if state.ad.is_showing() {
                    return Ok(());
                }
                if !state.availability.map(Availability::is_playable).unwrap_or(false) {
                    return Ok(());
                }

                let playing = {
                    let mut sessions = self.sessions.lock().await;
                    let Some(session) = sessions.current_mut() else { return Ok(()) };
                    session.playing = !session.playing;
                    session.playing
                };

                if playing {
                    self.pipeline.play().await?;
                    if state.mounted && state.playback_ticker.is_none() {
                        state.playback_ticker =
                            Some(::std::sync::Arc::clone(&self).spawn_ticker(TickKind::Playback, generation));
                    }
                } else {
                    self.pipeline.pause().await?;
                    state.playback_ticker = None;
                    if !state.ui.controls_visible {
                        state.ui.controls_visible = true;
                        self.view.update(&SurfaceEvent::ControlsVisibility { visible: true }).await?;
                    }
                }
                Ok(())
            }

            SurfaceCommand::SeekStart => {
                let position = {
                    let sessions = self.sessions.lock().await;
                    sessions.current().map(|session| session.progress.played_seconds).unwrap_or(0.0)
                };
                state.ui.scrub_preview = Some(position);
                Ok(())
            }

            SurfaceCommand::SeekPreview { position_seconds } => {
                if state.ui.scrub_preview.is_some() {
                    state.ui.scrub_preview = Some(position_seconds);
                }
                Ok(())
            }

            SurfaceCommand::SeekCommit { position_seconds } => {
                state.ui.scrub_preview = None;

                let progress = {
                    let mut sessions = self.sessions.lock().await;
                    let Some(session) = sessions.current_mut() else { return Ok(()) };
                    let duration = session.video.duration_seconds;
                    session.progress.played_seconds = position_seconds;
                    session.progress.played_fraction = if duration > 0.0 {
                        (position_seconds / duration).clamp(0.0, 1.0)
                    } else {
                        0.0
                    };
                    session.progress
                };

                self.pipeline.seek(position_seconds).await?;
                self.view.update(&SurfaceEvent::ProgressUpdated { progress }).await
            }

            SurfaceCommand::SelectQuality { quality } => {
                let target = {
                    let mut sessions = self.sessions.lock().await;
                    let Some(session) = sessions.current_mut() else { return Ok(()) };
                    session.video.rendition(quality).map(|rendition| rendition.url.clone()).map(|url| {
                        session.quality = Some(quality);
                        (url, session.progress.played_seconds, session.playing)
                    })
                };

                let Some((url, position, playing)) = target else {
                    return self.warn(format!("no {quality} rendition for this video")).await;
                };

                state.quality_fallback_used = false;

                // Quality switches preserve the playhead.
                self.pipeline.load(url).await?;
                if position > 0.0 {
                    self.pipeline.seek(position).await?;
                }
                if playing && state.ad.playback_permitted() {
                    self.pipeline.play().await?;
                }
                Ok(())
            }

            SurfaceCommand::SetRate { rate } => {
                {
                    let mut sessions = self.sessions.lock().await;
                    let Some(session) = sessions.current_mut() else { return Ok(()) };
                    session.rate = rate;
                }
                self.pipeline.set_rate(rate).await
            }

            SurfaceCommand::SetVolume { volume } => {
                let volume = volume.clamp(0.0, 1.0);
                {
                    let mut sessions = self.sessions.lock().await;
                    let Some(session) = sessions.current_mut() else { return Ok(()) };
                    session.volume = volume;
                }
                self.pipeline.set_volume(volume).await
            }

            SurfaceCommand::ToggleMute => {
                let muted = {
                    let mut sessions = self.sessions.lock().await;
                    let Some(session) = sessions.current_mut() else { return Ok(()) };
                    session.muted = !session.muted;
                    session.muted
                };
                self.pipeline.set_muted(muted).await
            }

            SurfaceCommand::SkipAd => {
                // A click landing after eligibility but before the next
                // timer tick still counts.
                state.ad.tick(self.clock.monotonic_ms());

                if state.ad.skip() {
                    state.ad_ticker = None;
                    self.view.update(&SurfaceEvent::AdEnded).await?;
                    ::std::sync::Arc::clone(&self).start_content(&mut state, generation).await
                } else {
                    Ok(())
                }
            }

            SurfaceCommand::AdFinished => {
                if state.ad.end() {
                    state.ad_ticker = None;
                    self.view.update(&SurfaceEvent::AdEnded).await?;
                    ::std::sync::Arc::clone(&self).start_content(&mut state, generation).await
                } else {
                    Ok(())
                }
            }

            SurfaceCommand::ToggleTheatre => {
                state.ui.theatre = !state.ui.theatre;
                Ok(())
            }

            SurfaceCommand::ToggleFullscreen => {
                state.ui.fullscreen = !state.ui.fullscreen;
                Ok(())
            }

            SurfaceCommand::ToggleSettings => {
                state.ui.settings_open = !state.ui.settings_open;
                Ok(())
            }

            SurfaceCommand::PointerMoved => {
                state.ui.last_pointer_ms = self.clock.monotonic_ms();
                if !state.ui.controls_visible {
                    state.ui.controls_visible = true;
                    self.view.update(&SurfaceEvent::ControlsVisibility { visible: true }).await?;
                }
                Ok(())
            }

            SurfaceCommand::SelectTab { tab } => {
                if tab == TabMode::LiveChat && state.availability != Some(Availability::Live) {
                    ::tracing::debug!("live chat is only offered for live content");
                    return Ok(());
                }
                if state.ui.tab != tab {
                    state.ui.tab = tab;
                    self.view.update(&SurfaceEvent::TabChanged { tab }).await?;
                }
                Ok(())
            }

            SurfaceCommand::Enqueue { video } => {
                self.queue.lock().await.enqueue(video);
                Ok(())
            }

            SurfaceCommand::RemoveFromQueue { video_id } => {
                if !self.queue.lock().await.remove(&video_id) {
                    ::tracing::debug!(video = %video_id, "remove: not in queue");
                }
                Ok(())
            }

            SurfaceCommand::Reorder { videos } => {
                let result = { self.queue.lock().await.reorder(videos) };
                if let Err(error) = result {
                    self.warn(error.to_string()).await?;
                }
                Ok(())
            }

            SurfaceCommand::SeedUpNext => {
                let Some(video_id) = state.video.as_ref().map(|video| video.id.clone()) else {
                    return Ok(());
                };
                match self.catalog.up_next(&video_id).await {
                    Ok(videos) => {
                        let mut queue = self.queue.lock().await;
                        for video in videos {
                            queue.enqueue(video);
                        }
                        Ok(())
                    }
                    Err(error) => self.warn(format!("up-next pool unavailable: {error:#}")).await,
                }
            }

            SurfaceCommand::RouteChanged { route } => {
                let (visible, mounted) = {
                    let sessions = self.sessions.lock().await;
                    (
                        sessions.miniplayer_visible(&route),
                        sessions
                            .current()
                            .map(|session| session.origin_route == route)
                            .unwrap_or(false),
                    )
                };

                if state.mounted && !mounted {
                    // The page owning the video unmounted; per-frame work
                    // dies with it. The pipeline and its pump live on for
                    // the miniplayer.
                    state.playback_ticker = None;
                    state.ui.settings_open = false;
                    state.ui.scrub_preview = None;
                } else if !state.mounted && mounted {
                    let playing = {
                        let sessions = self.sessions.lock().await;
                        sessions.current().map(|session| session.playing).unwrap_or(false)
                    };
                    if playing && state.ad.playback_permitted() && state.playback_ticker.is_none() {
                        state.playback_ticker =
                            Some(::std::sync::Arc::clone(&self).spawn_ticker(TickKind::Playback, generation));
                    }
                }
                state.mounted = mounted;

                self.view.update(&SurfaceEvent::MiniplayerVisibility { visible }).await
            }

            SurfaceCommand::OpenMiniplayer => {
                let Some(route) = ({ self.sessions.lock().await.open_player() }) else {
                    return Ok(());
                };
                self.navigator.navigate(route.clone()).await?;

                drop(state);
                ::std::sync::Arc::clone(&self).accept(SurfaceCommand::RouteChanged { route }).await
            }

            SurfaceCommand::CloseMiniplayer => {
                let closed = { self.sessions.lock().await.close_player() };
                if closed.is_none() {
                    return Ok(());
                }

                self.pipeline.pause().await?;
                state.end_session();
                self.view.update(&SurfaceEvent::SessionClosed).await?;
                self.view.update(&SurfaceEvent::MiniplayerVisibility { visible: false }).await
            }
        }
    }
}
