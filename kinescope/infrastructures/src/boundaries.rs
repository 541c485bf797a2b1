use ::async_trait::async_trait;
use ::use_cases::availability::Availability;
use ::use_cases::boundaries::Update;
use ::use_cases::models::events::DiagnosticEvent;
use ::use_cases::models::events::DiagnosticLevel;
use ::use_cases::models::events::SurfaceEvent;

use crate::utils::aliases::Fallible;
use crate::utils::progress_style;

/// Terminal rendering of a watch session: one playback bar plus scrolling
/// lines for everything that is not continuous progress.
pub struct ConsoleWatchView {
    progress_bars: ::indicatif::MultiProgress,
    playback_bar: ::indicatif::ProgressBar,

    terminal: ::std::sync::atomic::AtomicBool,
    ad_showing: ::std::sync::atomic::AtomicBool,
    ad_skippable: ::std::sync::atomic::AtomicBool,
    ad_duration_ms: ::std::sync::atomic::AtomicU64,
}

impl ConsoleWatchView {
    pub fn new() -> Self {
        static PLAYBACK_BAR_STYLE: ::once_cell::sync::Lazy<::indicatif::ProgressStyle> =
            progress_style!("{prefix} {bar:50} {msg}");

        let progress_bars = ::indicatif::MultiProgress::new();
        let playback_bar =
            progress_bars.add(::indicatif::ProgressBar::new(100).with_style(PLAYBACK_BAR_STYLE.clone()));

        playback_bar.set_prefix("--:--");
        playback_bar.set_message("idle");

        Self {
            progress_bars,
            playback_bar,
            terminal: ::std::sync::atomic::AtomicBool::new(false),
            ad_showing: ::std::sync::atomic::AtomicBool::new(false),
            ad_skippable: ::std::sync::atomic::AtomicBool::new(false),
            ad_duration_ms: ::std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// True once the session reached a state the demo loop cannot leave.
    pub fn is_terminal(&self) -> bool {
        self.terminal.load(::std::sync::atomic::Ordering::Relaxed)
    }

    pub fn ad_showing(&self) -> bool {
        self.ad_showing.load(::std::sync::atomic::Ordering::Relaxed)
    }

    pub fn ad_skippable(&self) -> bool {
        self.ad_skippable.load(::std::sync::atomic::Ordering::Relaxed)
    }

    pub fn ad_duration_ms(&self) -> u64 {
        self.ad_duration_ms.load(::std::sync::atomic::Ordering::Relaxed)
    }

    fn println(&self, line: impl AsRef<str>) {
        let _ = self.progress_bars.println(line);
    }

    fn mark_terminal(&self) {
        self.terminal.store(true, ::std::sync::atomic::Ordering::Relaxed);
    }
}

impl Default for ConsoleWatchView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Update<SurfaceEvent> for ConsoleWatchView {
    async fn update(&self, event: &SurfaceEvent) -> Fallible<()> {
        use ::colored::Colorize as _;
        use ::std::sync::atomic::Ordering;

        match event {
            SurfaceEvent::Loading { video_id } => {
                self.playback_bar.set_message(format!("loading {video_id}"));
            }
            SurfaceEvent::ContentNotFound { video_id } => {
                self.println(format!("content not found: {video_id}").red().to_string());
                self.mark_terminal();
            }
            SurfaceEvent::LoadFailed { video_id } => {
                self.println(format!("failed to load {video_id}").red().to_string());
                self.mark_terminal();
            }

            SurfaceEvent::SessionReplaced { video_id } => {
                self.playback_bar.set_position(0);
                self.playback_bar.set_message(format!("now playing {video_id}"));
            }
            SurfaceEvent::SessionClosed => {
                self.playback_bar.finish_with_message("closed");
                self.mark_terminal();
            }
            SurfaceEvent::MiniplayerVisibility { visible } => {
                self.println(if *visible { "miniplayer on" } else { "miniplayer off" });
            }
            SurfaceEvent::ChannelLoaded { channel } => {
                self.println(format!("{} ({})", channel.metadata.title, channel.metadata.handle));
            }

            SurfaceEvent::AvailabilityChanged { availability } => match availability {
                Availability::LockedPremiere { remaining_seconds } => {
                    self.playback_bar.set_message(format!("premieres in {remaining_seconds}s"));
                }
                Availability::LockedMembership => {
                    self.println("members only: join the channel to watch".yellow().to_string());
                    self.mark_terminal();
                }
                Availability::Live => self.println("live now".green().to_string()),
                Availability::Vod => {}
                Availability::Ended => self.playback_bar.set_message("ended"),
            },
            SurfaceEvent::PremiereCountdown { remaining_seconds } => {
                self.playback_bar.set_message(format!("premieres in {remaining_seconds}s"));
            }

            SurfaceEvent::AdStarted { creative } => {
                self.ad_showing.store(true, Ordering::Relaxed);
                self.ad_skippable.store(false, Ordering::Relaxed);
                self.ad_duration_ms
                    .store((creative.duration_seconds * 1_000.0) as u64, Ordering::Relaxed);
                self.println(format!("ad: {}", creative.id).yellow().to_string());
            }
            SurfaceEvent::AdSkippable => {
                self.ad_skippable.store(true, Ordering::Relaxed);
                self.println("ad can be skipped".yellow().to_string());
            }
            SurfaceEvent::AdEnded => {
                self.ad_showing.store(false, Ordering::Relaxed);
                self.ad_skippable.store(false, Ordering::Relaxed);
                self.println("ad ended");
            }

            SurfaceEvent::ProgressUpdated { progress } => {
                let minutes = (progress.played_seconds / 60.0) as u64;
                let seconds = (progress.played_seconds % 60.0) as u64;
                self.playback_bar.set_prefix(format!("{minutes:02}:{seconds:02}"));
                self.playback_bar.set_position((progress.played_fraction * 100.0) as u64);
                self.playback_bar.set_message(format!("{:.0}% buffered", progress.loaded_fraction * 100.0));
            }
            SurfaceEvent::ControlsVisibility { .. } | SurfaceEvent::AmbientSample { .. } => {}
            SurfaceEvent::TabChanged { tab } => self.println(format!("tab: {tab:?}")),

            SurfaceEvent::InlinePlaybackError { message } => {
                self.println(format!("playback error: {message}").red().to_string());
                self.mark_terminal();
            }
            SurfaceEvent::AutoAdvanced { video_id } => {
                self.println(format!("up next: {video_id}").green().to_string());
            }
            SurfaceEvent::PlaybackStopped => {
                self.playback_bar.finish_with_message("done");
                self.mark_terminal();
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Update<DiagnosticEvent> for ConsoleWatchView {
    async fn update(&self, event: &DiagnosticEvent) -> Fallible<()> {
        use ::colored::Colorize as _;

        let message = match event.level {
            DiagnosticLevel::Warning => event.message.yellow(),
            DiagnosticLevel::Error => event.message.red(),
        };

        static DECOY_PROGRESS_BAR_STYLE: ::once_cell::sync::Lazy<::indicatif::ProgressStyle> =
            progress_style!("{msg}");

        let decoy_progress_bar = self
            .progress_bars
            .add(::indicatif::ProgressBar::no_length().with_style(DECOY_PROGRESS_BAR_STYLE.clone()));

        decoy_progress_bar.finish_with_message(message.to_string());

        Ok(())
    }
}

/// Accumulates every event for later assertions. Test support.
#[derive(Default)]
pub struct RecordingView {
    surface_events: ::std::sync::Mutex<Vec<SurfaceEvent>>,
    diagnostics: ::std::sync::Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface_events(&self) -> Vec<SurfaceEvent> {
        self.surface_events.lock().unwrap().clone()
    }

    pub fn diagnostics(&self) -> Vec<DiagnosticEvent> {
        self.diagnostics.lock().unwrap().clone()
    }

    pub fn contains(&self, event: &SurfaceEvent) -> bool {
        self.surface_events.lock().unwrap().iter().any(|seen| seen == event)
    }
}

#[async_trait]
impl Update<SurfaceEvent> for RecordingView {
    async fn update(&self, event: &SurfaceEvent) -> Fallible<()> {
        self.surface_events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

#[async_trait]
impl Update<DiagnosticEvent> for RecordingView {
    async fn update(&self, event: &DiagnosticEvent) -> Fallible<()> {
        self.diagnostics.lock().unwrap().push(event.clone());
        Ok(())
    }
}
