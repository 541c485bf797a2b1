use ::async_trait::async_trait;
use ::use_cases::gateways::MediaPipeline;
use ::use_cases::models::events::MediaEvent;

use crate::utils::aliases::BoxedStream;
use crate::utils::aliases::Fallible;
use crate::utils::aliases::MaybeOwnedString;

/// Every command the simulated element has been asked to perform, in order.
/// Assertions about gating ("no `Play` while the ad shows") read this log.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineCommand {
    Load(MaybeOwnedString),
    Play,
    Pause,
    Seek(f64),
    Volume(f64),
    Muted(bool),
    Rate(f64),
}

#[derive(Debug, Default)]
struct ElementState {
    url: Option<MaybeOwnedString>,
    position_seconds: f64,
    duration_seconds: f64,
    rate: f64,
    playing: bool,
    ended: bool,
}

/// Stand-in for the browser media element: holds position and play state,
/// and moves only when the owner calls [`SimulatedPipeline::advance`].
pub struct SimulatedPipeline {
    state: ::std::sync::Mutex<ElementState>,
    events: ::tokio::sync::broadcast::Sender<MediaEvent>,

    commands: ::std::sync::Mutex<Vec<PipelineCommand>>,
    failing_urls: ::std::collections::HashSet<MaybeOwnedString>,
    durations: ::std::collections::HashMap<MaybeOwnedString, f64>,
    default_duration_seconds: f64,
}

impl SimulatedPipeline {
    pub fn new() -> Self {
        let (events, _) = ::tokio::sync::broadcast::channel(256);

        Self {
            state: ::std::sync::Mutex::new(ElementState { rate: 1.0, ..ElementState::default() }),
            events,
            commands: ::std::sync::Mutex::new(Vec::new()),
            failing_urls: ::std::collections::HashSet::new(),
            durations: ::std::collections::HashMap::new(),
            default_duration_seconds: 120.0,
        }
    }

    pub fn with_duration(mut self, url: MaybeOwnedString, duration_seconds: f64) -> Self {
        self.durations.insert(url, duration_seconds);
        self
    }

    /// Marks a source as undecodable: the next `advance` after loading it
    /// reports failure instead of progress.
    pub fn with_failing_url(mut self, url: MaybeOwnedString) -> Self {
        self.failing_urls.insert(url);
        self
    }

    pub fn commands(&self) -> Vec<PipelineCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn current_url(&self) -> Option<MaybeOwnedString> {
        self.state.lock().unwrap().url.clone()
    }

    fn record(&self, command: PipelineCommand) {
        self.commands.lock().unwrap().push(command);
    }

    fn emit(&self, event: MediaEvent) {
        // Nobody listening is fine; the pump subscribes per load.
        let _ = self.events.send(event);
    }

    /// Moves simulated time forward. Emits `Progress` while playing, a
    /// single `EndOfStream` at the end of the media, or `Failed` when the
    /// loaded source is marked undecodable.
    pub fn advance(&self, seconds: f64) {
        let event = {
            let mut state = self.state.lock().unwrap();

            let Some(url) = state.url.clone() else { return };

            if self.failing_urls.contains(&url) {
                state.playing = false;
                Some(MediaEvent::Failed { reason: format!("undecodable source: {url}").into() })
            } else if state.playing && !state.ended {
                state.position_seconds =
                    (state.position_seconds + seconds * state.rate).min(state.duration_seconds);

                if state.position_seconds >= state.duration_seconds {
                    state.playing = false;
                    state.ended = true;
                    Some(MediaEvent::EndOfStream)
                } else {
                    let buffered = ((state.position_seconds + 10.0) / state.duration_seconds).clamp(0.0, 1.0);
                    Some(MediaEvent::Progress {
                        position_seconds: state.position_seconds,
                        buffered_fraction: buffered,
                    })
                }
            } else {
                None
            }
        };

        if let Some(event) = event {
            self.emit(event);
        }
    }
}

impl Default for SimulatedPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaPipeline for SimulatedPipeline {
    async fn load(&self, url: MaybeOwnedString) -> Fallible<()> {
        self.record(PipelineCommand::Load(url.clone()));

        let duration = self.durations.get(&url).copied().unwrap_or(self.default_duration_seconds);

        {
            let mut state = self.state.lock().unwrap();
            state.url = Some(url);
            state.position_seconds = 0.0;
            state.duration_seconds = duration;
            state.playing = false;
            state.ended = false;
        }

        self.emit(MediaEvent::DurationKnown { seconds: duration });
        Ok(())
    }

    async fn play(&self) -> Fallible<()> {
        self.record(PipelineCommand::Play);
        self.state.lock().unwrap().playing = true;
        Ok(())
    }

    async fn pause(&self) -> Fallible<()> {
        self.record(PipelineCommand::Pause);
        self.state.lock().unwrap().playing = false;
        Ok(())
    }

    async fn seek(&self, position_seconds: f64) -> Fallible<()> {
        self.record(PipelineCommand::Seek(position_seconds));

        let mut state = self.state.lock().unwrap();
        state.position_seconds = position_seconds.clamp(0.0, state.duration_seconds);
        state.ended = false;
        Ok(())
    }

    async fn set_volume(&self, volume: f64) -> Fallible<()> {
        self.record(PipelineCommand::Volume(volume));
        Ok(())
    }

    async fn set_muted(&self, muted: bool) -> Fallible<()> {
        self.record(PipelineCommand::Muted(muted));
        Ok(())
    }

    async fn set_rate(&self, rate: f64) -> Fallible<()> {
        self.record(PipelineCommand::Rate(rate));
        self.state.lock().unwrap().rate = rate;
        Ok(())
    }

    async fn events(&self) -> Fallible<BoxedStream<MediaEvent>> {
        let mut receiver = self.events.subscribe();

        let stream = ::async_stream::stream! {
            loop {
                match receiver.recv().await {
                    Ok(event) => yield event,
                    Err(::tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        ::tracing::warn!(skipped, "media event stream lagged");
                        continue;
                    }
                    Err(::tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        };

        Ok(::std::boxed::Box::pin(stream))
    }
}
