pub mod events {
    use ::domain::AdCreative;
    use ::domain::Channel;
    use ::domain::PlaybackProgress;
    use ::domain::VideoId;

    use crate::availability::Availability;
    use crate::models::descriptors::TabMode;
    use crate::utils::aliases::MaybeOwnedString;

    /// Everything the underlying media element reports back.
    #[derive(Debug, Clone, PartialEq)]
    pub enum MediaEvent {
        DurationKnown { seconds: f64 },
        Progress { position_seconds: f64, buffered_fraction: f64 },
        EndOfStream,
        Failed { reason: MaybeOwnedString },
    }

    /// Everything the watch surface reports to its view.
    #[derive(Debug, Clone, PartialEq)]
    pub enum SurfaceEvent {
        Loading { video_id: VideoId },
        ContentNotFound { video_id: VideoId },
        LoadFailed { video_id: VideoId },

        SessionReplaced { video_id: VideoId },
        SessionClosed,
        MiniplayerVisibility { visible: bool },
        ChannelLoaded { channel: Channel },

        AvailabilityChanged { availability: Availability },
        PremiereCountdown { remaining_seconds: u64 },

        AdStarted { creative: AdCreative },
        AdSkippable,
        AdEnded,

        ProgressUpdated { progress: PlaybackProgress },
        ControlsVisibility { visible: bool },
        AmbientSample { played_seconds: f64 },
        TabChanged { tab: TabMode },

        InlinePlaybackError { message: MaybeOwnedString },
        AutoAdvanced { video_id: VideoId },
        PlaybackStopped,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct DiagnosticEvent {
        pub level: DiagnosticLevel,
        pub message: MaybeOwnedString,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum DiagnosticLevel {
        Warning,
        Error,
    }
}

pub mod descriptors {
    /// Side-panel modes of the watch surface. Live chat is only offered
    /// while the content is live.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum TabMode {
        #[default]
        UpNext,
        Transcript,
        LiveChat,
    }

    /// Who initiated a seek. Human scrubs suppress progress feedback until
    /// committed; programmatic seeks do not.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SeekSource {
        Human,
        Programmatic,
    }
}
