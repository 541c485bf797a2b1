pub(crate) mod utils;

pub use crate::utils::aliases::MaybeOwnedString;
pub use crate::utils::aliases::MaybeOwnedVec;

#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: VideoId,
    pub channel: ChannelId,

    pub metadata: VideoMetadata,

    /// Quality ladder, highest rung first.
    pub renditions: MaybeOwnedVec<Rendition>,
    pub duration_seconds: f64,

    pub is_live: bool,
    pub visibility: Visibility,
    pub premiere_time: Option<Timestamp>,
}

pub type VideoId = MaybeOwnedString;

impl Video {
    pub fn rendition(&self, quality: Quality) -> Option<&Rendition> {
        self.renditions.iter().find(|rendition| rendition.quality == quality)
    }

    pub fn highest_quality(&self) -> Option<Quality> {
        self.renditions.first().map(|rendition| rendition.quality)
    }

    /// A rendition strictly below `quality`, walking the ladder down.
    pub fn next_lower_rendition(&self, quality: Quality) -> Option<&Rendition> {
        let mut rung = quality.next_lower();

        while let Some(candidate) = rung {
            if let Some(rendition) = self.rendition(candidate) {
                return Some(rendition);
            }
            rung = candidate.next_lower();
        }

        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub title: MaybeOwnedString,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rendition {
    pub quality: Quality,
    pub url: MaybeOwnedString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quality {
    Q144,
    Q240,
    Q360,
    Q480,
    Q720,
    Q1080,
    Q1440,
    Q2160,
}

impl Quality {
    pub fn next_lower(self) -> Option<Quality> {
        match self {
            Quality::Q2160 => Some(Quality::Q1440),
            Quality::Q1440 => Some(Quality::Q1080),
            Quality::Q1080 => Some(Quality::Q720),
            Quality::Q720 => Some(Quality::Q480),
            Quality::Q480 => Some(Quality::Q360),
            Quality::Q360 => Some(Quality::Q240),
            Quality::Q240 => Some(Quality::Q144),
            Quality::Q144 => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quality::Q2160 => "2160p",
            Quality::Q1440 => "1440p",
            Quality::Q1080 => "1080p",
            Quality::Q720 => "720p",
            Quality::Q480 => "480p",
            Quality::Q360 => "360p",
            Quality::Q240 => "240p",
            Quality::Q144 => "144p",
        }
    }
}

impl ::std::fmt::Display for Quality {
    fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        formatter.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    MembersOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub id: ChannelId,

    pub metadata: ChannelMetadata,
}

pub type ChannelId = MaybeOwnedString;

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMetadata {
    pub title: MaybeOwnedString,
    pub handle: MaybeOwnedString,
}

#[derive(Debug, Clone)]
pub struct Viewer {
    pub id: ViewerId,

    pub is_premium: bool,
}

pub type ViewerId = MaybeOwnedString;

#[derive(Debug, Clone, PartialEq)]
pub struct AdCreative {
    pub id: AdCreativeId,
    pub url: MaybeOwnedString,

    pub duration_seconds: f64,
}

pub type AdCreativeId = MaybeOwnedString;

pub type Route = MaybeOwnedString;

pub type Timestamp = ::std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackProgress {
    pub played_fraction: f64,
    pub played_seconds: f64,
    pub loaded_fraction: f64,
}
