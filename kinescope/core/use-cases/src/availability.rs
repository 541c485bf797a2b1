use ::domain::ChannelId;
use ::domain::Timestamp;
use ::domain::Video;
use ::domain::Visibility;

/// Whether a video is watchable right now. Derived, never stored: the
/// surface recomputes it on every relevant tick while a lock holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Premiere scheduled and not reached. Carries whole seconds left for
    /// the countdown view, never less than 1 while locked.
    LockedPremiere { remaining_seconds: u64 },
    LockedMembership,
    Live,
    Vod,
    /// Entered only when the media element reports end-of-stream;
    /// immediately consumed by the auto-advance decision.
    Ended,
}

impl Availability {
    /// Lock precedence: an unreached premiere must never reveal
    /// members-only state, and a membership lock must precede the
    /// live/on-demand split. An absent membership set (fetch failed)
    /// locks members-only content: access control fails closed.
    pub fn evaluate(
        video: &Video, now: Timestamp, memberships: Option<&::std::collections::HashSet<ChannelId>>,
    ) -> Self {
        if let Some(premiere_time) = video.premiere_time {
            if let Ok(remaining) = premiere_time.duration_since(now) {
                if !remaining.is_zero() {
                    let mut remaining_seconds = remaining.as_secs();
                    if remaining.subsec_nanos() > 0 {
                        remaining_seconds += 1;
                    }
                    return Availability::LockedPremiere { remaining_seconds };
                }
            }
        }

        if video.visibility == Visibility::MembersOnly {
            match memberships {
                Some(memberships) if memberships.contains(&video.channel) => {}
                _ => return Availability::LockedMembership,
            }
        }

        if video.is_live {
            Availability::Live
        } else {
            Availability::Vod
        }
    }

    pub fn is_locked(self) -> bool {
        matches!(self, Availability::LockedPremiere { .. } | Availability::LockedMembership)
    }

    pub fn is_playable(self) -> bool {
        matches!(self, Availability::Live | Availability::Vod)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::domain::Quality;
    use ::domain::Rendition;
    use ::domain::VideoMetadata;
    use ::std::collections::HashSet;
    use ::std::time::Duration;
    use ::std::time::UNIX_EPOCH;

    fn video() -> Video {
        Video {
            id: "v1".into(),
            channel: "c1".into(),
            metadata: VideoMetadata { title: "a video".into() },
            renditions: vec![Rendition { quality: Quality::Q720, url: "u".into() }].into(),
            duration_seconds: 120.0,
            is_live: false,
            visibility: Visibility::Public,
            premiere_time: None,
        }
    }

    fn at(seconds: u64) -> Timestamp {
        UNIX_EPOCH + Duration::from_secs(seconds)
    }

    #[test]
    fn public_vod_is_vod() {
        assert_eq!(Availability::evaluate(&video(), at(100), Some(&HashSet::new())), Availability::Vod);
    }

    #[test]
    fn future_premiere_locks_regardless_of_membership_and_live() {
        let mut video = video();
        video.premiere_time = Some(at(200));
        video.is_live = true;
        video.visibility = Visibility::MembersOnly;

        let memberships: HashSet<_> = [video.channel.clone()].into();

        assert_eq!(
            Availability::evaluate(&video, at(100), Some(&memberships)),
            Availability::LockedPremiere { remaining_seconds: 100 },
        );
    }

    #[test]
    fn premiere_countdown_rounds_subsecond_remainders_up() {
        let mut video = video();
        video.premiere_time = Some(at(200));

        let now = at(199) - Duration::from_millis(500);
        assert_eq!(
            Availability::evaluate(&video, now, Some(&HashSet::new())),
            Availability::LockedPremiere { remaining_seconds: 2 },
        );
    }

    #[test]
    fn reached_premiere_unlocks_on_the_next_evaluation() {
        let mut video = video();
        video.premiere_time = Some(at(200));

        assert_eq!(Availability::evaluate(&video, at(200), Some(&HashSet::new())), Availability::Vod);
        assert_eq!(Availability::evaluate(&video, at(201), Some(&HashSet::new())), Availability::Vod);
    }

    #[test]
    fn membership_lock_precedes_live() {
        let mut video = video();
        video.visibility = Visibility::MembersOnly;
        video.is_live = true;

        assert_eq!(
            Availability::evaluate(&video, at(100), Some(&HashSet::new())),
            Availability::LockedMembership,
        );
    }

    #[test]
    fn membership_unlocks_with_owning_channel() {
        let mut video = video();
        video.visibility = Visibility::MembersOnly;

        let memberships: HashSet<_> = [video.channel.clone()].into();
        assert_eq!(Availability::evaluate(&video, at(100), Some(&memberships)), Availability::Vod);
    }

    #[test]
    fn missing_membership_set_fails_closed() {
        let mut video = video();
        video.visibility = Visibility::MembersOnly;

        assert_eq!(Availability::evaluate(&video, at(100), None), Availability::LockedMembership);
    }

    #[test]
    fn missing_membership_set_does_not_lock_public_content() {
        assert_eq!(Availability::evaluate(&video(), at(100), None), Availability::Vod);
    }

    #[test]
    fn live_flag_yields_live_once_unlocked() {
        let mut video = video();
        video.is_live = true;

        assert_eq!(Availability::evaluate(&video, at(100), None), Availability::Live);
    }
}
