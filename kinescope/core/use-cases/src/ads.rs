use ::domain::AdCreative;

/// Skip eligibility opens this many milliseconds after the ad starts.
pub const SKIP_ELIGIBLE_AFTER_MS: u64 = 5_000;

/// Pre-roll gate. While it is showing, real playback is not permitted; the
/// watch surface enforces that at every pipeline call site rather than
/// trusting the gate to pause anything itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdGate {
    #[default]
    Hidden,
    Showing {
        creative: AdCreative,
        skippable: bool,
        started_at_ms: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdDecision {
    /// No ad: entitled viewer, no candidate, or fail-open on ad trouble.
    Permitted,
    Interposed { creative: AdCreative },
}

impl AdGate {
    /// At most one ad per video load: a `begin` while already showing is
    /// ignored and reports the creative already on screen, without
    /// resetting the skip timer.
    pub fn begin(&mut self, entitled: bool, candidates: &[AdCreative], now_ms: u64) -> AdDecision {
        if let AdGate::Showing { creative, .. } = self {
            return AdDecision::Interposed { creative: creative.clone() };
        }

        if entitled {
            return AdDecision::Permitted;
        }

        // First candidate wins; ranking is not this gate's business.
        // An empty list fails open: content availability outranks ad delivery.
        let Some(creative) = candidates.first().cloned() else {
            return AdDecision::Permitted;
        };

        *self = AdGate::Showing { creative: creative.clone(), skippable: false, started_at_ms: now_ms };

        AdDecision::Interposed { creative }
    }

    /// Pure transition: flips `skippable` once the eligibility window has
    /// elapsed. Returns true on the tick where eligibility opens.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let AdGate::Showing { skippable, started_at_ms, .. } = self else {
            return false;
        };

        if *skippable || now_ms.saturating_sub(*started_at_ms) < SKIP_ELIGIBLE_AFTER_MS {
            return false;
        }

        *skippable = true;
        true
    }

    /// No-op unless skip eligibility has opened. Returns true if the gate hid.
    pub fn skip(&mut self) -> bool {
        match self {
            AdGate::Showing { skippable: true, .. } => {
                *self = AdGate::Hidden;
                true
            }
            _ => false,
        }
    }

    /// The ad media ran out (or failed): equivalent to a skip regardless of
    /// eligibility.
    pub fn end(&mut self) -> bool {
        match self {
            AdGate::Showing { .. } => {
                *self = AdGate::Hidden;
                true
            }
            AdGate::Hidden => false,
        }
    }

    pub fn playback_permitted(&self) -> bool {
        matches!(self, AdGate::Hidden)
    }

    pub fn is_showing(&self) -> bool {
        !self.playback_permitted()
    }
}
