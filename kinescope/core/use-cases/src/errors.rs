use crate::utils::aliases::MaybeOwnedString;

/// Failure taxonomy of the watch flow. Only read-side metadata failures may
/// change the surface's top-level state; everything else degrades in place.
#[derive(Debug, ::thiserror::Error)]
pub enum WatchError {
    #[error("content not found: {id}")]
    NotFound { id: MaybeOwnedString },

    #[error("transient fetch failure: {context}")]
    TransientFetch { context: MaybeOwnedString },

    #[error("media pipeline failure: {reason}")]
    MediaPlayback { reason: MaybeOwnedString },

    #[error("advertisement failed to load: {reason}")]
    AdLoad { reason: MaybeOwnedString },

    #[error("reorder does not match current queue membership")]
    QueueReorderMismatch,
}

impl WatchError {
    pub fn is_not_found(error: &::anyhow::Error) -> bool {
        matches!(error.downcast_ref::<WatchError>(), Some(WatchError::NotFound { .. }))
    }

    pub fn is_transient(error: &::anyhow::Error) -> bool {
        matches!(error.downcast_ref::<WatchError>(), Some(WatchError::TransientFetch { .. }))
    }
}
