use ::domain::Video;
use ::domain::VideoId;

use crate::errors::WatchError;

/// Viewer-ordered list of upcoming videos. Its only implicit tie to the
/// session is `take_next` on auto-advance; every other mutation is a user
/// action.
#[derive(Debug, Default)]
pub struct PlayQueue {
    entries: ::std::collections::VecDeque<Video>,
}

impl PlayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends. Duplicate ids are allowed; `take_next` always removes from
    /// the front.
    pub fn enqueue(&mut self, video: Video) {
        self.entries.push_back(video);
    }

    /// Removes the first entry with this id. Returns whether anything left.
    pub fn remove(&mut self, id: &VideoId) -> bool {
        match self.entries.iter().position(|entry| entry.id == *id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replaces the whole sequence, atomically. Rejected without applying
    /// anything unless the supplied ids are exactly the current membership
    /// as a multiset, which is the contract behind drag-to-reorder.
    pub fn reorder(&mut self, videos: Vec<Video>) -> Result<(), WatchError> {
        let mut current: Vec<&VideoId> = self.entries.iter().map(|entry| &entry.id).collect();
        let mut proposed: Vec<&VideoId> = videos.iter().map(|entry| &entry.id).collect();
        current.sort();
        proposed.sort();

        if current != proposed {
            return Err(WatchError::QueueReorderMismatch);
        }

        self.entries = videos.into();
        Ok(())
    }

    pub fn take_next(&mut self) -> Option<Video> {
        self.entries.pop_front()
    }

    pub fn ids(&self) -> Vec<VideoId> {
        self.entries.iter().map(|entry| entry.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
