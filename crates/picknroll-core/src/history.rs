use std::collections::VecDeque;

use crate::cache::ImageId;
use crate::error::{Result, ViewerError};

/// What is known about the image behind a history entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryStatus {
    /// Requested, load not finished yet.
    Pending,
    Loaded,
    Failed,
    /// The image has left the cache; the entry is kept as a record.
    Evicted,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub id: ImageId,
    pub name: String,
    pub path: String,
    pub status: HistoryStatus,
}

impl HistoryEntry {
    pub fn new(id: ImageId, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
            status: HistoryStatus::Pending,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status != HistoryStatus::Evicted
    }
}

/// Bounded log of shown images, newest first, with a navigation cursor.
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    cursor: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index of the entry being viewed. `0` is the newest.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Prepend `entry`, dropping the oldest one when full. Resets the cursor.
    pub fn add(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        let dropped = if self.entries.len() >= self.capacity {
            self.entries.pop_back()
        } else {
            None
        };
        self.entries.push_front(entry);
        self.cursor = 0;
        dropped
    }

    pub fn set_cursor(&mut self, index: usize) -> Result<&HistoryEntry> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get(index)
            .ok_or(ViewerError::HistoryIndexOutOfRange { index, len })?;
        self.cursor = index;
        Ok(entry)
    }

    /// Index one step older than the cursor, if any.
    pub fn older(&self) -> Option<usize> {
        let next = self.cursor + 1;
        (next < self.entries.len()).then_some(next)
    }

    /// Index one step newer than the cursor, if any.
    pub fn newer(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    /// Update every entry referencing `id`. Evicted entries stay evicted.
    pub fn mark(&mut self, id: ImageId, status: HistoryStatus) {
        for entry in self.entries.iter_mut().filter(|e| e.id == id) {
            if entry.status != HistoryStatus::Evicted {
                entry.status = status;
            }
        }
    }

    pub fn mark_evicted(&mut self, ids: &[ImageId]) {
        for entry in self.entries.iter_mut().filter(|e| ids.contains(&e.id)) {
            entry.status = HistoryStatus::Evicted;
        }
    }
}
