//! Bounded cache of loaded images.
//!
//! Entries are keyed by [`ImageId`], which only ever grows, so the smallest key
//! is always the oldest load. Each entry walks `Loading -> Ready | Failed`
//! exactly once; waiters observe the transition through a `watch` channel that
//! closes when the entry is evicted.

use std::collections::BTreeMap;
use std::fmt;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{Result, ViewerError};
use crate::host::{Dimensions, FileHandle, ImageHost, ImageResource};

/// Identifier assigned when a load starts. Never reused within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(u64);

impl ImageId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse lifecycle stage, broadcast to waiters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
    Failed,
}

pub enum LoadState<R> {
    Loading,
    Ready { resource: R, dimensions: Dimensions },
    Failed { reason: String },
}

impl<R> LoadState<R> {
    pub fn phase(&self) -> LoadPhase {
        match self {
            LoadState::Loading => LoadPhase::Loading,
            LoadState::Ready { .. } => LoadPhase::Ready,
            LoadState::Failed { .. } => LoadPhase::Failed,
        }
    }
}

/// One load attempt, owned by the cache.
pub struct LoadedImage<R> {
    pub id: ImageId,
    pub name: String,
    pub path: String,
    pub state: LoadState<R>,
}

impl<R> LoadedImage<R> {
    pub fn phase(&self) -> LoadPhase {
        self.state.phase()
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        match self.state {
            LoadState::Ready { dimensions, .. } => Some(dimensions),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

struct CacheEntry<R> {
    image: LoadedImage<R>,
    phase_tx: watch::Sender<LoadPhase>,
}

impl<R: ImageResource> CacheEntry<R> {
    fn release(self) {
        if let LoadState::Ready { mut resource, .. } = self.image.state {
            resource.release();
        }
    }
}

pub struct ImageCache<R: ImageResource> {
    entries: BTreeMap<ImageId, CacheEntry<R>>,
    capacity: usize,
}

impl<R: ImageResource> ImageCache<R> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Resident ids, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = ImageId> + '_ {
        self.entries.keys().copied()
    }

    pub fn get(&self, id: ImageId) -> Option<&LoadedImage<R>> {
        self.entries.get(&id).map(|e| &e.image)
    }

    pub fn phase(&self, id: ImageId) -> Option<LoadPhase> {
        self.get(id).map(LoadedImage::phase)
    }

    /// Watch the lifecycle of `id`. The channel closes if the entry is evicted.
    pub fn subscribe(&self, id: ImageId) -> Option<watch::Receiver<LoadPhase>> {
        self.entries.get(&id).map(|e| e.phase_tx.subscribe())
    }

    /// Run `f` against the resource of a ready entry.
    pub fn with_resource<T>(&self, id: ImageId, f: impl FnOnce(&R) -> T) -> Option<T> {
        match &self.get(id)?.state {
            LoadState::Ready { resource, .. } => Some(f(resource)),
            _ => None,
        }
    }

    /// Make room for one more entry by evicting the oldest ids.
    ///
    /// Evicts while `len >= capacity`, skipping `protect` (the image on
    /// screen). Returns the evicted ids, oldest first.
    pub fn evict_for_insert(&mut self, protect: Option<ImageId>) -> Vec<ImageId> {
        let mut evicted = Vec::new();
        while self.entries.len() >= self.capacity {
            let victim = self.entries.keys().copied().find(|id| Some(*id) != protect);
            let Some(victim) = victim else {
                break;
            };
            if self.remove(victim) {
                evicted.push(victim);
            }
        }
        if !evicted.is_empty() {
            debug!(evicted = ?evicted, resident = self.entries.len(), "Evicted oldest images");
        }
        evicted
    }

    /// Register a new load in the `Loading` state.
    pub fn insert_loading(
        &mut self,
        id: ImageId,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> watch::Receiver<LoadPhase> {
        let (phase_tx, phase_rx) = watch::channel(LoadPhase::Loading);
        let image = LoadedImage {
            id,
            name: name.into(),
            path: path.into(),
            state: LoadState::Loading,
        };
        if let Some(previous) = self.entries.insert(id, CacheEntry { image, phase_tx }) {
            warn!(%id, "Replaced an existing cache entry");
            previous.release();
        }
        phase_rx
    }

    /// Record the outcome of the load pipeline for `id`.
    ///
    /// Returns `false` when the entry no longer exists or has already settled;
    /// a resource delivered in that case is released immediately.
    pub fn complete(&mut self, id: ImageId, result: Result<(R, Dimensions)>) -> bool {
        let Some(entry) = self
            .entries
            .get_mut(&id)
            .filter(|e| e.image.phase() == LoadPhase::Loading)
        else {
            if let Ok((mut resource, _)) = result {
                debug!(%id, "Load finished after eviction, releasing resource");
                resource.release();
            }
            return false;
        };

        entry.image.state = match result {
            Ok((resource, dimensions)) => {
                debug!(%id, %dimensions, "Image ready");
                LoadState::Ready {
                    resource,
                    dimensions,
                }
            }
            Err(e) => {
                warn!(%id, path = %entry.image.path, error = %e, "Image load failed");
                LoadState::Failed {
                    reason: e.to_string(),
                }
            }
        };
        entry.phase_tx.send_replace(entry.image.phase());
        true
    }

    /// Drop one entry, releasing its resource if it has one.
    pub fn remove(&mut self, id: ImageId) -> bool {
        match self.entries.remove(&id) {
            Some(entry) => {
                entry.release();
                true
            }
            None => false,
        }
    }

    /// Release every resident resource. Returns how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        let entries = std::mem::take(&mut self.entries);
        let count = entries.len();
        for entry in entries.into_values() {
            entry.release();
        }
        count
    }
}

impl<R: ImageResource> Drop for ImageCache<R> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Read, materialize and measure one file.
///
/// Resource creation and dimension decoding run concurrently over the same
/// bytes. The result is only `Ok` once both succeed; a resource produced
/// alongside a failed or empty decode is released before returning.
pub async fn fetch_image<F: FileHandle, H: ImageHost>(
    handle: &F,
    host: &H,
) -> Result<(H::Resource, Dimensions)> {
    let bytes = handle.read_bytes().await?;
    let (resource, dimensions) = tokio::join!(
        host.create_resource(bytes.clone()),
        host.decode_dimensions(bytes)
    );
    let dimensions = dimensions.and_then(|d| {
        if d.is_empty() {
            Err(ViewerError::ZeroDimensions {
                width: d.width,
                height: d.height,
            })
        } else {
            Ok(d)
        }
    });

    match (resource, dimensions) {
        (Ok(resource), Ok(dimensions)) => Ok((resource, dimensions)),
        (Ok(mut resource), Err(e)) => {
            resource.release();
            Err(e)
        }
        (Err(e), _) => Err(e),
    }
}
