//! Capabilities the viewer consumes from its host environment.
//!
//! The session never touches the filesystem or a decoder directly. It is handed
//! [`FileHandle`]s by an enumeration step and turns bytes into displayable
//! resources through an [`ImageHost`]. All futures are polled on a single
//! `LocalSet`, so none of these traits require `Send`.
#![allow(async_fn_in_trait)]

use std::fmt;
use std::sync::Arc;

use crate::error::Result;

/// Raw file contents, shared between the resource and decode steps.
pub type ImageBytes = Arc<[u8]>;

/// Natural pixel size of a decoded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A discovered file that can be read lazily.
pub trait FileHandle: 'static {
    fn name(&self) -> &str;

    fn full_path(&self) -> &str;

    async fn read_bytes(&self) -> Result<ImageBytes>;
}

/// A displayable handle derived from image bytes (an object URL, a texture,
/// an in-memory blob).
///
/// Release is explicit: the cache calls [`release`](ImageResource::release)
/// exactly once, when the owning entry is evicted, when a load finishes after
/// its entry is gone, or on teardown.
pub trait ImageResource: 'static {
    fn release(&mut self);
}

/// Turns bytes into a displayable resource and natural dimensions.
pub trait ImageHost: 'static {
    type Resource: ImageResource;

    async fn create_resource(&self, bytes: ImageBytes) -> Result<Self::Resource>;

    async fn decode_dimensions(&self, bytes: ImageBytes) -> Result<Dimensions>;
}
