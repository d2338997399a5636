use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::error::{Result, ViewerError};
use crate::host::{Dimensions, ImageBytes, ImageHost, ImageResource};

/// In-memory encoded image, the local stand-in for an object URL.
#[derive(Debug)]
pub struct BlobResource {
    bytes: Option<ImageBytes>,
    format: Option<ImageFormat>,
}

impl BlobResource {
    /// Encoded bytes, or `None` once released.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    pub fn is_released(&self) -> bool {
        self.bytes.is_none()
    }
}

impl ImageResource for BlobResource {
    fn release(&mut self) {
        self.bytes = None;
    }
}

/// [`ImageHost`] backed by the `image` crate.
///
/// Decoding runs on tokio's blocking pool. By default only the header is read
/// to obtain dimensions; [`DecoderHost::verifying`] decodes every pixel so
/// truncated files fail at load time.
#[derive(Clone, Debug, Default)]
pub struct DecoderHost {
    verify_pixels: bool,
}

impl DecoderHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verifying() -> Self {
        Self {
            verify_pixels: true,
        }
    }
}

impl ImageHost for DecoderHost {
    type Resource = BlobResource;

    async fn create_resource(&self, bytes: ImageBytes) -> Result<BlobResource> {
        let format = image::guess_format(&bytes).ok();
        Ok(BlobResource {
            bytes: Some(bytes),
            format,
        })
    }

    async fn decode_dimensions(&self, bytes: ImageBytes) -> Result<Dimensions> {
        let verify = self.verify_pixels;
        tokio::task::spawn_blocking(move || read_dimensions(&bytes, verify))
            .await
            .map_err(|e| ViewerError::Decode(format!("decode task failed: {e}")))?
    }
}

/// Natural dimensions of an encoded image.
pub fn read_dimensions(bytes: &[u8], verify_pixels: bool) -> Result<Dimensions> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    if reader.format().is_none() {
        return Err(ViewerError::Decode("unrecognized image format".into()));
    }
    let (width, height) = if verify_pixels {
        let img = reader.decode()?;
        (img.width(), img.height())
    } else {
        reader.into_dimensions()?
    };
    Ok(Dimensions::new(width, height))
}
