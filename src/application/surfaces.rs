// Display surfaces: the chart region and the hover-image region
use bytes::Bytes;
use image::GenericImageView;
use tokio::sync::RwLock;

use crate::domain::chart::ChartSpec;

/// Named region holding the most recently rendered chart spec.
#[derive(Debug)]
pub struct ChartSurface {
    name: String,
    slot: RwLock<Option<ChartSpec>>,
}

impl ChartSurface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slot: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn show(&self, spec: ChartSpec) {
        *self.slot.write().await = Some(spec);
    }

    pub async fn current(&self) -> Option<ChartSpec> {
        self.slot.read().await.clone()
    }

    /// Number of points in the rendered chart, without cloning the spec.
    pub async fn point_count(&self) -> Option<usize> {
        self.slot.read().await.as_ref().map(|spec| spec.values.len())
    }
}

/// Decoded, displayable image: validated bytes plus the metadata a display
/// region needs.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    pub bytes: Bytes,
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
}

impl ImageHandle {
    /// Validate and decode raw bytes into a displayable handle.
    pub fn decode(bytes: Bytes) -> Result<Self, image::ImageError> {
        let format = image::guess_format(&bytes)?;
        let decoded = image::load_from_memory(&bytes)?;
        let (width, height) = decoded.dimensions();
        Ok(Self {
            bytes,
            content_type: format.to_mime_type(),
            width,
            height,
        })
    }
}

/// Named region holding the currently displayed image. Replacing the handle
/// drops the previous one, releasing its backing bytes.
#[derive(Debug)]
pub struct ImageSurface {
    name: String,
    slot: RwLock<Option<ImageHandle>>,
}

impl ImageSurface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slot: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn replace(&self, handle: ImageHandle) {
        *self.slot.write().await = Some(handle);
    }

    pub async fn current(&self) -> Option<ImageHandle> {
        self.slot.read().await.clone()
    }
}
