// Hover-driven image pipeline: one independent async fetch per hover event
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::{RwLock, mpsc};

use crate::application::chart_backend::HoverEvent;
use crate::application::image_fetcher::ImageFetcher;
use crate::application::surfaces::{ImageHandle, ImageSurface};

#[derive(Debug, Error)]
pub enum HoverError {
    #[error("image at {location} unavailable: {cause}")]
    ImageUnavailable {
        location: String,
        cause: anyhow::Error,
    },
    #[error("undecodable image payload from {location}: {cause}")]
    UndecodableImage {
        location: String,
        cause: image::ImageError,
    },
}

/// Outcome of one hover event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverOutcome {
    /// The fetched image now occupies the image surface.
    Applied,
    /// A later-triggered hover completed first; this result was discarded.
    Stale,
    /// The hovered point carries no image location.
    NoLocation,
}

/// Consumes hover events from the chart backend and drives the image
/// surface. Completions carry the sequence number assigned when the hover
/// was triggered; a completion older than the last applied one is dropped,
/// so the surface always shows the most recently triggered hover that
/// finished.
pub struct HoverService {
    fetcher: Arc<dyn ImageFetcher>,
    surface: Arc<ImageSurface>,
    locations: RwLock<Vec<Option<String>>>,
    next_seq: AtomicU64,
    applied_seq: AtomicU64,
}

impl HoverService {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, surface: Arc<ImageSurface>) -> Self {
        Self {
            fetcher,
            surface,
            locations: RwLock::new(Vec::new()),
            next_seq: AtomicU64::new(0),
            applied_seq: AtomicU64::new(0),
        }
    }

    /// Swap in the locations of a freshly derived series.
    pub async fn set_locations(&self, locations: Vec<Option<String>>) {
        *self.locations.write().await = locations;
    }

    /// Assign the sequence number for a newly triggered hover. Must be
    /// called at trigger time, not when the fetch task starts.
    pub fn begin_hover(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Resolve a triggered hover: look up the location, fetch and decode the
    /// image, and apply it unless a newer completion won the race.
    pub async fn resolve_hover(&self, seq: u64, index: usize) -> Result<HoverOutcome, HoverError> {
        let location = self
            .locations
            .read()
            .await
            .get(index)
            .and_then(|location| location.clone());
        let Some(location) = location else {
            return Ok(HoverOutcome::NoLocation);
        };

        let bytes = self.fetcher.fetch(&location).await.map_err(|cause| {
            HoverError::ImageUnavailable {
                location: location.clone(),
                cause,
            }
        })?;
        let handle =
            ImageHandle::decode(bytes).map_err(|cause| HoverError::UndecodableImage {
                location: location.clone(),
                cause,
            })?;

        if self.try_apply(seq) {
            tracing::debug!(
                index,
                surface = self.surface.name(),
                width = handle.width,
                height = handle.height,
                "hover image displayed"
            );
            self.surface.replace(handle).await;
            Ok(HoverOutcome::Applied)
        } else {
            Ok(HoverOutcome::Stale)
        }
    }

    fn try_apply(&self, seq: u64) -> bool {
        let mut current = self.applied_seq.load(Ordering::Acquire);
        loop {
            if seq <= current {
                return false;
            }
            match self.applied_seq.compare_exchange_weak(
                current,
                seq,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }

    /// Drive the backend's hover subscription, spawning one independent task
    /// per event. Sequence numbers are assigned at trigger time, before the
    /// task is spawned.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<HoverEvent>) {
        while let Some(event) = events.recv().await {
            let service = Arc::clone(&self);
            let seq = service.begin_hover();
            tokio::spawn(async move {
                match service.resolve_hover(seq, event.index).await {
                    Ok(HoverOutcome::Applied) => {}
                    Ok(HoverOutcome::Stale) => {
                        tracing::debug!(index = event.index, "discarded stale hover image");
                    }
                    Ok(HoverOutcome::NoLocation) => {
                        tracing::debug!(index = event.index, "hovered point has no image location");
                    }
                    Err(err) => {
                        tracing::warn!(index = event.index, %err, "hover image fetch failed");
                    }
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    fn png_bytes(shade: u8) -> Bytes {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([shade, 0, 0, 255]));
        let mut cursor = std::io::Cursor::new(Vec::new());
        img.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
        Bytes::from(cursor.into_inner())
    }

    struct StubFetcher {
        responses: HashMap<String, Bytes>,
        calls: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn new(responses: Vec<(&str, Bytes)>) -> Self {
            Self {
                responses: responses
                    .into_iter()
                    .map(|(location, bytes)| (location.to_string(), bytes))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageFetcher for StubFetcher {
        async fn fetch(&self, location: &str) -> anyhow::Result<Bytes> {
            self.calls.lock().unwrap().push(location.to_string());
            self.responses
                .get(location)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("connection refused"))
        }
    }

    async fn hover(service: &HoverService, index: usize) -> Result<HoverOutcome, HoverError> {
        let seq = service.begin_hover();
        service.resolve_hover(seq, index).await
    }

    fn service_with(
        responses: Vec<(&str, Bytes)>,
    ) -> (Arc<HoverService>, Arc<StubFetcher>, Arc<ImageSurface>) {
        let fetcher = Arc::new(StubFetcher::new(responses));
        let surface = Arc::new(ImageSurface::new("imageContainer"));
        let service = Arc::new(HoverService::new(
            Arc::clone(&fetcher) as Arc<dyn ImageFetcher>,
            Arc::clone(&surface),
        ));
        (service, fetcher, surface)
    }

    #[tokio::test]
    async fn test_hover_fetches_once_and_replaces_the_image() {
        let bytes = png_bytes(10);
        let (service, fetcher, surface) = service_with(vec![("/img/2.png", bytes.clone())]);
        service
            .set_locations(vec![Some("/img/1.png".into()), Some("/img/2.png".into())])
            .await;

        let outcome = hover(&service, 1).await.unwrap();

        assert_eq!(outcome, HoverOutcome::Applied);
        assert_eq!(fetcher.calls(), vec!["/img/2.png".to_string()]);
        assert_eq!(surface.current().await.unwrap().bytes, bytes);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_the_previous_image() {
        let bytes = png_bytes(10);
        let (service, _, surface) = service_with(vec![("/img/1.png", bytes.clone())]);
        service
            .set_locations(vec![Some("/img/1.png".into()), Some("/img/missing.png".into())])
            .await;

        hover(&service, 0).await.unwrap();
        let err = hover(&service, 1).await.unwrap_err();

        assert!(matches!(err, HoverError::ImageUnavailable { .. }));
        assert_eq!(surface.current().await.unwrap().bytes, bytes);
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_an_error() {
        let (service, _, surface) =
            service_with(vec![("/img/1.png", Bytes::from_static(b"not an image"))]);
        service.set_locations(vec![Some("/img/1.png".into())]).await;

        let err = hover(&service, 0).await.unwrap_err();

        assert!(matches!(err, HoverError::UndecodableImage { .. }));
        assert!(surface.current().await.is_none());
    }

    #[tokio::test]
    async fn test_hover_without_location_is_a_no_op() {
        let (service, fetcher, surface) = service_with(vec![]);
        service.set_locations(vec![None]).await;

        assert_eq!(hover(&service, 0).await.unwrap(), HoverOutcome::NoLocation);
        assert_eq!(hover(&service, 9).await.unwrap(), HoverOutcome::NoLocation);
        assert!(fetcher.calls().is_empty());
        assert!(surface.current().await.is_none());
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let newer = png_bytes(2);
        let (service, _, surface) = service_with(vec![
            ("/img/1.png", png_bytes(1)),
            ("/img/2.png", newer.clone()),
        ]);
        service
            .set_locations(vec![Some("/img/1.png".into()), Some("/img/2.png".into())])
            .await;

        // Two hovers triggered in order; the later one completes first.
        let first = service.begin_hover();
        let second = service.begin_hover();

        assert_eq!(
            service.resolve_hover(second, 1).await.unwrap(),
            HoverOutcome::Applied
        );
        assert_eq!(
            service.resolve_hover(first, 0).await.unwrap(),
            HoverOutcome::Stale
        );
        assert_eq!(surface.current().await.unwrap().bytes, newer);
    }

    #[tokio::test]
    async fn test_run_consumes_backend_hover_events() {
        let bytes = png_bytes(3);
        let (service, _, surface) = service_with(vec![("/img/1.png", bytes.clone())]);
        service.set_locations(vec![Some("/img/1.png".into())]).await;

        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(Arc::clone(&service).run(rx));
        tx.send(HoverEvent { index: 0 }).await.unwrap();

        for _ in 0..100 {
            if surface.current().await.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(surface.current().await.unwrap().bytes, bytes);
    }
}
