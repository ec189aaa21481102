// In-process chart backend rendering into a named surface slot
use std::sync::{Arc, Mutex};

use anyhow::bail;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::application::chart_backend::{ChartBackend, HoverEvent};
use crate::application::surfaces::ChartSurface;
use crate::domain::chart::ChartSpec;

const HOVER_CHANNEL_CAPACITY: usize = 16;

/// Stands in for an external charting library: "rendering" stores the spec
/// into the named chart surface, and pointer events injected by the hosting
/// layer flow out through the hover subscription.
pub struct EmbeddedChartBackend {
    surface: Arc<ChartSurface>,
    hover_tx: mpsc::Sender<HoverEvent>,
    hover_rx: Mutex<Option<mpsc::Receiver<HoverEvent>>>,
}

impl EmbeddedChartBackend {
    pub fn new(surface: Arc<ChartSurface>) -> Self {
        let (hover_tx, hover_rx) = mpsc::channel(HOVER_CHANNEL_CAPACITY);
        Self {
            surface,
            hover_tx,
            hover_rx: Mutex::new(Some(hover_rx)),
        }
    }

    /// Handle the hosting layer uses to inject pointer events.
    pub fn hover_sender(&self) -> mpsc::Sender<HoverEvent> {
        self.hover_tx.clone()
    }
}

#[async_trait]
impl ChartBackend for EmbeddedChartBackend {
    async fn render(&self, surface: &str, spec: &ChartSpec) -> anyhow::Result<()> {
        if surface != self.surface.name() {
            bail!("unknown chart surface {surface:?}");
        }
        self.surface.show(spec.clone()).await;
        Ok(())
    }

    fn subscribe_hover(&self) -> Option<mpsc::Receiver<HoverEvent>> {
        self.hover_rx
            .lock()
            .ok()
            .and_then(|mut receiver| receiver.take())
    }
}
