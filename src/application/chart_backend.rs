// Rendering collaborator trait
use crate::domain::chart::ChartSpec;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Pointer-hover notification from the rendering collaborator, carrying the
/// hovered data point's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverEvent {
    pub index: usize,
}

#[async_trait]
pub trait ChartBackend: Send + Sync {
    /// Render a chart spec into the named display surface.
    async fn render(&self, surface: &str, spec: &ChartSpec) -> anyhow::Result<()>;

    /// Take the backend's hover event stream. Yields the receiver once;
    /// later calls return `None`.
    fn subscribe_hover(&self) -> Option<mpsc::Receiver<HoverEvent>>;
}
