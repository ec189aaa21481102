// Application state for HTTP handlers
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::chart_backend::HoverEvent;
use crate::application::presenter_service::ChartPresenter;
use crate::application::surfaces::{ChartSurface, ImageSurface};

pub struct AppState {
    pub presenter: ChartPresenter,
    pub hover_events: mpsc::Sender<HoverEvent>,
    pub chart_surface: Arc<ChartSurface>,
    pub image_surface: Arc<ImageSurface>,
}
