// Application layer - Use cases and collaborator seams
pub mod chart_backend;
pub mod dataset_source;
pub mod hover_service;
pub mod image_fetcher;
pub mod presenter_service;
pub mod surfaces;
