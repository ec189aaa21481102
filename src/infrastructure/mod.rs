// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod csv_source;
pub mod embedded_backend;
pub mod http_image_fetcher;
