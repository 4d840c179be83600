// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_response;
pub mod http_source;
pub mod page_html;
pub mod svg;
