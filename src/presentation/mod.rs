// Presentation layer - HTTP surface of the dashboard
pub mod app_state;
pub mod handlers;
