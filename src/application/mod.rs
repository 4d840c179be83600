// Application layer - Panel pipeline and dashboard use cases
pub mod chart_surface;
pub mod dashboard_service;
pub mod resize_bus;
pub mod result_panel;
pub mod result_source;
