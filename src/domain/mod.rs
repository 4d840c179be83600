// Domain layer - Run summaries, chart model and page regions
pub mod chart;
pub mod page;
pub mod pie_layout;
pub mod run_summary;
