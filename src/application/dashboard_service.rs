// Dashboard service - builds the page and starts every configured panel
use crate::application::resize_bus::ResizeBus;
use crate::application::result_panel::ResultPanel;
use crate::application::result_source::ResultSource;
use crate::domain::page::{Page, Viewport};
use crate::infrastructure::config::DashboardConfig;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct DashboardService {
    page: Arc<Page>,
    panels: Vec<Arc<ResultPanel>>,
    resize_bus: ResizeBus,
}

impl DashboardService {
    pub fn new(source: Arc<dyn ResultSource>, config: &DashboardConfig) -> Self {
        let page = Arc::new(Page::with_panels(config.panels.len()));
        let resize_bus = ResizeBus::new(config.viewport);

        let mut panels: Vec<Arc<ResultPanel>> = config
            .panels
            .iter()
            .map(|panel| {
                Arc::new(ResultPanel::new(
                    panel.name.clone(),
                    panel.index,
                    source.clone(),
                    page.clone(),
                    resize_bus.clone(),
                ))
            })
            .collect();
        panels.sort_by_key(|panel| panel.index());

        Self {
            page,
            panels,
            resize_bus,
        }
    }

    /// Build the dashboard and start loading every panel in the background
    pub fn initialize(source: Arc<dyn ResultSource>, config: &DashboardConfig) -> Self {
        let service = Self::new(source, config);
        service.bootstrap();
        service
    }

    /// Spawn the timestamp and summary pipelines of every panel. The two run
    /// independently; a failure is logged and leaves that region blank.
    pub fn bootstrap(&self) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(self.panels.len() * 2);

        for panel in &self.panels {
            tracing::info!("Loading panel {} ({})", panel.index(), panel.name());

            let timestamp_panel = panel.clone();
            handles.push(tokio::spawn(async move {
                if let Err(e) = timestamp_panel.refresh_timestamp().await {
                    tracing::error!(
                        "Timestamp for panel {} ({}) failed: {}",
                        timestamp_panel.index(),
                        timestamp_panel.name(),
                        e
                    );
                }
            }));

            let summary_panel = panel.clone();
            handles.push(tokio::spawn(async move {
                if let Err(e) = summary_panel.load_summary().await {
                    tracing::error!(
                        "Summary for panel {} ({}) failed: {}",
                        summary_panel.index(),
                        summary_panel.name(),
                        e
                    );
                }
            }));
        }

        handles
    }

    /// Broadcast a viewport change; returns the number of listening panels
    pub fn resize(&self, viewport: Viewport) -> usize {
        self.resize_bus.publish(viewport)
    }

    pub fn page(&self) -> &Arc<Page> {
        &self.page
    }

    pub fn panels(&self) -> &[Arc<ResultPanel>] {
        &self.panels
    }

    pub fn panel(&self, index: usize) -> Option<&Arc<ResultPanel>> {
        self.panels.iter().find(|panel| panel.index() == index)
    }

    pub fn viewport(&self) -> Viewport {
        self.resize_bus.current()
    }
}
