// Result panel - fetch, parse and render one test run into its page regions
use crate::application::chart_surface::ChartSurface;
use crate::application::resize_bus::ResizeBus;
use crate::application::result_source::{
    resource_path, ResultSource, SourceError, RESULT_FILE, RUN_FILE, TIMESTAMP_FILE,
};
use crate::domain::chart::ChartOption;
use crate::domain::page::{MissingRegion, Page, RegionClass, Viewport};
use crate::domain::run_summary::{ParseError, RunSummary};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    MissingRegion(#[from] MissingRegion),
}

/// Text shown in a panel's `last-updated` region
pub fn last_updated_text(timestamp_body: &str) -> String {
    format!("Last updated: {}\u{00A0}UTC", timestamp_body.trim())
}

pub struct ResultPanel {
    name: String,
    index: usize,
    source: Arc<dyn ResultSource>,
    page: Arc<Page>,
    resize_bus: ResizeBus,
    chart: RwLock<Option<ChartSurface>>,
}

impl ResultPanel {
    pub fn new(
        name: String,
        index: usize,
        source: Arc<dyn ResultSource>,
        page: Arc<Page>,
        resize_bus: ResizeBus,
    ) -> Self {
        Self {
            name,
            index,
            source,
            page,
            resize_bus,
            chart: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Fetch `timestamp.txt` and write it into this panel's `last-updated` region
    pub async fn refresh_timestamp(&self) -> Result<String, PanelError> {
        let path = resource_path(&self.name, TIMESTAMP_FILE);
        tracing::debug!("Fetching {} for panel {}", path, self.index);

        let body = self.source.fetch_text(&path).await?;
        let text = last_updated_text(&body);
        self.page
            .write(RegionClass::LastUpdated, self.index, text.clone())
            .await?;

        Ok(text)
    }

    /// Fetch `run.txt` and `result.txt` together and render the chart once
    /// both have arrived. Either fetch failing leaves the chart untouched.
    pub async fn load_summary(self: &Arc<Self>) -> Result<RunSummary, PanelError> {
        let run_path = resource_path(&self.name, RUN_FILE);
        let result_path = resource_path(&self.name, RESULT_FILE);
        tracing::debug!(
            "Fetching {} and {} for panel {}",
            run_path,
            result_path,
            self.index
        );

        let (run, result) = futures::try_join!(
            self.source.fetch_text(&run_path),
            self.source.fetch_text(&result_path)
        )?;

        let summary = RunSummary::parse(&run, &result)?;
        self.render(summary).await?;
        Ok(summary)
    }

    /// Draw the pass-rate pie for `summary` into this panel's chart mount,
    /// initializing the chart on first use and reusing it afterwards.
    pub async fn render(self: &Arc<Self>, summary: RunSummary) -> Result<(), PanelError> {
        self.page
            .ensure_region(RegionClass::ResultsStateless, self.index)?;

        let option = ChartOption::pass_rate_pie(&summary);
        let mut chart = self.chart.write().await;
        // subscribe before reading the current viewport so no resize published
        // in between is lost
        let events = chart.is_none().then(|| self.resize_bus.subscribe());
        let surface = chart.get_or_insert_with(|| ChartSurface::init(self.resize_bus.current()));
        surface.set_option(option);
        self.page
            .write(RegionClass::ResultsStateless, self.index, surface.markup())
            .await?;
        drop(chart);

        if let Some(events) = events {
            self.listen_for_resize(events);
        }

        tracing::info!(
            "Rendered panel {} ({}): {} tests, {} failures, {} errors, pass rate {}%",
            self.index,
            self.name,
            summary.count,
            summary.failures,
            summary.errors,
            summary.pass_rate_display()
        );
        Ok(())
    }

    /// Re-layout the chart for a new viewport. Returns `false` when the
    /// chart has not been initialized yet.
    pub async fn resize(&self, viewport: Viewport) -> Result<bool, PanelError> {
        let mut chart = self.chart.write().await;
        let Some(surface) = chart.as_mut() else {
            return Ok(false);
        };

        surface.resize(viewport);
        self.page
            .write(RegionClass::ResultsStateless, self.index, surface.markup())
            .await?;

        tracing::debug!(
            "Resized panel {} to {}x{}",
            self.index,
            viewport.width,
            viewport.height
        );
        Ok(true)
    }

    pub async fn chart_option(&self) -> Option<ChartOption> {
        self.chart
            .read()
            .await
            .as_ref()
            .and_then(|surface| surface.option().cloned())
    }

    pub async fn is_rendered(&self) -> bool {
        self.chart.read().await.is_some()
    }

    /// Subscribe this panel to the resize bus for the rest of its lifetime
    fn listen_for_resize(self: &Arc<Self>, mut events: BroadcastStream<Viewport>) {
        let panel = Arc::clone(self);

        tokio::spawn(async move {
            while let Some(event) = events.next().await {
                match event {
                    Ok(viewport) => {
                        if let Err(e) = panel.resize(viewport).await {
                            tracing::warn!("Resize of panel {} failed: {}", panel.index, e);
                        }
                    }
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        tracing::debug!(
                            "Panel {} skipped {} stale resize events",
                            panel.index,
                            skipped
                        );
                    }
                }
            }
        });
    }
}
