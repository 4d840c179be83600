// HTTP request handlers
use crate::domain::chart::ChartOption;
use crate::domain::page::{RegionClass, Viewport};
use crate::infrastructure::http_response::{html_response, svg_response, text_response};
use crate::infrastructure::page_html::{render_page, PanelView};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ViewportAccepted {
    pub viewport: Viewport,
    pub panels: usize,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// The dashboard page with every panel's current regions
pub async fn dashboard_page(State(state): State<Arc<AppState>>) -> Response {
    let page = state.dashboard.page();
    let mut views = Vec::with_capacity(page.panel_count());

    for panel in state.dashboard.panels() {
        let index = panel.index();
        views.push(PanelView {
            name: panel.name().to_string(),
            last_updated: page
                .read(RegionClass::LastUpdated, index)
                .await
                .unwrap_or_default(),
            chart: page
                .read(RegionClass::ResultsStateless, index)
                .await
                .unwrap_or_default(),
        });
    }

    match html_response(render_page(&state.title, &views)) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Current content of one panel's chart mount
pub async fn chart_svg(
    Path(index): Path<usize>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state
        .dashboard
        .page()
        .read(RegionClass::ResultsStateless, index)
        .await
    {
        Ok(Some(markup)) => svg_response(markup).unwrap_or_else(|status| status.into_response()),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Current content of one panel's `last-updated` region
pub async fn last_updated(
    Path(index): Path<usize>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state
        .dashboard
        .page()
        .read(RegionClass::LastUpdated, index)
        .await
    {
        Ok(Some(text)) => text_response(text).unwrap_or_else(|status| status.into_response()),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// The chart option a panel last rendered, as ECharts JSON
pub async fn chart_option(
    Path(index): Path<usize>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChartOption>, StatusCode> {
    let panel = state.dashboard.panel(index).ok_or(StatusCode::NOT_FOUND)?;
    panel
        .chart_option()
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Viewport change reported by the page; re-lays out every rendered chart
pub async fn update_viewport(
    State(state): State<Arc<AppState>>,
    Json(viewport): Json<Viewport>,
) -> (StatusCode, Json<ViewportAccepted>) {
    let panels = state.dashboard.resize(viewport);
    tracing::debug!(
        "Viewport {}x{} sent to {} panels",
        viewport.width,
        viewport.height,
        panels
    );

    (StatusCode::ACCEPTED, Json(ViewportAccepted { viewport, panels }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::result_source::memory::StaticSource;
    use crate::infrastructure::config::DashboardConfig;

    async fn rendered_state() -> Arc<AppState> {
        let source = StaticSource::panel(
            "beta",
            "2024-01-01 00:00:00\n",
            "Ran 10 tests",
            "failures=2, errors=1",
        );
        let dashboard = DashboardService::new(
            Arc::new(source),
            &DashboardConfig::for_source("http://results.local"),
        );
        for handle in dashboard.bootstrap() {
            handle.await.unwrap();
        }
        Arc::new(AppState {
            title: "Test results".to_string(),
            dashboard,
        })
    }

    fn blank_state() -> Arc<AppState> {
        let dashboard = DashboardService::new(
            Arc::new(StaticSource::new()),
            &DashboardConfig::for_source("http://results.local"),
        );
        Arc::new(AppState {
            title: "Test results".to_string(),
            dashboard,
        })
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        assert_eq!(health_check().await, "ok");
    }

    #[tokio::test]
    async fn test_dashboard_page() {
        let response = dashboard_page(State(rendered_state().await)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Last updated: 2024-01-01 00:00:00\u{00A0}UTC"));
        assert!(html.contains("70.0%"));
    }

    #[tokio::test]
    async fn test_chart_svg() {
        let state = rendered_state().await;

        let response = chart_svg(Path(0), State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.starts_with("<svg"));

        let response = chart_svg(Path(4), State(state)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_regions() {
        let state = blank_state();

        let response = chart_svg(Path(0), State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = last_updated(Path(0), State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = chart_option(Path(0), State(state)).await;
        assert_eq!(response.unwrap_err(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_last_updated() {
        let response = last_updated(Path(0), State(rendered_state().await)).await;
        assert_eq!(
            body_text(response).await,
            "Last updated: 2024-01-01 00:00:00\u{00A0}UTC"
        );
    }

    #[tokio::test]
    async fn test_chart_option() {
        let Json(option) = chart_option(Path(0), State(rendered_state().await))
            .await
            .unwrap();
        assert_eq!(option.title.text, "70.0%\nPass Rate");
    }

    #[tokio::test]
    async fn test_update_viewport() {
        let state = rendered_state().await;

        let (status, Json(accepted)) =
            update_viewport(State(state.clone()), Json(Viewport::new(800, 400))).await;

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(accepted.panels, 1);
        assert_eq!(state.dashboard.viewport(), Viewport::new(800, 400));
    }
}
