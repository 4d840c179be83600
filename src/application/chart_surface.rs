// Chart surface - one initialized chart instance bound to a mount region
use crate::domain::chart::ChartOption;
use crate::domain::page::Viewport;
use crate::domain::pie_layout::PieLayout;
use crate::infrastructure::svg::render_svg;

#[derive(Debug, Clone)]
pub struct ChartSurface {
    viewport: Viewport,
    option: Option<ChartOption>,
    layout: Option<PieLayout>,
}

impl ChartSurface {
    pub fn init(viewport: Viewport) -> Self {
        Self {
            viewport,
            option: None,
            layout: None,
        }
    }

    pub fn set_option(&mut self, option: ChartOption) {
        self.layout = Some(PieLayout::compute(&option, self.viewport));
        self.option = Some(option);
    }

    /// Lay the current option out again for a new size. Safe to repeat.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(option) = &self.option {
            self.layout = Some(PieLayout::compute(option, viewport));
        }
    }

    pub fn option(&self) -> Option<&ChartOption> {
        self.option.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn layout(&self) -> Option<&PieLayout> {
        self.layout.as_ref()
    }

    /// Markup for the mount region; an empty canvas until an option is set
    pub fn markup(&self) -> String {
        match &self.layout {
            Some(layout) => render_svg(layout),
            None => format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"></svg>"#,
                w = self.viewport.width,
                h = self.viewport.height,
            ),
        }
    }
}
