// Donut chart geometry resolved against a concrete surface size
use super::chart::{ChartOption, PieDatum};
use super::page::Viewport;

/// Pie slices start at twelve o'clock and run clockwise
pub const START_ANGLE: f64 = 90.0;

const LEGEND_ITEM_HEIGHT: f64 = 14.0;
const LEGEND_ITEM_GAP: f64 = 10.0;
const TITLE_LINE_HEIGHT: f64 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub name: String,
    pub value: i128,
    pub color: &'static str,
    pub tooltip: String,
    /// Math angles in degrees; `end_angle < start_angle` for clockwise sweeps
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Sector {
    pub fn sweep(&self) -> f64 {
        self.start_angle - self.end_angle
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleLayout {
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub line_height: f64,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub name: String,
    pub color: &'static str,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendLayout {
    pub x: f64,
    pub font_size: f64,
    pub icon_radius: f64,
    pub items: Vec<LegendItem>,
    pub page_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieLayout {
    pub width: f64,
    pub height: f64,
    pub center: (f64, f64),
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub sectors: Vec<Sector>,
    pub title: Option<TitleLayout>,
    pub legend: Option<LegendLayout>,
}

impl PieLayout {
    pub fn compute(option: &ChartOption, viewport: Viewport) -> Self {
        let width = viewport.width as f64;
        let height = viewport.height as f64;

        let mut layout = Self {
            width,
            height,
            center: (width / 2.0, height / 2.0),
            inner_radius: 0.0,
            outer_radius: 0.0,
            sectors: Vec::new(),
            title: None,
            legend: None,
        };

        if let Some(series) = option.series.first() {
            let box_width = series.width.of(width);
            let base_radius = box_width.min(height) / 2.0;
            layout.center = (box_width / 2.0, height / 2.0);
            layout.inner_radius = series.radius[0].of(base_radius);
            layout.outer_radius = series.radius[1].of(base_radius);

            let angles = slice_angles(&series.data, series.min_angle);
            let mut start = START_ANGLE;
            for (index, (datum, sweep)) in series.data.iter().zip(angles).enumerate() {
                layout.sectors.push(Sector {
                    name: datum.name.clone(),
                    value: datum.value,
                    color: option.color_for(index),
                    tooltip: option.tooltip.format(datum),
                    start_angle: start,
                    end_angle: start - sweep,
                });
                start -= sweep;
            }
        }

        if option.title.show {
            let font_size = option.title.text_style.font_size;
            layout.title = Some(TitleLayout {
                x: option.title.left.of(width),
                y: option.title.top.of(height),
                font_size,
                line_height: font_size * TITLE_LINE_HEIGHT,
                lines: option.title.text.lines().map(str::to_string).collect(),
            });
        }

        if option.legend.show {
            let names: Vec<&PieDatum> = option
                .series
                .iter()
                .flat_map(|series| series.data.iter())
                .collect();
            layout.legend = Some(legend_layout(option, &names, width, height));
        }

        layout
    }
}

/// Sweep of each slice in degrees, with small slices widened to `min_angle`
/// and the remaining circle shared proportionally among the rest.
pub fn slice_angles(data: &[PieDatum], min_angle: f64) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }

    let values: Vec<f64> = data.iter().map(|d| d.value.max(0) as f64).collect();
    let sum: f64 = values.iter().sum();
    let even_share = 360.0 / values.len() as f64;

    let mut rest = 360.0;
    let mut unclamped_sum = 0.0;
    let mut clamped = vec![false; values.len()];
    let mut angles: Vec<f64> = values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let angle = if sum == 0.0 { even_share } else { value * 360.0 / sum };
            if angle < min_angle {
                clamped[i] = true;
                rest -= min_angle;
                min_angle
            } else {
                unclamped_sum += value;
                angle
            }
        })
        .collect();

    if rest < 360.0 {
        if rest <= 1e-3_f64.to_degrees() || unclamped_sum == 0.0 {
            angles.iter_mut().for_each(|angle| *angle = even_share);
        } else {
            let unit = rest / unclamped_sum;
            for (i, angle) in angles.iter_mut().enumerate() {
                if !clamped[i] {
                    *angle = values[i] * unit;
                }
            }
        }
    }

    angles
}

fn legend_layout(option: &ChartOption, data: &[&PieDatum], width: f64, height: f64) -> LegendLayout {
    let step = LEGEND_ITEM_HEIGHT + LEGEND_ITEM_GAP;
    let available = option.legend.height.of(height);
    let per_page = (((available + LEGEND_ITEM_GAP) / step).floor() as usize).max(1);
    let page_count = data.len().div_ceil(per_page).max(1);

    let shown = data.len().min(per_page);
    let block = shown as f64 * step - LEGEND_ITEM_GAP;
    let top = ((height - block) / 2.0).max(0.0);

    let items = data
        .iter()
        .take(shown)
        .enumerate()
        .map(|(i, datum)| LegendItem {
            name: datum.name.clone(),
            color: option.color_for(i),
            y: top + i as f64 * step + LEGEND_ITEM_HEIGHT / 2.0,
        })
        .collect();

    LegendLayout {
        x: option.legend.left.of(width),
        font_size: option.legend.text_style.font_size,
        icon_radius: LEGEND_ITEM_HEIGHT / 2.0,
        items,
        page_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::run_summary::RunSummary;

    fn datum(value: i128) -> PieDatum {
        PieDatum {
            name: format!("v{value}"),
            value,
        }
    }

    #[test]
    fn test_proportional_angles() {
        let angles = slice_angles(&[datum(2), datum(1), datum(1)], 3.0);
        assert_eq!(angles, vec![180.0, 90.0, 90.0]);
    }

    #[test]
    fn test_min_angle_keeps_tiny_slices_visible() {
        let angles = slice_angles(&[datum(999), datum(1), datum(0)], 3.0);
        assert_eq!(angles[1], 3.0);
        assert_eq!(angles[2], 3.0);
        assert!((angles[0] - 354.0).abs() < 1e-9);
        assert!((angles.iter().sum::<f64>() - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_sum_shares_evenly() {
        let angles = slice_angles(&[datum(0), datum(0), datum(0)], 3.0);
        assert_eq!(angles, vec![120.0, 120.0, 120.0]);
    }

    #[test]
    fn test_sectors_run_clockwise_from_top() {
        let option = ChartOption::pass_rate_pie(&RunSummary::new(4, 1, 1));
        let layout = PieLayout::compute(&option, Viewport::new(600, 300));

        assert_eq!(layout.sectors[0].start_angle, 90.0);
        assert_eq!(layout.sectors[0].end_angle, -90.0);
        assert_eq!(layout.sectors[2].end_angle, -270.0);
        assert_eq!(layout.sectors[1].tooltip, "FAILURE: 1");
    }

    #[test]
    fn test_ring_fits_series_box() {
        let option = ChartOption::pass_rate_pie(&RunSummary::new(4, 1, 1));
        let layout = PieLayout::compute(&option, Viewport::new(1000, 400));

        // series box is 650 wide, so height bounds the radius
        assert_eq!(layout.center, (325.0, 200.0));
        assert!((layout.outer_radius - 170.0).abs() < 1e-9);
        assert!((layout.inner_radius - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_title_and_legend_positions() {
        let option = ChartOption::pass_rate_pie(&RunSummary::new(10, 2, 1));
        let layout = PieLayout::compute(&option, Viewport::new(600, 300));

        let title = layout.title.unwrap();
        assert_eq!(title.lines, vec!["70.0%", "Pass Rate"]);
        assert_eq!((title.x, title.y), (192.0, 111.0));

        let legend = layout.legend.unwrap();
        assert_eq!(legend.x, 390.0);
        assert_eq!(legend.items.len(), 3);
        assert_eq!(legend.page_count, 1);
    }

    #[test]
    fn test_legend_pages_when_short() {
        let option = ChartOption::pass_rate_pie(&RunSummary::new(10, 2, 1));
        let layout = PieLayout::compute(&option, Viewport::new(600, 40));

        let legend = layout.legend.unwrap();
        assert_eq!(legend.items.len(), 1);
        assert_eq!(legend.page_count, 3);
    }
}
