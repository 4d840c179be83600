// Pie chart option model, serialized in the shape ECharts accepts
use super::run_summary::RunSummary;
use serde::{Serialize, Serializer};

/// Slice colors, applied in order by slice index
pub const PALETTE: [&str; 11] = [
    "#2f4554", "#c23531", "#d48265", "#91c7ae", "#749f83", "#ca8622", "#bda29a", "#6e7074",
    "#546570", "#61a0a8", "#c4ccd3",
];

/// Smallest angle, in degrees, any slice is drawn with
pub const MIN_SLICE_ANGLE: f64 = 3.0;

/// 1.3rem at a 16px root font size
pub const TITLE_FONT_SIZE: f64 = 20.8;
pub const LEGEND_FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    Error,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Success, Outcome::Failure, Outcome::Error];

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success => "SUCCESS",
            Outcome::Failure => "FAILURE",
            Outcome::Error => "ERROR",
        }
    }

    fn value(&self, summary: &RunSummary) -> i128 {
        match self {
            Outcome::Success => summary.success_count(),
            Outcome::Failure => summary.failures as i128,
            Outcome::Error => summary.errors as i128,
        }
    }
}

/// A percentage of the surrounding box, serialized as `"55%"`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percent(pub f64);

impl Percent {
    pub fn of(&self, length: f64) -> f64 {
        length * self.0 / 100.0
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("{}%", self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOption {
    pub tooltip: Tooltip,
    pub title: Title,
    pub legend: Legend,
    pub series: Vec<PieSeries>,
    pub color: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub trigger: &'static str,
    pub formatter: &'static str,
}

impl Tooltip {
    /// Expand `{b}` (name) and `{c}` (value) for one slice
    pub fn format(&self, datum: &PieDatum) -> String {
        self.formatter
            .replace("{b}", &datum.name)
            .replace("{c}", &datum.value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub text: String,
    pub text_style: TextStyle,
    pub show: bool,
    pub left: Percent,
    pub top: Percent,
    pub text_align: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub show: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub orient: &'static str,
    pub top: &'static str,
    pub left: Percent,
    pub height: Percent,
    pub align: &'static str,
    pub icon: &'static str,
    pub text_style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toggle {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSeries {
    pub label: Toggle,
    pub min_angle: f64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub radius: [Percent; 2],
    pub avoid_label_overlap: bool,
    pub label_line: Toggle,
    pub width: Percent,
    pub data: Vec<PieDatum>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieDatum {
    pub name: String,
    pub value: i128,
}

impl ChartOption {
    /// The pass-rate gauge for one run
    pub fn pass_rate_pie(summary: &RunSummary) -> Self {
        let data = Outcome::ALL
            .iter()
            .map(|outcome| PieDatum {
                name: outcome.label().to_string(),
                value: outcome.value(summary),
            })
            .collect();

        Self {
            tooltip: Tooltip {
                trigger: "item",
                formatter: "{b}: {c}",
            },
            title: Title {
                text: format!("{}%\nPass Rate", summary.pass_rate_display()),
                text_style: TextStyle {
                    font_size: TITLE_FONT_SIZE,
                    font_weight: Some("bold"),
                },
                show: true,
                left: Percent(32.0),
                top: Percent(37.0),
                text_align: "center",
            },
            legend: Legend {
                show: true,
                kind: "scroll",
                orient: "vertical",
                top: "middle",
                left: Percent(65.0),
                height: Percent(85.0),
                align: "left",
                icon: "circle",
                text_style: TextStyle {
                    font_size: LEGEND_FONT_SIZE,
                    font_weight: None,
                },
            },
            series: vec![PieSeries {
                label: Toggle { show: false },
                min_angle: MIN_SLICE_ANGLE,
                kind: "pie",
                radius: [Percent(55.0), Percent(85.0)],
                avoid_label_overlap: true,
                label_line: Toggle { show: false },
                width: Percent(65.0),
                data,
            }],
            color: PALETTE.to_vec(),
        }
    }

    pub fn color_for(&self, index: usize) -> &'static str {
        if self.color.is_empty() {
            return PALETTE[index % PALETTE.len()];
        }
        self.color[index % self.color.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_rate_pie_slices() {
        let option = ChartOption::pass_rate_pie(&RunSummary::new(10, 2, 1));
        let data = &option.series[0].data;
        let slices: Vec<(&str, i128)> = data.iter().map(|d| (d.name.as_str(), d.value)).collect();

        assert_eq!(slices, vec![("SUCCESS", 7), ("FAILURE", 2), ("ERROR", 1)]);
        assert_eq!(option.title.text, "70.0%\nPass Rate");
    }

    #[test]
    fn test_slices_keep_full_u64_counts() {
        let option = ChartOption::pass_rate_pie(&RunSummary::new(u64::MAX, 0, 0));
        let data = &option.series[0].data;

        assert_eq!(data[0].value, u64::MAX as i128);
        assert_eq!(option.tooltip.format(&data[0]), "SUCCESS: 18446744073709551615");
        assert_eq!(option.title.text, "100%\nPass Rate");
    }

    #[test]
    fn test_tooltip_format() {
        let option = ChartOption::pass_rate_pie(&RunSummary::new(10, 2, 1));
        assert_eq!(option.tooltip.format(&option.series[0].data[1]), "FAILURE: 2");
    }

    #[test]
    fn test_color_by_slice_index() {
        let option = ChartOption::pass_rate_pie(&RunSummary::new(1, 0, 0));
        assert_eq!(option.color_for(0), "#2f4554");
        assert_eq!(option.color_for(2), "#d48265");
        assert_eq!(option.color_for(11), "#2f4554");
    }

    #[test]
    fn test_serializes_like_echarts_option() {
        let option = ChartOption::pass_rate_pie(&RunSummary::new(4, 1, 0));
        let json = serde_json::to_value(&option).unwrap();

        assert_eq!(json["series"][0]["type"], "pie");
        assert_eq!(json["series"][0]["minAngle"], 3.0);
        assert_eq!(json["series"][0]["radius"][0], "55%");
        assert_eq!(json["series"][0]["labelLine"]["show"], false);
        assert_eq!(json["legend"]["type"], "scroll");
        assert_eq!(json["title"]["left"], "32%");
        assert_eq!(json["title"]["textStyle"]["fontWeight"], "bold");
        assert!(json["legend"]["textStyle"].get("fontWeight").is_none());
        assert_eq!(json["color"][1], "#c23531");
    }
}
