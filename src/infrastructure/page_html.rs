// HTML rendering of the dashboard page
use crate::infrastructure::svg::escape_text;
use std::fmt::Write;

/// What one panel currently shows in its two regions
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub name: String,
    pub last_updated: Option<String>,
    pub chart: Option<String>,
}

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 1.5rem; color: #333; }
.panel { margin-bottom: 2rem; }
.panel h2 { font-size: 1.1rem; margin: 0 0 0.25rem; }
.last-updated { font-size: 0.85rem; color: #6e7074; margin: 0 0 0.5rem; }
.results-stateless { width: 100%; height: 300px; }
"#;

// Reports the mount size on resize and pulls the re-rendered regions back in.
const SCRIPT: &str = r#"
function refreshRegions() {
    Array.from(document.getElementsByClassName('last-updated')).forEach((region, index) => {
        fetch(`/panels/${index}/last-updated`)
            .then(r => r.status === 200 ? r.text() : null)
            .then(text => { if (text !== null) region.textContent = text; });
    });
    Array.from(document.getElementsByClassName('results-stateless')).forEach((mount, index) => {
        fetch(`/panels/${index}/chart.svg`)
            .then(r => r.status === 200 ? r.text() : null)
            .then(svg => { if (svg !== null) mount.innerHTML = svg; });
    });
}

function reportViewport() {
    const mount = document.getElementsByClassName('results-stateless')[0];
    if (!mount) return;
    fetch('/viewport', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ width: mount.clientWidth, height: mount.clientHeight }),
    }).then(() => setTimeout(refreshRegions, 100));
}

let resizeTimer;
window.addEventListener('resize', () => {
    clearTimeout(resizeTimer);
    resizeTimer = setTimeout(reportViewport, 150);
});
window.addEventListener('DOMContentLoaded', reportViewport);
"#;

pub fn render_page(title: &str, panels: &[PanelView]) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        escape_text(title)
    );

    for panel in panels {
        let _ = write!(
            html,
            "<section class=\"panel\">\n<h2>{}</h2>\n<p class=\"last-updated\">{}</p>\n<div class=\"results-stateless\">{}</div>\n</section>\n",
            escape_text(&panel.name),
            panel.last_updated.as_deref().map(escape_text).unwrap_or_default(),
            panel.chart.as_deref().unwrap_or_default(),
        );
    }

    let _ = write!(html, "<script>{SCRIPT}</script>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_region_pair_per_panel() {
        let html = render_page(
            "Test results",
            &[
                PanelView {
                    name: "beta".to_string(),
                    last_updated: Some("Last updated: 2024-01-01 00:00:00\u{00A0}UTC".to_string()),
                    chart: Some("<svg></svg>".to_string()),
                },
                PanelView {
                    name: "nightly".to_string(),
                    last_updated: None,
                    chart: None,
                },
            ],
        );

        assert_eq!(html.matches("<p class=\"last-updated\">").count(), 2);
        assert_eq!(html.matches("<div class=\"results-stateless\">").count(), 2);
        assert!(html.contains("<p class=\"last-updated\">Last updated: 2024-01-01 00:00:00\u{00A0}UTC</p>"));
        assert!(html.contains("<div class=\"results-stateless\"><svg></svg></div>"));
        assert!(html.contains("<div class=\"results-stateless\"></div>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render_page(
            "<dash>",
            &[PanelView {
                name: "a&b".to_string(),
                last_updated: Some("Last updated: <now>".to_string()),
                chart: None,
            }],
        );

        assert!(html.contains("<title>&lt;dash&gt;</title>"));
        assert!(html.contains("<h2>a&amp;b</h2>"));
        assert!(html.contains("Last updated: &lt;now&gt;"));
    }
}
