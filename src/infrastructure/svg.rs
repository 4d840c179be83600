// SVG rendering of a resolved pie layout
use crate::domain::pie_layout::{PieLayout, Sector};
use std::fmt::Write;

const FONT_FAMILY: &str = "sans-serif";
const TEXT_COLOR: &str = "#333";

/// Render the layout as a standalone `<svg>` element
pub fn render_svg(layout: &PieLayout) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT_FAMILY}">"#,
        w = fmt_num(layout.width),
        h = fmt_num(layout.height),
    );

    svg.push_str(r#"<g class="series">"#);
    for sector in &layout.sectors {
        write_sector(&mut svg, layout, sector);
    }
    svg.push_str("</g>");

    if let Some(title) = &layout.title {
        let _ = write!(
            svg,
            r#"<text class="title" x="{}" y="{}" text-anchor="middle" font-size="{}" font-weight="bold" fill="{TEXT_COLOR}">"#,
            fmt_num(title.x),
            fmt_num(title.y),
            fmt_num(title.font_size),
        );
        for (i, line) in title.lines.iter().enumerate() {
            let dy = if i == 0 { title.font_size } else { title.line_height };
            let _ = write!(
                svg,
                r#"<tspan x="{}" dy="{}">{}</tspan>"#,
                fmt_num(title.x),
                fmt_num(dy),
                escape_text(line),
            );
        }
        svg.push_str("</text>");
    }

    if let Some(legend) = &layout.legend {
        svg.push_str(r#"<g class="legend">"#);
        for item in &legend.items {
            let cx = legend.x + legend.icon_radius;
            let _ = write!(
                svg,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/><text x="{}" y="{}" dominant-baseline="central" font-size="{}" fill="{TEXT_COLOR}">{}</text>"#,
                fmt_num(cx),
                fmt_num(item.y),
                fmt_num(legend.icon_radius),
                item.color,
                fmt_num(cx + legend.icon_radius + 5.0),
                fmt_num(item.y),
                fmt_num(legend.font_size),
                escape_text(&item.name),
            );
        }
        if legend.page_count > 1 {
            let y = legend.items.last().map(|item| item.y).unwrap_or_default() + legend.font_size * 2.0;
            let _ = write!(
                svg,
                r#"<text class="pager" x="{}" y="{}" font-size="{}" fill="{TEXT_COLOR}">1/{}</text>"#,
                fmt_num(legend.x),
                fmt_num(y),
                fmt_num(legend.font_size),
                legend.page_count,
            );
        }
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

fn write_sector(svg: &mut String, layout: &PieLayout, sector: &Sector) {
    let sweep = sector.sweep();
    if sweep <= 0.0 {
        return;
    }

    // a single arc cannot close a full ring, so draw it as two halves
    let path = if sweep >= 360.0 - 1e-6 {
        let middle = sector.start_angle - 180.0;
        format!(
            "{} {}",
            ring_path(layout, sector.start_angle, middle),
            ring_path(layout, middle, sector.start_angle - 360.0)
        )
    } else {
        ring_path(layout, sector.start_angle, sector.end_angle)
    };

    let _ = write!(
        svg,
        r#"<path d="{}" fill="{}" fill-rule="nonzero"><title>{}</title></path>"#,
        path,
        sector.color,
        escape_text(&sector.tooltip),
    );
}

/// Ring segment between two math angles, swept clockwise on screen
fn ring_path(layout: &PieLayout, start: f64, end: f64) -> String {
    let (r0, r1) = (layout.inner_radius, layout.outer_radius);
    let large_arc = if start - end > 180.0 { 1 } else { 0 };

    let (ox0, oy0) = point(layout.center, r1, start);
    let (ox1, oy1) = point(layout.center, r1, end);
    let (ix1, iy1) = point(layout.center, r0, end);
    let (ix0, iy0) = point(layout.center, r0, start);

    format!(
        "M{} {} A{} {} 0 {} 1 {} {} L{} {} A{} {} 0 {} 0 {} {} Z",
        fmt_num(ox0),
        fmt_num(oy0),
        fmt_num(r1),
        fmt_num(r1),
        large_arc,
        fmt_num(ox1),
        fmt_num(oy1),
        fmt_num(ix1),
        fmt_num(iy1),
        fmt_num(r0),
        fmt_num(r0),
        large_arc,
        fmt_num(ix0),
        fmt_num(iy0),
    )
}

fn point(center: (f64, f64), radius: f64, angle: f64) -> (f64, f64) {
    let radians = angle.to_radians();
    (center.0 + radius * radians.cos(), center.1 - radius * radians.sin())
}

/// Two decimals, without trailing zeros
fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
