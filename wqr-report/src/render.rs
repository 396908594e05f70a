//! The shared page renderer.
//!
//! Both surfaces call `render_page` and get the same `RenderedPage`: same
//! point selection, same ordering, same truncation, same numeric
//! formatting. The only thing a surface decides for itself is how a chart
//! block's snapshot is obtained.

use crate::model::{PageContent, ReportModel};
use crate::view_state::{visible_stats, ReportViewState};
use serde::Serialize;
use wqr_core::dates::format_date;
use wqr_core::parameter::operator_ph_range;

/// Non-conformity tables show at most this many rows; the remainder is
/// summarized by a "showing N of M" footer.
pub const MAX_TABLE_ROWS: usize = 10;

/// Chart snapshot key for a point's volume chart.
pub fn volume_chart_key(point_id: &str) -> String {
    format!("vol:{point_id}")
}

/// Chart snapshot key for a point's quality chart.
pub fn quality_chart_key(point_id: &str) -> String {
    format!("qual:{point_id}")
}

/// A content block on a rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RenderedBlock {
    Heading(String),
    Paragraph(String),
    KeyValues(Vec<(String, String)>),
    Table {
        title: String,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        footer: Option<String>,
    },
    /// A chart slot, resolved to a snapshot (or a placeholder) by the
    /// consuming surface.
    Chart { key: String, title: String },
}

/// One fully rendered page, identical across surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    /// 1-based page number.
    pub number: usize,
    pub total: usize,
    pub title: String,
    pub blocks: Vec<RenderedBlock>,
}

impl RenderedPage {
    /// Snapshot keys of every chart block on this page, in order.
    pub fn chart_keys(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                RenderedBlock::Chart { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Format a value to 2 decimals with the unit suffix when one applies.
pub fn format_value(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        format!("{value:.2}")
    } else {
        format!("{value:.2} {unit}")
    }
}

/// Truncate table rows to `MAX_TABLE_ROWS`, producing the footer text when
/// rows were dropped.
pub fn truncate_rows(rows: Vec<Vec<String>>) -> (Vec<Vec<String>>, Option<String>) {
    let total = rows.len();
    if total <= MAX_TABLE_ROWS {
        return (rows, None);
    }
    let kept: Vec<Vec<String>> = rows.into_iter().take(MAX_TABLE_ROWS).collect();
    let footer = format!("showing {MAX_TABLE_ROWS} of {total}");
    (kept, Some(footer))
}

/// Render page `number` (1-based) of the model under a visibility set.
pub fn render_page(model: &ReportModel, view: &ReportViewState, number: usize) -> RenderedPage {
    let total = model.page_count();
    let content = model
        .pages
        .get(number.saturating_sub(1))
        .unwrap_or(&PageContent::Summary);
    let (title, blocks) = match content {
        PageContent::Summary => render_summary(model, view),
        PageContent::VolumeGrid { point_ids } => render_volume_grid(model, point_ids),
        PageContent::QualityGrid { point_ids } => render_quality_grid(model, point_ids),
        PageContent::MeasurementTable => render_measurement_table(model),
    };
    RenderedPage {
        number,
        total,
        title,
        blocks,
    }
}

fn render_summary(model: &ReportModel, view: &ReportViewState) -> (String, Vec<RenderedBlock>) {
    let mut blocks = Vec::new();
    blocks.push(RenderedBlock::KeyValues(vec![
        ("Client".to_string(), model.client.name.clone()),
        ("Address".to_string(), model.client.address.clone()),
        ("Tax id".to_string(), model.client.tax_id.clone()),
        (
            "Period".to_string(),
            format!(
                "{} to {}",
                format_date(&model.range.start()),
                format_date(&model.range.end())
            ),
        ),
    ]));
    blocks.push(RenderedBlock::KeyValues(vec![
        (
            "Samples".to_string(),
            model.summary.total_samples.to_string(),
        ),
        (
            "Compliant samples".to_string(),
            model.summary.compliant_samples.to_string(),
        ),
        (
            "Compliance rate".to_string(),
            format!("{:.2}%", model.summary.compliance_rate),
        ),
    ]));

    let stats_rows: Vec<Vec<String>> = visible_stats(&model.summary, view)
        .iter()
        .map(|stats| {
            vec![
                stats.parameter.display_name().to_string(),
                stats.total_measurements.to_string(),
                format!("{:.2}%", stats.compliance_rate),
                format_value(stats.average_value, stats.parameter.unit()),
                stats.events.len().to_string(),
            ]
        })
        .collect();
    blocks.push(RenderedBlock::Table {
        title: "Parameter statistics".to_string(),
        headers: vec![
            "Parameter".to_string(),
            "Measurements".to_string(),
            "Compliance".to_string(),
            "Average".to_string(),
            "Violations".to_string(),
        ],
        rows: stats_rows,
        footer: None,
    });

    // Operator target shown for context only; scoring uses the 5.0-9.0
    // regulatory band.
    let operator = operator_ph_range();
    blocks.push(RenderedBlock::Paragraph(format!(
        "Operator pH target: {:.1} to {:.1} (display only; compliance is scored against the regulatory band).",
        operator.min.unwrap_or(0.0),
        operator.max.unwrap_or(0.0)
    )));

    blocks.push(RenderedBlock::Heading("Recommendations".to_string()));
    for recommendation in &model.summary.recommendations {
        blocks.push(RenderedBlock::Paragraph(recommendation.clone()));
    }

    ("Compliance summary".to_string(), blocks)
}

fn render_volume_grid(model: &ReportModel, point_ids: &[String]) -> (String, Vec<RenderedBlock>) {
    let mut blocks = Vec::new();
    for point_id in point_ids {
        let Some(vp) = model.volume_point(point_id) else {
            continue;
        };
        blocks.push(RenderedBlock::Heading(format!(
            "{} - {}",
            vp.point.name, vp.point.area
        )));
        blocks.push(RenderedBlock::Chart {
            key: volume_chart_key(point_id),
            title: format!("Daily consumption - {}", vp.point.name),
        });
        let mut pairs = vec![
            (
                "Total consumption".to_string(),
                format_value(vp.total_consumption, "m³"),
            ),
            (
                "Conformance".to_string(),
                format!("{:.2}%", vp.conformance.conformance_rate),
            ),
        ];
        match &vp.conformance.limit {
            Some(limit) => {
                pairs.push((
                    "Permit limit".to_string(),
                    format_value(limit.value, &limit.unit),
                ));
                pairs.push((
                    "Days over limit".to_string(),
                    vp.conformance.non_conformant_days.len().to_string(),
                ));
            }
            None => pairs.push(("Permit limit".to_string(), "not on file".to_string())),
        }
        blocks.push(RenderedBlock::KeyValues(pairs));
    }
    ("Volume and outorga conformance".to_string(), blocks)
}

fn render_quality_grid(model: &ReportModel, point_ids: &[String]) -> (String, Vec<RenderedBlock>) {
    let mut blocks = Vec::new();
    for point_id in point_ids {
        let Some(qp) = model.quality_point(point_id) else {
            continue;
        };
        blocks.push(RenderedBlock::Heading(format!(
            "{} - {}",
            qp.point.name, qp.point.area
        )));
        blocks.push(RenderedBlock::Chart {
            key: quality_chart_key(point_id),
            title: format!("Water quality - {}", qp.point.name),
        });
    }
    ("Water quality series".to_string(), blocks)
}

fn render_measurement_table(model: &ReportModel) -> (String, Vec<RenderedBlock>) {
    let mut blocks = Vec::new();

    let quality_rows: Vec<Vec<String>> = model
        .quality_events()
        .iter()
        .map(|event| {
            vec![
                event.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                event.point_id.clone(),
                event.parameter.display_name().to_string(),
                format_value(event.value, event.parameter.unit()),
                format!("{:.2}%", event.deviation_pct),
                event.risk.display_name().to_string(),
            ]
        })
        .collect();
    if !quality_rows.is_empty() {
        let (rows, footer) = truncate_rows(quality_rows);
        blocks.push(RenderedBlock::Table {
            title: "Quality non-compliances".to_string(),
            headers: vec![
                "Timestamp".to_string(),
                "Point".to_string(),
                "Parameter".to_string(),
                "Value".to_string(),
                "Deviation".to_string(),
                "Risk".to_string(),
            ],
            rows,
            footer,
        });
    }

    let volume_rows: Vec<Vec<String>> = model
        .non_conformities
        .iter()
        .map(|day| {
            vec![
                format_date(&day.date),
                day.point_id.clone(),
                format_value(day.value, "m³"),
                format_value(day.limit, "m³"),
                format!("{:.2}%", day.exceedance_pct),
            ]
        })
        .collect();
    if !volume_rows.is_empty() {
        let (rows, footer) = truncate_rows(volume_rows);
        blocks.push(RenderedBlock::Table {
            title: "Outorga non-conformities".to_string(),
            headers: vec![
                "Date".to_string(),
                "Point".to_string(),
                "Consumption".to_string(),
                "Limit".to_string(),
                "Exceedance".to_string(),
            ],
            rows,
            footer,
        });
    }

    if blocks.is_empty() {
        blocks.push(RenderedBlock::Paragraph(
            "No non-conformities recorded for the period.".to_string(),
        ));
    }

    ("Non-conformity detail".to_string(), blocks)
}

/// How a surface fills a chart slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSlot {
    Svg(String),
    /// Explicit degradation: the snapshot never stabilized.
    Placeholder,
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render a page to an HTML fragment, resolving chart slots through the
/// surface-provided closure. Everything except the chart slot contents is
/// byte-identical between surfaces.
pub fn page_html(page: &RenderedPage, mut resolve_chart: impl FnMut(&str) -> ChartSlot) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        "<section class=\"page\" id=\"page-{}\">\n<h1>{}</h1>\n",
        page.number,
        html_escape(&page.title)
    ));
    for block in &page.blocks {
        match block {
            RenderedBlock::Heading(text) => {
                html.push_str(&format!("<h2>{}</h2>\n", html_escape(text)));
            }
            RenderedBlock::Paragraph(text) => {
                html.push_str(&format!("<p>{}</p>\n", html_escape(text)));
            }
            RenderedBlock::KeyValues(pairs) => {
                html.push_str("<dl>\n");
                for (key, value) in pairs {
                    html.push_str(&format!(
                        "<dt>{}</dt><dd>{}</dd>\n",
                        html_escape(key),
                        html_escape(value)
                    ));
                }
                html.push_str("</dl>\n");
            }
            RenderedBlock::Table {
                title,
                headers,
                rows,
                footer,
            } => {
                html.push_str(&format!(
                    "<h3>{}</h3>\n<table>\n<thead><tr>",
                    html_escape(title)
                ));
                for header in headers {
                    html.push_str(&format!("<th>{}</th>", html_escape(header)));
                }
                html.push_str("</tr></thead>\n<tbody>\n");
                for row in rows {
                    html.push_str("<tr>");
                    for cell in row {
                        html.push_str(&format!("<td>{}</td>", html_escape(cell)));
                    }
                    html.push_str("</tr>\n");
                }
                html.push_str("</tbody>\n</table>\n");
                if let Some(footer) = footer {
                    html.push_str(&format!(
                        "<p class=\"table-footer\">{}</p>\n",
                        html_escape(footer)
                    ));
                }
            }
            RenderedBlock::Chart { key, title } => match resolve_chart(key) {
                ChartSlot::Svg(svg) => {
                    html.push_str(&format!(
                        "<figure class=\"chart\" data-key=\"{}\">{}<figcaption>{}</figcaption></figure>\n",
                        html_escape(key),
                        svg,
                        html_escape(title)
                    ));
                }
                ChartSlot::Placeholder => {
                    html.push_str(&format!(
                        "<div class=\"chart-placeholder\" data-key=\"{}\">chart unavailable: {}</div>\n",
                        html_escape(key),
                        html_escape(title)
                    ));
                }
            },
        }
    }
    html.push_str(&format!(
        "<footer>Page {} of {}</footer>\n</section>\n",
        page.number, page.total
    ));
    html
}

/// Plain-text rendering for terminal inspection. Charts appear as their
/// titles only.
pub fn page_text(page: &RenderedPage) -> String {
    let mut text = String::new();
    text.push_str(&format!("=== {} (page {}/{}) ===\n", page.title, page.number, page.total));
    for block in &page.blocks {
        match block {
            RenderedBlock::Heading(heading) => text.push_str(&format!("\n## {heading}\n")),
            RenderedBlock::Paragraph(paragraph) => text.push_str(&format!("{paragraph}\n")),
            RenderedBlock::KeyValues(pairs) => {
                for (key, value) in pairs {
                    text.push_str(&format!("{key}: {value}\n"));
                }
            }
            RenderedBlock::Table {
                title,
                headers,
                rows,
                footer,
            } => {
                text.push_str(&format!("\n{title}\n"));
                text.push_str(&format!("{}\n", headers.join(" | ")));
                for row in rows {
                    text.push_str(&format!("{}\n", row.join(" | ")));
                }
                if let Some(footer) = footer {
                    text.push_str(&format!("({footer})\n"));
                }
            }
            RenderedBlock::Chart { title, .. } => {
                text.push_str(&format!("[chart: {title}]\n"));
            }
        }
    }
    text
}
