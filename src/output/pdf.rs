//! PDF rendering of finished reports

use crate::output::canvas::{wrap_text, Canvas, Font, Rgb, MARGIN, PAGE_WIDTH};
use crate::storage::ReportRecord;
use chrono::DateTime;

pub const REPORT_HEADING: &str = "SiteSage SEO Report";
pub const NO_SUMMARY: &str = "No AI summary available.";
pub const NO_RECOMMENDATIONS: &str = "No specific recommendations available.";
const NOT_AVAILABLE: &str = "N/A";

const DARK_BLUE: Rgb = Rgb(0.0, 0.0, 0.545);
const DARK_GREY: Rgb = Rgb(0.663, 0.663, 0.663);
const RED: Rgb = Rgb(1.0, 0.0, 0.0);
const ORANGE: Rgb = Rgb(1.0, 0.647, 0.0);
const DARK_GREEN: Rgb = Rgb(0.0, 0.392, 0.0);
const TABLE_HEADER: Rgb = Rgb(0.949, 0.949, 0.949);
const TABLE_GRID: Rgb = Rgb(0.8, 0.8, 0.8);

const BODY_SIZE: f32 = 10.0;
const BODY_LEADING: f32 = 14.0;
const CELL_PADDING_X: f32 = 10.0;
const CELL_PADDING_Y: f32 = 5.0;

/// Read-only data a report PDF is rendered from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportView {
    pub url: String,
    pub seo_score: Option<u32>,
    pub ai_summary: Option<String>,
    pub ai_recommendations: Option<Vec<String>>,
    pub raw_metrics: Option<serde_json::Value>,
    pub load_time_ms: Option<u64>,
    pub created_at: Option<String>,
}

impl From<&ReportRecord> for ReportView {
    fn from(report: &ReportRecord) -> Self {
        Self {
            url: report.url.clone(),
            seo_score: report.seo_score,
            ai_summary: report.ai_summary.clone(),
            ai_recommendations: report.ai_recommendations.clone(),
            raw_metrics: report.raw_metrics.clone(),
            load_time_ms: report.load_time_ms,
            created_at: Some(report.created_at.clone()),
        }
    }
}

impl ReportView {
    fn metric(&self, key: &str) -> String {
        match self.raw_metrics.as_ref().and_then(|m| m.get(key)) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => NOT_AVAILABLE.to_string(),
            Some(other) => other.to_string(),
        }
    }

    fn date_line(&self) -> String {
        let date = match self.created_at.as_deref() {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|_| raw.to_string()),
            None => NOT_AVAILABLE.to_string(),
        };
        format!("Date: {}", date)
    }

    fn metric_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Title", self.metric("title")),
            ("Meta Description", self.metric("meta_description")),
            ("H1 Count", self.metric("h1_count")),
            ("H2 Count", self.metric("h2_count")),
            ("Images Missing Alt", self.metric("images_missing_alt")),
            (
                "Load Time (ms)",
                self.load_time_ms
                    .map(|ms| ms.to_string())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ),
        ]
    }
}

/// Color band for a score: red below 50, orange up to 80, green above
pub fn score_color(score: u32) -> Rgb {
    match score {
        0..=49 => RED,
        50..=80 => ORANGE,
        _ => DARK_GREEN,
    }
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
}

/// Wraps and draws a paragraph, breaking pages as needed
#[allow(clippy::too_many_arguments)]
fn paragraph(
    canvas: &mut Canvas,
    text: &str,
    font: Font,
    size: f32,
    leading: f32,
    color: Rgb,
    x: f32,
    width: f32,
    align: Align,
) {
    for line in wrap_text(text, font, size, width) {
        canvas.ensure_space(leading);
        canvas.advance(leading);
        let line_x = match align {
            Align::Left => x,
            Align::Center => x + (width - font.text_width(&line, size)) / 2.0,
        };
        canvas.text(line_x, canvas.cursor(), font, size, color, &line);
    }
}

fn section_header(canvas: &mut Canvas, title: &str) {
    canvas.ensure_space(20.0 + 22.0 + BODY_LEADING);
    canvas.advance(20.0);
    paragraph(
        canvas,
        title,
        Font::Bold,
        18.0,
        22.0,
        Rgb::BLACK,
        MARGIN,
        content_width(),
        Align::Left,
    );
    canvas.advance(10.0);
}

fn content_width() -> f32 {
    PAGE_WIDTH - 2.0 * MARGIN
}

fn metrics_table(canvas: &mut Canvas, rows: &[(&str, String)]) {
    let width = content_width();
    let label_width = width * 0.35;
    let value_width = width - label_width;
    let text_width = value_width - 2.0 * CELL_PADDING_X;

    let draw_row = |canvas: &mut Canvas, label: &str, value: &str, header: bool| {
        let font = if header { Font::Bold } else { Font::Regular };
        let label_lines = wrap_text(label, font, BODY_SIZE, label_width - 2.0 * CELL_PADDING_X);
        let value_lines = wrap_text(value, font, BODY_SIZE, text_width);
        let line_count = label_lines.len().max(value_lines.len()) as f32;
        let padding = if header { 8.0 } else { CELL_PADDING_Y };
        let height = line_count * BODY_LEADING + 2.0 * padding;

        canvas.ensure_space(height);
        let top = canvas.cursor();
        let bottom = top - height;

        if header {
            canvas.fill_rect(MARGIN, bottom, width, height, TABLE_HEADER);
        }
        canvas.stroke_rect(MARGIN, bottom, label_width, height, TABLE_GRID);
        canvas.stroke_rect(MARGIN + label_width, bottom, value_width, height, TABLE_GRID);

        for (column_x, lines) in [
            (MARGIN + CELL_PADDING_X, &label_lines),
            (MARGIN + label_width + CELL_PADDING_X, &value_lines),
        ] {
            let mut baseline = top - padding - BODY_SIZE;
            for line in lines {
                canvas.text(column_x, baseline, font, BODY_SIZE, Rgb::BLACK, line);
                baseline -= BODY_LEADING;
            }
        }

        canvas.advance(height);
    };

    draw_row(canvas, "Metric", "Value", true);
    for (label, value) in rows {
        draw_row(canvas, label, value, false);
    }
}

/// Renders a report as PDF bytes
///
/// Absent values are shown as `N/A` or a fixed fallback text, so any report
/// renders. Errors only come from serializing the document.
pub fn render_report_pdf(view: &ReportView) -> Result<Vec<u8>, lopdf::Error> {
    let mut canvas = Canvas::new();
    let width = content_width();

    // Header
    paragraph(
        &mut canvas,
        REPORT_HEADING,
        Font::Bold,
        28.0,
        34.0,
        DARK_BLUE,
        MARGIN,
        width,
        Align::Center,
    );
    canvas.advance(8.0);
    let url_line = format!("URL: {}", view.url);
    for line in [url_line, view.date_line()] {
        paragraph(
            &mut canvas,
            &line,
            Font::Regular,
            10.0,
            12.0,
            DARK_GREY,
            MARGIN,
            width,
            Align::Center,
        );
        canvas.advance(8.0);
    }

    // Score
    let score = view.seo_score.unwrap_or(0);
    canvas.advance(12.0);
    paragraph(
        &mut canvas,
        &score.to_string(),
        Font::Bold,
        56.0,
        60.0,
        score_color(score),
        MARGIN,
        width,
        Align::Center,
    );
    canvas.advance(18.0);

    // Executive summary
    section_header(&mut canvas, "Executive Summary");
    let summary = view
        .ai_summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NO_SUMMARY);
    for block in summary.split("\n\n") {
        paragraph(
            &mut canvas,
            block,
            Font::Regular,
            BODY_SIZE,
            BODY_LEADING,
            Rgb::BLACK,
            MARGIN,
            width,
            Align::Left,
        );
        canvas.advance(6.0);
    }

    // Metrics
    section_header(&mut canvas, "Key Metrics");
    metrics_table(&mut canvas, &view.metric_rows());
    canvas.advance(14.0);

    // Recommendations
    section_header(&mut canvas, "AI Recommendations");
    let fallback = [NO_RECOMMENDATIONS.to_string()];
    let recommendations = match view.ai_recommendations.as_deref() {
        Some(recs) if !recs.is_empty() => recs,
        _ => &fallback[..],
    };
    for recommendation in recommendations {
        paragraph(
            &mut canvas,
            &format!("\u{2022} {}", recommendation),
            Font::Regular,
            BODY_SIZE,
            BODY_LEADING,
            Rgb::BLACK,
            MARGIN,
            width,
            Align::Left,
        );
        canvas.advance(6.0);
    }

    canvas.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object};
    use serde_json::json;

    struct Rendered {
        page_count: usize,
        operations: Vec<Operation>,
    }

    impl Rendered {
        fn parse(bytes: &[u8]) -> Self {
            assert!(bytes.starts_with(b"%PDF"));
            let doc = Document::load_mem(bytes).unwrap();
            let pages = doc.get_pages();
            let operations = pages
                .values()
                .flat_map(|page_id| {
                    let content = doc.get_page_content(*page_id).unwrap();
                    Content::decode(&content).unwrap().operations
                })
                .collect();
            Self {
                page_count: pages.len(),
                operations,
            }
        }

        /// Shown text runs, decoded from WinAnsi as Latin-1
        fn lines(&self) -> Vec<String> {
            self.operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(bytes, _)) => {
                        Some(bytes.iter().map(|&b| char::from(b)).collect())
                    }
                    _ => None,
                })
                .collect()
        }

        fn has_line(&self, text: &str) -> bool {
            self.lines().iter().any(|line| line == text)
        }

        fn uses_fill_color(&self, color: Rgb) -> bool {
            self.operations
                .iter()
                .filter(|op| op.operator == "rg")
                .any(|op| {
                    let channels: Vec<f32> = op
                        .operands
                        .iter()
                        .filter_map(|o| o.as_float().ok())
                        .collect();
                    channels.len() == 3
                        && (channels[0] - color.0).abs() < 0.01
                        && (channels[1] - color.1).abs() < 0.01
                        && (channels[2] - color.2).abs() < 0.01
                })
        }
    }

    fn render(view: &ReportView) -> Rendered {
        Rendered::parse(&render_report_pdf(view).unwrap())
    }

    fn sample_view() -> ReportView {
        ReportView {
            url: "https://example.com/".to_string(),
            seo_score: Some(85),
            ai_summary: Some("The page is in good shape.".to_string()),
            ai_recommendations: Some(vec![
                "Add a meta description".to_string(),
                "Compress images".to_string(),
            ]),
            raw_metrics: Some(json!({
                "title": "Example Domain",
                "meta_description": "Missing",
                "h1_count": 1,
                "h2_count": 0,
                "images_missing_alt": 2
            })),
            load_time_ms: Some(340),
            created_at: Some("2026-03-04T05:06:07.000000Z".to_string()),
        }
    }

    #[test]
    fn test_score_color_bands() {
        assert_eq!(score_color(0), RED);
        assert_eq!(score_color(49), RED);
        assert_eq!(score_color(50), ORANGE);
        assert_eq!(score_color(80), ORANGE);
        assert_eq!(score_color(81), DARK_GREEN);
        assert_eq!(score_color(100), DARK_GREEN);
    }

    #[test]
    fn test_render_contains_sections() {
        let pdf = render(&sample_view());

        assert_eq!(pdf.page_count, 1);
        for line in [
            REPORT_HEADING,
            "URL: https://example.com/",
            "Date: 2026-03-04 05:06:07",
            "85",
            "Executive Summary",
            "The page is in good shape.",
            "Key Metrics",
            "Example Domain",
            "Load Time (ms)",
            "340",
            "AI Recommendations",
            "\u{95} Compress images",
        ] {
            assert!(pdf.has_line(line), "missing line {:?}", line);
        }
        assert!(pdf.uses_fill_color(DARK_GREEN));
    }

    #[test]
    fn test_render_fallbacks_for_empty_report() {
        let view = ReportView {
            url: "https://example.com/".to_string(),
            ..Default::default()
        };
        let pdf = render(&view);

        assert!(pdf.has_line(NO_SUMMARY));
        assert!(pdf.has_line(&format!("\u{95} {}", NO_RECOMMENDATIONS)));
        assert!(pdf.has_line("N/A"));
        assert!(pdf.has_line("Date: N/A"));
        // missing score renders as 0 in red
        assert!(pdf.has_line("0"));
        assert!(pdf.uses_fill_color(RED));
    }

    #[test]
    fn test_blank_summary_uses_fallback() {
        let view = ReportView {
            ai_summary: Some("   ".to_string()),
            ai_recommendations: Some(vec![]),
            ..sample_view()
        };
        let pdf = render(&view);

        assert!(pdf.has_line(NO_SUMMARY));
        assert!(pdf.has_line(&format!("\u{95} {}", NO_RECOMMENDATIONS)));
    }

    #[test]
    fn test_non_latin1_text_is_replaced() {
        let view = ReportView {
            ai_summary: Some("Google \u{25a0} Gemini caf\u{e9}".to_string()),
            ..sample_view()
        };
        let pdf = render(&view);

        assert!(pdf.has_line("Google ? Gemini caf\u{e9}"));
    }

    #[test]
    fn test_long_content_spans_pages() {
        let view = ReportView {
            ai_recommendations: Some(
                (0..120)
                    .map(|i| format!("Recommendation number {} with some extra words", i))
                    .collect(),
            ),
            ..sample_view()
        };
        let pdf = render(&view);

        assert!(pdf.page_count > 1);
        assert!(pdf.has_line("\u{95} Recommendation number 119 with some extra words"));
    }
}
