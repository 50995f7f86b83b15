//! Standalone HTML grid renderer
//!
//! Generates a self-contained HTML page with the pivot rendered as a colored
//! Gantt-style table: the three identity columns pinned to the left, one
//! column per time bucket, cell backgrounds from the stage colors and cell
//! labels showing the allocation percentage.

use allocgantt_core::{CellValue, PivotTable, RenderError, Renderer, FIXED_COLUMNS};
use std::fmt::Write as _;

/// Smallest and largest accepted zoom (bucket column width hint, px)
pub const ZOOM_MIN: u32 = 40;
pub const ZOOM_MAX: u32 = 200;

/// HTML grid renderer configuration
#[derive(Clone, Debug)]
pub struct HtmlGridRenderer {
    /// Page title
    pub title: String,
    /// Bucket column width hint in pixels (clamped to 40..=200)
    pub zoom: u32,
    /// Height of the scrollable grid viewport in pixels
    pub viewport_height: u32,
    /// Width of each pinned identity column in pixels
    pub pinned_width: u32,
}

impl Default for HtmlGridRenderer {
    fn default() -> Self {
        Self {
            title: "Painel de Alocação de Pessoas".into(),
            zoom: 80,
            viewport_height: 750,
            pinned_width: 140,
        }
    }
}

impl HtmlGridRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the bucket column width hint, clamped to the accepted range
    pub fn zoom(mut self, zoom: u32) -> Self {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        self
    }

    /// Set the viewport height
    pub fn viewport_height(mut self, height: u32) -> Self {
        self.viewport_height = height;
        self
    }

    /// Minimum width of a bucket column, derived from the zoom hint
    fn bucket_min_width(&self) -> u32 {
        (self.zoom.saturating_sub(15)).max(45)
    }

    /// Maximum width of a bucket column
    fn bucket_max_width(&self) -> u32 {
        self.zoom + 15
    }

    fn styles(&self) -> String {
        format!(
            r#"    body {{ font-family: system-ui, -apple-system, sans-serif; margin: 16px; }}
    h1 {{ font-size: 20px; }}
    .grid-viewport {{ height: {viewport}px; overflow: auto; border: 1px solid #ccc; }}
    table.grid {{ border-collapse: separate; border-spacing: 0; }}
    .grid th {{
      font-size: 10px; text-align: center; white-space: normal; line-height: 1.1em;
      background: #f3f3f3; position: sticky; top: 0; z-index: 2;
      border: 0.5px solid #777; padding: 2px;
    }}
    .grid td {{
      font-size: 11px; text-align: center; padding: 0;
      border: 0.5px solid #777; color: #000; font-weight: bold;
    }}
    .grid td.bucket {{ min-width: {min_w}px; max-width: {max_w}px; }}
    .grid th.pinned, .grid td.pinned {{
      position: sticky; z-index: 3; background: #fff; text-align: left;
      min-width: {pin_w}px; max-width: {pin_w}px; padding: 2px 4px; font-weight: normal;
    }}
    .grid th.pinned {{ z-index: 4; background: #f3f3f3; }}
"#,
            viewport = self.viewport_height,
            min_w = self.bucket_min_width(),
            max_w = self.bucket_max_width(),
            pin_w = self.pinned_width,
        )
    }

    fn render_header_row(&self, pivot: &PivotTable) -> String {
        let mut html = String::from("      <tr>\n");
        for (idx, name) in FIXED_COLUMNS.iter().enumerate() {
            let left = idx as u32 * self.pinned_width;
            let _ = writeln!(
                html,
                r#"        <th class="pinned" style="left: {left}px">{}</th>"#,
                html_escape(name)
            );
        }
        for label in &pivot.bucket_columns {
            let _ = writeln!(html, "        <th>{}</th>", html_escape(label));
        }
        html.push_str("      </tr>\n");
        html
    }

    fn render_cell(cell: &CellValue) -> String {
        let label = cell
            .pct_label()
            .map(|pct| format!("{pct}%"))
            .unwrap_or_default();
        format!(
            r#"        <td class="bucket" style="background-color: {}">{}</td>"#,
            html_escape(&cell.color),
            label
        )
    }
}

impl Renderer for HtmlGridRenderer {
    type Output = String;

    fn render(&self, pivot: &PivotTable) -> Result<String, RenderError> {
        let mut body = String::new();

        body.push_str(&self.render_header_row(pivot));
        for row in &pivot.rows {
            body.push_str("      <tr>\n");
            let stage_label = row.stage.label();
            let pinned = [
                row.person.as_str(),
                row.process.as_str(),
                stage_label.as_str(),
            ];
            for (idx, value) in pinned.iter().enumerate() {
                let left = idx as u32 * self.pinned_width;
                let _ = writeln!(
                    body,
                    r#"        <td class="pinned" style="left: {left}px">{}</td>"#,
                    html_escape(value)
                );
            }
            for cell in &row.cells {
                body.push_str(&Self::render_cell(cell));
                body.push('\n');
            }
            body.push_str("      </tr>\n");
        }

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>
{styles}  </style>
</head>
<body>
  <h1>{title}</h1>
  <div class="grid-viewport">
    <table class="grid">
{body}    </table>
  </div>
</body>
</html>
"#,
            title = html_escape(&self.title),
            styles = self.styles(),
            body = body,
        ))
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
