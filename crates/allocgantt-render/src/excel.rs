//! Colorized Excel export
//!
//! Re-serializes the pivot into a single-sheet workbook: header row with the
//! pivot columns, bucket cells carrying only the decoded percentage text,
//! and a solid background fill recomputed from the row's stage label so the
//! coloring survives later edits to the cell text.

use allocgantt_core::{stage_color, PivotTable, RenderError, Renderer, FIXED_COLUMNS};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};

/// Default export file name
pub const DEFAULT_EXPORT_NAME: &str = "Gantt_Alocacao.xlsx";

/// Excel export renderer
#[derive(Clone, Debug)]
pub struct ExcelExporter {
    /// Worksheet name
    pub sheet_name: String,
    /// Width of the identity columns
    pub identity_width: u16,
    /// Width of the bucket columns
    pub bucket_width: u16,
}

impl Default for ExcelExporter {
    fn default() -> Self {
        Self {
            sheet_name: "Gantt".into(),
            identity_width: 22,
            bucket_width: 9,
        }
    }
}

impl ExcelExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worksheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Generate the workbook bytes
    pub fn render_to_bytes(&self, pivot: &PivotTable) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&self.sheet_name)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);
        let text = Format::new().set_border(FormatBorder::Thin);

        // Header row
        for (col, name) in pivot.columns().iter().enumerate() {
            sheet
                .write_with_format(0, col as u16, name, &header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        // Column widths
        for col in 0..FIXED_COLUMNS.len() as u16 {
            sheet.set_column_width(col, self.identity_width).ok();
        }
        for offset in 0..pivot.bucket_columns.len() as u16 {
            sheet
                .set_column_width(FIXED_COLUMNS.len() as u16 + offset, self.bucket_width)
                .ok();
        }

        // Data rows
        for (idx, pivot_row) in pivot.rows.iter().enumerate() {
            let row = idx as u32 + 1;
            let stage_label = pivot_row.stage.label();

            sheet
                .write_with_format(row, 0, &pivot_row.person, &text)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            sheet
                .write_with_format(row, 1, &pivot_row.process, &text)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            sheet
                .write_with_format(row, 2, &stage_label, &text)
                .map_err(|e| RenderError::Format(e.to_string()))?;

            for (offset, cell) in pivot_row.cells.iter().enumerate() {
                let col = FIXED_COLUMNS.len() as u16 + offset as u16;
                let value = cell.pct_label().unwrap_or_default();

                // Fill only populated cells; the color comes from the stage
                // label, not from the stored cell color
                if !value.is_empty() && value != "0" {
                    let fill = Format::new()
                        .set_background_color(rgb(stage_color(&stage_label)))
                        .set_align(FormatAlign::Center)
                        .set_border(FormatBorder::Thin);
                    sheet
                        .write_with_format(row, col, &value, &fill)
                        .map_err(|e| RenderError::Format(e.to_string()))?;
                } else {
                    sheet
                        .write_with_format(row, col, &value, &text)
                        .map_err(|e| RenderError::Format(e.to_string()))?;
                }
            }
        }

        // Keep the identity columns and header in view while scrolling
        sheet
            .set_freeze_panes(1, FIXED_COLUMNS.len() as u16)
            .ok();

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("failed to create Excel: {e}")))
    }
}

impl Renderer for ExcelExporter {
    type Output = Vec<u8>;

    fn render(&self, pivot: &PivotTable) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(pivot)
    }
}

/// `#RRGGBB` hex to the numeric color rust_xlsxwriter expects
fn rgb(hex: &str) -> u32 {
    u32::from_str_radix(hex.trim_start_matches('#'), 16).unwrap_or(0xFFFFFF)
}
