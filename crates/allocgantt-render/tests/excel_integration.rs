//! Integration tests for the Excel export

use allocgantt_core::{date, DateWindow, Filters, Renderer, SourceRow, StageSpan};
use allocgantt_pivot::build_pivot;
use allocgantt_render::ExcelExporter;

fn sample_pivot() -> allocgantt_core::PivotTable {
    let rows = vec![
        SourceRow::new("CRM Rollout")
            .head("Ana")
            .analyst("Bruno")
            .stage(
                0,
                StageSpan::dates(date(2024, 1, 10), date(2024, 1, 12))
                    .head_pct(0.5)
                    .analyst_pct(0.25),
            ),
        SourceRow::new("Data Platform")
            .head("Carla")
            .stage(1, StageSpan::dates(date(2024, 1, 15), date(2024, 1, 18)).head_pct(1.0)),
    ];
    let filters = Filters::for_window(DateWindow::new(date(2024, 1, 1), date(2024, 1, 31)));
    build_pivot(&rows, &filters).unwrap()
}

#[test]
fn export_produces_a_valid_workbook() {
    let xlsx = ExcelExporter::new().render(&sample_pivot()).unwrap();

    // Valid XLSX files are zip archives (PK signature)
    assert!(xlsx.len() > 100);
    assert_eq!(&xlsx[0..2], b"PK");
}

#[test]
fn export_accepts_custom_sheet_name() {
    let exporter = ExcelExporter::new().sheet_name("Alocacao");
    let xlsx = exporter.render_to_bytes(&sample_pivot()).unwrap();
    assert_eq!(&xlsx[0..2], b"PK");
}

#[test]
fn export_handles_an_all_blank_column_row() {
    // A pivot whose rows carry blank cells only in some buckets still
    // serializes; blanks get no fill, populated cells do
    let pivot = sample_pivot();
    assert!(pivot
        .rows
        .iter()
        .any(|r| r.cells.iter().any(|c| c.is_blank())));

    let xlsx = ExcelExporter::new().render(&pivot).unwrap();
    assert!(xlsx.len() > 100);
}
