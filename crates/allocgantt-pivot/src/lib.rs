//! # allocgantt-pivot
//!
//! The reshaping pipeline: turns a wide per-stage source table into the
//! per-person, per-day pivot behind the allocation Gantt grid.
//!
//! The whole pipeline is the pure function [`build_pivot`], recomputed from
//! scratch on every call; no state is retained between runs. Stages, in
//! order:
//!
//! 1. unpivot wide stage columns into long allocation records
//! 2. drop records outside the date window, then apply the role filter
//! 3. expand each survivor into one row per in-window calendar day
//! 4. apply the person filter
//! 5. derive the chronological bucket column order
//! 6. group by (person, process, stage) with first-value-wins cells
//!
//! ## Example
//!
//! ```rust
//! use allocgantt_core::{date, DateWindow, Filters, SourceRow, StageSpan};
//! use allocgantt_pivot::build_pivot;
//!
//! let rows = vec![SourceRow::new("CRM Rollout")
//!     .head("Ana")
//!     .stage(0, StageSpan::dates(date(2024, 1, 10), date(2024, 1, 12)).head_pct(0.5))];
//! let filters = Filters::for_window(DateWindow::new(date(2024, 1, 1), date(2024, 1, 31)));
//!
//! let pivot = build_pivot(&rows, &filters).unwrap();
//! assert_eq!(pivot.bucket_columns, vec!["10/Jan", "11/Jan", "12/Jan"]);
//! ```

pub mod bucket;
pub mod expand;
pub mod unpivot;

use std::collections::{BTreeMap, HashMap};

use allocgantt_core::{
    AllocationRecord, CellValue, DailyAllocation, Filters, PersonFilter, PivotError, PivotRow,
    PivotTable, RoleFilter, SourceRow, Stage,
};

pub use bucket::{bucket_label, bucket_order};
pub use expand::{expand_daily, retain_overlapping};
pub use unpivot::unpivot;

/// Build the allocation pivot for one source table and filter set.
///
/// Two terminal conditions halt the run: an input that unpivots to zero
/// records ([`PivotError::NoRecords`]), and a date window plus role filter
/// that remove every record ([`PivotError::NoDataInFilters`]). The person
/// multi-select is not terminal: selecting nobody with data simply yields an
/// empty grid. Everything else is permissive: absent identities and
/// percentages default silently, never error.
pub fn build_pivot(rows: &[SourceRow], filters: &Filters) -> Result<PivotTable, PivotError> {
    let records = unpivot(rows);
    if records.is_empty() {
        return Err(PivotError::NoRecords);
    }

    let records = retain_overlapping(records, &filters.window);
    let records = retain_role(records, filters.role);
    if records.is_empty() {
        return Err(PivotError::NoDataInFilters);
    }

    let daily = expand_daily(&records, &filters.window);
    let daily = retain_people(daily, &filters.people);

    Ok(pivot_daily(&daily, filters))
}

fn retain_role(records: Vec<AllocationRecord>, filter: RoleFilter) -> Vec<AllocationRecord> {
    records
        .into_iter()
        .filter(|r| filter.matches(r.role))
        .collect()
}

fn retain_people(daily: Vec<DailyAllocation>, filter: &PersonFilter) -> Vec<DailyAllocation> {
    daily
        .into_iter()
        .filter(|r| filter.matches(&r.person))
        .collect()
}

/// Group daily rows into the wide pivot.
///
/// Rows are keyed and sorted by the (person, process, stage) triple. Cells
/// take the first value encountered per (triple, bucket) in canonical
/// source-row-then-day order; later days collapsing into the same bucket are
/// ignored rather than aggregated. Missing combinations fill white/blank.
fn pivot_daily(daily: &[DailyAllocation], filters: &Filters) -> PivotTable {
    let bucket_columns = bucket_order(daily.iter().map(|r| r.date), filters.scale);
    let column_index: HashMap<&str, usize> = bucket_columns
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();

    let mut groups: BTreeMap<(String, String, Stage), Vec<Option<CellValue>>> = BTreeMap::new();

    for row in daily {
        let key = (row.person.clone(), row.process.clone(), row.stage);
        let cells = groups
            .entry(key)
            .or_insert_with(|| vec![None; bucket_columns.len()]);

        let label = bucket_label(row.date, filters.scale);
        let index = column_index[label.as_str()];
        if cells[index].is_none() {
            cells[index] = Some(CellValue::for_stage(row.stage, row.pct));
        }
    }

    let rows = groups
        .into_iter()
        .map(|((person, process, stage), cells)| PivotRow {
            person,
            process,
            stage,
            cells: cells
                .into_iter()
                .map(|cell| cell.unwrap_or_default())
                .collect(),
        })
        .collect();

    PivotTable {
        bucket_columns,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocgantt_core::{date, DateWindow, Role, StageSpan, TimeScale, COLOR_BLANK};
    use pretty_assertions::assert_eq;

    fn window_jan() -> DateWindow {
        DateWindow::new(date(2024, 1, 1), date(2024, 1, 31))
    }

    fn ana_row() -> SourceRow {
        SourceRow::new("CRM Rollout")
            .head("Ana")
            .stage(0, StageSpan::dates(date(2024, 1, 10), date(2024, 1, 12)).head_pct(0.5))
    }

    #[test]
    fn no_records_is_terminal() {
        let filters = Filters::for_window(window_jan());
        assert_eq!(build_pivot(&[], &filters), Err(PivotError::NoRecords));

        let undated = vec![SourceRow::new("Programa A").head("Ana")];
        assert_eq!(build_pivot(&undated, &filters), Err(PivotError::NoRecords));
    }

    #[test]
    fn window_before_all_records_is_terminal() {
        let filters =
            Filters::for_window(DateWindow::new(date(2023, 1, 1), date(2023, 12, 31)));
        assert_eq!(
            build_pivot(&[ana_row()], &filters),
            Err(PivotError::NoDataInFilters)
        );
    }

    #[test]
    fn role_filter_to_empty_is_terminal() {
        let filters = Filters::for_window(window_jan()).role(RoleFilter::Analyst);
        assert_eq!(
            build_pivot(&[ana_row()], &filters),
            Err(PivotError::NoDataInFilters)
        );
    }

    #[test]
    fn person_filter_to_empty_yields_an_empty_grid() {
        // Unlike the window and role filters, selecting nobody with data is
        // not terminal: the pivot comes back empty
        let filters = Filters::for_window(window_jan())
            .people(PersonFilter::Only(vec!["Carla".into()]));
        let pivot = build_pivot(&[ana_row()], &filters).unwrap();
        assert!(pivot.is_empty());
        assert!(pivot.bucket_columns.is_empty());
    }

    #[test]
    fn role_filter_keeps_only_that_role() {
        let rows = vec![SourceRow::new("Programa A")
            .head("Ana")
            .analyst("Bruno")
            .stage(0, StageSpan::dates(date(2024, 1, 10), date(2024, 1, 10)))];
        let filters = Filters::for_window(window_jan()).role(RoleFilter::Head);
        let pivot = build_pivot(&rows, &filters).unwrap();
        assert_eq!(pivot.rows.len(), 1);
        assert_eq!(pivot.rows[0].person, "Ana");
    }

    #[test]
    fn person_filter_restricts_rows() {
        let rows = vec![SourceRow::new("Programa A")
            .head("Ana")
            .analyst("Bruno")
            .stage(0, StageSpan::dates(date(2024, 1, 10), date(2024, 1, 10)))];
        let filters = Filters::for_window(window_jan())
            .people(PersonFilter::Only(vec!["Bruno".into()]));
        let pivot = build_pivot(&rows, &filters).unwrap();
        assert_eq!(pivot.rows.len(), 1);
        assert_eq!(pivot.rows[0].person, "Bruno");
    }

    #[test]
    fn rows_sort_by_person_process_stage() {
        let rows = vec![
            SourceRow::new("Zeta")
                .head("Bruno")
                .stage(1, StageSpan::dates(date(2024, 1, 5), date(2024, 1, 5))),
            SourceRow::new("Alfa")
                .head("Bruno")
                .stage(0, StageSpan::dates(date(2024, 1, 5), date(2024, 1, 5))),
            SourceRow::new("Alfa")
                .head("Ana")
                .stage(0, StageSpan::dates(date(2024, 1, 5), date(2024, 1, 5))),
        ];
        let pivot = build_pivot(&rows, &Filters::for_window(window_jan())).unwrap();
        let keys: Vec<(String, String, Stage)> = pivot
            .rows
            .iter()
            .map(|r| (r.person.clone(), r.process.clone(), r.stage))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Ana".into(), "Alfa".into(), Stage::One),
                ("Bruno".into(), "Alfa".into(), Stage::One),
                ("Bruno".into(), "Zeta".into(), Stage::Two),
            ]
        );
    }

    #[test]
    fn fortnight_collisions_keep_first_value() {
        // Two distinct days in the same half-month with different
        // percentages: the earlier day's encoding survives
        let rows = vec![
            SourceRow::new("Programa A")
                .head("Ana")
                .stage(0, StageSpan::dates(date(2024, 1, 2), date(2024, 1, 2)).head_pct(0.2)),
            SourceRow::new("Programa A")
                .head("Ana")
                .stage(0, StageSpan::dates(date(2024, 1, 9), date(2024, 1, 9)).head_pct(0.9)),
        ];
        let filters = Filters::for_window(window_jan()).scale(TimeScale::Fortnightly);
        let pivot = build_pivot(&rows, &filters).unwrap();
        assert_eq!(pivot.bucket_columns, vec!["Jan/2024 - 1ª"]);
        assert_eq!(pivot.rows.len(), 1);
        assert_eq!(pivot.rows[0].cells[0].pct, Some(0.2));
    }

    #[test]
    fn missing_combinations_fill_blank() {
        let rows = vec![
            SourceRow::new("Programa A")
                .head("Ana")
                .stage(0, StageSpan::dates(date(2024, 1, 10), date(2024, 1, 10)).head_pct(0.5)),
            SourceRow::new("Programa B")
                .head("Bruno")
                .stage(0, StageSpan::dates(date(2024, 1, 11), date(2024, 1, 11)).head_pct(0.8)),
        ];
        let pivot = build_pivot(&rows, &Filters::for_window(window_jan())).unwrap();
        assert_eq!(pivot.bucket_columns, vec!["10/Jan", "11/Jan"]);
        // Ana has no 11/Jan value, Bruno no 10/Jan value
        assert_eq!(pivot.rows[0].cells[1].color, COLOR_BLANK);
        assert_eq!(pivot.rows[0].cells[1].pct, None);
        assert_eq!(pivot.rows[1].cells[0].color, COLOR_BLANK);
    }

    #[test]
    fn pivot_is_idempotent_on_deduplicated_input() {
        let rows = vec![ana_row()];
        let filters = Filters::for_window(window_jan());
        let first = build_pivot(&rows, &filters).unwrap();

        // Re-group the pivot's own daily-equivalent rows: each populated
        // cell maps back to one singleton group, so nothing changes
        let daily: Vec<DailyAllocation> = first
            .rows
            .iter()
            .flat_map(|row| {
                first
                    .bucket_columns
                    .iter()
                    .zip(&row.cells)
                    .filter(|(_, cell)| !cell.is_blank())
                    .map(|(label, cell)| DailyAllocation {
                        person: row.person.clone(),
                        process: row.process.clone(),
                        stage: row.stage,
                        date: date(2024, 1, label[..2].parse().unwrap()),
                        pct: cell.pct,
                        role: Role::Head,
                    })
            })
            .collect();
        let second = pivot_daily(&daily, &filters);
        assert_eq!(first, second);
    }
}
