//! Window filtering and daily expansion.
//!
//! Records that merely touch the filter window survive whole (no
//! truncation); clipping to the window happens during the day-by-day
//! expansion.

use allocgantt_core::{AllocationRecord, DailyAllocation, DateWindow};

/// Keep records whose [start, end] span overlaps the window (inclusive on
/// both ends). Non-overlapping records are dropped, not truncated.
pub fn retain_overlapping(
    records: Vec<AllocationRecord>,
    window: &DateWindow,
) -> Vec<AllocationRecord> {
    records
        .into_iter()
        .filter(|r| window.overlaps(r.start, r.end))
        .collect()
}

/// Expand each record into one row per calendar day it spans inside the
/// window: `max(start, window.start) ..= min(end, window.end)`.
///
/// Days are emitted ascending per record; records keep their input order. A
/// record starting before the window or ending after it contributes only its
/// in-window days.
pub fn expand_daily(records: &[AllocationRecord], window: &DateWindow) -> Vec<DailyAllocation> {
    let mut rows = Vec::new();

    for record in records {
        let mut day = record.start.max(window.start);
        let last = record.end.min(window.end);

        while day <= last {
            rows.push(DailyAllocation {
                person: record.person.clone(),
                process: record.process.clone(),
                stage: record.stage,
                date: day,
                pct: record.pct,
                role: record.role,
            });
            let Some(next) = day.succ_opt() else {
                break;
            };
            day = next;
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocgantt_core::{date, Role, Stage};
    use pretty_assertions::assert_eq;

    fn record(start: (i32, u32, u32), end: (i32, u32, u32)) -> AllocationRecord {
        AllocationRecord {
            person: "Ana".into(),
            process: "Programa A".into(),
            stage: Stage::One,
            start: date(start.0, start.1, start.2),
            end: date(end.0, end.1, end.2),
            pct: Some(0.5),
            role: Role::Head,
        }
    }

    #[test]
    fn retains_partial_overlaps_whole() {
        let window = DateWindow::new(date(2024, 1, 10), date(2024, 1, 20));
        let kept = retain_overlapping(
            vec![
                record((2024, 1, 1), (2024, 1, 10)),  // touches the left edge
                record((2024, 1, 20), (2024, 1, 25)), // touches the right edge
                record((2024, 1, 1), (2024, 1, 9)),   // entirely before
                record((2024, 1, 21), (2024, 1, 25)), // entirely after
            ],
            &window,
        );
        assert_eq!(kept.len(), 2);
        // Dropped, not truncated: the survivors keep their full spans
        assert_eq!(kept[0].start, date(2024, 1, 1));
        assert_eq!(kept[1].end, date(2024, 1, 25));
    }

    #[test]
    fn expansion_count_matches_clipped_span() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 31));
        let rows = expand_daily(&[record((2024, 1, 10), (2024, 1, 12))], &window);
        // min(end, window.end) - max(start, window.start) + 1 = 3
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, date(2024, 1, 10));
        assert_eq!(rows[1].date, date(2024, 1, 11));
        assert_eq!(rows[2].date, date(2024, 1, 12));
    }

    #[test]
    fn expansion_clips_to_the_window() {
        let window = DateWindow::new(date(2024, 1, 10), date(2024, 1, 12));
        let rows = expand_daily(&[record((2024, 1, 1), (2024, 1, 31))], &window);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| window.contains(r.date)));
    }

    #[test]
    fn single_day_record_yields_one_row() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 31));
        let rows = expand_daily(&[record((2024, 1, 15), (2024, 1, 15))], &window);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, date(2024, 1, 15));
    }

    #[test]
    fn every_day_lies_in_both_intervals() {
        let window = DateWindow::new(date(2024, 1, 8), date(2024, 1, 25));
        let rec = record((2024, 1, 5), (2024, 1, 20));
        let rows = expand_daily(std::slice::from_ref(&rec), &window);
        assert_eq!(rows.len(), 13); // Jan 8..=20
        for row in &rows {
            assert!(window.contains(row.date));
            assert!(row.date >= rec.start && row.date <= rec.end);
        }
    }

    #[test]
    fn rows_carry_the_record_fields() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 31));
        let rows = expand_daily(&[record((2024, 1, 10), (2024, 1, 10))], &window);
        let row = &rows[0];
        assert_eq!(row.person, "Ana");
        assert_eq!(row.process, "Programa A");
        assert_eq!(row.stage, Stage::One);
        assert_eq!(row.pct, Some(0.5));
        assert_eq!(row.role, Role::Head);
    }
}
