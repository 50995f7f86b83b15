//! Wide-to-long unpivoting of source rows.
//!
//! Each source row carries up to three stages and two role identities; every
//! (stage, role) pair with both stage dates and the role identity present
//! becomes one [`AllocationRecord`].

use allocgantt_core::{AllocationRecord, Role, SourceRow, Stage};

/// Emit the long-format allocation records for the given rows.
///
/// Emission order is stable: row-major, stage-ascending, Head before
/// Analyst. A stage missing either date is skipped entirely; a missing
/// identity skips only that role. Rows contributing nothing are simply
/// absent from the output.
pub fn unpivot(rows: &[SourceRow]) -> Vec<AllocationRecord> {
    let mut records = Vec::new();

    for row in rows {
        for (stage, span) in Stage::ALL.into_iter().zip(&row.stages) {
            let (Some(start), Some(end)) = (span.start, span.end) else {
                continue;
            };

            if let Some(head) = &row.head {
                records.push(AllocationRecord {
                    person: head.clone(),
                    process: row.process.clone(),
                    stage,
                    start,
                    end,
                    pct: span.head_pct,
                    role: Role::Head,
                });
            }

            if let Some(analyst) = &row.analyst {
                records.push(AllocationRecord {
                    person: analyst.clone(),
                    process: row.process.clone(),
                    stage,
                    start,
                    end,
                    pct: span.analyst_pct,
                    role: Role::Analyst,
                });
            }
        }
    }

    records
}
