//! Time-bucket labels and their chronological ordering.
//!
//! Labels are display strings ("05/Jan", "Jan/2024 - 1ª"), so a lexical sort
//! would scramble the time axis. The column order is instead derived from the
//! real calendar dates present in the data: sort the distinct dates
//! ascending, map each to its label, and de-duplicate keeping the first
//! occurrence.

use allocgantt_core::TimeScale;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Display label of the bucket a date falls into.
///
/// Daily labels are "day/month-abbrev" and intentionally drop the year, so
/// the same day/month of different years shares one bucket. Fortnightly
/// labels key on (month, year, half) with day 15 closing the first half.
pub fn bucket_label(date: NaiveDate, scale: TimeScale) -> String {
    match scale {
        TimeScale::Daily => date.format("%d/%b").to_string(),
        TimeScale::Fortnightly => {
            let half = if date.day() <= 15 { "1ª" } else { "2ª" };
            format!("{} - {}", date.format("%b/%Y"), half)
        }
    }
}

/// Chronological column order for the given dates.
///
/// The order is fully determined by the dates themselves: every date mapping
/// to an earlier label is <= every date mapping to a later one.
pub fn bucket_order<I>(dates: I, scale: TimeScale) -> Vec<String>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let distinct: BTreeSet<NaiveDate> = dates.into_iter().collect();

    let mut labels: Vec<String> = Vec::new();
    for day in distinct {
        let label = bucket_label(day, scale);
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}
