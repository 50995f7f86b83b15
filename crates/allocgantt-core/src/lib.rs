//! # allocgantt-core
//!
//! Core domain model for the allocgantt allocation pivot engine.
//!
//! This crate provides:
//! - Input types: `SourceRow`, `StageSpan` (one spreadsheet row with up to
//!   three process stages)
//! - Pipeline entities: `AllocationRecord`, `DailyAllocation`
//! - Output types: `CellValue`, `PivotRow`, `PivotTable`
//! - Filter parameters: `Filters`, `DateWindow`, `TimeScale`, `RoleFilter`,
//!   `PersonFilter`
//! - Error types and the `Renderer` trait
//!
//! ## Example
//!
//! ```rust
//! use allocgantt_core::{SourceRow, StageSpan, date};
//!
//! let row = SourceRow::new("CRM Rollout")
//!     .head("Ana")
//!     .analyst("Bruno")
//!     .stage(0, StageSpan::dates(date(2024, 1, 10), date(2024, 1, 12)).head_pct(0.5));
//! assert_eq!(row.process, "CRM Rollout");
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Type Aliases & Constants
// ============================================================================

/// Identity of an allocated person (as spelled in the source sheet)
pub type PersonId = String;

/// Number of stages a source row can carry
pub const STAGE_COUNT: usize = 3;

/// Leading pivot columns, always present before the time buckets
pub const FIXED_COLUMNS: [&str; 3] = ["Pessoa", "Processo", "Etapa"];

/// Background colors keyed by stage
pub const COLOR_STAGE_ONE: &str = "#90CAF9";
pub const COLOR_STAGE_TWO: &str = "#A5D6A7";
pub const COLOR_STAGE_THREE: &str = "#FFF59D";
pub const COLOR_UNKNOWN: &str = "#E0E0E0";
pub const COLOR_BLANK: &str = "#FFFFFF";

/// Convenience constructor for calendar dates.
///
/// Panics on out-of-range components, which is acceptable for literals; use
/// `NaiveDate::from_ymd_opt` for untrusted input.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

// ============================================================================
// Stage & Role
// ============================================================================

/// One of the three sequential phases a tracked process can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    One,
    Two,
    Three,
}

impl Stage {
    /// All stages in source-column order
    pub const ALL: [Stage; STAGE_COUNT] = [Stage::One, Stage::Two, Stage::Three];

    /// 1-based stage number as it appears in the source column names
    pub fn number(self) -> u8 {
        match self {
            Stage::One => 1,
            Stage::Two => 2,
            Stage::Three => 3,
        }
    }

    /// Display label used in the pivot's Etapa column
    pub fn label(self) -> String {
        format!("Etapa {}", self.number())
    }

    /// Fixed background color for this stage
    pub fn color(self) -> &'static str {
        match self {
            Stage::One => COLOR_STAGE_ONE,
            Stage::Two => COLOR_STAGE_TWO,
            Stage::Three => COLOR_STAGE_THREE,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Background color for an arbitrary stage label.
///
/// Keeps the legacy sheet's loose classification: the first of "1", "2", "3"
/// contained anywhere in the label wins, anything else maps to gray. Labels
/// produced by [`Stage::label`] always hit their own digit.
pub fn stage_color(label: &str) -> &'static str {
    if label.contains('1') {
        COLOR_STAGE_ONE
    } else if label.contains('2') {
        COLOR_STAGE_TWO
    } else if label.contains('3') {
        COLOR_STAGE_THREE
    } else {
        COLOR_UNKNOWN
    }
}

/// The two person-categories eligible for allocation on a stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Head,
    Analyst,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Head => "Head",
            Role::Analyst => "Analista",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Time-axis granularity of the pivot columns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeScale {
    /// One column per calendar day
    #[default]
    Daily,
    /// One column per half-month (day <= 15 is the first half)
    Fortnightly,
}

/// Person-type restriction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleFilter {
    #[default]
    All,
    Head,
    Analyst,
}

impl RoleFilter {
    pub fn matches(self, role: Role) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Head => role == Role::Head,
            RoleFilter::Analyst => role == Role::Analyst,
        }
    }
}

/// Person multi-select: either everyone or an explicit subset of identities
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonFilter {
    #[default]
    All,
    Only(Vec<PersonId>),
}

impl PersonFilter {
    pub fn matches(&self, person: &str) -> bool {
        match self {
            PersonFilter::All => true,
            PersonFilter::Only(people) => people.iter().any(|p| p == person),
        }
    }
}

/// Inclusive [start, end] date window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Inclusive overlap test against another [start, end] span
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        end >= self.start && start <= self.end
    }
}

/// The full user-selected parameter set for one pipeline run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub scale: TimeScale,
    pub role: RoleFilter,
    pub window: DateWindow,
    pub people: PersonFilter,
}

impl Filters {
    /// Filters over the given window with everything else wide open
    pub fn for_window(window: DateWindow) -> Self {
        Self {
            scale: TimeScale::default(),
            role: RoleFilter::default(),
            window,
            people: PersonFilter::default(),
        }
    }

    pub fn scale(mut self, scale: TimeScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn role(mut self, role: RoleFilter) -> Self {
        self.role = role;
        self
    }

    pub fn people(mut self, people: PersonFilter) -> Self {
        self.people = people;
        self
    }
}

// ============================================================================
// Source Input
// ============================================================================

/// Start/end dates and role percentages for one stage of a source row.
///
/// All fields are optional; a stage with either date missing contributes no
/// allocation records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StageSpan {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub head_pct: Option<f64>,
    pub analyst_pct: Option<f64>,
}

impl StageSpan {
    /// Span with both dates set and no percentages
    pub fn dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            head_pct: None,
            analyst_pct: None,
        }
    }

    pub fn head_pct(mut self, pct: f64) -> Self {
        self.head_pct = Some(pct);
        self
    }

    pub fn analyst_pct(mut self, pct: f64) -> Self {
        self.analyst_pct = Some(pct);
        self
    }

    /// A stage is usable only when both of its dates are present
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

/// One process instance as read from the source sheet: up to three stages
/// plus the head and analyst identities. Read-only input to the pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    pub process: String,
    pub head: Option<PersonId>,
    pub analyst: Option<PersonId>,
    pub stages: [StageSpan; STAGE_COUNT],
}

impl SourceRow {
    pub fn new(process: impl Into<String>) -> Self {
        Self {
            process: process.into(),
            head: None,
            analyst: None,
            stages: [StageSpan::default(); STAGE_COUNT],
        }
    }

    pub fn head(mut self, person: impl Into<String>) -> Self {
        self.head = Some(person.into());
        self
    }

    pub fn analyst(mut self, person: impl Into<String>) -> Self {
        self.analyst = Some(person.into());
        self
    }

    /// Set the span for stage `index` (0-based)
    pub fn stage(mut self, index: usize, span: StageSpan) -> Self {
        self.stages[index] = span;
        self
    }
}

// ============================================================================
// Pipeline Entities
// ============================================================================

/// One long-format allocation: a person working a stage of a process over a
/// date span at an optional percentage. Produced by unpivoting a source row;
/// consumed by the daily expansion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub person: PersonId,
    pub process: String,
    pub stage: Stage,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Allocation fraction (0.5 = 50%). `None` means no value was recorded,
    /// which is distinct from an explicit zero.
    pub pct: Option<f64>,
    pub role: Role,
}

/// One calendar day's slice of an [`AllocationRecord`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyAllocation {
    pub person: PersonId,
    pub process: String,
    pub stage: Stage,
    pub date: NaiveDate,
    pub pct: Option<f64>,
    pub role: Role,
}

// ============================================================================
// Pivot Output
// ============================================================================

/// Visual/semantic content of one pivot cell: a background color and an
/// optional allocation percentage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellValue {
    /// Hex background color, e.g. `#90CAF9`
    pub color: String,
    /// Allocation fraction; `None` renders as a blank label
    pub pct: Option<f64>,
}

impl CellValue {
    /// Cell for a populated day: the stage's color plus the percentage
    pub fn for_stage(stage: Stage, pct: Option<f64>) -> Self {
        Self {
            color: stage.color().to_string(),
            pct,
        }
    }

    /// The default empty cell: white background, no label
    pub fn blank() -> Self {
        Self {
            color: COLOR_BLANK.to_string(),
            pct: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.pct.is_none() && self.color == COLOR_BLANK
    }

    /// Percentage label scaled to 0-100 with two decimals ("42.50"), or
    /// `None` when no value was recorded
    pub fn pct_label(&self) -> Option<String> {
        self.pct.map(|p| format!("{:.2}", p * 100.0))
    }

    /// Parse the packed `color|percentage` form.
    ///
    /// Lenient on the second field: empty or unparsable percentages come back
    /// as `None`, never as an error. An empty input is the blank cell.
    pub fn from_packed(packed: &str) -> Self {
        if packed.is_empty() {
            return Self::blank();
        }
        let (color, pct) = match packed.split_once('|') {
            Some((color, pct)) => (color, pct),
            None => (packed, ""),
        };
        Self {
            color: color.to_string(),
            pct: pct.trim().parse::<f64>().ok().map(|p| p / 100.0),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::blank()
    }
}

/// Packed `color|percentage` form consumed by the presentation and export
/// adapters ("#90CAF9|50.00"; blank second field when no percentage).
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pct_label() {
            Some(label) => write!(f, "{}|{}", self.color, label),
            None => write!(f, "{}|", self.color),
        }
    }
}

/// One pivot output row: the (person, process, stage) triple plus one cell
/// per bucket column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub person: PersonId,
    pub process: String,
    pub stage: Stage,
    /// One entry per bucket column, aligned with `PivotTable::bucket_columns`
    pub cells: Vec<CellValue>,
}

/// The pivot table: sole output of the reshaping pipeline, consumed
/// independently by the grid renderer and the spreadsheet exporter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    /// Bucket column labels in chronological order
    pub bucket_columns: Vec<String>,
    /// Rows sorted by (person, process, stage)
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    /// All column names: the fixed leading triple followed by the buckets
    pub fn columns(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| (*c).to_string())
            .chain(self.bucket_columns.iter().cloned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering over a built pivot table
pub trait Renderer {
    type Output;

    fn render(&self, pivot: &PivotTable) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Terminal pipeline conditions. Both are user-recoverable: the run stops
/// with a visible warning and produces no partial output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PivotError {
    /// No stage had both dates and at least one identity across the input
    #[error("no allocation records found after processing the stages")]
    NoRecords,

    /// Window and role filtering removed every record
    #[error("no data left after applying the selected filters")]
    NoDataInFilters,
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),
}

// ============================================================================
// Tests
// ============================================================================
