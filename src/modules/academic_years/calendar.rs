//! Term calendar resolution.
//!
//! An academic year `"YYYY-YYYY"` runs from September of the first year to
//! August of the second. Terms are stored as month names and resolved to
//! concrete dates here: September..December land in the first calendar year,
//! January..August in the second.
//!
//! Everything in this module is pure. "Today" is always passed in.

use chrono::{Months, NaiveDate};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use schoolyard_models::{Term, TermInput};

/// Month index (0-based) at which the academic year starts.
const YEAR_START_MONTH: u32 = 8;

/// Term reported when no term contains today and no override is set.
pub const DEFAULT_TERM_NUMBER: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("invalid academic year {0:?}: expected YYYY-YYYY with consecutive years")]
    InvalidAcademicYear(String),
    #[error("term {term}: unrecognised month name {name:?}")]
    InvalidMonthName { term: i32, name: String },
    #[error("conflicting terms: {}", format_conflicts(.0))]
    TermRangeConflict(Vec<TermConflict>),
}

fn format_conflicts(conflicts: &[TermConflict]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// Both terms span exactly the same months
    DuplicateRange,
    /// The first term ends in the month the second starts
    SharedMonth,
    /// The second term starts before the first one ends
    Overlap,
    /// The year already wrapped from December into January once
    MultipleWraps,
    /// A single term ends before it starts within the academic year
    EndsBeforeStart,
    /// The second term falls earlier in the academic year than the first
    OutOfOrder,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConflictReason::DuplicateRange => "identical month range",
            ConflictReason::SharedMonth => "share a boundary month",
            ConflictReason::Overlap => "overlap",
            ConflictReason::MultipleWraps => "more than one year wrap",
            ConflictReason::EndsBeforeStart => "ends before it starts",
            ConflictReason::OutOfOrder => "are out of order",
        };
        f.write_str(text)
    }
}

/// A pair of terms that cannot coexist. `first == second` for a
/// single-term problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermConflict {
    pub first: i32,
    pub second: i32,
    pub reason: ConflictReason,
}

impl fmt::Display for TermConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.second {
            write!(f, "term {} {}", self.first, self.reason)
        } else {
            write!(f, "terms {} and {} {}", self.first, self.second, self.reason)
        }
    }
}

/// A validated `"YYYY-YYYY"` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AcademicYearLabel {
    first_year: i32,
}

impl AcademicYearLabel {
    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    pub fn second_year(&self) -> i32 {
        self.first_year + 1
    }

    /// Calendar year a month falls in for this academic year.
    fn year_of(&self, month_index: u32) -> i32 {
        if month_index >= YEAR_START_MONTH {
            self.first_year()
        } else {
            self.second_year()
        }
    }
}

impl FromStr for AcademicYearLabel {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidAcademicYear(s.to_string());

        let (first, second) = s.trim().split_once('-').ok_or_else(invalid)?;
        if first.len() != 4 || second.len() != 4 {
            return Err(invalid());
        }
        let first: i32 = first.parse().map_err(|_| invalid())?;
        let second: i32 = second.parse().map_err(|_| invalid())?;

        if second != first + 1 {
            return Err(invalid());
        }
        Ok(Self { first_year: first })
    }
}

impl fmt::Display for AcademicYearLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first_year(), self.second_year())
    }
}

/// Maps an English month name (full or three-letter, any case) to 0..=11.
pub fn month_index(name: &str) -> Option<u32> {
    name.trim()
        .parse::<chrono::Month>()
        .ok()
        .map(|month| month.number_from_month() - 1)
}

/// Position of a month within the academic year (September = 0).
fn academic_position(month_index: u32) -> u32 {
    (month_index + 12 - YEAR_START_MONTH) % 12
}

/// The month boundaries of one term, plus optional explicit dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermBounds {
    pub number: i32,
    pub start_month: String,
    pub end_month: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TermBounds {
    pub fn months(number: i32, start_month: &str, end_month: &str) -> Self {
        Self {
            number,
            start_month: start_month.to_string(),
            end_month: end_month.to_string(),
            start_date: None,
            end_date: None,
        }
    }

    /// Bounds for a term-set edit, numbered by position starting at 1.
    pub fn from_inputs(inputs: &[TermInput]) -> Vec<Self> {
        inputs
            .iter()
            .zip(1..)
            .map(|(input, number)| Self {
                number,
                start_month: input.start_month.clone(),
                end_month: input.end_month.clone(),
                start_date: input.start_date,
                end_date: input.end_date,
            })
            .collect()
    }
}

impl From<&Term> for TermBounds {
    fn from(term: &Term) -> Self {
        Self {
            number: term.number,
            start_month: term.start_month.clone(),
            end_month: term.end_month.clone(),
            start_date: term.start_date,
            end_date: term.end_date,
        }
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TermRange {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Resolves a term to concrete dates within `year`.
///
/// Explicit dates win when both are set. Returns `None` when either month
/// name is not recognised.
pub fn resolve_term_range(term: &TermBounds, year: &AcademicYearLabel) -> Option<TermRange> {
    if let (Some(start), Some(end)) = (term.start_date, term.end_date) {
        return Some(TermRange { start, end });
    }

    let start_index = month_index(&term.start_month)?;
    let end_index = month_index(&term.end_month)?;

    let start = NaiveDate::from_ymd_opt(year.year_of(start_index), start_index + 1, 1)?;
    let end = last_day_of_month(year.year_of(end_index), end_index + 1)?;

    Some(TermRange { start, end })
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// A year's terms and its current-term override.
#[derive(Debug, Clone)]
pub struct YearCalendar {
    pub label: AcademicYearLabel,
    pub current_term_override: Option<i32>,
    pub terms: Vec<TermBounds>,
}

/// The override if set, else the first term (in order) whose range contains
/// `today`, else [`DEFAULT_TERM_NUMBER`].
pub fn current_term_number(calendar: &YearCalendar, today: NaiveDate) -> i32 {
    if let Some(number) = calendar.current_term_override {
        return number;
    }

    calendar
        .terms
        .iter()
        .find(|term| {
            resolve_term_range(term, &calendar.label).is_some_and(|range| range.contains(today))
        })
        .map(|term| term.number)
        .unwrap_or(DEFAULT_TERM_NUMBER)
}

/// Elapsed share of `range` on `today`, rounded, in 0..=100.
///
/// A zero-length range reports 0 until it has passed.
pub fn term_progress_percent(range: &TermRange, today: NaiveDate) -> u8 {
    if today < range.start {
        return 0;
    }
    if today > range.end {
        return 100;
    }

    let total = (range.end - range.start).num_days();
    if total == 0 {
        return 0;
    }
    let elapsed = (today - range.start).num_days();

    ((elapsed as f64 / total as f64) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Checks an ordered term set.
///
/// Month names are checked first; an unknown name stops validation. All
/// range conflicts are then collected and reported together.
pub fn validate_term_set(terms: &[TermBounds]) -> Result<(), CalendarError> {
    let mut indices = Vec::with_capacity(terms.len());
    for term in terms {
        let start = month_index(&term.start_month).ok_or_else(|| {
            CalendarError::InvalidMonthName {
                term: term.number,
                name: term.start_month.clone(),
            }
        })?;
        let end = month_index(&term.end_month).ok_or_else(|| CalendarError::InvalidMonthName {
            term: term.number,
            name: term.end_month.clone(),
        })?;
        indices.push((term.number, start, end));
    }

    let mut conflicts = Vec::new();

    for (i, &(first, start_a, end_a)) in indices.iter().enumerate() {
        for &(second, start_b, end_b) in &indices[i + 1..] {
            if (start_a, end_a) == (start_b, end_b) {
                conflicts.push(TermConflict {
                    first,
                    second,
                    reason: ConflictReason::DuplicateRange,
                });
            }
        }
    }

    let mut wraps = 0;
    for &(number, start, end) in &indices {
        if academic_position(end) < academic_position(start) {
            conflicts.push(TermConflict {
                first: number,
                second: number,
                reason: ConflictReason::EndsBeforeStart,
            });
        } else if end < start {
            // A single term running across December into January.
            wraps += 1;
            if wraps > 1 {
                conflicts.push(TermConflict {
                    first: number,
                    second: number,
                    reason: ConflictReason::MultipleWraps,
                });
            }
        }
    }

    for pair in indices.windows(2) {
        let (first, _, prev_end) = pair[0];
        let (second, next_start, _) = pair[1];

        let reason = if next_start == prev_end {
            Some(ConflictReason::SharedMonth)
        } else if next_start < prev_end {
            if is_year_wrap(prev_end, next_start) {
                wraps += 1;
                (wraps > 1).then_some(ConflictReason::MultipleWraps)
            } else {
                Some(ConflictReason::Overlap)
            }
        } else {
            None
        };

        if let Some(reason) = reason {
            conflicts.push(TermConflict {
                first,
                second,
                reason,
            });
        }
    }

    // Every pair, placed by academic position so September..August orders
    // the year. Pairs already reported above are not repeated.
    let spans: Vec<_> = indices
        .iter()
        .filter(|&&(_, start, end)| academic_position(end) >= academic_position(start))
        .map(|&(number, start, end)| (number, academic_position(start), academic_position(end)))
        .collect();

    for (i, &(first, start_a, end_a)) in spans.iter().enumerate() {
        for &(second, start_b, end_b) in &spans[i + 1..] {
            if conflicts
                .iter()
                .any(|c| c.first == first && c.second == second)
            {
                continue;
            }

            let reason = if start_a <= end_b && start_b <= end_a {
                ConflictReason::Overlap
            } else if start_b < start_a {
                ConflictReason::OutOfOrder
            } else {
                continue;
            };

            conflicts.push(TermConflict {
                first,
                second,
                reason,
            });
        }
    }

    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(CalendarError::TermRangeConflict(conflicts))
    }
}

/// Ending in October..December and starting the next term in January..March.
fn is_year_wrap(prev_end: u32, next_start: u32) -> bool {
    (9..=11).contains(&prev_end) && next_start <= 2
}
