//! Business-day calendar: weekend and holiday aware date arithmetic.
//!
//! A date is a working day when it is neither one of the jurisdiction's two
//! weekend days nor listed in the injected holiday set. Holiday sets are
//! year-bound data supplied at construction; dates in years the set does
//! not cover are treated as holiday-free rather than guessed.
//!
//! `advance` is a greedy forward scan, one calendar day at a time. Holiday
//! sets are irregular and non-periodic, so there is no closed-form
//! shortcut; the scan is the canonical algorithm.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

use caseline_core::EngineError;

/// England & Wales bank holidays, 2024–2026, per the published GOV.UK list.
/// Substitute days are the listed observed dates (e.g. 28 Dec 2026 for
/// Boxing Day falling on a Saturday).
const ENGLAND_WALES_BANK_HOLIDAYS: &[(i32, u32, u32, &str)] = &[
    (2024, 1, 1, "New Year's Day"),
    (2024, 3, 29, "Good Friday"),
    (2024, 4, 1, "Easter Monday"),
    (2024, 5, 6, "Early May bank holiday"),
    (2024, 5, 27, "Spring bank holiday"),
    (2024, 8, 26, "Summer bank holiday"),
    (2024, 12, 25, "Christmas Day"),
    (2024, 12, 26, "Boxing Day"),
    (2025, 1, 1, "New Year's Day"),
    (2025, 4, 18, "Good Friday"),
    (2025, 4, 21, "Easter Monday"),
    (2025, 5, 5, "Early May bank holiday"),
    (2025, 5, 26, "Spring bank holiday"),
    (2025, 8, 25, "Summer bank holiday"),
    (2025, 12, 25, "Christmas Day"),
    (2025, 12, 26, "Boxing Day"),
    (2026, 1, 1, "New Year's Day"),
    (2026, 4, 3, "Good Friday"),
    (2026, 4, 6, "Easter Monday"),
    (2026, 5, 4, "Early May bank holiday"),
    (2026, 5, 25, "Spring bank holiday"),
    (2026, 8, 31, "Summer bank holiday"),
    (2026, 12, 25, "Christmas Day"),
    (2026, 12, 28, "Boxing Day (substitute)"),
];

/// Weekend pair plus a holiday set for one jurisdiction.
#[derive(Debug, Clone)]
pub struct BusinessCalendar {
    weekend: [Weekday; 2],
    holidays: BTreeSet<NaiveDate>,
}

impl BusinessCalendar {
    /// Build a calendar from a weekend pair and any iterator of holiday
    /// dates. The holiday set is data, not behaviour: pass an empty
    /// iterator for a weekends-only calendar.
    pub fn new(weekend: [Weekday; 2], holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        BusinessCalendar {
            weekend,
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Saturday/Sunday weekend with the bundled England & Wales bank
    /// holiday table (2024–2026).
    pub fn england_wales() -> Self {
        let holidays = ENGLAND_WALES_BANK_HOLIDAYS
            .iter()
            .filter_map(|&(y, m, d, _)| NaiveDate::from_ymd_opt(y, m, d));
        BusinessCalendar::new([Weekday::Sat, Weekday::Sun], holidays)
    }

    /// Inclusive year range covered by the loaded holiday set, if any.
    /// Dates outside this range are evaluated as holiday-free.
    pub fn holiday_year_bounds(&self) -> Option<(i32, i32)> {
        let first = self.holidays.iter().next()?.year();
        let last = self.holidays.iter().next_back()?.year();
        Some((first, last))
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        let wd = date.weekday();
        if wd == self.weekend[0] || wd == self.weekend[1] {
            return false;
        }
        !self.holidays.contains(&date)
    }

    /// Advance `date` by `days` working days.
    ///
    /// The start date itself is never counted: the scan moves to the next
    /// calendar day and decrements the remaining count only on working
    /// days. `advance(d, 0)` returns `d` unchanged, even on a weekend.
    /// Negative counts are rejected with [`EngineError::InvalidInput`].
    pub fn advance(&self, date: NaiveDate, days: i64) -> Result<NaiveDate, EngineError> {
        if days < 0 {
            return Err(EngineError::InvalidInput(format!(
                "negative business-day count: {days}"
            )));
        }
        let mut current = date;
        let mut remaining = days;
        while remaining > 0 {
            current = current
                .succ_opt()
                .ok_or_else(|| EngineError::InvalidInput("date out of range".into()))?;
            if self.is_working_day(current) {
                remaining -= 1;
            }
        }
        Ok(current)
    }

    /// Count working days strictly after `from`, up to and including `to`.
    /// Returns 0 when `to <= from`.
    pub fn working_days_between(&self, from: NaiveDate, to: NaiveDate) -> i64 {
        if to <= from {
            return 0;
        }
        from.iter_days()
            .skip(1)
            .take_while(|d| *d <= to)
            .filter(|d| self.is_working_day(*d))
            .count() as i64
    }
}
