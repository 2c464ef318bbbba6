use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CalendarError;

/// Weekly rest pattern a holiday rule starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HolidayRuleType {
    /// Sunday off.
    Single,
    /// Saturday and Sunday off.
    #[default]
    Double,
    /// Double rest and single rest weeks take turns, see [`alternate_week_index`].
    Alternate,
    /// No weekly rest at all.
    None,
}

impl HolidayRuleType {
    pub const ALL: [HolidayRuleType; 4] = [
        HolidayRuleType::Single,
        HolidayRuleType::Double,
        HolidayRuleType::Alternate,
        HolidayRuleType::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HolidayRuleType::Single => "SINGLE",
            HolidayRuleType::Double => "DOUBLE",
            HolidayRuleType::Alternate => "ALTERNATE",
            HolidayRuleType::None => "NONE",
        }
    }

    /// Whether the weekly pattern alone makes `date` a rest day.
    pub fn is_weekly_rest(&self, date: NaiveDate) -> bool {
        match self {
            HolidayRuleType::None => false,
            HolidayRuleType::Single => date.weekday() == Weekday::Sun,
            HolidayRuleType::Double => matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            HolidayRuleType::Alternate => match date.weekday() {
                Weekday::Sun => true,
                Weekday::Sat => alternate_week_index(date).rem_euclid(2) == 0,
                _ => false,
            },
        }
    }
}

impl fmt::Display for HolidayRuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HolidayRuleType {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CalendarError::UnknownRuleType(s.to_string()))
    }
}

/// Monday of week 0 for [`HolidayRuleType::Alternate`]. Week 0 is a double-rest week.
pub fn alternate_anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("anchor date is a valid calendar date")
}

/// Monday-based week number of `date` relative to [`alternate_anchor`].
/// Even weeks rest on Saturday and Sunday, odd weeks on Sunday only.
pub fn alternate_week_index(date: NaiveDate) -> i64 {
    (date - alternate_anchor()).num_days().div_euclid(7)
}

/// A weekly rest pattern plus explicit extra non-working dates.
///
/// Mutations go through the `with_*` methods, each of which yields a new
/// record; the rule is never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayRule {
    #[serde(rename = "type")]
    rule_type: HolidayRuleType,
    #[serde(default)]
    specific_holidays: BTreeSet<NaiveDate>,
}

impl HolidayRule {
    pub fn new<I>(rule_type: HolidayRuleType, specific_holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            rule_type,
            specific_holidays: specific_holidays.into_iter().collect(),
        }
    }

    pub fn rule_type(&self) -> HolidayRuleType {
        self.rule_type
    }

    /// Extra holidays in ascending order.
    pub fn specific_holidays(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.specific_holidays.iter().copied()
    }

    pub fn is_specific_holiday(&self, date: NaiveDate) -> bool {
        self.specific_holidays.contains(&date)
    }

    pub fn with_rule_type(self, rule_type: HolidayRuleType) -> Self {
        Self { rule_type, ..self }
    }

    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.specific_holidays.insert(date);
        self
    }

    pub fn without_holiday(mut self, date: NaiveDate) -> Self {
        self.specific_holidays.remove(&date);
        self
    }
}

/// Whether `date` is a working day under `rule`.
///
/// Explicit holidays always win over the weekly pattern. Callers holding a
/// `NaiveDateTime` pass `.date()`; time of day plays no part.
pub fn is_working_day(date: NaiveDate, rule: &HolidayRule) -> bool {
    !rule.is_specific_holiday(date) && !rule.rule_type.is_weekly_rest(date)
}

/// Day-level queries over any source of working-day answers.
///
/// Walks step one day at a time with `succ_opt` and yield `None` once they
/// run past the last representable date.
pub trait WorkingCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool;

    /// First working day strictly after `from`.
    fn next_working_day(&self, from: NaiveDate) -> Option<NaiveDate> {
        self.nth_working_day(from.succ_opt()?, 1)
    }

    /// The `n`-th working day counting `from` itself as the first candidate.
    /// `n == 0` behaves like `n == 1`.
    fn nth_working_day(&self, from: NaiveDate, n: u32) -> Option<NaiveDate> {
        let target = n.max(1);
        let mut current = from;
        let mut seen = 0;
        loop {
            if self.is_working_day(current) {
                seen += 1;
                if seen == target {
                    return Some(current);
                }
            }
            current = current.succ_opt()?;
        }
    }

    /// Working days in `start..=end`; zero for an inverted range.
    fn count_working_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| self.is_working_day(*day))
            .count() as i64
    }
}

/// A calendar bound to one holiday rule snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HolidayCalendar {
    rule: HolidayRule,
}

impl HolidayCalendar {
    pub fn new(rule: HolidayRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> &HolidayRule {
        &self.rule
    }
}

impl From<HolidayRule> for HolidayCalendar {
    fn from(rule: HolidayRule) -> Self {
        Self::new(rule)
    }
}

impl WorkingCalendar for HolidayCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        is_working_day(date, &self.rule)
    }
}
