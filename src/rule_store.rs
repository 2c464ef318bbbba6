use chrono::NaiveDate;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use crate::calendar::{HolidayRule, WorkingCalendar, is_working_day};

/// Shared holder for the active holiday rule.
///
/// Clones share one record. Edits swap the whole rule, and every query reads
/// the current record, so callers never see a stale snapshot after an edit.
#[derive(Debug, Clone, Default)]
pub struct HolidayRuleStore {
    rule: Arc<RwLock<HolidayRule>>,
}

impl HolidayRuleStore {
    pub fn new(rule: HolidayRule) -> Self {
        Self {
            rule: Arc::new(RwLock::new(rule)),
        }
    }

    pub fn snapshot(&self) -> HolidayRule {
        self.rule.read().clone()
    }

    /// Installs `rule` and returns the record it replaced.
    pub fn replace(&self, rule: HolidayRule) -> HolidayRule {
        let mut guard = self.rule.write();
        install(&mut guard, rule)
    }

    /// Builds a new record from the current one and installs it under a
    /// single lock. Returns the installed record.
    pub fn update<F>(&self, edit: F) -> HolidayRule
    where
        F: FnOnce(HolidayRule) -> HolidayRule,
    {
        let mut guard = self.rule.write();
        let next = edit(guard.clone());
        install(&mut guard, next.clone());
        next
    }
}

fn install(slot: &mut HolidayRule, rule: HolidayRule) -> HolidayRule {
    info!(
        rule_type = %rule.rule_type(),
        holidays = rule.specific_holidays().count(),
        "holiday rule replaced"
    );
    std::mem::replace(slot, rule)
}

impl WorkingCalendar for HolidayRuleStore {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        is_working_day(date, &self.rule.read())
    }
}
