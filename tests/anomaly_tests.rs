use chrono::{NaiveDate, NaiveDateTime};
use production_tracker::{
    AnomalyDraft, AnomalyDurationCalculator, AnomalyRecord, AnomalyStatus, DurationError,
    audit_durations,
};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0)
}

fn record(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>, stored: &str) -> AnomalyRecord {
    AnomalyRecord {
        id: None,
        work_order_no: "WO-2001".to_string(),
        description: "spindle vibration".to_string(),
        anomaly_status: AnomalyStatus::Continuous,
        start_time: start,
        end_time: end,
        duration_days: stored.to_string(),
    }
}

#[test]
fn draft_finalizes_after_both_timestamps_are_set() {
    let calculator = AnomalyDurationCalculator::default();
    let mut draft = AnomalyDraft::new("WO-2001", AnomalyStatus::Halted);
    draft.set_start(at(2025, 1, 6, 16, 0));
    assert_eq!(draft.preview_duration(&calculator).unwrap(), "0");

    draft.set_end(at(2025, 1, 7, 10, 0));
    assert_eq!(draft.preview_duration(&calculator).unwrap(), "0.3");

    let record = draft.finalize(&calculator).unwrap();
    assert_eq!(record.duration_days, "0.3");
    assert_eq!(record.anomaly_status, AnomalyStatus::Halted);
    assert!(!record.is_ongoing());
}

#[test]
fn status_does_not_affect_duration() {
    let calculator = AnomalyDurationCalculator::default();
    let mut continuous = AnomalyDraft::new("WO-2002", AnomalyStatus::Continuous);
    continuous.set_start(at(2025, 1, 6, 8, 30));
    continuous.set_end(at(2025, 1, 6, 17, 30));
    let mut halted = continuous.clone();
    halted.anomaly_status = AnomalyStatus::Halted;

    assert_eq!(
        continuous.finalize(&calculator).unwrap().duration_days,
        halted.finalize(&calculator).unwrap().duration_days
    );
}

#[test]
fn editing_a_record_recomputes_from_the_draft() {
    let calculator = AnomalyDurationCalculator::default();
    let stored = record(at(2025, 1, 6, 8, 30), None, "0");
    assert!(stored.is_ongoing());

    let mut draft = AnomalyDraft::from_record(&stored);
    draft.set_end(at(2025, 1, 7, 13, 0));
    let closed = draft.finalize(&calculator).unwrap();
    assert_eq!(closed.duration_days, "1.5");
    assert_eq!(closed.description, "spindle vibration");
}

#[test]
fn finalize_surfaces_span_limit() {
    let calculator = AnomalyDurationCalculator::default().with_max_span_days(30);
    let mut draft = AnomalyDraft::new("WO-2003", AnomalyStatus::Halted);
    draft.set_start(at(2025, 1, 1, 9, 0));
    draft.set_end(at(2025, 3, 1, 9, 0));
    assert_eq!(
        draft.finalize(&calculator),
        Err(DurationError::SpanTooLong { days: 59, max: 30 })
    );
}

#[test]
fn stored_duration_round_trips_through_recomputation() {
    let calculator = AnomalyDurationCalculator::default();
    let mut rec = record(at(2025, 1, 6, 16, 0), at(2025, 1, 7, 10, 0), "");
    rec.recompute(&calculator).unwrap();
    assert_eq!(rec.duration_days, "0.3");
    assert!(rec.duration_matches(&calculator).unwrap());

    let json = serde_json::to_string(&rec).unwrap();
    let restored: AnomalyRecord = serde_json::from_str(&json).unwrap();
    assert!(restored.duration_matches(&calculator).unwrap());
}

#[test]
fn audit_reports_drifted_records_in_order() {
    let calculator = AnomalyDurationCalculator::default().with_max_span_days(10);
    let records = vec![
        record(at(2025, 1, 6, 8, 30), at(2025, 1, 6, 17, 30), "1"),
        record(at(2025, 1, 6, 8, 30), at(2025, 1, 6, 17, 30), "1.0"),
        record(at(2025, 1, 6, 16, 0), at(2025, 1, 7, 10, 0), "0.3"),
        record(at(2025, 1, 6, 16, 0), None, "2"),
        record(at(2025, 1, 1, 9, 0), at(2025, 2, 1, 9, 0), "23"),
        record(at(2025, 1, 6, 8, 30), at(2025, 1, 6, 17, 30), "one"),
    ];

    let drifts = audit_durations(&records, &calculator);
    assert_eq!(drifts.iter().map(|drift| drift.index).collect::<Vec<_>>(), vec![3, 4, 5]);
    assert_eq!(drifts[0].recomputed, Ok("0".to_string()));
    assert!(matches!(drifts[1].recomputed, Err(DurationError::SpanTooLong { .. })));
    assert_eq!(drifts[2].stored, "one");
    assert_eq!(drifts[2].recomputed, Ok("1".to_string()));
}

#[test]
fn stored_duration_is_compared_by_value() {
    let calculator = AnomalyDurationCalculator::default();
    let padded = record(at(2025, 1, 6, 8, 30), at(2025, 1, 6, 17, 30), "1.0");
    assert_eq!(padded.stored_duration().unwrap().tenths(), 10);
    assert!(padded.duration_matches(&calculator).unwrap());

    let garbled = record(at(2025, 1, 6, 8, 30), at(2025, 1, 6, 17, 30), "1,0");
    assert_eq!(
        garbled.stored_duration(),
        Err(DurationError::InvalidDuration("1,0".to_string()))
    );
    assert!(!garbled.duration_matches(&calculator).unwrap());
}

#[test]
fn status_serializes_uppercase() {
    assert_eq!(serde_json::to_string(&AnomalyStatus::Continuous).unwrap(), "\"CONTINUOUS\"");
    let status: AnomalyStatus = serde_json::from_str("\"HALTED\"").unwrap();
    assert_eq!(status, AnomalyStatus::Halted);
    assert_eq!(status.label(), "production halted");
}
