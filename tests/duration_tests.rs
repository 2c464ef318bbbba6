use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use production_tracker::{
    AnomalyDurationCalculator, DurationDays, DurationError, WorkShift, compute_duration_days,
    parse_local_timestamp,
};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0)
}

#[test]
fn equal_bounds_yield_zero() {
    assert_eq!(compute_duration_days(at(2025, 1, 6, 10, 0), at(2025, 1, 6, 10, 0)).unwrap(), "0");
}

#[test]
fn one_full_shift_is_one_day() {
    assert_eq!(compute_duration_days(at(2025, 1, 6, 8, 30), at(2025, 1, 6, 17, 30)).unwrap(), "1");
}

#[test]
fn interval_across_shift_boundary_accumulates_both_days() {
    // 1.5h on day one plus 1.5h on day two = 3h / 9h
    assert_eq!(compute_duration_days(at(2025, 1, 6, 16, 0), at(2025, 1, 7, 10, 0)).unwrap(), "0.3");
}

#[test]
fn inverted_interval_yields_zero_regardless_of_size() {
    assert_eq!(compute_duration_days(at(2025, 1, 7, 10, 0), at(2025, 1, 6, 16, 0)).unwrap(), "0");
    assert_eq!(compute_duration_days(at(2040, 1, 1, 0, 0), at(2000, 1, 1, 0, 0)).unwrap(), "0");
}

#[test]
fn missing_bounds_yield_zero() {
    assert_eq!(compute_duration_days(None, at(2025, 1, 6, 10, 0)).unwrap(), "0");
    assert_eq!(compute_duration_days(at(2025, 1, 6, 10, 0), None).unwrap(), "0");
    assert_eq!(compute_duration_days(None, None).unwrap(), "0");
}

#[test]
fn time_outside_shift_does_not_count() {
    assert_eq!(compute_duration_days(at(2025, 1, 6, 18, 0), at(2025, 1, 7, 8, 0)).unwrap(), "0");
    assert_eq!(compute_duration_days(at(2025, 1, 6, 6, 0), at(2025, 1, 6, 8, 30)).unwrap(), "0");
}

#[test]
fn partial_shift_renders_one_decimal() {
    assert_eq!(compute_duration_days(at(2025, 1, 6, 8, 30), at(2025, 1, 6, 13, 0)).unwrap(), "0.5");
    assert_eq!(compute_duration_days(at(2025, 1, 6, 7, 0), at(2025, 1, 7, 13, 0)).unwrap(), "1.5");
}

#[test]
fn multi_day_span_counts_every_calendar_day() {
    assert_eq!(compute_duration_days(at(2025, 1, 6, 8, 0), at(2025, 1, 8, 18, 0)).unwrap(), "3");
    // Friday through Monday includes the weekend: holiday rules are not consulted
    assert_eq!(compute_duration_days(at(2025, 1, 3, 8, 30), at(2025, 1, 6, 17, 30)).unwrap(), "4");
}

#[test]
fn rounding_is_half_up_on_exact_tenths() {
    // 27 minutes is exactly 0.05 of a 9h day
    assert_eq!(compute_duration_days(at(2025, 1, 6, 9, 0), at(2025, 1, 6, 9, 27)).unwrap(), "0.1");
    assert_eq!(compute_duration_days(at(2025, 1, 6, 9, 0), at(2025, 1, 6, 9, 26)).unwrap(), "0");
}

#[test]
fn seconds_contribute_to_the_overlap() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap().and_hms_opt(8, 30, 0);
    let end = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap().and_hms_opt(8, 30, 30);
    let calculator = AnomalyDurationCalculator::default();
    assert_eq!(calculator.shift_overlap_ms(start.unwrap(), end.unwrap()), 30_000);
}

#[test]
fn span_beyond_limit_is_rejected() {
    let err = compute_duration_days(at(2020, 1, 1, 9, 0), at(2030, 1, 2, 9, 0)).unwrap_err();
    assert_eq!(err, DurationError::SpanTooLong { days: 3654, max: 3650 });

    let calculator = AnomalyDurationCalculator::default().with_max_span_days(1);
    assert!(calculator.compute(at(2025, 1, 6, 9, 0), at(2025, 1, 7, 9, 0)).is_ok());
    assert!(matches!(
        calculator.compute(at(2025, 1, 6, 9, 0), at(2025, 1, 8, 9, 0)),
        Err(DurationError::SpanTooLong { days: 2, max: 1 })
    ));
}

#[test]
fn custom_shift_changes_window_and_divisor() {
    let shift = WorkShift::new(
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        3.0,
    )
    .unwrap();
    let calculator = AnomalyDurationCalculator::new(shift);
    assert_eq!(calculator.compute(at(2025, 1, 6, 8, 0), at(2025, 1, 6, 13, 0)).unwrap(), "1");
    assert_eq!(calculator.compute(at(2025, 1, 6, 10, 30), at(2025, 1, 6, 13, 0)).unwrap(), "0.5");
}

#[test]
fn duration_days_display_is_minimal() {
    assert_eq!(DurationDays::ZERO.to_string(), "0");
    assert_eq!(DurationDays::from_tenths(3).to_string(), "0.3");
    assert_eq!(DurationDays::from_tenths(20).to_string(), "2");
    assert_eq!(DurationDays::from_tenths(15).to_string(), "1.5");
    assert_eq!(DurationDays::from_tenths(15).as_f64(), 1.5);
}

#[test]
fn parse_local_timestamp_accepts_form_inputs() {
    let expected = at(2025, 1, 6, 16, 0).unwrap();
    assert_eq!(parse_local_timestamp("2025-01-06T16:00").unwrap(), expected);
    assert_eq!(parse_local_timestamp("2025-01-06T16:00:00").unwrap(), expected);
    assert_eq!(parse_local_timestamp("2025-01-06 16:00").unwrap(), expected);
    assert_eq!(parse_local_timestamp(" 2025-01-06 16:00:00 ").unwrap(), expected);
    assert_eq!(parse_local_timestamp("2025-01-06T16:00:00+08:00").unwrap(), expected);
}

#[test]
fn parse_local_timestamp_rejects_garbage() {
    assert_eq!(
        parse_local_timestamp("yesterday"),
        Err(DurationError::InvalidTimestamp("yesterday".to_string()))
    );
    assert!(parse_local_timestamp("2025-13-01T10:00").is_err());
}

#[test]
fn persisted_durations_parse_back_to_tenths() {
    let tenths = |s: &str| s.parse::<DurationDays>().map(|days| days.tenths());
    assert_eq!(tenths("0"), Ok(0));
    assert_eq!(tenths("0.3"), Ok(3));
    assert_eq!(tenths("2"), Ok(20));
    assert_eq!(tenths("1.0"), Ok(10));
    assert_eq!(tenths(" 1.5 "), Ok(15));
    assert_eq!("1.0".parse::<DurationDays>(), "1".parse::<DurationDays>());

    for bad in ["", "1.25", "-1", ".5", "1.", "x", "99999999999999999999"] {
        assert_eq!(
            bad.parse::<DurationDays>(),
            Err(DurationError::InvalidDuration(bad.to_string())),
            "{bad:?}"
        );
    }
}
