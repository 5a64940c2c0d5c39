use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use firmcap_core::{
    hours_by_charge_code, live_capacity, monthly_staff_cost, projected_financials, simulate, status_by_period,
    trailing_hours, week_start, weekly_trend, Assumptions, BucketId, FirmStatus, TrailingWindow,
};
use firmcap_ingest::parse_entries_csv;
use std::path::PathBuf;

fn entries_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("time_entries.csv")
}

fn chicago() -> Tz {
    "America/Chicago".parse().unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap()
}

/// Real-data regression: the fixture export parses with one bad row skipped.
#[test]
fn test_fixture_parses() {
    let import = parse_entries_csv(entries_path(), chicago()).unwrap();
    assert_eq!(import.entries.len(), 19);
    assert_eq!(import.skipped.len(), 1);
    assert!(import.skipped[0].1.contains("half a day"));
}

/// Trailing 30-day totals per bucket from the fixture.
#[test]
fn test_trailing_totals_from_fixture() {
    let import = parse_entries_csv(entries_path(), chicago()).unwrap();
    let totals = trailing_hours(&import.entries, now());

    assert_eq!(totals.minutes_for(BucketId::Advisors), 720);
    assert_eq!(totals.minutes_for(BucketId::Support), 375);
    assert_eq!(totals.minutes_for(BucketId::Tax), 750);
    assert_eq!(totals.unmapped_entries, 2);
    assert!((totals.total_hours() - 30.75).abs() < 1e-9);
}

/// Live dashboard over the fixture with default staffing.
#[test]
fn test_live_capacity_from_fixture() {
    let import = parse_entries_csv(entries_path(), chicago()).unwrap();
    let report = live_capacity(&import.entries, &Assumptions::default(), now());

    assert_eq!(report.status, FirmStatus::Healthy);
    let b = report.bottleneck.expect("all buckets staffed");
    assert_eq!(b.buckets, vec![BucketId::Tax]);
    // 12.5h of 280h
    assert!((b.utilization_pct - 12.5 / 280.0 * 100.0).abs() < 1e-9);
}

/// Calendar weeks in the firm's timezone, oldest first.
#[test]
fn test_weekly_trend_from_fixture() {
    let import = parse_entries_csv(entries_path(), chicago()).unwrap();
    let weeks = weekly_trend(&import.entries, now(), 3, chicago());

    assert_eq!(weeks[0].week_start, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    assert_eq!(weeks[0].hours.minutes_for(BucketId::Advisors), 300);
    assert_eq!(weeks[0].hours.unmapped_entries, 2);
    assert_eq!(weeks[1].hours.minutes_for(BucketId::Advisors), 330);
    assert_eq!(weeks[2].hours.minutes_for(BucketId::Tax), 225);

    let advisor_total: u64 = weeks.iter().map(|w| w.hours.minutes_for(BucketId::Advisors)).sum();
    assert_eq!(advisor_total, 720);
}

/// Charge-code breakdown for the actuals view.
#[test]
fn test_charge_codes_from_fixture() {
    let import = parse_entries_csv(entries_path(), chicago()).unwrap();
    let window = TrailingWindow::last_days(now(), 30);
    let rows = hours_by_charge_code(&import.entries, &window, None);

    assert_eq!(rows[0].charge_code, "1040 prep");
    assert_eq!(rows[0].hours, 10.0);

    let planning = rows.iter().find(|r| r.charge_code == "Financial planning").unwrap();
    assert_eq!(planning.entry_count, 4);
    assert_eq!(planning.hours, 7.75);
}

/// Simulator with defaults: sizing and projection are consistent.
#[test]
fn test_default_simulation() {
    let report = simulate(&Assumptions::default());

    // advisors: floor(560 * 0.85 / 6) = 79, support: floor(450 * 0.85 / 3.5) = 109,
    // tax: floor(280 * 0.80 / 2) = 112
    assert_eq!(report.firm_max_clients, Some(79));
    assert_eq!(report.firm_open_capacity, Some(19));
    assert_eq!(report.status, FirmStatus::Healthy);
    assert_eq!(report.first_breach, None);
    assert!(report
        .projections
        .iter()
        .all(|p| p.points.len() == 6 && p.points.iter().all(|pt| pt.total_capacity_hours == p.points[0].total_capacity_hours)));
}

/// The report pieces are reachable from the crate root and agree with `simulate`.
#[test]
fn test_report_helpers_from_crate_root() {
    let a = Assumptions::default();
    let report = simulate(&a);

    assert_eq!(monthly_staff_cost(&a), 77_800.0);
    assert_eq!(report.financials.staff_cost, monthly_staff_cost(&a));
    assert_eq!(status_by_period(&report.projections), report.projected_status);
    assert_eq!(
        projected_financials(&a, &report.projections[0].points),
        report.projected_financials
    );

    let weeks = weekly_trend(&[], now(), 1, chicago());
    assert_eq!(weeks[0].week_start, week_start(now(), chicago()));
    // Thursday evening in Chicago
    assert_eq!(week_start(now(), chicago()), NaiveDate::from_ymd_opt(2026, 3, 16).unwrap());
}
