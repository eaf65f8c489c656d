//! Week bucketing: `%Y-%W` keys, year boundaries, contiguous enumeration.

use chrono::{NaiveDate, NaiveDateTime};
use insider_features::events::Event;
use insider_features::features::{enumerate_weeks, WeekBucket};

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%m/%d/%Y %H:%M:%S").unwrap()
}

fn ev(ts: &str) -> Event {
    Event::new("{E}", ts, "ACM2278", "PC-1").with_activity("Logon")
}

fn keys(buckets: &[WeekBucket]) -> Vec<String> {
    buckets.iter().map(|b| b.to_string()).collect()
}

#[test]
fn bucket_matches_monday_start_week_numbers() {
    // 2010-01-01 is a Friday: days before the first Monday are week 0
    assert_eq!(WeekBucket::from_datetime(at("01/01/2010 12:00:00")), WeekBucket::new(2010, 0));
    assert_eq!(WeekBucket::from_datetime(at("01/03/2010 23:59:59")), WeekBucket::new(2010, 0));
    assert_eq!(WeekBucket::from_datetime(at("01/04/2010 00:00:00")), WeekBucket::new(2010, 1));
    assert_eq!(WeekBucket::from_datetime(at("12/31/2010 08:00:00")), WeekBucket::new(2010, 52));
    // 2018-01-01 is a Monday: no week 0
    assert_eq!(WeekBucket::from_datetime(at("01/01/2018 00:00:00")), WeekBucket::new(2018, 1));
}

#[test]
fn bucket_ignores_day_of_week() {
    let monday = WeekBucket::from_datetime(at("01/11/2010 00:00:00"));
    let sunday = WeekBucket::from_datetime(at("01/17/2010 23:59:59"));
    assert_eq!(monday, sunday);
    assert_eq!(monday.to_string(), "2010-02");
}

#[test]
fn bucket_display_and_parse() {
    let b: WeekBucket = "2011-00".parse().unwrap();
    assert_eq!(b, WeekBucket::new(2011, 0));
    assert_eq!(b.to_string(), "2011-00");
    assert!("2011".parse::<WeekBucket>().is_err());
    assert!("2011-xx".parse::<WeekBucket>().is_err());
    assert!("2011-60".parse::<WeekBucket>().is_err());
}

#[test]
fn ordering_is_numeric_across_years() {
    let late = WeekBucket::new(2010, 52);
    let early = WeekBucket::new(2011, 0);
    assert!(late < early);
    assert!(WeekBucket::new(2010, 9) < WeekBucket::new(2010, 10));
}

#[test]
fn start_dates() {
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
    assert_eq!(WeekBucket::new(2011, 0).start_date(), Some(d(2011, 1, 1)));
    assert_eq!(WeekBucket::new(2011, 1).start_date(), Some(d(2011, 1, 3)));
    assert_eq!(WeekBucket::new(2010, 52).start_date(), Some(d(2010, 12, 27)));
    assert_eq!(WeekBucket::new(2018, 1).start_date(), Some(d(2018, 1, 1)));
}

#[test]
fn contiguous_across_year_boundary_with_week_zero() {
    let events = vec![ev("12/20/2010 10:00:00"), ev("01/10/2011 10:00:00")];
    let index = enumerate_weeks(&events);
    assert_eq!(
        keys(index.buckets()),
        vec!["2010-51", "2010-52", "2011-00", "2011-01", "2011-02"]
    );
}

#[test]
fn contiguous_across_year_boundary_without_week_zero() {
    let events = vec![ev("01/08/2018 10:00:00"), ev("12/18/2017 10:00:00")];
    let index = enumerate_weeks(&events);
    assert_eq!(
        keys(index.buckets()),
        vec!["2017-51", "2017-52", "2018-01", "2018-02"]
    );
}

#[test]
fn consecutive_buckets_are_one_step_apart() {
    let events = vec![ev("11/02/2009 10:00:00"), ev("03/15/2011 10:00:00")];
    let index = enumerate_weeks(&events);
    let buckets = index.buckets();
    assert!(buckets.len() > 60);
    for pair in buckets.windows(2) {
        assert!(pair[0] < pair[1]);
        assert_eq!(pair[0].next(), Some(pair[1]));
        let gap = pair[1].start_date().unwrap() - pair[0].start_date().unwrap();
        assert!(gap.num_days() >= 1 && gap.num_days() <= 7);
    }
    // every day in the window lands in a listed bucket
    let mut day = NaiveDate::from_ymd_opt(2009, 11, 2).unwrap();
    let end = NaiveDate::from_ymd_opt(2011, 3, 15).unwrap();
    while day <= end {
        assert!(buckets.contains(&WeekBucket::from_date(day)));
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn unparseable_timestamps_are_skipped() {
    let events = vec![
        ev("not a date"),
        ev("01/05/2010 10:00:00"),
        ev("2010-01-20 10:00:00"),
        ev("01/19/2010 10:00:00"),
    ];
    let index = enumerate_weeks(&events);
    assert_eq!(keys(index.buckets()), vec!["2010-01", "2010-02", "2010-03"]);
    assert_eq!(index.stamps().len(), 4);
    assert!(index.stamps()[0].is_none());
    assert!(index.stamps()[2].is_none());
    assert_eq!(index.stamped(&events).count(), 2);
}

#[test]
fn no_parseable_events_gives_empty_index() {
    assert!(enumerate_weeks(&[]).is_empty());
    let index = enumerate_weeks(&[ev("garbage"), ev("13/45/2010 99:00:00")]);
    assert!(index.is_empty());
    assert_eq!(index.len(), 0);
}

#[test]
fn single_week_range() {
    let b = WeekBucket::new(2010, 5);
    assert_eq!(WeekBucket::range(b, b), vec![b]);
    assert!(WeekBucket::range(WeekBucket::new(2010, 6), b).is_empty());
}
