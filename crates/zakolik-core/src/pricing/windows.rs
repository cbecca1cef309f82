use crate::model::PerMinuteTariff;
use chrono::{Duration, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

/// Minutes of `[begin, end)` that fall inside the daily window `[start, stop)`.
///
/// A window with `stop <= start` wraps past midnight; `stop == start` covers
/// the whole day.
pub fn minutes_in_window(
    begin: NaiveDateTime,
    end: NaiveDateTime,
    start: NaiveTime,
    stop: NaiveTime,
) -> i64 {
    if end <= begin {
        return 0;
    }
    if start == stop {
        return (end - begin).num_minutes();
    }

    let mut total = 0;
    // The window opening the day before may still be running at `begin`.
    let mut day = begin.date() - Duration::days(1);
    while day <= end.date() {
        let open = day.and_time(start);
        let close = if stop > start {
            day.and_time(stop)
        } else {
            (day + Duration::days(1)).and_time(stop)
        };

        let from = open.max(begin);
        let to = close.min(end);
        if to > from {
            total += (to - from).num_minutes();
        }
        day += Duration::days(1);
    }
    total
}

/// One rate's share of an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateSpan {
    pub minutes: i64,
    pub per_minute_czk: Decimal,
}

impl RateSpan {
    pub fn czk(&self) -> Decimal {
        Decimal::from(self.minutes) * self.per_minute_czk
    }
}

/// Split `[begin, end)` across the per-minute windows.
pub fn rate_spans(
    per_minute: &[PerMinuteTariff],
    begin: NaiveDateTime,
    end: NaiveDateTime,
) -> Vec<RateSpan> {
    per_minute
        .iter()
        .map(|t| RateSpan {
            minutes: minutes_in_window(begin, end, t.start, t.end),
            per_minute_czk: t.per_minute_czk,
        })
        .filter(|span| span.minutes > 0)
        .collect()
}

/// Price of `[begin, end)` by the minute.
pub fn minute_price(per_minute: &[PerMinuteTariff], begin: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    rate_spans(per_minute, begin, end).iter().map(RateSpan::czk).sum()
}
