//! The FAA publishes the NASR subscription on a fixed 28-day cycle.

use chrono::NaiveDate;

pub const CYCLE_DAYS: i64 = 28;

/// Start of the cycle in effect on `today`, counting in 28-day steps from
/// any known cycle start `anchor`. Dates before the anchor resolve to
/// earlier cycles.
pub fn current_cycle(today: NaiveDate, anchor: NaiveDate) -> NaiveDate {
    let elapsed = (today - anchor).num_days();
    let cycles = elapsed.div_euclid(CYCLE_DAYS);
    anchor + chrono::Duration::days(cycles * CYCLE_DAYS)
}

/// Download URL of the subscription archive effective on `cycle`.
pub fn subscription_url(base: &str, cycle: NaiveDate) -> String {
    format!(
        "{}/28DaySubscription_Effective_{}.zip",
        base.trim_end_matches('/'),
        cycle.format("%Y-%m-%d")
    )
}

/// Cycle date as reported in run metadata, `MM/DD/YY`.
pub fn format_cycle_date(cycle: NaiveDate) -> String {
    cycle.format("%m/%d/%y").to_string()
}
