use chrono::{Days, NaiveDate};

const DELIVERY_LEAD_DAYS: u64 = 2;

/// Date the parcel is expected to arrive, a fixed lead after the requested date.
/// Saturates at the calendar maximum rather than overflowing.
pub fn approximate_delivery_date(requested: NaiveDate) -> NaiveDate {
    requested
        .checked_add_days(Days::new(DELIVERY_LEAD_DAYS))
        .unwrap_or(NaiveDate::MAX)
}
