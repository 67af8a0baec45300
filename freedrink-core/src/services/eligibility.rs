// File: freedrink-core/src/services/eligibility.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::Error;

pub const DEFAULT_LEGAL_AGE: i64 = 18;

const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0;

/// Whole-year age at `now`, floor of elapsed time over 365.25-day years.
pub fn age_in_years(dob: NaiveDate, now: DateTime<Utc>) -> i64 {
    let born = dob.and_time(NaiveTime::MIN).and_utc();
    let lived = now.signed_duration_since(born);
    (lived.num_seconds() as f64 / SECONDS_PER_YEAR).floor() as i64
}

/// Parse the guest's date of birth and enforce the legal age threshold.
/// Unparseable input fails closed as underage.
pub fn verify_age(dob_text: &str, legal_age: i64, now: DateTime<Utc>) -> Result<NaiveDate, Error> {
    let dob = match NaiveDate::parse_from_str(dob_text.trim(), "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => return Err(Error::Underage),
    };
    if age_in_years(dob, now) < legal_age {
        return Err(Error::Underage);
    }
    Ok(dob)
}
