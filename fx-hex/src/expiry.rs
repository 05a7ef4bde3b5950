//! Cache expiry aligned to the provider's publication schedule.
//!
//! The provider publishes new reference rates once per business day at a
//! fixed local time (16:00 CET/CEST for the ECB feed). Cached payloads stay
//! valid until the next publication.

use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;

/// Computes when cached rates go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryScheduler {
    zone: Tz,
    publish_time: NaiveTime,
}

impl ExpiryScheduler {
    pub const DEFAULT_ZONE: Tz = chrono_tz::Europe::Berlin;

    pub fn new(zone: Tz, publish_time: NaiveTime) -> Self {
        Self { zone, publish_time }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn publish_time(&self) -> NaiveTime {
        self.publish_time
    }

    /// The first publication instant at or after `now`.
    ///
    /// Past the last representable date there is no further publication;
    /// the result is then `DateTime::<Utc>::MAX_UTC`.
    pub fn next_expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let mut date = now.with_timezone(&self.zone).date_naive();

        let today_publish = self.publish_instant(date);
        if now <= today_publish && is_business_day(date) {
            return today_publish;
        }

        loop {
            date = match date.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => return DateTime::<Utc>::MAX_UTC,
            };
            if is_business_day(date) {
                return self.publish_instant(date);
            }
        }
    }

    /// Publish time on `date` in the reference zone, as a UTC instant.
    fn publish_instant(&self, date: NaiveDate) -> DateTime<Utc> {
        let local = date.and_time(self.publish_time);
        match self.zone.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            // Wall time skipped by a DST jump.
            LocalResult::None => self
                .zone
                .from_local_datetime(&(local + Duration::hours(1)))
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| Utc.from_utc_datetime(&local)),
        }
    }
}

impl Default for ExpiryScheduler {
    fn default() -> Self {
        Self {
            zone: Self::DEFAULT_ZONE,
            publish_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Monday through Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
