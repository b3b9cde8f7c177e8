//! Conversions between [`Date`] and absolute, zone-attached timestamps.
//!
//! The zone is an opaque caller-supplied [`TimeZone`]; this crate never
//! consults a timezone database itself.

use crate::Date;
use jiff::civil;
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};

/// Error converting a [`Date`] into an absolute timestamp.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The year does not fit the timestamp type's supported range.
    #[error("year {0} is outside the supported timestamp range")]
    YearOutOfRange(i64),

    /// The zone conversion itself failed.
    #[error(transparent)]
    Timestamp(#[from] jiff::Error),
}

impl Date {
    /// Today's date as seen on the wall clock of the given zone.
    pub fn today(zone: TimeZone) -> Self {
        Self::from_zoned(&Timestamp::now().to_zoned(zone))
    }

    /// The date portion of an absolute point in time, read in its attached
    /// zone.
    pub fn from_zoned(zdt: &Zoned) -> Self {
        Self::from_civil(zdt.date())
    }

    /// Midnight (00:00:00.000000000) of this date in the given zone.
    ///
    /// # Errors
    /// Fails if the year is outside the timestamp range or the zone
    /// conversion fails.
    pub fn start_of_day(self, zone: TimeZone) -> Result<Zoned, ConvertError> {
        Ok(self.to_civil()?.at(0, 0, 0, 0).to_zoned(zone)?)
    }

    /// The last representable instant (23:59:59.999999999) of this date in
    /// the given zone.
    ///
    /// # Errors
    /// Fails if the year is outside the timestamp range or the zone
    /// conversion fails.
    pub fn end_of_day(self, zone: TimeZone) -> Result<Zoned, ConvertError> {
        Ok(self.to_civil()?.at(23, 59, 59, 999_999_999).to_zoned(zone)?)
    }

    fn from_civil(date: civil::Date) -> Self {
        Self::from_ymd_unchecked(i64::from(date.year()), date.month() as u8, date.day() as u8)
    }

    fn to_civil(self) -> Result<civil::Date, ConvertError> {
        let year = i16::try_from(self.year())
            .map_err(|_| ConvertError::YearOutOfRange(self.year()))?;
        Ok(civil::Date::new(year, self.month() as i8, self.day() as i8)?)
    }
}

impl From<&Zoned> for Date {
    fn from(zdt: &Zoned) -> Self {
        Self::from_zoned(zdt)
    }
}

impl From<civil::Date> for Date {
    fn from(date: civil::Date) -> Self {
        Self::from_civil(date)
    }
}

impl TryFrom<Date> for civil::Date {
    type Error = ConvertError;

    fn try_from(date: Date) -> Result<Self, Self::Error> {
        date.to_civil()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff_in_days;
    use jiff::tz;

    #[test]
    fn test_from_zoned() {
        let zdt = civil::date(2024, 5, 9)
            .at(12, 0, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap();
        assert_eq!(Date::from_zoned(&zdt), Date::new(2024, 5, 9).unwrap());
        assert_eq!(Date::from(&zdt), Date::new(2024, 5, 9).unwrap());
    }

    #[test]
    fn test_civil_round_trip() {
        let date = Date::new(2004, 2, 29).unwrap();
        let converted = civil::Date::try_from(date).unwrap();
        assert_eq!(converted, civil::date(2004, 2, 29));
        assert_eq!(Date::from(converted), date);
    }

    #[test]
    fn test_start_of_day() {
        let date = Date::new(2023, 8, 24).unwrap();
        let zdt = date.start_of_day(TimeZone::UTC).unwrap();
        assert_eq!(zdt.datetime(), civil::date(2023, 8, 24).at(0, 0, 0, 0));
    }

    #[test]
    fn test_end_of_day() {
        let date = Date::new(2023, 8, 24).unwrap();
        let zdt = date.end_of_day(TimeZone::UTC).unwrap();
        assert_eq!(
            zdt.datetime(),
            civil::date(2023, 8, 24).at(23, 59, 59, 999_999_999)
        );
    }

    #[test]
    fn test_day_bounds_respect_zone() {
        let zone = TimeZone::fixed(tz::offset(2));
        let date = Date::new(2024, 2, 10).unwrap();

        let start = date.start_of_day(zone.clone()).unwrap();
        assert_eq!(start.datetime(), civil::date(2024, 2, 10).at(0, 0, 0, 0));

        // Local midnight at +02 is 22:00 the previous day in UTC.
        let in_utc = start.timestamp().to_zoned(TimeZone::UTC);
        assert_eq!(Date::from_zoned(&in_utc), Date::new(2024, 2, 9).unwrap());

        let end = date.end_of_day(zone).unwrap();
        assert_eq!(
            end.datetime(),
            civil::date(2024, 2, 10).at(23, 59, 59, 999_999_999)
        );
    }

    #[test]
    fn test_year_out_of_range() {
        let date = Date::new(100_000, 1, 1).unwrap();
        assert!(matches!(
            date.start_of_day(TimeZone::UTC),
            Err(ConvertError::YearOutOfRange(100_000))
        ));
        assert!(matches!(
            date.end_of_day(TimeZone::UTC),
            Err(ConvertError::YearOutOfRange(100_000))
        ));
    }

    #[test]
    fn test_today_is_close_to_now() {
        let today = Date::today(TimeZone::UTC);
        let now = Date::from_zoned(&Timestamp::now().to_zoned(TimeZone::UTC));
        // Tolerate a midnight crossing between the two clock reads.
        assert!(diff_in_days(today, now) <= 1);
    }
}
