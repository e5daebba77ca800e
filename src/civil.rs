/*!
Civil datetimes and their conversions to and from Unix timestamps.

The only type here is [`DateTime`]: a Gregorian calendar date and a "wall
clock" time, with no time zone attached. Unlike most datetime types in the
Rust ecosystem, a `DateTime` is allowed to be *invalid*. Construction from
out-of-range fields or from an unrepresentable timestamp does not fail with
an error. It produces a sentinel value instead, and operations on the
sentinel propagate it. See [`DateTime::is_valid`].
*/

use crate::{error::Error, round::HourRound};

pub(crate) const MILLIS_PER_CIVIL_DAY: i64 = 86_400_000;
pub(crate) const MILLIS_PER_HOUR: i64 = 3_600_000;
pub(crate) const MILLIS_PER_MINUTE: i64 = 60_000;
pub(crate) const MILLIS_PER_SECOND: i64 = 1_000;

/// The days since the Unix epoch for `-9999-01-01` and `9999-12-31`.
///
/// These bound every valid `DateTime`. There are tests confirming that they
/// agree with `epoch_day_from_civil`.
pub(crate) const MIN_EPOCH_DAY: i32 = -4_371_587;
pub(crate) const MAX_EPOCH_DAY: i32 = 2_932_896;

/// A representation of a civil datetime.
///
/// A `DateTime` value is a Gregorian calendar date (year, month, day) paired
/// with a "wall clock" time (hour, minute, second, millisecond). It has no
/// time zone. All days are exactly `86,400` seconds long.
///
/// # Validity
///
/// A `DateTime` is either valid or it is the invalid sentinel returned by
/// [`DateTime::invalid`]. The sentinel arises from construction with
/// out-of-range fields, from a timestamp outside the supported range or from
/// a non-finite `f64` timestamp. Operations never turn an invalid input into
/// an error. They return the sentinel, and callers are expected to check
/// [`DateTime::is_valid`] on results when their inputs might be invalid.
///
/// Two invalid sentinels compare equal to one another, and an invalid
/// sentinel is never equal to any valid datetime.
///
/// # Supported range
///
/// The year must be in `-9999..=9999` (proleptic Gregorian). The remaining
/// fields have their usual calendar ranges, with days checked against the
/// actual length of the month.
///
/// # Example
///
/// ```
/// use nearest_hours::civil::DateTime;
///
/// let dt = DateTime::new(2014, 7, 10, 12, 13, 16, 0);
/// assert!(dt.is_valid());
/// assert_eq!(dt.to_string(), "2014-07-10T12:13:16.000");
///
/// // February 29 only exists in leap years.
/// assert!(!DateTime::new(2015, 2, 29, 0, 0, 0, 0).is_valid());
/// assert!(DateTime::new(2016, 2, 29, 0, 0, 0, 0).is_valid());
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct DateTime {
    repr: Repr,
}

#[derive(Clone, Copy, Eq, Hash, PartialEq)]
enum Repr {
    Civil(Fields),
    Invalid,
}

#[derive(Clone, Copy, Eq, Hash, PartialEq)]
struct Fields {
    year: i16,
    month: i8,
    day: i8,
    hour: i8,
    minute: i8,
    second: i8,
    millisecond: i16,
}

impl Fields {
    const fn in_range(&self) -> bool {
        -9999 <= self.year
            && self.year <= 9999
            && 1 <= self.month
            && self.month <= 12
            && 1 <= self.day
            && self.day <= days_in_month(self.year, self.month)
            && 0 <= self.hour
            && self.hour <= 23
            && 0 <= self.minute
            && self.minute <= 59
            && 0 <= self.second
            && self.second <= 59
            && 0 <= self.millisecond
            && self.millisecond <= 999
    }
}

impl DateTime {
    /// Creates a new `DateTime` value from its component fields.
    ///
    /// This constructor never fails with an error. When any field is out of
    /// range, the invalid sentinel is returned instead. Use
    /// [`DateTime::is_valid`] to distinguish the two outcomes.
    ///
    /// The ranges accepted are:
    ///
    /// * `-9999 <= year <= 9999`
    /// * `1 <= month <= 12`
    /// * `1 <= day <= days_in_month(year, month)`
    /// * `0 <= hour <= 23`
    /// * `0 <= minute <= 59`
    /// * `0 <= second <= 59`
    /// * `0 <= millisecond <= 999`
    ///
    /// # Example
    ///
    /// ```
    /// use nearest_hours::civil::DateTime;
    ///
    /// let dt = DateTime::new(2024, 6, 19, 15, 22, 45, 123);
    /// assert_eq!(dt.hour(), 15);
    /// assert_eq!(dt.millisecond(), 123);
    ///
    /// assert!(!DateTime::new(2024, 13, 1, 0, 0, 0, 0).is_valid());
    /// ```
    #[inline]
    pub fn new(
        year: i16,
        month: i8,
        day: i8,
        hour: i8,
        minute: i8,
        second: i8,
        millisecond: i16,
    ) -> DateTime {
        let fields =
            Fields { year, month, day, hour, minute, second, millisecond };
        if !fields.in_range() {
            return DateTime::invalid();
        }
        DateTime { repr: Repr::Civil(fields) }
    }

    /// Creates a new `DateTime` value in a `const` context.
    ///
    /// # Panics
    ///
    /// This panics if the given fields do not correspond to a valid
    /// datetime. The ranges are the same as for [`DateTime::new`].
    ///
    /// # Example
    ///
    /// ```
    /// use nearest_hours::civil::DateTime;
    ///
    /// const LUNCH: DateTime = DateTime::constant(2024, 6, 19, 12, 30, 0, 0);
    /// assert_eq!(LUNCH.hour(), 12);
    /// assert_eq!(LUNCH.minute(), 30);
    /// ```
    #[inline]
    pub const fn constant(
        year: i16,
        month: i8,
        day: i8,
        hour: i8,
        minute: i8,
        second: i8,
        millisecond: i16,
    ) -> DateTime {
        if year < -9999 || year > 9999 {
            panic!("invalid year");
        }
        if month < 1 || month > 12 {
            panic!("invalid month");
        }
        if day < 1 || day > days_in_month(year, month) {
            panic!("invalid day");
        }
        if hour < 0 || hour > 23 {
            panic!("invalid hour");
        }
        if minute < 0 || minute > 59 {
            panic!("invalid minute");
        }
        if second < 0 || second > 59 {
            panic!("invalid second");
        }
        if millisecond < 0 || millisecond > 999 {
            panic!("invalid millisecond");
        }
        let fields =
            Fields { year, month, day, hour, minute, second, millisecond };
        DateTime { repr: Repr::Civil(fields) }
    }

    /// Returns the invalid sentinel.
    ///
    /// # Example
    ///
    /// ```
    /// use nearest_hours::civil::DateTime;
    ///
    /// assert!(!DateTime::invalid().is_valid());
    /// assert_eq!(DateTime::invalid(), DateTime::invalid());
    /// ```
    #[inline]
    pub const fn invalid() -> DateTime {
        DateTime { repr: Repr::Invalid }
    }

    /// Returns true when this is a valid datetime, and false when it is the
    /// invalid sentinel.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        matches!(self.repr, Repr::Civil(_))
    }

    /// Converts a count of milliseconds since the Unix epoch
    /// (`1970-01-01T00:00:00.000`) to a `DateTime`.
    ///
    /// Negative counts refer to datetimes before the epoch. Counts whose
    /// civil date falls outside the supported year range of `-9999..=9999`
    /// convert to the invalid sentinel.
    ///
    /// # Example
    ///
    /// ```
    /// use nearest_hours::civil::DateTime;
    ///
    /// let dt = DateTime::from_unix_milliseconds(1_404_994_396_000);
    /// assert_eq!(dt, DateTime::constant(2014, 7, 10, 12, 13, 16, 0));
    ///
    /// let dt = DateTime::from_unix_milliseconds(-1);
    /// assert_eq!(dt, DateTime::constant(1969, 12, 31, 23, 59, 59, 999));
    ///
    /// assert!(!DateTime::from_unix_milliseconds(i64::MAX).is_valid());
    /// ```
    pub fn from_unix_milliseconds(millis: i64) -> DateTime {
        let epoch_day = millis.div_euclid(MILLIS_PER_CIVIL_DAY);
        if epoch_day < i64::from(MIN_EPOCH_DAY)
            || epoch_day > i64::from(MAX_EPOCH_DAY)
        {
            debug!("unix milliseconds {millis} are out of range");
            return DateTime::invalid();
        }
        let (year, month, day) = civil_from_epoch_day(epoch_day as i32);
        let mut time = millis.rem_euclid(MILLIS_PER_CIVIL_DAY);
        let hour = (time / MILLIS_PER_HOUR) as i8;
        time %= MILLIS_PER_HOUR;
        let minute = (time / MILLIS_PER_MINUTE) as i8;
        time %= MILLIS_PER_MINUTE;
        let second = (time / MILLIS_PER_SECOND) as i8;
        let millisecond = (time % MILLIS_PER_SECOND) as i16;
        let fields =
            Fields { year, month, day, hour, minute, second, millisecond };
        let dt = DateTime { repr: Repr::Civil(fields) };
        trace!("converted {millis} unix milliseconds to {dt}");
        dt
    }

    /// Converts this datetime to a count of milliseconds since the Unix
    /// epoch, or `None` for the invalid sentinel.
    ///
    /// This is the inverse of [`DateTime::from_unix_milliseconds`] for every
    /// valid datetime.
    ///
    /// # Example
    ///
    /// ```
    /// use nearest_hours::civil::DateTime;
    ///
    /// let dt = DateTime::constant(2014, 7, 10, 12, 13, 16, 0);
    /// assert_eq!(dt.to_unix_milliseconds(), Some(1_404_994_396_000));
    /// assert_eq!(DateTime::invalid().to_unix_milliseconds(), None);
    /// ```
    pub fn to_unix_milliseconds(&self) -> Option<i64> {
        let fields = match self.repr {
            Repr::Civil(fields) => fields,
            Repr::Invalid => return None,
        };
        let epoch_day = i64::from(epoch_day_from_civil(
            fields.year,
            fields.month,
            fields.day,
        ));
        Some(
            epoch_day * MILLIS_PER_CIVIL_DAY
                + i64::from(fields.hour) * MILLIS_PER_HOUR
                + i64::from(fields.minute) * MILLIS_PER_MINUTE
                + i64::from(fields.second) * MILLIS_PER_SECOND
                + i64::from(fields.millisecond),
        )
    }

    /// Rounds this datetime to the nearest multiple of N hours.
    ///
    /// This is the method form of
    /// [`round_to_nearest_hours`](crate::round_to_nearest_hours); see its
    /// documentation for the full behavior. The options given may be
    /// anything that implements `Into<HourRound>`, which includes
    /// [`HourRound`] itself and [`RoundMode`](crate::RoundMode).
    ///
    /// # Errors
    ///
    /// This returns an error when the configured number of hours is outside
    /// the range `1..=12`. Rounding the invalid sentinel is not an error:
    /// the result is `Ok` and carries the sentinel.
    ///
    /// # Example
    ///
    /// ```
    /// use nearest_hours::{civil::DateTime, HourRound};
    ///
    /// let dt = DateTime::constant(2014, 7, 10, 10, 10, 30, 0);
    /// assert_eq!(
    ///     dt.round(HourRound::new().nearest_to(4))?,
    ///     DateTime::constant(2014, 7, 10, 12, 0, 0, 0),
    /// );
    ///
    /// # Ok::<(), nearest_hours::Error>(())
    /// ```
    #[inline]
    pub fn round(
        self,
        options: impl Into<HourRound>,
    ) -> Result<DateTime, Error> {
        options.into().round_datetime(self)
    }

    /// Returns the year of this datetime.
    ///
    /// # Panics
    ///
    /// This panics when this datetime is the invalid sentinel. The same
    /// holds for every other field accessor on this type. Check
    /// [`DateTime::is_valid`] first when the value might be invalid.
    #[inline]
    pub fn year(&self) -> i16 {
        self.fields().year
    }

    /// Returns the month of this datetime, in `1..=12`.
    #[inline]
    pub fn month(&self) -> i8 {
        self.fields().month
    }

    /// Returns the day of this datetime, in `1..=31`.
    #[inline]
    pub fn day(&self) -> i8 {
        self.fields().day
    }

    /// Returns the hour of this datetime, in `0..=23`.
    #[inline]
    pub fn hour(&self) -> i8 {
        self.fields().hour
    }

    /// Returns the minute of this datetime, in `0..=59`.
    #[inline]
    pub fn minute(&self) -> i8 {
        self.fields().minute
    }

    /// Returns the second of this datetime, in `0..=59`.
    #[inline]
    pub fn second(&self) -> i8 {
        self.fields().second
    }

    /// Returns the millisecond of this datetime, in `0..=999`.
    #[inline]
    pub fn millisecond(&self) -> i16 {
        self.fields().millisecond
    }

    /// Returns the datetime `hours` whole hours after midnight on this
    /// datetime's date, with whole days carried into the calendar. The
    /// minute, second and millisecond of the result are zero.
    ///
    /// This is how rounding materializes its result: the date portion of the
    /// original value is kept and a freshly computed hour count, possibly
    /// `24` or more, is resolved against it. Carrying past the supported
    /// year range produces the invalid sentinel.
    ///
    /// Callers must ensure `self` is valid and `hours` is non-negative.
    pub(crate) fn at_hour(self, hours: i64) -> DateTime {
        debug_assert!(hours >= 0);
        let fields = self.fields();
        let epoch_day = i64::from(epoch_day_from_civil(
            fields.year,
            fields.month,
            fields.day,
        )) + hours.div_euclid(24);
        if epoch_day < i64::from(MIN_EPOCH_DAY)
            || epoch_day > i64::from(MAX_EPOCH_DAY)
        {
            debug!("hour {hours} on {self} carries out of range");
            return DateTime::invalid();
        }
        let (year, month, day) = civil_from_epoch_day(epoch_day as i32);
        let hour = hours.rem_euclid(24) as i8;
        DateTime {
            repr: Repr::Civil(Fields {
                year,
                month,
                day,
                hour,
                minute: 0,
                second: 0,
                millisecond: 0,
            }),
        }
    }

    #[inline]
    fn fields(&self) -> Fields {
        match self.repr {
            Repr::Civil(fields) => fields,
            Repr::Invalid => {
                panic!("no calendar fields on an invalid datetime")
            }
        }
    }
}

impl From<i64> for DateTime {
    #[inline]
    fn from(millis: i64) -> DateTime {
        DateTime::from_unix_milliseconds(millis)
    }
}

impl From<f64> for DateTime {
    /// Converts a possibly fractional count of milliseconds since the Unix
    /// epoch to a `DateTime`.
    ///
    /// The fractional part is truncated toward zero. Non-finite counts
    /// convert to the invalid sentinel.
    ///
    /// # Example
    ///
    /// ```
    /// use nearest_hours::civil::DateTime;
    ///
    /// assert!(!DateTime::from(f64::NAN).is_valid());
    /// assert_eq!(
    ///     DateTime::from(1_404_994_396_000.5),
    ///     DateTime::constant(2014, 7, 10, 12, 13, 16, 0),
    /// );
    /// ```
    #[inline]
    fn from(millis: f64) -> DateTime {
        if !millis.is_finite() {
            return DateTime::invalid();
        }
        // An `as` cast truncates toward zero and saturates, and saturated
        // counts are far outside the supported epoch day range.
        DateTime::from_unix_milliseconds(millis as i64)
    }
}

impl core::fmt::Display for DateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let fields = match self.repr {
            Repr::Civil(fields) => fields,
            Repr::Invalid => return f.write_str("invalid"),
        };
        if fields.year < 0 {
            write!(f, "-{:04}", -i32::from(fields.year))?;
        } else {
            write!(f, "{:04}", fields.year)?;
        }
        write!(
            f,
            "-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            fields.month,
            fields.day,
            fields.hour,
            fields.minute,
            fields.second,
            fields.millisecond,
        )
    }
}

impl core::fmt::Debug for DateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

/// Returns true if and only if the given year is a leap year.
pub(crate) const fn is_leap_year(year: i16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Return the number of days in the given month.
pub(crate) const fn days_in_month(year: i16, month: i8) -> i8 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Converts days since the Unix epoch to a Gregorian date.
///
/// Ref: <https://howardhinnant.github.io/date_algorithms.html#civil_from_days>
pub(crate) fn civil_from_epoch_day(epoch_day: i32) -> (i16, i8, i8) {
    let days = epoch_day + 719_468;
    let era = days.div_euclid(146_097);
    let doe = days.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let year = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as i8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as i8;
    let year = if month <= 2 { year + 1 } else { year };
    (year as i16, month, day)
}

/// Converts a Gregorian date to days since the Unix epoch.
///
/// Ref: <https://howardhinnant.github.io/date_algorithms.html#days_from_civil>
pub(crate) fn epoch_day_from_civil(year: i16, month: i8, day: i8) -> i32 {
    let year = i32::from(year) - i32::from(month <= 2);
    let era = year.div_euclid(400);
    let yoe = year.rem_euclid(400);
    let mp = (i32::from(month) + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i32::from(day) - 1;
    let doe = 365 * yoe + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[cfg(test)]
impl quickcheck::Arbitrary for DateTime {
    fn arbitrary(g: &mut quickcheck::Gen) -> DateTime {
        let year = (i32::arbitrary(g).rem_euclid(19_999) - 9_999) as i16;
        let month = i8::arbitrary(g).rem_euclid(12) + 1;
        let day = i8::arbitrary(g).rem_euclid(days_in_month(year, month)) + 1;
        let hour = i8::arbitrary(g).rem_euclid(24);
        let minute = i8::arbitrary(g).rem_euclid(60);
        let second = i8::arbitrary(g).rem_euclid(60);
        let millisecond = i16::arbitrary(g).rem_euclid(1_000);
        DateTime::constant(
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
        )
    }
}
