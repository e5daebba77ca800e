/*!
Rounding of civil datetimes to a multiple of N hours.

The entry points are [`round_to_nearest_hours`] and
[`DateTime::round`](crate::civil::DateTime::round), with [`HourRound`]
holding the options and [`RoundMode`] naming the rounding strategies.
*/

use crate::{civil::DateTime, error::Error};

/// The rounding strategies supported by [`HourRound`].
///
/// The strategy picks the multiple of N hours that a datetime maps to. It
/// is applied to the quotient of the datetime's hour-and-minute position in
/// its day and the configured number of hours. A second correction step,
/// described on [`round_to_nearest_hours`], runs after the strategy and is
/// not configurable.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RoundMode {
    /// Rounds toward positive infinity.
    Ceil,
    /// Rounds toward negative infinity.
    Floor,
    /// Rounds to the nearest multiple, with ties rounding away from zero.
    Round,
    /// Rounds toward zero.
    ///
    /// This is the default. Because the midpoint correction step always runs
    /// afterwards, the observable default behavior of rounding is "to the
    /// nearest multiple, ties up," not plain truncation.
    #[default]
    Trunc,
}

impl RoundMode {
    /// Rounds `quantity` to a multiple of `increment` according to this
    /// mode.
    ///
    /// Both values are counts of minutes within a civil day and are
    /// therefore non-negative, with `quantity < 1440` and `increment`
    /// dividing a positive number of hours. The distinction between `Floor`
    /// and `Trunc` (and between `Ceil` and "expand") vanishes on this
    /// domain, but the modes remain distinct in the API because callers
    /// select them by name.
    fn round(self, quantity: i64, increment: i64) -> i64 {
        let mut quotient = quantity / increment;
        let remainder = quantity % increment;
        if remainder == 0 {
            return quantity;
        }
        let tie = remainder * 2 == increment;
        let up_is_nearer = remainder * 2 > increment;
        match self {
            RoundMode::Ceil => quotient += 1,
            RoundMode::Floor | RoundMode::Trunc => {}
            RoundMode::Round => {
                if up_is_nearer || tie {
                    quotient += 1;
                }
            }
        }
        quotient * increment
    }
}

/// Options for rounding a datetime to a multiple of N hours.
///
/// This type follows the builder pattern. The default value rounds to the
/// nearest single hour, with ties rounding up. Use [`HourRound::nearest_to`]
/// to pick a coarser granularity and [`HourRound::mode`] to pick a different
/// strategy.
///
/// For convenience, a bare `i64` converts into an `HourRound` as the number
/// of hours, and a bare [`RoundMode`] converts into an `HourRound` with that
/// strategy. Both leave the other option at its default.
///
/// # Example
///
/// ```
/// use nearest_hours::{civil::DateTime, HourRound, RoundMode};
///
/// let options = HourRound::new().nearest_to(6).mode(RoundMode::Ceil);
/// let dt = DateTime::constant(2024, 6, 19, 13, 5, 0, 0);
/// assert_eq!(
///     dt.round(options)?,
///     DateTime::constant(2024, 6, 19, 18, 0, 0, 0),
/// );
///
/// # Ok::<(), nearest_hours::Error>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct HourRound {
    nearest_to: i64,
    mode: RoundMode,
}

impl HourRound {
    /// Creates a new default set of options.
    #[inline]
    pub fn new() -> HourRound {
        HourRound { nearest_to: 1, mode: RoundMode::default() }
    }

    /// Sets the number of hours to round to a multiple of.
    ///
    /// The default is `1`. The value is not checked here: rounding fails
    /// with a range error when it is outside `1..=12`. Any value in that
    /// range is permitted, whether it divides the day evenly or not.
    #[inline]
    pub fn nearest_to(self, nearest_to: i64) -> HourRound {
        HourRound { nearest_to, ..self }
    }

    /// Sets the rounding strategy to use.
    ///
    /// The default is [`RoundMode::Trunc`], which together with the
    /// always-on midpoint correction rounds to the nearest multiple with
    /// ties rounding up.
    #[inline]
    pub fn mode(self, mode: RoundMode) -> HourRound {
        HourRound { mode, ..self }
    }

    /// Returns the configured number of hours, or a range error when it is
    /// out of bounds. This check runs before any date computation and does
    /// not depend on the validity of the datetime being rounded.
    fn get_nearest_to(&self) -> Result<i64, Error> {
        if self.nearest_to < 1 || self.nearest_to > 12 {
            return Err(Error::range("nearest_to", self.nearest_to, 1, 12));
        }
        Ok(self.nearest_to)
    }

    pub(crate) fn round_datetime(
        &self,
        dt: DateTime,
    ) -> Result<DateTime, Error> {
        let nearest_to = self.get_nearest_to()?;
        if !dt.is_valid() {
            return Ok(DateTime::invalid());
        }
        // Work in minutes within the day. Seconds and milliseconds never
        // participate in the rounding decision.
        let increment = nearest_to * 60;
        let quantity = i64::from(dt.hour()) * 60 + i64::from(dt.minute());
        let rounded = self.mode.round(quantity, increment);
        // The midpoint correction always rounds ties up, independent of the
        // configured mode, and stacks on top of the mode's own result. This
        // two-stage shape is observable at half-increment boundaries and is
        // kept for compatibility. Do not fold it into `RoundMode::round`.
        let remainder = quantity % increment;
        let corrected = if remainder * 2 >= increment {
            rounded + increment
        } else {
            rounded
        };
        let hours = corrected / 60;
        trace!(
            "rounded {dt} to hour {hours} \
             (quantity {quantity}, increment {increment})"
        );
        Ok(dt.at_hour(hours))
    }
}

impl Default for HourRound {
    #[inline]
    fn default() -> HourRound {
        HourRound::new()
    }
}

impl From<i64> for HourRound {
    #[inline]
    fn from(nearest_to: i64) -> HourRound {
        HourRound::new().nearest_to(nearest_to)
    }
}

impl From<RoundMode> for HourRound {
    #[inline]
    fn from(mode: RoundMode) -> HourRound {
        HourRound::new().mode(mode)
    }
}

/// Rounds a datetime to the nearest multiple of N hours.
///
/// The datetime may be given as a [`DateTime`] or as a count of
/// milliseconds since the Unix epoch (`i64`, or `f64` with truncation).
/// The options may be given as an [`HourRound`], as a bare number of hours
/// or as a bare [`RoundMode`].
///
/// The result keeps the date portion of the input, sets the hour to the
/// chosen multiple and zeroes the minute, second and millisecond. When the
/// chosen multiple is hour `24` or later, whole days carry into the
/// calendar. The input is never modified.
///
/// # Rounding behavior
///
/// The position of the input within its day is taken at minute precision:
/// seconds and milliseconds are ignored. The configured [`RoundMode`]
/// (default [`RoundMode::Trunc`]) maps that position to a multiple of N
/// hours. Then a fixed correction step adds N hours when the position is at
/// or past the midpoint of its N-hour window, regardless of the configured
/// mode. With the default mode this yields rounding to the nearest
/// multiple with ties rounding up. With an explicit mode the correction
/// still applies, so for example `Floor` at an exact half hour still rounds
/// up. This mirrors the long-standing behavior of the equivalent operation
/// in other date libraries, quirks included.
///
/// # Errors
///
/// This returns a range error when the configured number of hours is
/// outside `1..=12`. That check happens first: it fails even when the input
/// datetime is invalid.
///
/// An invalid input is not an error. It propagates, so the result is `Ok`
/// carrying the invalid sentinel. Likewise a rounding that carries past the
/// supported year range propagates the sentinel. Check
/// [`DateTime::is_valid`] on the result when either can occur.
///
/// # Example
///
/// ```
/// use nearest_hours::{civil::DateTime, round_to_nearest_hours, HourRound};
///
/// let dt = DateTime::constant(2014, 7, 10, 12, 16, 16, 0);
/// assert_eq!(
///     round_to_nearest_hours(dt, HourRound::new())?,
///     DateTime::constant(2014, 7, 10, 12, 0, 0, 0),
/// );
///
/// // Unix milliseconds for 2014-07-10T12:13:16.
/// assert_eq!(
///     round_to_nearest_hours(1_404_994_396_000i64, HourRound::new())?,
///     DateTime::constant(2014, 7, 10, 12, 0, 0, 0),
/// );
///
/// # Ok::<(), nearest_hours::Error>(())
/// ```
///
/// # Example: granularity and strategy
///
/// ```
/// use nearest_hours::{civil::DateTime, round_to_nearest_hours, HourRound, RoundMode};
///
/// let dt = DateTime::constant(2014, 7, 10, 10, 10, 30, 0);
/// assert_eq!(
///     round_to_nearest_hours(dt, HourRound::new().nearest_to(4))?,
///     DateTime::constant(2014, 7, 10, 12, 0, 0, 0),
/// );
///
/// let dt = DateTime::constant(2014, 7, 10, 12, 10, 30, 5);
/// assert_eq!(
///     round_to_nearest_hours(dt, RoundMode::Ceil)?,
///     DateTime::constant(2014, 7, 10, 13, 0, 0, 0),
/// );
///
/// # Ok::<(), nearest_hours::Error>(())
/// ```
#[inline]
pub fn round_to_nearest_hours(
    datetime: impl Into<DateTime>,
    options: impl Into<HourRound>,
) -> Result<DateTime, Error> {
    options.into().round_datetime(datetime.into())
}

#[cfg(test)]
impl quickcheck::Arbitrary for RoundMode {
    fn arbitrary(g: &mut quickcheck::Gen) -> RoundMode {
        match u8::arbitrary(g) % 4 {
            0 => RoundMode::Ceil,
            1 => RoundMode::Floor,
            2 => RoundMode::Round,
            3 => RoundMode::Trunc,
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Most cases only care about the time of day.
    fn datetime(
        hour: i8,
        minute: i8,
        second: i8,
        millisecond: i16,
    ) -> DateTime {
        DateTime::constant(2014, 7, 10, hour, minute, second, millisecond)
    }

    #[test]
    fn default_rounds_to_nearest_hour() {
        // low
        let got =
            round_to_nearest_hours(datetime(15, 10, 0, 0), HourRound::new())
                .unwrap();
        assert_eq!(got, datetime(15, 0, 0, 0));
        // mid-point
        let got =
            round_to_nearest_hours(datetime(15, 30, 0, 0), HourRound::new())
                .unwrap();
        assert_eq!(got, datetime(16, 0, 0, 0));
        // high
        let got =
            round_to_nearest_hours(datetime(15, 59, 0, 0), HourRound::new())
                .unwrap();
        assert_eq!(got, datetime(16, 0, 0, 0));
    }

    #[test]
    fn ignores_seconds_and_milliseconds() {
        let dt = datetime(12, 16, 16, 0);
        let got = dt.round(HourRound::new()).unwrap();
        assert_eq!(got, datetime(12, 0, 0, 0));

        // 12:13:29.999 is closer to 12:14 than to 12:13, but only the
        // minute counts.
        let dt = datetime(12, 13, 29, 999);
        let got = dt.round(HourRound::new()).unwrap();
        assert_eq!(got, datetime(12, 0, 0, 0));
    }

    #[test]
    fn accepts_unix_milliseconds() {
        // 2014-07-10T12:13:16
        let got =
            round_to_nearest_hours(1_404_994_396_000i64, HourRound::new())
                .unwrap();
        assert_eq!(got, datetime(12, 0, 0, 0));
    }

    #[test]
    fn multiple_of_four_hours() {
        let dt = datetime(10, 10, 30, 0);
        let got = dt.round(HourRound::new().nearest_to(4)).unwrap();
        assert_eq!(got, datetime(12, 0, 0, 0));
        // A bare count of hours converts into options directly.
        assert_eq!(dt.round(4i64).unwrap(), datetime(12, 0, 0, 0));
    }

    #[test]
    fn exact_half_rounds_up() {
        let dt = datetime(12, 30, 0, 0);
        let got = dt.round(HourRound::new()).unwrap();
        assert_eq!(got, datetime(13, 0, 0, 0));
    }

    #[test]
    fn floor_mode() {
        // The midpoint correction overrides floor at an exact half hour.
        let dt = datetime(12, 30, 0, 5);
        let got =
            dt.round(HourRound::new().mode(RoundMode::Floor)).unwrap();
        assert_eq!(got, datetime(13, 0, 0, 0));

        let dt = datetime(15, 10, 30, 5);
        let got = dt
            .round(HourRound::new().nearest_to(4).mode(RoundMode::Floor))
            .unwrap();
        assert_eq!(got, datetime(16, 0, 0, 0));
    }

    #[test]
    fn ceil_mode() {
        let dt = datetime(12, 10, 30, 5);
        let got = dt.round(HourRound::new().mode(RoundMode::Ceil)).unwrap();
        assert_eq!(got, datetime(13, 0, 0, 0));
    }

    #[test]
    fn round_mode() {
        let dt = datetime(12, 10, 30, 5);
        let got = dt
            .round(HourRound::new().nearest_to(4).mode(RoundMode::Round))
            .unwrap();
        assert_eq!(got, datetime(12, 0, 0, 0));
    }

    #[test]
    fn midpoint_correction_stacks_with_round_mode() {
        // An explicit `Round` at an exact midpoint rounds up twice: once in
        // the mode, once in the correction. The default lands one increment
        // lower. Compatibility behavior, not something to fix.
        let dt = datetime(12, 30, 0, 0);
        let got = dt.round(HourRound::new().mode(RoundMode::Round)).unwrap();
        assert_eq!(got, datetime(14, 0, 0, 0));
    }

    #[test]
    fn nearest_to_out_of_range() {
        let dt = datetime(12, 0, 0, 0);
        for nearest_to in [i64::MIN, -1, 0, 13, 24, i64::MAX] {
            let err = dt
                .round(HourRound::new().nearest_to(nearest_to))
                .unwrap_err();
            assert!(err.is_range(), "expected range error: {err}");
        }
        assert!(dt.round(HourRound::new().nearest_to(1)).is_ok());
        assert!(dt.round(HourRound::new().nearest_to(12)).is_ok());
        // 5 and 7 don't divide a day evenly, but only the bound matters.
        assert!(dt.round(HourRound::new().nearest_to(5)).is_ok());
        assert!(dt.round(HourRound::new().nearest_to(7)).is_ok());
    }

    #[test]
    fn nearest_to_checked_before_input() {
        let err = round_to_nearest_hours(
            DateTime::invalid(),
            HourRound::new().nearest_to(13),
        )
        .unwrap_err();
        assert!(err.is_range());
    }

    #[test]
    fn invalid_input_propagates() {
        let got =
            round_to_nearest_hours(f64::NAN, HourRound::new()).unwrap();
        assert!(!got.is_valid());

        let got = DateTime::new(2014, 13, 1, 0, 0, 0, 0)
            .round(HourRound::new().nearest_to(12))
            .unwrap();
        assert!(!got.is_valid());
    }

    #[test]
    fn input_is_unchanged() {
        let dt = datetime(12, 16, 16, 250);
        let copy = dt;
        let got = dt.round(HourRound::new()).unwrap();
        assert_eq!(dt, copy);
        assert_ne!(got, dt);
    }

    #[test]
    fn rounded_results_are_fixed_points() {
        let cases = [
            (datetime(12, 16, 16, 0), HourRound::new()),
            (datetime(10, 10, 30, 0), HourRound::new().nearest_to(4)),
            (datetime(12, 30, 0, 0), HourRound::new()),
            (
                datetime(15, 10, 30, 5),
                HourRound::new().nearest_to(4).mode(RoundMode::Floor),
            ),
            (datetime(12, 10, 30, 5), HourRound::new().mode(RoundMode::Ceil)),
        ];
        for (dt, options) in cases {
            let once = dt.round(options).unwrap();
            let twice = once.round(options).unwrap();
            assert_eq!(once, twice, "re-rounding {once} moved it");
        }
    }

    #[test]
    fn carries_across_midnight() {
        let dt = datetime(23, 59, 0, 0);
        let got = dt.round(HourRound::new()).unwrap();
        assert_eq!(got, DateTime::constant(2014, 7, 11, 0, 0, 0, 0));

        // Ceil plus the midpoint correction can carry past hour 24.
        let dt = datetime(23, 30, 0, 0);
        let got = dt.round(HourRound::new().mode(RoundMode::Ceil)).unwrap();
        assert_eq!(got, DateTime::constant(2014, 7, 11, 1, 0, 0, 0));
    }

    #[test]
    fn carries_across_month_and_year() {
        let dt = DateTime::constant(2014, 12, 31, 23, 31, 0, 0);
        let got = dt.round(HourRound::new()).unwrap();
        assert_eq!(got, DateTime::constant(2015, 1, 1, 0, 0, 0, 0));

        let dt = DateTime::constant(2016, 2, 28, 23, 59, 0, 0);
        let got = dt.round(HourRound::new()).unwrap();
        assert_eq!(got, DateTime::constant(2016, 2, 29, 0, 0, 0, 0));

        let dt = DateTime::constant(2015, 2, 28, 23, 59, 0, 0);
        let got = dt.round(HourRound::new()).unwrap();
        assert_eq!(got, DateTime::constant(2015, 3, 1, 0, 0, 0, 0));
    }

    #[test]
    fn carry_out_of_range_is_invalid() {
        let dt = DateTime::constant(9999, 12, 31, 23, 59, 0, 0);
        let got = dt.round(HourRound::new()).unwrap();
        assert!(!got.is_valid());
    }

    quickcheck::quickcheck! {
        fn prop_sub_hour_fields_are_zero(
            dt: DateTime,
            nearest_to: u8,
            mode: RoundMode
        ) -> bool {
            let nearest_to = i64::from(nearest_to % 12) + 1;
            let options =
                HourRound::new().nearest_to(nearest_to).mode(mode);
            let got = dt.round(options).unwrap();
            !got.is_valid()
                || (got.minute() == 0
                    && got.second() == 0
                    && got.millisecond() == 0)
        }

        fn prop_default_round_is_idempotent(dt: DateTime) -> bool {
            let once = dt.round(HourRound::new()).unwrap();
            if !once.is_valid() {
                return true;
            }
            once.round(HourRound::new()).unwrap() == once
        }

        fn prop_hour_is_multiple_without_carry(
            dt: DateTime,
            nearest_to: u8,
            mode: RoundMode
        ) -> bool {
            let nearest_to = i64::from(nearest_to % 12) + 1;
            let options =
                HourRound::new().nearest_to(nearest_to).mode(mode);
            let got = dt.round(options).unwrap();
            if !got.is_valid()
                || (got.year(), got.month(), got.day())
                    != (dt.year(), dt.month(), dt.day())
            {
                // A carried hour is reduced modulo 24 and need not stay a
                // multiple of `nearest_to`.
                return true;
            }
            i64::from(got.hour()) % nearest_to == 0
        }
    }
}
