/*!
Rounds a civil datetime to the nearest multiple of N hours.

This crate does one thing: given a point in civil time, it picks the
multiple of N hours (with N in `1..=12`) that the point rounds to, using a
selectable [`RoundMode`], and returns a fresh datetime on that hour with the
sub-hour fields zeroed. The input may be a [`civil::DateTime`] or a count of
milliseconds since the Unix epoch.

# Example

```
use nearest_hours::{civil::DateTime, round_to_nearest_hours, HourRound};

let dt = DateTime::constant(2014, 7, 10, 12, 16, 16, 0);
let rounded = round_to_nearest_hours(dt, HourRound::new())?;
assert_eq!(rounded, DateTime::constant(2014, 7, 10, 12, 0, 0, 0));

// Round to a quarter of a day instead.
let dt = DateTime::constant(2014, 7, 10, 10, 10, 30, 0);
let rounded = round_to_nearest_hours(dt, HourRound::new().nearest_to(4))?;
assert_eq!(rounded, DateTime::constant(2014, 7, 10, 12, 0, 0, 0));

# Ok::<(), nearest_hours::Error>(())
```

# Invalid datetimes

A [`civil::DateTime`] carries a validity flag instead of making every
constructor fallible. Out-of-range fields, unrepresentable timestamps and
non-finite `f64` timestamps all produce an invalid sentinel, and rounding an
invalid datetime succeeds with an invalid result. The only operation in this
crate that returns an [`Error`] is rounding with a number of hours outside
`1..=12`.

```
use nearest_hours::{civil::DateTime, round_to_nearest_hours, HourRound};

let rounded = round_to_nearest_hours(f64::NAN, HourRound::new())?;
assert!(!rounded.is_valid());

# Ok::<(), nearest_hours::Error>(())
```

# Crate features

* **std** (enabled by default) - Implements the `std::error::Error` trait
for this crate's error type. Otherwise, this crate is `no_std` and needs
neither `alloc` nor a platform.
* **logging** - Emits messages through the [`log`](https://docs.rs/log)
crate facade at trace/debug level from the conversion and rounding
routines.
*/

#![no_std]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub use crate::{
    error::Error,
    round::{round_to_nearest_hours, HourRound, RoundMode},
};

#[macro_use]
mod logging;

pub mod civil;
mod error;
mod round;
