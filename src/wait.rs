// fmtools/src/wait.rs
//
// Copyright (c) 2025, Frank Pagliughi
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//! How long to keep the radio device open after tuning.
//!
//! Some drivers mute the card when the device is closed, so `fm` can be
//! asked to hang around for a while. Times are given as a count with an
//! optional unit suffix, like "90", "30s", "15m", "2h", or "1d", or as
//! one of the words "none" or "forever".
//!

use std::{fmt, str::FromStr, time::Duration};

use crate::Error;

/// Unit of a wait time, as given by its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// 's' or no suffix
    Seconds,
    /// 'm'
    Minutes,
    /// 'h'
    Hours,
    /// 'd'
    Days,
}

impl TimeUnit {
    fn secs(&self) -> u64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => 60,
            TimeUnit::Hours => 60 * 60,
            TimeUnit::Days => 24 * 60 * 60,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            TimeUnit::Seconds => "second",
            TimeUnit::Minutes => "minute",
            TimeUnit::Hours => "hour",
            TimeUnit::Days => "day",
        }
    }
}

/// How long to wait after tuning.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WaitTime {
    /// Don't wait at all.
    #[default]
    None,
    /// Wait until interrupted.
    Forever,
    /// Wait for a number of time units.
    For(u64, TimeUnit),
}

impl WaitTime {
    /// Gets the time to wait, or `None` if the wait is zero or unbounded.
    pub fn duration(&self) -> Option<Duration> {
        match *self {
            WaitTime::For(n, unit) if n > 0 => {
                Some(Duration::from_secs(n.saturating_mul(unit.secs())))
            }
            _ => None,
        }
    }
}

impl FromStr for WaitTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "forever" | "-" => return Ok(WaitTime::Forever),
            "none" | "0" => return Ok(WaitTime::None),
            _ => (),
        }
        if s.starts_with('-') && s[1..].starts_with(|c: char| c.is_ascii_digit()) {
            return Ok(WaitTime::Forever);
        }

        // Unlike the old C tool, text without a count is rejected and a
        // zero count means no wait; neither falls through to "forever".
        let ndig = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        if ndig == 0 {
            return Err(Error::General(format!("Invalid time: '{}'", s)));
        }

        let n: u64 = s[..ndig]
            .parse()
            .map_err(|_| Error::General(format!("Invalid time: '{}'", s)))?;

        let unit = match s[ndig..].chars().next() {
            Some('m') => TimeUnit::Minutes,
            Some('h') => TimeUnit::Hours,
            Some('d') => TimeUnit::Days,
            _ => TimeUnit::Seconds,
        };

        if n == 0 {
            Ok(WaitTime::None)
        }
        else {
            Ok(WaitTime::For(n, unit))
        }
    }
}

impl fmt::Display for WaitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitTime::None => write!(f, "none"),
            WaitTime::Forever => write!(f, "forever"),
            WaitTime::For(n, unit) => write!(f, "{} {}(s)", n, unit.name()),
        }
    }
}

// --------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_words() {
        assert_eq!("forever".parse::<WaitTime>().unwrap(), WaitTime::Forever);
        assert_eq!("-".parse::<WaitTime>().unwrap(), WaitTime::Forever);
        assert_eq!("-5".parse::<WaitTime>().unwrap(), WaitTime::Forever);
        assert_eq!("none".parse::<WaitTime>().unwrap(), WaitTime::None);
        assert_eq!("0".parse::<WaitTime>().unwrap(), WaitTime::None);
        assert_eq!("00m".parse::<WaitTime>().unwrap(), WaitTime::None);
        assert!("soon".parse::<WaitTime>().is_err());
        assert!("".parse::<WaitTime>().is_err());
    }

    #[test]
    fn parse_units() {
        let wt: WaitTime = "90".parse().unwrap();
        assert_eq!(wt, WaitTime::For(90, TimeUnit::Seconds));
        assert_eq!(wt.duration(), Some(Duration::from_secs(90)));

        let wt: WaitTime = "15m".parse().unwrap();
        assert_eq!(wt.duration(), Some(Duration::from_secs(15 * 60)));

        let wt: WaitTime = "2h".parse().unwrap();
        assert_eq!(wt.duration(), Some(Duration::from_secs(2 * 3600)));

        let wt: WaitTime = "1d".parse().unwrap();
        assert_eq!(wt.duration(), Some(Duration::from_secs(86400)));

        // Unknown suffix is seconds
        let wt: WaitTime = "7x".parse().unwrap();
        assert_eq!(wt, WaitTime::For(7, TimeUnit::Seconds));

        assert_eq!(WaitTime::Forever.duration(), None);
        assert_eq!(WaitTime::None.duration(), None);
    }

    #[test]
    fn display() {
        assert_eq!("forever".parse::<WaitTime>().unwrap().to_string(), "forever");
        assert_eq!("none".parse::<WaitTime>().unwrap().to_string(), "none");
        assert_eq!("30".parse::<WaitTime>().unwrap().to_string(), "30 second(s)");
        assert_eq!("15m".parse::<WaitTime>().unwrap().to_string(), "15 minute(s)");
        assert_eq!("2h".parse::<WaitTime>().unwrap().to_string(), "2 hour(s)");
        assert_eq!("1d".parse::<WaitTime>().unwrap().to_string(), "1 day(s)");
    }
}
