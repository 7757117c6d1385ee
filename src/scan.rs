// fmtools/src/scan.rs
//
// Copyright (c) 2025, Frank Pagliughi
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//! Scanning a frequency band for stations.
//!
//! Each channel in the band is tuned in turn, and once the tuner has had
//! time to lock on, the signal strength is sampled a fixed number of
//! times. Channels whose average strength is above a threshold are
//! reported as stations.
//!

use std::time::Duration;

use tracing::{debug, info};

use crate::{freq_to_mhz, mhz_to_freq, Error, Result, Tuner};

/// The full-scale signal strength reported by V4L2 tuners.
pub const MAX_SIGNAL: f64 = 65535.0;

/// Settings for a band scan.
///
/// The defaults cover the US FM broadcast band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanConfig {
    /// The first frequency to check, in MHz
    pub start: f64,
    /// The last frequency to check, in MHz
    pub end: f64,
    /// The distance between channels, in MHz
    pub step: f64,
    /// The fraction of full signal strength needed to report a station
    pub threshold: f64,
    /// The number of signal samples to take on each channel
    pub samples: u32,
    /// Time to wait for the tuner to lock on after tuning
    pub lock_time: Duration,
    /// Time to wait after each signal sample
    pub sample_delay: Duration,
    /// Whether to ignore the frequency range of the tuner
    pub override_range: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            start: 87.9,
            end: 107.9,
            step: 0.2,
            threshold: 0.5,
            samples: 25,
            lock_time: Duration::from_millis(400),
            sample_delay: Duration::from_millis(15),
            override_range: false,
        }
    }
}

/// The bounds of a scan that were pulled in to fit the tuner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeLimits {
    /// The new start, if it was raised to the tuner minimum
    pub start: Option<f64>,
    /// The new end, if it was lowered to the tuner maximum
    pub end: Option<f64>,
}

impl ScanConfig {
    /// Narrows the scan range to what the tuner can receive.
    ///
    /// This does nothing if the range is overridden.
    pub fn limit_to(&mut self, tuner: &Tuner) -> RangeLimits {
        let mut limits = RangeLimits::default();
        if self.override_range {
            return limits;
        }

        let min = freq_to_mhz(tuner.min_freq());
        let max = freq_to_mhz(tuner.max_freq());

        if self.start < min {
            self.start = min;
            limits.start = Some(min);
        }
        if self.end > max {
            self.end = max;
            limits.end = Some(max);
        }
        limits
    }

    /// Gets the frequency of the n'th channel, in MHz.
    fn channel(&self, n: u32) -> f64 {
        self.start + f64::from(n) * self.step
    }
}

/// A station found by the scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    /// The frequency, in MHz
    pub mhz: f64,
    /// The average signal strength, as a fraction of full scale
    pub strength: f64,
}

/// Progress reports from a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanEvent {
    /// The tuner was just set to a new channel, in MHz.
    Tuning(f64),
    /// A signal sample was taken.
    Sample {
        /// The channel, in MHz
        mhz: f64,
        /// The running average strength, as a fraction of full scale
        strength: f64,
        /// The number of samples taken so far on this channel
        count: u32,
        /// The total number of samples for the channel
        total: u32,
    },
    /// A channel finished sampling without finding a station.
    Empty(f64),
    /// A station was found.
    Station(Station),
}

/// Scans the band described by the config, returning the stations found.
///
/// The `progress` callback is invoked as the scan moves along.
pub fn scan<F>(tuner: &mut Tuner, cfg: &ScanConfig, mut progress: F) -> Result<Vec<Station>>
where
    F: FnMut(&ScanEvent),
{
    if !(cfg.step > 0.0) {
        return Err(Error::General(format!(
            "Scan increment must be positive, got {} MHz",
            cfg.step
        )));
    }
    if cfg.samples == 0 {
        return Err(Error::General("Scan needs at least one sample".into()));
    }

    info!(
        "Scanning {:.1} - {:.1} MHz in {:.1} MHz steps",
        cfg.start, cfg.end, cfg.step
    );

    let mut stations = Vec::new();
    let mut n = 0;

    loop {
        let mhz = cfg.channel(n);
        if mhz > cfg.end {
            break;
        }
        n += 1;

        let mut freq = mhz_to_freq(mhz);
        if !cfg.override_range {
            freq = freq.clamp(tuner.min_freq(), tuner.max_freq());
        }
        tuner.set_freq(freq, cfg.override_range)?;
        progress(&ScanEvent::Tuning(mhz));
        tuner.sleep(cfg.lock_time);

        let strength = sample_signal(tuner, cfg, mhz, &mut progress)?;
        debug!("{:.1} MHz: {:.1}%", mhz, strength * 100.0);

        if strength > cfg.threshold {
            let station = Station { mhz, strength };
            progress(&ScanEvent::Station(station));
            stations.push(station);
        }
        else {
            progress(&ScanEvent::Empty(mhz));
        }
    }
    Ok(stations)
}

/// Takes the configured number of signal samples on the current channel,
/// returning the average as a fraction of full scale.
fn sample_signal<F>(tuner: &Tuner, cfg: &ScanConfig, mhz: f64, progress: &mut F) -> Result<f64>
where
    F: FnMut(&ScanEvent),
{
    let mut total: i64 = 0;

    for count in 1..=cfg.samples {
        total += i64::from(tuner.signal()?);
        progress(&ScanEvent::Sample {
            mhz,
            strength: total as f64 / (MAX_SIGNAL * f64::from(count)),
            count,
            total: cfg.samples,
        });
        tuner.sleep(cfg.sample_delay);
    }
    Ok(total as f64 / (MAX_SIGNAL * f64::from(cfg.samples)))
}

// --------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_tuner() -> Tuner {
        Tuner::from_name("test", 0).unwrap()
    }

    #[test]
    fn limits_to_tuner() {
        let tuner = test_tuner();

        let mut cfg = ScanConfig::default();
        let limits = cfg.limit_to(&tuner);
        assert_eq!(limits.start, Some(89.0));
        assert_eq!(limits.end, Some(91.0));
        assert_eq!(cfg.start, 89.0);
        assert_eq!(cfg.end, 91.0);

        let mut cfg = ScanConfig {
            start: 89.5,
            end: 90.5,
            ..ScanConfig::default()
        };
        assert_eq!(cfg.limit_to(&tuner), RangeLimits::default());

        let mut cfg = ScanConfig {
            override_range: true,
            ..ScanConfig::default()
        };
        assert_eq!(cfg.limit_to(&tuner), RangeLimits::default());
        assert_eq!(cfg.start, 87.9);
    }

    #[test]
    fn finds_stations() {
        let mut tuner = test_tuner();
        let mut cfg = ScanConfig::default();
        cfg.limit_to(&tuner);

        let stations = scan(&mut tuner, &cfg, |_| {}).unwrap();
        let mhz: Vec<String> = stations.iter().map(|s| format!("{:.1}", s.mhz)).collect();
        assert_eq!(mhz, vec!["89.6", "90.4"]);
        assert!((stations[0].strength - 64000.0 / MAX_SIGNAL).abs() < 1e-9);
        assert!((stations[1].strength - 50000.0 / MAX_SIGNAL).abs() < 1e-9);
    }

    #[test]
    fn finer_steps_and_threshold() {
        let mut tuner = test_tuner();
        let cfg = ScanConfig {
            start: 89.0,
            end: 91.0,
            step: 0.1,
            ..ScanConfig::default()
        };

        let stations = scan(&mut tuner, &cfg, |_| {}).unwrap();
        let mhz: Vec<String> = stations.iter().map(|s| format!("{:.1}", s.mhz)).collect();
        assert_eq!(mhz, vec!["89.6", "90.4", "90.5"]);

        // 40000 is about 61%, so only two make it over 70%
        let cfg = ScanConfig { threshold: 0.7, ..cfg };
        let stations = scan(&mut tuner, &cfg, |_| {}).unwrap();
        assert_eq!(stations.len(), 2);
    }

    #[test]
    fn progress_events() {
        let mut tuner = test_tuner();
        let cfg = ScanConfig {
            start: 89.6,
            end: 89.6,
            samples: 3,
            ..ScanConfig::default()
        };

        let mut events = Vec::new();
        scan(&mut tuner, &cfg, |ev| events.push(*ev)).unwrap();

        assert_eq!(events.len(), 5);
        assert_eq!(events[0], ScanEvent::Tuning(89.6));
        assert!(matches!(events[1], ScanEvent::Sample { count: 1, total: 3, .. }));
        assert!(matches!(events[3], ScanEvent::Sample { count: 3, total: 3, .. }));
        assert!(matches!(events[4], ScanEvent::Station(Station { mhz, .. }) if mhz == 89.6));
    }

    #[test]
    fn clamps_channels_to_tuner() {
        // Without limiting the config, the out-of-band channels are
        // tuned to the band edges rather than failing.
        let mut tuner = test_tuner();
        let cfg = ScanConfig {
            start: 88.0,
            end: 92.0,
            step: 1.0,
            ..ScanConfig::default()
        };
        let stations = scan(&mut tuner, &cfg, |_| {}).unwrap();
        assert!(stations.is_empty());
        assert_eq!(tuner.freq().unwrap(), tuner.max_freq());
    }

    #[test]
    fn bad_config() {
        let mut tuner = test_tuner();

        let cfg = ScanConfig { step: 0.0, ..ScanConfig::default() };
        assert!(matches!(scan(&mut tuner, &cfg, |_| {}), Err(Error::General(_))));

        let cfg = ScanConfig { samples: 0, ..ScanConfig::default() };
        assert!(matches!(scan(&mut tuner, &cfg, |_| {}), Err(Error::General(_))));
    }
}
