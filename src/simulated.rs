// fmtools/src/simulated.rs
//
// Copyright (c) 2025, Frank Pagliughi
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//! A simulated radio tuner for running the tools without hardware.
//!
//! The simulated tuner covers 89 - 91 MHz and has three "stations" of
//! different strengths at 89.6, 90.4, and 90.5 MHz. Its volume control
//! runs from 1000 to 2000.
//!

use crate::{Error, Result};
use videodev2_sys as sys;

/// The lowest raw value of the volume control
const VOLUME_MIN: i32 = 1000;
/// The highest raw value of the volume control
const VOLUME_MAX: i32 = 2000;

/// Signal strength of frequencies that aren't a station
const NOISE_FLOOR: i32 = 1000;

/// The stations, as (frequency in 1/16 MHz, signal strength).
const STATIONS: [(u32, i32); 3] = [
    (1434, 64000), // 89.6 MHz
    (1446, 50000), // 90.4 MHz
    (1448, 40000), // 90.5 MHz
];

/// State of the simulated tuner.
#[derive(Debug, Clone)]
pub(crate) struct Simulated {
    /// Current frequency in 1/16 MHz
    freq: u32,
    /// Current raw volume
    volume: i32,
    /// Whether the audio is muted
    muted: bool,
}

impl Simulated {
    /// Creates a simulated tuner tuned to 90 MHz at the given volume
    /// percentage.
    pub fn new(volume: f64) -> Self {
        Self {
            freq: 90 * 16,
            volume: (volume * 10.0 + 1000.5) as i32,
            muted: false,
        }
    }

    pub fn query_control(&self, id: u32) -> Result<sys::v4l2_queryctrl> {
        let (minimum, maximum) = match id {
            sys::V4L2_CID_AUDIO_VOLUME => (VOLUME_MIN, VOLUME_MAX),
            sys::V4L2_CID_AUDIO_MUTE => (0, 1),
            _ => return Err(Error::UnsupportedControl(id)),
        };
        Ok(sys::v4l2_queryctrl {
            id,
            minimum,
            maximum,
            step: 1,
            ..Default::default()
        })
    }

    pub fn get_control(&self, id: u32) -> Result<i32> {
        match id {
            sys::V4L2_CID_AUDIO_VOLUME => Ok(self.volume),
            sys::V4L2_CID_AUDIO_MUTE => Ok(i32::from(self.muted)),
            _ => Err(Error::UnsupportedControl(id)),
        }
    }

    pub fn set_control(&mut self, id: u32, value: i32) -> Result<()> {
        match id {
            sys::V4L2_CID_AUDIO_MUTE if value == 0 || value == 1 => {
                self.muted = value == 1;
            }
            sys::V4L2_CID_AUDIO_VOLUME if (VOLUME_MIN..=VOLUME_MAX).contains(&value) => {
                self.volume = value;
            }
            sys::V4L2_CID_AUDIO_MUTE | sys::V4L2_CID_AUDIO_VOLUME => {
                return Err(Error::InvalidControlValue { id, value });
            }
            _ => return Err(Error::UnsupportedControl(id)),
        }
        Ok(())
    }

    pub fn query_tuner(&self, index: u32) -> sys::v4l2_tuner {
        let signal = STATIONS
            .iter()
            .find(|(freq, _)| *freq == self.freq)
            .map(|(_, signal)| *signal)
            .unwrap_or(NOISE_FLOOR);

        sys::v4l2_tuner {
            index,
            type_: sys::V4L2_TUNER_RADIO,
            rangelow: 16 * 89,
            rangehigh: 16 * 91,
            signal,
            ..Default::default()
        }
    }

    pub fn frequency(&self) -> u32 {
        self.freq
    }

    pub fn set_frequency(&mut self, freq: u32) {
        self.freq = freq;
    }
}

// --------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let sim = Simulated::new(50.0);
        assert_eq!(sim.frequency(), 1440);
        assert_eq!(sim.get_control(sys::V4L2_CID_AUDIO_VOLUME).unwrap(), 1500);
        assert_eq!(sim.get_control(sys::V4L2_CID_AUDIO_MUTE).unwrap(), 0);

        let sim = Simulated::new(12.5);
        assert_eq!(sim.get_control(sys::V4L2_CID_AUDIO_VOLUME).unwrap(), 1125);
    }

    #[test]
    fn signal_follows_frequency() {
        let mut sim = Simulated::new(50.0);
        assert_eq!(sim.query_tuner(0).signal, NOISE_FLOOR);

        sim.set_frequency(1434);
        assert_eq!(sim.query_tuner(0).signal, 64000);
        sim.set_frequency(1446);
        assert_eq!(sim.query_tuner(0).signal, 50000);
        sim.set_frequency(1448);
        assert_eq!(sim.query_tuner(0).signal, 40000);
        sim.set_frequency(1447);
        assert_eq!(sim.query_tuner(0).signal, NOISE_FLOOR);
    }

    #[test]
    fn rejects_bad_controls() {
        let mut sim = Simulated::new(50.0);

        assert!(matches!(
            sim.set_control(sys::V4L2_CID_AUDIO_VOLUME, 2001),
            Err(Error::InvalidControlValue { value: 2001, .. })
        ));
        assert!(matches!(
            sim.set_control(sys::V4L2_CID_AUDIO_MUTE, 2),
            Err(Error::InvalidControlValue { value: 2, .. })
        ));
        assert!(matches!(
            sim.query_control(sys::V4L2_CID_BASE),
            Err(Error::UnsupportedControl(sys::V4L2_CID_BASE))
        ));

        // Nothing changed
        assert_eq!(sim.get_control(sys::V4L2_CID_AUDIO_VOLUME).unwrap(), 1500);
    }
}
