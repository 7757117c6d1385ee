// fmtools/src/tuner.rs
//
// Copyright (c) 2018-2025, Frank Pagliughi
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//! V4L2 Radio Tuners.
//!
//! A [`Tuner`] is a handle to one tuner on a Video4Linux2 radio device.
//! It converts between the units used by the driver and the ones used by
//! people: volume is a percentage, and frequencies are in units of
//! 1/16000 MHz (62.5 Hz), which can hold the precision of any tuner
//! regardless of whether it works in "low" units of 62.5 Hz or in the
//! standard units of 62.5 kHz.
//!

use std::{
    fmt,
    fs::{File, OpenOptions},
    os::unix::io::AsRawFd,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use nix::errno::Errno;
use tracing::{debug, warn};
use videodev2_sys as sys;

use crate::{simulated::Simulated, Error, Result};

/// The device node used when none is specified.
pub const DEFAULT_DEVICE: &str = "/dev/radio0";

/// The number of tuner frequency units in one MHz.
pub const FREQ_UNITS_PER_MHZ: f64 = 16000.0;

/// The volume of the simulated tuner, if not otherwise given.
const DEFAULT_TEST_VOLUME: f64 = 50.0;

/// Converts a frequency in MHz to tuner units, rounding to the nearest.
pub fn mhz_to_freq(mhz: f64) -> i64 {
    (mhz * FREQ_UNITS_PER_MHZ + 0.5) as i64
}

/// Converts a frequency in tuner units to MHz.
pub fn freq_to_mhz(freq: i64) -> f64 {
    freq as f64 / FREQ_UNITS_PER_MHZ
}

// --------------------------------------------------------------------------

/// The source of a tuner.
#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    /// A V4L2 radio device node, like "/dev/radio0"
    Device(PathBuf),
    /// A simulated tuner, with the initial volume as a percentage.
    Test {
        /// The initial volume, in percent
        volume: f64,
    },
}

impl Backend {
    /// Selects a backend by name.
    ///
    /// The name "test" selects the simulated tuner, which may be followed
    /// by an initial volume, like "test 30". Anything else is taken as the
    /// path to a device node.
    pub fn from_name(name: &str) -> Self {
        if name == "test" {
            return Backend::Test { volume: DEFAULT_TEST_VOLUME };
        }
        if let Some(arg) = name.strip_prefix("test ") {
            let volume = arg
                .split_whitespace()
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TEST_VOLUME);
            return Backend::Test { volume };
        }
        Backend::Device(PathBuf::from(name))
    }
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Device(PathBuf::from(DEFAULT_DEVICE))
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Device(path) => write!(f, "{}", path.display()),
            Backend::Test { volume } => write!(f, "test {}", volume),
        }
    }
}

// --------------------------------------------------------------------------

/// What actually services the requests.
#[derive(Debug)]
enum Handle {
    Device(File),
    Simulated(Simulated),
}

/// A V4L2 radio tuner.
///
/// The volume control and the tuner description are read once, when the
/// tuner is opened. The device is closed when the tuner is dropped.
#[derive(Debug)]
pub struct Tuner {
    handle: Handle,
    /// The tuner index on the device
    index: u32,
    /// The volume control, if the radio has a usable one
    volume_ctrl: Option<sys::v4l2_queryctrl>,
    /// The tuner description
    tuner: sys::v4l2_tuner,
}

impl Tuner {
    /// Opens the first tuner on the default device.
    pub fn new() -> Result<Self> {
        Self::with_backend(Backend::default(), 0)
    }

    /// Opens a tuner using the device or test name, as understood by
    /// [`Backend::from_name()`].
    pub fn from_name(name: &str, index: u32) -> Result<Self> {
        Self::with_backend(Backend::from_name(name), index)
    }

    /// Opens the tuner with the specified index on a V4L2 device node.
    pub fn from_device<P: AsRef<Path>>(path: P, index: u32) -> Result<Self> {
        Self::with_backend(Backend::Device(path.as_ref().to_path_buf()), index)
    }

    /// Opens a tuner from the specified backend.
    pub fn with_backend(backend: Backend, index: u32) -> Result<Self> {
        let handle = match backend {
            Backend::Device(path) => {
                debug!("Opening radio device {}", path.display());
                let file = OpenOptions::new()
                    .read(true)
                    .open(&path)
                    .map_err(|source| Error::Open { path, source })?;
                Handle::Device(file)
            }
            Backend::Test { volume } => {
                debug!("Opening test tuner at {}% volume", volume);
                Handle::Simulated(Simulated::new(volume))
            }
        };

        let mut tuner = Self {
            handle,
            index,
            volume_ctrl: None,
            tuner: sys::v4l2_tuner::default(),
        };

        tuner.volume_ctrl = tuner.query_volume_control()?;
        tuner.tuner = tuner.query_tuner()?;
        debug!(
            "Tuner {}: range {} - {}, capability {:#x}",
            index, tuner.tuner.rangelow, tuner.tuner.rangehigh, tuner.tuner.capability
        );
        Ok(tuner)
    }

    /// Closes the tuner.
    ///
    /// This consumes the tuner to close the device.
    pub fn close(self) {}

    /// Gets the index of the tuner on the device.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Determines whether this is the simulated tuner.
    pub fn is_test(&self) -> bool {
        matches!(self.handle, Handle::Simulated(_))
    }

    // ----- Audio -----

    /// Mutes or unmutes the audio.
    pub fn set_mute(&mut self, mute: bool) -> Result<()> {
        self.set_control(sys::V4L2_CID_AUDIO_MUTE, i32::from(mute))
    }

    /// Determines whether the audio is muted.
    pub fn is_muted(&self) -> Result<bool> {
        Ok(self.get_control(sys::V4L2_CID_AUDIO_MUTE)? != 0)
    }

    /// Determines if the radio has a volume control.
    pub fn has_volume_control(&self) -> bool {
        self.volume_ctrl.is_some()
    }

    /// Gets the volume, as a percentage of the full range.
    pub fn volume(&self) -> Result<f64> {
        let vqc = self.volume_ctrl.ok_or(Error::NoVolumeControl)?;
        let volume = self.get_control(sys::V4L2_CID_AUDIO_VOLUME)?;
        Ok(raw_to_percent(volume, &vqc))
    }

    /// Sets the volume, as a percentage of the full range.
    ///
    /// The value is clamped to 0 - 100.
    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        let vqc = self.volume_ctrl.ok_or(Error::NoVolumeControl)?;
        self.set_control(sys::V4L2_CID_AUDIO_VOLUME, percent_to_raw(volume, &vqc))
    }

    // ----- Frequency -----

    /// The multiplier from the driver's units to ours.
    fn freq_scale(&self) -> i64 {
        if self.tuner.capability & sys::V4L2_TUNER_CAP_LOW != 0 {
            1
        }
        else {
            1000
        }
    }

    /// Gets the lowest frequency the tuner can receive, in 1/16000 MHz.
    pub fn min_freq(&self) -> i64 {
        i64::from(self.tuner.rangelow) * self.freq_scale()
    }

    /// Gets the highest frequency the tuner can receive, in 1/16000 MHz.
    pub fn max_freq(&self) -> i64 {
        i64::from(self.tuner.rangehigh) * self.freq_scale()
    }

    /// Gets the current frequency, in 1/16000 MHz.
    pub fn freq(&self) -> Result<i64> {
        let native = match &self.handle {
            Handle::Simulated(sim) => sim.frequency(),
            Handle::Device(file) => {
                let mut vf = sys::v4l2_frequency {
                    tuner: self.index,
                    ..Default::default()
                };
                unsafe { sys::vidioc_g_frequency(file.as_raw_fd(), &mut vf) }
                    .map_err(|source| ioctl_err("VIDIOC_G_FREQUENCY", source))?;
                vf.frequency
            }
        };
        Ok(i64::from(native) * self.freq_scale())
    }

    /// Tunes to a frequency, in 1/16000 MHz.
    ///
    /// Frequencies outside the band reported by the tuner are rejected
    /// unless `override_range` is set.
    pub fn set_freq(&mut self, freq: i64, override_range: bool) -> Result<()> {
        let scale = self.freq_scale();
        let native = if scale == 1 {
            freq
        }
        else {
            match freq.checked_add(500) {
                Some(f) => f / 1000,
                None => return Err(self.out_of_range(freq)),
            }
        };

        let in_range = native >= i64::from(self.tuner.rangelow)
            && native <= i64::from(self.tuner.rangehigh);

        let native = match u32::try_from(native) {
            Ok(n) if in_range || override_range => n,
            _ => return Err(self.out_of_range(freq)),
        };

        debug!("Setting tuner {} frequency to {}", self.index, native);
        match &mut self.handle {
            Handle::Simulated(sim) => sim.set_frequency(native),
            Handle::Device(file) => {
                let vf = sys::v4l2_frequency {
                    tuner: self.index,
                    type_: self.tuner.type_,
                    frequency: native,
                    ..Default::default()
                };
                unsafe { sys::vidioc_s_frequency(file.as_raw_fd(), &vf) }
                    .map_err(|source| ioctl_err("VIDIOC_S_FREQUENCY", source))?;
            }
        }
        Ok(())
    }

    fn out_of_range(&self, freq: i64) -> Error {
        Error::FrequencyOutOfRange {
            freq: freq_to_mhz(freq),
            min: freq_to_mhz(self.min_freq()),
            max: freq_to_mhz(self.max_freq()),
        }
    }

    // ----- Signal -----

    /// Gets the current signal strength, in the range 0 - 65535.
    pub fn signal(&self) -> Result<i32> {
        Ok(self.query_tuner()?.signal)
    }

    /// Waits for the hardware to settle.
    ///
    /// This returns immediately for the simulated tuner.
    pub fn sleep(&self, dur: Duration) {
        if !self.is_test() {
            thread::sleep(dur);
        }
    }

    // ----- Driver requests -----

    /// Queries the volume control, returning `None` if the driver
    /// doesn't have one or has it disabled.
    fn query_volume_control(&self) -> Result<Option<sys::v4l2_queryctrl>> {
        let vqc = match self.query_control(sys::V4L2_CID_AUDIO_VOLUME) {
            Ok(vqc) => vqc,
            Err(Error::Ioctl { source: Errno::EINVAL, .. }) => {
                warn!("Radio has no volume control");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        if vqc.flags & sys::V4L2_CTRL_FLAG_DISABLED != 0 {
            warn!("Radio volume control is disabled");
            return Ok(None);
        }
        Ok(Some(vqc))
    }

    fn query_control(&self, id: u32) -> Result<sys::v4l2_queryctrl> {
        match &self.handle {
            Handle::Simulated(sim) => sim.query_control(id),
            Handle::Device(file) => {
                let mut qc = sys::v4l2_queryctrl {
                    id,
                    ..Default::default()
                };
                unsafe { sys::vidioc_queryctrl(file.as_raw_fd(), &mut qc) }
                    .map_err(|source| ioctl_err("VIDIOC_QUERYCTRL", source))?;
                Ok(qc)
            }
        }
    }

    fn get_control(&self, id: u32) -> Result<i32> {
        match &self.handle {
            Handle::Simulated(sim) => sim.get_control(id),
            Handle::Device(file) => {
                let mut ctrl = sys::v4l2_control { id, value: 0 };
                unsafe { sys::vidioc_g_ctrl(file.as_raw_fd(), &mut ctrl) }
                    .map_err(|source| ioctl_err("VIDIOC_G_CTRL", source))?;
                Ok(ctrl.value)
            }
        }
    }

    fn set_control(&mut self, id: u32, value: i32) -> Result<()> {
        debug!("Setting control {:#x} to {}", id, value);
        match &mut self.handle {
            Handle::Simulated(sim) => sim.set_control(id, value),
            Handle::Device(file) => {
                let mut ctrl = sys::v4l2_control { id, value };
                unsafe { sys::vidioc_s_ctrl(file.as_raw_fd(), &mut ctrl) }
                    .map_err(|source| ioctl_err("VIDIOC_S_CTRL", source))?;
                Ok(())
            }
        }
    }

    fn query_tuner(&self) -> Result<sys::v4l2_tuner> {
        match &self.handle {
            Handle::Simulated(sim) => Ok(sim.query_tuner(self.index)),
            Handle::Device(file) => {
                let mut vt = sys::v4l2_tuner {
                    index: self.index,
                    ..Default::default()
                };
                unsafe { sys::vidioc_g_tuner(file.as_raw_fd(), &mut vt) }
                    .map_err(|source| ioctl_err("VIDIOC_G_TUNER", source))?;
                Ok(vt)
            }
        }
    }
}

fn ioctl_err(request: &'static str, source: nix::Error) -> Error {
    debug!("{} failed: {}", request, source);
    Error::Ioctl { request, source }
}

/// Converts a raw control value to a percentage of the control's range.
fn raw_to_percent(value: i32, vqc: &sys::v4l2_queryctrl) -> f64 {
    let span = f64::from(vqc.maximum) - f64::from(vqc.minimum);
    if span <= 0.0 {
        return 0.0;
    }
    100.0 * (f64::from(value) - f64::from(vqc.minimum)) / span
}

/// Converts a percentage to a raw control value, truncating toward zero.
fn percent_to_raw(pct: f64, vqc: &sys::v4l2_queryctrl) -> i32 {
    let span = f64::from(vqc.maximum) - f64::from(vqc.minimum);
    (pct.clamp(0.0, 100.0) / 100.0 * span + f64::from(vqc.minimum)) as i32
}

// --------------------------------------------------------------------------
