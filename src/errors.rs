// fmtools/src/errors.rs
//
// Copyright (c) 2018-2025, Frank Pagliughi
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//!
//! Error definitions for the radio tuner library.

use std::{io, path::PathBuf};
use thiserror::Error;

/// The Error type for the tuner library
#[derive(Error, Debug)]
pub enum Error {
    /// A low-level I/O error
    #[error("{0}")]
    Io(#[from] io::Error),
    /// The tuner device node could not be opened.
    #[error("Unable to open {}: {source}", .path.display())]
    Open {
        /// Path to the device node
        path: PathBuf,
        /// The underlying OS error
        source: io::Error,
    },
    /// A V4L2 request was rejected by the driver.
    #[error("{request}: {source}")]
    Ioctl {
        /// Name of the request, like "VIDIOC_S_FREQUENCY"
        request: &'static str,
        /// The errno reported by the driver
        source: nix::Error,
    },
    /// A frequency outside the band supported by the tuner.
    #[error("Frequency {freq:.1} MHz out of range ({min:.1} - {max:.1} MHz)")]
    FrequencyOutOfRange {
        /// The requested frequency, in MHz
        freq: f64,
        /// The lowest frequency of the tuner, in MHz
        min: f64,
        /// The highest frequency of the tuner, in MHz
        max: f64,
    },
    /// The radio has no usable volume control.
    #[error("Radio does not support volume control")]
    NoVolumeControl,
    /// A control that the backend does not implement.
    #[error("Unsupported control: {0:#x}")]
    UnsupportedControl(u32),
    /// A value outside the range allowed for a control.
    #[error("Invalid value {value} for control {id:#x}")]
    InvalidControlValue {
        /// The control ID
        id: u32,
        /// The rejected value
        value: i32,
    },
    /// A generic error with a string explanation
    #[error("{0}")]
    General(String),
}

/// The default result type for the tuner library
pub type Result<T> = std::result::Result<T, Error>;
