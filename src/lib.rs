// fmtools/src/lib.rs
//
// Copyright (c) 2018-2025, Frank Pagliughi
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//!
//! Simple control of Video4Linux2 radio tuners.
//!
//! This is a small library for the FM tuners found on radio cards and USB
//! radio sticks under Linux, along with the `fm` and `fmscan` utilities
//! that use it. It can set the frequency, volume, and mute state of a
//! tuner, read the signal strength, and scan a band for stations.
//!
//! Opening the device named "test" gives a simulated tuner that can be
//! used without any hardware.
//!
//! For more information, see:
//!
//!   [V4L2 Tuners](https://www.kernel.org/doc/html/latest/userspace-api/media/v4l/tuner.html)
//!

// Lints
// This may be overkill.
#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

pub use crate::config::*;
pub use crate::errors::*;
pub use crate::scan::*;
pub use crate::tuner::*;
pub use crate::wait::*;

mod simulated;

pub mod config;
pub mod errors;
pub mod scan;
pub mod tuner;
pub mod wait;

/// The version of the library and utilities.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// --------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // The simulated tuner should work through the public API alone.
    #[test]
    fn test_tuner() {
        let mut tuner = Tuner::from_name("test", 0).unwrap();
        assert!(tuner.is_test());
        assert_eq!(tuner.index(), 0);

        tuner.set_freq(mhz_to_freq(90.4), false).unwrap();
        tuner.set_volume(25.0).unwrap();
        assert_eq!(tuner.volume().unwrap(), 25.0);
        assert_eq!(tuner.signal().unwrap(), 50000);
        tuner.close();
    }
}
