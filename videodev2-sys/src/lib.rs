// videodev2-sys/src/lib.rs
//
// Copyright (c) 2025, Frank Pagliughi
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//! Raw definitions for the radio tuner subset of the Linux
//! Video4Linux2 API, from `<linux/videodev2.h>`.
//!
//! Only the structures and requests needed to drive an FM tuner are
//! covered: control queries, control get/set, tuner queries, and
//! frequency get/set. The ioctl wrappers are generated with the `nix`
//! ioctl macros, and are all `unsafe`, taking the raw file descriptor of
//! an open device node.
//!

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]

use nix::{ioctl_readwrite, ioctl_write_ptr};

// ----- Control IDs -----

/// Base of the user-class control IDs.
pub const V4L2_CID_BASE: u32 = 0x0098_0900;

/// The audio volume control.
pub const V4L2_CID_AUDIO_VOLUME: u32 = V4L2_CID_BASE + 5;
/// The audio mute control (boolean).
pub const V4L2_CID_AUDIO_MUTE: u32 = V4L2_CID_BASE + 9;

// ----- Control flags -----

/// The control is permanently disabled and should be ignored.
pub const V4L2_CTRL_FLAG_DISABLED: u32 = 0x0001;

// ----- Tuner types & capabilities -----

/// A radio tuner.
pub const V4L2_TUNER_RADIO: u32 = 1;

/// Frequencies are in units of 62.5 Hz rather than 62.5 kHz.
pub const V4L2_TUNER_CAP_LOW: u32 = 0x0001;

// ----- Structures -----

/// Description of a device control (`struct v4l2_queryctrl`).
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct v4l2_queryctrl {
    pub id: u32,
    pub type_: u32,
    pub name: [u8; 32],
    pub minimum: i32,
    pub maximum: i32,
    pub step: i32,
    pub default_value: i32,
    pub flags: u32,
    pub reserved: [u32; 2],
}

/// The value of a single control (`struct v4l2_control`).
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct v4l2_control {
    pub id: u32,
    pub value: i32,
}

/// Description of a tuner (`struct v4l2_tuner`).
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct v4l2_tuner {
    pub index: u32,
    pub name: [u8; 32],
    pub type_: u32,
    pub capability: u32,
    pub rangelow: u32,
    pub rangehigh: u32,
    pub rxsubchans: u32,
    pub audmode: u32,
    pub signal: i32,
    pub afc: i32,
    pub reserved: [u32; 4],
}

/// A tuner frequency (`struct v4l2_frequency`).
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct v4l2_frequency {
    pub tuner: u32,
    pub type_: u32,
    pub frequency: u32,
    pub reserved: [u32; 8],
}

// ----- Requests -----

const VIDIOC_MAGIC: u8 = b'V';

ioctl_readwrite!(vidioc_g_ctrl, VIDIOC_MAGIC, 27, v4l2_control);
ioctl_readwrite!(vidioc_s_ctrl, VIDIOC_MAGIC, 28, v4l2_control);
ioctl_readwrite!(vidioc_g_tuner, VIDIOC_MAGIC, 29, v4l2_tuner);
ioctl_readwrite!(vidioc_queryctrl, VIDIOC_MAGIC, 36, v4l2_queryctrl);
ioctl_readwrite!(vidioc_g_frequency, VIDIOC_MAGIC, 56, v4l2_frequency);
ioctl_write_ptr!(vidioc_s_frequency, VIDIOC_MAGIC, 57, v4l2_frequency);

// --------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    // The request codes encode the struct sizes, so these must match the
    // kernel's layout exactly.
    #[test]
    fn struct_sizes() {
        assert_eq!(size_of::<v4l2_queryctrl>(), 68);
        assert_eq!(size_of::<v4l2_control>(), 8);
        assert_eq!(size_of::<v4l2_tuner>(), 84);
        assert_eq!(size_of::<v4l2_frequency>(), 44);
    }

    #[test]
    fn control_ids() {
        assert_eq!(V4L2_CID_AUDIO_VOLUME, 0x0098_0905);
        assert_eq!(V4L2_CID_AUDIO_MUTE, 0x0098_0909);
    }
}
