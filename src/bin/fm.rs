// fmtools/src/bin/fm.rs
//
// Copyright (c) 2025, Frank Pagliughi
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//

//! A small controller for Video4Linux2 radio devices.
//!
//! Tunes the radio to a frequency, sets the volume, or turns the audio
//! on or off:
//!
//! ```text
//! $ fm 94.3 25
//! Radio tuned to 94.30 MHz at 25.00% volume
//! ```
//!

use clap::{Arg, ArgAction, ArgMatches, Command};
use fmtools::{self as fm, Config, Error, Tuner, WaitTime};
use std::{io, path::Path, process, sync::mpsc};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Command::new("fm")
        .version(clap::crate_version!())
        .about("A small controller for Video for Linux radio devices.")
        .arg(
            Arg::new("override")
                .short('o')
                .action(ArgAction::SetTrue)
                .help("Override frequency range limits of card"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .help("Quiet mode"),
        )
        .arg(
            Arg::new("device")
                .short('d')
                .value_name("dev")
                .action(ArgAction::Set)
                .help("Select device (default: /dev/radio0)"),
        )
        .arg(
            Arg::new("tuner")
                .short('t')
                .value_name("tuner")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(u32))
                .help("Select tuner (default: 0)"),
        )
        .arg(
            Arg::new("time")
                .short('T')
                .value_name("time")
                .action(ArgAction::Set)
                .help("After setting frequency, sleep for some time (none|forever|<n>[smhd])"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .value_name("file")
                .action(ArgAction::Set)
                .help("Read settings from file (default: ~/.fmrc)"),
        )
        .arg(
            Arg::new("command")
                .required(true)
                .allow_hyphen_values(true)
                .value_name("freq|on|off|+|-")
                .help("Frequency in MHz (i.e. 94.3), on, off (mute), + or - volume"),
        )
        .arg(
            Arg::new("volume")
                .value_parser(clap::value_parser!(f64))
                .help("Volume percentage (0-100)"),
        )
        .get_matches();

    if let Err(err) = run(&args) {
        eprintln!("fm: {}", err);
        process::exit(1);
    }
}

fn run(args: &ArgMatches) -> fm::Result<()> {
    let quiet = args.get_one::<bool>("quiet").copied().unwrap_or(false);
    let override_range = args.get_one::<bool>("override").copied().unwrap_or(false);
    let index = args.get_one::<u32>("tuner").copied().unwrap_or(0);

    let cfg = Config::load(args.get_one::<String>("config").map(Path::new))?;

    let wait_time = match args.get_one::<String>("time") {
        Some(s) => s.parse()?,
        None => cfg.wait_time.unwrap_or_default(),
    };

    let mut tuner = match args.get_one::<String>("device") {
        Some(dev) => Tuner::from_name(dev, index)?,
        None => Tuner::with_backend(fm::Backend::default(), index)?,
    };

    let cmd = args
        .get_one::<String>("command")
        .map(String::as_str)
        .unwrap_or_default();

    match cmd {
        "off" => {
            tuner.set_mute(true)?;
            if !quiet {
                println!("Radio muted");
            }
        }
        "on" => {
            tuner.set_mute(false)?;
            if !quiet {
                println!("Radio on{}", volume_note(&tuner)?);
            }
        }
        "+" | "-" => {
            if !tuner.has_volume_control() {
                return Err(Error::NoVolumeControl);
            }
            let incr = if cmd == "+" { cfg.increment } else { -cfg.increment };
            let volume = (tuner.volume()? + incr).clamp(0.0, 100.0);
            tuner.set_volume(volume)?;

            if !quiet {
                println!("Setting volume to {:.2}%{}", volume, mute_note(&tuner)?);
            }
        }
        _ => {
            let mhz = match cmd.parse::<f64>() {
                Ok(mhz) if mhz != 0.0 => mhz,
                _ => {
                    return Err(Error::General(
                        "unrecognized command syntax; use --help for help".into(),
                    ))
                }
            };
            let volume = args
                .get_one::<f64>("volume")
                .map(|v| v.clamp(0.0, 100.0))
                .unwrap_or(cfg.default_volume);

            tuner.set_freq(fm::mhz_to_freq(mhz), override_range)?;
            if tuner.has_volume_control() {
                tuner.set_volume(volume)?;
            }

            if !quiet {
                println!(
                    "Radio tuned to {:2.2} MHz{}{}",
                    mhz,
                    volume_note(&tuner)?,
                    mute_note(&tuner)?
                );
            }
        }
    }

    maybe_sleep(&tuner, wait_time)?;
    tuner.close();
    Ok(())
}

/// Describes the volume, to follow a status message.
fn volume_note(tuner: &Tuner) -> fm::Result<String> {
    if tuner.has_volume_control() {
        Ok(format!(" at {:.2}% volume", tuner.volume()?))
    }
    else {
        Ok(" (radio does not support volume control)".to_string())
    }
}

/// Warns if the audio is muted, to follow a status message.
fn mute_note(tuner: &Tuner) -> fm::Result<&'static str> {
    if tuner.is_muted()? {
        Ok(" (radio is muted, use \"fm on\" to unmute)")
    }
    else {
        Ok("")
    }
}

/// Holds the device open for the requested time.
fn maybe_sleep(tuner: &Tuner, wait_time: WaitTime) -> fm::Result<()> {
    match wait_time {
        WaitTime::Forever => {
            println!("Sleeping forever...CTRL-C exits");
            let (tx, rx) = mpsc::channel();
            ctrlc::set_handler(move || {
                let _ = tx.send(());
            })
            .map_err(|err| Error::General(err.to_string()))?;
            let _ = rx.recv();
        }
        _ => {
            if let Some(dur) = wait_time.duration() {
                println!("Sleeping for {}", wait_time);
                tuner.sleep(dur);
            }
        }
    }
    Ok(())
}
