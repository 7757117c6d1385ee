// fmtools/src/bin/fmscan.rs
//
// Copyright (c) 2025, Frank Pagliughi
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//

//! Rust application to scan a frequency band for radio stations using the
//! signal strength reported by the tuner.
//!

use clap::{Arg, ArgAction, ArgMatches, Command};
use fmtools::{self as fm, ScanConfig, ScanEvent, Tuner};
use std::{
    io::{self, Write},
    process,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Command::new("fmscan")
        .version(clap::crate_version!())
        .about("Auxiliary program to scan a frequency band for radio stations.")
        .arg(
            Arg::new("device")
                .short('d')
                .value_name("dev")
                .action(ArgAction::Set)
                .help("Select device (default: /dev/radio0)"),
        )
        .arg(
            Arg::new("tuner")
                .short('T')
                .value_name("tuner")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(u32))
                .help("Select tuner (default: 0)"),
        )
        .arg(
            Arg::new("start")
                .short('s')
                .value_name("freq")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(f64))
                .help("Set start of scanning range to <freq> MHz"),
        )
        .arg(
            Arg::new("end")
                .short('e')
                .value_name("freq")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(f64))
                .help("Set end of scanning range to <freq> MHz"),
        )
        .arg(
            Arg::new("increment")
                .short('i')
                .value_name("freq")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(f64))
                .help("Set increment value between channels to <freq> MHz"),
        )
        .arg(
            Arg::new("threshold")
                .short('t')
                .value_name("%")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(f64))
                .help("Set signal strength percentage to lock onto"),
        )
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
        .get_matches();

    if let Err(err) = run(&args) {
        eprintln!("fmscan: {}", err);
        process::exit(1);
    }
}

fn run(args: &ArgMatches) -> fm::Result<()> {
    let quiet = args.get_one::<bool>("quiet").copied().unwrap_or(false);
    let index = args.get_one::<u32>("tuner").copied().unwrap_or(0);

    let mut cfg = ScanConfig::default();
    if let Some(&start) = args.get_one::<f64>("start") {
        cfg.start = start;
    }
    if let Some(&end) = args.get_one::<f64>("end") {
        cfg.end = end;
    }
    if let Some(&step) = args.get_one::<f64>("increment") {
        cfg.step = step;
    }
    if let Some(&pct) = args.get_one::<f64>("threshold") {
        cfg.threshold = pct / 100.0;
    }
    cfg.override_range = args.get_one::<bool>("override").copied().unwrap_or(false);

    let mut tuner = match args.get_one::<String>("device") {
        Some(dev) => Tuner::from_name(dev, index)?,
        None => Tuner::with_backend(fm::Backend::default(), index)?,
    };

    let limits = cfg.limit_to(&tuner);
    if let Some(start) = limits.start {
        println!("Setting start to tuner minimum {:.1} MHz", start);
    }
    if let Some(end) = limits.end {
        println!("Setting end to tuner maximum {:.1} MHz", end);
    }

    println!(
        "Scanning range: {:2.1} - {:2.1} MHz ({:2.1} MHz increments)...",
        cfg.start, cfg.end, cfg.step
    );

    fm::scan(&mut tuner, &cfg, |ev| report(ev, quiet))?;

    tuner.close();
    Ok(())
}

/// Shows the progress of the scan.
///
/// Progress lines are overwritten in place; only the stations are left
/// on the screen.
fn report(ev: &ScanEvent, quiet: bool) {
    let mut out = io::stdout();

    match *ev {
        ScanEvent::Tuning(mhz) if !quiet => {
            print!("{:2.1}:\r", mhz);
        }
        ScanEvent::Sample {
            mhz,
            strength,
            count,
            total,
        } if !quiet => {
            print!(
                "{:2.1}: checking: {:3.1}% ({}/{})    \r",
                mhz,
                strength * 100.0,
                count,
                total
            );
        }
        ScanEvent::Empty(_) if !quiet => {
            print!("{:42}\r", "");
        }
        ScanEvent::Station(station) => {
            if !quiet {
                print!("{:42}\r", "");
            }
            println!("{:2.1}: {:3.1}%", station.mhz, station.strength * 100.0);
        }
        _ => {}
    }
    let _ = out.flush();
}
