// fmtools/src/config.rs
//
// Copyright (c) 2025, Frank Pagliughi
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//! User settings for `fm`, from the `~/.fmrc` file.
//!
//! The file is plain text with one setting per line, as a keyword and a
//! value separated by whitespace:
//!
//! ```text
//! VOL 25
//! INCR 5
//! TIME 30m
//! ```
//!
//! Unknown lines and values that don't parse are ignored.
//!

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{Result, WaitTime};

/// The name of the settings file in the home directory
pub const CONFIG_FILE_NAME: &str = ".fmrc";

/// Settings for the `fm` utility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// The volume to use when tuning, if none is given, in percent
    pub default_volume: f64,
    /// The step for volume up/down, in percent
    pub increment: f64,
    /// How long to wait after tuning, if not given on the command line
    pub wait_time: Option<WaitTime>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_volume: 12.5,
            increment: 10.0,
            wait_time: None,
        }
    }
}

impl Config {
    /// Gets the path to the user's settings file, if there is a home
    /// directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Loads the settings from the specified file, or from the user's
    /// `~/.fmrc` if no file is given.
    ///
    /// A file that doesn't exist is not an error; it just gives the
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!("Reading settings from {}", path.display());
                Ok(Self::parse(&text))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("No settings file at {}", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Parses the text of a settings file over the defaults.
    pub fn parse(text: &str) -> Self {
        let mut cfg = Self::default();

        for line in text.lines() {
            let mut toks = line.split_whitespace();
            let (key, val) = match (toks.next(), toks.next()) {
                (Some(key), Some(val)) => (key, val),
                _ => continue,
            };

            if key.starts_with("VOL") {
                if let Ok(v) = val.parse() {
                    cfg.default_volume = v;
                }
            }
            else if key.starts_with("INC") {
                if let Ok(v) = val.parse() {
                    cfg.increment = v;
                }
            }
            else if key.starts_with("TIME") {
                if let Ok(t) = val.parse() {
                    cfg.wait_time = Some(t);
                }
            }
        }
        cfg
    }
}

// --------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimeUnit;
    use std::io::Write;

    #[test]
    fn defaults() {
        let cfg = Config::parse("");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.default_volume, 12.5);
        assert_eq!(cfg.increment, 10.0);
        assert!(cfg.wait_time.is_none());
    }

    #[test]
    fn parse_settings() {
        let cfg = Config::parse("VOL 25\nINCR 5\nTIME 30m\n");
        assert_eq!(cfg.default_volume, 25.0);
        assert_eq!(cfg.increment, 5.0);
        assert_eq!(cfg.wait_time, Some("30m".parse().unwrap()));
    }

    #[test]
    fn ignores_junk() {
        let cfg = Config::parse("# comment\nVOL loud\nVOLUME 40\nBASS 3\nINCR\n");
        assert_eq!(cfg.default_volume, 40.0);
        assert_eq!(cfg.increment, 10.0);
    }

    #[test]
    fn bad_time_keeps_earlier() {
        let cfg = Config::parse("TIME 15m\nTIME soon\n");
        assert_eq!(cfg.wait_time, Some(WaitTime::For(15, TimeUnit::Minutes)));
    }

    #[test]
    fn load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "VOL 33.3").unwrap();
        writeln!(file, "TIME forever").unwrap();

        let cfg = Config::load(Some(file.path())).unwrap();
        assert_eq!(cfg.default_volume, 33.3);
        assert_eq!(cfg.wait_time, Some(WaitTime::Forever));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(Some(&dir.path().join(CONFIG_FILE_NAME))).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
