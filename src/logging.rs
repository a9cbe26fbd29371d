/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! `tracing` setup. The terminal belongs to the UI, so log lines go
//! to a file or nowhere.

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` when set and valid, otherwise
/// `default_level`.
pub(crate) fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn open_log(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Safe to call more than once; later
/// calls are ignored.
pub(crate) fn init(log_file: Option<&Path>, default_level: &str) -> io::Result<()> {
    let filter = env_filter(default_level);
    match log_file {
        Some(path) => {
            let file = open_log(path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // `init` installs the process-wide subscriber, which the traced
    // tests elsewhere own, so only the pieces are tested here.

    #[test]
    fn directory_cannot_be_a_log_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_log(dir.path()).is_err());
    }

    #[test]
    fn log_file_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodegrid.log");
        std::fs::write(&path, "first\n").unwrap();
        let mut file = open_log(&path).unwrap();
        std::io::Write::write_all(&mut file, b"second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn filter_falls_back_to_default_level() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(env_filter("nodegrid=debug").to_string(), "nodegrid=debug");
        }
    }
}
