//! External mirror tools and their command lines

use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Retry behaviour passed through to the mirror tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub retries: u32,
    pub wait_secs: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 5,
            wait_secs: 2,
        }
    }
}

/// Tool used to mirror a directory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorTool {
    /// `robocopy` (Windows)
    Robocopy,
    /// `rsync` (Unix)
    Rsync,
}

impl Default for MirrorTool {
    fn default() -> Self {
        if cfg!(windows) {
            Self::Robocopy
        } else {
            Self::Rsync
        }
    }
}

impl MirrorTool {
    pub fn program(self) -> &'static str {
        match self {
            Self::Robocopy => "robocopy",
            Self::Rsync => "rsync",
        }
    }

    /// Arguments mirroring `source` into `destination`.
    ///
    /// Extra files in the destination are deleted, sub-directories are
    /// included and per-file output is suppressed.
    pub fn args(self, source: &Path, destination: &Path, retry: RetryPolicy) -> Vec<OsString> {
        match self {
            Self::Robocopy => {
                let mut args: Vec<OsString> =
                    vec![source.as_os_str().to_owned(), destination.as_os_str().to_owned()];
                args.extend(
                    [
                        "/PURGE".to_string(),
                        "/E".to_string(),
                        "/NP".to_string(),
                        format!("/R:{}", retry.retries),
                        format!("/W:{}", retry.wait_secs),
                        "/MT".to_string(),
                        "/NFL".to_string(),
                        "/NDL".to_string(),
                    ]
                    .into_iter()
                    .map(OsString::from),
                );
                args
            }
            Self::Rsync => {
                // Trailing separator: copy the contents, not the directory itself.
                let mut from = source.as_os_str().to_owned();
                from.push("/");
                vec![
                    OsString::from("-a"),
                    OsString::from("--delete"),
                    from,
                    destination.as_os_str().to_owned(),
                ]
            }
        }
    }

    /// Whether `code` reports a successful mirror.
    ///
    /// robocopy uses bit flags below 8 for success variants.
    pub fn is_success(self, code: i32) -> bool {
        match self {
            Self::Robocopy => (0..8).contains(&code),
            Self::Rsync => code == 0,
        }
    }
}

impl fmt::Display for MirrorTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}
