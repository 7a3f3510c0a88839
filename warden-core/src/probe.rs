//! File probes: turn a file's current contents into a candidate on demand.
//!
//! A probe is read afresh on every `wait_until` attempt, so a guard can wait
//! for another process to write the expected state.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{BoxError, Result, WardenError};
use crate::fs::FileSystem;
use crate::guards::Candidate;
use crate::wait_until::Callback;

/// How a probed file's contents become a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProbeFormat {
    /// Parse the contents as JSON; an empty file is `undefined`.
    #[default]
    Json,
    /// Use the trimmed contents as a string.
    Text,
}

/// Reads one file through a [`FileSystem`] each time it is sampled.
#[derive(Debug, Clone)]
pub struct FileProbe<F> {
    fs: F,
    path: PathBuf,
    format: ProbeFormat,
}

impl<F: FileSystem> FileProbe<F> {
    /// Probe `path` as JSON.
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
            format: ProbeFormat::default(),
        }
    }

    /// Change how the contents are interpreted.
    pub fn with_format(mut self, format: ProbeFormat) -> Self {
        self.format = format;
        self
    }

    /// The probed path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and interpret the file once.
    pub fn sample(&self) -> Result<Candidate> {
        if !self.fs.exists(&self.path) {
            return Err(WardenError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", self.path.display()),
            )));
        }
        let contents = self.fs.read_to_string(&self.path)?;
        parse_candidate(&contents, self.format)
    }
}

impl<F: FileSystem + Send + 'static> FileProbe<F> {
    /// Turn the probe into a `wait_until` callback that samples on every attempt.
    pub fn into_callback(self) -> Callback<Candidate> {
        Callback::sync(move || self.sample().map_err(|err| Box::new(err) as BoxError))
    }
}

/// Interpret file contents as a candidate.
pub fn parse_candidate(contents: &str, format: ProbeFormat) -> Result<Candidate> {
    let trimmed = contents.trim();
    match format {
        ProbeFormat::Text => Ok(Some(Value::String(trimmed.to_string()))),
        ProbeFormat::Json if trimmed.is_empty() => Ok(None),
        ProbeFormat::Json => Ok(Some(serde_json::from_str(trimmed)?)),
    }
}
