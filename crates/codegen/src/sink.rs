//! Artifact output targets.
//!
//! Generation is decoupled from the filesystem through the
//! [`ArtifactSink`] trait. [`DirectorySink`] is the normal mode (one
//! file per class); [`StreamSink`] concatenates everything onto a
//! single stream for inspection without filesystem side effects;
//! [`MemorySink`] captures artifacts in order for tests.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Extension for generated artifacts.
pub const FILE_EXT: &str = ".java";

/// A failed artifact write. Recorded by the generator and reported
/// after the run; it does not abort unrelated artifacts.
#[derive(Debug, thiserror::Error)]
#[error("failed to write artifact '{artifact}': {source}")]
pub struct EmitError {
    /// Class name of the artifact that failed
    pub artifact: String,
    #[source]
    pub source: io::Error,
}

/// Receives one generated artifact at a time. An artifact is fully
/// written (or abandoned on error) before the next one begins.
pub trait ArtifactSink {
    fn write_artifact(&mut self, name: &str, contents: &str) -> io::Result<()>;
}

/// Writes each artifact to `<name>.java` under an output directory,
/// creating the directory on first use. A repeated artifact name
/// silently overwrites the earlier file.
pub struct DirectorySink {
    out_dir: PathBuf,
}

impl DirectorySink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        DirectorySink {
            out_dir: out_dir.into(),
        }
    }
}

impl ArtifactSink for DirectorySink {
    fn write_artifact(&mut self, name: &str, contents: &str) -> io::Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        fs::write(self.out_dir.join(format!("{}{}", name, FILE_EXT)), contents)
    }
}

/// Debug mode: concatenates every artifact onto a single stream.
pub struct StreamSink<W: Write> {
    out: W,
}

impl<W: Write> StreamSink<W> {
    pub fn new(out: W) -> Self {
        StreamSink { out }
    }
}

impl<W: Write> ArtifactSink for StreamSink<W> {
    fn write_artifact(&mut self, _name: &str, contents: &str) -> io::Result<()> {
        self.out.write_all(contents.as_bytes())?;
        self.out.flush()
    }
}

/// In-memory capture preserving emission order.
#[derive(Default)]
pub struct MemorySink {
    artifacts: Vec<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// All artifacts in emission order.
    pub fn artifacts(&self) -> &[(String, String)] {
        &self.artifacts
    }

    /// Artifact names in emission order.
    pub fn names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Contents of the most recent artifact with the given name (a
    /// repeated name overwrites, as it would on disk).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.artifacts
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_str())
    }
}

impl ArtifactSink for MemorySink {
    fn write_artifact(&mut self, name: &str, contents: &str) -> io::Result<()> {
        self.artifacts.push((name.to_owned(), contents.to_owned()));
        Ok(())
    }
}
