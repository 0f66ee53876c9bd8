//! astgen-codegen: Java class emission for astgen.
//!
//! [`Generator`] implements [`astgen_core::ParseHandler`], so it can be
//! handed directly to the parser: directives configure it, definitions
//! drive emission, and [`Generator::finish()`] produces the artifacts
//! that depend on the whole input (the root and visitor classes).
//!
//! Output goes through the [`ArtifactSink`] trait -- per-class files,
//! a single debug stream, or an in-memory capture for tests.

mod generator;
mod sink;

pub use generator::Generator;
pub use sink::{ArtifactSink, DirectorySink, EmitError, MemorySink, StreamSink, FILE_EXT};
