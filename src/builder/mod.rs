//! Configuration-time construction of state graphs.
//!
//! Graphs are defined before a machine is constructed and are read-only
//! afterwards. The builder validates what the runtime cannot recover from:
//! hierarchy depth beyond the configured bound, handles from the wrong
//! builder, and handlers defined twice are all rejected here, at
//! construction time.

pub mod error;
pub mod graph;
pub mod macros;

pub use error::BuildError;
pub use graph::{GraphBuilder, DEFAULT_MAX_DEPTH};
