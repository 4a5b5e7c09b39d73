//! Dump module for streaming export of a remote collection to disk.
//!
//! The export pipeline is built from three components:
//!
//! 1. **ScrollCursor / DocumentStream**: a pull-based pass over the
//!    collection, one page in memory at a time
//! 2. **ChunkWriter**: bounded buffering and compressed chunk archives
//! 3. **DumpProgress**: real-time progress feedback
//!
//! These are orchestrated by the **DumpCoordinator**, which also
//! snapshots the collection's field mapping before the first chunk.

pub mod coordinator;
pub mod progress;
pub mod streaming;
pub mod writer;

pub use coordinator::{DumpCoordinator, DumpResult};
pub use progress::DumpProgress;
pub use streaming::{Document, DocumentMode, DocumentStream, ScrollCursor};
pub use writer::{ChunkWriter, DEFAULT_DOCS_PER_CHUNK};
