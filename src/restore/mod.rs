//! Restore module for bulk re-ingestion of a dump directory.
//!
//! Mirrors the dump pipeline in reverse:
//!
//! 1. **ChunkReader**: archive discovery and decompression, in sequence
//!    order
//! 2. **BulkLoader**: document batches into bulk write requests
//! 3. **RestoreCoordinator**: layout validation, idempotent collection
//!    creation from the schema snapshot, and the per-chunk drive loop

pub mod coordinator;
pub mod loader;
pub mod reader;

pub use coordinator::{RestoreCoordinator, RestoreResult};
pub use loader::BulkLoader;
pub use reader::ChunkReader;
