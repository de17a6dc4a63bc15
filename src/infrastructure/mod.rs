//! Infrastructure layer: I/O implementations
//!
//! This layer implements the I/O boundary traits the services depend on.

pub mod error;
pub mod store;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use store::{JsonFileStore, MemoryStore};
pub use traits::{DocumentStore, FileSystem, RealFileSystem};
