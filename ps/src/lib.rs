//! PathStore - filesystem store for generated learning paths
//!
//! Persists a generated learning path together with its Mermaid flowchart,
//! keyed by user and a time-ordered path id.
//!
//! # Architecture
//!
//! ```text
//! {store_path}/
//! └── learning-paths/
//!     └── {user_id}/
//!         └── {path_id}/
//!             ├── complete_data.json   # metadata + learning path + mermaid code
//!             └── flowchart.mmd        # mermaid code (only when non-empty)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pathstore::PathStore;
//!
//! let store = PathStore::open(".pathstore")?;
//! let details = store.store(&learning_path, "graph TD\n...", Some("42"))?;
//! let saved = store.get(&details.path_id)?;
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{PathDetails, PathId, PathMetadata, PathStore, StoredPath};

/// Directory under the store root that holds all paths
pub const PATHS_DIR: &str = "learning-paths";

/// User id recorded when the caller does not supply one
pub const ANONYMOUS_USER: &str = "anonymous";

/// Title recorded when the learning path carries none
pub const UNTITLED: &str = "Untitled Learning Path";
