//! Where finished snapshots go and how they are viewed.
//!
//! # Submodules
//!
//! - [`json`]: [`JsonFileStore`](json::JsonFileStore), the single-document
//!   snapshot store
//! - [`html`]: HTML table view of the facts table for display collaborators
//!
//! # Output Structure
//!
//! ```text
//! store_path            # latest snapshot, pretty-printed JSON
//! store_path.tmp        # transient, only while a put is in flight
//! ```

pub mod html;
pub mod json;

use crate::error::StoreError;
use crate::models::MarsSnapshot;

/// Holds at most one snapshot, the latest.
pub trait AggregateStore {
    /// Replace the stored snapshot. Readers see either the old snapshot or
    /// the new one, never a mix.
    async fn put(&self, snapshot: &MarsSnapshot) -> Result<(), StoreError>;

    /// The stored snapshot, or `None` if nothing has been stored yet.
    async fn get_latest(&self) -> Result<Option<MarsSnapshot>, StoreError>;
}
