//! Row Store Adapter - the spreadsheet side of the pipeline
//!
//! Maps a logical `Deal` to one row of a remote two-dimensional grid and
//! back. The store is authoritative and schemaless; this crate's whole
//! job is positional translation between named fields and
//! column-letter/row-number coordinates.
//!
//! - **`store`** - the `RowStore` trait: read-all, point update, append,
//!   plus the company lookup every caller shares
//! - **`rows`** - pure row↔record translation (header zip, padding,
//!   fixed-order row building, cell addressing)
//! - **`google`** - the Google Sheets v4 values-API implementation
//! - **`memory`** - an in-process fake for tests and offline checks
//! - **`credentials`** - bearer-token bootstrap from file or env blob

pub mod credentials;
pub mod google;
pub mod memory;
pub mod rows;
pub mod store;

pub use credentials::{CredentialsError, SheetsCredentials};
pub use google::GoogleSheetsStore;
pub use memory::InMemoryRowStore;
pub use store::RowStore;
