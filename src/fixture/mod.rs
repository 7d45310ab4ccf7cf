//! Fixture storage: where recorded command output lives and how it is read.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │               FixtureStore                │
//! │  <root>/<platform>/<command>/<key...>     │
//! └─────────────────────┬─────────────────────┘
//!                       │
//!                ┌──────▼──────┐
//!                │  FileSystem │ (trait)
//!                └──────┬──────┘
//!          ┌────────────┼────────────┐
//!   ┌──────▼──────┐ ┌───▼─────┐ ┌────▼──────┐
//!   │   RealFs    │ │ MockFs  │ │ Scenarios │
//!   │ (test tree) │ │ (unit)  │ │ (canned)  │
//!   └─────────────┘ └─────────┘ └───────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use cmdmock::fixture::{FixtureStore, MockFs, SCENARIO_ROOT};
//! use std::path::Path;
//!
//! let store = FixtureStore::new(MockFs::freebsd_storage_host(), SCENARIO_ROOT);
//! let scan = store
//!     .load(Path::new("/data/mock-output/freebsd/smartctl/scan"))
//!     .unwrap();
//! assert!(scan.starts_with(b"/dev/ada0"));
//! ```

mod mock;
mod scenarios;
mod store;
mod traits;

pub use mock::MockFs;
pub use scenarios::SCENARIO_ROOT;
pub use store::FixtureStore;
pub use traits::{FileSystem, RealFs};
