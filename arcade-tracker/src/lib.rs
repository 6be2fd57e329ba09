//! Client-side instrumentation for the Arcade storefront.
//!
//! A [`Tracker`] is opened once per page. It restores or creates the
//! session from [`SessionStorage`], and turns page lifecycle and interaction
//! signals into events that are posted to the collector without waiting for
//! the outcome.

pub mod click;
pub mod config;
pub mod error;
pub mod scroll;
pub mod session;
pub mod storage;
pub mod tracker;
pub mod transport;

pub use click::Element;
pub use config::{IdSource, TrackerConfig};
pub use error::TrackerError;
pub use scroll::{ScrollDepth, ScrollPosition};
pub use session::Session;
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use tracker::Tracker;
pub use transport::{HttpTransport, Transport};
