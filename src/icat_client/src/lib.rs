//! Typed client for the ICAT information-catalog REST API, scoped to the
//! handful of operations the admin provisioning commands need: log in, look
//! an entity up by id, and create records one at a time or in bulk.
//!
//! The [`catalog::CatalogOps`] trait is the seam between the provisioning
//! routines and the wire protocol; [`session::IcatSession`] is the live
//! `reqwest` implementation and tests substitute a recording mock.

pub mod catalog;
pub mod cmd;
pub mod entity;
pub mod error;
pub mod provision;
pub mod session;

pub use catalog::CatalogOps;
pub use error::{IcatError, IcatResult};
pub use session::IcatSession;
