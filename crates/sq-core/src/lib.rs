//! # sq-core
//!
//! Core types shared by every sonar-tools crate.
//!
//! - Domain objects returned by the SonarQube web API (projects, branches,
//!   pull requests, applications, portfolios, quality profiles, users,
//!   tokens, groups, background tasks, issues)
//! - Audit problem records and the enums that classify them
//! - Background task status values
//! - Version parsing and ordering
//! - [`Lazy`] attributes and [`KeyedCollection`] search results
//! - Date helpers for the server's timestamp format
//! - Cross-cutting error types

pub mod collection;
pub mod dates;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod lazy;
pub mod problem;
pub mod version;

pub use collection::{Keyed, KeyedCollection};
pub use lazy::Lazy;
pub use problem::{ConcernedObject, Problem};
pub use version::Version;
