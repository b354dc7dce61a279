//! Storage abstraction layer for ImagePortal
//!
//! Provides a single generic repository seam between the scheduling core and
//! whatever actually holds the records:
//! - `Entity` trait for identifiable domain records
//! - Object-safe `Repository<T>` with fetch/insert/update/remove/list
//! - `MemoryRepository<T>` concurrent in-memory backend
//!
//! The portal's source data model had one hand-rolled data-access wrapper per
//! entity; this crate collapses them into one parameterized abstraction so a
//! real database backend can be swapped in behind the same trait.

pub mod error;
pub mod memory;
pub mod repository;

pub use error::*;
pub use memory::*;
pub use repository::*;
