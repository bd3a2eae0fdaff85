//! Stable, cycle-tolerant topological ordering.
//!
//! This crate provides the generic engine used to order contributions by the
//! dependency graph of whatever owns them. Callers describe the graph lazily
//! through the [`TopologicalSort`] trait (or the closure based [`FnSort`]);
//! the engine never inspects items beyond the key it is handed.
//!
//! # Example
//!
//! ```
//! use extsort_core::sort_by_requirements;
//!
//! // "a" is required by "b", "b" is required by "c".
//! let sorted = sort_by_requirements(
//!     vec!["c", "a", "b"],
//!     |item| Some(*item),
//!     |key| match *key {
//!         "a" => vec!["b"],
//!         "b" => vec!["c"],
//!         _ => vec![],
//!     },
//! );
//!
//! assert!(sorted.is_complete());
//! assert_eq!(sorted.into_items(), vec!["a", "b", "c"]);
//! ```

pub mod adapter;
pub mod relation;
pub mod sort;

pub use adapter::{Direction, FnSort, sort_by_dependencies, sort_by_requirements};
pub use relation::Relation;
pub use sort::{Sorted, TopologicalSort, into_ok};
