//! # rowcheck core
//!
//! Core data structures shared by the rowcheck crates.
//!
//! rowcheck validates row-oriented data (CSV-like records) against a set of
//! configured rules and reports every violation as a structured problem
//! instead of stopping at the first failure.
//!
//! ## Key Concepts
//!
//! - **FieldSchema**: the ordered, unique field names a validator expects
//! - **Problem**: one reported rule violation, keyed by a [`ProblemCode`]
//! - **RunOptions**: header handling, summarization, limits and context for one run
//! - **ValidatorDefinition**: a declarative description of a validator
//!
//! ## Example
//!
//! ```rust
//! use rowcheck_core::{FieldSchema, Problem, ProblemCode};
//!
//! let schema = FieldSchema::new(["foo", "bar"]).unwrap();
//! assert_eq!(schema.index_of("bar"), Some(1));
//!
//! let problem = Problem::new(ProblemCode::ValueCheckFailed)
//!     .with_message(ProblemCode::ValueCheckFailed.default_message());
//! assert_eq!(problem.code.to_string(), "VALUE_CHECK_FAILED");
//! ```

pub mod definition;
pub mod error;
pub mod options;
pub mod problem;
pub mod schema;

pub use definition::*;
pub use error::*;
pub use options::*;
pub use problem::*;
pub use schema::*;
