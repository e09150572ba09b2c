//! # rowcheck validator
//!
//! Rule registration and evaluation engine for row-oriented data. This crate
//! checks rows against a configured set of rules and reports every
//! violation as a [`Problem`](rowcheck_core::Problem):
//!
//! - Header checks (the header row lists the expected fields)
//! - Record length checks (one value per field)
//! - Value checks and value predicates on single fields
//! - Record checks and record predicates on whole rows
//! - Uniqueness checks on single fields or compound keys
//! - Skip predicates and extension hooks
//!
//! Failures raised by user code never abort a run; they are reported as
//! `UNEXPECTED_EXCEPTION` problems, or dropped if the run asks for that.
//!
//! ## Example
//!
//! ```rust
//! use rowcheck_core::{ProblemCode, RunOptions};
//! use rowcheck_validator::{checks, RuleOptions, Validator};
//!
//! let mut validator = Validator::with_fields(["study_id", "gender"]).unwrap();
//! validator
//!     .add_header_check(RuleOptions::code("EX1"))
//!     .unwrap()
//!     .add_value_check("gender", checks::enumeration(["M", "F"]).unwrap(), RuleOptions::new())
//!     .unwrap()
//!     .add_unique_check("study_id", RuleOptions::new())
//!     .unwrap();
//!
//! let data = vec![
//!     vec!["study_id", "gender"],
//!     vec!["1", "M"],
//!     vec!["1", "X"],
//! ];
//!
//! for problem in validator.iter_validate(data, &RunOptions::new()) {
//!     println!("row {:?}: {}", problem.row, problem.code);
//! }
//! ```

pub mod checks;
mod classify;
mod definition;
mod engine;
mod error;
mod extension;
mod record;
mod rules;
mod uniqueness;

pub use classify::*;
pub use engine::*;
pub use error::*;
pub use extension::*;
pub use record::*;
pub use rules::*;
