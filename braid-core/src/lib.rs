//! Braid Core - Terms, Sorts, and Ground Evaluation
//!
//! This crate provides the host-solver boundary types for the braid string
//! theory layer:
//! - Hash-consed terms with cheap [`TermId`] references
//! - A small sort table with well-known bool/int/string/regex sorts
//! - A ground-term evaluator for the variable-free fragment
//!
//! # Examples
//!
//! ## Creating Terms
//!
//! ```
//! use braid_core::ast::TermManager;
//! use num_bigint::BigInt;
//!
//! let mut tm = TermManager::new();
//!
//! // String terms
//! let x = tm.mk_var("x", tm.sorts.string_sort);
//! let ab = tm.mk_str_lit("ab");
//! let cat = tm.mk_str_concat(x, ab);
//!
//! // Length constraint over the concatenation
//! let len = tm.mk_str_len(cat);
//! let four = tm.mk_int(BigInt::from(4));
//! let eq = tm.mk_eq(len, four);
//! ```
//!
//! ## Evaluating Ground Terms
//!
//! ```
//! use braid_core::ast::TermManager;
//! use braid_core::eval::{eval_ground, Value};
//!
//! let mut tm = TermManager::new();
//! let hello = tm.mk_str_lit("hello");
//! let len = tm.mk_str_len(hello);
//!
//! assert_eq!(eval_ground(&tm, len), Some(Value::Int(5.into())));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
pub mod eval;
pub mod sort;

pub use ast::{Term, TermId, TermKind, TermManager};
pub use eval::{Value, eval_ground};
pub use sort::{SortId, SortKind, Sorts};
