//! Tessier — a self-healing pipeline for LLM-generated UI components.
//!
//! Single Rust binary. Generates component source via an LLM, repairs the
//! mechanical defects deterministically, validates the result statically,
//! and compiles it — feeding every rejection back into a bounded
//! regeneration loop.
//!
//! See `DESIGN.md` for full architecture documentation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;

pub mod source;

pub mod fixer;
pub mod validator;

pub mod compiler;
pub mod generator;

pub mod catalog;
pub mod pipeline;
