//! treedraw: editor core for labeled tree diagrams.
//!
//! The [`domain`] layer owns the tree model, its flat JSON document form and
//! the random tree generator. [`application`] wraps edits in a persisted
//! editor session, [`infrastructure`] provides the file-backed stores and
//! [`cli`] exposes everything as a command line tool.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
