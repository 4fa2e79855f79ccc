//! Command-line interface for trackpub.
//!
//! Each subcommand lives in its own module with an Args struct and a
//! `run` entry point; shared rendering sits in `output`.

pub mod output;
pub mod publish;
pub mod scan;
