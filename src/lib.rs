//! Core library for the pos_list application.
//!
//! This library builds Micro-Manager stage position lists: it combines two coordinate
//! axes into an ordered sequence of stage positions, optionally attaches Z values,
//! and renders the result as a `.pos` property map. It is used by the `pos-list`
//! binary and can be embedded in acquisition scripts.

pub mod cli;
pub mod config;
pub mod error;
pub mod pos_file;
pub mod sequence;

pub use error::{Advisory, AppResult, PosListError};
