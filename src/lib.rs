// src/lib.rs

//! gazette-watch library
//!
//! Scans the BOE, BOC and the two Canarian provincial bulletins for
//! announcements matching a keyword list.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
