//! astrojournal - astronomy observation journals
//!
//! Converts tab-separated observation logs into LaTeX journals organised by
//! date, by target and by constellation, plus a plain-text summary for
//! forum posts.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod catalogue;
pub mod compiler;
pub mod document;
pub mod grouping;
pub mod importer;
pub mod journal_config;
pub mod profiles;
pub mod report_model;
pub mod statistics;
pub mod templates;

// Stages: import, export, compile
pub mod pipeline;
pub mod render;
