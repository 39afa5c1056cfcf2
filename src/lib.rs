//! Refactory - design smell detection with LLM refactoring suggestions
//!
//! Scans a codebase with fast static smell rules, then batches the findings
//! and the relevant source into token-budgeted LLM calls that return typed
//! refactoring suggestions.

pub mod ai;
pub mod batch;
pub mod chunker;
pub mod cli;
pub mod config;
pub mod detectors;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod scanner;
