//! Helpers for splitting PDFs into page-range chunks and feeding them to
//! document text extraction, translation and summarization services.

pub mod config;
pub mod logging;
pub mod pdf;
pub mod services;
pub mod workflow;
