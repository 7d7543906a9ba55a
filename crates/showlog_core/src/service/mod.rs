//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate schema load, repository persistence and schema dump into
//!   request-sized operations for a web or CLI caller.
//! - Keep callers decoupled from storage details.

pub mod show_service;
