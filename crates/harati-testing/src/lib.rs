//! Test utilities for Harati services.
//!
//! Provides `MockBackend` (an in-process stand-in for the hosted auth, data and
//! storage APIs) and session helpers. Import from tests only, never from
//! production code.

pub mod auth;
pub mod backend;
