//! Session-aware routing gate.
//!
//! Reconciles identity, role and onboarding signals into a single
//! navigation decision, applied at most once per change, and keeps the
//! session token in a platform-selected store.

pub mod config;
pub mod error;
pub mod routing;
pub mod runtime;
pub mod scenario;
pub mod session;
pub mod telemetry;
