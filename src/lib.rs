//! Register Intake - state and verification engine for a registration form
//!
//! Tracks field values and errors, runs per-field validation on blur, drives
//! the email ownership handshake with its expiring countdown, aggregates the
//! consent checkboxes, and decides whether submission may be triggered.

pub mod api;
pub mod app;
pub mod command;
pub mod config;
pub mod state;

pub use app::{FormEvent, FormRuntime};
pub use config::IntakeConfig;
pub use state::{FormView, RegistrationForm};
