//! BaleCare - home-services booking core
//!
//! This crate implements the non-visual core of the BaleCare site: optional
//! sign-in with a simulated fallback, the AI diagnosis and villa-copy
//! assistants, and the per-session booking and review store.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
