//! Core types shared across rowmap facilities
//!
//! Holds the canonical field keys and event names used by the structured
//! logging macros and the error facility, so that every crate in the
//! workspace emits the same schema.

pub mod schema;
