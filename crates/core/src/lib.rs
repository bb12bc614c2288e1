//! Naqlah Core - Shared types and booking rules.
//!
//! This crate provides the domain model used by the `naqlah-web` binary:
//! - [`types`] - Validated newtypes for phones, emails, OTP codes and locales
//! - [`order`] - The move-request form data and the step wizard that fills it
//! - [`auth`] - The mock phone/OTP login rules
//! - [`validation`] - Form schemas producing per-field error messages
//!
//! # Architecture
//!
//! The core crate contains only types and rules - no I/O, no HTTP, no
//! session handling. Everything here is deterministic and unit tested.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod order;
pub mod types;
pub mod validation;

pub use types::*;
