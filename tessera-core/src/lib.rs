//! Board-agnostic core logic for the Tessera e-paper dashboard
//!
//! This crate contains all orchestration logic that does not depend on
//! specific hardware or transports:
//!
//! - Screen registry contract and the one-shot assignment pass
//! - Module capability contract and the three module variants
//! - Refresh triggers (calendar-edge and elapsed-interval)
//! - Config-store keys and record parsing
//! - Wall-clock date math and localized calendar names
//!
//! Hardware, networking and persistence enter through the traits in
//! [`traits`], [`screen`] and [`clock`]; the firmware crate provides the
//! implementations.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod feed;
pub mod lang;
pub mod module;
pub mod schedule;
pub mod screen;
pub mod traits;
pub mod url;

#[cfg(test)]
mod testutil;
