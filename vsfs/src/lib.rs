// SPDX-License-Identifier: MIT
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
#[macro_use]
extern crate alloc;

// Core Modules
pub mod core;
pub mod fs;

// Reusable types and traits
pub use core::traits::*;

/// VSFS layout, formatter and checker.
///
/// See [`vsfs::VsfsChecker`], [`vsfs::VsfsFormatter`] and [`vsfs::VsfsMeta`].
pub mod vsfs {
    pub use super::fs::vsfs::prelude::*;
}
