// SPDX-License-Identifier: MIT

pub mod checker;
pub mod constant;
pub mod formatter;
pub mod meta;
pub mod types;
pub mod utils;
pub mod walker;

// === Public Interface ===
pub mod traits {
    pub use super::checker::{VsfsCheckOptions, VsfsChecker};
    pub use super::formatter::VsfsFormatter;
    pub use super::meta::VsfsMeta;
    pub use super::walker::PointerWalker;
}

pub mod prelude {
    pub use super::checker::{DataBitmapReconciliation, DuplicateTable, ReferenceTable};
    pub use super::constant::*;
    pub use super::traits::*;
    pub use super::types::*;
    pub use super::walker::{PointerKind, PointerOrigin, PointerRef, Step, WalkSummary};
    pub use crate::core::checker::*;
    pub use crate::core::errors::*;
    pub use crate::core::traits::*;
    pub use vsio::prelude::*;
}
