// SPDX-License-Identifier: MIT

pub mod vsfs;
