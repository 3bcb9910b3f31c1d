/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! attrmatch – attribute bitmaps and feature matching for workload managers
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── bitmap/         – growable bitmap + name-list text codecs
//! ├── names           – NameTable trait (index → name lookups)
//! ├── index/          – per-category attribute index tables
//! ├── logic/          – AND / OR / NOT subset evaluation
//! ├── requirement     – job feature requirement gate
//! ├── config/         – YAML index configuration
//! └── error           – structured error types
//! ```

pub mod bitmap;
pub mod config;
pub mod error;
pub mod index;
pub mod logic;
pub mod names;
pub mod requirement;
