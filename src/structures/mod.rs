// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of various structures used in the `matstudio_rs` library.

pub mod atom;
pub mod lattice;
pub mod metadata;
pub mod species;
pub mod tokenize;
