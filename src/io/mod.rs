// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of functions for reading and writing structure and trajectory files.

pub mod arc_io;
pub mod document;
pub mod xsd_io;
pub mod xtd_io;
