// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! # matstudio_rs: Materials Studio Structure and Trajectory Library for Rust
//!
//! Rust library for reading, modifying, and writing Materials Studio xsd (and xtd) structures
//! and for reading arc trajectories.
//!
//! ## Usage
//!
//! Run
//!
//! ```bash
//! $ cargo add matstudio_rs
//! ```
//!
//! Import the crate in your Rust code:
//! ```
//! use matstudio_rs::prelude::*;
//! ```
//!
//! ## Examples
//!
//! #### Modifying a structure
//!
//! Read an xsd file, fix all platinum atoms, highlight the first oxygen, and write the structure out.
//!
//! ```no_run
//! use matstudio_rs::prelude::*;
//! use std::error::Error;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     // the working directory is stored in the metadata of the structure
//!     let working_dir = Path::new("/home/user/calc");
//!     let mut structure = Structure::from_file("slab.xsd", working_dir)?;
//!
//!     for (species, count) in structure.natoms() {
//!         println!("{}: {} atoms", species, count);
//!     }
//!
//!     structure.set_species_freeze_flags("Pt", FreezeFlags::FIXED)?;
//!     structure.set_energy(-1204.5);
//!
//!     // atoms are numbered from 1, species by species
//!     let first_oxygen = structure.atoms_num()[0] + 1;
//!     structure.modify_color_default(first_oxygen)?;
//!
//!     // everything else in the document is written back unchanged
//!     structure.write_xsd("slab_fixed.xsd", working_dir)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Reading a trajectory
//!
//! Read an xtd file with its arc trajectory and convert every frame to fractional coordinates.
//!
//! ```no_run
//! use matstudio_rs::prelude::*;
//! use std::error::Error;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let xtd = XtdFile::from_file("md.xtd", Path::new("/home/user/md"))?
//!         .with_trajectory("md.arc")?;
//!
//!     if let Some(metadata) = xtd.trajectory().unwrap().metadata()? {
//!         println!("Lattice lengths: {:?}", metadata.lengths);
//!     }
//!
//!     for frame in xtd.direct_frames()? {
//!         let fractional = frame?;
//!         println!("{}", fractional.row(0));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//! `matstudio_rs` reports recoverable problems (e.g., missing metadata) through the `log` crate
//! using the targets `matstudio_rs::xsd` and `matstudio_rs::arc`. No logger is installed by the library.
//!
//! ## Error handling
//! The individual error types provided by `matstudio_rs` are not exported into the `prelude` module.
//! If you want to use a specific error type, include it explicitly from the `errors` module:
//! ```
//! use matstudio_rs::errors::WriteXsdError;
//! ```
//!
//! ## License
//! This library is released under the MIT License.

/// Current version of the `matstudio_rs` library.
pub const MATSTUDIO_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod auxiliary;
pub mod errors;
pub mod io;
pub mod structures;
pub mod system;

/// Reexported basic `matstudio_rs` structures.
pub mod prelude {
    pub use crate::auxiliary::{DEFAULT_HIGHLIGHT_COLOR, DEFAULT_OUTPUT};
    pub use crate::io::arc_io::{ArcFrameIterator, ArcReader, TrajectoryMetadata};
    pub use crate::io::document::{XmlDocument, XmlElement};
    pub use crate::io::xtd_io::{DirectFrameIterator, XtdFile};
    pub use crate::structures::atom::{FreezeFlag, FreezeFlags};
    pub use crate::structures::lattice::{Lattice, LatticeVector};
    pub use crate::structures::metadata::{Metadata, MetadataParse};
    pub use crate::structures::tokenize::tokenize;
    pub use crate::system::Structure;
}
