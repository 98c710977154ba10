// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Error types used by the `matstudio_rs` library.

use colored::{ColoredString, Colorize};
use std::path::Path;
use thiserror::Error;

fn path_to_yellow(path: &Path) -> ColoredString {
    path.to_string_lossy().yellow()
}

/// Errors that can occur when reading, manipulating, or writing a markup document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("{} file '{}' was not found", "error:".red().bold(), path_to_yellow(.0))]
    FileNotFound(Box<Path>),
    #[error("{} file '{}' could not be read: {}", "error:".red().bold(), path_to_yellow(.0), .1)]
    CouldNotRead(Box<Path>, std::io::Error),
    #[error("{} file '{}' is not valid {}", "error:".red().bold(), path_to_yellow(.0), .1.yellow())]
    Undecodable(Box<Path>, &'static str),
    #[error("{} file '{}' could not be created", "error:".red().bold(), path_to_yellow(.0))]
    CouldNotCreate(Box<Path>),
    #[error("{} could not write into file '{}'", "error:".red().bold(), path_to_yellow(.0))]
    CouldNotWrite(Box<Path>),
    #[error("{} markup document is malformed: {}", "error:".red().bold(), .0.to_string().yellow())]
    Malformed(#[from] quick_xml::Error),
    #[error("{} invalid attribute in element '{}': {}", "error:".red().bold(), .0.yellow(), .1)]
    InvalidAttribute(String, String),
}

impl From<quick_xml::events::attributes::AttrError> for DocumentError {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        DocumentError::Malformed(error.into())
    }
}

/// Errors that can occur when loading a structure from an xsd/xtd file.
#[derive(Error, Debug)]
pub enum ParseXsdError {
    #[error("{}", .0)]
    Document(#[from] DocumentError),
    #[error("{} atom element with coordinates '{}' has no '{}' attribute", "error:".red().bold(), .0.yellow(), "Components".yellow())]
    MissingSpecies(String),
    #[error("{} could not parse '{}' as atom coordinates", "error:".red().bold(), .0.yellow())]
    InvalidCoordinates(String),
    #[error("{} lattice element has no '{}' attribute", "error:".red().bold(), .0.yellow())]
    MissingLatticeVector(&'static str),
    #[error("{} could not parse '{}' as a lattice vector", "error:".red().bold(), .0.yellow())]
    InvalidLatticeVector(String),
}

/// Errors that can occur when pushing the structure back into its document or writing it out.
#[derive(Error, Debug)]
pub enum WriteXsdError {
    #[error("{} length of {} ({}) is not equal to the number of atoms ({})", "error:".red().bold(), .field, .found.to_string().yellow(), .expected.to_string().yellow())]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{} coordinate array has {} columns, expected {}", "error:".red().bold(), .0.to_string().yellow(), "3".yellow())]
    CoordinateColumns(usize),
    #[error("{}", .0)]
    Document(#[from] DocumentError),
}

/// Warnings that can be raised while decoding the packed metadata string.
/// These are never fatal: defaults are used instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataWarning {
    #[error("{} document contains no metadata element '{}', using default values", "warning:".yellow().bold(), "SymmetrySystem".yellow())]
    Absent,
    #[error("{} no data info in Name property '{}', using default values", "warning:".yellow().bold(), .0.yellow())]
    Malformed(String),
}

/// Errors that can occur when accessing or modifying individual atoms.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AtomError {
    #[error("{} atom index '{}' is out of range (structure contains {} atoms)", "error:".red().bold(), .0.to_string().yellow(), .1)]
    OutOfRange(usize, usize),
    #[error("{} species '{}' does not exist in the structure", "error:".red().bold(), .0.yellow())]
    UnknownSpecies(String),
}

/// Errors that can occur when highlighting atoms.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorError {
    #[error("{} atom number '{}' is out of range (structure contains {} atoms, numbering starts from 1)", "error:".red().bold(), .index.to_string().yellow(), .n_atoms)]
    OutOfRange { index: usize, n_atoms: usize },
    #[error("{} atom number '{}' could not be located in the document", "error:".red().bold(), .0.to_string().yellow())]
    NotInDocument(usize),
}

/// Errors that can occur when working with lattice vectors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LatticeError {
    #[error("{} lattice basis is singular, fractional coordinates are not defined", "error:".red().bold())]
    Singular,
    #[error("{} coordinate array has {} columns, expected {}", "error:".red().bold(), .0.to_string().yellow(), "3".yellow())]
    InvalidShape(usize),
}

/// Errors that can occur when reading an arc trajectory.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReadArcError {
    #[error("{} file '{}' was not found", "error:".red().bold(), path_to_yellow(.0))]
    FileNotFound(Box<Path>),
    #[error("{} could not read line {} of file '{}'", "error:".red().bold(), .1, path_to_yellow(.0))]
    LineNotFound(Box<Path>, usize),
    #[error("{} could not parse line {} '{}' as frame header", "error:".red().bold(), .0, .1.yellow())]
    ParseHeaderLine(usize, String),
    #[error("{} could not parse line {} '{}' as atom coordinates", "error:".red().bold(), .0, .1.yellow())]
    ParseAtomLine(usize, String),
}

/// Errors that can occur when reading an xtd structure together with its trajectory.
#[derive(Error, Debug)]
pub enum XtdError {
    #[error("{} no arc trajectory is associated with the xtd structure", "error:".red().bold())]
    MissingTrajectory,
    #[error("{} structure has no lattice, fractional coordinates are not defined", "error:".red().bold())]
    MissingLattice,
    #[error("{}", .0)]
    Structure(#[from] ParseXsdError),
    #[error("{}", .0)]
    Trajectory(#[from] ReadArcError),
    #[error("{}", .0)]
    Lattice(#[from] LatticeError),
}
