// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the Structure and its methods.

use std::path::Path;

use getset::{CopyGetters, Getters, MutGetters};
use ndarray::{s, Array2, ArrayView2};

use crate::errors::{MetadataWarning, WriteXsdError};
use crate::io::document::XmlDocument;
use crate::structures::atom::FreezeFlags;
use crate::structures::lattice::Lattice;
use crate::structures::metadata::Metadata;
use crate::structures::species::species_ranges;

mod color;
mod modifying;

/// Atomic structure read from a Materials Studio xsd (or xtd) file.
///
/// Atoms are grouped by species: all per-atom arrays list the atoms of the first species
/// (in the order in which they appear in the document), followed by the atoms of the second species, etc.
/// Species are ordered by their first occurrence in the document.
///
/// The structure owns the document it was read from. Writing the structure
/// pushes the per-atom arrays, lattice vectors, and metadata back into the document
/// and leaves everything else untouched.
#[derive(Debug, Clone, Getters, CopyGetters, MutGetters)]
pub struct Structure {
    /// Path to the file the structure was read from.
    pub(crate) filename: Box<Path>,
    /// The underlying markup document.
    #[getset(get = "pub")]
    pub(crate) document: XmlDocument,
    /// Version of Materials Studio that produced the document (if specified).
    pub(crate) ms_version: Option<String>,
    /// Species in the order of their first occurrence.
    pub(crate) species: Vec<String>,
    /// Number of atoms of each species.
    pub(crate) counts: Vec<usize>,
    /// Total number of atoms.
    #[getset(get_copy = "pub")]
    pub(crate) n_atoms: usize,
    /// Cartesian coordinates of the atoms, `[n_atoms, 3]`.
    #[getset(get = "pub", get_mut = "pub")]
    pub(crate) coordinates: Array2<f64>,
    /// Freeze flags of the atoms.
    #[getset(get = "pub", get_mut = "pub")]
    pub(crate) freeze_flags: Vec<FreezeFlags>,
    /// Display names of the atoms.
    #[getset(get = "pub", get_mut = "pub")]
    pub(crate) names: Vec<String>,
    /// Lattice vectors. `None` if the document describes a non-periodic structure.
    pub(crate) lattice: Option<Lattice>,
    /// Energy, force, magnetism, and path.
    #[getset(get = "pub", get_mut = "pub")]
    pub(crate) metadata: Metadata,
    /// Warning raised when the metadata were loaded.
    pub(crate) metadata_warning: Option<MetadataWarning>,
}

/// ## Methods for accessing properties of the `Structure`.
impl Structure {
    /// Get the path to the file the structure was read from.
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Get the version of Materials Studio that wrote the document.
    pub fn ms_version(&self) -> Option<&str> {
        self.ms_version.as_deref()
    }

    /// Get the species of the structure in the order of their first occurrence.
    pub fn species(&self) -> &[String] {
        &self.species
    }

    /// Get the number of atoms of each species. Aligned with `Structure::species`.
    pub fn atoms_num(&self) -> &[usize] {
        &self.counts
    }

    /// Iterate over pairs of species and their number of atoms.
    pub fn natoms(&self) -> impl Iterator<Item = (&str, usize)> {
        self.species
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }

    /// Get the lattice of the structure. Returns `None` for non-periodic structures.
    pub fn lattice(&self) -> Option<&Lattice> {
        self.lattice.as_ref()
    }

    /// Get mutable reference to the lattice of the structure.
    pub fn lattice_mut(&mut self) -> Option<&mut Lattice> {
        self.lattice.as_mut()
    }

    /// Get the warning raised while loading the metadata.
    /// Returns `None` if the metadata were loaded successfully.
    pub fn metadata_warning(&self) -> Option<&MetadataWarning> {
        self.metadata_warning.as_ref()
    }

    /// Get the range of indices of atoms of the given species.
    fn species_range(&self, species: &str) -> Option<std::ops::Range<usize>> {
        let index = self.species.iter().position(|s| s == species)?;
        species_ranges(&self.counts).into_iter().nth(index)
    }

    /// Get the coordinates of all atoms of a species.
    /// Returns `None` if there is no such species or if the coordinates no longer cover it.
    pub fn species_coordinates(&self, species: &str) -> Option<ArrayView2<'_, f64>> {
        let range = self.species_range(species)?;
        if range.end > self.coordinates.nrows() {
            return None;
        }

        Some(self.coordinates.slice(s![range, ..]))
    }

    /// Get the freeze flags of all atoms of a species.
    pub fn species_freeze_flags(&self, species: &str) -> Option<&[FreezeFlags]> {
        self.freeze_flags.get(self.species_range(species)?)
    }

    /// Get the display names of all atoms of a species.
    pub fn species_names(&self, species: &str) -> Option<&[String]> {
        self.names.get(self.species_range(species)?)
    }

    /// Check that all per-atom arrays match the number of atoms.
    pub(crate) fn check_shape(&self) -> Result<(), WriteXsdError> {
        let lengths = [
            ("coordinates", self.coordinates.nrows()),
            ("freeze flags", self.freeze_flags.len()),
            ("atom names", self.names.len()),
        ];

        for (field, found) in lengths {
            if found != self.n_atoms {
                return Err(WriteXsdError::ShapeMismatch {
                    field,
                    expected: self.n_atoms,
                    found,
                });
            }
        }

        if self.coordinates.ncols() != 3 {
            return Err(WriteXsdError::CoordinateColumns(self.coordinates.ncols()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn read() -> Structure {
        Structure::from_file("test_files/example.xsd", Path::new("/calc")).unwrap()
    }

    #[test]
    fn natoms() {
        let structure = read();
        let natoms: Vec<(&str, usize)> = structure.natoms().collect();
        assert_eq!(natoms, vec![("Pt", 3), ("O", 2), ("C", 1)]);
        assert_eq!(structure.atoms_num(), &[3, 2, 1]);
        assert_eq!(structure.species(), &["Pt", "O", "C"]);
        assert_eq!(structure.n_atoms(), 6);
    }

    #[test]
    fn species_views() {
        let structure = read();

        let oxygens = structure.species_coordinates("O").unwrap();
        assert_eq!(oxygens.shape(), &[2, 3]);
        assert_approx_eq!(f64, oxygens[[0, 2]], 2.1);
        assert_approx_eq!(f64, oxygens[[1, 2]], 2.2);

        assert_eq!(
            structure.species_names("Pt").unwrap(),
            &["Pt1", "Pt2", "Pt_custom"]
        );
        assert_eq!(
            structure.species_freeze_flags("Pt").unwrap(),
            &[FreezeFlags::FIXED, FreezeFlags::FIXED, FreezeFlags::FREE]
        );

        assert!(structure.species_coordinates("N").is_none());
        assert!(structure.species_names("N").is_none());
        assert!(structure.species_freeze_flags("N").is_none());
    }

    #[test]
    fn species_views_truncated() {
        let mut structure = read();
        structure.names_mut().pop();
        *structure.coordinates_mut() = Array2::zeros((4, 3));

        assert!(structure.species_names("C").is_none());
        assert!(structure.species_names("O").is_some());
        assert!(structure.species_coordinates("C").is_none());
        assert!(structure.species_coordinates("Pt").is_some());
    }

    #[test]
    fn check_shape() {
        let mut structure = read();
        assert!(structure.check_shape().is_ok());

        structure.freeze_flags_mut().push(FreezeFlags::FREE);
        match structure.check_shape() {
            Err(WriteXsdError::ShapeMismatch {
                field,
                expected,
                found,
            }) => {
                assert_eq!(field, "freeze flags");
                assert_eq!(expected, 6);
                assert_eq!(found, 7);
            }
            other => panic!("Incorrect result `{:?}` was returned.", other),
        }
    }

    #[test]
    fn check_shape_columns() {
        let mut structure = read();
        *structure.coordinates_mut() = Array2::zeros((6, 2));

        match structure.check_shape() {
            Err(WriteXsdError::CoordinateColumns(2)) => (),
            other => panic!("Incorrect result `{:?}` was returned.", other),
        }
    }
}
