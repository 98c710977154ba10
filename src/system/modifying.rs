// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of methods for modifying atoms of the Structure.

use ndarray::Array2;

use crate::errors::AtomError;
use crate::structures::atom::FreezeFlags;

use super::Structure;

/// ## Methods for modifying atoms of the `Structure`.
///
/// Atoms are indexed starting from 0 in the order of the per-atom arrays (i.e. grouped by species).
/// Changes are only written into the document once `Structure::update` or `Structure::write_xsd` is called.
impl Structure {
    fn check_index(&self, index: usize) -> Result<(), AtomError> {
        if index >= self.n_atoms {
            Err(AtomError::OutOfRange(index, self.n_atoms))
        } else {
            Ok(())
        }
    }

    /// Set Cartesian coordinates of an atom.
    pub fn set_atom_coordinates(
        &mut self,
        index: usize,
        coordinates: [f64; 3],
    ) -> Result<(), AtomError> {
        self.check_index(index)?;
        if index >= self.coordinates.nrows() || self.coordinates.ncols() != 3 {
            return Err(AtomError::OutOfRange(index, self.coordinates.nrows()));
        }

        for (item, value) in self.coordinates.row_mut(index).iter_mut().zip(coordinates) {
            *item = value;
        }

        Ok(())
    }

    /// Set freeze flags of an atom.
    ///
    /// ## Notes
    /// - The document can only express atoms that are fixed along all axes or free along all axes.
    ///   Mixed flags are kept in the structure but do not change the document.
    pub fn set_atom_freeze_flags(
        &mut self,
        index: usize,
        flags: FreezeFlags,
    ) -> Result<(), AtomError> {
        self.check_index(index)?;
        let n_flags = self.freeze_flags.len();
        let slot = self
            .freeze_flags
            .get_mut(index)
            .ok_or(AtomError::OutOfRange(index, n_flags))?;

        *slot = flags;
        Ok(())
    }

    /// Set display name of an atom.
    pub fn set_atom_name(&mut self, index: usize, name: &str) -> Result<(), AtomError> {
        self.check_index(index)?;
        let n_names = self.names.len();
        let slot = self
            .names
            .get_mut(index)
            .ok_or(AtomError::OutOfRange(index, n_names))?;

        *slot = name.to_owned();
        Ok(())
    }

    /// Set freeze flags of all atoms of a species.
    pub fn set_species_freeze_flags(
        &mut self,
        species: &str,
        flags: FreezeFlags,
    ) -> Result<(), AtomError> {
        let n_flags = self.freeze_flags.len();
        let range = self
            .species_range(species)
            .ok_or_else(|| AtomError::UnknownSpecies(species.to_owned()))?;

        let end = range.end;
        self.freeze_flags
            .get_mut(range)
            .ok_or(AtomError::OutOfRange(end.saturating_sub(1), n_flags))?
            .fill(flags);

        Ok(())
    }

    /// Replace the coordinates of all atoms.
    ///
    /// ## Notes
    /// - The shape of the array is not checked here. An array not matching the number
    ///   of atoms is rejected once the structure is pushed into the document.
    pub fn set_coordinates(&mut self, coordinates: Array2<f64>) {
        self.coordinates = coordinates;
    }

    /// Set energy stored in the metadata.
    pub fn set_energy(&mut self, energy: f64) {
        self.metadata.energy = energy;
    }

    /// Set force stored in the metadata.
    pub fn set_force(&mut self, force: f64) {
        self.metadata.force = force;
    }

    /// Set magnetism stored in the metadata.
    pub fn set_magnetism(&mut self, magnetism: f64) {
        self.metadata.magnetism = magnetism;
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn read() -> Structure {
        Structure::from_file("test_files/example.xsd", Path::new("/calc")).unwrap()
    }

    #[test]
    fn set_atom_coordinates() {
        let mut structure = read();
        structure.set_atom_coordinates(4, [1.0, -2.0, 3.5]).unwrap();

        let row = structure.coordinates().row(4).to_vec();
        assert_eq!(row, vec![1.0, -2.0, 3.5]);
        assert_eq!(
            structure.species_coordinates("O").unwrap().row(1).to_vec(),
            vec![1.0, -2.0, 3.5]
        );
    }

    #[test]
    fn set_atom_out_of_range() {
        let mut structure = read();
        assert_eq!(
            structure.set_atom_coordinates(6, [0.0; 3]),
            Err(AtomError::OutOfRange(6, 6))
        );
        assert_eq!(
            structure.set_atom_freeze_flags(10, FreezeFlags::FIXED),
            Err(AtomError::OutOfRange(10, 6))
        );
        assert_eq!(
            structure.set_atom_name(6, "X"),
            Err(AtomError::OutOfRange(6, 6))
        );
    }

    #[test]
    fn set_atom_coordinates_truncated() {
        let mut structure = read();
        structure.set_coordinates(Array2::zeros((2, 3)));
        assert_eq!(
            structure.set_atom_coordinates(3, [0.0; 3]),
            Err(AtomError::OutOfRange(3, 2))
        );
    }

    #[test]
    fn set_atom_freeze_flags_and_name() {
        let mut structure = read();
        structure.set_atom_freeze_flags(2, FreezeFlags::FIXED).unwrap();
        structure.set_atom_name(2, "Pt3").unwrap();

        assert_eq!(structure.freeze_flags()[2], FreezeFlags::FIXED);
        assert_eq!(structure.names()[2], "Pt3");
    }

    #[test]
    fn set_species_freeze_flags() {
        let mut structure = read();
        structure
            .set_species_freeze_flags("Pt", FreezeFlags::FREE)
            .unwrap();

        assert_eq!(
            structure.species_freeze_flags("Pt").unwrap(),
            &[FreezeFlags::FREE; 3]
        );
        assert_eq!(
            structure.set_species_freeze_flags("N", FreezeFlags::FREE),
            Err(AtomError::UnknownSpecies("N".to_owned()))
        );
    }

    #[test]
    fn set_metadata() {
        let mut structure = read();
        structure.set_energy(-12.5);
        structure.set_force(0.01);
        structure.set_magnetism(2.0);

        assert_eq!(structure.metadata().energy, -12.5);
        assert_eq!(structure.metadata().force, 0.01);
        assert_eq!(structure.metadata().magnetism, 2.0);
    }
}
