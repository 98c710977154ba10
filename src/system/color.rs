// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of methods for highlighting atoms of the Structure.

use crate::auxiliary::{ATOM_TAG, COLOR_ATTR, DEFAULT_HIGHLIGHT_COLOR};
use crate::errors::ColorError;
use crate::structures::atom::element_is_species;
use crate::structures::species::locate_atom;

use super::Structure;

impl Structure {
    /// Set the display color of an atom.
    ///
    /// ## Parameters
    /// - `atom_number`: number of the atom starting from 1, in the order of the per-atom arrays
    ///   (i.e. atoms of the first species come first)
    /// - `color`: RGB color of the atom
    ///
    /// ## Returns
    /// - `ColorError::OutOfRange` if `atom_number` is 0 or larger than the number of atoms.
    ///
    /// ## Notes
    /// - The color is written directly into the document as `R,G,B,255`,
    ///   replacing any color the atom already has.
    ///
    /// ## Example
    /// ```no_run
    /// # use matstudio_rs::prelude::*;
    /// # use std::path::Path;
    /// #
    /// let mut structure = Structure::from_file("structure.xsd", Path::new("/calc")).unwrap();
    ///
    /// // highlight the second atom in blue
    /// structure.modify_color(2, [0, 0, 255]).unwrap();
    /// structure.write_xsd("highlighted.xsd", Path::new("/calc")).unwrap();
    /// ```
    pub fn modify_color(&mut self, atom_number: usize, color: [u8; 3]) -> Result<(), ColorError> {
        let (species_index, rank) =
            locate_atom(&self.counts, atom_number).ok_or(ColorError::OutOfRange {
                index: atom_number,
                n_atoms: self.n_atoms,
            })?;

        let species = &self.species[species_index];
        let element = self
            .document
            .elements_mut(ATOM_TAG)
            .filter(|element| element_is_species(element, species))
            .nth(rank - 1)
            .ok_or(ColorError::NotInDocument(atom_number))?;

        element.set(
            COLOR_ATTR,
            &format!("{},{},{},255", color[0], color[1], color[2]),
        );

        Ok(())
    }

    /// Set the display color of an atom to the default highlight color (orange).
    #[inline(always)]
    pub fn modify_color_default(&mut self, atom_number: usize) -> Result<(), ColorError> {
        self.modify_color(atom_number, DEFAULT_HIGHLIGHT_COLOR)
    }
}
