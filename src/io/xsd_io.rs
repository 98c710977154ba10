// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of functions for reading and writing Materials Studio xsd files.

use std::path::Path;

use crate::auxiliary::{
    format_triple, parse_triple, ATOM_TAG, DEFAULT_OUTPUT, LATTICE_TAG, NAME_ATTR,
    RESTRICTED_ATTR, RESTRICTED_VALUE, SYMMETRY_TAG, VECTOR_ATTRS, VERSION_ATTR, WRITTEN_BY,
    WRITTEN_BY_ATTR, XSD_LOG_TARGET, XYZ_ATTR,
};
use crate::errors::{ParseXsdError, WriteXsdError};
use crate::io::document::{XmlDocument, XmlElement};
use crate::structures::atom::{display_name, element_is_species, FreezeFlags};
use crate::structures::lattice::Lattice;
use crate::structures::metadata::Metadata;
use crate::structures::species::{species_ranges, SpeciesGroups};
use crate::system::Structure;

/// ## Methods for reading and writing xsd files.
impl Structure {
    /// Read an xsd (or xtd) file and construct a `Structure`.
    ///
    /// ## Parameters
    /// - `filename`: path to the file
    /// - `working_dir`: path stored as the `path` of the metadata
    ///
    /// ## Notes
    /// - Atom elements without coordinates are not part of the structure.
    /// - If the document has no `SpaceGroup` element, the structure has no lattice.
    /// - Missing or malformed metadata are not an error. Default values are used
    ///   and the reason is available from `Structure::metadata_warning`.
    /// - The author attribute of the root element is set to `matstudio_rs`.
    pub fn from_file(
        filename: impl AsRef<Path>,
        working_dir: &Path,
    ) -> Result<Structure, ParseXsdError> {
        let document = XmlDocument::from_file(filename.as_ref())?;
        Structure::from_document(document, filename, working_dir)
    }

    /// Construct a `Structure` from an already parsed markup document.
    /// `filename` is only used to identify the structure.
    pub fn from_document(
        mut document: XmlDocument,
        filename: impl AsRef<Path>,
        working_dir: &Path,
    ) -> Result<Structure, ParseXsdError> {
        let ms_version = document
            .root()
            .and_then(|root| root.get(VERSION_ATTR))
            .map(str::to_owned);

        if let Some(root) = document.root_mut() {
            root.set(WRITTEN_BY_ATTR, WRITTEN_BY);
        }

        let atoms = SpeciesGroups::from_elements(document.elements(ATOM_TAG))?.flatten();

        let lattice = match document.first(LATTICE_TAG) {
            Some(element) => Some(read_lattice(element)?),
            None => None,
        };

        let parse = Metadata::decode(
            document
                .first(SYMMETRY_TAG)
                .and_then(|element| element.get(NAME_ATTR)),
            working_dir,
        );
        let metadata_warning = parse.warning().cloned();

        log::debug!(
            target: XSD_LOG_TARGET,
            "Loaded {} atoms of species [{}] from '{}'.",
            atoms.names.len(),
            atoms.species.join(", "),
            filename.as_ref().display()
        );

        Ok(Structure {
            filename: Box::from(filename.as_ref()),
            document,
            ms_version,
            n_atoms: atoms.names.len(),
            species: atoms.species,
            counts: atoms.counts,
            coordinates: atoms.coordinates,
            freeze_flags: atoms.freeze_flags,
            names: atoms.names,
            lattice,
            metadata: parse.into_metadata(),
            metadata_warning,
        })
    }

    /// Push coordinates, freeze flags, and names of the atoms, lattice vectors,
    /// and metadata into the underlying document.
    ///
    /// ## Returns
    /// - `WriteXsdError::ShapeMismatch` if any per-atom array does not match the number of atoms.
    ///   In such case, the document is not changed at all.
    ///
    /// ## Notes
    /// - Atoms fixed along all axes get the `RestrictedProperties` marker, atoms free along
    ///   all axes lose it. Atoms with mixed flags keep the marker as it is.
    /// - Attributes whose value does not change are left untouched, including their formatting.
    /// - Atoms without `Name` attribute do not get one unless they were renamed.
    /// - The path of the metadata is set to `working_dir`. Metadata are only written
    ///   if the document contains a `SymmetrySystem` element.
    pub fn update(&mut self, working_dir: &Path) -> Result<(), WriteXsdError> {
        self.check_shape()?;

        self.update_atoms();
        self.update_lattice();
        self.update_metadata(working_dir);

        Ok(())
    }

    /// Update the document and write it into an xsd file.
    pub fn write_xsd(
        &mut self,
        filename: impl AsRef<Path>,
        working_dir: &Path,
    ) -> Result<(), WriteXsdError> {
        self.update(working_dir)?;
        self.document.write_file(filename.as_ref())?;

        log::debug!(
            target: XSD_LOG_TARGET,
            "Written {} atoms into '{}'.",
            self.n_atoms,
            filename.as_ref().display()
        );

        Ok(())
    }

    /// Update the document and write it into `./new.xsd`.
    #[inline(always)]
    pub fn write_xsd_default(&mut self, working_dir: &Path) -> Result<(), WriteXsdError> {
        self.write_xsd(DEFAULT_OUTPUT, working_dir)
    }

    fn update_atoms(&mut self) {
        for (species, range) in self.species.iter().zip(species_ranges(&self.counts)) {
            let elements = self
                .document
                .elements_mut(ATOM_TAG)
                .filter(|element| element_is_species(element, species));

            for (element, index) in elements.zip(range) {
                let row = self.coordinates.row(index);
                set_triple(element, XYZ_ATTR, &[row[0], row[1], row[2]]);
                set_freeze_flags(element, self.freeze_flags[index], &self.names[index]);
                set_name(element, species, &self.names[index]);
            }
        }
    }

    fn update_lattice(&mut self) {
        if let (Some(lattice), Some(element)) =
            (self.lattice.as_ref(), self.document.first_mut(LATTICE_TAG))
        {
            for (attribute, vector) in VECTOR_ATTRS.into_iter().zip(lattice.vectors()) {
                set_triple(element, attribute, &vector);
            }
        }
    }

    fn update_metadata(&mut self, working_dir: &Path) {
        if let Some(element) = self.document.first_mut(SYMMETRY_TAG) {
            element.set(NAME_ATTR, &self.metadata.encode(working_dir));
        }

        self.metadata.path = working_dir.to_path_buf();
    }
}

/// Read lattice vectors from the `SpaceGroup` element.
fn read_lattice(element: &XmlElement) -> Result<Lattice, ParseXsdError> {
    let mut vectors = [[0.0; 3]; 3];

    for (vector, attribute) in vectors.iter_mut().zip(VECTOR_ATTRS) {
        let value = element
            .get(attribute)
            .ok_or(ParseXsdError::MissingLatticeVector(attribute))?;

        *vector = parse_triple(value)
            .ok_or_else(|| ParseXsdError::InvalidLatticeVector(value.to_owned()))?;
    }

    Ok(Lattice::from(vectors))
}

/// Write a triple into an attribute unless the attribute already holds the same numbers.
fn set_triple(element: &mut XmlElement, key: &str, triple: &[f64; 3]) {
    if element.get(key).and_then(parse_triple).as_ref() == Some(triple) {
        return;
    }

    element.set(key, &format_triple(triple));
}

fn set_freeze_flags(element: &mut XmlElement, flags: FreezeFlags, name: &str) {
    if flags.is_fixed() {
        if !element.contains(RESTRICTED_ATTR) {
            element.set(RESTRICTED_ATTR, RESTRICTED_VALUE);
        }
    } else if flags.is_free() {
        element.remove(RESTRICTED_ATTR);
    } else {
        log::warn!(
            target: XSD_LOG_TARGET,
            "Atom '{}' has mixed freeze flags '{}' which can't be stored in the document. Restriction marker left unchanged.",
            name,
            flags
        );
    }
}

fn set_name(element: &mut XmlElement, species: &str, name: &str) {
    if display_name(species, element.get(NAME_ATTR)) != name {
        element.set(NAME_ATTR, name);
    }
}
