// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Grouping of atoms by their species.

use std::ops::Range;

use indexmap::IndexMap;
use ndarray::Array2;

use crate::errors::ParseXsdError;
use crate::io::document::XmlElement;
use crate::structures::atom::{AtomRecord, FreezeFlags};

/// Properties of all atoms of a single species, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesAtoms {
    pub coordinates: Vec<[f64; 3]>,
    pub freeze_flags: Vec<FreezeFlags>,
    pub names: Vec<String>,
}

impl SpeciesAtoms {
    /// Number of atoms of the species.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Are there no atoms of the species?
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn push(&mut self, record: AtomRecord) {
        self.freeze_flags.push(record.freeze_flags());
        self.names.push(record.display_name());
        self.coordinates.push(record.coordinates);
    }
}

/// Atoms grouped by species. Species are kept in the order in which they were first encountered.
#[derive(Debug, Clone, Default)]
pub struct SpeciesGroups {
    groups: IndexMap<String, SpeciesAtoms>,
}

/// Properties of all atoms concatenated species by species.
#[derive(Debug, Clone)]
pub struct FlatAtoms {
    pub species: Vec<String>,
    pub counts: Vec<usize>,
    pub coordinates: Array2<f64>,
    pub freeze_flags: Vec<FreezeFlags>,
    pub names: Vec<String>,
}

impl SpeciesGroups {
    /// Group atom records by species. The first occurrence of a species fixes its position,
    /// further atoms of the same species are appended in the order in which they are provided.
    pub fn from_records(records: impl IntoIterator<Item = AtomRecord>) -> Self {
        let mut groups: IndexMap<String, SpeciesAtoms> = IndexMap::new();

        for record in records {
            match groups.get_mut(&record.species) {
                Some(atoms) => atoms.push(record),
                None => {
                    let species = record.species.clone();
                    let mut atoms = SpeciesAtoms::default();
                    atoms.push(record);
                    groups.insert(species, atoms);
                }
            }
        }

        SpeciesGroups { groups }
    }

    /// Group atom elements by species. Elements without coordinates are skipped.
    pub fn from_elements<'a>(
        elements: impl IntoIterator<Item = &'a XmlElement>,
    ) -> Result<Self, ParseXsdError> {
        let mut records = Vec::new();
        for element in elements {
            if let Some(record) = AtomRecord::from_element(element)? {
                records.push(record);
            }
        }

        Ok(SpeciesGroups::from_records(records))
    }

    /// Iterate over the species in order of their first occurrence.
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of atoms of each species. Aligned with `species`.
    pub fn counts(&self) -> Vec<usize> {
        self.groups.values().map(SpeciesAtoms::len).collect()
    }

    /// Total number of atoms.
    pub fn n_atoms(&self) -> usize {
        self.groups.values().map(SpeciesAtoms::len).sum()
    }

    /// Get the atoms of a species.
    pub fn get(&self, species: &str) -> Option<&SpeciesAtoms> {
        self.groups.get(species)
    }

    /// Concatenate the properties of atoms species by species.
    pub fn flatten(self) -> FlatAtoms {
        let n_atoms = self.n_atoms();
        let counts = self.counts();

        let mut species = Vec::with_capacity(self.groups.len());
        let mut coordinates = Vec::with_capacity(n_atoms);
        let mut freeze_flags = Vec::with_capacity(n_atoms);
        let mut names = Vec::with_capacity(n_atoms);

        for (name, atoms) in self.groups.into_iter() {
            species.push(name);
            coordinates.extend(atoms.coordinates);
            freeze_flags.extend(atoms.freeze_flags);
            names.extend(atoms.names);
        }

        FlatAtoms {
            species,
            counts,
            coordinates: Array2::from(coordinates),
            freeze_flags,
            names,
        }
    }
}

/// Get the range of atom indices (0-based, into the flattened arrays) of each species.
pub(crate) fn species_ranges(counts: &[usize]) -> Vec<Range<usize>> {
    let mut start = 0;
    counts
        .iter()
        .map(|&n| {
            let range = start..start + n;
            start += n;
            range
        })
        .collect()
}

/// Locate an atom given its global number (starting from 1).
///
/// ## Returns
/// Index of the species the atom belongs to and the number of the atom
/// within that species (starting from 1). `None` if the number is out of range.
pub(crate) fn locate_atom(counts: &[usize], atom_number: usize) -> Option<(usize, usize)> {
    if atom_number == 0 {
        return None;
    }

    let mut cumulative = 0;
    for (index, &count) in counts.iter().enumerate() {
        if atom_number <= cumulative + count {
            return Some((index, atom_number - cumulative));
        }
        cumulative += count;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::document::XmlDocument;
    use rand::seq::SliceRandom;

    fn record(species: &str, x: f64, restricted: bool, name: Option<&str>) -> AtomRecord {
        AtomRecord {
            species: species.to_owned(),
            coordinates: [x, 0.0, 0.0],
            restricted,
            name: name.map(str::to_owned),
        }
    }

    fn mixed_records() -> Vec<AtomRecord> {
        vec![
            record("O", 1.0, false, Some("O1")),
            record("H", 2.0, true, Some("H1")),
            record("O", 3.0, true, None),
            record("C", 4.0, false, Some("C1")),
            record("H", 5.0, false, Some("H2")),
            record("H", 6.0, false, None),
        ]
    }

    #[test]
    fn group_order_and_counts() {
        let groups = SpeciesGroups::from_records(mixed_records());

        assert_eq!(groups.species().collect::<Vec<_>>(), vec!["O", "H", "C"]);
        assert_eq!(groups.counts(), vec![2, 3, 1]);
        assert_eq!(groups.n_atoms(), 6);

        let hydrogens = groups.get("H").unwrap();
        assert_eq!(
            hydrogens.coordinates,
            vec![[2.0, 0.0, 0.0], [5.0, 0.0, 0.0], [6.0, 0.0, 0.0]]
        );
        assert_eq!(
            hydrogens.freeze_flags,
            vec![FreezeFlags::FIXED, FreezeFlags::FREE, FreezeFlags::FREE]
        );
        assert_eq!(hydrogens.names, vec!["H1", "H2", "H_custom"]);
        assert!(groups.get("N").is_none());
    }

    #[test]
    fn flatten() {
        let flat = SpeciesGroups::from_records(mixed_records()).flatten();

        assert_eq!(flat.species, vec!["O", "H", "C"]);
        assert_eq!(flat.counts, vec![2, 3, 1]);
        assert_eq!(flat.coordinates.shape(), &[6, 3]);

        let xs: Vec<f64> = flat.coordinates.column(0).to_vec();
        assert_eq!(xs, vec![1.0, 3.0, 2.0, 5.0, 6.0, 4.0]);
        assert_eq!(
            flat.names,
            vec!["O1", "O_custom", "H1", "H2", "H_custom", "C1"]
        );
        assert_eq!(flat.freeze_flags[1], FreezeFlags::FIXED);
        assert_eq!(flat.freeze_flags[2], FreezeFlags::FIXED);
        assert_eq!(flat.freeze_flags[0], FreezeFlags::FREE);
    }

    #[test]
    fn flatten_empty() {
        let flat = SpeciesGroups::from_records(Vec::new()).flatten();
        assert!(flat.species.is_empty());
        assert!(flat.counts.is_empty());
        assert_eq!(flat.coordinates.shape(), &[0, 3]);
    }

    #[test]
    fn permutation_within_species_keeps_species_order() {
        let mut rng = rand::thread_rng();
        let reference = SpeciesGroups::from_records(mixed_records());

        for _ in 0..50 {
            let records = mixed_records();
            let pattern: Vec<String> = records.iter().map(|r| r.species.clone()).collect();

            // shuffle the atoms of every species, keep the sequence of species unchanged
            let mut per_species: IndexMap<String, Vec<AtomRecord>> = IndexMap::new();
            for record in records {
                per_species
                    .entry(record.species.clone())
                    .or_default()
                    .push(record);
            }
            for atoms in per_species.values_mut() {
                atoms.shuffle(&mut rng);
            }

            let shuffled: Vec<AtomRecord> = pattern
                .iter()
                .map(|species| per_species.get_mut(species).unwrap().pop().unwrap())
                .collect();

            let groups = SpeciesGroups::from_records(shuffled);
            assert_eq!(
                groups.species().collect::<Vec<_>>(),
                reference.species().collect::<Vec<_>>()
            );
            assert_eq!(groups.counts(), reference.counts());
            assert_eq!(groups.counts().iter().sum::<usize>(), groups.n_atoms());
        }
    }

    #[test]
    fn from_elements_skips_atoms_without_coordinates() {
        let document: XmlDocument = r#"<R>
            <Atom3d XYZ="0,0,1" Components="Pt" Name="Pt1"/>
            <Atom3d Components="O" Name="ghost"/>
            <Atom3d XYZ="0,0,2" Components="O"/>
            <Atom3d XYZ="0,0,3" Components="Pt" RestrictedProperties="FractionalXYZ"/>
        </R>"#
            .parse()
            .unwrap();

        let groups = SpeciesGroups::from_elements(document.elements("Atom3d")).unwrap();
        assert_eq!(groups.species().collect::<Vec<_>>(), vec!["Pt", "O"]);
        assert_eq!(groups.counts(), vec![2, 1]);
        assert_eq!(groups.get("O").unwrap().names, vec!["O_custom"]);
    }

    #[test]
    fn from_elements_fails() {
        let document: XmlDocument = r#"<R><Atom3d XYZ="0,a,1" Components="Pt"/></R>"#
            .parse()
            .unwrap();

        match SpeciesGroups::from_elements(document.elements("Atom3d")) {
            Err(ParseXsdError::InvalidCoordinates(s)) => assert_eq!(s, "0,a,1"),
            Ok(_) => panic!("Grouping should have failed, but it did not."),
            Err(e) => panic!("Incorrect error type `{:?}` was returned.", e),
        }
    }

    #[test]
    fn ranges() {
        assert_eq!(species_ranges(&[2, 3, 1]), vec![0..2, 2..5, 5..6]);
        assert_eq!(species_ranges(&[0, 2]), vec![0..0, 0..2]);
        assert!(species_ranges(&[]).is_empty());
    }

    macro_rules! locate_tests {
        ($($name:ident: $number:expr => $expected:expr,)*) => {
            $(
                paste::paste! {
                    #[test]
                    fn [<locate_ $name>]() {
                        assert_eq!(locate_atom(&[2, 3], $number), $expected);
                    }
                }
            )*
        };
    }

    locate_tests! {
        first: 1 => Some((0, 1)),
        second: 2 => Some((0, 2)),
        third: 3 => Some((1, 1)),
        fourth: 4 => Some((1, 2)),
        last: 5 => Some((1, 3)),
        zero: 0 => None,
        beyond: 6 => None,
    }

    #[test]
    fn locate_skips_empty_species() {
        assert_eq!(locate_atom(&[0, 2, 0, 1], 1), Some((1, 1)));
        assert_eq!(locate_atom(&[0, 2, 0, 1], 3), Some((3, 1)));
        assert_eq!(locate_atom(&[], 1), None);
    }
}
