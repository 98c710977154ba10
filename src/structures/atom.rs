// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the AtomRecord structure and of freeze flags.

use std::fmt;
use std::str::FromStr;

use crate::auxiliary::{
    parse_triple, COMPONENTS_ATTR, CUSTOM_NAME_SUFFIX, NAME_ATTR, RESTRICTED_ATTR, XYZ_ATTR,
};
use crate::errors::ParseXsdError;
use crate::io::document::XmlElement;

/// Constraint of a single coordinate of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FreezeFlag {
    /// Coordinate is allowed to change. Written as `T`.
    #[default]
    Free,
    /// Coordinate is fixed. Written as `F`.
    Fixed,
}

impl fmt::Display for FreezeFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreezeFlag::Free => write!(f, "T"),
            FreezeFlag::Fixed => write!(f, "F"),
        }
    }
}

/// Freeze flags of an atom, one for each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FreezeFlags(pub [FreezeFlag; 3]);

impl FreezeFlags {
    /// All three coordinates may change.
    pub const FREE: FreezeFlags = FreezeFlags([FreezeFlag::Free; 3]);
    /// All three coordinates are fixed.
    pub const FIXED: FreezeFlags = FreezeFlags([FreezeFlag::Fixed; 3]);

    /// Are all three coordinates fixed?
    #[inline(always)]
    pub fn is_fixed(&self) -> bool {
        *self == Self::FIXED
    }

    /// Are all three coordinates free?
    #[inline(always)]
    pub fn is_free(&self) -> bool {
        *self == Self::FREE
    }
}

impl fmt::Display for FreezeFlags {
    /// Formats the flags the same way as VASP selective dynamics, e.g. `F,F,F`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0[0], self.0[1], self.0[2])
    }
}

impl FromStr for FreezeFlags {
    type Err = String;

    /// Parse flags written as `T,F,T` (commas or whitespace may separate the flags).
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let mut flags = [FreezeFlag::Free; 3];
        let mut split = string
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty());

        for flag in flags.iter_mut() {
            *flag = match split.next() {
                Some("T") => FreezeFlag::Free,
                Some("F") => FreezeFlag::Fixed,
                _ => return Err(string.to_owned()),
            };
        }

        if split.next().is_some() {
            return Err(string.to_owned());
        }

        Ok(FreezeFlags(flags))
    }
}

impl From<bool> for FreezeFlags {
    /// `true` means restricted, i.e. all coordinates fixed.
    fn from(restricted: bool) -> Self {
        if restricted {
            FreezeFlags::FIXED
        } else {
            FreezeFlags::FREE
        }
    }
}

/// Atom as described by a single atom element of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Species of the atom (value of `Components`).
    pub species: String,
    /// Cartesian coordinates of the atom.
    pub coordinates: [f64; 3],
    /// Does the element carry the `RestrictedProperties` marker?
    pub restricted: bool,
    /// Value of the `Name` attribute, if present.
    pub name: Option<String>,
}

impl AtomRecord {
    /// Read an atom from an atom element.
    ///
    /// ## Returns
    /// - `Ok(None)` if the element has no `XYZ` attribute. Such elements are not part of the structure.
    /// - `ParseXsdError` if the coordinates can't be parsed or the element has no `Components` attribute.
    pub fn from_element(element: &XmlElement) -> Result<Option<AtomRecord>, ParseXsdError> {
        let xyz = match element.get(XYZ_ATTR) {
            Some(x) => x,
            None => return Ok(None),
        };

        let species = element
            .get(COMPONENTS_ATTR)
            .ok_or_else(|| ParseXsdError::MissingSpecies(xyz.to_owned()))?;

        let coordinates =
            parse_triple(xyz).ok_or_else(|| ParseXsdError::InvalidCoordinates(xyz.to_owned()))?;

        Ok(Some(AtomRecord {
            species: species.to_owned(),
            coordinates,
            restricted: element.contains(RESTRICTED_ATTR),
            name: element.get(NAME_ATTR).map(str::to_owned),
        }))
    }

    /// Freeze flags of the atom. Restricted atoms are fixed along all axes, other atoms are free.
    #[inline(always)]
    pub fn freeze_flags(&self) -> FreezeFlags {
        FreezeFlags::from(self.restricted)
    }

    /// Name of the atom as displayed. Atoms without `Name` attribute are called `<species>_custom`.
    /// An empty `Name` attribute is treated as missing.
    pub fn display_name(&self) -> String {
        display_name(&self.species, self.name.as_deref())
    }
}

/// Name under which an atom of `species` with the `Name` attribute `name` is displayed.
pub(crate) fn display_name(species: &str, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => format!("{}{}", species, CUSTOM_NAME_SUFFIX),
    }
}

/// Check whether the atom element describes an atom of the given species.
#[inline(always)]
pub(crate) fn element_is_species(element: &XmlElement, species: &str) -> bool {
    element.contains(XYZ_ATTR) && element.get(COMPONENTS_ATTR) == Some(species)
}
