// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Constants and simple, auxiliary functions used through the `matstudio_rs` library.

/******************************/
/*      MARKUP VOCABULARY     */
/******************************/

/// Tag of the root-level atom element.
pub(crate) const ATOM_TAG: &str = "Atom3d";
/// Tag of the element carrying the lattice vectors.
pub(crate) const LATTICE_TAG: &str = "SpaceGroup";
/// Tag of the element carrying the packed metadata string.
pub(crate) const SYMMETRY_TAG: &str = "SymmetrySystem";

/// Cartesian coordinates of an atom.
pub(crate) const XYZ_ATTR: &str = "XYZ";
/// Species (element or component label) of an atom.
pub(crate) const COMPONENTS_ATTR: &str = "Components";
/// Marker of an atom whose coordinates are fixed.
pub(crate) const RESTRICTED_ATTR: &str = "RestrictedProperties";
/// Value used when the restriction marker is added.
pub(crate) const RESTRICTED_VALUE: &str = "FractionalXYZ";
/// Display name of an atom. On the `SymmetrySystem` element, holds the packed metadata.
pub(crate) const NAME_ATTR: &str = "Name";
/// Display color of an atom.
pub(crate) const COLOR_ATTR: &str = "Color";
/// Lattice vector attributes in the order a, b, c.
pub(crate) const VECTOR_ATTRS: [&str; 3] = ["AVector", "BVector", "CVector"];
/// Version of the program that produced the document.
pub(crate) const VERSION_ATTR: &str = "Version";
/// Author attribute of the root element.
pub(crate) const WRITTEN_BY_ATTR: &str = "WrittenBy";

/// Identification of this library written into the author attribute of every loaded document.
pub const WRITTEN_BY: &str = "matstudio_rs";

/// Suffix appended to the species of an atom which has no `Name` attribute.
pub(crate) const CUSTOM_NAME_SUFFIX: &str = "_custom";

/// Default path used when writing a structure without specifying a target.
pub const DEFAULT_OUTPUT: &str = "./new.xsd";

/// Default RGB color used for highlighting atoms.
pub const DEFAULT_HIGHLIGHT_COLOR: [u8; 3] = [255, 117, 51];

/// Log target of the structure loading and writing.
pub(crate) const XSD_LOG_TARGET: &str = "matstudio_rs::xsd";
/// Log target of the trajectory reading.
pub(crate) const ARC_LOG_TARGET: &str = "matstudio_rs::arc";

/******************************/
/*     TRAJECTORY MARKERS     */
/******************************/

/// Line starting a frame of an arc trajectory. The trailing space separates it from `PBC=ON`.
pub(crate) const ARC_BLOCK_START: &str = "PBC ";
/// Line ending a frame of an arc trajectory.
pub(crate) const ARC_BLOCK_END: &str = "end";

/******************************/
/*           OTHER            */
/******************************/

/// Parse a comma-separated triple of floats, e.g. `1.0,2.5,-3`. Returns `None` if the string is not a triple.
pub(crate) fn parse_triple(string: &str) -> Option<[f64; 3]> {
    let mut triple = [0.0; 3];
    let mut split = string.split(',');

    for item in triple.iter_mut() {
        *item = split.next()?.trim().parse::<f64>().ok()?;
    }

    if split.next().is_some() {
        return None;
    }

    Some(triple)
}

/// Format a triple of floats as a comma-separated string.
pub(crate) fn format_triple(triple: &[f64; 3]) -> String {
    format!("{},{},{}", triple[0], triple[1], triple[2])
}
