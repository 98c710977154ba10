// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the XtdFile structure combining an xtd structure with its arc trajectory.

use std::ops::{Deref, DerefMut};
use std::path::Path;

use nalgebra::Matrix3;
use ndarray::Array2;

use crate::errors::{ReadArcError, XtdError};
use crate::io::arc_io::{ArcFrameIterator, ArcReader};
use crate::structures::lattice::transform;
use crate::system::Structure;

/// Structure read from an xtd file, optionally associated with an arc trajectory.
///
/// `XtdFile` dereferences to the underlying `Structure`.
#[derive(Debug)]
pub struct XtdFile {
    structure: Structure,
    trajectory: Option<ArcReader>,
}

impl XtdFile {
    /// Read an xtd file. No trajectory is associated with the structure.
    pub fn from_file(filename: impl AsRef<Path>, working_dir: &Path) -> Result<XtdFile, XtdError> {
        Ok(XtdFile::new(Structure::from_file(filename, working_dir)?, None))
    }

    /// Combine an already loaded structure with a trajectory.
    pub fn new(structure: Structure, trajectory: Option<ArcReader>) -> XtdFile {
        XtdFile {
            structure,
            trajectory,
        }
    }

    /// Associate an arc trajectory with the structure, replacing any previous one.
    pub fn with_trajectory(mut self, filename: impl AsRef<Path>) -> Result<XtdFile, ReadArcError> {
        self.trajectory = Some(ArcReader::new(filename)?);
        Ok(self)
    }

    /// Get the associated trajectory.
    #[inline(always)]
    pub fn trajectory(&self) -> Option<&ArcReader> {
        self.trajectory.as_ref()
    }

    /// Consume the `XtdFile` returning the structure.
    #[inline(always)]
    pub fn into_structure(self) -> Structure {
        self.structure
    }

    /// Iterate over the frames of the associated trajectory in fractional coordinates.
    ///
    /// ## Returns
    /// - Iterator yielding one `[n_atoms, 3]` array of fractional coordinates per frame.
    /// - `XtdError::MissingTrajectory` if no trajectory is associated with the structure.
    /// - `XtdError::MissingLattice` if the structure has no lattice.
    /// - `XtdError::Lattice` if the lattice basis is singular.
    ///
    /// ## Notes
    /// - All frames are converted using the lattice of the structure as it is when this function is called.
    ///
    /// ## Example
    /// ```no_run
    /// # use matstudio_rs::prelude::*;
    /// # use std::path::Path;
    /// #
    /// let xtd = XtdFile::from_file("md.xtd", Path::new("/calc"))
    ///     .unwrap()
    ///     .with_trajectory("md.arc")
    ///     .unwrap();
    ///
    /// for frame in xtd.direct_frames().unwrap() {
    ///     let fractional = frame.unwrap();
    ///     println!("{}", fractional);
    /// }
    /// ```
    pub fn direct_frames(&self) -> Result<DirectFrameIterator, XtdError> {
        let trajectory = self.trajectory.as_ref().ok_or(XtdError::MissingTrajectory)?;
        let lattice = self.structure.lattice().ok_or(XtdError::MissingLattice)?;

        Ok(DirectFrameIterator {
            frames: trajectory.frames()?,
            inverse: lattice.inverse()?,
        })
    }
}

impl Deref for XtdFile {
    type Target = Structure;

    fn deref(&self) -> &Self::Target {
        &self.structure
    }
}

impl DerefMut for XtdFile {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.structure
    }
}

/// Iterator over the frames of an arc trajectory converted to fractional coordinates.
#[derive(Debug)]
pub struct DirectFrameIterator {
    frames: ArcFrameIterator,
    inverse: Matrix3<f64>,
}

impl Iterator for DirectFrameIterator {
    type Item = Result<Array2<f64>, XtdError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cartesian = match self.frames.next()? {
            Ok(x) => x,
            Err(e) => return Some(Err(e.into())),
        };

        Some(transform(cartesian.view(), &self.inverse).map_err(XtdError::from))
    }
}
