// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of functions for reading Materials Studio arc trajectories.
//!
//! An arc file consists of blocks, one block per trajectory frame.
//! Each block starts with a `PBC a b c alpha beta gamma (P1)` line,
//! continues with one line per atom (`label x y z ...`), and ends with an `end` line.

use std::cell::OnceCell;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use ndarray::Array2;

use crate::auxiliary::{ARC_BLOCK_END, ARC_BLOCK_START, ARC_LOG_TARGET};
use crate::errors::ReadArcError;
use crate::structures::lattice::Lattice;
use crate::structures::tokenize::{parse_floats, tokenize};

/// Properties of a trajectory that are constant across all of its frames.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrajectoryMetadata {
    /// Lengths of the lattice vectors.
    pub lengths: [f64; 3],
    /// Angles between the lattice vectors in degrees.
    pub angles: [f64; 3],
    /// Labels of the atoms in the order in which they appear in a frame.
    pub elements: Vec<String>,
}

/// Reader of an arc trajectory.
///
/// Frames are read lazily, one block at a time. Lattice lengths, angles, and atom labels
/// are read from the first block of the file when first requested and then cached.
/// Every read opens the file anew, so the properties can be requested in any order,
/// before, during, or after iterating over the frames.
#[derive(Debug)]
pub struct ArcReader {
    filename: Box<Path>,
    lengths: OnceCell<Option<[f64; 3]>>,
    angles: OnceCell<Option<[f64; 3]>>,
    elements: OnceCell<Option<Vec<String>>>,
}

impl ArcReader {
    /// Create a new reader of an arc file.
    ///
    /// ## Returns
    /// `ReadArcError::FileNotFound` if the file can't be opened.
    pub fn new(filename: impl AsRef<Path>) -> Result<ArcReader, ReadArcError> {
        open(filename.as_ref())?;

        Ok(ArcReader {
            filename: Box::from(filename.as_ref()),
            lengths: OnceCell::new(),
            angles: OnceCell::new(),
            elements: OnceCell::new(),
        })
    }

    /// Get the path to the arc file.
    #[inline(always)]
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Iterate over the frames of the trajectory.
    ///
    /// ## Returns
    /// Iterator yielding one `[n_atoms, 3]` array of Cartesian coordinates per frame.
    /// Iteration stops after the first error.
    ///
    /// ## Notes
    /// - A block that is not closed by an `end` line before the end of the file is not yielded.
    /// - Empty lines inside a block are skipped.
    ///
    /// ## Example
    /// ```no_run
    /// # use matstudio_rs::prelude::*;
    /// #
    /// let reader = ArcReader::new("trajectory.arc").unwrap();
    /// for frame in reader.frames().unwrap() {
    ///     let coordinates = frame.unwrap();
    ///     println!("{}", coordinates);
    /// }
    /// ```
    pub fn frames(&self) -> Result<ArcFrameIterator, ReadArcError> {
        Ok(ArcFrameIterator {
            filename: self.filename.clone(),
            lines: open(&self.filename)?,
            line_number: 0,
            finished: false,
        })
    }

    /// Get the lengths of the lattice vectors from the first frame.
    /// Returns `Ok(None)` if the trajectory contains no frame.
    pub fn lengths(&self) -> Result<Option<[f64; 3]>, ReadArcError> {
        if let Some(lengths) = self.lengths.get() {
            return Ok(*lengths);
        }

        let lengths = self.read_header(1)?;
        Ok(*self.lengths.get_or_init(|| lengths))
    }

    /// Get the angles between the lattice vectors (in degrees) from the first frame.
    /// Returns `Ok(None)` if the trajectory contains no frame.
    pub fn angles(&self) -> Result<Option<[f64; 3]>, ReadArcError> {
        if let Some(angles) = self.angles.get() {
            return Ok(*angles);
        }

        let angles = self.read_header(4)?;
        Ok(*self.angles.get_or_init(|| angles))
    }

    /// Get the labels of the atoms from the first frame.
    /// Returns `Ok(None)` if the trajectory contains no complete frame.
    pub fn elements(&self) -> Result<Option<&[String]>, ReadArcError> {
        if let Some(elements) = self.elements.get() {
            return Ok(elements.as_deref());
        }

        let elements = self.read_elements()?;
        Ok(self.elements.get_or_init(|| elements).as_deref())
    }

    /// Get all properties that are constant across the frames.
    /// Returns `Ok(None)` if the trajectory contains no complete frame.
    pub fn metadata(&self) -> Result<Option<TrajectoryMetadata>, ReadArcError> {
        let (lengths, angles, elements) = match (self.lengths()?, self.angles()?, self.elements()?) {
            (Some(l), Some(a), Some(e)) => (l, a, e),
            _ => return Ok(None),
        };

        Ok(Some(TrajectoryMetadata {
            lengths,
            angles,
            elements: elements.to_vec(),
        }))
    }

    /// Construct the lattice of the first frame from its lengths and angles.
    /// Returns `Ok(None)` if the trajectory contains no frame.
    pub fn lattice(&self) -> Result<Option<Lattice>, ReadArcError> {
        match (self.lengths()?, self.angles()?) {
            (Some(lengths), Some(angles)) => Ok(Some(Lattice::from_lengths_angles(lengths, angles))),
            _ => Ok(None),
        }
    }

    /// Read three numbers starting at token `from` of the first block start line.
    fn read_header(&self, from: usize) -> Result<Option<[f64; 3]>, ReadArcError> {
        for (index, line) in open(&self.filename)?.enumerate() {
            let line = line.map_err(|_| ReadArcError::LineNotFound(self.filename.clone(), index + 1))?;
            let line = line.trim();

            if !line.starts_with(ARC_BLOCK_START) {
                continue;
            }

            let values = parse_floats::<3>(&tokenize(line), from)
                .ok_or_else(|| ReadArcError::ParseHeaderLine(index + 1, line.to_owned()))?;

            log::debug!(
                target: ARC_LOG_TARGET,
                "Read frame header from line {} of '{}'.",
                index + 1,
                self.filename.display()
            );

            return Ok(Some(values));
        }

        Ok(None)
    }

    /// Read labels of atoms of the first complete block.
    fn read_elements(&self) -> Result<Option<Vec<String>>, ReadArcError> {
        let mut collecting = false;
        let mut elements = Vec::new();

        for (index, line) in open(&self.filename)?.enumerate() {
            let line = line.map_err(|_| ReadArcError::LineNotFound(self.filename.clone(), index + 1))?;
            let line = line.trim();

            if !collecting {
                collecting = line.starts_with(ARC_BLOCK_START);
            } else if line.starts_with(ARC_BLOCK_END) {
                return Ok(Some(elements));
            } else if let Some(label) = tokenize(line).first() {
                elements.push((*label).to_owned());
            }
        }

        Ok(None)
    }
}

/// Iterator over the frames of an arc trajectory.
/// Owns its file handle which is closed once the iterator is dropped.
#[derive(Debug)]
pub struct ArcFrameIterator {
    filename: Box<Path>,
    lines: Lines<BufReader<File>>,
    line_number: usize,
    finished: bool,
}

impl ArcFrameIterator {
    /// Read the next line of the file. Returns `None` at the end of the file.
    fn next_line(&mut self) -> Option<Result<String, ReadArcError>> {
        let line = self.lines.next()?;
        self.line_number += 1;

        Some(line.map_err(|_| ReadArcError::LineNotFound(self.filename.clone(), self.line_number)))
    }

    fn fail(&mut self, error: ReadArcError) -> Option<Result<Array2<f64>, ReadArcError>> {
        self.finished = true;
        Some(Err(error))
    }
}

impl Iterator for ArcFrameIterator {
    type Item = Result<Array2<f64>, ReadArcError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut collecting = false;
        let mut coordinates: Vec<[f64; 3]> = Vec::new();

        loop {
            let line = match self.next_line() {
                None => {
                    self.finished = true;
                    return None;
                }
                Some(Err(e)) => return self.fail(e),
                Some(Ok(x)) => x,
            };

            let line = line.trim();

            if !collecting {
                collecting = line.starts_with(ARC_BLOCK_START);
                continue;
            }

            if line.starts_with(ARC_BLOCK_END) {
                return Some(Ok(Array2::from(coordinates)));
            }

            if line.is_empty() {
                continue;
            }

            match parse_floats::<3>(&tokenize(line), 1) {
                Some(xyz) => coordinates.push(xyz),
                None => {
                    let error = ReadArcError::ParseAtomLine(self.line_number, line.to_owned());
                    return self.fail(error);
                }
            }
        }
    }
}

fn open(filename: &Path) -> Result<Lines<BufReader<File>>, ReadArcError> {
    let file = File::open(filename).map_err(|_| ReadArcError::FileNotFound(Box::from(filename)))?;
    Ok(BufReader::new(file).lines())
}
