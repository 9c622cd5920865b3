use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug)]
pub enum ArrangeError {
    #[error("Position {position} is out of range (arrangement has {len} pages)")]
    OutOfRange { position: usize, len: usize },
    #[error("Cannot delete the last remaining page")]
    LastPage,
    #[error("Cannot delete every page; at least one page must remain")]
    AllSelected,
    #[error("No pages selected")]
    EmptySelection,
    #[error("Nothing to export: the arrangement is empty")]
    EmptyCollection,
    #[error("A drag gesture is already in progress")]
    DragInProgress,
    #[error("Source page {original_index} appears more than once")]
    DuplicatePage { original_index: usize },
    #[error("No pages in document")]
    NoPages,
    #[error("Invalid edit operation: {0}")]
    InvalidOp(String),
    #[error("Edit operation #{index} failed: {source}")]
    Script {
        index: usize,
        #[source]
        source: Box<ArrangeError>,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ArrangeError>;

/// Quarter-turn rotation applied to a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Normalize an arbitrary angle to the nearest quarter turn.
    ///
    /// Negative angles are counter-clockwise, so `-90` becomes `Clockwise270`.
    pub fn from_degrees(degrees: i64) -> Self {
        let normalized = degrees.rem_euclid(360);
        match ((normalized + 45) / 90) % 4 {
            0 => Rotation::None,
            1 => Rotation::Clockwise90,
            2 => Rotation::Clockwise180,
            _ => Rotation::Clockwise270,
        }
    }

    /// Advance by +90, wrapping 270 back to 0
    pub fn clockwise(self) -> Self {
        match self {
            Rotation::None => Rotation::Clockwise90,
            Rotation::Clockwise90 => Rotation::Clockwise180,
            Rotation::Clockwise180 => Rotation::Clockwise270,
            Rotation::Clockwise270 => Rotation::None,
        }
    }

    pub fn counter_clockwise(self) -> Self {
        match self {
            Rotation::None => Rotation::Clockwise270,
            Rotation::Clockwise90 => Rotation::None,
            Rotation::Clockwise180 => Rotation::Clockwise90,
            Rotation::Clockwise270 => Rotation::Clockwise180,
        }
    }

    /// The rotation that undoes this one
    pub fn inverse(self) -> Self {
        match self {
            Rotation::None => Rotation::None,
            Rotation::Clockwise90 => Rotation::Clockwise270,
            Rotation::Clockwise180 => Rotation::Clockwise180,
            Rotation::Clockwise270 => Rotation::Clockwise90,
        }
    }

    /// Combine two rotations (sum modulo 360)
    pub fn compose(self, other: Rotation) -> Self {
        Rotation::from_degrees(i64::from(self.degrees() + other.degrees()))
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// One page of the working arrangement.
///
/// `original_index` is the zero-based position of the page in the source
/// document and never changes once the entry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageEntry {
    original_index: usize,
    rotation: Rotation,
}

impl PageEntry {
    pub fn new(original_index: usize) -> Self {
        Self {
            original_index,
            rotation: Rotation::None,
        }
    }

    pub fn with_rotation(original_index: usize, rotation: Rotation) -> Self {
        Self {
            original_index,
            rotation,
        }
    }

    pub fn original_index(&self) -> usize {
        self.original_index
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub(crate) fn rotate_clockwise(&mut self) -> Rotation {
        self.rotation = self.rotation.clockwise();
        self.rotation
    }

    pub(crate) fn rotate_counter_clockwise(&mut self) -> Rotation {
        self.rotation = self.rotation.counter_clockwise();
        self.rotation
    }
}
