//! Textual edit operations
//!
//! Each mutating arrangement operation has a compact text form so the same
//! model can be driven from the command line:
//!
//! ```text
//! move:0:3  rotate:2  rotate-ccw:2  delete:1
//! select:1,3  deselect:3  select-all  deselect-all
//! delete-selected  rotate-selected
//! ```
//!
//! Positions are zero-based and refer to the arrangement as it is when the
//! operation runs.

use crate::collection::PageCollection;
use crate::types::*;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Move { from: usize, to: usize },
    Rotate(usize),
    RotateCounterClockwise(usize),
    Delete(usize),
    Select(Vec<usize>),
    Deselect(Vec<usize>),
    SelectAll,
    DeselectAll,
    DeleteSelected,
    RotateSelected,
}

impl EditOp {
    pub fn apply(&self, collection: &mut PageCollection) -> Result<()> {
        match self {
            EditOp::Move { from, to } => collection.move_page(*from, *to),
            EditOp::Rotate(pos) => collection.rotate(*pos).map(|_| ()),
            EditOp::RotateCounterClockwise(pos) => {
                collection.rotate_counter_clockwise(*pos).map(|_| ())
            }
            EditOp::Delete(pos) => collection.delete_at(*pos).map(|_| ()),
            EditOp::Select(positions) => {
                // Validate all first so a bad position selects nothing
                if let Some(&bad) = positions.iter().find(|&&p| p >= collection.len()) {
                    return Err(ArrangeError::OutOfRange {
                        position: bad,
                        len: collection.len(),
                    });
                }
                for &pos in positions {
                    collection.select(pos)?;
                }
                Ok(())
            }
            EditOp::Deselect(positions) => {
                if let Some(&bad) = positions.iter().find(|&&p| p >= collection.len()) {
                    return Err(ArrangeError::OutOfRange {
                        position: bad,
                        len: collection.len(),
                    });
                }
                for &pos in positions {
                    collection.deselect(pos)?;
                }
                Ok(())
            }
            EditOp::SelectAll => {
                collection.select_all();
                Ok(())
            }
            EditOp::DeselectAll => {
                collection.deselect_all();
                Ok(())
            }
            EditOp::DeleteSelected => collection.delete_selected().map(|_| ()),
            EditOp::RotateSelected => collection.rotate_selected().map(|_| ()),
        }
    }
}

/// Apply `ops` in order, stopping at the first failure.
///
/// Operations before the failing one stay applied; the failing one leaves the
/// arrangement untouched.
pub fn apply_script(collection: &mut PageCollection, ops: &[EditOp]) -> Result<()> {
    for (index, op) in ops.iter().enumerate() {
        op.apply(collection).map_err(|e| ArrangeError::Script {
            index,
            source: Box::new(e),
        })?;
        log::debug!("Applied {}", op);
    }
    Ok(())
}

fn parse_position(text: &str, op: &str) -> Result<usize> {
    text.trim()
        .parse()
        .map_err(|_| ArrangeError::InvalidOp(format!("'{}': '{}' is not a page position", op, text)))
}

fn parse_positions(text: &str, op: &str) -> Result<Vec<usize>> {
    let positions = text
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse_position(part, op))
        .collect::<Result<Vec<_>>>()?;
    if positions.is_empty() {
        return Err(ArrangeError::InvalidOp(format!("'{}': no positions given", op)));
    }
    Ok(positions)
}

impl FromStr for EditOp {
    type Err = ArrangeError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut parts = s.splitn(3, ':');
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let first = parts.next();
        let second = parts.next();

        let op = match (name.as_str(), first, second) {
            ("move", Some(from), Some(to)) => EditOp::Move {
                from: parse_position(from, s)?,
                to: parse_position(to, s)?,
            },
            ("rotate", Some(pos), None) => EditOp::Rotate(parse_position(pos, s)?),
            ("rotate-ccw", Some(pos), None) => {
                EditOp::RotateCounterClockwise(parse_position(pos, s)?)
            }
            ("delete", Some(pos), None) => EditOp::Delete(parse_position(pos, s)?),
            ("select", Some(list), None) => EditOp::Select(parse_positions(list, s)?),
            ("deselect", Some(list), None) => EditOp::Deselect(parse_positions(list, s)?),
            ("select-all", None, None) => EditOp::SelectAll,
            ("deselect-all", None, None) => EditOp::DeselectAll,
            ("delete-selected", None, None) => EditOp::DeleteSelected,
            ("rotate-selected", None, None) => EditOp::RotateSelected,
            _ => {
                return Err(ArrangeError::InvalidOp(format!(
                    "'{}' (expected move:FROM:TO, rotate:POS, rotate-ccw:POS, delete:POS, \
                     select:P1,P2, deselect:P1,P2, select-all, deselect-all, \
                     delete-selected or rotate-selected)",
                    s
                )));
            }
        };
        Ok(op)
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |positions: &[usize]| {
            positions
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(",")
        };
        match self {
            EditOp::Move { from, to } => write!(f, "move:{}:{}", from, to),
            EditOp::Rotate(pos) => write!(f, "rotate:{}", pos),
            EditOp::RotateCounterClockwise(pos) => write!(f, "rotate-ccw:{}", pos),
            EditOp::Delete(pos) => write!(f, "delete:{}", pos),
            EditOp::Select(positions) => write!(f, "select:{}", join(positions)),
            EditOp::Deselect(positions) => write!(f, "deselect:{}", join(positions)),
            EditOp::SelectAll => write!(f, "select-all"),
            EditOp::DeselectAll => write!(f, "deselect-all"),
            EditOp::DeleteSelected => write!(f, "delete-selected"),
            EditOp::RotateSelected => write!(f, "rotate-selected"),
        }
    }
}
