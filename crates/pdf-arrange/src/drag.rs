//! Drag-and-drop reordering
//!
//! A gesture is modelled as a short-lived `DragReorderSession`. The view never
//! reorders itself while the pointer moves; it only shows the candidate slot.
//! On release the candidate is frozen (`Committing`); the commit turns the
//! start and final candidate positions into a single
//! `PageCollection::move_page` call, and the view is redrawn from the model
//! afterwards.

use crate::collection::PageCollection;
use crate::types::*;

/// A point in view coordinates (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// On-screen bounds of a rendered page, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Distance from `point` to the nearest edge, zero when inside
    pub fn distance_to(&self, point: Point) -> f32 {
        let dx = (self.x - point.x).max(0.0).max(point.x - self.right());
        let dy = (self.y - point.y).max(0.0).max(point.y - self.bottom());
        (dx * dx + dy * dy).sqrt()
    }
}

/// Lifecycle of a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Drag started; the candidate follows the pointer
    Armed,
    /// Drop received; the move is being applied
    Committing,
}

/// Result of ending a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Moved { from: usize, to: usize },
    Unchanged,
}

/// State for one drag gesture, from drag start to drop or cancel
#[derive(Debug, Clone, PartialEq)]
pub struct DragReorderSession {
    start: usize,
    candidate: usize,
    phase: DragPhase,
    dirty: bool,
}

impl DragReorderSession {
    /// Arm a session for the entry currently at `start`
    pub fn begin(collection: &PageCollection, start: usize) -> Result<Self> {
        if start >= collection.len() {
            return Err(ArrangeError::OutOfRange {
                position: start,
                len: collection.len(),
            });
        }

        Ok(Self {
            start,
            candidate: start,
            phase: DragPhase::Armed,
            dirty: false,
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn candidate(&self) -> usize {
        self.candidate
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Whether this session has committed a move
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recompute the candidate target from the pointer position.
    ///
    /// `bounds` are the rendered entries' rectangles in position order. When
    /// no target can be computed the previous candidate is kept. The candidate
    /// is frozen once the session leaves `Armed`.
    pub fn hover(&mut self, pointer: Point, bounds: &[Rect]) -> usize {
        if self.phase == DragPhase::Armed {
            if let Some(target) = insertion_target(self.start, pointer, bounds) {
                self.candidate = target;
            }
        }
        self.candidate
    }

    /// Pointer released: stop tracking and hold the candidate for `commit`
    pub fn release(&mut self) -> DragPhase {
        if self.phase == DragPhase::Armed {
            self.phase = DragPhase::Committing;
        }
        self.phase
    }

    /// Apply the held candidate as at most one move and return to `Idle`.
    ///
    /// Does nothing unless the session has been released. The session is
    /// `Idle` afterwards even when the move fails.
    pub fn commit(&mut self, collection: &mut PageCollection) -> Result<DragOutcome> {
        if self.phase != DragPhase::Committing {
            return Ok(DragOutcome::Unchanged);
        }
        self.phase = DragPhase::Idle;

        let outcome = if self.candidate != self.start && self.candidate < collection.len() {
            collection.move_page(self.start, self.candidate)?;
            self.dirty = true;
            DragOutcome::Moved {
                from: self.start,
                to: self.candidate,
            }
        } else {
            DragOutcome::Unchanged
        };

        log::debug!(
            "Drag from {} finished ({:?}, dirty: {})",
            self.start,
            outcome,
            self.dirty
        );
        Ok(outcome)
    }

    /// Finish the gesture with a drop: `release` then `commit`
    pub fn drop_on(&mut self, collection: &mut PageCollection) -> Result<DragOutcome> {
        self.release();
        self.commit(collection)
    }

    /// Finish the gesture without a drop
    pub fn cancel(&mut self) -> DragOutcome {
        if self.phase != DragPhase::Idle {
            log::debug!("Drag from {} cancelled", self.start);
        }
        self.phase = DragPhase::Idle;
        DragOutcome::Unchanged
    }
}

/// Target position for dragging the entry at `start` to `pointer`.
///
/// The nearest rendered entry is found; if the pointer is past its horizontal
/// midpoint the insertion slot is after it, otherwise before it. The slot is
/// then converted to a remove-then-insert position.
pub fn insertion_target(start: usize, pointer: Point, bounds: &[Rect]) -> Option<usize> {
    if start >= bounds.len() {
        return None;
    }

    let (nearest, rect) = bounds.iter().enumerate().min_by(|(_, a), (_, b)| {
        a.distance_to(pointer).total_cmp(&b.distance_to(pointer))
    })?;

    let slot = if pointer.x > rect.center_x() {
        nearest + 1
    } else {
        nearest
    };
    let target = if slot > start { slot - 1 } else { slot };

    Some(target.min(bounds.len() - 1))
}

/// Owner of the single active drag gesture
#[derive(Debug, Default)]
pub struct DragController {
    active: Option<DragReorderSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.active
            .as_ref()
            .map(DragReorderSession::phase)
            .unwrap_or_default()
    }

    pub fn active(&self) -> Option<&DragReorderSession> {
        self.active.as_ref()
    }

    pub fn begin(&mut self, collection: &PageCollection, start: usize) -> Result<()> {
        if self.active.is_some() {
            return Err(ArrangeError::DragInProgress);
        }
        self.active = Some(DragReorderSession::begin(collection, start)?);
        Ok(())
    }

    pub fn hover(&mut self, pointer: Point, bounds: &[Rect]) -> Option<usize> {
        self.active
            .as_mut()
            .map(|session| session.hover(pointer, bounds))
    }

    /// End the active gesture. The session is discarded whether or not the
    /// drop succeeds.
    pub fn finish(&mut self, collection: &mut PageCollection, dropped: bool) -> Result<DragOutcome> {
        match self.active.take() {
            Some(mut session) if dropped => session.drop_on(collection),
            Some(mut session) => Ok(session.cancel()),
            None => Ok(DragOutcome::Unchanged),
        }
    }
}
