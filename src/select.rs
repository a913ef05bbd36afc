//! Drag-to-select over live element geometry.
//!
//! A [`BoxSelector`] follows pointer presses, moves and releases and keeps the
//! set of candidates whose bounding boxes intersect the rectangle spanned by
//! the drag. Geometry is never cached: the host is asked for fresh candidate
//! boxes on every recomputation, so scrolling or re-layouting under a fixed
//! overlay is picked up on the next pass.

use derive_more::Constructor;

use crate::geometry::{Point, Rect};

/// A selectable element together with its current bounding box.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct Candidate<Id> {
    pub id: Id,
    pub rect: Rect,
}

/// Geometry provided by the host.
pub trait CandidateSource<Id> {
    /// Region in which a drag may start. `None` disables drag initiation.
    fn source_region(&self) -> Option<Rect>;

    /// The selectable elements with their bounding boxes as of right now.
    fn candidates(&self) -> Vec<Candidate<Id>>;

    /// Drop any incidental text selection the press may have started.
    fn clear_text_selection(&mut self) {}
}

/// Notifications sent back to the host.
pub trait SelectionListener<Id> {
    /// Called after every recomputation while dragging, also with an empty set.
    fn selection_changed(&mut self, selected: &[Id]);

    /// Called once a drag ended with at least one element selected.
    fn selection_ended(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging {
        anchor: Point,
        current: Point,
        rect: Rect,
    },
}

impl Default for DragState {
    fn default() -> Self {
        DragState::Idle
    }
}

#[derive(Debug, Clone)]
pub struct BoxSelector<Id> {
    state: DragState,
    selected: Vec<Id>,
}

impl<Id> Default for BoxSelector<Id> {
    fn default() -> Self {
        BoxSelector {
            state: DragState::Idle,
            selected: Vec::new(),
        }
    }
}

impl<Id: Clone> BoxSelector<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The rectangle to draw on top of everything else, only while dragging.
    pub fn overlay(&self) -> Option<Rect> {
        match self.state {
            DragState::Dragging { rect, .. } => Some(rect),
            DragState::Idle => None,
        }
    }

    /// The last computed selection.
    pub fn selected(&self) -> &[Id] {
        &self.selected
    }

    pub fn press<H>(&mut self, at: Point, host: &mut H)
    where
        H: CandidateSource<Id> + SelectionListener<Id>,
    {
        if self.is_active() {
            return;
        }

        match host.source_region() {
            Some(region) if region.contains(at) => {}
            Some(_) => return,
            None => {
                log::debug!("No source region available, ignoring press at {:?}", at);
                return;
            }
        }

        log::debug!("Start dragging at {:?}", at);
        host.clear_text_selection();

        let rect = Rect::unit_at(at);
        self.state = DragState::Dragging {
            anchor: at,
            current: at,
            rect,
        };
        self.recompute(rect, host);
    }

    pub fn move_to<H>(&mut self, to: Point, host: &mut H)
    where
        H: CandidateSource<Id> + SelectionListener<Id>,
    {
        if let DragState::Dragging { anchor, .. } = self.state {
            let rect = Rect::from_corners(anchor, to);
            self.state = DragState::Dragging {
                anchor,
                current: to,
                rect,
            };
            self.recompute(rect, host);
        }
    }

    /// Candidates moved under an unchanged rectangle.
    pub fn scroll<H>(&mut self, host: &mut H)
    where
        H: CandidateSource<Id> + SelectionListener<Id>,
    {
        if let DragState::Dragging { rect, .. } = self.state {
            self.recompute(rect, host);
        }
    }

    pub fn release<H>(&mut self, host: &mut H)
    where
        H: CandidateSource<Id> + SelectionListener<Id>,
    {
        if let DragState::Dragging { rect, .. } = self.state {
            self.recompute(rect, host);
            self.state = DragState::Idle;

            log::debug!("Drag ended with {} selected", self.selected.len());
            if !self.selected.is_empty() {
                host.selection_ended();
            }
        }
    }

    /// Abort the drag without an end notification.
    pub fn cancel<H>(&mut self, host: &mut H)
    where
        H: SelectionListener<Id>,
    {
        if self.is_active() {
            log::debug!("Drag cancelled");
            self.state = DragState::Idle;
            self.selected.clear();
            host.selection_changed(&self.selected);
        }
    }

    fn recompute<H>(&mut self, rect: Rect, host: &mut H)
    where
        H: CandidateSource<Id> + SelectionListener<Id>,
    {
        self.selected = host
            .candidates()
            .into_iter()
            .filter(|candidate| rect.intersects(&candidate.rect))
            .map(|candidate| candidate.id)
            .collect();

        host.selection_changed(&self.selected);
    }
}
