//! Multi-touch stroke tracking.
//!
//! Every active contact remembers its last known position. A move draws one
//! segment from that position to the new one, so each finger leaves its own
//! continuous stroke no matter how the input events interleave.

use std::collections::HashMap;

use crate::surface::{DrawingSurface, LineCap, LineJoin, Segment, StyleSource};
use crate::Point;

/// A raw touch as delivered by the input source, in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchRecord {
    pub identifier: i32,
    pub x: f64,
    pub y: f64,
}

impl TouchRecord {
    pub fn new(identifier: i32, x: f64, y: f64) -> Self {
        Self { identifier, x, y }
    }
}

/// Top-left corner of the drawing surface in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceOrigin {
    pub left: f64,
    pub top: f64,
}

impl SurfaceOrigin {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    pub fn to_local(&self, record: &TouchRecord) -> TouchRecord {
        TouchRecord {
            identifier: record.identifier,
            x: record.x - self.left,
            y: record.y - self.top,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchContact {
    pub identifier: i32,
    pub position: Point,
}

impl From<&TouchRecord> for TouchContact {
    fn from(record: &TouchRecord) -> Self {
        Self {
            identifier: record.identifier,
            position: Point::new(record.x, record.y),
        }
    }
}

pub struct StrokeTracker<S, St> {
    surface: S,
    style: St,
    contacts: HashMap<i32, Point>,
}

impl<S: DrawingSurface, St: StyleSource> StrokeTracker<S, St> {
    pub fn new(surface: S, style: St) -> Self {
        Self {
            surface,
            style,
            contacts: HashMap::new(),
        }
    }

    /// Starts tracking every record in the batch. Nothing is drawn.
    ///
    /// An identifier that is already tracked is replaced by the new contact;
    /// the stale position is dropped and a warning is logged.
    pub fn on_contacts_begin(&mut self, batch: &[TouchRecord]) {
        for record in batch {
            let contact = TouchContact::from(record);
            if let Some(stale) = self.contacts.insert(contact.identifier, contact.position) {
                tracing::warn!(
                    identifier = contact.identifier,
                    stale_x = stale.x,
                    stale_y = stale.y,
                    "touch began for an identifier that was already active, replacing it"
                );
            }
        }
    }

    /// Draws one segment per tracked record and moves the contact forward.
    pub fn on_contacts_move(&mut self, batch: &[TouchRecord]) {
        for record in batch {
            let Some(position) = self.contacts.get_mut(&record.identifier) else {
                continue;
            };
            let to = Point::new(record.x, record.y);
            let segment = Segment {
                from: *position,
                to,
                line_width: self.style.stroke_style().line_width,
                line_join: LineJoin::Round,
                line_cap: LineCap::Butt,
            };
            self.surface.draw_segment(&segment);
            *position = to;
        }
    }

    pub fn on_contacts_end(&mut self, batch: &[TouchRecord]) {
        self.forget(batch);
    }

    /// Same effect as an end; the system took the touch away.
    pub fn on_contacts_cancel(&mut self, batch: &[TouchRecord]) {
        self.forget(batch);
    }

    fn forget(&mut self, batch: &[TouchRecord]) {
        for record in batch {
            self.contacts.remove(&record.identifier);
        }
    }

    /// Forgets every contact without drawing, for when the page goes away
    /// while fingers are still down.
    pub fn clear_contacts(&mut self) {
        self.contacts.clear();
    }
}

impl<S, St> StrokeTracker<S, St> {
    pub fn contains(&self, identifier: i32) -> bool {
        self.contacts.contains_key(&identifier)
    }

    pub fn position(&self, identifier: i32) -> Option<Point> {
        self.contacts.get(&identifier).copied()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = i32> + '_ {
        self.contacts.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

#[cfg(test)]
#[path = "touch_test.rs"]
mod tests;
