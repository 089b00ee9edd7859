//! Freehand strokes, one ordered set per slide.
//!
//! A set is created the first time a slide is drawn on.  Only its last
//! stroke can be open; [`AnnotationStore::close_stroke`] freezes it, and a
//! later draw starts a new stroke on top.

use std::collections::BTreeMap;

use tracing::debug;

use crate::pointer::Point;

// ════════════════════════════════════════════════════════════════════════════
// Stroke
// ════════════════════════════════════════════════════════════════════════════

/// One continuous freehand path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs, in drawing order.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

impl From<Vec<Point>> for Stroke {
    fn from(points: Vec<Point>) -> Self {
        Stroke { points }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AnnotationSet
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
struct AnnotationSet {
    strokes: Vec<Stroke>,
    /// True while the last stroke still accepts points.
    open: bool,
}

impl AnnotationSet {
    fn append(&mut self, point: Point) {
        if !self.open {
            self.strokes.push(Stroke::default());
            self.open = true;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.points.push(point);
        }
    }

    fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    fn undo(&mut self) -> Option<Stroke> {
        let removed = self.strokes.pop()?;
        // Whatever was open is gone; the previous stroke stays frozen.
        self.open = false;
        Some(removed)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AnnotationStore
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    sets: BTreeMap<usize, AnnotationSet>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `point` to the open stroke on `slide`, opening one first if
    /// none is open.
    pub fn begin_or_continue_stroke(&mut self, slide: usize, point: Point) {
        let set = self.sets.entry(slide).or_default();
        if !set.open {
            debug!(slide, stroke = set.strokes.len(), "stroke opened");
        }
        set.append(point);
    }

    /// Freeze the open stroke on `slide`, if any.  Idempotent.
    pub fn close_stroke(&mut self, slide: usize) {
        if let Some(set) = self.sets.get_mut(&slide) {
            if set.close() {
                debug!(slide, points = set.strokes.last().map_or(0, Stroke::len), "stroke closed");
            }
        }
    }

    /// Remove the most recent stroke on `slide`, open or closed.
    pub fn undo(&mut self, slide: usize) -> Option<Stroke> {
        let removed = self.sets.get_mut(&slide)?.undo();
        if removed.is_some() {
            debug!(slide, remaining = self.stroke_count(slide), "stroke removed");
        }
        removed
    }

    /// Drop every stroke on `slide`.
    pub fn clear(&mut self, slide: usize) {
        self.sets.remove(&slide);
    }

    /// Strokes on `slide` in draw order (later strokes on top).
    pub fn render(&self, slide: usize) -> &[Stroke] {
        match self.sets.get(&slide) {
            Some(set) => &set.strokes,
            None => &[],
        }
    }

    pub fn stroke_count(&self, slide: usize) -> usize {
        self.render(slide).len()
    }

    pub fn is_open(&self, slide: usize) -> bool {
        self.sets.get(&slide).is_some_and(|set| set.open)
    }

    /// Position of the most recent stroke on `slide`.
    pub fn cursor(&self, slide: usize) -> Option<usize> {
        self.stroke_count(slide).checked_sub(1)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn appended_points_keep_insertion_order() {
        let mut store = AnnotationStore::new();
        let points: Vec<Point> = (0..25).map(|i| p(i * 3, 100 - i)).collect();
        for pt in &points {
            store.begin_or_continue_stroke(0, *pt);
        }
        store.close_stroke(0);
        let strokes = store.render(0);
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].points(), points.as_slice());
    }

    #[test]
    fn close_then_draw_opens_new_stroke() {
        let mut store = AnnotationStore::new();
        store.begin_or_continue_stroke(2, p(1, 1));
        store.close_stroke(2);
        store.begin_or_continue_stroke(2, p(5, 5));
        store.begin_or_continue_stroke(2, p(6, 6));
        let strokes = store.render(2);
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0].points(), &[p(1, 1)]);
        assert_eq!(strokes[1].points(), &[p(5, 5), p(6, 6)]);
        assert!(store.is_open(2));
    }

    #[test]
    fn close_is_idempotent() {
        let mut store = AnnotationStore::new();
        store.close_stroke(0);
        store.begin_or_continue_stroke(0, p(1, 2));
        store.close_stroke(0);
        store.close_stroke(0);
        assert_eq!(store.stroke_count(0), 1);
        assert!(!store.is_open(0));
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let mut store = AnnotationStore::new();
        assert_eq!(store.undo(0), None);
        assert_eq!(store.stroke_count(0), 0);
        assert_eq!(store.cursor(0), None);
    }

    #[test]
    fn undo_removes_exactly_one_and_moves_cursor() {
        let mut store = AnnotationStore::new();
        for i in 0..3 {
            store.begin_or_continue_stroke(1, p(i, i));
            store.close_stroke(1);
        }
        assert_eq!(store.cursor(1), Some(2));
        let removed = store.undo(1).unwrap();
        assert_eq!(removed.points(), &[p(2, 2)]);
        assert_eq!(store.stroke_count(1), 2);
        assert_eq!(store.cursor(1), Some(1));
    }

    #[test]
    fn undo_removes_open_stroke_and_next_draw_starts_fresh() {
        let mut store = AnnotationStore::new();
        store.begin_or_continue_stroke(0, p(0, 0));
        store.close_stroke(0);
        store.begin_or_continue_stroke(0, p(9, 9));
        assert!(store.is_open(0));

        store.undo(0);
        assert!(!store.is_open(0));
        store.begin_or_continue_stroke(0, p(4, 4));
        let strokes = store.render(0);
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0].points(), &[p(0, 0)]);
        assert_eq!(strokes[1].points(), &[p(4, 4)]);
    }

    #[test]
    fn clear_only_touches_one_slide() {
        let mut store = AnnotationStore::new();
        store.begin_or_continue_stroke(0, p(1, 1));
        store.begin_or_continue_stroke(1, p(2, 2));
        store.clear(0);
        assert!(store.render(0).is_empty());
        assert_eq!(store.stroke_count(1), 1);
    }

    #[test]
    fn segments_pair_neighbours() {
        let stroke = Stroke::from(vec![p(0, 0), p(1, 1), p(2, 0)]);
        let segs: Vec<_> = stroke.segments().collect();
        assert_eq!(segs, vec![(p(0, 0), p(1, 1)), (p(1, 1), p(2, 0))]);
    }
}
