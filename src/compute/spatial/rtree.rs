//! R*-tree over footprint envelopes.
//!
//! The index only prunes candidates: every hit still has to pass the exact
//! geometric predicate. Envelopes are built once per table and shared by all
//! selectors and relation kinds evaluated against that table.

use geo::{BoundingRect, Polygon, Rect};
use rstar::{AABB, Envelope, RTree, RTreeObject};

/// Footprint envelope tagged with the row it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedFootprint {
    pub row: usize,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl RTreeObject for IndexedFootprint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

/// Envelope index over the footprints of one table.
///
/// Footprints without a finite bounding box (empty or carrying non-finite
/// coordinates) are left out of the tree; they can never be located as a
/// candidate and are reported through validation when they are the subject.
pub struct FootprintIndex {
    tree: RTree<IndexedFootprint>,
    unindexed: Vec<usize>,
}

impl FootprintIndex {
    /// Bulk-load the index from `(row, footprint)` pairs.
    pub fn build<'a>(footprints: impl IntoIterator<Item = (usize, &'a Polygon<f64>)>) -> Self {
        let mut entries = Vec::new();
        let mut unindexed = Vec::new();

        for (row, footprint) in footprints {
            match footprint.bounding_rect().filter(is_finite_rect) {
                Some(rect) => entries.push(IndexedFootprint {
                    row,
                    min_x: rect.min().x,
                    min_y: rect.min().y,
                    max_x: rect.max().x,
                    max_y: rect.max().y,
                }),
                None => unindexed.push(row),
            }
        }

        log::debug!(
            "Built footprint index with {} entries ({} unindexed)",
            entries.len(),
            unindexed.len()
        );

        Self {
            tree: RTree::bulk_load(entries),
            unindexed,
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Rows whose footprint could not be placed in the tree.
    pub fn unindexed(&self) -> &[usize] {
        &self.unindexed
    }

    /// Rows whose envelope intersects `rect`.
    pub fn candidates(&self, rect: &Rect<f64>) -> impl Iterator<Item = usize> + '_ {
        let envelope = rect_envelope(rect);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.row)
    }

    /// Rows whose envelope intersects `rect` grown by `distance` on every side.
    ///
    /// Any footprint left out lies farther than `distance` from everything
    /// inside `rect`.
    pub fn candidates_within(
        &self,
        rect: &Rect<f64>,
        distance: f64,
    ) -> impl Iterator<Item = usize> + '_ {
        let envelope = grow_envelope(rect, distance);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.row)
    }

    /// Whether `rect` grown by `distance` encloses every indexed envelope.
    pub fn covered_by(&self, rect: &Rect<f64>, distance: f64) -> bool {
        if self.tree.size() == 0 {
            return true;
        }
        let extent = self.tree.root().envelope();
        grow_envelope(rect, distance).contains_envelope(&extent)
    }
}

fn is_finite_rect(rect: &Rect<f64>) -> bool {
    [rect.min().x, rect.min().y, rect.max().x, rect.max().y]
        .iter()
        .all(|v| v.is_finite())
}

fn rect_envelope(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

fn grow_envelope(rect: &Rect<f64>, distance: f64) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [rect.min().x - distance, rect.min().y - distance],
        [rect.max().x + distance, rect.max().y + distance],
    )
}
