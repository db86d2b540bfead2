//! Geometry helpers built on the geo crate.

use geo::{
    BoundingRect, Distance, Euclidean, Intersects, LineString, MultiLineString, MultiPolygon,
    Polygon, Rect, unary_union,
};
use hizone_types::entity::GeometryRef;

/// Boundary of a polygon: its exterior ring followed by its interior rings.
pub fn polygon_boundary(polygon: &Polygon<f64>) -> MultiLineString<f64> {
    let rings: Vec<LineString<f64>> = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .cloned()
        .collect();
    MultiLineString::new(rings)
}

/// Distance from the boundary of `subject` to the area of `other`.
///
/// Zero when any ring of `subject` touches or enters `other`, so a footprint
/// lying inside a neighbour is at distance 0 from it. For disjoint
/// footprints this equals the edge-to-edge gap.
///
/// # Examples
///
/// ```
/// use hizone::compute::spatial::boundary_distance;
/// use geo::polygon;
///
/// let a = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
/// let b = polygon![(x: 0.0, y: 5.0), (x: 1.0, y: 5.0), (x: 1.0, y: 6.0), (x: 0.0, y: 6.0)];
/// assert_eq!(boundary_distance(&a, &b), 4.0);
/// ```
pub fn boundary_distance(subject: &Polygon<f64>, other: &Polygon<f64>) -> f64 {
    std::iter::once(subject.exterior())
        .chain(subject.interiors())
        .map(|ring| Euclidean.distance(ring, other))
        .fold(f64::INFINITY, f64::min)
}

/// Exact intersection test between a footprint and a selected geometry.
pub fn footprint_intersects(footprint: &Polygon<f64>, geometry: GeometryRef<'_>) -> bool {
    match geometry {
        GeometryRef::Polygon(polygon) => footprint.intersects(polygon),
        GeometryRef::MultiPolygon(multi) => footprint.intersects(multi),
    }
}

/// Union of all polygons into one coverage geometry.
pub fn union_polygons<'a>(polygons: impl IntoIterator<Item = &'a Polygon<f64>>) -> MultiPolygon<f64> {
    unary_union(polygons)
}

/// Bounding box enclosing every polygon, `None` when there is nothing to enclose.
pub fn combined_bounds<'a>(polygons: impl IntoIterator<Item = &'a Polygon<f64>>) -> Option<Rect<f64>> {
    polygons
        .into_iter()
        .filter_map(|polygon| polygon.bounding_rect())
        .reduce(|acc, rect| {
            Rect::new(
                geo::coord! {
                    x: acc.min().x.min(rect.min().x),
                    y: acc.min().y.min(rect.min().y),
                },
                geo::coord! {
                    x: acc.max().x.max(rect.max().x),
                    y: acc.max().y.max(rect.max().y),
                },
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, polygon};

    fn square(x: f64, y: f64, side: f64) -> Polygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + side, y: y),
            (x: x + side, y: y + side),
            (x: x, y: y + side),
        ]
    }

    #[test]
    fn test_boundary_has_all_rings() {
        let with_hole = Polygon::new(
            square(0.0, 0.0, 10.0).exterior().clone(),
            vec![square(4.0, 4.0, 2.0).exterior().clone()],
        );
        assert_eq!(polygon_boundary(&with_hole).0.len(), 2);
    }

    #[test]
    fn test_boundary_distance_gap() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(4.0, 0.0, 1.0);
        assert!((boundary_distance(&a, &b) - 3.0).abs() < 1e-12);
        assert!((boundary_distance(&b, &a) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_boundary_distance_inside_neighbour() {
        let small = square(2.0, 2.0, 1.0);
        let large = square(0.0, 0.0, 10.0);
        // Small boundary lies in the interior of large
        assert_eq!(boundary_distance(&small, &large), 0.0);
        // Large boundary is 2 away from the small footprint's area
        assert!((boundary_distance(&large, &small) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_footprint_intersects_multipolygon() {
        let footprint = square(0.0, 0.0, 1.0);
        let far = MultiPolygon::new(vec![square(5.0, 5.0, 1.0)]);
        let near = MultiPolygon::new(vec![square(5.0, 5.0, 1.0), square(0.5, 0.5, 1.0)]);
        assert!(!footprint_intersects(&footprint, GeometryRef::MultiPolygon(&far)));
        assert!(footprint_intersects(&footprint, GeometryRef::MultiPolygon(&near)));
    }

    #[test]
    fn test_union_merges_overlaps() {
        let polygons = [square(0.0, 0.0, 2.0), square(1.0, 0.0, 2.0), square(10.0, 0.0, 1.0)];
        let union = union_polygons(polygons.iter());
        assert_eq!(union.0.len(), 2);
        assert!((union.unsigned_area() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_combined_bounds() {
        let polygons = [square(0.0, 0.0, 1.0), square(-3.0, 4.0, 2.0)];
        let bounds = combined_bounds(polygons.iter()).unwrap();
        assert_eq!(bounds.min(), geo::coord! { x: -3.0, y: 0.0 });
        assert_eq!(bounds.max(), geo::coord! { x: 1.0, y: 6.0 });
        assert!(combined_bounds(std::iter::empty()).is_none());
    }
}
