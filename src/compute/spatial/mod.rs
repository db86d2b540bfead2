pub mod algorithms;
pub use algorithms::{
    boundary_distance, combined_bounds, footprint_intersects, polygon_boundary, union_polygons,
};

pub mod relations;
pub use relations::{
    PairwiseRelationEngine, count_intersections_cross_table, count_intersections_same_table,
    min_nearest_distance,
};

pub mod result;
pub use result::{MIN_SSD_COLUMN, RelationKind, RelationResult, RelationValue};

pub mod rtree;
pub use rtree::{FootprintIndex, IndexedFootprint};
