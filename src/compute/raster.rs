//! Raster helpers: burning footprints onto a regular grid and filling gaps
//! in float grids with a moving-window aggregate.
//!
//! Grids are `ndarray` arrays indexed `[[row, col]]`, row 0 at the top.

use crate::error::{HizError, Result};
use crate::table::EntityTable;
use geo::{BoundingRect, Coord, Intersects, Point, Polygon, Rect};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Georeferencing of a north-up grid with square pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterProfile {
    pub width: usize,
    pub height: usize,
    /// Top-left corner of the grid.
    pub origin: Coord<f64>,
    pub resolution: f64,
    pub nodata: u8,
}

impl RasterProfile {
    /// Profile covering `bounds` at `resolution`, rounding the extent up to
    /// whole pixels.
    pub fn from_bounds(bounds: Rect<f64>, resolution: f64, nodata: u8) -> Result<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(HizError::Configuration(format!(
                "Raster resolution must be positive and finite, got {}",
                resolution
            )));
        }

        let width = (bounds.width() / resolution).ceil() as usize;
        let height = (bounds.height() / resolution).ceil() as usize;

        Ok(Self {
            width,
            height,
            origin: Coord {
                x: bounds.min().x,
                y: bounds.max().y,
            },
            resolution,
            nodata,
        })
    }

    /// Profile covering every footprint of `table`.
    pub fn from_table(table: &EntityTable, resolution: f64, nodata: u8) -> Result<Self> {
        Self::from_bounds(table.total_bounds()?, resolution, nodata)
    }

    /// `(rows, cols)` of grids laid out by this profile.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Centre of the cell at `(row, col)` in world coordinates.
    pub fn cell_center(&self, row: usize, col: usize) -> Coord<f64> {
        Coord {
            x: self.origin.x + (col as f64 + 0.5) * self.resolution,
            y: self.origin.y - (row as f64 + 0.5) * self.resolution,
        }
    }

    /// Rows and columns whose cell centres fall inside `rect`, `None` when
    /// no centre does.
    fn cells_within(&self, rect: &Rect<f64>) -> Option<(RangeInclusive<usize>, RangeInclusive<usize>)> {
        let cols = centre_range(
            (rect.min().x - self.origin.x) / self.resolution - 0.5,
            (rect.max().x - self.origin.x) / self.resolution - 0.5,
            self.width,
        )?;
        let rows = centre_range(
            (self.origin.y - rect.max().y) / self.resolution - 0.5,
            (self.origin.y - rect.min().y) / self.resolution - 0.5,
            self.height,
        )?;
        Some((rows, cols))
    }
}

/// Integer indices in `[lo, hi]`, clamped to `0..len`.
fn centre_range(lo: f64, hi: f64, len: usize) -> Option<RangeInclusive<usize>> {
    if len == 0 || !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    let lo = lo.ceil().max(0.0);
    let hi = hi.floor().min((len - 1) as f64);
    if lo > hi {
        return None;
    }
    Some(lo as usize..=hi as usize)
}

/// Burn polygons onto the grid described by `profile`.
///
/// Cells whose centre lies inside or on the boundary of any polygon get 1,
/// the others 0. With a mask, cells whose mask value is not 1 get
/// `profile.nodata`. Only the cells under each polygon's bounding box are
/// tested against it.
pub fn rasterize<'a>(
    polygons: impl IntoIterator<Item = &'a Polygon<f64>>,
    profile: &RasterProfile,
    mask: Option<&Array2<u8>>,
) -> Result<Array2<u8>> {
    if let Some(mask) = mask
        && mask.dim() != profile.shape()
    {
        return Err(HizError::InvalidInput(format!(
            "Mask shape {:?} does not match raster shape {:?}",
            mask.dim(),
            profile.shape()
        )));
    }

    let mut grid = Array2::<u8>::zeros(profile.shape());
    let mut burned = 0usize;

    for polygon in polygons {
        let Some((rows, cols)) = polygon
            .bounding_rect()
            .and_then(|rect| profile.cells_within(&rect))
        else {
            continue;
        };
        burned += 1;

        for row in rows {
            for col in cols.clone() {
                if grid[[row, col]] == 1 {
                    continue;
                }
                let center = Point::from(profile.cell_center(row, col));
                if polygon.intersects(&center) {
                    grid[[row, col]] = 1;
                }
            }
        }
    }

    if let Some(mask) = mask {
        ndarray::Zip::from(&mut grid)
            .and(mask)
            .for_each(|cell, &keep| {
                if keep != 1 {
                    *cell = profile.nodata;
                }
            });
    }

    log::debug!(
        "Rasterized {} polygons onto a {}x{} grid",
        burned,
        profile.height,
        profile.width
    );
    Ok(grid)
}

/// Reducer applied over the valid values of a moving window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateKind {
    Mean,
    Min,
    Max,
}

impl AggregateKind {
    /// Reduce `values`; `None` when there is nothing to reduce.
    pub fn reduce(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let reduced = match self {
            AggregateKind::Mean => values.iter().sum::<f64>() / values.len() as f64,
            AggregateKind::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            AggregateKind::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        };
        Some(reduced)
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregateKind::Mean => "mean",
            AggregateKind::Min => "min",
            AggregateKind::Max => "max",
        };
        f.write_str(name)
    }
}

impl FromStr for AggregateKind {
    type Err = HizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(AggregateKind::Mean),
            "min" => Ok(AggregateKind::Min),
            "max" => Ok(AggregateKind::Max),
            other => Err(HizError::Configuration(format!(
                "Unknown aggregate '{}', expected one of mean, min, max",
                other
            ))),
        }
    }
}

/// Replace every cell by `kind` applied to the non-NaN values of the
/// `window x window` neighbourhood centred on it.
///
/// Edges are padded by reflection including the edge cell
/// (`d c b a | a b c d | d c b a`). A neighbourhood without valid values
/// yields 0.
///
/// # Examples
///
/// ```
/// use hizone::compute::raster::{AggregateKind, fill_nan};
/// use ndarray::array;
///
/// let grid = array![[1.0, f64::NAN, 3.0]];
/// let filled = fill_nan(&grid, AggregateKind::Mean, 3).unwrap();
/// assert_eq!(filled[[0, 1]], 2.0);
/// ```
pub fn fill_nan(grid: &Array2<f64>, kind: AggregateKind, window: usize) -> Result<Array2<f64>> {
    if window == 0 || window % 2 == 0 {
        return Err(HizError::Configuration(format!(
            "Window size must be odd and at least 1, got {}",
            window
        )));
    }

    let (rows, cols) = grid.dim();
    let half = (window / 2) as isize;
    let mut values = Vec::with_capacity(window * window);

    let filled = Array2::from_shape_fn((rows, cols), |(row, col)| {
        values.clear();
        for dr in -half..=half {
            let r = reflect(row as isize + dr, rows);
            for dc in -half..=half {
                let c = reflect(col as isize + dc, cols);
                let value = grid[[r, c]];
                if !value.is_nan() {
                    values.push(value);
                }
            }
        }
        kind.reduce(&values).unwrap_or(0.0)
    });

    Ok(filled)
}

/// Map an out-of-range index back into `0..len` by symmetric reflection.
fn reflect(index: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let m = index.rem_euclid(period);
    if m < len as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}
