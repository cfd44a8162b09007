//! Plain-text map of a tour on a one-degree latitude/longitude grid.
//!
//! ```text
//!       1    2    3    4
//!       |    |    |    |
//! 3    -    -    -    -
//!       |    |    |    |
//! 2    -    -    - 2  -
//! ```
//!
//! Each city is drawn in the cell its rounded coordinates fall into, labeled
//! with its 1-based position in the tour.

use std::{collections::HashMap, fmt};

use crate::Tour;

const CELL_WIDTH: usize = 5;
const BAR_CELL: &str = "  |  ";
const EMPTY_CELL: &str = "-    ";
const MARGIN_DEGREES: f64 = 1.0;
const MAX_LAT: f64 = 90.0;
const MAX_LNG: f64 = 180.0;

/// Whole-degree extent of the map, inclusive on every side.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MapBounds {
    pub max_lat: i64,
    pub min_lat: i64,
    pub max_lng: i64,
    pub min_lng: i64,
}

impl MapBounds {
    /// Smallest grid covering every city with a one-degree margin.
    ///
    /// Coordinates are clamped to the world extent first, so a city off the
    /// globe lands on the border instead of widening the grid.
    pub fn covering(tour: &Tour) -> Self {
        let (mut max_lat, mut min_lat) = (f64::NEG_INFINITY, f64::INFINITY);
        let (mut max_lng, mut min_lng) = (f64::NEG_INFINITY, f64::INFINITY);
        for city in tour.cities() {
            let lat = city.latitude.clamp(-MAX_LAT, MAX_LAT);
            let lng = city.longitude.clamp(-MAX_LNG, MAX_LNG);
            max_lat = max_lat.max(lat);
            min_lat = min_lat.min(lat);
            max_lng = max_lng.max(lng);
            min_lng = min_lng.min(lng);
        }

        Self {
            max_lat: (max_lat + MARGIN_DEGREES).round() as i64,
            min_lat: (min_lat - MARGIN_DEGREES).round() as i64,
            max_lng: (max_lng + MARGIN_DEGREES).round() as i64,
            min_lng: (min_lng - MARGIN_DEGREES).round() as i64,
        }
    }

    fn columns(&self) -> usize {
        (self.max_lng - self.min_lng + 1) as usize
    }
}

pub struct TextMap<'a> {
    tour: &'a Tour,
    bounds: MapBounds,
}

impl<'a> TextMap<'a> {
    pub fn new(tour: &'a Tour) -> Self {
        Self {
            tour,
            bounds: MapBounds::covering(tour),
        }
    }

    /// First tour position per occupied cell, keyed by `(lat, lng)`.
    fn occupied_cells(&self) -> HashMap<(i64, i64), usize> {
        let mut cells = HashMap::new();
        for (pos, city) in self.tour.cities().enumerate() {
            let key = (city.latitude.round() as i64, city.longitude.round() as i64);
            cells.entry(key).or_insert(pos + 1);
        }
        cells
    }
}

impl fmt::Display for TextMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.bounds;
        let bar = BAR_CELL.repeat(b.columns());
        let cells = self.occupied_cells();

        write!(f, "{:w$}", "", w = CELL_WIDTH)?;
        for lng in b.min_lng..=b.max_lng {
            write!(f, "{:^w$}", lng, w = CELL_WIDTH)?;
        }
        writeln!(f)?;
        writeln!(f, "{:w$}{bar}", "", w = CELL_WIDTH)?;

        for lat in (b.min_lat..=b.max_lat).rev() {
            write!(f, "{:<w$}", lat, w = CELL_WIDTH)?;
            for lng in b.min_lng..=b.max_lng {
                match cells.get(&(lat, lng)) {
                    Some(pos) => write!(f, "- {:<w$}", pos, w = CELL_WIDTH - 2)?,
                    None => f.write_str(EMPTY_CELL)?,
                }
            }
            writeln!(f)?;
            if lat != b.min_lat {
                writeln!(f, "{:w$}{bar}", "", w = CELL_WIDTH)?;
            }
        }
        Ok(())
    }
}
