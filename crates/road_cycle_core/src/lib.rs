//! Approximate shortest closed tours over a fixed set of cities.
//!
//! The core is a randomized local search over two moves, swapping two stops
//! and rotating the starting stop, that keeps the cheapest tour seen for a
//! fixed number of rounds. Given a seed, a run is reproducible bit for bit.
//! Around it sit the tab-separated city reader, the connection report and a
//! plain-text map.

mod city;
mod error;
mod io;
pub mod logging;
mod render;
pub mod search;
mod tour;

pub(crate) use io::options;

pub use city::City;
pub use error::{Error, Result};
pub use io::input::{parse_cities, read_cities};
pub use io::options::{CycleOptions, LogFormat, LogLevel};
pub use io::report::{CityListing, ConnectionReport, write_report};
pub use render::grid::{MapBounds, TextMap};
pub use search::{
    IndexSource, RotationScore, SearchConfig, Solution, TourOptimizer, optimize,
    optimize_with_config,
};
pub use tour::{Edge, Tour, TourMetrics, tour_cost};
