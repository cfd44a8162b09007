use std::{fmt, io::Write};

use crate::{City, Result, TextMap, Tour};

const ARROW: &str = "========>";
const CLOSING_ARROW: &str = "=======>";

/// Per-leg cost listing of a tour followed by its total.
///
/// ```text
/// Connection 1 :  Lincoln ========> Pierre     (COST: 5.1052153729977965 )
/// ...
/// Connection 50 :  Des Moines =======> Lincoln     (COST: 3.152762894427983 )
///
/// TOTAL COST FOR THE BEST CYCLE IS 343.4879426527414
/// ```
pub struct ConnectionReport<'a> {
    tour: &'a Tour,
}

impl<'a> ConnectionReport<'a> {
    pub fn new(tour: &'a Tour) -> Self {
        Self { tour }
    }
}

impl fmt::Display for ConnectionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edges = self.tour.edges();
        let last = edges.len() - 1;
        let mut total = 0.0;
        let mut cost_buf = ryu::Buffer::new();

        for (idx, edge) in edges.iter().enumerate() {
            let arrow = if idx == last { CLOSING_ARROW } else { ARROW };
            writeln!(
                f,
                "Connection {} :  {} {arrow} {}     (COST: {} )",
                idx + 1,
                edge.from.name,
                edge.to.name,
                cost_buf.format(edge.cost)
            )?;
            total += edge.cost;
        }

        writeln!(f)?;
        writeln!(
            f,
            "TOTAL COST FOR THE BEST CYCLE IS {}",
            ryu::Buffer::new().format(total)
        )
    }
}

/// One line per city: name, then latitude and longitude to two decimals.
pub struct CityListing<'a> {
    cities: &'a [City],
}

impl<'a> CityListing<'a> {
    pub fn new(cities: &'a [City]) -> Self {
        Self { cities }
    }
}

impl fmt::Display for CityListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for city in self.cities {
            writeln!(
                f,
                "{} {:.2} {:.2}",
                city.name, city.latitude, city.longitude
            )?;
        }
        Ok(())
    }
}

/// Writes the input city listing, then the tour report, then the map when
/// `grid` is set.
pub fn write_report<W: Write>(
    out: &mut W,
    cities: &[City],
    tour: &Tour,
    grid: bool,
) -> Result<()> {
    write!(out, "{}", CityListing::new(cities))?;
    writeln!(out)?;
    write!(out, "{}", ConnectionReport::new(tour))?;
    if grid {
        writeln!(out)?;
        write!(out, "{}", TextMap::new(tour))?;
    }
    Ok(())
}
