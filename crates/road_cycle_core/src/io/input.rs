use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use crate::{City, Error, Result};

const FIELD_COUNT: usize = 4;

/// Reads `region<TAB>name<TAB>latitude<TAB>longitude` lines from `path`, or
/// from stdin when `path` is `None`.
pub fn read_cities(path: Option<&Path>) -> Result<Vec<City>> {
    let raw = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            Error::invalid_input(format!("failed to read {}: {e}", path.display()))
        })?,
        None => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            raw
        }
    };
    parse_cities(&raw)
}

pub fn parse_cities(raw: &str) -> Result<Vec<City>> {
    let mut cities = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        cities.push(parse_line(idx + 1, line)?);
    }

    if cities.is_empty() {
        return Err(Error::invalid_input("No cities provided."));
    }

    log::debug!("input: parsed cities={}", cities.len());
    Ok(cities)
}

fn parse_line(line_no: usize, line: &str) -> Result<City> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != FIELD_COUNT {
        return Err(Error::invalid_input(format!(
            "Line {line_no}: expected {FIELD_COUNT} tab-separated fields but got {}",
            fields.len()
        )));
    }

    let latitude = parse_coordinate(line_no, "latitude", fields[2])?;
    let longitude = parse_coordinate(line_no, "longitude", fields[3])?;
    let city = City::new(fields[0], fields[1], latitude, longitude);

    if !city.is_valid() {
        return Err(Error::invalid_input(format!(
            "Line {line_no}: coordinates out of range (lat must be in [-90, 90], lng in [-180, 180])"
        )));
    }
    Ok(city)
}

fn parse_coordinate(line_no: usize, field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::invalid_input(format!("Line {line_no}: invalid {field}: {raw}")))
}
