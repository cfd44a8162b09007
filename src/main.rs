use std::{
    fs::File,
    io::{self, BufWriter, Write},
    time::Instant,
};

use log::info;

use road_cycle_core::{
    CycleOptions, Error, Result, logging, optimize_with_config, read_cities, write_report,
};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = CycleOptions::from_args()?;
    logging::init_logger(&options)?;
    let config = options.search_config()?;

    let cities = read_cities(options.input_path())?;

    info!("input: n={}", cities.len());
    info!("options: {options}");

    let solution = optimize_with_config(&cities, &config)?;

    let mut out: Box<dyn Write> = match options.output_path() {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
            Error::other(format!("failed to create output file {}: {e}", path.display()))
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    write_report(&mut out, &cities, &solution.tour, options.grid)?;
    out.flush()?;

    info!(
        "output: n={} cost={:.4} time={:.2}s",
        solution.tour.len(),
        solution.cost,
        now.elapsed().as_secs_f32()
    );

    let metrics = solution.tour.metrics();
    info!(
        "metrics: total={:.4} longest={:.4} avg={:.4}",
        metrics.total, metrics.longest, metrics.average
    );

    Ok(())
}
