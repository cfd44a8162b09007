use std::{env, fmt, iter::Peekable, path::Path, str::FromStr};

use log::LevelFilter;

use crate::{
    Error, Result,
    search::{DEFAULT_ROUNDS, DEFAULT_SEED, RotationScore, SearchConfig},
};

/// Runtime options for the `road-cycle` binary.
#[derive(Clone, Debug)]
pub struct CycleOptions {
    /// Optional input file of tab-separated cities. Empty means stdin.
    pub input: String,
    /// Optional output file for the report and map. Empty means stdout.
    pub output: String,
    /// Search rounds after the initial swap. Negative values are rejected
    /// when the search config is built.
    pub iterations: i64,
    pub seed: u64,
    /// Independent search loops; `1` is the plain single-threaded search.
    pub restarts: usize,
    pub rotation_score: RotationScore,
    /// Append the text map after the connection report.
    pub grid: bool,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    pub log_output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "off" => Ok(Self::Off),
            _ => Err(invalid_value(
                "log-level",
                raw,
                "error|warn|info|debug|trace|off",
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Off => "off",
        };
        f.write_str(value)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(invalid_value("log-format", raw, "compact|pretty")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
        })
    }
}

fn parse_rotation_score(raw: &str) -> Result<RotationScore> {
    match raw.to_ascii_lowercase().as_str() {
        "pre" => Ok(RotationScore::PreRotation),
        "post" => Ok(RotationScore::PostRotation),
        _ => Err(invalid_value("rotation-score", raw, "pre|post")),
    }
}

fn rotation_score_name(score: RotationScore) -> &'static str {
    match score {
        RotationScore::PreRotation => "pre",
        RotationScore::PostRotation => "post",
    }
}

impl Default for CycleOptions {
    fn default() -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            iterations: DEFAULT_ROUNDS as i64,
            seed: DEFAULT_SEED,
            restarts: 1,
            rotation_score: RotationScore::PreRotation,
            grid: true,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
        }
    }
}

impl CycleOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = split_arg(raw_name, &mut args);
            options.apply_option(&name, value)?;
        }

        Ok(options)
    }

    fn apply_option(&mut self, name: &str, value: Option<String>) -> Result<()> {
        match name {
            "input" => self.input = required(name, value)?,
            "output" => self.output = required(name, value)?,
            "iterations" => self.iterations = parse_number(name, &required(name, value)?)?,
            "seed" => self.seed = parse_number(name, &required(name, value)?)?,
            "restarts" => self.restarts = parse_number(name, &required(name, value)?)?,
            "rotation-score" => {
                self.rotation_score = parse_rotation_score(&required(name, value)?)?
            }
            "log-level" => self.log_level = LogLevel::parse(&required(name, value)?)?,
            "log-format" => self.log_format = LogFormat::parse(&required(name, value)?)?,
            "log-output" => self.log_output = required(name, value)?,
            "grid" => self.grid = optional_bool(name, value)?,
            "no-grid" => {
                reject_value(name, value)?;
                self.grid = false;
            }
            "log-timestamp" => self.log_timestamp = optional_bool(name, value)?,
            "no-log-timestamp" => {
                reject_value(name, value)?;
                self.log_timestamp = false;
            }
            _ => {
                return Err(Error::invalid_input(format!(
                    "Unknown option: --{name}\n\n{}",
                    Self::usage()
                )));
            }
        }
        Ok(())
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  road-cycle [options] [--input cities.txt]\n",
            "  road-cycle [options] < cities.txt\n\n",
            "Input lines are tab-separated: region, name, latitude, longitude.\n\n",
            "Options:\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --iterations <i64>\n",
            "  --seed <u64>\n",
            "  --restarts <usize>\n",
            "  --rotation-score <pre|post>\n",
            "  --grid[=<bool>]\n",
            "  --no-grid\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  road-cycle --input city-data.txt\n",
            "  road-cycle --iterations 50000 --seed 7 --no-grid < city-data.txt\n",
            "  road-cycle --restarts 8 --log-level=info --output route.txt < city-data.txt\n",
        )
    }

    /// Search configuration for the core optimizer.
    pub fn search_config(&self) -> Result<SearchConfig> {
        let rounds = usize::try_from(self.iterations)
            .map_err(|_| Error::InvalidIterationCount(self.iterations))?;
        if self.restarts == 0 {
            return Err(Error::invalid_input("restarts must be > 0"));
        }
        Ok(SearchConfig {
            rounds,
            seed: self.seed,
            restarts: self.restarts,
            rotation_score: self.rotation_score,
        })
    }

    pub fn input_path(&self) -> Option<&Path> {
        path_or_std(&self.input)
    }

    pub fn output_path(&self) -> Option<&Path> {
        path_or_std(&self.output)
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        path_or_std(&self.log_output)
    }
}

impl fmt::Display for CycleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input={} output={} iterations={} seed={} restarts={} rotation_score={} grid={} \
             log_level={} log_format={} log_timestamp={} log_output={}",
            display_or_dash(&self.input),
            display_or_dash(&self.output),
            self.iterations,
            self.seed,
            self.restarts,
            rotation_score_name(self.rotation_score),
            self.grid,
            self.log_level,
            self.log_format,
            self.log_timestamp,
            display_or_dash(&self.log_output),
        )
    }
}

fn split_arg(
    raw_name: &str,
    args: &mut Peekable<impl Iterator<Item = String>>,
) -> (String, Option<String>) {
    if let Some((k, v)) = raw_name.split_once('=') {
        return (k.to_string(), Some(v.to_string()));
    }

    let value = match args.peek() {
        Some(next) if !next.starts_with("--") => args.next(),
        _ => None,
    };

    (raw_name.to_string(), value)
}

fn required(name: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| Error::invalid_input(format!("Missing value for --{name}")))
}

fn reject_value(name: &str, value: Option<String>) -> Result<()> {
    match value {
        Some(_) => Err(Error::invalid_input(format!(
            "Flag --{name} does not take a value"
        ))),
        None => Ok(()),
    }
}

fn optional_bool(name: &str, value: Option<String>) -> Result<bool> {
    value.map_or(Ok(true), |v| parse_bool(name, &v))
}

fn parse_number<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::invalid_input(format!("Invalid number for --{name}: {raw}")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}

fn invalid_value(option: &str, raw: &str, expected: &str) -> Error {
    Error::invalid_input(format!(
        "Invalid value for --{option}: {raw} (expected {expected})"
    ))
}

fn path_or_std(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}

fn display_or_dash(raw: &str) -> &str {
    if raw.trim().is_empty() { "-" } else { raw }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::{CycleOptions, LogFormat, LogLevel, parse_bool};
    use crate::{Error, search::RotationScore};

    #[test]
    fn parse_bool_accepts_common_values() {
        assert!(parse_bool("x", "true").expect("parse"));
        assert!(parse_bool("x", "ON").expect("parse"));
        assert!(!parse_bool("x", "0").expect("parse"));
        assert!(!parse_bool("x", "no").expect("parse"));
    }

    #[test]
    fn parse_bool_rejects_unknown_values() {
        let err = parse_bool("grid", "maybe").expect_err("invalid bool should fail");
        assert!(err.to_string().contains("Invalid boolean for --grid: maybe"));
    }

    #[test]
    fn log_level_maps_to_expected_filter() {
        assert_eq!(LogLevel::Error.to_filter(), LevelFilter::Error);
        assert_eq!(LogLevel::Warn.to_filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::Trace.to_filter(), LevelFilter::Trace);
        assert_eq!(LogLevel::Off.to_filter(), LevelFilter::Off);
    }

    #[test]
    fn log_level_accepts_warning_alias() {
        assert_eq!(LogLevel::parse("WARNING").expect("parse"), LogLevel::Warn);
    }

    #[test]
    fn defaults_run_one_loop_of_10001_rounds() {
        let options = CycleOptions::default();
        let config = options.search_config().expect("config");
        assert_eq!(config.rounds, 10_001);
        assert_eq!(config.restarts, 1);
        assert_eq!(config.rotation_score, RotationScore::PreRotation);
        assert!(options.grid);
    }

    #[test]
    fn parse_from_iter_applies_known_options() {
        let options = CycleOptions::parse_from_iter([
            "--input=cities.txt",
            "--output",
            "route.txt",
            "--iterations=500",
            "--seed",
            "42",
            "--restarts=3",
            "--rotation-score=post",
            "--no-grid",
            "--log-level=debug",
            "--log-format=pretty",
            "--log-timestamp=false",
            "--log-output=run.log",
        ])
        .expect("parse options");

        assert_eq!(options.input, "cities.txt");
        assert_eq!(options.output, "route.txt");
        assert_eq!(options.iterations, 500);
        assert_eq!(options.seed, 42);
        assert_eq!(options.restarts, 3);
        assert_eq!(options.rotation_score, RotationScore::PostRotation);
        assert!(!options.grid);
        assert_eq!(options.log_level, LogLevel::Debug);
        assert_eq!(options.log_format, LogFormat::Pretty);
        assert!(!options.log_timestamp);
        assert_eq!(options.log_output, "run.log");
    }

    #[test]
    fn negative_iterations_parse_but_fail_config() {
        let options = CycleOptions::parse_from_iter(["--iterations", "-5"]).expect("parse options");
        assert_eq!(options.iterations, -5);

        let err = options.search_config().expect_err("negative iterations");
        assert!(matches!(err, Error::InvalidIterationCount(-5)));
    }

    #[test]
    fn zero_restarts_fail_config() {
        let options = CycleOptions::parse_from_iter(["--restarts=0"]).expect("parse options");
        assert!(options.search_config().is_err());
    }

    #[test]
    fn bare_grid_flag_enables_grid() {
        let options =
            CycleOptions::parse_from_iter(["--no-grid", "--grid"]).expect("parse options");
        assert!(options.grid);
    }

    #[test]
    fn parse_from_iter_rejects_flag_values() {
        let err = CycleOptions::parse_from_iter(["--no-grid=true"])
            .expect_err("expected flag value rejection");
        assert!(err.to_string().contains("does not take a value"));
    }

    #[test]
    fn parse_from_iter_requires_values() {
        let err = CycleOptions::parse_from_iter(["--seed"]).expect_err("missing value");
        assert!(err.to_string().contains("Missing value for --seed"));
    }

    #[test]
    fn parse_from_iter_rejects_bad_numbers() {
        let err = CycleOptions::parse_from_iter(["--seed=-1"]).expect_err("negative seed");
        assert!(err.to_string().contains("Invalid number for --seed: -1"));
    }

    #[test]
    fn parse_from_iter_rejects_unknown_option() {
        let err = CycleOptions::parse_from_iter(["--temperature=1"])
            .expect_err("expected unknown option error");
        assert!(err.to_string().contains("Unknown option: --temperature"));
    }

    #[test]
    fn parse_from_iter_rejects_positional_argument() {
        let err = CycleOptions::parse_from_iter(["cities.txt"]).expect_err("positional");
        assert!(err.to_string().contains("Unexpected argument: cities.txt"));
    }

    #[test]
    fn parse_from_iter_rejects_unknown_rotation_score() {
        let err = CycleOptions::parse_from_iter(["--rotation-score=sideways"])
            .expect_err("bad rotation score");
        assert!(err.to_string().contains("expected pre|post"));
    }

    #[test]
    fn help_returns_usage_error() {
        let err = CycleOptions::parse_from_iter(["-h"]).expect_err("help should short-circuit");
        assert!(err.to_string().contains("Usage:"));
    }

    #[test]
    fn paths_treat_empty_and_dash_as_std_streams() {
        let options = CycleOptions {
            output: "-".to_string(),
            log_output: "out/run.log".to_string(),
            ..CycleOptions::default()
        };
        assert!(options.input_path().is_none());
        assert!(options.output_path().is_none());
        assert_eq!(
            options.log_output_path().expect("path should exist"),
            std::path::Path::new("out/run.log")
        );
    }

    #[test]
    fn display_renders_key_value_pairs() {
        let rendered = CycleOptions::default().to_string();
        assert!(rendered.starts_with("input=- output=- iterations=10001 seed=12345"));
        assert!(rendered.contains("rotation_score=pre"));
        assert!(rendered.contains("log_level=warn"));
    }
}
