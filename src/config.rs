// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::Error;
use crate::scales::TickStrategy;

use clap::{App, Arg, ArgMatches};
use log::Level;
use serde_derive::*;

use std::io::Read;
use std::path::{Path, PathBuf};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Largest page dimension most PDF readers accept, in points.
pub const MAX_PANEL_SIZE: u32 = 14400;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default)]
    render: Render,
    #[serde(skip)]
    input: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(with = "LevelDef")]
    #[serde(default = "default_logging_level")]
    logging: Level,
}

impl Default for General {
    fn default() -> Self {
        Self {
            logging: default_logging_level(),
        }
    }
}

/// Settings that shape the rendered report.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Render {
    #[serde(default)]
    ticks: TickStrategy,
    #[serde(default = "default_shared_y")]
    shared_y: bool,
    #[serde(default = "default_marker_size")]
    marker_size: u32,
    #[serde(default = "default_panel_width")]
    panel_width: u32,
    #[serde(default = "default_panel_height")]
    panel_height: u32,
}

impl Default for Render {
    fn default() -> Self {
        Self {
            ticks: TickStrategy::default(),
            shared_y: default_shared_y(),
            marker_size: default_marker_size(),
            panel_width: default_panel_width(),
            panel_height: default_panel_height(),
        }
    }
}

impl Render {
    pub fn ticks(&self) -> TickStrategy {
        self.ticks
    }

    pub fn set_ticks(&mut self, ticks: TickStrategy) {
        self.ticks = ticks;
    }

    /// whether charts in the same row share one y-range
    pub fn shared_y(&self) -> bool {
        self.shared_y
    }

    pub fn set_shared_y(&mut self, shared_y: bool) {
        self.shared_y = shared_y;
    }

    /// marker radius in points, zero disables markers
    pub fn marker_size(&self) -> u32 {
        self.marker_size
    }

    pub fn set_marker_size(&mut self, marker_size: u32) {
        self.marker_size = marker_size;
    }

    /// size of one chart cell in points
    pub fn panel_size(&self) -> (u32, u32) {
        (self.panel_width, self.panel_height)
    }

    pub fn set_panel_size(&mut self, (width, height): (u32, u32)) {
        self.panel_width = width;
        self.panel_height = height;
    }

    fn check(&self) -> Result<(), Error> {
        let valid = 1..=MAX_PANEL_SIZE;
        if !valid.contains(&self.panel_width) || !valid.contains(&self.panel_height) {
            return Err(Error::Config(format!(
                "panel size must be between 1 and {} points, got {}x{}",
                MAX_PANEL_SIZE, self.panel_width, self.panel_height
            )));
        }
        Ok(())
    }
}

// 6x4 inches per chart
fn default_panel_width() -> u32 {
    432
}

fn default_panel_height() -> u32 {
    288
}

fn default_marker_size() -> u32 {
    3
}

fn default_shared_y() -> bool {
    true
}

fn default_logging_level() -> Level {
    Level::Warn
}

#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
#[serde(remote = "Level")]
#[serde(deny_unknown_fields)]
enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// The command line definition.
pub fn app() -> App<'static, 'static> {
    App::new(NAME)
        .version(VERSION)
        .about("Render query benchmark results as a grid of charts in a PDF")
        .arg(
            Arg::with_name("FILE")
                .help("JSON-lines benchmark results, one entry per line")
                .index(1),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("ticks")
                .long("ticks")
                .value_name("STRATEGY")
                .help("Ticks at the measured lengths, or at every power of two in range")
                .possible_value("exact")
                .possible_value("range")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("independent-y")
                .long("independent-y")
                .help("Scale each chart's y-axis to its own data instead of its row")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("marker-size")
                .long("marker-size")
                .value_name("POINTS")
                .help("Marker radius, 0 disables markers")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Increase verbosity by one level. Can be used more than once")
                .multiple(true),
        )
}

impl Config {
    /// build `Config` from parsed command line options
    pub fn from_matches(matches: &ArgMatches) -> Result<Config, Error> {
        let mut config = if let Some(file) = matches.value_of("config") {
            Config::load_from_file(Path::new(file))?
        } else {
            Default::default()
        };

        config.input = matches.value_of_os("FILE").map(PathBuf::from);

        if let Some(ticks) = matches.value_of("ticks") {
            config.render.set_ticks(ticks.parse().map_err(Error::Config)?);
        }

        if matches.is_present("independent-y") {
            config.render.set_shared_y(false);
        }

        if let Some(marker_size) = parse_numeric_arg(matches, "marker-size")? {
            config.render.set_marker_size(marker_size);
        }

        match matches.occurrences_of("verbose") {
            0 => {}
            1 => config.general.logging = Level::Info,
            2 => config.general.logging = Level::Debug,
            _ => config.general.logging = Level::Trace,
        }

        config.render.check()?;

        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Config, Error> {
        let mut file = std::fs::File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Result<Config, Error> {
        let config: Config = toml::from_str(content)?;
        config.render.check()?;
        Ok(config)
    }

    /// the JSON-lines file to render
    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    /// get logging level
    pub fn logging(&self) -> Level {
        self.general.logging
    }

    pub fn render(&self) -> &Render {
        &self.render
    }

    pub fn print(&self) {
        info!("-----");
        if let Some(input) = self.input() {
            info!("Config: Input: {}", input.display());
        }
        info!(
            "Config: Ticks: {:?} Shared Y: {} Marker Size: {}",
            self.render.ticks(),
            self.render.shared_y(),
            self.render.marker_size(),
        );
        info!(
            "Config: Panel: {}x{} pt",
            self.render.panel_width, self.render.panel_height
        );
    }
}

/// a helper function to parse a numeric argument by name from `ArgMatches`
fn parse_numeric_arg(matches: &ArgMatches, key: &str) -> Result<Option<u32>, Error> {
    matches
        .value_of(key)
        .map(|v| {
            v.parse()
                .map_err(|_| Error::Config(format!("could not parse {}: {}", key, v)))
        })
        .transpose()
}
