// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use perfgraph::config::{self, NAME, VERSION};
use perfgraph::fatal;
use perfgraph::*;

use log::info;

fn main() {
    let matches = config::app().get_matches();

    if matches.value_of_os("FILE").is_none() {
        println!("{}", matches.usage());
        std::process::exit(1);
    }

    let config = Config::from_matches(&matches).unwrap_or_else(|e| {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = Logger::new().label(NAME).level(config.logging()).init() {
        eprintln!("ERROR: failed to initialize logger: {}", e);
        std::process::exit(1);
    }

    info!("{} {} initializing...", NAME, VERSION);
    config.print();

    let input = match config.input() {
        Some(input) => input,
        None => fatal!("no input file"),
    };

    match perfgraph::run(input, config.render()) {
        Ok(output) => println!("Plot saved to {}", output.display()),
        Err(e) => fatal!("{}", e),
    }
}
