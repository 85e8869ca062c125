// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate julia;
#[macro_use]
extern crate log;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use julia::config::{DEFAULT_CONCURRENCY_LIMIT, DEFAULT_MAX_ITERATIONS, DEFAULT_SIZE};
use julia::{BatchDriver, Palette, RenderConfig};
use std::str::FromStr;

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_size(s: &str) -> Result<(), String> {
    match usize::from_str(s) {
        Ok(n) if n > 0 && n % 4 == 0 => Ok(()),
        Ok(_) => Err("Image size must be a positive multiple of 4".to_string()),
        Err(_) => Err("Could not parse image size".to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const ITERATIONS: &str = "iterations";
const LIMIT: &str = "limit";
const WORKERS: &str = "workers";
const OVERLAY: &str = "overlay";

fn args<'a>(defaults: &'a [String; 4]) -> ArgMatches<'a> {
    let max_workers = num_cpus::get() * 4;

    App::new("juliaset")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Renders one Julia set image per palette function")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value(".")
                .help("Directory the images are written to"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value(&defaults[0])
                .validator(|s| validate_size(&s))
                .help("Edge length of each image, in pixels"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value(&defaults[1])
                .validator(|s| {
                    validate_range(
                        &s,
                        1_u32,
                        1 << 20,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1048576",
                    )
                })
                .help("Iterations before a point counts as inside the set"),
        )
        .arg(
            Arg::with_name(LIMIT)
                .long(LIMIT)
                .short("l")
                .takes_value(true)
                .default_value(&defaults[2])
                .validator(|s| {
                    validate_range(
                        &s,
                        0_usize,
                        1_000_000,
                        "Could not parse task limit",
                        "Task limit must be between 0 and 1000000",
                    )
                })
                .help("Most pixel tasks in flight at once, per image"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .long(WORKERS)
                .short("w")
                .takes_value(true)
                .default_value(&defaults[3])
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_workers,
                        "Could not parse worker count",
                        &format!("Worker count must be between 1 and {}", max_workers),
                    )
                })
                .help("Worker threads per image"),
        )
        .arg(
            Arg::with_name(OVERLAY)
                .long(OVERLAY)
                .help("Tint each pixel by whether a worker or the sweep computed it"),
        )
        .get_matches()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let defaults = [
        DEFAULT_SIZE.to_string(),
        DEFAULT_MAX_ITERATIONS.to_string(),
        DEFAULT_CONCURRENCY_LIMIT.to_string(),
        num_cpus::get().to_string(),
    ];
    let matches = args(&defaults);

    // The validators above have already vetted every value.
    let parse = |name: &str| matches.value_of(name).unwrap_or_default().to_string();
    let config = RenderConfig {
        size: usize::from_str(&parse(SIZE)).unwrap_or(DEFAULT_SIZE),
        max_iterations: u32::from_str(&parse(ITERATIONS)).unwrap_or(DEFAULT_MAX_ITERATIONS),
        concurrency_limit: usize::from_str(&parse(LIMIT)).unwrap_or(DEFAULT_CONCURRENCY_LIMIT),
        workers: usize::from_str(&parse(WORKERS)).unwrap_or_else(|_| num_cpus::get()),
        overlay: matches.is_present(OVERLAY),
    };

    let palette = Palette::standard();
    let driver = match BatchDriver::new(&palette, config, parse(OUTPUT)) {
        Ok(driver) => driver,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    let report = driver.run();
    println!("time: {} ms", report.elapsed_ms());

    if !report.is_success() {
        error!(
            "{} of {} images failed",
            report.failures().len(),
            report.outcomes.len()
        );
        std::process::exit(1);
    }
}
