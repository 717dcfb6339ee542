//! Command-line interface for luksdump
//! This binary parses saved `cryptsetup luksDump` output into structured trees.
//!
//! Usage:
//!   luksdump parse `<path>`... [--format `<format>`] [--config `<file>`]  - Parse dumps and print their trees
//!   luksdump luks1-devices `<path>`...                                 - List LUKS1 devices by UUID path
//!
//! A path of `-` reads standard input. Both commands exit with status 1 when any
//! input fails to parse; inputs with nothing to parse are skipped silently.
//!
//! Configuration comes from `./luksdump.toml`, `--config`, `LUKSDUMP_*`
//! variables and flags, in that order.

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::Read;

use luksdump::luksdump::config::{cli_loader, LuksdumpConfig};
use luksdump::luksdump::devices::DumpSet;
use luksdump::luksdump::formats::{self, OutputFormat};
use luksdump::luksdump::normalize::normalize_with;
use luksdump::luksdump::DumpError;

fn main() {
    let paths_arg = Arg::new("paths")
        .help("Files holding luksDump output ('-' for stdin)")
        .required(true)
        .num_args(1..)
        .action(ArgAction::Append);

    let matches = Command::new("luksdump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for parsing cryptsetup luksDump output")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("min-luks2-sections")
                .long("min-luks2-sections")
                .global(true)
                .value_parser(clap::value_parser!(i64).range(0..))
                .help("Minimum number of sections a LUKS2 body must contain"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse dumps and print their trees")
                .arg(paths_arg.clone())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (json, yaml, treeviz); defaults to the configured one"),
                ),
        )
        .subcommand(
            Command::new("luks1-devices")
                .about("List /dev/disk/by-uuid paths of LUKS1 devices")
                .arg(paths_arg),
        )
        .get_matches();

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {}", e);
        std::process::exit(1);
    });

    match matches.subcommand() {
        Some(("parse", parse_matches)) => handle_parse_command(parse_matches, &config),
        Some(("luks1-devices", devices_matches)) => {
            handle_luks1_devices_command(devices_matches, &config)
        }
        _ => unreachable!(),
    }
}

fn load_config(matches: &ArgMatches) -> Result<LuksdumpConfig, config::ConfigError> {
    let explicit = matches.get_one::<std::path::PathBuf>("config");
    let mut loader = cli_loader(explicit.map(|p| p.as_path()));
    if let Some(min) = matches.get_one::<i64>("min-luks2-sections") {
        loader = loader.set_override("parser.min_luks2_sections", *min)?;
    }
    loader.build()
}

/// Reads and normalizes every path, exiting on I/O errors.
fn read_inputs(matches: &ArgMatches, config: &LuksdumpConfig) -> Vec<(String, String)> {
    matches
        .get_many::<String>("paths")
        .into_iter()
        .flatten()
        .map(|path| {
            let raw = read_source(path).unwrap_or_else(|e| {
                eprintln!("Error reading {}: {}", path, e);
                std::process::exit(1);
            });
            (path.clone(), normalize_with(&raw, &config.normalize))
        })
        .collect()
}

fn read_source(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Handle the parse command
fn handle_parse_command(matches: &ArgMatches, config: &LuksdumpConfig) {
    let format = match matches.get_one::<String>("format") {
        Some(name) => name.parse::<OutputFormat>().unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        }),
        None => config.output.format,
    };

    let mut failed = false;
    for (path, text) in read_inputs(matches, config) {
        match luksdump::parse_with(&text, &config.parser) {
            Ok(tree) => match formats::serialize(&tree, format) {
                Ok(output) => {
                    println!("{}", output.trim_end());
                }
                Err(e) => {
                    eprintln!("{}: {}", path, e);
                    failed = true;
                }
            },
            Err(DumpError::NotApplicable(_)) => {}
            Err(e) => {
                eprintln!("{}: {}", path, e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

/// Handle the luks1-devices command
fn handle_luks1_devices_command(matches: &ArgMatches, config: &LuksdumpConfig) {
    let set = DumpSet::parse_all(read_inputs(matches, config), &config.parser);
    for device in set.luks1_block_devices() {
        println!("{}", device);
    }
    for skipped in set.skipped() {
        eprintln!("{}: {}", skipped.source, skipped.error);
    }

    if !set.skipped().is_empty() {
        std::process::exit(1);
    }
}
