mod generate;

use clap::{App, AppSettings, Arg, SubCommand};
use queens_generator::collection::GenerationConfig;
use std::io;
use std::path::Path;

fn main() -> io::Result<()> {
    env_logger::init();

    let matches = App::new("Queens Generator")
        .subcommand(
            SubCommand::with_name("generate")
                .about("Generate puzzle boards and store them as a JSON collection")
                .arg(
                    Arg::with_name("out")
                        .help("The directory to write the generated boards to")
                        .short("o")
                        .long("out")
                        .default_value("generated_maps")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("threads")
                        .help("The number of worker threads to use")
                        .long("threads")
                        .default_value("8")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("min-size")
                        .help("The smallest board size to generate")
                        .long("min-size")
                        .default_value("4")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("max-size")
                        .help("The largest board size to generate")
                        .long("max-size")
                        .default_value("17")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("threshold")
                        .help("The maximum solution count an accepted board may have")
                        .long("threshold")
                        .default_value("1")
                        .takes_value(true),
                ),
        )
        .setting(AppSettings::ArgRequiredElseHelp)
        .get_matches();

    match matches.subcommand() {
        ("generate", Some(matches)) => {
            let output_directory = matches.value_of("out").unwrap();

            let config = GenerationConfig {
                sizes: parse(matches.value_of("min-size").unwrap())
                    ..=parse(matches.value_of("max-size").unwrap()),
                threshold: parse(matches.value_of("threshold").unwrap()),
                worker_count: parse(matches.value_of("threads").unwrap()),
                ..GenerationConfig::default()
            };

            generate::run(Path::new(output_directory), &config)
        }
        _ => Ok(()),
    }
}

fn parse(value: &str) -> usize {
    str::parse(value).unwrap()
}
