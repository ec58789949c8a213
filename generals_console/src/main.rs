#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod network;
mod server_config;
mod server_main;

use clap::{Command, arg};
use server_config::{ServerConfig, read_config_file};


fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Generals")
        .version(clap::crate_version!())
        .about("Game of the Generals match server")
        .subcommand_required(true)
        .subcommand(Command::new("server").about("Run as server").arg(
            arg!(<config_file> "Path to the configuration file: yaml-serialized ServerConfig."),
        ))
        .subcommand(
            Command::new("server-default")
                .about("Run as server with default options")
                .arg(
                    arg!(-'p' --"port" <port> "Port to listen on")
                        .required(false)
                        .value_parser(clap::value_parser!(u16)),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("server", sub_matches)) => {
            let Some(config_file) = sub_matches.get_one::<String>("config_file") else {
                unreachable!("config_file is a required argument");
            };
            server_main::run(read_config_file(config_file)?)
        }
        Some(("server-default", sub_matches)) => {
            let port = sub_matches.get_one::<u16>("port").copied().unwrap_or(network::DEFAULT_PORT);
            server_main::run(ServerConfig { port, ..ServerConfig::default() })
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}
