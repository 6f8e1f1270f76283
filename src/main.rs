#![deny(unsafe_code)]
pub mod commands;

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use enum_dispatch::enum_dispatch;
use env_logger::Env;
use log::info;

use commands::command::Command;
use commands::node::Node;
use commands::run::Run;

/// Custom styles for CLI help output
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(styles = STYLES)]
struct Args {
    #[clap(subcommand)]
    subcommand: Subcommand,
}

#[enum_dispatch(Command)]
#[derive(Parser, Debug)]
#[command(version)]
enum Subcommand {
    #[command(display_order = 1)]
    Run(Run),
    #[command(display_order = 2)]
    Node(Node),
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Tag every log line with this process's role, mirroring the per-node
    // log identity of the multi-process deployment.
    let identity = match &args.subcommand {
        Subcommand::Run(_) => "run".to_string(),
        Subcommand::Node(node) => storymill_lib::Role::from_rank(node.rank)
            .map_or_else(|_| format!("rank-{}", node.rank), |role| role.name().to_string()),
    };
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            writeln!(buf, "[{}:{}] {}", record.level(), identity, record.args())
        })
        .init();

    info!("Running storymill version {}", env!("CARGO_PKG_VERSION"));
    args.subcommand.execute()
}
