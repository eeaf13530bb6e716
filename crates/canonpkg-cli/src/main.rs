mod cli;
mod commands;
mod logging;

use cli::{CheckParams, DescribeParams, IdenticalParams, build_cli};

fn main() {
    logging::init();
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        Some(("identical", m)) => {
            let params = IdenticalParams::from_matches(m);
            commands::identical::run(params.into());
        }
        Some(("describe", m)) => {
            let params = DescribeParams::from_matches(m);
            commands::describe::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
