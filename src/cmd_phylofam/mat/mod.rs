use clap::Command;

pub mod check;
pub mod nj;

pub fn make_subcommand() -> Command {
    Command::new("mat")
        .about("Matrix operations")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(check::make_subcommand())
        .subcommand(nj::make_subcommand())
}

pub fn execute(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("check", sub_matches)) => check::execute(sub_matches),
        Some(("nj", sub_matches)) => nj::execute(sub_matches),
        _ => unreachable!(),
    }
}
