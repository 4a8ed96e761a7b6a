use clap::*;

pub mod resolve;

pub fn make_subcommand() -> Command {
    Command::new("fam")
        .about("Gene-family operations on trees")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(resolve::make_subcommand())
}

pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    match args.subcommand() {
        Some(("resolve", sub_matches)) => resolve::execute(sub_matches),
        _ => unreachable!(),
    }
}
