use clap::*;

pub mod to_json;

pub fn make_subcommand() -> Command {
    Command::new("nwk")
        .about("Newick tree conversions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(to_json::make_subcommand())
}

pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    match args.subcommand() {
        Some(("to-json", sub_matches)) => to_json::execute(sub_matches),
        _ => unreachable!(),
    }
}
