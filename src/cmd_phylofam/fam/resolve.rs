use clap::*;
use phylofam::libs::pipeline;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("resolve")
        .about("Replace leaf names with the locus tags of gene families")
        .after_help(
            r###"
Replaces the name of every leaf in a nested JSON tree with the locus tags of
the first family whose name contains the leaf name.

Notes:
* <family.json> maps family names to lists of locus tags:
  {"FamilyA": ["a1", "a2"], "FamilyB": ["b1"]}
* Matching is by substring: leaf `A` matches family `FamilyA`. Families are
  tried in file order and the first hit wins, so short leaf names may match
  an unintended family.
* Leaves without a match keep their name (reported with -v).
* Internal nodes and already resolved leaves are not changed.

Examples:
1. phylofam fam resolve tree.json geneFamily.json -o tree_families.json
"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Nested JSON tree. [stdin] for standard input"),
        )
        .arg(
            Arg::new("family.json")
                .required(true)
                .num_args(1)
                .index(2)
                .help("Family name to locus tags index"),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .num_args(1)
                .value_parser(value_parser!(usize))
                .default_value("2")
                .help("Spaces per indentation level, 0 for a single line"),
        )
        .arg(
            Arg::new("outfile")
                .short('o')
                .long("outfile")
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infile = args.get_one::<String>("infile").unwrap();
    let family = args.get_one::<String>("family.json").unwrap();
    let outfile = args.get_one::<String>("outfile").unwrap();
    let indent = *args.get_one::<usize>("indent").unwrap();

    pipeline::resolve_json(infile, family, outfile, indent)?;

    Ok(())
}
