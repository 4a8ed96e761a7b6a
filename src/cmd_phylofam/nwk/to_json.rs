use clap::*;
use phylofam::libs::pipeline;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("to-json")
        .about("Convert a Newick tree to a nested JSON document")
        .after_help(
            r###"
Each node becomes `{"name": ..., "children": [...]}`; leaves have no
`children` field.

Notes:
* Branch lengths and comments are read but not kept.
* Unnamed nodes are named Inner1, Inner2, ... in pre-order (a parent before
  its children). Numbers already used as names in the tree are skipped.
* Labels may be quoted: 'Homo sapiens' or "Homo sapiens".

Examples:
1. phylofam nwk to-json tree.newick -o tree.json

2. phylofam mat nj matrix.csv | phylofam nwk to-json stdin
"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Input filename. [stdin] for standard input"),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .num_args(1)
                .value_parser(value_parser!(usize))
                .default_value("4")
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
    let outfile = args.get_one::<String>("outfile").unwrap();
    let indent = *args.get_one::<usize>("indent").unwrap();

    pipeline::newick_to_json(infile, outfile, indent)
}
