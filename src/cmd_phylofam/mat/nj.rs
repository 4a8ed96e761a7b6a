use clap::*;
use phylofam::libs::phylo::BranchPolicy;
use phylofam::libs::pipeline;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("nj")
        .about("Construct a phylogenetic tree from a distance matrix")
        .after_help(
            r###"
Builds a bifurcating tree with branch lengths from a distance matrix.

Notes:
* The tree is built by average-linkage (UPGMA-style) clustering, which stands
  in for Neighbor-Joining. The command keeps the `nj` name for compatibility.
* Input: a labeled square matrix, either
  * a table with a header row and a leading label column, separated by
    commas, tabs or spaces (`,A,B,C` / `A,0,1,3` / ...), or
  * relaxed PHYLIP (first line is the number of taxa).
* Ties between equal distances go to the first pair in row-major order.
* Output: Newick, branch lengths with 5 decimals.
* --branch
  * linkage:     both children of a merge get the merge distance
  * ultrametric: children get the height difference, height = distance / 2

Examples:
1. Build tree from matrix:
   phylofam mat nj matrix.csv -o tree.newick

2. Pipe matrix to tree:
   cat matrix.phy | phylofam mat nj stdin > tree.newick
"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Input matrix file. [stdin] for standard input"),
        )
        .arg(
            Arg::new("branch")
                .long("branch")
                .action(ArgAction::Set)
                .value_parser([
                    builder::PossibleValue::new("linkage"),
                    builder::PossibleValue::new("ultrametric"),
                ])
                .default_value("linkage")
                .help("How merge distances become branch lengths"),
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

pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infile = args.get_one::<String>("infile").unwrap();
    let outfile = args.get_one::<String>("outfile").unwrap();
    let policy: BranchPolicy = args.get_one::<String>("branch").unwrap().parse()?;

    pipeline::build_newick(infile, outfile, policy)
}
