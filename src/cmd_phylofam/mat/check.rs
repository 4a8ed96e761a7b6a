use clap::*;
use phylofam::libs::phylo::DistanceMatrix;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("check")
        .about("Validate a distance matrix and summarize it")
        .after_help(
            r###"
Loads a matrix the same way `mat nj` does and reports its shape.

Notes:
* Fails on non-square matrices, duplicated labels, mismatched row/column
  labels and non-numeric cells.
* Negative, asymmetric and non-zero diagonal values are accepted but counted.
* Output is tab-separated `key<TAB>value` lines.

Examples:
1. phylofam mat check matrix.csv
"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Input matrix file. [stdin] for standard input"),
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
    let mut writer = phylofam::writer(args.get_one::<String>("outfile").unwrap())?;

    let matrix = DistanceMatrix::from_file(infile)?;
    let n = matrix.size();

    let pairs = matrix.upper_triangle();
    let negative = pairs.iter().filter(|(_, _, d)| *d < 0.0).count();
    let asymmetric = pairs
        .iter()
        .filter(|(i, j, d)| *d != matrix.get(*j, *i))
        .count();
    let diagonal = (0..n).filter(|&i| matrix.get(i, i) != 0.0).count();
    let min = pairs.iter().map(|p| p.2).fold(f64::INFINITY, f64::min);
    let max = pairs.iter().map(|p| p.2).fold(f64::NEG_INFINITY, f64::max);

    writer.write_fmt(format_args!("labels\t{}\n", n))?;
    writer.write_fmt(format_args!("pairs\t{}\n", pairs.len()))?;
    if !pairs.is_empty() {
        writer.write_fmt(format_args!("min\t{}\n", min))?;
        writer.write_fmt(format_args!("max\t{}\n", max))?;
    }
    writer.write_fmt(format_args!("negative\t{}\n", negative))?;
    writer.write_fmt(format_args!("asymmetric\t{}\n", asymmetric))?;
    writer.write_fmt(format_args!("nonzero diagonal\t{}\n", diagonal))?;
    writer.flush()?;

    Ok(())
}
