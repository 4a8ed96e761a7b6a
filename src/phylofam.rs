extern crate clap;
use clap::*;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cmd_phylofam;

// Trees from sorted matrices are caterpillars, one nesting level per leaf,
// and every tree operation recurses once per level.
const WORKER_STACK_SIZE: usize = 256 * 1024 * 1024;

fn main() -> anyhow::Result<()> {
    let app = Command::new("phylofam")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`phylofam` - Phylogenetic trees with gene-family leaves")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v info, -vv debug, -vvv trace). RUST_LOG overrides"),
        )
        .subcommand(cmd_phylofam::mat::make_subcommand())
        .subcommand(cmd_phylofam::nwk::make_subcommand())
        .subcommand(cmd_phylofam::fam::make_subcommand())
        .subcommand(cmd_phylofam::pl::make_subcommand())
        .after_help(
            r###"Subcommand groups:

* mat - Distance matrices: nj, check
* nwk - Newick trees: to-json
* fam - Gene families: resolve
* pl  - The whole pipeline: matrix -> Newick -> JSON -> resolved JSON

"###,
        );

    let matches = app.get_matches();
    setup_logging(matches.get_count("verbose"));

    let worker = std::thread::Builder::new()
        .name("phylofam".to_string())
        .stack_size(WORKER_STACK_SIZE)
        .spawn(move || dispatch(&matches))?;

    worker
        .join()
        .map_err(|_| anyhow::anyhow!("phylofam worker thread panicked"))?
}

fn dispatch(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("mat", sub_matches)) => cmd_phylofam::mat::execute(sub_matches),
        Some(("nwk", sub_matches)) => cmd_phylofam::nwk::execute(sub_matches),
        Some(("fam", sub_matches)) => cmd_phylofam::fam::execute(sub_matches),
        Some(("pl", sub_matches)) => cmd_phylofam::pl::execute(sub_matches),
        _ => unreachable!(),
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
