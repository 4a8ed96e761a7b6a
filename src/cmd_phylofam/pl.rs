use clap::*;
use phylofam::libs::config::PipelineConfig;
use phylofam::libs::pipeline;

pub fn make_subcommand() -> Command {
    Command::new("pl")
        .about("Run the whole pipeline")
        .after_help(
            r###"
Runs the three stages in order, each reading the file the previous one wrote:

    matrix --mat nj--> newick --nwk to-json--> tree_json --fam resolve--> output

Notes:
* File locations come from a TOML config; missing keys use the defaults:
    matrix    = "distance_matrix.csv"
    newick    = "tree.newick"
    tree_json = "tree.json"
    family    = "geneFamily.json"
    output    = "tree_families.json"
    branch    = "linkage"
* Relative paths are relative to the working directory.
* The first failing stage aborts the run.

Examples:
1. Use the default locations:
   phylofam pl

2. phylofam pl --config pipeline.toml
"###,
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .num_args(1)
                .help("TOML file with the pipeline locations"),
        )
}

pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let config = match args.get_one::<String>("config") {
        Some(file) => PipelineConfig::from_file(file)?,
        None => PipelineConfig::default(),
    };
    tracing::debug!("Pipeline config: {:?}", config);

    let stats = pipeline::run(&config)?;
    tracing::info!(
        "Pipeline done: {} resolved, {} unresolved leaves in {}",
        stats.resolved,
        stats.missed,
        config.output
    );

    Ok(())
}
