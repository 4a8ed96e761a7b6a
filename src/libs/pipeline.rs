//! The three batch stages, each reading one file and writing one file.
//!
//! matrix --build--> Newick --parse--> nested JSON --resolve--> resolved JSON

use crate::libs::config::PipelineConfig;
use crate::libs::family::{self, FamilyIndex, ResolveStats};
use crate::libs::json;
use crate::libs::phylo::node::NestedNode;
use crate::libs::phylo::{build, reader, writer, BranchPolicy, DistanceMatrix};
use anyhow::Context;
use std::io::Write;

/// Indentation of the nested tree written by the parse stage.
pub const TREE_JSON_INDENT: usize = 4;
/// Indentation of the resolved tree.
pub const RESOLVED_JSON_INDENT: usize = 2;

/// Distance matrix to Newick.
pub fn build_newick(infile: &str, outfile: &str, policy: BranchPolicy) -> anyhow::Result<()> {
    let matrix = DistanceMatrix::from_file(infile)?;
    let tree = build::average_linkage(&matrix)
        .with_context(|| format!("cannot build a tree from {}", infile))?;

    let newick = writer::write_newick(&tree, policy);

    let mut writer = crate::libs::io::writer(outfile)?;
    writer.write_all((newick + "\n").as_bytes())?;
    writer.flush()?;

    tracing::info!("Wrote tree of {} leaves to {}", matrix.size(), outfile);
    Ok(())
}

/// Newick to nested-node JSON.
pub fn newick_to_json(infile: &str, outfile: &str, indent: usize) -> anyhow::Result<()> {
    let tree = reader::from_file(infile)?;
    json::write_json(&tree, outfile, indent)?;
    tracing::info!("Wrote nested tree to {}", outfile);
    Ok(())
}

/// Replace leaf names of a nested-node JSON tree with family locus tags.
pub fn resolve_json(
    infile: &str,
    family_file: &str,
    outfile: &str,
    indent: usize,
) -> anyhow::Result<ResolveStats> {
    let mut tree: NestedNode = json::read_json(infile)?;
    let index = FamilyIndex::from_file(family_file)?;

    let stats = family::resolve_leaves(&mut tree, &index);
    tracing::info!(
        "Resolved {} leaves, {} without a family, {} already resolved",
        stats.resolved,
        stats.missed,
        stats.skipped
    );

    json::write_json(&tree, outfile, indent)?;
    Ok(stats)
}

/// Run all stages in order. The first failure aborts the run.
pub fn run(config: &PipelineConfig) -> anyhow::Result<ResolveStats> {
    build_newick(&config.matrix, &config.newick, config.branch).context("build stage failed")?;
    newick_to_json(&config.newick, &config.tree_json, TREE_JSON_INDENT)
        .context("parse stage failed")?;
    resolve_json(
        &config.tree_json,
        &config.family,
        &config.output,
        RESOLVED_JSON_INDENT,
    )
    .context("resolve stage failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::phylo::node::NodeName;
    use tempfile::TempDir;

    #[test]
    fn test_run_abc() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let path = |name: &str| temp.path().join(name).to_string_lossy().to_string();

        std::fs::write(path("m.csv"), ",A,B,C\nA,0,1,3\nB,1,0,3\nC,3,3,0\n")?;
        std::fs::write(path("fam.json"), r#"{"FamilyA": ["a1"], "FamilyB": ["b1"]}"#)?;

        let config = PipelineConfig {
            matrix: path("m.csv"),
            newick: path("t.newick"),
            tree_json: path("t.json"),
            family: path("fam.json"),
            output: path("out.json"),
            branch: BranchPolicy::Linkage,
        };
        let stats = run(&config)?;
        assert_eq!((stats.resolved, stats.missed), (2, 1));

        let newick = std::fs::read_to_string(path("t.newick"))?;
        assert_eq!(newick.trim(), "((A:1.00000,B:1.00000):3.00000,C:3.00000);");

        let tree: NestedNode = json::read_json(&path("out.json"))?;
        let leaves: Vec<&NodeName> = tree.leaves().into_iter().map(|n| &n.name).collect();
        assert_eq!(
            leaves,
            vec![
                &NodeName::Tags(vec!["a1".to_string()]),
                &NodeName::Tags(vec!["b1".to_string()]),
                &NodeName::from("C"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_run_stops_on_bad_matrix() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let path = |name: &str| temp.path().join(name).to_string_lossy().to_string();
        std::fs::write(path("m.csv"), ",A\nA,0\n")?;

        let config = PipelineConfig {
            matrix: path("m.csv"),
            newick: path("t.newick"),
            tree_json: path("t.json"),
            family: path("fam.json"),
            output: path("out.json"),
            branch: BranchPolicy::Linkage,
        };
        let err = run(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("at least 2 labels"));
        assert!(!temp.path().join("t.json").exists());
        Ok(())
    }
}
