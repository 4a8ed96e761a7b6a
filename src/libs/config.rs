//! Locations and options of the batch pipeline.
//!
//! Every field has a compiled default, so an absent or partial TOML file is
//! fine:
//!
//! ```toml
//! matrix = "distance_matrix.csv"
//! newick = "tree.newick"
//! tree_json = "tree.json"
//! family = "geneFamily.json"
//! output = "tree_families.json"
//! branch = "linkage"
//! ```

use crate::libs::phylo::writer::BranchPolicy;
use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Input distance matrix
    pub matrix: String,
    /// Newick tree written by the build stage
    pub newick: String,
    /// Nested-node tree written by the parse stage
    pub tree_json: String,
    /// Family name to locus tags index
    pub family: String,
    /// Resolved tree
    pub output: String,
    pub branch: BranchPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            matrix: "distance_matrix.csv".to_string(),
            newick: "tree.newick".to_string(),
            tree_json: "tree.json".to_string(),
            family: "geneFamily.json".to_string(),
            output: "tree_families.json".to_string(),
            branch: BranchPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document, falling back to defaults for missing keys.
    ///
    /// ```
    /// use phylofam::libs::config::PipelineConfig;
    /// use phylofam::libs::phylo::writer::BranchPolicy;
    ///
    /// let cfg = PipelineConfig::from_toml("matrix = \"m.tsv\"\nbranch = \"ultrametric\"").unwrap();
    /// assert_eq!(cfg.matrix, "m.tsv");
    /// assert_eq!(cfg.branch, BranchPolicy::Ultrametric);
    /// assert_eq!(cfg.newick, "tree.newick");
    /// ```
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(infile: &str) -> anyhow::Result<Self> {
        let text = crate::libs::io::read_to_string(infile)?;
        Self::from_toml(&text).with_context(|| format!("invalid config in {}", infile))
    }
}
