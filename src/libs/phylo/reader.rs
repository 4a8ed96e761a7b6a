use super::node::NestedNode;
use anyhow::Context;

/// Read a Newick tree from a file.
///
/// # Arguments
/// * `infile` - Path to the input file (or "stdin" for stdin).
///
/// # Example
/// ```
/// let tree = phylofam::libs::phylo::reader::from_file("tests/newick/abc.newick").unwrap();
/// assert_eq!(tree.leaves().len(), 3);
/// ```
pub fn from_file(infile: &str) -> anyhow::Result<NestedNode> {
    let newick = crate::libs::io::read_to_string(infile)?;
    let tree = NestedNode::from_newick(&newick)
        .with_context(|| format!("invalid Newick tree in {}", infile))?;
    tracing::info!(
        "Parsed {} nodes ({} leaves) from {}",
        tree.count_nodes(),
        tree.leaves().len(),
        infile
    );
    Ok(tree)
}
