use super::merge::MergeTree;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the merge distance of an internal node is turned into the lengths of
/// the two edges below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchPolicy {
    /// Both child edges carry the parent's merge distance.
    #[default]
    Linkage,
    /// Child edges span the height difference, with a node's height being
    /// half its merge distance. Leaf-to-root paths then have equal length.
    Ultrametric,
}

impl FromStr for BranchPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linkage" => Ok(BranchPolicy::Linkage),
            "ultrametric" => Ok(BranchPolicy::Ultrametric),
            _ => Err(anyhow::anyhow!("unknown branch policy: {}", s)),
        }
    }
}

impl BranchPolicy {
    fn edge(&self, parent: &MergeTree, child: &MergeTree) -> f64 {
        match self {
            BranchPolicy::Linkage => parent.distance(),
            BranchPolicy::Ultrametric => parent.height() - child.height(),
        }
    }
}

/// Serialize a merge tree to a Newick string.
///
/// Leaves are written as their labels and each internal node as
/// `(Left:d1,Right:d2)`, with edge lengths printed to 5 decimals. The root
/// carries no length and the string ends with `;`.
///
/// # Example
/// ```
/// use phylofam::libs::phylo::merge::MergeTree;
/// use phylofam::libs::phylo::writer::{self, BranchPolicy};
///
/// let ab = MergeTree::join(MergeTree::leaf("A"), MergeTree::leaf("B"), 1.0);
/// let root = MergeTree::join(ab, MergeTree::leaf("C"), 3.0);
///
/// assert_eq!(
///     writer::write_newick(&root, BranchPolicy::Linkage),
///     "((A:1.00000,B:1.00000):3.00000,C:3.00000);"
/// );
/// assert_eq!(
///     writer::write_newick(&root, BranchPolicy::Ultrametric),
///     "((A:0.50000,B:0.50000):1.00000,C:1.50000);"
/// );
/// ```
pub fn write_newick(tree: &MergeTree, policy: BranchPolicy) -> String {
    let mut s = to_newick_recursive(tree, policy);
    s.push(';');
    s
}

fn to_newick_recursive(node: &MergeTree, policy: BranchPolicy) -> String {
    match node {
        MergeTree::Leaf(name) => quote_label(name),
        MergeTree::Internal { left, right, .. } => {
            let left_str = to_newick_recursive(left, policy);
            let right_str = to_newick_recursive(right, policy);
            format!(
                "({}:{:.5},{}:{:.5})",
                left_str,
                policy.edge(node, left),
                right_str,
                policy.edge(node, right)
            )
        }
    }
}

// Single quotes protect structural characters; embedded quotes are doubled
fn quote_label(label: &str) -> String {
    let needs_quote = label.is_empty() || label.chars().any(|c| "(),:;[]'\" \t\n".contains(c));
    if needs_quote {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}
