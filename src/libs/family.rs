use crate::libs::phylo::node::{NestedNode, NodeName};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Gene families and their locus tags, in document order.
///
/// The order matters: leaf resolution takes the first family whose name
/// contains the leaf label, so reordering the index can change the result.
/// Duplicate tags within a family are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyIndex {
    families: IndexMap<String, Vec<String>>,
}

impl FamilyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a family. Re-inserting a name replaces its tags but keeps its
    /// original position.
    pub fn insert(&mut self, name: impl Into<String>, tags: Vec<String>) {
        self.families.insert(name.into(), tags);
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.families
            .iter()
            .map(|(name, tags)| (name.as_str(), tags.as_slice()))
    }

    /// The first family, in index order, whose name contains `label`.
    ///
    /// ```
    /// use phylofam::libs::family::FamilyIndex;
    /// let mut index = FamilyIndex::new();
    /// index.insert("FamilyA", vec!["a1".to_string()]);
    /// index.insert("FamilyB", vec!["b1".to_string()]);
    ///
    /// assert_eq!(index.find("A"), Some(("FamilyA", &["a1".to_string()][..])));
    /// assert_eq!(index.find("Family").map(|(name, _)| name), Some("FamilyA"));
    /// assert_eq!(index.find("C"), None);
    /// ```
    pub fn find(&self, label: &str) -> Option<(&str, &[String])> {
        self.iter().find(|(name, _)| name.contains(label))
    }

    /// Load an index from a JSON object of `family name -> [locus tags]`.
    pub fn from_file(infile: &str) -> anyhow::Result<Self> {
        let index: Self = crate::libs::json::read_json(infile)?;
        tracing::info!("Loaded {} families from {}", index.len(), infile);
        Ok(index)
    }
}

impl FromIterator<(String, Vec<String>)> for FamilyIndex {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            families: iter.into_iter().collect(),
        }
    }
}

/// Outcome counts of one resolution pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveStats {
    /// Leaves whose label was replaced by locus tags
    pub resolved: usize,
    /// Leaves no family name contains; left unchanged
    pub missed: usize,
    /// Leaves that already carried locus tags
    pub skipped: usize,
}

/// Replace every leaf label with the locus tags of the first family whose
/// name contains it.
///
/// Matching is by substring, not equality, so short or generic labels may
/// hit an unintended family. Labels that match nothing are kept as they are.
/// Internal node names are never touched, and leaves that already hold tags
/// are skipped, which makes a second pass with the same index a no-op.
///
/// ```
/// use phylofam::libs::family::{resolve_leaves, FamilyIndex};
/// use phylofam::libs::phylo::node::{NestedNode, NodeName};
///
/// let index: FamilyIndex = vec![
///     ("FamilyA".to_string(), vec!["a1".to_string()]),
///     ("FamilyB".to_string(), vec!["b1".to_string()]),
/// ]
/// .into_iter()
/// .collect();
///
/// let mut tree = NestedNode::internal("Inner1", vec![NestedNode::leaf("A"), NestedNode::leaf("C")]);
/// let stats = resolve_leaves(&mut tree, &index);
///
/// let children = tree.children.as_ref().unwrap();
/// assert_eq!(children[0].name, NodeName::Tags(vec!["a1".to_string()]));
/// assert_eq!(children[1].name, NodeName::from("C"));
/// assert_eq!((stats.resolved, stats.missed), (1, 1));
/// ```
pub fn resolve_leaves(node: &mut NestedNode, index: &FamilyIndex) -> ResolveStats {
    let mut stats = ResolveStats::default();
    resolve_recursive(node, index, &mut stats);
    stats
}

fn resolve_recursive(node: &mut NestedNode, index: &FamilyIndex, stats: &mut ResolveStats) {
    if let Some(children) = node.children.as_mut() {
        for child in children.iter_mut() {
            resolve_recursive(child, index, stats);
        }
        return;
    }

    let Some(label) = node.name.as_label() else {
        stats.skipped += 1;
        return;
    };

    match index.find(label) {
        Some((family, tags)) => {
            tracing::debug!("Leaf {} resolved to family {}", label, family);
            node.name = NodeName::Tags(tags.to_vec());
            stats.resolved += 1;
        }
        None => {
            tracing::info!("No family name contains leaf {}, keeping it", label);
            stats.missed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::phylo::parser::parse_newick;

    fn tags(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn index(pairs: Vec<(&str, Vec<&str>)>) -> FamilyIndex {
        pairs
            .into_iter()
            .map(|(name, t)| (name.to_string(), tags(&t)))
            .collect()
    }

    #[test]
    fn test_substring_semantics() {
        let idx = index(vec![("FamilyA", vec!["a1"]), ("FamilyB", vec!["b1"])]);
        let mut tree = parse_newick("((A:1.00000,B:1.00000):3.00000,C:3.00000);").unwrap();

        let stats = resolve_leaves(&mut tree, &idx);
        assert_eq!(
            stats,
            ResolveStats {
                resolved: 2,
                missed: 1,
                skipped: 0
            }
        );

        let names: Vec<NodeName> = tree.names().into_iter().cloned().collect();
        assert_eq!(
            names,
            vec![
                NodeName::from("Inner1"),
                NodeName::from("Inner2"),
                NodeName::Tags(tags(&["a1"])),
                NodeName::Tags(tags(&["b1"])),
                NodeName::from("C"),
            ]
        );
    }

    #[test]
    fn test_first_match_wins() {
        // "GCA_1" is contained in both; index order decides
        let idx = index(vec![
            ("GCA_12_fam", vec!["x1", "x2"]),
            ("GCA_1_fam", vec!["y1"]),
        ]);
        let mut tree = NestedNode::internal("root", vec![NestedNode::leaf("GCA_1")]);
        resolve_leaves(&mut tree, &idx);
        assert_eq!(
            tree.children.as_ref().unwrap()[0].name,
            NodeName::Tags(tags(&["x1", "x2"]))
        );

        let idx = index(vec![("GCA_1_fam", vec!["y1"]), ("GCA_12_fam", vec!["x1", "x2"])]);
        let mut tree = NestedNode::internal("root", vec![NestedNode::leaf("GCA_1")]);
        resolve_leaves(&mut tree, &idx);
        assert_eq!(
            tree.children.as_ref().unwrap()[0].name,
            NodeName::Tags(tags(&["y1"]))
        );
    }

    #[test]
    fn test_internal_names_untouched() {
        // "Inner" is a substring of the family name, but only leaves resolve
        let idx = index(vec![("Inner1Family", vec!["t1"])]);
        let mut tree = NestedNode::internal("Inner1", vec![NestedNode::leaf("zzz")]);
        resolve_leaves(&mut tree, &idx);
        assert_eq!(tree.name, NodeName::from("Inner1"));
        assert_eq!(tree.children.as_ref().unwrap()[0].name, NodeName::from("zzz"));
    }

    #[test]
    fn test_duplicate_tags_kept() {
        let idx = index(vec![("fam_A", vec!["t1", "t1", "t2"])]);
        let mut tree = NestedNode::leaf("A");
        resolve_leaves(&mut tree, &idx);
        assert_eq!(tree.name, NodeName::Tags(tags(&["t1", "t1", "t2"])));
    }

    #[test]
    fn test_second_pass_is_noop() {
        let idx = index(vec![("FamilyA", vec!["a1"]), ("FamilyB", vec!["b1"])]);
        let mut tree = parse_newick("((A,B),C);").unwrap();
        resolve_leaves(&mut tree, &idx);
        let once = tree.clone();

        let stats = resolve_leaves(&mut tree, &idx);
        assert_eq!(tree, once);
        assert_eq!(stats.resolved, 0);
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.missed, 1);
    }

    #[test]
    fn test_json_order_preserved() {
        let json = r#"{"zeta": ["z1"], "alpha": ["a1"], "mid": []}"#;
        let idx: FamilyIndex = crate::libs::json::from_json_str(json).unwrap();
        let names: Vec<&str> = idx.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(idx.find("a").map(|(name, _)| name), Some("zeta"));
    }
}
