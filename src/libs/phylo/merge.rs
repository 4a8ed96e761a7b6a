/// A strictly binary tree produced by agglomerative clustering.
///
/// Each parent owns its two children; there are no back references, and a
/// node is never modified once it has been joined under a parent.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeTree {
    Leaf(String),
    Internal {
        left: Box<MergeTree>,
        right: Box<MergeTree>,
        /// Linkage distance at which the two children were merged
        distance: f64,
    },
}

impl MergeTree {
    pub fn leaf(name: impl Into<String>) -> Self {
        MergeTree::Leaf(name.into())
    }

    pub fn join(left: MergeTree, right: MergeTree, distance: f64) -> Self {
        MergeTree::Internal {
            left: Box::new(left),
            right: Box::new(right),
            distance,
        }
    }

    /// Merge distance of an internal node, `0` for a leaf.
    pub fn distance(&self) -> f64 {
        match self {
            MergeTree::Leaf(_) => 0.0,
            MergeTree::Internal { distance, .. } => *distance,
        }
    }

    /// Height of the node in an ultrametric reading of the tree: half the
    /// merge distance, so that two leaves merged at `d` sit `d / 2` below it.
    pub fn height(&self) -> f64 {
        self.distance() / 2.0
    }

    /// Leaf labels from left to right.
    ///
    /// ```
    /// use phylofam::libs::phylo::merge::MergeTree;
    /// let ab = MergeTree::join(MergeTree::leaf("A"), MergeTree::leaf("B"), 1.0);
    /// let root = MergeTree::join(ab, MergeTree::leaf("C"), 3.0);
    /// assert_eq!(root.leaves(), vec!["A", "B", "C"]);
    /// assert_eq!(root.count_internal(), 2);
    /// ```
    pub fn leaves(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_leaves(&mut names);
        names
    }

    fn collect_leaves<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            MergeTree::Leaf(name) => names.push(name),
            MergeTree::Internal { left, right, .. } => {
                left.collect_leaves(names);
                right.collect_leaves(names);
            }
        }
    }

    pub fn count_internal(&self) -> usize {
        match self {
            MergeTree::Leaf(_) => 0,
            MergeTree::Internal { left, right, .. } => {
                1 + left.count_internal() + right.count_internal()
            }
        }
    }
}
