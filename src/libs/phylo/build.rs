use super::error::{PhyloError, PhyloResult};
use super::matrix::DistanceMatrix;
use super::merge::MergeTree;
use itertools::Itertools;
use std::cmp::Ordering;

/// Build a tree from a distance matrix by average-linkage clustering.
///
/// This is the same agglomerative scheme as UPGMA: the two closest clusters
/// are merged repeatedly, and the distance from the merged cluster to any
/// other is the mean of all pairwise distances between their members. It is
/// used in place of neighbor-joining and yields a bifurcating tree whose
/// internal nodes carry the linkage distance of their merge.
///
/// Clusters live in slots indexed like the matrix rows. When slots `i < j`
/// merge, the new cluster takes slot `i` (left child) and slot `j` (right
/// child) is retired. Ties are broken by taking the first pair in row-major
/// `i < j` order over the remaining slots.
///
/// ```
/// use phylofam::libs::phylo::{build, matrix::DistanceMatrix, merge::MergeTree};
/// let names = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
/// let m = DistanceMatrix::new(names, vec![0., 1., 3., 1., 0., 3., 3., 3., 0.]).unwrap();
///
/// let tree = build::average_linkage(&m).unwrap();
/// let ab = MergeTree::join(MergeTree::leaf("A"), MergeTree::leaf("B"), 1.0);
/// assert_eq!(tree, MergeTree::join(ab, MergeTree::leaf("C"), 3.0));
/// ```
pub fn average_linkage(matrix: &DistanceMatrix) -> PhyloResult<MergeTree> {
    let n = matrix.size();
    if n < 2 {
        return Err(PhyloError::Input(format!(
            "at least 2 labels are needed to build a tree, got {}",
            n
        )));
    }

    // Active clusters with their leaf counts
    let mut clusters: Vec<Option<(MergeTree, usize)>> = matrix
        .get_names()
        .iter()
        .map(|name| Some((MergeTree::leaf(name.as_str()), 1)))
        .collect();

    let mut dists = vec![0.0; n * n];
    for (i, j, d) in matrix.upper_triangle() {
        dists[i * n + j] = d;
        dists[j * n + i] = d;
    }

    for step in 1..n {
        let active: Vec<usize> = (0..n).filter(|&k| clusters[k].is_some()).collect();

        // min_by keeps the first of equal minima
        let (i, j, d) = active
            .iter()
            .copied()
            .tuple_combinations()
            .map(|(i, j)| (i, j, dists[i * n + j]))
            .min_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal))
            .ok_or_else(|| PhyloError::Input("no clusters left to merge".to_string()))?;

        let (Some((left, size_i)), Some((right, size_j))) =
            (clusters[i].take(), clusters[j].take())
        else {
            return Err(PhyloError::Input(format!(
                "cluster slot {} or {} is empty",
                i, j
            )));
        };

        let size = size_i + size_j;
        for &k in &active {
            if k == i || k == j {
                continue;
            }
            let d_new = (dists[i * n + k] * size_i as f64 + dists[j * n + k] * size_j as f64)
                / size as f64;
            dists[i * n + k] = d_new;
            dists[k * n + i] = d_new;
        }

        tracing::debug!(
            "Merge {}: {:?} + {:?} at {}",
            step,
            left.leaves(),
            right.leaves(),
            d
        );
        clusters[i] = Some((MergeTree::join(left, right, d), size));
    }

    // Slot 0 is always the lower index of a merge, so it ends up holding the root
    clusters[0]
        .take()
        .map(|(root, _)| root)
        .ok_or_else(|| PhyloError::Input("clustering left no root".to_string()))
}
