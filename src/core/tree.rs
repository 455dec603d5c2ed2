//! Binary Gini decision tree used as the forest's base learner.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::model::{FeatureVector, FEATURE_COUNT};
use crate::utils::error::{PredictorError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf with the share of positive samples that reached it
    Leaf {
        positive_fraction: f64,
        n_samples: usize,
    },
    /// Samples with `x[feature_idx] <= threshold` go left
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features examined per split; all of them when `None`
    pub max_features: Option<usize>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    weighted_impurity: f64,
}

impl DecisionTree {
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features.clamp(1, FEATURE_COUNT));
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// Grow the tree on the rows selected by `indices` (duplicates allowed,
    /// as produced by bootstrap sampling). Returns the per-feature total
    /// impurity decrease.
    pub fn fit<R: Rng>(
        &mut self,
        x: &[FeatureVector],
        y: &[bool],
        indices: &[usize],
        rng: &mut R,
    ) -> Result<[f64; FEATURE_COUNT]> {
        if x.len() != y.len() {
            return Err(PredictorError::Training {
                message: format!("{} feature rows but {} labels", x.len(), y.len()),
            });
        }
        if indices.is_empty() {
            return Err(PredictorError::Training {
                message: "cannot grow a tree on zero samples".to_string(),
            });
        }

        let mut importances = [0.0; FEATURE_COUNT];
        let root = self.build(x, y, indices.to_vec(), 0, rng, &mut importances);
        self.root = Some(root);
        Ok(importances)
    }

    fn build<R: Rng>(
        &self,
        x: &[FeatureVector],
        y: &[bool],
        indices: Vec<usize>,
        depth: usize,
        rng: &mut R,
        importances: &mut [f64; FEATURE_COUNT],
    ) -> TreeNode {
        let n_samples = indices.len();
        let positives = indices.iter().filter(|&&i| y[i]).count();
        let leaf = TreeNode::Leaf {
            positive_fraction: positives as f64 / n_samples as f64,
            n_samples,
        };

        let should_stop = n_samples < self.min_samples_split
            || positives == 0
            || positives == n_samples
            || self.max_depth.is_some_and(|d| depth >= d);
        if should_stop {
            return leaf;
        }

        let Some(split) = self.find_best_split(x, y, &indices, positives, rng) else {
            return leaf;
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[i][split.feature_idx] <= split.threshold);

        let parent_impurity = gini(positives, n_samples);
        importances[split.feature_idx] +=
            n_samples as f64 * (parent_impurity - split.weighted_impurity);

        let left = Box::new(self.build(x, y, left_indices, depth + 1, rng, importances));
        let right = Box::new(self.build(x, y, right_indices, depth + 1, rng, importances));

        TreeNode::Split {
            feature_idx: split.feature_idx,
            threshold: split.threshold,
            left,
            right,
        }
    }

    /// Features are visited in random order until `max_features` of them
    /// turned out non-constant on this node.
    fn find_best_split<R: Rng>(
        &self,
        x: &[FeatureVector],
        y: &[bool],
        indices: &[usize],
        positives: usize,
        rng: &mut R,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let max_features = self.max_features.unwrap_or(FEATURE_COUNT);

        let mut features: Vec<usize> = (0..FEATURE_COUNT).collect();
        features.shuffle(rng);

        let mut best: Option<SplitCandidate> = None;
        let mut visited = 0usize;
        let mut sorted = indices.to_vec();

        for feature_idx in features {
            if visited >= max_features {
                break;
            }

            sorted.sort_by(|&a, &b| x[a][feature_idx].total_cmp(&x[b][feature_idx]));
            let lowest = x[sorted[0]][feature_idx];
            let highest = x[sorted[n - 1]][feature_idx];
            if lowest == highest {
                continue;
            }
            visited += 1;

            let mut left_pos = 0usize;
            for k in 0..n - 1 {
                if y[sorted[k]] {
                    left_pos += 1;
                }
                let current = x[sorted[k]][feature_idx];
                let next = x[sorted[k + 1]][feature_idx];
                if current == next {
                    continue;
                }

                let left_n = k + 1;
                let right_n = n - left_n;
                if left_n < self.min_samples_leaf || right_n < self.min_samples_leaf {
                    continue;
                }

                let right_pos = positives - left_pos;
                let weighted = (left_n as f64 * gini(left_pos, left_n)
                    + right_n as f64 * gini(right_pos, right_n))
                    / n as f64;

                if best
                    .as_ref()
                    .map_or(true, |b| weighted < b.weighted_impurity)
                {
                    let mut threshold = (current + next) / 2.0;
                    // 相鄰浮點數的中點可能等於 next
                    if threshold >= next {
                        threshold = current;
                    }
                    best = Some(SplitCandidate {
                        feature_idx,
                        threshold,
                        weighted_impurity: weighted,
                    });
                }
            }
        }

        best
    }

    pub fn predict_proba(&self, sample: &FeatureVector) -> Result<f64> {
        let mut node = self.root.as_ref().ok_or_else(|| PredictorError::Training {
            message: "decision tree is not fitted".to_string(),
        })?;

        loop {
            match node {
                TreeNode::Leaf {
                    positive_fraction, ..
                } => return Ok(*positive_fraction),
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature_idx] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, node_depth)
    }

    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, count_leaves)
    }
}

fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    2.0 * p * (1.0 - p)
}

fn node_depth(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 1,
        TreeNode::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
    }
}

fn count_leaves(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 1,
        TreeNode::Split { left, right, .. } => count_leaves(left) + count_leaves(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn row(sex: f64, pclass: f64) -> FeatureVector {
        [pclass, sex, 30.0, 0.0, 0.0, 10.0, 0.0]
    }

    #[test]
    fn test_tree_separates_on_informative_feature() {
        let x = vec![row(0.0, 3.0), row(1.0, 1.0), row(0.0, 1.0), row(1.0, 3.0)];
        let y = vec![false, true, false, true];
        let indices: Vec<usize> = (0..x.len()).collect();

        let mut tree = DecisionTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let importances = tree.fit(&x, &y, &indices, &mut rng).unwrap();

        for (sample, label) in x.iter().zip(&y) {
            let p = tree.predict_proba(sample).unwrap();
            assert_eq!(p >= 0.5, *label);
        }
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.n_leaves(), 2);
        assert!(importances[1] > 0.0);
        assert_eq!(importances[0], 0.0);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x: Vec<FeatureVector> = (0..8).map(|i| row(0.0, i as f64)).collect();
        let y: Vec<bool> = (0..8).map(|i| i % 2 == 0).collect();
        let indices: Vec<usize> = (0..x.len()).collect();

        let mut tree = DecisionTree::new().with_max_depth(Some(2));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        tree.fit(&x, &y, &indices, &mut rng).unwrap();
        assert!(tree.depth() <= 3);
    }

    #[test]
    fn test_identical_rows_with_mixed_labels_become_leaf() {
        let x = vec![row(1.0, 2.0), row(1.0, 2.0), row(1.0, 2.0)];
        let y = vec![true, false, true];
        let indices: Vec<usize> = (0..x.len()).collect();

        let mut tree = DecisionTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        tree.fit(&x, &y, &indices, &mut rng).unwrap();

        let p = tree.predict_proba(&row(1.0, 2.0)).unwrap();
        assert!((p - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(tree.n_leaves(), 1);
    }

    #[test]
    fn test_unfitted_tree_refuses_to_predict() {
        let tree = DecisionTree::new();
        assert!(!tree.is_fitted());
        assert!(tree.predict_proba(&row(0.0, 1.0)).is_err());
    }
}
