//! Random forest classifier: bootstrap-sampled Gini trees with per-split
//! feature subsampling, averaged as soft votes.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::tree::DecisionTree;
use crate::domain::model::{FeatureVector, FEATURE_COUNT};
use crate::domain::ports::Classifier;
use crate::utils::error::{PredictorError, Result};

/// Strategy for features examined per split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    Sqrt,
    All,
    Fixed(usize),
}

impl MaxFeatures {
    fn resolve(self, n_features: usize) -> usize {
        match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().ceil() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Fixed(n) => n.min(n_features),
        }
        .max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub random_seed: u64,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            random_seed: 42,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub params: ForestParams,
    trees: Vec<DecisionTree>,
    feature_importances: Vec<f64>,
    oob_accuracy: Option<f64>,
}

impl RandomForest {
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
            feature_importances: Vec::new(),
            oob_accuracy: None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty() && self.trees.iter().all(DecisionTree::is_fitted)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Normalised mean impurity decrease, in `FEATURE_NAMES` order.
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// Accuracy on samples left out of each tree's bootstrap draw.
    pub fn oob_accuracy(&self) -> Option<f64> {
        self.oob_accuracy
    }

    fn grow_tree(
        &self,
        tree_idx: usize,
        x: &[FeatureVector],
        y: &[bool],
    ) -> Result<(DecisionTree, [f64; FEATURE_COUNT], Vec<bool>)> {
        let n_samples = x.len();
        // 每棵樹獨立 seed，平行建樹結果仍可重現
        let mut rng = ChaCha8Rng::seed_from_u64(self.params.random_seed.wrapping_add(tree_idx as u64));

        let mut in_bag = vec![false; n_samples];
        let sample_indices: Vec<usize> = if self.params.bootstrap {
            (0..n_samples)
                .map(|_| {
                    let idx = rng.gen_range(0..n_samples);
                    in_bag[idx] = true;
                    idx
                })
                .collect()
        } else {
            in_bag.iter_mut().for_each(|b| *b = true);
            (0..n_samples).collect()
        };

        let mut tree = DecisionTree::new()
            .with_max_depth(self.params.max_depth)
            .with_min_samples_split(self.params.min_samples_split)
            .with_min_samples_leaf(self.params.min_samples_leaf)
            .with_max_features(self.params.max_features.resolve(FEATURE_COUNT));
        let importances = tree.fit(x, y, &sample_indices, &mut rng)?;

        Ok((tree, importances, in_bag))
    }

    fn compute_feature_importances(per_tree: &[[f64; FEATURE_COUNT]]) -> Vec<f64> {
        let mut totals = vec![0.0; FEATURE_COUNT];
        for importances in per_tree {
            let tree_total: f64 = importances.iter().sum();
            if tree_total <= 0.0 {
                continue;
            }
            for (total, value) in totals.iter_mut().zip(importances) {
                *total += value / tree_total;
            }
        }

        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            totals.iter_mut().for_each(|t| *t /= sum);
        }
        totals
    }

    fn compute_oob_accuracy(&self, x: &[FeatureVector], y: &[bool], in_bag: &[Vec<bool>]) -> Option<f64> {
        let mut correct = 0usize;
        let mut scored = 0usize;

        for (i, sample) in x.iter().enumerate() {
            let mut votes = 0.0;
            let mut n_votes = 0usize;
            for (tree, bag) in self.trees.iter().zip(in_bag) {
                if bag[i] {
                    continue;
                }
                if let Ok(p) = tree.predict_proba(sample) {
                    votes += p;
                    n_votes += 1;
                }
            }
            if n_votes == 0 {
                continue;
            }
            scored += 1;
            if (votes / n_votes as f64 >= 0.5) == y[i] {
                correct += 1;
            }
        }

        (scored > 0).then(|| correct as f64 / scored as f64)
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, x: &[FeatureVector], y: &[bool]) -> Result<()> {
        if x.len() != y.len() {
            return Err(PredictorError::Training {
                message: format!("{} feature rows but {} labels", x.len(), y.len()),
            });
        }
        if x.is_empty() {
            return Err(PredictorError::Training {
                message: "cannot fit a forest on an empty dataset".to_string(),
            });
        }
        if self.params.n_estimators == 0 {
            return Err(PredictorError::Training {
                message: "n_estimators must be at least 1".to_string(),
            });
        }

        let grown: Vec<(DecisionTree, [f64; FEATURE_COUNT], Vec<bool>)> = (0..self
            .params
            .n_estimators)
            .into_par_iter()
            .map(|tree_idx| self.grow_tree(tree_idx, x, y))
            .collect::<Result<_>>()?;

        let mut trees = Vec::with_capacity(grown.len());
        let mut importances = Vec::with_capacity(grown.len());
        let mut in_bag = Vec::with_capacity(grown.len());
        for (tree, tree_importances, bag) in grown {
            trees.push(tree);
            importances.push(tree_importances);
            in_bag.push(bag);
        }

        self.trees = trees;
        self.feature_importances = Self::compute_feature_importances(&importances);
        self.oob_accuracy = if self.params.bootstrap {
            self.compute_oob_accuracy(x, y, &in_bag)
        } else {
            None
        };

        tracing::debug!(
            n_trees = self.trees.len(),
            max_depth = self.trees.iter().map(DecisionTree::depth).max().unwrap_or(0),
            oob_accuracy = ?self.oob_accuracy,
            "Random forest fitted"
        );
        Ok(())
    }

    fn predict_proba(&self, x: &FeatureVector) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(PredictorError::Training {
                message: "random forest is not fitted".to_string(),
            });
        }

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.predict_proba(x)?;
        }
        Ok(total / self.trees.len() as f64)
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// survived == female; each pair of rows differs only in sex
    fn toy_dataset() -> (Vec<FeatureVector>, Vec<bool>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..40 {
            let female = i % 2 == 0;
            let pair = i / 2;
            x.push([
                (pair % 3 + 1) as f64,
                if female { 1.0 } else { 0.0 },
                20.0 + pair as f64,
                (pair % 2) as f64,
                0.0,
                5.0 + (pair * 3) as f64,
                (pair % 3) as f64,
            ]);
            y.push(female);
        }
        (x, y)
    }

    fn small_params() -> ForestParams {
        ForestParams {
            n_estimators: 15,
            ..ForestParams::default()
        }
    }

    #[test]
    fn test_forest_without_bootstrap_fits_every_training_row() {
        let (x, y) = toy_dataset();
        let mut forest = RandomForest::new(ForestParams {
            n_estimators: 5,
            max_features: MaxFeatures::All,
            bootstrap: false,
            ..ForestParams::default()
        });
        forest.fit(&x, &y).unwrap();

        assert!(forest.is_fitted());
        assert_eq!(forest.n_trees(), 5);
        assert!(forest.oob_accuracy().is_none());
        for (sample, label) in x.iter().zip(&y) {
            assert_eq!(forest.predict(sample).unwrap(), *label);
        }
    }

    #[test]
    fn test_bootstrap_forest_training_accuracy() {
        let (x, y) = toy_dataset();
        let mut forest = RandomForest::new(small_params());
        forest.fit(&x, &y).unwrap();

        let correct = x
            .iter()
            .zip(&y)
            .filter(|(sample, label)| forest.predict(sample).unwrap() == **label)
            .count();
        assert!(correct as f64 / x.len() as f64 >= 0.9);
    }

    #[test]
    fn test_same_seed_gives_identical_forest() {
        let (x, y) = toy_dataset();
        let mut first = RandomForest::new(small_params());
        let mut second = RandomForest::new(small_params());
        first.fit(&x, &y).unwrap();
        second.fit(&x, &y).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_feature_importances_are_normalised() {
        let (x, y) = toy_dataset();
        let mut forest = RandomForest::new(small_params());
        forest.fit(&x, &y).unwrap();

        let importances = forest.feature_importances();
        assert_eq!(importances.len(), FEATURE_COUNT);
        let sum: f64 = importances.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(forest.oob_accuracy().is_some());
    }

    #[test]
    fn test_fit_rejects_mismatched_labels() {
        let (x, _) = toy_dataset();
        let mut forest = RandomForest::new(small_params());
        assert!(forest.fit(&x, &[true, false]).is_err());
        assert!(forest.predict_proba(&x[0]).is_err());
    }

    #[test]
    fn test_max_features_resolution() {
        assert_eq!(MaxFeatures::Sqrt.resolve(7), 3);
        assert_eq!(MaxFeatures::All.resolve(7), 7);
        assert_eq!(MaxFeatures::Fixed(10).resolve(7), 7);
        assert_eq!(MaxFeatures::Fixed(0).resolve(7), 1);
    }
}
