use crate::functions;
use crate::model::{Predictor, Regressor, TrainError};
use itertools::Itertools as _;
use ordered_float::OrderedFloat;

/// Regression tree (CART with variance reduction) used as a bagging base model.
#[derive(Debug, Clone)]
pub struct DecisionTreeOptions {
    max_depth: Option<usize>,
    min_samples_split: usize,
}

impl DecisionTreeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Nodes with fewer rows than this become leaves.
    pub fn min_samples_split(mut self, n: usize) -> Self {
        self.min_samples_split = n.max(2);
        self
    }

    fn build_node(
        &self,
        rows: &[&[f64]],
        target: &[f64],
        index: &mut [usize],
        depth: usize,
    ) -> Node {
        let label = functions::mean(index.iter().map(|&i| &target[i])).expect("never fails");
        let mut node = Node::new(label);

        if index.len() < self.min_samples_split
            || self.max_depth.map_or(false, |d| depth >= d)
            || is_single(target, index)
        {
            return node;
        }

        let impurity = functions::variance(index.iter().map(|&i| target[i]));

        let mut best: Option<Split> = None;
        for feature in 0..rows[index[0]].len() {
            index.sort_by_key(|&i| OrderedFloat(rows[i][feature]));
            if let Some(split) = best_split(rows, target, index, feature, impurity) {
                if best
                    .as_ref()
                    .map_or(true, |b| b.information_gain < split.information_gain)
                {
                    best = Some(split);
                }
            }
        }

        if let Some(best) = best.filter(|b| b.information_gain > 0.0) {
            index.sort_by_key(|&i| OrderedFloat(rows[i][best.feature]));
            let (l, r) = index.split_at_mut(best.pos);
            node.children = Some(Children {
                feature: best.feature,
                threshold: best.threshold,
                left: Box::new(self.build_node(rows, target, l, depth + 1)),
                right: Box::new(self.build_node(rows, target, r, depth + 1)),
            });
        }
        node
    }
}

impl Default for DecisionTreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

impl Regressor for DecisionTreeOptions {
    type Target = f64;
    type Fitted = DecisionTree;
    type Error = TrainError;

    fn fit(self, data: &[&[f64]], target: &[f64]) -> Result<DecisionTree, TrainError> {
        if target.is_empty() {
            return Err(TrainError::EmptyTarget);
        }

        if data.len() != target.len() {
            return Err(TrainError::SampleSizeMismatch);
        }

        let mut index = (0..target.len()).collect::<Vec<_>>();
        let root = self.build_node(data, target, &mut index, 0);
        Ok(DecisionTree { root })
    }
}

#[derive(Debug, Clone, Copy)]
struct Split {
    information_gain: f64,
    feature: usize,
    threshold: f64,
    pos: usize,
}

// Best variance-reduction split on `feature`. Assumes `index` is sorted by
// that feature; sweeps the thresholds once with running sums of y and y^2.
fn best_split(
    rows: &[&[f64]],
    target: &[f64],
    index: &[usize],
    feature: usize,
    impurity: f64,
) -> Option<Split> {
    let n = index.len();
    let (total, total_sq) = index
        .iter()
        .map(|&i| target[i])
        .fold((0.0, 0.0), |(s, q), y| (s + y, q + y * y));

    let mut left_len = 0;
    let mut left = 0.0;
    let mut left_sq = 0.0;
    let mut best: Option<Split> = None;
    for (pos, threshold) in thresholds(rows, index, feature) {
        for &i in &index[left_len..pos] {
            left += target[i];
            left_sq += target[i] * target[i];
        }
        left_len = pos;

        let sse_l = sum_of_squares(left, left_sq, left_len);
        let sse_r = sum_of_squares(total - left, total_sq - left_sq, n - left_len);
        let information_gain = impurity - (sse_l + sse_r) / n as f64;
        if best
            .as_ref()
            .map_or(true, |b| b.information_gain < information_gain)
        {
            best = Some(Split {
                information_gain,
                feature,
                threshold,
                pos,
            });
        }
    }
    best
}

// Sum of squared deviations from the mean, from the sum and sum of squares.
fn sum_of_squares(sum: f64, sum_sq: f64, n: usize) -> f64 {
    (sum_sq - sum * sum / n as f64).max(0.0)
}

// Midpoints between consecutive distinct values of `feature`, paired with the
// split position in `index`. Assumes `index` is sorted by that feature.
fn thresholds<'a>(
    rows: &'a [&'a [f64]],
    index: &'a [usize],
    feature: usize,
) -> impl 'a + Iterator<Item = (usize, f64)> {
    index
        .iter()
        .map(move |&i| rows[i][feature])
        .enumerate()
        .tuple_windows()
        .filter(|((_, a), (_, b))| a != b)
        .map(|((_, a), (pos, b))| (pos, (a + b) / 2.0))
}

fn is_single(target: &[f64], index: &[usize]) -> bool {
    let x = target[index[0]];
    index.iter().skip(1).all(|&i| target[i] == x)
}

#[derive(Debug)]
struct Children {
    feature: usize,
    threshold: f64,
    left: Box<Node>,
    right: Box<Node>,
}

#[derive(Debug)]
struct Node {
    label: f64,
    children: Option<Children>,
}

impl Node {
    fn new(label: f64) -> Self {
        Self {
            label,
            children: None,
        }
    }

    fn predict(&self, xs: &[f64]) -> f64 {
        if let Some(children) = &self.children {
            if xs[children.feature] <= children.threshold {
                children.left.predict(xs)
            } else {
                children.right.predict(xs)
            }
        } else {
            self.label
        }
    }

    fn depth(&self) -> usize {
        self.children
            .as_ref()
            .map_or(0, |c| 1 + c.left.depth().max(c.right.depth()))
    }
}

#[derive(Debug)]
pub struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl Predictor for DecisionTree {
    type Target = f64;

    fn predict(&self, data: &[&[f64]]) -> Vec<f64> {
        data.iter().map(|xs| self.root.predict(xs)).collect()
    }
}
