//! Path-dependent TreeSHAP
//!
//! Exact Shapley values for a single tree in O(leaves * depth^2), following
//! Lundberg et al., "Consistent Individualized Feature Attribution for Tree
//! Ensembles" (Algorithm 2). Features absent from a path are integrated out
//! using the training cover recorded on each node.

use super::tree::{Node, Tree};

/// Marker for the root element of the path, which belongs to no feature
const NO_FEATURE: usize = usize::MAX;

/// A cover fraction of zero on both sides of a split makes the weights undefined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DegenerateCover;

#[derive(Debug, Clone, Copy)]
struct PathElement {
    feature: usize,
    zero_fraction: f64,
    one_fraction: f64,
    pweight: f64,
}

impl Default for PathElement {
    fn default() -> Self {
        Self {
            feature: NO_FEATURE,
            zero_fraction: 0.0,
            one_fraction: 0.0,
            pweight: 0.0,
        }
    }
}

/// Add this tree's contributions for `x` into `phi` (one slot per feature)
pub(crate) fn accumulate(tree: &Tree, x: &[f64], phi: &mut [f64]) -> Result<(), DegenerateCover> {
    recurse(tree, 0, x, phi, &[], 0, 1.0, 1.0, NO_FEATURE)
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    tree: &Tree,
    index: usize,
    x: &[f64],
    phi: &mut [f64],
    parent_path: &[PathElement],
    mut depth: usize,
    zero_fraction: f64,
    one_fraction: f64,
    feature: usize,
) -> Result<(), DegenerateCover> {
    let mut path = parent_path[..depth].to_vec();
    path.resize(depth + 1, PathElement::default());
    extend(&mut path, depth, zero_fraction, one_fraction, feature);

    match &tree.nodes[index] {
        Node::Leaf { value, .. } => {
            for i in 1..=depth {
                let weight = unwound_sum(&path, depth, i)?;
                let element = path[i];
                phi[element.feature] +=
                    weight * (element.one_fraction - element.zero_fraction) * *value;
            }
            Ok(())
        }
        Node::Split {
            feature: split_feature,
            left,
            right,
            cover,
            ..
        } => {
            let hot = tree.next(index, x);
            let cold = if hot == *left { *right } else { *left };
            let hot_zero = tree.nodes[hot].cover() / *cover;
            let cold_zero = tree.nodes[cold].cover() / *cover;

            let mut incoming_zero = 1.0;
            let mut incoming_one = 1.0;

            // A feature seen earlier on the path is folded into a single element
            if let Some(seen) = (1..=depth).find(|&i| path[i].feature == *split_feature) {
                incoming_zero = path[seen].zero_fraction;
                incoming_one = path[seen].one_fraction;
                unwind(&mut path, depth, seen)?;
                depth -= 1;
            }

            recurse(
                tree,
                hot,
                x,
                phi,
                &path,
                depth + 1,
                hot_zero * incoming_zero,
                incoming_one,
                *split_feature,
            )?;
            recurse(
                tree,
                cold,
                x,
                phi,
                &path,
                depth + 1,
                cold_zero * incoming_zero,
                0.0,
                *split_feature,
            )
        }
    }
}

fn extend(
    path: &mut [PathElement],
    depth: usize,
    zero_fraction: f64,
    one_fraction: f64,
    feature: usize,
) {
    path[depth] = PathElement {
        feature,
        zero_fraction,
        one_fraction,
        pweight: if depth == 0 { 1.0 } else { 0.0 },
    };
    let scale = (depth + 1) as f64;
    for i in (0..depth).rev() {
        path[i + 1].pweight += one_fraction * path[i].pweight * (i + 1) as f64 / scale;
        path[i].pweight = zero_fraction * path[i].pweight * (depth - i) as f64 / scale;
    }
}

fn unwind(path: &mut [PathElement], depth: usize, index: usize) -> Result<(), DegenerateCover> {
    let one_fraction = path[index].one_fraction;
    let zero_fraction = path[index].zero_fraction;
    let scale = (depth + 1) as f64;
    let mut next_one_portion = path[depth].pweight;

    for i in (0..depth).rev() {
        if one_fraction != 0.0 {
            let previous = path[i].pweight;
            path[i].pweight = next_one_portion * scale / ((i + 1) as f64 * one_fraction);
            next_one_portion =
                previous - path[i].pweight * zero_fraction * (depth - i) as f64 / scale;
        } else if zero_fraction != 0.0 {
            path[i].pweight = path[i].pweight * scale / (zero_fraction * (depth - i) as f64);
        } else {
            return Err(DegenerateCover);
        }
    }

    for i in index..depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }
    Ok(())
}

/// Total permutation weight of the path with element `index` removed
fn unwound_sum(path: &[PathElement], depth: usize, index: usize) -> Result<f64, DegenerateCover> {
    let one_fraction = path[index].one_fraction;
    let zero_fraction = path[index].zero_fraction;
    let scale = (depth + 1) as f64;
    let mut next_one_portion = path[depth].pweight;
    let mut total = 0.0;

    for i in (0..depth).rev() {
        if one_fraction != 0.0 {
            let portion = next_one_portion * scale / ((i + 1) as f64 * one_fraction);
            total += portion;
            next_one_portion =
                path[i].pweight - portion * zero_fraction * ((depth - i) as f64 / scale);
        } else if zero_fraction != 0.0 {
            total += (path[i].pweight / zero_fraction) / ((depth - i) as f64 / scale);
        } else if path[i].pweight != 0.0 {
            return Err(DegenerateCover);
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Value of the tree when only features in `known` are observed
    fn conditional_expectation(tree: &Tree, index: usize, x: &[f64], known: &[bool]) -> f64 {
        match &tree.nodes[index] {
            Node::Leaf { value, .. } => *value,
            Node::Split {
                feature,
                left,
                right,
                cover,
                ..
            } => {
                if known[*feature] {
                    conditional_expectation(tree, tree.next(index, x), x, known)
                } else {
                    let l = tree.nodes[*left].cover();
                    let r = tree.nodes[*right].cover();
                    (l * conditional_expectation(tree, *left, x, known)
                        + r * conditional_expectation(tree, *right, x, known))
                        / *cover
                }
            }
        }
    }

    fn factorial(n: usize) -> f64 {
        (1..=n).map(|v| v as f64).product()
    }

    /// Shapley values by enumerating every coalition
    fn brute_force(tree: &Tree, x: &[f64]) -> Vec<f64> {
        let m = x.len();
        let mut phi = vec![0.0; m];
        for feature in 0..m {
            for mask in 0..(1u32 << m) {
                if mask & (1 << feature) != 0 {
                    continue;
                }
                let size = mask.count_ones() as usize;
                let weight = factorial(size) * factorial(m - size - 1) / factorial(m);
                let mut known: Vec<bool> = (0..m).map(|j| mask & (1 << j) != 0).collect();
                let without = conditional_expectation(tree, 0, x, &known);
                known[feature] = true;
                let with = conditional_expectation(tree, 0, x, &known);
                phi[feature] += weight * (with - without);
            }
        }
        phi
    }

    /// Depth-3 tree that splits on feature 0 twice along one path
    fn repeated_feature_tree() -> Tree {
        Tree::new(
            0,
            vec![
                Node::split(0, 5.0, 1, 2, 100.0),
                Node::split(1, 2.0, 3, 4, 70.0),
                Node::split(2, 1.0, 5, 6, 30.0),
                Node::split(0, 2.0, 7, 8, 40.0),
                Node::leaf(4.0, 30.0),
                Node::leaf(-2.0, 10.0),
                Node::leaf(6.0, 20.0),
                Node::leaf(1.0, 15.0),
                Node::leaf(-3.0, 25.0),
            ],
        )
    }

    fn shap(tree: &Tree, x: &[f64]) -> Vec<f64> {
        let mut phi = vec![0.0; x.len()];
        accumulate(tree, x, &mut phi).unwrap();
        phi
    }

    #[test]
    fn test_stump_attribution() {
        let tree = Tree::new(
            0,
            vec![
                Node::split(0, 10.0, 1, 2, 100.0),
                Node::leaf(2.0, 60.0),
                Node::leaf(7.0, 40.0),
            ],
        );
        let phi = shap(&tree, &[3.0, 0.0]);
        // Left leaf minus the cover-weighted mean 0.6 * 2 + 0.4 * 7
        assert!((phi[0] - (2.0 - 4.0)).abs() < 1e-12);
        assert_eq!(phi[1], 0.0);
    }

    #[test]
    fn test_matches_brute_force_shapley() {
        let tree = repeated_feature_tree();
        for x in [
            [1.0, 0.0, 0.0],
            [3.0, 5.0, 0.0],
            [7.0, 0.0, 2.0],
            [7.0, 9.0, 0.5],
            [4.0, 1.0, 3.0],
        ] {
            let fast = shap(&tree, &x);
            let exact = brute_force(&tree, &x);
            for (a, b) in fast.iter().zip(&exact) {
                assert!((a - b).abs() < 1e-9, "x={:?} fast={:?} exact={:?}", x, fast, exact);
            }
        }
    }

    #[test]
    fn test_local_accuracy() {
        let tree = repeated_feature_tree();
        for x in [[1.0, 0.0, 0.0], [7.0, 9.0, 0.5], [4.0, 3.0, 3.0]] {
            let phi = shap(&tree, &x);
            let total: f64 = phi.iter().sum::<f64>() + tree.expected_value();
            assert!((total - tree.predict(&x)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_single_leaf_contributes_nothing() {
        let tree = Tree::new(0, vec![Node::leaf(5.0, 10.0)]);
        assert_eq!(shap(&tree, &[1.0, 2.0]), vec![0.0, 0.0]);
    }
}
