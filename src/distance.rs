use crate::{ComputeError, CostModel, Decomposed, Orientation, Tree};
use itertools::iproduct;

fn checked(operation: &'static str, cost: f64) -> Result<f64, ComputeError> {
    if cost.is_finite() && cost >= 0.0 {
        Ok(cost)
    } else {
        Err(ComputeError::InvalidCost { operation, cost })
    }
}

/// Finds the cost of the lowest cost sequence of edits that transforms one
/// [Tree] into the other.
///
/// Edits delete a node (splicing its children into its place), insert a node,
/// or rename a node's payload; sibling order is preserved, so alignments never
/// cross. Costs come from `model` and must be finite and non-negative.
///
/// Both trees are read in whichever shared direction promises the smaller
/// alignment table. Mirroring both trees preserves every ordered mapping, so
/// the distance does not depend on the choice.
pub fn edit_distance<C: CostModel>(a: &Tree, b: &Tree, model: &C) -> Result<f64, ComputeError> {
    if a.is_empty() && b.is_empty() {
        return Ok(0.0);
    } else if a.is_empty() {
        return b
            .postorder()
            .map(|node| checked("insert", model.insert(node)))
            .sum();
    } else if b.is_empty() {
        return a
            .postorder()
            .map(|node| checked("delete", model.delete(node)))
            .sum();
    }

    let ltr = (
        Decomposed::new(a, Orientation::LeftToRight),
        Decomposed::new(b, Orientation::LeftToRight),
    );

    let rtl = (
        Decomposed::new(a, Orientation::RightToLeft),
        Decomposed::new(b, Orientation::RightToLeft),
    );

    let (da, db) = if (rtl.0.work() as u128) * (rtl.1.work() as u128)
        < (ltr.0.work() as u128) * (ltr.1.work() as u128)
    {
        rtl
    } else {
        ltr
    };

    let n = da.len();
    let m = db.len();

    let del = da
        .nodes
        .iter()
        .map(|x| checked("delete", model.delete(x)))
        .collect::<Result<Vec<_>, _>>()?;

    let ins = db
        .nodes
        .iter()
        .map(|y| checked("insert", model.insert(y)))
        .collect::<Result<Vec<_>, _>>()?;

    let ren = iproduct!(&da.nodes, &db.nodes)
        .map(|(x, y)| checked("rename", model.rename(x, y)))
        .collect::<Result<Vec<_>, _>>()?;

    // td[x * m + y] is the distance between the subtrees at x and y, solved
    // once the keyroots enclosing x and y are reached
    let mut td = vec![f64::NAN; n * m];
    let mut fd = vec![0.0; (n + 1) * (m + 1)];

    for (&ka, &kb) in iproduct!(&da.keyroots, &db.keyroots) {
        let la = da.lld[ka];
        let lb = db.lld[kb];
        let rows = ka - la + 1;
        let cols = kb - lb + 1;
        let w = cols + 1;

        fd[0] = 0.0;

        for i in 1..=rows {
            fd[i * w] = fd[(i - 1) * w] + del[la + i - 1];
        }

        for j in 1..=cols {
            fd[j] = fd[j - 1] + ins[lb + j - 1];
        }

        for i in 1..=rows {
            let x = la + i - 1;

            for j in 1..=cols {
                let y = lb + j - 1;

                let remove = fd[(i - 1) * w + j] + del[x];
                let insert = fd[i * w + j - 1] + ins[y];

                if da.lld[x] == la && db.lld[y] == lb {
                    let rename = fd[(i - 1) * w + j - 1] + ren[x * m + y];
                    let best = remove.min(insert).min(rename);

                    fd[i * w + j] = best;
                    td[x * m + y] = best;
                } else {
                    let i0 = da.lld[x] - la;
                    let j0 = db.lld[y] - lb;
                    let sub = td[x * m + y];

                    if sub.is_nan() {
                        return Err(ComputeError::Invariant(
                            "subtree distance used before it was solved",
                        ));
                    }

                    fd[i * w + j] = remove.min(insert).min(fd[i0 * w + j0] + sub);
                }
            }
        }
    }

    let distance = td[(n - 1) * m + m - 1];

    if distance.is_finite() && distance >= 0.0 {
        Ok(distance)
    } else {
        Err(ComputeError::Invariant(
            "edit distance is not a finite non-negative number",
        ))
    }
}
