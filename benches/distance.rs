use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use itertools::Itertools;
use treedist::{edit_distance, AttributeCostModel, Attributes, Tree, TreeNode};

fn tree(leaves: Vec<TreeNode>, r: usize) -> TreeNode {
    if leaves.len() < r {
        TreeNode::with_children(Attributes::new(), leaves)
    } else {
        let chunks = (leaves.len() + r - 1) / r;
        let children = leaves
            .into_iter()
            .chunks(chunks)
            .into_iter()
            .map(|c| tree(c.collect(), r))
            .collect();

        TreeNode::with_children(Attributes::new(), children)
    }
}

fn bench(c: &mut Criterion) {
    let model = AttributeCostModel::default();

    let mut group = c.benchmark_group("n-tree distance");
    for r in [4, 8, 16] {
        let leaves = vec![TreeNode::new(Attributes::new()); 100];
        group.bench_with_input(
            BenchmarkId::from_parameter(r),
            &Tree::new(tree(leaves, r)),
            |b, t| b.iter(|| edit_distance(t, t, &model)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
