use anyhow::Result;
use opencausal::{indexset, union, IndexSet};
use serde_json::json;

#[test]
fn union_with_empty_is_identity() -> Result<()> {
    let x = indexset! { x: [0, 1], y: [2] };
    assert_eq!(union([&IndexSet::new(), &x]), x);
    assert_eq!(union([&x, &IndexSet::new()]), x);
    assert_eq!(union(std::iter::empty::<&IndexSet>()), IndexSet::new());
    Ok(())
}

#[test]
fn union_is_idempotent() -> Result<()> {
    let x = indexset! { x: [0, 1], y: [2] };
    assert_eq!(union([&x, &x]), x);
    assert_eq!(x.union(&x), x);
    Ok(())
}

#[test]
fn union_is_commutative_and_associative() -> Result<()> {
    let a = indexset! { x: [0], y: [1] };
    let b = indexset! { x: [1], z: [0, 2] };
    let c = indexset! { y: [0], z: [1] };
    assert_eq!(a.union(&b), b.union(&a));
    assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));
    assert_eq!(
        union([&a, &b, &c]),
        indexset! { x: [0, 1], y: [0, 1], z: [0, 1, 2] }
    );
    Ok(())
}

#[test]
fn empty_selections_are_dropped() -> Result<()> {
    let ix = IndexSet::from_pairs(vec![("x", Vec::<usize>::new()), ("y", vec![3])]);
    assert!(!ix.contains("x"));
    assert_eq!(ix, indexset! { y: [3] });
    assert_eq!(ix.len(), 1);
    Ok(())
}

#[test]
fn repeated_names_merge() -> Result<()> {
    let ix = IndexSet::from_pairs(vec![("x", vec![2, 0]), ("x", vec![1])]);
    let values: Vec<usize> = ix.get("x").into_iter().flatten().copied().collect();
    assert_eq!(values, vec![0, 1, 2]);
    Ok(())
}

#[test]
fn regions_are_disjoint_when_one_world_separates_them() -> Result<()> {
    let a = indexset! { x: [0], y: [0] };
    let b = indexset! { x: [0], y: [1] };
    let c = indexset! { y: [0, 2] };
    assert!(a.is_disjoint(&b));
    assert!(b.is_disjoint(&c));
    // c broadcasts over x, so it meets a at y=0.
    assert!(!a.is_disjoint(&c));
    assert!(!a.is_disjoint(&IndexSet::new()));
    Ok(())
}

#[test]
fn serializes_as_plain_mapping() -> Result<()> {
    let ix = indexset! { "cf": [1], "x": [0, 2] };
    assert_eq!(serde_json::to_value(&ix)?, json!({ "cf": [1], "x": [0, 2] }));
    Ok(())
}
