use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use opencausal::{
    add_indices, gather, get_index_plates, indexset, scatter, scatter_partitioned, DType,
    IndexError, IndexOptions, IndexPlates, Random, TensorValue, Value,
};

use crate::common;

#[test]
fn gather_inverts_scatter() -> Result<()> {
    let _plates = IndexPlates::new().enter()?;
    add_indices(&indexset! { x: [0, 1, 2] })?;
    let opts = IndexOptions::default();

    let mut rng = Random::<f64>::with_seed(7);
    for world in 0..3usize {
        let v = TensorValue::from(rng.next((-1.0, 1.0), &[4])?);
        let ix = opencausal::IndexSet::from_pairs(vec![("x", vec![world])]);
        let merged = scatter(&Value::Tensor(v.clone()), &ix, None, &opts)?;
        assert_eq!(merged.shape(), &[3, 1, 1, 1, 4]);

        let back = gather(&Value::Tensor(merged), &ix, &opts)?;
        let back = back.as_tensor().ok_or_else(|| anyhow!("not a tensor"))?;
        assert_eq!(back.shape(), &[1, 1, 1, 1, 4]);
        assert_eq!(common::f64_data(back)?, common::f64_data(&v)?);
    }
    Ok(())
}

#[test]
fn scatter_zero_fills_other_worlds() -> Result<()> {
    let _plates = IndexPlates::new().enter()?;
    add_indices(&indexset! { x: [0, 1, 2] })?;
    let v = common::tensor_f64(vec![5.0, 6.0], &[2])?;
    let merged = scatter(
        &Value::Tensor(v),
        &indexset! { x: [1] },
        None,
        &IndexOptions::default(),
    )?;
    assert_eq!(
        common::f64_data(&merged)?,
        vec![0.0, 0.0, 5.0, 6.0, 0.0, 0.0]
    );
    Ok(())
}

#[test]
fn scatter_places_worlds_left_of_event_axes() -> Result<()> {
    let _plates = IndexPlates::new().enter()?;
    add_indices(&indexset! { x: [0, 1] })?;
    let v = common::tensor_f64(vec![7.0, 8.0], &[2])?;
    let merged = scatter(
        &Value::Tensor(v),
        &indexset! { x: [1] },
        None,
        &IndexOptions::event_dim(1),
    )?;
    assert_eq!(merged.shape(), &[2, 1, 1, 1, 1, 2]);
    assert_eq!(common::f64_data(&merged)?, vec![0.0, 0.0, 7.0, 8.0]);
    Ok(())
}

#[test]
fn partitioned_scatter_covers_every_world() -> Result<()> {
    let _plates = IndexPlates::new().enter()?;
    let mut parts = BTreeMap::new();
    parts.insert(indexset! { x: [0] }, Value::Float(1.0));
    parts.insert(indexset! { x: [1] }, Value::Float(2.0));

    let merged = scatter_partitioned(&parts, None, &IndexOptions::default())?;
    assert_eq!(merged.shape(), &[2, 1, 1, 1, 1]);
    assert_eq!(common::f64_data(&merged)?, vec![1.0, 2.0]);

    // The union of the keys was registered before merging.
    let plates = get_index_plates();
    assert_eq!(plates.get("x").map(|plate| plate.size), Some(2));
    Ok(())
}

#[test]
fn partitioned_scatter_over_two_worlds() -> Result<()> {
    let _plates = IndexPlates::new().enter()?;
    let mut parts = BTreeMap::new();
    parts.insert(indexset! { x: [0], y: [0] }, Value::Float(1.0));
    parts.insert(indexset! { x: [0], y: [1] }, Value::Float(2.0));
    parts.insert(indexset! { x: [1], y: [0] }, Value::Float(3.0));
    parts.insert(indexset! { x: [1], y: [1] }, Value::Float(4.0));

    let merged = scatter_partitioned(&parts, None, &IndexOptions::default())?;
    // y is allocated after x, one dim further left.
    assert_eq!(merged.shape(), &[2, 2, 1, 1, 1, 1]);
    assert_eq!(common::f64_data(&merged)?, vec![1.0, 3.0, 2.0, 4.0]);
    Ok(())
}

#[test]
fn partial_coverage_keeps_zero_fill() -> Result<()> {
    let _plates = IndexPlates::new().enter()?;
    add_indices(&indexset! { x: [0, 1, 2] })?;
    let mut parts = BTreeMap::new();
    parts.insert(indexset! { x: [0] }, Value::Float(1.0));
    parts.insert(indexset! { x: [2] }, Value::Float(3.0));

    let merged = scatter_partitioned(&parts, None, &IndexOptions::default())?;
    assert_eq!(common::f64_data(&merged)?, vec![1.0, 0.0, 3.0]);
    Ok(())
}

#[test]
fn empty_partition_map_is_rejected() -> Result<()> {
    let _plates = IndexPlates::new().enter()?;
    let parts: BTreeMap<opencausal::IndexSet, Value> = BTreeMap::new();
    let err = scatter_partitioned(&parts, None, &IndexOptions::default())
        .err()
        .ok_or_else(|| anyhow!("expected an error"))?;
    assert!(matches!(
        err.downcast_ref::<IndexError>(),
        Some(IndexError::Precondition(_))
    ));
    assert!(get_index_plates().is_empty());
    Ok(())
}

#[test]
fn scatter_into_mismatched_result_fails() -> Result<()> {
    let _plates = IndexPlates::new().enter()?;
    add_indices(&indexset! { x: [0, 1] })?;
    let result = TensorValue::zeros(DType::I64, &[2, 1, 1, 1, 1], Default::default());
    let err = scatter(
        &Value::Float(1.0),
        &indexset! { x: [0] },
        Some(result),
        &IndexOptions::default(),
    )
    .err()
    .ok_or_else(|| anyhow!("expected an error"))?;
    assert!(matches!(
        err.downcast_ref::<IndexError>(),
        Some(IndexError::InvalidArgument(_))
    ));
    Ok(())
}

#[test]
fn scatter_without_registered_world_fails() -> Result<()> {
    let err = scatter(
        &Value::Float(1.0),
        &indexset! { x: [0] },
        None,
        &IndexOptions::default().with_name_to_dim([("x", -1)]),
    )
    .err()
    .ok_or_else(|| anyhow!("expected an error"))?;
    assert_eq!(
        err.downcast_ref::<IndexError>(),
        Some(&IndexError::UnknownName("x".to_string()))
    );
    Ok(())
}

#[test]
fn partition_order_does_not_change_the_merge() -> Result<()> {
    let _plates = IndexPlates::new().enter()?;
    add_indices(&indexset! { x: [0, 1, 2] })?;
    let opts = IndexOptions::default();
    let parts = [
        (indexset! { x: [2] }, Value::Float(3.0)),
        (indexset! { x: [0] }, Value::Float(1.0)),
        (indexset! { x: [1] }, Value::Float(2.0)),
    ];

    let mut forward = None;
    for (indices, value) in parts.iter() {
        forward = Some(scatter(value, indices, forward, &opts)?);
    }
    let mut backward = None;
    for (indices, value) in parts.iter().rev() {
        backward = Some(scatter(value, indices, backward, &opts)?);
    }
    let forward = forward.ok_or_else(|| anyhow!("no partitions"))?;
    let backward = backward.ok_or_else(|| anyhow!("no partitions"))?;
    common::assert_tensor_eq(&forward, &backward)?;

    let merged = scatter_partitioned(&parts.into_iter().collect(), None, &opts)?;
    common::assert_tensor_eq(&merged, &forward)?;
    assert_eq!(common::f64_data(&merged)?, vec![1.0, 2.0, 3.0]);
    Ok(())
}

#[test]
fn scatter_rejects_scalar_with_event_dim() -> Result<()> {
    let _plates = IndexPlates::new().enter()?;
    add_indices(&indexset! { x: [0, 1] })?;
    let err = scatter(
        &Value::Float(1.0),
        &indexset! { x: [0] },
        None,
        &IndexOptions::event_dim(1),
    )
    .err()
    .ok_or_else(|| anyhow!("expected an error"))?;
    assert!(matches!(
        err.downcast_ref::<IndexError>(),
        Some(IndexError::InvalidArgument(_))
    ));
    Ok(())
}
