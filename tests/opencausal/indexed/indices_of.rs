use std::sync::Arc;

use anyhow::{anyhow, Result};
use opencausal::indexed::indices_of_shape;
use opencausal::{
    add_indices, indexset, indices_of, IndexError, IndexOptions, IndexPlates, IndexSet, Normal,
    Value,
};

use crate::common;

#[test]
fn singleton_axes_name_no_worlds() -> Result<()> {
    let _plates = IndexPlates::new().enter()?;
    add_indices(&indexset! { x: [0, 1], y: [0, 1, 2], z: [0] })?;
    let value = Value::Tensor(common::tensor_f64(vec![1.0], &[1, 1, 1, 1, 1, 1, 1])?);
    assert_eq!(indices_of(&value, &IndexOptions::default())?, IndexSet::new());
    Ok(())
}

#[test]
fn axes_longer_than_one_name_every_world() -> Result<()> {
    let opts = IndexOptions::default().with_name_to_dim([("x", -1), ("y", -3)]);
    let ix = indices_of_shape(&[3, 1, 2], &opts)?;
    assert_eq!(ix, indexset! { x: [0, 1], y: [0, 1, 2] });
    Ok(())
}

#[test]
fn event_axes_are_skipped() -> Result<()> {
    let opts = IndexOptions::event_dim(1).with_name_to_dim([("x", -1)]);
    let ix = indices_of(&Value::Shape(vec![2, 3]), &opts)?;
    assert_eq!(ix, indexset! { x: [0, 1] });
    Ok(())
}

#[test]
fn registry_supplies_dims_by_default() -> Result<()> {
    let _plates = IndexPlates::new().enter()?;
    add_indices(&indexset! { x: [0, 1] })?;
    let value = Value::Tensor(common::tensor_f64(vec![0.0; 6], &[2, 1, 1, 1, 3])?);
    assert_eq!(
        indices_of(&value, &IndexOptions::default())?,
        indexset! { x: [0, 1] }
    );
    Ok(())
}

#[test]
fn integer_tuple_is_read_as_shape() -> Result<()> {
    let opts = IndexOptions::default().with_name_to_dim([("x", -2)]);
    let value = Value::Tuple(vec![Value::Int(2), Value::Int(1)]);
    assert_eq!(indices_of(&value, &opts)?, indexset! { x: [0, 1] });
    Ok(())
}

#[test]
fn mixed_tuple_unions_its_items() -> Result<()> {
    let opts = IndexOptions::default().with_name_to_dim([("x", -1), ("y", -2)]);
    let value = Value::Tuple(vec![
        Value::Tensor(common::tensor_f64(vec![0.0; 2], &[2])?),
        Value::Tensor(common::tensor_f64(vec![0.0; 3], &[3, 1])?),
        Value::None,
    ]);
    assert_eq!(
        indices_of(&value, &opts)?,
        indexset! { x: [0, 1], y: [0, 1, 2] }
    );
    Ok(())
}

#[test]
fn distribution_reads_batch_shape() -> Result<()> {
    let loc = common::tensor_f64(vec![0.0, 1.0], &[2, 1])?;
    let dist = Normal::new(loc, 1.0)?;
    let opts = IndexOptions::event_dim(3).with_name_to_dim([("x", -2)]);
    let ix = indices_of(&Value::Distribution(Arc::new(dist)), &opts)?;
    assert_eq!(ix, indexset! { x: [0, 1] });
    Ok(())
}

#[test]
fn scalars_have_no_worlds() -> Result<()> {
    let opts = IndexOptions::default();
    assert_eq!(indices_of(&Value::Float(1.5), &opts)?, IndexSet::new());
    assert_eq!(indices_of(&Value::Bool(true), &opts)?, IndexSet::new());
    assert_eq!(indices_of(&Value::None, &opts)?, IndexSet::new());
    Ok(())
}

#[test]
fn scalar_with_event_dim_is_rejected() -> Result<()> {
    let err = indices_of(&Value::Int(3), &IndexOptions::event_dim(1))
        .err()
        .ok_or_else(|| anyhow!("expected an error"))?;
    assert!(matches!(
        err.downcast_ref::<IndexError>(),
        Some(IndexError::InvalidArgument(_))
    ));
    Ok(())
}

#[test]
fn partitioned_value_is_unsupported() -> Result<()> {
    let mut parts = std::collections::BTreeMap::new();
    parts.insert(indexset! { x: [0] }, Value::Float(1.0));
    let err = indices_of(&Value::Partitioned(parts), &IndexOptions::default())
        .err()
        .ok_or_else(|| anyhow!("expected an error"))?;
    assert_eq!(
        err.downcast_ref::<IndexError>(),
        Some(&IndexError::Unsupported {
            op: "indices_of",
            kind: "partitioned"
        })
    );
    Ok(())
}

#[test]
fn non_negative_dims_are_rejected() -> Result<()> {
    let opts = IndexOptions::default().with_name_to_dim([("x", 0)]);
    let err = indices_of_shape(&[2], &opts)
        .err()
        .ok_or_else(|| anyhow!("expected an error"))?;
    assert!(matches!(
        err.downcast_ref::<IndexError>(),
        Some(IndexError::InvalidArgument(_))
    ));
    Ok(())
}
