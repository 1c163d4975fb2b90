use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use opencausal::{
    add_indices, indexset, indexset_as_mask, Device, IndexError, IndexPlates, MaskOptions,
};

fn sizes(entries: &[(&str, isize, usize)]) -> Option<BTreeMap<String, (isize, usize)>> {
    Some(
        entries
            .iter()
            .map(|(name, dim, size)| (name.to_string(), (*dim, *size)))
            .collect(),
    )
}

#[test]
fn mask_marks_selected_worlds() -> Result<()> {
    let opts = MaskOptions {
        name_to_dim_size: sizes(&[("x", -1, 3)]),
        ..MaskOptions::default()
    };
    let mask = indexset_as_mask(&indexset! { x: [0, 2] }, &opts)?;
    assert_eq!(mask.shape(), &[3]);
    assert_eq!(mask.data, vec![true, false, true]);
    Ok(())
}

#[test]
fn unnamed_worlds_stay_broadcastable() -> Result<()> {
    let opts = MaskOptions {
        name_to_dim_size: sizes(&[("x", -1, 2), ("y", -2, 3)]),
        ..MaskOptions::default()
    };
    let mask = indexset_as_mask(&indexset! { y: [1] }, &opts)?;
    assert_eq!(mask.shape(), &[3, 1]);
    assert_eq!(mask.data, vec![false, true, false]);
    Ok(())
}

#[test]
fn mask_appends_event_axes() -> Result<()> {
    let opts = MaskOptions {
        event_dim: 2,
        name_to_dim_size: sizes(&[("x", -1, 2)]),
        device: Device::Vulkan,
    };
    let mask = indexset_as_mask(&indexset! { x: [1] }, &opts)?;
    assert_eq!(mask.shape(), &[2, 1, 1]);
    assert_eq!(mask.device(), Device::Vulkan);
    assert_eq!(mask.data, vec![false, true]);
    Ok(())
}

#[test]
fn mask_reads_registered_plates() -> Result<()> {
    let _plates = IndexPlates::new().enter()?;
    add_indices(&indexset! { x: [0, 1] })?;
    let mask = indexset_as_mask(&indexset! { x: [1] }, &MaskOptions::default())?;
    assert_eq!(mask.shape(), &[2, 1, 1, 1, 1]);
    assert_eq!(mask.data, vec![false, true]);
    Ok(())
}

#[test]
fn mask_for_unknown_world_fails() -> Result<()> {
    let opts = MaskOptions {
        name_to_dim_size: sizes(&[("x", -1, 2)]),
        ..MaskOptions::default()
    };
    let err = indexset_as_mask(&indexset! { z: [0] }, &opts)
        .err()
        .ok_or_else(|| anyhow!("expected an error"))?;
    assert_eq!(
        err.downcast_ref::<IndexError>(),
        Some(&IndexError::UnknownName("z".to_string()))
    );
    Ok(())
}
