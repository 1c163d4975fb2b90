use std::marker::PhantomData;

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::tensor::{numel, Device, Tensor, TensorOptions};

/// Seeded generator of uniformly filled tensors.
pub struct Random<T> {
    rng: StdRng,
    _marker: PhantomData<T>,
}

impl<T> Random<T>
where
    T: RandomValue,
{
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            _marker: PhantomData,
        }
    }

    pub fn next(&mut self, range: (T, T), shape: &[usize]) -> Result<Tensor<T>> {
        generate_with_rng::<T>(&mut self.rng, range, shape)
    }
}

fn generate_with_rng<T: RandomValue>(
    rng: &mut StdRng,
    range: (T, T),
    shape: &[usize],
) -> Result<Tensor<T>> {
    if !T::valid_range(range) {
        return Err(anyhow!("random tensor range must satisfy low <= high"));
    }
    let len = numel(shape);
    let mut data = Vec::with_capacity(len);
    for _ in 0..len {
        data.push(T::sample(rng, range));
    }
    Tensor::from_vec_with_opts(
        data,
        TensorOptions {
            shape: Some(shape.to_vec()),
            device: Device::Cpu,
        },
    )
}

pub trait RandomValue: Sized + Copy {
    fn sample(rng: &mut StdRng, range: (Self, Self)) -> Self;
    fn valid_range(range: (Self, Self)) -> bool;
}

macro_rules! impl_random_value {
    ($($ty:ty),+ $(,)?) => {
        $(impl RandomValue for $ty {
            fn sample(rng: &mut StdRng, range: (Self, Self)) -> Self {
                rng.gen_range(range.0..=range.1)
            }

            fn valid_range(range: (Self, Self)) -> bool {
                range.0 <= range.1
            }
        })+
    };
}

impl_random_value!(f32, f64, i64);

impl RandomValue for bool {
    fn sample(rng: &mut StdRng, range: (Self, Self)) -> Self {
        if range.0 == range.1 {
            range.0
        } else {
            rng.gen::<bool>()
        }
    }

    fn valid_range(_range: (Self, Self)) -> bool {
        true
    }
}
