//! Simple generic replay buffer.
use super::SimpleReplayBufferConfig;
use crate::{error::LabyrinthError, ExperienceBufferBase, ReplayBufferBase};
use anyhow::Result;
use rand::{rngs::StdRng, seq::index, SeedableRng};
use std::marker::PhantomData;

/// A bounded FIFO replay buffer with uniform sampling.
///
/// Items are kept in a ring of fixed capacity. Once the ring is full, a push
/// overwrites the oldest item. Batches are sampled uniformly at random
/// without replacement; the order of items in a batch is unspecified.
pub struct SimpleReplayBuffer<T> {
    capacity: usize,
    i: usize,
    items: Vec<T>,
    rng: StdRng,
}

impl<T> SimpleReplayBuffer<T> {
    /// Returns an iterator over the stored items, in unspecified order.
    pub fn iter(&self) -> std::slice::Iter<T> {
        self.items.iter()
    }
}

impl<T> ExperienceBufferBase for SimpleReplayBuffer<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn push(&mut self, tr: T) -> Result<()> {
        if self.items.len() < self.capacity {
            self.items.push(tr);
        } else {
            self.items[self.i] = tr;
        }
        self.i = (self.i + 1) % self.capacity;
        Ok(())
    }
}

impl<T: Clone> ReplayBufferBase for SimpleReplayBuffer<T> {
    type Config = SimpleReplayBufferConfig;
    type Batch = Vec<T>;

    fn build(config: &Self::Config) -> Result<Self> {
        config.validate()?;
        let capacity = config.capacity;

        Ok(Self {
            capacity,
            i: 0,
            items: Vec::with_capacity(capacity),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        let available = self.items.len();
        if size > available {
            return Err(LabyrinthError::InsufficientSamples {
                requested: size,
                available,
            }
            .into());
        }

        let ixs = index::sample(&mut self.rng, available, size);
        Ok(ixs.iter().map(|ix| self.items[ix].clone()).collect())
    }
}

/// A replay buffer that discards every item.
///
/// Used with agents that learn from each transition as it is observed.
pub struct NullReplayBuffer<T> {
    phantom: PhantomData<T>,
}

impl<T> ExperienceBufferBase for NullReplayBuffer<T> {
    type Item = T;

    fn push(&mut self, _tr: T) -> Result<()> {
        Ok(())
    }

    fn len(&self) -> usize {
        0
    }
}

impl<T> ReplayBufferBase for NullReplayBuffer<T> {
    type Config = ();
    type Batch = Vec<T>;

    fn build(_config: &Self::Config) -> Result<Self> {
        Ok(Self {
            phantom: PhantomData,
        })
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        Err(LabyrinthError::InsufficientSamples {
            requested: size,
            available: 0,
        }
        .into())
    }
}
