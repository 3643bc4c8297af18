use indexmap::IndexMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Holds one eagerly generated value per key, so that a randomly drawn value for e.g. a room type
/// stays the same for every lookup made while synthesising a single building.
///
/// Keys are evaluated in the order given, which keeps draws from a seeded random source
/// reproducible.
#[derive(Clone, Debug)]
pub struct ValuePerKeyCache<K: Eq + Hash, T> {
    values: IndexMap<K, T>,
}

impl<K, T> ValuePerKeyCache<K, T>
where
    K: Copy + Debug + Eq + Hash,
{
    pub fn new(keys: impl IntoIterator<Item = K>, mut generator: impl FnMut(K) -> T) -> Self {
        Self {
            values: keys.into_iter().map(|key| (key, generator(key))).collect(),
        }
    }

    /// As `new`, but for generators that can fail; the first failure aborts construction.
    pub fn try_new<E>(
        keys: impl IntoIterator<Item = K>,
        mut generator: impl FnMut(K) -> Result<T, E>,
    ) -> Result<Self, E> {
        let values = keys
            .into_iter()
            .map(|key| Ok((key, generator(key)?)))
            .collect::<Result<IndexMap<_, _>, E>>()?;

        Ok(Self { values })
    }

    pub fn lookup(&self, key: K) -> Result<&T, CacheLookupError> {
        self.values
            .get(&key)
            .ok_or_else(|| CacheLookupError(format!("{key:?}")))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.values.keys()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("No value was cached for key {0}")]
pub struct CacheLookupError(String);
