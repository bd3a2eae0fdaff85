//! Closure-backed sorters for callers that do not want a dedicated type.

use std::convert::Infallible;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::relation::Relation;
use crate::sort::{Sorted, TopologicalSort, into_ok};

/// Which way a relation closure points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The closure returns the keys that require the given key.
    Requirements,
    /// The closure returns the keys the given key depends on.
    Dependencies,
}

/// A [`TopologicalSort`] built from a key closure and one relation closure.
pub struct FnSort<T, K, F, R> {
    key_of: F,
    relation: R,
    direction: Direction,
    _marker: PhantomData<fn(&T) -> K>,
}

impl<T, K, F, R> FnSort<T, K, F, R>
where
    K: Clone + Eq + Hash + Debug,
    F: Fn(&T) -> Option<K>,
    R: Fn(&K) -> Vec<K>,
{
    /// `relation` lists the keys that must come after its argument.
    pub fn by_requirements(key_of: F, relation: R) -> Self {
        Self::new(key_of, relation, Direction::Requirements)
    }

    /// `relation` lists the keys that must come before its argument.
    pub fn by_dependencies(key_of: F, relation: R) -> Self {
        Self::new(key_of, relation, Direction::Dependencies)
    }

    pub fn new(key_of: F, relation: R, direction: Direction) -> Self {
        Self {
            key_of,
            relation,
            direction,
            _marker: PhantomData,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn answer(&self, key: &K, asked: Direction) -> Relation<K> {
        if asked == self.direction {
            Relation::Listed((self.relation)(key))
        } else {
            Relation::Inverse
        }
    }
}

impl<T, K, F, R> TopologicalSort for FnSort<T, K, F, R>
where
    K: Clone + Eq + Hash + Debug,
    F: Fn(&T) -> Option<K>,
    R: Fn(&K) -> Vec<K>,
{
    type Item = T;
    type Key = K;
    type Error = Infallible;

    fn key_of(&self, item: &T) -> Result<Option<K>, Infallible> {
        Ok((self.key_of)(item))
    }

    fn requirements(&self, key: &K) -> Result<Relation<K>, Infallible> {
        Ok(self.answer(key, Direction::Requirements))
    }

    fn dependencies(&self, key: &K) -> Result<Relation<K>, Infallible> {
        Ok(self.answer(key, Direction::Dependencies))
    }
}

/// Sort `items` given, per key, the keys that require it.
pub fn sort_by_requirements<T, K, F, R>(items: Vec<T>, key_of: F, requirers: R) -> Sorted<T, K>
where
    K: Clone + Eq + Hash + Debug,
    F: Fn(&T) -> Option<K>,
    R: Fn(&K) -> Vec<K>,
{
    into_ok(FnSort::by_requirements(key_of, requirers).sort(items))
}

/// Sort `items` given, per key, the keys it depends on.
pub fn sort_by_dependencies<T, K, F, R>(items: Vec<T>, key_of: F, providers: R) -> Sorted<T, K>
where
    K: Clone + Eq + Hash + Debug,
    F: Fn(&T) -> Option<K>,
    R: Fn(&K) -> Vec<K>,
{
    into_ok(FnSort::by_dependencies(key_of, providers).sort(items))
}
