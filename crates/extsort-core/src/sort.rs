//! The topological ordering engine.
//!
//! Items are mapped to keys, keys become graph nodes, and the edges between
//! nodes are discovered lazily by asking the sorter about each node in turn.
//! Ordering follows Kahn's algorithm with one twist: instead of a plain FIFO,
//! ready nodes are taken lowest input rank first, so the output only differs
//! from the input where a dependency forces it.
//!
//! # Graph construction
//!
//! - Every distinct key among the input items is a node, ranked by its first
//!   appearance. Items sharing a key collapse onto the same node.
//! - An item without a key gets a node of its own with no edges.
//! - Any key mentioned by a relation answer that is not among the input items
//!   is added after the input nodes. It is queried like any other node, so
//!   constraints passing through it still apply, but it emits nothing.
//!
//! # Cycles
//!
//! Nodes still blocked once no node is ready sit on (or behind) a cycle. They
//! are emitted in rank order with no further constraint enforcement and their
//! keys are reported through [`Sorted::unresolved`]. A cycle never fails the
//! sort.
//!
//! **Time Complexity**: O((V + E) log V), the log factor coming from the
//! rank-ordered ready set.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::convert::Infallible;
use std::fmt::Debug;
use std::hash::Hash;

use crate::relation::Relation;

/// A source of ordering constraints between items.
///
/// Implementors provide [`key_of`](Self::key_of) and at least one of
/// [`requirements`](Self::requirements) or
/// [`dependencies`](Self::dependencies). Both relation methods default to
/// [`Relation::Inverse`].
///
/// Errors returned by any callback abort the sort and are handed back to the
/// caller of [`sort`](Self::sort) untouched.
pub trait TopologicalSort {
    /// The values being ordered.
    type Item;
    /// The identity used for graph nodes.
    type Key: Clone + Eq + Hash + Debug;
    /// The error the callbacks may fail with.
    type Error;

    /// The key of an item, or `None` when the item has no resolvable key and
    /// is therefore unconstrained.
    fn key_of(&self, item: &Self::Item) -> Result<Option<Self::Key>, Self::Error>;

    /// Keys that require `key`, i.e. must be ordered after it.
    fn requirements(&self, _key: &Self::Key) -> Result<Relation<Self::Key>, Self::Error> {
        Ok(Relation::Inverse)
    }

    /// Keys that `key` depends on, i.e. must be ordered before it.
    fn dependencies(&self, _key: &Self::Key) -> Result<Relation<Self::Key>, Self::Error> {
        Ok(Relation::Inverse)
    }

    /// Order `items` so that every item follows the items it depends on.
    ///
    /// The result is always a permutation of `items`.
    fn sort(&self, items: Vec<Self::Item>) -> Result<Sorted<Self::Item, Self::Key>, Self::Error> {
        run(self, items)
    }
}

/// The outcome of a sort: the ordered items and the nodes that could not be
/// ordered because of a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorted<T, K> {
    items: Vec<T>,
    unresolved: Vec<K>,
}

impl<T, K> Sorted<T, K> {
    /// The ordered items.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the outcome and return the ordered items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Consume the outcome and return both the items and unresolved keys.
    pub fn into_parts(self) -> (Vec<T>, Vec<K>) {
        (self.items, self.unresolved)
    }

    /// Keys left on or behind a dependency cycle, in rank order.
    ///
    /// Empty when the dependency relation restricted to the visited nodes is
    /// acyclic.
    pub fn unresolved(&self) -> &[K] {
        &self.unresolved
    }

    /// Whether every constraint could be honoured.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T, K> IntoIterator for Sorted<T, K> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Unwrap the result of a sorter whose callbacks cannot fail.
pub fn into_ok<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

struct Node<K> {
    /// `None` for an item without a key.
    key: Option<K>,
    /// Input positions of the items on this node, ascending.
    members: Vec<usize>,
}

struct Graph<K> {
    nodes: Vec<Node<K>>,
    index: HashMap<K, usize>,
    successors: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
    edges: HashSet<(usize, usize)>,
}

impl<K: Clone + Eq + Hash + Debug> Graph<K> {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            successors: Vec::new(),
            in_degree: Vec::new(),
            edges: HashSet::new(),
        }
    }

    fn push(&mut self, key: Option<K>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            key,
            members: Vec::new(),
        });
        self.successors.push(Vec::new());
        self.in_degree.push(0);
        idx
    }

    fn node_for(&mut self, key: K) -> usize {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.push(Some(key.clone()));
        self.index.insert(key, idx);
        idx
    }

    /// `from` must be ordered before `to`.
    fn add_edge(&mut self, from: usize, to: usize) {
        if from == to || !self.edges.insert((from, to)) {
            return;
        }
        self.successors[from].push(to);
        self.in_degree[to] += 1;
    }

    fn order<T>(self, items: Vec<T>) -> Sorted<T, K> {
        let Graph {
            nodes,
            successors,
            mut in_degree,
            ..
        } = self;

        let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
        let mut output = Vec::with_capacity(slots.len());
        let mut emitted = vec![false; nodes.len()];

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(idx, _)| Reverse(idx))
            .collect();

        while let Some(Reverse(current)) = ready.pop() {
            emitted[current] = true;
            for &position in &nodes[current].members {
                if let Some(item) = slots[position].take() {
                    output.push(item);
                }
            }
            for &next in &successors[current] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        let mut unresolved = Vec::new();
        for (idx, node) in nodes.into_iter().enumerate() {
            if emitted[idx] {
                continue;
            }
            for position in node.members {
                if let Some(item) = slots[position].take() {
                    output.push(item);
                }
            }
            if let Some(key) = node.key {
                unresolved.push(key);
            }
        }

        if !unresolved.is_empty() {
            tracing::warn!(
                count = unresolved.len(),
                unresolved = ?unresolved,
                "Dependency cycle detected, remaining nodes kept in input order"
            );
        }

        Sorted {
            items: output,
            unresolved,
        }
    }
}

fn run<S>(sorter: &S, items: Vec<S::Item>) -> Result<Sorted<S::Item, S::Key>, S::Error>
where
    S: TopologicalSort + ?Sized,
{
    let mut graph = Graph::new();

    for (position, item) in items.iter().enumerate() {
        let node = match sorter.key_of(item)? {
            Some(key) => graph.node_for(key),
            None => graph.push(None),
        };
        graph.nodes[node].members.push(position);
    }
    let present = graph.nodes.len();

    // Relation answers may append nodes, so walk by index until the set is
    // closed.
    let mut cursor = 0;
    while cursor < graph.nodes.len() {
        let Some(key) = graph.nodes[cursor].key.clone() else {
            cursor += 1;
            continue;
        };

        let requirements = sorter.requirements(&key)?;
        let dependencies = sorter.dependencies(&key)?;
        if requirements.is_inverse() && dependencies.is_inverse() {
            tracing::debug!(?key, "No relation answered for node, leaving it unconstrained");
        }

        if let Relation::Listed(requirers) = requirements {
            for requirer in requirers {
                let to = graph.node_for(requirer);
                graph.add_edge(cursor, to);
            }
        }
        if let Relation::Listed(providers) = dependencies {
            for provider in providers {
                let from = graph.node_for(provider);
                graph.add_edge(from, cursor);
            }
        }

        cursor += 1;
    }

    tracing::debug!(
        items = items.len(),
        nodes = graph.nodes.len(),
        absent = graph.nodes.len() - present,
        edges = graph.edges.len(),
        "Built dependency graph"
    );

    Ok(graph.order(items))
}
