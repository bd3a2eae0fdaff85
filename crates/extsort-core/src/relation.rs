//! Answers a sorter gives when asked about one node's neighbours.

/// The neighbours of a node in one direction of the dependency relation.
///
/// A sorter usually only knows one direction natively. It answers the other
/// with [`Relation::Inverse`], meaning "derive these edges from the direction
/// I did list".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Relation<K> {
    /// The neighbouring keys in this direction.
    Listed(Vec<K>),
    /// Not answered here; the edges come from the opposite direction.
    #[default]
    Inverse,
}

impl<K> Relation<K> {
    /// An empty, explicit answer.
    pub fn none() -> Self {
        Self::Listed(Vec::new())
    }

    /// Whether this answer defers to the other direction.
    pub fn is_inverse(&self) -> bool {
        matches!(self, Self::Inverse)
    }

    /// The listed keys, or an empty slice for [`Relation::Inverse`].
    pub fn keys(&self) -> &[K] {
        match self {
            Self::Listed(keys) => keys,
            Self::Inverse => &[],
        }
    }
}

impl<K> FromIterator<K> for Relation<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::Listed(iter.into_iter().collect())
    }
}
