//! Nested numeric structures.
//!
//! This module provides the [`Nested`] enum, the in-memory form of whatever a
//! generator produced: a numeric leaf, or an ordered sequence of further nested
//! structures. Siblings may differ in length and depth.
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use seqdump::{nested, Nested};
//!
//! let leaf = Nested::from(1.5);
//! let row = Nested::from(vec![1.0, 2.0, 3.0]);
//! let ragged = nested!([[1, 2], [3], [], [[4, 5], 6]]);
//!
//! assert!(leaf.is_leaf());
//! assert_eq!(row.leaf_count(), 3);
//! assert_eq!(ragged.leaf_count(), 6);
//! ```
//!
//! ### Flattening
//!
//! ```rust
//! use seqdump::nested;
//!
//! let value = nested!([[1, 2], [3], [4, 5, 6]]);
//! assert_eq!(value.flatten(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
//!
//! // Borrowing iterator, no intermediate allocation per level
//! let sum: f64 = value.leaves().sum();
//! assert_eq!(sum, 21.0);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A numeric leaf or an ordered sequence of nested structures.
///
/// The leaf/container distinction is resolved once, when the value is built,
/// so flattening never has to probe whether something can be iterated.
///
/// # Examples
///
/// ```rust
/// use seqdump::Nested;
///
/// let value = Nested::Seq(vec![
///     Nested::Leaf(1.0),
///     Nested::Seq(vec![]),
///     Nested::Seq(vec![Nested::Leaf(2.0)]),
/// ]);
/// assert_eq!(value.flatten(), vec![1.0, 2.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Nested {
    Leaf(f64),
    Seq(Vec<Nested>),
}

impl Default for Nested {
    fn default() -> Self {
        Nested::Seq(Vec::new())
    }
}

impl Nested {
    /// Returns `true` if this value is a scalar leaf.
    #[inline]
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Nested::Leaf(_))
    }

    /// Returns `true` if this value is a sequence.
    #[inline]
    #[must_use]
    pub const fn is_seq(&self) -> bool {
        matches!(self, Nested::Seq(_))
    }

    /// If the value is a leaf, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Nested::Leaf(v) => Some(*v),
            Nested::Seq(_) => None,
        }
    }

    /// If the value is a sequence, returns its children. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_seq(&self) -> Option<&[Nested]> {
        match self {
            Nested::Leaf(_) => None,
            Nested::Seq(items) => Some(items),
        }
    }

    /// Iterates over the leaves in depth-first, left-to-right order.
    ///
    /// Empty sequences at any level contribute nothing.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![std::slice::from_ref(self).iter()],
        }
    }

    /// Collects the leaves into a flat vector, preserving traversal order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seqdump::nested;
    ///
    /// assert!(nested!([]).flatten().is_empty());
    /// assert!(nested!([[], [[]]]).flatten().is_empty());
    /// assert_eq!(nested!(7).flatten(), vec![7.0]);
    /// ```
    #[must_use]
    pub fn flatten(&self) -> Vec<f64> {
        self.leaves().collect()
    }

    /// Counts scalar leaves regardless of nesting shape.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Nesting depth: a leaf has depth 0, a sequence one more than its
    /// deepest child (an empty sequence has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, level)) = stack.pop() {
            if let Nested::Seq(items) = node {
                deepest = deepest.max(level + 1);
                stack.extend(items.iter().map(|item| (item, level + 1)));
            }
        }
        deepest
    }
}

impl Drop for Nested {
    fn drop(&mut self) {
        // Flat sequences of leaves take the default path
        let mut pending = match self {
            Nested::Seq(items) if items.iter().any(Nested::is_seq) => std::mem::take(items),
            _ => return,
        };
        while let Some(mut node) = pending.pop() {
            if let Nested::Seq(items) = &mut node {
                pending.append(items);
            }
        }
    }
}

/// Depth-first iterator over the leaves of a [`Nested`] value.
///
/// Created by [`Nested::leaves`]. Keeps an explicit stack of slice iterators,
/// so deep inputs do not grow the call stack.
pub struct Leaves<'a> {
    stack: Vec<std::slice::Iter<'a, Nested>>,
}

impl Iterator for Leaves<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(Nested::Leaf(v)) => return Some(*v),
                Some(Nested::Seq(items)) => self.stack.push(items.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Renders the flattened leaves as a bracketed list: `[1.0, 2.0, 3.0]`.
///
/// This is the raw log format written by [`write_log`](crate::write_log).
pub struct FlatDisplay<'a>(pub &'a Nested);

impl fmt::Display for FlatDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, leaf) in self.0.leaves().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", leaf)?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for Nested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nested::Leaf(v) => write!(f, "{:?}", v),
            Nested::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for Nested {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Nested::Leaf(v) => serializer.serialize_f64(*v),
            Nested::Seq(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Nested {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct NestedVisitor;

        impl<'de> Visitor<'de> for NestedVisitor {
            type Value = Nested;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number or a sequence of nested numbers")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Nested::Leaf(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Nested::Leaf(value as f64))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Nested::Leaf(value))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Nested::Seq(items))
            }
        }

        deserializer.deserialize_any(NestedVisitor)
    }
}

impl TryFrom<Nested> for f64 {
    type Error = crate::Error;

    fn try_from(value: Nested) -> crate::Result<Self> {
        match &value {
            Nested::Leaf(v) => Ok(*v),
            Nested::Seq(items) => Err(crate::Error::custom(format!(
                "expected a leaf, found a sequence of {} items",
                items.len()
            ))),
        }
    }
}

impl From<f64> for Nested {
    fn from(value: f64) -> Self {
        Nested::Leaf(value)
    }
}

impl From<f32> for Nested {
    fn from(value: f32) -> Self {
        Nested::Leaf(value as f64)
    }
}

impl From<i32> for Nested {
    fn from(value: i32) -> Self {
        Nested::Leaf(value as f64)
    }
}

impl From<i64> for Nested {
    fn from(value: i64) -> Self {
        Nested::Leaf(value as f64)
    }
}

impl From<u16> for Nested {
    fn from(value: u16) -> Self {
        Nested::Leaf(value as f64)
    }
}

impl From<u32> for Nested {
    fn from(value: u32) -> Self {
        Nested::Leaf(value as f64)
    }
}

impl<T: Into<Nested>> From<Vec<T>> for Nested {
    fn from(value: Vec<T>) -> Self {
        Nested::Seq(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Nested>> FromIterator<T> for Nested {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Nested::Seq(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nested;

    #[test]
    fn test_flatten_preserves_order() {
        let value = Nested::from(vec![vec![1.0, 2.0], vec![3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(value.flatten(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_flatten_irregular_siblings() {
        let value = Nested::Seq(vec![
            Nested::Leaf(1.0),
            Nested::Seq(vec![Nested::Seq(vec![Nested::Leaf(2.0)]), Nested::Leaf(3.0)]),
            Nested::Seq(vec![]),
            Nested::Leaf(4.0),
        ]);
        assert_eq!(value.flatten(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(value.leaf_count(), 4);
        assert_eq!(value.depth(), 3);
    }

    #[test]
    fn test_flatten_empty() {
        assert!(Nested::default().flatten().is_empty());
        let only_empty = Nested::Seq(vec![
            Nested::Seq(vec![]),
            Nested::Seq(vec![Nested::Seq(vec![])]),
        ]);
        assert!(only_empty.flatten().is_empty());
        assert_eq!(only_empty.leaf_count(), 0);
    }

    #[test]
    fn test_bare_leaf_flattens_to_itself() {
        assert_eq!(Nested::Leaf(2.5).flatten(), vec![2.5]);
        assert_eq!(Nested::Leaf(2.5).depth(), 0);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let mut value = Nested::Leaf(9.0);
        for _ in 0..100_000 {
            value = Nested::Seq(vec![value]);
        }
        assert_eq!(value.leaves().collect::<Vec<_>>(), vec![9.0]);
        assert_eq!(value.depth(), 100_000);
        drop(value);
    }

    #[test]
    fn test_drop_wide_and_deep() {
        let mut value = nested!([1, 2]);
        for i in 0..50_000 {
            value = Nested::Seq(vec![Nested::Leaf(i as f64), value, Nested::Seq(vec![])]);
        }
        assert_eq!(value.leaf_count(), 50_002);
        drop(value);
    }

    #[test]
    fn test_display_formats() {
        let value = Nested::from(vec![vec![1.0, 2.5], vec![]]);
        assert_eq!(value.to_string(), "[[1.0, 2.5], []]");
        assert_eq!(FlatDisplay(&value).to_string(), "[1.0, 2.5]");
        assert_eq!(FlatDisplay(&Nested::default()).to_string(), "[]");
    }

    #[test]
    fn test_tryfrom_f64() {
        assert_eq!(f64::try_from(Nested::Leaf(3.0)).unwrap(), 3.0);
        assert!(f64::try_from(Nested::Seq(vec![])).is_err());
    }

    #[test]
    fn test_from_iterator() {
        let value: Nested = (1..=3).map(|i| i as f64).collect();
        assert_eq!(value, Nested::from(vec![1.0, 2.0, 3.0]));
    }
}
