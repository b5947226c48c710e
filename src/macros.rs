/// Builds a [`Nested`](crate::Nested) value from a bracketed literal.
///
/// Brackets become sequences, anything else becomes a leaf (cast to `f64`).
/// Negative leaves need parentheses: `nested!([(-1), 2])`.
///
/// # Examples
///
/// ```rust
/// use seqdump::{nested, Nested};
///
/// let value = nested!([[1, 2], [3], [], [(-4.5)]]);
/// assert_eq!(value.flatten(), vec![1.0, 2.0, 3.0, -4.5]);
/// assert_eq!(nested!(8), Nested::Leaf(8.0));
/// ```
#[macro_export]
macro_rules! nested {
    // Handle empty sequence
    ([]) => {
        $crate::Nested::Seq(::std::vec::Vec::new())
    };

    // Handle non-empty sequence
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Nested::Seq(vec![$($crate::nested!($elem)),*])
    };

    // Anything else is a leaf
    ($leaf:expr) => {
        $crate::Nested::Leaf(($leaf) as f64)
    };
}
