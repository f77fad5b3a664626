//! Predicate-based search and testing over iterables
//!
//! Free-function counterparts of the short-circuiting quantifiers, for
//! call sites that read better with the predicate up front.

/// Returns `true` if `pred` holds for any element of `iterable`
///
/// ```rust
/// use duffel_core::algorithm::any_of;
///
/// assert!(any_of(|x| *x == 4, [1, 2, 3, 4]));
/// assert!(!any_of(|x| *x > 10, [1, 2, 3, 4]));
/// ```
pub fn any_of<I, P>(mut pred: P, iterable: I) -> bool
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    iterable.into_iter().any(|item| pred(&item))
}

/// Returns `true` if `pred` holds for all elements of `iterable`
///
/// Vacuously true for an empty iterable.
///
/// ```rust
/// use duffel_core::algorithm::all_of;
///
/// assert!(all_of(|x| *x % 2 == 0, [2, 4, 6, 8]));
/// assert!(all_of(|x: &i32| *x > 0, []));
/// ```
pub fn all_of<I, P>(mut pred: P, iterable: I) -> bool
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    iterable.into_iter().all(|item| pred(&item))
}

/// Returns `true` if `pred` holds for no element of `iterable`
///
/// Vacuously true for an empty iterable.
///
/// ```rust
/// use duffel_core::algorithm::none_of;
///
/// assert!(none_of(|x| *x % 2 == 0, [1, 3, 5, 7]));
/// ```
pub fn none_of<I, P>(mut pred: P, iterable: I) -> bool
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    iterable.into_iter().all(|item| !pred(&item))
}

/// Returns the first element of `iterable` for which `pred` holds
///
/// ```rust
/// use duffel_core::algorithm::find_if;
///
/// assert_eq!(find_if(|x| *x == 3, [1, 2, 3, 4]), Some(3));
/// assert_eq!(find_if(|x| *x == 9, [1, 2, 3, 4]), None);
/// ```
pub fn find_if<I, P>(mut pred: P, iterable: I) -> Option<I::Item>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    iterable.into_iter().find(|item| pred(item))
}
