use tracing::trace;

use crate::element::Element;

#[derive(Debug, Clone, PartialEq)]
/// The "no data" sentinel of a column.
///
/// The sentinel is applied when a column is fetched: undefined values in the
/// stored block are replaced by it. Changing the sentinel afterwards does not
/// rewrite an already materialized buffer, the column must be reloaded for
/// the new sentinel to take effect.
pub struct NullPolicy<T> {
    value: Option<T>,
}

impl<T> Default for NullPolicy<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T: Element> NullPolicy<T> {
    /// Sets or removes the sentinel.
    pub fn set(&mut self, value: Option<T>) {
        self.value = value;
    }

    #[inline]
    /// Returns the sentinel if one is set.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    #[inline]
    /// Returns `true` if a sentinel is set.
    pub fn has_null(&self) -> bool {
        self.value.is_some()
    }

    /// Replaces undefined values with the sentinel.
    ///
    /// A value is undefined if it equals the stored null marker of the
    /// block or is undefined by construction (NaN).
    pub(crate) fn substitute(&self, values: &mut [T], stored_null: Option<&T>) {
        let Some(sentinel) = self.value.as_ref() else {
            return;
        };

        let mut replaced = 0usize;
        for value in values.iter_mut() {
            if value.is_undefined() || stored_null == Some(&*value) {
                *value = sentinel.clone();
                replaced += 1;
            }
        }

        if replaced > 0 {
            trace!(replaced, "Substituted undefined values with null sentinel");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_without_sentinel_is_noop() {
        let policy = NullPolicy::<i32>::default();
        let mut values = vec![1, -99, 3];
        policy.substitute(&mut values, Some(&-99));
        assert_eq!(values, vec![1, -99, 3]);
        assert!(!policy.has_null());
    }

    #[test]
    fn test_substitute_stored_marker() {
        let mut policy = NullPolicy::default();
        policy.set(Some(0));
        let mut values = vec![1, -99, 3, -99];
        policy.substitute(&mut values, Some(&-99));
        assert_eq!(values, vec![1, 0, 3, 0]);
        assert_eq!(policy.value(), Some(&0));
    }

    #[test]
    fn test_substitute_nan() {
        let mut policy = NullPolicy::default();
        policy.set(Some(-1.0f64));
        let mut values = vec![1.0, f64::NAN, 2.5];
        policy.substitute(&mut values, None);
        assert_eq!(values, vec![1.0, -1.0, 2.5]);
    }
}
