//! A `std::vec::Vec`, but 1-indexed instead of 0-indexed.

/// Like a `std::vec::Vec`, but 1-indexed instead of 0-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneIndexedVec<T> {
    vec: Vec<T>,
}

impl<T> OneIndexedVec<T> {
    /// Creates an empty vector.
    pub fn new() -> Self {
        OneIndexedVec { vec: Vec::new() }
    }

    /// Returns the element at the given index, or None if the index is zero or out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index == 0 {
            return None;
        }
        self.vec.get(index - 1)
    }

    /// Appends an element and returns its (1-based) index.
    pub fn push(&mut self, value: T) -> usize {
        self.vec.push(value);
        self.vec.len()
    }

    /// Returns the number of elements in the vector. This is also the largest valid index.
    pub fn len(&self) -> usize {
        self.vec.len()
    }

    /// Returns true if the vector has a length of 0.
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    /// Returns an iterator over the vector.
    pub fn iter(&self) -> ::std::slice::Iter<T> {
        self.vec.iter()
    }
}

impl<T> Default for OneIndexedVec<T> {
    fn default() -> Self {
        OneIndexedVec::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_one_based() {
        let mut v = OneIndexedVec::new();
        assert_eq!(v.push('a'), 1);
        assert_eq!(v.push('b'), 2);
        assert_eq!(v.get(0), None);
        assert_eq!(v.get(1), Some(&'a'));
        assert_eq!(v.get(2), Some(&'b'));
        assert_eq!(v.get(3), None);
        assert_eq!(v.len(), 2);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![&'a', &'b']);
    }
}
