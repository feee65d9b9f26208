/// A multiset that only needs `PartialEq` of its elements. Operand lists are
/// short, so a vector of `(element, amount)` pairs beats hashing here.
#[derive(Debug, Clone)]
pub(crate) struct Multiset<T>
where
    T: PartialEq,
{
    elements: Vec<(T, u32)>,
}

impl<T> FromIterator<T> for Multiset<T>
where
    T: PartialEq,
{
    fn from_iter<U: IntoIterator<Item = T>>(iter: U) -> Self {
        let iter = iter.into_iter();
        let (lower_bound, upper_bound) = iter.size_hint();
        let mut multiset = Self {
            elements: Vec::with_capacity(upper_bound.unwrap_or(lower_bound)),
        };
        multiset.extend(iter);
        multiset
    }
}

impl<T> PartialEq for Multiset<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.is_multisubset_of(other) && other.is_multisubset_of(self)
    }
}

impl<T> Multiset<T>
where
    T: PartialEq,
{
    pub(crate) fn amount(&self, element: &T) -> u32 {
        self.elements
            .iter()
            .find_map(|(x, amount)| if x == element { Some(*amount) } else { None })
            .unwrap_or(0)
    }

    fn amount_mut(&mut self, element: T) -> &mut u32 {
        let index = self.elements.iter().position(|(k, _)| k == &element);

        if let Some(index) = index {
            &mut self.elements[index].1
        } else {
            let length = self.elements.len();
            self.elements.push((element, 0));
            &mut self.elements[length].1
        }
    }

    pub(crate) fn support(&self) -> impl Iterator<Item = &T> {
        self.elements
            .iter()
            .filter_map(|(k, v)| if *v > 0 { Some(k) } else { None })
    }

    pub(crate) fn is_multisubset_of(&self, other: &Multiset<T>) -> bool {
        self.support().all(|k| self.amount(k) <= other.amount(k))
    }
}

impl<T> Extend<T> for Multiset<T>
where
    T: PartialEq,
{
    fn extend<U: IntoIterator<Item = T>>(&mut self, iter: U) {
        for element in iter {
            *self.amount_mut(element) += 1;
        }
    }
}

/// Whether two operand lists hold the same operands with the same
/// multiplicities, in any order.
pub(crate) fn same_elements<T: PartialEq>(left: &[T], right: &[T]) -> bool {
    left.len() == right.len()
        && Multiset::from_iter(left.iter()) == Multiset::from_iter(right.iter())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn multiset_from_iter_counts_repetitions() {
        let multiset = Multiset::from_iter(vec![0, 1, 1, 0, 0]);

        assert_eq!(multiset.amount(&0), 3);
        assert_eq!(multiset.amount(&1), 2);
        assert_eq!(multiset.amount(&2), 0);
    }

    #[test]
    fn multiset_eq_ignores_order() {
        let left = Multiset::from_iter(vec![0, 1, 1, 2]);
        let right = Multiset::from_iter(vec![1, 2, 1, 0]);

        assert_eq!(left, right);
    }

    #[test]
    fn multiset_eq_respects_multiplicity() {
        let left = Multiset::from_iter(vec![0, 1, 1]);
        let right = Multiset::from_iter(vec![0, 0, 1]);

        assert_ne!(left, right);
    }

    #[test]
    fn multiset_extend() {
        let mut multiset = Multiset::from_iter(vec![0, 0, 1]);
        multiset.extend(vec![1, 2, 2]);

        assert_eq!(multiset, Multiset::from_iter(vec![0, 0, 1, 1, 2, 2]));
    }

    #[test]
    fn same_elements_of_slices() {
        assert!(same_elements(&[1, 2, 3], &[3, 1, 2]));
        assert!(!same_elements(&[1, 2, 2], &[1, 1, 2]));
        assert!(!same_elements(&[1, 2], &[1, 2, 2]));
        assert!(same_elements::<u32>(&[], &[]));
    }
}
