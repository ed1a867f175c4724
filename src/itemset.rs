/// Opaque item identifier. Items carry no meaning beyond identity; any
/// frequency ordering is established per run by the engines.
pub type Item = u64;

/// An immutable, sorted, deduplicated set of items.
///
/// Equality and hashing are by content, so itemsets key support tables
/// directly. The sorted representation makes subset tests and unions a
/// linear merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Itemset {
    items: Box<[Item]>,
}

impl Itemset {
    pub fn new(mut items: Vec<Item>) -> Self {
        items.sort_unstable();
        items.dedup();
        Self {
            items: items.into_boxed_slice(),
        }
    }

    pub fn single(item: Item) -> Self {
        Self {
            items: Box::new([item]),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: Item) -> bool {
        self.items.binary_search(&item).is_ok()
    }

    /// Subset test against a sorted, deduplicated transaction.
    pub fn is_contained_in(&self, transaction: &[Item]) -> bool {
        let mut rest = transaction.iter();
        'items: for &item in self.items.iter() {
            for &x in rest.by_ref() {
                if x == item {
                    continue 'items;
                }
                if x > item {
                    return false;
                }
            }
            return false;
        }
        true
    }

    /// Merge of two itemsets.
    pub fn union(&self, other: &Itemset) -> Itemset {
        let mut merged = Vec::with_capacity(self.items.len() + other.items.len());
        let (mut i, mut j) = (0, 0);
        while i < self.items.len() && j < other.items.len() {
            match self.items[i].cmp(&other.items[j]) {
                std::cmp::Ordering::Less => {
                    merged.push(self.items[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(other.items[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    merged.push(self.items[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&self.items[i..]);
        merged.extend_from_slice(&other.items[j..]);
        Itemset {
            items: merged.into_boxed_slice(),
        }
    }

    /// Items of `self` not present in `other`.
    pub fn difference(&self, other: &Itemset) -> Itemset {
        let items: Vec<Item> = self
            .items
            .iter()
            .copied()
            .filter(|&item| !other.contains(item))
            .collect();
        Itemset {
            items: items.into_boxed_slice(),
        }
    }

    /// All subsets obtained by removing exactly one item, used for Apriori
    /// pruning of candidates.
    pub fn drop_one_subsets(&self) -> impl Iterator<Item = Itemset> + '_ {
        (0..self.items.len()).map(move |skip| {
            let items: Vec<Item> = self
                .items
                .iter()
                .enumerate()
                .filter_map(|(i, &item)| (i != skip).then_some(item))
                .collect();
            Itemset {
                items: items.into_boxed_slice(),
            }
        })
    }
}

impl FromIterator<Item> for Itemset {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Itemset::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_sorts_and_dedups() {
        let itemset = Itemset::new(vec![7, 2, 5, 2]);
        assert_eq!(itemset.items(), &[2, 5, 7]);
        assert_eq!(itemset.len(), 3);
    }

    #[test]
    fn equality_is_by_content() {
        assert_eq!(Itemset::new(vec![3, 1]), Itemset::new(vec![1, 3, 3]));
        assert_ne!(Itemset::new(vec![1, 2]), Itemset::new(vec![1, 3]));
    }

    #[test]
    fn subset_test_against_transaction() {
        let itemset = Itemset::new(vec![2, 5]);
        assert!(itemset.is_contained_in(&[1, 2, 3, 5]));
        assert!(!itemset.is_contained_in(&[2, 3, 4]));
        assert!(Itemset::new(vec![]).is_contained_in(&[]));
    }

    #[test]
    fn union_merges_sorted() {
        let a = Itemset::new(vec![1, 3, 5]);
        let b = Itemset::new(vec![2, 3, 6]);
        assert_eq!(a.union(&b).items(), &[1, 2, 3, 5, 6]);
    }

    #[test]
    fn drop_one_subsets_cover_all() {
        let itemset = Itemset::new(vec![1, 2, 3]);
        let subsets: Vec<Itemset> = itemset.drop_one_subsets().collect();
        assert_eq!(subsets.len(), 3);
        assert!(subsets.contains(&Itemset::new(vec![2, 3])));
        assert!(subsets.contains(&Itemset::new(vec![1, 3])));
        assert!(subsets.contains(&Itemset::new(vec![1, 2])));
    }

    #[test]
    fn difference_removes_shared_items() {
        let a = Itemset::new(vec![1, 2, 3, 4]);
        let b = Itemset::new(vec![2, 4]);
        assert_eq!(a.difference(&b).items(), &[1, 3]);
    }
}
