//! Fixed-size combination enumeration over slices, shared by the level
//! search (k-subsets of a transaction), the tree miner (single-chain
//! shortcut) and rule extraction (antecedent enumeration).

pub fn for_each_combination<T, F>(items: &[T], k: usize, callback: &mut F)
where
    T: Copy,
    F: FnMut(&[T]),
{
    if k == 0 || k > items.len() {
        return;
    }

    let mut current = Vec::with_capacity(k);
    combine_recursive(items, k, 0, &mut current, callback);
}

fn combine_recursive<T, F>(items: &[T], k: usize, start: usize, current: &mut Vec<T>, callback: &mut F)
where
    T: Copy,
    F: FnMut(&[T]),
{
    if current.len() == k {
        callback(current);
        return;
    }

    for i in start..items.len() {
        current.push(items[i]);
        combine_recursive(items, k, i + 1, current, callback);
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(items: &[u64], k: usize) -> Vec<Vec<u64>> {
        let mut out = Vec::new();
        for_each_combination(items, k, &mut |combo| out.push(combo.to_vec()));
        out
    }

    #[test]
    fn enumerates_all_pairs_in_order() {
        assert_eq!(
            collect(&[1, 2, 3], 2),
            vec![vec![1, 2], vec![1, 3], vec![2, 3]]
        );
    }

    #[test]
    fn full_size_yields_the_slice_itself() {
        assert_eq!(collect(&[4, 5], 2), vec![vec![4, 5]]);
    }

    #[test]
    fn degenerate_sizes_yield_nothing() {
        assert!(collect(&[1, 2], 0).is_empty());
        assert!(collect(&[1, 2], 3).is_empty());
    }
}
