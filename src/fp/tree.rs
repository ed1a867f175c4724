use rustc_hash::FxHashMap;

use crate::itemset::Item;

/// One tree node. Ownership lives in the arena ([`FpTree::nodes`]); parent
/// and child references are plain indices into it, so the header table's
/// cross-cutting chains never form reference cycles.
#[derive(Debug, Clone)]
pub struct FpNode {
    pub item: Option<Item>,
    pub count: u64,
    pub parent: Option<usize>,
    pub children: FxHashMap<Item, usize>,
}

impl FpNode {
    pub fn new_root() -> Self {
        Self {
            item: None,
            count: 0,
            parent: None,
            children: FxHashMap::default(),
        }
    }

    pub fn new_item(item: Item, count: u64, parent: Option<usize>) -> Self {
        Self {
            item: Some(item),
            count,
            parent,
            children: FxHashMap::default(),
        }
    }
}

/// Compressed prefix tree over frequency-ordered transactions.
///
/// The header table maps each item to the indices of every node carrying
/// it, in insertion order; that order is the node-link chain threading the
/// item's occurrences through the tree.
#[derive(Debug, Clone)]
pub struct FpTree {
    pub nodes: Vec<FpNode>,
    pub header_table: FxHashMap<Item, Vec<usize>>,
    pub root_index: usize,
}

impl Default for FpTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FpTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![FpNode::new_root()],
            header_table: FxHashMap::default(),
            root_index: 0,
        }
    }

    /// Inserts an ordered item sequence with a multiplicity, merging into
    /// existing shared prefixes.
    pub fn insert_sequence(&mut self, sequence: &[Item], count: u64) {
        let mut current_index = self.root_index;

        for &item in sequence {
            if let Some(&child_index) = self.nodes[current_index].children.get(&item) {
                self.nodes[child_index].count += count;
                current_index = child_index;
            } else {
                let new_index = self.nodes.len();
                self.nodes
                    .push(FpNode::new_item(item, count, Some(current_index)));
                self.nodes[current_index].children.insert(item, new_index);
                self.header_table.entry(item).or_default().push(new_index);
                current_index = new_index;
            }
        }
    }

    /// Items on the path from `node_index` up to (excluding) the root,
    /// returned root-first, together with the node's count.
    pub fn prefix_path(&self, node_index: usize) -> (Vec<Item>, u64) {
        let mut path = Vec::new();
        let mut current = self.nodes[node_index].parent;

        while let Some(idx) = current {
            if let Some(item) = self.nodes[idx].item {
                path.push(item);
            }
            current = self.nodes[idx].parent;
        }

        path.reverse();
        (path, self.nodes[node_index].count)
    }

    /// The conditional pattern base of an item: one prefix path with count
    /// per node in the item's header chain, empty paths skipped.
    pub fn prefix_paths(&self, item: Item) -> Vec<(Vec<Item>, u64)> {
        self.header_table.get(&item).map_or(Vec::new(), |nodes| {
            nodes
                .iter()
                .map(|&idx| self.prefix_path(idx))
                .filter(|(path, _)| !path.is_empty())
                .collect()
        })
    }

    /// Total count of an item across all nodes carrying it.
    pub fn item_support(&self, item: Item) -> u64 {
        self.header_table.get(&item).map_or(0, |nodes| {
            nodes.iter().map(|&idx| self.nodes[idx].count).sum()
        })
    }

    /// True when no node branches; such a tree can be mined by direct
    /// combination enumeration instead of recursion.
    pub fn is_single_chain(&self) -> bool {
        let mut current_index = self.root_index;

        loop {
            let node = &self.nodes[current_index];
            if node.children.len() > 1 {
                return false;
            }
            match node.children.values().next() {
                Some(&child_index) => current_index = child_index,
                None => return true,
            }
        }
    }

    /// The (item, count) pairs along a single-chain tree, top down. Only
    /// meaningful when [`FpTree::is_single_chain`] holds.
    pub fn chain_items(&self) -> Vec<(Item, u64)> {
        let mut chain = Vec::new();
        let mut current_index = self.root_index;

        while let Some(&child_index) = self.nodes[current_index].children.values().next() {
            let child = &self.nodes[child_index];
            if let Some(item) = child.item {
                chain.push((item, child.count));
            }
            current_index = child_index;
        }

        chain
    }
}
