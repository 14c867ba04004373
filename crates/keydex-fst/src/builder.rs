// Dictionary image construction from sorted keys.

use crate::format::{self, align_to};
use crate::symbols::SymbolTable;
use crate::transition::{FLAG_FINAL, StateRecord, TransitionRecord};
use crate::{FstError, MAX_KEY_LENGTH};

struct Node {
    /// Children in label order. Sorted input guarantees appends stay sorted.
    children: Vec<(char, usize)>,
    weight: Option<u32>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: Vec::new(),
            weight: None,
        }
    }
}

/// Builds a dictionary image from keys inserted in strictly increasing order.
///
/// The result is a trie-shaped transducer (no suffix sharing). Outputs are
/// pushed toward the start state: a transition carries the increase of the
/// minimum weight reachable below it, and the final output carries the rest.
/// Each state also records the largest output still collectable below it,
/// which lets weight-ordered searches prune whole subtrees.
pub struct FstBuilder {
    nodes: Vec<Node>,
    last_key: Option<String>,
    key_count: u32,
}

impl Default for FstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FstBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            last_key: None,
            key_count: 0,
        }
    }

    /// Build an image from entries in any order. Duplicate keys keep their
    /// largest weight.
    pub fn from_unsorted<K, I>(entries: I) -> Result<Vec<u8>, FstError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, u32)>,
    {
        let mut entries: Vec<(String, u32)> =
            entries.into_iter().map(|(k, w)| (k.into(), w)).collect();
        // Heaviest first within a key, so dedup keeps the largest weight.
        entries.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
        entries.dedup_by(|later, earlier| later.0 == earlier.0);

        let mut builder = Self::new();
        for (key, weight) in entries {
            builder.insert(&key, weight)?;
        }
        builder.finish()
    }

    /// Number of keys inserted so far.
    pub fn len(&self) -> usize {
        self.key_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// Insert `key` with `weight`. Keys must be strictly increasing.
    pub fn insert(&mut self, key: &str, weight: u32) -> Result<(), FstError> {
        if let Some(previous) = &self.last_key {
            if key <= previous.as_str() {
                return Err(FstError::KeyOutOfOrder {
                    previous: previous.clone(),
                    key: key.to_string(),
                });
            }
        }
        let key_len = key.chars().count();
        if key_len > MAX_KEY_LENGTH {
            return Err(FstError::KeyTooLong(key_len));
        }

        let mut node = 0;
        for ch in key.chars() {
            node = match self.nodes[node].children.last() {
                Some(&(label, child)) if label == ch => child,
                _ => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::new());
                    self.nodes[node].children.push((ch, child));
                    child
                }
            };
        }
        self.nodes[node].weight = Some(weight);
        self.key_count += 1;
        self.last_key = Some(key.to_string());
        Ok(())
    }

    /// Serialize the dictionary image.
    pub fn finish(self) -> Result<Vec<u8>, FstError> {
        let symbols = SymbolTable::from_alphabet(
            self.nodes
                .iter()
                .flat_map(|n| n.children.iter().map(|&(label, _)| label)),
        )?;

        // Children always have larger indices than their parent, so a reverse
        // sweep visits every subtree before its root.
        let mut min_weight = vec![u32::MAX; self.nodes.len()];
        let mut max_weight = vec![0u32; self.nodes.len()];
        for i in (0..self.nodes.len()).rev() {
            let node = &self.nodes[i];
            let (mut lo, mut hi) = match node.weight {
                Some(w) => (w, w),
                None => (u32::MAX, 0),
            };
            for &(_, child) in &node.children {
                lo = lo.min(min_weight[child]);
                hi = hi.max(max_weight[child]);
            }
            min_weight[i] = lo;
            max_weight[i] = hi;
        }

        // Output accumulated on arrival at a state.
        let arrived = |i: usize| if i == 0 { 0 } else { min_weight[i] };

        let mut states = Vec::with_capacity(self.nodes.len());
        let mut transitions = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            let acc = arrived(i);
            states.push(StateRecord {
                first_transition: transitions.len() as u32,
                transition_count: node.children.len() as u16,
                flags: if node.weight.is_some() { FLAG_FINAL } else { 0 },
                final_output: node.weight.map_or(0, |w| w - acc),
                max_remaining: max_weight[i].saturating_sub(acc),
            });
            for &(label, child) in &node.children {
                let symbol = symbols.symbol_of(label).ok_or(FstError::TooManySymbols)?;
                transitions.push(TransitionRecord {
                    symbol,
                    _reserved: 0,
                    target: child as u32,
                    output: min_weight[child] - acc,
                });
            }
        }

        let mut buf = Vec::new();
        format::write_header(&mut buf, self.key_count);
        symbols.write(&mut buf);
        buf.resize(align_to(buf.len(), 4), 0);
        buf.extend_from_slice(&(states.len() as u32).to_le_bytes());
        buf.extend_from_slice(&(transitions.len() as u32).to_le_bytes());
        buf.resize(align_to(buf.len(), 16), 0);
        buf.extend_from_slice(bytemuck::cast_slice(&states));
        buf.extend_from_slice(bytemuck::cast_slice(&transitions));
        Ok(buf)
    }
}
