//! # Seed and Merkle trees
//!
//! One binary tree type backs two commitment mechanisms:
//!
//! - **Seed trees** grow top down. A root seed expands into per-leaf seeds
//!   through [`hash_seed`], and revealing the siblings along the paths to a
//!   set of hidden leaves lets a verifier regrow every other leaf.
//! - **Merkle trees** grow bottom up over commitment digests. Opening a
//!   subset of leaves ships the minimal set of interior nodes that, together
//!   with the recomputed leaves, reaches the root.
//!
//! Trees are stored as flat arrays in heap order with the root at index 0.
//! The leaf count need not be a power of two; slots past the last leaf are
//! marked non-existent and skipped everywhere.

use crate::constants::params::{PARAM_DIGEST_SIZE, PARAM_SEED_SIZE};
use crate::constants::types::{Hash, Salt, Seed};
use crate::errors::Error;
use crate::subroutines::hashing::{HashCtx, HASH_PREFIX_1, HASH_PREFIX_3};

fn ceil_log2(x: usize) -> u32 {
    if x <= 1 {
        return 0;
    }
    usize::BITS - (x - 1).leading_zeros()
}

fn parent(node: usize) -> usize {
    debug_assert!(node != 0);
    (node - 1) / 2
}

fn is_left_child(node: usize) -> bool {
    node % 2 == 1
}

/// Derive both children of a seed node in one squeeze.
fn hash_seed(seed: &[u8], salt: &Salt, rep_index: u16, node_index: u16) -> Hash {
    let mut hasher = HashCtx::with_prefix(&HASH_PREFIX_1);
    hasher.update(seed);
    hasher.update(salt);
    hasher.update_u16_le(rep_index);
    hasher.update_u16_le(node_index);
    hasher.digest()
}

/// A possibly incomplete binary tree in heap order. `data_size` is the node
/// payload width: seed trees carry seeds, Merkle trees carry digests.
#[derive(Debug)]
pub struct Tree {
    depth: u32,
    data_size: usize,
    num_nodes: usize,
    num_leaves: usize,
    nodes: Vec<u8>,
    have: Vec<bool>,
    exists: Vec<bool>,
}

impl Tree {
    fn new(num_leaves: usize, data_size: usize) -> Self {
        let depth = ceil_log2(num_leaves) + 1;
        // a complete tree of this depth, minus the leaf slots we don't need
        let num_nodes = ((1 << depth) - 1) - ((1 << (depth - 1)) - num_leaves);

        let mut exists = vec![false; num_nodes];
        for flag in exists.iter_mut().skip(num_nodes - num_leaves) {
            *flag = true;
        }
        for i in (1..=(num_nodes - num_leaves)).rev() {
            if Self::slot_exists(&exists, 2 * i + 1) || Self::slot_exists(&exists, 2 * i + 2) {
                exists[i] = true;
            }
        }
        exists[0] = true;

        Tree {
            depth,
            data_size,
            num_nodes,
            num_leaves,
            nodes: vec![0u8; num_nodes * data_size],
            have: vec![false; num_nodes],
            exists,
        }
    }

    fn slot_exists(exists: &[bool], node: usize) -> bool {
        node < exists.len() && exists[node]
    }

    fn exists(&self, node: usize) -> bool {
        Self::slot_exists(&self.exists, node)
    }

    fn node(&self, index: usize) -> &[u8] {
        &self.nodes[index * self.data_size..(index + 1) * self.data_size]
    }

    fn node_mut(&mut self, index: usize) -> &mut [u8] {
        &mut self.nodes[index * self.data_size..(index + 1) * self.data_size]
    }

    fn is_leaf(&self, node: usize) -> bool {
        2 * node + 1 >= self.num_nodes
    }

    fn has_right_child(&self, node: usize) -> bool {
        2 * node + 2 < self.num_nodes && self.exists(node)
    }

    fn has_sibling(&self, node: usize) -> bool {
        if !self.exists(node) {
            return false;
        }
        // a left child at the ragged edge may stand alone
        !(is_left_child(node) && !self.exists(node + 1))
    }

    fn sibling(&self, node: usize) -> usize {
        if is_left_child(node) {
            node + 1
        } else {
            node - 1
        }
    }

    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    fn first_leaf(&self) -> usize {
        self.num_nodes - self.num_leaves
    }

    // ------------------------------------------------------------------
    // Seed trees
    // ------------------------------------------------------------------

    /// Expand a root seed into `num_leaves` leaf seeds. The repetition index
    /// and salt separate the derivation domains across the signature.
    pub fn generate_seeds(root: &Seed, salt: &Salt, rep_index: u16, num_leaves: usize) -> Self {
        let mut tree = Tree::new(num_leaves, PARAM_SEED_SIZE);
        tree.node_mut(0).copy_from_slice(root);
        tree.have[0] = true;
        tree.expand_seeds(salt, rep_index);
        tree
    }

    /// Grow every subtree whose root seed is present.
    fn expand_seeds(&mut self, salt: &Salt, rep_index: u16) {
        let last_non_leaf = parent(self.num_nodes - 1);
        for i in 0..=last_non_leaf {
            if !self.have[i] || !self.exists[i] {
                continue;
            }
            let digest = hash_seed(self.node(i), salt, rep_index, i as u16);
            if !self.have[2 * i + 1] {
                self.node_mut(2 * i + 1)
                    .copy_from_slice(&digest[..PARAM_SEED_SIZE]);
                self.have[2 * i + 1] = true;
            }
            // the node at the ragged edge has no right child
            if self.exists(2 * i + 2) && !self.have[2 * i + 2] {
                self.node_mut(2 * i + 2)
                    .copy_from_slice(&digest[PARAM_SEED_SIZE..]);
                self.have[2 * i + 2] = true;
            }
        }
    }

    /// Whether the seed of the given leaf is present.
    pub fn have_leaf(&self, leaf: usize) -> bool {
        self.have[self.first_leaf() + leaf]
    }

    pub fn leaf_seed(&self, leaf: usize) -> Seed {
        let mut seed = Seed::default();
        seed.copy_from_slice(self.node(self.first_leaf() + leaf));
        seed
    }

    /// The nodes whose seeds must be shipped so that every leaf except the
    /// hidden ones can be regrown. Walks the hidden paths level by level,
    /// revealing each sibling subtree not itself on a hidden path.
    fn revealed_seed_nodes(&self, hide: &[u16]) -> Vec<usize> {
        if hide.is_empty() {
            return vec![];
        }
        let path_len = (self.depth - 1) as usize;
        let first_leaf = self.first_leaf();

        // per hidden leaf: the leaf node, then its ancestors below the root
        let mut paths = vec![vec![0usize; path_len]; hide.len()];
        for (path, leaf) in paths.iter_mut().zip(hide) {
            let mut node = first_leaf + *leaf as usize;
            for slot in path.iter_mut() {
                *slot = node;
                node = parent(node);
            }
        }

        let mut revealed: Vec<usize> = vec![];
        for d in 0..path_len {
            for i in 0..paths.len() {
                let node = paths[i][d];
                if !self.has_sibling(node) {
                    continue;
                }
                let mut sibling = self.sibling(node);
                if paths.iter().any(|path| path[d] == sibling) {
                    continue;
                }
                // in the ragged part the subtree root shifts down-left
                while !self.has_right_child(sibling) && !self.is_leaf(sibling) {
                    sibling = 2 * sibling + 1;
                }
                if !revealed.contains(&sibling) {
                    revealed.push(sibling);
                }
            }
        }
        revealed
    }

    /// Serialize the seeds revealing everything but the hidden leaves.
    pub fn reveal_seeds(&self, hide: &[u16]) -> Vec<u8> {
        let revealed = self.revealed_seed_nodes(hide);
        let mut output = Vec::with_capacity(revealed.len() * self.data_size);
        for node in revealed {
            output.extend_from_slice(self.node(node));
        }
        output
    }

    /// Byte size of [`Tree::reveal_seeds`] for the given shape.
    pub fn reveal_seeds_size(num_leaves: usize, hide: &[u16]) -> usize {
        let tree = Tree::new(num_leaves, PARAM_SEED_SIZE);
        tree.revealed_seed_nodes(hide).len() * PARAM_SEED_SIZE
    }

    /// Rebuild a seed tree from revealed sibling seeds. The hidden leaves
    /// stay absent; everything else is regrown.
    pub fn reconstruct_seeds(
        num_leaves: usize,
        hide: &[u16],
        input: &[u8],
        salt: &Salt,
        rep_index: u16,
    ) -> Result<Self, Error> {
        let mut tree = Tree::new(num_leaves, PARAM_SEED_SIZE);
        let revealed = tree.revealed_seed_nodes(hide);
        if input.len() != revealed.len() * PARAM_SEED_SIZE {
            return Err(Error::InvalidEncoding);
        }
        for (chunk, node) in input.chunks_exact(PARAM_SEED_SIZE).zip(revealed) {
            tree.node_mut(node).copy_from_slice(chunk);
            tree.have[node] = true;
        }
        tree.expand_seeds(salt, rep_index);
        Ok(tree)
    }

    // ------------------------------------------------------------------
    // Merkle trees
    // ------------------------------------------------------------------

    /// An empty digest tree, ready for [`Tree::add_merkle_nodes`] and
    /// [`Tree::verify_merkle`].
    pub fn new_merkle(num_leaves: usize) -> Self {
        Tree::new(num_leaves, PARAM_DIGEST_SIZE)
    }

    /// Hash the present leaves up to the root. Absent leaves leave their
    /// ancestors uncomputed.
    pub fn build_merkle(leaves: &[Option<Hash>], salt: &Salt) -> Self {
        let mut tree = Tree::new(leaves.len(), PARAM_DIGEST_SIZE);
        let first_leaf = tree.first_leaf();
        for (i, leaf) in leaves.iter().enumerate() {
            if let Some(data) = leaf {
                tree.node_mut(first_leaf + i).copy_from_slice(data);
                tree.have[first_leaf + i] = true;
            }
        }
        for child in (1..tree.num_nodes).rev() {
            tree.compute_parent_hash(child, salt);
        }
        tree
    }

    /// Hash the parent of `child` once both children are known.
    fn compute_parent_hash(&mut self, child: usize, salt: &Salt) {
        if !self.exists(child) {
            return;
        }
        let parent = parent(child);
        if self.have[parent] {
            return;
        }
        if !self.have[2 * parent + 1] {
            return;
        }
        if self.exists(2 * parent + 2) && !self.have[2 * parent + 2] {
            return;
        }

        let mut hasher = HashCtx::with_prefix(&HASH_PREFIX_3);
        hasher.update(self.node(2 * parent + 1));
        if self.has_right_child(parent) {
            hasher.update(self.node(2 * parent + 2));
        }
        hasher.update(salt);
        hasher.update_u16_le(parent as u16);
        let digest = hasher.digest();
        self.node_mut(parent).copy_from_slice(&digest);
        self.have[parent] = true;
    }

    pub fn root(&self) -> Hash {
        let mut root = Hash::default();
        root.copy_from_slice(self.node(0));
        root
    }

    /// The interior nodes a verifier needs when the given leaves are
    /// missing: for each missing leaf, the highest all-missing ancestor.
    fn revealed_merkle_nodes(&self, missing: &[u16]) -> Vec<usize> {
        let first_leaf = self.first_leaf();
        let mut missing_nodes = vec![false; self.num_nodes];
        for leaf in missing {
            missing_nodes[first_leaf + *leaf as usize] = true;
        }

        let last_non_leaf = parent(self.num_nodes - 1);
        for i in (1..=last_non_leaf).rev() {
            if !self.exists(i) {
                continue;
            }
            if self.exists(2 * i + 2) {
                if missing_nodes[2 * i + 1] && missing_nodes[2 * i + 2] {
                    missing_nodes[i] = true;
                }
            } else if missing_nodes[2 * i + 1] {
                missing_nodes[i] = true;
            }
        }

        let mut revealed: Vec<usize> = vec![];
        for leaf in missing {
            let mut node = first_leaf + *leaf as usize;
            loop {
                if !missing_nodes[parent(node)] {
                    if !revealed.contains(&node) {
                        revealed.push(node);
                    }
                    break;
                }
                node = parent(node);
                if node == 0 {
                    break;
                }
            }
        }
        revealed
    }

    /// Serialize the nodes covering the missing leaves.
    pub fn open_merkle(&self, missing: &[u16]) -> Vec<u8> {
        let revealed = self.revealed_merkle_nodes(missing);
        let mut output = Vec::with_capacity(revealed.len() * self.data_size);
        for node in revealed {
            output.extend_from_slice(self.node(node));
        }
        output
    }

    /// Byte size of [`Tree::open_merkle`] for the given shape.
    pub fn open_merkle_size(num_leaves: usize, missing: &[u16]) -> usize {
        let tree = Tree::new(num_leaves, PARAM_DIGEST_SIZE);
        tree.revealed_merkle_nodes(missing).len() * PARAM_DIGEST_SIZE
    }

    /// Load the opened nodes for the missing leaves. Rejects input of the
    /// wrong size and openings that would supply the root directly.
    pub fn add_merkle_nodes(&mut self, missing: &[u16], input: &[u8]) -> Result<(), Error> {
        let revealed = self.revealed_merkle_nodes(missing);
        if revealed.contains(&0) {
            return Err(Error::InvalidEncoding);
        }
        if input.len() != revealed.len() * self.data_size {
            return Err(Error::InvalidEncoding);
        }
        for (chunk, node) in input.chunks_exact(self.data_size).zip(revealed) {
            self.node_mut(node).copy_from_slice(chunk);
            self.have[node] = true;
        }
        Ok(())
    }

    /// Fill in the recomputed leaves and hash upwards. Fails if a supplied
    /// node collides with a recomputed leaf or if the root stays unknown.
    pub fn verify_merkle(&mut self, leaves: &[Option<Hash>], salt: &Salt) -> Result<(), Error> {
        let first_leaf = self.first_leaf();
        for (i, leaf) in leaves.iter().enumerate() {
            if let Some(data) = leaf {
                if self.have[first_leaf + i] {
                    return Err(Error::InvalidEncoding);
                }
                self.node_mut(first_leaf + i).copy_from_slice(data);
                self.have[first_leaf + i] = true;
            }
        }
        for child in (1..self.num_nodes).rev() {
            self.compute_parent_hash(child, salt);
        }
        if !self.have[0] {
            return Err(Error::InvalidEncoding);
        }
        Ok(())
    }
}
