//! Block support precomputation for the sparse engine.
//!
//! A block map assigns every feature to a block id. The sparse SAGA engine
//! needs, for every sample, the blocks its nonzero support touches, and for
//! every block, the features it owns. Both are stored in compressed form
//! (offsets + flat indices) like a CSR matrix.

use crate::data::CsrMatrix;
use crate::error::SagaError;

/// Check that `blocks` is a contiguous zero-based labeling.
///
/// Every id in `0..n_blocks` must be used at least once and no id may be
/// `>= n_blocks`. Returns `n_blocks`.
pub fn validate_blocks(blocks: &[usize]) -> Result<usize, SagaError> {
    let Some(&max_id) = blocks.iter().max() else {
        return Ok(0);
    };
    let n_blocks = max_id + 1;
    let mut used = vec![false; n_blocks];
    for &g in blocks {
        used[g] = true;
    }
    if let Some(missing) = used.iter().position(|&u| !u) {
        return Err(SagaError::InvalidBlocks(format!(
            "block ids must be contiguous from 0, id {missing} is missing below {max_id}"
        )));
    }
    Ok(n_blocks)
}

/// Sample/block incidence and per-block correction factors.
///
/// Built once per run; read-only afterwards.
#[derive(Debug, Clone)]
pub struct BlockSupport {
    n_blocks: usize,
    /// `sample_blocks[sample_ptrs[i]..sample_ptrs[i + 1]]`: sorted unique
    /// blocks touched by sample `i`.
    sample_ptrs: Vec<usize>,
    sample_blocks: Vec<usize>,
    /// `block_features[block_ptrs[g]..block_ptrs[g + 1]]`: ascending features
    /// of block `g`.
    block_ptrs: Vec<usize>,
    block_features: Vec<usize>,
    /// `d[g] = n_samples / (#samples touching g)`, `0` for untouched blocks.
    correction: Vec<f64>,
}

impl BlockSupport {
    /// Build the support of `a` under the block map `blocks`.
    pub fn new(a: &CsrMatrix, blocks: &[usize]) -> Result<Self, SagaError> {
        SagaError::check_len("block map", a.num_cols(), blocks.len())?;
        let n_blocks = validate_blocks(blocks)?;
        Ok(Self::build(a, blocks, n_blocks))
    }

    /// Support where every feature is its own block.
    pub fn per_feature(a: &CsrMatrix) -> Self {
        let blocks: Vec<usize> = (0..a.num_cols()).collect();
        Self::build(a, &blocks, blocks.len())
    }

    fn build(a: &CsrMatrix, blocks: &[usize], n_blocks: usize) -> Self {
        let n_samples = a.num_rows();

        // sample -> blocks
        let mut sample_ptrs = Vec::with_capacity(n_samples + 1);
        let mut sample_blocks = Vec::new();
        let mut touch_count = vec![0usize; n_blocks];
        let mut row_blocks = Vec::new();
        sample_ptrs.push(0);
        for i in 0..n_samples {
            row_blocks.clear();
            row_blocks.extend(a.row(i).indices.iter().map(|&j| blocks[j as usize]));
            row_blocks.sort_unstable();
            row_blocks.dedup();
            for &g in &row_blocks {
                touch_count[g] += 1;
            }
            sample_blocks.extend_from_slice(&row_blocks);
            sample_ptrs.push(sample_blocks.len());
        }

        // block -> features, counting sort on the block id
        let mut block_ptrs = vec![0usize; n_blocks + 1];
        for &g in blocks {
            block_ptrs[g + 1] += 1;
        }
        for g in 0..n_blocks {
            block_ptrs[g + 1] += block_ptrs[g];
        }
        let mut fill = block_ptrs.clone();
        let mut block_features = vec![0usize; blocks.len()];
        for (j, &g) in blocks.iter().enumerate() {
            block_features[fill[g]] = j;
            fill[g] += 1;
        }

        let correction = touch_count
            .iter()
            .map(|&count| {
                if count == 0 {
                    0.0
                } else {
                    n_samples as f64 / count as f64
                }
            })
            .collect();

        Self {
            n_blocks,
            sample_ptrs,
            sample_blocks,
            block_ptrs,
            block_features,
            correction,
        }
    }

    #[inline]
    pub fn n_blocks(&self) -> usize {
        self.n_blocks
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.sample_ptrs.len() - 1
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.block_features.len()
    }

    /// Blocks touched by sample `i`, ascending.
    #[inline]
    pub fn blocks_of(&self, i: usize) -> &[usize] {
        &self.sample_blocks[self.sample_ptrs[i]..self.sample_ptrs[i + 1]]
    }

    /// Features owned by block `g`, ascending.
    #[inline]
    pub fn features_of(&self, g: usize) -> &[usize] {
        &self.block_features[self.block_ptrs[g]..self.block_ptrs[g + 1]]
    }

    /// Per-block correction factors `d`.
    #[inline]
    pub fn correction(&self) -> &[f64] {
        &self.correction
    }

    /// Largest block size; sizes the per-worker block buffer.
    pub fn max_block_len(&self) -> usize {
        self.block_ptrs
            .windows(2)
            .map(|w| w[1] - w[0])
            .max()
            .unwrap_or(0)
    }
}
