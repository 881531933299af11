//! Response-matrix containers for IRT estimation.
//!
//! Purpose
//! -------
//! Provide small, validated containers for observed response data so the
//! estimation loops can assume clean input. This module centralizes the
//! input checks for both response families: dichotomous (0/1) matrices and
//! polytomous (ordered category code) matrices.
//!
//! Key behaviors
//! -------------
//! - [`DichotomousData`] enforces non-emptiness, 0/1 entries, and rejects
//!   zero-variance items (endorsed by all or by none), whose difficulty is
//!   not identifiable.
//! - [`PolytomousData`] enforces non-emptiness, codes ≥ 0 with
//!   [`MISSING_RESPONSE`] as the only admissible sentinel, and at least two
//!   observed categories per item.
//!
//! Invariants & assumptions
//! ------------------------
//! - Matrices are items × participants; row index = item, column index =
//!   participant, matching the estimation conventions downstream.
//! - Validation happens exactly once, at construction; downstream modules
//!   (conditioning, kernels, accumulators) rely on these invariants and do
//!   not re-check entries.
//!
//! Conventions
//! -----------
//! - Dichotomous data carry no missingness; polytomous data mark a
//!   not-administered item/participant pair with [`MISSING_RESPONSE`].
//! - Category codes need not be consecutive; conditioning densifies them
//!   per item.
use crate::irt::errors::{IRTError, IRTResult};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Sentinel marking a missing / not-administered polytomous response.
pub const MISSING_RESPONSE: i32 = -1;

/// Validated dichotomous response matrix (items × participants).
///
/// Entries are exactly 0 (not endorsed) or 1 (endorsed). Every item has at
/// least one endorsement and one non-endorsement.
#[derive(Debug, Clone, PartialEq)]
pub struct DichotomousData {
    responses: Array2<u8>,
}

impl DichotomousData {
    /// Construct a validated dichotomous response matrix.
    ///
    /// # Parameters
    /// - `responses`: items × participants matrix of 0/1 entries.
    ///
    /// # Errors
    /// - [`IRTError::EmptyDataset`] if either dimension is zero.
    /// - [`IRTError::NonBinaryResponse`] for any entry outside {0, 1}.
    /// - [`IRTError::DegenerateItem`] for an item endorsed by every
    ///   participant or by none.
    pub fn new(responses: Array2<u8>) -> IRTResult<Self> {
        let (n_items, n_participants) = responses.dim();
        if n_items == 0 || n_participants == 0 {
            return Err(IRTError::EmptyDataset);
        }
        for item in 0..n_items {
            let mut endorsed = 0usize;
            for participant in 0..n_participants {
                let value = responses[[item, participant]];
                match value {
                    0 => {}
                    1 => endorsed += 1,
                    _ => return Err(IRTError::NonBinaryResponse { item, participant, value }),
                }
            }
            if endorsed == 0 || endorsed == n_participants {
                return Err(IRTError::DegenerateItem {
                    item,
                    endorsed,
                    total: n_participants,
                });
            }
        }
        Ok(DichotomousData { responses })
    }

    /// Number of items (rows).
    pub fn n_items(&self) -> usize {
        self.responses.nrows()
    }

    /// Number of participants (columns).
    pub fn n_participants(&self) -> usize {
        self.responses.ncols()
    }

    /// Full matrix view.
    pub fn responses(&self) -> ArrayView2<'_, u8> {
        self.responses.view()
    }

    /// One item's responses across participants.
    pub fn item(&self, item: usize) -> ArrayView1<'_, u8> {
        self.responses.row(item)
    }
}

/// Validated polytomous response matrix (items × participants).
///
/// Entries are ordered category codes ≥ 0, or [`MISSING_RESPONSE`] for a
/// not-administered pair. Codes need not be consecutive and items may use
/// different numbers of categories; conditioning densifies both.
#[derive(Debug, Clone, PartialEq)]
pub struct PolytomousData {
    responses: Array2<i32>,
}

impl PolytomousData {
    /// Construct a validated polytomous response matrix.
    ///
    /// # Parameters
    /// - `responses`: items × participants matrix of category codes, with
    ///   [`MISSING_RESPONSE`] marking missing entries.
    ///
    /// # Errors
    /// - [`IRTError::EmptyDataset`] if either dimension is zero.
    /// - [`IRTError::InvalidCategoryCode`] for codes below the sentinel.
    /// - [`IRTError::AllMissingItem`] for an item with no observed
    ///   responses.
    /// - [`IRTError::SingleCategoryItem`] for an item whose observed
    ///   responses all share one category.
    pub fn new(responses: Array2<i32>) -> IRTResult<Self> {
        let (n_items, n_participants) = responses.dim();
        if n_items == 0 || n_participants == 0 {
            return Err(IRTError::EmptyDataset);
        }
        for item in 0..n_items {
            let mut observed: Vec<i32> = Vec::new();
            for participant in 0..n_participants {
                let code = responses[[item, participant]];
                if code < MISSING_RESPONSE {
                    return Err(IRTError::InvalidCategoryCode { item, participant, code });
                }
                if code != MISSING_RESPONSE && !observed.contains(&code) {
                    observed.push(code);
                }
            }
            if observed.is_empty() {
                return Err(IRTError::AllMissingItem { item });
            }
            if observed.len() < 2 {
                return Err(IRTError::SingleCategoryItem { item, observed: observed.len() });
            }
        }
        Ok(PolytomousData { responses })
    }

    /// Number of items (rows).
    pub fn n_items(&self) -> usize {
        self.responses.nrows()
    }

    /// Number of participants (columns).
    pub fn n_participants(&self) -> usize {
        self.responses.ncols()
    }

    /// Full matrix view.
    pub fn responses(&self) -> ArrayView2<'_, i32> {
        self.responses.view()
    }

    /// One item's responses across participants.
    pub fn item(&self, item: usize) -> ArrayView1<'_, i32> {
        self.responses.row(item)
    }
}
