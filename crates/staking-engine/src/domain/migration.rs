//! Pool migration bookkeeping.

use serde::{Deserialize, Serialize};
use shared_types::PoolId;

/// Progress of one batched pool migration call.
///
/// Migration iterates the pool's stable membership index; `next_cursor` is
/// the index to resume from. Restamping is idempotent, so resuming from an
/// earlier cursor is safe, merely wasteful.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationProgress {
    pub pool: PoolId,
    /// Members migrated by this call.
    pub processed: usize,
    /// Members not yet examined.
    pub remaining: usize,
    /// Index to pass as `cursor` on the next call.
    pub next_cursor: usize,
    pub complete: bool,
}
