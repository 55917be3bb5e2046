use crate::error::Result;
use crate::models::ProcessedRow;

/// Append-only sink for processed rows.
///
/// Inserted rows are staged until `commit`; `close` releases the handle and
/// discards anything not committed.
#[cfg_attr(test, mockall::automock)]
pub trait Store {
    /// Stage one row, returning its assigned identifier
    fn insert(&mut self, row: &ProcessedRow) -> Result<i64>;

    /// Make every staged row durable in one transaction
    fn commit(&mut self) -> Result<()>;

    /// Release the handle. Staged rows that were not committed are rolled back.
    fn close(&mut self) -> Result<()>;
}
