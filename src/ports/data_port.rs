//! Historical bar provider port trait.

use crate::domain::error::RebaseError;
use crate::domain::ohlcv::RawBar;

pub trait DataPort {
    /// All bars for `symbol`, timestamps still in their source encoding.
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<RawBar>, RebaseError>;

    fn list_symbols(&self) -> Result<Vec<String>, RebaseError>;
}
