//! Report generation port trait.

use crate::domain::error::RebaseError;
use crate::domain::simulator::SimulationResult;
use crate::domain::strategy::StrategyConfig;
use std::path::Path;

/// Port for writing simulation results.
pub trait ReportPort {
    fn write(
        &self,
        result: &SimulationResult,
        config: &StrategyConfig,
        output_dir: &Path,
    ) -> Result<(), RebaseError>;
}
