//! Data module - source loading, cleaning and filtering

mod loader;
mod processor;
mod recovery_needs;
mod sector_effects;

pub use processor::DataProcessor;
pub use recovery_needs::{load_recovery_needs, RecoveryNeedRecord};
pub use sector_effects::{load_sector_effects, SectorEffectRecord};

#[cfg(test)]
pub(crate) use processor::tests::effect;
