//! Panel registry, scoped host listeners and the per-frame driver.

pub(crate) mod listeners;
pub(crate) mod registry;
