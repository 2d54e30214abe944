//! Panel configuration, the mounted panel instance and its refresh coordinator.

pub(crate) mod config;
pub(crate) mod instance;
pub(crate) mod presets;
pub(crate) mod refresh;
pub(crate) mod synth;
