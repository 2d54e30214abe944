pub(crate) mod preparer;
pub(crate) mod segment;
pub(crate) mod strategy;
