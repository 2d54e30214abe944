//! Gap constraints and the bounded reconciliation loop that restores them.

pub(crate) mod constraint;
pub(crate) mod reconciler;
