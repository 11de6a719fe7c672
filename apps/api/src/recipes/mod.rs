// Saved recipes: the reconciler, the keyed blob store behind it, and
// plain-text sharing.

pub mod handlers;
pub mod reconciler;
pub mod share;
pub mod store;
