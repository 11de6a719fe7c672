// Session preference model, selection catalog and their HTTP handlers.

pub mod catalog;
pub mod handlers;
pub mod model;
