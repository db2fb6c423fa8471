#[path = "../common/mod.rs"]
mod common;

mod distinct_previous;
mod latest_traversal;
mod repair;
mod revisions;
mod verification;
