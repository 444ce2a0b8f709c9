/// CMake generator bookkeeping
///
/// Canonical generator names and the reuse / reconfigure / fresh-init
/// decision for a build directory.
pub use generator::{Generator, DEFAULT_GENERATOR, GENERATOR_ALIASES};
pub use reconcile::{decide, Decision};

pub mod generator;
pub mod reconcile;
