use super::generator::Generator;

/// What to do with a build directory before configure/build/test runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Never configured (or configured before markers existed): configure fresh
    Init,
    /// Configured with the requested generator already
    Skip,
    /// Configured with another generator: wipe the build dir, then configure
    Reinit { previous: Generator },
}

/// Decide how to reconcile a build directory with the requested generator.
///
/// Pure function of the on-disk state; acting on it lives in `tasks::cmake`.
pub fn decide(exists: bool, stored: Option<&Generator>, requested: &Generator) -> Decision {
    match stored {
        Some(previous) if exists => {
            if previous == requested {
                Decision::Skip
            } else {
                Decision::Reinit {
                    previous: previous.clone(),
                }
            }
        }
        _ => Decision::Init,
    }
}
