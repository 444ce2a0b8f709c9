use std::fmt;
use std::str::FromStr;

/// Short generator names and the full name CMake expects after `-G`
pub const GENERATOR_ALIASES: &[(&str, &str)] = &[("ninja", "Ninja"), ("make", "Unix Makefiles")];

/// Used when neither the command line, the build dir, nor the config names one
pub const DEFAULT_GENERATOR: &str = "make";

/// A CMake generator in canonical form.
///
/// Either side of an alias pair canonicalizes to the short name, so `"Ninja"`
/// and `"ninja"` compare equal. Unknown names pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Generator(String);

impl Generator {
    pub fn new(name: &str) -> Self {
        let name = name.trim();
        let canonical = GENERATOR_ALIASES
            .iter()
            .find(|(short, full)| *short == name || *full == name)
            .map(|(short, _)| short.to_string())
            .unwrap_or_else(|| name.to_string());
        Self(canonical)
    }

    /// Canonical token, as stored in the marker file
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full name for `cmake -G`
    pub fn cmake_name(&self) -> &str {
        GENERATOR_ALIASES
            .iter()
            .find(|(short, _)| *short == self.0)
            .map(|(_, full)| *full)
            .unwrap_or(self.0.as_str())
    }

    /// Pick the generator for an operation.
    ///
    /// Precedence: explicit argument > value stored in the build dir >
    /// configured default > built-in default ("make").
    pub fn resolve(
        explicit: Option<&Generator>,
        stored: Option<&Generator>,
        configured: Option<&str>,
    ) -> Generator {
        explicit
            .or(stored)
            .cloned()
            .or_else(|| {
                configured
                    .filter(|name| !name.trim().is_empty())
                    .map(Generator::new)
            })
            .unwrap_or_else(Generator::default)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATOR)
    }
}

impl FromStr for Generator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("generator name cannot be empty".to_string());
        }
        Ok(Self::new(s))
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
