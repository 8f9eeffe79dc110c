//! Parse configuration.
//!
//! [`ParseOptions`] bundles the compiler arguments handed to the engine
//! with the [`BuildOptions`] for the traversal. Arguments are opaque to
//! cctree and passed through verbatim; the only checks made are the ones
//! that would otherwise crash the C boundary.

use std::path::Path;

use tracing::debug;

use crate::builder::BuildOptions;
use crate::error::{Error, Result};
use crate::identity::FingerprintStrategy;

/// Everything needed to parse one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    arguments: Vec<String>,
    build: BuildOptions,
}

impl ParseOptions {
    /// Options with no compiler arguments and default build options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one compiler argument.
    #[must_use]
    pub fn arg(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Append several compiler arguments, in order.
    #[must_use]
    pub fn args<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    /// Append the arguments listed in a `compile_flags.txt`-style file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn flags_file(self, path: &Path) -> Result<Self> {
        let flags = read_flags_file(path)?;
        debug!(path = %path.display(), count = flags.len(), "Loaded flags file");
        Ok(self.args(flags))
    }

    /// Replace the build options.
    #[must_use]
    pub fn build_options(mut self, build: BuildOptions) -> Self {
        self.build = build;
        self
    }

    /// Shorthand for changing only the fingerprint strategy.
    #[must_use]
    pub fn fingerprint(mut self, strategy: FingerprintStrategy) -> Self {
        self.build.fingerprint = strategy;
        self
    }

    /// Compiler arguments, in order.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Options for the traversal.
    #[must_use]
    pub fn build(&self) -> &BuildOptions {
        &self.build
    }

    /// Check that `path` and the arguments can cross into the engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a non-UTF-8 path, or for a path or
    /// argument containing a NUL byte.
    pub fn validate(&self, path: &Path) -> Result<()> {
        let Some(path_str) = path.to_str() else {
            return Err(Error::Config(format!(
                "source path is not valid UTF-8: {}",
                path.display()
            )));
        };
        if path_str.contains('\0') {
            return Err(Error::Config("source path contains a NUL byte".to_string()));
        }
        if let Some(position) = self.arguments.iter().position(|a| a.contains('\0')) {
            return Err(Error::Config(format!(
                "compiler argument {position} contains a NUL byte"
            )));
        }
        Ok(())
    }
}

/// Read one compiler argument per line, ignoring blank lines.
///
/// Leading and trailing whitespace is trimmed; nothing else is interpreted,
/// matching clang's `compile_flags.txt` convention.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read.
pub fn read_flags_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
