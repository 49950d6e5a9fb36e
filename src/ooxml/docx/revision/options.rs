/// Revision processing options.
use serde::{Deserialize, Serialize};

/// Options controlling revision processing.
///
/// # Examples
///
/// ```
/// use redline::ooxml::docx::revision::RevisionOptions;
///
/// let options = RevisionOptions::new().with_parallel(false);
/// assert!(options.validate);
/// assert!(!options.parallel);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionOptions {
    /// Check the output for leftover revision markup and broken table
    /// structure before returning it
    pub validate: bool,
    /// Process the parts of a package on the rayon thread pool
    pub parallel: bool,
}

impl Default for RevisionOptions {
    fn default() -> Self {
        Self {
            validate: true,
            parallel: true,
        }
    }
}

impl RevisionOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable output validation.
    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Enable or disable parallel part processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
