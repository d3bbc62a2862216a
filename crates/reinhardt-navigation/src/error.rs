//! Error types for route configuration validation.

use thiserror::Error;

/// Errors raised while validating a route configuration tree.
///
/// These indicate a programming mistake in the static route declaration, not
/// a bad runtime path. They are raised at flatten/validate time, independent
/// of any specific input path. Paths that simply do not match any route are
/// not errors; resolution reports them as `Ok(None)`.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// A screen sets `exact` without declaring a `path`.
	///
	/// `exact` means "this path is absolute, do not join it to the parent
	/// pattern", which is meaningless without a path to anchor.
	#[error("screen '{0}' sets 'exact' but does not declare a 'path'")]
	ExactWithoutPath(String),

	/// Two distinct route chains produce the same pattern.
	///
	/// Identical patterns are allowed only when one chain is a strict prefix
	/// of the other (an inner screen omitting its own path). Anything else is
	/// ambiguous: the pattern would resolve to more than one screen.
	#[error(
		"found conflicting screens with the same pattern: '{pattern}' resolves to both '{first}' and '{second}'; patterns must uniquely identify a screen"
	)]
	ConflictingPattern {
		/// The duplicated pattern.
		pattern: String,
		/// One of the conflicting route chains.
		first: String,
		/// The other conflicting route chain.
		second: String,
	},
}

/// Result type for resolution operations.
pub type NavigationResult<T> = Result<T, ConfigError>;
