//! Route configuration tree.
//!
//! A configuration is a nested tree of named screens. Each screen is either a
//! bare pattern string or a [`ScreenOptions`] value carrying its own path
//! fragment, nested screens, an initial route declaration, and per-parameter
//! coercers. Declaration order of screens is significant for match priority
//! tie-breaking, so the tree stores children in insertion order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

/// A parameter coercion function.
///
/// Coercers receive the raw (percent-decoded) string value and produce the
/// typed value stored in the resulting state. They are treated as trusted,
/// total functions; a coercer that panics on malformed input propagates the
/// panic to the caller.
pub type ParamParser = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// Ordered mapping of screen name to configuration node.
pub type Screens = IndexMap<String, ScreenConfig>;

/// One node of the route configuration tree.
#[derive(Debug, Clone)]
pub enum ScreenConfig {
	/// A leaf screen whose whole configuration is its pattern fragment.
	Path(String),
	/// A screen with a full set of options, possibly nesting further screens.
	Options(Box<ScreenOptions>),
}

impl From<&str> for ScreenConfig {
	fn from(path: &str) -> Self {
		ScreenConfig::Path(path.to_string())
	}
}

impl From<String> for ScreenConfig {
	fn from(path: String) -> Self {
		ScreenConfig::Path(path)
	}
}

impl From<ScreenOptions> for ScreenConfig {
	fn from(options: ScreenOptions) -> Self {
		ScreenConfig::Options(Box::new(options))
	}
}

/// Configuration for a single screen.
///
/// # Examples
///
/// ```
/// use reinhardt_navigation::{parsers, ScreenOptions};
///
/// let chat = ScreenOptions::new()
/// 	.path("chat/:author/:id")
/// 	.parse("id", parsers::number());
/// ```
#[derive(Clone, Default)]
pub struct ScreenOptions {
	pub(crate) path: Option<String>,
	pub(crate) exact: bool,
	pub(crate) initial_route_name: Option<String>,
	pub(crate) screens: Screens,
	pub(crate) parse: HashMap<String, ParamParser>,
}

impl ScreenOptions {
	/// Creates an empty screen configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the path pattern fragment for this screen.
	///
	/// The fragment is joined to the parent pattern unless [`exact`] is set.
	/// An empty fragment is a valid declaration and is distinct from no
	/// declaration at all.
	///
	/// [`exact`]: Self::exact
	pub fn path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}

	/// Marks the path as absolute instead of joined to the parent pattern.
	pub fn exact(mut self, exact: bool) -> Self {
		self.exact = exact;
		self
	}

	/// Declares which nested screen is the inactive default at this level.
	pub fn initial_route_name(mut self, name: impl Into<String>) -> Self {
		self.initial_route_name = Some(name.into());
		self
	}

	/// Adds a nested screen.
	pub fn screen(mut self, name: impl Into<String>, config: impl Into<ScreenConfig>) -> Self {
		self.screens.insert(name.into(), config.into());
		self
	}

	/// Registers a coercer for a path or query parameter of this screen.
	pub fn parse(mut self, param: impl Into<String>, parser: ParamParser) -> Self {
		self.parse.insert(param.into(), parser);
		self
	}
}

impl fmt::Debug for ScreenOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut parse_keys: Vec<&String> = self.parse.keys().collect();
		parse_keys.sort();
		f.debug_struct("ScreenOptions")
			.field("path", &self.path)
			.field("exact", &self.exact)
			.field("initial_route_name", &self.initial_route_name)
			.field("screens", &self.screens)
			.field("parse", &parse_keys)
			.finish()
	}
}

/// Top-level linking configuration handed to the resolver.
///
/// # Examples
///
/// ```
/// use reinhardt_navigation::{LinkingOptions, ScreenOptions};
///
/// let options = LinkingOptions::new()
/// 	.initial_route_name("Home")
/// 	.screen("Home", "")
/// 	.screen("Profile", ScreenOptions::new().path("users/:id"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinkingOptions {
	pub(crate) base_url: Option<String>,
	pub(crate) initial_route_name: Option<String>,
	pub(crate) screens: Screens,
	pub(crate) prefer_query_params: bool,
}

impl LinkingOptions {
	/// Creates an empty configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the base URL prefix stripped from incoming paths.
	///
	/// Stripping is skipped in debug builds so local development servers can
	/// serve the app from the root. A configured prefix that does not match
	/// the incoming path makes resolution report no match.
	pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = Some(base_url.into());
		self
	}

	/// Declares the inactive default screen at the root level.
	pub fn initial_route_name(mut self, name: impl Into<String>) -> Self {
		self.initial_route_name = Some(name.into());
		self
	}

	/// Adds a top-level screen.
	pub fn screen(mut self, name: impl Into<String>, config: impl Into<ScreenConfig>) -> Self {
		self.screens.insert(name.into(), config.into());
		self
	}

	/// Lets query parameters override same-named path parameters.
	///
	/// By default the path-derived value wins and the conflicting query value
	/// is dropped with a warning.
	pub fn prefer_query_params(mut self, prefer: bool) -> Self {
		self.prefer_query_params = prefer;
		self
	}
}

/// Ready-made parameter coercers.
pub mod parsers {
	use std::sync::Arc;

	use serde_json::Value;

	use super::ParamParser;

	/// Coerces a parameter to a JSON number.
	///
	/// Integral values stay integral; anything else falls back to a float,
	/// and unparseable input becomes `null`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_navigation::parsers;
	/// use serde_json::json;
	///
	/// let number = parsers::number();
	/// assert_eq!(number("42"), json!(42));
	/// assert_eq!(number("2.5"), json!(2.5));
	/// ```
	pub fn number() -> ParamParser {
		Arc::new(|raw: &str| {
			if let Ok(value) = raw.parse::<i64>() {
				return Value::from(value);
			}
			raw.parse::<f64>().map(Value::from).unwrap_or(Value::Null)
		})
	}

	/// Wraps an arbitrary function as a [`ParamParser`].
	pub fn custom<F>(f: F) -> ParamParser
	where
		F: Fn(&str) -> Value + Send + Sync + 'static,
	{
		Arc::new(f)
	}
}
