//! Path resolution entry points.
//!
//! `PathResolver` wires the pipeline together: flatten and validate the
//! configuration, order the flattened routes by specificity, normalize the
//! incoming path, match, and assemble the nested state. Resolution is a pure
//! function of its inputs; the only state a resolver owns is the cache of
//! compiled base-URL stripping rules.

use std::collections::HashMap;

use crate::config::{LinkingOptions, ParamParser};
use crate::error::NavigationResult;
use crate::flatten::{flatten_config, FlattenedRoute, InitialRouteEntry};
use crate::matcher::match_against;
use crate::segment::split_segments;
use crate::sort::compare_routes;
use crate::state::{
	apply_query_params, create_nested_state, find_focused_route, find_focused_route_mut,
	NavigationState, ParsedRoute,
};
use crate::url::{clean_url, CleanedUrl, StripRules};

/// Resolves URL paths into nested navigation state.
///
/// A resolver is cheap to construct. Keeping one instance around amortizes
/// the compiled base-URL stripping rules across calls; separate threads may
/// share it freely.
pub struct PathResolver {
	strip_rules: StripRules,
}

impl PathResolver {
	/// Creates a resolver with an empty stripping-rule cache.
	pub fn new() -> Self {
		Self {
			strip_rules: StripRules::new(),
		}
	}

	/// Resolves a path against a route configuration.
	///
	/// Returns `Ok(None)` when the path does not activate any configured
	/// route: unparseable input, a path outside the configured base URL, or
	/// no matching pattern.
	///
	/// # Errors
	///
	/// Returns a [`ConfigError`](crate::error::ConfigError) when the
	/// configuration itself is invalid, independent of the path.
	pub fn resolve(
		&self,
		path: &str,
		options: &LinkingOptions,
	) -> NavigationResult<Option<NavigationState>> {
		self.resolve_with_context(path, options, None)
	}

	/// Resolves a path, biasing ambiguous matches toward the previously
	/// active segment chain.
	///
	/// `previous_segments` is the expanded route name chain of the currently
	/// active navigation state. It only affects tie-breaking between routes
	/// that differ in group segments.
	pub fn resolve_with_context(
		&self,
		path: &str,
		options: &LinkingOptions,
		previous_segments: Option<&[String]>,
	) -> NavigationResult<Option<NavigationState>> {
		let (mut routes, initial_routes) = flatten_config(options)?;
		routes.sort_by(|a, b| compare_routes(a, b, previous_segments, &initial_routes));

		// Base URL stripping stays off in debug builds so a local dev server
		// can serve the app from the root.
		let base_rule = options
			.base_url
			.as_deref()
			.filter(|_| !cfg!(debug_assertions))
			.map(|base_url| self.strip_rules.rule(base_url));

		let Some(cleaned) = clean_url(path, base_rule.as_ref()) else {
			tracing::debug!(path, "path is not a URL or lies outside the base URL");
			return Ok(None);
		};

		if options.screens.is_empty() {
			return Ok(resolve_without_config(&cleaned, options.prefer_query_params));
		}

		if cleaned.clean_path == "/" {
			return Ok(resolve_root(&cleaned, &routes, &initial_routes, options));
		}

		let Some(parsed) = match_against(&cleaned.clean_path, &routes) else {
			tracing::debug!(path, "no configured route matches");
			return Ok(None);
		};

		Ok(assemble(&cleaned, parsed, &routes, &initial_routes, options))
	}
}

impl Default for PathResolver {
	fn default() -> Self {
		Self::new()
	}
}

/// Resolves a path with a one-shot resolver.
///
/// Callers that resolve repeatedly with a configured base URL should keep a
/// [`PathResolver`] instead, so the stripping rule is compiled once.
///
/// # Errors
///
/// Returns a [`ConfigError`](crate::error::ConfigError) for an invalid
/// configuration.
pub fn resolve(path: &str, options: &LinkingOptions) -> NavigationResult<Option<NavigationState>> {
	PathResolver::new().resolve(path, options)
}

/// Root path handling.
///
/// `/` activates only a chain whose every member declares an empty path,
/// which is exactly a flattened record with an empty joined pattern. Without
/// this carve-out the root could spuriously match a deeply nested pattern
/// made entirely of optional segments.
fn resolve_root(
	cleaned: &CleanedUrl,
	routes: &[FlattenedRoute],
	initial_routes: &[InitialRouteEntry],
	options: &LinkingOptions,
) -> Option<NavigationState> {
	let route = routes.iter().find(|route| route.pattern.is_empty())?;
	let parsed: Vec<ParsedRoute> = route
		.route_names
		.iter()
		.map(|name| ParsedRoute {
			name: name.clone(),
			params: None,
		})
		.collect();
	assemble(cleaned, parsed, routes, initial_routes, options)
}

fn assemble(
	cleaned: &CleanedUrl,
	parsed: Vec<ParsedRoute>,
	routes: &[FlattenedRoute],
	initial_routes: &[InitialRouteEntry],
	options: &LinkingOptions,
) -> Option<NavigationState> {
	let mut state = create_nested_state(&parsed, initial_routes)?;

	let focused_name = find_focused_route(&state).map(|route| route.name.clone())?;
	let parse = find_parse_config(&focused_name, routes);

	if let Some(focused) = find_focused_route_mut(&mut state) {
		focused.path = Some(resolved_path(&cleaned.clean_path));
		apply_query_params(focused, &cleaned.url, parse, options.prefer_query_params);
	}
	Some(state)
}

/// Resolution without any configured screens.
///
/// Every path segment becomes one nesting level named after the decoded
/// segment, with the deepest level focused. This keeps bare resolvers useful
/// before a configuration exists.
fn resolve_without_config(cleaned: &CleanedUrl, prefer_query: bool) -> Option<NavigationState> {
	let parsed: Vec<ParsedRoute> = split_segments(&cleaned.nonstandard_pathname)
		.map(|segment| ParsedRoute {
			name: match urlencoding::decode(segment) {
				Ok(decoded) => decoded.into_owned(),
				Err(_) => segment.to_string(),
			},
			params: None,
		})
		.collect();

	let mut state = create_nested_state(&parsed, &[])?;
	if let Some(focused) = find_focused_route_mut(&mut state) {
		focused.path = Some(resolved_path(&cleaned.nonstandard_pathname));
		apply_query_params(focused, &cleaned.url, None, prefer_query);
	}
	Some(state)
}

/// The parse map for the focused route: the first sorted record whose chain
/// ends in the focused screen name.
fn find_parse_config<'a>(
	focused_name: &str,
	routes: &'a [FlattenedRoute],
) -> Option<&'a HashMap<String, ParamParser>> {
	routes
		.iter()
		.find(|route| route.route_names.last().is_some_and(|name| name == focused_name))
		.map(|route| &route.parse)
}

/// Presentation form of the clean path: rooted, no trailing slash.
fn resolved_path(clean_path: &str) -> String {
	let trimmed = clean_path.trim_end_matches('/');
	if trimmed.is_empty() {
		"/".to_string()
	} else {
		format!("/{}", trimmed)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use crate::config::{LinkingOptions, ScreenOptions};
	use crate::state::find_focused_route;

	use super::*;

	#[test]
	fn test_root_path_requires_an_all_empty_chain() {
		let nested = LinkingOptions::new().screen(
			"Section",
			ScreenOptions::new()
				.path(":section?")
				.screen("Page", ":page?"),
		);
		assert_eq!(resolve("/", &nested).unwrap(), None);

		let rooted = LinkingOptions::new().screen(
			"Home",
			ScreenOptions::new().path("").screen("Overview", ""),
		);
		let state = resolve("/", &rooted).unwrap().unwrap();
		let focused = find_focused_route(&state).unwrap();
		assert_eq!(focused.path.as_deref(), Some("/"));
	}

	#[test]
	fn test_resolution_without_screens_nests_raw_segments() {
		let options = LinkingOptions::new();
		let state = resolve("/foo/bar%20baz", &options).unwrap().unwrap();

		assert_eq!(state.routes[0].name, "foo");
		let nested = state.routes[0].state.as_ref().unwrap();
		assert_eq!(nested.routes[0].name, "bar baz");
		assert_eq!(nested.routes[0].path.as_deref(), Some("/foo/bar%20baz"));
	}

	#[test]
	fn test_unparseable_input_is_no_match() {
		let options = LinkingOptions::new().screen("Chat", "chat/:id");
		assert_eq!(resolve("https://", &options).unwrap(), None);
	}

	#[test]
	fn test_query_coercion_uses_the_focused_routes_parse_map() {
		let options = LinkingOptions::new().screen(
			"Chat",
			ScreenOptions::new()
				.path("chat")
				.parse("count", crate::config::parsers::number()),
		);

		let state = resolve("/chat?count=7", &options).unwrap().unwrap();
		let focused = find_focused_route(&state).unwrap();
		assert_eq!(
			focused.params.as_ref().unwrap().get("count"),
			Some(&json!(7))
		);
	}
}
