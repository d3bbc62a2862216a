//! Flattening of the nested configuration tree.
//!
//! Every screen that declares a path becomes one flat record carrying the
//! joined pattern and the full route name chain from the root. Initial route
//! declarations are collected alongside, keyed by the chain of the level they
//! apply to. The route name chain is passed by value on recursion so sibling
//! branches can never observe each other's mutations.

use std::collections::HashMap;

use crate::config::{LinkingOptions, ParamParser, ScreenConfig};
use crate::error::ConfigError;
use crate::segment::split_segments;

/// One flattened route record.
pub(crate) struct FlattenedRoute {
	/// Leaf screen name.
	pub screen: String,
	/// Route name chain from the root to this screen.
	pub route_names: Vec<String>,
	/// Joined pattern, slash-separated with no leading or trailing slash.
	pub pattern: String,
	/// This screen's own path fragment, before joining.
	pub path: String,
	/// This screen's parameter coercers.
	pub parse: HashMap<String, ParamParser>,
	/// Whether the screen nests further screens.
	pub has_children: bool,
	/// Route names split on internal slashes, for group-aware comparisons.
	pub expanded_route_names: Vec<String>,
}

impl std::fmt::Debug for FlattenedRoute {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FlattenedRoute")
			.field("screen", &self.screen)
			.field("route_names", &self.route_names)
			.field("pattern", &self.pattern)
			.field("path", &self.path)
			.field("parse", &self.parse.keys().collect::<Vec<_>>())
			.field("has_children", &self.has_children)
			.field("expanded_route_names", &self.expanded_route_names)
			.finish()
	}
}

/// Declares the inactive default sibling for one nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InitialRouteEntry {
	pub initial_route_name: String,
	/// Route name chain identifying the level the declaration applies to.
	pub parent_screens: Vec<String>,
}

/// Flattens a configuration tree into route records and initial route
/// declarations.
///
/// # Errors
///
/// Returns [`ConfigError::ExactWithoutPath`] for a screen that sets `exact`
/// without a path, and [`ConfigError::ConflictingPattern`] when two unrelated
/// chains produce the same pattern.
pub(crate) fn flatten_config(
	options: &LinkingOptions,
) -> Result<(Vec<FlattenedRoute>, Vec<InitialRouteEntry>), ConfigError> {
	let mut routes = Vec::new();
	let mut initials = Vec::new();

	if let Some(initial) = &options.initial_route_name {
		initials.push(InitialRouteEntry {
			initial_route_name: initial.clone(),
			parent_screens: Vec::new(),
		});
	}

	for (screen, config) in &options.screens {
		flatten_node(screen, config, &[], "", &mut routes, &mut initials)?;
	}

	validate_patterns(&routes)?;
	Ok((routes, initials))
}

fn flatten_node(
	screen: &str,
	config: &ScreenConfig,
	chain: &[String],
	parent_pattern: &str,
	routes: &mut Vec<FlattenedRoute>,
	initials: &mut Vec<InitialRouteEntry>,
) -> Result<(), ConfigError> {
	let mut route_names = chain.to_vec();
	route_names.push(screen.to_string());

	match config {
		ScreenConfig::Path(path) => {
			let fragment = normalize_fragment(path);
			let pattern = join_patterns(parent_pattern, &fragment);
			routes.push(make_route(
				screen,
				route_names,
				pattern,
				fragment,
				HashMap::new(),
				false,
			));
		}
		ScreenConfig::Options(options) => {
			if options.exact && options.path.is_none() {
				return Err(ConfigError::ExactWithoutPath(screen.to_string()));
			}

			let fragment = options.path.as_deref().map(normalize_fragment);
			let pattern = match &fragment {
				Some(fragment) if options.exact => fragment.clone(),
				Some(fragment) => join_patterns(parent_pattern, fragment),
				None => parent_pattern.to_string(),
			};

			if let Some(fragment) = fragment {
				routes.push(make_route(
					screen,
					route_names.clone(),
					pattern.clone(),
					fragment,
					options.parse.clone(),
					!options.screens.is_empty(),
				));
			}

			if let Some(initial) = &options.initial_route_name {
				initials.push(InitialRouteEntry {
					initial_route_name: initial.clone(),
					parent_screens: route_names.clone(),
				});
			}

			for (child, child_config) in &options.screens {
				flatten_node(child, child_config, &route_names, &pattern, routes, initials)?;
			}
		}
	}

	Ok(())
}

fn make_route(
	screen: &str,
	route_names: Vec<String>,
	pattern: String,
	path: String,
	parse: HashMap<String, ParamParser>,
	has_children: bool,
) -> FlattenedRoute {
	let expanded_route_names = route_names
		.iter()
		.flat_map(|name| name.split('/'))
		.map(str::to_string)
		.collect();
	FlattenedRoute {
		screen: screen.to_string(),
		route_names,
		pattern,
		path,
		parse,
		has_children,
		expanded_route_names,
	}
}

/// Drops empty segments from a declared path fragment.
fn normalize_fragment(path: &str) -> String {
	split_segments(path).collect::<Vec<_>>().join("/")
}

fn join_patterns(parent: &str, child: &str) -> String {
	[parent, child]
		.iter()
		.filter(|part| !part.is_empty())
		.copied()
		.collect::<Vec<_>>()
		.join("/")
}

/// Rejects configurations where the same pattern reaches unrelated chains.
fn validate_patterns(routes: &[FlattenedRoute]) -> Result<(), ConfigError> {
	let mut seen: HashMap<&str, &FlattenedRoute> = HashMap::new();
	for route in routes {
		let Some(existing) = seen.get(route.pattern.as_str()) else {
			seen.insert(&route.pattern, route);
			continue;
		};

		let (shorter, longer) = if existing.route_names.len() <= route.route_names.len() {
			(*existing, route)
		} else {
			(route, *existing)
		};
		let is_prefix = shorter
			.route_names
			.iter()
			.zip(&longer.route_names)
			.all(|(a, b)| a == b);
		if !is_prefix {
			return Err(ConfigError::ConflictingPattern {
				pattern: route.pattern.clone(),
				first: existing.route_names.join(" > "),
				second: route.route_names.join(" > "),
			});
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::config::ScreenOptions;

	use super::*;

	fn patterns(options: &LinkingOptions) -> Vec<(String, String)> {
		let (routes, _) = flatten_config(options).unwrap();
		routes
			.into_iter()
			.map(|route| (route.route_names.join(" > "), route.pattern))
			.collect()
	}

	#[test]
	fn test_nested_patterns_join_parent_fragments() {
		let options = LinkingOptions::new().screen(
			"Feed",
			ScreenOptions::new()
				.path("feed")
				.screen("Item", "item/:id")
				.screen("Settings", ScreenOptions::new().path("settings")),
		);

		assert_eq!(
			patterns(&options),
			[
				("Feed".to_string(), "feed".to_string()),
				("Feed > Item".to_string(), "feed/item/:id".to_string()),
				("Feed > Settings".to_string(), "feed/settings".to_string()),
			]
		);
	}

	#[test]
	fn test_exact_path_ignores_the_parent_pattern() {
		let options = LinkingOptions::new().screen(
			"Feed",
			ScreenOptions::new()
				.path("feed")
				.screen("Item", ScreenOptions::new().path("item/:id").exact(true)),
		);

		assert_eq!(
			patterns(&options),
			[
				("Feed".to_string(), "feed".to_string()),
				("Feed > Item".to_string(), "item/:id".to_string()),
			]
		);
	}

	#[test]
	fn test_screen_without_path_joins_children_to_grandparent() {
		let options = LinkingOptions::new().screen(
			"Root",
			ScreenOptions::new()
				.path("root")
				.screen("Section", ScreenOptions::new().screen("Leaf", "leaf")),
		);

		assert_eq!(
			patterns(&options),
			[
				("Root".to_string(), "root".to_string()),
				("Root > Section > Leaf".to_string(), "root/leaf".to_string()),
			]
		);
	}

	#[test]
	fn test_exact_without_path_is_rejected() {
		let options =
			LinkingOptions::new().screen("Broken", ScreenOptions::new().exact(true));

		let error = flatten_config(&options).unwrap_err();
		assert!(matches!(error, ConfigError::ExactWithoutPath(screen) if screen == "Broken"));
	}

	#[test]
	fn test_conflicting_patterns_are_rejected() {
		let options = LinkingOptions::new()
			.screen("A", "users/:id")
			.screen("B", "users/:id");

		let error = flatten_config(&options).unwrap_err();
		assert!(matches!(error, ConfigError::ConflictingPattern { .. }));
	}

	#[test]
	fn test_prefix_chains_may_share_a_pattern() {
		// An inner screen with no path of its own shares the parent pattern.
		let options = LinkingOptions::new().screen(
			"Feed",
			ScreenOptions::new()
				.path("feed")
				.screen("Default", ScreenOptions::new().path("")),
		);

		let (routes, _) = flatten_config(&options).unwrap();
		assert_eq!(routes.len(), 2);
		assert_eq!(routes[0].pattern, "feed");
		assert_eq!(routes[1].pattern, "feed");
	}

	#[test]
	fn test_initial_route_entries_record_the_parent_chain() {
		let options = LinkingOptions::new().initial_route_name("Home").screen(
			"Home",
			ScreenOptions::new()
				.path("")
				.initial_route_name("Feed")
				.screen("Feed", "feed")
				.screen("Profile", "profile"),
		);

		let (_, initials) = flatten_config(&options).unwrap();
		assert_eq!(
			initials,
			[
				InitialRouteEntry {
					initial_route_name: "Home".to_string(),
					parent_screens: Vec::new(),
				},
				InitialRouteEntry {
					initial_route_name: "Feed".to_string(),
					parent_screens: vec!["Home".to_string()],
				},
			]
		);
	}

	#[test]
	fn test_expanded_route_names_split_on_slashes() {
		let options = LinkingOptions::new().screen(
			"(app)/home",
			ScreenOptions::new().path("(app)/home").screen("Detail", ":id"),
		);

		let (routes, _) = flatten_config(&options).unwrap();
		let detail = routes.iter().find(|r| r.screen == "Detail").unwrap();
		assert_eq!(detail.expanded_route_names, ["(app)", "home", "Detail"]);
	}
}
