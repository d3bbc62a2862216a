//! Match priority ordering for flattened routes.
//!
//! The comparator decides which of two overlapping patterns is tried first.
//! Its stages run in a fixed order; reordering them silently changes route
//! priority for ambiguous configurations:
//!
//! 1. identical patterns: deterministic reverse-lexicographic chain order
//! 2. strict pattern prefix: the longer pattern first, except against an
//!    `index` leaf, which keeps competing on segments
//! 3. fully static routes before dynamic, wildcard, and layout routes
//! 4. continuity with the previously active group segments
//! 5. segment-by-segment specificity
//! 6. declared initial routes before their siblings
//! 7. more segments first

use std::cmp::Ordering;

use crate::flatten::{FlattenedRoute, InitialRouteEntry};
use crate::segment::{match_group_name, split_segments};

/// Reserved catch-all that always loses against other wildcards.
const NOT_FOUND_WILDCARD: &str = "*not-found";

pub(crate) fn compare_routes(
	a: &FlattenedRoute,
	b: &FlattenedRoute,
	previous_segments: Option<&[String]>,
	initial_routes: &[InitialRouteEntry],
) -> Ordering {
	// Identical patterns are already validated as prefix chains; the order
	// only has to be deterministic so error messages stay stable.
	if a.pattern == b.pattern {
		return b.route_names.join(">").cmp(&a.route_names.join(">"));
	}

	// The more exhaustive pattern wins, but an `index` leaf keeps competing
	// on segment count below instead of being demoted outright.
	if a.pattern.starts_with(&b.pattern) && b.screen != "index" {
		return Ordering::Less;
	}
	if b.pattern.starts_with(&a.pattern) && a.screen != "index" {
		return Ordering::Greater;
	}

	let a_parts = sort_parts(a);
	let b_parts = sort_parts(b);

	let a_static = is_fully_static(&a_parts) && !a.has_children;
	let b_static = is_fully_static(&b_parts) && !b.has_children;
	if a_static && !b_static {
		return Ordering::Less;
	}
	if b_static && !a_static {
		return Ordering::Greater;
	}

	// Stay inside the group the user is already navigating in.
	if let Some(previous) = previous_segments {
		let a_shared = shared_group_count(&a.expanded_route_names, previous);
		let b_shared = shared_group_count(&b.expanded_route_names, previous);
		if a_shared != b_shared {
			return b_shared.cmp(&a_shared);
		}
	}

	for i in 0..a_parts.len().max(b_parts.len()) {
		match (a_parts.get(i), b_parts.get(i)) {
			(None, Some(b_part)) => {
				// The longer pattern wins unless its extra segment is a
				// wildcard, which stays the last resort.
				return if b_part.starts_with('*') {
					Ordering::Less
				} else {
					Ordering::Greater
				};
			}
			(Some(a_part), None) => {
				return if a_part.starts_with('*') {
					Ordering::Greater
				} else {
					Ordering::Less
				};
			}
			(Some(a_part), Some(b_part)) => {
				let a_wild = a_part.starts_with('*');
				let b_wild = b_part.starts_with('*');
				if a_wild && b_wild {
					let a_not_found = *a_part == NOT_FOUND_WILDCARD;
					let b_not_found = *b_part == NOT_FOUND_WILDCARD;
					if a_not_found && !b_not_found {
						return Ordering::Greater;
					}
					if b_not_found && !a_not_found {
						return Ordering::Less;
					}
					continue;
				}
				if a_wild {
					return Ordering::Greater;
				}
				if b_wild {
					return Ordering::Less;
				}

				let a_dynamic = a_part.starts_with(':');
				let b_dynamic = b_part.starts_with(':');
				if a_dynamic && b_dynamic {
					continue;
				}
				if a_dynamic {
					return Ordering::Greater;
				}
				if b_dynamic {
					return Ordering::Less;
				}
				// Two literals cannot both match the same path segment, so
				// their relative order keeps being decided further right.
			}
			(None, None) => unreachable!("loop is bounded by the longer side"),
		}
	}

	let a_initial = is_declared_initial(a, initial_routes);
	let b_initial = is_declared_initial(b, initial_routes);
	if a_initial && !b_initial {
		return Ordering::Less;
	}
	if b_initial && !a_initial {
		return Ordering::Greater;
	}

	b_parts.len().cmp(&a_parts.len())
}

/// Pattern segments used for specificity comparison.
///
/// Group segments never appear in real URLs, so they are ignored. An `index`
/// leaf contributes a synthetic trailing segment so its length stays
/// comparable to a sibling dynamic or wildcard segment at the same depth.
fn sort_parts(route: &FlattenedRoute) -> Vec<&str> {
	let mut parts: Vec<&str> = split_segments(&route.pattern)
		.filter(|part| match_group_name(part).is_none())
		.collect();
	if route.screen == "index" || route.screen.ends_with("/index") {
		parts.push("index");
	}
	parts
}

fn is_fully_static(parts: &[&str]) -> bool {
	parts
		.iter()
		.all(|part| !part.starts_with(':') && !part.starts_with('*'))
}

/// Counts group segments shared with the previously active chain.
///
/// Only the common prefix counts; continuity ends at the first divergence.
fn shared_group_count(expanded_route_names: &[String], previous_segments: &[String]) -> usize {
	expanded_route_names
		.iter()
		.zip(previous_segments)
		.take_while(|(name, previous)| name == previous)
		.filter(|(name, _)| match_group_name(name).is_some())
		.count()
}

fn is_declared_initial(route: &FlattenedRoute, initial_routes: &[InitialRouteEntry]) -> bool {
	initial_routes.iter().any(|entry| {
		entry.initial_route_name == route.screen
			&& entry.parent_screens.len() + 1 == route.route_names.len()
			&& entry
				.parent_screens
				.iter()
				.zip(&route.route_names)
				.all(|(a, b)| a == b)
	})
}

#[cfg(test)]
mod tests {
	use crate::config::{LinkingOptions, ScreenConfig};
	use crate::flatten::flatten_config;

	use super::*;

	fn sorted_patterns(
		options: &LinkingOptions,
		previous_segments: Option<&[String]>,
	) -> Vec<String> {
		let (mut routes, initials) = flatten_config(options).unwrap();
		routes.sort_by(|a, b| compare_routes(a, b, previous_segments, &initials));
		routes.into_iter().map(|route| route.pattern).collect()
	}

	fn options_of(screens: &[(&str, &str)]) -> LinkingOptions {
		screens.iter().fold(LinkingOptions::new(), |acc, (name, path)| {
			acc.screen(*name, ScreenConfig::Path(path.to_string()))
		})
	}

	#[test]
	fn test_static_routes_sort_before_dynamic_siblings() {
		let options = options_of(&[("User", "users/:id"), ("Settings", "users/settings")]);
		assert_eq!(sorted_patterns(&options, None), ["users/settings", "users/:id"]);
	}

	#[test]
	fn test_longer_prefix_sorts_first() {
		let options = options_of(&[("Short", "a/b"), ("Long", "a/b/c")]);
		assert_eq!(sorted_patterns(&options, None), ["a/b/c", "a/b"]);
	}

	#[test]
	fn test_dynamic_sorts_before_wildcard() {
		let options = options_of(&[("CatchAll", "*catchall"), ("Slug", ":slug")]);
		assert_eq!(sorted_patterns(&options, None), [":slug", "*catchall"]);
	}

	#[test]
	fn test_not_found_wildcard_sorts_after_other_wildcards() {
		let options = options_of(&[("NotFound", "*not-found"), ("Rest", "*rest")]);
		assert_eq!(sorted_patterns(&options, None), ["*rest", "*not-found"]);
	}

	#[test]
	fn test_previous_group_segments_keep_navigation_sticky() {
		let options = options_of(&[("(beef)/bacon", "(beef)/bacon"), ("(pork)/bacon", "(pork)/bacon")]);

		let previous = vec!["(pork)".to_string(), "bacon".to_string()];
		assert_eq!(
			sorted_patterns(&options, Some(&previous)),
			["(pork)/bacon", "(beef)/bacon"]
		);

		let previous = vec!["(beef)".to_string(), "bacon".to_string()];
		assert_eq!(
			sorted_patterns(&options, Some(&previous)),
			["(beef)/bacon", "(pork)/bacon"]
		);
	}

	#[test]
	fn test_declared_initial_route_sorts_before_sibling() {
		let options = LinkingOptions::new()
			.initial_route_name("B")
			.screen("A", ":a")
			.screen("B", ":b");

		assert_eq!(sorted_patterns(&options, None), [":b", ":a"]);
	}

	#[test]
	fn test_identical_patterns_order_deterministically() {
		// Prefix chains may share a pattern; the tie-break is by reverse
		// lexicographic chain so output is stable across runs.
		let options = LinkingOptions::new().screen(
			"Feed",
			crate::config::ScreenOptions::new()
				.path("feed")
				.screen("Inner", crate::config::ScreenOptions::new().path("")),
		);

		let (mut routes, initials) = flatten_config(&options).unwrap();
		routes.sort_by(|a, b| compare_routes(a, b, None, &initials));
		let chains: Vec<String> = routes
			.iter()
			.map(|route| route.route_names.join(">"))
			.collect();
		assert_eq!(chains, ["Feed>Inner", "Feed"]);
	}
}
