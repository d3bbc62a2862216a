//! Match execution against the sorted route list.
//!
//! The first compiled rule that matches the remaining path wins. Captures
//! are attributed back to the screens that declared them, coerced, and then
//! cascaded: the union of all extracted parameters is copied onto every
//! route in the matched chain so outer screens see parameters declared
//! further down. That sharing is deliberate, inherited behavior.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::flatten::FlattenedRoute;
use crate::pattern::CompiledPattern;
use crate::state::ParsedRoute;

/// Tries every sorted route in order and returns the first match.
///
/// Routes with an empty pattern are skipped here; the root path is handled
/// separately so that it cannot spuriously match a nested all-optional
/// pattern.
pub(crate) fn match_against(
	remaining: &str,
	routes: &[FlattenedRoute],
) -> Option<Vec<ParsedRoute>> {
	for route in routes {
		if route.pattern.is_empty() {
			continue;
		}
		let compiled = CompiledPattern::compile(&route.pattern);
		let Some(captures) = compiled.match_path(remaining) else {
			continue;
		};

		// Later captures of a repeated raw segment overwrite earlier ones.
		let mut matched: HashMap<String, String> = HashMap::new();
		for capture in captures {
			matched.insert(capture.raw, decode_value(&capture.value));
		}

		return Some(build_chain(route, &matched, routes));
	}
	None
}

/// Percent-decodes a captured value, keeping the raw text when the escape
/// sequence is malformed.
fn decode_value(raw: &str) -> String {
	match urlencoding::decode(raw) {
		Ok(decoded) => decoded.into_owned(),
		Err(_) => raw.to_string(),
	}
}

/// Builds one parsed route per chain member, attributing each captured
/// parameter to the screen that declared it.
fn build_chain(
	matched_route: &FlattenedRoute,
	matched: &HashMap<String, String>,
	routes: &[FlattenedRoute],
) -> Vec<ParsedRoute> {
	let mut chain: Vec<ParsedRoute> = matched_route
		.route_names
		.iter()
		.map(|name| {
			// The owning record is the first one for this screen whose own
			// pattern prefixes the matched pattern. This picks the nearest
			// declaring ancestor even when a screen name is reused at
			// several depths.
			let config = routes.iter().find(|candidate| {
				candidate.screen == *name && matched_route.pattern.starts_with(&candidate.pattern)
			});

			let mut params = Map::new();
			if let Some(config) = config {
				for raw in config.path.split('/') {
					if !raw.starts_with(':') && !raw.starts_with('*') {
						continue;
					}
					let Some(value) = matched.get(raw) else {
						continue;
					};
					let name = param_name(raw);
					let coerced = match config.parse.get(name) {
						Some(parser) => (&**parser)(value),
						None => Value::String(value.clone()),
					};
					params.insert(name.to_string(), coerced);
				}
			}

			ParsedRoute {
				name: name.clone(),
				params: if params.is_empty() { None } else { Some(params) },
			}
		})
		.collect();

	// Cascade: outer to inner, later declarations override, and every route
	// in the chain receives the combined set.
	let mut combined = Map::new();
	for route in &chain {
		if let Some(params) = &route.params {
			for (key, value) in params {
				combined.insert(key.clone(), value.clone());
			}
		}
	}
	if !combined.is_empty() {
		for route in &mut chain {
			route.params = Some(combined.clone());
		}
	}

	chain
}

/// Strips the `:`/`*` prefix and the optional `?` suffix from a pattern
/// segment.
fn param_name(raw: &str) -> &str {
	let name = raw
		.strip_prefix(':')
		.or_else(|| raw.strip_prefix('*'))
		.unwrap_or(raw);
	name.strip_suffix('?').unwrap_or(name)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use crate::config::{parsers, LinkingOptions, ScreenOptions};
	use crate::flatten::flatten_config;
	use crate::sort::compare_routes;

	use super::*;

	fn matched(options: &LinkingOptions, remaining: &str) -> Option<Vec<ParsedRoute>> {
		let (mut routes, initials) = flatten_config(options).unwrap();
		routes.sort_by(|a, b| compare_routes(a, b, None, &initials));
		match_against(remaining, &routes)
	}

	#[test]
	fn test_params_are_attributed_and_coerced() {
		let options = LinkingOptions::new().screen(
			"Chat",
			ScreenOptions::new()
				.path("chat/:author/:id")
				.parse("id", parsers::number()),
		);

		let chain = matched(&options, "chat/jane/42/").unwrap();
		assert_eq!(chain.len(), 1);
		assert_eq!(chain[0].name, "Chat");
		assert_eq!(
			chain[0].params,
			Some(json!({ "author": "jane", "id": 42 }).as_object().unwrap().clone())
		);
	}

	#[test]
	fn test_params_cascade_across_the_chain() {
		let options = LinkingOptions::new().screen(
			"Author",
			ScreenOptions::new()
				.path("users/:author")
				.screen("Post", "posts/:id"),
		);

		let chain = matched(&options, "users/jane/posts/42/").unwrap();
		let names: Vec<&str> = chain.iter().map(|route| route.name.as_str()).collect();
		assert_eq!(names, ["Author", "Post"]);

		let expected = json!({ "author": "jane", "id": "42" });
		for route in &chain {
			assert_eq!(route.params, Some(expected.as_object().unwrap().clone()));
		}
	}

	#[test]
	fn test_values_are_percent_decoded() {
		let options = LinkingOptions::new().screen("User", "users/:name");

		let chain = matched(&options, "users/a%20b/").unwrap();
		assert_eq!(
			chain[0].params.as_ref().unwrap().get("name"),
			Some(&json!("a b"))
		);
	}

	#[test]
	fn test_wildcard_capture_keeps_inner_slashes() {
		let options = LinkingOptions::new().screen("Docs", "docs/*slug");

		let chain = matched(&options, "docs/guide/intro/").unwrap();
		assert_eq!(
			chain[0].params.as_ref().unwrap().get("slug"),
			Some(&json!("guide/intro"))
		);
	}

	#[test]
	fn test_no_rule_matches_is_not_an_error() {
		let options = LinkingOptions::new().screen("Chat", "chat/:id");
		assert!(matched(&options, "settings/").is_none());
	}

	#[test]
	fn test_empty_patterns_are_skipped() {
		let options = LinkingOptions::new()
			.screen("Home", ScreenOptions::new().path(""))
			.screen("Chat", "chat");

		let chain = matched(&options, "chat/").unwrap();
		assert_eq!(chain[0].name, "Chat");
	}
}
