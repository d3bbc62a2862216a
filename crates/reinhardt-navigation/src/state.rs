//! Navigation state assembly.
//!
//! The matched chain of routes is turned into a nested state tree, one level
//! per chain member. Levels with a declared initial route get that sibling
//! inserted as the inactive default before the active route. The deepest
//! active leaf (the focused route) receives the resolved path plus query and
//! hash parameters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::config::ParamParser;
use crate::flatten::InitialRouteEntry;

/// The key under which a URL fragment is stored in the focused params.
const HASH_PARAM: &str = "#";

/// A nested navigation state tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NavigationState {
	/// Index of the active route. Defaults to the last route when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub index: Option<usize>,
	/// The routes present at this level, inactive defaults first.
	pub routes: Vec<StateRoute>,
}

/// One route within a [`NavigationState`] level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRoute {
	/// Screen name.
	pub name: String,
	/// Extracted parameters, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub params: Option<Map<String, Value>>,
	/// The resolved path. Set only on the focused route.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,
	/// Nested state for the next level down.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<NavigationState>,
}

/// The result unit of matching, before assembly.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedRoute {
	pub name: String,
	pub params: Option<Map<String, Value>>,
}

/// Builds the nested state tree from the matched chain, root first.
pub(crate) fn create_nested_state(
	parsed: &[ParsedRoute],
	initial_routes: &[InitialRouteEntry],
) -> Option<NavigationState> {
	let (route, rest) = parsed.split_first()?;
	let mut parent_screens = Vec::new();
	Some(build_level(route, rest, &mut parent_screens, initial_routes))
}

fn build_level(
	route: &ParsedRoute,
	rest: &[ParsedRoute],
	parent_screens: &mut Vec<String>,
	initial_routes: &[InitialRouteEntry],
) -> NavigationState {
	let initial = find_initial_route(&route.name, parent_screens, initial_routes);
	parent_screens.push(route.name.clone());

	let mut current = StateRoute {
		name: route.name.clone(),
		params: route.params.clone(),
		path: None,
		state: None,
	};
	if let Some((next, remaining)) = rest.split_first() {
		current.state = Some(build_level(next, remaining, parent_screens, initial_routes));
	}

	match initial {
		Some(initial_name) => NavigationState {
			index: Some(1),
			routes: vec![
				StateRoute {
					name: initial_name.to_string(),
					params: route.params.clone(),
					path: None,
					state: None,
				},
				current,
			],
		},
		None => NavigationState {
			index: None,
			routes: vec![current],
		},
	}
}

/// Looks up the declared initial route for a nesting level.
///
/// The entry applies only when its parent chain matches the current chain
/// exactly, in length and in every name, and names a sibling other than the
/// route that is already active.
fn find_initial_route<'a>(
	route_name: &str,
	parent_screens: &[String],
	initial_routes: &'a [InitialRouteEntry],
) -> Option<&'a str> {
	for entry in initial_routes {
		let same_parents = entry.parent_screens.len() == parent_screens.len()
			&& entry
				.parent_screens
				.iter()
				.zip(parent_screens)
				.all(|(a, b)| a == b);
		if same_parents && route_name != entry.initial_route_name {
			return Some(&entry.initial_route_name);
		}
	}
	None
}

/// Returns the focused route: the deepest active leaf of the state tree.
///
/// At every level the active route is the one at `index`, or the last route
/// when no index is set.
///
/// # Examples
///
/// ```
/// use reinhardt_navigation::{find_focused_route, NavigationState, StateRoute};
///
/// let state = NavigationState {
/// 	index: None,
/// 	routes: vec![StateRoute {
/// 		name: "Home".to_string(),
/// 		params: None,
/// 		path: None,
/// 		state: None,
/// 	}],
/// };
/// assert_eq!(find_focused_route(&state).map(|route| route.name.as_str()), Some("Home"));
/// ```
pub fn find_focused_route(state: &NavigationState) -> Option<&StateRoute> {
	let mut state = state;
	loop {
		let index = state.index.unwrap_or(state.routes.len().checked_sub(1)?);
		let route = state.routes.get(index)?;
		match &route.state {
			Some(next) if !next.routes.is_empty() => state = next,
			_ => return Some(route),
		}
	}
}

/// Mutable counterpart of [`find_focused_route`], for attaching the resolved
/// path and query parameters.
pub(crate) fn find_focused_route_mut(state: &mut NavigationState) -> Option<&mut StateRoute> {
	let index = state.index.unwrap_or(state.routes.len().checked_sub(1)?);
	let descend = state
		.routes
		.get(index)
		.and_then(|route| route.state.as_ref())
		.is_some_and(|next| !next.routes.is_empty());
	let route = state.routes.get_mut(index)?;
	if descend {
		find_focused_route_mut(route.state.as_mut()?)
	} else {
		Some(route)
	}
}

/// Merges query string and hash parameters into the focused route.
///
/// Repeated query keys become an ordered array; a single occurrence stays
/// scalar. Coercion is applied per value. When a query key collides with a
/// path-derived parameter the path value wins and the query value is dropped
/// with a diagnostic, unless `prefer_query` flips the policy.
pub(crate) fn apply_query_params(
	route: &mut StateRoute,
	url: &Url,
	parse: Option<&HashMap<String, ParamParser>>,
	prefer_query: bool,
) {
	let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
	for (key, value) in url.query_pairs() {
		match grouped.iter_mut().find(|(existing, _)| *existing == key) {
			Some((_, values)) => values.push(value.into_owned()),
			None => grouped.push((key.into_owned(), vec![value.into_owned()])),
		}
	}

	for (key, values) in grouped {
		let parser = parse.and_then(|map| map.get(&key));
		let coerce = |value: &str| match parser {
			Some(parser) => (&**parser)(value),
			None => Value::String(value.to_string()),
		};
		let coerced = if values.len() == 1 {
			coerce(&values[0])
		} else {
			Value::Array(values.iter().map(|value| coerce(value)).collect())
		};

		let params = route.params.get_or_insert_with(Map::new);
		if params.contains_key(&key) && !prefer_query {
			tracing::warn!(
				param = %key,
				"query parameter collides with a path parameter; keeping the path value"
			);
			continue;
		}
		params.insert(key, coerced);
	}

	if let Some(fragment) = url.fragment() {
		if !fragment.is_empty() {
			route
				.params
				.get_or_insert_with(Map::new)
				.insert(HASH_PARAM.to_string(), Value::String(fragment.to_string()));
		}
	}
}
