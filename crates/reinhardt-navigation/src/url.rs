//! URL normalization.
//!
//! Incoming paths are parsed against a fixed phony origin so pathname, query
//! string, and fragment come out the same whether the input was absolute or
//! relative. The pathname is then reduced to a canonical "clean path": base
//! URL prefix stripped, group segments removed, repeated slashes collapsed,
//! leading slash dropped, and exactly one trailing slash kept as the
//! segment-splitting sentinel.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use url::Url;

use crate::segment::{split_segments, strip_group_segments};

static PHONY_ORIGIN: Lazy<Url> =
	Lazy::new(|| Url::parse("https://phony.example/").expect("static origin is a valid URL"));

/// The normalized parts of an incoming path.
pub(crate) struct CleanedUrl {
	/// Canonical matching input, e.g. `chat/jane/42/`. `/` for the root.
	pub clean_path: String,
	/// Pathname with group segments retained, trimmed to `segments… + '/'`.
	pub nonstandard_pathname: String,
	/// The parsed URL, kept for query pairs and the fragment.
	pub url: Url,
}

/// Compiled base-URL stripping rules, keyed by the base URL string.
///
/// The base URL is effectively static per process, so entries are inserted
/// lazily and never invalidated. The cache is owned by the resolver instance
/// rather than being process-global, which keeps resolution calls
/// independently testable.
pub(crate) struct StripRules {
	rules: Mutex<HashMap<String, Regex>>,
}

impl StripRules {
	pub(crate) fn new() -> Self {
		Self {
			rules: Mutex::new(HashMap::new()),
		}
	}

	/// Returns the compiled stripping rule for a base URL, compiling and
	/// caching it on first use.
	pub(crate) fn rule(&self, base_url: &str) -> Regex {
		let mut rules = self.rules.lock();
		rules
			.entry(base_url.to_string())
			.or_insert_with(|| {
				Regex::new(&format!("^/?{}", regex::escape(base_url)))
					.expect("escaped prefix is a valid expression")
			})
			.clone()
	}
}

/// Strips a configured base URL prefix from a pathname.
///
/// Leading slashes are collapsed to one before applying the rule. Returns
/// `None` when the prefix does not match, which callers treat as "this path
/// is outside the app" rather than an error.
pub(crate) fn strip_base_url(pathname: &str, rule: &Regex) -> Option<String> {
	let trimmed = pathname.trim_start_matches('/');
	let collapsed = format!("/{}", trimmed);
	let matched = rule.find(&collapsed)?;
	Some(collapsed[matched.end()..].to_string())
}

/// Parses and normalizes an incoming path.
///
/// Returns `None` when the input cannot be parsed as a URL or when a
/// configured base URL prefix does not match.
pub(crate) fn clean_url(path: &str, base_rule: Option<&Regex>) -> Option<CleanedUrl> {
	let url = PHONY_ORIGIN.join(path).ok()?;
	let pathname = url.path().to_string();

	let nonstandard_pathname = format!("{}/", pathname.trim_matches('/'));

	let stripped = match base_rule {
		Some(rule) => strip_base_url(&pathname, rule)?,
		None => pathname,
	};
	let without_groups = strip_group_segments(&stripped);

	Some(CleanedUrl {
		clean_path: to_clean_path(&without_groups),
		nonstandard_pathname,
		url,
	})
}

/// Collapses slashes and applies the trailing-slash sentinel.
fn to_clean_path(pathname: &str) -> String {
	let joined = split_segments(pathname).collect::<Vec<_>>().join("/");
	if joined.is_empty() {
		"/".to_string()
	} else {
		format!("{}/", joined)
	}
}
