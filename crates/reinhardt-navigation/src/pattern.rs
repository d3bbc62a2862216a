//! Pattern compilation and segment matching.
//!
//! A pattern such as `chat/:author/:id` compiles into an ordered list of
//! typed segment matchers instead of a concatenated regular expression. The
//! compiled rule is anchored at both ends: it must consume the entire
//! remaining path, with wildcards as the only sanctioned way to absorb an
//! arbitrary tail. Matching operates on the clean path, where every segment
//! carries a trailing slash.

use crate::segment::{match_group_name, split_segments};

/// One typed segment of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
	/// Plain text, matched exactly.
	Literal(String),
	/// A `(name)` group. Matched literally when present, skipped otherwise,
	/// and never captured.
	Group(String),
	/// A `:name` parameter matching one non-slash segment. `:name?` makes it
	/// optional.
	Dynamic {
		/// Parameter name without the leading `:` or trailing `?`.
		name: String,
		/// Whether the segment may match nothing at all.
		optional: bool,
	},
	/// A `*name` wildcard greedily matching one or more segments. `*name?`
	/// also matches zero segments.
	Wildcard {
		/// Parameter name without the leading `*` or trailing `?`.
		name: String,
		/// Whether the wildcard may match zero segments.
		optional: bool,
	},
}

/// Classifies a raw pattern segment.
///
/// # Examples
///
/// ```
/// use reinhardt_navigation::pattern::{parse_segment, PatternSegment};
///
/// assert_eq!(
/// 	parse_segment(":id?"),
/// 	PatternSegment::Dynamic { name: "id".to_string(), optional: true }
/// );
/// assert_eq!(
/// 	parse_segment("*not-found"),
/// 	PatternSegment::Wildcard { name: "not-found".to_string(), optional: false }
/// );
/// assert_eq!(parse_segment("(app)"), PatternSegment::Group("app".to_string()));
/// assert_eq!(parse_segment("chat"), PatternSegment::Literal("chat".to_string()));
/// ```
pub fn parse_segment(raw: &str) -> PatternSegment {
	if let Some(rest) = raw.strip_prefix(':') {
		let (name, optional) = split_optional(rest);
		return PatternSegment::Dynamic {
			name: name.to_string(),
			optional,
		};
	}
	if let Some(rest) = raw.strip_prefix('*') {
		let (name, optional) = split_optional(rest);
		return PatternSegment::Wildcard {
			name: name.to_string(),
			optional,
		};
	}
	if let Some(name) = match_group_name(raw) {
		return PatternSegment::Group(name.to_string());
	}
	PatternSegment::Literal(raw.to_string())
}

fn split_optional(name: &str) -> (&str, bool) {
	match name.strip_suffix('?') {
		Some(required) => (required, true),
		None => (name, false),
	}
}

/// A value captured by a dynamic or wildcard segment.
///
/// The raw pattern segment text is kept alongside the value so captures can
/// be attributed back to the route that declared them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
	/// The pattern segment that produced this capture, e.g. `:id` or `*slug`.
	pub raw: String,
	/// The matched text, without its trailing slash and not yet decoded.
	pub value: String,
}

/// A pattern compiled into an ordered list of segment matchers.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
	segments: Vec<(String, PatternSegment)>,
}

impl CompiledPattern {
	/// Compiles a normalized, slash-joined pattern.
	pub fn compile(pattern: &str) -> Self {
		let segments = split_segments(pattern)
			.map(|raw| (raw.to_string(), parse_segment(raw)))
			.collect();
		Self { segments }
	}

	/// Whether the pattern has no segments at all.
	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	/// Matches the whole remaining clean path.
	///
	/// `remaining` must be in clean-path form: no leading slash, no repeated
	/// slashes, every segment followed by exactly one slash. Returns the
	/// captures of dynamic and wildcard segments on success.
	pub fn match_path(&self, remaining: &str) -> Option<Vec<Capture>> {
		let mut captures = Vec::new();
		if match_from(&self.segments, remaining, &mut captures) {
			Some(captures)
		} else {
			None
		}
	}
}

/// Recursive matcher over the segment list.
///
/// Alternatives are tried greedily, consuming input first, which mirrors the
/// behavior of the greedy optional and wildcard groups this grammar replaces.
/// Failed branches leave `captures` unchanged.
fn match_from(segments: &[(String, PatternSegment)], input: &str, captures: &mut Vec<Capture>) -> bool {
	let Some(((raw, segment), rest)) = segments.split_first() else {
		return input.is_empty();
	};

	match segment {
		PatternSegment::Literal(literal) => match eat_literal(input, literal) {
			Some(next) => match_from(rest, next, captures),
			None => false,
		},
		PatternSegment::Group(name) => {
			let literal = format!("({})", name);
			if let Some(next) = eat_literal(input, &literal) {
				if match_from(rest, next, captures) {
					return true;
				}
			}
			match_from(rest, input, captures)
		}
		PatternSegment::Dynamic { optional, .. } => {
			if let Some((value, next)) = eat_segment(input) {
				captures.push(Capture {
					raw: raw.clone(),
					value: value.to_string(),
				});
				if match_from(rest, next, captures) {
					return true;
				}
				captures.pop();
			}
			*optional && match_from(rest, input, captures)
		}
		PatternSegment::Wildcard { optional, .. } => {
			// Try the longest tail first, backing off one segment at a time.
			let mut boundaries: Vec<usize> = input
				.char_indices()
				.filter(|(_, c)| *c == '/')
				.map(|(i, _)| i + 1)
				.collect();
			while let Some(end) = boundaries.pop() {
				captures.push(Capture {
					raw: raw.clone(),
					value: input[..end].trim_end_matches('/').to_string(),
				});
				if match_from(rest, &input[end..], captures) {
					return true;
				}
				captures.pop();
			}
			*optional && match_from(rest, input, captures)
		}
	}
}

/// Consumes `literal` plus its trailing slash.
fn eat_literal<'a>(input: &'a str, literal: &str) -> Option<&'a str> {
	input.strip_prefix(literal)?.strip_prefix('/')
}

/// Consumes one non-empty segment plus its trailing slash.
fn eat_segment(input: &str) -> Option<(&str, &str)> {
	let slash = input.find('/')?;
	if slash == 0 {
		return None;
	}
	Some((&input[..slash], &input[slash + 1..]))
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn captures(pattern: &str, path: &str) -> Option<Vec<(String, String)>> {
		CompiledPattern::compile(pattern)
			.match_path(path)
			.map(|caps| caps.into_iter().map(|c| (c.raw, c.value)).collect())
	}

	#[test]
	fn test_literal_segments_match_exactly() {
		assert_eq!(captures("a/b", "a/b/"), Some(vec![]));
		assert_eq!(captures("a/b", "a/b/c/"), None);
		assert_eq!(captures("a/b", "a/"), None);
		assert_eq!(captures("a/b", "a/bc/"), None);
	}

	#[test]
	fn test_dynamic_segment_captures_one_segment() {
		assert_eq!(
			captures("users/:id", "users/42/"),
			Some(vec![(":id".to_string(), "42".to_string())])
		);
		assert_eq!(captures("users/:id", "users/"), None);
		assert_eq!(captures("users/:id", "users/42/edit/"), None);
	}

	#[test]
	fn test_optional_dynamic_segment_may_be_absent() {
		assert_eq!(captures("posts/:id?", "posts/"), Some(vec![]));
		assert_eq!(
			captures("posts/:id?", "posts/5/"),
			Some(vec![(":id?".to_string(), "5".to_string())])
		);
	}

	#[test]
	fn test_wildcard_absorbs_nested_segments() {
		assert_eq!(
			captures("docs/*slug", "docs/a/b/c/"),
			Some(vec![("*slug".to_string(), "a/b/c".to_string())])
		);
		assert_eq!(captures("docs/*slug", "docs/"), None);
		assert_eq!(captures("docs/*slug?", "docs/"), Some(vec![]));
	}

	#[test]
	fn test_wildcard_backtracks_for_following_literals() {
		assert_eq!(
			captures("docs/*slug/edit", "docs/a/b/edit/"),
			Some(vec![("*slug".to_string(), "a/b".to_string())])
		);
	}

	#[rstest]
	#[case("(app)/home", "home/")]
	#[case("(app)/home", "(app)/home/")]
	fn test_group_segment_is_optional_and_uncaptured(#[case] pattern: &str, #[case] path: &str) {
		assert_eq!(captures(pattern, path), Some(vec![]));
	}

	#[test]
	fn test_match_is_anchored_at_both_ends() {
		assert_eq!(captures(":slug", "a/b/"), None);
		assert_eq!(captures("a", ""), None);
		assert_eq!(captures("", ""), Some(vec![]));
	}
}
