//! Path segment helpers shared by the normalizer, sorter, and compiler.

/// Returns the name of a route group segment, if the segment is one.
///
/// Group segments are written `(name)`. They organize routes without ever
/// appearing in real URLs.
///
/// # Examples
///
/// ```
/// use reinhardt_navigation::segment::match_group_name;
///
/// assert_eq!(match_group_name("(app)"), Some("app"));
/// assert_eq!(match_group_name("users"), None);
/// assert_eq!(match_group_name("()"), None);
/// ```
pub fn match_group_name(segment: &str) -> Option<&str> {
	let inner = segment.strip_prefix('(')?.strip_suffix(')')?;
	if inner.is_empty() || inner.contains('/') {
		return None;
	}
	Some(inner)
}

/// Removes group segments from a slash-separated path.
///
/// # Examples
///
/// ```
/// use reinhardt_navigation::segment::strip_group_segments;
///
/// assert_eq!(strip_group_segments("/(app)/users/42"), "/users/42");
/// assert_eq!(strip_group_segments("users/42"), "users/42");
/// ```
pub fn strip_group_segments(path: &str) -> String {
	path.split('/')
		.filter(|segment| match_group_name(segment).is_none())
		.collect::<Vec<_>>()
		.join("/")
}

/// Iterates the non-empty segments of a slash-separated path.
pub(crate) fn split_segments(path: &str) -> impl Iterator<Item = &str> {
	path.split('/').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("(app)", Some("app"))]
	#[case("(pork)", Some("pork"))]
	#[case("()", None)]
	#[case("(a/b)", None)]
	#[case("users", None)]
	#[case("(unclosed", None)]
	fn test_match_group_name(#[case] segment: &str, #[case] expected: Option<&str>) {
		assert_eq!(match_group_name(segment), expected);
	}

	#[test]
	fn test_strip_group_segments_keeps_slash_shape() {
		assert_eq!(strip_group_segments("/(a)/x/(b)/y"), "/x/y");
		assert_eq!(strip_group_segments("(a)/x"), "x");
		assert_eq!(strip_group_segments("/(a)"), "");
	}

	#[test]
	fn test_split_segments_drops_empties() {
		let segments: Vec<&str> = split_segments("//a///b/").collect();
		assert_eq!(segments, ["a", "b"]);
	}
}
