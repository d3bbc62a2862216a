//! # Reinhardt Navigation
//!
//! Deep-link path resolution into nested navigation state.
//!
//! This crate is the resolution engine at the heart of a mobile app router:
//! given a URL path and a declared tree of named routes, it determines which
//! chain of nested screens the path activates, extracts typed parameters
//! from the path and query string, and produces a state tree describing the
//! active route at every nesting level plus the inactive sibling defaults a
//! navigator needs to initialize.
//!
//! ## Overview
//!
//! Resolution runs as a fixed pipeline:
//!
//! ```text
//! path → normalize → flatten config → sort by specificity → match → assemble
//! ```
//!
//! - the nested configuration is flattened into one pattern per reachable
//!   route chain and validated (ambiguous patterns are a configuration
//!   error, not a runtime condition)
//! - flattened patterns are ordered so the most specific rule is tried
//!   first: static before dynamic before wildcard, longer prefixes first,
//!   with group continuity and declared initial routes as tie-breaks
//! - the first matching compiled pattern determines the route chain, its
//!   captured parameters are attributed to the screens that declared them,
//!   and the nested state is assembled top-down
//!
//! Paths that do not activate any route resolve to `Ok(None)`; only invalid
//! configurations produce errors.
//!
//! ## Examples
//!
//! ```
//! use reinhardt_navigation::{find_focused_route, parsers, resolve, LinkingOptions, ScreenOptions};
//! use serde_json::json;
//!
//! let options = LinkingOptions::new().screen(
//! 	"Chat",
//! 	ScreenOptions::new()
//! 		.path("chat/:author/:id")
//! 		.parse("id", parsers::number()),
//! );
//!
//! let state = resolve("/chat/jane/42", &options).unwrap().unwrap();
//! let focused = find_focused_route(&state).unwrap();
//!
//! assert_eq!(focused.name, "Chat");
//! assert_eq!(focused.path.as_deref(), Some("/chat/jane/42"));
//! assert_eq!(focused.params.as_ref().unwrap().get("id"), Some(&json!(42)));
//! ```

pub mod config;
pub mod error;
pub mod pattern;
pub mod segment;
pub mod state;

mod flatten;
mod matcher;
mod resolve;
mod sort;
mod url;

// Re-export the main types for convenience
pub use config::{parsers, LinkingOptions, ParamParser, ScreenConfig, ScreenOptions, Screens};
pub use error::{ConfigError, NavigationResult};
pub use resolve::{resolve, PathResolver};
pub use state::{find_focused_route, NavigationState, StateRoute};
