//! Utility functions for common operations.
//!
//! - **URL validation**: scheme/host checks for feed sources and webhook destinations
//! - **Text processing**: HTML entity decoding for feed-provided titles
//! - **Colors**: hex color strings to embed color integers
//!
//! # Examples
//!
//! ```
//! use feedhook::util::{parse_color, unescape_html, validate_url};
//!
//! let url = validate_url("https://example.com/feed.xml").unwrap();
//! assert_eq!(unescape_html("Tom &amp; Jerry"), "Tom & Jerry");
//! assert_eq!(parse_color("#ff8800").unwrap(), 0xff8800);
//! ```

mod color;
mod text;
mod url_validator;

pub use color::{parse_color, parse_color_or_default, ColorError, DEFAULT_COLOR};
pub use text::unescape_html;
pub use url_validator::{redacted_host, validate_url, UrlValidationError};
