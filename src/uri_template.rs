//! URI template matching
//!
//! Matches registered resource templates like `echo://{message}` against
//! concrete URIs and extracts the named parameters.

use std::collections::BTreeMap;

use tracing::debug;

/// Parameters bound by a successful template match, in name order.
pub type UriParams = BTreeMap<String, String>;

/// Split a URI into its non-empty `/`-separated segments.
///
/// Empty segments are discarded, so `echo://hello` splits into two segments
/// (`echo:` and `hello`) and the double slash carries no meaning of its own.
fn split_segments(uri: &str) -> Vec<&str> {
    uri.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Placeholder name of a template segment of the exact form `{name}`.
///
/// `{}` is not a placeholder; it is matched literally.
fn placeholder_name(segment: &str) -> Option<&str> {
    let inner = segment.strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

/// Match a URI template against a concrete URI.
///
/// A match requires the same (non-zero) number of segments on both sides.
/// Placeholder segments bind their name to the candidate segment; every
/// other segment must compare equal byte-for-byte. Returns the bound
/// parameters on success; a fully-literal template that matches yields an
/// empty map, not `None`.
pub fn match_template(template: &str, uri: &str) -> Option<UriParams> {
    let template_segments = split_segments(template);
    let uri_segments = split_segments(uri);

    if template_segments.is_empty() || template_segments.len() != uri_segments.len() {
        return None;
    }

    let mut params = UriParams::new();
    for (pattern, actual) in template_segments.iter().zip(&uri_segments) {
        if let Some(name) = placeholder_name(pattern) {
            debug!(param = name, value = actual, "Extracted URI template parameter");
            params.insert(name.to_string(), (*actual).to_string());
        } else if pattern != actual {
            debug!(expected = pattern, got = actual, "URI template segment mismatch");
            return None;
        }
    }

    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_match_extracts_param() {
        let params = match_template("echo://{message}", "echo://hello").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params["message"], "hello");
    }

    #[test]
    fn test_literal_match_yields_empty_params() {
        let params = match_template("board://sensors/data", "board://sensors/data").unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_segment_count_mismatch_fails() {
        assert!(match_template("echo://{message}", "echo://a/b").is_none());
        assert!(match_template("echo://a/b", "echo://a").is_none());
    }

    #[test]
    fn test_literal_segment_mismatch_fails() {
        assert!(match_template("board://sensors/data", "board://sensors/raw").is_none());
    }

    #[test]
    fn test_empty_inputs_never_match() {
        assert!(match_template("", "").is_none());
        assert!(match_template("", "echo://x").is_none());
        assert!(match_template("echo://{message}", "").is_none());
    }

    #[test]
    fn test_multiple_placeholders() {
        let params =
            match_template("dev://{bus}/pin/{number}", "dev://i2c/pin/7").unwrap();
        assert_eq!(params["bus"], "i2c");
        assert_eq!(params["number"], "7");
    }

    #[test]
    fn test_empty_braces_are_literal() {
        assert!(match_template("echo://{}", "echo://hello").is_none());
        let params = match_template("echo://{}", "echo://{}").unwrap();
        assert!(params.is_empty());
    }
}
