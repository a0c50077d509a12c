use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::sync::OnceLock;

// Compiled once; the pattern matches the fence markers models wrap JSON in.
static FENCE: OnceLock<Regex> = OnceLock::new();

fn fence_regex() -> &'static Regex {
    FENCE.get_or_init(|| Regex::new(r"```json\n?|\n?```").unwrap())
}

/// The model's output failed to parse as JSON even after cleanup. Carries the
/// raw text verbatim so the handler can echo it back for diagnostics.
#[derive(Debug)]
pub struct MalformedItinerary {
    pub raw_response: String,
    pub parse_error: serde_json::Error,
}

impl fmt::Display for MalformedItinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to parse itinerary JSON: {}", self.parse_error)
    }
}

impl Error for MalformedItinerary {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.parse_error)
    }
}

/// Recovers a JSON array of day objects from loosely-formatted model text.
///
/// Cleanup order: strip markdown code-fence markers, trim whitespace, then
/// parse directly when the text is already bracketed as an array; otherwise
/// wrap it in `[...]` first, which recovers a single bare object or a
/// comma-separated object list. No schema validation happens here: any
/// parseable JSON elements pass through as-is.
pub fn normalize_itinerary(raw: &str) -> Result<Vec<Value>, MalformedItinerary> {
    let cleaned = fence_regex().replace_all(raw, "");
    let cleaned = cleaned.trim();

    let json_array = if cleaned.starts_with('[') && cleaned.ends_with(']') {
        cleaned.to_string()
    } else {
        format!("[{}]", cleaned)
    };

    serde_json::from_str(&json_array).map_err(|err| MalformedItinerary {
        raw_response: raw.to_string(),
        parse_error: err,
    })
}
