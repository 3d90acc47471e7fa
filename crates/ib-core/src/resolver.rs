//! # Host Resolver
//!
//! Maps an inbound host string to a stone identifier. Kept as a pure
//! function, independent of any web-framework request type, so it is
//! unit-testable without an HTTP layer.

/// Derives a stone id from `host`, falling back to an explicit override.
///
/// A host matches when it starts with the literal prefix `isi` followed by
/// at least one decimal digit (case-sensitive; the domain suffix and port
/// are ignored). The digit run is zero-padded to 3 digits, so `isi7` and
/// `isi007` both resolve to `stone-007`; runs longer than 3 digits pass
/// through unchanged. Non-matching hosts yield the fallback verbatim when
/// it is non-empty, otherwise None. Never errors.
pub fn resolve_stone_id(host: &str, fallback: Option<&str>) -> Option<String> {
    if let Some(rest) = host.strip_prefix("isi") {
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if !digits.is_empty() {
            return Some(format!("stone-{digits:0>3}"));
        }
    }
    fallback.filter(|id| !id.is_empty()).map(str::to_string)
}
