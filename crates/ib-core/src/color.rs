//! # Pin-Color Strategies
//!
//! Two generations of color assignment exist and are kept as separate
//! strategies behind one trait, selected by configuration and never mixed
//! within a request. Rotation is the authoritative default.

use crate::models::Post;

/// The palette cycled through by [`RotationStrategy`] when no override
/// is configured.
pub const DEFAULT_PALETTE: [&str; 4] = ["#E53935", "#1E88E5", "#43A047", "#FDD835"];

/// Picks the pin color for a post about to be appended.
///
/// `latest` is the most recent prior post of the same stone. Strategies
/// never error; a None result means the post is stored uncolored.
pub trait ColorStrategy: Send + Sync {
    fn assign(&self, requested: Option<&str>, nickname: &str, latest: Option<&Post>) -> Option<String>;
}

/// Cycles through a fixed 4-color palette, keeping consecutive posts by
/// the same nickname on the same color so they group visually.
pub struct RotationStrategy {
    palette: [String; 4],
}

impl RotationStrategy {
    pub fn new(palette: [String; 4]) -> Self {
        Self { palette }
    }
}

impl Default for RotationStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.map(str::to_string))
    }
}

impl ColorStrategy for RotationStrategy {
    /// First post on a stone gets `palette[0]`. A repeat nickname reuses
    /// the latest color; anyone else advances one step, wrapping at the
    /// end. A latest color that is null or not in the palette restarts
    /// the cycle at `palette[0]`.
    fn assign(&self, _requested: Option<&str>, nickname: &str, latest: Option<&Post>) -> Option<String> {
        let latest = match latest {
            Some(post) => post,
            None => return Some(self.palette[0].clone()),
        };

        if latest.nickname == nickname {
            if let Some(color) = &latest.pin_color {
                return Some(color.clone());
            }
        }

        let next = latest
            .pin_color
            .as_deref()
            .and_then(|color| self.palette.iter().position(|p| p.as_str() == color))
            .map(|idx| (idx + 1) % self.palette.len())
            .unwrap_or(0);

        Some(self.palette[next].clone())
    }
}

/// Trusts the caller's color when it is well-formed, drops it otherwise.
/// The post itself always succeeds.
pub struct ClientSuppliedStrategy;

impl ColorStrategy for ClientSuppliedStrategy {
    fn assign(&self, requested: Option<&str>, _nickname: &str, _latest: Option<&Post>) -> Option<String> {
        requested
            .filter(|color| is_hex_color(color))
            .map(str::to_string)
    }
}

/// `#` followed by exactly 6 hexadecimal digits, case-insensitive.
pub fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
