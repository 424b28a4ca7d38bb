//! Persisted user preferences.
//!
//! The blob is stored by the host (localStorage in the browser). Loading is
//! strict: a missing field, a wrong type or an unknown enum value rejects the
//! whole blob and the defaults are used instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shapes::ShapeId;
use crate::sim::TransitionMode;

pub const DEFAULT_COLOR: &str = "#88ccff";

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("malformed preferences: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tint color {0:?}")]
    InvalidColor(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub shape: ShapeId,
    /// `#rgb` or `#rrggbb`.
    pub color: String,
    pub transition_mode: TransitionMode,
    pub show_panel: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            shape: ShapeId::default(),
            color: DEFAULT_COLOR.to_string(),
            transition_mode: TransitionMode::default(),
            show_panel: true,
        }
    }
}

impl Preferences {
    /// Parse and validate a stored blob.
    pub fn parse(json: &str) -> Result<Self, PrefsError> {
        let prefs: Self = serde_json::from_str(json)?;
        parse_hex_color(&prefs.color)?;
        Ok(prefs)
    }

    /// Parse a stored blob, falling back to defaults on any problem.
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::default();
        };
        match Self::parse(json) {
            Ok(prefs) => prefs,
            Err(e) => {
                log::warn!("ignoring stored preferences: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        // Plain struct of strings, enums and a bool: serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Tint as linear RGB; the stored color was validated on load.
    pub fn tint(&self) -> [f32; 3] {
        parse_hex_color(&self.color).unwrap_or([1.0, 1.0, 1.0])
    }
}

/// Parse `#rgb` / `#rrggbb` (leading `#` optional) into RGB in [0, 1].
pub fn parse_hex_color(text: &str) -> Result<[f32; 3], PrefsError> {
    let invalid = || PrefsError::InvalidColor(text.to_string());
    let hex = text.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    let [r, g, b] = match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, slot) in out.iter_mut().enumerate() {
                let v = channel(&hex[i..i + 1])?;
                *slot = v * 17;
            }
            out
        }
        6 => [channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?],
        _ => return Err(invalid()),
    };
    Ok([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_complete_blob() {
        let json = r##"{"shape":"saturn","color":"#ff8800","transitionMode":"vortex","showPanel":false}"##;
        let prefs = Preferences::parse(json).unwrap();
        assert_eq!(prefs.shape, ShapeId::Saturn);
        assert_eq!(prefs.transition_mode, TransitionMode::Vortex);
        assert!(!prefs.show_panel);
        assert_eq!(prefs.tint(), [1.0, 136.0 / 255.0, 0.0]);
    }

    #[test]
    fn missing_shape_falls_back_to_defaults() {
        let json = r##"{"color":"#ff8800","transitionMode":"explode","showPanel":false}"##;
        assert!(Preferences::parse(json).is_err());
        assert_eq!(Preferences::load_or_default(Some(json)), Preferences::default());
    }

    #[test]
    fn unknown_mode_falls_back_to_defaults() {
        let json = r##"{"shape":"heart","color":"#ff8800","transitionMode":"spin","showPanel":true}"##;
        assert!(matches!(Preferences::parse(json), Err(PrefsError::Json(_))));
        assert_eq!(Preferences::load_or_default(Some(json)), Preferences::default());
    }

    #[test]
    fn wrong_types_and_garbage_fall_back() {
        for json in [
            r##"{"shape":"heart","color":"#fff","transitionMode":"morph","showPanel":"yes"}"##,
            r##"{"shape":3,"color":"#fff","transitionMode":"morph","showPanel":true}"##,
            "not json",
            "",
        ] {
            assert_eq!(Preferences::load_or_default(Some(json)), Preferences::default(), "{}", json);
        }
        assert_eq!(Preferences::load_or_default(None), Preferences::default());
    }

    #[test]
    fn invalid_color_is_rejected() {
        let json = r##"{"shape":"heart","color":"teal","transitionMode":"morph","showPanel":true}"##;
        assert!(matches!(Preferences::parse(json), Err(PrefsError::InvalidColor(_))));
    }

    #[test]
    fn signed_channels_are_not_hex() {
        assert!(parse_hex_color("#+f+f+f").is_err());
        assert!(parse_hex_color("+ff").is_err());
        let json = r##"{"shape":"heart","color":"#+f+f+f","transitionMode":"morph","showPanel":true}"##;
        assert!(Preferences::parse(json).is_err());
        assert_eq!(Preferences::load_or_default(Some(json)), Preferences::default());
    }

    #[test]
    fn round_trip_through_json() {
        let prefs = Preferences {
            shape: ShapeId::Dna,
            color: "#abc".into(),
            transition_mode: TransitionMode::Explode,
            show_panel: false,
        };
        let json = prefs.to_json();
        assert!(json.contains("\"transitionMode\":\"explode\""));
        assert_eq!(Preferences::parse(&json).unwrap(), prefs);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#fff").unwrap(), [1.0, 1.0, 1.0]);
        assert_eq!(parse_hex_color("000000").unwrap(), [0.0, 0.0, 0.0]);
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
        assert!(parse_hex_color("#ééé").is_err());
    }
}
