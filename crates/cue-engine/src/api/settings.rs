// api/settings.rs
//
// User-facing display and pacing settings, plus engine tuning.
// Both are plain serde structs with defaults; the host persists them as JSON.

use serde::{Deserialize, Serialize};

use super::error::{check_color, check_range, Result};
use crate::matcher::MatcherConfig;
use crate::motion::{MotionConfig, Pace};

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Timed scroll pace, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollPace {
    /// Speed setting, 0..=20.
    Speed(f32),
    /// Words (or ideographs) per minute.
    Wpm(f32),
}

impl Default for ScrollPace {
    fn default() -> Self {
        ScrollPace::Speed(5.0)
    }
}

impl ScrollPace {
    /// Motion pace for a script with `reading_units` words.
    pub fn to_pace(self, reading_units: usize) -> Pace {
        match self {
            ScrollPace::Speed(speed) => Pace::Speed(speed),
            ScrollPace::Wpm(wpm) => Pace::Wpm { wpm, units: reading_units },
        }
    }
}

/// Teleprompter display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Font size in px (default: 40).
    pub font_size: f32,
    /// Line height as a multiple of font size (default: 1.6).
    pub line_height: f32,
    /// Letter spacing in px (default: 0).
    pub letter_spacing: f32,
    pub text_align: TextAlign,
    /// Focus line position, percent of viewport height from the top (default: 50).
    pub baseline_percent: f32,
    /// Highlight the focus line (default: false).
    pub focus_enabled: bool,
    pub pace: ScrollPace,
    /// Seconds of countdown before a timed scroll (default: 0).
    pub countdown_secs: u32,
    pub font_color: String,
    pub bg_color: String,
    /// Flip horizontally for beam-splitter glass (default: false).
    pub mirror: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_size: 40.0,
            line_height: 1.6,
            letter_spacing: 0.0,
            text_align: TextAlign::Center,
            baseline_percent: 50.0,
            focus_enabled: false,
            pace: ScrollPace::default(),
            countdown_secs: 0,
            font_color: "#ffffff".to_string(),
            bg_color: "#000000".to_string(),
            mirror: false,
        }
    }
}

impl Settings {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        check_range("font_size", self.font_size as f64, 8.0, 200.0)?;
        check_range("line_height", self.line_height as f64, 0.8, 4.0)?;
        check_range("letter_spacing", self.letter_spacing as f64, -10.0, 50.0)?;
        check_range("baseline_percent", self.baseline_percent as f64, 0.0, 100.0)?;
        check_range("countdown_secs", self.countdown_secs as f64, 0.0, 60.0)?;
        match self.pace {
            ScrollPace::Speed(speed) => check_range("speed", speed as f64, 0.0, 20.0)?,
            ScrollPace::Wpm(wpm) => check_range("wpm", wpm as f64, 20.0, 600.0)?,
        }
        check_color("font_color", &self.font_color)?;
        check_color("bg_color", &self.bg_color)?;
        Ok(())
    }

    /// One rendered line, in px.
    pub fn line_height_px(&self) -> f32 {
        self.font_size * self.line_height
    }

    /// Whether switching from `self` to `other` changes text metrics.
    pub fn affects_layout(&self, other: &Settings) -> bool {
        self.font_size != other.font_size
            || self.line_height != other.line_height
            || self.letter_spacing != other.letter_spacing
            || self.text_align != other.text_align
            || self.baseline_percent != other.baseline_percent
    }
}

/// Session timers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Wait between start attempts while layout is unmeasured (default: 100 ms).
    pub layout_retry_ms: f32,
    /// Attempts before a pending start is abandoned (default: 50).
    pub layout_retry_limit: u32,
    /// Idle seconds before the controls hide during a timed scroll (default: 5).
    pub chrome_hide_secs: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            layout_retry_ms: 100.0,
            layout_retry_limit: 50,
            chrome_hide_secs: 5.0,
        }
    }
}

/// Engine tuning; rarely changed, never shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub matcher: MatcherConfig,
    pub motion: MotionConfig,
    pub session: SessionConfig,
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.matcher;
        check_range("matcher.window", m.window as f64, 1.0, 10_000.0)?;
        check_range("matcher.buffer_capacity", m.buffer_capacity as f64, 2.0, 1_000.0)?;
        check_range("matcher.min_suffix_len", m.min_suffix_len as f64, 1.0, m.max_suffix_len as f64)?;
        check_range("matcher.fuzzy_threshold", m.fuzzy_threshold as f64, 0.0, 1.0)?;
        check_range("matcher.cjk_distance_scale", m.cjk_distance_scale as f64, 0.0, 10.0)?;

        let mo = &self.motion;
        check_range("motion.dead_zone", mo.dead_zone as f64, 0.0, 100.0)?;
        check_range("motion.follow_ease_rate", mo.follow_ease_rate as f64, 0.1, 120.0)?;
        check_range("motion.momentum_decay", mo.momentum_decay as f64, 0.0, 0.999)?;
        check_range("motion.momentum_step_hz", mo.momentum_step_hz as f64, 1.0, 1_000.0)?;

        let s = &self.session;
        check_range("session.layout_retry_ms", s.layout_retry_ms as f64, 1.0, 10_000.0)?;
        check_range("session.chrome_hide_secs", s.chrome_hide_secs as f64, 0.0, 600.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::SettingsError;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.font_size, 40.0);
        assert_eq!(s.text_align, TextAlign::Center);
        assert_eq!(s.pace, ScrollPace::Speed(5.0));
        assert!((s.line_height_px() - 64.0).abs() < 1e-4);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let s = Settings::from_json(r##"{ "font_size": 56, "pace": { "wpm": 160 }, "bg_color": "#112233" }"##)
            .unwrap();
        assert_eq!(s.font_size, 56.0);
        assert_eq!(s.pace, ScrollPace::Wpm(160.0));
        assert_eq!(s.bg_color, "#112233");
        assert_eq!(s.font_color, "#ffffff");
        assert_eq!(s.countdown_secs, 0);
    }

    #[test]
    fn json_roundtrip() {
        let s = Settings { mirror: true, countdown_secs: 3, ..Settings::default() };
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn rejects_out_of_range() {
        let err = Settings::from_json(r#"{ "pace": { "speed": 99 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::OutOfRange { field: "speed", .. }));

        let err = Settings::from_json(r#"{ "font_color": "red" }"#).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidColor { field: "font_color", .. }));

        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn layout_affecting_changes() {
        let a = Settings::default();
        let b = Settings { font_size: 48.0, ..a.clone() };
        let c = Settings { font_color: "#ff0000".into(), mirror: true, ..a.clone() };
        assert!(a.affects_layout(&b));
        assert!(!a.affects_layout(&c));
    }

    #[test]
    fn pace_conversion() {
        assert_eq!(ScrollPace::Speed(3.0).to_pace(100), Pace::Speed(3.0));
        assert_eq!(ScrollPace::Wpm(150.0).to_pace(300), Pace::Wpm { wpm: 150.0, units: 300 });
    }

    #[test]
    fn tuning_from_json() {
        let t = Tuning::from_json(r#"{ "matcher": { "window": 80 }, "session": { "layout_retry_limit": 5 } }"#)
            .unwrap();
        assert_eq!(t.matcher.window, 80);
        assert_eq!(t.matcher.buffer_capacity, 60);
        assert_eq!(t.session.layout_retry_limit, 5);
        assert_eq!(t.motion, MotionConfig::default());

        let err = Tuning::from_json(r#"{ "motion": { "momentum_decay": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::OutOfRange { field: "motion.momentum_decay", .. }));
    }
}
