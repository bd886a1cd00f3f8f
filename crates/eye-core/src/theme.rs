use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA, each channel in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            a.clamp(0.0, 1.0),
        )
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse the CSS colour forms theme variables use: `#rgb`, `#rrggbb`,
    /// `#rrggbbaa`, `rgb(..)`/`rgba(..)` in both the comma-separated and the
    /// space-separated `rgb(r g b / a)` syntax, and a few keywords.
    /// Channels are numbers in `0..=255`; alpha is a number or a percentage.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "transparent" => return Some(Self::TRANSPARENT),
            "black" => return Some(Self::BLACK),
            "white" => return Some(Self::WHITE),
            _ => {}
        }
        let args = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let channel = |p: &str| -> Option<u8> {
            let v: f32 = p.parse().ok()?;
            v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
        };

        let (channels, alpha): (Vec<&str>, Option<&str>) = if args.contains(',') {
            let mut parts: Vec<&str> = args.split(',').map(str::trim).collect();
            let alpha = if parts.len() == 4 { parts.pop() } else { None };
            (parts, alpha)
        } else {
            match args.split_once('/') {
                Some((rgb, a)) => (rgb.split_whitespace().collect(), Some(a.trim())),
                None => (args.split_whitespace().collect(), None),
            }
        };
        let &[r, g, b] = channels.as_slice() else {
            return None;
        };
        let a = match alpha {
            Some(a) => parse_alpha(a)?,
            None => 1.0,
        };
        Some(Self::from_rgba8(channel(r)?, channel(g)?, channel(b)?, a))
    }
}

/// `0.4` or `40%`.
fn parse_alpha(s: &str) -> Option<f32> {
    let v: f32 = match s.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f32>().ok()? / 100.0,
        None => s.parse().ok()?,
    };
    v.is_finite().then_some(v)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Color::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, 1.0)),
        6 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 1.0)),
        8 => Some(Color::from_rgba8(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            f32::from(byte(6)?) / 255.0,
        )),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Read-only view of the host's theme.
pub trait ThemeSource {
    fn mode(&self) -> ThemeMode;
    /// Raw value of a custom property such as `--eye-bg`, if set.
    fn variable(&self, name: &str) -> Option<String>;
}

/// A static set of theme variables, loadable from the config file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeVariables {
    #[serde(default)]
    pub mode: ThemeMode,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl ThemeVariables {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            mode,
            variables: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.variables.insert(name.to_string(), value.to_string());
        self
    }
}

impl ThemeSource for ThemeVariables {
    fn mode(&self) -> ThemeMode {
        self.mode
    }

    fn variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }
}

pub const VAR_BACKGROUND: &str = "--eye-bg";
pub const VAR_OUTLINE: &str = "--eye-outline";
pub const VAR_IRIS_START: &str = "--eye-iris-start";
pub const VAR_IRIS_END: &str = "--eye-iris-end";
pub const VAR_PUPIL: &str = "--eye-pupil";
pub const VAR_GLOW: &str = "--eye-glow";

/// Colours the painter needs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThemePalette {
    pub background: Color,
    pub outline: Color,
    pub iris_start: Color,
    pub iris_end: Color,
    pub pupil: Color,
    /// Transparent disables the outline glow.
    pub glow: Color,
    pub radial_lines: Color,
}

impl ThemePalette {
    pub fn dark() -> Self {
        Self {
            background: Color::from_rgba8(0x0B, 0x0B, 0x0D, 1.0),
            outline: Color::WHITE.with_alpha(0.4),
            iris_start: Color::from_rgba8(0x33, 0x33, 0x33, 1.0),
            iris_end: Color::from_rgba8(0x11, 0x11, 0x11, 1.0),
            pupil: Color::BLACK,
            glow: Color::WHITE.with_alpha(0.05),
            radial_lines: Color::WHITE.with_alpha(0.1),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::from_rgba8(0xF5, 0xF5, 0xF7, 1.0),
            outline: Color::BLACK.with_alpha(0.4),
            iris_start: Color::from_rgba8(0xE0, 0xE0, 0xE0, 1.0),
            iris_end: Color::from_rgba8(0xC0, 0xC0, 0xC0, 1.0),
            pupil: Color::from_rgba8(0x22, 0x22, 0x22, 1.0),
            glow: Color::TRANSPARENT,
            radial_lines: Color::BLACK.with_alpha(0.05),
        }
    }

    pub fn defaults(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    /// Read the themed variables, falling back per mode when a value is
    /// absent or unparseable. The radial-line tint only follows the mode.
    pub fn resolve(source: &dyn ThemeSource) -> Self {
        let base = Self::defaults(source.mode());
        let pick = |name: &str, fallback: Color| -> Color {
            let Some(raw) = source.variable(name) else {
                return fallback;
            };
            if raw.trim().is_empty() {
                return fallback;
            }
            Color::parse(&raw).unwrap_or_else(|| {
                log::warn!("ignoring unparseable theme value {name}: {raw:?}");
                fallback
            })
        };
        Self {
            background: pick(VAR_BACKGROUND, base.background),
            outline: pick(VAR_OUTLINE, base.outline),
            iris_start: pick(VAR_IRIS_START, base.iris_start),
            iris_end: pick(VAR_IRIS_END, base.iris_end),
            pupil: pick(VAR_PUPIL, base.pupil),
            glow: pick(VAR_GLOW, base.glow),
            radial_lines: base.radial_lines,
        }
    }
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self::dark()
    }
}
