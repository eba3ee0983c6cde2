use anyhow::{Context, Result, bail};
use serde::Serialize;

/// Fixed name → RGB table for the `--color` option.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("white", [255, 255, 255]),
    ("black", [0, 0, 0]),
    ("red", [255, 0, 0]),
    ("green", [0, 255, 0]),
    ("blue", [0, 0, 255]),
];

/// Text color as given by the user.
///
/// Names from the fixed table become an RGB triple right away. Anything else
/// is kept verbatim and only interpreted when drawing, so an unusable value
/// fails the individual image rather than the whole run.
///
/// ```rust
/// use exif_stamp::render::ColorSpec;
///
/// assert_eq!(ColorSpec::from_arg("Red"), ColorSpec::Rgb([255, 0, 0]));
/// assert_eq!(ColorSpec::from_arg("#00ff80").resolve().unwrap(), [0, 255, 128]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Rgb([u8; 3]),
    Passthrough(String),
}

impl ColorSpec {
    pub fn from_arg(arg: &str) -> Self {
        let key = arg.to_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, rgb)| Self::Rgb(*rgb))
            .unwrap_or_else(|| Self::Passthrough(arg.to_string()))
    }

    /// Turn the color into an RGB triple.
    ///
    /// Pass-through values understand `#rgb`, `#rrggbb` and `rgb(r, g, b)`.
    pub fn resolve(&self) -> Result<[u8; 3]> {
        match self {
            Self::Rgb(rgb) => Ok(*rgb),
            Self::Passthrough(spec) => parse_spec(spec),
        }
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::Rgb([255, 255, 255])
    }
}

fn parse_spec(spec: &str) -> Result<[u8; 3]> {
    let s = spec.trim().to_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).with_context(|| format!("unknown color specifier: {spec}"));
    }

    if let Some(body) = s.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            bail!("unknown color specifier: {spec}");
        }
        let mut rgb = [0u8; 3];
        for (slot, part) in rgb.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u8>()
                .with_context(|| format!("unknown color specifier: {spec}"))?;
        }
        return Ok(rgb);
    }

    bail!("unknown color specifier: {spec}")
}

fn parse_hex(hex: &str) -> Result<[u8; 3]> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("not a hex color");
    }
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, c) in rgb.iter_mut().zip(hex.chars()) {
                let v = u8::from_str_radix(&c.to_string(), 16)?;
                *slot = v * 17;
            }
            Ok(rgb)
        }
        6 => Ok([
            u8::from_str_radix(&hex[0..2], 16)?,
            u8::from_str_radix(&hex[2..4], 16)?,
            u8::from_str_radix(&hex[4..6], 16)?,
        ]),
        _ => bail!("hex color must have 3 or 6 digits"),
    }
}
