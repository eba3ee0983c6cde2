use serde::{Deserialize, Serialize};
use std::fmt;

/// Inset from the image edges used by every anchor except [`Anchor::Center`].
pub const MARGIN: i64 = 10;

/// Where the date text is anchored on the image.
///
/// ```rust
/// use exif_stamp::render::Anchor;
///
/// assert_eq!(Anchor::from_name("top-right"), Anchor::TopRight);
/// assert_eq!(Anchor::BottomLeft.name(), "bottom-left");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl Anchor {
    /// Names accepted on the command line and in config files.
    pub const NAMES: [&'static str; 5] = [
        "top-left",
        "top-right",
        "bottom-left",
        "bottom-right",
        "center",
    ];

    /// Parse an anchor name. Unknown names fall back to [`Anchor::TopLeft`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "top-left" => Self::TopLeft,
            "top-right" => Self::TopRight,
            "bottom-left" => Self::BottomLeft,
            "bottom-right" => Self::BottomRight,
            "center" => Self::Center,
            other => {
                log::warn!("Unknown position '{other}', using top-left");
                Self::TopLeft
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Center => "center",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Top-left pixel at which the text box is drawn.
///
/// Components may be negative when the text is larger than the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
}

/// Compute where a `text_width` × `text_height` box goes on an image.
///
/// No clamping is applied: text larger than the image (plus margin) yields
/// negative coordinates, which the drawing backend clips.
///
/// ```rust
/// use exif_stamp::render::{place, Anchor, Placement};
///
/// let p = place(1000, 800, 100, 30, Anchor::BottomRight);
/// assert_eq!(p, Placement { x: 890, y: 760 });
/// ```
pub fn place(
    image_width: u32,
    image_height: u32,
    text_width: u32,
    text_height: u32,
    anchor: Anchor,
) -> Placement {
    let (iw, ih) = (i64::from(image_width), i64::from(image_height));
    let (tw, th) = (i64::from(text_width), i64::from(text_height));

    let right = iw - tw - MARGIN;
    let bottom = ih - th - MARGIN;

    let (x, y) = match anchor {
        Anchor::TopLeft => (MARGIN, MARGIN),
        Anchor::TopRight => (right, MARGIN),
        Anchor::BottomLeft => (MARGIN, bottom),
        Anchor::BottomRight => (right, bottom),
        // Floor division, so odd negative offsets round down.
        Anchor::Center => ((iw - tw).div_euclid(2), (ih - th).div_euclid(2)),
    };

    Placement {
        x: saturate(x),
        y: saturate(y),
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
