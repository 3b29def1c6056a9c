//! sRGB to CIE xy conversion.
//!
//! The bridge's light endpoints take chromaticity coordinates, not RGB.
//! This follows the vendor's published conversion: sRGB gamma expansion
//! followed by the Wide RGB D65 matrix, then projection onto the xy
//! plane. Gamut clipping is left to the bridge, which clamps coordinates
//! to the light's own gamut.

use hue_core::XyColor;

use crate::error::CliError;

/// D65 white point, used for pure black where xy is undefined.
const WHITE_POINT: XyColor = XyColor { x: 0.3127, y: 0.3290 };

/// Parse an `RRGGBB` hex color, with an optional leading `#`.
pub fn parse_hex(input: &str) -> Result<(u8, u8, u8), CliError> {
    let hex = input.strip_prefix('#').unwrap_or(input);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CliError::Validation {
            field: "color".into(),
            reason: format!("'{input}' is not an RRGGBB hex color"),
        });
    }

    let parse = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
    Ok((parse(&hex[0..2]), parse(&hex[2..4]), parse(&hex[4..6])))
}

/// Convert an sRGB color to CIE xy chromaticity.
pub fn rgb_to_xy(r: u8, g: u8, b: u8) -> XyColor {
    let r = gamma_expand(f64::from(r) / 255.0);
    let g = gamma_expand(f64::from(g) / 255.0);
    let b = gamma_expand(f64::from(b) / 255.0);

    // Wide RGB D65 matrix from the vendor's color conversion notes.
    let x = r * 0.664_511 + g * 0.154_324 + b * 0.162_028;
    let y = r * 0.283_881 + g * 0.668_433 + b * 0.047_685;
    let z = r * 0.000_088 + g * 0.072_310 + b * 0.986_039;

    let sum = x + y + z;
    if sum <= f64::EPSILON {
        return WHITE_POINT;
    }
    XyColor {
        x: x / sum,
        y: y / sum,
    }
}

fn gamma_expand(c: f64) -> f64 {
    if c > 0.040_45 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}
