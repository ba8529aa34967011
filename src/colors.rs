//! Color constants and helpers. All colors are ARGB8888 packed into a `u32`.

pub const BLACK: u32 = 0xFF000000;
pub const WHITE: u32 = 0xFFFFFFFF;
pub const TRANSPARENT: u32 = 0x00000000;

pub const CEILING: u32 = 0xFF383838;
pub const FLOOR: u32 = 0xFF707070;

/// Flat colors used when a wall or sprite type has no texture at all.
const FALLBACK_PALETTE: [u32; 8] = [
    0xFFB03030, // red
    0xFF30A030, // green
    0xFF3050B0, // blue
    0xFFC0C0C0, // light gray
    0xFFC0A030, // ochre
    0xFF8040A0, // purple
    0xFF30A0A0, // teal
    0xFFA06030, // brown
];

#[inline]
pub const fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    pack_argb(0xFF, r, g, b)
}

/// Splits a color into `[a, r, g, b]`.
#[inline]
pub const fn unpack(color: u32) -> [u8; 4] {
    [
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    ]
}

#[inline]
pub const fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

/// Composites a solid `overlay` color with the given `opacity` (0 = invisible,
/// 1 = fully covering) over `color`. The result is opaque.
#[inline]
pub fn blend_overlay(color: u32, overlay: u32, opacity: f64) -> u32 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity == 0.0 {
        return color | 0xFF000000;
    }
    let [_, r, g, b] = unpack(color);
    let [_, or, og, ob] = unpack(overlay);
    let mix = |c: u8, o: u8| (c as f64 * (1.0 - opacity) + o as f64 * opacity).round() as u8;
    pack_rgb(mix(r, or), mix(g, og), mix(b, ob))
}

/// Deterministic flat color for a type id with no texture.
#[inline]
pub fn fallback_color(id: u32) -> u32 {
    FALLBACK_PALETTE[id as usize % FALLBACK_PALETTE.len()]
}
