//! Scene colours, stored as sRGB hex and converted to linear RGB on use.

pub const FOLIAGE: [u32; 2] = [0x1a472a, 0x0f2e1a];
pub const ORNAMENT: [u32; 5] = [
    0xffd700, // gold
    0xff0033, // shiny red
    0xeeeeee, // silver
    0x0066cc, // metallic blue
    0xff6600, // metallic orange
];
pub const CANE: [u32; 2] = [0xff0000, 0xffffff];
pub const GINGERBREAD: [u32; 2] = [0xcd853f, 0x8b4513];
pub const DUST: [u32; 2] = [0xffd700, 0xffcc00];

pub const SNOW: u32 = 0xaaccff;
pub const METEOR: u32 = 0xffffff;
pub const STAR: u32 = 0xffd700;
pub const PHOTO_FRAME: u32 = 0xd4af37;
pub const PHOTO_PLACEHOLDER: u32 = 0x1a1a1a;
pub const BACKGROUND: u32 = 0x050505;
pub const STARFIELD: u32 = 0xe6e6e6;
pub const KEY_LIGHT: u32 = 0xffd700;
pub const FILL_LIGHT: u32 = 0xc41e3a;

#[inline]
fn srgb_channel_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert a `0xRRGGBB` sRGB colour into linear RGB.
pub fn srgb_hex(hex: u32) -> [f32; 3] {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    [
        srgb_channel_to_linear(r),
        srgb_channel_to_linear(g),
        srgb_channel_to_linear(b),
    ]
}

/// Raw `0xRRGGBB` bytes with full alpha, for textures uploaded as sRGB.
pub fn hex_rgba8(hex: u32) -> [u8; 4] {
    [
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
        0xff,
    ]
}
