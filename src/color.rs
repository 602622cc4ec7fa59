use ultraviolet::Vec3;

/// An sRGB encoded color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb8(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb8(0x00, 0x00, 0x00);
    pub const HOT_PINK: Color = Color::rgb8(0xff, 0x69, 0xb4);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// `0xRRGGBB`
    pub const fn hex(value: u32) -> Self {
        Self::rgb8(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        )
    }

    /// `0xRGB`, every digit doubled like in CSS
    pub const fn short_hex(value: u16) -> Self {
        let r = ((value >> 8) & 0xf) as u8;
        let g = ((value >> 4) & 0xf) as u8;
        let b = (value & 0xf) as u8;
        Self::rgb8(r * 17, g * 17, b * 17)
    }

    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn to_linear(self) -> Vec3 {
        Vec3::new(
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        )
    }

    pub fn from_linear(linear: Vec3) -> Self {
        Self {
            r: linear_to_srgb(linear.x),
            g: linear_to_srgb(linear.y),
            b: linear_to_srgb(linear.z),
        }
    }
}

fn srgb_to_linear(value: f32) -> f32 {
    if value < 0.04045 {
        value * 0.0773993808
    } else {
        (value * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

fn linear_to_srgb(value: f32) -> f32 {
    if value < 0.0031308 {
        value * 12.92
    } else {
        1.055 * value.powf(0.41666) - 0.055
    }
}
