/// Straight-alpha RGBA color with four 8-bit channels.
///
/// Passed by value across every boundary (Rust API, C ABI, host adapter).
/// The GPU path converts to normalized floats with [`Color::to_f32`]; channel
/// values reach the surface unchanged (no sRGB re-encoding).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLANK: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RAYWHITE: Color = Color::rgb(245, 245, 245);
    pub const LIGHTGRAY: Color = Color::rgb(200, 200, 200);
    pub const GRAY: Color = Color::rgb(130, 130, 130);
    pub const DARKGRAY: Color = Color::rgb(80, 80, 80);
    pub const RED: Color = Color::rgb(230, 41, 55);
    pub const MAROON: Color = Color::rgb(190, 33, 55);
    pub const ORANGE: Color = Color::rgb(255, 161, 0);
    pub const YELLOW: Color = Color::rgb(253, 249, 0);
    pub const GREEN: Color = Color::rgb(0, 228, 48);
    pub const DARKGREEN: Color = Color::rgb(0, 117, 44);
    pub const SKYBLUE: Color = Color::rgb(102, 191, 255);
    pub const BLUE: Color = Color::rgb(0, 121, 241);
    pub const DARKBLUE: Color = Color::rgb(0, 82, 172);
    pub const PURPLE: Color = Color::rgb(200, 122, 255);
    pub const BROWN: Color = Color::rgb(127, 106, 79);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);

    /// Fill used in place of a texture whose handle cannot be resolved.
    pub const PLACEHOLDER: Color = Color::MAGENTA;

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Builds a color from a `[R, G, B, A]` byte array.
    #[inline]
    pub const fn from_array(c: [u8; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Normalized `[0, 1]` straight-alpha channels for shaders.
    #[inline]
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Clear value for a render pass.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b, a] = self.to_f32();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }
}

impl From<[u8; 4]> for Color {
    #[inline]
    fn from(c: [u8; 4]) -> Self {
        Color::from_array(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_f32_maps_extremes() {
        assert_eq!(Color::WHITE.to_f32(), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(Color::BLANK.to_f32(), [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn array_conversions_keep_channel_order() {
        let c = Color::from([1, 2, 3, 4]);
        assert_eq!((c.r, c.g, c.b, c.a), (1, 2, 3, 4));
        assert_eq!(c.to_array(), [1, 2, 3, 4]);
    }

    #[test]
    fn placeholder_is_magenta() {
        assert_eq!(Color::PLACEHOLDER, Color::rgb(255, 0, 255));
        assert!(Color::PLACEHOLDER.is_opaque());
    }
}
