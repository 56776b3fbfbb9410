use coolor::{Hsl, Rgb};
use ratatui::style::Color;

/// Converts between ratatui colours and HSL for derived shades.
pub struct ColorConverter;

impl ColorConverter {
    #[must_use]
    pub fn to_hsl(color: Color) -> Hsl {
        let (r, g, b) = rgb_components(color);
        Rgb::new(r, g, b).to_hsl()
    }

    #[must_use]
    pub fn to_ratatui(hsl: Hsl) -> Color {
        let rgb: Rgb = hsl.to_rgb();
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }

    /// Same hue as `color` with the given lightness and saturation.
    #[must_use]
    pub fn shade(color: Color, lightness: f32, saturation: f32) -> Color {
        let mut hsl = Self::to_hsl(color);
        hsl.l = lightness;
        hsl.s = saturation;
        Self::to_ratatui(hsl)
    }
}

fn rgb_components(color: Color) -> (u8, u8, u8) {
    let index = match color {
        Color::Rgb(r, g, b) => return (r, g, b),
        Color::Indexed(i) => i,
        Color::Black => 0,
        Color::Red => 1,
        Color::Green => 2,
        Color::Yellow => 3,
        Color::Blue => 4,
        Color::Magenta => 5,
        Color::Cyan => 6,
        Color::Gray => 7,
        Color::DarkGray => 8,
        Color::LightRed => 9,
        Color::LightGreen => 10,
        Color::LightYellow => 11,
        Color::LightBlue => 12,
        Color::LightMagenta => 13,
        Color::LightCyan => 14,
        _ => 15,
    };
    ansi_to_rgb(index)
}

fn ansi_to_rgb(i: u8) -> (u8, u8, u8) {
    const BASE: [(u8, u8, u8); 16] = [
        (0, 0, 0),
        (170, 0, 0),
        (0, 170, 0),
        (170, 85, 0),
        (0, 0, 170),
        (170, 0, 170),
        (0, 170, 170),
        (170, 170, 170),
        (85, 85, 85),
        (255, 85, 85),
        (85, 255, 85),
        (255, 255, 85),
        (85, 85, 255),
        (255, 85, 255),
        (85, 255, 255),
        (255, 255, 255),
    ];

    match i {
        0..=15 => BASE[usize::from(i)],
        16..=231 => {
            let i = i - 16;
            let map = |c: u8| if c == 0 { 0 } else { c * 40 + 55 };
            (map(i / 36), map((i / 6) % 6), map(i % 6))
        }
        _ => {
            let v = (i - 232) * 10 + 8;
            (v, v, v)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_round_trip() {
        let original = Color::Rgb(100, 150, 200);
        let back = ColorConverter::to_ratatui(ColorConverter::to_hsl(original));

        let Color::Rgb(r, g, b) = back else {
            panic!("Expected RGB color");
        };
        assert!((i16::from(r) - 100).abs() <= 1);
        assert!((i16::from(g) - 150).abs() <= 1);
        assert!((i16::from(b) - 200).abs() <= 1);
    }

    #[test]
    fn test_named_colors_use_ansi_table() {
        assert_eq!(rgb_components(Color::Yellow), (170, 85, 0));
        assert_eq!(rgb_components(Color::Reset), (255, 255, 255));
    }

    #[test]
    fn test_ansi_256_cube_and_grays() {
        assert_eq!(ansi_to_rgb(208), (255, 135, 0));
        assert_eq!(ansi_to_rgb(16), (0, 0, 0));
        assert_eq!(ansi_to_rgb(231), (255, 255, 255));
        assert_eq!(ansi_to_rgb(232), (8, 8, 8));
    }

    #[test]
    fn test_shade_darkens() {
        let Color::Rgb(r, g, b) = ColorConverter::shade(Color::Rgb(255, 255, 0), 0.2, 0.3) else {
            panic!("Expected RGB color");
        };
        assert!(r < 128 && g < 128 && b < 128);
    }
}
