use super::{ColorLike, srgb_to_linear_f32};
use std::borrow::Cow;

pub struct HexColor<'a> {
    raw: Cow<'a, str>,
    value: Option<[u8; 4]>,
}

impl<'a> HexColor<'a> {
    pub fn new(hex: impl Into<Cow<'a, str>>) -> Self {
        let raw = hex.into();
        let value = parse_hex(raw.as_bytes());
        HexColor { raw, value }
    }

    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    pub fn get_raw(&self) -> &str {
        &self.raw
    }
}

impl<'a> ColorLike for HexColor<'a> {
    fn box_clone(&self) -> Box<dyn ColorLike> {
        Box::new(HexColor::new(self.raw.to_string()))
    }

    fn to_rgba_f32(&self) -> [f32; 4] {
        match self.value {
            Some([r, g, b, a]) => [
                srgb_to_linear_f32(r as f32 / 255.0),
                srgb_to_linear_f32(g as f32 / 255.0),
                srgb_to_linear_f32(b as f32 / 255.0),
                a as f32 / 255.0,
            ],
            None => [0.0, 0.0, 0.0, 0.0],
        }
    }

    fn to_rgba_u8(&self) -> [u8; 4] {
        self.value.unwrap_or([0, 0, 0, 0])
    }
}

fn parse_hex(bytes: &[u8]) -> Option<[u8; 4]> {
    let (&first, digits) = bytes.split_first()?;
    if first != b'#' || !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    match *digits {
        [r, g, b] => Some([hex_1_to_u8(r) * 17, hex_1_to_u8(g) * 17, hex_1_to_u8(b) * 17, 255]),
        [r, g, b, a] => Some([
            hex_1_to_u8(r) * 17,
            hex_1_to_u8(g) * 17,
            hex_1_to_u8(b) * 17,
            hex_1_to_u8(a) * 17,
        ]),
        [r1, r2, g1, g2, b1, b2] => Some([
            hex_2_to_u8(r1, r2),
            hex_2_to_u8(g1, g2),
            hex_2_to_u8(b1, b2),
            255,
        ]),
        [r1, r2, g1, g2, b1, b2, a1, a2] => Some([
            hex_2_to_u8(r1, r2),
            hex_2_to_u8(g1, g2),
            hex_2_to_u8(b1, b2),
            hex_2_to_u8(a1, a2),
        ]),
        _ => None,
    }
}

fn hex_1_to_u8(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

fn hex_2_to_u8(c1: u8, c2: u8) -> u8 {
    (hex_1_to_u8(c1) << 4) | hex_1_to_u8(c2)
}
