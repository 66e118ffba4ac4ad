/// Deterministic colour assignment for treemap cells.
///
/// A cell's colour depends only on its path and the caller's seed, never on
/// process state, so the same tree always renders the same way.
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Colour palette for treemap cells.
pub const PALETTE: &[Rgb] = &[
    Rgb::new(0x89, 0xb4, 0xfa), // blue
    Rgb::new(0xa6, 0xe3, 0xa1), // green
    Rgb::new(0xf9, 0xe2, 0xaf), // yellow
    Rgb::new(0xf3, 0x8b, 0xa8), // pink
    Rgb::new(0xfa, 0xb3, 0x87), // peach
    Rgb::new(0xcb, 0xa6, 0xf7), // mauve
    Rgb::new(0x94, 0xe2, 0xd5), // teal
    Rgb::new(0xf5, 0xc2, 0xe7), // flamingo
    Rgb::new(0x74, 0xc7, 0xec), // sapphire
    Rgb::new(0xb4, 0xbe, 0xfe), // lavender
];

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over `bytes`, starting from a seed-perturbed basis.
fn fnv1a(bytes: &[u8], seed: u64) -> u64 {
    bytes.iter().fold(FNV_OFFSET ^ seed, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Pick a palette colour for `key` (typically a node's path bytes).
pub fn color_for(key: &[u8], seed: u64) -> Rgb {
    let slot = fnv1a(key, seed) % PALETTE.len() as u64;
    PALETTE[slot as usize]
}
