use plotters::style::RGBColor;

/// Franchise colours used for stacked per-team series.
const TEAM_COLORS: &[(&str, &str)] = &[
    ("Chennai Super Kings", "#F1C40F"),
    ("Mumbai Indians", "#1F77B4"),
    ("Kolkata Knight Riders", "#6C3483"),
    ("Royal Challengers Bangalore", "#E74C3C"),
    ("Rajasthan Royals", "#AF7AC5"),
    ("Sunrisers Hyderabad", "#E67E22"),
    ("Delhi Daredevils", "#3498DB"),
    ("Kings XI Punjab", "#C0392B"),
    ("Deccan Chargers", "#808B96"),
    ("Gujarat Lions", "#F39C12"),
    ("Rising Pune Supergiant", "#8E44AD"),
    ("Rising Pune Supergiants", "#BB8FCE"),
    ("Pune Warriors", "#16A085"),
];

const FALLBACK: &[RGBColor] = &[
    RGBColor(0x2E, 0x86, 0xC1),
    RGBColor(0x28, 0xB4, 0x63),
    RGBColor(0xD3, 0x54, 0x00),
    RGBColor(0x7D, 0x3C, 0x98),
    RGBColor(0x17, 0xA5, 0x89),
    RGBColor(0xB0, 0x3A, 0x2E),
    RGBColor(0x5D, 0x6D, 0x7E),
    RGBColor(0xF4, 0xD0, 0x3F),
];

pub fn team_color(team: &str) -> Option<&'static str> {
    TEAM_COLORS
        .iter()
        .find(|(name, _)| *name == team)
        .map(|(_, hex)| *hex)
}

pub fn fallback_color(index: usize) -> RGBColor {
    FALLBACK[index % FALLBACK.len()]
}

/// Parses `#RRGGBB` (leading `#` optional).
pub fn parse_hex(hex: &str) -> Option<RGBColor> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}
