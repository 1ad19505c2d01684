use colored::Color;

pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 220, g: 220, b: 220 };
pub const PRIMARY: Color = Color::TrueColor { r: 95, g: 175, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 175, b: 95 };
pub const SEPARATOR: Color = Color::TrueColor { r: 110, g: 110, b: 110 };
pub const IPV4_ADDR: Color = Color::TrueColor { r: 135, g: 215, b: 135 };
pub const IPV6_ADDR: Color = Color::TrueColor { r: 175, g: 135, b: 215 };
pub const OPEN_PORT: Color = Color::TrueColor { r: 95, g: 215, b: 95 };
pub const SERVICE: Color = Color::TrueColor { r: 135, g: 175, b: 215 };
