use std::fmt;

use palette::Srgb;

pub type Color = Srgb<u8>;

pub const WHITE: Color = Srgb::new(0xff, 0xff, 0xff);
pub const ACTIVE_STOP: Color = Srgb::new(0x28, 0xa7, 0x45);
pub const INACTIVE_STOP: Color = Srgb::new(0x6c, 0x75, 0x7d);
pub const USER_LOCATION: Color = Srgb::new(0x00, 0x7b, 0xff);
pub const FALLBACK_ROUTE: Color = Srgb::new(0xdc, 0x35, 0x45);

/// Road segments cycle through these by segment index. Red is reserved for
/// fallback lines, so it never appears here.
pub const ROUTE_PALETTE: [Color; 8] = [
    Srgb::new(0x00, 0x7b, 0xff), // blue
    Srgb::new(0x28, 0xa7, 0x45), // green
    Srgb::new(0xff, 0xc1, 0x07), // yellow
    Srgb::new(0x17, 0xa2, 0xb8), // cyan
    Srgb::new(0x6f, 0x42, 0xc1), // purple
    Srgb::new(0xfd, 0x7e, 0x14), // orange
    Srgb::new(0x20, 0xc9, 0x97), // teal
    Srgb::new(0xe8, 0x3e, 0x8c), // pink
];

pub fn route_color(segment_index: usize) -> Color {
    ROUTE_PALETTE[segment_index % ROUTE_PALETTE.len()]
}

/// CSS hex notation, `#rrggbb`.
pub fn hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Stroke dash pattern in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashPattern {
    pub dash: f32,
    pub gap: f32,
}

impl fmt::Display for DashPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.dash, self.gap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub weight: f32,
    pub opacity: f32,
    pub dash: Option<DashPattern>,
}

impl LineStyle {
    pub fn solid(color: Color, weight: f32, opacity: f32) -> Self {
        Self {
            color,
            weight,
            opacity,
            dash: None,
        }
    }

    pub fn dashed(mut self, dash: f32, gap: f32) -> Self {
        self.dash = Some(DashPattern { dash, gap });
        self
    }

    pub fn is_dashed(&self) -> bool {
        self.dash.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub fill: Color,
    pub fill_opacity: f32,
    pub radius: f32,
    pub border_color: Color,
    pub border_width: f32,
}

impl MarkerStyle {
    pub fn disc(fill: Color, radius: f32) -> Self {
        Self {
            fill,
            fill_opacity: 1.0,
            radius,
            border_color: Color::new(0, 0, 0),
            border_width: 0.0,
        }
    }

    pub fn with_fill_opacity(mut self, fill_opacity: f32) -> Self {
        self.fill_opacity = fill_opacity;
        self
    }

    pub fn with_border(mut self, border_width: f32, border_color: Color) -> Self {
        self.border_color = border_color;
        self.border_width = border_width;
        self
    }
}
