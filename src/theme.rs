use iced::Color;
use pim_dash::worklist::TaskStatus;
use pim_dash::DisplayPreference;

// ─── PALETTE ────────────────────────────────────────────────────

/// All semantic colors the dashboard uses, derived from the preference.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub panel_bg: Color,
    pub topbar_bg: Color,
    pub border: Color,
    pub label: Color,
    pub text: Color,
    pub bar_bg: Color,
    pub accent: Color,
    pub accent_alt: Color,
    pub positive: Color,
    pub negative: Color,
}

pub fn build_palette(pref: DisplayPreference) -> Palette {
    match pref {
        DisplayPreference::Light => Palette {
            bg:         hex(0xf8, 0xfa, 0xfc),
            panel_bg:   hex(0xff, 0xff, 0xff),
            topbar_bg:  Color::from_rgba(1.0, 1.0, 1.0, 0.6),
            border:     hex(0xe5, 0xe7, 0xeb),
            label:      hex(0x6b, 0x72, 0x80),
            text:       hex(0x11, 0x18, 0x27),
            bar_bg:     hex(0xe5, 0xe7, 0xeb),
            accent:     hex(0x14, 0xb8, 0xa6),
            accent_alt: hex(0x06, 0xb6, 0xd4),
            positive:   hex(0x16, 0xa3, 0x4a),
            negative:   hex(0xdc, 0x26, 0x26),
        },
        DisplayPreference::Dark => Palette {
            bg:         hex(0x03, 0x07, 0x12),
            panel_bg:   hex(0x11, 0x18, 0x27),
            topbar_bg:  Color::from_rgba(0.067, 0.094, 0.153, 0.6),
            border:     hex(0x1f, 0x29, 0x37),
            label:      hex(0x9c, 0xa3, 0xaf),
            text:       hex(0xf3, 0xf4, 0xf6),
            bar_bg:     hex(0x1f, 0x29, 0x37),
            accent:     hex(0x14, 0xb8, 0xa6),
            accent_alt: hex(0x06, 0xb6, 0xd4),
            positive:   hex(0x4a, 0xde, 0x80),
            negative:   hex(0xf8, 0x71, 0x71),
        },
    }
}

/// Badge (background, text) per worklist status.
pub fn status_badge(status: TaskStatus) -> (Color, Color) {
    match status {
        TaskStatus::New => (hex(0xdb, 0xea, 0xfe), hex(0x1e, 0x40, 0xaf)),
        TaskStatus::Active => (hex(0xdc, 0xfc, 0xe7), hex(0x16, 0x65, 0x34)),
        TaskStatus::InReview => (hex(0xfe, 0xf9, 0xc3), hex(0x85, 0x4d, 0x0e)),
        TaskStatus::Blocked => (hex(0xfe, 0xe2, 0xe2), hex(0x99, 0x1b, 0x1b)),
    }
}

/// Series colors for the channel share bars.
pub const CHANNEL_COLORS: [Color; 5] = [
    hex(0x0e, 0xa5, 0xe9),
    hex(0x14, 0xb8, 0xa6),
    hex(0x22, 0xc5, 0x5e),
    hex(0xa7, 0x8b, 0xfa),
    hex(0xf5, 0x9e, 0x0b),
];

const fn hex(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}
