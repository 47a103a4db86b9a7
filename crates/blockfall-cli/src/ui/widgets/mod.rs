use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    block_display::*, board_display::*, event_log_display::*, session_display::*,
    session_stats_display::*,
};

mod block_display;
mod board_display;
mod event_log_display;
mod session_display;
mod session_stats_display;

mod color {
    use blockfall_engine::BlockColor;
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const PURPLE: Color = Color::Rgb(160, 32, 240);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    pub const fn from_block_color(color: BlockColor) -> Color {
        match color {
            BlockColor::Cyan => CYAN,
            BlockColor::Yellow => YELLOW,
            BlockColor::Purple => PURPLE,
            BlockColor::Green => GREEN,
            BlockColor::Red => RED,
            BlockColor::Blue => BLUE,
            BlockColor::Orange => ORANGE,
            BlockColor::Gray => GRAY,
            BlockColor::White => WHITE,
            BlockColor::Rgb(r, g, b) => Color::Rgb(r, g, b),
        }
    }
}

pub mod style {
    use blockfall_engine::BlockColor;
    use ratatui::style::{Color, Style};

    use super::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const GHOST: Style = fg_bg(color::WHITE, color::BLACK);
    pub const HELP: Style = Style::new().fg(Color::DarkGray);

    pub const fn block(color: BlockColor) -> Style {
        bg_only(color::from_block_color(color))
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
