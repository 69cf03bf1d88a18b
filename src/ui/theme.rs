use ratatui::style::Color;

pub const SELECTED_BG: Color = Color::Rgb(50, 50, 80);
pub const STATUS_BG: Color = Color::Rgb(30, 30, 40);
pub const ACCENT: Color = Color::Rgb(140, 115, 200);
pub const BORDER_COLOR: Color = Color::Rgb(55, 55, 75);
pub const FILTER_COLOR: Color = Color::Cyan;
pub const DIM_TEXT: Color = Color::Rgb(100, 100, 120);
pub const ERROR_FG: Color = Color::LightRed;
pub const WARN_FG: Color = Color::Yellow;
pub const FORK_FG: Color = Color::Magenta;

pub fn language_color(language: &str) -> Color {
    match language {
        "Rust" => Color::Rgb(222, 165, 132),
        "Go" => Color::Cyan,
        "TypeScript" | "JavaScript" => Color::Yellow,
        "Python" => Color::LightBlue,
        "Java" | "Kotlin" => Color::LightRed,
        "Ruby" => Color::Red,
        _ => Color::White,
    }
}
