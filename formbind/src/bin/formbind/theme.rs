use colored::Color;
use once_cell::sync::Lazy;

/// Colors used for each kind of CLI output.
pub struct Palette {
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
    pub heading: Color,
    pub muted: Color,
    pub accent: Color,
    pub key: Color,
    pub value: Color,
}

pub const PALETTE: Palette = Palette {
    success: Color::Green,
    error: Color::Red,
    warning: Color::Yellow,
    info: Color::Blue,
    heading: Color::BrightBlue,
    muted: Color::BrightBlack,
    accent: Color::Magenta,
    key: Color::BrightCyan,
    value: Color::White,
};

/// Status markers printed in front of messages.
pub struct Glyphs {
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub info: &'static str,
    pub arrow: &'static str,
}

const UNICODE_GLYPHS: Glyphs = Glyphs {
    success: "✓",
    error: "✗",
    warning: "⚠",
    info: "ℹ",
    arrow: "→",
};

const ASCII_GLYPHS: Glyphs = Glyphs {
    success: "+",
    error: "x",
    warning: "!",
    info: "i",
    arrow: ">",
};

/// Unicode glyphs unless `FORMBIND_ASCII` is set or the terminal is dumb.
pub static GLYPHS: Lazy<&'static Glyphs> = Lazy::new(|| {
    if unicode_output(std::env::var_os("FORMBIND_ASCII").is_some(), std::env::var("TERM").ok().as_deref()) {
        &UNICODE_GLYPHS
    } else {
        &ASCII_GLYPHS
    }
});

fn unicode_output(ascii_requested: bool, term: Option<&str>) -> bool {
    !ascii_requested && term != Some("dumb")
}
