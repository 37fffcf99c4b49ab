//! 사용자 이니셜 아바타 (SVG)

const COLORS: [&str; 10] = [
    "#FF5733", "#33FF57", "#3357FF", "#FF33A6", "#FF8F33", "#33FFF3", "#A633FF", "#33FF8F",
    "#FF3333", "#33FF85",
];

const SIZE: u32 = 100;

/// Background colour, stable per username.
/// Keyed on the first UTF-16 code unit, so astral characters use their high surrogate.
pub fn avatar_color(username: &str) -> &'static str {
    let code = username.encode_utf16().next().map_or(0, u32::from);
    COLORS[(code % COLORS.len() as u32) as usize]
}

/// Renders the upper-cased first letter of `username` on its colour.
/// Returns `None` for an empty username.
pub fn render_avatar(username: &str) -> Option<String> {
    let first = username.chars().next()?;
    let letter: String = first.to_uppercase().collect();

    Some(format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{SIZE}" height="{SIZE}" viewBox="0 0 {SIZE} {SIZE}"><rect width="{SIZE}" height="{SIZE}" fill="{color}"/><text x="50%" y="50%" fill="#fff" font-family="Arial, sans-serif" font-size="{font}" text-anchor="middle" dominant-baseline="central">{letter}</text></svg>"##,
        color = avatar_color(username),
        font = SIZE / 2,
        letter = escape_xml(&letter),
    ))
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
