//! Greedy word wrap for certificate body text.

/// Breaks `text` into lines no wider than `max_width` at `font_size`.
///
/// Words are whitespace-delimited, so line breaks authored in the template are
/// folded into ordinary spaces. A word that alone exceeds `max_width` is put on
/// its own line and left over-width.
pub fn wrap_text<F>(text: &str, width_of: F, max_width: f32, font_size: f32) -> Vec<String>
where
    F: Fn(&str, f32) -> f32,
{
    let mut lines = Vec::new();
    let mut buffer = String::new();

    for word in text.split_whitespace() {
        let candidate = if buffer.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", buffer, word)
        };

        if width_of(&candidate, font_size) > max_width && !buffer.is_empty() {
            lines.push(std::mem::replace(&mut buffer, word.to_string()));
        } else {
            buffer = candidate;
        }
    }

    if !buffer.is_empty() {
        lines.push(buffer);
    }

    lines
}
