//! Greedy line breaking over measured text.

/// One wrapped line and its measured width.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub width: f32,
}

/// Breaks `text` into lines no wider than `max_width`.
///
/// Explicit newlines always start a new line. Words are separated by
/// whitespace and joined with a single space. A word wider than the line on
/// its own is split between characters. An empty input yields one empty
/// line so that empty cells still occupy a line of height.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<Line>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                let width = measure(&current);
                lines.push(Line {
                    text: std::mem::take(&mut current),
                    width,
                });
            }

            if measure(word) <= max_width {
                current = word.to_string();
            } else {
                // Hard-break the oversized word; the tail stays open so the
                // next word can join it.
                let mut pieces = split_word(word, max_width, &measure);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces.into_iter().map(|piece| Line {
                    width: measure(&piece),
                    text: piece,
                }));
            }
        }

        let width = measure(&current);
        lines.push(Line {
            text: current,
            width,
        });
    }

    lines
}

fn split_word<F>(word: &str, max_width: f32, measure: &F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if measure(&piece) > max_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
