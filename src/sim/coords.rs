//! Coordinate parsing for level data
//!
//! Level data is a flat list of string tokens read two at a time as `(x, y)`.
//! Malformed pairs are skipped, never reported: this is a best-effort filter.

use glam::Vec2;

/// Parse a flat token list into level positions.
///
/// Tokens are consumed in pairs. A pair whose x fails to parse still consumes
/// its y token, so one bad value drops exactly one pair and never shifts the
/// pairing of the tokens after it. The y axis is inverted (`(x, -y)`) because
/// level data is authored with y pointing down. A trailing unpaired token is
/// ignored.
pub fn parse_coordinates<S: AsRef<str>>(tokens: &[S]) -> Vec<Vec2> {
    let mut points = Vec::with_capacity(tokens.len() / 2);

    for pair in tokens.chunks_exact(2) {
        let x = parse_invariant(pair[0].as_ref());
        let y = parse_invariant(pair[1].as_ref());

        match (x, y) {
            (Some(x), Some(y)) => points.push(Vec2::new(x, -y)),
            _ => log::debug!(
                "Skipping malformed coordinate pair ({:?}, {:?})",
                pair[0].as_ref(),
                pair[1].as_ref()
            ),
        }
    }

    points
}

/// Parse a number using the invariant (locale-independent) format.
///
/// Accepts surrounding whitespace, a leading or trailing sign, a parenthesized
/// negative (`"(5)"`), `,` group separators in the integer part, a decimal
/// point and an exponent. Non-finite results are rejected.
pub fn parse_invariant(token: &str) -> Option<f32> {
    let mut s = token.trim();
    if s.is_empty() {
        return None;
    }

    let mut negate = false;

    if let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        s = inner.trim();
        if has_leading_sign(s) {
            return None;
        }
        negate = true;
    }

    if !has_leading_sign(s) {
        if let Some(body) = s.strip_suffix('-') {
            if negate {
                return None;
            }
            s = body.trim_end();
            negate = true;
        } else if let Some(body) = s.strip_suffix('+') {
            if negate {
                return None;
            }
            s = body.trim_end();
        }
    }

    let cleaned = strip_group_separators(s)?;
    let value: f32 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(if negate { -value } else { value })
}

fn has_leading_sign(s: &str) -> bool {
    s.starts_with('-') || s.starts_with('+')
}

/// Remove `,` group separators from the integer part.
///
/// A separator needs at least one digit somewhere before it and must come
/// before the decimal point or exponent.
fn strip_group_separators(s: &str) -> Option<String> {
    if !s.contains(',') {
        return Some(s.to_string());
    }

    let split = s.find(['.', 'e', 'E']).unwrap_or(s.len());
    let (int_part, rest) = s.split_at(split);
    if rest.contains(',') {
        return None;
    }

    let mut seen_digit = false;
    let mut out = String::with_capacity(s.len());
    for c in int_part.chars() {
        if c == ',' {
            if !seen_digit {
                return None;
            }
        } else {
            seen_digit |= c.is_ascii_digit();
            out.push(c);
        }
    }
    out.push_str(rest);
    Some(out)
}
