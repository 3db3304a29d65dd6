//! Team name grammar and tag normalization

const MIN_TEAM_NAME_LENGTH: usize = 2;

fn is_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '_' | '@')
}

/// Check a team name against the grammar.
///
/// A valid name has at least two characters, starts with a lowercase ASCII
/// letter and is made only of lowercase letters, digits, `.`, `-`, `_` and `@`.
/// The input is checked as given; trimming is the caller's job.
pub fn is_valid_team_name(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return false,
    }

    name.chars().count() >= MIN_TEAM_NAME_LENGTH && chars.all(is_name_char)
}

/// Trim every tag and drop repeats, keeping the first occurrence of each value
pub fn normalize_tags<S: AsRef<str>>(raw_tags: &[S]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(raw_tags.len());

    for tag in raw_tags {
        let tag = tag.as_ref().trim();

        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }

    tags
}
