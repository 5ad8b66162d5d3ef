/// `full_time` -> `Full time`, `high_school` -> `High school`.
#[must_use]
pub fn humanize_option(raw: &str) -> String {
    let spaced = raw.trim().replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
