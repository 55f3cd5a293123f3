//! Priority vocabulary. Any non-blank text is accepted.

pub const LOW: &str = "Low";
pub const MEDIUM: &str = "Medium";
pub const HIGH: &str = "High";

pub const RECOMMENDED: [&str; 3] = [LOW, MEDIUM, HIGH];

/// Recommended spelling for a known priority, otherwise the trimmed input.
pub fn normalize(priority: &str) -> String {
    let trimmed = priority.trim();
    RECOMMENDED
        .iter()
        .find(|p| p.eq_ignore_ascii_case(trimmed))
        .map(|p| p.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_priorities_are_canonicalised() {
        assert_eq!(normalize("high"), "High");
        assert_eq!(normalize(" low "), "Low");
        assert_eq!(normalize("Critical"), "Critical");
    }
}
