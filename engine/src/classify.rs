/// Categories and their trigger substrings. Earlier categories win when several match.
pub const CATEGORY_TRIGGERS: &[(&str, &[&str])] = &[
    ("admissions", &["admission", "apply", "application", "requirement", "entry"]),
    ("courses", &["course", "program", "degree", "subject", "curriculum"]),
    ("registration", &["register", "registration", "enroll", "enrollment"]),
    ("facilities", &["facility", "library", "hostel", "accommodation", "lab"]),
];

/// First category in [`CATEGORY_TRIGGERS`] with a trigger inside the lowercased query.
pub fn extract_category(query: &str) -> Option<&'static str> {
    let query = query.to_lowercase();
    CATEGORY_TRIGGERS
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| query.contains(t)))
        .map(|(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        assert_eq!(extract_category("How do I APPLY?"), Some("admissions"));
        assert_eq!(extract_category("Is the Library open?"), Some("facilities"));
    }

    #[test]
    fn declared_order_breaks_ties() {
        // "course" (courses) and "register" (registration) both match
        assert_eq!(extract_category("register for a course"), Some("courses"));
        // "application" (admissions) and "lab" (facilities)
        assert_eq!(extract_category("lab application"), Some("admissions"));
    }

    #[test]
    fn substring_triggers() {
        assert_eq!(extract_category("collaboration"), Some("facilities"));
    }

    #[test]
    fn no_category() {
        assert_eq!(extract_category("what time is it"), None);
    }
}
