//! Slot label display names

/// Display name for a slot label.
///
/// The well-known labels get a friendly capitalized name; user-chosen
/// labels display verbatim.
pub fn display_label(label: &str) -> &str {
    match label {
        "dawn" => "Dawn",
        "morning" => "Morning",
        "noon" => "Noon",
        "afternoon" => "Afternoon",
        "evening" => "Evening",
        "night" => "Night",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_labels_are_capitalized() {
        assert_eq!(display_label("morning"), "Morning");
        assert_eq!(display_label("night"), "Night");
    }

    #[test]
    fn user_labels_display_verbatim() {
        assert_eq!(display_label("slot_12_30"), "slot_12_30");
        assert_eq!(display_label("sunrise"), "sunrise");
    }
}
