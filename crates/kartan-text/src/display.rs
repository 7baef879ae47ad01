#![forbid(unsafe_code)]

//! Short display labels.

/// Label for a region name as shown in panel headings.
///
/// Most region names in the feed are genitive (`Stockholms`,
/// `Västra Götalands`). A single trailing `s` is dropped.
#[must_use]
pub fn region_label(name: &str) -> &str {
    name.strip_suffix('s').unwrap_or(name)
}

/// Heading shown above a municipality in the detail drawer.
#[must_use]
pub fn region_heading(name: &str) -> String {
    format!("Region {}", region_label(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_trailing_s() {
        assert_eq!(region_label("Stockholms"), "Stockholm");
        assert_eq!(region_label("Västra Götalands"), "Västra Götaland");
        assert_eq!(region_label("Skåne"), "Skåne");
        assert_eq!(region_label("ss"), "s");
        assert_eq!(region_label(""), "");
    }

    #[test]
    fn heading_uses_label() {
        assert_eq!(region_heading("Uppsala"), "Region Uppsala");
        assert_eq!(region_heading("Hallands"), "Region Halland");
    }
}
