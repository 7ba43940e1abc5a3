/// Metro regions and the sub-areas that resolve to them
///
/// A location resolves to a region when its words include the region name or
/// one of its sub-areas as whole words.
const METRO_GAZETTEER: &[(&str, &[&str])] = &[
    (
        "nairobi",
        &[
            "cbd", "westlands", "karen", "kibera", "eastlands", "kasarani", "embakasi",
            "kawangware", "mathare", "dagoretti", "kiambu", "machakos", "kajiado",
        ],
    ),
    ("mombasa", &["old town", "nyali", "likoni", "kilifi", "kwale"]),
    ("kisumu", &["kondele", "milimani"]),
    ("nakuru", &["section 58", "lanet"]),
    ("eldoret", &["pioneer", "langas"]),
];

/// Case-insensitive substring match in either direction
#[inline]
pub fn locations_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// Resolve free-text location to its parent metro region, if known
pub fn metro_region(location: &str) -> Option<&'static str> {
    let lower = location.to_lowercase();
    if lower.trim().is_empty() {
        return None;
    }

    let tokens = words(&lower);

    METRO_GAZETTEER
        .iter()
        .find(|(region, areas)| {
            contains_phrase(&tokens, region) || areas.iter().any(|area| contains_phrase(&tokens, area))
        })
        .map(|(region, _)| *region)
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

/// True if the phrase's words appear consecutively in `words`
fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    let phrase: Vec<&str> = phrase.split_whitespace().collect();
    !phrase.is_empty() && words.windows(phrase.len()).any(|window| window == phrase.as_slice())
}

/// True if both locations resolve to the same metro region
#[inline]
pub fn same_metro_area(a: &str, b: &str) -> bool {
    match (metro_region(a), metro_region(b)) {
        (Some(ra), Some(rb)) => ra == rb,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locations_match_either_direction() {
        assert!(locations_match("Kibera", "Kibera, Nairobi"));
        assert!(locations_match("KIBERA, NAIROBI", "kibera"));
        assert!(!locations_match("Westlands", "Kibera"));
        assert!(!locations_match("", "Kibera"));
    }

    #[test]
    fn test_metro_region_lookup() {
        assert_eq!(metro_region("Westlands"), Some("nairobi"));
        assert_eq!(metro_region("Nyali, Mombasa"), Some("mombasa"));
        assert_eq!(metro_region("Timbuktu"), None);
        assert_eq!(metro_region("Old Town, Mombasa"), Some("mombasa"));
        assert_eq!(metro_region("Section 58"), Some("nakuru"));
    }

    #[test]
    fn test_sub_areas_match_whole_words_only() {
        assert_eq!(metro_region("Planet Plaza"), None);
        assert_eq!(metro_region("Karenjo"), None);
        assert_eq!(metro_region("Karen"), Some("nairobi"));
        assert!(!same_metro_area("Planet", "Lanet"));
    }

    #[test]
    fn test_same_metro_area() {
        assert!(same_metro_area("Westlands", "Kibera, Nairobi"));
        assert!(same_metro_area("Kiambu", "Eastlands"));
        assert!(!same_metro_area("Likoni", "Kibera"));
        assert!(!same_metro_area("Unknown", "Elsewhere"));
    }
}
