pub mod cleaner;
pub mod extractor;
pub mod zones;

pub use cleaner::{clean, Matcher, Substitution, SUBSTITUTIONS};
pub use extractor::extract;
pub use zones::{classify, classify_value, ZoneRange, ZONE_RANGES};

use crate::models::{PostalCode, Zone};

/// Clean, extract and classify in one go.
/// Returns the cleaned text alongside the (optional) code and its zone.
pub fn read_label(raw: &str) -> (String, Option<(PostalCode, Zone)>) {
    let cleaned = clean(raw);
    let found = extract(&cleaned).map(|code| {
        let zone = classify(&code);
        (code, zone)
    });
    (cleaned, found)
}
