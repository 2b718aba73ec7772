use crate::models::{PostalCode, Zone};

/// Half-open range of postal code values: `start <= value < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneRange {
    pub start: i64,
    pub end: i64,
    pub zone: Zone,
}

impl ZoneRange {
    pub fn contains(&self, value: i64) -> bool {
        self.start <= value && value < self.end
    }
}

const fn decade(start: i64, zone: Zone) -> ZoneRange {
    ZoneRange {
        start,
        end: start + 10_000,
        zone,
    }
}

/// Seven contiguous, non-overlapping ranges covering [10000, 80000)
pub static ZONE_RANGES: [ZoneRange; 7] = [
    decade(10_000, Zone::A),
    decade(20_000, Zone::B),
    decade(30_000, Zone::C),
    decade(40_000, Zone::D),
    decade(50_000, Zone::E),
    decade(60_000, Zone::F),
    decade(70_000, Zone::G),
];

/// Zone for any integer; values outside every range are `Zone::Unknown`
pub fn classify_value(value: i64) -> Zone {
    ZONE_RANGES
        .iter()
        .find(|range| range.contains(value))
        .map(|range| range.zone)
        .unwrap_or(Zone::Unknown)
}

pub fn classify(code: &PostalCode) -> Zone {
    classify_value(i64::from(code.value()))
}
