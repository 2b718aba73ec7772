use image::RgbImage;
use std::fmt;

/// A five digit postal code read off a parcel label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    pub const LEN: usize = 5;

    /// Accepts exactly five ASCII digits, nothing else
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() == Self::LEN && s.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, leading zeros dropped ("09999" -> 9999)
    pub fn value(&self) -> u32 {
        self.0
            .bytes()
            .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Delivery zone a postal code falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    Unknown,
}

impl Zone {
    pub fn label(&self) -> &'static str {
        match self {
            Zone::A => "Zone A",
            Zone::B => "Zone B",
            Zone::C => "Zone C",
            Zone::D => "Zone D",
            Zone::E => "Zone E",
            Zone::F => "Zone F",
            Zone::G => "Zone G",
            Zone::Unknown => "Unknown Zone",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Zone::Unknown
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A successful read: the code and where it goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub postcode: PostalCode,
    pub zone: Zone,
}

/// Everything the pipeline produced for one frame
#[derive(Debug, Clone)]
pub struct FrameResult {
    /// Copy of the input frame with the overlay drawn on it
    pub image: RgbImage,

    /// Recognized text after cleaning
    pub cleaned_text: String,

    pub postcode: Option<PostalCode>,

    /// None when no postcode was found ("N/A")
    pub zone: Option<Zone>,

    /// The string drawn onto `image`
    pub overlay_text: String,
}

impl FrameResult {
    pub fn scan(&self) -> Option<ScanResult> {
        match (&self.postcode, self.zone) {
            (Some(postcode), Some(zone)) => Some(ScanResult {
                postcode: postcode.clone(),
                zone,
            }),
            _ => None,
        }
    }
}
