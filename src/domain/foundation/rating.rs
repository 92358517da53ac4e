//! Star rating value object for customer reviews (1 to 5 stars).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Customer review rating: 1 (poor) to 5 (excellent) stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarRating(u8);

impl StarRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Creates a StarRating, returning error if outside 1..=5.
    pub fn new(stars: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&stars) {
            return Err(ValidationError::out_of_range(
                "rating",
                Self::MIN as i32,
                Self::MAX as i32,
                stars as i32,
            ));
        }
        Ok(Self(stars))
    }

    /// Returns the number of stars.
    pub fn stars(&self) -> u8 {
        self.0
    }
}

/// New review drafts start at five stars.
impl Default for StarRating {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u8> for StarRating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.0
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_rating_accepts_valid_values() {
        for stars in 1..=5 {
            assert_eq!(StarRating::new(stars).unwrap().stars(), stars);
        }
    }

    #[test]
    fn star_rating_rejects_out_of_range() {
        assert!(StarRating::new(0).is_err());
        assert!(StarRating::new(6).is_err());
    }

    #[test]
    fn star_rating_defaults_to_five() {
        assert_eq!(StarRating::default().stars(), 5);
    }

    #[test]
    fn star_rating_displays_fraction() {
        assert_eq!(StarRating::new(4).unwrap().to_string(), "4/5");
    }

    #[test]
    fn star_rating_deserialization_validates() {
        let ok: StarRating = serde_json::from_str("3").unwrap();
        assert_eq!(ok.stars(), 3);
        assert!(serde_json::from_str::<StarRating>("9").is_err());
    }
}
