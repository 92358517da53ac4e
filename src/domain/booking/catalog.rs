//! Service catalog shown on the landing page.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Language, ValidationError};

/// Home-service categories BaleCare partners can be booked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    AirConditioning,
    PoolMaintenance,
    Plumbing,
    Renovation,
    Cleaning,
    Garden,
}

impl ServiceCategory {
    /// Catalog order as displayed in the services grid.
    pub const ALL: [ServiceCategory; 6] = [
        ServiceCategory::AirConditioning,
        ServiceCategory::PoolMaintenance,
        ServiceCategory::Plumbing,
        ServiceCategory::Renovation,
        ServiceCategory::Cleaning,
        ServiceCategory::Garden,
    ];

    /// Stable identifier used in URLs and form state.
    pub fn id(&self) -> &'static str {
        match self {
            ServiceCategory::AirConditioning => "ac",
            ServiceCategory::PoolMaintenance => "pool",
            ServiceCategory::Plumbing => "plumbing",
            ServiceCategory::Renovation => "renovation",
            ServiceCategory::Cleaning => "cleaning",
            ServiceCategory::Garden => "garden",
        }
    }

    /// Localized category name.
    pub fn name(&self, language: Language) -> &'static str {
        match (self, language) {
            (ServiceCategory::AirConditioning, Language::Id) => "Servis AC",
            (ServiceCategory::AirConditioning, Language::En) => "AC Service",
            (ServiceCategory::PoolMaintenance, Language::Id) => "Perawatan Kolam",
            (ServiceCategory::PoolMaintenance, Language::En) => "Pool Maintenance",
            (ServiceCategory::Plumbing, Language::Id) => "Pipa & Saluran",
            (ServiceCategory::Plumbing, Language::En) => "Plumbing",
            (ServiceCategory::Renovation, Language::Id) => "Renovasi",
            (ServiceCategory::Renovation, Language::En) => "Renovation",
            (ServiceCategory::Cleaning, Language::Id) => "Kebersihan",
            (ServiceCategory::Cleaning, Language::En) => "Cleaning",
            (ServiceCategory::Garden, Language::Id) => "Taman",
            (ServiceCategory::Garden, Language::En) => "Garden",
        }
    }

    /// Indicative starting price.
    pub fn starting_price(&self) -> &'static str {
        match self {
            ServiceCategory::AirConditioning => "Rp 150.000+",
            ServiceCategory::PoolMaintenance => "Rp 250.000+",
            ServiceCategory::Plumbing => "Rp 100.000+",
            ServiceCategory::Renovation => "Survey",
            ServiceCategory::Cleaning => "Rp 200.000+",
            ServiceCategory::Garden => "Rp 175.000+",
        }
    }

    /// English category names, as listed in the diagnosis prompt.
    pub fn prompt_choices() -> String {
        Self::ALL
            .iter()
            .map(|c| c.name(Language::En))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ServiceCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.id() == s)
            .ok_or_else(|| ValidationError::invalid_format("service", format!("unknown service '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_str() {
        for category in ServiceCategory::ALL {
            assert_eq!(category.id().parse::<ServiceCategory>().unwrap(), category);
        }
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert!("roofing".parse::<ServiceCategory>().is_err());
    }

    #[test]
    fn prompt_choices_lists_english_names() {
        assert_eq!(
            ServiceCategory::prompt_choices(),
            "AC Service, Pool Maintenance, Plumbing, Renovation, Cleaning, Garden"
        );
    }

    #[test]
    fn names_are_localized() {
        assert_eq!(ServiceCategory::Garden.name(Language::Id), "Taman");
        assert_eq!(ServiceCategory::Garden.name(Language::En), "Garden");
    }
}
