//! Event category enumeration.
//!
//! The set is closed; the wire and database representation is the
//! snake_case name returned by [`EventCategory::as_str`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Music,
    FoodDrink,
    Arts,
    Sports,
    Nightlife,
    Community,
    Family,
    Outdoors,
    Other,
}

impl EventCategory {
    /// Every category, in display order.
    pub const ALL: [EventCategory; 9] = [
        EventCategory::Music,
        EventCategory::FoodDrink,
        EventCategory::Arts,
        EventCategory::Sports,
        EventCategory::Nightlife,
        EventCategory::Community,
        EventCategory::Family,
        EventCategory::Outdoors,
        EventCategory::Other,
    ];

    /// Stored name.
    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Music => "music",
            EventCategory::FoodDrink => "food_drink",
            EventCategory::Arts => "arts",
            EventCategory::Sports => "sports",
            EventCategory::Nightlife => "nightlife",
            EventCategory::Community => "community",
            EventCategory::Family => "family",
            EventCategory::Outdoors => "outdoors",
            EventCategory::Other => "other",
        }
    }

    /// Parse from the stored name.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .ok_or_else(|| CoreError::Validation(format!("Unknown event category '{name}'")))
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            EventCategory::Music => "Music",
            EventCategory::FoodDrink => "Food & Drink",
            EventCategory::Arts => "Arts",
            EventCategory::Sports => "Sports",
            EventCategory::Nightlife => "Nightlife",
            EventCategory::Community => "Community",
            EventCategory::Family => "Family",
            EventCategory::Outdoors => "Outdoors",
            EventCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
