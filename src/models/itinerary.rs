use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    #[serde(default)]
    pub food: bool,
    #[serde(default)]
    pub culture: bool,
    #[serde(default)]
    pub nightlife: bool,
}

impl Preferences {
    /// Names of the preference flags the traveler turned on, in a stable order.
    pub fn enabled(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.food {
            keys.push("food");
        }
        if self.culture {
            keys.push("culture");
        }
        if self.nightlife {
            keys.push("nightlife");
        }
        keys
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerateItineraryRequest {
    #[serde(default)]
    pub destinations: Vec<String>,
    #[serde(deserialize_with = "deserialize_day_count")]
    pub days: u32,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(rename = "travelerType", default)]
    pub traveler_type: String,
}

// Clients send `days` as either a number or a numeric string.
fn deserialize_day_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DayCount {
        Number(u32),
        Text(String),
    }

    match DayCount::deserialize(deserializer)? {
        DayCount::Number(n) => Ok(n),
        DayCount::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ActivityItem {
    pub time: String,
    pub description: String,
}

/// The day shape the completion model is instructed to emit. Only ever
/// produced by parsing model output, never constructed by hand.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ItineraryDay {
    pub day: u32,
    pub location: String,
    pub activities: Vec<ActivityItem>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SavedItinerary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub destinations: Vec<String>,
    pub num_days: u32,
    pub preferences: Preferences,
    pub traveler_type: String,
    pub days: Vec<serde_json::Value>,
    pub created_at: Option<DateTime>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteItineraryRequest {
    pub id: String,
}
