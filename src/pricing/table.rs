use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Customer category a quote is priced for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerCategory {
    Residential,
    Commercial,
}

impl CustomerCategory {
    pub const ALL: [CustomerCategory; 2] = [Self::Residential, Self::Commercial];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Residential => "Residential",
            Self::Commercial => "Commercial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ServiceLevel {
    #[serde(rename = "exterior")]
    Exterior,
    #[serde(rename = "inOut")]
    InOut,
}

impl ServiceLevel {
    pub const ALL: [ServiceLevel; 2] = [Self::Exterior, Self::InOut];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exterior => "exterior",
            Self::InOut => "inOut",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Exterior => "Exterior only",
            Self::InOut => "In & out",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    Standard,
    Large,
    Slider,
}

impl WindowType {
    /// Display order of the window inputs
    pub const ALL: [WindowType; 3] = [Self::Standard, Self::Large, Self::Slider];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Large => "large",
            Self::Slider => "slider",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard window",
            Self::Large => "Large window",
            Self::Slider => "Slider window",
        }
    }
}

/// Error for names that are not part of the price list
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownName {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for CustomerCategory {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownName {
                kind: "customer category",
                value: s.to_string(),
            })
    }
}

impl FromStr for ServiceLevel {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the CLI-friendly spellings as well
        let normalized = match s {
            "in-out" | "in_out" | "inout" => "inOut",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == normalized)
            .ok_or_else(|| UnknownName {
                kind: "service level",
                value: s.to_string(),
            })
    }
}

impl FromStr for WindowType {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownName {
                kind: "window type",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for CustomerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit prices per window type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct WindowRates {
    pub standard: u64,
    pub large: u64,
    pub slider: u64,
}

impl WindowRates {
    pub fn rate(&self, window: WindowType) -> u64 {
        match window {
            WindowType::Standard => self.standard,
            WindowType::Large => self.large,
            WindowType::Slider => self.slider,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LevelRates {
    pub exterior: WindowRates,
    #[serde(rename = "inOut")]
    pub in_out: WindowRates,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RateTable {
    pub residential: LevelRates,
    pub commercial: LevelRates,
}

impl RateTable {
    pub fn rates(&self, category: CustomerCategory, level: ServiceLevel) -> &WindowRates {
        let by_level = match category {
            CustomerCategory::Residential => &self.residential,
            CustomerCategory::Commercial => &self.commercial,
        };
        match level {
            ServiceLevel::Exterior => &by_level.exterior,
            ServiceLevel::InOut => &by_level.in_out,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    pub id: String,
    pub label: String,
    pub unit: String,
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Access gate shown before an estimate is unlocked
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessConstraints {
    pub access_mode: String,
    pub access_confirmation_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiCopy {
    pub estimate_disclaimer: String,
    pub minimum_disclaimer: String,
    pub access_disclaimer: String,
}

/// Budget pricing for ground-reachable windows (step stool, no ladders)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTable {
    pub currency: String,
    pub minimum_charge: u64,
    pub constraints: AccessConstraints,
    pub rates: RateTable,
    /// Ordered as displayed
    pub add_ons: Vec<AddOn>,
    pub ui_copy: UiCopy,
}

impl PricingTable {
    pub fn rates_for(&self, category: CustomerCategory, level: ServiceLevel) -> &WindowRates {
        self.rates.rates(category, level)
    }

    pub fn add_on(&self, id: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|a| a.id == id)
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            minimum_charge: 40,
            constraints: AccessConstraints {
                access_mode: "step-stool-only".to_string(),
                access_confirmation_text:
                    "All windows are reachable using a step stool (no ladder work).".to_string(),
            },
            rates: RateTable {
                residential: LevelRates {
                    exterior: WindowRates {
                        standard: 4,
                        large: 6,
                        slider: 10,
                    },
                    in_out: WindowRates {
                        standard: 7,
                        large: 10,
                        slider: 16,
                    },
                },
                commercial: LevelRates {
                    exterior: WindowRates {
                        standard: 3,
                        large: 5,
                        slider: 9,
                    },
                    in_out: WindowRates {
                        standard: 6,
                        large: 9,
                        slider: 14,
                    },
                },
            },
            add_ons: vec![
                AddOn {
                    id: "screens".to_string(),
                    label: "Screen cleaning".to_string(),
                    unit: "each".to_string(),
                    price: 1,
                    note: None,
                },
                AddOn {
                    id: "tracks".to_string(),
                    label: "Track/sill quick detail".to_string(),
                    unit: "each".to_string(),
                    price: 1,
                    note: None,
                },
                AddOn {
                    id: "hardWater".to_string(),
                    label: "Hard-water spot treatment".to_string(),
                    unit: "each".to_string(),
                    price: 3,
                    note: Some("Only if needed; final confirmed after inspection.".to_string()),
                },
            ],
            ui_copy: UiCopy {
                estimate_disclaimer: "Estimate only. Final price may change with heavy buildup, paint/stickers, or hard-water staining.".to_string(),
                minimum_disclaimer: "A $40 minimum service charge applies.".to_string(),
                access_disclaimer: "We currently service windows reachable with a step stool only (no ladder work).".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates() {
        let table = PricingTable::default();
        let rates = table.rates_for(CustomerCategory::Residential, ServiceLevel::InOut);
        assert_eq!(rates.rate(WindowType::Standard), 7);
        assert_eq!(rates.rate(WindowType::Slider), 16);

        let rates = table.rates_for(CustomerCategory::Commercial, ServiceLevel::Exterior);
        assert_eq!(rates.rate(WindowType::Large), 5);
        assert_eq!(table.minimum_charge, 40);
    }

    #[test]
    fn test_add_on_lookup_keeps_order() {
        let table = PricingTable::default();
        let ids: Vec<&str> = table.add_ons.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["screens", "tracks", "hardWater"]);
        assert_eq!(table.add_on("hardWater").map(|a| a.price), Some(3));
        assert!(table.add_on("gutters").is_none());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Commercial".parse::<CustomerCategory>(), Ok(CustomerCategory::Commercial));
        assert_eq!("in-out".parse::<ServiceLevel>(), Ok(ServiceLevel::InOut));
        assert_eq!("inOut".parse::<ServiceLevel>(), Ok(ServiceLevel::InOut));
        assert_eq!("slider".parse::<WindowType>(), Ok(WindowType::Slider));

        let err = "ladder".parse::<WindowType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown window type: ladder");
    }

    #[test]
    fn test_table_json_shape() {
        let json = serde_json::to_value(PricingTable::default()).unwrap();
        assert_eq!(json["minimumCharge"], 40);
        assert_eq!(json["rates"]["residential"]["inOut"]["large"], 10);
        assert_eq!(json["addOns"][2]["id"], "hardWater");
        assert!(json["addOns"][0].get("note").is_none());

        let back: PricingTable = serde_json::from_value(json).unwrap();
        assert_eq!(back, PricingTable::default());
    }
}
