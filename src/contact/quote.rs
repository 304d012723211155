use std::fmt;
use std::str::FromStr;

const HEADER: &str = "QUOTE - Hi! I'd like a window cleaning quote.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyType {
    #[default]
    Residential,
    Storefront,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "Residential",
            Self::Storefront => "Storefront",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "residential" => Ok(Self::Residential),
            "storefront" | "commercial" => Ok(Self::Storefront),
            other => Err(format!("unknown property type: {}", other)),
        }
    }
}

/// Fields of the "text me for a quote" card
///
/// Every field is free text; blank ones still get their line so the
/// customer can fill them in inside the messaging app.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteRequest {
    pub name: String,
    pub address: String,
    pub property_type: Option<PropertyType>,
    pub windows: String,
    pub timing: String,
    pub notes: String,
}

impl QuoteRequest {
    /// Message body for the pre-filled text
    pub fn sms_body(&self) -> String {
        let property_type = self.property_type.map(|p| p.as_str()).unwrap_or("");

        [
            HEADER.to_string(),
            format!("Name: {}", self.name),
            format!("Address/Area: {}", self.address),
            format!("Residential or Storefront: {}", property_type),
            format!("Approx # of windows: {}", self.windows),
            format!("Preferred day/time: {}", self.timing),
            format!("Photos/notes: {}", self.notes),
        ]
        .join("\n")
    }
}
