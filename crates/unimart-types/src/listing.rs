//! Listing catalog types for Unimart.
//!
//! A listing is an item or service offered for sale on the marketplace.
//! The chat layer only ever needs the small [`ListingRef`] projection;
//! the full [`Listing`] record exists for the catalog and seller flows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// University a seller or listing is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum University {
    Unilag,
    Abu,
    Ui,
    Unn,
    Oau,
    Cu,
    Other,
}

impl University {
    /// Full display name of the institution.
    pub fn full_name(&self) -> &'static str {
        match self {
            University::Unilag => "University of Lagos",
            University::Abu => "Ahmadu Bello University",
            University::Ui => "University of Ibadan",
            University::Unn => "University of Nigeria, Nsukka",
            University::Oau => "Obafemi Awolowo University",
            University::Cu => "Covenant University",
            University::Other => "Other",
        }
    }
}

impl fmt::Display for University {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            University::Unilag => write!(f, "unilag"),
            University::Abu => write!(f, "abu"),
            University::Ui => write!(f, "ui"),
            University::Unn => write!(f, "unn"),
            University::Oau => write!(f, "oau"),
            University::Cu => write!(f, "cu"),
            University::Other => write!(f, "other"),
        }
    }
}

impl FromStr for University {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unilag" => Ok(University::Unilag),
            "abu" => Ok(University::Abu),
            "ui" => Ok(University::Ui),
            "unn" => Ok(University::Unn),
            "oau" => Ok(University::Oau),
            "cu" => Ok(University::Cu),
            "other" => Ok(University::Other),
            other => Err(format!("invalid university: '{other}'")),
        }
    }
}

/// An item or service offered for sale.
///
/// Prices are stored in minor currency units (kobo) to avoid floats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub seller_name: String,
    pub university: University,
    pub title: String,
    pub description: String,
    pub price: u64,
    pub category: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// The projection of a listing the chat layer consumes.
///
/// The chat core treats a listing purely as an opaque id plus display
/// metadata. Holding a `ListingRef` does not keep the listing alive;
/// the catalog may delete the listing independently without
/// invalidating chat history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRef {
    pub id: Uuid,
    pub title: String,
    pub counterpart_name: String,
}

impl From<&Listing> for ListingRef {
    fn from(listing: &Listing) -> Self {
        ListingRef {
            id: listing.id,
            title: listing.title.clone(),
            counterpart_name: listing.seller_name.clone(),
        }
    }
}
