//! CMS documents (listings, regions, articles) as read from the content API.
//!
//! Only the attributes the backend reasons about are typed; everything else
//! is carried through untouched in `extra` so API clients see the full
//! document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A text field that is either a plain string or localized per language.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    Localized {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        en: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        it: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cs: Option<String>,
    },
}

impl LocalizedText {
    /// English text, falling back to any available language.
    pub fn english(&self) -> Option<&str> {
        match self {
            LocalizedText::Plain(s) => Some(s.as_str()),
            LocalizedText::Localized { en, it, cs } => en
                .as_deref()
                .or(it.as_deref())
                .or(cs.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slug {
    pub current: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Price {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specifications {
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub square_footage: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityRef {
    #[serde(default)]
    pub name: Option<LocalizedText>,
    #[serde(default)]
    pub slug: Option<Slug>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub city: Option<CityRef>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<LocalizedText>,
    #[serde(default)]
    pub slug: Option<Slug>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub specifications: Option<Specifications>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(rename = "_createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listing {
    pub fn display_title(&self) -> String {
        self.title
            .as_ref()
            .and_then(|t| t.english())
            .unwrap_or("Untitled property")
            .to_string()
    }

    pub fn slug_str(&self) -> Option<&str> {
        self.slug.as_ref().map(|s| s.current.as_str())
    }

    pub fn amount(&self) -> Option<f64> {
        self.price.as_ref().and_then(|p| p.amount)
    }

    pub fn bedrooms(&self) -> Option<u32> {
        self.specifications.as_ref().and_then(|s| s.bedrooms)
    }

    pub fn bathrooms(&self) -> Option<u32> {
        self.specifications.as_ref().and_then(|s| s.bathrooms)
    }

    fn city(&self) -> Option<&CityRef> {
        self.location.as_ref().and_then(|l| l.city.as_ref())
    }

    pub fn city_slug(&self) -> Option<&str> {
        self.city()
            .and_then(|c| c.slug.as_ref())
            .map(|s| s.current.as_str())
    }

    pub fn city_name(&self) -> Option<&str> {
        self.city()
            .and_then(|c| c.name.as_ref())
            .and_then(|n| n.english())
    }

    pub fn is_available(&self) -> bool {
        self.status.as_deref() == Some("available")
    }

    /// Last time the document changed in the CMS.
    pub fn last_changed(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<LocalizedText>,
    #[serde(default)]
    pub slug: Option<Slug>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<LocalizedText>,
    #[serde(default)]
    pub slug: Option<Slug>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Document types admins may write through the content API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Listing,
    Article,
    Region,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Listing => "listing",
            ContentType::Article => "article",
            ContentType::Region => "region",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_from_cms_json() {
        let listing: Listing = serde_json::from_value(json!({
            "_id": "abc",
            "title": { "en": "Villa Toscana", "it": "Villa Toscana IT" },
            "slug": { "current": "villa-toscana" },
            "propertyType": "villa",
            "price": { "amount": 450000.0, "currency": "EUR" },
            "specifications": { "bedrooms": 4, "bathrooms": 2, "squareFootage": 210.0 },
            "location": { "city": { "name": { "en": "Florence" }, "slug": { "current": "florence" } } },
            "status": "available",
            "images": [{ "asset": "x" }],
            "_updatedAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(listing.display_title(), "Villa Toscana");
        assert_eq!(listing.city_slug(), Some("florence"));
        assert_eq!(listing.city_name(), Some("Florence"));
        assert_eq!(listing.bedrooms(), Some(4));
        assert!(listing.is_available());
        assert!(listing.extra.contains_key("images"));
    }

    #[test]
    fn test_plain_title() {
        let listing: Listing = serde_json::from_value(json!({ "_id": "x", "title": "Casa" })).unwrap();
        assert_eq!(listing.display_title(), "Casa");
        assert_eq!(listing.amount(), None);
    }
}
