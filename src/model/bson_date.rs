//! Timestamps are stored as BSON dates so Mongo sorts and compares them as
//! dates. Use with `#[serde(default, with = "bson_date::optional")]`.

pub mod optional {
    use bson::DateTime as BsonDateTime;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(at) => BsonDateTime::from_chrono(*at).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        Ok(Option::<BsonDateTime>::deserialize(deserializer)?.map(|at| at.to_chrono()))
    }
}

use chrono::{DateTime, Utc};

/// Conversion for query filters and `$set` bodies built by hand.
pub fn to_bson(at: Option<DateTime<Utc>>) -> bson::Bson {
    at.map(|at| bson::Bson::DateTime(bson::DateTime::from_chrono(at))).unwrap_or(bson::Bson::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Stamped {
        #[serde(default, with = "optional")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_stored_as_bson_date() {
        let at = DateTime::parse_from_rfc3339("2025-04-01T08:30:00.123Z").unwrap().with_timezone(&Utc);
        let document = bson::to_document(&Stamped { at: Some(at) }).unwrap();
        assert!(matches!(document.get("at"), Some(bson::Bson::DateTime(_))));

        let back: Stamped = bson::from_document(document).unwrap();
        assert_eq!(back.at, Some(at));
    }

    #[test]
    fn test_missing_and_null_read_as_none() {
        let missing: Stamped = bson::from_document(bson::doc! {}).unwrap();
        let null: Stamped = bson::from_document(bson::doc! { "at": bson::Bson::Null }).unwrap();
        assert_eq!(missing.at, None);
        assert_eq!(null.at, None);
        assert_eq!(to_bson(None), bson::Bson::Null);
    }

    #[test]
    fn test_dates_order_chronologically_within_a_second() {
        let whole = DateTime::parse_from_rfc3339("2025-04-01T08:30:00Z").unwrap().with_timezone(&Utc);
        let later = DateTime::parse_from_rfc3339("2025-04-01T08:30:00.5Z").unwrap().with_timezone(&Utc);
        let (bson::Bson::DateTime(whole), bson::Bson::DateTime(later)) = (to_bson(Some(whole)), to_bson(Some(later))) else {
            panic!("expected BSON dates");
        };
        assert!(later > whole);
    }
}
