// Decoded tag record, shared by both readers

use serde::{Serialize, Serializer};
use tracing::trace;

use crate::field_mapping::{Field, ValueConverter};

/// Title, artist, album, year and track number of an audio file.
///
/// Text fields that were never found are `None` and serialize as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(serialize_with = "text_or_empty")]
    pub title: Option<String>,
    #[serde(serialize_with = "text_or_empty")]
    pub artist: Option<String>,
    #[serde(serialize_with = "text_or_empty")]
    pub album: Option<String>,
    pub year: Option<u32>,
    pub track_number: Option<u32>,
}

fn text_or_empty<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

impl Tag {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn artist(&self) -> &str {
        self.artist.as_deref().unwrap_or("")
    }

    pub fn album(&self) -> &str {
        self.album.as_deref().unwrap_or("")
    }

    /// True when no field was found
    pub fn is_empty(&self) -> bool {
        *self == Tag::default()
    }
}

/// A raw value decoded from a frame or atom, before it is committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(u32),
}

impl FieldValue {
    fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    fn as_number(&self) -> Option<u32> {
        match self {
            FieldValue::Number(n) if *n > 0 => Some(*n),
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => ValueConverter::parse_positive(s),
        }
    }

    /// Whether this value can fill `field`
    fn fits(&self, field: Field) -> bool {
        if field.is_numeric() {
            self.as_number().is_some()
        } else {
            self.as_text().is_some()
        }
    }
}

/// Every value offered for each field during a decode, in encounter order.
///
/// The tag is built at the end from the first usable entry per field, so
/// later synonyms never overwrite an earlier value.
#[derive(Debug, Default)]
pub struct FieldCandidates {
    entries: Vec<(Field, FieldValue)>,
}

impl FieldCandidates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer(&mut self, field: Field, value: FieldValue) {
        trace!(%field, ?value, "Offered field value");
        self.entries.push((field, value));
    }

    /// Whether some earlier entry already fills `field`
    pub fn is_settled(&self, field: Field) -> bool {
        self.first(field).is_some()
    }

    fn first(&self, field: Field) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(f, value)| *f == field && value.fits(field))
            .map(|(_, value)| value)
    }

    fn text(&self, field: Field) -> Option<String> {
        self.first(field).and_then(|v| v.as_text()).map(str::to_owned)
    }

    fn number(&self, field: Field) -> Option<u32> {
        self.first(field).and_then(FieldValue::as_number)
    }

    pub fn into_tag(self) -> Tag {
        Tag {
            title: self.text(Field::Title),
            artist: self.text(Field::Artist),
            album: self.text(Field::Album),
            year: self.number(Field::Year),
            track_number: self.number(Field::TrackNumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_first_usable_value_wins() {
        let mut candidates = FieldCandidates::new();
        candidates.offer(Field::Artist, text(""));
        assert!(!candidates.is_settled(Field::Artist));
        candidates.offer(Field::Artist, text("Meat Puppets"));
        candidates.offer(Field::Artist, text("Someone Else"));
        assert!(candidates.is_settled(Field::Artist));

        let tag = candidates.into_tag();
        assert_eq!(tag.artist(), "Meat Puppets");
        assert_eq!(tag.title, None);
        assert_eq!(tag.title(), "");
    }

    #[test]
    fn test_invalid_numbers_do_not_settle() {
        let mut candidates = FieldCandidates::new();
        candidates.offer(Field::TrackNumber, text("abc"));
        candidates.offer(Field::TrackNumber, FieldValue::Number(0));
        assert!(!candidates.is_settled(Field::TrackNumber));
        candidates.offer(Field::TrackNumber, text("3/12"));
        candidates.offer(Field::Year, text("-1998"));

        let tag = candidates.into_tag();
        assert_eq!(tag.track_number, Some(3));
        assert_eq!(tag.year, None);
    }

    #[test]
    fn test_serializes_absent_text_as_empty() {
        let tag = Tag {
            title: Some("Nihil".to_string()),
            year: Some(2014),
            ..Tag::default()
        };
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Nihil",
                "artist": "",
                "album": "",
                "year": 2014,
                "trackNumber": null
            })
        );
    }
}
