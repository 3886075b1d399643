//! HTML form handling for the booking site.
//!
//! Bodies are `application/x-www-form-urlencoded`. Multi-selects such as
//! `genres` arrive as repeated keys, so the body is decoded into ordered
//! pairs rather than straight into a struct.

use chrono::NaiveDateTime;
use validator::Validate;

pub const GENRES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

const START_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("malformed form body: {0}")]
    Malformed(#[from] serde_urlencoded::de::Error),
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} has an invalid value: {value:?}")]
    Invalid { field: &'static str, value: String },
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Decoded form body keeping repeated keys.
#[derive(Debug, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
        Ok(Self { pairs })
    }

    /// First non-blank value for `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Checkbox semantics: present and not an explicit "no" means true.
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(v) => !matches!(v.to_ascii_lowercase().as_str(), "n" | "no" | "false" | "off" | "0"),
            None => false,
        }
    }

    fn require(&self, key: &'static str) -> Result<String, FormError> {
        self.get(key).ok_or(FormError::Missing(key))
    }

    fn require_id(&self, key: &'static str) -> Result<i64, FormError> {
        let raw = self.require(key)?;
        raw.parse()
            .map_err(|_| FormError::Invalid { field: key, value: raw })
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct VenueForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub image_link: Option<String>,
    #[validate(length(max = 150))]
    pub facebook_link: Option<String>,
    #[validate(length(max = 150))]
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    #[validate(length(max = 255))]
    pub seeking_description: Option<String>,
}

impl VenueForm {
    pub fn from_fields(fields: &FormFields) -> Result<Self, FormError> {
        let form = VenueForm {
            name: fields.require("name")?,
            city: fields.get("city"),
            state: fields.get("state"),
            address: fields.get("address"),
            phone: fields.get("phone"),
            image_link: fields.get("image_link"),
            facebook_link: fields.get("facebook_link"),
            website: fields.get("website"),
            genres: fields.get_all("genres"),
            seeking_talent: fields.flag("seeking_talent"),
            seeking_description: fields.get("seeking_description"),
        };
        form.validate()?;
        Ok(form)
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ArtistForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    #[validate(length(max = 500))]
    pub image_link: Option<String>,
    #[validate(length(max = 150))]
    pub facebook_link: Option<String>,
    #[validate(length(max = 150))]
    pub website: Option<String>,
    pub seeking_venue: bool,
    #[validate(length(max = 500))]
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn from_fields(fields: &FormFields) -> Result<Self, FormError> {
        let form = ArtistForm {
            name: fields.require("name")?,
            city: fields.get("city"),
            state: fields.get("state"),
            phone: fields.get("phone"),
            genres: fields.get_all("genres"),
            image_link: fields.get("image_link"),
            facebook_link: fields.get("facebook_link"),
            website: fields.get("website"),
            seeking_venue: fields.flag("seeking_venue"),
            seeking_description: fields.get("seeking_description"),
        };
        form.validate()?;
        Ok(form)
    }
}

#[derive(Debug, Clone)]
pub struct ShowForm {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: NaiveDateTime,
}

impl ShowForm {
    pub fn from_fields(fields: &FormFields) -> Result<Self, FormError> {
        let raw_start = fields.require("start_time")?;
        Ok(ShowForm {
            artist_id: fields.require_id("artist_id")?,
            venue_id: fields.require_id("venue_id")?,
            start_time: parse_start_time(&raw_start).ok_or(FormError::Invalid {
                field: "start_time",
                value: raw_start.clone(),
            })?,
        })
    }
}

pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    START_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
}
