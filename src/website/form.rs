//! Submitted form fields and their validation into store records.

use chrono::NaiveDateTime;

use crate::error::{Error, Result};
use crate::store::{Artist, Genres, Id, Show, Venue};

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
    "Swing",
    "Other",
];

pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

const START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(FromForm, Default, Debug, Clone)]
pub struct SearchForm {
    #[field(default = String::new())]
    pub search_term: String,
}

#[derive(FromForm, Default, Debug, Clone)]
pub struct VenueForm {
    #[field(default = String::new())]
    pub name: String,
    #[field(default = String::new())]
    pub city: String,
    #[field(default = String::new())]
    pub state: String,
    #[field(default = String::new())]
    pub address: String,
    #[field(default = String::new())]
    pub phone: String,
    pub genres: Vec<String>,
    #[field(default = String::new())]
    pub image_link: String,
    #[field(default = String::new())]
    pub facebook_link: String,
    #[field(default = String::new())]
    pub website: String,
    pub seeking_talent: bool,
    #[field(default = String::new())]
    pub seeking_description: String,
}

impl VenueForm {
    pub fn validate(self) -> Result<Venue> {
        Ok(Venue {
            name: required("name", &self.name)?,
            city: required("city", &self.city)?,
            state: state(&self.state)?,
            address: required("address", &self.address)?,
            phone: phone(&self.phone)?,
            genres: genres(&self.genres)?,
            image_link: link("image_link", &self.image_link)?,
            facebook_link: link("facebook_link", &self.facebook_link)?,
            website: link("website", &self.website)?,
            seeking_talent: self.seeking_talent,
            seeking_description: optional(&self.seeking_description),
        })
    }
}

impl From<Venue> for VenueForm {
    fn from(venue: Venue) -> Self {
        VenueForm {
            name: venue.name,
            city: venue.city,
            state: venue.state,
            address: venue.address,
            phone: venue.phone.unwrap_or_default(),
            genres: venue.genres.into(),
            image_link: venue.image_link.unwrap_or_default(),
            facebook_link: venue.facebook_link.unwrap_or_default(),
            website: venue.website.unwrap_or_default(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.unwrap_or_default(),
        }
    }
}

#[derive(FromForm, Default, Debug, Clone)]
pub struct ArtistForm {
    #[field(default = String::new())]
    pub name: String,
    #[field(default = String::new())]
    pub city: String,
    #[field(default = String::new())]
    pub state: String,
    #[field(default = String::new())]
    pub phone: String,
    pub genres: Vec<String>,
    #[field(default = String::new())]
    pub image_link: String,
    #[field(default = String::new())]
    pub facebook_link: String,
    #[field(default = String::new())]
    pub website: String,
    pub seeking_venue: bool,
    #[field(default = String::new())]
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn validate(self) -> Result<Artist> {
        Ok(Artist {
            name: required("name", &self.name)?,
            city: required("city", &self.city)?,
            state: state(&self.state)?,
            phone: phone(&self.phone)?,
            genres: genres(&self.genres)?,
            image_link: link("image_link", &self.image_link)?,
            facebook_link: link("facebook_link", &self.facebook_link)?,
            website: link("website", &self.website)?,
            seeking_venue: self.seeking_venue,
            seeking_description: optional(&self.seeking_description),
        })
    }
}

impl From<Artist> for ArtistForm {
    fn from(artist: Artist) -> Self {
        ArtistForm {
            name: artist.name,
            city: artist.city,
            state: artist.state,
            phone: artist.phone.unwrap_or_default(),
            genres: artist.genres.into(),
            image_link: artist.image_link.unwrap_or_default(),
            facebook_link: artist.facebook_link.unwrap_or_default(),
            website: artist.website.unwrap_or_default(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.unwrap_or_default(),
        }
    }
}

#[derive(FromForm, Default, Debug, Clone)]
pub struct ShowForm {
    #[field(default = String::new())]
    pub venue_id: String,
    #[field(default = String::new())]
    pub artist_id: String,
    #[field(default = String::new())]
    pub start_time: String,
}

impl ShowForm {
    pub fn validate(self) -> Result<Show> {
        Ok(Show {
            venue_id: id("venue_id", &self.venue_id)?,
            artist_id: id("artist_id", &self.artist_id)?,
            start_time: start_time(&self.start_time)?,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String> {
    match value.trim() {
        "" => Err(Error::invalid(field, "is required")),
        value => Ok(value.to_string()),
    }
}

fn optional(value: &str) -> Option<String> {
    match value.trim() {
        "" => None,
        value => Some(value.to_string()),
    }
}

fn state(value: &str) -> Result<String> {
    let state = required("state", value)?.to_uppercase();
    if STATES.contains(&state.as_str()) {
        Ok(state)
    } else {
        Err(Error::invalid("state", format!("'{}' is not a US state", state)))
    }
}

fn phone(value: &str) -> Result<Option<String>> {
    let phone = optional(value);
    let allowed = |c: char| c.is_ascii_digit() || " -+()".contains(c);
    match phone {
        Some(number) if !number.chars().all(allowed) => Err(Error::invalid(
            "phone",
            "may only contain digits, spaces and + - ( )",
        )),
        phone => Ok(phone),
    }
}

fn link(field: &'static str, value: &str) -> Result<Option<String>> {
    let link = optional(value);
    match link {
        Some(url)
            if !(url.starts_with("http://") || url.starts_with("https://"))
                || url.contains(char::is_whitespace) =>
        {
            Err(Error::invalid(field, "must be an http(s) URL"))
        }
        link => Ok(link),
    }
}

fn genres(values: &[String]) -> Result<Genres> {
    let genres: Genres = values.iter().collect();
    if genres.is_empty() {
        return Err(Error::invalid("genres", "needs at least one genre"));
    }
    if let Some(unknown) = genres
        .as_slice()
        .iter()
        .find(|genre| !GENRES.contains(&genre.as_str()))
    {
        return Err(Error::invalid(
            "genres",
            format!("'{}' is not a known genre", unknown),
        ));
    }
    Ok(genres)
}

fn id<Item>(field: &'static str, value: &str) -> Result<Id<Item>> {
    Id::parse_str(value.trim()).map_err(|_| Error::invalid(field, "is not a valid id"))
}

fn start_time(value: &str) -> Result<NaiveDateTime> {
    let value = required("start_time", value)?;
    START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&value, format).ok())
        .ok_or_else(|| Error::invalid("start_time", "must look like 2019-05-21 21:30"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn venue_form() -> VenueForm {
        VenueForm {
            name: " The Musical Hop ".into(),
            city: "San Francisco".into(),
            state: "ca".into(),
            address: "1015 Folsom Street".into(),
            phone: "123-123-1234".into(),
            genres: vec!["Jazz".into(), "Reggae".into()],
            image_link: "".into(),
            facebook_link: "https://www.facebook.com/TheMusicalHop".into(),
            website: "  ".into(),
            seeking_talent: true,
            seeking_description: "Looking for local talent".into(),
        }
    }

    fn assert_invalid<T: std::fmt::Debug>(result: Result<T>, expected: &str) {
        match result {
            Err(Error::ValidationFailed { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected {} to be rejected, got {:?}", expected, other),
        }
    }

    #[test]
    fn valid_venue_is_normalized() {
        let venue = venue_form().validate().unwrap();
        assert_eq!(venue.name, "The Musical Hop");
        assert_eq!(venue.state, "CA");
        assert_eq!(venue.image_link, None);
        assert_eq!(venue.website, None);
        assert_eq!(venue.genres.as_slice(), ["Jazz", "Reggae"]);
    }

    #[test]
    fn venue_form_round_trips_through_record() {
        let venue = venue_form().validate().unwrap();
        let again = VenueForm::from(venue.clone()).validate().unwrap();
        assert_eq!(venue, again);
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        assert_invalid(
            VenueForm {
                name: "   ".into(),
                ..venue_form()
            }
            .validate(),
            "name",
        );
        assert_invalid(
            VenueForm {
                address: "".into(),
                ..venue_form()
            }
            .validate(),
            "address",
        );
        assert_invalid(ArtistForm::default().validate(), "name");
    }

    #[test]
    fn unknown_state_and_genre_are_rejected() {
        assert_invalid(
            VenueForm {
                state: "XX".into(),
                ..venue_form()
            }
            .validate(),
            "state",
        );
        assert_invalid(
            VenueForm {
                genres: vec!["Polka".into()],
                ..venue_form()
            }
            .validate(),
            "genres",
        );
        assert_invalid(
            VenueForm {
                genres: vec![],
                ..venue_form()
            }
            .validate(),
            "genres",
        );
    }

    #[test]
    fn malformed_links_and_phones_are_rejected() {
        assert_invalid(
            VenueForm {
                website: "www.themusicalhop.com".into(),
                ..venue_form()
            }
            .validate(),
            "website",
        );
        assert_invalid(
            VenueForm {
                phone: "call me".into(),
                ..venue_form()
            }
            .validate(),
            "phone",
        );
    }

    #[test]
    fn show_form_parses_ids_and_times() {
        let venue_id: Id<Venue> = Id::new();
        let artist_id: Id<Artist> = Id::new();
        let expected = NaiveDate::from_ymd_opt(2019, 5, 21)
            .unwrap()
            .and_hms_opt(21, 30, 0)
            .unwrap();

        for start_time in ["2019-05-21T21:30", "2019-05-21 21:30:00"] {
            let show = ShowForm {
                venue_id: venue_id.to_string(),
                artist_id: artist_id.to_string(),
                start_time: start_time.into(),
            }
            .validate()
            .unwrap();
            assert_eq!(show.venue_id, venue_id);
            assert_eq!(show.artist_id, artist_id);
            assert_eq!(show.start_time, expected);
        }
    }

    #[test]
    fn show_form_rejects_bad_input() {
        let valid = ShowForm {
            venue_id: Id::<Venue>::new().to_string(),
            artist_id: Id::<Artist>::new().to_string(),
            start_time: "2019-05-21 21:30".into(),
        };
        assert_invalid(
            ShowForm {
                venue_id: "1".into(),
                ..valid.clone()
            }
            .validate(),
            "venue_id",
        );
        assert_invalid(
            ShowForm {
                start_time: "tomorrow".into(),
                ..valid
            }
            .validate(),
            "start_time",
        );
    }
}
