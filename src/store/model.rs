use chrono::NaiveDateTime;
use serde::Serialize;

use super::Id;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Genres,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Genres,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    pub venue_id: Id<Venue>,
    pub artist_id: Id<Artist>,
    pub start_time: NaiveDateTime,
}

/// Where a show lies relative to an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    Past,
    Upcoming,
}

impl Timing {
    /// Classifies by strict comparison, so a show starting exactly at `now` is
    /// neither past nor upcoming.
    pub fn of(start_time: NaiveDateTime, now: NaiveDateTime) -> Option<Timing> {
        if start_time < now {
            Some(Timing::Past)
        } else if start_time > now {
            Some(Timing::Upcoming)
        } else {
            None
        }
    }
}

/// Ordered list of genres.
///
/// Entries are trimmed and blank entries dropped on construction. In storage the
/// entries are joined with `,`, and any `,` or `\` inside an entry is escaped with
/// a `\`, so [`Genres::decode`] exactly inverts [`Genres::encode`].
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(into = "Vec<String>")]
pub struct Genres(Vec<String>);

const SEPARATOR: char = ',';
const ESCAPE: char = '\\';

impl Genres {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn encode(&self) -> String {
        let mut encoded = String::new();
        for (index, genre) in self.0.iter().enumerate() {
            if index > 0 {
                encoded.push(SEPARATOR);
            }
            for c in genre.chars() {
                if c == SEPARATOR || c == ESCAPE {
                    encoded.push(ESCAPE);
                }
                encoded.push(c);
            }
        }
        encoded
    }

    pub fn decode(encoded: &str) -> Genres {
        let mut genres = Vec::new();
        let mut current = String::new();
        let mut chars = encoded.chars();
        while let Some(c) = chars.next() {
            match c {
                ESCAPE => {
                    // A dangling escape at the end is kept literally.
                    current.push(chars.next().unwrap_or(ESCAPE));
                }
                SEPARATOR => genres.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        genres.push(current);
        genres.into_iter().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Genres {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Genres(
            iter.into_iter()
                .map(|genre| genre.as_ref().trim().to_string())
                .filter(|genre| !genre.is_empty())
                .collect(),
        )
    }
}

impl From<Vec<String>> for Genres {
    fn from(genres: Vec<String>) -> Self {
        genres.into_iter().collect()
    }
}

impl From<Genres> for Vec<String> {
    fn from(genres: Genres) -> Self {
        genres.0
    }
}
