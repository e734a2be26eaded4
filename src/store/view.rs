//! Flat shapes handed to the pages.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{Artist, Id, Venue};

const START_TIME_FORMAT: &str = "%Y-%m-%d, %H:%M:%S";

pub fn format_start_time(start_time: NaiveDateTime) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

/// Venues sharing a city and state.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<Summary<Venue>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Summary<Item> {
    pub id: Id<Item>,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SearchResults<Item> {
    pub count: usize,
    pub data: Vec<Summary<Item>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Choice<Item> {
    pub id: Id<Item>,
    pub name: String,
}

/// A show as seen from one side, naming the record on the other side.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Booking<Other> {
    pub id: Id<Other>,
    pub name: String,
    pub image_link: Option<String>,
    pub start_time: String,
}

impl<Other> Booking<Other> {
    pub fn new(
        id: Id<Other>,
        name: String,
        image_link: Option<String>,
        start_time: NaiveDateTime,
    ) -> Self {
        Booking {
            id,
            name,
            image_link,
            start_time: format_start_time(start_time),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Detail<Item, Other> {
    pub id: Id<Item>,
    #[serde(flatten)]
    pub item: Item,
    pub past_shows: Vec<Booking<Other>>,
    pub upcoming_shows: Vec<Booking<Other>>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub type VenueDetail = Detail<Venue, Artist>;
pub type ArtistDetail = Detail<Artist, Venue>;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ShowListing {
    pub venue_id: Id<Venue>,
    pub venue_name: String,
    pub artist_id: Id<Artist>,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}
