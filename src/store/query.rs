//! Read-side views joining venues, artists and shows.
//!
//! Every function takes the instant the past/upcoming split is computed against,
//! so results are reproducible for a given `now`.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::dsl::count_star;
use diesel::prelude::*;

use super::db::schema::{artists, shows, venues};
use super::db::SqlId;
use super::view::{
    ArtistDetail, Booking, Choice, Detail, SearchResults, ShowListing, Summary, VenueArea,
    VenueDetail,
};
use super::{Actions, Artist, Id, Timing, Venue};
use crate::error::Result;

pub fn venue_areas(conn: &mut SqliteConnection, now: NaiveDateTime) -> Result<Vec<VenueArea>> {
    let venues = venues::table
        .select((venues::id, venues::name, venues::city, venues::state))
        .order((venues::state.asc(), venues::city.asc(), venues::name.asc()))
        .load::<(SqlId<Venue>, String, String, String)>(conn)?;
    let upcoming = upcoming_by_venue(conn, now)?;

    let areas = group_into_areas(
        venues
            .into_iter()
            .map(|(id, name, city, state)| (id.into(), name, city, state)),
        &upcoming,
    );
    tracing::debug!(areas = areas.len(), "grouped venues by area");
    Ok(areas)
}

pub fn search_venues(
    conn: &mut SqliteConnection,
    term: &str,
    now: NaiveDateTime,
) -> Result<SearchResults<Venue>> {
    let candidates = venues::table
        .select((venues::id, venues::name))
        .order(venues::name.asc())
        .load::<(SqlId<Venue>, String)>(conn)?;
    let upcoming = upcoming_by_venue(conn, now)?;

    Ok(search(candidates, term, &upcoming))
}

pub fn search_artists(
    conn: &mut SqliteConnection,
    term: &str,
    now: NaiveDateTime,
) -> Result<SearchResults<Artist>> {
    let candidates = artists::table
        .select((artists::id, artists::name))
        .order(artists::name.asc())
        .load::<(SqlId<Artist>, String)>(conn)?;
    let upcoming = upcoming_by_artist(conn, now)?;

    Ok(search(candidates, term, &upcoming))
}

pub fn venue_detail(
    conn: &mut SqliteConnection,
    id: Id<Venue>,
    now: NaiveDateTime,
) -> Result<VenueDetail> {
    let venue: Venue = conn.read(id)?;
    let bookings = shows::table
        .inner_join(artists::table)
        .filter(shows::venue_id.eq(SqlId::from(id)))
        .order(shows::start_time.asc())
        .select((
            artists::id,
            artists::name,
            artists::image_link,
            shows::start_time,
        ))
        .load::<(SqlId<Artist>, String, Option<String>, NaiveDateTime)>(conn)?;

    Ok(split_history(id, venue, bookings, now))
}

pub fn artist_detail(
    conn: &mut SqliteConnection,
    id: Id<Artist>,
    now: NaiveDateTime,
) -> Result<ArtistDetail> {
    let artist: Artist = conn.read(id)?;
    let bookings = shows::table
        .inner_join(venues::table)
        .filter(shows::artist_id.eq(SqlId::from(id)))
        .order(shows::start_time.asc())
        .select((
            venues::id,
            venues::name,
            venues::image_link,
            shows::start_time,
        ))
        .load::<(SqlId<Venue>, String, Option<String>, NaiveDateTime)>(conn)?;

    Ok(split_history(id, artist, bookings, now))
}

pub fn list_shows(conn: &mut SqliteConnection) -> Result<Vec<ShowListing>> {
    let rows = shows::table
        .inner_join(venues::table)
        .inner_join(artists::table)
        .order(shows::start_time.asc())
        .select((
            venues::id,
            venues::name,
            artists::id,
            artists::name,
            artists::image_link,
            shows::start_time,
        ))
        .load::<(
            SqlId<Venue>,
            String,
            SqlId<Artist>,
            String,
            Option<String>,
            NaiveDateTime,
        )>(conn)?;

    Ok(rows
        .into_iter()
        .map(
            |(venue_id, venue_name, artist_id, artist_name, artist_image_link, start_time)| {
                ShowListing {
                    venue_id: venue_id.into(),
                    venue_name,
                    artist_id: artist_id.into(),
                    artist_name,
                    artist_image_link,
                    start_time: super::view::format_start_time(start_time),
                }
            },
        )
        .collect())
}

pub fn artist_choices(conn: &mut SqliteConnection) -> Result<Vec<Choice<Artist>>> {
    Ok(artists::table
        .select((artists::id, artists::name))
        .order(artists::name.asc())
        .load::<(SqlId<Artist>, String)>(conn)?
        .into_iter()
        .map(|(id, name)| Choice {
            id: id.into(),
            name,
        })
        .collect())
}

pub fn venue_choices(conn: &mut SqliteConnection) -> Result<Vec<Choice<Venue>>> {
    Ok(venues::table
        .select((venues::id, venues::name))
        .order(venues::name.asc())
        .load::<(SqlId<Venue>, String)>(conn)?
        .into_iter()
        .map(|(id, name)| Choice {
            id: id.into(),
            name,
        })
        .collect())
}

fn upcoming_by_venue(
    conn: &mut SqliteConnection,
    now: NaiveDateTime,
) -> Result<HashMap<Id<Venue>, usize>> {
    Ok(shows::table
        .filter(shows::start_time.gt(now))
        .group_by(shows::venue_id)
        .select((shows::venue_id, count_star()))
        .load::<(SqlId<Venue>, i64)>(conn)?
        .into_iter()
        .map(|(id, count)| (id.into(), count as usize))
        .collect())
}

fn upcoming_by_artist(
    conn: &mut SqliteConnection,
    now: NaiveDateTime,
) -> Result<HashMap<Id<Artist>, usize>> {
    Ok(shows::table
        .filter(shows::start_time.gt(now))
        .group_by(shows::artist_id)
        .select((shows::artist_id, count_star()))
        .load::<(SqlId<Artist>, i64)>(conn)?
        .into_iter()
        .map(|(id, count)| (id.into(), count as usize))
        .collect())
}

/// Groups venues by `(city, state)`, keeping groups in order of first appearance.
fn group_into_areas(
    venues: impl IntoIterator<Item = (Id<Venue>, String, String, String)>,
    upcoming: &HashMap<Id<Venue>, usize>,
) -> Vec<VenueArea> {
    let mut areas: Vec<VenueArea> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for (id, name, city, state) in venues {
        let summary = Summary {
            id,
            name,
            num_upcoming_shows: upcoming.get(&id).copied().unwrap_or(0),
        };
        let position = *index
            .entry((city.clone(), state.clone()))
            .or_insert_with(|| {
                areas.push(VenueArea {
                    city,
                    state,
                    venues: Vec::new(),
                });
                areas.len() - 1
            });
        areas[position].venues.push(summary);
    }

    areas
}

fn search<Item>(
    candidates: Vec<(SqlId<Item>, String)>,
    term: &str,
    upcoming: &HashMap<Id<Item>, usize>,
) -> SearchResults<Item> {
    let needle = term.to_lowercase();
    let data: Vec<Summary<Item>> = candidates
        .into_iter()
        .filter(|(_, name)| name.to_lowercase().contains(&needle))
        .map(|(id, name)| {
            let id: Id<Item> = id.into();
            Summary {
                id,
                name,
                num_upcoming_shows: upcoming.get(&id).copied().unwrap_or(0),
            }
        })
        .collect();

    SearchResults {
        count: data.len(),
        data,
    }
}

fn split_history<Item, Other>(
    id: Id<Item>,
    item: Item,
    bookings: Vec<(SqlId<Other>, String, Option<String>, NaiveDateTime)>,
    now: NaiveDateTime,
) -> Detail<Item, Other> {
    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();

    for (other, name, image_link, start_time) in bookings {
        let booking = Booking::new(other.into(), name, image_link, start_time);
        match Timing::of(start_time, now) {
            Some(Timing::Past) => past_shows.push(booking),
            Some(Timing::Upcoming) => upcoming_shows.push(booking),
            None => {}
        }
    }

    Detail {
        id,
        item,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::store::db::test_connection;
    use crate::store::{Genres, Show};

    fn venue(name: &str, city: &str, state: &str) -> Venue {
        Venue {
            name: name.into(),
            city: city.into(),
            state: state.into(),
            address: "335 Delancey Street".into(),
            phone: None,
            genres: Genres::from(vec!["Jazz".to_string()]),
            image_link: Some(format!("https://images.example.com/{}.jpg", name.len())),
            facebook_link: None,
            website: None,
            seeking_talent: false,
            seeking_description: None,
        }
    }

    fn artist(name: &str) -> Artist {
        Artist {
            name: name.into(),
            city: "New York".into(),
            state: "NY".into(),
            phone: None,
            genres: Genres::from(vec!["Jazz".to_string()]),
            image_link: None,
            facebook_link: None,
            website: None,
            seeking_venue: true,
            seeking_description: None,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn book(
        conn: &mut SqliteConnection,
        venue_id: Id<Venue>,
        artist_id: Id<Artist>,
        start_time: NaiveDateTime,
    ) {
        conn.create(Show {
            venue_id,
            artist_id,
            start_time,
        })
        .unwrap();
    }

    #[test]
    fn areas_group_every_venue_exactly_once() {
        let mut conn = test_connection();
        let hop = conn.create(venue("The Musical Hop", "San Francisco", "CA")).unwrap();
        conn.create(venue("Park Square Live Music & Coffee", "San Francisco", "CA"))
            .unwrap();
        conn.create(venue("The Dueling Pianos Bar", "New York", "NY"))
            .unwrap();
        let artist_id = conn.create(artist("Guns N Petals")).unwrap();
        book(&mut conn, hop, artist_id, now() + Duration::days(1));
        book(&mut conn, hop, artist_id, now() + Duration::days(2));
        book(&mut conn, hop, artist_id, now() - Duration::days(2));

        let areas = venue_areas(&mut conn, now()).unwrap();

        assert_eq!(areas.len(), 2);
        assert_eq!(areas.iter().map(|a| a.venues.len()).sum::<usize>(), 3);

        let sf = areas
            .iter()
            .find(|a| a.city == "San Francisco" && a.state == "CA")
            .unwrap();
        assert_eq!(sf.venues.len(), 2);
        let hop_summary = sf.venues.iter().find(|v| v.id == hop).unwrap();
        assert_eq!(hop_summary.num_upcoming_shows, 2);
        assert!(sf
            .venues
            .iter()
            .filter(|v| v.id != hop)
            .all(|v| v.num_upcoming_shows == 0));
    }

    #[test]
    fn areas_are_empty_without_venues() {
        let mut conn = test_connection();
        assert!(venue_areas(&mut conn, now()).unwrap().is_empty());
    }

    #[test]
    fn same_city_in_different_states_are_separate_areas() {
        let venues = vec![
            (Id::new(), "A".to_string(), "Portland".to_string(), "ME".to_string()),
            (Id::new(), "B".to_string(), "Portland".to_string(), "OR".to_string()),
            (Id::new(), "C".to_string(), "Portland".to_string(), "ME".to_string()),
        ];

        let areas = group_into_areas(venues, &HashMap::new());

        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].state, "ME");
        assert_eq!(areas[0].venues.len(), 2);
        assert_eq!(areas[1].state, "OR");
    }

    #[test]
    fn venue_search_is_case_insensitive_substring() {
        let mut conn = test_connection();
        conn.create(venue("The Musical Hop", "San Francisco", "CA")).unwrap();
        conn.create(venue("Park Square Live Music & Coffee", "San Francisco", "CA"))
            .unwrap();
        conn.create(venue("The Dueling Pianos Bar", "New York", "NY"))
            .unwrap();

        for term in ["hop", "HOP", "Musical"] {
            let results = search_venues(&mut conn, term, now()).unwrap();
            assert_eq!(results.count, 1, "term {term}");
            assert_eq!(results.data[0].name, "The Musical Hop");
        }

        let music = search_venues(&mut conn, "Music", now()).unwrap();
        assert_eq!(music.count, 2);

        let everything = search_venues(&mut conn, "", now()).unwrap();
        assert_eq!(everything.count, 3);

        let nothing = search_venues(&mut conn, "zzz", now()).unwrap();
        assert_eq!(nothing.count, 0);
        assert!(nothing.data.is_empty());
    }

    #[test]
    fn artist_search_counts_upcoming_shows() {
        let mut conn = test_connection();
        let venue_id = conn.create(venue("The Musical Hop", "San Francisco", "CA")).unwrap();
        let petals = conn.create(artist("Guns N Petals")).unwrap();
        conn.create(artist("Matt Quevedo")).unwrap();
        conn.create(artist("The Wild Sax Band")).unwrap();
        book(&mut conn, venue_id, petals, now() + Duration::hours(3));
        book(&mut conn, venue_id, petals, now() - Duration::hours(3));

        let a = search_artists(&mut conn, "A", now()).unwrap();
        assert_eq!(a.count, 3);

        let band = search_artists(&mut conn, "band", now()).unwrap();
        assert_eq!(band.count, 1);
        assert_eq!(band.data[0].name, "The Wild Sax Band");

        let petals_hit = search_artists(&mut conn, "petals", now()).unwrap();
        assert_eq!(petals_hit.data[0].id, petals);
        assert_eq!(petals_hit.data[0].num_upcoming_shows, 1);
    }

    #[test]
    fn show_starting_now_is_neither_past_nor_upcoming() {
        let mut conn = test_connection();
        let venue_id = conn.create(venue("The Musical Hop", "San Francisco", "CA")).unwrap();
        let artist_id = conn.create(artist("Guns N Petals")).unwrap();
        book(&mut conn, venue_id, artist_id, now());
        book(&mut conn, venue_id, artist_id, now() - Duration::seconds(1));
        book(&mut conn, venue_id, artist_id, now() + Duration::seconds(1));

        let detail = venue_detail(&mut conn, venue_id, now()).unwrap();
        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.upcoming_shows_count, 1);

        let detail = artist_detail(&mut conn, artist_id, now()).unwrap();
        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.upcoming_shows_count, 1);
        assert_eq!(detail.upcoming_shows[0].id, venue_id);
        assert_eq!(detail.upcoming_shows[0].name, "The Musical Hop");
        assert!(detail.upcoming_shows[0].image_link.is_some());

        let areas = venue_areas(&mut conn, now()).unwrap();
        assert_eq!(areas[0].venues[0].num_upcoming_shows, 1);
    }

    #[test]
    fn artist_detail_of_unknown_id_is_not_found() {
        let mut conn = test_connection();
        let result = artist_detail(&mut conn, Id::new(), now());
        assert!(matches!(result, Err(crate::error::Error::NotFound("artist"))));
    }

    #[test]
    fn show_listing_joins_both_sides() {
        let mut conn = test_connection();
        let venue_id = conn.create(venue("The Musical Hop", "San Francisco", "CA")).unwrap();
        let artist_id = conn.create(artist("The Wild Sax Band")).unwrap();
        let start = NaiveDate::from_ymd_opt(2035, 4, 1)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        book(&mut conn, venue_id, artist_id, start);

        let listing = list_shows(&mut conn).unwrap();

        assert_eq!(
            listing,
            vec![ShowListing {
                venue_id,
                venue_name: "The Musical Hop".into(),
                artist_id,
                artist_name: "The Wild Sax Band".into(),
                artist_image_link: None,
                start_time: "2035-04-01, 20:00:00".into(),
            }]
        );
    }

    #[test]
    fn choices_are_sorted_by_name() {
        let mut conn = test_connection();
        conn.create(artist("The Wild Sax Band")).unwrap();
        conn.create(artist("Guns N Petals")).unwrap();

        let names: Vec<String> = artist_choices(&mut conn)
            .unwrap()
            .into_iter()
            .map(|choice| choice.name)
            .collect();
        assert_eq!(names, ["Guns N Petals", "The Wild Sax Band"]);
        assert!(venue_choices(&mut conn).unwrap().is_empty());
    }
}
