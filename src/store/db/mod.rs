mod id;

use diesel::{self, prelude::*};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::{fairing, Build, Rocket};
use rocket_sync_db_pools::database;

#[database("sqlite_database")]
pub struct Connection(diesel::SqliteConnection);

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub async fn initialize(rocket: Rocket<Build>) -> fairing::Result {
    let conn = match Connection::get_one(&rocket).await {
        Some(conn) => conn,
        None => {
            tracing::error!("database connection failed");
            return Err(rocket);
        }
    };

    let result = conn
        .run(|c| run_migrations(c).map_err(|e| e.to_string()))
        .await;

    match result {
        Ok(applied) => {
            tracing::info!(applied, "database migrations complete");
            Ok(rocket)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to run database migrations");
            Err(rocket)
        }
    }
}

pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|versions| versions.len())
}

/// SQLite checks foreign keys only when asked to, per connection, and ignores the
/// pragma inside a transaction.
pub fn enforce_foreign_keys(conn: &mut SqliteConnection) -> QueryResult<()> {
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(conn)
        .map(|_| ())
}

pub mod schema {
    table! {
        venues {
            id -> Binary,
            name -> Text,
            city -> Text,
            state -> Text,
            address -> Text,
            phone -> Nullable<Text>,
            genres -> Text,
            image_link -> Nullable<Text>,
            facebook_link -> Nullable<Text>,
            website -> Nullable<Text>,
            seeking_talent -> Bool,
            seeking_description -> Nullable<Text>,
        }
    }
    table! {
        artists {
            id -> Binary,
            name -> Text,
            city -> Text,
            state -> Text,
            phone -> Nullable<Text>,
            genres -> Text,
            image_link -> Nullable<Text>,
            facebook_link -> Nullable<Text>,
            website -> Nullable<Text>,
            seeking_venue -> Bool,
            seeking_description -> Nullable<Text>,
        }
    }
    table! {
        shows {
            id -> Binary,
            venue_id -> Binary,
            artist_id -> Binary,
            start_time -> Timestamp,
        }
    }

    joinable!(shows -> venues (venue_id));
    joinable!(shows -> artists (artist_id));

    allow_tables_to_appear_in_same_query!(venues, artists, shows);
}

use chrono::NaiveDateTime;

use super::{Artist, Genres, Id, Show, Venue};
pub use id::SqlId;
use schema::*;

#[derive(Queryable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = venues, treat_none_as_null = true)]
pub struct SqlVenue {
    pub id: SqlId<Venue>,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: String,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl From<SqlVenue> for (Id<Venue>, Venue) {
    fn from(venue: SqlVenue) -> Self {
        (
            venue.id.into(),
            Venue {
                name: venue.name,
                city: venue.city,
                state: venue.state,
                address: venue.address,
                phone: venue.phone,
                genres: Genres::decode(&venue.genres),
                image_link: venue.image_link,
                facebook_link: venue.facebook_link,
                website: venue.website,
                seeking_talent: venue.seeking_talent,
                seeking_description: venue.seeking_description,
            },
        )
    }
}

impl From<(Id<Venue>, Venue)> for SqlVenue {
    fn from((id, venue): (Id<Venue>, Venue)) -> SqlVenue {
        SqlVenue {
            id: id.into(),
            name: venue.name,
            city: venue.city,
            state: venue.state,
            address: venue.address,
            phone: venue.phone,
            genres: venue.genres.encode(),
            image_link: venue.image_link,
            facebook_link: venue.facebook_link,
            website: venue.website,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
        }
    }
}

#[derive(Queryable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = artists, treat_none_as_null = true)]
pub struct SqlArtist {
    pub id: SqlId<Artist>,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: String,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl From<SqlArtist> for (Id<Artist>, Artist) {
    fn from(artist: SqlArtist) -> Self {
        (
            artist.id.into(),
            Artist {
                name: artist.name,
                city: artist.city,
                state: artist.state,
                phone: artist.phone,
                genres: Genres::decode(&artist.genres),
                image_link: artist.image_link,
                facebook_link: artist.facebook_link,
                website: artist.website,
                seeking_venue: artist.seeking_venue,
                seeking_description: artist.seeking_description,
            },
        )
    }
}

impl From<(Id<Artist>, Artist)> for SqlArtist {
    fn from((id, artist): (Id<Artist>, Artist)) -> SqlArtist {
        SqlArtist {
            id: id.into(),
            name: artist.name,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            genres: artist.genres.encode(),
            image_link: artist.image_link,
            facebook_link: artist.facebook_link,
            website: artist.website,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
        }
    }
}

#[derive(Queryable, Insertable, Debug, Clone)]
#[diesel(table_name = shows)]
pub struct SqlShow {
    pub id: SqlId<Show>,
    pub venue_id: SqlId<Venue>,
    pub artist_id: SqlId<Artist>,
    pub start_time: NaiveDateTime,
}

impl From<SqlShow> for (Id<Show>, Show) {
    fn from(show: SqlShow) -> Self {
        (
            show.id.into(),
            Show {
                venue_id: show.venue_id.into(),
                artist_id: show.artist_id.into(),
                start_time: show.start_time,
            },
        )
    }
}

impl From<(Id<Show>, Show)> for SqlShow {
    fn from((id, show): (Id<Show>, Show)) -> SqlShow {
        SqlShow {
            id: id.into(),
            venue_id: show.venue_id.into(),
            artist_id: show.artist_id.into(),
            start_time: show.start_time,
        }
    }
}

#[cfg(test)]
pub fn test_connection() -> SqliteConnection {
    use diesel::Connection as _;

    let mut conn =
        SqliteConnection::establish(":memory:").expect("in-memory database should open");
    run_migrations(&mut conn).expect("migrations should apply");
    conn
}
