mod db;
mod id;
mod model;
#[macro_use]
pub mod action;
pub mod query;
pub mod view;

use chrono::{Local, NaiveDateTime};
use diesel::{self, prelude::*};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::{fairing, fairing::Fairing, Build, Rocket};

use crate::error::{Error, Result};
use db::schema::{artists, shows, venues};
use db::{SqlArtist, SqlId, SqlShow, SqlVenue};

pub use action::{Actions, References, Update};
pub use id::Id;
pub use model::{Artist, Genres, Show, Timing, Venue};
use view::{ArtistDetail, Choice, SearchResults, ShowListing, VenueArea, VenueDetail};

derive_actions!(Venue, SqlVenue, venues, "venue", [shows.venue_id]);
derive_actions!(Artist, SqlArtist, artists, "artist", [shows.artist_id]);
derive_actions!(Show, SqlShow, shows, "show", []);

derive_update!(Venue, SqlVenue, venues, "venue");
derive_update!(Artist, SqlArtist, artists, "artist");

impl References for Venue {}

impl References for Artist {}

impl References for Show {
    fn check_references(&self, conn: &mut SqliteConnection) -> Result<()> {
        let venue_exists = diesel::select(diesel::dsl::exists(
            venues::table.find(SqlId::from(self.venue_id)),
        ))
        .get_result::<bool>(conn)?;
        if !venue_exists {
            return Err(Error::ConstraintViolation(format!(
                "venue {} does not exist",
                self.venue_id
            )));
        }

        let artist_exists = diesel::select(diesel::dsl::exists(
            artists::table.find(SqlId::from(self.artist_id)),
        ))
        .get_result::<bool>(conn)?;
        if !artist_exists {
            return Err(Error::ConstraintViolation(format!(
                "artist {} does not exist",
                self.artist_id
            )));
        }

        Ok(())
    }
}

/// The instant shows are classified against.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Request-scoped handle on the database.
pub struct Store(db::Connection);

impl Store {
    pub fn fairing() -> StoreFairing {
        StoreFairing
    }

    /// Runs `f` on the pooled connection off the async executor.
    pub async fn run<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.0.run(f).await
    }

    pub async fn create<T>(&self, item: T) -> Result<Id<T>>
    where
        T: Send + 'static,
        SqliteConnection: Actions<T>,
    {
        self.run(move |c| Actions::<T>::create(c, item)).await
    }

    pub async fn read<T>(&self, id: Id<T>) -> Result<T>
    where
        T: Send + 'static,
        SqliteConnection: Actions<T>,
    {
        self.run(move |c| Actions::<T>::read(c, id)).await
    }

    pub async fn update<T>(&self, id: Id<T>, new_item: T) -> Result<T>
    where
        T: Send + 'static,
        SqliteConnection: Update<T>,
    {
        self.run(move |c| Update::<T>::update(c, id, new_item)).await
    }

    pub async fn delete<T>(&self, id: Id<T>) -> Result<T>
    where
        T: Send + 'static,
        SqliteConnection: Actions<T>,
    {
        self.run(move |c| Actions::<T>::delete(c, id)).await
    }

    pub async fn venue_areas(&self, now: NaiveDateTime) -> Result<Vec<VenueArea>> {
        self.run(move |c| query::venue_areas(c, now)).await
    }

    pub async fn search_venues(
        &self,
        term: String,
        now: NaiveDateTime,
    ) -> Result<SearchResults<Venue>> {
        self.run(move |c| query::search_venues(c, &term, now)).await
    }

    pub async fn search_artists(
        &self,
        term: String,
        now: NaiveDateTime,
    ) -> Result<SearchResults<Artist>> {
        self.run(move |c| query::search_artists(c, &term, now)).await
    }

    pub async fn venue_detail(&self, id: Id<Venue>, now: NaiveDateTime) -> Result<VenueDetail> {
        self.run(move |c| query::venue_detail(c, id, now)).await
    }

    pub async fn artist_detail(
        &self,
        id: Id<Artist>,
        now: NaiveDateTime,
    ) -> Result<ArtistDetail> {
        self.run(move |c| query::artist_detail(c, id, now)).await
    }

    pub async fn shows(&self) -> Result<Vec<ShowListing>> {
        self.run(query::list_shows).await
    }

    pub async fn artist_choices(&self) -> Result<Vec<Choice<Artist>>> {
        self.run(query::artist_choices).await
    }

    pub async fn booking_choices(&self) -> Result<(Vec<Choice<Venue>>, Vec<Choice<Artist>>)> {
        self.run(|c| Ok((query::venue_choices(c)?, query::artist_choices(c)?)))
            .await
    }
}

pub struct StoreFairing;

#[rocket::async_trait]
impl Fairing for StoreFairing {
    fn info(&self) -> fairing::Info {
        fairing::Info {
            name: "Directory Store Fairing",
            kind: fairing::Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> fairing::Result {
        let rocket = db::Connection::fairing().on_ignite(rocket).await?;
        db::initialize(rocket).await
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Store {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        db::Connection::from_request(request).await.map(Store)
    }
}
