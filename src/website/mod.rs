mod form;
mod render;

use maud::Markup;
use rocket::form::Form;
use rocket::http::Status;
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{Build, Request, Rocket};

use crate::error::{Error, Result};
use crate::store::{self, Artist, Id, Store, Venue};
use form::{ArtistForm, SearchForm, ShowForm, VenueForm};
use render::{artist_path, base_html, venue_path, Page};

/// A path id as parsed by Rocket; a malformed id names no record.
type IdParam<Item> = std::result::Result<Id<Item>, uuid::Error>;

fn known<Item>(param: IdParam<Item>, kind: &'static str) -> Result<Id<Item>> {
    param.map_err(|error| {
        tracing::debug!(error = %error, kind, "malformed id in path");
        Error::NotFound(kind)
    })
}

/// Outcome of a form submission: a redirect on success, otherwise the form again
/// with the reason it was rejected.
type Submission = std::result::Result<Flash<Redirect>, (Status, Markup)>;

pub fn mount(rocket: Rocket<Build>, prefix: &'static str) -> Rocket<Build> {
    rocket
        .mount(
            prefix,
            routes![
                home,
                venues,
                search_venues,
                venue_details,
                new_venue,
                create_venue,
                edit_venue,
                update_venue,
                delete_venue,
                artists,
                search_artists,
                artist_details,
                new_artist,
                create_artist,
                edit_artist,
                update_artist,
                delete_artist,
                shows,
                new_show,
                create_show,
            ],
        )
        .register(prefix, catchers![not_found, server_error, other_error])
}

fn rejected(error: &Error, page: Markup) -> (Status, Markup) {
    let status = error.status();

    if status == Status::InternalServerError {
        tracing::error!(error = %error, "write failed");
    } else {
        tracing::warn!(error = %error, status = status.code, "submission rejected");
    }
    (status, page)
}

fn missing(error: Error) -> (Status, Markup) {
    rejected(&error, base_html(render::not_found(), &Page::Home, None))
}

fn failure_message(kind: &str, name: &str, error: &Error) -> String {
    format!(
        "An error occurred. {} {} could not be listed. ({})",
        kind, name, error
    )
}

#[get("/")]
fn home(flash: Option<FlashMessage<'_>>) -> Markup {
    base_html(render::home(), &Page::Home, flash)
}

// Venues

#[get("/venues")]
async fn venues(store: Store) -> Result<Markup> {
    let areas = store.venue_areas(store::now()).await?;
    Ok(base_html(render::venue_areas(&areas), &Page::Venues, None))
}

#[post("/venues/search", data = "<form>")]
async fn search_venues(store: Store, form: Form<SearchForm>) -> Result<Markup> {
    let term = form.into_inner().search_term;
    let results = store.search_venues(term.clone(), store::now()).await?;
    tracing::debug!(term = %term, count = results.count, "searched venues");

    Ok(base_html(
        render::search_results(&term, &results, venue_path),
        &Page::Venues,
        None,
    ))
}

#[get("/venues/<id>")]
async fn venue_details(
    store: Store,
    id: IdParam<Venue>,
    flash: Option<FlashMessage<'_>>,
) -> Result<Markup> {
    let id = known(id, "venue")?;
    let detail = store.venue_detail(id, store::now()).await?;
    Ok(base_html(render::venue_detail(&detail), &Page::Venues, flash))
}

#[get("/venues/create")]
fn new_venue(flash: Option<FlashMessage<'_>>) -> Markup {
    base_html(
        render::venue_form(
            "List a new venue",
            "/venues/create",
            &VenueForm::default(),
            None,
        ),
        &Page::Venues,
        flash,
    )
}

#[post("/venues/create", data = "<form>")]
async fn create_venue(store: Store, form: Form<VenueForm>) -> Submission {
    let submitted = form.into_inner();
    let name = submitted.name.trim().to_string();
    let result = async {
        let venue = submitted.clone().validate()?;
        store.create(venue).await
    }
    .await;

    match result {
        Ok(_) => Ok(Flash::success(
            Redirect::to(uri!(home)),
            format!("Venue {} was successfully listed!", name),
        )),
        Err(error) => {
            let message = failure_message("Venue", &name, &error);
            let page = render::venue_form(
                "List a new venue",
                "/venues/create",
                &submitted,
                Some(&message),
            );
            Err(rejected(&error, base_html(page, &Page::Venues, None)))
        }
    }
}

#[get("/venues/<id>/edit")]
async fn edit_venue(
    store: Store,
    id: IdParam<Venue>,
    flash: Option<FlashMessage<'_>>,
) -> Result<Markup> {
    let id = known(id, "venue")?;
    let venue: Venue = store.read(id).await?;
    let action = format!("{}/edit", venue_path(id));
    Ok(base_html(
        render::venue_form("Edit venue", &action, &VenueForm::from(venue), None),
        &Page::Venues,
        flash,
    ))
}

#[post("/venues/<id>/edit", data = "<form>")]
async fn update_venue(store: Store, id: IdParam<Venue>, form: Form<VenueForm>) -> Submission {
    let id = known(id, "venue").map_err(missing)?;
    let submitted = form.into_inner();
    let name = submitted.name.trim().to_string();
    let result = async {
        let venue = submitted.clone().validate()?;
        store.update(id, venue).await
    }
    .await;

    match result {
        Ok(_) => Ok(Flash::success(
            Redirect::to(venue_path(id)),
            format!("Venue {} was successfully updated!", name),
        )),
        Err(error) => {
            let message = format!("An error occurred. Venue could not be updated. ({})", error);
            let action = format!("{}/edit", venue_path(id));
            let page = render::venue_form("Edit venue", &action, &submitted, Some(&message));
            Err(rejected(&error, base_html(page, &Page::Venues, None)))
        }
    }
}

#[delete("/venues/<id>")]
async fn delete_venue(store: Store, id: IdParam<Venue>) -> Result<Flash<Redirect>> {
    let id = known(id, "venue")?;
    let venue: Venue = store.delete(id).await?;
    Ok(Flash::success(
        Redirect::to(uri!(home)),
        format!("Venue {} was successfully deleted.", venue.name),
    ))
}

// Artists

#[get("/artists")]
async fn artists(store: Store) -> Result<Markup> {
    let artists = store.artist_choices().await?;
    Ok(base_html(render::artists(&artists), &Page::Artists, None))
}

#[post("/artists/search", data = "<form>")]
async fn search_artists(store: Store, form: Form<SearchForm>) -> Result<Markup> {
    let term = form.into_inner().search_term;
    let results = store.search_artists(term.clone(), store::now()).await?;
    tracing::debug!(term = %term, count = results.count, "searched artists");

    Ok(base_html(
        render::search_results(&term, &results, artist_path),
        &Page::Artists,
        None,
    ))
}

#[get("/artists/<id>")]
async fn artist_details(
    store: Store,
    id: IdParam<Artist>,
    flash: Option<FlashMessage<'_>>,
) -> Result<Markup> {
    let id = known(id, "artist")?;
    let detail = store.artist_detail(id, store::now()).await?;
    Ok(base_html(render::artist_detail(&detail), &Page::Artists, flash))
}

#[get("/artists/create")]
fn new_artist(flash: Option<FlashMessage<'_>>) -> Markup {
    base_html(
        render::artist_form(
            "List a new artist",
            "/artists/create",
            &ArtistForm::default(),
            None,
        ),
        &Page::Artists,
        flash,
    )
}

#[post("/artists/create", data = "<form>")]
async fn create_artist(store: Store, form: Form<ArtistForm>) -> Submission {
    let submitted = form.into_inner();
    let name = submitted.name.trim().to_string();
    let result = async {
        let artist = submitted.clone().validate()?;
        store.create(artist).await
    }
    .await;

    match result {
        Ok(_) => Ok(Flash::success(
            Redirect::to(uri!(home)),
            format!("Artist {} was successfully listed!", name),
        )),
        Err(error) => {
            let message = failure_message("Artist", &name, &error);
            let page = render::artist_form(
                "List a new artist",
                "/artists/create",
                &submitted,
                Some(&message),
            );
            Err(rejected(&error, base_html(page, &Page::Artists, None)))
        }
    }
}

#[get("/artists/<id>/edit")]
async fn edit_artist(
    store: Store,
    id: IdParam<Artist>,
    flash: Option<FlashMessage<'_>>,
) -> Result<Markup> {
    let id = known(id, "artist")?;
    let artist: Artist = store.read(id).await?;
    let action = format!("{}/edit", artist_path(id));
    Ok(base_html(
        render::artist_form("Edit artist", &action, &ArtistForm::from(artist), None),
        &Page::Artists,
        flash,
    ))
}

#[post("/artists/<id>/edit", data = "<form>")]
async fn update_artist(store: Store, id: IdParam<Artist>, form: Form<ArtistForm>) -> Submission {
    let id = known(id, "artist").map_err(missing)?;
    let submitted = form.into_inner();
    let name = submitted.name.trim().to_string();
    let result = async {
        let artist = submitted.clone().validate()?;
        store.update(id, artist).await
    }
    .await;

    match result {
        Ok(_) => Ok(Flash::success(
            Redirect::to(artist_path(id)),
            format!("Artist {} was successfully updated!", name),
        )),
        Err(error) => {
            let message = format!("An error occurred. Artist could not be updated. ({})", error);
            let action = format!("{}/edit", artist_path(id));
            let page = render::artist_form("Edit artist", &action, &submitted, Some(&message));
            Err(rejected(&error, base_html(page, &Page::Artists, None)))
        }
    }
}

#[delete("/artists/<id>")]
async fn delete_artist(store: Store, id: IdParam<Artist>) -> Result<Flash<Redirect>> {
    let id = known(id, "artist")?;
    let artist: Artist = store.delete(id).await?;
    Ok(Flash::success(
        Redirect::to(uri!(home)),
        format!("Artist {} was successfully deleted.", artist.name),
    ))
}

// Shows

#[get("/shows")]
async fn shows(store: Store) -> Result<Markup> {
    let shows = store.shows().await?;
    Ok(base_html(render::shows(&shows), &Page::Shows, None))
}

#[get("/shows/create")]
async fn new_show(store: Store, flash: Option<FlashMessage<'_>>) -> Result<Markup> {
    let (venues, artists) = store.booking_choices().await?;
    Ok(base_html(
        render::show_form(&ShowForm::default(), &venues, &artists, None),
        &Page::Shows,
        flash,
    ))
}

#[post("/shows/create", data = "<form>")]
async fn create_show(store: Store, form: Form<ShowForm>) -> Submission {
    let submitted = form.into_inner();
    let result = async {
        let show = submitted.clone().validate()?;
        store.create(show).await
    }
    .await;

    match result {
        Ok(id) => {
            tracing::debug!(id = %id, "show listed");
            Ok(Flash::success(
                Redirect::to(uri!(home)),
                "Show was successfully listed!",
            ))
        }
        Err(error) => {
            let (venues, artists) = match store.booking_choices().await {
                Ok(choices) => choices,
                Err(choices_error) => {
                    tracing::warn!(error = %choices_error, "booking choices unavailable");
                    Default::default()
                }
            };
            let message = format!("An error occurred. Show could not be listed. ({})", error);
            let page = render::show_form(&submitted, &venues, &artists, Some(&message));
            Err(rejected(&error, base_html(page, &Page::Shows, None)))
        }
    }
}

// Errors

#[catch(404)]
fn not_found() -> Markup {
    base_html(render::not_found(), &Page::Home, None)
}

#[catch(500)]
fn server_error() -> Markup {
    base_html(render::server_error(), &Page::Home, None)
}

#[catch(default)]
fn other_error(status: Status, _: &Request<'_>) -> (Status, Markup) {
    (status, base_html(render::error(status), &Page::Home, None))
}
