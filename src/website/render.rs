use maud::{html, Markup, DOCTYPE};
use rocket::http::Status;
use rocket::request::FlashMessage;

use super::form::{ArtistForm, ShowForm, VenueForm, GENRES, STATES};
use crate::store::view::{
    ArtistDetail, Booking, Choice, Detail, SearchResults, ShowListing, Summary, VenueArea,
    VenueDetail,
};
use crate::store::{Artist, Id, Venue};

#[derive(PartialEq)]
pub enum Page {
    Home,
    Venues,
    Artists,
    Shows,
}

impl Page {
    fn url(&self) -> &'static str {
        use Page::*;

        match self {
            Home => "/",
            Venues => "/venues",
            Artists => "/artists",
            Shows => "/shows",
        }
    }

    fn title(&self) -> &'static str {
        use Page::*;

        match self {
            Home => "Fyyur",
            Venues => "Venues",
            Artists => "Artists",
            Shows => "Shows",
        }
    }

    /// Artist pages search artists, everything else searches venues.
    fn search_url(&self) -> &'static str {
        match self {
            Page::Artists => "/artists/search",
            _ => "/venues/search",
        }
    }
}

pub fn venue_path(id: Id<Venue>) -> String {
    format!("/venues/{}", id)
}

pub fn artist_path(id: Id<Artist>) -> String {
    format!("/artists/{}", id)
}

pub fn base_html(main: Markup, current_page: &Page, flash: Option<FlashMessage<'_>>) -> Markup {
    use Page::*;
    html! {
        ( DOCTYPE )
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { ( current_page.title() ) }

                link href="/static/main.css" rel="stylesheet";
            }
            body {
                header {
                    div.header {
                        a.title href="/" { h1 { "Fyyur" } }
                        nav {
                            ol {
                                @for page in vec![Venues, Artists, Shows] {
                                    li { ( nav_entry(page, current_page) ) }
                                }
                            }
                        }
                        form.search method="post" action=( current_page.search_url() ) {
                            input type="search" name="search_term" placeholder="Find a venue or artist";
                        }
                    }
                }
                @if let Some(flash) = flash {
                    div class={ "flash " ( flash.kind() ) } { ( flash.message() ) }
                }
                main {
                    ( main )
                }
            }
        }
    }
}

fn nav_entry(page: Page, current: &Page) -> Markup {
    html! {
        a.current[current == &page] href=( page.url() ) { ( page.title() ) }
    }
}

pub fn home() -> Markup {
    html! {
        div.home {
            h2 { "Book venues and artists" }
            ul.actions {
                li { a href="/venues/create" { "Post a venue" } }
                li { a href="/artists/create" { "Post an artist" } }
                li { a href="/shows/create" { "Post a show" } }
            }
        }
    }
}

pub fn venue_areas(areas: &[VenueArea]) -> Markup {
    html! {
        @if areas.is_empty() {
            p.empty { "No venues listed yet." }
        }
        @for area in areas {
            section.area {
                h3 { ( area.city ) ", " ( area.state ) }
                ul.items {
                    @for venue in &area.venues {
                        li { ( summary(venue, &venue_path(venue.id)) ) }
                    }
                }
            }
        }
    }
}

pub fn artists(artists: &[Choice<Artist>]) -> Markup {
    html! {
        ul.items {
            @for artist in artists {
                li { a href=( artist_path(artist.id) ) { ( artist.name ) } }
            }
        }
    }
}

fn summary<Item>(entry: &Summary<Item>, href: &str) -> Markup {
    html! {
        a href=( href ) {
            span.name { ( entry.name ) }
            " "
            span.count { "(" ( entry.num_upcoming_shows ) " upcoming shows)" }
        }
    }
}

pub fn search_results<Item>(
    term: &str,
    results: &SearchResults<Item>,
    path: impl Fn(Id<Item>) -> String,
) -> Markup {
    html! {
        h3 { "Number of search results for \"" ( term ) "\": " ( results.count ) }
        ul.items {
            @for entry in &results.data {
                li { ( summary(entry, &path(entry.id)) ) }
            }
        }
    }
}

pub fn venue_detail(detail: &VenueDetail) -> Markup {
    let venue = &detail.item;
    html! {
        div.detail {
            h1 { ( venue.name ) }
            p.subtitle { "ID: " ( detail.id.to_string() ) }
            ( genre_tags(venue.genres.as_slice()) )
            p { ( venue.city ) ", " ( venue.state ) }
            p { ( venue.address ) }
            ( contact(&venue.phone, &venue.website, &venue.facebook_link) )
            @if venue.seeking_talent {
                div.seeking {
                    p.lead { "Currently seeking talent" }
                    @if let Some(description) = &venue.seeking_description {
                        p { ( description ) }
                    }
                }
            } @else {
                p.not-seeking { "Not currently seeking talent" }
            }
            @if let Some(image) = &venue.image_link {
                img src=( image ) alt="Venue Image";
            }
            ( record_actions(&venue_path(detail.id)) )
        }
        ( show_history(detail, artist_path) )
    }
}

pub fn artist_detail(detail: &ArtistDetail) -> Markup {
    let artist = &detail.item;
    html! {
        div.detail {
            h1 { ( artist.name ) }
            p.subtitle { "ID: " ( detail.id.to_string() ) }
            ( genre_tags(artist.genres.as_slice()) )
            p { ( artist.city ) ", " ( artist.state ) }
            ( contact(&artist.phone, &artist.website, &artist.facebook_link) )
            @if artist.seeking_venue {
                div.seeking {
                    p.lead { "Currently seeking performance venues" }
                    @if let Some(description) = &artist.seeking_description {
                        p { ( description ) }
                    }
                }
            } @else {
                p.not-seeking { "Not currently seeking performance venues" }
            }
            @if let Some(image) = &artist.image_link {
                img src=( image ) alt="Artist Image";
            }
            ( record_actions(&artist_path(detail.id)) )
        }
        ( show_history(detail, venue_path) )
    }
}

fn genre_tags(genres: &[String]) -> Markup {
    html! {
        ul.genres {
            @for genre in genres {
                li.genre { ( genre ) }
            }
        }
    }
}

fn contact(phone: &Option<String>, website: &Option<String>, facebook: &Option<String>) -> Markup {
    html! {
        dl.contact {
            dt { "Phone" }
            dd { ( phone.as_deref().unwrap_or("No Phone") ) }
            dt { "Website" }
            dd {
                @match website {
                    Some(url) => { a href=( url ) { ( url ) } }
                    None => { "No Website" }
                }
            }
            dt { "Facebook" }
            dd {
                @match facebook {
                    Some(url) => { a href=( url ) { ( url ) } }
                    None => { "No Facebook Link" }
                }
            }
        }
    }
}

fn record_actions(path: &str) -> Markup {
    html! {
        div.record-actions {
            a.button href={ ( path ) "/edit" } { "Edit" }
            form method="post" action=( path ) {
                input type="hidden" name="_method" value="delete";
                button.danger type="submit" { "Delete" }
            }
        }
    }
}

fn show_history<Item, Other>(
    detail: &Detail<Item, Other>,
    path: impl Fn(Id<Other>) -> String,
) -> Markup {
    html! {
        section.shows {
            h2 { ( detail.upcoming_shows_count ) " Upcoming Shows" }
            ( bookings(&detail.upcoming_shows, &path) )
        }
        section.shows {
            h2 { ( detail.past_shows_count ) " Past Shows" }
            ( bookings(&detail.past_shows, &path) )
        }
    }
}

fn bookings<Other>(bookings: &[Booking<Other>], path: &impl Fn(Id<Other>) -> String) -> Markup {
    html! {
        ul.bookings {
            @for booking in bookings {
                li.booking {
                    @if let Some(image) = &booking.image_link {
                        img src=( image ) alt="Show Image";
                    }
                    a href=( path(booking.id) ) { ( booking.name ) }
                    time { ( booking.start_time ) }
                }
            }
        }
    }
}

pub fn shows(shows: &[ShowListing]) -> Markup {
    html! {
        @if shows.is_empty() {
            p.empty { "No shows listed yet." }
        }
        ul.bookings {
            @for show in shows {
                li.booking {
                    @if let Some(image) = &show.artist_image_link {
                        img src=( image ) alt="Artist Image";
                    }
                    time { ( show.start_time ) }
                    a href=( artist_path(show.artist_id) ) { ( show.artist_name ) }
                    " playing at "
                    a href=( venue_path(show.venue_id) ) { ( show.venue_name ) }
                }
            }
        }
    }
}

fn error_banner(error: Option<&str>) -> Markup {
    html! {
        @if let Some(error) = error {
            p.form-error { ( error ) }
        }
    }
}

fn text_field(name: &str, label: &str, value: &str) -> Markup {
    html! {
        label {
            ( label )
            input type="text" name=( name ) value=( value );
        }
    }
}

fn state_select(selected: &str) -> Markup {
    html! {
        label {
            "State"
            select name="state" {
                @for state in STATES {
                    option value=( state ) selected[*state == selected] { ( state ) }
                }
            }
        }
    }
}

fn genre_select(selected: &[String]) -> Markup {
    html! {
        label {
            "Genres"
            select name="genres" multiple {
                @for genre in GENRES {
                    option value=( genre ) selected[selected.iter().any(|g| g.as_str() == *genre)] { ( genre ) }
                }
            }
        }
    }
}

fn checkbox(name: &str, label: &str, checked: bool) -> Markup {
    html! {
        label {
            input type="checkbox" name=( name ) value="true" checked[checked];
            ( label )
        }
    }
}

pub fn venue_form(heading: &str, action: &str, form: &VenueForm, error: Option<&str>) -> Markup {
    html! {
        form.record method="post" action=( action ) {
            h3 { ( heading ) }
            ( error_banner(error) )
            ( text_field("name", "Name", &form.name) )
            ( text_field("city", "City", &form.city) )
            ( state_select(&form.state) )
            ( text_field("address", "Address", &form.address) )
            ( text_field("phone", "Phone", &form.phone) )
            ( genre_select(&form.genres) )
            ( text_field("image_link", "Image Link", &form.image_link) )
            ( text_field("facebook_link", "Facebook Link", &form.facebook_link) )
            ( text_field("website", "Website", &form.website) )
            ( checkbox("seeking_talent", "Seeking Talent", form.seeking_talent) )
            ( text_field("seeking_description", "Seeking Description", &form.seeking_description) )
            button type="submit" { ( heading ) }
        }
    }
}

pub fn artist_form(heading: &str, action: &str, form: &ArtistForm, error: Option<&str>) -> Markup {
    html! {
        form.record method="post" action=( action ) {
            h3 { ( heading ) }
            ( error_banner(error) )
            ( text_field("name", "Name", &form.name) )
            ( text_field("city", "City", &form.city) )
            ( state_select(&form.state) )
            ( text_field("phone", "Phone", &form.phone) )
            ( genre_select(&form.genres) )
            ( text_field("image_link", "Image Link", &form.image_link) )
            ( text_field("facebook_link", "Facebook Link", &form.facebook_link) )
            ( text_field("website", "Website", &form.website) )
            ( checkbox("seeking_venue", "Seeking Venue", form.seeking_venue) )
            ( text_field("seeking_description", "Seeking Description", &form.seeking_description) )
            button type="submit" { ( heading ) }
        }
    }
}

pub fn show_form(
    form: &ShowForm,
    venues: &[Choice<Venue>],
    artists: &[Choice<Artist>],
    error: Option<&str>,
) -> Markup {
    html! {
        form.record method="post" action="/shows/create" {
            h3 { "List a new show" }
            ( error_banner(error) )
            label {
                "Venue"
                select name="venue_id" {
                    @for venue in venues {
                        @let id = venue.id.to_string();
                        option value=( id ) selected[id == form.venue_id] { ( venue.name ) }
                    }
                }
            }
            label {
                "Artist"
                select name="artist_id" {
                    @for artist in artists {
                        @let id = artist.id.to_string();
                        option value=( id ) selected[id == form.artist_id] { ( artist.name ) }
                    }
                }
            }
            label {
                "Start Time"
                input type="datetime-local" name="start_time" value=( form.start_time );
            }
            button type="submit" { "Create Show" }
        }
    }
}

pub fn not_found() -> Markup {
    html! {
        div.error-page {
            h1 { "404" }
            p { "Not Found" }
        }
    }
}

pub fn server_error() -> Markup {
    html! {
        div.error-page {
            h1 { "500" }
            p { "Internal Server Error" }
        }
    }
}

pub fn error(status: Status) -> Markup {
    html! {
        div.error-page {
            h1 { ( status.code ) }
            p { ( status.reason_lossy() ) }
        }
    }
}
