//! Askama page models for the booking site.
//!
//! Templates live in `templates/`; every value reaching a template is a plain
//! string or number so the markup stays free of Rust plumbing.

use askama::Template;

use crate::forms::{ArtistForm, VenueForm, GENRES, STATES};
use crate::models::show::ShowTimeline;
use crate::models::{Artist, ShowListing, Venue, VenueArea};

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomePage {
    pub flash: String,
}

impl HomePage {
    pub fn with_flash(flash: impl Into<String>) -> Self {
        Self { flash: flash.into() }
    }
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct VenuesPage {
    pub areas: Vec<VenueArea>,
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
}

#[derive(Template)]
#[template(path = "pages/search.html")]
pub struct SearchPage {
    pub heading: &'static str,
    pub base_path: &'static str,
    pub search_term: String,
    pub count: usize,
    pub results: Vec<SearchHit>,
}

impl SearchPage {
    pub fn venues(search_term: String, venues: Vec<Venue>) -> Self {
        Self {
            heading: "venues",
            base_path: "/venues",
            search_term,
            count: venues.len(),
            results: venues
                .into_iter()
                .map(|v| SearchHit { id: v.id, name: v.name })
                .collect(),
        }
    }

    pub fn artists(search_term: String, artists: Vec<Artist>) -> Self {
        Self {
            heading: "artists",
            base_path: "/artists",
            search_term,
            count: artists.len(),
            results: artists
                .into_iter()
                .map(|a| SearchHit { id: a.id, name: a.name })
                .collect(),
        }
    }
}

/// One side of a show as listed on a venue or artist page.
#[derive(Debug, Clone)]
pub struct ShowCard {
    pub id: i64,
    pub name: String,
    pub image_link: String,
    pub link: String,
    pub start_time: String,
}

impl ShowCard {
    fn artist_side(show: &ShowListing) -> Self {
        Self {
            id: show.artist_id,
            name: show.artist_name.clone(),
            image_link: show.artist_image_link.clone().unwrap_or_default(),
            link: format!("/artists/{}", show.artist_id),
            start_time: show.formatted_start_time(),
        }
    }

    fn venue_side(show: &ShowListing) -> Self {
        Self {
            id: show.venue_id,
            name: show.venue_name.clone(),
            image_link: show.venue_image_link.clone().unwrap_or_default(),
            link: format!("/venues/{}", show.venue_id),
            start_time: show.formatted_start_time(),
        }
    }
}

/// Fields shared by the venue and artist detail pages.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: String,
    pub facebook_link: String,
    pub image_link: String,
    pub seeking: bool,
    pub seeking_description: String,
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct VenueDetailPage {
    pub venue: Profile,
    pub past_shows: Vec<ShowCard>,
    pub upcoming_shows: Vec<ShowCard>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl VenueDetailPage {
    pub fn new(venue: Venue, timeline: ShowTimeline) -> Self {
        let past_shows: Vec<ShowCard> = timeline.past.iter().map(ShowCard::artist_side).collect();
        let upcoming_shows: Vec<ShowCard> = timeline.upcoming.iter().map(ShowCard::artist_side).collect();
        Self {
            venue: Profile {
                id: venue.id,
                name: venue.name,
                genres: venue.genres,
                address: venue.address.unwrap_or_default(),
                city: venue.city.unwrap_or_default(),
                state: venue.state.unwrap_or_default(),
                phone: venue.phone.unwrap_or_default(),
                website: venue.website.unwrap_or_default(),
                facebook_link: venue.facebook_link.unwrap_or_default(),
                image_link: venue.image_link.unwrap_or_default(),
                seeking: venue.seeking_talent,
                seeking_description: venue.seeking_description.unwrap_or_default(),
            },
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ArtistDetailPage {
    pub artist: Profile,
    pub past_shows: Vec<ShowCard>,
    pub upcoming_shows: Vec<ShowCard>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl ArtistDetailPage {
    pub fn new(artist: Artist, timeline: ShowTimeline) -> Self {
        let past_shows: Vec<ShowCard> = timeline.past.iter().map(ShowCard::venue_side).collect();
        let upcoming_shows: Vec<ShowCard> = timeline.upcoming.iter().map(ShowCard::venue_side).collect();
        Self {
            artist: Profile {
                id: artist.id,
                name: artist.name,
                genres: artist.genres,
                address: String::new(),
                city: artist.city.unwrap_or_default(),
                state: artist.state.unwrap_or_default(),
                phone: artist.phone.unwrap_or_default(),
                website: artist.website.unwrap_or_default(),
                facebook_link: artist.facebook_link.unwrap_or_default(),
                image_link: artist.image_link.unwrap_or_default(),
                seeking: artist.seeking_venue,
                seeking_description: artist.seeking_description.unwrap_or_default(),
            },
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct ArtistsPage {
    pub artists: Vec<SearchHit>,
}

impl ArtistsPage {
    pub fn new(artists: Vec<Artist>) -> Self {
        Self {
            artists: artists
                .into_iter()
                .map(|a| SearchHit { id: a.id, name: a.name })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShowRow {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct ShowsPage {
    pub shows: Vec<ShowRow>,
}

impl ShowsPage {
    pub fn new(shows: Vec<ShowListing>) -> Self {
        Self {
            shows: shows
                .into_iter()
                .map(|s| ShowRow {
                    start_time: s.formatted_start_time(),
                    venue_id: s.venue_id,
                    venue_name: s.venue_name,
                    artist_id: s.artist_id,
                    artist_name: s.artist_name,
                    artist_image_link: s.artist_image_link.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

/// An `<option>` in a select box.
#[derive(Debug, Clone)]
pub struct Choice {
    pub value: &'static str,
    pub selected: bool,
}

fn choices(options: &'static [&'static str], selected: &[String]) -> Vec<Choice> {
    options
        .iter()
        .map(|&value| Choice {
            value,
            selected: selected.iter().any(|s| s == value),
        })
        .collect()
}

/// Prefilled values for the venue and artist forms.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub name: String,
    pub city: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking: bool,
    pub seeking_description: String,
}

#[derive(Template)]
#[template(path = "forms/profile.html")]
pub struct ProfileFormPage {
    pub title: String,
    pub action: String,
    pub kind: &'static str,
    pub seeking_label: &'static str,
    pub seeking_field: &'static str,
    pub fields: ProfileFields,
    pub states: Vec<Choice>,
    pub genres: Vec<Choice>,
}

impl ProfileFormPage {
    pub fn venue(title: impl Into<String>, action: impl Into<String>, form: &VenueForm) -> Self {
        let state: Vec<String> = form.state.iter().cloned().collect();
        Self {
            title: title.into(),
            action: action.into(),
            kind: "venue",
            seeking_label: "Looking for talent",
            seeking_field: "seeking_talent",
            fields: ProfileFields {
                name: form.name.clone(),
                city: form.city.clone().unwrap_or_default(),
                address: form.address.clone().unwrap_or_default(),
                phone: form.phone.clone().unwrap_or_default(),
                image_link: form.image_link.clone().unwrap_or_default(),
                facebook_link: form.facebook_link.clone().unwrap_or_default(),
                website: form.website.clone().unwrap_or_default(),
                seeking: form.seeking_talent,
                seeking_description: form.seeking_description.clone().unwrap_or_default(),
            },
            states: choices(STATES, &state),
            genres: choices(GENRES, &form.genres),
        }
    }

    pub fn artist(title: impl Into<String>, action: impl Into<String>, form: &ArtistForm) -> Self {
        let state: Vec<String> = form.state.iter().cloned().collect();
        Self {
            title: title.into(),
            action: action.into(),
            kind: "artist",
            seeking_label: "Looking for venues",
            seeking_field: "seeking_venue",
            fields: ProfileFields {
                name: form.name.clone(),
                city: form.city.clone().unwrap_or_default(),
                address: String::new(),
                phone: form.phone.clone().unwrap_or_default(),
                image_link: form.image_link.clone().unwrap_or_default(),
                facebook_link: form.facebook_link.clone().unwrap_or_default(),
                website: form.website.clone().unwrap_or_default(),
                seeking: form.seeking_venue,
                seeking_description: form.seeking_description.clone().unwrap_or_default(),
            },
            states: choices(STATES, &state),
            genres: choices(GENRES, &form.genres),
        }
    }
}

#[derive(Template, Default)]
#[template(path = "forms/new_show.html")]
pub struct ShowFormPage {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

#[derive(Template)]
#[template(path = "errors/error.html")]
pub struct ErrorPage {
    pub code: u16,
    pub message: &'static str,
}

fn render_error(code: u16, message: &'static str) -> String {
    ErrorPage { code, message }.render().unwrap_or_else(|e| {
        tracing::error!("error page failed to render: {}", e);
        format!("{} {}", code, message)
    })
}

pub fn render_not_found() -> String {
    render_error(404, "Not Found")
}

pub fn render_method_not_allowed() -> String {
    render_error(405, "Method Not Allowed")
}

pub fn render_server_error() -> String {
    render_error(500, "Internal Server Error")
}
