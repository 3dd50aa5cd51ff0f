//! NFO file generator (Kodi compatible).

use crate::models::media::{MovieMatch, SeasonMetadata, TvShowMatch};

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const FANART_BASE_URL: &str = "https://image.tmdb.org/t/p/original";
/// Outline length in characters before truncation.
const OUTLINE_CHARS: usize = 200;

/// Generate movie NFO content (`media_info.nfo`).
pub fn generate_movie_nfo(movie: &MovieMatch) -> String {
    let mut nfo = String::new();

    nfo.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
    nfo.push_str("<movie>\n");

    // Title
    nfo.push_str(&format!("  <title>{}</title>\n", escape_xml(&movie.title)));
    nfo.push_str(&format!(
        "  <originaltitle>{}</originaltitle>\n",
        escape_xml(&movie.original_title)
    ));
    nfo.push_str(&format!(
        "  <year>{}</year>\n",
        movie.year.map(|y| y.to_string()).unwrap_or_default()
    ));

    push_plot(&mut nfo, &movie.overview);

    // IDs
    if let Some(ref imdb_id) = movie.imdb_id {
        nfo.push_str(&format!("  <id>{}</id>\n", escape_xml(imdb_id)));
        nfo.push_str(&format!("  <imdb>{}</imdb>\n", escape_xml(imdb_id)));
    }
    if !movie.tmdb_ref.is_empty() {
        nfo.push_str(&format!("  <tmdbid>{}</tmdbid>\n", escape_xml(&movie.tmdb_ref)));
    }

    if let Some(runtime) = movie.runtime {
        nfo.push_str(&format!("  <runtime>{}</runtime>\n", runtime));
    }
    push_rating(&mut nfo, movie.rating, movie.votes);

    if let Some(ref release_date) = movie.release_date {
        nfo.push_str(&format!("  <premiered>{}</premiered>\n", escape_xml(release_date)));
        nfo.push_str(&format!(
            "  <releasedate>{}</releasedate>\n",
            escape_xml(release_date)
        ));
    }

    for genre in &movie.genres {
        nfo.push_str(&format!("  <genre>{}</genre>\n", escape_xml(genre)));
    }
    for studio in &movie.studios {
        nfo.push_str(&format!("  <studio>{}</studio>\n", escape_xml(studio)));
    }
    if !movie.production_countries.is_empty() {
        let countries: Vec<&str> = movie
            .production_countries
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        nfo.push_str(&format!(
            "  <country>{}</country>\n",
            escape_xml(&countries.join(", "))
        ));
    }

    for director in &movie.directors {
        nfo.push_str(&format!("  <director>{}</director>\n", escape_xml(director)));
    }
    push_actors(&mut nfo, &movie.cast);

    // Poster
    if let Some(ref poster) = movie.poster_path {
        nfo.push_str(&format!(
            "  <thumb>{}{}</thumb>\n",
            POSTER_BASE_URL,
            escape_xml(poster)
        ));
        nfo.push_str("  <fanart>\n");
        nfo.push_str(&format!(
            "    <thumb>{}{}</thumb>\n",
            FANART_BASE_URL,
            escape_xml(poster)
        ));
        nfo.push_str("  </fanart>\n");
    }

    nfo.push_str("</movie>\n");
    nfo
}

/// Generate season NFO content (`season.nfo`).
///
/// Season fields win; the show's overview and first air date fill gaps.
pub fn generate_season_nfo(show: &TvShowMatch, season: &SeasonMetadata) -> String {
    let mut nfo = String::new();

    nfo.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
    nfo.push_str("<season>\n");

    let title = if season.name.trim().is_empty() {
        format!("Season {}", season.season_number)
    } else {
        season.name.clone()
    };
    nfo.push_str(&format!("  <title>{}</title>\n", escape_xml(&title)));
    nfo.push_str(&format!("  <showtitle>{}</showtitle>\n", escape_xml(&show.name)));
    nfo.push_str(&format!(
        "  <originaltitle>{}</originaltitle>\n",
        escape_xml(&show.original_name)
    ));
    nfo.push_str(&format!("  <season>{}</season>\n", season.season_number));

    if season.overview.trim().is_empty() {
        push_plot(&mut nfo, &show.overview);
    } else {
        push_plot(&mut nfo, &season.overview);
    }

    let (air_date, year) = if season.air_date.is_empty() {
        (show.first_air_date.as_str(), show.first_air_year())
    } else {
        (season.air_date.as_str(), season.air_year())
    };
    if !air_date.is_empty() {
        nfo.push_str(&format!("  <premiered>{}</premiered>\n", escape_xml(air_date)));
    }
    if let Some(year) = year {
        nfo.push_str(&format!("  <year>{}</year>\n", year));
    }

    nfo.push_str(&format!(
        "  <episodecount>{}</episodecount>\n",
        season.episode_count
    ));

    // Show IDs
    if let Some(ref imdb_id) = show.imdb_id {
        nfo.push_str(&format!("  <id>{}</id>\n", escape_xml(imdb_id)));
        nfo.push_str(&format!("  <imdb>{}</imdb>\n", escape_xml(imdb_id)));
    }
    if !show.tmdb_ref.is_empty() {
        nfo.push_str(&format!("  <tmdbid>{}</tmdbid>\n", escape_xml(&show.tmdb_ref)));
    }

    push_rating(&mut nfo, show.rating, show.votes);
    for genre in &show.genres {
        nfo.push_str(&format!("  <genre>{}</genre>\n", escape_xml(genre)));
    }
    for network in &show.networks {
        nfo.push_str(&format!("  <studio>{}</studio>\n", escape_xml(network)));
    }
    if !show.origin_countries.is_empty() {
        nfo.push_str(&format!(
            "  <country>{}</country>\n",
            escape_xml(&show.origin_countries.join(", "))
        ));
    }
    if let Some(ref status) = show.status {
        nfo.push_str(&format!("  <status>{}</status>\n", escape_xml(status)));
    }
    for creator in &show.creators {
        nfo.push_str(&format!("  <credits>{}</credits>\n", escape_xml(creator)));
    }
    push_actors(&mut nfo, &show.cast);

    let poster = season.poster_path.as_ref().or(show.poster_path.as_ref());
    if let Some(poster) = poster {
        nfo.push_str(&format!(
            "  <thumb aspect=\"poster\">{}{}</thumb>\n",
            POSTER_BASE_URL,
            escape_xml(poster)
        ));
    }

    nfo.push_str("</season>\n");
    nfo
}

fn push_plot(nfo: &mut String, overview: &str) {
    if overview.trim().is_empty() {
        return;
    }
    nfo.push_str(&format!("  <plot>{}</plot>\n", escape_xml(overview)));

    let outline = if overview.chars().count() > OUTLINE_CHARS {
        let cut: String = overview.chars().take(OUTLINE_CHARS).collect();
        format!("{}...", cut)
    } else {
        overview.to_string()
    };
    nfo.push_str(&format!("  <outline>{}</outline>\n", escape_xml(&outline)));
}

fn push_rating(nfo: &mut String, rating: Option<f32>, votes: Option<u32>) {
    if let Some(rating) = rating.filter(|r| *r > 0.0) {
        nfo.push_str(&format!("  <rating>{:.1}</rating>\n", rating));
        nfo.push_str(&format!("  <votes>{}</votes>\n", votes.unwrap_or(0)));
    }
}

fn push_actors(nfo: &mut String, cast: &[String]) {
    for (i, actor) in cast.iter().enumerate() {
        nfo.push_str("  <actor>\n");
        nfo.push_str(&format!("    <name>{}</name>\n", escape_xml(actor)));
        nfo.push_str(&format!("    <order>{}</order>\n", i));
        nfo.push_str("  </actor>\n");
    }
}

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
