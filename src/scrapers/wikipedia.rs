//! Wikipedia station-directory scraper.
//!
//! This module scrapes the list of urban-format radio stations in the
//! United States from Wikipedia. The page is organized as `h2` state
//! headings, `h3` city headings, and `ul` lists of stations, where each
//! list item reads `"STATION – Format description"`.
//!
//! # Section Structure
//!
//! Only headings carrying a `span.mw-headline` are treated as sections;
//! navigational `h2` elements (references, external links) without a
//! headline span reset nothing and produce no rows.

use crate::models::StationRow;
use reqwest::get;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument};

/// Default directory page listing urban-format radio stations by state and city.
pub const DIRECTORY_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_urban-format_radio_stations_in_the_United_States";

/// Placeholder format description for list items without an en-dash separator.
const UNKNOWN_FORMAT: &str = "Unknown Format";

/// Fetch the station directory page and parse it into station rows.
///
/// # Arguments
///
/// * `url` - The directory page URL
///
/// # Returns
///
/// A vector of [`StationRow`] entries, or an error if the page fetch fails
/// or returns a non-success status.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_directory(url: &str) -> Result<Vec<StationRow>, Box<dyn Error>> {
    let html = get(url).await?.error_for_status()?.text().await?;
    let stations = parse_stations(&html);

    info!(
        count = stations.len(),
        source = url,
        "Indexed radio stations from directory"
    );
    Ok(stations)
}

/// Parse station rows out of a directory page.
///
/// Walks `h2`, `h3`, and `ul` elements in document order, tracking the
/// current state (`h2`) and city (`h3`). Station lists encountered before
/// both a state and a city are skipped.
pub fn parse_stations(html: &str) -> Vec<StationRow> {
    let document = Html::parse_document(html);
    let section_selector = Selector::parse("h2, h3, ul").unwrap();
    let headline_selector = Selector::parse("span.mw-headline").unwrap();
    let item_selector = Selector::parse("li").unwrap();

    let mut stations = Vec::new();
    let mut state: Option<String> = None;
    let mut city: Option<String> = None;

    for element in document.select(&section_selector) {
        match element.value().name() {
            "h2" => {
                state = headline_text(element, &headline_selector);
                city = None;
            }
            "h3" => {
                if state.is_some() {
                    city = headline_text(element, &headline_selector);
                }
            }
            "ul" => {
                let (Some(state), Some(city)) = (state.as_deref(), city.as_deref()) else {
                    continue;
                };
                for item in element.select(&item_selector) {
                    let text = item.text().collect::<String>();
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    let (station, format) = match text.split_once(" – ") {
                        Some((station, format)) => (station.trim(), format.trim()),
                        None => (text, UNKNOWN_FORMAT),
                    };
                    debug!(%state, %city, %station, "Parsed station entry");
                    stations.push(StationRow {
                        state: state.to_string(),
                        city: city.to_string(),
                        station: station.to_string(),
                        format: format.to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    stations
}

/// Text of the `mw-headline` span inside a section heading, if present.
fn headline_text(element: ElementRef<'_>, headline_selector: &Selector) -> Option<String> {
    element
        .select(headline_selector)
        .next()
        .map(|span| span.text().collect::<String>().trim().to_string())
}
