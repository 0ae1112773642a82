//! Map-pane views of ranked listings.
//!
//! Whether a rich map can be drawn is decided once at startup ([`RenderSurface`]); both
//! views implement [`ListingMapView`] so callers never branch on the surface themselves.

use serde::Serialize;

use crate::listings::{
    LinkTarget, PropertyId, RankedListings, ScoredProperty, DEFAULT_LAT, DEFAULT_LNG,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderSurface {
    Rich,
    Fallback,
}

impl RenderSurface {
    pub fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "fallback" | "list" | "none" | "off" => Self::Fallback,
            _ => Self::Rich,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub id: PropertyId,
    pub position: Coordinate,
    pub title: String,
    pub price: String,
    pub match_score: u8,
    pub top_match: bool,
    pub highlighted: bool,
    pub link: LinkTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapListEntry {
    pub id: PropertyId,
    pub title: String,
    pub price: String,
    pub address: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapView {
    Markers {
        center: Coordinate,
        markers: Vec<MapMarker>,
    },
    List {
        heading: String,
        entries: Vec<MapListEntry>,
    },
}

pub trait ListingMapView: Send + Sync {
    fn surface(&self) -> RenderSurface;
    fn render(&self, listings: &RankedListings, highlighted: Option<&PropertyId>) -> MapView;
}

/// Pin per listing, centered on the mean position.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkerMapView;

impl ListingMapView for MarkerMapView {
    fn surface(&self) -> RenderSurface {
        RenderSurface::Rich
    }

    fn render(&self, listings: &RankedListings, highlighted: Option<&PropertyId>) -> MapView {
        let markers: Vec<MapMarker> = listings
            .iter()
            .map(|listing| marker(listing, highlighted))
            .collect();
        MapView::Markers {
            center: center_of(&markers),
            markers,
        }
    }
}

/// Plain list for surfaces without a map.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackListView;

impl ListingMapView for FallbackListView {
    fn surface(&self) -> RenderSurface {
        RenderSurface::Fallback
    }

    fn render(&self, listings: &RankedListings, highlighted: Option<&PropertyId>) -> MapView {
        let entries = listings
            .iter()
            .map(|listing| MapListEntry {
                id: listing.property.id.clone(),
                title: listing.property.title.clone(),
                price: listing.property.price.clone(),
                address: listing.property.location.address.display_line(),
                highlighted: highlighted == Some(&listing.property.id),
            })
            .collect();
        MapView::List {
            heading: format!("Showing {} properties in this area", listings.len()),
            entries,
        }
    }
}

pub fn map_view_for(surface: RenderSurface) -> Box<dyn ListingMapView> {
    match surface {
        RenderSurface::Rich => Box::new(MarkerMapView),
        RenderSurface::Fallback => Box::new(FallbackListView),
    }
}

fn marker(listing: &ScoredProperty, highlighted: Option<&PropertyId>) -> MapMarker {
    let property = &listing.property;
    MapMarker {
        id: property.id.clone(),
        position: Coordinate {
            lat: property.location.lat,
            lng: property.location.lng,
        },
        title: property.title.clone(),
        price: property.price.clone(),
        match_score: listing.match_score,
        top_match: listing.is_top_match(),
        highlighted: highlighted == Some(&property.id),
        link: property.link_target(),
    }
}

fn center_of(markers: &[MapMarker]) -> Coordinate {
    if markers.is_empty() {
        return Coordinate {
            lat: DEFAULT_LAT,
            lng: DEFAULT_LNG,
        };
    }
    let count = markers.len() as f64;
    let (lat, lng) = markers.iter().fold((0.0, 0.0), |(lat, lng), marker| {
        (lat + marker.position.lat, lng + marker.position.lng)
    });
    Coordinate {
        lat: lat / count,
        lng: lng / count,
    }
}
