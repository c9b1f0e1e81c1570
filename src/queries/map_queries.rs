//! GeoJSON export and screen-space clustering for the map view.
//!
//! Clustering projects points into Web Mercator pixel space at the requested
//! zoom and groups them greedily: each unassigned point, in input order,
//! claims every other unassigned point within `radius` pixels.

use std::f64::consts::PI;

use rusqlite::Connection;
use serde::Serialize;

use crate::db::person_repo;
use crate::error::PrmResult;
use crate::model::{GeoPoint, Id, Person, User};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterOptions {
    /// Cluster radius in pixels.
    pub radius: f64,
    /// Above this zoom nothing is clustered.
    pub max_zoom: u8,
    /// Tile size in pixels.
    pub extent: f64,
    pub min_points: usize,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            radius: 50.0,
            max_zoom: 14,
            extent: 512.0,
            min_points: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: PointGeometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureProperties {
    pub id: Id<Person>,
    pub name: String,
}

/// A person who can be placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub id: Id<Person>,
    pub name: String,
    pub coordinates: GeoPoint,
}

impl MapPoint {
    pub fn from_person(person: &Person) -> Option<Self> {
        person.coordinates.map(|coordinates| Self {
            id: person.id,
            name: person.name.clone(),
            coordinates,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterTier {
    Small,
    Medium,
    Large,
}

impl ClusterTier {
    pub fn for_count(count: usize) -> Self {
        if count < 5 {
            ClusterTier::Small
        } else if count < 20 {
            ClusterTier::Medium
        } else {
            ClusterTier::Large
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ClusterTier::Small => "#ef4444",
            ClusterTier::Medium => "#f59e0b",
            ClusterTier::Large => "#10b981",
        }
    }

    /// Marker radius in pixels.
    pub fn radius(&self) -> u32 {
        match self {
            ClusterTier::Small => 20,
            ClusterTier::Medium => 30,
            ClusterTier::Large => 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub coordinates: GeoPoint,
    pub point_count: usize,
    pub point_count_abbreviated: String,
    pub tier: ClusterTier,
    /// Zoom at which clicking the cluster should land so that it splits.
    pub expansion_zoom: u8,
    pub members: Vec<Id<Person>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MapItem {
    Point(MapPoint),
    Cluster(Cluster),
}

pub fn feature_collection(people: &[Person]) -> FeatureCollection {
    let features = people
        .iter()
        .filter_map(MapPoint::from_person)
        .map(|point| Feature {
            kind: "Feature",
            geometry: PointGeometry {
                kind: "Point",
                coordinates: point.coordinates.lng_lat(),
            },
            properties: FeatureProperties {
                id: point.id,
                name: point.name,
            },
        })
        .collect();

    FeatureCollection {
        kind: "FeatureCollection",
        features,
    }
}

pub fn map_points(people: &[Person]) -> Vec<MapPoint> {
    people.iter().filter_map(MapPoint::from_person).collect()
}

/// `1234` -> `1.2k`, `15321` -> `15k`.
pub fn abbreviate_count(count: usize) -> String {
    if count >= 10_000 {
        format!("{}k", (count as f64 / 1000.0).round())
    } else if count >= 1_000 {
        format!("{}k", (count as f64 / 100.0).round() / 10.0)
    } else {
        count.to_string()
    }
}

pub fn cluster(points: &[MapPoint], zoom: u8, options: &ClusterOptions) -> Vec<MapItem> {
    if zoom > options.max_zoom {
        return points.iter().cloned().map(MapItem::Point).collect();
    }

    let scale = scale_at(zoom, options);
    group(points, zoom, options)
        .into_iter()
        .map(|members| {
            if members.len() == 1 {
                return MapItem::Point(points[members[0]].clone());
            }
            let (sum_x, sum_y) = members.iter().fold((0.0, 0.0), |(sx, sy), &j| {
                let (x, y) = project(points[j].coordinates, scale);
                (sx + x, sy + y)
            });
            let n = members.len() as f64;
            let member_points: Vec<MapPoint> = members.iter().map(|&j| points[j].clone()).collect();
            MapItem::Cluster(Cluster {
                coordinates: unproject(sum_x / n, sum_y / n, scale),
                point_count: members.len(),
                point_count_abbreviated: abbreviate_count(members.len()),
                tier: ClusterTier::for_count(members.len()),
                expansion_zoom: split_zoom(&member_points, zoom, options),
                members: member_points.iter().map(|p| p.id).collect(),
            })
        })
        .collect()
}

/// The lowest zoom above `zoom` at which the cluster's members stop forming
/// one cluster. Never exceeds `max_zoom + 1`.
pub fn expansion_zoom(
    cluster_item: &Cluster,
    points: &[MapPoint],
    zoom: u8,
    options: &ClusterOptions,
) -> u8 {
    let members: Vec<MapPoint> = points
        .iter()
        .filter(|p| cluster_item.members.contains(&p.id))
        .cloned()
        .collect();
    split_zoom(&members, zoom, options)
}

fn split_zoom(members: &[MapPoint], zoom: u8, options: &ClusterOptions) -> u8 {
    let mut next = zoom.saturating_add(1);
    while next <= options.max_zoom {
        let groups = group(members, next, options);
        if !(groups.len() == 1 && groups[0].len() == members.len()) {
            return next;
        }
        next += 1;
    }
    options.max_zoom.saturating_add(1)
}

fn scale_at(zoom: u8, options: &ClusterOptions) -> f64 {
    options.extent * f64::from(1u32 << zoom.min(31))
}

/// Greedy grouping by index: each unassigned point, in input order, claims
/// every later unassigned point within `radius` pixels. Groups smaller than
/// `min_points` are split back into single points.
fn group(points: &[MapPoint], zoom: u8, options: &ClusterOptions) -> Vec<Vec<usize>> {
    let scale = scale_at(zoom, options);
    let projected: Vec<(f64, f64)> = points
        .iter()
        .map(|p| project(p.coordinates, scale))
        .collect();

    let mut assigned = vec![false; points.len()];
    let mut groups = Vec::new();

    for i in 0..points.len() {
        if assigned[i] {
            continue;
        }
        let (cx, cy) = projected[i];
        let members: Vec<usize> = (i..points.len())
            .filter(|&j| !assigned[j])
            .filter(|&j| {
                let (x, y) = projected[j];
                (x - cx).hypot(y - cy) <= options.radius
            })
            .collect();

        if members.len() < options.min_points.max(2) {
            assigned[i] = true;
            groups.push(vec![i]);
            continue;
        }
        for &j in &members {
            assigned[j] = true;
        }
        groups.push(members);
    }

    groups
}

pub fn people_map(conn: &Connection, owner_id: Id<User>) -> PrmResult<FeatureCollection> {
    let people = person_repo::find_by_owner(conn, owner_id)?;
    Ok(feature_collection(&people))
}

pub fn clustered_map(
    conn: &Connection,
    owner_id: Id<User>,
    zoom: u8,
    options: &ClusterOptions,
) -> PrmResult<Vec<MapItem>> {
    let people = person_repo::find_by_owner(conn, owner_id)?;
    Ok(cluster(&map_points(&people), zoom, options))
}

fn project(point: GeoPoint, scale: f64) -> (f64, f64) {
    let x = point.lng / 360.0 + 0.5;
    let sin = (point.lat * PI / 180.0).sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    (x * scale, y.clamp(0.0, 1.0) * scale)
}

fn unproject(x: f64, y: f64, scale: f64) -> GeoPoint {
    let lng = (x / scale - 0.5) * 360.0;
    let y2 = (180.0 - (y / scale) * 360.0) * PI / 180.0;
    let lat = 360.0 * y2.exp().atan() / PI - 90.0;
    GeoPoint::new(lat, lng)
}
