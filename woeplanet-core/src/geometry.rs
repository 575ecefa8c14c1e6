//! GeoJSON-shaped geometry attached to each place.

use geo::{Coord, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};

/// A `[longitude, latitude]` pair.
pub type Position = [f64; 2];

/// Place geometry, serialised with GeoJSON `type`/`coordinates` keys.
///
/// # Examples
///
/// ```
/// use woeplanet_core::Geometry;
///
/// let geometry: Geometry =
///     serde_json::from_str(r#"{"type":"Point","coordinates":[-0.12,51.5]}"#)
///         .expect("valid GeoJSON point");
/// assert_eq!(geometry, Geometry::Point([-0.12, 51.5]));
/// assert_eq!(Geometry::default(), Geometry::Point([0.0, 0.0]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// Single position.
    Point(Position),
    /// Unconnected positions.
    MultiPoint(Vec<Position>),
    /// Connected line.
    LineString(Vec<Position>),
    /// Several lines.
    MultiLineString(Vec<Vec<Position>>),
    /// Exterior ring followed by optional holes.
    Polygon(Vec<Vec<Position>>),
    /// Several polygons.
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Default for Geometry {
    fn default() -> Self {
        Self::Point([0.0, 0.0])
    }
}

impl Geometry {
    /// Convert into a `geo` geometry for spatial predicates.
    #[must_use]
    pub fn to_geo(&self) -> geo::Geometry<f64> {
        match self {
            Self::Point(position) => geo::Geometry::Point(point(*position)),
            Self::MultiPoint(positions) => geo::Geometry::MultiPoint(MultiPoint::new(
                positions.iter().copied().map(point).collect(),
            )),
            Self::LineString(positions) => geo::Geometry::LineString(line(positions)),
            Self::MultiLineString(lines) => geo::Geometry::MultiLineString(MultiLineString::new(
                lines.iter().map(|positions| line(positions)).collect(),
            )),
            Self::Polygon(rings) => geo::Geometry::Polygon(polygon(rings)),
            Self::MultiPolygon(polygons) => geo::Geometry::MultiPolygon(MultiPolygon::new(
                polygons.iter().map(|rings| polygon(rings)).collect(),
            )),
        }
    }
}

fn point([x, y]: Position) -> Point<f64> {
    Point(Coord { x, y })
}

fn line(positions: &[Position]) -> LineString<f64> {
    LineString::new(positions.iter().map(|&[x, y]| Coord { x, y }).collect())
}

fn polygon(rings: &[Vec<Position>]) -> Polygon<f64> {
    let mut rings = rings.iter().map(|ring| line(ring));
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, rings.collect())
}
