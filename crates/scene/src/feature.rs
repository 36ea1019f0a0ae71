use std::collections::BTreeMap;

use foundation::{Aabb2, LngLat};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::kind::GeometryKind;

/// A single attribute value as reported by the vector tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
    Null,
    /// Booleans, arrays and objects, kept as received.
    Other(serde_json::Value),
}

impl AttrValue {
    /// `true` for `Null` and for blank text.
    pub fn is_empty(&self) -> bool {
        match self {
            AttrValue::Null => true,
            AttrValue::Text(s) => s.trim().is_empty(),
            AttrValue::Number(_) => false,
            AttrValue::Other(v) => match v {
                serde_json::Value::Array(items) => items.is_empty(),
                serde_json::Value::Object(map) => map.is_empty(),
                _ => false,
            },
        }
    }
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            AttrValue::Number(n) => write!(f, "{n}"),
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Null => Ok(()),
            AttrValue::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

/// Property mapping of one feature.
///
/// The report-catalogue fields are typed; every other key lands in `extra`
/// and is written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeRow {
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_name: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_from: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_to: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_sheet: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_number: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_number: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_kind: Option<AttrValue>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, AttrValue>,
}

// Tile ids arrive as strings or numbers; both are kept as their string form.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<AttrValue>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(AttrValue::Null) => None,
        Some(v) => Some(v.to_string()),
    })
}

impl AttributeRow {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Archive number used to key the report-card lookup.
    pub fn archive_key(&self) -> Option<String> {
        self.archive_number
            .as_ref()
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
    }

    /// Looks up a field by its serialized name, typed or extra.
    pub fn field(&self, name: &str) -> Option<&AttrValue> {
        match name {
            "author" => self.author.as_ref(),
            "report_name" => self.report_name.as_ref(),
            "organization" => self.organization.as_ref(),
            "year_from" => self.year_from.as_ref(),
            "year_to" => self.year_to.as_ref(),
            "method" => self.method.as_ref(),
            "map_sheet" => self.map_sheet.as_ref(),
            "scale" => self.scale.as_ref(),
            "archive_number" => self.archive_number.as_ref(),
            "inventory_number" => self.inventory_number.as_ref(),
            "document_kind" => self.document_kind.as_ref(),
            other => self.extra.get(other),
        }
    }
}

/// GeoJSON-shaped geometry over `[lng, lat]` positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(LngLat),
    MultiPoint(Vec<LngLat>),
    LineString(Vec<LngLat>),
    MultiLineString(Vec<Vec<LngLat>>),
    Polygon(Vec<Vec<LngLat>>),
    MultiPolygon(Vec<Vec<Vec<LngLat>>>),
}

impl Geometry {
    pub fn is_point(&self) -> bool {
        matches!(self, Geometry::Point(_))
    }

    /// Every vertex of the geometry, ring and part order preserved.
    pub fn positions(&self) -> Vec<LngLat> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => ps.clone(),
            Geometry::MultiLineString(parts) | Geometry::Polygon(parts) => {
                parts.iter().flatten().copied().collect()
            }
            Geometry::MultiPolygon(polys) => polys.iter().flatten().flatten().copied().collect(),
        }
    }

    pub fn bbox(&self) -> Option<Aabb2> {
        Aabb2::from_points(self.positions())
    }
}

/// Read-only snapshot of a map-reported feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub source_layer: String,
    #[serde(default)]
    pub properties: AttributeRow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn new(source_layer: impl Into<String>, properties: AttributeRow) -> Self {
        Self {
            source_layer: source_layer.into(),
            properties,
            geometry: None,
        }
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.properties.id()
    }

    pub fn kind(&self) -> Option<GeometryKind> {
        GeometryKind::from_source_layer(&self.source_layer)
    }

    /// Bounding box of the feature geometry.
    ///
    /// Missing, empty or non-finite geometry yields `[0, 0, 0, 0]` instead of
    /// an error.
    pub fn bbox(&self) -> Aabb2 {
        match self.geometry.as_ref().and_then(Geometry::bbox) {
            Some(b) => b,
            None => {
                warn!(
                    source_layer = %self.source_layer,
                    id = ?self.id(),
                    "degenerate geometry, using zero bounding box"
                );
                Aabb2::zero()
            }
        }
    }
}
