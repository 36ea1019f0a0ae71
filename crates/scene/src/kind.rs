use serde::{Deserialize, Serialize};

/// Coarse geometry category that attribute rows are bucketed into.
///
/// Each kind owns exactly one overlay layer: points → `stp`, lines → `stl`,
/// polygons → `sta`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Points,
    Lines,
    Polygons,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 3] = [
        GeometryKind::Points,
        GeometryKind::Lines,
        GeometryKind::Polygons,
    ];

    pub const fn layer_id(self) -> &'static str {
        match self {
            GeometryKind::Points => "stp",
            GeometryKind::Lines => "stl",
            GeometryKind::Polygons => "sta",
        }
    }

    /// Kind for a map-reported source layer name, matched on its suffix.
    ///
    /// Source layers are named like `reports_stp`; anything that doesn't end
    /// in one of the three kind suffixes has no kind.
    pub fn from_source_layer(source_layer: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| source_layer.ends_with(k.layer_id()))
    }

    pub fn from_layer_id(layer_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.layer_id() == layer_id)
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryKind::Points => write!(f, "points"),
            GeometryKind::Lines => write!(f, "lines"),
            GeometryKind::Polygons => write!(f, "polygons"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GeometryKind;

    #[test]
    fn suffix_mapping() {
        assert_eq!(GeometryKind::from_source_layer("stp"), Some(GeometryKind::Points));
        assert_eq!(
            GeometryKind::from_source_layer("reports_stl"),
            Some(GeometryKind::Lines)
        );
        assert_eq!(
            GeometryKind::from_source_layer("reports_sta"),
            Some(GeometryKind::Polygons)
        );
        assert_eq!(GeometryKind::from_source_layer("lu"), None);
        assert_eq!(GeometryKind::from_source_layer("stp_archive"), None);
    }

    #[test]
    fn layer_ids_round_trip() {
        for kind in GeometryKind::ALL {
            assert_eq!(GeometryKind::from_layer_id(kind.layer_id()), Some(kind));
        }
        assert_eq!(GeometryKind::from_layer_id("field"), None);
    }
}
