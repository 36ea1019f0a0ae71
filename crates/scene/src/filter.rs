use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::feature::AttributeRow;
use crate::kind::GeometryKind;
use crate::state::ViewerState;

/// The one feature the view is isolated to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredFeature {
    pub row: AttributeRow,
    pub kind: GeometryKind,
}

/// Map-side filter for one overlay layer: keep only features with this id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdFilter {
    pub layer_id: &'static str,
    pub id: Option<String>,
}

impl ViewerState {
    /// Isolates the view of `kind` to one row.
    ///
    /// Additive: the kind's layer is forced visible, every other layer keeps
    /// whatever visibility it had and keeps rendering unfiltered.
    pub fn isolate_to(&mut self, row: AttributeRow, kind: GeometryKind) {
        debug!(id = ?row.id, %kind, "isolating view");
        self.filtered = Some(FilteredFeature { row, kind });
        self.visibility.add(kind.layer_id());
    }

    /// Drops isolation and puts the default layer universe back on, even
    /// layers the user had switched off before.
    pub fn clear_filter(&mut self) {
        debug!("filter cleared, restoring default layers");
        self.filtered = None;
        self.visibility.reset_to_default();
    }

    /// A feature is isolated.
    pub fn is_filtering(&self) -> bool {
        self.filtered.is_some()
    }

    /// Filter to apply to the layer of `kind`, if that kind is isolated.
    pub fn filter_for(&self, kind: GeometryKind) -> Option<IdFilter> {
        let filtered = self.filtered.as_ref().filter(|f| f.kind == kind)?;
        Some(IdFilter {
            layer_id: kind.layer_id(),
            id: filtered.row.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::feature::AttributeRow;
    use crate::kind::GeometryKind;
    use crate::state::ViewerState;
    use crate::visibility::LayerVisibilitySet;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn isolate_adds_never_removes() {
        let mut s = ViewerState::new();
        s.visibility.replace(["field"]);
        s.isolate_to(AttributeRow::with_id("7"), GeometryKind::Lines);

        assert!(s.is_filtering());
        assert_eq!(s.visibility.iter().collect::<Vec<_>>(), vec!["field", "stl"]);
        assert_eq!(s.filtered.as_ref().map(|f| f.kind), Some(GeometryKind::Lines));
    }

    #[test]
    fn filter_expression_only_for_isolated_kind() {
        let mut s = ViewerState::new();
        assert!(s.filter_for(GeometryKind::Points).is_none());
        s.isolate_to(AttributeRow::with_id("7"), GeometryKind::Points);
        let f = s.filter_for(GeometryKind::Points).unwrap();
        assert_eq!(f.layer_id, "stp");
        assert_eq!(f.id.as_deref(), Some("7"));
        assert!(s.filter_for(GeometryKind::Lines).is_none());
    }

    #[test]
    fn clear_restores_layers_hidden_on_purpose() {
        let mut s = ViewerState::new();
        s.visibility.remove("lu");
        s.visibility.remove("field");
        s.isolate_to(AttributeRow::with_id("1"), GeometryKind::Polygons);
        s.clear_filter();

        assert!(!s.is_filtering());
        assert!(s.filtered.is_none());
        assert_eq!(
            s.visibility.iter().collect::<Vec<_>>(),
            LayerVisibilitySet::default_universe().iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn filtering_flag_is_derived_from_isolated_feature() {
        let mut s = ViewerState::new();
        s.isolate_to(AttributeRow::with_id("1"), GeometryKind::Points);
        s.filtered = None;
        assert!(!s.is_filtering());
    }

    proptest! {
        #[test]
        fn clear_always_yields_default_universe(
            prior in proptest::collection::btree_set("field|lu|sta|stl|stp|extra[0-9]", 0..8),
        ) {
            let mut s = ViewerState::new();
            s.visibility.replace(prior);
            s.clear_filter();
            prop_assert_eq!(
                s.visibility.iter().collect::<Vec<_>>(),
                vec!["field", "lu", "sta", "stl", "stp"]
            );
        }
    }
}
