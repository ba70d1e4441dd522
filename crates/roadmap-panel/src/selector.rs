//! Selector derivation
//!
//! Hierarchical kinds select downwards (`CHILDREN`); everything else
//! selects the entity itself (`EXACT`). Only active entities are
//! included unless the builder is told otherwise.

use crate::services::SelectorBuilder;
use crate::types::{EntityLifecycleStatus, HierarchyQueryScope, ParentEntityRef, SelectorOptions};
use std::collections::BTreeSet;

/// Default selector derivation
#[derive(Debug, Clone)]
pub struct DefaultSelectorBuilder {
    statuses: BTreeSet<EntityLifecycleStatus>,
    scope_override: Option<HierarchyQueryScope>,
}

impl DefaultSelectorBuilder {
    /// Builder selecting active entities with kind-derived scope
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With lifecycle statuses
    #[must_use]
    pub fn with_statuses(
        mut self,
        statuses: impl IntoIterator<Item = EntityLifecycleStatus>,
    ) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    /// Force a scope regardless of entity kind
    #[inline]
    #[must_use]
    pub fn with_scope(mut self, scope: HierarchyQueryScope) -> Self {
        self.scope_override = Some(scope);
        self
    }
}

impl Default for DefaultSelectorBuilder {
    fn default() -> Self {
        Self {
            statuses: BTreeSet::from([EntityLifecycleStatus::Active]),
            scope_override: None,
        }
    }
}

impl SelectorBuilder for DefaultSelectorBuilder {
    fn build(&self, parent: &ParentEntityRef) -> SelectorOptions {
        let scope = self.scope_override.unwrap_or(if parent.kind.is_hierarchical() {
            HierarchyQueryScope::Children
        } else {
            HierarchyQueryScope::Exact
        });

        SelectorOptions {
            entity_reference: parent.clone(),
            scope,
            entity_lifecycle_statuses: self.statuses.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityKind;

    #[test]
    fn org_unit_selects_children() {
        let parent = ParentEntityRef::new(EntityKind::OrgUnit, 10);
        let opts = DefaultSelectorBuilder::new().build(&parent);

        assert_eq!(opts.scope, HierarchyQueryScope::Children);
        assert_eq!(opts.entity_reference, parent);
        assert_eq!(
            opts.entity_lifecycle_statuses,
            BTreeSet::from([EntityLifecycleStatus::Active])
        );
    }

    #[test]
    fn application_selects_exact() {
        let parent = ParentEntityRef::new(EntityKind::Application, 3);
        let opts = DefaultSelectorBuilder::new().build(&parent);
        assert_eq!(opts.scope, HierarchyQueryScope::Exact);
    }

    #[test]
    fn overrides_apply() {
        let parent = ParentEntityRef::new(EntityKind::OrgUnit, 10);
        let opts = DefaultSelectorBuilder::new()
            .with_scope(HierarchyQueryScope::Parents)
            .with_statuses([EntityLifecycleStatus::Active, EntityLifecycleStatus::Pending])
            .build(&parent);

        assert_eq!(opts.scope, HierarchyQueryScope::Parents);
        assert_eq!(opts.entity_lifecycle_statuses.len(), 2);
    }

    #[test]
    fn serializes_like_the_service_expects() {
        let parent = ParentEntityRef::new(EntityKind::Measurable, 5);
        let opts = DefaultSelectorBuilder::new().build(&parent);
        let json = serde_json::to_value(&opts).unwrap();

        assert_eq!(json["scope"], "CHILDREN");
        assert_eq!(json["entity_reference"]["kind"], "MEASURABLE");
        assert_eq!(json["entity_lifecycle_statuses"][0], "ACTIVE");
    }
}
