//! Collapsing multi-level exercise groups into one display slot.

use crate::{Catalog, Exercise, Phase};
use serde::Serialize;
use std::collections::HashSet;

/// All difficulty levels of one movement, shown as a single entry
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupDescriptor<'a> {
    /// Always true; marks the entry as a group in serialized output
    pub is_group: bool,
    pub group: &'a str,
    pub group_label: Option<&'a str>,
    /// Every member of the group, in list order
    pub exercises: Vec<&'a Exercise>,
}

impl GroupDescriptor<'_> {
    /// The member for a 1-based level, clamped to the available levels
    pub fn level(&self, level: u32) -> Option<&Exercise> {
        let max = self.exercises.len();
        if max == 0 {
            return None;
        }
        let index = (level.max(1) as usize).min(max) - 1;
        Some(self.exercises[index])
    }
}

/// One entry in a collapsed exercise list
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VisibleItem<'a> {
    Single(&'a Exercise),
    Group(GroupDescriptor<'a>),
}

impl VisibleItem<'_> {
    pub fn is_group(&self) -> bool {
        matches!(self, VisibleItem::Group(_))
    }
}

/// Collapse exercises sharing a `group` into a single descriptor
///
/// The descriptor takes the position of the group's first member; later
/// members are skipped. Ungrouped exercises pass through unchanged.
pub fn collapse_groups<'a>(exercises: &[&'a Exercise]) -> Vec<VisibleItem<'a>> {
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut items = Vec::with_capacity(exercises.len());

    for &ex in exercises {
        let Some(group) = ex.group.as_deref() else {
            items.push(VisibleItem::Single(ex));
            continue;
        };

        if !emitted.insert(group) {
            continue;
        }

        let members: Vec<&'a Exercise> = exercises
            .iter()
            .copied()
            .filter(|other| other.group.as_deref() == Some(group))
            .collect();

        items.push(VisibleItem::Group(GroupDescriptor {
            is_group: true,
            group,
            group_label: ex.group_label.as_deref(),
            exercises: members,
        }));
    }

    items
}

/// A whole phase's cumulative list with groups collapsed, independent of date
pub fn visible_exercises(catalog: &Catalog, phase: Phase) -> Vec<VisibleItem<'_>> {
    collapse_groups(&catalog.exercises_for_phase(phase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_default_catalog;
    use std::collections::HashMap;

    fn with_group(base: &Exercise, id: &str, group: Option<&str>) -> Exercise {
        let mut ex = base.clone();
        ex.id = id.into();
        ex.group = group.map(String::from);
        ex.group_label = group.map(|_| "Single-Leg Balance".to_string());
        ex.progression_level = None;
        ex
    }

    #[test]
    fn test_five_level_group_collapses_at_first_position() {
        let catalog = build_default_catalog();
        let base = catalog.find("plank").unwrap();

        let mut list = vec![
            with_group(base, "a", None),
            with_group(base, "b", None),
            with_group(base, "c", None),
        ];
        for level in 1..=5 {
            list.push(with_group(base, &format!("balance_{}", level), Some("balance")));
        }
        list.push(with_group(base, "d", None));
        list.push(with_group(base, "e", None));

        let refs: Vec<&Exercise> = list.iter().collect();
        let collapsed = collapse_groups(&refs);

        assert_eq!(collapsed.len(), list.len() - 4);
        match &collapsed[3] {
            VisibleItem::Group(g) => {
                assert_eq!(g.group, "balance");
                assert_eq!(g.exercises.len(), 5);
                assert_eq!(g.exercises[0].id, "balance_1");
                assert_eq!(g.group_label, Some("Single-Leg Balance"));
            }
            other => panic!("expected group at index 3, got {:?}", other),
        }
        assert!(matches!(collapsed[4], VisibleItem::Single(ex) if ex.id == "d"));
    }

    #[test]
    fn test_non_contiguous_members_gathered_at_first() {
        let catalog = build_default_catalog();
        let base = catalog.find("plank").unwrap();
        let list = vec![
            with_group(base, "x1", Some("x")),
            with_group(base, "plain", None),
            with_group(base, "x2", Some("x")),
        ];
        let refs: Vec<&Exercise> = list.iter().collect();

        let collapsed = collapse_groups(&refs);
        assert_eq!(collapsed.len(), 2);
        match &collapsed[0] {
            VisibleItem::Group(g) => {
                let ids: Vec<_> = g.exercises.iter().map(|ex| ex.id.as_str()).collect();
                assert_eq!(ids, vec!["x1", "x2"]);
            }
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_collapse_count_for_phase_one() {
        let catalog = build_default_catalog();
        let refs: Vec<&Exercise> = catalog.phase1.iter().collect();

        let mut sizes: HashMap<&str, usize> = HashMap::new();
        for ex in &refs {
            if let Some(group) = ex.group.as_deref() {
                *sizes.entry(group).or_default() += 1;
            }
        }
        let removed: usize = sizes.values().map(|n| n - 1).sum();

        let collapsed = collapse_groups(&refs);
        assert_eq!(collapsed.len(), refs.len() - removed);

        // Each descriptor sits where its first member was
        for item in &collapsed {
            if let VisibleItem::Group(g) = item {
                let first_input = refs
                    .iter()
                    .position(|ex| ex.group.as_deref() == Some(g.group))
                    .unwrap();
                let output_index = collapsed.iter().position(|i| i == item).unwrap();
                let singles_before = first_input
                    - refs[..first_input]
                        .iter()
                        .filter(|ex| ex.group.is_some())
                        .count();
                let groups_before = collapsed[..output_index]
                    .iter()
                    .filter(|i| i.is_group())
                    .count();
                assert_eq!(output_index, singles_before + groups_before);
            }
        }
    }

    #[test]
    fn test_visible_exercises_for_phase() {
        let catalog = build_default_catalog();
        let visible = visible_exercises(&catalog, Phase::Two);
        let groups: Vec<_> = visible.iter().filter(|i| i.is_group()).collect();

        assert_eq!(groups.len(), 1);
        assert_eq!(
            visible.len(),
            catalog.exercises_for_phase(Phase::Two).len() - 4
        );
    }

    #[test]
    fn test_group_level_lookup_clamps() {
        let catalog = build_default_catalog();
        let visible = visible_exercises(&catalog, Phase::One);
        let group = visible
            .iter()
            .find_map(|item| match item {
                VisibleItem::Group(g) => Some(g),
                VisibleItem::Single(_) => None,
            })
            .unwrap();

        assert_eq!(group.level(1).unwrap().id, "single_leg_balance_1");
        assert_eq!(group.level(5).unwrap().id, "single_leg_balance_5");
        assert_eq!(group.level(9).unwrap().id, "single_leg_balance_5");
        assert_eq!(group.level(0).unwrap().id, "single_leg_balance_1");
    }

    #[test]
    fn test_serialized_group_is_marked() {
        let catalog = build_default_catalog();
        let visible = visible_exercises(&catalog, Phase::Two);

        let json = serde_json::to_value(&visible).unwrap();
        let items = json.as_array().unwrap();
        let groups: Vec<_> = items
            .iter()
            .filter(|item| item["is_group"] == serde_json::Value::Bool(true))
            .collect();

        assert_eq!(groups.len(), 1);
        assert!(groups[0]["exercises"].as_array().unwrap().len() > 1);
        assert!(items
            .iter()
            .filter(|item| item.get("is_group").is_none())
            .all(|item| item.get("id").is_some()));
    }
}
