// ABOUTME: Scenario tests for tree flattening, path elision and descendant counting
// ABOUTME: Uses small hand-built trees so expected orders are easy to read

#[cfg(test)]
mod tests {
    use crate::flatten::{CollapsedSet, FlattenOptions, count_descendants, get_all_nodes};
    use crate::node::{GroupKind, NodeData, NodeSpec};
    use crate::snapshot::TreeSnapshot;
    use canopy_types::{NodeId, ProjectId};

    fn owner() -> ProjectId {
        ProjectId::from("p")
    }

    fn item(id: &str, label: &str) -> NodeSpec {
        NodeSpec::new(
            id,
            owner(),
            NodeData::Dialog {
                dialog_id: id.to_string(),
                display_name: label.to_string(),
                is_form_dialog: false,
            },
        )
    }

    fn root(children: Vec<NodeSpec>) -> NodeSpec {
        NodeSpec::new(
            "root",
            ProjectId::from("root"),
            NodeData::Root {
                label: "Solution".into(),
            },
        )
        .with_children(children)
    }

    /// root -> [X -> [X1], Y]
    fn sample() -> TreeSnapshot {
        TreeSnapshot::from_spec(root(vec![
            item("X", "x").with_children(vec![item("X1", "x1")]),
            item("Y", "y"),
        ]))
        .unwrap()
    }

    fn ids(snapshot: &TreeSnapshot, keys: &[crate::snapshot::NodeKey]) -> Vec<String> {
        keys.iter()
            .map(|k| snapshot.get(*k).unwrap().id.to_string())
            .collect()
    }

    fn collapsed(ids: &[&str]) -> CollapsedSet {
        ids.iter().map(|id| NodeId::from(*id)).collect()
    }

    #[test]
    fn test_flattening_respects_collapse() {
        let snapshot = sample();

        let flat = get_all_nodes(&snapshot, &FlattenOptions::collapsed(collapsed(&["X"])));
        assert_eq!(ids(&snapshot, &flat.nodes), vec!["root", "X", "Y"]);

        let flat = get_all_nodes(&snapshot, &FlattenOptions::default());
        assert_eq!(ids(&snapshot, &flat.nodes), vec!["root", "X", "X1", "Y"]);
    }

    #[test]
    fn test_collapsed_subtree_gets_no_entries() {
        let snapshot = sample();
        let flat = get_all_nodes(&snapshot, &FlattenOptions::collapsed(collapsed(&["X"])));
        let x1 = snapshot.key_of("X1").unwrap();

        assert_eq!(flat.level(x1), None);
        assert_eq!(flat.parent(x1), None);
        assert_eq!(flat.path(x1), None);
        // Full subtree size ignores collapse
        assert_eq!(flat.descendant_count(snapshot.root()), Some(3));
    }

    #[test]
    fn test_levels_and_parents() {
        let snapshot = sample();
        let flat = get_all_nodes(&snapshot, &FlattenOptions::default());
        let x = snapshot.key_of("X").unwrap();
        let x1 = snapshot.key_of("X1").unwrap();

        assert_eq!(flat.level(snapshot.root()), Some(0));
        assert_eq!(flat.level(x1), Some(2));
        assert_eq!(flat.parent(x1), Some(x));
        assert_eq!(flat.parent(snapshot.root()), None);
        assert_eq!(flat.descendant_count(x), Some(1));
        assert_eq!(flat.path(x1), Some("Solution/x/x1"));
    }

    #[test]
    fn test_skip_root_keeps_levels() {
        let snapshot = sample();
        let options = FlattenOptions {
            skip_root: true,
            ..Default::default()
        };
        let flat = get_all_nodes(&snapshot, &options);

        assert_eq!(ids(&snapshot, &flat.nodes), vec!["X", "X1", "Y"]);
        assert_eq!(flat.level(snapshot.root()), Some(0));
        assert_eq!(flat.level(snapshot.key_of("X").unwrap()), Some(1));
    }

    #[test]
    fn test_group_labels_are_elided_from_paths() {
        let snapshot = TreeSnapshot::from_spec(root(vec![
            NodeSpec::new(
                "triggerGroup:main",
                owner(),
                NodeData::Group {
                    group: GroupKind::Triggers,
                    label: "triggers".into(),
                },
            )
            .with_children(vec![item("T", "t")]),
        ]))
        .unwrap();

        let flat = get_all_nodes(&snapshot, &FlattenOptions::default());
        let group = snapshot.key_of("triggerGroup:main").unwrap();
        let t = snapshot.key_of("T").unwrap();

        assert_eq!(flat.path(t), Some("Solution/t"));
        // The group keeps its own label and stays navigable
        assert_eq!(flat.path(group), Some("Solution/triggers"));
        assert!(flat.position(t).is_some());
    }

    #[test]
    fn test_flatten_from_subtree() {
        let snapshot = sample();
        let x = snapshot.key_of("X").unwrap();
        let options = FlattenOptions {
            start: Some(x),
            ..Default::default()
        };
        let flat = get_all_nodes(&snapshot, &options);

        assert_eq!(ids(&snapshot, &flat.nodes), vec!["X", "X1"]);
        assert_eq!(flat.level(x), Some(0));
        assert_eq!(flat.path(snapshot.key_of("X1").unwrap()), Some("x/x1"));
    }

    #[test]
    fn test_count_descendants_honors_collapse() {
        // root -> [A -> [A1 -> [A11]], B]
        let snapshot = TreeSnapshot::from_spec(root(vec![
            item("A", "a").with_children(vec![item("A1", "a1").with_children(vec![item("A11", "a11")])]),
            item("B", "b"),
        ]))
        .unwrap();
        let root_key = snapshot.root();

        assert_eq!(count_descendants(&snapshot, root_key, &CollapsedSet::new()), 4);
        // A collapsed child is counted itself but nothing below it is
        assert_eq!(count_descendants(&snapshot, root_key, &collapsed(&["A"])), 2);
        assert_eq!(count_descendants(&snapshot, root_key, &collapsed(&["A1"])), 3);
    }
}
