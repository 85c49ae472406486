//! Small hand-built models shared by unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Attribute, AttributeTree, DexModel, Scale};
use crate::domain::function::{AggregationMethod, CorrectionSettings, RuleTable, UtilityFunction};

pub(crate) fn rows(table: &[(&[&str], &str)]) -> Vec<(Vec<String>, String)> {
    table
        .iter()
        .map(|(cells, result)| {
            (
                cells.iter().map(|c| c.to_string()).collect(),
                result.to_string(),
            )
        })
        .collect()
}

/// `Root(C, D)` with `C(A, B)`.
///
/// `C` is the nine-row monotone table over two three-valued inputs; `Root`
/// is good only when `C` is at least 2 and `D` is yes.
pub(crate) fn two_level_model(method: AggregationMethod) -> DexModel {
    let three = Arc::new(Scale::ordered("three", &["1", "2", "3"]).unwrap());
    let yes_no = Arc::new(Scale::ordered("yes_no", &["no", "yes"]).unwrap());
    let verdict = Arc::new(Scale::ordered("verdict", &["bad", "good"]).unwrap());

    let mut tree = AttributeTree::new();
    let root = tree
        .insert(Attribute::new("Root", None, Arc::clone(&verdict), None))
        .unwrap();
    let c = tree
        .insert(Attribute::new("C", None, Arc::clone(&three), Some("Root".into())))
        .unwrap();
    tree.insert(Attribute::new("D", None, Arc::clone(&yes_no), Some("Root".into())))
        .unwrap();
    tree.insert(Attribute::new("A", None, Arc::clone(&three), Some("C".into())))
        .unwrap();
    tree.insert(Attribute::new("B", None, Arc::clone(&three), Some("C".into())))
        .unwrap();
    tree.link().unwrap();
    tree.assign_levels().unwrap();
    tree.mark_computed(root);
    tree.mark_computed(c);

    let domain = |name: &str| tree.get(name).unwrap().domain();
    let c_table = RuleTable::from_rows(
        domain("C"),
        vec![domain("A"), domain("B")],
        &rows(&[
            (&["3", "3"], "3"),
            (&["3", "2"], "3"),
            (&["3", "1"], "2"),
            (&["2", "3"], "3"),
            (&["2", "2"], "2"),
            (&["2", "1"], "1"),
            (&["1", "3"], "1"),
            (&["1", "2"], "1"),
            (&["1", "1"], "1"),
        ]),
    )
    .unwrap();
    let root_table = RuleTable::from_rows(
        domain("Root"),
        vec![domain("C"), domain("D")],
        &rows(&[
            (&["3", "yes"], "good"),
            (&["*", "no"], "bad"),
            (&["1", "yes"], "bad"),
            (&["2", "yes"], "good"),
        ]),
    )
    .unwrap();

    let settings = CorrectionSettings::default();
    let strategy = method.strategy();
    // Root first, to exercise level ordering.
    let functions = vec![
        UtilityFunction::new(
            root_table,
            tree.get("Root").unwrap().level(),
            Arc::clone(&strategy),
            &settings,
        )
        .unwrap(),
        UtilityFunction::new(c_table, tree.get("C").unwrap().level(), strategy, &settings)
            .unwrap(),
    ];

    let scales = [three, yes_no, verdict]
        .into_iter()
        .map(|s| (s.name().to_string(), s))
        .collect::<HashMap<_, _>>();
    DexModel::new(Some("test".into()), scales, tree, functions, method)
}
