use market_chart::core::{SegmentMatch, SegmentMatcher, SegmentPath, SegmentTree};

const SEP: &str = " > ";

fn matcher() -> SegmentMatcher {
    SegmentMatcher::from_paths(
        SEP,
        [
            "B2B > Food > Frozen",
            "B2B > Food > Fresh",
            "B2B > Beverages",
            "B2C > Retail",
        ],
    )
}

fn selection(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|path| (*path).to_owned()).collect()
}

#[test]
fn matching_is_reflexive_and_runs_in_both_directions() {
    let matcher = matcher();

    assert_eq!(
        matcher.match_kind("B2B > Food", "B2B > Food"),
        Some(SegmentMatch::Exact)
    );
    assert_eq!(
        matcher.match_kind("B2B > Food > Frozen", "B2B > Food"),
        Some(SegmentMatch::Descendant)
    );
    assert_eq!(
        matcher.match_kind("B2B > Food", "B2B > Food > Frozen"),
        Some(SegmentMatch::Ancestor)
    );
    assert_eq!(matcher.match_kind("B2B > Beverages", "B2B > Food"), None);
}

#[test]
fn unknown_paths_fall_back_to_component_prefixes() {
    let matcher = matcher();

    assert!(matcher.matches("B2C > Retail > Online > Mobile", "B2C > Retail"));
    assert!(matcher.matches("B2C", "B2C > Wholesale"));
    assert!(!matcher.matches("B2C > Retailers", "B2C > Retail"));
}

#[test]
fn separator_spacing_is_not_significant() {
    let matcher = matcher();

    assert_eq!(
        matcher.match_kind("B2B>Food>Frozen", "B2B >  Food"),
        Some(SegmentMatch::Descendant)
    );
}

#[test]
fn empty_selection_matches_everything() {
    let matcher = matcher();
    assert!(matcher.matches_any("B2C > Retail", &[]));
    assert!(!matcher.matches_any("B2C > Retail", &selection(&["B2B"])));
}

#[test]
fn resolve_key_follows_declared_order() {
    let matcher = matcher();

    let specific_first = selection(&["B2B > Food > Frozen", "B2B > Food"]);
    assert_eq!(
        matcher.resolve_key("B2B > Food > Frozen", &specific_first),
        Some("B2B > Food > Frozen")
    );
    assert_eq!(
        matcher.resolve_key("B2B > Food > Fresh", &specific_first),
        Some("B2B > Food")
    );

    let general_first = selection(&["B2B > Food", "B2B > Food > Frozen"]);
    assert_eq!(
        matcher.resolve_key("B2B > Food > Frozen", &general_first),
        Some("B2B > Food")
    );
    assert_eq!(matcher.resolve_key("B2C > Retail", &general_first), None);
}

#[test]
fn tree_interns_every_prefix_once() {
    let tree = SegmentTree::from_paths(SEP, ["B2B > Food > Frozen", "B2B > Food > Fresh"]);

    assert_eq!(tree.len(), 4);
    let food = tree.lookup("B2B > Food").expect("interned prefix");
    let frozen = tree.lookup("B2B>Food>Frozen").expect("leaf");
    assert_eq!(tree.parent(frozen), Some(food));
    assert_eq!(tree.children(food).len(), 2);
    assert_eq!(tree.label(frozen), "Frozen");
    assert!(tree.is_ancestor(food, frozen));
    assert!(!tree.is_ancestor(frozen, food));
    assert_eq!(tree.roots().count(), 1);
}

#[test]
fn segment_path_parses_trimmed_components() {
    let path = SegmentPath::parse("  B2B >Food >  Frozen ", SEP);

    assert_eq!(path.components(), ["B2B", "Food", "Frozen"]);
    assert_eq!(path.depth(), 3);
    assert_eq!(path.leaf(), Some("Frozen"));
    assert_eq!(path.join(SEP), "B2B > Food > Frozen");
    assert!(SegmentPath::parse("B2B > Food", SEP).is_ancestor_of(&path));
    assert!(SegmentPath::parse("  ", SEP).is_empty());
}
