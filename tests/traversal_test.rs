//! Breadth-first and depth-first traversal over complete trees.

use itertools::Itertools;
use rstest::rstest;

use ntree::domain::{
    Cursor, NodeRef, NodeVisitor, Order, Tree, TreeBuilder, TreeError, VisitResult,
};
use ntree::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn complete_tree(depth: usize, children: usize) -> (Tree<String>, ntree::NodeId) {
    let mut tree = Tree::new();
    let root = TreeBuilder::new()
        .complete(&mut tree, depth, children)
        .expect("build complete tree");
    (tree, root)
}

fn collect<'a, C>(cursor: &mut C) -> String
where
    C: Cursor<'a, String>,
{
    let mut names = Vec::new();
    while cursor.move_next() {
        names.push(cursor.current().expect("positioned cursor").name().to_string());
    }
    names.join("|")
}

#[rstest]
#[case(0, 0, "1")]
#[case(1, 1, "1|11")]
#[case(1, 2, "1|11|12")]
#[case(1, 3, "1|11|12|13")]
#[case(2, 1, "1|11|111")]
#[case(2, 2, "1|11|12|111|112|121|122")]
#[case(2, 3, "1|11|12|13|111|112|113|121|122|123|131|132|133")]
#[case(3, 1, "1|11|111|1111")]
#[case(
    3,
    2,
    "1|11|12|111|112|121|122|1111|1112|1121|1122|1211|1212|1221|1222"
)]
#[case(
    3,
    3,
    "1|11|12|13|111|112|113|121|122|123|131|132|133|1111|1112|1113|1121|1122|1123|1131|1132|1133|1211|1212|1213|1221|1222|1223|1231|1232|1233|1311|1312|1313|1321|1322|1323|1331|1332|1333"
)]
fn given_complete_tree_when_breadth_first_then_visits_level_by_level(
    #[case] depth: usize,
    #[case] children: usize,
    #[case] expected: &str,
) {
    let (tree, root) = complete_tree(depth, children);
    let mut cursor = tree.breadth_first(root).unwrap();
    assert_eq!(collect(&mut cursor), expected);
}

#[rstest]
#[case(0, 0, "1")]
#[case(1, 1, "1|11")]
#[case(1, 2, "1|11|12")]
#[case(1, 3, "1|11|12|13")]
#[case(2, 1, "1|11|111")]
#[case(2, 2, "1|11|111|112|12|121|122")]
#[case(2, 3, "1|11|111|112|113|12|121|122|123|13|131|132|133")]
#[case(3, 1, "1|11|111|1111")]
#[case(
    3,
    2,
    "1|11|111|1111|1112|112|1121|1122|12|121|1211|1212|122|1221|1222"
)]
#[case(
    3,
    3,
    "1|11|111|1111|1112|1113|112|1121|1122|1123|113|1131|1132|1133|12|121|1211|1212|1213|122|1221|1222|1223|123|1231|1232|1233|13|131|1311|1312|1313|132|1321|1322|1323|133|1331|1332|1333"
)]
fn given_complete_tree_when_depth_first_then_visits_pre_order(
    #[case] depth: usize,
    #[case] children: usize,
    #[case] expected: &str,
) {
    let (tree, root) = complete_tree(depth, children);
    let mut cursor = tree.depth_first(root).unwrap();
    assert_eq!(collect(&mut cursor), expected);
}

#[rstest]
#[case(Order::BreadthFirst, "1|11|12|111|112|121|122")]
#[case(Order::DepthFirst, "1|11|111|112|12|121|122")]
fn given_order_when_iterating_then_matches_cursor(#[case] order: Order, #[case] expected: &str) {
    let (tree, root) = complete_tree(2, 2);
    let names = tree.cursor(root, order).unwrap().map(|node| node.name()).join("|");
    assert_eq!(names, expected);
}

#[rstest]
#[case(Order::BreadthFirst, "1|11")]
#[case(Order::DepthFirst, "1|11")]
fn given_predicate_returning_false_when_traversing_then_stops_immediately(
    #[case] order: Order,
    #[case] expected: &str,
) {
    let (tree, root) = complete_tree(2, 2);
    let mut visited = Vec::new();

    let result = tree
        .traverse(root, order, |node| {
            visited.push(node.name().to_string());
            visited.len() < 2
        })
        .unwrap();

    assert_eq!(result, VisitResult::Done);
    assert_eq!(visited.join("|"), expected);
}

#[test]
fn given_predicate_always_true_when_traversing_then_visits_every_node_once() {
    let (tree, root) = complete_tree(2, 2);
    let mut count = 0;

    let result = tree
        .traverse(root, Order::DepthFirst, |_| {
            count += 1;
            true
        })
        .unwrap();

    assert_eq!(result, VisitResult::Continue);
    assert_eq!(count, 7);
}

/// Collects names until it has seen a given one.
struct StopAt {
    target: &'static str,
    seen: Vec<String>,
}

impl NodeVisitor<String> for StopAt {
    fn visit(&mut self, node: NodeRef<'_, String>) -> VisitResult {
        self.seen.push(node.name().to_string());
        if node.name() == self.target {
            VisitResult::Done
        } else {
            VisitResult::Continue
        }
    }
}

#[test]
fn given_visitor_object_when_accepting_then_stops_at_done() {
    let (tree, root) = complete_tree(2, 2);
    let mut visitor = StopAt {
        target: "12",
        seen: Vec::new(),
    };

    let result = tree.accept(root, Order::DepthFirst, &mut visitor).unwrap();

    assert_eq!(result, VisitResult::Done);
    assert_eq!(visitor.seen.join("|"), "1|11|111|112|12");
}

#[test]
fn given_fresh_cursor_when_reading_current_then_fails_with_no_current() {
    let (tree, root) = complete_tree(1, 1);
    let cursor = tree.breadth_first(root).unwrap();
    assert_eq!(cursor.current().unwrap_err(), TreeError::NoCurrent);
}

#[test]
fn given_exhausted_cursor_when_reading_current_then_fails_with_no_current() {
    let (tree, root) = complete_tree(1, 1);
    let mut cursor = tree.depth_first(root).unwrap();
    while cursor.move_next() {}
    assert!(!cursor.move_next());
    assert_eq!(cursor.current().unwrap_err(), TreeError::NoCurrent);
}

#[rstest]
#[case(Order::BreadthFirst)]
#[case(Order::DepthFirst)]
fn given_partially_consumed_cursor_when_reset_then_replays_full_sequence(#[case] order: Order) {
    let (tree, root) = complete_tree(2, 3);
    let mut cursor = tree.cursor(root, order).unwrap();
    let first = collect(&mut cursor);

    cursor.reset();
    assert_eq!(cursor.current().unwrap_err(), TreeError::NoCurrent);
    assert!(cursor.move_next());
    assert!(cursor.move_next());
    cursor.reset();

    assert_eq!(collect(&mut cursor), first);
}

#[test]
fn given_inner_start_node_when_traversing_then_only_its_subtree_is_visited() {
    let (tree, root) = complete_tree(2, 2);
    let second = tree.node(root).unwrap().last_child().unwrap().id();

    let bfs = tree.breadth_first(second).unwrap().map(|n| n.name()).join("|");
    let dfs = tree.depth_first(second).unwrap().map(|n| n.name()).join("|");

    assert_eq!(bfs, "12|121|122");
    assert_eq!(dfs, "12|121|122");
}

#[test]
fn given_leaf_start_node_when_traversing_then_yields_only_the_leaf() {
    let (tree, root) = complete_tree(1, 2);
    let leaf = tree.node(root).unwrap().first_child().unwrap().id();
    let names: Vec<_> = tree.breadth_first(leaf).unwrap().map(|n| n.name()).collect();
    assert_eq!(names, vec!["11"]);
}

#[test]
fn given_discarded_start_node_when_creating_cursor_then_fails_with_not_found() {
    let mut tree: Tree<String> = Tree::new();
    let lone = tree.new_node("lone".to_string());
    tree.discard(lone).unwrap();

    assert!(matches!(
        tree.depth_first(lone),
        Err(TreeError::NodeNotFound(id)) if id == lone
    ));
}

#[rstest]
#[case("bfs", Order::BreadthFirst)]
#[case("breadth-first", Order::BreadthFirst)]
#[case("DFS", Order::DepthFirst)]
#[case(" depth-first ", Order::DepthFirst)]
fn given_order_text_when_parsing_then_resolves_order(#[case] text: &str, #[case] order: Order) {
    assert_eq!(text.parse::<Order>().unwrap(), order);
}

#[test]
fn given_unknown_order_text_when_parsing_then_fails() {
    assert!("sideways".parse::<Order>().is_err());
}
