use crate::*;

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use std::sync::Mutex;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start) as u64) as usize
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

#[derive(Debug)]
struct Node {
    id: i64,
    name: String,
    children: Vec<Arc<Node>>,
}

impl TreeRow for Node {
    fn children(&self) -> &[Arc<Self>] {
        &self.children
    }

    fn key_field(&self, field: &str) -> Option<RowKey> {
        (field == "id").then_some(RowKey::Int(self.id))
    }

    fn cell_text(&self, column_key: &str) -> Option<String> {
        match column_key {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            _ => None,
        }
    }
}

fn leaf(id: i64) -> Arc<Node> {
    Arc::new(Node {
        id,
        name: std::format!("row {id}"),
        children: Vec::new(),
    })
}

fn parent(id: i64, children: Vec<Arc<Node>>) -> Arc<Node> {
    Arc::new(Node {
        id,
        name: std::format!("row {id}"),
        children,
    })
}

fn flat_rows(n: i64) -> Rows<Node> {
    (0..n).map(leaf).collect::<Vec<_>>().into()
}

fn key_of(row: &Node) -> Option<RowKey> {
    Some(RowKey::Int(row.id))
}

fn keys(flat: &FlatRows<Node>) -> Vec<RowKey> {
    flat.iter().map(|e| e.key.clone()).collect()
}

type Captured = Arc<Mutex<Vec<TableEvent<Node>>>>;

fn capture(options: TableOptions<Node>) -> (TableOptions<Node>, Captured) {
    let events: Captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let options = options.with_on_event(Some(move |e: &TableEvent<Node>| {
        sink.lock().unwrap().push(e.clone());
    }));
    (options, events)
}

fn drain(events: &Captured) -> Vec<TableEvent<Node>> {
    core::mem::take(&mut *events.lock().unwrap())
}

fn end_reached(events: &[TableEvent<Node>]) -> Vec<i64> {
    events
        .iter()
        .filter_map(|e| match e {
            TableEvent::EndReached { distance_from_end } => Some(*distance_from_end),
            _ => None,
        })
        .collect()
}

fn three_columns() -> Vec<Column> {
    vec![
        Column::new("id", 50).with_frozen(Frozen::Left),
        Column::new("name", 200)
            .with_title("Name")
            .with_sortable(true)
            .with_resizable(true),
        Column::new("age", 80).with_frozen(Frozen::Right),
    ]
}

/// id (left, 50) | name (200) | age (right, 80); 1000 rows of 40 in a 300x400 table.
fn scenario(fixed: bool) -> TableOptions<Node> {
    TableOptions::new(300, TableHeight::Fixed(400))
        .with_columns(three_columns())
        .with_data(flat_rows(1000))
        .with_row_height(40)
        .with_header_height(0)
        .with_scrollbar_size(Some(15))
        .with_fixed(fixed)
}

fn random_forest(rng: &mut Lcg, next_id: &mut i64, depth: u32) -> Vec<Arc<Node>> {
    let count = rng.gen_range_usize(1, 5);
    (0..count)
        .map(|_| {
            let id = *next_id;
            *next_id += 1;
            let children = if depth < 3 && rng.gen_bool() {
                random_forest(rng, next_id, depth + 1)
            } else {
                Vec::new()
            };
            parent(id, children)
        })
        .collect()
}

#[test]
fn flatten_without_expansion_lists_roots_in_order() {
    let rows = vec![parent(1, vec![leaf(10), leaf(11)]), leaf(2)];
    let flat = flatten(&rows, &[], &key_of).unwrap();
    assert_eq!(keys(&flat), vec![RowKey::Int(1), RowKey::Int(2)]);
    assert_eq!(flat.get(1).unwrap().row_index, 1);
    assert_eq!(flat.depth_of(&RowKey::Int(2)), Some(0));
}

#[test]
fn flatten_expands_only_expanded_rows_with_children() {
    let rows = vec![
        parent(1, vec![parent(10, vec![leaf(100)]), leaf(11)]),
        leaf(2),
    ];
    // 2 has no children, 99 matches nothing: both are ignored.
    let expanded = [RowKey::Int(1), RowKey::Int(2), RowKey::Int(99)];
    let flat = flatten(&rows, &expanded, &key_of).unwrap();
    assert_eq!(
        keys(&flat),
        vec![
            RowKey::Int(1),
            RowKey::Int(10),
            RowKey::Int(11),
            RowKey::Int(2)
        ]
    );
    let depths: Vec<u32> = flat.iter().map(|e| e.depth).collect();
    assert_eq!(depths, vec![0, 1, 1, 0]);
    assert_eq!(flat.position_of(&RowKey::Int(11)), Some(2));
}

#[test]
fn flatten_rejects_missing_and_duplicate_keys() {
    let rows = vec![leaf(1), leaf(1)];
    assert_eq!(
        flatten(&rows, &[], &key_of).unwrap_err(),
        TableError::DuplicateRowKey(RowKey::Int(1))
    );

    let rows = vec![leaf(1), leaf(-1)];
    let err = flatten(&rows, &[], &|r: &Node| (r.id >= 0).then_some(RowKey::Int(r.id)));
    assert_eq!(
        err.unwrap_err(),
        TableError::MissingRowKey {
            position: 1,
            depth: 0
        }
    );
}

#[test]
fn flatten_is_idempotent_over_roots() {
    let mut rng = Lcg::new(7);
    for _ in 0..50 {
        let mut next_id = 0;
        let rows = random_forest(&mut rng, &mut next_id, 0);
        let expanded: Vec<RowKey> = (0..next_id)
            .filter(|_| rng.gen_bool())
            .map(RowKey::Int)
            .collect();
        let flat = flatten(&rows, &expanded, &key_of).unwrap();
        let again = flatten(&flat.roots(), &expanded, &key_of).unwrap();
        assert_eq!(flat.entries(), again.entries());
    }
}

#[test]
fn collapsing_removes_only_the_subtree() {
    let mut rng = Lcg::new(42);
    for _ in 0..50 {
        let mut next_id = 0;
        let rows = random_forest(&mut rng, &mut next_id, 0);
        let expanded: Vec<RowKey> = (0..next_id).map(RowKey::Int).collect();
        let flat = flatten(&rows, &expanded, &key_of).unwrap();

        let Some(position) = flat.iter().position(|e| !e.row.children.is_empty()) else {
            continue;
        };
        let target = flat.get(position).unwrap();
        let subtree_end = flat
            .iter()
            .skip(position + 1)
            .position(|e| e.depth <= target.depth)
            .map_or(flat.len(), |n| position + 1 + n);

        let remaining: Vec<RowKey> = expanded
            .iter()
            .filter(|k| **k != target.key)
            .cloned()
            .collect();
        let collapsed = flatten(&rows, &remaining, &key_of).unwrap();

        let all = keys(&flat);
        let mut expected: Vec<RowKey> = all[..=position].to_vec();
        expected.extend_from_slice(&all[subtree_end..]);
        assert_eq!(keys(&collapsed), expected);
    }
}

#[test]
fn frozen_rows_get_negative_indexes() {
    let rows = vec![leaf(1), leaf(2)];
    let frozen = frozen_entries(&rows, &key_of).unwrap();
    let indexes: Vec<i64> = frozen.iter().map(|e| e.row_index).collect();
    assert_eq!(indexes, vec![-1, -2]);
}

#[test]
fn column_model_partitions_and_placeholders() {
    let mut columns = three_columns();
    columns.push(Column::new("hidden", 999).with_hidden(true));
    let model = ColumnModel::build(columns, true).unwrap();

    let (left, center, right) = model.partition();
    assert_eq!(left.len(), 1);
    assert_eq!(center[0].key, "name");
    assert_eq!(right[0].key, "age");
    assert_eq!(model.columns_width(), 330);

    let main = model.pane_columns(PaneId::Main);
    let flags: Vec<(&str, bool)> = main
        .iter()
        .map(|c| (c.column.key.as_str(), c.placeholder))
        .collect();
    assert_eq!(flags, vec![("id", true), ("name", false), ("age", true)]);
    assert_eq!(model.flex_of("name"), Some((0, 0)));
}

#[test]
fn duplicate_column_keys_are_rejected() {
    let options = TableOptions::<Node>::new(300, TableHeight::Fixed(400))
        .with_columns(vec![Column::new("id", 50), Column::new("id", 60)]);
    let err = PaneTable::<Node>::new(options).unwrap_err();
    assert_eq!(err, TableError::DuplicateColumnKey(String::from("id")));
}

#[test]
fn column_reset_keeps_resized_widths_and_skips_equal_inputs() {
    let mut model = ColumnModel::build(three_columns(), false).unwrap();
    model.set_width("name", 260).unwrap();
    assert!(!model.reset(three_columns(), false).unwrap());
    assert_eq!(model.width_of("name"), Some(260));

    let mut next = three_columns();
    next.push(Column::new("extra", 10));
    assert!(model.reset(next, false).unwrap());
    // Resizable columns keep their width, the others take the declared one.
    assert_eq!(model.width_of("name"), Some(260));
    assert_eq!(model.width_of("id"), Some(50));
}

#[test]
fn nested_column_groups_normalize_to_leaves() {
    let nodes = vec![
        ColumnNode::Group {
            title: String::from("who"),
            children: vec![
                Column::new("id", 50).into(),
                Column::new("name", 100).into(),
            ],
        },
        Column::new("age", 80).into(),
    ];
    let leaves: Vec<String> = normalize_columns(&nodes).into_iter().map(|c| c.key).collect();
    assert_eq!(leaves, vec!["id", "name", "age"]);
}

#[test]
fn scrollbars_for_fixed_and_flexible_layouts() {
    let fixed = PaneTable::<Node>::new(scenario(true)).unwrap();
    assert_eq!(
        fixed.scrollbar_presence(),
        ScrollbarPresence {
            horizontal_size: 15,
            vertical_size: 15
        }
    );

    let flexible = PaneTable::<Node>::new(scenario(false)).unwrap();
    assert_eq!(
        flexible.scrollbar_presence(),
        ScrollbarPresence {
            horizontal_size: 0,
            vertical_size: 15
        }
    );
}

#[test]
fn zero_thickness_means_no_scrollbars() {
    let presence = resolve_scrollbars(ScrollbarInputs {
        content_width: 10_000,
        content_height: 10_000,
        viewport_width: 100,
        viewport_height: 100,
        viewport_height_reserved: 100,
        thickness: 0,
        fixed: true,
    });
    assert_eq!(presence, ScrollbarPresence::default());
}

#[test]
fn horizontal_scrollbar_can_force_a_vertical_one() {
    // Content fits the full width but not the width minus a scrollbar.
    let inputs = ScrollbarInputs {
        content_width: 295,
        content_height: 380,
        viewport_width: 300,
        viewport_height: 400,
        viewport_height_reserved: 400,
        thickness: 15,
        fixed: true,
    };
    assert_eq!(
        resolve_scrollbars(inputs),
        ScrollbarPresence {
            horizontal_size: 15,
            vertical_size: 0
        }
    );
    let taller = ScrollbarInputs {
        content_height: 395,
        ..inputs
    };
    assert_eq!(
        resolve_scrollbars(taller),
        ScrollbarPresence {
            horizontal_size: 15,
            vertical_size: 15
        }
    );
}

#[test]
fn scrollbar_presence_is_reported_once() {
    let (options, events) = capture(scenario(false));
    let mut table = PaneTable::<Node>::new(options).unwrap();
    let presence: Vec<ScrollbarPresence> = drain(&events)
        .into_iter()
        .filter_map(|e| match e {
            TableEvent::ScrollbarPresenceChange(p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(presence, vec![ScrollbarPresence {
        horizontal_size: 0,
        vertical_size: 15
    }]);

    // Unchanged inputs: no repeat notification.
    table.force_update().unwrap();
    table.set_dimensions(300, TableHeight::Fixed(400));
    assert!(
        !drain(&events)
            .iter()
            .any(|e| matches!(e, TableEvent::ScrollbarPresenceChange(_)))
    );

    let mut resolver = ScrollbarResolver::new();
    let inputs = ScrollbarInputs {
        content_width: 100,
        content_height: 1_000,
        viewport_width: 300,
        viewport_height: 400,
        viewport_height_reserved: 400,
        thickness: 15,
        fixed: false,
    };
    resolver.resolve(inputs);
    assert!(resolver.take_change().is_some());
    resolver.resolve(inputs);
    assert!(resolver.take_change().is_none());
}

#[test]
fn pane_geometry_for_fixed_layout() {
    let table = PaneTable::<Node>::new(scenario(true)).unwrap();

    let main = table.pane_geometry(PaneId::Main).unwrap();
    assert_eq!(main.width, 300);
    assert_eq!(main.body_width, 330);
    assert_eq!(main.height, 400);
    assert_eq!(main.body_height, 400);

    let left = table.pane_geometry(PaneId::Left).unwrap();
    assert_eq!(left.container_width, 50);
    assert_eq!(left.width, 65);
    assert_eq!(left.height, 385);

    let right = table.pane_geometry(PaneId::Right).unwrap();
    assert_eq!(right.container_width, 95);
    assert_eq!(right.width, 95);
    assert_eq!(right.body_width, 80);

    assert_eq!(table.pane(PaneId::Left).unwrap().geometry, left);
}

#[test]
fn left_pane_reserves_a_default_scrollbar_width() {
    let options = scenario(false).with_scrollbar_size(Some(0));
    let table = PaneTable::<Node>::new(options).unwrap();
    let left = table.pane_geometry(PaneId::Left).unwrap();
    assert_eq!(left.width, 50 + DEFAULT_SCROLLBAR_SIZE);
}

#[test]
fn max_height_grows_with_content() {
    let options = TableOptions::new(300, TableHeight::Max(600))
        .with_columns(vec![Column::new("name", 100)])
        .with_data(flat_rows(5))
        .with_row_height(40)
        .with_header_height(50)
        .with_scrollbar_size(Some(15));
    let table = PaneTable::<Node>::new(options).unwrap();
    assert_eq!(table.table_height(), 250);
    assert_eq!(table.body_height(), 200);
    assert!(!table.scrollbar_presence().vertical());
}

#[test]
fn max_height_horizontal_scrollbar_grows_the_table_instead_of_adding_a_vertical_one() {
    // 310 wide content fits 320 but not 320 - 15: a horizontal scrollbar is needed, and
    // the table has room to grow by its thickness.
    let options = TableOptions::new(320, TableHeight::Max(1000))
        .with_columns(vec![Column::new("name", 310)])
        .with_data(flat_rows(5))
        .with_row_height(40)
        .with_header_height(50)
        .with_scrollbar_size(Some(15))
        .with_fixed(true);
    let table = PaneTable::<Node>::new(options).unwrap();
    assert_eq!(
        table.scrollbar_presence(),
        ScrollbarPresence {
            horizontal_size: 15,
            vertical_size: 0
        }
    );
    assert_eq!(table.table_height(), 265);
    assert_eq!(table.body_height(), 215);
    assert_eq!(table.max_scroll_top(), 0);
}

#[test]
fn resolver_uses_the_reserved_body_height_under_a_horizontal_scrollbar() {
    let inputs = ScrollbarInputs {
        content_width: 310,
        content_height: 200,
        viewport_width: 320,
        viewport_height: 200,
        viewport_height_reserved: 215,
        thickness: 15,
        fixed: true,
    };
    assert_eq!(resolve_scrollbars(inputs).vertical_size, 0);
    // Capped by the max height: the scrollbar eats into the body.
    let capped = ScrollbarInputs {
        viewport_height_reserved: 200,
        ..inputs
    };
    assert_eq!(resolve_scrollbars(capped).vertical_size, 15);
}

#[test]
fn shrinking_data_clamps_the_scroll_offset_on_every_pane() {
    let (options, events) = capture(scenario(false));
    let mut table = PaneTable::<Node>::new(options).unwrap();
    table.scroll_to_top(39_600);
    drain(&events);

    table.set_data(flat_rows(20)).unwrap();
    assert_eq!(table.max_scroll_top(), 400);
    assert_eq!(table.scroll_offset(), ScrollOffset::new(0, 400));
    for pane in PaneId::ALL {
        assert_eq!(table.pane(pane).unwrap().offset().top, 400);
    }
    let programmatic = drain(&events).into_iter().any(|e| {
        matches!(
            e,
            TableEvent::Scroll {
                offset: ScrollOffset { left: 0, top: 400 },
                programmatic: true,
                ..
            }
        )
    });
    assert!(programmatic);
}

#[test]
fn narrowing_columns_clamps_the_left_offset() {
    let mut table = PaneTable::<Node>::new(scenario(true)).unwrap();
    table.scroll_to_left(45);
    assert_eq!(table.scroll_offset().left, 45);

    table
        .set_columns(vec![
            Column::new("id", 50).with_frozen(Frozen::Left).into(),
            Column::new("name", 100).into(),
        ])
        .unwrap();
    assert_eq!(table.max_scroll_left(), 0);
    assert_eq!(table.scroll_offset().left, 0);
    assert_eq!(table.pane(PaneId::Main).unwrap().offset().left, 0);
}

#[test]
fn frozen_rows_reduce_the_body_height() {
    let options = scenario(false).with_frozen_data(vec![leaf(-1), leaf(-2)]);
    let table = PaneTable::<Node>::new(options).unwrap();
    assert_eq!(table.body_height(), 320);
    let indexes: Vec<i64> = table.frozen_rows().iter().map(|e| e.row_index).collect();
    assert_eq!(indexes, vec![-1, -2]);
}

#[test]
fn frozen_panes_follow_their_column_groups() {
    let options = TableOptions::<Node>::new(300, TableHeight::Fixed(400))
        .with_columns(vec![Column::new("name", 100)])
        .with_data(flat_rows(10));
    let mut table = PaneTable::<Node>::new(options).unwrap();
    assert!(table.pane(PaneId::Left).is_none());
    assert!(table.pane(PaneId::Right).is_none());
    assert!(table.pane_geometry(PaneId::Left).is_none());

    table.scroll_to_top(120);
    table
        .set_columns(three_columns().into_iter().map(ColumnNode::from).collect())
        .unwrap();
    // New panes start at the shared vertical offset.
    assert_eq!(
        table.pane(PaneId::Left).unwrap().offset,
        ScrollOffset::new(0, 120)
    );
    assert!(table.pane(PaneId::Right).is_some());

    table
        .set_columns(vec![Column::new("id", 50).with_frozen(Frozen::Left).into()])
        .unwrap();
    assert!(table.pane(PaneId::Left).is_some());
    assert!(table.pane(PaneId::Right).is_none());
}

#[test]
fn user_scroll_is_mirrored_and_echo_is_ignored() {
    let (options, events) = capture(scenario(true));
    let mut table = PaneTable::<Node>::new(options).unwrap();
    drain(&events);
    let left_before = table.pane(PaneId::Left).unwrap().offsets_applied;

    table.on_pane_scrolled(PaneId::Left, ScrollOffset::new(7, 400));
    assert_eq!(table.scroll_offset(), ScrollOffset::new(0, 400));
    assert_eq!(
        table.pane(PaneId::Main).unwrap().offset,
        ScrollOffset::new(0, 400)
    );
    assert_eq!(
        table.pane(PaneId::Right).unwrap().offset,
        ScrollOffset::new(0, 400)
    );
    // The reporting pane is not written back to.
    assert_eq!(table.pane(PaneId::Left).unwrap().offsets_applied, left_before);

    let scrolls = drain(&events);
    assert!(matches!(
        scrolls.as_slice(),
        [TableEvent::Scroll {
            programmatic: false,
            directions: ScrollDirections {
                horizontal: None,
                vertical: Some(ScrollDirection::Forward)
            },
            ..
        }]
    ));

    // The main pane echoing the synced offset is a no-op.
    table.on_pane_scrolled(PaneId::Main, ScrollOffset::new(0, 400));
    assert!(drain(&events).is_empty());

    table.on_pane_scrolled(PaneId::Main, ScrollOffset::new(20, 400));
    assert_eq!(
        table.pane(PaneId::Left).unwrap().offset,
        ScrollOffset::new(0, 400)
    );
    assert_eq!(drain(&events).len(), 1);
}

#[test]
fn programmatic_scroll_is_clamped() {
    let mut table = PaneTable::<Node>::new(scenario(true)).unwrap();
    table.scroll_to(ScrollOffset::new(10_000, 1_000_000));
    // 40000 rows + 15 scrollbar - 400 body; 330 columns - (300 - 15).
    assert_eq!(table.scroll_offset(), ScrollOffset::new(45, 39_615));

    let mut flexible = PaneTable::<Node>::new(scenario(false)).unwrap();
    flexible.scroll_to_left(100);
    assert_eq!(flexible.scroll_offset().left, 0);
}

#[test]
fn end_reached_at_the_bottom_of_the_scenario() {
    let (options, events) = capture(scenario(true));
    let mut table = PaneTable::<Node>::new(options).unwrap();
    table.on_rows_rendered(RowsRendered {
        overscan_start: 0,
        overscan_stop: 10,
        visible_start: 0,
        visible_stop: 9,
    });
    assert!(end_reached(&drain(&events)).is_empty());

    table.scroll_to_top(39_600);
    assert_eq!(end_reached(&drain(&events)), vec![15]);
}

#[test]
fn end_reached_fires_once_per_data_change() {
    let (options, events) = capture(scenario(false));
    let mut table = PaneTable::<Node>::new(options).unwrap();
    table.on_rows_rendered(RowsRendered {
        overscan_start: 0,
        overscan_stop: 10,
        visible_start: 0,
        visible_stop: 9,
    });
    let max = table.max_scroll_top();
    for step in 1..=50 {
        table.on_pane_scrolled(PaneId::Main, ScrollOffset::new(0, max * step / 50));
    }
    assert_eq!(end_reached(&drain(&events)), vec![0]);
    assert_eq!(table.scroll_offset().top, 39_600);

    table.set_data(flat_rows(1010)).unwrap();
    drain(&events);
    table.on_rows_rendered(RowsRendered {
        overscan_start: 980,
        overscan_stop: 995,
        visible_start: 985,
        visible_stop: 994,
    });
    assert_eq!(end_reached(&drain(&events)), vec![400]);
}

#[test]
fn end_reached_waits_for_rendered_rows() {
    let (options, events) = capture(scenario(false));
    let mut table = PaneTable::<Node>::new(options).unwrap();
    table.scroll_to_top(39_600);
    assert!(end_reached(&drain(&events)).is_empty());
    table.on_rows_rendered(RowsRendered {
        overscan_start: 988,
        overscan_stop: 999,
        visible_start: 990,
        visible_stop: 999,
    });
    assert_eq!(end_reached(&drain(&events)), vec![0]);
}

#[test]
fn set_data_with_the_same_rows_is_a_no_op() {
    let data = flat_rows(10);
    let options = scenario(false).with_data(Arc::clone(&data));
    let mut table = PaneTable::<Node>::new(options).unwrap();
    let runs = table.flatten_runs();
    table.set_data(data).unwrap();
    assert_eq!(table.flatten_runs(), runs);
    assert_eq!(table.data_epoch(), 0);
}

#[test]
fn scroll_to_row_alignments() {
    let mut table = PaneTable::<Node>::new(scenario(false)).unwrap();
    assert_eq!(table.scroll_to_row_offset(50, Align::Start), 2_000);
    assert_eq!(table.scroll_to_row_offset(50, Align::End), 1_640);
    assert_eq!(table.scroll_to_row_offset(50, Align::Center), 1_820);
    assert_eq!(table.scroll_to_row_offset(0, Align::Center), 0);
    assert_eq!(table.scroll_to_row_offset(999, Align::Center), 39_600);

    assert_eq!(table.scroll_to_row(50, Align::Auto), 1_640);
    // Already visible: stays put.
    assert_eq!(table.scroll_to_row(45, Align::Auto), 1_640);
    // Close by: behaves like auto.
    assert_eq!(table.scroll_to_row_offset(60, Align::Smart), 2_040);
    // Far away: centers.
    assert_eq!(table.scroll_to_row_offset(500, Align::Smart), 19_820);
    assert_eq!(table.scroll_to_row(5_000, Align::Start), 39_600);
}

#[test]
fn expanding_a_row_reflattens_and_reports_in_order() {
    let data: Rows<Node> = vec![parent(1, vec![leaf(10), leaf(11)]), leaf(2)].into();
    let options = scenario(false).with_data(data);
    let (options, events) = capture(options);
    let mut table = PaneTable::<Node>::new(options).unwrap();
    drain(&events);

    table.toggle_row_expansion(0).unwrap();
    assert_eq!(table.flat_rows().len(), 4);
    assert_eq!(table.expanded_row_keys(), &[RowKey::Int(1)]);
    assert_eq!(table.depth_of(&RowKey::Int(11)), Some(1));

    let events = drain(&events);
    assert!(matches!(
        events.as_slice(),
        [
            TableEvent::RowExpand {
                row_index: 0,
                expanded: true,
                ..
            },
            TableEvent::ExpandedRowsChange { .. }
        ]
    ));

    table.set_row_expanded(0, false).unwrap();
    assert_eq!(table.flat_rows().len(), 2);
    assert_eq!(
        table.set_row_expanded(7, true).unwrap_err(),
        TableError::UnknownRow(7)
    );
}

#[test]
fn controlled_expansion_only_proposes() {
    let data: Rows<Node> = vec![parent(1, vec![leaf(10)]), leaf(2)].into();
    let options = scenario(false)
        .with_data(data)
        .with_expanded_keys(Vec::new());
    let (options, events) = capture(options);
    let mut table = PaneTable::<Node>::new(options).unwrap();
    drain(&events);

    table.toggle_row_expansion(0).unwrap();
    let first = drain(&events);
    table.toggle_row_expansion(0).unwrap();
    let second = drain(&events);

    let proposals = |events: &[TableEvent<Node>]| -> Vec<Vec<RowKey>> {
        events
            .iter()
            .filter_map(|e| match e {
                TableEvent::ExpandedRowsChange { keys } => Some(keys.clone()),
                _ => None,
            })
            .collect()
    };
    assert_eq!(proposals(&first), vec![vec![RowKey::Int(1)]]);
    assert_eq!(proposals(&first), proposals(&second));
    assert!(table.expanded_row_keys().is_empty());
    assert_eq!(table.flat_rows().len(), 2);

    assert!(!table.set_expanded_row_keys(vec![RowKey::Int(1)]).unwrap());
    table
        .set_controlled_expanded_row_keys(vec![RowKey::Int(1)])
        .unwrap();
    assert_eq!(table.flat_rows().len(), 3);
}

#[test]
fn unchanged_expanded_keys_do_not_reflatten() {
    let data: Rows<Node> = vec![parent(1, vec![leaf(10)])].into();
    let mut table = PaneTable::<Node>::new(scenario(false).with_data(data)).unwrap();
    assert_eq!(table.flatten_runs(), 1);

    assert!(table.set_expanded_row_keys(Vec::new()).unwrap());
    assert_eq!(table.flatten_runs(), 1);

    assert!(table.set_expanded_row_keys(vec![RowKey::Int(1)]).unwrap());
    assert_eq!(table.flatten_runs(), 2);

    table.force_update().unwrap();
    assert_eq!(table.flatten_runs(), 3);
    assert_eq!(table.pane(PaneId::Main).unwrap().forced_updates, 1);
}

#[test]
fn expansion_proposals_are_pure() {
    let controller = ExpansionController::controlled(vec![RowKey::Int(3)]);
    let a = controller.propose_toggle(&RowKey::Int(1));
    let b = controller.propose_toggle(&RowKey::Int(1));
    assert_eq!(a, b);
    assert_eq!(a.next, vec![RowKey::Int(3), RowKey::Int(1)]);
    assert_eq!(controller.keys(), &[RowKey::Int(3)]);

    let mut owned = ExpansionController::uncontrolled(Vec::new());
    assert!(owned.toggle(&RowKey::Int(1)).expanded);
    assert!(!owned.toggle(&RowKey::Int(1)).expanded);
    assert!(owned.keys().is_empty());
}

#[test]
fn column_resize_is_throttled_and_committed_once() {
    let (options, events) = capture(scenario(true).with_resize_throttle_ms(16));
    let mut table = PaneTable::<Node>::new(options).unwrap();
    drain(&events);

    table.start_column_resize("name").unwrap();
    table.update_column_resize("name", 120, 0).unwrap();
    table.update_column_resize("name", 180, 5).unwrap();
    table.update_column_resize("name", 140, 10).unwrap();
    let session = table.stop_column_resize().unwrap();
    assert_eq!(session.live_width, 140);
    assert_eq!(table.columns().width_of("name"), Some(140));

    let events = drain(&events);
    let intermediate = events
        .iter()
        .filter(|e| matches!(e, TableEvent::ColumnResize { .. }))
        .count();
    assert_eq!(intermediate, 1);
    let ends: Vec<(String, u32)> = events
        .iter()
        .filter_map(|e| match e {
            TableEvent::ColumnResizeEnd { key, width } => Some((key.clone(), *width)),
            _ => None,
        })
        .collect();
    assert_eq!(ends, vec![(String::from("name"), 140)]);
}

#[test]
fn stopping_without_a_width_is_a_no_op() {
    let mut table = PaneTable::<Node>::new(scenario(true)).unwrap();
    assert!(table.stop_column_resize().is_none());
    table.start_column_resize("name").unwrap();
    assert!(table.stop_column_resize().is_none());
    assert_eq!(
        table.start_column_resize("nope").unwrap_err(),
        TableError::UnknownColumn(String::from("nope"))
    );
}

#[test]
fn resize_respects_min_width() {
    let columns = vec![Column::new("name", 200).with_min_width(60)];
    let options = TableOptions::<Node>::new(300, TableHeight::Fixed(400)).with_columns(columns);
    let mut table = PaneTable::<Node>::new(options).unwrap();
    assert_eq!(table.update_column_resize("name", 10, 0).unwrap(), 60);
    assert_eq!(table.set_column_width("name", 90).unwrap(), 90);
}

#[test]
fn resizing_line_positions() {
    let mut table = PaneTable::<Node>::new(scenario(true)).unwrap();
    assert!(table.resizing_line().is_none());

    table.start_column_resize("name").unwrap();
    assert_eq!(
        table.resizing_line(),
        Some(ResizingLine {
            left: 250,
            height: 385
        })
    );
    table.scroll_to_left(30);
    assert_eq!(table.resizing_line().unwrap().left, 220);

    table.start_column_resize("id").unwrap();
    assert_eq!(table.resizing_line().unwrap().left, 50);

    table.start_column_resize("age").unwrap();
    assert_eq!(table.resizing_line().unwrap().left, 285);

    let mut flexible = PaneTable::<Node>::new(scenario(false)).unwrap();
    flexible.start_column_resize("name").unwrap();
    assert!(flexible.resizing_line().is_none());
}

#[test]
fn sort_requests_propose_the_next_order() {
    let (options, events) = capture(scenario(false));
    let mut table = PaneTable::<Node>::new(options).unwrap();
    drain(&events);

    assert_eq!(table.request_column_sort("name").unwrap(), SortOrder::Asc);
    assert_eq!(table.sort_state(), &SortState::Unsorted);

    table.set_sort_state(SortState::Single(SortBy {
        key: String::from("name"),
        order: SortOrder::Asc,
    }));
    assert_eq!(table.request_column_sort("name").unwrap(), SortOrder::Desc);
    assert_eq!(drain(&events).len(), 2);

    assert_eq!(
        table.request_column_sort("id").unwrap_err(),
        TableError::ColumnNotSortable(String::from("id"))
    );
    assert_eq!(
        table.request_column_sort("nope").unwrap_err(),
        TableError::UnknownColumn(String::from("nope"))
    );
}

#[test]
fn hover_is_edge_triggered() {
    let (options, events) = capture(scenario(false));
    let mut table = PaneTable::<Node>::new(options).unwrap();
    drain(&events);

    table.set_hovered_row(Some(RowKey::Int(3)));
    table.set_hovered_row(Some(RowKey::Int(3)));
    table.set_hovered_row(None);
    let hovers: Vec<(Option<RowKey>, Option<RowKey>)> = drain(&events)
        .into_iter()
        .filter_map(|e| match e {
            TableEvent::RowHover { previous, hovered } => Some((previous, hovered)),
            _ => None,
        })
        .collect();
    assert_eq!(hovers, vec![
        (None, Some(RowKey::Int(3))),
        (Some(RowKey::Int(3)), None)
    ]);
}

#[test]
fn batch_update_delivers_events_after_the_batch() {
    let (options, events) = capture(scenario(false));
    let mut table = PaneTable::<Node>::new(options).unwrap();
    drain(&events);

    let seen_inside = Arc::clone(&events);
    table.batch_update(|t| {
        t.scroll_to_top(100);
        t.set_hovered_row(Some(RowKey::Int(1)));
        assert!(seen_inside.lock().unwrap().is_empty());
    });
    assert_eq!(drain(&events).len(), 2);
}

#[test]
fn default_renderers() {
    let data: Rows<Node> = vec![parent(1, vec![leaf(10)])].into();
    let options = scenario(false)
        .with_data(data)
        .with_expand_column_key("name")
        .with_sort(SortState::Single(SortBy {
            key: String::from("name"),
            order: SortOrder::Asc,
        }));
    let mut table = PaneTable::<Node>::new(options).unwrap();

    let row = table.row(0).unwrap().clone();
    assert_eq!(table.render_cell(&row, "name").unwrap(), "▸ row 1");
    assert_eq!(table.render_cell(&row, "id").unwrap(), "1");
    assert_eq!(table.render_header("name").unwrap(), "Name ▲");
    assert_eq!(table.render_header("id").unwrap(), "id");

    table.toggle_row_expansion(0).unwrap();
    let child = table.row(1).unwrap().clone();
    assert_eq!(table.render_cell(&child, "name").unwrap(), "    row 10");
}

#[test]
fn custom_cell_renderer() {
    let renderers = RendererRegistry::<Node> {
        cell: Some(Arc::new(|props: &CellProps<'_, Node>| {
            std::format!("{}:{}", props.row_index, props.column.key)
        })),
        ..RendererRegistry::default()
    };
    let options = scenario(false).with_renderers(renderers);
    let table = PaneTable::<Node>::new(options).unwrap();
    let row = table.row(3).unwrap().clone();
    assert_eq!(table.render_cell(&row, "age").unwrap(), "3:age");
}

#[test]
fn toggling_fixed_changes_presence() {
    let (options, events) = capture(scenario(false));
    let mut table = PaneTable::<Node>::new(options).unwrap();
    drain(&events);
    table.set_fixed(true).unwrap();
    assert!(table.scrollbar_presence().horizontal());
    let changes = drain(&events)
        .iter()
        .filter(|e| matches!(e, TableEvent::ScrollbarPresenceChange(_)))
        .count();
    assert_eq!(changes, 1);
}
