use crate::*;

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use std::sync::Mutex;

use paned_table::{
    Align, Column, Frozen, PaneGeometry, PaneId, PaneWindow, RowKey, Rows, RowsRendered,
    ScrollOffset, TableEvent, TableHeight, TableOptions, TreeRow,
};

#[derive(Debug)]
struct Item {
    id: i64,
    children: Vec<Arc<Item>>,
}

impl TreeRow for Item {
    fn children(&self) -> &[Arc<Self>] {
        &self.children
    }

    fn key_field(&self, field: &str) -> Option<RowKey> {
        (field == "id").then_some(RowKey::Int(self.id))
    }
}

fn items(n: i64) -> Rows<Item> {
    (0..n)
        .map(|id| {
            Arc::new(Item {
                id,
                children: Vec::new(),
            })
        })
        .collect::<Vec<_>>()
        .into()
}

type Captured = Arc<Mutex<Vec<TableEvent<Item>>>>;

fn options(fixed: bool) -> (TableOptions<Item>, Captured) {
    let events: Captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let options = TableOptions::new(300, TableHeight::Fixed(400))
        .with_columns(vec![
            Column::new("id", 50).with_frozen(Frozen::Left),
            Column::new("name", 200),
            Column::new("age", 80).with_frozen(Frozen::Right),
        ])
        .with_data(items(1000))
        .with_row_height(40)
        .with_header_height(0)
        .with_scrollbar_size(Some(15))
        .with_fixed(fixed)
        .with_on_event(Some(move |e: &TableEvent<Item>| {
            sink.lock().unwrap().push(e.clone());
        }));
    (options, events)
}

fn drain(events: &Captured) -> Vec<TableEvent<Item>> {
    core::mem::take(&mut *events.lock().unwrap())
}

#[test]
fn window_computes_visible_and_overscan_rows() {
    let mut w = FixedRowWindow::default();
    assert!(w.rows_rendered().is_none());
    assert_eq!(w.row_range(), 0..0);

    w.apply_geometry(PaneGeometry {
        row_count: 100,
        row_height: 10,
        body_height: 50,
        overscan: 2,
        ..PaneGeometry::default()
    });
    w.apply_offset(ScrollOffset::new(0, 25));
    assert_eq!(
        w.rows_rendered(),
        Some(RowsRendered {
            overscan_start: 0,
            overscan_stop: 9,
            visible_start: 2,
            visible_stop: 7,
        })
    );
    assert_eq!(w.row_range(), 0..10);
    assert_eq!(w.row_top(3), 5);

    // Past the end: the range sticks to the last rows.
    w.apply_offset(ScrollOffset::new(0, 10_000));
    let r = w.rows_rendered().unwrap();
    assert_eq!((r.visible_start, r.visible_stop), (95, 99));
    assert_eq!(r.overscan_stop, 99);
}

#[test]
fn window_gestures_are_clamped() {
    let mut w = FixedRowWindow::default();
    let max = ScrollOffset::new(45, 1_000);
    assert_eq!(w.scroll_by(-10, -10, max), ScrollOffset::new(0, 0));
    assert_eq!(w.scroll_by(100, 400, max), ScrollOffset::new(45, 400));
    assert_eq!(w.scroll_by(0, 5_000, max), ScrollOffset::new(45, 1_000));
    assert_eq!(w.offset(), ScrollOffset::new(45, 1_000));
}

#[test]
fn controller_reports_initial_rows() {
    let (options, events) = options(false);
    let c = Controller::new(options).unwrap();
    let rendered: Vec<RowsRendered> = drain(&events)
        .into_iter()
        .filter_map(|e| match e {
            TableEvent::RowsRendered(r) => Some(r),
            _ => None,
        })
        .collect();
    assert_eq!(rendered, vec![RowsRendered {
        overscan_start: 0,
        overscan_stop: 10,
        visible_start: 0,
        visible_stop: 9,
    }]);
    assert_eq!(c.visible_rows(PaneId::Main).len(), 11);
}

#[test]
fn wheel_on_a_frozen_pane_scrolls_every_pane() {
    let (options, events) = options(true);
    let mut c = Controller::new(options).unwrap();
    drain(&events);

    let offset = c.on_wheel(PaneId::Left, 30, 400);
    assert_eq!(offset, ScrollOffset::new(0, 400));
    for pane in PaneId::ALL {
        assert_eq!(c.table().pane(pane).unwrap().offset().top, 400);
    }
    assert_eq!(c.visible_rows(PaneId::Right).first().unwrap().key, RowKey::Int(9));

    let rendered = drain(&events)
        .iter()
        .filter(|e| matches!(e, TableEvent::RowsRendered(_)))
        .count();
    assert_eq!(rendered, 1);
}

#[test]
fn wheel_to_the_bottom_reaches_the_end_once() {
    let (options, events) = options(true);
    let mut c = Controller::new(options).unwrap();
    drain(&events);

    assert_eq!(c.on_wheel(PaneId::Main, 1_000, 0), ScrollOffset::new(45, 0));
    assert_eq!(
        c.on_wheel(PaneId::Main, 0, 1_000_000),
        ScrollOffset::new(45, 39_615)
    );
    c.on_wheel(PaneId::Main, 0, 100);

    let reached: Vec<i64> = drain(&events)
        .into_iter()
        .filter_map(|e| match e {
            TableEvent::EndReached { distance_from_end } => Some(distance_from_end),
            _ => None,
        })
        .collect();
    assert_eq!(reached, vec![0]);

    let last = c.visible_rows(PaneId::Main).last().unwrap();
    assert_eq!(last.key, RowKey::Int(999));
}

#[test]
fn scroll_to_row_moves_the_rendered_window() {
    let (options, _events) = options(false);
    let mut c = Controller::new(options).unwrap();
    assert_eq!(c.scroll_to_row(50, Align::Start), 2_000);
    assert_eq!(c.visible_rows(PaneId::Main).first().unwrap().key, RowKey::Int(49));
    assert_eq!(c.row_top(PaneId::Main, 50), Some(0));
    assert_eq!(c.row_top(PaneId::Left, 51), Some(40));
}

#[test]
fn visible_rows_of_a_missing_pane_are_empty() {
    let options = TableOptions::<Item>::new(300, TableHeight::Fixed(400))
        .with_columns(vec![Column::new("name", 100)])
        .with_data(items(10));
    let c = Controller::new(options).unwrap();
    assert!(c.visible_rows(PaneId::Left).is_empty());
    assert_eq!(c.row_top(PaneId::Right, 0), None);
    assert!(!c.visible_rows(PaneId::Main).is_empty());
}

#[test]
fn toggling_a_row_updates_the_drawn_rows() {
    let data: Rows<Item> = vec![
        Arc::new(Item {
            id: 1,
            children: vec![Arc::new(Item {
                id: 10,
                children: Vec::new(),
            })],
        }),
        Arc::new(Item {
            id: 2,
            children: Vec::new(),
        }),
    ]
    .into();
    let options = TableOptions::<Item>::new(300, TableHeight::Fixed(400))
        .with_columns(vec![Column::new("name", 100)])
        .with_data(data);
    let mut c = Controller::new(options).unwrap();
    assert_eq!(c.visible_rows(PaneId::Main).len(), 2);

    c.toggle_row(0).unwrap();
    let keys: Vec<RowKey> = c
        .visible_rows(PaneId::Main)
        .iter()
        .map(|e| e.key.clone())
        .collect();
    assert_eq!(keys, vec![RowKey::Int(1), RowKey::Int(10), RowKey::Int(2)]);
}
