// Example: driving three fixed-row windows through the controller.
use std::sync::Arc;

use paned_table::{Align, Column, Frozen, PaneId, RowKey, TableHeight, TableOptions, TreeRow};
use paned_table_adapter::Controller;

struct Row(i64);

impl TreeRow for Row {
    fn key_field(&self, _field: &str) -> Option<RowKey> {
        Some(RowKey::Int(self.0))
    }
}

fn main() -> paned_table::Result<()> {
    let rows: Vec<Arc<Row>> = (0..10_000).map(|i| Arc::new(Row(i))).collect();
    let options = TableOptions::new(640, TableHeight::Fixed(480))
        .with_columns([
            Column::new("key", 80).with_frozen(Frozen::Left),
            Column::new("a", 300),
            Column::new("b", 300),
            Column::new("actions", 120).with_frozen(Frozen::Right),
        ])
        .with_data(rows)
        .with_row_height(24)
        .with_header_height(32)
        .with_fixed(true)
        .with_scrollbar_size(Some(12))
        .with_overscan(3);

    let mut c = Controller::new(options)?;
    c.on_wheel(PaneId::Right, 0, 1_200);
    for pane in PaneId::ALL {
        let rows = c.visible_rows(pane);
        println!(
            "{pane:?}: {} rows, first={:?}",
            rows.len(),
            rows.first().map(|e| &e.key)
        );
    }

    let top = c.scroll_to_row(9_999, Align::End);
    println!("scrolled to bottom: top={top} offset={:?}", c.table().scroll_offset());
    Ok(())
}
