// Example: frozen columns, shared scrolling and end-reached notifications.
use std::sync::Arc;

use paned_table::{
    Column, Frozen, PaneId, PaneTable, RowKey, RowsRendered, ScrollOffset, TableEvent,
    TableHeight, TableOptions, TreeRow,
};

#[derive(Debug)]
struct Person {
    id: i64,
    name: String,
}

impl TreeRow for Person {
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

fn main() -> paned_table::Result<()> {
    let rows: Vec<Arc<Person>> = (0..1_000)
        .map(|id| {
            Arc::new(Person {
                id,
                name: format!("person {id}"),
            })
        })
        .collect();

    let options = TableOptions::new(300, TableHeight::Fixed(400))
        .with_columns([
            Column::new("id", 50).with_frozen(Frozen::Left),
            Column::new("name", 200).with_resizable(true),
            Column::new("age", 80).with_frozen(Frozen::Right),
        ])
        .with_data(rows)
        .with_row_height(40)
        .with_header_height(0)
        .with_fixed(true)
        .with_scrollbar_size(Some(15))
        .with_on_event(Some(|e: &TableEvent<Person>| match e {
            TableEvent::Scroll { .. } | TableEvent::RowsRendered(_) => {}
            other => println!("event: {other:?}"),
        }));

    let mut table: PaneTable<Person> = PaneTable::new(options)?;
    println!("presence={:?}", table.scrollbar_presence());
    println!("left pane={:?}", table.pane_geometry(PaneId::Left));

    table.on_rows_rendered(RowsRendered {
        overscan_start: 0,
        overscan_stop: 10,
        visible_start: 0,
        visible_stop: 9,
    });
    // A user scroll in the left pane is mirrored into the main and right panes.
    table.on_pane_scrolled(PaneId::Left, ScrollOffset::new(0, 39_600));
    println!("right pane offset={:?}", table.pane(PaneId::Right).map(|p| p.offset));

    if let Some(entry) = table.row(990) {
        println!("row 990: {}", table.render_cell(entry, "name")?);
    }
    Ok(())
}
