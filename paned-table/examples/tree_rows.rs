// Example: expandable tree rows with an expand column.
use std::sync::Arc;

use paned_table::{Column, PaneTable, RowKey, TableHeight, TableOptions, TreeRow};

struct Dir {
    path: &'static str,
    children: Vec<Arc<Dir>>,
}

impl TreeRow for Dir {
    fn children(&self) -> &[Arc<Self>] {
        &self.children
    }

    fn cell_text(&self, _column_key: &str) -> Option<String> {
        Some(self.path.rsplit('/').next().unwrap_or(self.path).to_string())
    }
}

fn dir(path: &'static str, children: Vec<Arc<Dir>>) -> Arc<Dir> {
    Arc::new(Dir { path, children })
}

fn main() -> paned_table::Result<()> {
    let rows = vec![
        dir(
            "src",
            vec![dir("src/lib.rs", vec![]), dir("src/table", vec![dir("src/table/mod.rs", vec![])])],
        ),
        dir("Cargo.toml", vec![]),
    ];

    let options = TableOptions::new(400, TableHeight::Max(600))
        .with_columns([Column::new("name", 400)])
        .with_data(rows)
        .with_row_key(|d: &Dir| Some(RowKey::from(d.path)))
        .with_expand_column_key("name")
        .with_default_expanded_keys(vec![RowKey::from("src")]);

    let mut table: PaneTable<Dir> = PaneTable::new(options)?;
    print(&table)?;

    table.toggle_row_expansion(2)?;
    println!("--");
    print(&table)?;
    println!("height={}", table.table_height());
    Ok(())
}

fn print(table: &PaneTable<Dir>) -> paned_table::Result<()> {
    for entry in table.flat_rows().iter() {
        println!("{}", table.render_cell(entry, "name")?);
    }
    Ok(())
}
