use crate::cli::ui::style::UiStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// Declarative description of a table column.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub width: usize,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, width: usize) -> Self {
        Self {
            header: header.into(),
            width,
            alignment: Alignment::Left,
        }
    }

    pub fn right(header: impl Into<String>, width: usize) -> Self {
        Self {
            alignment: Alignment::Right,
            ..Self::new(header, width)
        }
    }
}

/// Row data for a [`Table`].
#[derive(Debug, Clone)]
pub struct TableRow {
    pub cells: Vec<String>,
}

/// Simple table model used for rendering read-only overviews.
#[derive(Debug, Clone)]
pub struct Table {
    pub title: Option<String>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn new<T: Into<String>>(title: Option<T>, columns: Vec<TableColumn>) -> Self {
        Self {
            title: title.map(|value| value.into()),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: Vec<S>) {
        let row = TableRow {
            cells: cells.into_iter().map(|value| value.into()).collect(),
        };
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Renders [`Table`] instances using simple padded columns.
pub struct TableRenderer;

impl TableRenderer {
    pub fn render(table: &Table, style: &UiStyle) {
        for line in Self::lines(table, style) {
            println!("{line}");
        }
    }

    /// Cells are padded to the column width; longer values are kept whole.
    pub fn lines(table: &Table, style: &UiStyle) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(title) = &table.title {
            lines.push(style.format_header(title));
        }

        if !table.columns.is_empty() {
            let total_width = table
                .columns
                .iter()
                .map(|col| col.width + 1)
                .sum::<usize>()
                .max(1);
            let headers: Vec<&str> = table.columns.iter().map(|col| col.header.as_str()).collect();
            lines.push(style.horizontal_line(total_width));
            lines.push(style.apply_header_style(&Self::join(&table.columns, &headers)));
            lines.push(style.horizontal_line(total_width));
        }

        for row in &table.rows {
            let cells: Vec<&str> = table
                .columns
                .iter()
                .enumerate()
                .map(|(idx, _)| row.cells.get(idx).map(String::as_str).unwrap_or(""))
                .collect();
            lines.push(Self::join(&table.columns, &cells));
        }
        lines
    }

    fn join(columns: &[TableColumn], cells: &[&str]) -> String {
        let line = columns
            .iter()
            .zip(cells)
            .map(|(column, cell)| match column.alignment {
                Alignment::Left => format!("{:<width$}", cell, width = column.width),
                Alignment::Right => format!("{:>width$}", cell, width = column.width),
            })
            .collect::<Vec<_>>()
            .join(" ");
        line.trim_end().to_string()
    }
}
