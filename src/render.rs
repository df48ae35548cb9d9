use chrono::{DateTime, Local};
use termion::{clear, color, cursor};

use crate::navigation_state::NavigationState;
use crate::note_entry::NoteEntry;
use crate::search;

pub enum Field {
    Title,
    Description,
}

pub struct Column {
    pub field: Field,
    pub name: String,
    pub max_width: usize,
}

impl Column {
    pub fn new(field: Field, name: &str, max_width: usize) -> Self {
        Column {
            field,
            name: name.to_owned(),
            max_width,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }
}

pub trait Columnar {
    fn get_value(&self, column: &Column) -> String;
}

/// One visible note. Carries the id so a row action can reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl Columnar for Row {
    fn get_value(&self, column: &Column) -> String {
        match column.field {
            Field::Title => self.title.clone(),
            Field::Description => self.description.clone(),
        }
    }
}

/// What the terminal should show for a given set of notes and query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayList {
    pub rows: Vec<Row>,
    pub total: usize,
    pub showing: usize,
}

impl DisplayList {
    pub fn project(notes: &[NoteEntry], query: &str) -> Self {
        let rows: Vec<Row> = search::filter(notes, query)
            .into_iter()
            .map(|note| Row {
                id: note.id.clone(),
                title: note.title.clone(),
                description: note.description.clone(),
            })
            .collect();

        DisplayList {
            total: notes.len(),
            showing: rows.len(),
            rows,
        }
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn counters(&self) -> String {
        format!("Total Notes: {}  Showing: {}", self.total, self.showing)
    }
}

/// Extra lines drawn under the table.
pub struct Footer<'a> {
    pub query: &'a str,
    pub last_synced: Option<DateTime<Local>>,
    pub status: Option<&'a str>,
    pub help: &'a str,
}

pub struct TableDisplay<'a> {
    pub list: &'a DisplayList,
    pub columns: Vec<Column>,
    pub state: &'a NavigationState,
}

impl<'a> TableDisplay<'a> {
    pub fn new(list: &'a DisplayList, state: &'a NavigationState) -> Self {
        TableDisplay {
            list,
            columns: vec![
                Column::new(Field::Title, "Title", 30),
                Column::new(Field::Description, "Description", 80),
            ],
            state,
        }
    }

    fn get_column_width(&self, column: &Column) -> usize {
        let mut width = column.get_name().chars().count() + 4;
        for row in &self.list.rows {
            let col_w = row.get_value(column).chars().count() + 4;
            if col_w > width {
                width = col_w;
            }
        }
        width.min(column.max_width + 4)
    }

    pub fn draw_header(&self) -> String {
        let mut header_str = format!(
            "{clear}{goto}{color}",
            goto = cursor::Goto(1, 1),
            clear = clear::All,
            color = color::Fg(color::Yellow),
        );

        for column in &self.columns {
            header_str = format!(
                "{header_str}{value:<width$}",
                value = column.get_name(),
                width = self.get_column_width(column),
            );
        }

        format!("{header_str}{reset}", reset = color::Fg(color::Reset))
    }

    pub fn draw(&self) -> String {
        let mut table_str = self.draw_header();

        if self.list.rows.is_empty() {
            let message = if self.list.total == 0 {
                "No notes yet."
            } else {
                "No notes match the search."
            };
            return format!("{table_str}{goto}{message}", goto = cursor::Goto(1, 2));
        }

        let (window_start, _) = self.state.get_visible_window();
        for (index, row) in self.list.rows.iter().enumerate() {
            if !self.state.is_row_visible(index) {
                continue;
            }

            let mut row_str = String::new();
            if self.state.get_selected_index() == index {
                row_str = format!(
                    "{highlight}{fontcolor}",
                    highlight = color::Bg(color::White),
                    fontcolor = color::Fg(color::Black),
                );
            }

            row_str = format!(
                "{row_str}{goto}",
                goto = cursor::Goto(1, (index - window_start as usize + 2) as u16),
            );

            for column in &self.columns {
                row_str = format!(
                    "{row_str}{value:<width$}",
                    value = truncate(&row.get_value(column), column.max_width),
                    width = self.get_column_width(column)
                );
            }

            table_str = format!(
                "{table_str}{row_str}{reset_highlight}{reset_fontcolor}",
                reset_highlight = color::Bg(color::Reset),
                reset_fontcolor = color::Fg(color::Reset)
            );
        }

        table_str
    }

    /// Counters, query, sync time and status, anchored to the last rows of
    /// a terminal `height` rows tall.
    pub fn draw_footer(&self, footer: &Footer, height: u16) -> String {
        let synced = match footer.last_synced {
            Some(ts) => format!("synced {}", ts.format("%H:%M:%S")),
            None => String::from("not synced"),
        };
        let query = if footer.query.is_empty() {
            String::new()
        } else {
            format!("  Search: \"{}\"", footer.query)
        };

        format!(
            "{goto_info}{color}{counters}{query}  ({synced}){reset}{goto_status}{status}{goto_help}{help}",
            goto_info = cursor::Goto(1, height.saturating_sub(2).max(1)),
            color = color::Fg(color::Cyan),
            counters = self.list.counters(),
            reset = color::Fg(color::Reset),
            goto_status = cursor::Goto(1, height.saturating_sub(1).max(1)),
            status = footer.status.unwrap_or(""),
            goto_help = cursor::Goto(1, height.max(1)),
            help = footer.help,
        )
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_owned();
    }
    let mut cut: String = value.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
