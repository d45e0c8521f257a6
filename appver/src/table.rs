use crate::history::{StatusCell, VersionRow, COLUMN_TITLES};
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Which slice of rows to show. Pages start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_size: usize,
    pub page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

impl Pagination {
    /// Values below 1 are raised to 1.
    pub fn new(page_size: usize, page: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: page.max(1),
        }
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// The items on the current page; empty when the page lies past the end.
    pub fn slice<'r, T>(&self, items: &'r [T]) -> &'r [T] {
        let start = (self.page - 1).saturating_mul(self.page_size);
        if start >= items.len() {
            return &[];
        }

        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }

    pub fn footer(&self, total: usize) -> String {
        format!(
            "page {} of {} ({} versions)",
            self.page,
            self.page_count(total),
            total
        )
    }
}

fn status_color(status: StatusCell) -> Color {
    match status {
        StatusCell::Current => Color::Green,
        StatusCell::FailedDeploy => Color::Red,
        StatusCell::Revertible => Color::Cyan,
    }
}

/// Lays out one page of `rows`. With `hints` set the relative deploy time and the full git
/// hash are printed alongside their short forms.
pub fn render_table(rows: &[VersionRow], pagination: &Pagination, hints: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::ASCII_MARKDOWN)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            COLUMN_TITLES
                .iter()
                .map(|title| {
                    Cell::new(title)
                        .set_alignment(CellAlignment::Center)
                        .fg(Color::Blue)
                })
                .collect::<Vec<_>>(),
        );

    for row in pagination.slice(rows) {
        let deploy_time = if hints {
            format!("{} ({})", row.deploy_time.absolute, row.deploy_time.relative)
        } else {
            row.deploy_time.absolute.clone()
        };

        let git_hash = if hints && row.git_hash.is_truncated() {
            format!("{}\n{}", row.git_hash.display, row.git_hash.full)
        } else {
            row.git_hash.display.clone()
        };

        table.add_row(vec![
            Cell::new(format!("{} {}", row.status.glyph(), row.status))
                .fg(status_color(row.status)),
            Cell::new(row.version).set_alignment(CellAlignment::Center),
            Cell::new(deploy_time),
            Cell::new(&row.image_name),
            Cell::new(git_hash),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{DeployTime, GitHash};
    use pretty_assertions::assert_eq;

    fn rows(count: u64) -> Vec<VersionRow> {
        (1..=count)
            .rev()
            .map(|version| VersionRow {
                key: format!("2024-01-{:02}T00:00:00Z", version),
                status: if version == count {
                    StatusCell::Current
                } else {
                    StatusCell::Revertible
                },
                version,
                deploy_time: DeployTime {
                    relative: format!("{} days ago", count - version + 1),
                    absolute: format!("1/{}/2024, 12:00:00 AM", version),
                },
                image_name: format!("img-app:{}", version),
                git_hash: GitHash::new(Some("0123456789abcdef")),
            })
            .collect()
    }

    #[test]
    fn pages_of_five() {
        let rows = rows(7);

        let first: Vec<u64> = Pagination::new(5, 1)
            .slice(&rows)
            .iter()
            .map(|r| r.version)
            .collect();
        let second: Vec<u64> = Pagination::new(5, 2)
            .slice(&rows)
            .iter()
            .map(|r| r.version)
            .collect();

        assert_eq!(first, vec![7, 6, 5, 4, 3]);
        assert_eq!(second, vec![2, 1]);
        assert!(Pagination::new(5, 3).slice(&rows).is_empty());
        assert_eq!(Pagination::default().page_count(rows.len()), 2);
    }

    #[test]
    fn page_count_never_zero() {
        assert_eq!(Pagination::default().page_count(0), 1);
        assert_eq!(Pagination::default().footer(0), "page 1 of 1 (0 versions)");
    }

    #[test]
    fn zero_values_are_raised() {
        assert_eq!(
            Pagination::new(0, 0),
            Pagination {
                page_size: 1,
                page: 1
            }
        );
    }

    #[test]
    fn renders_page_rows_only() {
        let rows = rows(7);
        let rendered = render_table(&rows, &Pagination::default(), false).to_string();

        for title in COLUMN_TITLES {
            assert!(rendered.contains(title), "missing column {}", title);
        }
        assert!(rendered.contains("Current Version"));
        assert!(rendered.contains("img-app:3"));
        assert!(!rendered.contains("img-app:2"));
        assert!(rendered.contains("0123456789..."));
        assert!(!rendered.contains("0123456789abcdef"));
        assert!(!rendered.contains("days ago"));
    }

    #[test]
    fn renders_hints() {
        let rows = rows(2);
        let rendered = render_table(&rows, &Pagination::default(), true).to_string();

        assert!(rendered.contains("0123456789abcdef"));
        assert!(rendered.contains("1 days ago"));
    }
}
