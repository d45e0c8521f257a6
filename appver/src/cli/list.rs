use crate::cli::Cli;
use crate::history::{VersionHistoryView, TITLE};
use crate::table::{render_table, Pagination};
use anyhow::Result;
use colored::Colorize;
use polyfmt::println;

impl Cli {
    pub fn version_list(&self, page: usize, page_size: Option<usize>, hints: bool) -> Result<()> {
        let history = self.load_history()?;
        let view = VersionHistoryView::new(&history.versions, history.deployed_version);

        if view.is_empty() {
            println!("No versions found for '{}'.", history.app_name);
            return Ok(());
        }

        let pagination = Pagination::new(
            page_size.unwrap_or(self.conf.display.page_size),
            page,
        );
        let rows = self.rows(&view);
        let table = render_table(&rows, &pagination, hints || self.conf.display.hints);

        println!("{} {}", TITLE.bold(), history.app_name.cyan());
        println!("{}", &table.to_string());
        println!("{}", pagination.footer(view.len()).dimmed());
        Ok(())
    }
}
