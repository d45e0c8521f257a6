use crate::cli::Cli;
use crate::history::{StatusCell, VersionHistoryView, VersionRow};
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use polyfmt::print;

fn colorize_status(status: StatusCell) -> String {
    let text = format!("{} {}", status.glyph(), status);
    match status {
        StatusCell::Current => text.green().to_string(),
        StatusCell::FailedDeploy => text.red().to_string(),
        StatusCell::Revertible => text.cyan().to_string(),
    }
}

impl Cli {
    pub fn version_get(&self, version: u64) -> Result<()> {
        let history = self.load_history()?;
        let view = VersionHistoryView::new(&history.versions, history.deployed_version);

        let row: VersionRow = self
            .rows(&view)
            .into_iter()
            .find(|row| row.version == version)
            .ok_or_else(|| anyhow!("Version {} not found for '{}'", version, history.app_name))?;

        const TEMPLATE: &str = r#"
    Version v{{ version }} of {{ app_name }} :: {{ status }}

    {{ vertical_line }} Deployed: {{ deployed_absolute }} ({{ deployed_relative }})
    {{ vertical_line }} Image: {{ image_name }}
    {{ vertical_line }} Git Hash: {{ git_hash }}
"#;

        let mut tera = tera::Tera::default();
        tera.add_raw_template("main", TEMPLATE)
            .context("Failed to render context")?;

        let mut context = tera::Context::new();
        context.insert("version", &row.version);
        context.insert("app_name", &history.app_name);
        context.insert("status", &colorize_status(row.status));
        context.insert("vertical_line", &"│".magenta().to_string());
        context.insert("deployed_absolute", &row.deploy_time.absolute);
        context.insert("deployed_relative", &row.deploy_time.relative);
        context.insert(
            "image_name",
            &if row.image_name.is_empty() {
                "None".to_string()
            } else {
                row.image_name.clone()
            },
        );
        context.insert(
            "git_hash",
            &if row.git_hash.full.is_empty() {
                row.git_hash.display.clone()
            } else {
                row.git_hash.full.clone()
            },
        );

        let content = tera.render("main", &context)?;
        print!("{}", content);
        Ok(())
    }
}
