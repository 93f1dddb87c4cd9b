use std::path::Path;
use std::time::{Instant, SystemTime};

use console::style;
use tracing::info;

use crate::cleaner::{CleanOptions, run_cleanup};
use crate::discovery::discover_documents;
use crate::document::BackendSet;
use crate::error::{Result, ScrubError};
use crate::formatting::{format_elapsed, format_system_time};
use crate::ui;

pub fn run() -> Result<()> {
    ui::render_header();
    ui::render_intro();

    let stdin = Path::new("<stdin>");
    let Some(root) = ui::prompt_directory().map_err(|e| ScrubError::io(stdin, e))? else {
        println!("\n{}", style("Fin de la entrada. ¡Hasta luego!").dim());
        return Ok(());
    };
    if !root.is_dir() {
        return Err(ScrubError::InvalidDirectory(root));
    }

    let options = CleanOptions {
        force_clean: ui::prompt_force_clean().map_err(|e| ScrubError::io(stdin, e))?,
        ..CleanOptions::default()
    };

    let spinner = ui::discovery_spinner();
    let files = discover_documents(&root);
    spinner.finish_and_clear();
    let files = files?;
    info!(root = %root.display(), files = files.len(), ?options, "inicio de la limpieza");

    let started_at = SystemTime::now();
    let clock = Instant::now();

    let mut backends = BackendSet::launch();
    let summary = run_cleanup(&files, &backends, options, |event| {
        ui::render_event(&event, &root)
    });
    backends.shutdown();

    ui::render_summary(
        &summary,
        &format_system_time(started_at),
        &format_elapsed(clock.elapsed()),
    );
    ui::wait_for_enter();
    Ok(())
}
