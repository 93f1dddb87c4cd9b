use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Row, Table};
use console::{measure_text_width, style};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cleaner::{CleanupEvent, CleanupSummary, SkipReason};
use crate::formatting::display_relative;

pub fn render_header() {
    let lines = [
        format!("docscrub {}", env!("CARGO_PKG_VERSION")),
        "Limpieza de metadata personal · pptx · docx · xlsx".to_string(),
    ];
    let width = lines
        .iter()
        .map(|line| measure_text_width(line))
        .max()
        .unwrap_or_default()
        + 4;

    println!("\n{}", style(format!("╭{}╮", "─".repeat(width))).cyan());
    for (index, line) in lines.iter().enumerate() {
        let padding = " ".repeat(width - 2 - measure_text_width(line));
        let boxed = style(format!("│  {line}{padding}│")).cyan();
        if index == 0 {
            println!("{}", boxed.bold());
        } else {
            println!("{}", boxed.dim());
        }
    }
    println!("{}\n", style(format!("╰{}╯", "─".repeat(width))).cyan());
}

pub fn render_intro() {
    let hint_lines = [
        "┌─ Se limpiarán todos los .pptx, .docx y .xlsx del directorio y sus subcarpetas:",
        "│   • Autor, último editor, compañía, responsable y comentarios",
        "│   • Partes XML personalizadas y propiedades personalizadas",
        "└─ Los archivos se sobrescriben; haz una copia si la necesitas.",
    ];

    for line in hint_lines.iter() {
        println!("{}", style(line).cyan().dim());
    }

    println!();
}

fn read_line(label: &str) -> io::Result<Option<String>> {
    print!("{} ", style(label).bold().cyan());
    print!("{} ", style("›").cyan());
    io::stdout().flush()?;

    let mut buffer = String::new();
    let bytes_read = io::stdin().read_line(&mut buffer)?;
    if bytes_read == 0 {
        return Ok(None);
    }

    Ok(Some(buffer.trim().to_string()))
}

/// Pide el directorio a limpiar. `None` si la entrada terminó.
pub fn prompt_directory() -> io::Result<Option<PathBuf>> {
    Ok(read_line("Directorio")?.map(|line| PathBuf::from(trim_quotes(&line))))
}

/// Pregunta si se limpian también los documentos que ya tienen activo el indicador.
pub fn prompt_force_clean() -> io::Result<bool> {
    println!(
        "{}",
        style("¿Limpiar también los documentos marcados como ya protegidos? (s/N)").dim()
    );
    loop {
        let Some(answer) = read_line("Forzar")? else {
            return Ok(false);
        };
        match parse_yes_no(&answer) {
            Some(value) => return Ok(value),
            None => println!("{}", style("Responde 's' o 'n'.").yellow()),
        }
    }
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "s" | "si" | "sí" | "y" | "yes" => Some(true),
        "" | "n" | "no" => Some(false),
        _ => None,
    }
}

/// Quita las comillas que añaden algunas terminales al arrastrar una carpeta.
fn trim_quotes(input: &str) -> &str {
    input.trim_matches(|c| c == '"' || c == '\'')
}

pub fn discovery_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["▹▹▹", "▸▹▹", "▹▸▹", "▹▹▸", "▹▹▹"])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(style("Buscando documentos...").dim().to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

pub fn render_event(event: &CleanupEvent, root: &Path) {
    match event {
        CleanupEvent::Started { total } => {
            println!(
                "{}",
                style(format!("Se encontraron {total} documentos.")).bold()
            );
        }
        CleanupEvent::Processing { index, total, path } => {
            println!(
                "{} {}",
                style(format!("[{index}/{total}]")).cyan(),
                style(display_relative(path, root)).dim()
            );
        }
        CleanupEvent::Success {
            fields_cleared,
            parts_removed,
            ..
        } => {
            println!(
                "  {} {}",
                style("✔").green().bold(),
                style(format!(
                    "Limpio · {fields_cleared} propiedades vaciadas, {parts_removed} partes eliminadas"
                ))
                .green()
            );
        }
        CleanupEvent::Skipped { reason, .. } => {
            let message = match reason {
                SkipReason::Unsupported => "Omitido · formato no soportado",
                SkipReason::AlreadyProtected => "Omitido · no contiene información personal",
            };
            println!("  {} {}", style("•").yellow(), style(message).yellow());
        }
        CleanupEvent::Warning { message, .. } => {
            println!("  {} {}", style("!").yellow().bold(), style(message).yellow());
        }
        CleanupEvent::Failure { error, .. } => {
            eprintln!("  {} {}", style("✖").red().bold(), style(error).red());
        }
        CleanupEvent::Finished { .. } => println!(),
    }
}

pub fn render_summary(summary: &CleanupSummary, started_at: &str, elapsed: &str) {
    println!(
        "{} {}   {} {}",
        style("Inicio").dim(),
        started_at,
        style("Duración").dim(),
        elapsed
    );

    let failure_color = if summary.failures > 0 {
        Color::Red
    } else {
        Color::Green
    };
    let mut table = summary_table();
    for (label, count, color) in [
        ("Limpios", summary.successes, Color::Green),
        ("Omitidos", summary.skipped, Color::Yellow),
        ("Con errores", summary.failures, failure_color),
    ] {
        table.add_row(outcome_row(label, count, summary.total, color));
    }
    table.add_row(outcome_row("Total", summary.total, summary.total, Color::White));

    println!("{table}");
}

pub fn wait_for_enter() {
    print!("\n{}", style("Pulsa Enter para salir...").dim());
    let _ = io::stdout().flush();
    let mut buffer = String::new();
    let _ = io::stdin().read_line(&mut buffer);
}

fn summary_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Resultado").add_attribute(Attribute::Bold),
        Cell::new("Documentos").add_attribute(Attribute::Bold),
        Cell::new("Proporción").add_attribute(Attribute::Bold),
    ]);
    for index in 1..=2 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

fn outcome_row(label: &str, count: usize, total: usize, color: Color) -> Row {
    Row::from(vec![
        Cell::new(label).fg(Color::Cyan),
        Cell::new(count).fg(color),
        Cell::new(share(count, total)).fg(color),
    ])
}

/// Porcentaje redondeado de `count` sobre `total`; `-` si no hubo documentos.
fn share(count: usize, total: usize) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.0} %", count as f64 * 100.0 / total as f64)
}
