use crate::error::{NlFormulaError, NlFormulaResult};
use crate::session::{Session, PREVIEW_ROWS};
use crate::translator::TranslatorConfig;
use crate::types::Table;
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// Width limit for one preview cell
const MAX_CELL_WIDTH: usize = 16;

/// Shorten a cell for terminal display
fn truncate_cell(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    shortened.push('…');
    shortened
}

fn print_table_preview(table: &Table, rows: usize) {
    println!(
        "   Sheet: {}  (header row {})",
        table.sheet_name.bright_blue().bold(),
        table.header_row
    );
    println!(
        "   {} columns, {} data rows\n",
        table.columns.len(),
        table.row_count()
    );

    let header: Vec<String> = table.columns.iter().map(|c| truncate_cell(c)).collect();
    println!("   {}", header.join(" | ").cyan().bold());
    for row in table.head(rows) {
        let cells: Vec<String> = row.iter().map(|v| truncate_cell(&v.to_string())).collect();
        println!("   {}", cells.join(" | "));
    }
    println!();
}

/// Session with `file` loaded at `header`
fn open_session(
    file: &Path,
    header: usize,
    sheet: Option<String>,
    config: Option<&Path>,
) -> NlFormulaResult<Session> {
    let config = TranslatorConfig::resolve(config)?;
    let mut session = Session::new(config)?;
    session.set_sheet(sheet);
    session.load_file(file)?;
    session.preview_at(header)?;
    Ok(session)
}

/// Execute the columns command
pub fn columns(
    file: PathBuf,
    header: usize,
    sheet: Option<String>,
    rows: usize,
    as_json: bool,
) -> NlFormulaResult<()> {
    let session = open_session(&file, header, sheet, None)?;
    let Some(table) = session.table() else {
        return Err(NlFormulaError::Preview("No table loaded".to_string()));
    };

    if as_json {
        let output = json!({
            "file": file.display().to_string(),
            "sheet": table.sheet_name,
            "header_row": table.header_row,
            "columns": table.columns,
            "row_count": table.row_count(),
            "preview": table.head(rows),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "📊 nlformula - Columns".bold().green());
    println!("   File: {}", file.display());
    print_table_preview(table, rows);
    Ok(())
}

/// Execute the generate command
pub fn generate(
    file: PathBuf,
    instruction: String,
    header: usize,
    sheet: Option<String>,
    config: Option<PathBuf>,
    as_json: bool,
) -> NlFormulaResult<()> {
    let session = open_session(&file, header, sheet, config.as_deref())?;

    match session.generate(&instruction) {
        Ok(formula) => {
            if as_json {
                let output = json!({
                    "instruction": instruction,
                    "formula": formula,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", "🧮 nlformula - Generate".bold().green());
                println!("   Instruction: {}", instruction);
                println!("   Formula:     {}", formula.to_string().bright_yellow().bold());
            }
            Ok(())
        }
        Err(e) => {
            if as_json {
                let output = json!({
                    "instruction": instruction,
                    "error": e.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                eprintln!("{} {}", "❌".red(), e.to_string().red());
                if let crate::error::TranslateError::UnresolvedColumn(ctx) = &e {
                    let hint = ctx.format_hint();
                    if !hint.is_empty() {
                        eprintln!("{}", hint.yellow());
                    }
                }
            }
            Err(e.into())
        }
    }
}

/// Execute the write command
#[allow(clippy::too_many_arguments)]
pub fn write(
    file: PathBuf,
    instruction: String,
    cell: String,
    rows: Option<String>,
    header: usize,
    sheet: Option<String>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
) -> NlFormulaResult<()> {
    println!("{}", "💾 nlformula - Write formula".bold().green());
    println!("   File: {}", file.display());

    let mut session = open_session(&file, header, sheet, config.as_deref())?;
    let pending = session
        .convert(&instruction, &cell, rows.as_deref().unwrap_or(""))?
        .clone();

    println!("   Formula: {}", pending.formula.to_string().bright_yellow().bold());
    println!(
        "   Cells:   {} ({} rows)",
        pending.target.start.to_string().cyan(),
        pending.target.row_count
    );

    let written = session.save(output.as_deref())?;

    println!("{}", "✅ Saved!".bold().green());
    println!("   Excel file: {}\n", written.display());
    Ok(())
}

/// Execute the synonyms command
pub fn synonyms(config: Option<PathBuf>) -> NlFormulaResult<()> {
    let config = TranslatorConfig::resolve(config.as_deref())?;

    println!("{}", "📖 nlformula - Synonym table".bold().green());
    println!("   Fuzzy cutoff: {}", config.cutoff);
    println!("   AND keywords: {}", config.and_keywords.join(", "));
    println!("   OR keywords:  {}\n", config.or_keywords.join(", "));

    if config.synonyms.entries().is_empty() {
        println!("{}", "   (no synonyms)".yellow());
    }
    for entry in config.synonyms.entries() {
        println!(
            "   {} ← {}",
            entry.canonical.bright_blue().bold(),
            entry.synonyms.join(", ")
        );
    }
    println!();
    Ok(())
}

/// Execute the init-config command
pub fn init_config(path: PathBuf, force: bool) -> NlFormulaResult<()> {
    if path.exists() && !force {
        return Err(NlFormulaError::Config(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let yaml = TranslatorConfig::default().to_yaml()?;
    fs::write(&path, yaml)?;

    println!("{}", "✅ Config written".bold().green());
    println!("   {}", path.display());
    println!(
        "   Use it with --config or the {} environment variable\n",
        crate::translator::config::CONFIG_ENV_VAR
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_truncate_cell() {
        assert_eq!(truncate_cell("売上高"), "売上高");
        let long = "あ".repeat(20);
        let shortened = truncate_cell(&long);
        assert_eq!(shortened.chars().count(), MAX_CELL_WIDTH);
        assert!(shortened.ends_with('…'));
    }

    #[test]
    fn test_init_config_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nlformula.yaml");
        init_config(path.clone(), false).unwrap();

        let loaded = TranslatorConfig::load(&path).unwrap();
        assert_eq!(loaded, TranslatorConfig::default());
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nlformula.yaml");
        fs::write(&path, "cutoff: 0.9\n").unwrap();

        assert!(init_config(path.clone(), false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "cutoff: 0.9\n");

        init_config(path.clone(), true).unwrap();
        assert_eq!(TranslatorConfig::load(&path).unwrap().cutoff, 0.6);
    }

    #[test]
    fn test_synonyms_with_missing_config() {
        let err = synonyms(Some(PathBuf::from("/nonexistent/nlformula.yaml"))).unwrap_err();
        assert!(matches!(err, NlFormulaError::Config(_)));
    }
}
