//! `profmatch run` / `profmatch validate`: config-driven resolution.

use std::path::{Path, PathBuf};

use profmatch_resolve::load::{load_reference_fields, load_source_rows};
use profmatch_resolve::{ResolveConfig, ResolveInput, ResolveResult};

use profmatch_cli::{export, util};

use crate::exit_codes::{EXIT_RESOLVE_INVALID_CONFIG, EXIT_RESOLVE_RUNTIME, EXIT_RESOLVE_UNMATCHED};
use crate::CliError;

fn resolve_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn load_config(config_path: &Path) -> Result<ResolveConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        resolve_err(EXIT_RESOLVE_RUNTIME, format!("cannot read config {}: {e}", config_path.display()))
    })?;
    ResolveConfig::from_toml(&config_str).map_err(|e| {
        CliError {
            code: EXIT_RESOLVE_INVALID_CONFIG,
            message: e.to_string(),
            hint: Some(format!("check {}", config_path.display())),
        }
    })
}

fn read_data(path: &Path) -> Result<String, CliError> {
    util::read_file_as_utf8(path)
        .map_err(|e| resolve_err(EXIT_RESOLVE_RUNTIME, format!("cannot read {}: {e}", path.display())))
}

fn write_output(path: &Path, contents: &str, quiet: bool) -> Result<(), CliError> {
    std::fs::write(path, contents)
        .map_err(|e| resolve_err(EXIT_RESOLVE_RUNTIME, format!("cannot write {}: {e}", path.display())))?;
    if !quiet {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    strict: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;

    // Data and output paths are relative to the config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let source_data = read_data(&base_dir.join(&config.source.file))?;
    let records = load_source_rows(&source_data, &config.source)
        .map_err(|e| resolve_err(EXIT_RESOLVE_RUNTIME, e.to_string()))?;

    let reference_data = read_data(&base_dir.join(&config.reference.file))?;
    let reference_fields = load_reference_fields(&reference_data, &config.reference)
        .map_err(|e| resolve_err(EXIT_RESOLVE_RUNTIME, e.to_string()))?;

    let input = ResolveInput { records, reference_fields };
    let result = profmatch_resolve::run(&config, &input)
        .map_err(|e| resolve_err(EXIT_RESOLVE_RUNTIME, e.to_string()))?;

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| resolve_err(EXIT_RESOLVE_RUNTIME, format!("JSON serialization error: {e}")))?;

    if let Some(ref csv_file) = config.output.csv {
        let headers = export::csv_headers(&source_data)
            .map_err(|e| resolve_err(EXIT_RESOLVE_RUNTIME, format!("source: {e}")))?;
        let csv_str = export::write_csv(&headers, &result.records)
            .map_err(|e| resolve_err(EXIT_RESOLVE_RUNTIME, format!("CSV export error: {e}")))?;
        write_output(&base_dir.join(csv_file), &csv_str, quiet)?;
    }

    if let Some(ref sql) = config.output.sql {
        let sql_str = export::write_sql(sql, &result.records);
        write_output(&base_dir.join(&sql.file), &sql_str, quiet)?;
    }

    if let Some(ref json_file) = config.output.json {
        write_output(&base_dir.join(json_file), &json_str, quiet)?;
    }

    if let Some(ref path) = output_file {
        write_output(path, &json_str, quiet)?;
    }

    if json_output {
        println!("{json_str}");
    }

    if !quiet {
        print_summary(&result);
    }

    if strict && result.summary.unmatched > 0 {
        return Err(CliError {
            code: EXIT_RESOLVE_UNMATCHED,
            message: format!("{} unmatched records", result.summary.unmatched),
            hint: Some("lower matching.score_cutoff or inspect records with kind \"none\"".into()),
        });
    }

    Ok(())
}

fn print_summary(result: &ResolveResult) {
    let s = &result.summary;
    eprintln!(
        "{}: {} records against {} reference names: {} matched ({} exact, {} fuzzy), {} unmatched ({} without a name)",
        result.meta.config_name,
        s.total,
        result.meta.reference_pool_size,
        s.matched(),
        s.exact,
        s.fuzzy,
        s.unmatched,
        s.no_name,
    );
    eprintln!(
        "confidence: {} high (>=90), {} medium (80-89), {} low (<80)",
        s.high_confidence, s.medium_confidence, s.low_confidence,
    );
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;

    let aliases = config
        .department_aliases()
        .map_err(|e| resolve_err(EXIT_RESOLVE_INVALID_CONFIG, e.to_string()))?;

    eprintln!("config valid: \"{}\"", config.name);
    eprintln!(
        "  source:    {} (id={}, first={}, last={})",
        config.source.file,
        config.source.columns.record_id,
        config.source.columns.first_name,
        config.source.columns.last_name,
    );
    eprintln!(
        "  reference: {} (column={}, separator={:?})",
        config.reference.file, config.reference.column, config.reference.separator,
    );
    eprintln!(
        "  matching:  cutoff={}, early_exit={}, policy={}, parallel={}",
        config.matching.score_cutoff,
        config.matching.early_exit_score,
        config.matching.policy,
        config.matching.parallel,
    );
    if !aliases.is_empty() {
        eprintln!(
            "  departments: {} canonical, {} lookup keys",
            config.departments.len(),
            aliases.len()
        );
    }

    Ok(())
}
