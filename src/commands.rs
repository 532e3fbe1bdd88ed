use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::cli::{ConvertArgs, ValidateArgs};
use crate::convert::{ConvertOptions, convert_file};
use crate::formats::Template;
use crate::validate::{ValidationResult, validate_bytes};

pub fn convert(args: ConvertArgs) -> anyhow::Result<()> {
    let input_path = PathBuf::from(&args.input);
    let output_path = absolute(Path::new(&args.output))?;

    let options = ConvertOptions {
        category: args.category,
        topic_identity: args.topic_identity,
    };

    tracing::info!(input = %input_path.display(), "converting csv");
    let template = convert_file(&input_path, &args.name, &args.description, &options)
        .with_context(|| format!("convert csv: {}", input_path.display()))?;

    write_json_atomic(&output_path, &template).context("write template json")?;

    let mut stdout = std::io::stdout().lock();
    print_summary(&mut stdout, &output_path, &template).context("print summary")?;

    Ok(())
}

pub fn validate(args: ValidateArgs) -> anyhow::Result<()> {
    let input_path = PathBuf::from(&args.input);
    let bytes = std::fs::read(&input_path)
        .with_context(|| format!("read csv: {}", input_path.display()))?;

    let result = validate_bytes(&bytes);

    let mut stdout = std::io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &result).context("serialize validation result")?;
        writeln!(stdout).context("write newline")?;
    } else {
        print_report(&mut stdout, &result).context("print validation report")?;
    }

    if !result.is_valid {
        anyhow::bail!(
            "{} is invalid ({} errors)",
            input_path.display(),
            result.errors.len()
        );
    }

    Ok(())
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("resolve path: {}", path.display()))
}

fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    let data = serde_json::to_vec_pretty(value).context("serialize json")?;
    std::fs::write(&tmp_path, &data)
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}

fn print_summary(
    out: &mut impl std::io::Write,
    output_path: &Path,
    template: &Template,
) -> std::io::Result<()> {
    let summary = template.summary();
    writeln!(out, "✓ Template JSON written to {}", output_path.display())?;
    writeln!(out, "  ID: {}", template.id)?;
    writeln!(out, "  Name: {}", template.name)?;
    writeln!(out, "  Description: {}", template.description)?;
    writeln!(out, "  Category: {}", template.category)?;
    writeln!(out, "  Phases: {}", summary.phases)?;
    writeln!(out, "  Sections: {}", summary.sections)?;
    writeln!(out, "  Topics: {}", summary.topics)?;
    writeln!(out, "  Tags: {}", summary.tags)?;
    Ok(())
}

fn print_report(out: &mut impl std::io::Write, result: &ValidationResult) -> std::io::Result<()> {
    if result.is_valid {
        writeln!(out, "✓ CSV is valid")?;
    } else {
        writeln!(out, "✗ CSV is invalid")?;
    }
    for error in &result.errors {
        writeln!(out, "  error: {error}")?;
    }
    for warning in &result.warnings {
        writeln!(out, "  warning: {warning}")?;
    }
    if let Some(stats) = &result.statistics {
        writeln!(out, "  Rows: {}", stats.total_rows)?;
        writeln!(out, "  Phases: {}", stats.phase_count)?;
        writeln!(out, "  Sections: {}", stats.section_count)?;
        writeln!(out, "  Topics: {}", stats.topic_count)?;
    }
    Ok(())
}
