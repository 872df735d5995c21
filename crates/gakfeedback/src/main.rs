//! `gakfb` - CLI for gakfeedback
//!
//! This binary submits, lists, filters, deletes and exports feedback kept in
//! the local feedback store.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use gakfeedback::cli::{
    ClearCommand, Cli, Command, ConfigCommand, DeleteCommand, ExportCommand, FilterCommand,
    OutputFormat, SubmitCommand,
};
use gakfeedback::render::{self, notices, ListContext};
use gakfeedback::{init_logging, Config, Error, FeedbackRecord, FeedbackStore, Slot, Storage};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Submit(cmd) => handle_submit(&open_store(&config)?, &cmd),
        Command::List(cmd) => {
            let records = open_store(&config)?.list();
            if cmd.format == OutputFormat::Plain {
                println!("Feedbacks registrados: {}", records.len());
            }
            print!("{}", format_records(&records, cmd.format, ListContext::All)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Filter(cmd) => handle_filter(&open_store(&config)?, &cmd),
        Command::Delete(cmd) => handle_delete(&open_store(&config)?, &config, &cmd),
        Command::Clear(cmd) => handle_clear(&open_store(&config)?, &config, &cmd),
        Command::Export(cmd) => handle_export(&open_store(&config)?, &config, &cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<FeedbackStore<Storage>> {
    let path = config.database_path();
    let storage = Storage::open(&path)
        .with_context(|| format!("opening feedback database {}", path.display()))?;
    Ok(FeedbackStore::new(storage))
}

fn handle_submit<S: Slot>(store: &FeedbackStore<S>, cmd: &SubmitCommand) -> anyhow::Result<ExitCode> {
    match store.create(&cmd.to_form()) {
        Ok(record) => {
            println!("{}", notices::SAVED);
            println!("ID: {}", record.id);
            Ok(ExitCode::SUCCESS)
        }
        Err(Error::Validation(e)) => {
            eprintln!("{}", notices::MISSING_REQUIRED);
            eprintln!("  {e}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_filter<S: Slot>(store: &FeedbackStore<S>, cmd: &FilterCommand) -> anyhow::Result<ExitCode> {
    let records = store.filter(cmd.field.into(), &cmd.value);
    print!("{}", format_records(&records, cmd.format, ListContext::Filtered)?);
    Ok(ExitCode::SUCCESS)
}

fn handle_delete<S: Slot>(
    store: &FeedbackStore<S>,
    config: &Config,
    cmd: &DeleteCommand,
) -> anyhow::Result<ExitCode> {
    if !confirm(notices::CONFIRM_DELETE, cmd.yes || config.confirm.assume_yes)? {
        return Ok(ExitCode::SUCCESS);
    }

    if store.delete_by_id(&cmd.id)? {
        println!("{}", notices::DELETED);
    } else {
        println!("{}", notices::NOT_FOUND);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_clear<S: Slot>(
    store: &FeedbackStore<S>,
    config: &Config,
    cmd: &ClearCommand,
) -> anyhow::Result<ExitCode> {
    let count = store.count();
    if count == 0 && !store.has_content()? {
        println!("{}", notices::NOTHING_TO_CLEAR);
        return Ok(ExitCode::SUCCESS);
    }

    if confirm(
        &notices::confirm_clear(count),
        cmd.yes || config.confirm.assume_yes,
    )? {
        store.clear()?;
        println!("{}", notices::CLEARED);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_export<S: Slot>(
    store: &FeedbackStore<S>,
    config: &Config,
    cmd: &ExportCommand,
) -> anyhow::Result<ExitCode> {
    let Some(snapshot) = store.export()? else {
        println!("{}", notices::NOTHING_TO_EXPORT);
        return Ok(ExitCode::SUCCESS);
    };

    if cmd.stdout {
        println!("{}", snapshot.content);
        return Ok(ExitCode::SUCCESS);
    }

    let dir = cmd.output.clone().unwrap_or_else(|| config.export_dir());
    let path = write_export(&dir, &snapshot.file_name, &snapshot.content)?;
    println!("{}", notices::exported(snapshot.count));
    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn write_export(dir: &Path, file_name: &str, content: &str) -> anyhow::Result<std::path::PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating export directory {}", dir.display()))?;
    let path = dir.join(file_name);
    std::fs::write(&path, content)
        .with_context(|| format!("writing export file {}", path.display()))?;
    Ok(path)
}

fn format_records(
    records: &[FeedbackRecord],
    format: OutputFormat,
    context: ListContext,
) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Plain => render::render_list_text(records, context),
        OutputFormat::Html => render::render_list_html(records, context),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(records)?),
    })
}

/// Ask a yes/no question on the terminal. Anything but an explicit yes is a no.
fn confirm(prompt: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    let mut stderr = io::stderr();
    write!(stderr, "{prompt}\n[s/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    ))
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<ExitCode> {
    let path = config.database_path();
    let store = open_store(config)?;
    let stats = store.slot().stats()?;
    let count = store.count();

    if json {
        let status = serde_json::json!({
            "database_path": path,
            "feedback_count": count,
            "slot_count": stats.slot_count,
            "stored_bytes": stats.stored_bytes,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("gakfb status");
        println!("------------");
        println!("Database:      {}", path.display());
        println!("Feedbacks:     {count}");
        println!("Stored bytes:  {}", stats.stored_bytes);
        println!("Database size: {}", stats.db_size_bytes);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Export]");
                println!("  Directory:          {}", config.export_dir().display());
                println!();
                println!("[Confirm]");
                println!("  Assume yes:         {}", config.confirm.assume_yes);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
