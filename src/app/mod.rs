mod display;
mod import;
mod ops;
mod session;


use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{FixedOffset, Local, Offset, Utc};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::db::{ChannelRecord, Database};
use crate::timeline::transforms::suggest_weights;
use crate::timeline::{MetadataClassifier, group, total_duration};

use self::display::{
    format_duration, format_last_updated, format_timestamp, program_label, truncate,
};
use self::import::ImportedChannel;
use self::ops::EditOp;
use self::session::EditSession;

pub fn run(cli: Cli, config: &Config) -> Result<()> {
    let db = open_db(config)?;
    let now = Utc::now().timestamp_millis();
    let offset = Local::now().offset().fix();

    match cli.command {
        Command::Import { file, number } => run_import(&db, config, &file, number)?,
        Command::Export { number, output } => run_export(&db, number, output.as_deref())?,
        Command::List => run_list(&db, offset)?,
        Command::Show { number, limit } => run_show(&db, number, limit, now, offset)?,
        Command::Shows { number } => run_shows(&db, number)?,
        Command::Edit {
            number,
            ops,
            dry_run,
        } => run_edit(&db, config, number, &ops, dry_run, now, offset)?,
        Command::Delete { number } => {
            if db.delete_channel(number)? {
                println!("Deleted channel {number}.");
            } else {
                println!("No channel {number}.");
            }
        }
    }

    Ok(())
}

fn run_import(db: &Database, config: &Config, file: &Path, number: Option<u32>) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let imported: ImportedChannel = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse channel record {}", file.display()))?;
    let (mut record, dropped) = imported.into_record();
    if let Some(number) = number {
        record.number = number;
    }

    if record.programs.len() > config.max_programs {
        bail!(
            "channel has {} programs, the limit is {}",
            record.programs.len(),
            config.max_programs
        );
    }
    db.save_channel(&record)?;
    println!(
        "Imported channel {} ({} programs, {} dropped).",
        record.number,
        record.programs.len(),
        dropped
    );
    Ok(())
}

fn run_export(db: &Database, number: u32, output: Option<&Path>) -> Result<()> {
    let record = load_channel(db, number)?;
    let json = serde_json::to_string_pretty(&record).context("failed to encode channel record")?;
    match output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported channel {number} to {}.", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_list(db: &Database, offset: FixedOffset) -> Result<()> {
    let channels = db.list_channels()?;
    if channels.is_empty() {
        println!("No channels yet. Run `chanplan import` first.");
        return Ok(());
    }

    println!(
        "{:<8} {:<32} {:>9} {:>14} {:<24}",
        "NUMBER", "NAME", "PROGRAMS", "DURATION", "UPDATED"
    );
    for channel in channels {
        println!(
            "{:<8} {:<32} {:>9} {:>14} {:<24}",
            channel.number,
            truncate(&channel.name, 32),
            channel.program_count,
            format_duration(channel.duration),
            format_last_updated(&channel.updated_at, offset)
        );
    }
    Ok(())
}

fn run_show(db: &Database, number: u32, limit: usize, now: i64, offset: FixedOffset) -> Result<()> {
    let record = load_channel(db, number)?;
    let mut session = EditSession::new(
        record.programs,
        record.start_time,
        record.on_demand,
        now,
        offset,
    );
    session.recover_now();
    let timeline = session.timeline();

    println!(
        "Channel {} - {} ({} programs, loop {}{})",
        record.number,
        record.name,
        timeline.slots.len(),
        format_duration(timeline.duration),
        if timeline.has_offline { ", with offline time" } else { "" }
    );
    if timeline.slots.is_empty() {
        println!("Nothing scheduled.");
        return Ok(());
    }
    let airing = timeline.airing_at(now).map(|slot| slot.index);
    println!("{:<20} {:>12}  {}", "START", "LENGTH", "PROGRAM");
    for slot in timeline.slots.iter().take(limit) {
        let marker = if airing == Some(slot.index) { ">" } else { " " };
        println!(
            "{marker}{:<19} {:>12}  {}",
            format_timestamp(slot.start, offset),
            format_duration(slot.effective_duration),
            truncate(&program_label(&session.programs()[slot.index]), 60)
        );
    }
    if timeline.slots.len() > limit {
        println!("... {} more", timeline.slots.len() - limit);
    }
    println!(
        "Loop restarts at {}.",
        format_timestamp(timeline.end_time(), offset)
    );
    Ok(())
}

fn run_shows(db: &Database, number: u32) -> Result<()> {
    let record = load_channel(db, number)?;
    let suggestions = suggest_weights(&record.programs, &MetadataClassifier);
    if suggestions.is_empty() {
        println!("Channel {number} has no shows.");
        return Ok(());
    }

    let airtime: Vec<i64> = group(&record.programs, &MetadataClassifier)
        .values()
        .map(|episodes| total_duration(episodes))
        .collect();
    println!(
        "{:<36} {:<28} {:>8} {:>14} {:>6}",
        "SHOW ID", "NAME", "ITEMS", "AIRTIME", "WEIGHT"
    );
    for (suggestion, airtime) in suggestions.iter().zip(airtime) {
        let name = if suggestion.special_category {
            format!("{} *", suggestion.display_name)
        } else {
            suggestion.display_name.clone()
        };
        println!(
            "{:<36} {:<28} {:>8} {:>14} {:>6}",
            truncate(&suggestion.show_id, 36),
            truncate(&name, 28),
            suggestion.episodes,
            format_duration(airtime),
            suggestion.weight
        );
    }
    Ok(())
}

fn run_edit(
    db: &Database,
    config: &Config,
    number: u32,
    raw_ops: &[String],
    dry_run: bool,
    now: i64,
    offset: FixedOffset,
) -> Result<()> {
    let ops = raw_ops
        .iter()
        .map(|raw| raw.parse::<EditOp>().map_err(anyhow::Error::msg))
        .collect::<Result<Vec<_>>>()?;

    let record = load_channel(db, number)?;
    let mut session = EditSession::new(
        record.programs,
        record.start_time,
        record.on_demand.clone(),
        now,
        offset,
    )
    .with_limits(config.max_programs, config.default_weight);
    session.recover_now();

    let mut rng = rand::thread_rng();
    for (op, raw) in ops.iter().zip(raw_ops) {
        session
            .apply(op, &mut rng)
            .with_context(|| format!("failed to apply '{raw}'"))?;
    }
    let timeline = session.timeline();
    let edited = ChannelRecord {
        number,
        name: record.name,
        start_time: session.start_time(),
        duration: timeline.duration,
        programs: session.programs().to_vec(),
        on_demand: record.on_demand,
    };
    if dry_run {
        println!(
            "Dry run: channel {number} would have {} programs, loop {}, starting {}.",
            edited.programs.len(),
            format_duration(edited.duration),
            format_timestamp(edited.start_time, offset)
        );
        return Ok(());
    }
    db.save_channel(&edited)?;
    println!(
        "Saved channel {number}: {} programs, loop {}.",
        edited.programs.len(),
        format_duration(edited.duration)
    );
    Ok(())
}

fn load_channel(db: &Database, number: u32) -> Result<ChannelRecord> {
    db.load_channel(number)?
        .with_context(|| format!("channel {number} does not exist"))
}

fn open_db(config: &Config) -> Result<Database> {
    let db_path = config.database_path()?;
    let db = Database::open(&db_path)?;
    db.migrate()?;
    Ok(db)
}
