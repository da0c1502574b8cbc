// src/commands.rs
//! One-shot subcommand handlers. These print JSON (or a single plain
//! line for `suggest`) so external automation can parse the output.

use anyhow::{bail, Result};
use chrono::Local;
use microset_lib::{weekday_name, AppService};
use serde_json::json;

use crate::cli::Commands;

pub fn dispatch(service: &mut AppService, command: Commands) -> Result<()> {
    match command {
        Commands::Suggest { task } => cmd_suggest(service, task.as_deref()),
        Commands::LogComplete => cmd_log_complete(service),
        Commands::LogSkip => cmd_log_skip(service),
        Commands::ConfigGet => cmd_config_get(service),
        Commands::ConfigSet { key, value } => cmd_config_set(service, &key, &value),
        Commands::ConfigAdd { key, value } => cmd_config_add(service, &key, &value),
        Commands::ConfigRemove { key, value } => cmd_config_remove(service, &key, &value),
        Commands::AddExercise { json } => cmd_add_exercise(service, &json),
        Commands::Stats => cmd_stats(service),
        Commands::Morning {
            status,
            complete,
            skip,
            routine,
        } => cmd_morning(service, status, complete, skip, routine.as_deref()),
        Commands::Queue {
            routine_id,
            trigger,
            cancel,
            trigger_type,
            description,
        } => cmd_queue(
            service,
            routine_id.as_deref(),
            trigger,
            cancel,
            &trigger_type,
            description.as_deref(),
        ),
        Commands::Day => cmd_day(service),
        Commands::GenerateCompletion { .. } => {
            // Handled in main before the service is initialized.
            unreachable!("completion generation should have exited already");
        }
    }
}

/// Prints one suggestion line, or nothing when disabled, cooling down,
/// or inside quiet hours.
fn cmd_suggest(service: &AppService, task: Option<&str>) -> Result<()> {
    if let Some(line) = service.suggest_for_hook(task, Local::now())? {
        println!("{line}");
    }
    Ok(())
}

fn cmd_log_complete(service: &AppService) -> Result<()> {
    service.complete_pending()?;
    Ok(())
}

fn cmd_log_skip(service: &AppService) -> Result<()> {
    service.skip_pending()?;
    Ok(())
}

fn cmd_config_get(service: &AppService) -> Result<()> {
    let value = service.config_value()?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_config_set(service: &mut AppService, key: &str, value: &str) -> Result<()> {
    match service.config_set(key, value) {
        Ok(parsed) => {
            println!("Set {key} = {}", serde_json::to_string(&parsed)?);
            Ok(())
        }
        Err(e) => bail!("Error setting '{key}': {e}"),
    }
}

fn cmd_config_add(service: &mut AppService, key: &str, value: &str) -> Result<()> {
    match service.config_add(key, value) {
        Ok((parsed, true)) => {
            println!("Added {} to {key}", serde_json::to_string(&parsed)?);
            Ok(())
        }
        Ok((parsed, false)) => {
            println!("{} already in {key}", serde_json::to_string(&parsed)?);
            Ok(())
        }
        Err(e) => bail!("Error: {e}"),
    }
}

fn cmd_config_remove(service: &mut AppService, key: &str, value: &str) -> Result<()> {
    match service.config_remove(key, value) {
        Ok((parsed, true)) => {
            println!("Removed {} from {key}", serde_json::to_string(&parsed)?);
            Ok(())
        }
        Ok((parsed, false)) => {
            println!("{} not in {key}", serde_json::to_string(&parsed)?);
            Ok(())
        }
        Err(e) => bail!("Error: {e}"),
    }
}

fn cmd_add_exercise(service: &mut AppService, json: &str) -> Result<()> {
    match service.add_custom_exercise_json(json) {
        Ok(def) => {
            println!("Added custom exercise: {}", def.name);
            Ok(())
        }
        Err(e) => bail!("Error: {e}"),
    }
}

fn cmd_stats(service: &AppService) -> Result<()> {
    let stats = service.stats_today()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn cmd_morning(
    service: &AppService,
    _status: bool,
    complete: bool,
    skip: bool,
    routine: Option<&str>,
) -> Result<()> {
    if complete {
        let state = service.morning_complete(routine)?;
        let body = json!({
            "success": true,
            "status": state.morning.status,
            "routine": routine,
        });
        println!("{}", serde_json::to_string(&body)?);
    } else if skip {
        let state = service.morning_skip()?;
        let body = json!({ "success": true, "status": state.morning.status });
        println!("{}", serde_json::to_string(&body)?);
    } else {
        // Default: status.
        let state = service.day_state()?;
        let body = json!({
            "date": state.date,
            "status": state.morning.status,
            "completed_at": state.morning.completed_at,
            "routine_used": state.morning.routine_used,
            "todays_focus": service.todays_focus(),
            "day_of_week": weekday_name(Local::now()),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    }
    Ok(())
}

fn cmd_queue(
    service: &AppService,
    routine_id: Option<&str>,
    trigger: bool,
    cancel: bool,
    trigger_type: &str,
    description: Option<&str>,
) -> Result<()> {
    let body = if trigger {
        match service.trigger_queue()? {
            Some(queue) => json!({
                "success": true,
                "triggered": true,
                "routine_name": queue.routine_name,
                "duration_minutes": queue.duration_minutes,
            }),
            None => json!({ "success": false, "error": "No workout queued" }),
        }
    } else if cancel {
        service.cancel_queue()?;
        json!({ "success": true, "cancelled": true })
    } else if let Some(identifier) = routine_id {
        match service.queue_routine(identifier, trigger_type, description)? {
            Some(queue) => json!({
                "success": true,
                "queued": true,
                "routine_name": queue.routine_name,
                "duration_minutes": queue.duration_minutes,
                "trigger": queue.trigger,
                "trigger_description": queue.trigger_description,
            }),
            None => json!({
                "success": false,
                "error": format!("Routine not found: {identifier}"),
            }),
        }
    } else {
        serde_json::to_value(service.day_state()?.workout_queue)?
    };
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn cmd_day(service: &AppService) -> Result<()> {
    let state = service.day_state()?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
