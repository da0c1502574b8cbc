use anyhow::Result;
use chrono::{Duration, Local, TimeZone};
use microset_lib::{
    db, AppService, HistoryPeriod, Intensity, MorningStatus, RoutineDef, Unit,
};
use tempfile::TempDir;

// Helper to create a service rooted in a throwaway directory.
fn create_test_service() -> Result<(AppService, TempDir)> {
    let dir = tempfile::tempdir()?;
    let service = AppService::initialize_at(dir.path().to_path_buf())?;
    Ok((service, dir))
}

#[test]
fn test_config_defaults_merge_on_load() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "cooldown_minutes": 5, "equipment": ["dumbbells"] }"#,
    )?;
    let service = AppService::initialize_at(dir.path().to_path_buf())?;

    // Present keys preserved verbatim.
    assert_eq!(service.config.cooldown_minutes, 5);
    assert_eq!(service.config.equipment, vec!["dumbbells".to_string()]);
    // Missing keys filled from defaults.
    assert!(service.config.enabled);
    assert_eq!(service.config.theme, "fire");
    assert!(!service.config.quiet_hours.enabled);
    assert_eq!(service.config.quiet_hours.start, "22:00");
    assert_eq!(service.config.categories.len(), 6);
    Ok(())
}

#[test]
fn test_config_mutations_persist_across_reload() -> Result<()> {
    let dir = tempfile::tempdir()?;
    {
        let mut service = AppService::initialize_at(dir.path().to_path_buf())?;
        service.set_theme("ocean")?;
        service.set_weekly_pattern("upper_lower")?;
    }
    let service = AppService::initialize_at(dir.path().to_path_buf())?;
    assert_eq!(service.config.theme, "ocean");
    assert_eq!(service.config.weekly_pattern, "upper_lower");
    assert_eq!(service.config.cooldown_minutes, 30); // untouched default
    Ok(())
}

#[test]
fn test_log_exercise_shows_up_in_stats_and_journal() -> Result<()> {
    let (service, _dir) = create_test_service()?;
    service.log_exercise("pushups", 10, Unit::Reps, "upper", Intensity::Moderate, "test")?;
    service.log_exercise("plank", 45, Unit::Seconds, "core", Intensity::Moderate, "test")?;

    let stats = service.stats_today()?;
    assert_eq!(stats.exercises, 2);
    assert_eq!(stats.reps, 55);
    assert_eq!(stats.categories.get("upper").unwrap().reps, 10);
    assert_eq!(stats.categories.get("upper").unwrap().count, 1);
    assert_eq!(stats.categories.get("core").unwrap().reps, 45);

    let journal = std::fs::read_to_string(service.root().join("log.md"))?;
    assert!(journal.contains("10 pushups"));
    assert!(journal.contains("45 seconds plank"));
    Ok(())
}

#[test]
fn test_log_routine_counts_minutes() -> Result<()> {
    let (service, _dir) = create_test_service()?;
    let routine = service.find_routine("quick-burn").expect("bundled routine");
    service.log_routine(&routine, "manual")?;

    let stats = service.stats_today()?;
    assert_eq!(stats.routines, 1);
    assert_eq!(stats.routine_minutes, routine.duration_minutes);
    assert_eq!(stats.exercises, 0);
    Ok(())
}

#[test]
fn test_suggestion_pool_respects_equipment() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    let now = Local::now();

    // Bodyweight-only by default: nothing requiring gear qualifies.
    let pool = service.suggestion_pool(now)?;
    assert!(!pool.is_empty());
    assert!(pool.iter().all(|e| e.equipment.is_none()));

    service.set_equipment(vec!["dumbbells".to_string()])?;
    let pool = service.suggestion_pool(now)?;
    assert!(pool.iter().any(|e| e.name == "dumbbell rows"));
    // Kettlebell-only movements still excluded.
    assert!(!pool.iter().any(|e| e.name == "kettlebell swings"));
    Ok(())
}

#[test]
fn test_suggestion_pool_respects_categories_and_intensity() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    let now = Local::now();

    service.set_enabled_categories(&["mobility".to_string()])?;
    let pool = service.suggestion_pool(now)?;
    assert!(!pool.is_empty());
    assert!(pool.iter().all(|e| e.category == "mobility"));

    service.config_set("intensity_preference", "gentle")?;
    let pool = service.suggestion_pool(now)?;
    assert!(pool.iter().all(|e| e.intensity == Intensity::Gentle));
    Ok(())
}

#[test]
fn test_suggestion_pool_avoids_recent_completions() -> Result<()> {
    let (service, _dir) = create_test_service()?;
    let now = Local::now();

    let pool = service.suggestion_pool(now)?;
    let victim = pool.first().expect("non-empty pool").clone();
    service.log_exercise(
        &victim.name,
        victim.count,
        victim.unit,
        &victim.category,
        victim.intensity,
        "test",
    )?;

    let pool = service.suggestion_pool(now)?;
    assert!(!pool.is_empty());
    assert!(!pool.iter().any(|e| e.name == victim.name));
    Ok(())
}

#[test]
fn test_suggest_hook_writes_pending_and_honors_cooldown() -> Result<()> {
    let (service, _dir) = create_test_service()?;
    let now = Local::now();

    let first = service.suggest_for_hook(Some("writing tests"), now)?;
    assert!(first.as_deref().is_some_and(|line| !line.is_empty()));

    let pending = service.pending().expect("pending written");
    assert_eq!(pending.task_description, "writing tests");
    assert_eq!(pending.kind, "exercise");

    // Within the 30 minute default cooldown: no output, pending untouched.
    let second = service.suggest_for_hook(Some("other task"), now + Duration::minutes(5))?;
    assert!(second.is_none());
    let untouched = service.pending().expect("still pending");
    assert_eq!(untouched.suggested_at, pending.suggested_at);
    assert_eq!(untouched.task_description, "writing tests");

    // Past the cooldown: a fresh suggestion overwrites.
    let third = service.suggest_for_hook(None, now + Duration::minutes(31))?;
    assert!(third.is_some());
    let replaced = service.pending().expect("pending replaced");
    assert_eq!(replaced.task_description, "task");
    Ok(())
}

#[test]
fn test_suggest_hook_silent_when_disabled_or_quiet() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;

    service.config_set("enabled", "false")?;
    assert!(service.suggest_for_hook(None, Local::now())?.is_none());
    assert!(service.pending().is_none());

    service.config_set("enabled", "true")?;
    service.config_set("quiet_hours.enabled", "true")?;
    let late = Local.with_ymd_and_hms(2025, 3, 10, 23, 0, 0).unwrap();
    assert!(service.suggest_for_hook(None, late)?.is_none());
    assert!(service.pending().is_none());

    // Outside the window it works again.
    let midday = Local.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
    assert!(service.suggest_for_hook(None, midday)?.is_some());
    Ok(())
}

#[test]
fn test_complete_pending_records_exactly_one_completion() -> Result<()> {
    let (service, _dir) = create_test_service()?;
    service.suggest_for_hook(Some("refactoring"), Local::now())?;
    let pending = service.pending().expect("pending");

    let consumed = service.complete_pending()?.expect("consumed");
    assert_eq!(consumed.exercise.name, pending.exercise.name);
    assert!(service.pending().is_none());

    let stats = service.stats_today()?;
    assert_eq!(stats.exercises, 1);
    assert_eq!(stats.reps, pending.exercise.count);
    assert_eq!(
        stats
            .categories
            .get(&pending.exercise.category)
            .unwrap()
            .reps,
        pending.exercise.count
    );

    // Nothing pending anymore: a second complete is a no-op.
    assert!(service.complete_pending()?.is_none());
    Ok(())
}

#[test]
fn test_skip_pending_records_nothing() -> Result<()> {
    let (service, _dir) = create_test_service()?;
    service.suggest_for_hook(None, Local::now())?;
    assert!(service.pending().is_some());

    assert!(service.skip_pending()?);
    assert!(service.pending().is_none());
    assert_eq!(service.stats_today()?.exercises, 0);
    assert!(!service.skip_pending()?);
    Ok(())
}

#[test]
fn test_morning_transitions() -> Result<()> {
    let (service, _dir) = create_test_service()?;

    let state = service.day_state()?;
    assert_eq!(state.morning.status, MorningStatus::Pending);
    assert_eq!(state.date, Local::now().date_naive());

    let state = service.morning_complete(Some("Morning Wake-up"))?;
    assert_eq!(state.morning.status, MorningStatus::Completed);
    assert!(state.morning.completed_at.is_some());
    assert_eq!(state.morning.routine_used.as_deref(), Some("Morning Wake-up"));

    let state = service.morning_skip()?;
    assert_eq!(state.morning.status, MorningStatus::Skipped);
    Ok(())
}

#[test]
fn test_queue_lifecycle() -> Result<()> {
    let (service, _dir) = create_test_service()?;

    // Nothing queued yet.
    assert!(service.trigger_queue()?.is_none());
    assert!(service
        .queue_routine("no-such-routine", "big_task", None)?
        .is_none());

    let queue = service
        .queue_routine("quick-burn", "big_task", Some("shipped feature"))?
        .expect("queued");
    assert!(queue.queued);
    assert_eq!(queue.routine_name.as_deref(), Some("Quick Burn"));
    assert_eq!(queue.trigger.as_deref(), Some("big_task"));
    assert_eq!(queue.trigger_description.as_deref(), Some("shipped feature"));
    assert!(queue.queued_at.is_some());
    assert!(queue.triggered_at.is_none());

    let triggered = service.trigger_queue()?.expect("triggered");
    assert!(triggered.triggered_at.is_some());

    let cleared = service.cancel_queue()?;
    assert!(!cleared.queued);
    assert!(cleared.routine_name.is_none());
    Ok(())
}

#[test]
fn test_find_routine_by_id_and_name() -> Result<()> {
    let (service, _dir) = create_test_service()?;
    assert!(service.find_routine("quick-burn").is_some());
    assert!(service.find_routine("QUICK BURN").is_some());
    assert!(service.find_routine("Desk Reset").is_some());
    assert!(service.find_routine("nope").is_none());
    Ok(())
}

#[test]
fn test_custom_routine_gets_short_id() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    let id = service.add_custom_routine(RoutineDef {
        id: String::new(),
        name: "Hallway Shuffle".into(),
        kind: "walk".into(),
        duration_minutes: 5,
        intensity: Intensity::Gentle,
        url: None,
        exercises: Vec::new(),
        custom: true,
    })?;
    assert_eq!(id.len(), 8);
    let found = service.find_routine(&id).expect("resolvable by id");
    assert_eq!(found.name, "Hallway Shuffle");
    assert!(service.find_routine("hallway shuffle").is_some());
    Ok(())
}

#[test]
fn test_add_custom_exercise_json_validation() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;

    let err = service.add_custom_exercise_json("not json").unwrap_err();
    assert!(err.to_string().contains("Invalid JSON"));

    let err = service
        .add_custom_exercise_json(r#"{"name": "wall sits", "count": 30}"#)
        .unwrap_err();
    assert!(err.to_string().contains("Missing required field 'category'"));
    assert!(service.config.custom_exercises.is_empty());

    let def = service.add_custom_exercise_json(
        r#"{"name": "wall sits", "count": 30, "unit": "seconds",
            "category": "legs", "intensity": "moderate"}"#,
    )?;
    assert!(def.custom);
    assert_eq!(def.unit, Unit::Seconds);
    assert!(service.exercises().iter().any(|e| e.name == "wall sits"));
    Ok(())
}

#[test]
fn test_config_set_nested_via_service() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    service.config_set("quiet_hours.enabled", "true")?;

    let value = service.config_value()?;
    assert_eq!(value["quiet_hours"]["enabled"], serde_json::json!(true));
    assert_eq!(value["quiet_hours"]["start"], serde_json::json!("22:00"));
    assert_eq!(value["quiet_hours"]["end"], serde_json::json!("08:00"));

    let err = service.config_set("cooldown_minutes", "soon").unwrap_err();
    assert!(err.to_string().contains("cooldown_minutes"));
    // Failed set leaves the value untouched.
    assert_eq!(service.config.cooldown_minutes, 30);
    Ok(())
}

#[test]
fn test_history_periods_and_aggregation() -> Result<()> {
    let (service, _dir) = create_test_service()?;
    let today = Local::now().date_naive();

    service.log_exercise("pushups", 10, Unit::Reps, "upper", Intensity::Moderate, "t")?;
    service.log_exercise("squats", 15, Unit::Reps, "legs", Intensity::Moderate, "t")?;

    // An old completion, written directly to the store.
    db::add_exercise_completion(
        &service.conn,
        &db::NewExerciseCompletion {
            name: "burpees",
            count: 8,
            unit: Unit::Reps,
            category: "cardio",
            intensity: Intensity::Intense,
            task_description: "t",
            timestamp: (Local::now() - Duration::days(60)).naive_local(),
        },
    )?;

    let today_data = service.history(HistoryPeriod::Today, today)?;
    assert_eq!(today_data.total_reps, 25);
    assert_eq!(today_data.exercises.len(), 2);
    assert_eq!(today_data.category_reps[0], ("legs".to_string(), 15));

    let all_time = service.history(HistoryPeriod::AllTime, today)?;
    assert_eq!(all_time.total_reps, 33);
    assert_eq!(all_time.exercises.len(), 3);
    assert_eq!(all_time.daily_reps.len(), 2);

    let month = service.history(HistoryPeriod::Month, today)?;
    assert_eq!(month.total_reps, 25); // the 60-day-old burpees are out
    Ok(())
}

#[test]
fn test_focus_follows_weekly_pattern() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;

    // Freestyle has no schedule.
    assert!(service.focus_for_day("monday").is_none());

    service.set_weekly_pattern("upper_lower")?;
    assert_eq!(
        service.focus_for_day("monday"),
        Some(vec!["upper".to_string()])
    );
    assert_eq!(
        service.focus_for_day("saturday"),
        Some(vec!["mobility".to_string()])
    );
    Ok(())
}
