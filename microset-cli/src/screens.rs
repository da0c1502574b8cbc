// src/screens.rs
//! Interactive flows: the main loop and every screen it dispatches to.
//! Screens are iterative `loop`s over menu widgets; cancelling a
//! widget returns control to the screen's caller, never further out.

use anyhow::Result;
use chrono::Local;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use crossterm::style::Stylize;
use microset_lib::{
    AppService, ExerciseDef, HistoryPeriod, Intensity, IntensityPreference, RoutineDef,
    RoutineExercise, Unit,
};

use crate::menu::{self, MenuItem, MultiSelectMenu, SelectMenu, TextPrompt};
use crate::theme;

#[derive(Clone, Copy, PartialEq, Eq)]
enum MainAction {
    LogExercise,
    LogRoutine,
    Suggest,
    Stats,
    History,
    Config,
    Quit,
}

/// The main menu loop. Returns when the user quits or cancels out.
pub fn run_interactive(service: &mut AppService) -> Result<()> {
    theme::print_welcome(service);

    loop {
        menu::clear_screen();
        print_header(service);

        let items = vec![
            MenuItem::new(
                "Log Exercise",
                "Record a completed exercise",
                MainAction::LogExercise,
            ),
            MenuItem::new(
                "Log Routine",
                "Record a completed routine",
                MainAction::LogRoutine,
            ),
            MenuItem::new(
                "Suggest",
                "Get a random exercise suggestion",
                MainAction::Suggest,
            ),
            MenuItem::new("Stats", "View today's workout stats", MainAction::Stats),
            MenuItem::new("History", "View recent activity", MainAction::History),
            MenuItem::new("Config", "View and edit configuration", MainAction::Config),
            MenuItem::new("Quit", "Exit", MainAction::Quit),
        ];

        let choice = SelectMenu::new("", items).run()?;
        match choice {
            None | Some(MainAction::Quit) => break,
            Some(MainAction::LogExercise) => log_exercise_flow(service)?,
            Some(MainAction::LogRoutine) => log_routine_flow(service)?,
            Some(MainAction::Suggest) => suggest_flow(service)?,
            Some(MainAction::Stats) => stats_screen(service)?,
            Some(MainAction::History) => history_screen(service)?,
            Some(MainAction::Config) => config_screen(service)?,
        }
    }

    println!("\n  Stay strong! 💪\n");
    Ok(())
}

fn print_header(service: &AppService) {
    let theme = theme::current(service);
    println!();
    theme::print_logo(theme);
    println!();
    if let Ok(stats) = service.stats_today() {
        println!(
            "  {} {} reps · {} exercises · {} routines",
            "Today:".with(theme.accent),
            stats.reps,
            stats.exercises,
            stats.routines
        );
    }
    if let Some(focus) = service.todays_focus() {
        if !focus.is_empty() {
            println!("  {} {}", "Focus:".with(theme.accent), focus.join(", "));
        }
    }
    println!();
}

fn exercise_menu_items(exercises: Vec<ExerciseDef>) -> Vec<MenuItem<ExerciseDef>> {
    exercises
        .into_iter()
        .map(|e| {
            let description = format!(
                "{} · {} · {}",
                e.unit.display_count(e.count),
                e.category,
                e.intensity
            );
            MenuItem::new(e.name.clone(), description, e)
        })
        .collect()
}

// --- Logging flows ---

fn log_exercise_flow(service: &mut AppService) -> Result<()> {
    let items = exercise_menu_items(service.exercises());
    let Some(exercise) = SelectMenu::new("Select exercise to log", items).run()? else {
        return Ok(());
    };

    let Some(count) = menu::prompt_number("How many?", exercise.count)? else {
        return Ok(());
    };

    service.log_exercise(
        &exercise.name,
        count,
        exercise.unit,
        &exercise.category,
        exercise.intensity,
        "manual",
    )?;

    println!("\n  ✓ Logged: {} {}\n", count, exercise.name);
    let stats = service.stats_today()?;
    println!(
        "  Today: {} reps, {} exercises\n",
        stats.reps, stats.exercises
    );
    menu::press_any_key()
}

fn log_routine_flow(service: &mut AppService) -> Result<()> {
    let items: Vec<MenuItem<RoutineDef>> = service
        .routines()
        .into_iter()
        .map(|r| {
            let label = if r.url.is_some() {
                format!("{} 🔗", r.name)
            } else {
                r.name.clone()
            };
            let description = format!("{} min · {} · {}", r.duration_minutes, r.kind, r.intensity);
            MenuItem::new(label, description, r)
        })
        .collect();

    let Some(routine) = SelectMenu::new("Select routine to log", items).run()? else {
        return Ok(());
    };

    print_routine_details(&routine);

    let confirm = vec![
        MenuItem::new("Log completion", "Mark this routine as done", true),
        MenuItem::new("Back", "Return without logging", false),
    ];
    if SelectMenu::new("", confirm).run()? != Some(true) {
        return Ok(());
    }

    service.log_routine(&routine, "manual")?;
    println!(
        "\n  ✓ Logged: {} ({} min)\n",
        routine.name, routine.duration_minutes
    );
    menu::press_any_key()
}

fn print_routine_details(routine: &RoutineDef) {
    println!();
    println!("  {}", routine.name.as_str().bold());
    println!("  ─────────────────────");
    println!("  {} min · {}", routine.duration_minutes, routine.intensity);
    if let Some(url) = &routine.url {
        println!("  Link: {url}");
    }
    if !routine.exercises.is_empty() {
        println!("  Exercises:");
        for exercise in &routine.exercises {
            println!(
                "    • {} {}",
                exercise.unit.display_count(exercise.count),
                exercise.name
            );
        }
    }
    println!();
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SuggestChoice {
    Log,
    Another,
    Back,
}

fn suggest_flow(service: &mut AppService) -> Result<()> {
    loop {
        let Some(exercise) = service.pick_suggestion(Local::now())? else {
            println!("\n  No exercises match current filters.\n");
            return menu::press_any_key();
        };

        let display = exercise.display_line();
        println!();
        println!("  ╭─ Try This ──────────────────────╮");
        println!("  │  {display:<30} │");
        println!("  ╰─────────────────────────────────╯");
        println!("  {} · {}", exercise.category, exercise.intensity);
        println!();

        let items = vec![
            MenuItem::new("Log it", "Record this exercise", SuggestChoice::Log),
            MenuItem::new("Another", "Get a different suggestion", SuggestChoice::Another),
            MenuItem::new("Back", "Return to main menu", SuggestChoice::Back),
        ];
        match SelectMenu::new("", items).run()? {
            Some(SuggestChoice::Log) => {
                service.log_exercise(
                    &exercise.name,
                    exercise.count,
                    exercise.unit,
                    &exercise.category,
                    exercise.intensity,
                    "manual",
                )?;
                println!("\n  ✓ Logged: {display}\n");
                return menu::press_any_key();
            }
            Some(SuggestChoice::Another) => continue,
            _ => return Ok(()),
        }
    }
}

// --- Stats & history ---

fn stats_screen(service: &AppService) -> Result<()> {
    let stats = service.stats_today()?;
    println!();
    println!("  Today's Gains");
    println!("  ─────────────");
    print!(
        "  {} reps · {} exercises · {} routines",
        stats.reps, stats.exercises, stats.routines
    );
    if stats.routine_minutes > 0 {
        println!(" · {} min", stats.routine_minutes);
    } else {
        println!();
    }
    if let Some(focus) = service.todays_focus() {
        if !focus.is_empty() {
            println!("  Focus: {}", focus.join(", "));
        }
    }
    println!();
    menu::press_any_key()
}

fn history_screen(service: &AppService) -> Result<()> {
    menu::clear_screen();
    let mut view = menu::TabbedView::new();
    for period in [
        HistoryPeriod::Today,
        HistoryPeriod::Week,
        HistoryPeriod::Month,
        HistoryPeriod::AllTime,
    ] {
        view = view.tab(period.label(), move || render_history_tab(service, period));
    }
    view.run()
}

fn render_history_tab(service: &AppService, period: HistoryPeriod) -> String {
    let today = Local::now().date_naive();
    let data = match service.history(period, today) {
        Ok(data) => data,
        Err(e) => return format!("  History unavailable: {e}"),
    };

    let mut lines = Vec::new();
    lines.push(format!(
        "  {} reps · {} routines · {} min",
        data.total_reps, data.total_routines, data.total_routine_minutes
    ));
    lines.push(String::new());

    if !data.category_reps.is_empty() {
        lines.push("  By Category:".to_string());
        lines.push(render_bar_chart(&data.category_reps, 30));
        lines.push(String::new());
    }

    if period != HistoryPeriod::Today && !data.daily_reps.is_empty() {
        lines.push("  By Day:".to_string());
        let recent_days: Vec<(String, u32)> = data
            .daily_reps
            .iter()
            .rev()
            .take(7)
            .rev()
            .map(|(date, reps)| (date.format("%m/%d").to_string(), *reps))
            .collect();
        lines.push(render_bar_chart(&recent_days, 20));
        lines.push(String::new());
    }

    lines.push("  Recent Activity:".to_string());
    if data.exercises.is_empty() && data.routines.is_empty() {
        lines.push("  No activity yet.".to_string());
        return lines.join("\n");
    }

    let time_format = if period == HistoryPeriod::Today {
        "%H:%M"
    } else {
        "%m/%d %H:%M"
    };
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["When", "Entry"]);
    for completion in data.exercises.iter().take(8) {
        let entry = match completion.unit {
            Unit::Reps => format!("{} {}", completion.count, completion.name),
            unit => format!("{} {} {}", completion.count, unit, completion.name),
        };
        table.add_row(vec![
            completion.timestamp.format(time_format).to_string(),
            entry,
        ]);
    }
    for routine in data.routines.iter().take(4) {
        table.add_row(vec![
            routine.timestamp.format(time_format).to_string(),
            format!("🏋 {} ({} min)", routine.routine_name, routine.duration_minutes),
        ]);
    }
    lines.push(table.to_string());

    lines.join("\n")
}

fn render_bar_chart(data: &[(String, u32)], max_width: usize) -> String {
    if data.is_empty() {
        return "  [No data]".to_string();
    }
    let max = data.iter().map(|(_, v)| *v).max().unwrap_or(1).max(1);
    data.iter()
        .map(|(label, value)| {
            let width = (*value as usize * max_width) / max as usize;
            format!("  {label:<12} {} {value}", "█".repeat(width))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// --- Configuration screens ---

#[derive(Clone, Copy, PartialEq, Eq)]
enum ConfigAction {
    Theme,
    Equipment,
    Intensity,
    Pattern,
    Categories,
    CustomExercises,
    CustomRoutines,
    Back,
}

fn config_screen(service: &mut AppService) -> Result<()> {
    loop {
        menu::clear_screen();
        print_config_summary(service);

        let custom_ex = service.config.custom_exercises.len();
        let custom_rt = service.config.custom_routines.len();
        let items = vec![
            MenuItem::new("Theme", "Change color theme", ConfigAction::Theme),
            MenuItem::new("Equipment", "Manage your equipment", ConfigAction::Equipment),
            MenuItem::new(
                "Intensity",
                "Set intensity preference",
                ConfigAction::Intensity,
            ),
            MenuItem::new("Pattern", "Set weekly pattern", ConfigAction::Pattern),
            MenuItem::new(
                "Categories",
                "Toggle exercise categories",
                ConfigAction::Categories,
            ),
            MenuItem::new(
                "Custom Exercises",
                format!("Add/remove exercises ({custom_ex} custom)"),
                ConfigAction::CustomExercises,
            ),
            MenuItem::new(
                "Custom Routines",
                format!("Add/remove routines ({custom_rt} custom)"),
                ConfigAction::CustomRoutines,
            ),
            MenuItem::new("Back", "Return to main menu", ConfigAction::Back),
        ];

        match SelectMenu::new("Edit configuration", items).run()? {
            None | Some(ConfigAction::Back) => return Ok(()),
            Some(ConfigAction::Theme) => configure_theme(service)?,
            Some(ConfigAction::Equipment) => configure_equipment(service)?,
            Some(ConfigAction::Intensity) => configure_intensity(service)?,
            Some(ConfigAction::Pattern) => configure_pattern(service)?,
            Some(ConfigAction::Categories) => configure_categories(service)?,
            Some(ConfigAction::CustomExercises) => custom_exercises_screen(service)?,
            Some(ConfigAction::CustomRoutines) => custom_routines_screen(service)?,
        }
    }
}

fn print_config_summary(service: &AppService) {
    let config = &service.config;
    let data = service.routines_data();

    let equipment: Vec<String> = config
        .equipment
        .iter()
        .map(|id| {
            data.equipment_types
                .iter()
                .find(|e| &e.id == id)
                .map(|e| e.name.clone())
                .unwrap_or_else(|| id.clone())
        })
        .collect();
    let pattern = data
        .weekly_patterns
        .iter()
        .find(|p| p.id == config.weekly_pattern)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| config.weekly_pattern.clone());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Theme".to_string(), theme::current(service).name.to_string()]);
    table.add_row(vec!["Equipment".to_string(), equipment.join(", ")]);
    table.add_row(vec![
        "Intensity".to_string(),
        config.intensity_preference.label().to_string(),
    ]);
    table.add_row(vec!["Pattern".to_string(), pattern]);
    table.add_row(vec![
        "Categories".to_string(),
        config.enabled_categories().join(", "),
    ]);
    table.add_row(vec![
        "Cooldown".to_string(),
        format!("{} min", config.cooldown_minutes),
    ]);
    println!();
    println!("  Current Configuration");
    println!("{table}");
    println!();
}

fn configure_theme(service: &mut AppService) -> Result<()> {
    let items: Vec<MenuItem<&'static str>> = theme::THEMES
        .iter()
        .map(|t| MenuItem::new(t.name, t.description, t.id))
        .collect();
    let Some(id) = SelectMenu::new("Select color theme", items).run()? else {
        return Ok(());
    };
    service.set_theme(id)?;

    menu::clear_screen();
    let selected = theme::get(id);
    println!();
    theme::print_logo(selected);
    println!();
    println!("  ✓ Theme set to {}", selected.name);
    println!();
    menu::press_any_key()
}

fn configure_equipment(service: &mut AppService) -> Result<()> {
    let owned = service.config.equipment.clone();
    let items: Vec<MenuItem<String>> = service
        .routines_data()
        .equipment_types
        .iter()
        .map(|e| MenuItem::new(e.name.clone(), e.description.clone(), e.id.clone()))
        .collect();

    let selector = MultiSelectMenu::new("Select your equipment", items)
        .preselect(|id| owned.iter().any(|o| o == id));
    if let Some(selection) = selector.run()? {
        service.set_equipment(selection)?;
        println!("\n  ✓ Equipment updated\n");
        menu::press_any_key()?;
    }
    Ok(())
}

fn configure_intensity(service: &mut AppService) -> Result<()> {
    let items: Vec<MenuItem<IntensityPreference>> = IntensityPreference::all()
        .into_iter()
        .map(|p| MenuItem::new(p.label(), p.describe(), p))
        .collect();
    if let Some(preference) = SelectMenu::new("Select intensity preference", items).run()? {
        service.set_intensity_preference(preference)?;
        println!("\n  ✓ Intensity set to {preference}\n");
        menu::press_any_key()?;
    }
    Ok(())
}

fn configure_pattern(service: &mut AppService) -> Result<()> {
    let patterns = service.routines_data().weekly_patterns;
    let items: Vec<MenuItem<String>> = patterns
        .iter()
        .map(|p| MenuItem::new(p.name.clone(), p.description.clone(), p.id.clone()))
        .collect();
    if let Some(id) = SelectMenu::new("Select weekly pattern", items).run()? {
        let name = patterns
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.clone());
        service.set_weekly_pattern(&id)?;
        println!("\n  ✓ Pattern set to {name}\n");
        menu::press_any_key()?;
    }
    Ok(())
}

fn configure_categories(service: &mut AppService) -> Result<()> {
    let enabled = service.config.enabled_categories();
    let items: Vec<MenuItem<String>> = service
        .config
        .categories
        .keys()
        .map(|name| MenuItem::new(title_case(name), "", name.clone()))
        .collect();

    let selector = MultiSelectMenu::new("Toggle categories", items)
        .preselect(|name| enabled.iter().any(|e| e == name));
    if let Some(selection) = selector.run()? {
        service.set_enabled_categories(&selection)?;
        println!("\n  ✓ Categories updated\n");
        menu::press_any_key()?;
    }
    Ok(())
}

fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// --- Custom exercise editor ---

#[derive(Clone, PartialEq, Eq)]
enum ListAction {
    Add,
    Edit(usize),
    Back,
}

fn custom_exercises_screen(service: &mut AppService) -> Result<()> {
    loop {
        let mut items = vec![MenuItem::new(
            "+ Add new exercise",
            "Create a custom exercise",
            ListAction::Add,
        )];
        for (i, exercise) in service.config.custom_exercises.iter().enumerate() {
            items.push(MenuItem::new(
                exercise.name.clone(),
                format!(
                    "{} · {} · {}",
                    exercise.unit.display_count(exercise.count),
                    exercise.category,
                    exercise.intensity
                ),
                ListAction::Edit(i),
            ));
        }
        items.push(MenuItem::new("Back", "Return to config", ListAction::Back));

        match SelectMenu::new("Custom Exercises", items).run()? {
            None | Some(ListAction::Back) => return Ok(()),
            Some(ListAction::Add) => add_custom_exercise_flow(service)?,
            Some(ListAction::Edit(index)) => edit_custom_exercise_flow(service, index)?,
        }
    }
}

fn unit_menu() -> Result<Option<Unit>> {
    let items: Vec<MenuItem<Unit>> = Unit::all()
        .into_iter()
        .map(|u| MenuItem::new(u.label(), u.describe(), u))
        .collect();
    SelectMenu::new("Count type", items).run()
}

fn category_menu() -> Result<Option<String>> {
    let items = vec![
        MenuItem::new("Legs", "Lower body", "legs".to_string()),
        MenuItem::new("Upper", "Upper body", "upper".to_string()),
        MenuItem::new("Core", "Abs and back", "core".to_string()),
        MenuItem::new("Cardio", "Heart rate up", "cardio".to_string()),
        MenuItem::new("Mobility", "Stretching and flexibility", "mobility".to_string()),
        MenuItem::new("Full", "Full body movement", "full".to_string()),
    ];
    SelectMenu::new("Category", items).run()
}

fn intensity_menu() -> Result<Option<Intensity>> {
    let items: Vec<MenuItem<Intensity>> = Intensity::all()
        .into_iter()
        .map(|i| MenuItem::new(i.label(), i.describe(), i))
        .collect();
    SelectMenu::new("Intensity", items).run()
}

fn add_custom_exercise_flow(service: &mut AppService) -> Result<()> {
    println!();
    println!("  Add Custom Exercise");
    println!("  ───────────────────");
    println!();

    let Some(name) = TextPrompt::new("Exercise name").run()? else {
        return Ok(());
    };
    if name.is_empty() {
        return Ok(());
    }
    let Some(unit) = unit_menu()? else {
        return Ok(());
    };
    let Some(count) = menu::prompt_number(&format!("Default count ({unit})"), 10)? else {
        return Ok(());
    };
    let Some(category) = category_menu()? else {
        return Ok(());
    };
    let Some(intensity) = intensity_menu()? else {
        return Ok(());
    };

    service.add_custom_exercise(ExerciseDef {
        name: name.clone(),
        count,
        unit,
        category,
        intensity,
        equipment: None,
        custom: true,
    })?;

    println!("\n  ✓ Added: {name}\n");
    menu::press_any_key()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ExerciseField {
    Name,
    Count,
    Category,
    Intensity,
    Delete,
    Done,
}

fn edit_custom_exercise_flow(service: &mut AppService, index: usize) -> Result<()> {
    let Some(mut exercise) = service.config.custom_exercises.get(index).cloned() else {
        return Ok(());
    };

    loop {
        let items = vec![
            MenuItem::new(
                format!("Name: {}", exercise.name),
                "Change exercise name",
                ExerciseField::Name,
            ),
            MenuItem::new(
                format!("Count: {} {}", exercise.count, exercise.unit),
                "Change count and unit",
                ExerciseField::Count,
            ),
            MenuItem::new(
                format!("Category: {}", exercise.category),
                "Change category",
                ExerciseField::Category,
            ),
            MenuItem::new(
                format!("Intensity: {}", exercise.intensity),
                "Change intensity",
                ExerciseField::Intensity,
            ),
            MenuItem::new("Delete", "Remove this exercise", ExerciseField::Delete),
            MenuItem::new("Done", "Save and return", ExerciseField::Done),
        ];

        match SelectMenu::new(format!("Edit: {}", exercise.name), items).run()? {
            None | Some(ExerciseField::Done) => {
                service.update_custom_exercise(index, exercise)?;
                return Ok(());
            }
            Some(ExerciseField::Name) => {
                let prompt = TextPrompt::with_default("Exercise name", exercise.name.clone());
                if let Some(name) = prompt.run()? {
                    if !name.is_empty() {
                        exercise.name = name;
                    }
                }
            }
            Some(ExerciseField::Count) => {
                if let Some(unit) = unit_menu()? {
                    let label = format!("Default count ({unit})");
                    if let Some(count) = menu::prompt_number(&label, exercise.count)? {
                        exercise.unit = unit;
                        exercise.count = count;
                    }
                }
            }
            Some(ExerciseField::Category) => {
                if let Some(category) = category_menu()? {
                    exercise.category = category;
                }
            }
            Some(ExerciseField::Intensity) => {
                if let Some(intensity) = intensity_menu()? {
                    exercise.intensity = intensity;
                }
            }
            Some(ExerciseField::Delete) => {
                let confirm = vec![
                    MenuItem::new("Yes, delete", "Remove permanently", true),
                    MenuItem::new("No, keep", "Cancel deletion", false),
                ];
                let title = format!("Delete {}?", exercise.name);
                if SelectMenu::new(title, confirm).run()? == Some(true) {
                    let removed = service.delete_custom_exercise(index)?;
                    println!("\n  ✓ Deleted: {}\n", removed.name);
                    menu::press_any_key()?;
                    return Ok(());
                }
            }
        }
    }
}

// --- Custom routine editor ---

enum EditorOutcome {
    Saved(RoutineDef),
    Deleted,
    Cancelled,
}

fn custom_routines_screen(service: &mut AppService) -> Result<()> {
    loop {
        let mut items = vec![MenuItem::new(
            "+ Add new routine",
            "Create a custom routine",
            ListAction::Add,
        )];
        for (i, routine) in service.config.custom_routines.iter().enumerate() {
            let label = if routine.url.is_some() {
                format!("{} 🔗", routine.name)
            } else {
                routine.name.clone()
            };
            let exercises = if routine.exercises.is_empty() {
                String::new()
            } else {
                format!(" ({} exercises)", routine.exercises.len())
            };
            items.push(MenuItem::new(
                label,
                format!(
                    "{} min · {} · {}{exercises}",
                    routine.duration_minutes, routine.kind, routine.intensity
                ),
                ListAction::Edit(i),
            ));
        }
        items.push(MenuItem::new("Back", "Return to config", ListAction::Back));

        match SelectMenu::new("Custom Routines", items).run()? {
            None | Some(ListAction::Back) => return Ok(()),
            Some(ListAction::Add) => {
                let Some(name) = TextPrompt::new("Routine name").run()? else {
                    continue;
                };
                if name.is_empty() {
                    continue;
                }
                let draft = RoutineDef {
                    id: String::new(),
                    name,
                    kind: "custom".to_string(),
                    duration_minutes: 15,
                    intensity: Intensity::Moderate,
                    url: None,
                    exercises: Vec::new(),
                    custom: true,
                };
                if let EditorOutcome::Saved(routine) = routine_editor(service, draft, true)? {
                    let name = routine.name.clone();
                    service.add_custom_routine(routine)?;
                    println!("\n  ✓ Added routine: {name}\n");
                    menu::press_any_key()?;
                }
            }
            Some(ListAction::Edit(index)) => {
                let Some(routine) = service.config.custom_routines.get(index).cloned() else {
                    continue;
                };
                let name = routine.name.clone();
                match routine_editor(service, routine, false)? {
                    EditorOutcome::Saved(updated) => {
                        service.update_custom_routine(index, updated)?;
                    }
                    EditorOutcome::Deleted => {
                        service.delete_custom_routine(index)?;
                        println!("\n  ✓ Deleted: {name}\n");
                        menu::press_any_key()?;
                    }
                    EditorOutcome::Cancelled => {}
                }
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RoutineField {
    Name,
    Kind,
    Duration,
    Intensity,
    Url,
    Exercises,
    Save,
    Delete,
    Cancel,
}

/// Iterative field editor for one routine. Works on a local copy; the
/// caller persists on `Saved`.
fn routine_editor(
    service: &AppService,
    mut routine: RoutineDef,
    is_new: bool,
) -> Result<EditorOutcome> {
    let data = service.routines_data();
    let type_name = |kind: &str| -> String {
        data.routine_types
            .iter()
            .find(|t| t.id == kind)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| title_case(kind))
    };

    loop {
        print_routine_details(&routine);

        let mut items = vec![
            MenuItem::new(
                "Name",
                format!("Currently: {}", routine.name),
                RoutineField::Name,
            ),
            MenuItem::new(
                "Type",
                format!("Currently: {}", type_name(&routine.kind)),
                RoutineField::Kind,
            ),
            MenuItem::new(
                "Duration",
                format!("Currently: {} min", routine.duration_minutes),
                RoutineField::Duration,
            ),
            MenuItem::new(
                "Intensity",
                format!("Currently: {}", routine.intensity),
                RoutineField::Intensity,
            ),
            MenuItem::new(
                "Link",
                match &routine.url {
                    Some(url) => format!("Edit: {url}"),
                    None => "Set: (none)".to_string(),
                },
                RoutineField::Url,
            ),
            MenuItem::new(
                "Exercises",
                format!("{} exercises", routine.exercises.len()),
                RoutineField::Exercises,
            ),
        ];
        if is_new {
            items.push(MenuItem::new("Save", "Create this routine", RoutineField::Save));
            items.push(MenuItem::new(
                "Cancel",
                "Discard and go back",
                RoutineField::Cancel,
            ));
        } else {
            items.push(MenuItem::new(
                "Delete",
                "Remove this routine",
                RoutineField::Delete,
            ));
            items.push(MenuItem::new("Done", "Save changes", RoutineField::Save));
        }

        match SelectMenu::new("Edit routine", items).run()? {
            None | Some(RoutineField::Cancel) => return Ok(EditorOutcome::Cancelled),
            Some(RoutineField::Save) => return Ok(EditorOutcome::Saved(routine)),
            Some(RoutineField::Delete) => return Ok(EditorOutcome::Deleted),
            Some(RoutineField::Name) => {
                let prompt = TextPrompt::with_default("Routine name", routine.name.clone());
                if let Some(name) = prompt.run()? {
                    if !name.is_empty() {
                        routine.name = name;
                    }
                }
            }
            Some(RoutineField::Kind) => {
                let mut type_items: Vec<MenuItem<String>> = data
                    .routine_types
                    .iter()
                    .map(|t| MenuItem::new(t.name.clone(), t.description.clone(), t.id.clone()))
                    .collect();
                type_items.push(MenuItem::new(
                    "Custom",
                    "Define your own type",
                    "custom".to_string(),
                ));
                if let Some(kind) = SelectMenu::new("Routine type", type_items).run()? {
                    routine.kind = kind;
                }
            }
            Some(RoutineField::Duration) => {
                if let Some(minutes) =
                    menu::prompt_number("Duration (minutes)", routine.duration_minutes)?
                {
                    routine.duration_minutes = minutes;
                }
            }
            Some(RoutineField::Intensity) => {
                if let Some(intensity) = intensity_menu()? {
                    routine.intensity = intensity;
                }
            }
            Some(RoutineField::Url) => edit_routine_url(&mut routine)?,
            Some(RoutineField::Exercises) => exercises_builder(service, &mut routine)?,
        }
    }
}

fn edit_routine_url(routine: &mut RoutineDef) -> Result<()> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum UrlAction {
        Edit,
        Remove,
        Keep,
    }

    match routine.url.clone() {
        Some(current) => {
            let items = vec![
                MenuItem::new("Edit", "Change the URL", UrlAction::Edit),
                MenuItem::new("Remove", "Clear the link", UrlAction::Remove),
                MenuItem::new("Keep", "Leave as is", UrlAction::Keep),
            ];
            match SelectMenu::new("Link options", items).run()? {
                Some(UrlAction::Edit) => {
                    let prompt = TextPrompt::with_default("Video/link URL", current);
                    if let Some(url) = prompt.run()? {
                        if !url.is_empty() {
                            routine.url = Some(url);
                        }
                    }
                }
                Some(UrlAction::Remove) => routine.url = None,
                _ => {}
            }
        }
        None => {
            if let Some(url) = TextPrompt::new("Video/link URL").run()? {
                if !url.is_empty() {
                    routine.url = Some(url);
                }
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BuilderAction {
    Library,
    Custom,
    RemoveLast,
    Done,
    Cancel,
}

/// Builds a routine's embedded exercise list, iteratively.
fn exercises_builder(service: &AppService, routine: &mut RoutineDef) -> Result<()> {
    loop {
        println!();
        println!("  Building: {}", routine.name);
        println!("  ─────────────────────────");
        if routine.exercises.is_empty() {
            println!("  [No exercises yet]");
        } else {
            for (i, exercise) in routine.exercises.iter().enumerate() {
                println!(
                    "    {}. {} {}",
                    i + 1,
                    exercise.unit.display_count(exercise.count),
                    exercise.name
                );
            }
        }
        println!();

        let mut items = vec![
            MenuItem::new(
                "+ Add from library",
                "Choose existing exercise",
                BuilderAction::Library,
            ),
            MenuItem::new(
                "+ Add custom",
                "Name a one-off exercise for this routine",
                BuilderAction::Custom,
            ),
        ];
        if !routine.exercises.is_empty() {
            items.push(MenuItem::new(
                "Remove last",
                "Remove the last exercise",
                BuilderAction::RemoveLast,
            ));
        }
        items.push(MenuItem::new(
            "Done",
            "Finish building routine",
            BuilderAction::Done,
        ));
        items.push(MenuItem::new(
            "Cancel",
            "Discard this exercise list",
            BuilderAction::Cancel,
        ));

        match SelectMenu::new("Add exercises", items).run()? {
            None | Some(BuilderAction::Cancel) => {
                routine.exercises.clear();
                return Ok(());
            }
            Some(BuilderAction::Done) => return Ok(()),
            Some(BuilderAction::RemoveLast) => {
                routine.exercises.pop();
            }
            Some(BuilderAction::Library) => {
                let items = exercise_menu_items(service.exercises());
                let Some(selected) = SelectMenu::new("Select exercise", items).run()? else {
                    continue;
                };
                let label = format!("Count ({})", selected.unit);
                if let Some(count) = menu::prompt_number(&label, selected.count)? {
                    routine.exercises.push(RoutineExercise {
                        name: selected.name,
                        count,
                        unit: selected.unit,
                    });
                }
            }
            Some(BuilderAction::Custom) => {
                let Some(name) = TextPrompt::new("Exercise name").run()? else {
                    continue;
                };
                if name.is_empty() {
                    continue;
                }
                let Some(unit) = unit_menu()? else {
                    continue;
                };
                let Some(count) = menu::prompt_number(&format!("Count ({unit})"), 10)? else {
                    continue;
                };
                routine.exercises.push(RoutineExercise { name, count, unit });
            }
        }
    }
}
