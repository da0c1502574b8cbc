// src/theme.rs
//! Color themes and the welcome banner.

use crossterm::style::{Color, Stylize};
use microset_lib::AppService;

pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub accent: Color,
    pub gradient: [Color; 3],
}

pub const THEMES: &[Theme] = &[
    Theme {
        id: "fire",
        name: "Fire",
        description: "Orange and red - classic fitness energy",
        accent: Color::Yellow,
        gradient: [Color::Red, Color::DarkYellow, Color::Yellow],
    },
    Theme {
        id: "rainbow",
        name: "Rainbow",
        description: "Full spectrum pride vibes",
        accent: Color::Magenta,
        gradient: [Color::Red, Color::Green, Color::Magenta],
    },
    Theme {
        id: "ocean",
        name: "Ocean",
        description: "Cool blues and teals",
        accent: Color::Cyan,
        gradient: [Color::Cyan, Color::Blue, Color::DarkBlue],
    },
    Theme {
        id: "matrix",
        name: "Matrix",
        description: "Green terminal aesthetic",
        accent: Color::Green,
        gradient: [Color::Green, Color::DarkGreen, Color::Green],
    },
    Theme {
        id: "mono",
        name: "Monochrome",
        description: "Clean black and white",
        accent: Color::White,
        gradient: [Color::White, Color::Grey, Color::DarkGrey],
    },
];

const LOGO_MINI: [&str; 3] = [
    "╔╦╗╦╔═╗╦═╗╔═╗╔═╗╔═╗╔╦╗",
    "║║║║║  ╠╦╝║ ║╚═╗║╣  ║ ",
    "╩ ╩╩╚═╝╩╚═╚═╝╚═╝╚═╝ ╩ ",
];

const DUMBBELL: [&str; 3] = [
    "┏━━━┓───────┏━━━┓",
    "┃███┃═══════┃███┃",
    "┗━━━┛───────┗━━━┛",
];

pub fn get(id: &str) -> &'static Theme {
    THEMES.iter().find(|t| t.id == id).unwrap_or(&THEMES[0])
}

pub fn current(service: &AppService) -> &'static Theme {
    get(&service.config.theme)
}

pub fn print_logo(theme: &Theme) {
    for (i, line) in LOGO_MINI.iter().enumerate() {
        let color = theme.gradient[i % theme.gradient.len()];
        println!("  {}", line.bold().with(color));
    }
}

fn print_dumbbell(theme: &Theme) {
    for line in DUMBBELL {
        println!("      {}", line.with(theme.accent));
    }
}

/// Welcome screen: logo, tagline, a beat of pacing delay.
pub fn print_welcome(service: &AppService) {
    crate::menu::clear_screen();
    println!();
    let theme = current(service);
    print_logo(theme);
    println!();
    println!("  {}", "Micro-workouts while your AI agent works".dim());
    println!();
    print_dumbbell(theme);
    println!();

    if let Ok(stats) = service.stats_today() {
        if stats.reps > 0 || stats.routines > 0 {
            println!(
                "  {}",
                format!(
                    "Today: {} reps · {} exercises · {} routines",
                    stats.reps, stats.exercises, stats.routines
                )
                .with(theme.accent)
            );
            println!();
        }
    }

    // Dramatic pause before the menu takes over.
    std::thread::sleep(std::time::Duration::from_secs(1));
}
