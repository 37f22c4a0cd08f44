use std::{
    env,
    io::{self, Write},
    process::{Command, Stdio},
};

use cal_board::{
    EventListViewModel,
    storage::config::{Config, Credential},
    sync,
    ui::day_view::{calculate_layout, DayLayout, ListDisplay},
};

const USAGE: &str = "Usage: cal-board [--agenda]";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CliMode {
    Board,
    Agenda,
}

pub fn parse_cli_mode() -> Result<CliMode, String> {
    parse_args(env::args().skip(1))
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<CliMode, String> {
    let mut mode = CliMode::Board;

    for arg in args {
        match arg.as_str() {
            "--agenda" => mode = CliMode::Agenda,
            "--help" | "-h" => {
                println!("{}", USAGE);
                println!("\n  --agenda   Print today's events and exit");
                println!("\nCredentials are read from CLIENT_ID and CLIENT_SECRET (or a .env file).");
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    Ok(mode)
}

pub fn usage() -> &'static str {
    USAGE
}

pub async fn run_agenda_mode(config: Config, credential: Credential) -> Result<(), io::Error> {
    let api = sync::connect(&config, credential)
        .map_err(|e| io::Error::other(e.to_string()))?;

    let mut view_model = EventListViewModel::new(api);
    view_model.mount().await;

    let agenda = format_agenda_text(&calculate_layout(view_model.state()));
    display_with_pager(&agenda)
}

fn format_agenda_text(layout: &DayLayout) -> String {
    let mut lines = vec![layout.heading.clone(), String::new()];

    match &layout.display {
        ListDisplay::Loading => lines.push("Events are still loading.".to_string()),
        ListDisplay::Failed(message) => lines.push(format!("Failed to load events: {}", message)),
        ListDisplay::Empty => lines.push("No available events.".to_string()),
        ListDisplay::Events(cards) => {
            for card in cards {
                lines.push(format!("- {}", card.title));
                lines.push(format!("  {}", card.dates));
                if !card.description.is_empty() {
                    lines.push(format!("  {}", card.description));
                }
            }
        }
    }

    lines.join("\n")
}

fn display_with_pager(text: &str) -> Result<(), io::Error> {
    let pager_value = env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut parts = pager_value.split_whitespace();
    let cmd = match parts.next() {
        Some(c) => c,
        None => {
            println!("{text}");
            return Ok(());
        }
    };
    let args: Vec<&str> = parts.collect();

    match Command::new(cmd)
        .args(&args)
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            let _ = child.wait();
        }
        Err(_) => {
            println!("{text}");
        }
    }

    Ok(())
}
