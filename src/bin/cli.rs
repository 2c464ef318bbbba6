use chrono::{NaiveDate, NaiveDateTime};
use production_tracker::{
    DashboardConfig, DurationError, GoverningMode, HolidayRuleStore, HolidayRuleType, MachineModel,
    WorkingCalendar, governing_selection, logging, parse_local_timestamp, project_order_completion,
};
use std::fs;
use std::io::{self, Write};

struct Session {
    config: DashboardConfig,
    rules: HolidayRuleStore,
    model: Option<MachineModel>,
}

impl Session {
    fn new() -> Self {
        let config = DashboardConfig::default();
        let rules = HolidayRuleStore::new(config.holiday_rule.clone());
        Self {
            config,
            rules,
            model: None,
        }
    }

    /// Config view with the live holiday rule folded in.
    fn current_config(&self) -> DashboardConfig {
        DashboardConfig {
            holiday_rule: self.rules.snapshot(),
            ..self.config.clone()
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_pair(start_s: &str, end_s: &str) -> Result<(NaiveDateTime, NaiveDateTime), DurationError> {
    Ok((parse_local_timestamp(start_s)?, parse_local_timestamp(end_s)?))
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  rule show                          Show the active holiday rule\n  rule type <single|double|alternate|none>\n                                     Change the weekly rest pattern\n  rule add <YYYY-MM-DD>              Add a specific holiday\n  rule remove <YYYY-MM-DD>           Remove a specific holiday\n  workday <YYYY-MM-DD>               Check whether a date is a working day\n  next <YYYY-MM-DD>                  Next working day after a date\n  duration <start> <end>             Impacted production days (YYYY-MM-DDTHH:MM)\n  config show                        Show shift and limits\n  config load <json_path>            Load dashboard config from JSON file\n  config save <json_path>            Save dashboard config to JSON file\n  model load <json_path>             Load a machine model from JSON file\n  model show                         Show the loaded model's steps\n  model lane <name|->                Set or clear the schedule calculation module\n  governing                          List the steps governing completion\n  project <YYYY-MM-DD>               Projected completion for an order starting then\n  quit|exit                          Exit"
    );
}

fn print_rule(session: &Session) {
    let rule = session.rules.snapshot();
    let holidays = rule
        .specific_holidays()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!("Rule type          : {}", rule.rule_type());
    println!("Specific holidays  : {}", holidays);
}

fn print_config(session: &Session) {
    let shift = &session.config.shift;
    println!("Shift              : {} - {}", shift.start.format("%H:%M"), shift.end.format("%H:%M"));
    println!("Hours per day      : {}", shift.hours_per_day);
    println!("Max anomaly span   : {} days", session.config.max_anomaly_span_days);
}

fn print_model(model: &MachineModel) {
    println!("Model              : {}", model.name);
    println!(
        "Schedule module    : {}",
        model.designated_lane().unwrap_or("(all steps)")
    );
    for (idx, step) in model.steps.iter().enumerate() {
        println!(
            "  {:>2}. {:<20} lane={:<12} module={:<12} hours={}",
            idx + 1,
            step.name,
            step.parallel_module,
            step.module,
            step.estimated_hours
        );
    }
}

fn handle_rule(session: &mut Session, mut parts: std::str::SplitWhitespace<'_>) {
    match (parts.next(), parts.next()) {
        (Some("show"), _) => print_rule(session),
        (Some("type"), Some(kind)) => match kind.parse::<HolidayRuleType>() {
            Ok(kind) => {
                session.rules.update(|rule| rule.with_rule_type(kind));
                println!("Rule type set to {}.", kind);
            }
            Err(e) => println!("Error: {}", e),
        },
        (Some("add"), Some(date_s)) => match parse_date(date_s) {
            Some(date) => {
                session.rules.update(|rule| rule.with_holiday(date));
                println!("Holiday {} added.", date);
            }
            None => println!("Invalid date (YYYY-MM-DD)"),
        },
        (Some("remove"), Some(date_s)) => match parse_date(date_s) {
            Some(date) => {
                session.rules.update(|rule| rule.without_holiday(date));
                println!("Holiday {} removed.", date);
            }
            None => println!("Invalid date (YYYY-MM-DD)"),
        },
        _ => println!("Usage: rule <show|type <kind>|add <date>|remove <date>>"),
    }
}

fn handle_config(session: &mut Session, mut parts: std::str::SplitWhitespace<'_>) {
    match (parts.next(), parts.next()) {
        (Some("show"), _) => print_config(session),
        (Some("load"), Some(path)) => match DashboardConfig::load_from_file(path) {
            Ok(config) => {
                session.rules.replace(config.holiday_rule.clone());
                session.config = config;
                println!("Config loaded from {}.", path);
            }
            Err(e) => println!("Error: {}", e),
        },
        (Some("save"), Some(path)) => match session.current_config().save_to_file(path) {
            Ok(_) => println!("Config saved to {}.", path),
            Err(e) => println!("Error: {}", e),
        },
        _ => println!("Usage: config <show|load <path>|save <path>>"),
    }
}

fn load_model(path: &str) -> Result<MachineModel, String> {
    let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let model: MachineModel = serde_json::from_str(&contents).map_err(|e| e.to_string())?;
    model.validate().map_err(|e| e.to_string())?;
    Ok(model)
}

fn handle_model(session: &mut Session, mut parts: std::str::SplitWhitespace<'_>) {
    match (parts.next(), parts.next()) {
        (Some("load"), Some(path)) => match load_model(path) {
            Ok(model) => {
                println!("Model '{}' loaded with {} steps.", model.name, model.steps.len());
                session.model = Some(model);
            }
            Err(e) => println!("Error: {}", e),
        },
        (Some("show"), _) => match &session.model {
            Some(model) => print_model(model),
            None => println!("No model loaded."),
        },
        (Some("lane"), Some(lane)) => match session.model.as_mut() {
            Some(model) => {
                if lane == "-" {
                    model.set_schedule_calculation_module(None);
                    println!("Schedule module cleared.");
                } else {
                    model.set_schedule_calculation_module(Some(lane.to_string()));
                    println!("Schedule module set to '{}'.", lane);
                }
            }
            None => println!("No model loaded."),
        },
        _ => println!("Usage: model <load <path>|show|lane <name|->>"),
    }
}

fn main() {
    logging::init();

    let mut session = Session::new();
    println!("Production Tracker (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "rule" => handle_rule(&mut session, parts),
            "config" => handle_config(&mut session, parts),
            "model" => handle_model(&mut session, parts),
            "workday" => match parts.next().and_then(parse_date) {
                Some(date) => {
                    if session.rules.is_working_day(date) {
                        println!("{} is a working day", date);
                    } else {
                        println!("{} is a rest day", date);
                    }
                }
                None => println!("Usage: workday <YYYY-MM-DD>"),
            },
            "next" => match parts.next().and_then(parse_date) {
                Some(date) => match session.rules.next_working_day(date) {
                    Some(next) => println!("Next working day: {}", next),
                    None => println!("No working day after {}.", date),
                },
                None => println!("Usage: next <YYYY-MM-DD>"),
            },
            "duration" => match (parts.next(), parts.next()) {
                (Some(start_s), Some(end_s)) => match parse_pair(start_s, end_s) {
                    Ok((start, end)) => match session.config.calculator().compute(Some(start), Some(end)) {
                        Ok(days) => println!("Impacted production days: {}", days),
                        Err(e) => println!("Error: {}", e),
                    },
                    Err(e) => println!("Error: {}", e),
                },
                _ => println!("Usage: duration <start> <end>"),
            },
            "governing" => match &session.model {
                Some(model) => {
                    let selection = governing_selection(model);
                    println!("Governing mode     : {}", selection.mode);
                    if selection.is_empty() {
                        if let GoverningMode::Lane(lane) = &selection.mode {
                            println!("No steps match lane '{}'.", lane);
                        } else {
                            println!("Model has no steps.");
                        }
                    } else {
                        for step in &selection.steps {
                            println!("  {} ({}h)", step.name, step.estimated_hours);
                        }
                        println!("Total hours        : {}", selection.total_hours());
                    }
                }
                None => println!("No model loaded."),
            },
            "project" => match (parts.next().and_then(parse_date), &session.model) {
                (Some(start), Some(model)) => {
                    match project_order_completion(model, start, &session.config.shift, &session.rules) {
                        Some(date) => println!("Projected completion: {}", date),
                        None => println!("Completion not projected (no governing steps or work out of range)."),
                    }
                }
                (None, _) => println!("Usage: project <YYYY-MM-DD>"),
                (_, None) => println!("No model loaded."),
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
