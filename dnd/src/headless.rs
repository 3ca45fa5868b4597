//! Headless driver for resolving choices.
//!
//! A simple line-oriented protocol over stdin:
//! - Lines starting with `#` are commands (list, show, resolve, undo, save, saves, quit)
//! - Output lines are tagged `[CHOICE]`, `[OK]`, `[ERROR]` and so on

use crate::command::{self, Command};
use dnd_choices::catalog::Catalog;
use dnd_choices::character::Ability;
use dnd_choices::character_builder::level_up;
use dnd_choices::persist::{character_save_path, list_character_saves};
use dnd_choices::{
    CharacterBuilder, CharacterId, CharacterMetadata, ChoiceEngine, ChoiceService, EngineConfig,
    PendingChoice,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

/// Where the character comes from and where it is saved.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Load this save instead of building a new character.
    pub load: Option<PathBuf>,
    pub name: String,
    pub race: String,
    pub class: String,
    pub background: String,
    /// Where `#save` writes by default and `#saves` looks.
    pub save_dir: PathBuf,
    pub engine: EngineConfig,
}

impl HeadlessConfig {
    pub fn quick_start(name: impl Into<String>) -> Self {
        Self {
            load: None,
            name: name.into(),
            race: "human".to_string(),
            class: "fighter".to_string(),
            background: "soldier".to_string(),
            save_dir: PathBuf::from("saves"),
            engine: EngineConfig::default(),
        }
    }
}

pub async fn run_headless(config: HeadlessConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::srd();
    let mut service = ChoiceService::new(ChoiceEngine::with_config(
        catalog.clone(),
        config.engine.clone(),
    ));

    let id = match &config.load {
        Some(path) => service.load_character(path).await?,
        None => {
            let character = CharacterBuilder::new()
                .name(&config.name)
                .race(&config.race)
                .class(&config.class)
                .background(&config.background)
                .standard_array([
                    (15, Ability::Strength),
                    (14, Ability::Constitution),
                    (13, Ability::Dexterity),
                    (12, Ability::Wisdom),
                    (10, Ability::Intelligence),
                    (8, Ability::Charisma),
                ])
                .build(&catalog)?;
            service.insert(character)
        }
    };
    info!(character = %id, "session started");

    println!("=== Pending Choices ===");
    print_status(&service, &id)?;
    print_help();
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match command::parse(&line) {
            Ok(Command::Quit) => {
                println!("Goodbye!");
                break;
            }
            Ok(cmd) => {
                if let Err(e) = execute(&mut service, &id, &config, cmd).await {
                    println!("[ERROR] {e}");
                }
            }
            Err(e) => println!("[ERROR] {e}"),
        }
        stdout.flush().ok();
    }

    Ok(())
}

async fn execute(
    service: &mut ChoiceService,
    id: &CharacterId,
    config: &HeadlessConfig,
    cmd: Command,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Command::List { all } => {
            let pending = service.get_pending_choices(id)?;
            for choice in pending.choices.iter().filter(|c| all || !c.is_complete()) {
                print_choice_line(choice);
            }
            println!(
                "[SUMMARY] {} picks left over {} open choices, {} required, complete: {}",
                pending.summary.remaining,
                pending.open().count(),
                pending.summary.required_remaining,
                pending.summary.complete
            );
        }
        Command::Show(choice_id) => {
            let choice = service.engine().find_choice(service.character(id)?, &choice_id)?;
            println!("{}", serde_json::to_string_pretty(&choice)?);
        }
        Command::Resolve {
            choice_id,
            selection,
        } => {
            service.resolve_choice(id, &choice_id, &selection)?;
            println!("[OK] Resolved {choice_id}");
        }
        Command::Undo(choice_id) => {
            service.undo_choice(id, &choice_id)?;
            println!("[OK] Undid {choice_id}");
        }
        Command::LevelUp(class_slug) => {
            let mut character = service.character(id)?.clone();
            let level = level_up(service.engine().catalog(), &mut character, &class_slug)?;
            service.insert(character);
            println!("[OK] {class_slug} is now level {level}");
        }
        Command::Save(path) => {
            let path = match path {
                Some(path) => PathBuf::from(path),
                None => character_save_path(&config.save_dir, &service.character(id)?.name),
            };
            service.save_character(id, &path).await?;
            println!("[SAVED] Character saved to {}", path.display());
        }
        Command::Saves => {
            let saves = list_character_saves(&config.save_dir).await?;
            if saves.is_empty() {
                println!("[SAVES] None in {}", config.save_dir.display());
            }
            for save in saves {
                println!("[SAVE] {} - {}", save.path.display(), describe(&save.metadata));
            }
        }
        Command::Status => print_status(service, id)?,
        Command::Help => print_help(),
        Command::Quit => {}
    }
    Ok(())
}

fn print_choice_line(choice: &PendingChoice) {
    let marker = if choice.required { "" } else { " (optional)" };
    println!(
        "[CHOICE] {} - {} {}, {}/{} left{}",
        choice.id,
        choice.source_name,
        choice.choice_type,
        choice.remaining,
        choice.quantity,
        marker
    );
}

/// One-line description such as "Lyra (half-elf, bard 1), level 1".
fn describe(metadata: &CharacterMetadata) -> String {
    format!(
        "{} ({}, {}), level {}",
        metadata.name, metadata.race, metadata.classes, metadata.level
    )
}

fn print_status(service: &ChoiceService, id: &CharacterId) -> Result<(), Box<dyn std::error::Error>> {
    let character = service.character(id)?;
    let pending = service.get_pending_choices(id)?;
    println!(
        "[STATUS] {}, HP {}",
        describe(&CharacterMetadata::of(character)),
        character.max_hit_points()
    );
    println!(
        "[STATUS] {} of {} choices open ({} picks), {} required",
        pending.open().count(),
        pending.summary.total,
        pending.summary.remaining,
        pending.summary.required_remaining
    );
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  #list [all]                - Show open (or all) choices");
    println!("  #show <id>                 - Show one choice with its options");
    println!("  #resolve <id> <json>       - Submit a selection");
    println!("  #undo <id>                 - Undo a selection");
    println!("  #level <class>             - Gain a level in a class");
    println!("  #save [path]               - Save the character");
    println!("  #saves                     - List saved characters");
    println!("  #status                    - Show character status");
    println!("  #quit                      - Exit");
}

/// Parse character configuration from command line arguments.
pub fn parse_config_from_args(args: &[String], mut config: HeadlessConfig) -> HeadlessConfig {
    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match (args[i].as_str(), value) {
            ("--load", Some(path)) => {
                config.load = Some(PathBuf::from(path));
                i += 1;
            }
            ("--name", Some(name)) => {
                config.name = name;
                i += 1;
            }
            ("--race", Some(race)) => {
                config.race = race;
                i += 1;
            }
            ("--class", Some(class)) => {
                config.class = class;
                i += 1;
            }
            ("--background", Some(background)) => {
                config.background = background;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    config
}
