//! Menu board editor: entry point.
//!
//! Prepares the weekly menu document the display engine shows, and manages
//! the library of recurring dishes.
//!
//! # Usage
//!
//! ```text
//! menu-editor init [--output menu.json] [--force]
//! menu-editor validate <MENU>
//! menu-editor add-dish <MENU> [--name ..] [--description ..] [--price ..] ...
//! menu-editor remove-dish <MENU> <ID>
//! menu-editor set-display <MENU> <grid|carousel|sandwich|1|2|3>
//! menu-editor library save <MENU> <ID>
//! menu-editor library list
//! menu-editor library apply <MENU> <ID> <ENTRY>
//! menu-editor library delete <ENTRY>
//! menu-editor library export [--output FILE]
//! menu-editor library import <FILE>
//! ```
//!
//! Library entries are addressed by their position as printed by
//! `library list`, starting at 0.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use menu_core::{Category, DisplayType, MenuDocument};
use menu_editor::infrastructure::files::{
    default_library_path, load_library, read_draft, save_library, write_draft, write_text,
};
use menu_editor::{
    add_dish, default_draft, remove_dish, set_display, validate_for_publish, DishFields,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Menu board editor.
#[derive(Debug, Parser)]
#[command(name = "menu-editor", about = "Edit menu board documents and the dish library", version)]
struct Cli {
    /// Dish library file [default: platform data dir].
    #[arg(long, global = true, env = "MENUBOARD_LIBRARY")]
    library: Option<PathBuf>,

    #[arg(long, global = true, default_value = "warn", env = "MENUBOARD_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a fresh draft for a new week.
    Init {
        #[arg(long, default_value = "menu.json")]
        output: PathBuf,
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Check that a draft is ready to publish.
    Validate { menu: PathBuf },
    /// Append a dish.
    AddDish {
        menu: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
        /// Sandwich column, 1 to 4.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        column: Option<u8>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long = "allergen")]
        allergens: Vec<String>,
        #[arg(long)]
        image: Option<String>,
        /// Show the NOUVEAU badge.
        #[arg(long = "new")]
        is_new: bool,
    },
    /// Remove a dish; the remaining ids are renumbered.
    RemoveDish { menu: PathBuf, id: u32 },
    /// Choose the layout.
    SetDisplay {
        menu: PathBuf,
        /// `grid`, `carousel`, `sandwich`, or the wire code `1`, `2`, `3`.
        layout: String,
    },
    /// Manage the dish library.
    #[command(subcommand)]
    Library(LibraryCommand),
}

#[derive(Debug, Subcommand)]
enum LibraryCommand {
    /// Save dish `id` of a draft as a template.
    Save { menu: PathBuf, id: u32 },
    List,
    /// Fill dish `id` of a draft from template `entry`.
    Apply { menu: PathBuf, id: u32, entry: usize },
    Delete { entry: usize },
    /// Print the library as JSON, or write it to `--output`.
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Append the templates of an exported file.
    Import { file: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CategoryArg {
    Starter,
    Main,
    Dessert,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Starter => Category::Starter,
            CategoryArg::Main => Category::Main,
            CategoryArg::Dessert => Category::Dessert,
        }
    }
}

/// Accepts layout names as well as wire codes.
fn parse_layout(layout: &str) -> anyhow::Result<DisplayType> {
    match layout.trim().to_ascii_lowercase().as_str() {
        "grid" | "grille" | "1" => Ok(DisplayType::Grid),
        "carousel" | "carrousel" | "2" => Ok(DisplayType::Carousel),
        "sandwich" | "3" => Ok(DisplayType::Sandwich),
        other => bail!("unknown layout '{other}' (expected grid, carousel or sandwich)"),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn save_draft(path: &Path, draft: &MenuDocument) -> anyhow::Result<()> {
    write_draft(path, draft, true).with_context(|| format!("failed to write {}", path.display()))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let library_path = match cli.library {
        Some(path) => path,
        None => default_library_path().context("no library path given")?,
    };

    match cli.command {
        Command::Init { output, force } => {
            write_draft(&output, &default_draft(), force)
                .with_context(|| format!("failed to create {}", output.display()))?;
            println!("created {}", output.display());
        }
        Command::Validate { menu } => {
            let draft = read_draft(&menu)?;
            validate_for_publish(&draft)
                .with_context(|| format!("{} is not ready to publish", menu.display()))?;
            println!("{} is valid ({} dishes)", menu.display(), draft.dishes.len());
        }
        Command::AddDish {
            menu,
            name,
            description,
            price,
            category,
            column,
            tags,
            allergens,
            image,
            is_new,
        } => {
            let mut draft = read_draft(&menu)?;
            let id = add_dish(
                &mut draft,
                DishFields {
                    name,
                    description,
                    price,
                    category: category.map(Category::from),
                    column,
                    tags,
                    allergens,
                    image_path: image,
                    is_new,
                },
            );
            save_draft(&menu, &draft)?;
            println!("added dish {id}");
        }
        Command::RemoveDish { menu, id } => {
            let mut draft = read_draft(&menu)?;
            let removed = remove_dish(&mut draft, id)?;
            save_draft(&menu, &draft)?;
            println!("removed dish {id} ({})", removed.name);
        }
        Command::SetDisplay { menu, layout } => {
            let display_type = parse_layout(&layout)?;
            let mut draft = read_draft(&menu)?;
            set_display(&mut draft, display_type);
            save_draft(&menu, &draft)?;
            println!("layout set to {display_type:?}");
        }
        Command::Library(command) => run_library(command, &library_path)?,
    }
    Ok(())
}

fn run_library(command: LibraryCommand, library_path: &Path) -> anyhow::Result<()> {
    let mut library = load_library(library_path)
        .with_context(|| format!("failed to load library {}", library_path.display()))?;

    match command {
        LibraryCommand::Save { menu, id } => {
            let draft = read_draft(&menu)?;
            let dish = draft
                .dishes
                .iter()
                .find(|d| d.id == id)
                .with_context(|| format!("no dish {id} in {}", menu.display()))?;
            let entry = library.save(dish, Utc::now())?;
            println!("saved \"{}\" ({:.2} €)", entry.name, entry.price);
            save_library(library_path, &library)?;
        }
        LibraryCommand::List => {
            if library.is_empty() {
                println!("the library is empty");
            }
            for (index, entry) in library.entries().iter().enumerate() {
                println!(
                    "{index:>3}  {:<30} {:>7.2} €  {:?}  {}",
                    entry.name,
                    entry.price,
                    entry.category,
                    entry.saved_at.format("%Y-%m-%d")
                );
            }
        }
        LibraryCommand::Apply { menu, id, entry } => {
            let mut draft = read_draft(&menu)?;
            let slot = draft
                .dishes
                .iter_mut()
                .find(|d| d.id == id)
                .with_context(|| format!("no dish {id} in {}", menu.display()))?;
            library.apply(entry, slot)?;
            let name = slot.name.clone();
            save_draft(&menu, &draft)?;
            println!("dish {id} is now \"{name}\"");
        }
        LibraryCommand::Delete { entry } => {
            let removed = library.delete(entry)?;
            save_library(library_path, &library)?;
            println!("deleted \"{}\"", removed.name);
        }
        LibraryCommand::Export { output } => {
            let json = library.export()?;
            match output {
                Some(path) => {
                    write_text(&path, &json)?;
                    println!("exported {} dishes to {}", library.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        LibraryCommand::Import { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let added = library.import(&bytes)?;
            save_library(library_path, &library)?;
            println!("imported {added} dishes");
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    info!(command = ?cli.command, "menu-editor");
    run(cli)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("menuboard-cli-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn run_args(dir: &PathBuf, args: &[&str]) -> anyhow::Result<()> {
        let library = dir.join("library.json");
        let mut argv = vec!["menu-editor", "--library", library.to_str().unwrap()];
        argv.extend_from_slice(args);
        run(Cli::parse_from(argv))
    }

    #[test]
    fn test_cli_parses_add_dish_with_repeated_tags() {
        let cli = Cli::parse_from([
            "menu-editor",
            "add-dish",
            "menu.json",
            "--name",
            "Lasagne",
            "--tag",
            "vegetarien",
            "--tag",
            "maison",
            "--category",
            "main",
        ]);
        match cli.command {
            Command::AddDish { name, tags, category, .. } => {
                assert_eq!(name.as_deref(), Some("Lasagne"));
                assert_eq!(tags, vec!["vegetarien", "maison"]);
                assert_eq!(category, Some(CategoryArg::Main));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_column_out_of_range() {
        let result = Cli::try_parse_from(["menu-editor", "add-dish", "menu.json", "--column", "5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_layout_accepts_names_and_codes() {
        assert_eq!(parse_layout("Carousel").unwrap(), DisplayType::Carousel);
        assert_eq!(parse_layout("3").unwrap(), DisplayType::Sandwich);
        assert_eq!(parse_layout("grille").unwrap(), DisplayType::Grid);
        assert!(parse_layout("mosaic").is_err());
    }

    #[test]
    fn test_init_add_remove_and_validate_flow() {
        // Arrange
        let dir = scratch("flow");
        let menu = dir.join("menu.json");
        let menu_arg = menu.to_str().unwrap();

        // Act
        run_args(&dir, &["init", "--output", menu_arg]).unwrap();
        run_args(
            &dir,
            &["add-dish", menu_arg, "--name", "Soupe", "--description", "Maison", "--price", "4.5"],
        )
        .unwrap();
        let blank_is_invalid = run_args(&dir, &["validate", menu_arg]).is_err();
        run_args(&dir, &["remove-dish", menu_arg, "1"]).unwrap();
        run_args(&dir, &["set-display", menu_arg, "sandwich"]).unwrap();

        // Assert
        assert!(blank_is_invalid);
        run_args(&dir, &["validate", menu_arg]).unwrap();
        let draft = read_draft(&menu).unwrap();
        assert_eq!(draft.dishes.len(), 1);
        assert_eq!(draft.dishes[0].id, 1);
        assert_eq!(draft.dishes[0].name, "Soupe");
        assert_eq!(draft.display_type(), DisplayType::Sandwich);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_library_save_apply_delete_flow() {
        // Arrange: a draft whose dish 2 is complete
        let dir = scratch("library");
        let menu = dir.join("menu.json");
        let menu_arg = menu.to_str().unwrap();
        run_args(&dir, &["init", "--output", menu_arg]).unwrap();
        run_args(&dir, &["add-dish", menu_arg, "--name", "Tiramisu", "--price", "5"]).unwrap();

        // Act
        run_args(&dir, &["library", "save", menu_arg, "2"]).unwrap();
        run_args(&dir, &["library", "apply", menu_arg, "1", "0"]).unwrap();
        let after_apply = read_draft(&menu).unwrap();
        run_args(&dir, &["library", "delete", "0"]).unwrap();

        // Assert
        assert_eq!(after_apply.dishes[0].id, 1);
        assert_eq!(after_apply.dishes[0].name, "Tiramisu");
        let library = load_library(&dir.join("library.json")).unwrap();
        assert!(library.is_empty());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_library_save_of_blank_dish_fails() {
        let dir = scratch("blank");
        let menu = dir.join("menu.json");
        let menu_arg = menu.to_str().unwrap();
        run_args(&dir, &["init", "--output", menu_arg]).unwrap();

        assert!(run_args(&dir, &["library", "save", menu_arg, "1"]).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
