use clap::{Parser, Subcommand};
use std::fs;
use std::process::ExitCode;
use std::time::Instant;
use studio_layout::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Checks, converts and reconciles the form layouts of an app checkout
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert every page and report invalid pages, broken trees and duplicate ids
    Check {
        /// Directory holding one folder per layout set (e.g. App/ui)
        root: String,
        /// Only check this layout set
        #[arg(short, long)]
        layout_set: Option<String>,
    },
    /// Print the internal tree model of a single layout file
    Convert {
        /// Path to the layout JSON file
        path: String,
    },
    /// Add or remove navigation buttons so they match the number of pages
    Navigation {
        root: String,
        layout_set: String,
        /// The page being edited, given a navigation component last
        #[arg(short, long)]
        current_page: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Check { root, layout_set } => run_check(&root, layout_set.as_deref()),
        Command::Convert { path } => run_convert(&path),
        Command::Navigation {
            root,
            layout_set,
            current_page,
        } => run_navigation(&root, &layout_set, current_page.as_deref()),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(message) => {
            eprintln!("\nError: {}", message);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every checked layout set is clean.
fn run_check(root: &str, only: Option<&str>) -> Result<bool, String> {
    let start = Instant::now();
    let store = FsLayoutStore::new(root);
    let layout_sets = match only {
        Some(set) => vec![set.to_string()],
        None => store
            .layout_sets()
            .map_err(|e| format!("Failed to list layout sets in '{}': {}", root, e))?,
    };

    let mut clean = true;
    for layout_set in &layout_sets {
        println!("\nLayout set '{}'", layout_set);
        let loaded = store
            .load_form_layouts(layout_set)
            .map_err(|e| format!("Failed to read layout set '{}': {}", layout_set, e))?;
        let converted = convert_loaded_layouts(&loaded);

        for invalid in &converted.invalid_layouts {
            clean = false;
            println!("  -> {}: {}", invalid.page, invalid.reason);
        }
        for (page, layout) in sorted_pages(&converted.layouts) {
            let problems = check_integrity(layout);
            if problems.is_empty() {
                println!("  {}: {} items", page, layout.len());
            }
            for problem in problems {
                clean = false;
                println!("  -> {}: {}", page, problem);
            }
        }

        let duplicates = find_layouts_containing_duplicate_components(&converted.layouts);
        if !duplicates.duplicate_components.is_empty() {
            clean = false;
            println!(
                "  -> Ids used on several pages: {} (pages: {})",
                duplicates.duplicate_components.join(", "),
                duplicates.duplicate_layouts.join(", ")
            );
        }
    }

    println!("\n--- Summary ---");
    println!("Layout sets checked: {}", layout_sets.len());
    println!("Result:              {}", if clean { "ok" } else { "problems found" });
    println!("Took:                {:?}", start.elapsed());
    Ok(clean)
}

fn sorted_pages(layouts: &FormLayouts) -> Vec<(&String, &InternalLayout)> {
    let mut pages: Vec<_> = layouts.iter().collect();
    pages.sort_by(|a, b| a.0.cmp(b.0));
    pages
}

fn run_convert(path: &str) -> Result<bool, String> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read layout file '{}': {}", path, e))?;
    let external = ExternalFormLayout::from_json(&json)
        .map_err(|e| format!("Failed to parse layout JSON: {}", e))?;
    let layout = InternalLayout::try_from(&external)
        .map_err(|e| format!("Failed to convert layout: {}", e))?;
    let output = serde_json::to_string_pretty(&layout)
        .map_err(|e| format!("Failed to serialize layout: {}", e))?;
    println!("{}", output);
    Ok(true)
}

fn run_navigation(root: &str, layout_set: &str, current_page: Option<&str>) -> Result<bool, String> {
    let mut store = FsLayoutStore::new(root);
    let loaded = store
        .load_form_layouts(layout_set)
        .map_err(|e| format!("Failed to read layout set '{}': {}", layout_set, e))?;
    let settings = store
        .get_layout_settings(layout_set)
        .map_err(|e| format!("Failed to read settings of '{}': {}", layout_set, e))?;
    let converted = convert_loaded_layouts(&loaded);
    if !converted.invalid_layouts.is_empty() {
        return Err(format!(
            "Refusing to reconcile, invalid pages: {}",
            converted.invalid_page_names().join(", ")
        ));
    }

    let schema_url = DEFAULT_LAYOUT_SCHEMA_URL;
    let outcome = add_or_remove_navigation_buttons(
        &converted.layouts,
        |page, layout| {
            let file = internal_to_external(layout).with_default_schema(schema_url);
            store.save_form_layout(layout_set, page, &file)
        },
        current_page,
        settings.receipt_layout_name.as_deref(),
    )
    .map_err(|e| e.to_string())?;

    for page in &outcome.persisted {
        println!("  Updated {}", page);
    }
    for (page, err) in &outcome.failed {
        println!("  -> Failed to update {}: {}", page, err);
    }
    if outcome.persisted.is_empty() && outcome.failed.is_empty() {
        println!("Navigation buttons already match the pages.");
    }
    Ok(outcome.is_complete())
}
