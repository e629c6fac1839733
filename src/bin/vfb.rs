//! vfb CLI: resolve and summarize knowledge-base terms offline.
//!
//! Usage:
//!   vfb --fixtures bundle.json summary <key>... [--json]
//!   vfb --fixtures bundle.json lookup <key>
//!   vfb --fixtures bundle.json import [--db path]

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use vfb_connect::backend::FixtureBundle;
use vfb_connect::{
    ClientConfig, InMemoryBackend, OpenStore, SqliteTermStore, Summary, TermStore, VfbConnect,
};

#[derive(Parser)]
#[command(
    name = "vfb",
    version,
    about = "Query Virtual Fly Brain terms from a fixture bundle"
)]
struct Cli {
    /// JSON bundle of TermInfo documents, lookup entries and canned answers
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,
    /// YAML configuration (defaults to the user config file when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Read documents through this SQLite term store
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the summary of each key
    Summary {
        #[arg(required = true)]
        keys: Vec<String>,
        /// One JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// Resolve a label, symbol, id or cross-reference to an id
    Lookup { key: String },
    /// Entities cross-referenced from an external database
    Xref {
        db: String,
        #[arg(required = true)]
        accessions: Vec<String>,
    },
    /// Subclasses of a class expression ('quoted labels' or a single key)
    Subclasses { query: String },
    /// Superclasses of a class expression
    Superclasses { query: String },
    /// Instances of a class expression
    Instances { query: String },
    /// Classes overlapping a region
    Region {
        region: String,
        /// Only cell types
        #[arg(long)]
        cells: bool,
    },
    /// Summaries of every dataset
    Datasets,
    /// Summaries of every template
    Templates,
    /// Copy the bundle's documents into a SQLite term store
    Import {
        /// Path to SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

/// Get the default term store path (~/.local/share/vfb-connect/terms.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    let vfb_dir = data_dir.join("vfb-connect");
    std::fs::create_dir_all(&vfb_dir).ok();
    vfb_dir.join("terms.db")
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, store: Option<PathBuf>) -> Result<ClientConfig, String> {
    let config = match path {
        Some(path) => ClientConfig::load(path),
        None => ClientConfig::load_or_default(),
    }
    .map_err(|e| format!("Failed to load configuration: {}", e))?;
    Ok(match store {
        Some(store) => config.with_term_store(store),
        None => config,
    })
}

fn open_session(cli: &Cli) -> Result<VfbConnect, String> {
    let fixtures = cli
        .fixtures
        .as_deref()
        .ok_or_else(|| "--fixtures is required".to_string())?;
    let backend = InMemoryBackend::load(fixtures)
        .map_err(|e| format!("Failed to load fixtures: {}", e))?;
    let config = load_config(cli.config.as_deref(), cli.store.clone())?;
    VfbConnect::connect(backend, config).map_err(|e| format!("Failed to connect: {}", e))
}

fn print_summary(summary: &Summary, json: bool) -> Result<(), String> {
    if json {
        let line = summary.to_json().map_err(|e| e.to_string())?;
        println!("{}", line);
    } else {
        for (field, value) in summary.fields() {
            println!("{:<16}{}", field, value);
        }
        println!();
    }
    Ok(())
}

fn cmd_summary(vfb: &VfbConnect, keys: &[String], json: bool) -> i32 {
    let terms = match vfb.terms(keys) {
        Ok(terms) => terms,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if terms.is_empty() {
        eprintln!("Error: none of the keys resolved");
        return 1;
    }
    for term in &terms {
        let printed = term
            .summary()
            .map_err(|e| e.to_string())
            .and_then(|s| print_summary(&s, json));
        if let Err(e) = printed {
            eprintln!("Error: {}: {}", term.id(), e);
            return 1;
        }
    }
    0
}

fn cmd_lookup(vfb: &VfbConnect, key: &str) -> i32 {
    match vfb.resolve_key(key) {
        Ok(id) => {
            let name = vfb.lookup_name(&id).unwrap_or_default();
            println!("{}\t{}", id, name);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_xref(vfb: &VfbConnect, db: &str, accessions: &[String]) -> i32 {
    match vfb.xref_to_ids(db, accessions) {
        Ok(matches) if matches.is_empty() => {
            eprintln!("Warning: no entities carry these cross-references");
            1
        }
        Ok(matches) => {
            for m in matches {
                println!("{}:{}\t{}", m.db, m.accession, m.id);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn print_ids(result: vfb_connect::VfbResult<Vec<String>>) -> i32 {
    match result {
        Ok(ids) => {
            for id in ids {
                println!("{}", id);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn print_summaries(result: vfb_connect::VfbResult<Vec<Summary>>) -> i32 {
    match result {
        Ok(summaries) => {
            for summary in &summaries {
                if let Err(e) = print_summary(summary, false) {
                    eprintln!("Error: {}", e);
                    return 1;
                }
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_import(fixtures: Option<&Path>, db: Option<PathBuf>) -> i32 {
    let Some(fixtures) = fixtures else {
        eprintln!("Error: --fixtures is required");
        return 1;
    };
    let bundle = match FixtureBundle::load(fixtures) {
        Ok(bundle) => bundle,
        Err(e) => {
            eprintln!("Error: Failed to load fixtures: {}", e);
            return 1;
        }
    };
    let db_path = db.unwrap_or_else(default_db_path);
    let store = match SqliteTermStore::open(&db_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: Failed to open database: {}", e);
            return 1;
        }
    };
    let mut imported = 0;
    for doc in &bundle.documents {
        match store.put_document(doc) {
            Ok(_) => imported += 1,
            Err(e) => eprintln!("Warning: skipped document: {}", e),
        }
    }
    println!("Imported {} documents into {}", imported, db_path.display());
    0
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Import { db } = &cli.command {
        let code = cmd_import(cli.fixtures.as_deref(), db.clone());
        std::process::exit(code);
    }

    let vfb = match open_session(&cli) {
        Ok(vfb) => vfb,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let code = match &cli.command {
        Commands::Summary { keys, json } => cmd_summary(&vfb, keys, *json),
        Commands::Lookup { key } => cmd_lookup(&vfb, key),
        Commands::Xref { db, accessions } => cmd_xref(&vfb, db, accessions),
        Commands::Subclasses { query } => print_ids(vfb.get_subclasses(query)),
        Commands::Superclasses { query } => print_ids(vfb.get_superclasses(query)),
        Commands::Instances { query } => print_ids(vfb.get_instances(query)),
        Commands::Region { region, cells } => {
            print_summaries(vfb.get_terms_by_region(region, *cells))
        }
        Commands::Datasets => print_summaries(vfb.get_datasets()),
        Commands::Templates => print_summaries(vfb.get_templates()),
        Commands::Import { .. } => 0,
    };
    std::process::exit(code);
}
