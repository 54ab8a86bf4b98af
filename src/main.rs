//! xrdb CLI
//!
//! Entry point for the `xrdb` command-line tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use xrdb::config::default_host_path;
use xrdb::{encode_value, getopt, standard_options, Database, EffectiveResources};

#[derive(Parser)]
#[command(name = "xrdb")]
#[command(about = "Query and merge X resource databases", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Resource file to load (repeatable, later files win)
    #[arg(long = "file", short = 'f')]
    files: Vec<PathBuf>,

    /// Resource line to add on top of all files (repeatable)
    #[arg(long)]
    xrm: Vec<String>,

    /// Do not load the host resource file ($XENVIRONMENT or ~/.Xdefaults)
    #[arg(long)]
    no_host: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the value for a resource name and class
    Query {
        /// Dotted resource name, e.g. xterm.vt100.background
        name: String,

        /// Dotted resource class, e.g. XTerm.VT100.Background
        class: String,

        #[command(flatten)]
        sources: SourceArgs,

        /// Value to print when nothing matches
        #[arg(long)]
        default: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print every entry of the merged database
    Dump {
        #[command(flatten)]
        sources: SourceArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Apply the standard X options to an argument list
    Options {
        /// Application name prepended to every specifier
        #[arg(long, default_value = "app")]
        name: String,

        /// Arguments to parse (after --)
        #[arg(last = true)]
        args: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            name,
            class,
            sources,
            default,
            json,
        } => {
            run_query(&name, &class, &sources, default, json);
        }
        Commands::Dump { sources, json } => {
            run_dump(&sources, json);
        }
        Commands::Options { name, args } => {
            run_options(&name, &args);
        }
    }
}

fn load_resources(sources: &SourceArgs) -> EffectiveResources {
    let host = if sources.no_host {
        None
    } else {
        default_host_path()
    };

    match EffectiveResources::build(host.as_deref(), &sources.files, &sources.xrm) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error loading resources: {}", e);
            process::exit(1);
        }
    }
}

fn run_query(name: &str, class: &str, sources: &SourceArgs, default: Option<String>, json: bool) {
    let resources = load_resources(sources);

    let result = match &default {
        Some(d) => resources.database.query_or(name, class, d),
        None => resources.database.query(name, class),
    };
    let value = match result {
        Ok(v) => v.clone(),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if json {
        let output = serde_json::json!({
            "name": name,
            "class": class,
            "value": value,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", value);
    }
}

fn run_dump(sources: &SourceArgs, json: bool) {
    let resources = load_resources(sources);

    if json {
        match resources.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_entries(&resources.database);
    }
}

fn run_options(name: &str, args: &[String]) {
    let mut db = Database::new();

    let rest = match getopt(name, &mut db, args, &standard_options()) {
        Ok(rest) => rest,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    print_entries(&db);
    if !rest.is_empty() {
        println!();
        println!("Remaining arguments: {}", rest.join(" "));
    }
}

fn print_entries(db: &Database<String>) {
    for (specifier, value) in db.entries() {
        println!("{}:\t{}", specifier, encode_value(value));
    }
}
