use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use prettytable::{Table, row};
use techfest_mind::config::Config;
use techfest_mind::db::{connect_db, load_gate_state, save_gate_state};
use techfest_mind::events::fields::FieldMap;
use techfest_mind::events::import::{SurrealEventStore, import_from_sources};
use techfest_mind::events::models::{EventRecord, ImportSummary};
use techfest_mind::gate::{GateState, RegistrationGate, SystemClock};

#[derive(Parser)]
#[command(name = "techfest")]
#[command(about = "Techfest event catalog CLI tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import events from the CSV/XLSX survey exports
    Import {
        /// CSV file path (defaults to FEST_CSV_PATH)
        #[arg(long)]
        csv: Option<String>,
        /// XLSX file path (defaults to FEST_XLSX_PATH)
        #[arg(long)]
        xlsx: Option<String>,
    },
    /// List stored events
    List {
        /// Department filter (AIML, CSE, ECE, Mech, Civil, MBA, Applied Science, Common)
        #[arg(long)]
        department: Option<String>,
        /// Category filter (Technical, Non-Technical, Cultural)
        #[arg(long)]
        category: Option<String>,
    },
    /// Inspect or change the registration gate
    Gate {
        #[command(subcommand)]
        gate_command: GateCommands,
    },
}

#[derive(Subcommand)]
enum GateCommands {
    /// Show the current gate state
    Status,
    /// Open registrations
    Open,
    /// Close registrations now
    Close,
    /// Schedule an automatic close (RFC 3339 timestamp)
    Schedule {
        #[arg(long)]
        at: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let cfg = Config::load()?;
    let db = connect_db(&cfg).await?;

    match cli.command {
        Commands::Import { csv, xlsx } => {
            let csv_path = csv.unwrap_or_else(|| cfg.csv_path.clone());
            let xlsx_path = xlsx.unwrap_or_else(|| cfg.xlsx_path.clone());
            println!("Importing events from {} / {}", csv_path, xlsx_path);

            let store = SurrealEventStore { db: &db };
            let summary =
                import_from_sources(&store, &csv_path, &xlsx_path, &FieldMap::default()).await?;
            print_summary(&summary);
        }
        Commands::List {
            department,
            category,
        } => {
            list_events(&db, department.as_deref(), category.as_deref()).await?;
        }
        Commands::Gate { gate_command } => {
            let state = load_gate_state(&db).await?.unwrap_or(GateState::Open);
            let mut gate = RegistrationGate::from_state(state, SystemClock);

            match gate_command {
                GateCommands::Status => {}
                GateCommands::Open => gate.open(),
                GateCommands::Close => gate.close(),
                GateCommands::Schedule { at } => {
                    let at: DateTime<Utc> = at.parse()?;
                    gate.schedule_close(at);
                }
            }

            let state = gate.state();
            save_gate_state(&db, state).await?;
            match state {
                GateState::Open => println!("Registrations: open"),
                GateState::CloseScheduled { at } => {
                    println!("Registrations: open, closing at {}", at)
                }
                GateState::Closed => println!("Registrations: closed"),
            }
        }
    }

    Ok(())
}

fn print_summary(summary: &ImportSummary) {
    println!(
        "Parsed {} unique events, imported {}, {} errors.",
        summary.total,
        summary.imported,
        summary.errors.len()
    );

    if !summary.by_department.is_empty() {
        let mut table = Table::new();
        table.add_row(row!["Department", "Events"]);
        for (department, count) in &summary.by_department {
            table.add_row(row![department, count]);
        }
        table.printstd();
    }

    for failure in &summary.errors {
        println!("❌ {}: {}", failure.name, failure.message);
    }
}

async fn list_events(
    db: &surrealdb::Surreal<surrealdb::engine::remote::ws::Client>,
    department: Option<&str>,
    category: Option<&str>,
) -> Result<()> {
    let mut sql = String::from(
        "SELECT name, slug, category, department, team_size, prizes, date,
                registration_fee, max_participants, venue, description, coordinators
         FROM event",
    );
    match (department, category) {
        (Some(_), Some(_)) => sql.push_str(" WHERE department = $department AND category = $category"),
        (Some(_), None) => sql.push_str(" WHERE department = $department"),
        (None, Some(_)) => sql.push_str(" WHERE category = $category"),
        (None, None) => {}
    }
    sql.push_str(" ORDER BY department, name");

    let mut query = db.query(sql);
    if let Some(department) = department {
        query = query.bind(("department", department.to_string()));
    }
    if let Some(category) = category {
        query = query.bind(("category", category.to_string()));
    }
    let mut resp = query.await?;
    let events: Vec<EventRecord> = resp.take(0)?;

    if events.is_empty() {
        println!("No events found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(row![
        "Name",
        "Category",
        "Department",
        "Date",
        "Team",
        "Fee",
        "Venue"
    ]);
    for e in &events {
        let team = if e.team_size.min == e.team_size.max {
            e.team_size.min.to_string()
        } else {
            format!("{}-{}", e.team_size.min, e.team_size.max)
        };
        table.add_row(row![
            e.name,
            e.category,
            e.department,
            e.date,
            team,
            e.registration_fee,
            e.venue
        ]);
    }
    table.printstd();
    Ok(())
}
