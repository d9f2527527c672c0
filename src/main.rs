mod analytics;
mod export;
mod filters;
mod models;
mod service;
mod store;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use models::{
    ApplicationDraft, ApplicationPatch, DateRange, FilterCriteria, JobType, Priority,
    SortDirection, SortField, Status,
};
use service::ApplicationService;
use store::RecordStore;

#[derive(Parser)]
#[command(name = "apptrack")]
#[command(about = "Job application tracking - record, organize, and analyze your pipeline")]
struct Cli {
    /// Path to the data file (defaults to the user data directory)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a job application
    Add {
        /// Company name
        company: String,

        /// Position title
        position: String,

        /// Pipeline status
        #[arg(short, long, value_enum, default_value = "wishlist")]
        status: Status,

        /// Priority
        #[arg(short, long, value_enum, default_value = "medium")]
        priority: Priority,

        /// Date applied (YYYY-MM-DD)
        #[arg(long)]
        applied: Option<String>,

        /// Job type
        #[arg(long, value_enum)]
        job_type: Option<JobType>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        salary: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        contact_name: Option<String>,

        #[arg(long)]
        contact_email: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Next follow-up date (YYYY-MM-DD)
        #[arg(long)]
        follow_up: Option<String>,
    },

    /// List applications
    List {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        sort: SortArgs,
    },

    /// Show application details
    Show {
        /// Application ID
        id: String,
    },

    /// Update an application
    Update {
        /// Application ID
        id: String,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        position: Option<String>,

        /// Pipeline status
        #[arg(short, long, value_enum)]
        status: Option<Status>,

        #[arg(short, long, value_enum)]
        priority: Option<Priority>,

        /// Date applied (YYYY-MM-DD)
        #[arg(long)]
        applied: Option<String>,

        #[arg(long, value_enum)]
        job_type: Option<JobType>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        salary: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        contact_name: Option<String>,

        #[arg(long)]
        contact_email: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Next follow-up date (YYYY-MM-DD)
        #[arg(long)]
        follow_up: Option<String>,
    },

    /// Delete an application
    Delete {
        /// Application ID
        id: String,
    },

    /// Show pipeline statistics
    Stats,

    /// Export applications
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },

    /// Erase all stored applications
    Clear {
        /// Confirm erasure
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Export as CSV
    Csv {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        sort: SortArgs,
    },

    /// Export as a self-contained HTML report
    Report {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        sort: SortArgs,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Filter by status (repeatable)
    #[arg(short, long, value_enum)]
    status: Vec<Status>,

    /// Filter by priority (repeatable)
    #[arg(short, long, value_enum)]
    priority: Vec<Priority>,

    /// Filter by job type (repeatable)
    #[arg(long, value_enum)]
    job_type: Vec<JobType>,

    /// Case-insensitive search over company, position, location,
    /// description, and notes
    #[arg(short = 'q', long)]
    search: Option<String>,

    /// Keep applications applied on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Keep applications applied on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,
}

impl FilterArgs {
    fn into_criteria(self) -> FilterCriteria {
        let date_range = if self.from.is_some() || self.to.is_some() {
            Some(DateRange {
                start: self.from,
                end: self.to,
            })
        } else {
            None
        };
        FilterCriteria {
            status: self.status,
            priority: self.priority,
            job_type: self.job_type,
            search: self.search,
            date_range,
        }
    }
}

#[derive(Args)]
struct SortArgs {
    /// Sort by field
    #[arg(long, value_enum)]
    sort: Option<SortField>,

    /// Sort descending
    #[arg(long)]
    desc: bool,
}

fn select(service: &ApplicationService, filter: FilterArgs, sort: SortArgs) -> Vec<models::ApplicationRecord> {
    let records = service.list();
    let mut records = filters::filter(&records, &filter.into_criteria());
    if let Some(field) = sort.sort {
        let direction = if sort.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        records = filters::sort(&records, field, direction);
    }
    records
}

fn write_or_print(content: &str, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = match cli.data_file {
        Some(path) => RecordStore::open_at(path),
        None => RecordStore::open(),
    }
    .unwrap_or_else(|err| {
        tracing::warn!(%err, "durable storage unavailable, falling back to in-memory store");
        RecordStore::in_memory()
    });
    if !store.is_durable() {
        eprintln!("Warning: durable storage unavailable; changes will not outlive this run.");
    }
    let service = ApplicationService::new(store);

    match cli.command {
        Commands::Add {
            company,
            position,
            status,
            priority,
            applied,
            job_type,
            location,
            salary,
            url,
            contact_name,
            contact_email,
            description,
            notes,
            follow_up,
        } => {
            let draft = ApplicationDraft {
                company,
                position,
                status: Some(status),
                priority: Some(priority),
                applied_date: applied,
                location,
                salary,
                job_type,
                description,
                notes,
                url,
                contact_email,
                contact_name,
                next_follow_up: follow_up,
            };
            match service.create(draft) {
                Ok(record) => {
                    println!("Added {} at {} ({})", record.position, record.company, record.id);
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    std::process::exit(1);
                }
            }
        }

        Commands::List { filter, sort } => {
            let records = select(&service, filter, sort);
            if records.is_empty() {
                println!("No applications found.");
            } else {
                println!(
                    "{:<28} {:<10} {:<8} {:<20} {:<24} {:<12}",
                    "ID", "STATUS", "PRIORITY", "COMPANY", "POSITION", "APPLIED"
                );
                println!("{}", "-".repeat(106));
                for record in records {
                    println!(
                        "{:<28} {:<10} {:<8} {:<20} {:<24} {:<12}",
                        record.id,
                        record.status,
                        record.priority,
                        truncate(&record.company, 18),
                        truncate(&record.position, 22),
                        record.applied_date.as_deref().unwrap_or("-"),
                    );
                }
            }
        }

        Commands::Show { id } => match service.get(&id) {
            Some(record) => {
                println!("{} at {}", record.position, record.company);
                println!("ID: {}", record.id);
                println!("Status: {}", record.status);
                println!("Priority: {}", record.priority);
                if let Some(date) = &record.applied_date {
                    println!("Applied: {date}");
                }
                if let Some(job_type) = record.job_type {
                    println!("Job type: {job_type}");
                }
                if let Some(location) = &record.location {
                    println!("Location: {location}");
                }
                if let Some(salary) = &record.salary {
                    println!("Salary: {salary}");
                }
                if let Some(url) = &record.url {
                    println!("URL: {url}");
                }
                if let Some(name) = &record.contact_name {
                    println!("Contact: {name}");
                }
                if let Some(email) = &record.contact_email {
                    println!("Contact email: {email}");
                }
                if let Some(date) = &record.next_follow_up {
                    println!("Next follow-up: {date}");
                }
                println!("Created: {}", record.created_at);
                println!("Updated: {}", record.updated_at);
                if let Some(description) = &record.description {
                    println!("\n--- Description ---\n{description}");
                }
                if let Some(notes) = &record.notes {
                    println!("\n--- Notes ---\n{notes}");
                }
            }
            None => {
                println!("Application '{id}' not found.");
            }
        },

        Commands::Update {
            id,
            company,
            position,
            status,
            priority,
            applied,
            job_type,
            location,
            salary,
            url,
            contact_name,
            contact_email,
            description,
            notes,
            follow_up,
        } => {
            let patch = ApplicationPatch {
                company,
                position,
                status,
                priority,
                applied_date: applied,
                location,
                salary,
                job_type,
                description,
                notes,
                url,
                contact_email,
                contact_name,
                next_follow_up: follow_up,
            };
            if patch.is_empty() {
                println!("Nothing to update.");
            } else {
                match service.update(&id, &patch) {
                    Some(record) => {
                        println!("Updated {} at {} ({})", record.position, record.company, record.status);
                    }
                    None => {
                        println!("Application '{id}' not found.");
                    }
                }
            }
        }

        Commands::Delete { id } => {
            if service.delete(&id) {
                println!("Deleted '{id}'.");
            } else {
                println!("Application '{id}' not found (nothing deleted).");
            }
        }

        Commands::Stats => {
            let records = service.list();
            let summary = analytics::summarize(&records);

            println!("Total applications: {}", summary.total);

            println!("\nBy status:");
            for status in Status::ALL {
                println!("  {:<10} {}", status.title(), summary.status_count(status));
            }

            println!("\nBy priority:");
            for priority in Priority::ALL {
                println!("  {:<10} {}", priority, summary.priority_count(priority));
            }

            println!("\nResponse rate:    {:>6.1}%", summary.response_rate);
            println!("Success rate:     {:>6.1}%", summary.success_rate);
            println!("Avg. days to response: {:.1}", summary.average_time_to_response);

            if !summary.trend.is_empty() {
                println!("\nCreated in the last 30 days:");
                for point in &summary.trend {
                    println!("  {}  {}", point.date, point.count);
                }
            }
        }

        Commands::Export { command } => match command {
            ExportCommands::Csv { output, filter, sort } => {
                let records = select(&service, filter, sort);
                write_or_print(&export::to_csv(&records), output)?;
            }
            ExportCommands::Report { output, filter, sort } => {
                let records = select(&service, filter, sort);
                write_or_print(&export::to_report(&records), output)?;
            }
        },

        Commands::Clear { yes } => {
            if yes {
                service.store().clear();
                println!("All applications erased.");
            } else {
                match service.store().path() {
                    Some(path) => println!(
                        "This erases every application stored at {}. Re-run with --yes to confirm.",
                        path.display()
                    ),
                    None => println!("This erases every stored application. Re-run with --yes to confirm."),
                }
            }
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}
