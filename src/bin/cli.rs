//! RosterDB CLI
//!
//! Command-line interface over a RosterDB data directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rosterdb::report::{self, SalaryReport};
use rosterdb::{AccessLevel, Config, Department, Engine, Record, SearchCriteria, Status};
use tracing_subscriber::{fmt, EnvFilter};

/// RosterDB CLI
#[derive(Parser, Debug)]
#[command(name = "rosterdb")]
#[command(about = "Keyed employee record store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./rosterdb_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a new employee
    Add {
        /// Employee ID (e.g. AB1234)
        id: String,
        first_name: String,
        last_name: String,
        position: String,
        #[arg(long, default_value = "Unknown")]
        department: Department,
        #[arg(long)]
        salary: f64,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        manager: Option<String>,
        /// Comma-separated skill tags
        #[arg(long, value_delimiter = ',')]
        skills: Vec<String>,
        #[arg(long, default_value = "Basic")]
        access: AccessLevel,
    },

    /// Remove an employee
    Remove { id: String },

    /// Show one employee
    Show { id: String },

    /// Change an employee's salary
    UpdateSalary { id: String, salary: f64 },

    /// Change an employee's status
    SetStatus { id: String, status: Status },

    /// Search by any combination of filters
    Search {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        department: Option<Department>,
        #[arg(long)]
        min_salary: Option<f64>,
        #[arg(long)]
        max_salary: Option<f64>,
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        skill: Option<String>,
        #[arg(long)]
        case_sensitive: bool,
    },

    /// List every employee, sorted by ID
    List,

    /// Print a report
    Report {
        #[arg(value_enum)]
        kind: ReportKind,
    },

    /// Hash table statistics
    Stats,

    /// Export all records as CSV
    Export { path: PathBuf },

    /// Write a timestamped backup into the data directory
    Backup,

    /// Replace all records with the contents of a backup file
    Restore { path: PathBuf },

    /// Re-validate every stored record
    Audit,

    /// Show data file sizes
    Files,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReportKind {
    Salary,
    Departments,
    Status,
    Skills,
    Hierarchy,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,rosterdb=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .save_on_close(false)
        .build();

    let engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open data directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&engine, args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(engine: &Engine, command: Commands) -> rosterdb::Result<()> {
    let store = engine.store();

    match command {
        Commands::Add {
            id,
            first_name,
            last_name,
            position,
            department,
            salary,
            email,
            phone,
            manager,
            skills,
            access,
        } => {
            let mut builder =
                Record::builder(&id, first_name, last_name, position, department, salary)
                    .skills(skills.iter().map(|s| s.trim()))
                    .access_level(access);
            if let Some(email) = email {
                builder = builder.email(email);
            }
            if let Some(phone) = phone {
                builder = builder.phone(phone);
            }
            if let Some(manager) = manager {
                builder = builder.manager(manager);
            }
            let record = builder.build()?;

            if store.insert(record)? {
                engine.save()?;
                println!("Added {}", id);
            } else {
                println!("Employee {} already exists", id);
            }
        }

        Commands::Remove { id } => {
            if store.remove(&id) {
                engine.save()?;
                println!("Removed {}", id);
            } else {
                println!("Employee {} not found", id);
            }
        }

        Commands::Show { id } => match store.find(&id) {
            Some(record) => print_record(&record),
            None => println!("Employee {} not found", id),
        },

        Commands::UpdateSalary { id, salary } => {
            modify(engine, &id, |r| r.salary = salary)?;
        }

        Commands::SetStatus { id, status } => {
            modify(engine, &id, |r| r.status = status)?;
        }

        Commands::Search {
            id,
            first_name,
            last_name,
            position,
            department,
            min_salary,
            max_salary,
            status,
            skill,
            case_sensitive,
        } => {
            let criteria = SearchCriteria {
                id,
                first_name,
                last_name,
                position,
                department,
                min_salary,
                max_salary,
                status,
                skill,
                case_sensitive,
            };
            let mut results = store.search(&criteria);
            results.sort_by(|a, b| a.id.cmp(&b.id));
            print_table(&results);
        }

        Commands::List => {
            let mut all = store.get_all();
            all.sort_by(|a, b| a.id.cmp(&b.id));
            print_table(&all);
        }

        Commands::Report { kind } => print_report(kind, &store.get_all()),

        Commands::Stats => {
            println!("Total Employees: {}", store.len());
            println!("{}", engine.statistics());
        }

        Commands::Export { path } => {
            let rows = engine.export_csv(&path)?;
            println!("Exported {} employees to {}", rows, path.display());
        }

        Commands::Backup => {
            let path = engine.backup()?;
            println!("Backup created: {}", path.display());
        }

        Commands::Restore { path } => {
            let report = engine.restore(&path)?;
            engine.save()?;
            println!(
                "Restored {} employees ({} skipped, {} duplicates)",
                report.loaded, report.skipped, report.duplicates
            );
        }

        Commands::Audit => {
            let failures = engine.audit();
            for (id, error) in &failures {
                println!("Invalid record - ID: {}, Error: {}", id, error);
            }
            println!(
                "Valid records: {}, invalid records: {}",
                store.len() - failures.len(),
                failures.len()
            );
        }

        Commands::Files => {
            let info = engine.file_info();
            let describe = |bytes: Option<u64>| match bytes {
                Some(n) => format!("{} bytes", n),
                None => "not found".to_string(),
            };
            println!(
                "Primary: {} ({})",
                engine.data_path().display(),
                describe(info.primary_bytes)
            );
            println!(
                "Backup:  {} ({})",
                engine.backup_path().display(),
                describe(info.backup_bytes)
            );
        }
    }

    Ok(())
}

/// Fetch, change, and write back one record
fn modify(engine: &Engine, id: &str, change: impl FnOnce(&mut Record)) -> rosterdb::Result<()> {
    let store = engine.store();
    let Some(mut record) = store.find(id) else {
        println!("Employee {} not found", id);
        return Ok(());
    };
    change(&mut record);
    if store.update(id, record)? {
        engine.save()?;
        println!("Updated {}", id);
    }
    Ok(())
}

fn print_record(r: &Record) {
    let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
    println!("{:<15}{}", "ID:", r.id);
    println!("{:<15}{}", "Name:", r.full_name());
    println!("{:<15}{}", "Position:", r.position);
    println!("{:<15}{}", "Department:", r.department);
    println!("{:<15}${:.2}", "Salary:", r.salary);
    println!("{:<15}{}", "Email:", or_na(&r.email));
    println!("{:<15}{}", "Phone:", or_na(&r.phone));
    println!("{:<15}{}", "Hire Date:", r.hire_date());
    println!("{:<15}{}", "Status:", r.status);
    println!("{:<15}{}", "Manager ID:", or_na(&r.manager_id));
    println!("{:<15}{}", "Access Level:", r.access_level);
    if r.skills.is_empty() {
        println!("{:<15}None", "Skills:");
    } else {
        println!("{:<15}{}", "Skills:", r.skills.join(", "));
    }
}

fn print_table(records: &[Record]) {
    if records.is_empty() {
        println!("No employees found.");
        return;
    }
    println!(
        "{:<8}{:<22}{:<22}{:<13}{:>12}  {:<12}",
        "ID", "Name", "Position", "Department", "Salary", "Status"
    );
    for r in records {
        println!(
            "{:<8}{:<22}{:<22}{:<13}{:>12.2}  {:<12}",
            r.id,
            r.full_name(),
            r.position,
            r.department.as_str(),
            r.salary,
            r.status.as_str()
        );
    }
    println!("Total employees: {}", records.len());
}

fn print_report(kind: ReportKind, records: &[Record]) {
    match kind {
        ReportKind::Salary => match SalaryReport::from_records(records) {
            Some(s) => {
                println!("Total Employees: {}", s.count);
                println!("Total Payroll: ${:.2}", s.total);
                println!("Average Salary: ${:.2}", s.mean);
                println!("Median Salary: ${:.2}", s.median);
                println!("Minimum Salary: ${:.2}", s.min);
                println!("Maximum Salary: ${:.2}", s.max);
                println!("Salary Distribution:");
                for (label, count) in &s.bands {
                    let share = 100.0 * *count as f64 / s.count as f64;
                    println!("  {:<12}: {} ({:.1}%)", label, count, share);
                }
            }
            None => println!("No employees to analyze."),
        },
        ReportKind::Departments => {
            for d in report::department_summary(records) {
                println!("{}:", d.department);
                println!("  Employees: {}", d.headcount);
                println!("  Total Salary Budget: ${:.2}", d.total_salary);
                println!("  Average Salary: ${:.2}", d.average_salary);
            }
        }
        ReportKind::Status => {
            for (status, count) in report::status_breakdown(records) {
                let share = if records.is_empty() {
                    0.0
                } else {
                    100.0 * count as f64 / records.len() as f64
                };
                println!("{:<12}: {} ({:.1}%)", status.as_str(), count, share);
            }
        }
        ReportKind::Skills => {
            let skills = report::skill_frequencies(records);
            println!("Total Unique Skills: {}", skills.len());
            for (rank, (skill, count)) in skills.iter().take(15).enumerate() {
                println!("{:>2}. {:<25}: {} employees", rank + 1, skill, count);
            }
        }
        ReportKind::Hierarchy => print!("{}", report::management_hierarchy(records)),
    }
}
