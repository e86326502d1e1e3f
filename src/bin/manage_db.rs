use std::{
    error::Error,
    io::{self, Write},
    process::exit,
};

use clap::{Parser, Subcommand};

use finance_tracker::{DbConfig, database_status, reset_db};

/// A utility for managing the SQLite database of the finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "finance_tracker.db", global = true)]
    db_path: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database and its tables if the file does not exist yet.
    Init,
    /// Delete all users and transactions, then recreate the empty tables.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Show the tables in the database and how many rows they hold.
    Status,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = DbConfig::new(&args.db_path);

    match args.command {
        Command::Init => init(&config),
        Command::Reset { yes } => reset(&config, yes),
        Command::Status => status(&config),
    }
}

fn init(config: &DbConfig) -> Result<(), Box<dyn Error>> {
    if config.path().exists() {
        println!("Database already exists at {:?}", config.path());
        return Ok(());
    }

    config.initialize()?;
    println!("Database initialized at {:?}", config.path());

    Ok(())
}

fn reset(config: &DbConfig, skip_confirmation: bool) -> Result<(), Box<dyn Error>> {
    if !skip_confirmation {
        println!("WARNING: This will DELETE ALL DATA in {:?}!", config.path());
        print!("Type 'DELETE' to confirm: ");
        io::stdout().flush()?;

        let mut confirmation = String::new();
        io::stdin().read_line(&mut confirmation)?;

        if confirmation.trim() != "DELETE" {
            eprintln!("Operation cancelled.");
            exit(1);
        }
    }

    reset_db(config)?;
    println!("Database reset successfully!");

    Ok(())
}

fn status(config: &DbConfig) -> Result<(), Box<dyn Error>> {
    let Some(status) = database_status(config)? else {
        eprintln!("Database does not exist: {:?}", config.path());
        exit(1);
    };

    println!("Database exists: {:?}", config.path());
    println!("Tables: {}", status.tables.join(", "));

    if let Some(user_count) = status.user_count {
        println!("Users: {user_count}");
    }

    if let Some(transaction_count) = status.transaction_count {
        println!("Transactions: {transaction_count}");
    }

    Ok(())
}
