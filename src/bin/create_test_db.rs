use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime, error::ComponentRange};

use finance_tracker::{
    NewUser, Transaction, TransactionType, create_transaction, create_user, initialize_db,
};

/// A utility for creating a test database for the finance tracker API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let user = create_user(
        NewUser {
            username: "test".to_owned(),
            email: "test@example.com".to_owned(),
            password_hash: bcrypt::hash("test", bcrypt::DEFAULT_COST)?,
        },
        &conn,
    )?;

    println!("Creating test transactions...");

    let today = OffsetDateTime::now_utc().date();
    let last_month = first_day_of_previous_month(today)?;
    let samples = [
        (3200.0, "Salary", TransactionType::Income, last_month, "Monthly pay"),
        (1450.0, "Rent", TransactionType::Expense, last_month, "Flat rent"),
        (3200.0, "Salary", TransactionType::Income, today, "Monthly pay"),
        (180.5, "Groceries", TransactionType::Expense, today, "Weekly shop"),
        (42.0, "Transport", TransactionType::Expense, today, "Bus top up"),
        (60.0, "Side Project", TransactionType::Income, today, "Sold a sticker pack"),
    ];

    for (amount, category, kind, date, description) in samples {
        create_transaction(
            user.id,
            Transaction::build(amount, category, kind, date)
                .description(Some(description.to_owned())),
            &conn,
        )?;
    }

    println!(
        "Success! Seeded user 'test' (ID {}) for the authentication layer to issue a session to.",
        user.id
    );

    Ok(())
}

fn first_day_of_previous_month(today: Date) -> Result<Date, ComponentRange> {
    (today.replace_day(1)? - Duration::days(1)).replace_day(1)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::first_day_of_previous_month;

    #[test]
    fn previous_month_after_february_is_february() {
        assert_eq!(
            first_day_of_previous_month(date!(2025 - 03 - 01)),
            Ok(date!(2025 - 02 - 01))
        );
        assert_eq!(
            first_day_of_previous_month(date!(2025 - 03 - 31)),
            Ok(date!(2025 - 02 - 01))
        );
    }

    #[test]
    fn previous_month_of_january_is_last_december() {
        assert_eq!(
            first_day_of_previous_month(date!(2026 - 01 - 01)),
            Ok(date!(2025 - 12 - 01))
        );
    }
}
