use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use finance_tracker::{
    initialize_db,
    transaction::{Amount, NewTransaction, Transaction, TransactionType, create_transactions},
};

/// A utility for creating a test database for the finance_tracker server.
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

    println!("Creating example transactions...");

    let transactions = example_transactions(OffsetDateTime::now_utc().date())?;
    let count = create_transactions(transactions, &conn)?;

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}

/// Three months of income, expenses and investments ending at `today`.
fn example_transactions(today: Date) -> Result<Vec<NewTransaction>, Box<dyn Error>> {
    let templates: [(i64, TransactionType, &str, &str, Option<&str>); 10] = [
        (0, TransactionType::Income, "Salary", "5000", Some("Monthly pay")),
        (2, TransactionType::Expense, "Rent", "1500", None),
        (5, TransactionType::Expense, "Groceries", "180.45", None),
        (9, TransactionType::Investment, "Index Fund", "500", Some("Automatic")),
        (12, TransactionType::Expense, "Utilities", "95.20", None),
        (16, TransactionType::Income, "Freelance", "750", Some("Website build")),
        (20, TransactionType::Expense, "Dining Out", "62.30", None),
        (23, TransactionType::Expense, "Groceries", "140.10", None),
        (25, TransactionType::Investment, "Retirement", "300", None),
        (27, TransactionType::Expense, "Transport", "45", None),
    ];

    let mut transactions = Vec::new();

    for month in 0..3 {
        for (day_offset, transaction_type, source, amount, description) in templates {
            let date = today - Duration::days(month * 30 + day_offset);
            let transaction =
                Transaction::build(date, transaction_type, source, Amount::from_str(amount)?)
                    .description(description);

            transactions.push(transaction);
        }
    }

    Ok(transactions)
}
