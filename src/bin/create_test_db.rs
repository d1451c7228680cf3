use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month, Time};

use transaction_insights::{NewTransaction, SQLiteTransactionStore, TransactionStore, initialize_db};

/// A utility for creating a test database for the transaction insights server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many transactions to create for each month of the year.
    #[arg(long, short, default_value_t = 5)]
    per_month: u8,
}

const CATEGORIES: [&str; 4] = ["electronics", "jewelery", "men's clothing", "women's clothing"];

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

    println!("Creating test transactions...");

    let mut transactions = Vec::new();
    let mut month = Month::January;

    for _ in 0..12 {
        for i in 0..args.per_month {
            let day = Date::from_calendar_date(2022, month, i % 28 + 1)?;
            let category = CATEGORIES[usize::from(i) % CATEGORIES.len()];
            let price = f64::from(i) * 137.5 + f64::from(month as u8);

            transactions.push(
                NewTransaction::build(
                    &format!("{category} item #{i}"),
                    price,
                    day.with_time(Time::MIDNIGHT).assume_utc(),
                )
                .description(&format!("A sample {category} product sold in {month}"))
                .category(category)
                .sold(i % 2 == 0),
            );
        }

        month = month.next();
    }

    let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)));
    let inserted = store.insert_many(transactions)?;

    println!("Created {inserted} transactions.");
    println!("Success!");

    Ok(())
}
