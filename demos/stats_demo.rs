use std::collections::hash_map::DefaultHasher;
use std::hash::BuildHasherDefault;

use clap::Parser;
use keyops_hash::Hashed;
use keyops_hash::KeyTable;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Delete every n-th key after filling, leaving tombstones behind.
    #[arg(short = 'd', long = "delete_every", default_value_t = 3)]
    delete_every: usize,
}

type U64Keys = Hashed<u64, BuildHasherDefault<DefaultHasher>>;

fn main() {
    let args = Args::parse();

    println!(
        "Creating KeyTable with target capacity: {}",
        args.target_capacity
    );

    let mut table: KeyTable<U64Keys, u64> =
        match KeyTable::with_capacity(args.target_capacity, U64Keys::default()) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("Failed to create table: {e}");
                return;
            }
        };

    println!("Actual capacity: {}", table.capacity());
    println!("Filling table with u64 keys up to the load bound...");

    let start_capacity = table.capacity();
    let num_values = (start_capacity * 2 / 3) as u64;
    for value in 0..num_values {
        if let Err(e) = table.insert(&value, value * 2) {
            eprintln!("Insert of {value} failed: {e}");
            return;
        }
    }

    println!("Inserted {} values into table", table.len());
    println!(
        "Final load factor: {:.2}% (capacity {})",
        (table.len() as f64 / table.capacity() as f64) * 100.0,
        table.capacity()
    );
    table.probe_histogram().print();
    table.debug_stats().print();

    if args.delete_every > 0 {
        let deleted = (0..num_values)
            .step_by(args.delete_every)
            .filter(|value| table.delete(value))
            .count();
        println!();
        println!("Deleted {deleted} values");
        table.debug_stats().print();

        if let Err(e) = table.resize(0) {
            eprintln!("Resize failed: {e}");
            return;
        }
        println!();
        println!("After compacting resize:");
        table.probe_histogram().print();
        table.debug_stats().print();
    }

    match table.validate() {
        Ok(()) => println!("Table is consistent"),
        Err(e) => println!("Table is inconsistent: {e}"),
    }
}
