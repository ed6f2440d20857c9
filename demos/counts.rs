use lencount_rs::{Counter, Grammar};
use std::env;

/// Counts the sentences of a given length (default 11).
///
/// Usage: cargo run --example counts [length]
fn main() {
    env_logger::init();

    let length: usize = match env::args().nth(1).map(|arg| arg.parse()) {
        None => 11,
        Some(Ok(length)) => length,
        Some(Err(_)) => {
            eprintln!("Usage: counts [length]");
            std::process::exit(1);
        }
    };

    let grammar = Grammar::from_rules([
        ("<start>", vec![vec!["<sentence>"]]),
        ("<sentence>", vec![vec!["<noun_phrase>", "<verb>"]]),
        ("<noun_phrase>", vec![vec!["<article>", "<noun>"]]),
        ("<verb>", vec![vec!["stands"], vec!["walks"], vec!["jumps"]]),
        ("<article>", vec![vec!["a"], vec!["the"]]),
        ("<noun>", vec![vec!["horse"], vec!["dog"], vec!["hamster"]]),
    ])
    .expect("built-in grammar is valid");

    let mut counter = Counter::new(&grammar);
    match counter.count("<start>", length) {
        Ok(count) => println!("Total number of strings in grammar of length {length}: {count}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }

    let stats = counter.stats();
    println!("\n=== Cache ===");
    println!("Symbol nodes: {}", stats.symbol_nodes);
    println!("Rule nodes: {}", stats.rule_nodes);
    println!("Partition nodes: {}", stats.partition_nodes);
}
