use lencount_rs::{Counter, Error, Grammar};
use std::collections::BTreeMap;
use std::env;
use std::time::Instant;

/// Draws uniform samples of one length from the sentence grammar.
///
/// Usage: cargo run --example sample [length] [samples]
fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let parse = |i: usize, default: usize| -> usize {
        args.get(i).map_or(Ok(default), |arg| arg.parse()).unwrap_or_else(|_| {
            eprintln!("Usage: {} [length] [samples]", args[0]);
            std::process::exit(1);
        })
    };
    let length = parse(1, 11);
    let samples = parse(2, 1_000_000);

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
    let mut rng = rand::rng();
    let mut histogram: BTreeMap<String, usize> = BTreeMap::new();

    let start = Instant::now();
    for _ in 0..samples {
        match counter.sample("<start>", length, &mut rng) {
            Ok(s) => *histogram.entry(s).or_default() += 1,
            Err(e @ Error::NoDerivation { .. }) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("sampling failed: {e}");
                std::process::exit(1);
            }
        }
    }
    let elapsed = start.elapsed();

    println!("=== Samples of length {length} ===");
    for (s, hits) in &histogram {
        println!("{s}: {hits}");
    }
    println!("\n{samples} samples in {:.2?}", elapsed);
}
