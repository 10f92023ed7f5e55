//! Builds a smoothed unigram distribution from a few sentences.
//!
//! Run with `RUST_LOG=debug cargo run --example word_freq`.

use std::{panic, process};

use log::{debug, info};
use tally::Counter;

const CORPUS: &[&str] = &[
    "the cat sat on the mat",
    "the dog sat on the log",
    "a cat and a dog met on a mat",
];

fn main() {
    pretty_env_logger::init();

    let orig_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        orig_hook(panic_info);
        process::exit(1);
    }));

    let counts: Counter = CORPUS
        .iter()
        .flat_map(|line| line.split_whitespace())
        .map(String::from)
        .collect();
    info!("{} distinct words, {} tokens", counts.len(), counts.sum());

    // Add-one smoothing: every word, seen or not, gets one extra count.
    let mut smoothed = &counts + &Counter::new(1.0);
    let mut probs = counts.clone();
    probs.normalize();
    smoothed.log_normalize();

    for (word, p) in &probs {
        debug!("{:>5}: p={:.3} log p(smoothed)={:.3}", word, p, smoothed.get(word));
    }
    info!("unseen word, smoothed log p = {:.3}", smoothed.get(&"zebra".to_string()));

    match probs.arg_max() {
        Ok((word, p)) => info!("most frequent: {:?} ({:.3})", word, p),
        Err(e) => info!("{}", e),
    }
}
