use anyhow::{Context, Result};
use chord_core::config::AnalysisConfig;
use chord_core::core::frequency::count_words;
use chord_core::core::types::ChordKind;
use chord_core::evaluation::{corpus_words, evaluate, parse_ignore_list, Category, EvaluationReport};
use chord_core::persistence::{
    load_snapshot, read_chord_map, read_key_log, read_text, save_chord_map, save_corpus, save_snapshot,
    validate_chord_map,
};
use chord_core::{Analysis, ChordEngine};
use clap::{Args, Parser, Subcommand};
use crossterm::style::Stylize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_MAP_PATH: &str = "chordable_map.json";

/// Chord map builder - turns a key log into single-chord word assignments
#[derive(Parser, Debug)]
#[command(name = "chordmap")]
#[command(about = "Assign chords to frequent words and evaluate chord coverage", long_about = None)]
struct Cli {
    /// Show debug logging (collisions, rejected words)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a chord map from a key log
    Analyze {
        /// Key log, one key token per line in time order
        #[arg(long)]
        log: PathBuf,

        /// Save word and n-gram tallies for later `assign` runs
        #[arg(long)]
        snapshot: Option<PathBuf>,

        #[command(flatten)]
        build: BuildArgs,
    },
    /// Rebuild a chord map from a saved frequency snapshot
    Assign {
        #[arg(long)]
        snapshot: PathBuf,

        #[command(flatten)]
        build: BuildArgs,
    },
    /// Score a chord map against a text corpus
    Evaluate {
        /// Chord map JSON
        map: PathBuf,

        /// Free-form text corpus
        corpus: PathBuf,

        /// Newline-delimited words to leave out of scoring
        #[arg(long)]
        ignore: Option<PathBuf>,

        /// Minimum corpus frequency for a word to be scored
        #[arg(long)]
        min_frequency: Option<u64>,

        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the most frequent words of a key log
    Top {
        #[arg(long)]
        log: PathBuf,

        #[arg(short, long, default_value = "20")]
        limit: usize,

        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write the words of a key log as a plain-text corpus
    DumpCorpus {
        #[arg(long)]
        log: PathBuf,

        #[arg(long)]
        out: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// JSON config file (limits, boundaries, finger table)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON finger table: {"left_index": ["t", "d"], ...}
    #[arg(long)]
    fingers: Option<PathBuf>,

    /// Number of words to assign chords to
    #[arg(long)]
    top_words: Option<usize>,

    /// Number of n-grams to export
    #[arg(long)]
    top_ngrams: Option<usize>,

    /// Output chord map
    #[arg(short, long, default_value = DEFAULT_MAP_PATH)]
    out: PathBuf,
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("could not load config '{}'", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

impl BuildArgs {
    fn engine(&self) -> Result<ChordEngine> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(path) = &self.fingers {
            config
                .load_fingers(path)
                .with_context(|| format!("could not load finger table '{}'", path.display()))?;
        }
        if let Some(n) = self.top_words {
            config.top_words = n;
        }
        if let Some(n) = self.top_ngrams {
            config.top_ngrams = n;
        }
        ChordEngine::from_config(&config).context("invalid finger table")
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Analyze { log, snapshot, build } => {
            let engine = build.engine()?;
            let events = read_key_log(&log).context("could not read key log")?;
            let (counts, analysis) = engine.analyze(events);
            if let Some(path) = snapshot {
                save_snapshot(&counts, &path).context("could not save snapshot")?;
            }
            print_analysis(&analysis);
            save_chord_map(&analysis.chord_map.to_document(), &build.out)
                .context("could not save chord map")?;
            println!("\nExported {}", build.out.display().to_string().green());
        }
        Command::Assign { snapshot, build } => {
            let engine = build.engine()?;
            let counts = load_snapshot(&snapshot).context("could not load snapshot")?;
            let analysis = engine.build(&counts);
            print_analysis(&analysis);
            save_chord_map(&analysis.chord_map.to_document(), &build.out)
                .context("could not save chord map")?;
            println!("\nExported {}", build.out.display().to_string().green());
        }
        Command::Evaluate { map, corpus, ignore, min_frequency, config } => {
            let config = load_config(config.as_deref())?;
            let min_frequency = min_frequency.unwrap_or(config.min_frequency);
            let chords = read_chord_map(&map).context("could not load chord map")?;
            if let Err(e) = validate_chord_map(&chords) {
                tracing::warn!(error = %e, "chord map has invalid chords, evaluating its words anyway");
            }
            let text = read_text(&corpus).context("could not read corpus")?;
            let ignore = match ignore {
                Some(path) => match read_text(&path) {
                    Ok(text) => {
                        let words = parse_ignore_list(&text);
                        println!("Loaded {} words to ignore from {}", words.len(), path.display());
                        words
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "ignore file unreadable, no words will be ignored");
                        HashSet::new()
                    }
                },
                None => HashSet::new(),
            };
            let report = evaluate(&chords, &corpus_words(&text), &ignore, min_frequency);
            print_evaluation(&report);
        }
        Command::Top { log, limit, config } => {
            let engine = ChordEngine::from_config(&load_config(config.as_deref())?)?;
            let words = engine.tokenize(read_key_log(&log).context("could not read key log")?);
            for (word, count) in count_words(&words).ranked().into_iter().take(limit) {
                println!("{}: {}", word, count);
            }
        }
        Command::DumpCorpus { log, out, config } => {
            let engine = ChordEngine::from_config(&load_config(config.as_deref())?)?;
            let words = engine.tokenize(read_key_log(&log).context("could not read key log")?);
            save_corpus(&words, &out).context("could not write corpus")?;
            println!("Dumped corpus to {}", out.display());
        }
    }
    Ok(())
}

fn print_analysis(analysis: &Analysis) {
    let map = &analysis.chord_map;

    println!("{}", "\nAssigning Chords to Top Words".bold());
    println!("{:<15} {:<15} {:<6}", "Word", "Assigned Chord", "Count");
    println!("{}", "-".repeat(40));
    for a in &map.assignments {
        let note = match a.kind {
            ChordKind::Natural => "",
            ChordKind::Subset => " (subset)",
        };
        println!("{:<15} {:<15} {:<6}{}", a.word, a.chord.as_str(), a.count, note);
    }

    if !map.rejections.is_empty() {
        println!("{}", "\nWords Left Without a Chord".bold());
        for r in &map.rejections {
            println!("{:<15} {:<6} {}", r.word, r.count, r.reason.to_string().dark_grey());
        }
    }

    println!("{}", "\nTop Chordable Ngrams".bold());
    println!("{:<10} {:<6} {:<10} {:<12}", "Ngram", "Freq", "Pair Score", "Total Score");
    println!("{}", "-".repeat(45));
    for s in analysis.ngram_scores.iter().take(map.ngrams.len()) {
        println!(
            "{:<10} {:<6} {:<10} {:<12}",
            s.ngram, s.frequency, s.pair_score, s.total_score as u64
        );
    }
}

fn print_evaluation(report: &EvaluationReport) {
    println!("{}", "Scoring rules:".bold());
    for category in Category::ALL {
        println!("- {}: {} point(s)", category, category.penalty());
    }

    println!("Minimum word frequency: {}", report.min_frequency);
    println!("Total unique words in corpus: {}", report.unique_words);
    println!("Words appearing at least {} times: {}", report.min_frequency, report.frequent_words);
    println!("Words appearing less than {} times: {}", report.min_frequency, report.rare_words());

    println!("{}", "\nEvaluation result:".bold());
    println!("Total words processed: {}", report.processed);
    println!("Words ignored: {}", report.ignored);
    println!("Total score: {}", report.total_score);
    println!("Average score per word: {:.2}", report.average_score());

    println!("{}", "\nBreakdown by category:".bold());
    for category in Category::ALL {
        println!("{}: {}", category, report.count(category));
    }

    let coverage = format!("{:.2}%", report.coverage_percent());
    println!("\nFlow Coverage (Word or Ngram): {}", coverage.green().bold());

    if !report.not_chordable_words.is_empty() {
        println!(
            "{}",
            format!("\nAll Non-Chordable Words with Frequency >= {}:", report.min_frequency).bold()
        );
        println!("{:<20} {:<10}", "Word", "Frequency");
        println!("{}", "-".repeat(30));
        for (word, freq) in &report.not_chordable_words {
            println!("{:<20} {:<10}", word, freq);
        }
    }
}
