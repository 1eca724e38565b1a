use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use termcolor::{ColorChoice, StandardStream};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use versefind::corpus::{MemoryCorpus, VerseTable};
use versefind::highlight::parse_color;
use versefind::index::{IndexCache, IndexSource, IndexWriter, stats};
use versefind::output;
use versefind::query::{GrepSearch, IndexedSearch, QueryTokenizer, SearchEngine, Tokenizer};
use versefind::types::{BookScope, Query};
use versefind::utils::{AppConfig, get_config_path, progress};

#[derive(Parser)]
#[command(name = "versefind")]
#[command(about = "Fast verse search by grep scan or inverted index")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Corpus JSON file (overrides the configured one)
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// Directory holding the index resource (overrides the configured one)
    #[arg(long, global = true)]
    index_dir: Option<PathBuf>,

    /// Log debug output (timings, set sizes)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the corpus
    Search(SearchArgs),
    /// Manage the inverted index
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },
    /// Show the effective configuration
    Config {
        /// Persist the command-line overrides to the config file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Query words; `+word` matches whole words, `"a b"` is a phrase
    #[arg(required = true, trailing_var_arg = true)]
    query: Vec<String>,

    /// Restrict to books, e.g. `0,1,39..65`
    #[arg(short, long)]
    books: Option<BookScope>,

    /// Scan the text instead of using the index
    #[arg(long)]
    grep: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Print per-book hit counts only
    #[arg(short, long)]
    count: bool,

    /// Print the book name above its verses instead of on every line
    #[arg(long)]
    heading: bool,

    /// Maximum number of verses to print
    #[arg(short = 'n', long)]
    limit: Option<usize>,
}

#[derive(Subcommand)]
enum IndexAction {
    /// Build the index from the corpus
    Build {
        /// Output file (defaults to the edition's index resource)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show index statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load()?;
    if let Some(corpus) = cli.corpus {
        config.corpus_path = Some(corpus);
    }
    if let Some(dir) = cli.index_dir {
        config.index_dir = Some(dir);
    }

    match cli.command {
        Commands::Search(args) => run_search(&config, args)?,
        Commands::Index { action } => match action {
            IndexAction::Build { out } => build_index(&config, out)?,
            IndexAction::Stats => {
                let cache = IndexCache::new(index_source(&config)?);
                stats::show_stats(&cache)?;
            }
        },
        Commands::Config { save } => {
            if save {
                config.save()?;
                println!("Saved {}", get_config_path()?.display());
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn index_source(config: &AppConfig) -> Result<IndexSource> {
    Ok(IndexSource::for_edition(&config.effective_index_dir()?, &config.edition))
}

fn load_corpus(config: &AppConfig) -> Result<MemoryCorpus> {
    let Some(path) = &config.corpus_path else {
        bail!("No corpus configured. Pass --corpus or set corpus_path in the config file");
    };

    let pb = progress::spinner("Loading corpus...");
    let corpus = MemoryCorpus::open(path, config.chapter_cache_size)
        .with_context(|| format!("Failed to load corpus {}", path.display()));
    pb.finish_and_clear();
    corpus
}

fn run_search(config: &AppConfig, args: SearchArgs) -> Result<()> {
    let cache = Arc::new(IndexCache::new(index_source(config)?));

    // Decode the index while the corpus loads
    if !args.grep {
        if let Err(e) = cache.preload() {
            warn!(error = %e, "could not start index preload");
        }
    }

    let corpus = load_corpus(config)?;

    let mut query = Query::new(args.query.join(" "));
    if let Some(scope) = args.books {
        query = query.with_scope(scope);
    }

    let start = Instant::now();
    let mut results = if args.grep {
        GrepSearch::new(&corpus).search(&query)
    } else {
        let table = VerseTable::from_corpus(&corpus)?;
        IndexedSearch::new(&corpus, &table, &cache).search(&query)
    };
    debug!(
        hits = results.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "search finished"
    );

    let total = results.len();
    if let Some(limit) = args.limit {
        results.truncate(limit);
    }

    if args.json {
        let stdout = std::io::stdout();
        output::print_json(&mut stdout.lock(), &corpus, &results)?;
        return Ok(());
    }

    let choice = if std::io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    if args.count {
        output::print_counts(&mut stdout, &corpus, &results)?;
    } else {
        let color = parse_color(&config.highlight_color).unwrap_or_else(|| {
            warn!(color = %config.highlight_color, "unknown highlight color, using yellow");
            termcolor::Color::Yellow
        });
        let words = QueryTokenizer::new().tokenize(&query.query_string);
        output::print_verses(&mut stdout, &corpus, &results, &words, color, args.heading)?;
    }

    if results.len() < total {
        eprintln!("({} of {} verses shown)", results.len(), total);
    }

    Ok(())
}

fn build_index(config: &AppConfig, out: Option<PathBuf>) -> Result<()> {
    let corpus = load_corpus(config)?;
    let table = VerseTable::from_corpus(&corpus)?;

    let path = match (out, index_source(config)?) {
        (Some(path), _) | (None, IndexSource::File(path)) => path,
        (None, IndexSource::Memory(_)) => bail!("No index file to write to"),
    };

    let pb = progress::spinner("Building index...");
    let start = Instant::now();
    let writer = IndexWriter::from_corpus(&corpus, &table);
    let summary = writer.write_to_file(&path);
    pb.finish_and_clear();
    let summary = summary?;

    println!("Index written to {}", path.display());
    println!("  Verses:   {}", table.len());
    println!("  Words:    {}", summary.words_written);
    println!("  Postings: {}", summary.postings_written);
    if summary.words_skipped > 0 {
        println!("  Skipped:  {} (not encodable)", summary.words_skipped);
    }
    println!("  Time:     {:.1} ms", start.elapsed().as_secs_f64() * 1000.0);

    Ok(())
}
