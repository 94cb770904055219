use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use chatspell_core::{Backend, Conversation, Lookup, Notice, SpellEngine};
use chatspell_ispell::{IspellBackend, IspellConfig};
use chatspell_wordlist::{compile_wordlist, WordlistBackend, WordlistConfig};

const DEFAULT_CONFIG: &str = "chatspell.toml";

#[derive(Parser)]
#[command(name = "chatspell", version, about = "Spell checking over chatspell backends")]
struct Args {
    /// Backend family to drive
    #[arg(long, value_enum, default_value_t = BackendKind::Wordlist)]
    backend: BackendKind,

    /// TOML config file; ./chatspell.toml is picked up when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured language set (tags joined with '+')
    #[arg(long)]
    language: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    Wordlist,
    Ispell,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Check one word; exits nonzero when it is misspelled
    Check { word: String },
    /// Check one word and print replacement candidates
    Suggest { word: String },
    /// Add words to the personal dictionary of the primary language
    Add { words: Vec<String> },
    /// Compile a plain word list (one word per line) into an fst set
    Compile {
        /// Input word list
        input: PathBuf,
        /// Output path, conventionally <dict_dir>/<tag>.fst
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    if let CliCommand::Compile { input, out } = &args.command {
        let reader = BufReader::new(
            File::open(input).with_context(|| format!("cannot open {}", input.display()))?,
        );
        let count = compile_wordlist(reader, out)
            .with_context(|| format!("cannot compile {}", input.display()))?;
        println!("compiled {count} words into {}", out.display());
        return Ok(ExitCode::SUCCESS);
    }

    match args.backend {
        BackendKind::Wordlist => {
            let mut config = load_config::<WordlistConfig>(args.config.as_deref())?;
            if let Some(language) = &args.language {
                config.base_mut().default_language = language.clone();
            }
            let backend = WordlistBackend::from_config(&config);
            run(SpellEngine::new(backend, config.into_base()), &args.command)
        }
        BackendKind::Ispell => {
            let mut config = load_config::<IspellConfig>(args.config.as_deref())?;
            if let Some(language) = &args.language {
                config.base_mut().default_language = language.clone();
            }
            let backend = IspellBackend::from_config(&config);
            run(SpellEngine::new(backend, config.into_base()), &args.command)
        }
    }
}

fn run<B: Backend>(mut engine: SpellEngine<B>, command: &CliCommand) -> Result<ExitCode> {
    let conv = Conversation::other("", "cli");
    let code = match command {
        CliCommand::Check { word } => match engine.lookup(&conv, word)? {
            Lookup::Correct => {
                println!("{word}: correct");
                ExitCode::SUCCESS
            }
            Lookup::Misspelled(_) => {
                println!("{word}: misspelled");
                ExitCode::FAILURE
            }
            Lookup::Ineligible => {
                println!("{word}: not a checkable word");
                ExitCode::SUCCESS
            }
            Lookup::Disabled => {
                println!("spell checking is disabled");
                ExitCode::SUCCESS
            }
        },
        CliCommand::Suggest { word } => match engine.lookup(&conv, word)? {
            Lookup::Correct => {
                println!("{word}: correct");
                ExitCode::SUCCESS
            }
            Lookup::Misspelled(suggestions) => {
                if suggestions.is_empty() {
                    println!("{word}: misspelled, no suggestions");
                } else {
                    println!("{word}: misspelled, try one of:");
                    for s in &suggestions {
                        println!("  {s}");
                    }
                }
                ExitCode::SUCCESS
            }
            Lookup::Ineligible => {
                println!("{word}: not a checkable word");
                ExitCode::SUCCESS
            }
            Lookup::Disabled => {
                println!("spell checking is disabled");
                ExitCode::SUCCESS
            }
        },
        CliCommand::Add { words } => {
            let added = engine.add_words(&conv, words);
            if added == words.len() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        CliCommand::Compile { .. } => unreachable!("handled before backend setup"),
    };
    for notice in engine.drain_notices() {
        match notice {
            Notice::Info(msg) => println!("{msg}"),
            Notice::Error(msg) => eprintln!("{msg}"),
        }
    }
    Ok(code)
}

trait ConfigFile: Sized + Default {
    fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>>;
}

impl ConfigFile for WordlistConfig {
    fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_toml(path)
    }
}

impl ConfigFile for IspellConfig {
    fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_toml(path)
    }
}

fn load_config<C: ConfigFile>(path: Option<&Path>) -> Result<C> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG);
            if !fallback.exists() {
                return Ok(C::default());
            }
            fallback
        }
    };
    C::from_file(&path).map_err(|e| anyhow::anyhow!("cannot load {}: {e}", path.display()))
}
