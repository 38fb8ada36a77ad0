mod extract;
mod loader;
mod printer;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use btreeidx_core::{Index, IndexError};
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Open an existing index file at startup instead of starting empty.
    #[arg(long)]
    open: Option<PathBuf>,

    /// Increase log verbosity (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut session = Session::default();

    if let Some(path) = &args.open {
        match Index::open(path) {
            Ok(index) => {
                info!("opened {}", path.display());
                session.index = Some(index);
            }
            Err(err) => eprintln!("Error: {err}"),
        }
    }

    let stdin = io::stdin();
    loop {
        println!("Commands: create, open, insert, search, load, print, extract, quit");
        print!("Enter command: ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let command = line.trim().to_lowercase();

        match command.as_str() {
            "quit" => {
                session.close_current();
                break;
            }
            "create" => session.create(&stdin),
            "open" => session.open(&stdin),
            "insert" => session.insert(&stdin),
            "search" => session.search(&stdin),
            "load" => session.load(&stdin),
            "print" => session.print(),
            "extract" => session.extract(&stdin),
            "" => continue,
            other => println!("Invalid command: {other}"),
        }
    }

    ExitCode::SUCCESS
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Holds at most one open index, matching the spec's "exactly one open
/// index file per process instance" resource model.
#[derive(Default)]
struct Session {
    index: Option<Index>,
}

impl Session {
    fn create(&mut self, stdin: &io::Stdin) {
        let Some(path) = prompt(stdin, "Enter new index file name: ") else {
            return;
        };

        if Path::new(&path).exists() && !confirm_overwrite(stdin, &path) {
            return;
        }

        self.close_current();
        match Index::create(&path) {
            Ok(index) => {
                info!("created index {path}");
                self.index = Some(index);
            }
            Err(err) => eprintln!("Error: {err}"),
        }
    }

    fn open(&mut self, stdin: &io::Stdin) {
        let Some(path) = prompt(stdin, "Enter existing index file name: ") else {
            return;
        };

        if !Path::new(&path).exists() {
            println!("Error: file does not exist.");
            return;
        }

        self.close_current();
        match Index::open(&path) {
            Ok(index) => {
                info!("opened index {path}");
                self.index = Some(index);
            }
            Err(err) => eprintln!("Error: {err}"),
        }
    }

    /// A new `create`/`open` always closes whatever index was open before
    /// it: exactly one open index file per process instance.
    fn close_current(&mut self) {
        if let Some(index) = self.index.take() {
            let _ = index.close();
        }
    }

    fn insert(&mut self, stdin: &io::Stdin) {
        let Some(index) = self.require_open() else {
            return;
        };

        let Some(key) = prompt_u64(stdin, "Enter key (unsigned int): ") else {
            return;
        };
        let Some(value) = prompt_u64(stdin, "Enter value (unsigned int): ") else {
            return;
        };

        match index.insert(key, value) {
            Ok(()) => {}
            Err(IndexError::DuplicateKey { key }) => {
                println!("Error: key {key} already exists.")
            }
            Err(err) => eprintln!("Error: {err}"),
        }
    }

    fn search(&mut self, stdin: &io::Stdin) {
        let Some(index) = self.require_open() else {
            return;
        };

        let Some(key) = prompt_u64(stdin, "Enter key (unsigned int): ") else {
            return;
        };

        match index.search(key) {
            Ok(Some(value)) => println!("Found key {key}, value {value}"),
            Ok(None) => println!("Key not found."),
            Err(err) => eprintln!("Error: {err}"),
        }
    }

    fn load(&mut self, stdin: &io::Stdin) {
        if self.require_open().is_none() {
            return;
        }

        let Some(path) = prompt(stdin, "Enter file name: ") else {
            return;
        };
        if !Path::new(&path).exists() {
            println!("Error: file does not exist.");
            return;
        }

        let index = self.index.as_mut().unwrap();
        match loader::load_file(index, &path) {
            Ok(summary) => info!(
                "loaded {}: {} inserted, {} duplicates skipped, {} malformed lines skipped",
                path, summary.inserted, summary.duplicates, summary.malformed
            ),
            Err(err) => eprintln!("Error: {err}"),
        }
    }

    fn print(&mut self) {
        let Some(index) = self.require_open() else {
            return;
        };
        let stdout = io::stdout();
        if let Err(err) = printer::print_inorder(index, &mut stdout.lock()) {
            eprintln!("Error: {err}");
        }
    }

    fn extract(&mut self, stdin: &io::Stdin) {
        if self.require_open().is_none() {
            return;
        }

        let Some(path) = prompt(stdin, "Enter output file name: ") else {
            return;
        };
        if Path::new(&path).exists() && !confirm_overwrite(stdin, &path) {
            return;
        }

        let index = self.index.as_mut().unwrap();
        match extract::extract_to_file(index, &path) {
            Ok(count) => info!("extracted {count} records to {path}"),
            Err(err) => eprintln!("Error: {err}"),
        }
    }

    fn require_open(&mut self) -> Option<&mut Index> {
        if self.index.is_none() {
            println!("Error: No index file is open.");
            return None;
        }
        self.index.as_mut()
    }
}

fn prompt(stdin: &io::Stdin, message: &str) -> Option<String> {
    print!("{message}");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
        return None;
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn prompt_u64(stdin: &io::Stdin, message: &str) -> Option<u64> {
    let raw = prompt(stdin, message)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            println!("Invalid input.");
            None
        }
    }
}

fn confirm_overwrite(stdin: &io::Stdin, path: &str) -> bool {
    match prompt(stdin, &format!("File {path} exists. Overwrite? (y/n) ")) {
        Some(answer) => answer.eq_ignore_ascii_case("y"),
        None => false,
    }
}
