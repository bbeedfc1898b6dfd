use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tinyre::{graph_display::DiGraph, Flags, Pattern, Regex};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print every match of a pattern in the given text
    Find {
        pattern: String,
        text: String,
        #[arg(short = 'i', long)]
        ignore_case: bool,
        #[arg(short = 'm', long)]
        multiline: bool,
        #[arg(short = 's', long)]
        dotall: bool,
    },
    /// Render the compiled automaton to ./graph.svg
    Svg {
        #[arg(long)]
        dfa: bool,
        #[arg(long)]
        minimize: bool,
        pattern: String,
    },
    /// Print the transition table of the compiled automaton
    Table {
        #[arg(long)]
        dfa: bool,
        pattern: String,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("{e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Commands::Find {
            pattern,
            text,
            ignore_case,
            multiline,
            dotall,
        } => {
            let mut flags = Flags::empty();
            if ignore_case {
                flags |= Flags::IGNORECASE;
            }
            if multiline {
                flags |= Flags::MULTILINE;
            }
            if dotall {
                flags |= Flags::DOTALL;
            }

            let regex = Regex::with_flags(&pattern, flags)?;
            for m in regex.finditer(&text) {
                let (start, end) = m.span();
                print!("{start}..{end}\t{:?}", m.as_str());
                for (i, group) in m.groups().iter().enumerate() {
                    match group {
                        Some(text) => print!("\t{}={text:?}", i + 1),
                        None => print!("\t{}=-", i + 1),
                    }
                }
                println!();
            }
        }
        Commands::Svg {
            dfa,
            minimize,
            pattern,
        } => {
            let regex = Regex::new(&pattern)?;
            let graph = if dfa || minimize {
                let dfa = regex
                    .to_dfa()
                    .ok_or("subset construction requires a pattern without capture groups")?;
                let dfa = if minimize { dfa.minimize() } else { dfa };
                DiGraph::from(&dfa)
            } else {
                DiGraph::from(regex.nfa())
            };
            std::fs::write("./graph.svg", graph.to_string())?;
        }
        Commands::Table { dfa, pattern } => {
            let regex = Regex::new(&pattern)?;
            if dfa {
                let dfa = regex
                    .to_dfa()
                    .ok_or("subset construction requires a pattern without capture groups")?;
                println!("{dfa}");
            } else {
                println!("{}", regex.nfa());
            }
        }
    }

    Ok(())
}
