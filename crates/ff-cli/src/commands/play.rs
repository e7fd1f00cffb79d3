use std::io::{self, BufRead, Write};

use colored::Colorize;

use ff_adventure::AdventureError;

pub fn run(opts: &super::Options) -> Result<(), String> {
    let mut adventure = super::open(opts);

    println!("  {} Fighting Fantasy Adventure", "Opening".bold());
    if adventure.has_save() {
        let name = &adventure.player().name;
        if name.is_empty() {
            println!("  Continuing saved adventure.");
        } else {
            println!("  Continuing the adventure of {}.", name.bold());
        }
    } else {
        println!("  No save found. Type 'new <name>' then 'roll' to begin.");
    }
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match adventure.process(input) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
                    break;
                }
            }
            Err(e @ AdventureError::Persistence(_)) => {
                println!("{}\n", format!("warning: {e}").red());
            }
            Err(e) => {
                println!("{}\n", super::line::capitalize_first(&e.to_string()).yellow());
            }
        }
    }

    Ok(())
}
