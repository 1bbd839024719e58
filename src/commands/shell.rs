// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Session, dispatch};
use crate::cli::build_shell_cli;
use anyhow::Result;
use std::io::{BufRead, Write};

/// Line-oriented session. Errors are reported and the loop goes on; `quit`
/// or end of input stops it.
pub fn run<R: BufRead>(session: &mut Session, input: R) -> Result<()> {
    let cli = build_shell_cli();
    prompt()?;
    for line in input.lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            prompt()?;
            continue;
        }
        match cli.clone().try_get_matches_from(words) {
            Ok(m) => match m.subcommand() {
                Some(("quit", _)) => break,
                Some((name, sub)) => {
                    if let Err(e) = dispatch(session, name, sub) {
                        println!("Error: {:#}", e);
                    }
                }
                None => {}
            },
            Err(e) => println!("{}", e.render()),
        }
        prompt()?;
    }
    Ok(())
}

fn prompt() -> Result<()> {
    print!("kopilka> ");
    std::io::stdout().flush()?;
    Ok(())
}
