// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use kopilka::commands::{self, Session};
use kopilka::{cli, config::Config, db};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = cli::build_cli().get_matches();
    let config = Config::from_matches(&matches);

    match matches.subcommand() {
        Some(("init", _)) => {
            let kv = db::open_or_init(config.db.as_deref())?;
            println!("Database initialized at {}", kv.path().display());
        }
        Some(("doctor", _)) => {
            let kv = db::open_or_init(config.db.as_deref())?;
            let mut rates = commands::rate_converter(&config)?;
            commands::doctor::handle(&kv, &mut rates)?;
        }
        Some(("shell", _)) => {
            let mut session = Session::open(&config)?;
            let res = commands::shell::run(&mut session, std::io::stdin().lock());
            session.close();
            res?;
        }
        Some((name, sub)) => {
            let mut session = Session::open(&config)?;
            let res = commands::dispatch(&mut session, name, sub);
            session.close();
            res?;
        }
        None => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
