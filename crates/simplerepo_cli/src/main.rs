//! Example application for the generic account repository.
//!
//! Opens (and migrates) the database, binds an `AccountRepository` to the
//! connection and runs one command. Any escaping error is reported once and
//! the process exits non-zero without retrying.

mod config;

use anyhow::Context;
use clap::Parser;
use config::{AppConfig, Cli, Command};
use log::{error, info};
use simplerepo_core::db::{open_db, open_db_in_memory};
use simplerepo_core::{init_logging, AccountDto, AccountRepository, SqliteContext};
use std::process::ExitCode;
use uuid::Uuid;

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err:#}");
            eprintln!("An error occurred: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_cli(cli).context("invalid configuration")?;
    if let Some(settings) = &config.logging {
        init_logging(settings).context("unable to initialize logging")?;
    }

    let conn = match &config.database {
        Some(path) => open_db(path, &config.open)
            .with_context(|| format!("unable to open database `{}`", path.display()))?,
        None => open_db_in_memory(&config.open).context("unable to open in-memory database")?,
    };
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx)?;

    match config.command {
        Command::Seed { names } => {
            for name in names {
                let id = Uuid::new_v4();
                let account = AccountDto::with_id(
                    id,
                    format!("{name}_{id}"),
                    format!("{name}_{id}@gmail.com"),
                );
                repo.save_account(&account)?;
                info!("event=account_seeded module=cli status=ok id={id}");
            }
            print_accounts(&repo.get_accounts()?);
        }
        Command::List { json } => {
            let accounts = repo.get_accounts()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&accounts)?);
            } else {
                print_accounts(&accounts);
            }
        }
        Command::Add { name, email } => {
            let account = repo.save_account(&AccountDto::new(name, email))?;
            print_accounts(std::slice::from_ref(&account));
        }
        Command::Delete { name } => {
            let removed = repo.delete_accounts_by_user_name(&name)?;
            println!("Deleted {removed} account(s) named {name}");
        }
    }

    Ok(())
}

fn print_accounts(accounts: &[AccountDto]) {
    for account in accounts {
        println!(
            "ID: {} | Username: {} | Email: {}",
            account.id().map(|id| id.to_string()).unwrap_or_default(),
            account.user_name().unwrap_or_default(),
            account.email_address().unwrap_or_default()
        );
    }
}
