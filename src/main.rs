// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};
use oxidity_zap::app::config::ZapSettings;
use oxidity_zap::app::logging::setup_logging;
use oxidity_zap::app::replay::{ReplayRequest, replay};
use oxidity_zap::common::parsing::parse_u256;
use oxidity_zap::domain::error::AppError;
use oxidity_zap::services::zap::{Action, PoolType, RouteDescriptor};
use serde_json::json;

#[derive(Parser, Debug)]
#[command(author, version, about = "oxidity zap: route descriptor codec and offline zap replay")]
struct Cli {
    /// Path to config file (default: config.{toml,yaml,...})
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack hop fields into a descriptor word
    Encode {
        #[arg(long)]
        pool: Address,
        /// Pool family name (e.g. uniswap-v2, curve-tricrypto) or numeric tag
        #[arg(long)]
        pool_type: PoolType,
        #[arg(long)]
        token_count: u8,
        #[arg(long)]
        index_in: u8,
        #[arg(long)]
        index_out: u8,
        #[arg(long, default_value = "swap")]
        action: Action,
        #[arg(long, default_value = "0", value_parser = parse_amount)]
        metadata: U256,
    },
    /// Print the fields of a descriptor word and whether it resolves to a hop
    Decode { word: RouteDescriptor },
    /// Run a zap against the configured fixture world
    Replay {
        #[arg(long)]
        src: Address,
        #[arg(long)]
        dst: Address,
        #[arg(long, value_parser = parse_amount)]
        amount: U256,
        #[arg(long, default_value = "0", value_parser = parse_amount)]
        min_out: U256,
        /// Treat `src` as a receipt token and zap out of it
        #[arg(long, default_value_t = false)]
        withdraw: bool,
    },
}

fn parse_amount(raw: &str) -> Result<U256, String> {
    parse_u256(raw).ok_or_else(|| format!("invalid amount '{raw}'"))
}

fn print_json(value: &impl serde::Serialize) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    println!("{rendered}");
    Ok(())
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Encode {
            pool,
            pool_type,
            token_count,
            index_in,
            index_out,
            action,
            metadata,
        } => {
            let descriptor = RouteDescriptor::encode(
                pool,
                pool_type,
                token_count,
                index_in,
                index_out,
                action,
                metadata,
            )?;
            println!("{descriptor}");
        }
        Command::Decode { word } => {
            let resolved = match word.resolve() {
                Ok(hop) => json!({ "hop": hop }),
                Err(e) => json!({ "error": e.to_string() }),
            };
            print_json(&json!({
                "word": word,
                "fields": word.decode(),
                "resolved": resolved,
            }))?;
        }
        Command::Replay {
            src,
            dst,
            amount,
            min_out,
            withdraw,
        } => {
            let settings = ZapSettings::load_with_path(cli.config.as_deref())?;
            setup_logging(
                if settings.debug { "debug" } else { "info" },
                settings.log_json,
            );
            let outcome = replay(
                &settings,
                ReplayRequest {
                    src,
                    dst,
                    amount_in: amount,
                    min_out,
                    withdraw,
                },
            )?;
            print_json(&outcome)?;
        }
    }
    Ok(())
}
