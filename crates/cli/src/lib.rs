pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::commands::catalog::CatalogEntry;

#[derive(Debug, Parser)]
#[command(
    name = "dokan",
    about = "Dokan storefront assistant operator CLI",
    long_about = "Manage the catalog and FAQ, run migrations, replay customer messages, and inspect recorded orders.",
    after_help = "Examples:\n  dokan seed\n  dokan reply --from 8801711000000 \"DR-1050 price?\"\n  dokan orders --limit 5"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations")]
    Migrate,
    #[command(about = "Load the demo catalog and FAQ (idempotent)")]
    Seed,
    #[command(name = "catalog-add", about = "Insert or replace a catalog product")]
    CatalogAdd {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long, help = "Price in whole currency units")]
        price: u64,
        #[arg(long, default_value = "", help = "Comma-separated sizes, e.g. M,L,XL")]
        sizes: String,
        #[arg(long, default_value = "")]
        color: String,
        #[arg(long, default_value = "")]
        stock: String,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        video_url: Option<String>,
    },
    #[command(name = "faq-add", about = "Append an FAQ entry, or update one with the same question")]
    FaqAdd {
        #[arg(long)]
        question: String,
        #[arg(long, help = "Comma-separated keywords")]
        keywords: String,
        #[arg(long)]
        answer: String,
    },
    #[command(about = "Run one customer message through the assistant")]
    Reply {
        #[arg(long = "from", help = "Sender id the message is attributed to")]
        sender_id: String,
        #[arg(required = true, num_args = 1.., help = "Message text")]
        text: Vec<String>,
    },
    #[command(about = "List recently recorded orders, newest first")]
    Orders {
        #[arg(long, default_value_t = commands::orders::DEFAULT_LIMIT)]
        limit: u32,
    },
    #[command(about = "Inspect effective configuration values with source attribution and redaction")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::CatalogAdd { code, name, price, sizes, color, stock, image_url, video_url } => {
            commands::catalog::run(CatalogEntry {
                code,
                name,
                price,
                sizes,
                color,
                stock_label: stock,
                image_url,
                video_url,
            })
        }
        Command::FaqAdd { question, keywords, answer } => {
            commands::faq::run(&question, &keywords, &answer)
        }
        Command::Reply { sender_id, text } => commands::reply::run(&sender_id, &text.join(" ")),
        Command::Orders { limit } => commands::orders::run(limit),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
