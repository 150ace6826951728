use anyhow::Context;
use clap::Parser;
use sqs_utils::config::cli::Command;
use sqs_utils::utils::error::ErrorSeverity;
use sqs_utils::utils::{logger, validation::Validate};
use sqs_utils::{AwsSqsClient, CliConfig, SqsError, SqsUtils};
use std::io::BufRead;

/// Exit code when the request went through but not every message was handled.
const PARTIAL_FAILURE_EXIT_CODE: i32 = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    let settings = match config.validate().and_then(|_| config.load_settings()) {
        Ok(settings) => settings,
        Err(e) => exit_with(e),
    };

    let utils = match AwsSqsClient::from_settings(&settings).await {
        Ok(client) => SqsUtils::new(client),
        Err(e) => exit_with(e),
    };

    let outcome = match &config.command {
        Command::Send(args) => {
            let messages = if args.messages.is_empty() {
                read_stdin_lines().context("failed to read messages from stdin")?
            } else {
                args.messages.clone()
            };
            let options = args.send_options(&settings);
            utils
                .send_batch(&messages, &args.queue, &options)
                .await
                .map(|sent| report(sent, format!("Sent {} messages", messages.len())))
        }
        Command::Receive(args) => {
            let options = args.receive_options(&settings);
            receive(&utils, &args.queue, options, args.with_receipt).await
        }
        Command::Remove(args) => utils
            .remove_batch(&args.queue, &args.receipts)
            .await
            .map(|removed| report(removed, format!("Removed {} messages", args.receipts.len()))),
    };

    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(PARTIAL_FAILURE_EXIT_CODE),
        Err(e) => exit_with(e),
    }
}

async fn receive(
    utils: &SqsUtils<AwsSqsClient>,
    queue: &str,
    options: sqs_utils::ReceiveOptions,
    with_receipt: bool,
) -> sqs_utils::Result<bool> {
    if with_receipt {
        for message in utils.receive_many_with_receipts(queue, options).await? {
            println!("{}", serde_json::to_string(&message)?);
        }
    } else {
        for body in utils.receive_many(queue, options).await? {
            println!("{}", serde_json::json!({ "body": body }));
        }
    }
    Ok(true)
}

fn report(complete: bool, summary: String) -> bool {
    if complete {
        println!("✅ {}", summary);
    } else {
        eprintln!("⚠️  Not every message was processed, see logs for details");
    }
    complete
}

fn read_stdin_lines() -> std::io::Result<Vec<String>> {
    std::io::stdin()
        .lock()
        .lines()
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
        .collect()
}

fn exit_with(e: SqsError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
