use clap::Parser;
use provider_clients::core::{PushPriority, TransactionRequest};
use provider_clients::utils::error::{ErrorSeverity, IntegrationError, Result};
use provider_clients::utils::{logger, validation::Validate};
use provider_clients::{AppConfig, Cli, Command, Integrations};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("❌ Command failed: {} (Severity: {:?})", e, e.severity());
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    if let Command::Config = cli.command {
        println!("{:#?}", config);
        return Ok(());
    }

    let integrations = Integrations::from_config(&config)?;

    match cli.command {
        Command::Config => {}
        Command::Upload {
            file,
            filename,
            content_type,
            folder,
            base64,
        } => {
            let filename = match filename {
                Some(name) => name,
                None => file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        IntegrationError::config("Cannot derive a filename, pass --filename")
                    })?,
            };
            upload(&integrations, file, filename, content_type, folder, base64).await?;
        }
        Command::PayInit {
            email,
            amount,
            reference,
            callback_url,
        } => {
            let mut request = TransactionRequest::new(email, amount);
            request.reference = reference;
            request.callback_url = callback_url;

            let response = integrations.payment.initialize_transaction(&request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::PayVerify { reference } => {
            let response = integrations.payment.verify_transaction(&reference).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Push {
            tokens,
            title,
            body,
            data,
            priority,
        } => {
            let data = data
                .as_deref()
                .map(serde_json::from_str::<serde_json::Value>)
                .transpose()?;
            let priority: PushPriority = priority.parse().map_err(IntegrationError::config)?;

            let result = integrations
                .push
                .dispatch(&tokens, &title, &body, data, priority)
                .await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Email {
            to,
            subject,
            text,
            html,
        } => {
            report_email(
                integrations
                    .email
                    .send(&to, &subject, &text, html.as_deref())
                    .await,
            )?;
        }
        Command::PanicAlert {
            to,
            reporter,
            latitude,
            longitude,
        } => {
            report_email(
                integrations
                    .email
                    .send_panic_alert(&to, &reporter, latitude, longitude, chrono::Utc::now())
                    .await,
            )?;
        }
        Command::PaymentConfirmation {
            to,
            amount,
            reference,
        } => {
            report_email(
                integrations
                    .email
                    .send_payment_confirmation(&to, amount, &reference)
                    .await,
            )?;
        }
    }

    Ok(())
}

fn report_email(sent: bool) -> Result<()> {
    if sent {
        println!("✅ Email sent");
        Ok(())
    } else {
        Err(IntegrationError::config(
            "Email was not sent, see the log for details",
        ))
    }
}

#[cfg(feature = "gcs")]
async fn upload(
    integrations: &Integrations,
    file: std::path::PathBuf,
    filename: String,
    content_type: String,
    folder: String,
    base64: bool,
) -> Result<()> {
    let outcome = if base64 {
        let encoded = tokio::fs::read_to_string(&file).await?;
        integrations
            .storage
            .upload_base64(&encoded, &filename, &content_type, &folder)
            .await?
    } else {
        let data = tokio::fs::read(&file).await?;
        let request = provider_clients::core::UploadRequest::new(data, filename)
            .with_content_type(content_type)
            .with_folder(folder);
        integrations.storage.upload(request).await
    };

    if outcome.is_fallback() {
        tracing::warn!("⚠️ Storage unavailable, returned placeholder URL");
    }
    println!("{}", outcome.url());
    Ok(())
}

#[cfg(not(feature = "gcs"))]
async fn upload(
    _integrations: &Integrations,
    _file: std::path::PathBuf,
    _filename: String,
    _content_type: String,
    _folder: String,
    _base64: bool,
) -> Result<()> {
    Err(IntegrationError::config(
        "Storage support is disabled, rebuild with the `gcs` feature",
    ))
}
