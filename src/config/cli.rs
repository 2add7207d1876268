use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "provider-clients")]
#[command(about = "Operator tool for the storage, payment, push and email integrations")]
pub struct Cli {
    /// TOML 配置檔；未指定時從環境變數讀取
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit JSON formatted logs")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the resolved configuration (secrets redacted)
    Config,

    /// Upload a local file to object storage
    Upload {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        filename: Option<String>,
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,
        #[arg(long, default_value = "uploads")]
        folder: String,
        #[arg(long, help = "Treat the file content as base64 text")]
        base64: bool,
    },

    /// Initialize a payment transaction
    PayInit {
        #[arg(long)]
        email: String,
        #[arg(long, help = "Amount in the smallest currency unit")]
        amount: u64,
        #[arg(long)]
        reference: Option<String>,
        #[arg(long)]
        callback_url: Option<String>,
    },

    /// Verify a payment transaction by reference
    PayVerify { reference: String },

    /// Send a push notification to one or more tokens
    Push {
        #[arg(long = "token", required = true)]
        tokens: Vec<String>,
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long, help = "JSON object attached to the notification")]
        data: Option<String>,
        #[arg(long, default_value = "high")]
        priority: String,
    },

    /// Send a plain email
    Email {
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        html: Option<String>,
    },

    /// Send the panic alert template
    PanicAlert {
        #[arg(long)]
        to: String,
        #[arg(long)]
        reporter: String,
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,
    },

    /// Send the payment confirmation template
    PaymentConfirmation {
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        reference: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_push_command() {
        let cli = Cli::parse_from([
            "provider-clients",
            "--verbose",
            "push",
            "--token",
            "ExponentPushToken[a]",
            "--token",
            "ExponentPushToken[b]",
            "--title",
            "Hi",
            "--body",
            "There",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Command::Push {
                tokens, priority, ..
            } => {
                assert_eq!(tokens.len(), 2);
                assert_eq!(priority, "high");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_negative_coordinates() {
        let cli = Cli::parse_from([
            "provider-clients",
            "panic-alert",
            "--to",
            "guard@example.com",
            "--reporter",
            "Ada",
            "--latitude",
            "-33.86",
            "--longitude",
            "151.2",
        ]);

        assert!(matches!(cli.command, Command::PanicAlert { latitude, .. } if latitude == -33.86));
    }
}
