//! veilpad: Command-line tool for password-encrypted documents.
//!
//! Reads and writes the same JSON and binary (`.enc`) containers as the
//! editor, using AES-256-GCM with PBKDF2-SHA256 key derivation.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veilpad_crypto::{
    decrypt_document, decrypt_from_binary, detect_format, encrypt_document, encrypt_to_binary,
    has_binary_extension, validate_password, CryptoError, EncryptedDocument, FileFormat,
    PlainDocument,
};

#[derive(Parser)]
#[command(name = "veilpad")]
#[command(author, version, about = "Password-encrypted documents for veilpad")]
#[command(propagate_version = true)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a text file
    Encrypt {
        /// Input text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the encrypted container
        #[arg(short, long)]
        output: PathBuf,

        /// Write the compact binary container (implied by a .enc output)
        #[arg(short, long)]
        binary: bool,

        /// Password (min 3 characters)
        #[arg(short, long, env = "VEILPAD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Decrypt a JSON or binary container
    Decrypt {
        /// Encrypted input file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the decrypted text
        #[arg(short, long)]
        output: PathBuf,

        /// Password used to encrypt the file
        #[arg(short, long, env = "VEILPAD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Report the stored format of a file
    Detect {
        /// File to inspect
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Score a password
    Strength {
        /// Password to score
        password: String,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "veilpad_crypto=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Encrypt {
            input,
            output,
            binary,
            password,
        } => {
            cmd_encrypt(&input, &output, binary, &password)?;
        }
        Commands::Decrypt {
            input,
            output,
            password,
        } => {
            cmd_decrypt(&input, &output, &password)?;
        }
        Commands::Detect { input } => {
            cmd_detect(&input)?;
        }
        Commands::Strength { password } => {
            cmd_strength(&password)?;
        }
    }

    Ok(())
}

fn cmd_encrypt(
    input_path: &Path,
    output_path: &Path,
    binary: bool,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let plaintext = std::fs::read_to_string(input_path)?;

    let use_binary = binary || has_binary_extension(&output_path.to_string_lossy());

    let (format, container) = if use_binary {
        (
            FileFormat::BinaryEnvelope,
            encrypt_to_binary(&plaintext, password)?,
        )
    } else {
        let filename = input_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let doc = PlainDocument::new(filename, plaintext.as_str());
        (
            FileFormat::JsonEnvelope,
            encrypt_document(&doc, password)?.to_json_pretty()?,
        )
    };

    std::fs::write(output_path, &container)?;

    let output = serde_json::json!({
        "input": input_path.to_string_lossy(),
        "output": output_path.to_string_lossy(),
        "format": format.as_str(),
        "input_size": plaintext.len(),
        "output_size": container.len(),
        "password_strength": validate_password(password).strength,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn cmd_decrypt(
    input_path: &Path,
    output_path: &Path,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let container = std::fs::read_to_string(input_path)?;

    let format = detect_format(&container);
    let (plaintext, filename, created) = match format {
        FileFormat::JsonEnvelope => {
            let envelope = EncryptedDocument::from_json(&container)?;
            let doc = decrypt_document(&envelope, password)?;
            (
                doc.content,
                Some(doc.metadata.filename),
                Some(doc.metadata.created),
            )
        }
        FileFormat::BinaryEnvelope => (decrypt_from_binary(&container, password)?, None, None),
        other => {
            return Err(
                CryptoError::InvalidFormat(format!("input is not encrypted ({})", other)).into(),
            );
        }
    };

    std::fs::write(output_path, &plaintext)?;

    let output = serde_json::json!({
        "input": input_path.to_string_lossy(),
        "output": output_path.to_string_lossy(),
        "format": format.as_str(),
        "input_size": container.len(),
        "output_size": plaintext.len(),
        "original_filename": filename,
        "created": created,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn cmd_detect(input_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(input_path)?;
    let format = detect_format(&text);

    let output = serde_json::json!({
        "file": input_path.to_string_lossy(),
        "format": format.as_str(),
        "encrypted": format.is_encrypted(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn cmd_strength(password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let check = validate_password(password);

    println!("{}", serde_json::to_string_pretty(&check)?);

    Ok(())
}
