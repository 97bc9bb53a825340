//! Open, unlock and save documents through a [`StorageBackend`].
//!
//! Opening never asks for a password: an encrypted file comes back as a
//! locked handle that [`unlock`] turns into a [`PlainDocument`]. Key
//! derivation runs on the blocking pool via [`crate::offload`].

use std::path::Path;

use tracing::debug;

use crate::binary::is_binary_encrypted;
use crate::detect::{has_binary_extension, is_plain_document, looks_encrypted_name};
use crate::document::{is_encrypted, EncryptedDocument, PlainDocument};
use crate::error::{CryptoError, CryptoResult};
use crate::format::FileFormat;
use crate::offload;
use crate::storage::StorageBackend;

/// A document read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenedDocument {
    /// JSON envelope awaiting a password.
    Locked {
        location: String,
        envelope: EncryptedDocument,
    },
    /// Binary container awaiting a password.
    BinaryLocked { location: String, container: String },
    /// Readable without a password.
    Plain {
        location: String,
        document: PlainDocument,
    },
}

impl OpenedDocument {
    pub fn location(&self) -> &str {
        match self {
            Self::Locked { location, .. }
            | Self::BinaryLocked { location, .. }
            | Self::Plain { location, .. } => location,
        }
    }

    pub fn requires_password(&self) -> bool {
        !matches!(self, Self::Plain { .. })
    }

    /// Stored format this handle was opened from.
    pub fn format(&self) -> FileFormat {
        match self {
            Self::Locked { .. } => FileFormat::JsonEnvelope,
            Self::BinaryLocked { .. } => FileFormat::BinaryEnvelope,
            Self::Plain { .. } => FileFormat::PlainDocument,
        }
    }

    /// Display name: the final segment of the location.
    pub fn filename(&self) -> String {
        file_name(self.location())
    }
}

/// How [`save`] should write a document.
#[derive(Clone, PartialEq, Eq)]
pub enum SaveMode {
    /// `{content, metadata}` as pretty JSON.
    Plain,
    /// Pretty-printed JSON envelope.
    Encrypted(String),
    /// Base64 binary container of the content only.
    Binary(String),
}

impl std::fmt::Debug for SaveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => f.write_str("Plain"),
            Self::Encrypted(_) => f.write_str("Encrypted([REDACTED])"),
            Self::Binary(_) => f.write_str("Binary([REDACTED])"),
        }
    }
}

impl SaveMode {
    /// Choose between plain and JSON envelope output.
    ///
    /// An encrypted document with no (or an empty) password is
    /// [`CryptoError::PasswordRequired`].
    pub fn from_parts(encrypted: bool, password: Option<&str>) -> CryptoResult<Self> {
        match (encrypted, password) {
            (false, _) => Ok(Self::Plain),
            (true, Some(password)) if !password.is_empty() => {
                Ok(Self::Encrypted(password.to_string()))
            }
            (true, _) => Err(CryptoError::PasswordRequired),
        }
    }

    /// Like [`SaveMode::from_parts`], but `.enc` locations get the binary container.
    pub fn for_location(
        location: &str,
        encrypted: bool,
        password: Option<&str>,
    ) -> CryptoResult<Self> {
        match Self::from_parts(encrypted, password)? {
            Self::Encrypted(password) if has_binary_extension(location) => {
                Ok(Self::Binary(password))
            }
            mode => Ok(mode),
        }
    }

    fn format(&self) -> FileFormat {
        match self {
            Self::Plain => FileFormat::PlainDocument,
            Self::Encrypted(_) => FileFormat::JsonEnvelope,
            Self::Binary(_) => FileFormat::BinaryEnvelope,
        }
    }
}

fn file_name(location: &str) -> String {
    Path::new(location)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| location.to_string())
}

/// A stored location as shown in a file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedDocument {
    pub location: String,
    /// Name-based guess; the file is not read.
    pub probably_encrypted: bool,
}

/// List stored documents without reading them.
pub async fn list<S>(storage: &S) -> CryptoResult<Vec<ListedDocument>>
where
    S: StorageBackend + ?Sized,
{
    let listed: Vec<ListedDocument> = storage
        .list()
        .await?
        .into_iter()
        .map(|location| ListedDocument {
            probably_encrypted: looks_encrypted_name(&file_name(&location)),
            location,
        })
        .collect();

    debug!(count = listed.len(), "vault: list");
    Ok(listed)
}

/// Read a document and classify it.
///
/// `.enc` locations holding a plausible binary container open as
/// [`OpenedDocument::BinaryLocked`]. JSON envelopes open as
/// [`OpenedDocument::Locked`]. Anything else opens as plain: a serialized
/// [`PlainDocument`] is restored as-is, other text is wrapped in a new
/// document named after the location.
///
/// JSON with `content` and `metadata` keys that does not deserialize as a
/// document is [`CryptoError::Json`].
pub async fn open<S>(storage: &S, location: &str) -> CryptoResult<OpenedDocument>
where
    S: StorageBackend + ?Sized,
{
    let text = storage.read(location).await?;

    let opened = if has_binary_extension(location) && is_binary_encrypted(&text) {
        OpenedDocument::BinaryLocked {
            location: location.to_string(),
            container: text.trim().to_string(),
        }
    } else {
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) if is_encrypted(&value) => OpenedDocument::Locked {
                location: location.to_string(),
                envelope: EncryptedDocument::from_value(value)?,
            },
            Ok(value) if is_plain_document(&value) => OpenedDocument::Plain {
                location: location.to_string(),
                document: serde_json::from_value(value)?,
            },
            _ => OpenedDocument::Plain {
                location: location.to_string(),
                document: PlainDocument::new(file_name(location), text),
            },
        }
    };

    debug!(location, format = %opened.format(), "vault: open");
    Ok(opened)
}

/// Decrypt a locked document. Plain documents pass through unchanged.
///
/// Binary containers carry no metadata, so the result is named after the
/// location and stamped with the current time.
pub async fn unlock(opened: OpenedDocument, password: &str) -> CryptoResult<PlainDocument> {
    match opened {
        OpenedDocument::Locked { envelope, .. } => {
            offload::decrypt_document(envelope, password.to_string()).await
        }
        OpenedDocument::BinaryLocked {
            location,
            container,
        } => {
            let content = offload::decrypt_from_binary(container, password.to_string()).await?;
            Ok(PlainDocument::new(file_name(&location), content))
        }
        OpenedDocument::Plain { document, .. } => Ok(document),
    }
}

/// Write a document to storage in the requested form.
pub async fn save<S>(
    storage: &S,
    location: &str,
    doc: &PlainDocument,
    mode: SaveMode,
) -> CryptoResult<()>
where
    S: StorageBackend + ?Sized,
{
    let format = mode.format();
    let data = match mode {
        SaveMode::Plain => serde_json::to_string_pretty(&doc.touched())?,
        SaveMode::Encrypted(password) => {
            offload::encrypt_document(doc.touched(), password)
                .await?
                .to_json_pretty()?
        }
        SaveMode::Binary(password) => {
            offload::encrypt_to_binary(doc.content.clone(), password).await?
        }
    };

    storage.write(location, &data).await?;

    debug!(location, format = %format, size = data.len(), "vault: save");
    Ok(())
}

/// Save under a new location, renaming the document to match.
///
/// Returns the renamed document.
pub async fn save_as<S>(
    storage: &S,
    new_location: &str,
    doc: &PlainDocument,
    mode: SaveMode,
) -> CryptoResult<PlainDocument>
where
    S: StorageBackend + ?Sized,
{
    let mut renamed = doc.clone();
    renamed.metadata.filename = file_name(new_location);

    save(storage, new_location, &renamed, mode).await?;
    Ok(renamed)
}
