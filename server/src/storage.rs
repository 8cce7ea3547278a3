use std::path::PathBuf;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use rand::seq::IndexedRandom;
use uuid::Uuid;

const IMAGE_EXTENSION: &str = "png";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("no images stored")]
    Empty,
    #[error("image {0} not found")]
    NotFound(Uuid),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("s3: {0}")]
    S3(String),
}

/// Submitted drawings, stored as PNG.
///
/// Ids are time ordered (UUIDv7), so sorting them descending lists the
/// newest drawing first.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn add_image(&self, png: &[u8]) -> Result<Uuid, StorageError>;
    async fn read_image(&self, id: Uuid) -> Result<Vec<u8>, StorageError>;
    /// Newest first.
    async fn list_images(&self) -> Result<Vec<Uuid>, StorageError>;

    async fn random_image(&self) -> Result<Uuid, StorageError> {
        let ids = self.list_images().await?;
        ids.choose(&mut rand::rng())
            .copied()
            .ok_or(StorageError::Empty)
    }
}

fn new_image_id() -> Uuid {
    Uuid::now_v7()
}

fn image_file_name(id: Uuid) -> String {
    format!("{id}.{IMAGE_EXTENSION}")
}

fn parse_image_file_name(name: &str) -> Option<Uuid> {
    let stem = name.strip_suffix(IMAGE_EXTENSION)?.strip_suffix('.')?;
    Uuid::parse_str(stem).ok()
}

fn newest_first(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort_unstable_by(|a, b| b.cmp(a));
    ids
}

pub struct FileStorage {
    image_dir: PathBuf,
}

impl FileStorage {
    pub async fn open(image_dir: PathBuf) -> Result<Self, StorageError> {
        tokio::fs::create_dir_all(&image_dir).await?;
        Ok(Self { image_dir })
    }

    fn path(&self, id: Uuid) -> PathBuf {
        self.image_dir.join(image_file_name(id))
    }
}

#[async_trait]
impl ImageStore for FileStorage {
    async fn add_image(&self, png: &[u8]) -> Result<Uuid, StorageError> {
        let id = new_image_id();
        tokio::fs::write(self.path(id), png).await?;
        Ok(id)
    }

    async fn read_image(&self, id: Uuid) -> Result<Vec<u8>, StorageError> {
        match tokio::fs::read(self.path(id)).await {
            Ok(bytes) => Ok(bytes),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(id))
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn list_images(&self) -> Result<Vec<Uuid>, StorageError> {
        let mut entries = tokio::fs::read_dir(&self.image_dir).await?;
        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(id) = entry.file_name().to_str().and_then(parse_image_file_name) {
                ids.push(id);
            }
        }
        Ok(newest_first(ids))
    }
}

#[derive(Clone, Debug)]
pub struct S3StorageConfig {
    pub bucket: String,
    pub prefix: Option<String>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl S3StorageConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: None,
            region: None,
            endpoint_url: None,
            force_path_style: false,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

pub struct S3Storage {
    bucket: String,
    prefix: String,
    client: Client,
}

impl S3Storage {
    pub async fn new(config: S3StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let (Some(access_key_id), Some(secret_access_key)) = (
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
        ) {
            let creds = Credentials::new(access_key_id, secret_access_key, None, None, "static");
            loader = loader.credentials_provider(creds);
        }
        if let Some(region) = config.region.clone() {
            loader = loader.region(aws_config::Region::new(region));
        }
        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint_url) = config.endpoint_url.as_ref() {
            builder = builder.endpoint_url(endpoint_url);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }
        let client = Client::from_conf(builder.build());
        Self {
            bucket: config.bucket,
            prefix: normalize_prefix(config.prefix),
            client,
        }
    }

    fn object_key(&self, id: Uuid) -> String {
        object_key(&self.prefix, id)
    }

    fn list_prefix(&self) -> Option<String> {
        (!self.prefix.is_empty()).then(|| format!("{}/", self.prefix))
    }
}

fn normalize_prefix(prefix: Option<String>) -> String {
    prefix.unwrap_or_default().trim_matches('/').to_string()
}

fn object_key(prefix: &str, id: Uuid) -> String {
    if prefix.is_empty() {
        image_file_name(id)
    } else {
        format!("{prefix}/{}", image_file_name(id))
    }
}

fn parse_object_key(prefix: &str, key: &str) -> Option<Uuid> {
    let name = if prefix.is_empty() {
        key
    } else {
        key.strip_prefix(prefix)?.strip_prefix('/')?
    };
    parse_image_file_name(name)
}

#[async_trait]
impl ImageStore for S3Storage {
    async fn add_image(&self, png: &[u8]) -> Result<Uuid, StorageError> {
        let id = new_image_id();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.object_key(id))
            .content_type("image/png")
            .body(ByteStream::from(png.to_vec()))
            .send()
            .await
            .map_err(|error| StorageError::S3(format!("failed to store image {id}: {error:?}")))?;
        Ok(id)
    }

    async fn read_image(&self, id: Uuid) -> Result<Vec<u8>, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.object_key(id))
            .send()
            .await;
        let output = match response {
            Ok(output) => output,
            Err(error) => {
                if let Some(service_error) = error.as_service_error() {
                    if service_error.is_no_such_key() {
                        return Err(StorageError::NotFound(id));
                    }
                }
                return Err(StorageError::S3(format!(
                    "failed to load image {id}: {error:?}"
                )));
            }
        };
        let collected = output.body.collect().await.map_err(|error| {
            StorageError::S3(format!("failed to read image {id} from response: {error:?}"))
        })?;
        Ok(collected.into_bytes().to_vec())
    }

    async fn list_images(&self) -> Result<Vec<Uuid>, StorageError> {
        let mut ids = Vec::new();
        let mut continuation_token = None;
        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .set_prefix(self.list_prefix())
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|error| StorageError::S3(format!("failed to list images: {error:?}")))?;
            ids.extend(
                output
                    .contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .filter_map(|key| parse_object_key(&self.prefix, key)),
            );
            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }
        Ok(newest_first(ids))
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
