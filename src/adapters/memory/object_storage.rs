//! In-memory object storage with HMAC-signed download URLs.
//!
//! Signed URLs have the form
//! `{base_url}/{path}?expires={unix_secs}&signature={hex}` where the
//! signature is HMAC-SHA256 over `{bucket}/{path}:{expires}`.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

use crate::domain::fault::{codes, Fault};
use crate::domain::foundation::Timestamp;
use crate::domain::storage::{ObjectPath, StoredObject};
use crate::ports::ObjectStorage;

type HmacSha256 = Hmac<Sha256>;

struct Blob {
    object: StoredObject,
    bytes: Vec<u8>,
}

pub struct InMemoryObjectStorage {
    bucket: String,
    base_url: String,
    signing_secret: SecretString,
    objects: RwLock<BTreeMap<ObjectPath, Blob>>,
}

impl InMemoryObjectStorage {
    pub fn new(
        bucket: impl Into<String>,
        base_url: impl Into<String>,
        signing_secret: SecretString,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            signing_secret,
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Returns the object behind a signed URL after checking its signature
    /// and expiry.
    pub async fn download(
        &self,
        path: &ObjectPath,
        expires: u64,
        signature: &str,
    ) -> Result<(StoredObject, Vec<u8>), Fault> {
        let provided = hex::decode(signature).map_err(|_| signature_invalid())?;
        let expected = self.sign(path, expires)?;

        if expected.ct_eq(&provided).unwrap_u8() != 1 {
            tracing::warn!(path = %path.as_str(), "Invalid download signature");
            return Err(signature_invalid());
        }
        if expires < Timestamp::now().as_unix_secs() {
            return Err(Fault::upload(
                codes::upload::SIGNATURE_INVALID,
                "Signed URL has expired",
            ));
        }

        self.objects
            .read()
            .await
            .get(path)
            .map(|blob| (blob.object.clone(), blob.bytes.clone()))
            .ok_or_else(|| object_not_found(path))
    }

    fn sign(&self, path: &ObjectPath, expires: u64) -> Result<Vec<u8>, Fault> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.expose_secret().as_bytes())
            .map_err(|e| Fault::generic(format!("Signing key rejected: {}", e)))?;
        mac.update(format!("{}/{}:{}", self.bucket, path.as_str(), expires).as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn object_not_found(path: &ObjectPath) -> Fault {
    Fault::upload(
        codes::upload::OBJECT_NOT_FOUND,
        format!("No object exists at {}", path.as_str()),
    )
}

fn signature_invalid() -> Fault {
    Fault::upload(codes::upload::SIGNATURE_INVALID, "Signed URL signature is invalid")
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(
        &self,
        path: &ObjectPath,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, Fault> {
        let object = StoredObject {
            path: path.clone(),
            size: bytes.len() as u64,
            content_type: content_type.to_string(),
            uploaded_at: Timestamp::now(),
        };
        self.objects.write().await.insert(
            path.clone(),
            Blob {
                object: object.clone(),
                bytes,
            },
        );
        tracing::debug!(bucket = %self.bucket, path = %path.as_str(), size = object.size, "Object stored");
        Ok(object)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, Fault> {
        Ok(self
            .objects
            .read()
            .await
            .values()
            .filter(|blob| blob.object.path.as_str().starts_with(prefix))
            .map(|blob| blob.object.clone())
            .collect())
    }

    async fn delete(&self, path: &ObjectPath) -> Result<StoredObject, Fault> {
        self.objects
            .write()
            .await
            .remove(path)
            .map(|blob| blob.object)
            .ok_or_else(|| object_not_found(path))
    }

    async fn signed_url(&self, path: &ObjectPath, ttl: Duration) -> Result<String, Fault> {
        if !self.objects.read().await.contains_key(path) {
            return Err(object_not_found(path));
        }
        let expires = Timestamp::now().plus_secs(ttl.as_secs()).as_unix_secs();
        let signature = hex::encode(self.sign(path, expires)?);
        Ok(format!(
            "{}/{}?expires={}&signature={}",
            self.base_url,
            path.as_str(),
            expires,
            signature
        ))
    }
}
