use std::{
    collections::{HashMap, HashSet},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use common::s3::Error;
use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::Value;

use crate::{
    format::Reader,
    library::{LoadOptions, Signal, SignalError, SignalLibrary},
    storage::ObjectStorage,
};

pub(crate) fn signal(title: &str, original_filename: &str) -> Signal {
    Signal {
        index: 0,
        title: String::from(title),
        original_filename: String::from(original_filename),
    }
}

fn failure() -> SignalError {
    SignalError::Failed {
        status: String::from("exit status: 1"),
        stderr: String::from("unsupported file"),
    }
}

/// [`SignalLibrary`] with predefined results, recording every call.
pub(crate) struct FakeLibrary {
    signals: Option<Vec<Signal>>,
    metadata: Option<Value>,
    calls: Mutex<Vec<String>>,
    paths: Mutex<Vec<PathBuf>>,
}

impl FakeLibrary {
    pub(crate) fn new(signals: Vec<Signal>, metadata: Option<Value>) -> Self {
        Self {
            signals: Some(signals),
            metadata,
            calls: Mutex::default(),
            paths: Mutex::default(),
        }
    }

    /// Library that fails on every operation.
    pub(crate) fn failing() -> Self {
        Self {
            signals: None,
            metadata: None,
            calls: Mutex::default(),
            paths: Mutex::default(),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Local paths of every file the library was asked to read.
    pub(crate) fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }

    fn record(&self, call: String, path: &Path) {
        self.calls.lock().unwrap().push(call);
        self.paths.lock().unwrap().push(path.to_path_buf());
    }
}

#[async_trait]
impl SignalLibrary for FakeLibrary {
    async fn load(&self, path: &Path, _: LoadOptions) -> Result<Vec<Signal>, SignalError> {
        self.record(String::from("load"), path);
        self.signals.clone().ok_or_else(failure)
    }

    async fn render_thumbnail(
        &self,
        path: &Path,
        _: LoadOptions,
        signal: &Signal,
        output: &Path,
    ) -> Result<(), SignalError> {
        self.record(format!("render {}", signal.title), path);

        RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0xff, 0xff]))
            .save_with_format(output, ImageFormat::Png)
            .map_err(|err| SignalError::Io(io::Error::new(io::ErrorKind::Other, err)))
    }

    async fn extract_metadata(
        &self,
        reader: Reader,
        path: &Path,
        _: &HashMap<String, String>,
    ) -> Result<Value, SignalError> {
        self.record(format!("metadata {}", reader.name()), path);
        self.metadata.clone().ok_or_else(failure)
    }
}

/// Stored object contents along with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// In-memory [`ObjectStorage`].
#[derive(Default)]
pub(crate) struct MemoryStorage {
    buckets: Mutex<HashSet<String>>,
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    created_buckets: Mutex<Vec<String>>,
    local_paths: Mutex<Vec<PathBuf>>,
}

impl MemoryStorage {
    pub(crate) fn with_bucket(self, bucket: &str) -> Self {
        self.buckets.lock().unwrap().insert(String::from(bucket));
        self
    }

    pub(crate) fn with_object(self, bucket: &str, key: &str, body: &[u8]) -> Self {
        self.objects.lock().unwrap().insert(
            (String::from(bucket), String::from(key)),
            StoredObject {
                body: body.to_vec(),
                content_type: String::from("application/octet-stream"),
            },
        );
        self.with_bucket(bucket)
    }

    pub(crate) fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(String::from(bucket), String::from(key)))
            .cloned()
    }

    pub(crate) fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub(crate) fn created_buckets(&self) -> Vec<String> {
        self.created_buckets.lock().unwrap().clone()
    }

    /// Local paths of every file that was downloaded into or uploaded from.
    pub(crate) fn local_paths(&self) -> Vec<PathBuf> {
        self.local_paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn download(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> Result<HashMap<String, String>, Error> {
        self.local_paths.lock().unwrap().push(path.to_path_buf());

        let Some(object) = self.object(bucket, key) else {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{bucket}/{key} does not exist"),
            )));
        };

        tokio::fs::write(path, object.body).await?;

        Ok(HashMap::from([(
            String::from("operator"),
            String::from("jdoe"),
        )]))
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<(), Error> {
        self.local_paths.lock().unwrap().push(path.to_path_buf());

        let body = tokio::fs::read(path).await?;

        self.objects.lock().unwrap().insert(
            (String::from(bucket), String::from(key)),
            StoredObject {
                body,
                content_type: String::from(content_type),
            },
        );

        Ok(())
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error> {
        Ok(self.buckets.lock().unwrap().contains(bucket))
    }

    async fn create_public_bucket(&self, bucket: &str) -> Result<(), Error> {
        self.buckets.lock().unwrap().insert(String::from(bucket));
        self.created_buckets.lock().unwrap().push(String::from(bucket));
        Ok(())
    }
}
