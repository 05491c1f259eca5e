//! Metadata extraction.
//!
//! Extraction never fails: unsupported formats and reader errors produce an
//! empty JSON object, which is still uploaded next to the preview image.

use std::{collections::HashMap, path::Path};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{format::Format, library::SignalLibrary};

/// Extract metadata of `source` with the reader selected by its format.
pub(crate) async fn generate(
    library: &dyn SignalLibrary,
    format: &Format,
    source: &Path,
    extra: &HashMap<String, String>,
) -> Value {
    let Some(reader) = format.reader() else {
        debug!(?format, "no metadata reader for format");
        return empty();
    };

    match library.extract_metadata(reader, source, extra).await {
        Ok(mut metadata) if metadata.is_object() => {
            apply_default_dataset_type(&mut metadata);
            metadata
        }
        Ok(metadata) => {
            warn!(%metadata, reader = reader.name(), "metadata is not a JSON object");
            empty()
        }
        Err(err) => {
            warn!(%err, reader = reader.name(), "unable to extract metadata");
            empty()
        }
    }
}

fn empty() -> Value {
    Value::Object(Map::new())
}

/// Mark non-empty metadata without a dataset type as miscellaneous.
fn apply_default_dataset_type(metadata: &mut Value) {
    let Some(object) = metadata.as_object_mut() else {
        return;
    };

    if object.is_empty() {
        return;
    }

    let nx_meta = object.entry("nx_meta").or_insert_with(empty);

    if let Some(nx_meta) = nx_meta.as_object_mut() {
        if !nx_meta.contains_key("DatasetType") {
            nx_meta.insert(String::from("DatasetType"), Value::from("Misc"));
            nx_meta.insert(String::from("Data Type"), Value::from("Miscellaneous"));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, path::Path};

    use serde_json::json;

    use super::generate;
    use crate::{format::Format, testing::FakeLibrary};

    #[tokio::test]
    async fn default_dataset_type() {
        let library = FakeLibrary::new(
            Vec::new(),
            Some(json!({"nx_meta": {"Microscope": "Titan"}, "ImageList": {}})),
        );

        let metadata = generate(&library, &Format::Dm3, Path::new("a.dm3"), &HashMap::new()).await;

        assert_eq!(
            metadata,
            json!({
                "nx_meta": {
                    "Microscope": "Titan",
                    "DatasetType": "Misc",
                    "Data Type": "Miscellaneous",
                },
                "ImageList": {},
            })
        );
        assert_eq!(library.calls(), vec!["metadata digital_micrograph"]);
    }

    #[tokio::test]
    async fn existing_dataset_type() {
        let extracted = json!({"nx_meta": {"DatasetType": "Image", "Data Type": "SEM_Imaging"}});
        let library = FakeLibrary::new(Vec::new(), Some(extracted.clone()));

        let metadata = generate(&library, &Format::Tif, Path::new("a.tif"), &HashMap::new()).await;

        assert_eq!(metadata, extracted);
    }

    #[tokio::test]
    async fn missing_nx_meta() {
        let library = FakeLibrary::new(Vec::new(), Some(json!({"Header": {}})));

        let metadata = generate(&library, &Format::Msa, Path::new("a.msa"), &HashMap::new()).await;

        assert_eq!(
            metadata,
            json!({
                "Header": {},
                "nx_meta": {"DatasetType": "Misc", "Data Type": "Miscellaneous"},
            })
        );
    }

    #[tokio::test]
    async fn empty_result() {
        let library = FakeLibrary::new(Vec::new(), Some(json!({})));

        let metadata = generate(&library, &Format::Spc, Path::new("a.spc"), &HashMap::new()).await;

        assert_eq!(metadata, json!({}));
    }

    #[tokio::test]
    async fn unsupported_format() {
        let library = FakeLibrary::new(Vec::new(), Some(json!({"nx_meta": {}})));

        let metadata = generate(
            &library,
            &Format::from_extension(".emi"),
            Path::new("a.emi"),
            &HashMap::new(),
        )
        .await;

        assert_eq!(metadata, json!({}));
        assert!(library.calls().is_empty());
    }

    #[tokio::test]
    async fn extraction_failure() {
        let library = FakeLibrary::failing();

        let metadata = generate(&library, &Format::Ser, Path::new("a.ser"), &HashMap::new()).await;

        assert_eq!(metadata, json!({}));
    }
}
