//! Label records and their JSON files.
//!
//! Six files are produced, one per class and split: `p_dev.json`,
//! `p_test.json`, `p_train.json`, `n_dev.json`, `n_test.json` and
//! `n_train.json`. Each holds a JSON array of
//! `{"utt_id", "speaker_id", "keyword_id"}` objects, indented by four
//! spaces, with non-ASCII characters written as-is.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::partition::{Partition, Split};
use crate::scan::SampleClass;
use crate::{CorpusError, Result};

/// One utterance's label.
///
/// The corpus has no speaker metadata, so `speaker_id` repeats `utt_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub utt_id: String,
    pub speaker_id: String,
    pub keyword_id: i32,
}

impl LabelRecord {
    pub fn new(stem: impl Into<String>, class: SampleClass) -> Self {
        let utt_id = stem.into();
        Self {
            speaker_id: utt_id.clone(),
            utt_id,
            keyword_id: class.keyword_id(),
        }
    }
}

/// The label records of one class and split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    pub class: SampleClass,
    pub split: Split,
    pub records: Vec<LabelRecord>,
}

impl LabelSet {
    /// File name for this set, e.g. `p_dev.json`.
    pub fn file_name(&self) -> String {
        format!("{}_{}.json", self.class.short(), self.split.as_str())
    }
}

/// Builds the six label sets of a partition, positives first, each in
/// dev, test, train order.
pub fn label_sets(partition: &Partition) -> Vec<LabelSet> {
    let mut sets = Vec::with_capacity(6);
    for class in [SampleClass::Positive, SampleClass::Negative] {
        let split = partition.class(class);
        for s in Split::ALL {
            sets.push(LabelSet {
                class,
                split: s,
                records: split
                    .get(s)
                    .iter()
                    .map(|stem| LabelRecord::new(stem.as_str(), class))
                    .collect(),
            });
        }
    }
    sets
}

/// Serializes records as a JSON array indented by four spaces.
pub fn to_json(records: &[LabelRecord]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    String::from_utf8(buf)
        .map_err(|e| CorpusError::InvalidArgument(format!("label JSON is not UTF-8: {e}")))
}

/// Writes each label set to `dir`, creating it if needed.
///
/// Existing files with the same names are overwritten. Returns the paths
/// written, in input order.
pub fn write_labels(dir: impl AsRef<Path>, sets: &[LabelSet]) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| CorpusError::io(dir, e))?;

    let mut written = Vec::with_capacity(sets.len());
    for set in sets {
        let path = dir.join(set.file_name());
        let json = to_json(&set.records)?;
        fs::write(&path, json).map_err(|e| CorpusError::io(&path, e))?;
        info!(path = %path.display(), records = set.records.len(), "labels: written");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{ClassSplit, SplitRatio};

    fn sample_partition() -> Partition {
        Partition {
            ratio: SplitRatio::default(),
            positive: ClassSplit {
                dev: vec!["base_1".into()],
                test: vec![],
                train: vec!["aug_1".into(), "唤醒_1".into()],
            },
            negative: ClassSplit {
                dev: vec![],
                test: vec!["neg_1".into()],
                train: vec!["neg_2".into()],
            },
            warnings: vec![],
        }
    }

    #[test]
    fn test_record_fields() {
        let p = LabelRecord::new("base_1", SampleClass::Positive);
        assert_eq!(p.utt_id, "base_1");
        assert_eq!(p.speaker_id, "base_1");
        assert_eq!(p.keyword_id, 0);
        assert_eq!(LabelRecord::new("neg_1", SampleClass::Negative).keyword_id, -1);
    }

    #[test]
    fn test_label_sets_order_and_names() {
        let sets = label_sets(&sample_partition());
        let names: Vec<_> = sets.iter().map(LabelSet::file_name).collect();
        assert_eq!(
            names,
            ["p_dev.json", "p_test.json", "p_train.json", "n_dev.json", "n_test.json", "n_train.json"]
        );
        assert_eq!(sets[2].records.len(), 2);
        assert!(sets[5].records.iter().all(|r| r.keyword_id == -1));
    }

    #[test]
    fn test_json_layout() {
        let json = to_json(&[LabelRecord::new("唤醒_1", SampleClass::Positive)]).unwrap();
        let expected = "[\n    {\n        \"utt_id\": \"唤醒_1\",\n        \"speaker_id\": \"唤醒_1\",\n        \"keyword_id\": 0\n    }\n]";
        assert_eq!(json, expected);
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_write_labels() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("labels");
        let sets = label_sets(&sample_partition());

        let paths = write_labels(&out, &sets).unwrap();
        assert_eq!(paths.len(), 6);

        let p_train: Vec<LabelRecord> =
            serde_json::from_str(&fs::read_to_string(out.join("p_train.json")).unwrap()).unwrap();
        assert_eq!(p_train, sets[2].records);
        assert_eq!(fs::read_to_string(out.join("p_test.json")).unwrap(), "[]");
    }
}
