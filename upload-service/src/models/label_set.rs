use std::collections::HashSet;
use std::sync::Arc;

/// Labels accepted when no `UPLOAD_CATEGORIES` override is configured.
pub const DEFAULT_CATEGORIES: [&str; 17] = [
    "Chilli - Healthy",
    "Chilli - Leaf Curl Virus",
    "Pepper Bell - Bacterial Spot",
    "Pepper Bell - Healthy",
    "Potato - Early Blight",
    "Potato - Healthy",
    "Potato - Late Blight",
    "Tomato - Bacterial Spot",
    "Tomato - Early Blight",
    "Tomato - Healthy",
    "Tomato - Late Blight",
    "Tomato - Leaf Mold",
    "Tomato - Mosaic Virus",
    "Tomato - Septoria Leaf Spot",
    "Tomato - Target Spot",
    "Tomato - Two Spotted Spider Mite",
    "Tomato - Yellow Leaf Curl Virus",
];

/// Separator between labels in the `UPLOAD_CATEGORIES` variable. Labels
/// themselves contain spaces and dashes, so neither can be used.
pub const LABEL_SEPARATOR: char = ';';

/// The closed set of category labels a deployment accepts.
///
/// Membership is exact and case-sensitive. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Arc<[String]>,
    index: Arc<HashSet<String>>,
}

impl LabelSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for label in labels {
            let label = label.into();
            if seen.insert(label.clone()) {
                ordered.push(label);
            }
        }

        Self {
            labels: ordered.into(),
            index: Arc::new(seen),
        }
    }

    /// Parses a `;`-separated list, trimming whitespace and skipping empty entries.
    pub fn parse(raw: &str) -> Self {
        Self::new(
            raw.split(LABEL_SEPARATOR)
                .map(str::trim)
                .filter(|label| !label.is_empty()),
        )
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORIES)
    }
}
