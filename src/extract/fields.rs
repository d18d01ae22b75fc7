use std::collections::HashMap;

use crate::model::SourcePage;

/// Flattened view of one document: merged label/value guesses and the
/// non-empty page texts in page order.
#[derive(Debug, Clone, Default)]
pub struct DocumentView<'a> {
    pub fields: HashMap<&'a str, &'a str>,
    pub texts: Vec<&'a str>,
    pub pages: &'a [SourcePage],
}

impl<'a> DocumentView<'a> {
    /// Later pages override earlier ones on label collision.
    pub fn merge(pages: &'a [SourcePage]) -> Self {
        let mut fields = HashMap::new();
        let mut texts = Vec::new();

        for page in pages {
            if !page.text.trim().is_empty() {
                texts.push(page.text.as_str());
            }
            for (label, value) in &page.fields {
                fields.insert(label.as_str(), value.as_str());
            }
        }

        Self {
            fields,
            texts,
            pages,
        }
    }

    /// Returns the merged value for `label`, treating blank values as absent.
    pub fn field(&self, label: &str) -> Option<&'a str> {
        self.fields
            .get(label)
            .copied()
            .filter(|value| !value.trim().is_empty())
    }
}
