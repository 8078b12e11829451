//! Reading content items from a file or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use reelsift_core::ContentItem;
use serde_json::Value;

/// Parsed input: one item or a batch, so output can mirror the shape.
#[derive(Debug)]
pub enum Input {
    Single(ContentItem),
    Batch(Vec<ContentItem>),
}

impl Input {
    pub fn into_items(self) -> Vec<ContentItem> {
        match self {
            Input::Single(item) => vec![item],
            Input::Batch(items) => items,
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, Input::Batch(_))
    }
}

/// Read raw JSON from a path, or stdin when the path is `-`.
pub fn read_source(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(Path::new(path)).with_context(|| format!("Failed to read {}", path))
}

/// Parse a JSON object or array of objects into content items.
pub fn parse(raw: &str) -> anyhow::Result<Input> {
    let value: Value = serde_json::from_str(raw).context("Input is not valid JSON")?;
    match value {
        Value::Array(values) => {
            let items = values
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    serde_json::from_value(v).with_context(|| format!("Item {} is not a content item", i))
                })
                .collect::<anyhow::Result<Vec<ContentItem>>>()?;
            Ok(Input::Batch(items))
        }
        Value::Object(_) => {
            let item = serde_json::from_value(value).context("Input is not a content item")?;
            Ok(Input::Single(item))
        }
        _ => anyhow::bail!("Expected a content item object or an array of them"),
    }
}
