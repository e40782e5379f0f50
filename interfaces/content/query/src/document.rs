use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

/// A parsed content document: front matter fields plus engine metadata.
pub type Document = Map<String, Value>;

/// Front matter syntax, chosen by the fence on the first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrontMatterFormat {
    Yaml,
    Toml,
}

impl FrontMatterFormat {
    fn from_fence(line: &str) -> Option<Self> {
        match line.trim_end() {
            "---" => Some(FrontMatterFormat::Yaml),
            "+++" => Some(FrontMatterFormat::Toml),
            _ => None,
        }
    }

    fn fence(&self) -> &'static str {
        match self {
            FrontMatterFormat::Yaml => "---",
            FrontMatterFormat::Toml => "+++",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Markdown,
    Json,
}

impl ContentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "md" => Some(ContentKind::Markdown),
            "json" => Some(ContentKind::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ContentKind::Markdown => "md",
            ContentKind::Json => "json",
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseDocumentError {
    #[error("UnterminatedFrontMatter: {file}")]
    UnterminatedFrontMatter { file: String },

    #[error("TomlFrontMatter: {file}: {source}")]
    TomlFrontMatter {
        file: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("YamlFrontMatter: {file}: {source}")]
    YamlFrontMatter {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("FrontMatterNotAMapping: {file}")]
    FrontMatterNotAMapping { file: String },

    #[error("JsonDocument: {file}: {source}")]
    JsonDocument {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("NotAnObject: {file}")]
    NotAnObject { file: String },
}

/// Parses one file. `relative` is the `/`-separated path below the content root.
pub fn parse_document(
    relative: &str,
    kind: ContentKind,
    raw: &str,
) -> Result<Document, ParseDocumentError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut document = match kind {
        ContentKind::Markdown => {
            let (front, body) = split_front_matter(relative, raw)?;
            let mut fields = match front {
                Some((format, front)) => parse_front_matter(relative, format, front)?,
                None => Map::new(),
            };
            fields.insert(
                "body".to_string(),
                Value::String(body.trim_start_matches(['\r', '\n']).to_string()),
            );
            fields
        }
        ContentKind::Json => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                return Err(ParseDocumentError::NotAnObject {
                    file: relative.to_string(),
                })
            }
            Err(source) => {
                return Err(ParseDocumentError::JsonDocument {
                    file: relative.to_string(),
                    source,
                })
            }
        },
    };

    document.insert("_path".to_string(), Value::String(content_path(relative)));
    document.insert(
        "_id".to_string(),
        Value::String(format!("content:{}", relative.replace('/', ":"))),
    );
    document.insert("_file".to_string(), Value::String(relative.to_string()));
    document.insert(
        "_extension".to_string(),
        Value::String(kind.extension().to_string()),
    );

    Ok(document)
}

/// `blog/hello.md` -> `/blog/hello`, `blog/index.md` -> `/blog`.
fn content_path(relative: &str) -> String {
    let stem = match relative.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => relative,
    };
    let mut segments: Vec<&str> = stem.split('/').filter(|s| !s.is_empty()).collect();
    if segments.last() == Some(&"index") {
        segments.pop();
    }
    format!("/{}", segments.join("/"))
}

fn split_front_matter<'a>(
    file: &str,
    raw: &'a str,
) -> Result<(Option<(FrontMatterFormat, &'a str)>, &'a str), ParseDocumentError> {
    let (first, rest) = match raw.find('\n') {
        Some(i) => (&raw[..i], &raw[i + 1..]),
        None => (raw, ""),
    };
    let Some(format) = FrontMatterFormat::from_fence(first) else {
        return Ok((None, raw));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == format.fence() {
            return Ok((
                Some((format, &rest[..offset])),
                &rest[offset + line.len()..],
            ));
        }
        offset += line.len();
    }

    Err(ParseDocumentError::UnterminatedFrontMatter {
        file: file.to_string(),
    })
}

fn parse_front_matter(
    file: &str,
    format: FrontMatterFormat,
    front: &str,
) -> Result<Document, ParseDocumentError> {
    if front.trim().is_empty() {
        return Ok(Map::new());
    }

    match format {
        FrontMatterFormat::Toml => {
            let table: toml::Table =
                toml::from_str(front).map_err(|source| ParseDocumentError::TomlFrontMatter {
                    file: file.to_string(),
                    source,
                })?;

            Ok(table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect())
        }
        FrontMatterFormat::Yaml => {
            let value: serde_yaml::Value = serde_yaml::from_str(front).map_err(|source| {
                ParseDocumentError::YamlFrontMatter {
                    file: file.to_string(),
                    source,
                }
            })?;

            match yaml_to_json(value) {
                Value::Object(fields) => Ok(fields),
                Value::Null => Ok(Map::new()),
                _ => Err(ParseDocumentError::FrontMatterNotAMapping {
                    file: file.to_string(),
                }),
            }
        }
    }
}

/// Unquoted YAML dates are plain strings already; tags are dropped.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(key, value)| (yaml_key(key), yaml_to_json(value)))
                .collect(),
        ),
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match yaml_to_json(key) {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}
