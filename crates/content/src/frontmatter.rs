use crate::error::{ContentError, Result};
use serde_yaml::{Mapping, Value};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

const DELIMITER: &str = "---";

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("opening '---' has no closing '---'")]
    Unterminated,
    #[error("frontmatter is not a key/value mapping")]
    NotAMapping,
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// A content file: YAML frontmatter followed by a markdown body.
///
/// Keys keep their file order, so unknown keys survive a rewrite untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub frontmatter: Mapping,
    pub body: String,
}

impl Document {
    pub fn new(frontmatter: Mapping, body: impl Into<String>) -> Self {
        Self {
            frontmatter,
            body: body.into(),
        }
    }

    /// Split `text` into frontmatter and body.
    ///
    /// Text that does not open with a `---` line has no frontmatter and is
    /// all body.
    pub fn parse(text: &str) -> std::result::Result<Self, FrontmatterError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut lines = text.split_inclusive('\n');
        let Some(first) = lines.next() else {
            return Ok(Self::default());
        };
        if first.trim_end() != DELIMITER {
            return Ok(Self::new(Mapping::new(), text));
        }

        let yaml_start = first.len();
        let mut offset = yaml_start;
        for line in lines {
            if line.trim_end() == DELIMITER {
                let yaml = &text[yaml_start..offset];
                let body = &text[offset + line.len()..];
                return Ok(Self::new(parse_mapping(yaml)?, body));
            }
            offset += line.len();
        }

        Err(FrontmatterError::Unterminated)
    }

    /// Read and parse a content file
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text).map_err(|e| ContentError::Frontmatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Serialize back to the on-disk form
    pub fn render(&self) -> std::result::Result<String, FrontmatterError> {
        let yaml = if self.frontmatter.is_empty() {
            String::new()
        } else {
            serde_yaml::to_string(&self.frontmatter)?
        };
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{}", self.body))
    }

    /// Write to `path`, failing with `AlreadyExists` if the file is present.
    pub fn write_new(&self, path: &Path) -> Result<()> {
        let rendered = self.render().map_err(|e| ContentError::Frontmatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(rendered.as_bytes())?;
        Ok(())
    }

    /// String value of a frontmatter key, if it holds a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.frontmatter.get(key).and_then(Value::as_str)
    }

    /// Set a string value, keeping the key's position when it already exists
    pub fn set_str(&mut self, key: &str, value: impl Into<String>) {
        self.frontmatter
            .insert(Value::String(key.to_string()), Value::String(value.into()));
    }
}

fn parse_mapping(yaml: &str) -> std::result::Result<Mapping, FrontmatterError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(FrontmatterError::NotAMapping),
    }
}
