use std::{path::Path, str::FromStr};

use anyhow::{anyhow, bail};
use serde::Deserialize;
use serde_dynamic_string::DynamicString;
use toml::{Table, Value};

use crate::Config;

/// Fields that may reference an unset environment variable. Such a field is
/// dropped from the configuration instead of failing the load.
const OPTIONAL_FIELDS: &[&str] = &["chat.providers.openai.api_key", "chat.providers.groq.api_key"];

pub(crate) fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse(&content)
}

pub(crate) fn parse(content: &str) -> anyhow::Result<Config> {
    let mut raw_config: Table = toml::from_str(content)?;

    expand_table(&mut Vec::new(), &mut raw_config)?;

    Ok(Config::deserialize(Value::Table(raw_config))?)
}

enum Segment {
    Key(String),
    Index(usize),
}

fn render(path: &[Segment]) -> String {
    let mut rendered = String::new();

    for segment in path {
        match segment {
            Segment::Key(key) => {
                if !rendered.is_empty() {
                    rendered.push('.');
                }

                rendered.push_str(key);
            }
            Segment::Index(i) => rendered.push_str(&format!("[{i}]")),
        }
    }

    rendered
}

fn expand_table(path: &mut Vec<Segment>, table: &mut Table) -> anyhow::Result<()> {
    let mut dropped = Vec::new();

    for (key, value) in table.iter_mut() {
        path.push(Segment::Key(key.clone()));

        if let Value::String(s) = value {
            if let Err(err) = expand_string(s) {
                let field = render(path);

                if OPTIONAL_FIELDS.contains(&field.as_str()) {
                    log::warn!("Ignoring '{field}': {err}");
                    dropped.push(key.clone());
                } else {
                    bail!("Failed to expand dynamic string at path '{field}': {err}");
                }
            }
        } else {
            expand_value(path, value)?;
        }

        path.pop();
    }

    for key in dropped {
        table.remove(&key);
    }

    Ok(())
}

fn expand_value(path: &mut Vec<Segment>, value: &mut Value) -> anyhow::Result<()> {
    match value {
        Value::String(s) => {
            if let Err(err) = expand_string(s) {
                bail!("Failed to expand dynamic string at path '{}': {err}", render(path));
            }
        }
        Value::Array(values) => {
            for (i, value) in values.iter_mut().enumerate() {
                path.push(Segment::Index(i));
                expand_value(path, value)?;
                path.pop();
            }
        }
        Value::Table(table) => expand_table(path, table)?,
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::Datetime(_) => (),
    }

    Ok(())
}

fn expand_string(s: &mut String) -> anyhow::Result<()> {
    let expanded = DynamicString::<String>::from_str(s).map_err(|err| anyhow!("{err}"))?;
    *s = expanded.into_inner();

    Ok(())
}
