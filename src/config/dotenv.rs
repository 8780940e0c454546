//! Reading and in-place editing of `.env` files.
//!
//! Only entries that are set are rewritten; comments, blank lines and
//! unrelated entries are kept byte for byte.

/// A parsed `.env` document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DotEnv {
    lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq)]
enum Line {
    Entry { key: String, value: String, raw: String },
    Other(String),
}

impl DotEnv {
    /// Parse file contents
    pub fn parse(contents: &str) -> Self {
        let lines = contents
            .lines()
            .map(|raw| match parse_entry(raw) {
                Some((key, value)) => Line::Entry {
                    key,
                    value,
                    raw: raw.to_string(),
                },
                None => Line::Other(raw.to_string()),
            })
            .collect();
        Self { lines }
    }

    /// Value of the last entry for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().rev().find_map(|line| match line {
            Line::Entry { key: k, value, .. } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Keys in file order, duplicates included
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry { key, .. } => Some(key.as_str()),
            Line::Other(_) => None,
        })
    }

    /// Set `key`, replacing the first existing entry and dropping later duplicates,
    /// or appending a new entry.
    pub fn set(&mut self, key: &str, value: &str) {
        let rendered = Line::Entry {
            key: key.to_string(),
            value: value.to_string(),
            raw: format!("{}={}", key, quote(value)),
        };

        let mut replaced = false;
        self.lines.retain_mut(|line| match line {
            Line::Entry { key: k, .. } if k == key => {
                if replaced {
                    false
                } else {
                    *line = rendered.clone();
                    replaced = true;
                    true
                }
            }
            _ => true,
        });

        if !replaced {
            self.lines.push(rendered);
        }
    }

    /// Render back to file contents
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Entry { raw, .. } | Line::Other(raw) => out.push_str(raw),
            }
            out.push('\n');
        }
        out
    }
}

/// Whether `key` is usable as an environment variable name
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_entry(raw: &str) -> Option<(String, String)> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if !is_valid_key(key) {
        return None;
    }
    Some((key.to_string(), unquote(value.trim())))
}

fn unquote(value: &str) -> String {
    if let Some(rest) = value.strip_prefix('"') {
        let mut out = String::new();
        let mut chars = rest.chars();
        while let Some(c) = chars.next() {
            match c {
                '"' => break,
                '\\' => match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => out.push('\\'),
                },
                c => out.push(c),
            }
        }
        out
    } else if let Some(rest) = value.strip_prefix('\'') {
        rest.split('\'').next().unwrap_or_default().to_string()
    } else {
        // unquoted values end at an inline comment
        match value.find(" #") {
            Some(pos) => value[..pos].trim_end().to_string(),
            None => value.to_string(),
        }
    }
}

fn quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@+,".contains(c));
    if plain {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
