//! Line grammar for the deployment manifest.
//!
//! Three forms are recognized:
//! - `target <path>` sets the running context
//! - `new <mode> <owner> <group> <path>` declares a file to be created
//! - `<path>` declares an existing file to back up
//!
//! A path is either wrapped in matching single or double quotes (contents
//! taken verbatim, no escape processing) or is a single whitespace-free
//! token. Blank lines, `#` comments, and bare lines matching no form are
//! ignored; a line that opens with a keyword but fails its form is a hard
//! error.

use std::path::PathBuf;

use crate::types::FileMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Directive {
    Target(PathBuf),
    New {
        mode: FileMode,
        owner: String,
        group: String,
        path: PathBuf,
    },
    Existing(PathBuf),
}

/// Split the first whitespace-delimited word off the front of `s`.
fn split_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

/// Take one path token off the front of `s`: quoted (verbatim contents) or a
/// bare whitespace-free token. Returns the token and the remainder, or
/// `None` when `s` is empty or a quote is left unterminated.
fn take_path(s: &str) -> Option<(String, &str)> {
    let s = s.trim_start();
    let quote = s.chars().next()?;
    if quote == '\'' || quote == '"' {
        let body = &s[1..];
        let close = body.find(quote)?;
        Some((body[..close].to_string(), &body[close + 1..]))
    } else {
        let end = s.find(char::is_whitespace).unwrap_or(s.len());
        Some((s[..end].to_string(), &s[end..]))
    }
}

/// Take a path token that must consume the rest of the line.
fn take_sole_path(s: &str) -> Option<PathBuf> {
    let (token, rest) = take_path(s)?;
    if token.is_empty() || !rest.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(token))
}

/// Classify one manifest line.
///
/// `Ok(None)` means the line is ignored; `Err(reason)` is a malformed
/// keyword directive.
pub(crate) fn classify(line: &str) -> Result<Option<Directive>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let Some((word, rest)) = split_word(trimmed) else {
        return Ok(None);
    };
    match word {
        "target" => match take_sole_path(rest) {
            Some(path) => Ok(Some(Directive::Target(path))),
            None => Err(format!("malformed target directive: {trimmed:?}")),
        },
        "new" => {
            let parsed = (|| {
                let (mode_s, rest) = split_word(rest)?;
                let mode: FileMode = mode_s.parse().ok()?;
                let (owner, rest) = split_word(rest)?;
                let (group, rest) = split_word(rest)?;
                let path = take_sole_path(rest)?;
                Some(Directive::New {
                    mode,
                    owner: owner.to_string(),
                    group: group.to_string(),
                    path,
                })
            })();
            match parsed {
                Some(d) => Ok(Some(d)),
                None => Err(format!(
                    "malformed new directive (expected `new <mode> <owner> <group> <path>`): {trimmed:?}"
                )),
            }
        }
        _ => Ok(take_sole_path(trimmed).map(Directive::Existing)),
    }
}
