// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Read ATP profile text back into a [ProfileSet].
//!
//! This is the inverse of [render](crate::render). For any set `s` built by
//! one of the [builders](crate::builder), `parse_profile_set(&render_profile_set(&s))`
//! returns a set equal to `s`. Whole-line `#` comments become the summary.

use std::path::Path;

use gwr_atp_core::types::{AtpError, AtpResult, TransactionType};
use log::debug;

use crate::capacity::parse_rate;
use crate::distribution::{DistributionKind, DistributionSpec, SizeSpec};
use crate::profile::{Command, FifoConfig, FifoLevel, IdRange, ProfileBlock, ProfileSet, WaitFor};

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Word(String),
    Str(String),
    Colon,
    Open,
    Close,
}

#[derive(Debug)]
struct Lexed {
    token: Token,
    line: usize,
}

fn tokenize(text: &str, summary: &mut Vec<String>) -> AtpResult<Vec<Lexed>> {
    let mut tokens = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_num = i + 1;
        if let Some(comment) = line.trim_start().strip_prefix('#') {
            summary.push(comment.strip_prefix(' ').unwrap_or(comment).to_string());
            continue;
        }

        let mut chars = line.char_indices().peekable();
        while let Some((start, c)) = chars.next() {
            match c {
                c if c.is_whitespace() => {}
                '#' => break,
                ':' => tokens.push(Lexed {
                    token: Token::Colon,
                    line: line_num,
                }),
                '{' => tokens.push(Lexed {
                    token: Token::Open,
                    line: line_num,
                }),
                '}' => tokens.push(Lexed {
                    token: Token::Close,
                    line: line_num,
                }),
                '"' => {
                    let mut value = String::new();
                    let mut closed = false;
                    while let Some((_, c)) = chars.next() {
                        match c {
                            '"' => {
                                closed = true;
                                break;
                            }
                            '\\' => match chars.next() {
                                Some((_, escaped)) => value.push(escaped),
                                None => break,
                            },
                            c => value.push(c),
                        }
                    }
                    if !closed {
                        return Err(AtpError::malformed(line_num, "unterminated string"));
                    }
                    tokens.push(Lexed {
                        token: Token::Str(value),
                        line: line_num,
                    });
                }
                _ => {
                    let mut end = start + c.len_utf8();
                    while let Some(&(i, c)) = chars.peek() {
                        if c.is_whitespace() || matches!(c, ':' | '{' | '}' | '"' | '#') {
                            break;
                        }
                        end = i + c.len_utf8();
                        chars.next();
                    }
                    tokens.push(Lexed {
                        token: Token::Word(line[start..end].to_string()),
                        line: line_num,
                    });
                }
            }
        }
    }
    Ok(tokens)
}

#[derive(Debug)]
enum NodeValue {
    Scalar(String),
    Message(Vec<Node>),
}

#[derive(Debug)]
struct Node {
    key: String,
    line: usize,
    value: NodeValue,
}

fn parse_nodes(tokens: &[Lexed], pos: &mut usize, nested: Option<usize>) -> AtpResult<Vec<Node>> {
    let mut nodes = Vec::new();
    loop {
        let Some(lexed) = tokens.get(*pos) else {
            return match nested {
                Some(line) => Err(AtpError::malformed(line, "unterminated message")),
                None => Ok(nodes),
            };
        };
        *pos += 1;

        let key = match &lexed.token {
            Token::Close if nested.is_some() => return Ok(nodes),
            Token::Word(key) => key.clone(),
            other => {
                return Err(AtpError::malformed(
                    lexed.line,
                    format!("expected a field name, found {other:?}"),
                ));
            }
        };

        let mut next = tokens.get(*pos);
        if matches!(next, Some(Lexed { token: Token::Colon, .. })) {
            *pos += 1;
            next = tokens.get(*pos);
        }
        *pos += 1;
        let value = match next.map(|lexed| &lexed.token) {
            Some(Token::Open) => NodeValue::Message(parse_nodes(tokens, pos, Some(lexed.line))?),
            Some(Token::Word(value) | Token::Str(value)) => NodeValue::Scalar(value.clone()),
            _ => {
                return Err(AtpError::malformed(
                    lexed.line,
                    format!("missing value for '{key}'"),
                ));
            }
        };
        nodes.push(Node {
            key,
            line: lexed.line,
            value,
        });
    }
}

/// The fields of one message.
struct Fields<'a> {
    name: &'static str,
    line: usize,
    nodes: &'a [Node],
}

impl<'a> Fields<'a> {
    fn new(name: &'static str, line: usize, nodes: &'a [Node], known: &[&str]) -> AtpResult<Self> {
        if let Some(node) = nodes.iter().find(|node| !known.contains(&node.key.as_str())) {
            return Err(AtpError::malformed(
                node.line,
                format!("unknown field '{}' in '{name}'", node.key),
            ));
        }
        Ok(Self { name, line, nodes })
    }

    fn get(&self, key: &str) -> Option<&'a Node> {
        self.nodes.iter().find(|node| node.key == key)
    }

    fn missing(&self, key: &str) -> AtpError {
        AtpError::malformed(self.line, format!("'{}' has no '{key}'", self.name))
    }

    fn scalar(&self, key: &str) -> AtpResult<(&'a str, usize)> {
        match self.get(key) {
            Some(Node {
                value: NodeValue::Scalar(value),
                line,
                ..
            }) => Ok((value.as_str(), *line)),
            Some(node) => Err(AtpError::malformed(
                node.line,
                format!("'{key}' must be a value"),
            )),
            None => Err(self.missing(key)),
        }
    }

    fn scalars(&self, key: &str) -> AtpResult<Vec<(&'a str, usize)>> {
        self.nodes
            .iter()
            .filter(|node| node.key == key)
            .map(|node| match &node.value {
                NodeValue::Scalar(value) => Ok((value.as_str(), node.line)),
                NodeValue::Message(_) => Err(AtpError::malformed(
                    node.line,
                    format!("'{key}' must be a value"),
                )),
            })
            .collect()
    }

    fn message(&self, key: &str) -> AtpResult<Option<(&'a [Node], usize)>> {
        match self.get(key) {
            Some(Node {
                value: NodeValue::Message(nodes),
                line,
                ..
            }) => Ok(Some((nodes.as_slice(), *line))),
            Some(node) => Err(AtpError::malformed(
                node.line,
                format!("'{key}' must be a message"),
            )),
            None => Ok(None),
        }
    }

    /// A required nested message and its fields.
    fn child(&self, key: &'static str, known: &[&str]) -> AtpResult<Fields<'a>> {
        let (nodes, line) = self.message(key)?.ok_or_else(|| self.missing(key))?;
        Fields::new(key, line, nodes, known)
    }

    fn parsed<T>(&self, key: &str, parse: impl Fn(&str) -> AtpResult<T>) -> AtpResult<T> {
        let (value, line) = self.scalar(key)?;
        parse(value).map_err(|e| at_line(line, e))
    }

    fn u64(&self, key: &str) -> AtpResult<u64> {
        self.parsed(key, parse_u64)
    }

    fn f64(&self, key: &str) -> AtpResult<f64> {
        self.parsed(key, |value| {
            value
                .parse::<f64>()
                .map_err(|_| AtpError::InvalidValue(format!("'{value}' is not a number")))
        })
    }
}

/// Report value errors against the line they were read from.
fn at_line(line: usize, err: AtpError) -> AtpError {
    match err {
        AtpError::InvalidValue(reason) => AtpError::malformed(line, reason),
        other => other,
    }
}

fn parse_u64(value: &str) -> AtpResult<u64> {
    let lowercase = value.to_ascii_lowercase();
    let parsed = match lowercase.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => lowercase.parse::<u64>(),
    };
    parsed.map_err(|e| AtpError::InvalidValue(format!("'{value}' is not an integer: {e}")))
}

/// Parse profile text into a [ProfileSet].
pub fn parse_profile_set(text: &str) -> AtpResult<ProfileSet> {
    let mut summary = Vec::new();
    let tokens = tokenize(text, &mut summary)?;
    let mut pos = 0;
    let nodes = parse_nodes(&tokens, &mut pos, None)?;

    let top = Fields::new("file", 1, &nodes, &["lowId", "highId", "profile"])?;
    let id_range = match (top.get("lowId"), top.get("highId")) {
        (None, None) => None,
        (Some(_), Some(_)) => Some(IdRange {
            low: top.u64("lowId")?,
            high: top.u64("highId")?,
        }),
        (Some(node), None) | (None, Some(node)) => {
            return Err(AtpError::malformed(
                node.line,
                "lowId and highId must be given together",
            ));
        }
    };

    let mut set = ProfileSet::new(summary, id_range);
    for node in nodes.iter().filter(|node| node.key == "profile") {
        let NodeValue::Message(fields) = &node.value else {
            return Err(AtpError::malformed(node.line, "'profile' must be a message"));
        };
        let block = parse_block(fields, node.line)?;
        set.push(block).map_err(|e| at_line(node.line, e))?;
    }
    debug!("Parsed {} profiles", set.len());
    Ok(set)
}

pub fn parse_profile_file(path: &Path) -> AtpResult<ProfileSet> {
    let text = std::fs::read_to_string(path).map_err(|e| AtpError::from_io(path, e))?;
    parse_profile_set(&text)
}

fn parse_block(nodes: &[Node], line: usize) -> AtpResult<ProfileBlock> {
    let profile = Fields::new(
        "profile",
        line,
        nodes,
        &["type", "master_id", "fifo", "pattern", "name", "wait_for"],
    )?;

    let fifo = profile.child(
        "fifo",
        &["start_fifo_level", "full_level", "ot_limit", "total_txn", "rate"],
    )?;
    let rate = fifo.parsed("rate", |rate| {
        parse_rate(rate)?;
        Ok(rate.to_string())
    })?;

    let pattern = profile.child(
        "pattern",
        &["cmd", "address", "random_address", "size", "random_size"],
    )?;
    let pattern_line = pattern.line;

    let address = match (pattern.message("address")?, pattern.message("random_address")?) {
        (Some((nodes, line)), None) => {
            let address = Fields::new("address", line, nodes, &["base", "increment"])?;
            DistributionSpec::Linear {
                base: address.u64("base")?,
                increment: address.u64("increment")?,
            }
        }
        (None, Some((nodes, line))) => parse_random("random_address", nodes, line)?,
        _ => {
            return Err(AtpError::malformed(
                pattern_line,
                "pattern needs exactly one of 'address' or 'random_address'",
            ));
        }
    };

    let size = match (pattern.get("size"), pattern.message("random_size")?) {
        (Some(_), None) => SizeSpec::Fixed(pattern.u64("size")?),
        (None, Some((nodes, line))) => SizeSpec::Random(parse_random("random_size", nodes, line)?),
        _ => {
            return Err(AtpError::malformed(
                pattern_line,
                "pattern needs exactly one of 'size' or 'random_size'",
            ));
        }
    };

    let wait_for = profile
        .scalars("wait_for")?
        .into_iter()
        .map(|(value, line)| value.parse::<WaitFor>().map_err(|e| at_line(line, e)))
        .collect::<AtpResult<Vec<_>>>()?;

    Ok(ProfileBlock {
        name: profile.scalar("name")?.0.to_string(),
        transaction_type: profile.parsed("type", str::parse::<TransactionType>)?,
        command: pattern.parsed("cmd", str::parse::<Command>)?,
        master_id: profile.scalar("master_id")?.0.to_string(),
        fifo: FifoConfig {
            start_level: fifo.parsed("start_fifo_level", str::parse::<FifoLevel>)?,
            full_level: fifo.u64("full_level")?,
            ot_limit: fifo.u64("ot_limit")?,
        },
        total_txn: fifo.u64("total_txn")?,
        rate,
        address,
        size,
        wait_for,
    })
}

fn parse_random(name: &'static str, nodes: &[Node], line: usize) -> AtpResult<DistributionSpec> {
    let random = Fields::new(
        name,
        line,
        nodes,
        &["type", "uniform_desc", "normal_desc", "poisson_desc", "weibull_desc"],
    )?;
    let kind = random.parsed("type", str::parse::<DistributionKind>)?;

    let desc = |known: &[&str]| random.child(kind.desc_name(), known);

    let spec = match kind {
        DistributionKind::Linear => {
            return Err(AtpError::UnsupportedDistribution(format!("{kind} in '{name}'")));
        }
        DistributionKind::Uniform => {
            let desc = desc(&["min", "max"])?;
            DistributionSpec::Uniform {
                min: desc.u64("min")?,
                max: desc.u64("max")?,
            }
        }
        DistributionKind::Normal => {
            let desc = desc(&["mean", "std_dev"])?;
            DistributionSpec::Normal {
                mean: desc.f64("mean")?,
                std_dev: desc.f64("std_dev")?,
            }
        }
        DistributionKind::Poisson => DistributionSpec::Poisson {
            mean: desc(&["mean"])?.f64("mean")?,
        },
        DistributionKind::Weibull => {
            let desc = desc(&["shape", "scale"])?;
            DistributionSpec::Weibull {
                shape: desc.f64("shape")?,
                scale: desc.f64("scale")?,
            }
        }
    };
    Ok(spec)
}
