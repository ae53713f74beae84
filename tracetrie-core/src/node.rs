// tracetrie-core/src/node.rs
//! Trie node type and the textual serialization format (`AutoPatternsTrie:1`).
//!
//! License: MIT OR Apache-2.0

use std::io::{BufRead, Write};

use crate::errors::TrieError;
use crate::token::Token;

/// One node of the pattern trie: a token matcher plus its ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub token: Token,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(token: Token) -> Self {
        Node {
            token,
            children: Vec::new(),
        }
    }

    fn serialize_inner<W: Write>(
        &self,
        out: &mut W,
        compact: bool,
        depth: usize,
    ) -> std::io::Result<()> {
        if compact {
            write!(out, "{}", depth)?;
        } else {
            for _ in 0..depth {
                out.write_all(b" ")?;
            }
        }
        let mut line = String::new();
        self.token.serialize(&mut line);
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
        for kid in &self.children {
            kid.serialize_inner(out, compact, depth + 1)?;
        }
        Ok(())
    }
}

/// Identity line written at the start of every saved trie.
pub const IDENTITY_LINE: &str = "AutoPatternsTrie:1";

/// Serializes `kidz` (a node's children — the root has no token of its own)
/// in the textual format: each line is a depth leader (spaces for pretty,
/// digits for compact) followed by a tag byte and the token's payload.
pub fn serialize_forest<W: Write>(
    kidz: &[Node],
    out: &mut W,
    compact: bool,
) -> std::io::Result<()> {
    writeln!(out, "{}", IDENTITY_LINE)?;
    for kid in kidz {
        kid.serialize_inner(out, compact, 0)?;
    }
    Ok(())
}

struct Deserializer<R: BufRead> {
    reader: R,
    depth: usize,
    lead: u8,
    data: String,
}

impl<R: BufRead> Deserializer<R> {
    fn new(reader: R) -> Self {
        Deserializer {
            reader,
            depth: 0,
            lead: 0,
            data: String::new(),
        }
    }

    /// Reads the next line's depth marker, tag byte, and payload. Sets
    /// `lead` to 0 at end of input.
    fn fetch(&mut self) -> std::io::Result<()> {
        self.data.clear();
        self.depth = 0;
        let mut buf = [0u8; 1];
        loop {
            if self.reader.read(&mut buf)? == 0 {
                self.lead = 0;
                return Ok(());
            }
            let c = buf[0];
            if c == b' ' {
                self.depth += 1;
            } else if c.is_ascii_digit() {
                self.depth = self.depth * 10 + (c - b'0') as usize;
            } else if c == b'\r' || c == b'\n' {
                self.depth = 0;
            } else {
                self.lead = c;
                loop {
                    if self.reader.read(&mut buf)? == 0 {
                        break;
                    }
                    if buf[0] == b'\r' || buf[0] == b'\n' {
                        break;
                    }
                    self.data.push(buf[0] as char);
                }
                return Ok(());
            }
        }
    }
}

/// Parses a [`Token::ClassRange`] or [`Token::NumberHoles`] payload, which
/// are colon-separated decimal fields. Skips any run of non-alphanumeric
/// separator bytes between fields, matching the reference deserializer's
/// leniency about the exact separator character used.
fn parse_fields(data: &str, count: usize) -> Result<Vec<u64>, TrieError> {
    let mut fields = Vec::with_capacity(count);
    let mut rest = data;
    for _ in 0..count {
        rest = rest.trim_start_matches(|c: char| !c.is_ascii_alphanumeric());
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(TrieError::MalformedToken {
                line: 0,
                detail: format!("expected numeric field in {data:?}"),
            });
        }
        fields.push(rest[..end].parse::<u64>().map_err(|_| TrieError::MalformedToken {
            line: 0,
            detail: format!("invalid numeric field in {data:?}"),
        })?);
        rest = &rest[end..];
    }
    Ok(fields)
}

fn parse_token(tag: u8, data: &str) -> Result<Token, TrieError> {
    match tag {
        b'$' => Ok(Token::Exact(data.to_string())),
        b'?' => {
            let fields = parse_fields(data, 3)?;
            Ok(Token::ClassRange {
                class: fields[0] as crate::classify::StringClass,
                min_len: fields[1] as usize,
                max_len: fields[2] as usize,
            })
        }
        b'!' => {
            let rest = data.trim_start_matches(|c: char| !c.is_ascii_alphanumeric());
            let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            if end == 0 {
                return Err(TrieError::MalformedToken {
                    line: 0,
                    detail: format!("expected max_len in {data:?}"),
                });
            }
            let max_len: usize = rest[..end]
                .parse()
                .map_err(|_| TrieError::MalformedToken {
                    line: 0,
                    detail: format!("invalid max_len in {data:?}"),
                })?;
            let skeleton = rest[end..].trim_start_matches(':').to_string();
            Ok(Token::NumberHoles { max_len, skeleton })
        }
        other => Err(TrieError::MalformedToken {
            line: 0,
            detail: format!("unknown tag byte {:?}", other as char),
        }),
    }
}

fn deserialize_inner<R: BufRead>(
    des: &mut Deserializer<R>,
    depth: usize,
    kidz: &mut Vec<Node>,
    line_no: &mut usize,
) -> Result<(), TrieError> {
    while des.lead != 0 {
        *line_no += 1;
        if des.depth > depth {
            if des.depth != depth + 1 {
                return Err(TrieError::BadTrieFormat);
            }
            let Some(last) = kidz.last_mut() else {
                return Err(TrieError::BadTrieFormat);
            };
            deserialize_inner(des, depth + 1, &mut last.children, line_no)?;
            continue;
        }
        if des.depth < depth {
            break;
        }
        match parse_token(des.lead, &des.data) {
            Ok(token) => kidz.push(Node::new(token)),
            Err(e) => {
                log::warn!("skipping malformed trie line {}: {}", line_no, e);
            }
        }
        des.fetch().map_err(TrieError::Io)?;
    }
    Ok(())
}

/// Parses a saved trie body (everything after the identity line) into a
/// forest of root-level children.
pub fn deserialize_forest<R: BufRead>(reader: R) -> Result<Vec<Node>, TrieError> {
    let mut des = Deserializer::new(reader);
    des.fetch().map_err(TrieError::Io)?;
    let mut kidz = Vec::new();
    let mut line_no = 0usize;
    deserialize_inner(&mut des, 0, &mut kidz, &mut line_no)?;
    Ok(kidz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DECIMAL;
    use std::io::Cursor;

    fn sample_forest() -> Vec<Node> {
        let mut root_child = Node::new(Token::Exact("GET".to_string()));
        let mut status = Node::new(Token::ClassRange {
            class: DECIMAL,
            min_len: 3,
            max_len: 3,
        });
        status.children.push(Node::new(Token::Exact("OK".to_string())));
        root_child.children.push(status);
        vec![root_child]
    }

    #[test]
    fn round_trips_through_compact_text_form() {
        let forest = sample_forest();
        let mut buf = Vec::new();
        serialize_forest(&forest, &mut buf, true).unwrap();

        let mut lines = buf.split(|&b| b == b'\n');
        assert_eq!(lines.next().unwrap(), IDENTITY_LINE.as_bytes());

        let body = &buf[IDENTITY_LINE.len() + 1..];
        let parsed = deserialize_forest(Cursor::new(body)).unwrap();
        assert_eq!(parsed, forest);
    }

    #[test]
    fn round_trips_through_pretty_text_form() {
        let forest = sample_forest();
        let mut buf = Vec::new();
        serialize_forest(&forest, &mut buf, false).unwrap();
        let body = &buf[IDENTITY_LINE.len() + 1..];
        let parsed = deserialize_forest(Cursor::new(body)).unwrap();
        assert_eq!(parsed, forest);
    }

    #[test]
    fn unknown_tag_is_skipped_not_fatal() {
        let body = b"0$GET\n1&bogus\n1$OK\n";
        let parsed = deserialize_forest(Cursor::new(&body[..])).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].children.len(), 1);
        assert_eq!(parsed[0].children[0].token, Token::Exact("OK".to_string()));
    }

    #[test]
    fn deeper_line_without_preceding_sibling_is_a_format_error() {
        let body = b"1$x\n";
        let err = deserialize_forest(Cursor::new(&body[..])).unwrap_err();
        assert!(matches!(err, TrieError::BadTrieFormat));
    }

    #[test]
    fn depth_jump_of_two_is_a_format_error() {
        let body = b"0$a\n2$b\n";
        let err = deserialize_forest(Cursor::new(&body[..])).unwrap_err();
        assert!(matches!(err, TrieError::BadTrieFormat));
    }
}
