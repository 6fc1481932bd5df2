//! Tokenizer for the legacy markup subset.
//!
//! Produces start tags, end tags, and text. Comments and declarations are
//! consumed and dropped. A `<` that does not open a recognizable construct is
//! literal text, so arbitrary byte sequences always tokenize.

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Text(String),
}

pub fn lex(input: &str) -> Vec<Token> {
    Lexer {
        input,
        pos: 0,
        tokens: Vec::new(),
    }
    .run()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn run(mut self) -> Vec<Token> {
        while self.pos < self.input.len() {
            let rest = &self.input[self.pos..];
            match rest.find('<') {
                Some(0) => self.lex_angle(),
                Some(offset) => {
                    self.push_text(&rest[..offset]);
                    self.pos += offset;
                }
                None => {
                    self.push_text(rest);
                    self.pos = self.input.len();
                }
            }
        }
        self.tokens
    }

    /// Dispatch on the construct starting at the current `<`.
    fn lex_angle(&mut self) {
        let rest = &self.input[self.pos..];
        if rest.starts_with("<!--") {
            self.skip_comment();
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            self.skip_to_gt();
        } else if rest.starts_with("</") {
            self.lex_end_tag();
        } else if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            self.lex_start_tag();
        } else {
            self.push_text("<");
            self.pos += 1;
        }
    }

    fn skip_comment(&mut self) {
        let rest = &self.input[self.pos..];
        match rest[4..].find("-->") {
            Some(end) => self.pos += 4 + end + 3,
            None => self.pos = self.input.len(),
        }
    }

    fn skip_to_gt(&mut self) {
        let rest = &self.input[self.pos..];
        match rest.find('>') {
            Some(end) => self.pos += end + 1,
            None => self.pos = self.input.len(),
        }
    }

    fn lex_end_tag(&mut self) {
        let rest = &self.input[self.pos..];
        let name: String = rest[2..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        if name.is_empty() {
            self.push_text("<");
            self.pos += 1;
            return;
        }
        match rest.find('>') {
            Some(end) => {
                self.pos += end + 1;
                self.tokens.push(Token::EndTag {
                    name: name.to_ascii_lowercase(),
                });
            }
            None => self.pos = self.input.len(),
        }
    }

    fn lex_start_tag(&mut self) {
        let rest = &self.input[self.pos..];
        match parse_start_tag(rest) {
            Some((token, consumed)) => {
                let verbatim = match &token {
                    Token::StartTag {
                        name,
                        self_closing: false,
                        ..
                    } if name == "script" || name == "style" => Some(name.clone()),
                    _ => None,
                };
                self.tokens.push(token);
                self.pos += consumed;
                if let Some(name) = verbatim {
                    self.lex_verbatim_content(&name);
                }
            }
            None => {
                // Malformed tag: the `<` is literal text.
                self.push_text("<");
                self.pos += 1;
            }
        }
    }

    /// Script and style content is lexed raw up to the matching close tag so
    /// stray `<` and `&` inside it cannot corrupt the token stream.
    fn lex_verbatim_content(&mut self, name: &str) {
        let rest = &self.input[self.pos..];
        let close = format!("</{name}");
        let lower = rest.to_ascii_lowercase();
        match lower.find(&close) {
            Some(start) => {
                if start > 0 {
                    self.tokens.push(Token::Text(rest[..start].to_string()));
                }
                let after = match lower[start..].find('>') {
                    Some(gt) => start + gt + 1,
                    None => lower.len(),
                };
                self.tokens.push(Token::EndTag {
                    name: name.to_string(),
                });
                self.pos += after;
            }
            None => {
                if !rest.is_empty() {
                    self.tokens.push(Token::Text(rest.to_string()));
                }
                self.tokens.push(Token::EndTag {
                    name: name.to_string(),
                });
                self.pos = self.input.len();
            }
        }
    }

    fn push_text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let decoded = html_escape::decode_html_entities(raw).into_owned();
        self.tokens.push(Token::Text(decoded));
    }
}

/// Parse one start tag at the head of `rest`. Returns the token and the
/// number of bytes consumed, or `None` if the tag never closes or is not a
/// tag at all.
fn parse_start_tag(rest: &str) -> Option<(Token, usize)> {
    let bytes = rest.as_bytes();
    debug_assert_eq!(bytes[0], b'<');

    let mut i = 1;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    let name = rest[1..i].to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }

    let mut attrs = Vec::new();
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        match bytes[i] {
            b'>' => {
                return Some((
                    Token::StartTag {
                        name,
                        attrs,
                        self_closing: false,
                    },
                    i + 1,
                ));
            }
            b'/' => {
                if bytes.get(i + 1) == Some(&b'>') {
                    return Some((
                        Token::StartTag {
                            name,
                            attrs,
                            self_closing: true,
                        },
                        i + 2,
                    ));
                }
                i += 1;
            }
            _ => {
                let (attr, next) = parse_attribute(rest, i)?;
                attrs.push(attr);
                i = next;
            }
        }
    }
}

/// Parse one `name`, `name=bare`, `name="quoted"`, or `name='quoted'`
/// attribute starting at byte `i`.
fn parse_attribute(rest: &str, mut i: usize) -> Option<((String, String), usize)> {
    let bytes = rest.as_bytes();

    let name_start = i;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'>' | b'/') {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    let name = rest[name_start..i].to_ascii_lowercase();

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) != Some(&b'=') {
        return Some(((name, String::new()), i));
    }
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }

    let raw = match bytes.get(i) {
        Some(&q @ (b'"' | b'\'')) => {
            let value_start = i + 1;
            let end = rest[value_start..].find(q as char)? + value_start;
            i = end + 1;
            &rest[value_start..end]
        }
        Some(_) => {
            let value_start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'>' | b'/') {
                i += 1;
            }
            &rest[value_start..i]
        }
        None => return None,
    };
    let value = html_escape::decode_html_entities(raw).into_owned();
    Some(((name, value), i))
}
