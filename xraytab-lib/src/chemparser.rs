use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::element::canonical_atomic_number;
use crate::error::{FormulaError, Result};

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?P<name>[A-Z][a-z]*)|(?P<num>(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][-+]?[0-9]+)?)|(?P<lp>\()|(?P<rp>\)))",
    )
    .expect("formula token pattern is valid")
});

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Name(&'a str),
    Num(f64),
    LParen,
    RParen,
    Eos,
}

/// Regex cursor over the formula text; tracks byte offsets for error carets.
struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    peeked: Option<(Token<'a>, usize)>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            peeked: None,
        }
    }

    fn error(&self, message: &str, at: usize) -> FormulaError {
        FormulaError::new(message, self.input, at)
    }

    /// The next token and the byte offset where it starts.
    fn peek(&mut self) -> std::result::Result<(Token<'a>, usize), FormulaError> {
        if let Some(tok) = &self.peeked {
            return Ok(tok.clone());
        }
        let input = self.input;
        let rest = &input[self.pos..];
        let start = self.pos + (rest.len() - rest.trim_start().len());
        let rest = &input[start..];
        if rest.is_empty() {
            self.pos = start;
            self.peeked = Some((Token::Eos, start));
            return Ok((Token::Eos, start));
        }

        let caps = TOKEN
            .captures(rest)
            .ok_or_else(|| self.error("unrecognized element or number", start))?;
        let token = if let Some(m) = caps.name("name") {
            Token::Name(m.as_str())
        } else if let Some(m) = caps.name("num") {
            let n = m
                .as_str()
                .parse::<f64>()
                .map_err(|_| self.error("invalid number", start))?;
            Token::Num(n)
        } else if caps.name("lp").is_some() {
            Token::LParen
        } else {
            Token::RParen
        };
        let len = caps.get(0).map_or(0, |m| m.len());
        self.pos = start + len;
        self.peeked = Some((token.clone(), start));
        Ok((token, start))
    }

    fn bump(&mut self) {
        self.peeked = None;
    }
}

/// Parsed formula tree. Multiplicities are applied in [`Node::flatten`].
#[derive(Debug, PartialEq)]
enum Node {
    Leaf(&'static str),
    Group(Vec<Term>),
}

#[derive(Debug, PartialEq)]
struct Term {
    node: Node,
    count: f64,
}

impl Node {
    fn flatten(&self, weight: f64, out: &mut HashMap<String, f64>) {
        match self {
            Node::Leaf(sym) => *out.entry((*sym).to_string()).or_insert(0.0) += weight,
            Node::Group(terms) => {
                for term in terms {
                    term.node.flatten(weight * term.count, out);
                }
            }
        }
    }
}

fn symbol_of(name: &str) -> Option<&'static str> {
    // D is deuterium, counted as H
    let z = if name == "D" {
        1
    } else {
        canonical_atomic_number(name)?
    };
    Some(crate::element::ELEMENT_SYMBOLS[z as usize - 1])
}

/// Deepest parenthesis nesting accepted by [`chemparse`].
const MAX_NESTING: usize = 256;

fn parse_sequence(
    lexer: &mut Lexer<'_>,
    depth: usize,
) -> std::result::Result<Vec<Term>, FormulaError> {
    let mut terms = Vec::new();
    loop {
        let (token, at) = lexer.peek()?;
        let node = match token {
            Token::Name(name) => {
                let sym = symbol_of(name)
                    .ok_or_else(|| lexer.error(&format!("'{name}' is not an element symbol"), at))?;
                lexer.bump();
                Node::Leaf(sym)
            }
            Token::LParen => {
                if depth >= MAX_NESTING {
                    return Err(lexer.error("parentheses nested too deeply", at));
                }
                lexer.bump();
                let inner = parse_sequence(lexer, depth + 1)?;
                match lexer.peek()? {
                    (Token::RParen, _) => lexer.bump(),
                    (_, at) => return Err(lexer.error("expected ')'", at)),
                }
                Node::Group(inner)
            }
            Token::Num(_) => return Err(lexer.error("count without an element", at)),
            Token::RParen | Token::Eos => break,
        };

        let count = match lexer.peek()? {
            (Token::Num(n), _) => {
                lexer.bump();
                n
            }
            _ => 1.0,
        };
        terms.push(Term { node, count });
    }

    if terms.is_empty() {
        let (_, at) = lexer.peek()?;
        return Err(lexer.error("expected an element or '('", at));
    }
    Ok(terms)
}

/// Parse a chemical formula into element symbol -> count.
///
/// Supports nested parentheses, fractional and scientific-notation counts,
/// and counts with a leading dot (`Fe.7Mg.3O`).
///
/// # Examples
/// ```
/// let result = xraytab::chemparser::chemparse("H2O").unwrap();
/// assert_eq!(result["H"], 2.0);
/// assert_eq!(result["O"], 1.0);
/// ```
pub fn chemparse(formula: &str) -> Result<HashMap<String, f64>> {
    let mut lexer = Lexer::new(formula);
    let terms = parse_sequence(&mut lexer, 0)?;
    match lexer.peek()? {
        (Token::Eos, _) => {}
        (_, at) => return Err(lexer.error("unexpected trailing input", at).into()),
    }

    let mut out = HashMap::new();
    Node::Group(terms).flatten(1.0, &mut out);
    Ok(out)
}

/// Returns true if the formula parses.
pub fn validate_formula(formula: &str) -> bool {
    chemparse(formula).is_ok()
}
