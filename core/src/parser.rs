//! Boolean query parser.
//!
//! Grammar: terms combined with `AND`, `OR`, `NOT` and parentheses. Operators are
//! recognized only as whole uppercase words, so `ANDY` or `and` are plain terms.
//! Adjacent terms without an operator between them are joined with `OR`.
//! Precedence is `NOT` > `AND` > `OR`; binary operators are left-associative.

use crate::error::{Result, SearchError};
use std::fmt;

/// Boolean expression tree. Every node owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Not(Box<Node>),
    Term(String),
}

impl Node {
    pub fn term(text: impl Into<String>) -> Self {
        Node::Term(text.into())
    }

    pub fn and(left: Node, right: Node) -> Self {
        Node::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Node, right: Node) -> Self {
        Node::Or(Box::new(left), Box::new(right))
    }

    pub fn not(child: Node) -> Self {
        Node::Not(Box::new(child))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::And(l, r) => write!(f, "({l} AND {r})"),
            Node::Or(l, r) => write!(f, "({l} OR {r})"),
            Node::Not(c) => write!(f, "NOT {c}"),
            Node::Term(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Term(String),
    And,
    Or,
    Not,
    Open,
    Close,
}

impl Token {
    fn precedence(&self) -> Option<u8> {
        match self {
            Token::Not => Some(2),
            Token::And => Some(1),
            Token::Or => Some(0),
            _ => None,
        }
    }
}

pub fn parse(query: &str) -> Result<Node> {
    let tokens = insert_implicit_or(tokenize(query))?;
    if tokens.is_empty() {
        return Err(SearchError::malformed("empty query"));
    }
    let postfix = to_postfix(tokens)?;
    to_tree(postfix)
}

fn tokenize(query: &str) -> Vec<Token> {
    let chars: Vec<char> = query.chars().collect();
    let mut tokens = Vec::new();
    let mut pending = String::new();
    let mut i = 0;

    let flush = |pending: &mut String, tokens: &mut Vec<Token>| {
        if !pending.is_empty() {
            tokens.push(Token::Term(std::mem::take(pending)));
        }
    };

    while i < chars.len() {
        let c = chars[i];
        match c {
            '(' | ')' => {
                flush(&mut pending, &mut tokens);
                tokens.push(if c == '(' { Token::Open } else { Token::Close });
            }
            c if c.is_whitespace() => flush(&mut pending, &mut tokens),
            'A' | 'O' | 'N' if pending.is_empty() => match operator_at(&chars, i) {
                Some((op, len)) => {
                    tokens.push(op);
                    i += len;
                    continue;
                }
                None => pending.push(c),
            },
            _ => pending.push(c),
        }
        i += 1;
    }
    flush(&mut pending, &mut tokens);
    tokens
}

/// An operator word starting at `i`, followed by end of input, whitespace or a parenthesis.
fn operator_at(chars: &[char], i: usize) -> Option<(Token, usize)> {
    const OPERATORS: [(&str, Token); 3] = [("AND", Token::And), ("OR", Token::Or), ("NOT", Token::Not)];
    OPERATORS.into_iter().find_map(|(word, token)| {
        let len = word.chars().count();
        let matches = chars.len() >= i + len && chars[i..i + len].iter().copied().eq(word.chars());
        let boundary = chars
            .get(i + len)
            .map_or(true, |&next| next.is_whitespace() || next == '(' || next == ')');
        (matches && boundary).then_some((token, len))
    })
}

/// Joins adjacent terms with `OR`. `NOT` right after an operand has no implicit join.
fn insert_implicit_or(tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut out = Vec::with_capacity(tokens.len() * 2);
    for token in tokens {
        let after_term = matches!(out.last(), Some(Token::Term(_)));
        let after_operand = after_term || matches!(out.last(), Some(Token::Close));
        match token {
            Token::Term(_) if after_term => out.push(Token::Or),
            Token::Not if after_operand => return Err(SearchError::malformed("missing AND or OR before NOT")),
            _ => {}
        }
        out.push(token);
    }
    Ok(out)
}

/// Shunting-yard conversion. `NOT` is a prefix operator and never pops another `NOT`.
fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Term(_) => output.push(token),
            Token::Open => stack.push(token),
            Token::Close => loop {
                match stack.pop() {
                    Some(Token::Open) => break,
                    Some(op) => output.push(op),
                    None => return Err(SearchError::malformed("unmatched ')'")),
                }
            },
            Token::And | Token::Or | Token::Not => {
                let prec = token.precedence().unwrap_or_default();
                while let Some(top_prec) = stack.last().and_then(Token::precedence) {
                    let pops = if token == Token::Not { prec < top_prec } else { prec <= top_prec };
                    if !pops {
                        break;
                    }
                    output.extend(stack.pop());
                }
                stack.push(token);
            }
        }
    }

    while let Some(op) = stack.pop() {
        if op == Token::Open {
            return Err(SearchError::malformed("unmatched '('"));
        }
        output.push(op);
    }
    Ok(output)
}

fn to_tree(postfix: Vec<Token>) -> Result<Node> {
    let mut stack: Vec<Node> = Vec::new();
    let missing = |op: &str| SearchError::malformed(format!("{op} is missing an operand"));

    for token in postfix {
        let node = match token {
            Token::Term(text) => Node::Term(text),
            Token::Not => Node::not(stack.pop().ok_or_else(|| missing("NOT"))?),
            Token::And | Token::Or => {
                let right = stack.pop();
                let left = stack.pop();
                let name = if token == Token::And { "AND" } else { "OR" };
                let (Some(left), Some(right)) = (left, right) else {
                    return Err(missing(name));
                };
                if token == Token::And {
                    Node::and(left, right)
                } else {
                    Node::or(left, right)
                }
            }
            Token::Open | Token::Close => unreachable!("parentheses never reach postfix output"),
        };
        stack.push(node);
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(root), true) => Ok(root),
        (Some(_), false) => Err(SearchError::malformed("terms without an operator between groups")),
        (None, _) => Err(SearchError::malformed("empty query")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(q: &str) -> String {
        parse(q).unwrap().to_string()
    }

    #[test]
    fn bare_terms_become_disjunction() {
        assert_eq!(parsed("czechia sea"), "(czechia OR sea)");
        assert_eq!(parsed("a b c"), "((a OR b) OR c)");
    }

    #[test]
    fn precedence_and_grouping() {
        assert_eq!(parsed("a OR b AND c"), "(a OR (b AND c))");
        assert_eq!(parsed("(sea OR fish) AND tropical"), "((sea OR fish) AND tropical)");
        assert_eq!(parsed("NOT a AND b"), "(NOT a AND b)");
        assert_eq!(parsed("(sea OR fish) AND NOT tropical"), "((sea OR fish) AND NOT tropical)");
        assert_eq!(parsed("NOT NOT a"), "NOT NOT a");
    }

    #[test]
    fn operators_need_word_boundaries() {
        assert_eq!(parsed("ANDY ORE NOTE"), "((ANDY OR ORE) OR NOTE)");
        assert_eq!(parsed("and or"), "(and OR or)");
        assert_eq!(parsed("NOT(a)"), "NOT a");
        assert_eq!(parsed("(a)AND(b)"), "(a AND b)");
    }

    #[test]
    fn parentheses_split_terms() {
        let tokens = tokenize("fish(sea)");
        assert_eq!(
            tokens,
            vec![Token::Term("fish".into()), Token::Open, Token::Term("sea".into()), Token::Close]
        );
    }

    #[test]
    fn malformed_queries() {
        for q in ["a )", "(a", "AND", "a AND", "NOT", "", "   ", "(a) b"] {
            assert!(matches!(parse(q), Err(SearchError::MalformedQuery(_))), "{q:?} should fail");
        }
    }

    #[test]
    fn not_after_operand_needs_an_operator() {
        for q in ["a NOT b", "(a) NOT b"] {
            match parse(q) {
                Err(SearchError::MalformedQuery(msg)) => assert!(msg.contains("before NOT"), "{msg}"),
                other => panic!("{q:?} parsed as {other:?}"),
            }
        }
        assert_eq!(parsed("a AND NOT b"), "(a AND NOT b)");
        assert_eq!(parsed("a OR NOT b"), "(a OR NOT b)");
    }
}
