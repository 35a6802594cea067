//! Prerequisite string parser

use crate::character::Attribute;
use crate::error::{GeneratorError, Result};
use crate::prereq::ast::{Operator, PrereqNode, Requirement, Subject, Test};

/// Parse a prerequisite string into an AST
pub fn parse(prerequisite: &str) -> Result<PrereqNode> {
    let prerequisite = prerequisite.trim();
    if prerequisite.is_empty() {
        return Err(GeneratorError::InvalidPrerequisite(
            "Empty prerequisite".to_string(),
        ));
    }

    let tokens = tokenize(prerequisite)?;
    parse_tokens(&tokens)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Requirement(String),
    And,
    Or,
    OpenParen,
    CloseParen,
}

fn flush(current: &mut String, tokens: &mut Vec<Token>) {
    let text = current.trim();
    if !text.is_empty() {
        tokens.push(Token::Requirement(text.to_string()));
    }
    current.clear();
}

fn tokenize(prerequisite: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut paren_depth = 0i32;
    let mut in_quotes = false;

    for c in prerequisite.chars() {
        if in_quotes {
            current.push(c);
            if c == '"' {
                in_quotes = false;
            }
            continue;
        }

        match c {
            '"' => {
                current.push(c);
                in_quotes = true;
            }
            '(' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::OpenParen);
                paren_depth += 1;
            }
            ')' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::CloseParen);
                paren_depth -= 1;
                if paren_depth < 0 {
                    return Err(GeneratorError::InvalidPrerequisite(format!(
                        "Unbalanced parentheses in: {}",
                        prerequisite
                    )));
                }
            }
            '&' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::And);
            }
            '|' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::Or);
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(GeneratorError::InvalidPrerequisite(format!(
            "Unterminated quote in: {}",
            prerequisite
        )));
    }
    flush(&mut current, &mut tokens);

    if paren_depth != 0 {
        return Err(GeneratorError::InvalidPrerequisite(format!(
            "Unbalanced parentheses in: {}",
            prerequisite
        )));
    }

    Ok(tokens)
}

fn parse_tokens(tokens: &[Token]) -> Result<PrereqNode> {
    if tokens.is_empty() {
        return Err(GeneratorError::InvalidPrerequisite(
            "Missing operand".to_string(),
        ));
    }

    // Lowest precedence operator at depth 0 (OR binds looser than AND)
    let mut paren_depth = 0;
    let mut or_pos = None;
    let mut and_pos = None;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::OpenParen => paren_depth += 1,
            Token::CloseParen => paren_depth -= 1,
            Token::Or if paren_depth == 0 => or_pos = Some(i),
            Token::And if paren_depth == 0 => and_pos = Some(i),
            _ => {}
        }
    }

    if let Some(pos) = or_pos {
        let left = parse_tokens(&tokens[..pos])?;
        let right = parse_tokens(&tokens[pos + 1..])?;
        return Ok(PrereqNode::Or(Box::new(left), Box::new(right)));
    }

    if let Some(pos) = and_pos {
        let left = parse_tokens(&tokens[..pos])?;
        let right = parse_tokens(&tokens[pos + 1..])?;
        return Ok(PrereqNode::And(Box::new(left), Box::new(right)));
    }

    if tokens.len() >= 2 {
        if let (Token::OpenParen, Token::CloseParen) = (&tokens[0], &tokens[tokens.len() - 1]) {
            return parse_tokens(&tokens[1..tokens.len() - 1]);
        }
    }

    if tokens.len() == 1 {
        if let Token::Requirement(text) = &tokens[0] {
            return parse_requirement(text);
        }
    }

    Err(GeneratorError::InvalidPrerequisite(format!(
        "Cannot parse tokens: {:?}",
        tokens
    )))
}

const OPERATORS: [(&str, Operator); 6] = [
    (">=", Operator::GreaterEqual),
    ("<=", Operator::LessEqual),
    ("!=", Operator::NotEqual),
    (">", Operator::Greater),
    ("<", Operator::Less),
    ("=", Operator::Equal),
];

/// Split a leading (optionally quoted) name from the rest of a requirement
fn split_name(body: &str) -> Result<(&str, &str)> {
    if let Some(quoted) = body.strip_prefix('"') {
        let end = quoted.find('"').ok_or_else(|| {
            GeneratorError::InvalidPrerequisite(format!("Unterminated quote in: {}", body))
        })?;
        return Ok((&quoted[..end], &quoted[end + 1..]));
    }

    match body.find(&['>', '<', '=', '!'][..]) {
        Some(pos) => Ok((body[..pos].trim(), &body[pos..])),
        None => Ok((body.trim(), "")),
    }
}

fn parse_requirement(text: &str) -> Result<PrereqNode> {
    let text = text.trim();
    let (negated, body) = match text.strip_prefix('!') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };

    let (is_tag, body) = match body.strip_prefix('@') {
        Some(rest) => (true, rest),
        None => (false, body),
    };

    let (name, rest) = split_name(body)?;
    if name.is_empty() {
        return Err(GeneratorError::InvalidPrerequisite(format!(
            "Missing name in: {}",
            text
        )));
    }

    let rest = rest.trim();
    let test = if rest.is_empty() {
        if negated {
            Test::Absent
        } else {
            Test::Present
        }
    } else {
        if negated {
            return Err(GeneratorError::InvalidPrerequisite(format!(
                "Negation cannot be combined with a comparison: {}",
                text
            )));
        }
        parse_comparison(rest, text)?
    };

    let subject = if is_tag {
        Subject::Tag(name.to_string())
    } else if let Some(attribute) = Attribute::from_name(name) {
        if !matches!(test, Test::Compare(..)) {
            return Err(GeneratorError::InvalidPrerequisite(format!(
                "Attribute requirement needs a comparison: {}",
                text
            )));
        }
        Subject::Attribute(attribute)
    } else {
        Subject::Trait(name.to_string())
    };

    Ok(PrereqNode::Single(Requirement { subject, test }))
}

fn parse_comparison(rest: &str, text: &str) -> Result<Test> {
    for (symbol, operator) in OPERATORS {
        if let Some(value) = rest.strip_prefix(symbol) {
            let value = value.trim().parse::<f64>().map_err(|_| {
                GeneratorError::InvalidPrerequisite(format!("Invalid number in: {}", text))
            })?;
            return Ok(Test::Compare(operator, value));
        }
    }

    Err(GeneratorError::InvalidPrerequisite(format!(
        "No operator found in: {}",
        text
    )))
}
