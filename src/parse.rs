use std::{fmt::Display, iter::Peekable, str::FromStr};

use thiserror::Error;

use crate::{error::TermError, proposition::Proposition, term::Term};

impl FromStr for Term {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = tokens(s)?;
        check_parentheses(&tokens)?;
        let term = new_parser(tokens).term()?;
        Ok(term)
    }
}

impl FromStr for Proposition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut left = tokens(s)?;
        let relations: Vec<(usize, RelationToken)> = left
            .iter()
            .enumerate()
            .filter_map(|(i, token)| match token {
                Token::Relation(relation) => Some((i, *relation)),
                _ => None,
            })
            .collect();
        let (position, relation) = match relations[..] {
            [] => return Err(ParseError::MissingRelation.into()),
            [relation] => relation,
            _ => return Err(ParseError::MultipleRelations.into()),
        };

        let right = left.split_off(position + 1);
        left.pop();
        check_parentheses(&left)?;
        check_parentheses(&right)?;
        let left = new_parser(left).term()?;
        let right = new_parser(right).term()?;

        Ok(match relation {
            RelationToken::Equals => Proposition::equals(left, right),
            RelationToken::AtMost => Proposition::at_most(left, right),
            RelationToken::AtLeast => Proposition::at_least(left, right),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelationToken {
    Equals,
    AtMost,
    AtLeast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(String),
    Identifier(String),
    ConstantPlaceholder(String),
    LeftParenthesis,
    RightParenthesis,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Root(i64),
    Relation(RelationToken),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(literal) => write!(f, "{literal}"),
            Token::Identifier(name) => write!(f, "{name}"),
            Token::ConstantPlaceholder(name) => write!(f, "#{name}"),
            Token::LeftParenthesis => write!(f, "("),
            Token::RightParenthesis => write!(f, ")"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::Root(2) => write!(f, "√"),
            Token::Root(3) => write!(f, "∛"),
            Token::Root(_) => write!(f, "∜"),
            Token::Relation(RelationToken::Equals) => write!(f, "="),
            Token::Relation(RelationToken::AtMost) => write!(f, "<="),
            Token::Relation(RelationToken::AtLeast) => write!(f, ">="),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid character '{0}'")]
pub struct InvalidCharacter(char);

fn take_while(
    chars: &mut Peekable<impl Iterator<Item = char>>,
    first: char,
    predicate: impl Fn(char) -> bool,
) -> String {
    let mut taken = String::from(first);
    while let Some(c) = chars.next_if(|c| predicate(*c)) {
        taken.push(c);
    }
    taken
}

fn tokens(input: &str) -> Result<Vec<Token>, InvalidCharacter> {
    let mut tokens = Vec::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '(' => Token::LeftParenthesis,
            ')' => Token::RightParenthesis,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '√' => Token::Root(2),
            '∛' => Token::Root(3),
            '∜' => Token::Root(4),
            '=' => Token::Relation(RelationToken::Equals),
            '≤' => Token::Relation(RelationToken::AtMost),
            '≥' => Token::Relation(RelationToken::AtLeast),
            '<' | '>' => {
                if chars.next_if_eq(&'=').is_none() {
                    return Err(InvalidCharacter(c));
                }
                if c == '<' {
                    Token::Relation(RelationToken::AtMost)
                } else {
                    Token::Relation(RelationToken::AtLeast)
                }
            }
            '#' => match chars.next_if(|c| c.is_alphabetic()) {
                Some(first) => {
                    Token::ConstantPlaceholder(take_while(&mut chars, first, char::is_alphanumeric))
                }
                None => return Err(InvalidCharacter('#')),
            },
            c if c.is_ascii_digit() => {
                let mut literal = take_while(&mut chars, c, |c| c.is_ascii_digit());
                if chars.next_if_eq(&'.').is_some() {
                    match chars.next_if(char::is_ascii_digit) {
                        Some(first) => {
                            literal.push('.');
                            literal.push_str(&take_while(&mut chars, first, |c| c.is_ascii_digit()));
                        }
                        None => return Err(InvalidCharacter('.')),
                    }
                }
                Token::Number(literal)
            }
            c if c.is_alphabetic() => Token::Identifier(take_while(&mut chars, c, char::is_alphanumeric)),
            c if c.is_whitespace() => continue,
            c => return Err(InvalidCharacter(c)),
        });
    }
    Ok(tokens)
}

fn check_parentheses(tokens: &[Token]) -> Result<(), ParseError> {
    let mut depth: usize = 0;
    for token in tokens {
        match token {
            Token::LeftParenthesis => depth += 1,
            Token::RightParenthesis => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(ParseError::UnbalancedParentheses)?
            }
            _ => {}
        }
    }
    if depth == 0 {
        Ok(())
    } else {
        Err(ParseError::UnbalancedParentheses)
    }
}

/// Operands of an unparenthesized `+` or `*` chain; a single operand stands
/// for itself.
fn collapse(mut operands: Vec<Term>, wrap: fn(Vec<Term>) -> Term) -> Term {
    if operands.len() == 1 {
        operands.remove(0)
    } else {
        wrap(operands)
    }
}

fn number(literal: &str) -> Result<Term, ParseError> {
    if let Ok(integer) = literal.parse::<i64>() {
        return Ok(Term::integer(integer));
    }
    literal
        .parse::<f64>()
        .ok()
        .and_then(|real| Term::real(real).ok())
        .ok_or_else(|| ParseError::NumberOutOfRange(literal.to_string()))
}

fn identifier(name: &str) -> Result<Term, TermError> {
    if name.starts_with(char::is_uppercase) {
        Term::placeholder(name)
    } else {
        Term::variable(name)
    }
}

struct TermParser<I>
where
    I: Iterator<Item = Token>,
{
    tokens: Peekable<I>,
}

fn new_parser(tokens: Vec<Token>) -> TermParser<impl Iterator<Item = Token>> {
    TermParser {
        tokens: tokens.into_iter().peekable(),
    }
}

impl<I> TermParser<I>
where
    I: Iterator<Item = Token>,
{
    pub fn term(&mut self) -> Result<Term, ParseError> {
        let term = self.sum()?;
        match self.tokens.next() {
            None => Ok(term),
            Some(token) => Err(ParseError::UnexpectedToken(token.to_string())),
        }
    }

    fn sum(&mut self) -> Result<Term, ParseError> {
        let mut summands = vec![self.negation()?];
        loop {
            if self.tokens.next_if_eq(&Token::Plus).is_some() {
                summands.push(self.product()?);
            } else if self.tokens.next_if_eq(&Token::Minus).is_some() {
                let minuend = collapse(summands, Term::Add);
                summands = vec![minuend - self.product()?];
            } else {
                return Ok(collapse(summands, Term::Add));
            }
        }
    }

    fn negation(&mut self) -> Result<Term, ParseError> {
        match self.tokens.next_if_eq(&Token::Minus) {
            Some(_) => Ok(-self.negation()?),
            None => self.product(),
        }
    }

    fn product(&mut self) -> Result<Term, ParseError> {
        let mut factors = vec![self.factor()?];
        loop {
            if self.tokens.next_if_eq(&Token::Star).is_some() {
                factors.push(self.factor()?);
            } else if self.tokens.next_if_eq(&Token::Slash).is_some() {
                let dividend = collapse(factors, Term::Mul);
                factors = vec![dividend / self.factor()?];
            } else {
                return Ok(collapse(factors, Term::Mul));
            }
        }
    }

    fn factor(&mut self) -> Result<Term, ParseError> {
        match self.tokens.next_if_eq(&Token::Minus) {
            Some(_) => Ok(-self.factor()?),
            None => self.power(),
        }
    }

    fn power(&mut self) -> Result<Term, ParseError> {
        let base = self.radical()?;
        match self.tokens.next_if_eq(&Token::Caret) {
            Some(_) => Ok(base.pow(self.factor()?)),
            None => Ok(base),
        }
    }

    fn radical(&mut self) -> Result<Term, ParseError> {
        match self.tokens.next_if(|token| matches!(token, Token::Root(_))) {
            Some(Token::Root(index)) => Ok(self.radical()?.root(Term::integer(index))),
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Term, ParseError> {
        match self.tokens.next() {
            Some(Token::Number(literal)) => number(&literal),
            Some(Token::Identifier(name)) => Ok(identifier(&name)?),
            Some(Token::ConstantPlaceholder(name)) => Ok(Term::constant_placeholder(&name)?),
            Some(Token::LeftParenthesis) => {
                let term = self.sum()?;
                match self.tokens.next() {
                    Some(Token::RightParenthesis) => Ok(term),
                    Some(token) => Err(ParseError::UnexpectedToken(token.to_string())),
                    None => Err(ParseError::UnbalancedParentheses),
                }
            }
            Some(token) => Err(ParseError::UnexpectedToken(token.to_string())),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    TokenizerError(#[from] InvalidCharacter),
    #[error(transparent)]
    ParserError(#[from] ParseError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected '{0}'")]
    UnexpectedToken(String),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("more than one relation")]
    MultipleRelations,
    #[error("expected one of =, <=, >=")]
    MissingRelation,
    #[error("{0} is not a representable number")]
    NumberOutOfRange(String),
    #[error(transparent)]
    InvalidTerm(#[from] TermError),
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;
    use crate::{number::Number, sampler::ground_term};

    fn var(name: &str) -> Term {
        Term::variable(name).unwrap()
    }

    fn int(value: i64) -> Term {
        Term::integer(value)
    }

    fn parse_error(s: &str) -> Error {
        s.parse::<Term>().unwrap_err()
    }

    #[test]
    fn parse_test() {
        assert_eq!(
            "x+y*2".parse(),
            Ok(Term::Add(vec![var("x"), Term::Mul(vec![var("y"), int(2)])]))
        );
    }

    #[test]
    fn parse_test_with_whitespace() {
        assert_eq!(" x * ( y + 1 ) ".parse(), Ok(var("x") * (var("y") + int(1))));
    }

    #[test]
    fn chains_of_plus_and_star_are_variadic() {
        assert!(matches!(
            "a+b+c".parse::<Term>(),
            Ok(Term::Add(operands)) if operands.len() == 3
        ));
        assert!(matches!(
            "a*b*c*d".parse::<Term>(),
            Ok(Term::Mul(operands)) if operands.len() == 4
        ));
        assert!(matches!(
            "(a+b)+c".parse::<Term>(),
            Ok(Term::Add(operands)) if operands.len() == 2
        ));
    }

    #[test]
    fn minus_and_slash_associate_to_the_left() {
        assert_eq!("a-b-c".parse(), Ok((var("a") - var("b")) - var("c")));
        assert_eq!("a/b/c".parse(), Ok((var("a") / var("b")) / var("c")));
        assert_eq!(
            "a+b-c+d".parse(),
            Ok(Term::Add(vec![(var("a") + var("b")) - var("c"), var("d")]))
        );
        assert_eq!(
            "a*b/c".parse(),
            Ok(Term::Mul(vec![var("a"), var("b")]) / var("c"))
        );
    }

    #[test]
    fn caret_associates_to_the_right() {
        assert_eq!(
            "a^b^c".parse(),
            Ok(var("a").pow(var("b").pow(var("c"))))
        );
        assert_eq!("a*b^2".parse(), Ok(var("a") * var("b").pow(int(2))));
    }

    #[test]
    fn unary_minus() {
        assert_eq!("-x*y".parse(), Ok(-(var("x") * var("y"))));
        assert_eq!("x*-y".parse(), Ok(var("x") * -var("y")));
        assert_eq!("-x+y".parse(), Ok(-var("x") + var("y")));
        assert_eq!("--x".parse(), Ok(-(-var("x"))));
        assert_eq!("x^-2".parse(), Ok(var("x").pow(-int(2))));
    }

    #[test]
    fn roots() {
        assert_eq!("√x".parse(), Ok(var("x").root(int(2))));
        assert_eq!("∛(x+1)".parse(), Ok((var("x") + int(1)).root(int(3))));
        assert_eq!("∜x^2".parse(), Ok(var("x").root(int(4)).pow(int(2))));
        assert_eq!("√√x".parse(), Ok(var("x").root(int(2)).root(int(2))));
    }

    #[test]
    fn placeholders() {
        assert_eq!(
            "X+#C".parse(),
            Ok(Term::placeholder("X").unwrap() + Term::constant_placeholder("C").unwrap())
        );
        assert_eq!("Y1".parse::<Term>(), Ok(Term::placeholder("Y1").unwrap()));
    }

    #[test]
    fn numbers() {
        assert!(matches!(
            "0.25".parse::<Term>(),
            Ok(Term::Constant(Number::Real(r))) if r == 0.25
        ));
        assert!(matches!(
            "99999999999999999999".parse::<Term>(),
            Ok(Term::Constant(Number::Real(_)))
        ));
        assert_eq!(parse_error("1."), Error::TokenizerError(InvalidCharacter('.')));
    }

    #[test]
    fn rejects_malformed_terms() {
        assert_eq!(
            parse_error("(x+y"),
            Error::ParserError(ParseError::UnbalancedParentheses)
        );
        assert_eq!(
            parse_error("x+y)"),
            Error::ParserError(ParseError::UnbalancedParentheses)
        );
        assert_eq!(
            parse_error(")x("),
            Error::ParserError(ParseError::UnbalancedParentheses)
        );
        assert_eq!(parse_error("x+"), Error::ParserError(ParseError::UnexpectedEnd));
        assert_eq!(
            parse_error("x y"),
            Error::ParserError(ParseError::UnexpectedToken("y".to_string()))
        );
        assert_eq!(
            parse_error("x<=y"),
            Error::ParserError(ParseError::UnexpectedToken("<=".to_string()))
        );
        assert_eq!(
            parse_error("x $ y"),
            Error::TokenizerError(InvalidCharacter('$'))
        );
        assert_eq!(parse_error("x<y"), Error::TokenizerError(InvalidCharacter('<')));
        assert_eq!(parse_error("#1"), Error::TokenizerError(InvalidCharacter('#')));
    }

    #[test]
    fn relations() {
        assert_eq!(
            "x<=y".parse(),
            Ok(Proposition::at_most(var("x"), var("y")))
        );
        assert_eq!(
            "x>=y".parse(),
            Ok(Proposition::at_most(var("y"), var("x")))
        );
        assert_eq!("x≤y".parse::<Proposition>(), "x<=y".parse());
        assert_eq!("x≥y".parse::<Proposition>(), "y<=x".parse());
        assert_eq!(
            "x+1=y".parse(),
            Ok(Proposition::equals(var("x") + int(1), var("y")))
        );
    }

    #[test]
    fn rejects_malformed_propositions() {
        assert_eq!(
            "x<=y<=z".parse::<Proposition>(),
            Err(Error::ParserError(ParseError::MultipleRelations))
        );
        assert_eq!(
            "x=y=z".parse::<Proposition>(),
            Err(Error::ParserError(ParseError::MultipleRelations))
        );
        assert_eq!(
            "x+y".parse::<Proposition>(),
            Err(Error::ParserError(ParseError::MissingRelation))
        );
        assert_eq!(
            "(x<=y)".parse::<Proposition>(),
            Err(Error::ParserError(ParseError::UnbalancedParentheses))
        );
        assert_eq!(
            "<=y".parse::<Proposition>(),
            Err(Error::ParserError(ParseError::UnexpectedEnd))
        );
    }

    proptest! {
        #[test]
        fn printing_and_parsing_reaches_a_fixpoint(t in ground_term(4)) {
            let printed = t.to_string();
            let reparsed: Term = printed.parse().unwrap();
            prop_assert_eq!(reparsed.to_string(), printed);
        }

        #[test]
        fn printing_and_parsing_propositions(a in ground_term(3), b in ground_term(3)) {
            for proposition in [Proposition::at_most(a.clone(), b.clone()), Proposition::equals(a.clone(), b.clone())] {
                let printed = proposition.to_string();
                let reparsed: Proposition = printed.parse().unwrap();
                prop_assert_eq!(reparsed.to_string(), printed);
            }
        }
    }
}
