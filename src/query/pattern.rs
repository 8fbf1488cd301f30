//! Typed triple patterns and the minimal query text parser.
//!
//! A query is a conjunction of (subject, predicate, object) patterns where
//! each slot is either a bound term or a named variable shared across
//! patterns. Queries are built programmatically through [`Query::select`] /
//! [`Query::ask`] or parsed from a small textual form:
//!
//! ```text
//! SELECT ?a ?l WHERE { ?a hasSeverity High . ?a hasLikelihood ?l }
//! ASK WHERE { attacker0 needs ?s }
//! ```
//!
//! Tokens: `?name` is a variable, `"..."` a literal, `<...>` or a bare word
//! an IRI, `.` separates patterns. All malformed input is rejected at parse
//! time with [`KgError::QuerySyntax`], before any evaluation.

use crate::error::{KgError, KgResult};
use crate::model::Term;

/// One slot of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternTerm {
    Bound(Term),
    Var(String),
}

impl PatternTerm {
    pub fn var(name: impl Into<String>) -> Self {
        PatternTerm::Var(name.into())
    }

    pub fn iri(value: impl Into<String>) -> Self {
        PatternTerm::Bound(Term::iri(value))
    }

    pub fn literal(value: impl Into<String>) -> Self {
        PatternTerm::Bound(Term::literal(value))
    }

    pub fn is_var(&self) -> bool {
        matches!(self, PatternTerm::Var(_))
    }
}

/// A (subject, predicate, object) template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl TriplePattern {
    pub fn new(subject: PatternTerm, predicate: PatternTerm, object: PatternTerm) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = &str> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(|slot| match slot {
                PatternTerm::Var(name) => Some(name.as_str()),
                PatternTerm::Bound(_) => None,
            })
    }
}

/// Result form of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryForm {
    /// Projected variables, in declaration order.
    Select(Vec<String>),
    Ask,
}

/// A validated conjunctive triple-pattern query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub form: QueryForm,
    pub patterns: Vec<TriplePattern>,
}

impl Query {
    /// Start a SELECT query projecting `vars` in the given order.
    pub fn select<I, S>(vars: I) -> QueryBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryBuilder {
            form: QueryForm::Select(vars.into_iter().map(Into::into).collect()),
            patterns: Vec::new(),
        }
    }

    /// Start an ASK query.
    pub fn ask() -> QueryBuilder {
        QueryBuilder {
            form: QueryForm::Ask,
            patterns: Vec::new(),
        }
    }

    /// Parse the textual form. See the module docs for the grammar.
    pub fn parse(text: &str) -> KgResult<Query> {
        Parser::new(text).parse()
    }
}

/// Builder used by callers that construct patterns directly.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    form: QueryForm,
    patterns: Vec<TriplePattern>,
}

impl QueryBuilder {
    pub fn pattern(
        mut self,
        subject: PatternTerm,
        predicate: PatternTerm,
        object: PatternTerm,
    ) -> Self {
        self.patterns
            .push(TriplePattern::new(subject, predicate, object));
        self
    }

    /// Validate and finish. A SELECT must project at least one variable and
    /// every projected variable must be bound by some pattern.
    pub fn build(self) -> KgResult<Query> {
        let query = Query {
            form: self.form,
            patterns: self.patterns,
        };
        validate(&query, "<built query>")?;
        Ok(query)
    }
}

fn syntax_error(detail: impl Into<String>, query: &str) -> KgError {
    KgError::QuerySyntax {
        detail: detail.into(),
        query: query.to_string(),
    }
}

fn validate(query: &Query, text: &str) -> KgResult<()> {
    if query.patterns.is_empty() {
        return Err(syntax_error("query has no patterns", text));
    }
    if let QueryForm::Select(vars) = &query.form {
        if vars.is_empty() {
            return Err(syntax_error("SELECT projects no variables", text));
        }
        for var in vars {
            let bound = query
                .patterns
                .iter()
                .any(|pattern| pattern.variables().any(|name| name == var));
            if !bound {
                return Err(syntax_error(
                    format!("projected variable '?{var}' is not bound by any pattern"),
                    text,
                ));
            }
        }
    }
    Ok(())
}

/// Hand-rolled tokenizer and recursive-descent parser for the query text.
struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Var(String),
    Literal(String),
    Iri(String),
    Word(String),
    OpenBrace,
    CloseBrace,
    Dot,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            tokens: Vec::new(),
            position: 0,
        }
    }

    fn err(&self, detail: impl Into<String>) -> KgError {
        syntax_error(detail, self.text)
    }

    fn tokenize(&mut self) -> KgResult<()> {
        let mut chars = self.text.chars().peekable();
        while let Some(&c) = chars.peek() {
            match c {
                c if c.is_whitespace() => {
                    chars.next();
                }
                '{' => {
                    chars.next();
                    self.tokens.push(Token::OpenBrace);
                }
                '}' => {
                    chars.next();
                    self.tokens.push(Token::CloseBrace);
                }
                '.' => {
                    chars.next();
                    self.tokens.push(Token::Dot);
                }
                '?' => {
                    chars.next();
                    let name = take_while(&mut chars, |c| c.is_alphanumeric() || c == '_');
                    if name.is_empty() {
                        return Err(self.err("stray '?' with no variable name"));
                    }
                    self.tokens.push(Token::Var(name));
                }
                '"' => {
                    chars.next();
                    let mut value = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '"' {
                            closed = true;
                            break;
                        }
                        value.push(c);
                    }
                    if !closed {
                        return Err(self.err("unterminated literal"));
                    }
                    self.tokens.push(Token::Literal(value));
                }
                '<' => {
                    chars.next();
                    let mut value = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '>' {
                            closed = true;
                            break;
                        }
                        value.push(c);
                    }
                    if !closed {
                        return Err(self.err("unterminated IRI"));
                    }
                    self.tokens.push(Token::Iri(value));
                }
                _ => {
                    let word = take_while(&mut chars, |c| {
                        !c.is_whitespace() && !matches!(c, '{' | '}' | '.' | '?' | '"' | '<')
                    });
                    self.tokens.push(Token::Word(word));
                }
            }
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn parse(mut self) -> KgResult<Query> {
        self.tokenize()?;

        let form = match self.next() {
            Some(Token::Word(word)) if word.eq_ignore_ascii_case("select") => {
                let mut vars = Vec::new();
                while let Some(Token::Var(_)) = self.peek() {
                    if let Some(Token::Var(name)) = self.next() {
                        vars.push(name);
                    }
                }
                QueryForm::Select(vars)
            }
            Some(Token::Word(word)) if word.eq_ignore_ascii_case("ask") => QueryForm::Ask,
            Some(_) | None => {
                return Err(self.err("query must start with SELECT or ASK"));
            }
        };

        match self.next() {
            Some(Token::Word(word)) if word.eq_ignore_ascii_case("where") => {}
            _ => return Err(self.err("expected WHERE")),
        }
        match self.next() {
            Some(Token::OpenBrace) => {}
            _ => return Err(self.err("expected '{' after WHERE")),
        }

        let mut patterns = Vec::new();
        loop {
            match self.peek() {
                Some(Token::CloseBrace) => {
                    self.next();
                    break;
                }
                Some(Token::Dot) => {
                    self.next();
                }
                Some(_) => {
                    let subject = self.parse_term()?;
                    let predicate = self.parse_term()?;
                    let object = self.parse_term()?;
                    patterns.push(TriplePattern::new(subject, predicate, object));
                    match self.peek() {
                        Some(Token::Dot) => {
                            self.next();
                        }
                        Some(Token::CloseBrace) => {}
                        _ => return Err(self.err("pattern must have exactly three terms")),
                    }
                }
                None => return Err(self.err("missing closing '}'")),
            }
        }
        if self.peek().is_some() {
            return Err(self.err("unexpected input after '}'"));
        }

        let query = Query { form, patterns };
        validate(&query, self.text)?;
        Ok(query)
    }

    fn parse_term(&mut self) -> KgResult<PatternTerm> {
        match self.next() {
            Some(Token::Var(name)) => Ok(PatternTerm::Var(name)),
            Some(Token::Literal(value)) => Ok(PatternTerm::literal(value)),
            Some(Token::Iri(value)) | Some(Token::Word(value)) => Ok(PatternTerm::iri(value)),
            Some(Token::OpenBrace) | Some(Token::Dot) => {
                Err(self.err("pattern must have exactly three terms"))
            }
            Some(Token::CloseBrace) | None => {
                Err(self.err("pattern must have exactly three terms"))
            }
        }
    }
}

fn take_while(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    keep: impl Fn(char) -> bool,
) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if !keep(c) {
            break;
        }
        out.push(c);
        chars.next();
    }
    out
}
