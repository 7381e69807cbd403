use sqlparser::{
    ast::Statement,
    dialect::Dialect,
    keywords::Keyword,
    parser::Parser,
    tokenizer::{Token, Tokenizer},
};

use crate::core::{ErrorKind, SQLError};

/// Longest schema name DB2 for i accepts.
pub const MAX_SCHEMA_NAME_LEN: usize = 128;

/// SQL dialect of DB2 for i.
///
/// Ordinary identifiers may also contain the national characters `#`, `@`
/// and `$`, which the system uses in library and file names.
#[derive(Debug, Default, Clone, Copy)]
pub struct Db2Dialect;

impl Dialect for Db2Dialect {
    fn is_identifier_start(&self, ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '#' || ch == '@' || ch == '$'
    }

    fn is_identifier_part(&self, ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_' || ch == '#' || ch == '@' || ch == '$'
    }

    fn is_delimited_identifier_start(&self, ch: char) -> bool {
        ch == '"'
    }
}

/// Parse a single SQL statement in the DB2 dialect.
pub fn parse_sql(sql_text: &str) -> Result<Statement, SQLError> {
    let mut statements = Parser::parse_sql(&Db2Dialect, sql_text)
        .map_err(|e| SQLError::new(ErrorKind::ParseError, e.to_string()))?;

    if statements.len() != 1 {
        return Err(SQLError::new(
            ErrorKind::ParseError,
            format!("expected exactly one statement, found {}", statements.len()),
        ));
    }

    Ok(statements.remove(0))
}

/// Upper-case `name` and check it is an ordinary DB2 identifier.
pub fn normalize_namespace(name: &str) -> Result<String, SQLError> {
    let normalized = name.to_uppercase();
    let dialect = Db2Dialect;

    let mut chars = normalized.chars();
    let valid = match chars.next() {
        Some(first) => {
            dialect.is_identifier_start(first) && chars.all(|c| dialect.is_identifier_part(c))
        }
        None => {
            return Err(SQLError::new(
                ErrorKind::InvalidNamespaceError,
                "schema name must not be empty",
            ))
        }
    };

    if !valid {
        return Err(SQLError::new(
            ErrorKind::InvalidNamespaceError,
            format!("invalid schema name: {:?}", name),
        ));
    }
    if normalized.len() > MAX_SCHEMA_NAME_LEN {
        return Err(SQLError::new(
            ErrorKind::InvalidNamespaceError,
            format!(
                "schema name longer than {} characters: {}",
                MAX_SCHEMA_NAME_LEN, normalized
            ),
        ));
    }

    Ok(normalized)
}

/// A `SET SCHEMA` command issued by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaCommand {
    /// `SET SCHEMA <name>`, `SET SCHEMA = <name>` or `SET SCHEMA '<name>'`
    Switch(String),
    /// `SET SCHEMA DEFAULT`
    Reset,
}

/// Recognize `SET SCHEMA`, which the generic parser does not support.
///
/// Returns `Ok(None)` for any other statement.
pub fn parse_set_schema(sql_text: &str) -> Result<Option<SchemaCommand>, SQLError> {
    let tokens = Tokenizer::new(&Db2Dialect, sql_text)
        .tokenize()
        .map_err(|e| SQLError::new(ErrorKind::ParseError, e.to_string()))?;

    let mut tokens = tokens
        .into_iter()
        .filter(|token| !matches!(token, Token::Whitespace(_)))
        .collect::<Vec<_>>();
    while matches!(tokens.last(), Some(Token::SemiColon)) {
        tokens.pop();
    }

    let is_keyword = |token: Option<&Token>, keyword: Keyword| -> bool {
        matches!(token, Some(Token::Word(word)) if word.keyword == keyword && word.quote_style.is_none())
    };
    if !is_keyword(tokens.first(), Keyword::SET) || !is_keyword(tokens.get(1), Keyword::SCHEMA) {
        return Ok(None);
    }

    let rest = match tokens.get(2) {
        Some(Token::Eq) => &tokens[3..],
        _ => &tokens[2..],
    };

    match rest {
        [token] if is_keyword(Some(token), Keyword::DEFAULT) => Ok(Some(SchemaCommand::Reset)),
        [Token::Word(word)] if word.quote_style.is_none() => {
            Ok(Some(SchemaCommand::Switch(word.value.clone())))
        }
        [Token::Word(word)] => Err(SQLError::new(
            ErrorKind::InvalidNamespaceError,
            format!("delimited schema names are not supported: {}", word),
        )),
        [Token::SingleQuotedString(name)] => Ok(Some(SchemaCommand::Switch(name.clone()))),
        _ => Err(SQLError::new(
            ErrorKind::ParseError,
            format!("malformed SET SCHEMA statement: {}", sql_text.trim()),
        )),
    }
}
