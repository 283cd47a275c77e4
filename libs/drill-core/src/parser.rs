//! Markdown parser for word lists.
//!
//! # Format
//! ```markdown
//! # Unit 10
//! W: agency
//! T: 代辦處;經銷處
//! S: Many people worked at the agency.
//! SZ: 許多人在這家代辦處工作。
//! D: If you work at an agency, your job is to help others
//! to get something done.
//! B: 5
//!
//! W: 冬天
//! ```
//!
//! `W:` starts an item and holds the answer. `T` (translation), `S`
//! (sentence), `SZ` (sentence translation), `D` (definition), `DZ`
//! (definition translation) and `B` (blank word index) are optional.
//! Lines without a key continue the previous field. Lines starting with `#`
//! are comments.

use crate::error::{ParseError, Result};
use crate::types::QuizItem;

/// Parse word list content into quiz items.
pub fn parse(content: &str) -> Result<Vec<QuizItem>> {
    if content.trim().is_empty() {
        return Ok(vec![]);
    }

    let mut items = Vec::new();
    let mut parser = Parser::new();

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        parser.process_line(line, line_num, &mut items)?;
    }

    parser.finalize(&mut items)?;
    Ok(items)
}

/// Parse a plain list with one answer per line, skipping blank lines.
pub fn parse_plain(content: &str) -> Vec<QuizItem> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(QuizItem::new)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Word,
    Translation,
    Sentence,
    SentenceTranslation,
    Definition,
    DefinitionTranslation,
}

impl Field {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "W" => Some(Self::Word),
            "T" => Some(Self::Translation),
            "S" => Some(Self::Sentence),
            "SZ" => Some(Self::SentenceTranslation),
            "D" => Some(Self::Definition),
            "DZ" => Some(Self::DefinitionTranslation),
            _ => None,
        }
    }
}

struct ItemBuilder {
    item: QuizItem,
    start_line: usize,
}

impl ItemBuilder {
    fn new(start_line: usize) -> Self {
        Self {
            item: QuizItem::new(String::new()),
            start_line,
        }
    }

    fn set(&mut self, field: Field, content: String) {
        let content = content.trim().to_string();
        let slot = match field {
            Field::Word => {
                self.item.answer = content;
                return;
            }
            Field::Translation => &mut self.item.translation,
            Field::Sentence => &mut self.item.sentence,
            Field::SentenceTranslation => &mut self.item.sentence_translation,
            Field::Definition => &mut self.item.definition,
            Field::DefinitionTranslation => &mut self.item.definition_translation,
        };
        *slot = (!content.is_empty()).then_some(content);
    }

    fn build(self) -> Result<QuizItem> {
        if self.item.answer.is_empty() {
            return Err(ParseError::MissingAnswer {
                line: self.start_line,
            });
        }
        Ok(self.item)
    }
}

struct Parser {
    current: Option<ItemBuilder>,
    current_field: Option<Field>,
    buffer: Vec<String>,
}

impl Parser {
    fn new() -> Self {
        Self {
            current: None,
            current_field: None,
            buffer: Vec::new(),
        }
    }

    fn process_line(&mut self, line: &str, line_num: usize, items: &mut Vec<QuizItem>) -> Result<()> {
        match Self::parse_line(line) {
            LineType::Comment => {}
            LineType::Blank(text) => self.handle_blank(text, line_num)?,
            LineType::Keyed(key, text) => self.handle_field(key, text, line_num, items)?,
            LineType::Text(text) => self.handle_text(text, line_num)?,
            LineType::Empty => {
                if !self.buffer.is_empty() {
                    self.buffer.push(String::new());
                }
            }
        }
        Ok(())
    }

    fn parse_line(line: &str) -> LineType<'_> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return LineType::Empty;
        }
        if trimmed.starts_with('#') {
            return LineType::Comment;
        }
        if let Some((key, rest)) = trimmed.split_once(':') {
            let key = key.trim();
            if key == "B" {
                return LineType::Blank(rest.trim());
            }
            if !key.is_empty() && key.len() <= 2 && key.chars().all(|c| c.is_ascii_uppercase()) {
                return LineType::Keyed(key, rest.trim());
            }
        }
        LineType::Text(trimmed)
    }

    fn handle_field(
        &mut self,
        key: &str,
        text: &str,
        line_num: usize,
        items: &mut Vec<QuizItem>,
    ) -> Result<()> {
        let field = Field::from_key(key).ok_or_else(|| ParseError::UnknownField {
            line: line_num,
            key: key.to_string(),
        })?;

        self.flush_buffer();

        if field == Field::Word {
            // A new word closes the previous item.
            if let Some(builder) = self.current.take() {
                items.push(builder.build()?);
            }
            self.current = Some(ItemBuilder::new(line_num));
        } else if self.current.is_none() {
            return Err(ParseError::MissingAnswer { line: line_num });
        }

        self.current_field = Some(field);
        self.buffer.push(text.to_string());
        Ok(())
    }

    /// Continue the current field. Text needs an item and a field to land in.
    fn handle_text(&mut self, text: &str, line_num: usize) -> Result<()> {
        if self.current.is_none() {
            return Err(ParseError::MissingAnswer { line: line_num });
        }
        if self.current_field.is_none() {
            // Only `B:` leaves an item without a field.
            return Err(ParseError::InvalidBlank {
                line: line_num,
                value: text.to_string(),
            });
        }
        self.buffer.push(text.to_string());
        Ok(())
    }

    fn handle_blank(&mut self, value: &str, line_num: usize) -> Result<()> {
        self.flush_buffer();
        self.current_field = None;

        let index = value.parse::<usize>().map_err(|_| ParseError::InvalidBlank {
            line: line_num,
            value: value.to_string(),
        })?;

        match self.current {
            Some(ref mut builder) => {
                builder.item.blank_index = Some(index);
                Ok(())
            }
            None => Err(ParseError::MissingAnswer { line: line_num }),
        }
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let content = self.buffer.join("\n");
        self.buffer.clear();

        if let (Some(builder), Some(field)) = (&mut self.current, self.current_field) {
            builder.set(field, content);
        }
    }

    fn finalize(mut self, items: &mut Vec<QuizItem>) -> Result<()> {
        self.flush_buffer();

        if let Some(builder) = self.current {
            items.push(builder.build()?);
        }

        Ok(())
    }
}

enum LineType<'a> {
    Keyed(&'a str, &'a str),
    Blank(&'a str),
    Text(&'a str),
    Comment,
    Empty,
}
