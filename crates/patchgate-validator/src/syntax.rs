//! Structural balance checks over shell text.
//!
//! The scanner walks the text once, tracking open quotes, command
//! substitutions, arithmetic, groups, parameter expansions, and brace groups
//! on a stack. Comments and heredoc bodies are skipped. At most one finding is
//! reported per kind of imbalance, located at the first offending line.

use std::collections::BTreeMap;

use crate::issue::{Category, Issue, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Substitution,
    /// `$((` or `((`, closed by `))`.
    Arithmetic,
    Group,
    Expansion,
    Brace,
    DoubleQuote,
}

impl Frame {
    const fn imbalance(self) -> Imbalance {
        match self {
            Self::Substitution | Self::Arithmetic | Self::Group => Imbalance::Parenthesis,
            Self::Expansion | Self::Brace => Imbalance::Brace,
            Self::DoubleQuote => Imbalance::DoubleQuote,
        }
    }
}

/// Kinds of imbalance, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Imbalance {
    SingleQuote,
    DoubleQuote,
    Parenthesis,
    Brace,
}

impl Imbalance {
    const fn message(self) -> &'static str {
        match self {
            Self::SingleQuote => "unterminated single quote",
            Self::DoubleQuote => "unterminated double quote",
            Self::Parenthesis => "unbalanced parentheses in command substitution or grouping",
            Self::Brace => "unbalanced braces in parameter expansion or group",
        }
    }
}

#[derive(Debug)]
struct Heredoc {
    delimiter: String,
    strip_tabs: bool,
}

#[derive(Debug)]
struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    stack: Vec<(Frame, usize)>,
    heredocs: Vec<Heredoc>,
    /// Stack depths at which `case` statements opened.
    cases: Vec<usize>,
    word_start: bool,
    /// Whether the next word is read as a command name.
    command_position: bool,
    findings: BTreeMap<Imbalance, usize>,
}

/// Checks quote, parenthesis, and brace balance.
///
/// Returns one `syntax` error per kind of imbalance found, ordered single
/// quote, double quote, parenthesis, brace. Balanced text yields no findings.
#[must_use]
pub fn check_syntax(text: &str) -> Vec<Issue> {
    Scanner::new(text).run()
}

impl Scanner {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            stack: Vec::new(),
            heredocs: Vec::new(),
            cases: Vec::new(),
            word_start: true,
            command_position: true,
            findings: BTreeMap::new(),
        }
    }

    fn run(mut self) -> Vec<Issue> {
        while let Some(ch) = self.bump() {
            match self.top() {
                Some(Frame::DoubleQuote) => self.in_double_quote(ch),
                Some(Frame::Expansion) => self.in_expansion(ch),
                _ => self.in_command(ch),
            }
        }
        for (frame, line) in std::mem::take(&mut self.stack) {
            self.record(frame.imbalance(), line);
        }
        self.findings
            .into_iter()
            .map(|(kind, line)| {
                Issue::new(Severity::Error, Category::Syntax, kind.message()).with_line(line)
            })
            .collect()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn top(&self) -> Option<Frame> {
        self.stack.last().map(|(frame, _)| *frame)
    }

    fn push(&mut self, frame: Frame) {
        self.stack.push((frame, self.line));
    }

    fn record(&mut self, kind: Imbalance, line: usize) {
        self.findings.entry(kind).or_insert(line);
    }

    fn in_command(&mut self, ch: char) {
        let at_word_start = self.word_start;
        let at_command = self.command_position;
        self.word_start = false;
        if !ch.is_whitespace() {
            self.command_position = false;
        }
        match ch {
            '\\' => {
                self.bump();
            }
            '\'' => self.single_quote(),
            '"' => self.push(Frame::DoubleQuote),
            '`' => self.backtick(),
            '#' if at_word_start => self.skip_comment(),
            '$' => self.dollar(),
            '(' => {
                if at_word_start && self.peek() == Some('(') {
                    self.bump();
                    self.push(Frame::Arithmetic);
                } else {
                    self.push(Frame::Group);
                    self.command_position = true;
                }
                self.word_start = true;
            }
            ')' => {
                self.close_paren();
                self.word_start = true;
                self.command_position = true;
            }
            '{' => {
                self.push(Frame::Brace);
                self.word_start = true;
                self.command_position = true;
            }
            '}' => self.close_brace(),
            '<' if self.peek() == Some('<') && !self.in_arithmetic() => self.heredoc_operator(),
            '\n' => {
                self.word_start = true;
                self.command_position = true;
                self.skip_heredoc_bodies();
            }
            ';' | '&' | '|' => {
                self.word_start = true;
                self.command_position = true;
            }
            other if other.is_whitespace() || matches!(other, '<' | '>') => {
                self.word_start = true;
            }
            other if at_word_start && other.is_ascii_alphabetic() => {
                self.keyword(other, at_command);
            }
            _ => {}
        }
    }

    fn in_double_quote(&mut self, ch: char) {
        match ch {
            '\\' => {
                self.bump();
            }
            '"' => {
                self.stack.pop();
            }
            '`' => self.backtick(),
            '$' => self.dollar(),
            _ => {}
        }
    }

    fn in_expansion(&mut self, ch: char) {
        match ch {
            '\\' => {
                self.bump();
            }
            '\'' => self.single_quote(),
            '"' => self.push(Frame::DoubleQuote),
            '`' => self.backtick(),
            '$' => self.dollar(),
            '}' => {
                self.stack.pop();
            }
            _ => {}
        }
    }

    fn dollar(&mut self) {
        match self.peek() {
            Some('(') => {
                self.bump();
                if self.peek() == Some('(') {
                    self.bump();
                    self.push(Frame::Arithmetic);
                } else {
                    self.push(Frame::Substitution);
                    self.command_position = true;
                }
                self.word_start = true;
            }
            Some('{') => {
                self.bump();
                self.push(Frame::Expansion);
            }
            Some('\'') => {
                self.bump();
                self.ansi_c_quote();
            }
            _ => {}
        }
    }

    fn close_paren(&mut self) {
        match self.top() {
            _ if self.cases.last() == Some(&self.stack.len()) => {}
            Some(Frame::Arithmetic) if self.peek() == Some(')') => {
                self.bump();
                self.stack.pop();
            }
            Some(Frame::Substitution | Frame::Group) => {
                self.stack.pop();
            }
            _ => self.record(Imbalance::Parenthesis, self.line),
        }
    }

    fn close_brace(&mut self) {
        if matches!(self.top(), Some(Frame::Brace | Frame::Expansion)) {
            self.stack.pop();
        } else {
            self.record(Imbalance::Brace, self.line);
        }
    }

    /// Returns true inside arithmetic, where `<<` is a shift.
    fn in_arithmetic(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .map(|(frame, _)| *frame)
            .find(|frame| *frame != Frame::Group)
            == Some(Frame::Arithmetic)
    }

    /// Tracks `case`/`esac` so pattern terminators are not read as closers.
    ///
    /// Only words in command position count; `echo in case` is an argument.
    fn keyword(&mut self, first: char, at_command: bool) {
        let mut word = String::from(first);
        while let Some(next) = self.peek() {
            if !(next.is_ascii_alphanumeric() || next == '_') {
                break;
            }
            word.push(next);
            self.bump();
        }
        if !at_command {
            return;
        }
        match word.as_str() {
            "case" => self.cases.push(self.stack.len()),
            "esac" if self.cases.last() == Some(&self.stack.len()) => {
                self.cases.pop();
            }
            "if" | "then" | "elif" | "else" | "while" | "until" | "do" | "time" => {
                self.command_position = true;
            }
            _ => {}
        }
    }

    fn single_quote(&mut self) {
        let opened = self.line;
        loop {
            match self.bump() {
                Some('\'') => return,
                Some(_) => {}
                None => {
                    self.record(Imbalance::SingleQuote, opened);
                    return;
                }
            }
        }
    }

    /// Scans `$'...'`, where backslash escapes a quote.
    fn ansi_c_quote(&mut self) {
        let opened = self.line;
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some('\'') => return,
                Some(_) => {}
                None => {
                    self.record(Imbalance::SingleQuote, opened);
                    return;
                }
            }
        }
    }

    fn backtick(&mut self) {
        while let Some(ch) = self.bump() {
            match ch {
                '\\' => {
                    self.bump();
                }
                '`' => return,
                _ => {}
            }
        }
    }

    fn skip_comment(&mut self) {
        while self.peek().is_some_and(|ch| ch != '\n') {
            self.bump();
        }
    }

    fn heredoc_operator(&mut self) {
        self.bump();
        if self.peek() == Some('<') {
            self.bump();
            return;
        }
        let strip_tabs = self.peek() == Some('-');
        if strip_tabs {
            self.bump();
        }
        while self.peek().is_some_and(|ch| ch == ' ' || ch == '\t') {
            self.bump();
        }
        let mut delimiter = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || matches!(ch, ';' | '&' | '|' | '<' | '>' | '(' | ')') {
                break;
            }
            self.bump();
            match ch {
                '\'' | '"' => {
                    while let Some(quoted) = self.bump() {
                        if quoted == ch {
                            break;
                        }
                        delimiter.push(quoted);
                    }
                }
                '\\' => {
                    if let Some(escaped) = self.bump() {
                        delimiter.push(escaped);
                    }
                }
                _ => delimiter.push(ch),
            }
        }
        if !delimiter.is_empty() {
            self.heredocs.push(Heredoc {
                delimiter,
                strip_tabs,
            });
        }
    }

    fn skip_heredoc_bodies(&mut self) {
        for heredoc in std::mem::take(&mut self.heredocs) {
            while let Some(body_line) = self.read_line() {
                let candidate = if heredoc.strip_tabs {
                    body_line.trim_start_matches('\t')
                } else {
                    body_line.as_str()
                };
                if candidate == heredoc.delimiter {
                    break;
                }
            }
        }
    }

    fn read_line(&mut self) -> Option<String> {
        self.peek()?;
        let mut line = String::new();
        while let Some(ch) = self.bump() {
            if ch == '\n' {
                break;
            }
            line.push(ch);
        }
        Some(line)
    }
}
