//! This module provides the parser for definition files, utilizing the `pest` crate.
//! The grammar in `grammar.pest` splits a file into lines of words; this module checks the
//! fields of every line and builds a validated [`Program`].
//!
//! ```text
//! num-tapes: 2
//! input-alphabet: a b
//! (start) a _ (copy) a a > >   # state, letters, new state, new letters, moves
//! ```

use crate::{
    identifier::{is_identifier, Identifier},
    program::{Program, Transition},
    types::{Direction, TuringMachineError, MAX_PROGRAM_SIZE},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Position, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Keyword opening the first line.
pub const NUM_TAPES: &str = "num-tapes:";
/// Keyword opening the second line.
pub const INPUT_ALPHABET: &str = "input-alphabet:";

/// Derives a `PestParser` for the definition grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DefinitionParser;

/// Parses a definition file into a `Program`.
///
/// # Returns
///
/// * `Ok(Program)` if the input is well formed and describes a valid machine.
/// * `Err(TuringMachineError::ParseError)` for syntax errors; the message carries the line
///   and column of the offending word.
/// * `Err(TuringMachineError::ValidationError)` if the file is too large.
pub fn parse(input: &str) -> Result<Program, TuringMachineError> {
    if input.len() > MAX_PROGRAM_SIZE {
        return Err(TuringMachineError::ValidationError(format!(
            "Program is larger than {MAX_PROGRAM_SIZE} bytes"
        )));
    }

    let root = DefinitionParser::parse(Rule::definition, input)
        .map_err(|e| TuringMachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| {
            parse_error_at("Empty definition", Position::from_start(input))
        })?;
    let end = root.as_span().end_pos();

    // Blank and comment-only lines carry no words and are skipped.
    let mut lines = root
        .into_inner()
        .filter(|p| p.as_rule() == Rule::line)
        .map(|p| (p.as_span(), p.into_inner().collect::<Vec<_>>()))
        .filter(|(_, words)| !words.is_empty());

    let (span, words) = lines
        .next()
        .ok_or_else(|| parse_error_at(&format!("\"{NUM_TAPES}\" expected"), end.clone()))?;
    let tapes = parse_num_tapes(span, &words)?;

    let (span, words) = lines
        .next()
        .ok_or_else(|| parse_error_at(&format!("\"{INPUT_ALPHABET}\" expected"), end))?;
    let input_alphabet = parse_input_alphabet(span, &words)?;

    let mut seen = HashSet::new();
    let mut transitions = Vec::new();
    for (span, words) in lines {
        let (state, transition) = parse_transition(span, &words, tapes)?;

        // Prevent two transitions with the same key
        if !seen.insert((state.clone(), transition.read.clone())) {
            return Err(parse_error("The machine is not deterministic", span));
        }

        transitions.push((state, transition));
    }

    Program::new(tapes, input_alphabet, transitions)
}

/// Parses `num-tapes: <positive integer>`.
fn parse_num_tapes(span: Span, words: &[Pair<Rule>]) -> Result<usize, TuringMachineError> {
    check_keyword(span, words, NUM_TAPES)?;

    let count = words
        .get(1)
        .ok_or_else(|| {
            parse_error(
                &format!("Positive integer expected after \"{NUM_TAPES}\""),
                span,
            )
        })?;
    let tapes = count
        .as_str()
        .parse::<usize>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| {
            parse_error(
                &format!("Positive integer expected after \"{NUM_TAPES}\""),
                count.as_span(),
            )
        })?;

    if let Some(extra) = words.get(2) {
        return Err(parse_error("Too many tokens in a line", extra.as_span()));
    }

    Ok(tapes)
}

/// Parses `input-alphabet: <identifiers>`.
fn parse_input_alphabet(
    span: Span,
    words: &[Pair<Rule>],
) -> Result<Vec<Identifier>, TuringMachineError> {
    check_keyword(span, words, INPUT_ALPHABET)?;

    if words.len() < 2 {
        return Err(parse_error("Identifier expected", span));
    }

    words[1..]
        .iter()
        .map(|word| {
            let letter = parse_identifier(word)?;
            if letter.is_blank() {
                return Err(parse_error(
                    "The blank letter \"_\" is not allowed in the input alphabet",
                    word.as_span(),
                ));
            }
            Ok(letter)
        })
        .collect()
}

/// Parses `<state> <k letters> <new-state> <k letters> <k moves>`.
fn parse_transition(
    span: Span,
    words: &[Pair<Rule>],
    tapes: usize,
) -> Result<(Identifier, Transition), TuringMachineError> {
    let expected = 2 + 3 * tapes;
    if words.len() != expected {
        return Err(parse_error(
            &format!(
                "Expected {expected} fields for a {tapes}-tape transition, found {}",
                words.len()
            ),
            span,
        ));
    }

    let state = parse_identifier(&words[0])?;
    if state.is_terminal() {
        return Err(parse_error(
            &format!("No transition can start in the \"{state}\" state"),
            words[0].as_span(),
        ));
    }

    let read = parse_identifiers(&words[1..=tapes])?;
    let next_state = parse_identifier(&words[tapes + 1])?;
    let write = parse_identifiers(&words[tapes + 2..2 * tapes + 2])?;
    let directions = words[2 * tapes + 2..]
        .iter()
        .map(parse_direction)
        .collect::<Result<Vec<_>, _>>()?;

    Ok((
        state,
        Transition {
            read,
            write,
            directions,
            next_state,
        },
    ))
}

/// Checks that the first word of a line is `keyword`.
fn check_keyword(span: Span, words: &[Pair<Rule>], keyword: &str) -> Result<(), TuringMachineError> {
    match words.first() {
        Some(word) if word.as_str() == keyword => Ok(()),
        Some(word) => Err(parse_error(
            &format!("\"{keyword}\" expected"),
            word.as_span(),
        )),
        None => Err(parse_error(&format!("\"{keyword}\" expected"), span)),
    }
}

fn parse_identifiers(words: &[Pair<Rule>]) -> Result<Vec<Identifier>, TuringMachineError> {
    words.iter().map(parse_identifier).collect()
}

/// Parses a single identifier word.
fn parse_identifier(word: &Pair<Rule>) -> Result<Identifier, TuringMachineError> {
    let text = word.as_str();
    if !is_identifier(text) {
        return Err(parse_error(
            &format!("Invalid identifier \"{text}\""),
            word.as_span(),
        ));
    }
    Identifier::new(text)
}

/// Parses a single move: `<` for left, `>` for right, `-` for stay.
fn parse_direction(word: &Pair<Rule>) -> Result<Direction, TuringMachineError> {
    Direction::from_symbol(word.as_str()).ok_or_else(|| {
        parse_error(
            "Move direction expected, which should be <, >, or -",
            word.as_span(),
        )
    })
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Creates a `TuringMachineError::ParseError` anchored at a single position.
fn parse_error_at(msg: &str, pos: Position) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_pos(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        pos,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_of(error: &TuringMachineError) -> usize {
        match error {
            TuringMachineError::ParseError(e) => match e.line_col {
                pest::error::LineColLocation::Pos((line, _)) => line,
                pest::error::LineColLocation::Span((line, _), _) => line,
            },
            other => panic!("Expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_simple_program() {
        let input = r#"
num-tapes: 2
input-alphabet: a b
(start) a _ (copy) a a > >
(copy) _ _ (accept) _ _ - -
"#;

        let program = parse(input).unwrap();
        assert_eq!(program.tapes(), 2);
        assert_eq!(program.input_alphabet().len(), 2);
        assert_eq!(program.len(), 2);

        let start = Identifier::start();
        let a = Identifier::new("a").unwrap();
        let blank = Identifier::blank();
        assert_eq!(
            program.transition(&start, &[a.clone(), blank.clone()]),
            Some(&Transition {
                read: vec![a.clone(), blank],
                write: vec![a.clone(), a],
                directions: vec![Direction::Right, Direction::Right],
                next_state: Identifier::new("(copy)").unwrap(),
            })
        );
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let input = "# a comment\n\
                     \n\
                     num-tapes: 1   # one tape\n\
                     \t\n\
                     input-alphabet: a\n\
                     # nothing here\n\
                     (start) a (accept) a -#trailing\n";

        let program = parse(input).unwrap();
        assert_eq!(program.tapes(), 1);
        assert_eq!(program.len(), 1);
    }

    #[test]
    fn test_parse_crlf() {
        let input = "num-tapes: 1\r\ninput-alphabet: a\r\n(start) a (accept) a -\r\n";
        assert_eq!(parse(input).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_missing_header() {
        let error = parse("input-alphabet: a\n").unwrap_err();
        assert!(error.to_string().contains("\"num-tapes:\" expected"));
        assert_eq!(line_of(&error), 1);

        let error = parse("").unwrap_err();
        assert!(error.to_string().contains("\"num-tapes:\" expected"));
    }

    #[test]
    fn test_parse_bad_tape_count() {
        for count in ["0", "-1", "two", "1.5"] {
            let error = parse(&format!("num-tapes: {count}\ninput-alphabet: a\n")).unwrap_err();
            assert!(
                error.to_string().contains("Positive integer expected"),
                "{count}: {error}"
            );
        }

        let error = parse("num-tapes: 1 2\ninput-alphabet: a\n").unwrap_err();
        assert!(error.to_string().contains("Too many tokens in a line"));
    }

    #[test]
    fn test_parse_missing_alphabet() {
        let error = parse("num-tapes: 1\n").unwrap_err();
        assert!(error.to_string().contains("\"input-alphabet:\" expected"));

        let error = parse("num-tapes: 1\ninput-alphabet:\n").unwrap_err();
        assert!(error.to_string().contains("Identifier expected"));
        assert_eq!(line_of(&error), 2);
    }

    #[test]
    fn test_parse_blank_in_alphabet() {
        let error = parse("num-tapes: 1\ninput-alphabet: a _\n").unwrap_err();
        assert!(error.to_string().contains("blank letter"));
    }

    #[test]
    fn test_parse_invalid_identifier() {
        let input = "num-tapes: 1\ninput-alphabet: a\n(start) a q1 a -\n";
        let error = parse(input).unwrap_err();
        assert!(error.to_string().contains("Invalid identifier \"q1\""));
        assert_eq!(line_of(&error), 3);
    }

    #[test]
    fn test_parse_wrong_field_count() {
        let input = "num-tapes: 2\ninput-alphabet: a\n\n(start) a _ (accept) a _ -\n";
        let error = parse(input).unwrap_err();
        assert!(error
            .to_string()
            .contains("Expected 8 fields for a 2-tape transition, found 7"));
        assert_eq!(line_of(&error), 4);
    }

    #[test]
    fn test_parse_bad_direction() {
        let input = "num-tapes: 1\ninput-alphabet: a\n(start) a (accept) a R\n";
        let error = parse(input).unwrap_err();
        assert!(error.to_string().contains("Move direction expected"));
    }

    #[test]
    fn test_parse_transition_from_terminal_state() {
        let input = "num-tapes: 1\ninput-alphabet: a\n(accept) a (start) a -\n";
        let error = parse(input).unwrap_err();
        assert!(error
            .to_string()
            .contains("No transition can start in the \"(accept)\" state"));
    }

    #[test]
    fn test_parse_nondeterministic() {
        let input = r#"num-tapes: 1
input-alphabet: a
(start) a (accept) a -
(start) _ (reject) _ -
(start) a (reject) a >
"#;
        let error = parse(input).unwrap_err();
        assert!(matches!(error, TuringMachineError::ParseError(_)));
        assert!(error.to_string().contains("The machine is not deterministic"));
        assert_eq!(line_of(&error), 5);
    }
}
