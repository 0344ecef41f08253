//! This module writes programs back out in the definition file format read by
//! [`parse`](crate::parser::parse).

use std::fmt::Write;

use crate::identifier::Identifier;
use crate::parser::{INPUT_ALPHABET, NUM_TAPES};
use crate::program::Program;

/// Encodes a program as a definition file.
///
/// Format:
/// - `num-tapes: <k>`
/// - `input-alphabet: <letters>`
/// - one line per transition: `<state> <k letters> <new state> <k letters> <k moves>`
///
/// Transitions are written grouped by state, so the output of equal programs is identical.
pub fn encode(program: &Program) -> String {
    let mut output = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(output, "{NUM_TAPES} {}", program.tapes());
    let _ = writeln!(
        output,
        "{INPUT_ALPHABET} {}",
        join(program.input_alphabet())
    );

    for (state, transition) in program.transitions() {
        let directions = transition
            .directions
            .iter()
            .map(|d| d.symbol().to_string())
            .collect::<Vec<_>>()
            .join(" ");

        let _ = writeln!(
            output,
            "{state} {} {} {} {directions}",
            join(&transition.read),
            transition.next_state,
            join(&transition.write),
        );
    }

    output
}

fn join<'a>(letters: impl IntoIterator<Item = &'a Identifier>) -> String {
    letters
        .into_iter()
        .map(Identifier::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_encode() {
        let program = parse(
            "num-tapes: 2\n\
             input-alphabet: b a\n\
             (start) b _ (start) b b > >   # copy\n\
             (start) a _ (start) a a > >\n\
             (start) _ _ (accept) _ _ - <\n",
        )
        .unwrap();

        assert_eq!(
            encode(&program),
            "num-tapes: 2\n\
             input-alphabet: a b\n\
             (start) _ _ (accept) _ _ - <\n\
             (start) a _ (start) a a > >\n\
             (start) b _ (start) b b > >\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let input = r#"
num-tapes: 1
input-alphabet: A B (CD)
(start) A (odd) A >
(start) B (start) B >
(start) (CD) (start) _ <
(start) _ (accept) _ -
(odd) A (start) A >
(odd) B (odd) (CD) >
(odd) _ (reject) _ -
"#;
        let program = parse(input).unwrap();
        let reparsed = parse(&encode(&program)).unwrap();

        assert_eq!(reparsed, program);
        assert_eq!(reparsed.working_alphabet(), program.working_alphabet());
        assert_eq!(reparsed.states(), program.states());
    }
}
