//! Textual instruction listings.
//!
//! A listing holds one instruction per line, written exactly as
//! `Instruction`'s `Display` renders it:
//!
//! ```text
//! # countdown on slot 1
//! 0: Push 0
//! 1: Get 1
//! 2: Bin NotEq
//! 3: JumpIfZero 9
//! ```
//!
//! `#` starts a comment and blank lines are ignored. A line may begin with its
//! address (`3:` or a bare `3`, as printed by `{:#}`); when present it must
//! equal the instruction's position. Jump targets are not checked here.
//!
//! The line structure comes from the pest grammar in `listing.pest`; operands
//! are interpreted per mnemonic once the line has been split.

use core::str::FromStr;

use pest::Parser;
use pest::error::{ErrorVariant, LineColLocation};
use pest::iterators::Pair;

use crate::{
    String, ToString, Vec,
    expr::BinaryOp,
    format,
    vm::{Instruction, Program},
};

mod grammar {
    #[derive(pest_derive::Parser)]
    #[grammar = "vm/listing.pest"]
    pub struct ListingParser;
}

use grammar::{ListingParser, Rule};

/// Failure to read a single instruction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseInstructionError {
    #[error("empty instruction")]
    Empty,

    #[error("column {column}: expected {expected}")]
    Syntax { column: usize, expected: String },

    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),

    #[error("`{0}` expects an operand")]
    MissingOperand(&'static str),

    #[error("invalid operand `{operand}` for `{mnemonic}`")]
    InvalidOperand {
        mnemonic: &'static str,
        operand: String,
    },

    #[error("unexpected operand `{operand}` after `{mnemonic}`")]
    UnexpectedOperand {
        mnemonic: &'static str,
        operand: String,
    },
}

/// Failure to read a listing, with the 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    #[error("line {line}, column {column}: expected {expected}")]
    Syntax {
        line: usize,
        column: usize,
        expected: String,
    },

    #[error("line {line}: {source}")]
    Instruction {
        line: usize,
        source: ParseInstructionError,
    },

    #[error("line {line}: address {found} does not match instruction position {expected}")]
    AddressMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
}

impl ListingError {
    pub const fn line(&self) -> usize {
        match self {
            ListingError::Syntax { line, .. }
            | ListingError::Instruction { line, .. }
            | ListingError::AddressMismatch { line, .. } => *line,
        }
    }
}

/// 1-based line and column where pest gave up.
fn error_position(err: &pest::error::Error<Rule>) -> (usize, usize) {
    match err.line_col {
        LineColLocation::Pos(pos) | LineColLocation::Span(pos, _) => pos,
    }
}

/// Describe what pest was looking for in listing terms.
fn error_expected(err: &pest::error::Error<Rule>) -> String {
    match &err.variant {
        ErrorVariant::ParsingError { positives, .. } => format_expected_rules(positives),
        ErrorVariant::CustomError { message } => message.clone(),
    }
}

fn format_expected_rules(rules: &[Rule]) -> String {
    let mut concepts: Vec<&str> = Vec::new();
    for rule in rules {
        let concept = match rule {
            Rule::address | Rule::offset => "an address",
            Rule::instruction | Rule::mnemonic => "a mnemonic",
            Rule::operand => "an operand",
            _ => "end of line",
        };
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    }

    match concepts.as_slice() {
        [] => "end of line".to_string(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

/// Convert a pest error on a whole listing into a [`ListingError`].
fn convert_pest_error(err: pest::error::Error<Rule>) -> ListingError {
    let (line, column) = error_position(&err);
    ListingError::Syntax {
        line,
        column,
        expected: error_expected(&err),
    }
}

/// Interpret a mnemonic and its operand tokens.
fn decode<'s>(
    mnemonic: &str,
    mut operands: impl Iterator<Item = &'s str>,
) -> Result<Instruction, ParseInstructionError> {
    // Resolve to the canonical static name first so errors can borrow it.
    let name: &'static str = match mnemonic {
        "Push" => "Push",
        "Get" => "Get",
        "Set" => "Set",
        "Bin" => "Bin",
        "Jump" => "Jump",
        "JumpIfZero" => "JumpIfZero",
        "End" => "End",
        other => return Err(ParseInstructionError::UnknownMnemonic(other.to_string())),
    };

    let operand = operands.next();
    if let Some(extra) = operands.next() {
        return Err(ParseInstructionError::UnexpectedOperand {
            mnemonic: name,
            operand: extra.to_string(),
        });
    }

    if name == "End" {
        return match operand {
            None => Ok(Instruction::End),
            Some(operand) => Err(ParseInstructionError::UnexpectedOperand {
                mnemonic: name,
                operand: operand.to_string(),
            }),
        };
    }

    let operand = operand.ok_or(ParseInstructionError::MissingOperand(name))?;
    let invalid = || ParseInstructionError::InvalidOperand {
        mnemonic: name,
        operand: operand.to_string(),
    };

    let instruction = match name {
        "Push" => Instruction::Push(operand.parse().map_err(|_| invalid())?),
        "Get" => Instruction::Get(operand.parse().map_err(|_| invalid())?),
        "Set" => Instruction::Set(operand.parse().map_err(|_| invalid())?),
        "Bin" => Instruction::Bin(BinaryOp::from_mnemonic(operand).ok_or_else(invalid)?),
        "Jump" => Instruction::Jump(operand.parse().map_err(|_| invalid())?),
        _ => Instruction::JumpIfZero(operand.parse().map_err(|_| invalid())?),
    };
    Ok(instruction)
}

/// Build an instruction from a matched `instruction` pair.
fn build_instruction(pair: Pair<'_, Rule>) -> Result<Instruction, ParseInstructionError> {
    let mut tokens = pair.into_inner().map(|token| token.as_str());
    let mnemonic = tokens.next().ok_or(ParseInstructionError::Empty)?;
    decode(mnemonic, tokens)
}

impl FromStr for Instruction {
    type Err = ParseInstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let instruction = ListingParser::parse(Rule::single, s)
            .map_err(|err| ParseInstructionError::Syntax {
                column: error_position(&err).1,
                expected: error_expected(&err),
            })?
            .flat_map(Pair::into_inner)
            .find(|pair| pair.as_rule() == Rule::instruction)
            .ok_or(ParseInstructionError::Empty)?;
        build_instruction(instruction)
    }
}

impl Program {
    /// Parse a textual listing.
    ///
    /// ```
    /// use stackloop_core::vm::{Instruction, Program};
    ///
    /// let program = Program::from_listing("Push 2\nEnd\n").unwrap();
    /// assert_eq!(program.instructions, vec![Instruction::Push(2), Instruction::End]);
    /// ```
    pub fn from_listing(source: &str) -> Result<Program, ListingError> {
        let lines = ListingParser::parse(Rule::listing, source)
            .map_err(convert_pest_error)?
            .flat_map(Pair::into_inner)
            .filter(|pair| pair.as_rule() == Rule::line);

        let mut instructions = Vec::new();
        for pair in lines {
            let (line, _) = pair.line_col();
            let mut parts = pair.into_inner().peekable();
            let address = parts.next_if(|part| part.as_rule() == Rule::address);
            let instruction = parts.next();

            if let Some(address) = &address {
                // Overflowing addresses never match
                let found = address
                    .as_str()
                    .trim_end_matches(':')
                    .parse()
                    .unwrap_or(usize::MAX);
                let expected = instructions.len();
                if found != expected {
                    return Err(ListingError::AddressMismatch {
                        line,
                        expected,
                        found,
                    });
                }
            }

            let instruction = match (address, instruction) {
                (_, Some(instruction)) => build_instruction(instruction)
                    .map_err(|source| ListingError::Instruction { line, source })?,
                // Blank or comment-only line
                (None, None) => continue,
                (Some(_), None) => {
                    return Err(ListingError::Instruction {
                        line,
                        source: ParseInstructionError::Empty,
                    });
                }
            };
            instructions.push(instruction);
        }

        Ok(Program::new(instructions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{format, vec};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_instruction() {
        assert_eq!("Push -5".parse::<Instruction>(), Ok(Instruction::Push(-5)));
        assert_eq!("  Get 3 ".parse::<Instruction>(), Ok(Instruction::Get(3)));
        assert_eq!("Bin NotEq".parse::<Instruction>(), Ok(Instruction::Bin(BinaryOp::NotEq)));
        assert_eq!("JumpIfZero 27".parse::<Instruction>(), Ok(Instruction::JumpIfZero(27)));
        assert_eq!("End".parse::<Instruction>(), Ok(Instruction::End));
    }

    #[test]
    fn test_parse_instruction_errors() {
        assert_eq!(
            "".parse::<Instruction>(),
            Err(ParseInstructionError::Empty)
        );
        assert_eq!(
            "Pop".parse::<Instruction>(),
            Err(ParseInstructionError::UnknownMnemonic("Pop".to_string()))
        );
        assert_eq!(
            "Push".parse::<Instruction>(),
            Err(ParseInstructionError::MissingOperand("Push"))
        );
        assert_eq!(
            "Get -1".parse::<Instruction>(),
            Err(ParseInstructionError::InvalidOperand {
                mnemonic: "Get",
                operand: "-1".to_string()
            })
        );
        assert_eq!(
            "Bin Mul".parse::<Instruction>(),
            Err(ParseInstructionError::InvalidOperand {
                mnemonic: "Bin",
                operand: "Mul".to_string()
            })
        );
        assert_eq!(
            "End 1".parse::<Instruction>(),
            Err(ParseInstructionError::UnexpectedOperand {
                mnemonic: "End",
                operand: "1".to_string()
            })
        );
        assert_eq!(
            "Push 1 2".parse::<Instruction>(),
            Err(ParseInstructionError::UnexpectedOperand {
                mnemonic: "Push",
                operand: "2".to_string()
            })
        );
    }

    #[test]
    fn test_listing_with_comments_and_addresses() {
        let source = indoc! {"
            # countdown on slot 1
            0: Push 0
            1: Get 1
            2: Bin NotEq

            3: JumpIfZero 9   # leave the loop
            4: Push -1
            5: Get 1
            6: Bin Add
            7: Set 1
            8: Jump 0
            9: End
        "};
        let program = Program::from_listing(source).unwrap();
        assert_eq!(program.len(), 10);
        assert_eq!(program.instructions[3], Instruction::JumpIfZero(9));
        assert_eq!(program.instructions[9], Instruction::End);
    }

    #[test]
    fn test_listing_reads_back_display() {
        use Instruction::*;
        let program = Program::new(vec![
            Push(3),
            Push(4),
            Bin(BinaryOp::Add),
            JumpIfZero(0),
            End,
        ]);
        assert_eq!(Program::from_listing(&format!("{}", program)), Ok(program.clone()));
        assert_eq!(Program::from_listing(&format!("{:#}", program)), Ok(program));
    }

    #[test]
    fn test_listing_address_mismatch() {
        let source = "0: Push 1\n2: End\n";
        assert_eq!(
            Program::from_listing(source),
            Err(ListingError::AddressMismatch {
                line: 2,
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn test_listing_reports_line() {
        let source = "Push 1\n\n# comment\nPush x\nEnd\n";
        let err = Program::from_listing(source).unwrap_err();
        assert_eq!(err.line(), 4);
        assert_eq!(
            err.to_string(),
            "line 4: invalid operand `x` for `Push`"
        );
    }

    #[test]
    fn test_listing_syntax_error_position() {
        let err = Program::from_listing("Push 1\n  $ 2\nEnd\n").unwrap_err();
        assert!(matches!(err, ListingError::Syntax { line: 2, column: 3, .. }));
        assert_eq!(err.line(), 2);
        assert!(err.to_string().starts_with("line 2, column 3: expected "));

        // The mnemonic must be separated from its operand
        let err = Program::from_listing("Get 0\nEnd\nPush-5\n").unwrap_err();
        assert!(matches!(err, ListingError::Syntax { line: 3, column: 5, .. }));
    }

    #[test]
    fn test_parse_instruction_syntax_error() {
        assert!(matches!(
            "Push-5".parse::<Instruction>(),
            Err(ParseInstructionError::Syntax { column: 5, .. })
        ));
        assert!(matches!(
            "Get 1\nEnd".parse::<Instruction>(),
            Err(ParseInstructionError::Syntax { column: 6, .. })
        ));
    }

    #[test]
    fn test_listing_address_without_instruction() {
        assert_eq!(
            Program::from_listing("0: Push 1\n1:\n"),
            Err(ListingError::Instruction {
                line: 2,
                source: ParseInstructionError::Empty
            })
        );
    }
}
