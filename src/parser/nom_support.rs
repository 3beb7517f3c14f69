//! Glue between `nom` and the crate `Error` type.
//!
//! Every parser in this crate has the shape `fn(Input) -> ParseResult<O>`. Running out of input
//! inside a nom primitive surfaces as `Error::UnexpectedEnd` through the `ParseError` impl
//! below; structural failures are raised with `p_fail!`, which produces a `nom::Err::Failure` so
//! that no combinator backtracks past them.

use nom::error::{ErrorKind, ParseError};
use nom::IResult;

use crate::error::Error;

pub type Input<'a> = &'a [u8];
pub type ParseResult<'a, O> = IResult<Input<'a>, O, Error>;

/// Returns early from a parser with a `nom::Err::Failure` wrapping the given `Error`.
macro_rules! p_fail {
    ($e: expr) => (return Err(::nom::Err::Failure($e)));
}

/// Unwraps a `Result<T, Error>` inside a parser, failing the parser on `Err`.
macro_rules! p_try {
    ($e: expr) => (match $e {
        Ok(v) => v,
        Err(e) => p_fail!(e),
    });
}

impl<'a> ParseError<Input<'a>> for Error {
    // The parsers here only use nom's complete-input number, `take` and `count` combinators,
    // which fail only when the input runs out.
    fn from_error_kind(input: Input<'a>, _: ErrorKind) -> Self {
        Error::UnexpectedEnd { remaining: input.len() }
    }

    fn append(_: Input<'a>, _: ErrorKind, other: Self) -> Self {
        other
    }
}

impl From<::nom::Err<Error>> for Error {
    fn from(e: ::nom::Err<Error>) -> Self {
        match e {
            ::nom::Err::Error(e) | ::nom::Err::Failure(e) => e,
            ::nom::Err::Incomplete(_) => Error::UnexpectedEnd { remaining: 0 },
        }
    }
}
