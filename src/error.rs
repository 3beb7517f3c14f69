//! The error type shared by the parser, the writer and the validator.

use std::io;

use thiserror::Error;

use crate::model::class_file::constant_pool::Tag;
use crate::model::class_file::{u1, u2, u4};

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The leading four bytes are not `0xCAFEBABE`.
    #[error("magic number mismatch: found {found:#010x}")]
    Magic { found: u4 },

    /// A declared length or count asks for more bytes than remain.
    #[error("unexpected end of input ({remaining} bytes left)")]
    UnexpectedEnd { remaining: usize },

    #[error("unknown constant pool tag {tag}")]
    UnknownTag { tag: u1 },

    #[error("unknown method handle reference kind {kind}")]
    UnknownReferenceKind { kind: u1 },

    /// A Long or Double entry was declared in the last slot of the constant
    /// pool, leaving no room for its placeholder.
    #[error("constant pool entry #{index} needs two slots but constant_pool_count is {constant_pool_count}")]
    ConstantPoolOverflow { index: usize, constant_pool_count: u2 },

    /// An index is zero, out of bounds, or names the unusable slot after a
    /// Long or Double entry.
    #[error("dangling constant pool reference #{index} from {referrer}")]
    DanglingReference { index: u2, referrer: &'static str },

    #[error("constant pool entry #{index} referenced from {referrer} is {actual:?}, expected {expected:?}")]
    UnexpectedConstantPoolType {
        index: u2,
        referrer: &'static str,
        expected: Tag,
        actual: Tag,
    },

    #[error("{length} bytes of trailing data after the last attribute")]
    TrailingData { length: usize },

    /// A structured attribute payload did not decode to exactly its declared
    /// length.
    #[error("attribute declared {attribute_length} bytes but its contents span {consumed}")]
    AttributeLengthMismatch { attribute_length: u4, consumed: usize },

    #[error("unknown stack map frame type {frame_type}")]
    UnknownStackMapFrameType { frame_type: u1 },

    #[error("unknown verification type tag {tag}")]
    UnknownVerificationType { tag: u1 },

    #[error("unknown element value tag {tag:#04x}")]
    UnknownElementValueTag { tag: u1 },

    #[error("unknown type annotation target type {target_type:#04x}")]
    UnknownTargetType { target_type: u1 },

    /// Attributes or element values nest more than `MAX_NESTING_DEPTH` levels deep.
    #[error("attributes or element values nested more than {limit} levels deep")]
    NestingTooDeep { limit: usize },

    /// A structured attribute whose name index points at some other name. It would not decode
    /// back to the same variant.
    #[error("constant pool entry #{index} does not name a {expected} attribute")]
    AttributeNameMismatch { index: u2, expected: &'static str },

    /// A sequence or payload is too long for the width of its count field.
    #[error("{what} has {length} elements, more than its count field can hold")]
    LengthOverflow { what: &'static str, length: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
