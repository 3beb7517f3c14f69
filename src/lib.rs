//! Reader and writer for the [JVM class file
//! format](https://docs.oracle.com/javase/specs/jvms/se17/html/jvms-4.html).
//!
//! Decoding goes through `codec::decode`, which parses the bytes into a
//! `model::class_file::ClassFile` and validates its structure; encoding goes
//! through `codec::encode`. Re-encoding a decoded class reproduces the input
//! bytes exactly.

#[macro_use]
extern crate log;

pub mod codec;
pub mod error;
pub mod logging;
pub mod model;
pub mod parser;
pub mod util;
pub mod validator;
pub mod writer;

pub use codec::{decode, encode, DecodeOptions, Decoded, EncodeOptions};
pub use error::{Error, Result};
pub use model::class_file::ClassFile;
