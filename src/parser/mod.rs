//! Contains a parser for a Java class file.
//!
//! # Examples
//!
//! Basic usage:
//! ```
//! use classfile::parser::class_file::parse_class_file;
//!
//! let data = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x34, 0x00, 0x01,
//!             0x00, 0x21, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
//!             0x00, 0x00, 0x00, 0x00];
//! let class = parse_class_file(&data).unwrap();
//! assert_eq!(class.major_version, 52);
//! ```

#[macro_use]
pub mod nom_support;

pub mod attributes;
pub mod class_file;
pub mod primitive;

pub use self::nom_support::{Input, ParseResult};
