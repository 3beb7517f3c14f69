//! Decoding and encoding of whole class files.

use crate::error::{Error, Result};
use crate::model::class_file::ClassFile;
use crate::parser::class_file::parse_class_file_with;
use crate::validator;
use crate::writer::Serialize;

/// Controls how attribute payloads are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Decode the payloads of recognized attributes into structured `Attribute` variants. When
    /// false, every attribute is kept as `Attribute::Opaque`.
    pub structured_attributes: bool,
    /// Fail the decode when a recognized attribute payload is malformed, instead of keeping it
    /// as `Attribute::Opaque`.
    pub strict_attributes: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions { structured_attributes: true, strict_attributes: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    /// Run `validator::validate` before writing. The magic number is always checked.
    pub validate: bool,
}

/// A decoded class file together with the outcome of validating it. A class file that is well
/// formed but references missing or mistyped constant pool entries still decodes; the problem
/// is reported in `validation`.
#[derive(Debug)]
pub struct Decoded {
    pub class_file: ClassFile,
    pub validation: Result<()>,
}

impl Decoded {
    pub fn is_valid(&self) -> bool {
        self.validation.is_ok()
    }
}

pub fn decode(input: &[u8]) -> Result<Decoded> {
    decode_with(input, &DecodeOptions::default())
}

pub fn decode_with(input: &[u8], options: &DecodeOptions) -> Result<Decoded> {
    let class_file = parse_class_file_with(input, options)?;
    let validation = validator::validate(&class_file);
    if let Err(ref e) = validation {
        debug!("decoded class file does not validate: {}", e);
    }
    Ok(Decoded { class_file: class_file, validation: validation })
}

pub fn encode(class_file: &ClassFile) -> Result<Vec<u8>> {
    encode_with(class_file, &EncodeOptions::default())
}

/// Writes `class_file` to a fresh buffer. Nothing is returned unless the whole class file was
/// written.
pub fn encode_with(class_file: &ClassFile, options: &EncodeOptions) -> Result<Vec<u8>> {
    class_file.check()?;
    if options.validate {
        validator::validate(class_file)?;
    }
    let mut out = Vec::new();
    class_file.serialize(&mut out)?;
    Ok(out)
}

impl ClassFile {
    /// Encodes this class file with the default `EncodeOptions`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode(self)
    }

    /// Decodes a class file without validating it.
    pub fn from_bytes(input: &[u8]) -> Result<ClassFile> {
        parse_class_file_with(input, &DecodeOptions::default())
    }
}

/// Returns true if decoding `input` and encoding the result reproduces `input` exactly.
pub fn round_trips(input: &[u8]) -> Result<bool> {
    let decoded = decode(input)?;
    match encode(&decoded.class_file) {
        Ok(output) => Ok(output == input),
        Err(Error::LengthOverflow { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::class_file::ConstantPoolInfo;

    /// `Foo`, version 52.0, with no super class and nothing else.
    const FOO: [u8; 33] = [
        0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x34,
        0x00, 0x03,
        0x01, 0x00, 0x03, b'F', b'o', b'o',
        0x07, 0x00, 0x01,
        0x00, 0x21, 0x00, 0x02, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn test_decode_foo() {
        let decoded = decode(&FOO).unwrap();
        assert!(decoded.is_valid());
        assert_eq!(decoded.class_file.this_class_name(), Some(&b"Foo"[..]));
        assert_eq!(encode(&decoded.class_file).unwrap(), FOO.to_vec());
        assert!(round_trips(&FOO).unwrap());
    }

    #[test]
    fn test_invalid_class_still_decodes() {
        let mut data = FOO;
        data[22] = 0x05; // this_class
        let decoded = decode(&data).unwrap();
        match decoded.validation {
            Err(Error::DanglingReference { index: 5, .. }) => {}
            ref r => panic!("{:?}", r),
        }
        assert_eq!(decoded.class_file.to_bytes().unwrap(), data.to_vec());
    }

    #[test]
    fn test_encode_checks_magic() {
        let mut class = ClassFile::from_bytes(&FOO).unwrap();
        class.magic = 0xCAFE_BABF;
        match encode(&class) {
            Err(Error::Magic { found: 0xCAFE_BABF }) => {}
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn test_encode_with_validation() {
        let mut class = ClassFile::new(52, 0);
        class.constant_pool.push(ConstantPoolInfo::utf8("Foo"));
        class.this_class = 1;
        assert!(encode(&class).is_ok());
        match encode_with(&class, &EncodeOptions { validate: true }) {
            Err(Error::UnexpectedConstantPoolType { index: 1, .. }) => {}
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn test_oversized_interfaces() {
        let mut class = ClassFile::from_bytes(&FOO).unwrap();
        class.interfaces = vec![2; 0x1_0000];
        match encode(&class) {
            Err(Error::LengthOverflow { what: "interfaces", length: 0x1_0000 }) => {}
            r => panic!("{:?}", r),
        }
    }
}
