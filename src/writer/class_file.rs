use byteorder::WriteBytesExt;

use crate::error::Result;
use crate::model::class_file::{u1, ClassFile, ConstantPool, ConstantPoolInfo, MemberInfo};

use super::{write_u2_length, write_u2_list, Serialize};

impl Serialize for ConstantPoolInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        u1::from(self.tag()).serialize(writer)?;
        match *self {
            ConstantPoolInfo::Utf8 { ref bytes } => {
                write_u2_length(writer, bytes.len(), "CONSTANT_Utf8")?;
                writer.write_all(bytes)?;
            }
            ConstantPoolInfo::Integer { bytes } | ConstantPoolInfo::Float { bytes } => {
                bytes.serialize(writer)?;
            }
            ConstantPoolInfo::Long { high_bytes, low_bytes } |
            ConstantPoolInfo::Double { high_bytes, low_bytes } => {
                high_bytes.serialize(writer)?;
                low_bytes.serialize(writer)?;
            }
            ConstantPoolInfo::Class { name_index } |
            ConstantPoolInfo::Module { name_index } |
            ConstantPoolInfo::Package { name_index } => name_index.serialize(writer)?,
            ConstantPoolInfo::String { string_index } => string_index.serialize(writer)?,
            ConstantPoolInfo::FieldRef { class_index, name_and_type_index } |
            ConstantPoolInfo::MethodRef { class_index, name_and_type_index } |
            ConstantPoolInfo::InterfaceMethodRef { class_index, name_and_type_index } => {
                class_index.serialize(writer)?;
                name_and_type_index.serialize(writer)?;
            }
            ConstantPoolInfo::NameAndType { name_index, descriptor_index } => {
                name_index.serialize(writer)?;
                descriptor_index.serialize(writer)?;
            }
            ConstantPoolInfo::MethodHandle { reference_kind, reference_index } => {
                u1::from(reference_kind).serialize(writer)?;
                reference_index.serialize(writer)?;
            }
            ConstantPoolInfo::MethodType { descriptor_index } => {
                descriptor_index.serialize(writer)?;
            }
            ConstantPoolInfo::Dynamic { bootstrap_method_attr_index, name_and_type_index } |
            ConstantPoolInfo::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index } => {
                bootstrap_method_attr_index.serialize(writer)?;
                name_and_type_index.serialize(writer)?;
            }
        }
        Ok(())
    }
}

/// Writes `constant_pool_count` followed by the entries. Unusable slots are counted but not
/// written.
impl Serialize for ConstantPool {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        write_u2_length(writer, self.count(), "constant_pool")?;
        for (_, info) in self.entries() {
            info.serialize(writer)?;
        }
        Ok(())
    }
}

impl Serialize for MemberInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.access_flags.serialize(writer)?;
        self.name_index.serialize(writer)?;
        self.descriptor_index.serialize(writer)?;
        write_u2_list(writer, &self.attributes, "attributes")
    }
}

impl Serialize for ClassFile {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.magic.serialize(writer)?;
        self.minor_version.serialize(writer)?;
        self.major_version.serialize(writer)?;
        self.constant_pool.serialize(writer)?;
        self.access_flags.serialize(writer)?;
        self.this_class.serialize(writer)?;
        self.super_class.serialize(writer)?;
        write_u2_list(writer, &self.interfaces, "interfaces")?;
        write_u2_list(writer, &self.fields, "fields")?;
        write_u2_list(writer, &self.methods, "methods")?;
        write_u2_list(writer, &self.attributes, "attributes")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use crate::model::class_file::constant_pool::ReferenceKind;

    fn bytes<T: Serialize>(value: &T) -> Vec<u8> {
        let mut out = Vec::new();
        value.serialize(&mut out).unwrap();
        out
    }

    #[test]
    fn test_entries() {
        assert_eq!(bytes(&ConstantPoolInfo::utf8("Foo")), vec![0x01, 0x00, 0x03, b'F', b'o', b'o']);
        assert_eq!(bytes(&ConstantPoolInfo::long(-2)),
                   vec![0x05, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(bytes(&ConstantPoolInfo::MethodHandle {
                       reference_kind: ReferenceKind::InvokeStatic,
                       reference_index: 0x0102,
                   }),
                   vec![0x0F, 0x06, 0x01, 0x02]);
        assert_eq!(bytes(&ConstantPoolInfo::InvokeDynamic {
                       bootstrap_method_attr_index: 0,
                       name_and_type_index: 9,
                   }),
                   vec![0x12, 0x00, 0x00, 0x00, 0x09]);
    }

    #[test]
    fn test_pool_skips_unusable_slots() {
        let pool = ConstantPool::from(vec![
            ConstantPoolInfo::double(1.0),
            ConstantPoolInfo::Integer { bytes: 7 },
        ]);
        assert_eq!(bytes(&pool), vec![
            0x00, 0x04,
            0x06, 0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00, 0x07,
        ]);
    }

    #[test]
    fn test_minimal_class() {
        let mut class = ClassFile::new(52, 0);
        class.constant_pool.push(ConstantPoolInfo::utf8("Foo"));
        class.constant_pool.push(ConstantPoolInfo::Class { name_index: 1 });
        class.access_flags = 0x0021;
        class.this_class = 2;
        assert_eq!(bytes(&class), vec![
            0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x34,
            0x00, 0x03,
            0x01, 0x00, 0x03, b'F', b'o', b'o',
            0x07, 0x00, 0x01,
            0x00, 0x21, 0x00, 0x02, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]);
    }

    #[test]
    fn test_oversized_utf8() {
        let info = ConstantPoolInfo::Utf8 { bytes: vec![b'a'; 0x1_0000] };
        match info.serialize(&mut Vec::new()) {
            Err(Error::LengthOverflow { what: "CONSTANT_Utf8", length: 0x1_0000 }) => {}
            r => panic!("{:?}", r),
        }
    }
}
