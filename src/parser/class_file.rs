use nom::multi::count;

use crate::codec::DecodeOptions;
use crate::error::Error;
use crate::model::class_file::{u2, u4, ClassFile, MemberInfo, MAGIC};
use crate::model::class_file::constant_pool::{ConstantPool, ConstantPoolInfo, ReferenceKind, Tag};

use super::attributes::attributes;
use super::nom_support::{Input, ParseResult};
use super::primitive::{read_bytes, read_u1, read_u2, read_u4};

/// Checks the magic number. Input that disagrees with `0xCAFEBABE` in any of its first four
/// bytes fails with `Error::Magic`; input that agrees but is shorter than four bytes fails with
/// `Error::UnexpectedEnd`.
fn magic(input: Input) -> ParseResult<u4> {
    let expected = MAGIC.to_be_bytes();
    let available = &input[..input.len().min(expected.len())];
    if available != &expected[..available.len()] {
        let mut found = [0; 4];
        found[..available.len()].copy_from_slice(available);
        p_fail!(Error::Magic { found: u4::from_be_bytes(found) });
    }
    read_u4(input)
}

fn cp_info(input: Input) -> ParseResult<ConstantPoolInfo> {
    let (input, tag) = read_u1(input)?;
    match Tag::from(tag) {
        Tag::Utf8 => {
            let (input, length) = read_u2(input)?;
            let (input, bytes) = read_bytes(input, length as usize)?;
            Ok((input, ConstantPoolInfo::Utf8 { bytes: bytes.to_vec() }))
        }

        Tag::Integer => {
            let (input, bytes) = read_u4(input)?;
            Ok((input, ConstantPoolInfo::Integer { bytes: bytes }))
        }

        Tag::Float => {
            let (input, bytes) = read_u4(input)?;
            Ok((input, ConstantPoolInfo::Float { bytes: bytes }))
        }

        Tag::Long => {
            let (input, high_bytes) = read_u4(input)?;
            let (input, low_bytes) = read_u4(input)?;
            Ok((input, ConstantPoolInfo::Long { high_bytes: high_bytes, low_bytes: low_bytes }))
        }

        Tag::Double => {
            let (input, high_bytes) = read_u4(input)?;
            let (input, low_bytes) = read_u4(input)?;
            Ok((input, ConstantPoolInfo::Double { high_bytes: high_bytes, low_bytes: low_bytes }))
        }

        Tag::Class => {
            let (input, name_index) = read_u2(input)?;
            Ok((input, ConstantPoolInfo::Class { name_index: name_index }))
        }

        Tag::String => {
            let (input, string_index) = read_u2(input)?;
            Ok((input, ConstantPoolInfo::String { string_index: string_index }))
        }

        Tag::FieldRef => {
            let (input, class_index) = read_u2(input)?;
            let (input, name_and_type_index) = read_u2(input)?;
            Ok((input, ConstantPoolInfo::FieldRef {
                class_index: class_index,
                name_and_type_index: name_and_type_index,
            }))
        }

        Tag::MethodRef => {
            let (input, class_index) = read_u2(input)?;
            let (input, name_and_type_index) = read_u2(input)?;
            Ok((input, ConstantPoolInfo::MethodRef {
                class_index: class_index,
                name_and_type_index: name_and_type_index,
            }))
        }

        Tag::InterfaceMethodRef => {
            let (input, class_index) = read_u2(input)?;
            let (input, name_and_type_index) = read_u2(input)?;
            Ok((input, ConstantPoolInfo::InterfaceMethodRef {
                class_index: class_index,
                name_and_type_index: name_and_type_index,
            }))
        }

        Tag::NameAndType => {
            let (input, name_index) = read_u2(input)?;
            let (input, descriptor_index) = read_u2(input)?;
            Ok((input, ConstantPoolInfo::NameAndType {
                name_index: name_index,
                descriptor_index: descriptor_index,
            }))
        }

        Tag::MethodHandle => {
            let (input, kind) = read_u1(input)?;
            let reference_kind = p_try!(ReferenceKind::try_from(kind));
            let (input, reference_index) = read_u2(input)?;
            Ok((input, ConstantPoolInfo::MethodHandle {
                reference_kind: reference_kind,
                reference_index: reference_index,
            }))
        }

        Tag::MethodType => {
            let (input, descriptor_index) = read_u2(input)?;
            Ok((input, ConstantPoolInfo::MethodType { descriptor_index: descriptor_index }))
        }

        Tag::Dynamic => {
            let (input, bootstrap_method_attr_index) = read_u2(input)?;
            let (input, name_and_type_index) = read_u2(input)?;
            Ok((input, ConstantPoolInfo::Dynamic {
                bootstrap_method_attr_index: bootstrap_method_attr_index,
                name_and_type_index: name_and_type_index,
            }))
        }

        Tag::InvokeDynamic => {
            let (input, bootstrap_method_attr_index) = read_u2(input)?;
            let (input, name_and_type_index) = read_u2(input)?;
            Ok((input, ConstantPoolInfo::InvokeDynamic {
                bootstrap_method_attr_index: bootstrap_method_attr_index,
                name_and_type_index: name_and_type_index,
            }))
        }

        Tag::Module => {
            let (input, name_index) = read_u2(input)?;
            Ok((input, ConstantPoolInfo::Module { name_index: name_index }))
        }

        Tag::Package => {
            let (input, name_index) = read_u2(input)?;
            Ok((input, ConstantPoolInfo::Package { name_index: name_index }))
        }

        Tag::Unknown(t) => p_fail!(Error::UnknownTag { tag: t }),
    }
}

/// Parses the entries of a constant pool whose `constant_pool_count` is the given value.
/// Parsing stops once `constant_pool_count - 1` slots are filled, counting two slots for each
/// `Long` and `Double` entry.
pub fn constant_pool(input: Input, constant_pool_count: u2) -> ParseResult<ConstantPool> {
    let slots = (constant_pool_count as usize).saturating_sub(1);
    let mut pool = ConstantPool::new();
    let mut input = input;
    while pool.len() < slots {
        let (rest, info) = cp_info(input)?;
        let index = pool.len() + 1;
        trace!("constant pool #{}: {:?}", index, info);
        if info.tag().is_double_slot() && index + 1 > slots {
            p_fail!(Error::ConstantPoolOverflow {
                index: index,
                constant_pool_count: constant_pool_count,
            });
        }
        pool.push(info);
        input = rest;
    }
    Ok((input, pool))
}

fn member<'a>(input: Input<'a>, constant_pool: &ConstantPool, options: &DecodeOptions)
              -> ParseResult<'a, MemberInfo> {
    let (input, access_flags) = read_u2(input)?;
    let (input, name_index) = read_u2(input)?;
    let (input, descriptor_index) = read_u2(input)?;
    let (input, attributes) = attributes(input, constant_pool, options)?;
    Ok((input, MemberInfo {
        access_flags: access_flags,
        name_index: name_index,
        descriptor_index: descriptor_index,
        attributes: attributes,
    }))
}

/// Parses a whole class file, leaving any bytes after the class attributes unconsumed.
pub fn class_file<'a>(input: Input<'a>, options: &DecodeOptions) -> ParseResult<'a, ClassFile> {
    let (input, magic) = magic(input)?;
    let (input, minor_version) = read_u2(input)?;
    let (input, major_version) = read_u2(input)?;
    let (input, constant_pool_count) = read_u2(input)?;
    let (input, constant_pool) = constant_pool(input, constant_pool_count)?;
    debug!("class file version {}.{}, constant_pool_count {}",
           major_version, minor_version, constant_pool_count);

    let (input, access_flags) = read_u2(input)?;
    let (input, this_class) = read_u2(input)?;
    let (input, super_class) = read_u2(input)?;

    let (input, interfaces_count) = read_u2(input)?;
    let (input, interfaces) = count(read_u2, interfaces_count as usize)(input)?;

    let (input, fields_count) = read_u2(input)?;
    debug!("parsing {} fields", fields_count);
    let (input, fields) = count(|i| member(i, &constant_pool, options),
                                fields_count as usize)(input)?;

    let (input, methods_count) = read_u2(input)?;
    debug!("parsing {} methods", methods_count);
    let (input, methods) = count(|i| member(i, &constant_pool, options),
                                 methods_count as usize)(input)?;

    let (input, attributes) = attributes(input, &constant_pool, options)?;

    Ok((input, ClassFile {
        magic: magic,
        minor_version: minor_version,
        major_version: major_version,
        constant_pool: constant_pool,
        access_flags: access_flags,
        this_class: this_class,
        super_class: super_class,
        interfaces: interfaces,
        fields: fields,
        methods: methods,
        attributes: attributes,
    }))
}

/// Parses a class file with the default `DecodeOptions`. The structure is not validated; see
/// `codec::decode` for that.
pub fn parse_class_file(input: &[u8]) -> Result<ClassFile, Error> {
    parse_class_file_with(input, &DecodeOptions::default())
}

/// Parses a class file. Bytes left over after the class attributes are an error.
pub fn parse_class_file_with(input: &[u8], options: &DecodeOptions) -> Result<ClassFile, Error> {
    let (rest, class_file) = class_file(input, options)?;
    if !rest.is_empty() {
        return Err(Error::TrailingData { length: rest.len() });
    }
    Ok(class_file)
}
