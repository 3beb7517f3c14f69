//! Parsers for attributes.
//!
//! An attribute is read in two phases. The envelope (name index, length and payload) is always
//! read in full, and running out of input there fails the whole class file. The payload of a
//! recognized attribute is then decoded on its own; if that fails the attribute is kept as
//! `Attribute::Opaque` with its original bytes, unless `DecodeOptions::strict_attributes` is set.
//!
//! `Code` and `Record` attributes carry attributes of their own, and annotation element values
//! can hold further annotations and arrays. Every parser on those paths takes the current
//! nesting `depth`, and a payload nested deeper than `MAX_NESTING_DEPTH` fails with
//! `Error::NestingTooDeep`.

use nom::multi::count;

use crate::codec::DecodeOptions;
use crate::error::Error;
use crate::model::class_file::{constant_pool_index, u1, u4, ConstantPool};
use crate::model::class_file::attributes::{deeper, names, Attribute, AttributeInfo,
                                           BootstrapMethod, ExceptionTableEntry, InnerClass,
                                           LineNumberInfo,
                                           LocalVariableInfo, LocalVariableTypeInfo,
                                           ModulePackageAccess, ModuleProvides, ModuleRequires,
                                           Parameter, RecordComponentInfo, StackMapFrame,
                                           VerificationTypeInfo};
use crate::model::class_file::attributes::annotations::{Annotation, ElementValue,
                                                        ElementValuePair,
                                                        LocalVariableTargetInfo, TargetInfo,
                                                        TypeAnnotation, TypePath, TypePathPart};

use super::nom_support::{Input, ParseResult};
use super::primitive::{read_bytes, read_u1, read_u2, read_u4};

/// Parses a constant pool index that must name an entry of the pool.
fn cp_index<'a>(input: Input<'a>, constant_pool: &ConstantPool, referrer: &'static str)
                -> ParseResult<'a, constant_pool_index> {
    let (input, index) = read_u2(input)?;
    if constant_pool.get(index).is_none() {
        p_fail!(Error::DanglingReference { index: index, referrer: referrer });
    }
    Ok((input, index))
}

/// Parses a constant pool index that is either zero or names an entry of the pool.
fn maybe_cp_index<'a>(input: Input<'a>, constant_pool: &ConstantPool, referrer: &'static str)
                      -> ParseResult<'a, constant_pool_index> {
    let (input, index) = read_u2(input)?;
    if index != 0 && constant_pool.get(index).is_none() {
        p_fail!(Error::DanglingReference { index: index, referrer: referrer });
    }
    Ok((input, index))
}

/// Parses a `u2` count followed by that many pool indices.
fn cp_index_list<'a>(input: Input<'a>, constant_pool: &ConstantPool, referrer: &'static str)
                     -> ParseResult<'a, Vec<constant_pool_index>> {
    let (input, length) = read_u2(input)?;
    count(|i| cp_index(i, constant_pool, referrer), length as usize)(input)
}

fn exception_table_entry<'a>(input: Input<'a>, constant_pool: &ConstantPool)
                             -> ParseResult<'a, ExceptionTableEntry> {
    let (input, start_pc) = read_u2(input)?;
    let (input, end_pc) = read_u2(input)?;
    let (input, handler_pc) = read_u2(input)?;
    let (input, catch_type) = maybe_cp_index(input, constant_pool, "exception_table")?;
    Ok((input, ExceptionTableEntry {
        start_pc: start_pc,
        end_pc: end_pc,
        handler_pc: handler_pc,
        catch_type: catch_type,
    }))
}

fn code<'a>(input: Input<'a>, constant_pool: &ConstantPool, options: &DecodeOptions,
            depth: usize)
            -> ParseResult<'a, Attribute> {
    let nested = p_try!(deeper(depth));
    let (input, max_stack) = read_u2(input)?;
    let (input, max_locals) = read_u2(input)?;
    let (input, code_length) = read_u4(input)?;
    let (input, code) = read_bytes(input, code_length as usize)?;
    let (input, exception_table_length) = read_u2(input)?;
    let (input, exception_table) = count(|i| exception_table_entry(i, constant_pool),
                                         exception_table_length as usize)(input)?;
    let (input, attributes) = attributes_at(input, constant_pool, options, nested)?;
    Ok((input, Attribute::Code {
        max_stack: max_stack,
        max_locals: max_locals,
        code: code.to_vec(),
        exception_table: exception_table,
        attributes: attributes,
    }))
}

fn verification_type_info<'a>(input: Input<'a>, constant_pool: &ConstantPool)
                              -> ParseResult<'a, VerificationTypeInfo> {
    use crate::model::class_file::attributes::stack_map_frame::verification_type_info as tags;

    let (input, tag) = read_u1(input)?;
    match tag {
        tags::TOP => Ok((input, VerificationTypeInfo::Top)),
        tags::INTEGER => Ok((input, VerificationTypeInfo::Integer)),
        tags::FLOAT => Ok((input, VerificationTypeInfo::Float)),
        tags::DOUBLE => Ok((input, VerificationTypeInfo::Double)),
        tags::LONG => Ok((input, VerificationTypeInfo::Long)),
        tags::NULL => Ok((input, VerificationTypeInfo::Null)),
        tags::UNINITIALIZED_THIS => Ok((input, VerificationTypeInfo::UninitializedThis)),
        tags::OBJECT => {
            let (input, class_index) = cp_index(input, constant_pool, "StackMapTable")?;
            Ok((input, VerificationTypeInfo::Object { class_index: class_index }))
        }
        tags::UNINITIALIZED => {
            let (input, offset) = read_u2(input)?;
            Ok((input, VerificationTypeInfo::Uninitialized { offset: offset }))
        }
        t => p_fail!(Error::UnknownVerificationType { tag: t }),
    }
}

fn verification_type_infos<'a>(input: Input<'a>, constant_pool: &ConstantPool, n: usize)
                               -> ParseResult<'a, Vec<VerificationTypeInfo>> {
    count(|i| verification_type_info(i, constant_pool), n)(input)
}

fn stack_map_frame<'a>(input: Input<'a>, constant_pool: &ConstantPool)
                       -> ParseResult<'a, StackMapFrame> {
    use crate::model::class_file::attributes::stack_map_frame::Tag;

    let (input, frame_type) = read_u1(input)?;
    match Tag::from(frame_type) {
        Tag::SameFrame(t) => Ok((input, StackMapFrame::SameFrame { offset_delta: t })),

        Tag::SameLocals1StackItemFrame(t) => {
            let (input, stack_item) = verification_type_info(input, constant_pool)?;
            Ok((input, StackMapFrame::SameLocals1StackItemFrame {
                offset_delta: t - 64,
                stack_item: stack_item,
            }))
        }

        Tag::SameLocals1StackItemFrameExtended(_) => {
            let (input, offset_delta) = read_u2(input)?;
            let (input, stack_item) = verification_type_info(input, constant_pool)?;
            Ok((input, StackMapFrame::SameLocals1StackItemFrameExtended {
                offset_delta: offset_delta,
                stack_item: stack_item,
            }))
        }

        Tag::ChopFrame(t) => {
            let (input, offset_delta) = read_u2(input)?;
            Ok((input, StackMapFrame::ChopFrame { offset_delta: offset_delta, num_chopped: 251 - t }))
        }

        Tag::SameFrameExtended(_) => {
            let (input, offset_delta) = read_u2(input)?;
            Ok((input, StackMapFrame::SameFrameExtended { offset_delta: offset_delta }))
        }

        Tag::AppendFrame(t) => {
            let (input, offset_delta) = read_u2(input)?;
            let (input, locals) = verification_type_infos(input, constant_pool,
                                                          (t - 251) as usize)?;
            Ok((input, StackMapFrame::AppendFrame { offset_delta: offset_delta, locals: locals }))
        }

        Tag::FullFrame(_) => {
            let (input, offset_delta) = read_u2(input)?;
            let (input, number_of_locals) = read_u2(input)?;
            let (input, locals) = verification_type_infos(input, constant_pool,
                                                          number_of_locals as usize)?;
            let (input, number_of_stack_items) = read_u2(input)?;
            let (input, stack) = verification_type_infos(input, constant_pool,
                                                         number_of_stack_items as usize)?;
            Ok((input, StackMapFrame::FullFrame {
                offset_delta: offset_delta,
                locals: locals,
                stack: stack,
            }))
        }

        Tag::Reserved(t) => p_fail!(Error::UnknownStackMapFrameType { frame_type: t }),
    }
}

fn stack_map_table<'a>(input: Input<'a>, constant_pool: &ConstantPool)
                       -> ParseResult<'a, Attribute> {
    let (input, number_of_entries) = read_u2(input)?;
    let (input, entries) = count(|i| stack_map_frame(i, constant_pool),
                                 number_of_entries as usize)(input)?;
    Ok((input, Attribute::StackMapTable { entries: entries }))
}

fn inner_class<'a>(input: Input<'a>, constant_pool: &ConstantPool)
                   -> ParseResult<'a, InnerClass> {
    let (input, inner_class_info_index) = cp_index(input, constant_pool, "InnerClasses")?;
    let (input, outer_class_info_index) = maybe_cp_index(input, constant_pool, "InnerClasses")?;
    let (input, inner_name_index) = maybe_cp_index(input, constant_pool, "InnerClasses")?;
    let (input, inner_class_access_flags) = read_u2(input)?;
    Ok((input, InnerClass {
        inner_class_info_index: inner_class_info_index,
        outer_class_info_index: outer_class_info_index,
        inner_name_index: inner_name_index,
        inner_class_access_flags: inner_class_access_flags,
    }))
}

fn line_number_info(input: Input) -> ParseResult<LineNumberInfo> {
    let (input, start_pc) = read_u2(input)?;
    let (input, line_number) = read_u2(input)?;
    Ok((input, LineNumberInfo { start_pc: start_pc, line_number: line_number }))
}

fn local_variable_info<'a>(input: Input<'a>, constant_pool: &ConstantPool)
                           -> ParseResult<'a, LocalVariableInfo> {
    let (input, start_pc) = read_u2(input)?;
    let (input, length) = read_u2(input)?;
    let (input, name_index) = cp_index(input, constant_pool, "LocalVariableTable")?;
    let (input, descriptor_index) = cp_index(input, constant_pool, "LocalVariableTable")?;
    let (input, index) = read_u2(input)?;
    Ok((input, LocalVariableInfo {
        start_pc: start_pc,
        length: length,
        name_index: name_index,
        descriptor_index: descriptor_index,
        index: index,
    }))
}

fn local_variable_type_info<'a>(input: Input<'a>, constant_pool: &ConstantPool)
                                -> ParseResult<'a, LocalVariableTypeInfo> {
    let (input, start_pc) = read_u2(input)?;
    let (input, length) = read_u2(input)?;
    let (input, name_index) = cp_index(input, constant_pool, "LocalVariableTypeTable")?;
    let (input, signature_index) = cp_index(input, constant_pool, "LocalVariableTypeTable")?;
    let (input, index) = read_u2(input)?;
    Ok((input, LocalVariableTypeInfo {
        start_pc: start_pc,
        length: length,
        name_index: name_index,
        signature_index: signature_index,
        index: index,
    }))
}

fn element_value<'a>(input: Input<'a>, constant_pool: &ConstantPool, depth: usize)
                     -> ParseResult<'a, ElementValue> {
    use crate::model::class_file::attributes::annotations::element_value::Tag;

    let (input, tag) = read_u1(input)?;
    let const_value = |kind: fn(constant_pool_index) -> ElementValue|
                       -> ParseResult<'a, ElementValue> {
        let (input, index) = cp_index(input, constant_pool, "element_value")?;
        Ok((input, kind(index)))
    };
    match Tag::from(tag) {
        Tag::Byte => const_value(|i| ElementValue::Byte { const_value_index: i }),
        Tag::Char => const_value(|i| ElementValue::Char { const_value_index: i }),
        Tag::Double => const_value(|i| ElementValue::Double { const_value_index: i }),
        Tag::Float => const_value(|i| ElementValue::Float { const_value_index: i }),
        Tag::Int => const_value(|i| ElementValue::Int { const_value_index: i }),
        Tag::Long => const_value(|i| ElementValue::Long { const_value_index: i }),
        Tag::Short => const_value(|i| ElementValue::Short { const_value_index: i }),
        Tag::Boolean => const_value(|i| ElementValue::Boolean { const_value_index: i }),
        Tag::String => const_value(|i| ElementValue::String { const_value_index: i }),

        Tag::Enum => {
            let (input, type_name_index) = cp_index(input, constant_pool, "element_value")?;
            let (input, const_name_index) = cp_index(input, constant_pool, "element_value")?;
            Ok((input, ElementValue::Enum {
                type_name_index: type_name_index,
                const_name_index: const_name_index,
            }))
        }

        Tag::Class => {
            let (input, class_info_index) = cp_index(input, constant_pool, "element_value")?;
            Ok((input, ElementValue::Class { class_info_index: class_info_index }))
        }

        Tag::Annotation => {
            let nested = p_try!(deeper(depth));
            let (input, annotation_value) = annotation(input, constant_pool, nested)?;
            Ok((input, ElementValue::Annotation { annotation_value: annotation_value }))
        }

        Tag::Array => {
            let nested = p_try!(deeper(depth));
            let (input, num_values) = read_u2(input)?;
            let (input, values) = count(|i| element_value(i, constant_pool, nested),
                                        num_values as usize)(input)?;
            Ok((input, ElementValue::Array { values: values }))
        }

        Tag::Unknown(t) => p_fail!(Error::UnknownElementValueTag { tag: t }),
    }
}

fn element_value_pair<'a>(input: Input<'a>, constant_pool: &ConstantPool, depth: usize)
                          -> ParseResult<'a, ElementValuePair> {
    let (input, element_name_index) = cp_index(input, constant_pool, "element_value_pairs")?;
    let (input, value) = element_value(input, constant_pool, depth)?;
    Ok((input, ElementValuePair { element_name_index: element_name_index, value: value }))
}

fn element_value_pairs<'a>(input: Input<'a>, constant_pool: &ConstantPool, depth: usize)
                           -> ParseResult<'a, Vec<ElementValuePair>> {
    let (input, num_element_value_pairs) = read_u2(input)?;
    count(|i| element_value_pair(i, constant_pool, depth),
          num_element_value_pairs as usize)(input)
}

fn annotation<'a>(input: Input<'a>, constant_pool: &ConstantPool, depth: usize)
                  -> ParseResult<'a, Annotation> {
    let (input, type_index) = cp_index(input, constant_pool, "annotation")?;
    let (input, element_value_pairs) = element_value_pairs(input, constant_pool, depth)?;
    Ok((input, Annotation { type_index: type_index, element_value_pairs: element_value_pairs }))
}

fn annotations<'a>(input: Input<'a>, constant_pool: &ConstantPool, depth: usize)
                   -> ParseResult<'a, Vec<Annotation>> {
    let (input, num_annotations) = read_u2(input)?;
    count(|i| annotation(i, constant_pool, depth), num_annotations as usize)(input)
}

fn parameter_annotations<'a>(input: Input<'a>, constant_pool: &ConstantPool, depth: usize)
                             -> ParseResult<'a, Vec<Vec<Annotation>>> {
    let (input, num_parameters) = read_u1(input)?;
    count(|i| annotations(i, constant_pool, depth), num_parameters as usize)(input)
}

fn local_variable_target_info(input: Input) -> ParseResult<LocalVariableTargetInfo> {
    let (input, start_pc) = read_u2(input)?;
    let (input, length) = read_u2(input)?;
    let (input, index) = read_u2(input)?;
    Ok((input, LocalVariableTargetInfo { start_pc: start_pc, length: length, index: index }))
}

fn target_info(input: Input, target_type: u1) -> ParseResult<TargetInfo> {
    use crate::model::class_file::attributes::annotations::target_type::Tag;

    match Tag::from(target_type) {
        Tag::TypeParameter => {
            let (input, type_parameter_index) = read_u1(input)?;
            Ok((input, TargetInfo::TypeParameter { type_parameter_index: type_parameter_index }))
        }
        Tag::Supertype => {
            let (input, supertype_index) = read_u2(input)?;
            Ok((input, TargetInfo::Supertype { supertype_index: supertype_index }))
        }
        Tag::TypeParameterBound => {
            let (input, type_parameter_index) = read_u1(input)?;
            let (input, bound_index) = read_u1(input)?;
            Ok((input, TargetInfo::TypeParameterBound {
                type_parameter_index: type_parameter_index,
                bound_index: bound_index,
            }))
        }
        Tag::Empty => Ok((input, TargetInfo::Empty)),
        Tag::FormalParameter => {
            let (input, formal_parameter_index) = read_u1(input)?;
            Ok((input, TargetInfo::FormalParameter {
                formal_parameter_index: formal_parameter_index,
            }))
        }
        Tag::Throws => {
            let (input, throws_type_index) = read_u2(input)?;
            Ok((input, TargetInfo::Throws { throws_type_index: throws_type_index }))
        }
        Tag::LocalVariable => {
            let (input, table_length) = read_u2(input)?;
            let (input, table) = count(local_variable_target_info, table_length as usize)(input)?;
            Ok((input, TargetInfo::LocalVariable { table: table }))
        }
        Tag::Catch => {
            let (input, exception_table_index) = read_u2(input)?;
            Ok((input, TargetInfo::Catch { exception_table_index: exception_table_index }))
        }
        Tag::Offset => {
            let (input, offset) = read_u2(input)?;
            Ok((input, TargetInfo::Offset { offset: offset }))
        }
        Tag::TypeArgument => {
            let (input, offset) = read_u2(input)?;
            let (input, type_argument_index) = read_u1(input)?;
            Ok((input, TargetInfo::TypeArgument {
                offset: offset,
                type_argument_index: type_argument_index,
            }))
        }
        Tag::Unknown(t) => p_fail!(Error::UnknownTargetType { target_type: t }),
    }
}

fn type_path_part(input: Input) -> ParseResult<TypePathPart> {
    let (input, type_path_kind) = read_u1(input)?;
    let (input, type_argument_index) = read_u1(input)?;
    Ok((input, TypePathPart {
        type_path_kind: type_path_kind,
        type_argument_index: type_argument_index,
    }))
}

fn type_annotation<'a>(input: Input<'a>, constant_pool: &ConstantPool, depth: usize)
                       -> ParseResult<'a, TypeAnnotation> {
    let (input, target_type) = read_u1(input)?;
    let (input, target_info) = target_info(input, target_type)?;
    let (input, path_length) = read_u1(input)?;
    let (input, path) = count(type_path_part, path_length as usize)(input)?;
    let (input, type_index) = cp_index(input, constant_pool, "type_annotation")?;
    let (input, element_value_pairs) = element_value_pairs(input, constant_pool, depth)?;
    Ok((input, TypeAnnotation {
        target_type: target_type,
        target_info: target_info,
        target_path: TypePath { path: path },
        type_index: type_index,
        element_value_pairs: element_value_pairs,
    }))
}

fn type_annotations<'a>(input: Input<'a>, constant_pool: &ConstantPool, depth: usize)
                        -> ParseResult<'a, Vec<TypeAnnotation>> {
    let (input, num_annotations) = read_u2(input)?;
    count(|i| type_annotation(i, constant_pool, depth), num_annotations as usize)(input)
}

fn bootstrap_method<'a>(input: Input<'a>, constant_pool: &ConstantPool)
                        -> ParseResult<'a, BootstrapMethod> {
    let (input, bootstrap_method_ref) = cp_index(input, constant_pool, "BootstrapMethods")?;
    let (input, bootstrap_arguments) = cp_index_list(input, constant_pool, "BootstrapMethods")?;
    Ok((input, BootstrapMethod {
        bootstrap_method_ref: bootstrap_method_ref,
        bootstrap_arguments: bootstrap_arguments,
    }))
}

fn parameter<'a>(input: Input<'a>, constant_pool: &ConstantPool) -> ParseResult<'a, Parameter> {
    let (input, name_index) = maybe_cp_index(input, constant_pool, "MethodParameters")?;
    let (input, access_flags) = read_u2(input)?;
    Ok((input, Parameter { name_index: name_index, access_flags: access_flags }))
}

fn module_requires<'a>(input: Input<'a>, constant_pool: &ConstantPool)
                       -> ParseResult<'a, ModuleRequires> {
    let (input, requires_index) = cp_index(input, constant_pool, "Module")?;
    let (input, requires_flags) = read_u2(input)?;
    let (input, requires_version_index) = maybe_cp_index(input, constant_pool, "Module")?;
    Ok((input, ModuleRequires {
        requires_index: requires_index,
        requires_flags: requires_flags,
        requires_version_index: requires_version_index,
    }))
}

fn module_package_access<'a>(input: Input<'a>, constant_pool: &ConstantPool)
                             -> ParseResult<'a, ModulePackageAccess> {
    let (input, package_index) = cp_index(input, constant_pool, "Module")?;
    let (input, flags) = read_u2(input)?;
    let (input, to_index) = cp_index_list(input, constant_pool, "Module")?;
    Ok((input, ModulePackageAccess { package_index: package_index, flags: flags, to_index: to_index }))
}

fn module_provides<'a>(input: Input<'a>, constant_pool: &ConstantPool)
                       -> ParseResult<'a, ModuleProvides> {
    let (input, provides_index) = cp_index(input, constant_pool, "Module")?;
    let (input, provides_with_index) = cp_index_list(input, constant_pool, "Module")?;
    Ok((input, ModuleProvides {
        provides_index: provides_index,
        provides_with_index: provides_with_index,
    }))
}

fn module<'a>(input: Input<'a>, constant_pool: &ConstantPool) -> ParseResult<'a, Attribute> {
    let (input, module_name_index) = cp_index(input, constant_pool, "Module")?;
    let (input, module_flags) = read_u2(input)?;
    let (input, module_version_index) = maybe_cp_index(input, constant_pool, "Module")?;
    let (input, requires_count) = read_u2(input)?;
    let (input, requires) = count(|i| module_requires(i, constant_pool),
                                  requires_count as usize)(input)?;
    let (input, exports_count) = read_u2(input)?;
    let (input, exports) = count(|i| module_package_access(i, constant_pool),
                                 exports_count as usize)(input)?;
    let (input, opens_count) = read_u2(input)?;
    let (input, opens) = count(|i| module_package_access(i, constant_pool),
                               opens_count as usize)(input)?;
    let (input, uses_index) = cp_index_list(input, constant_pool, "Module")?;
    let (input, provides_count) = read_u2(input)?;
    let (input, provides) = count(|i| module_provides(i, constant_pool),
                                  provides_count as usize)(input)?;
    Ok((input, Attribute::Module {
        module_name_index: module_name_index,
        module_flags: module_flags,
        module_version_index: module_version_index,
        requires: requires,
        exports: exports,
        opens: opens,
        uses_index: uses_index,
        provides: provides,
    }))
}

/// `depth` is the nesting depth of the component's own attributes.
fn record_component<'a>(input: Input<'a>, constant_pool: &ConstantPool, options: &DecodeOptions,
                        depth: usize)
                        -> ParseResult<'a, RecordComponentInfo> {
    let (input, name_index) = cp_index(input, constant_pool, "Record")?;
    let (input, descriptor_index) = cp_index(input, constant_pool, "Record")?;
    let (input, attributes) = attributes_at(input, constant_pool, options, depth)?;
    Ok((input, RecordComponentInfo {
        name_index: name_index,
        descriptor_index: descriptor_index,
        attributes: attributes,
    }))
}

/// Runs `parser` over the whole of an attribute payload. Bytes left over are an
/// `AttributeLengthMismatch`.
fn payload<'a, O, F>(info: Input<'a>, mut parser: F) -> Result<O, Error>
    where F: FnMut(Input<'a>) -> ParseResult<'a, O>
{
    let (rest, value) = parser(info)?;
    if !rest.is_empty() {
        return Err(Error::AttributeLengthMismatch {
            attribute_length: info.len() as u4,
            consumed: info.len() - rest.len(),
        });
    }
    Ok(value)
}

/// Decodes `info` as the payload of the attribute called `name`. Returns `Ok(None)` if `name` is
/// not one of `attributes::names`.
pub fn structured_attribute(name: &[u8], info: &[u8], constant_pool: &ConstantPool,
                            options: &DecodeOptions)
                            -> Result<Option<Attribute>, Error> {
    structured_attribute_at(name, info, constant_pool, options, 0)
}

fn structured_attribute_at(name: &[u8], info: &[u8], constant_pool: &ConstantPool,
                           options: &DecodeOptions, depth: usize)
                           -> Result<Option<Attribute>, Error> {
    let cp = constant_pool;
    let attribute = match name {
        names::CONSTANT_VALUE => payload(info, |i| {
            let (i, constant_value_index) = cp_index(i, cp, "ConstantValue")?;
            Ok((i, Attribute::ConstantValue { constant_value_index: constant_value_index }))
        }),

        names::CODE => payload(info, |i| code(i, cp, options, depth)),

        names::STACK_MAP_TABLE => payload(info, |i| stack_map_table(i, cp)),

        names::EXCEPTIONS => payload(info, |i| {
            let (i, exception_index_table) = cp_index_list(i, cp, "Exceptions")?;
            Ok((i, Attribute::Exceptions { exception_index_table: exception_index_table }))
        }),

        names::INNER_CLASSES => payload(info, |i| {
            let (i, number_of_classes) = read_u2(i)?;
            let (i, classes) = count(|i| inner_class(i, cp), number_of_classes as usize)(i)?;
            Ok((i, Attribute::InnerClasses { classes: classes }))
        }),

        names::ENCLOSING_METHOD => payload(info, |i| {
            let (i, class_index) = cp_index(i, cp, "EnclosingMethod")?;
            let (i, method_index) = maybe_cp_index(i, cp, "EnclosingMethod")?;
            Ok((i, Attribute::EnclosingMethod { class_index: class_index, method_index: method_index }))
        }),

        names::SYNTHETIC => payload(info, |i| Ok((i, Attribute::Synthetic))),

        names::SIGNATURE => payload(info, |i| {
            let (i, signature_index) = cp_index(i, cp, "Signature")?;
            Ok((i, Attribute::Signature { signature_index: signature_index }))
        }),

        names::SOURCE_FILE => payload(info, |i| {
            let (i, sourcefile_index) = cp_index(i, cp, "SourceFile")?;
            Ok((i, Attribute::SourceFile { sourcefile_index: sourcefile_index }))
        }),

        names::SOURCE_DEBUG_EXTENSION => payload(info, |i| {
            let (i, debug_extension) = read_bytes(i, i.len())?;
            Ok((i, Attribute::SourceDebugExtension { debug_extension: debug_extension.to_vec() }))
        }),

        names::LINE_NUMBER_TABLE => payload(info, |i| {
            let (i, table_length) = read_u2(i)?;
            let (i, table) = count(line_number_info, table_length as usize)(i)?;
            Ok((i, Attribute::LineNumberTable { line_number_table: table }))
        }),

        names::LOCAL_VARIABLE_TABLE => payload(info, |i| {
            let (i, table_length) = read_u2(i)?;
            let (i, table) = count(|i| local_variable_info(i, cp), table_length as usize)(i)?;
            Ok((i, Attribute::LocalVariableTable { local_variable_table: table }))
        }),

        names::LOCAL_VARIABLE_TYPE_TABLE => payload(info, |i| {
            let (i, table_length) = read_u2(i)?;
            let (i, table) = count(|i| local_variable_type_info(i, cp), table_length as usize)(i)?;
            Ok((i, Attribute::LocalVariableTypeTable { local_variable_type_table: table }))
        }),

        names::DEPRECATED => payload(info, |i| Ok((i, Attribute::Deprecated))),

        names::RUNTIME_VISIBLE_ANNOTATIONS => payload(info, |i| {
            let (i, annotations) = annotations(i, cp, depth)?;
            Ok((i, Attribute::RuntimeVisibleAnnotations { annotations: annotations }))
        }),

        names::RUNTIME_INVISIBLE_ANNOTATIONS => payload(info, |i| {
            let (i, annotations) = annotations(i, cp, depth)?;
            Ok((i, Attribute::RuntimeInvisibleAnnotations { annotations: annotations }))
        }),

        names::RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS => payload(info, |i| {
            let (i, parameter_annotations) = parameter_annotations(i, cp, depth)?;
            Ok((i, Attribute::RuntimeVisibleParameterAnnotations {
                parameter_annotations: parameter_annotations,
            }))
        }),

        names::RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS => payload(info, |i| {
            let (i, parameter_annotations) = parameter_annotations(i, cp, depth)?;
            Ok((i, Attribute::RuntimeInvisibleParameterAnnotations {
                parameter_annotations: parameter_annotations,
            }))
        }),

        names::RUNTIME_VISIBLE_TYPE_ANNOTATIONS => payload(info, |i| {
            let (i, annotations) = type_annotations(i, cp, depth)?;
            Ok((i, Attribute::RuntimeVisibleTypeAnnotations { annotations: annotations }))
        }),

        names::RUNTIME_INVISIBLE_TYPE_ANNOTATIONS => payload(info, |i| {
            let (i, annotations) = type_annotations(i, cp, depth)?;
            Ok((i, Attribute::RuntimeInvisibleTypeAnnotations { annotations: annotations }))
        }),

        names::ANNOTATION_DEFAULT => payload(info, |i| {
            let (i, default_value) = element_value(i, cp, depth)?;
            Ok((i, Attribute::AnnotationDefault { default_value: default_value }))
        }),

        names::BOOTSTRAP_METHODS => payload(info, |i| {
            let (i, num_bootstrap_methods) = read_u2(i)?;
            let (i, bootstrap_methods) = count(|i| bootstrap_method(i, cp),
                                               num_bootstrap_methods as usize)(i)?;
            Ok((i, Attribute::BootstrapMethods { bootstrap_methods: bootstrap_methods }))
        }),

        names::METHOD_PARAMETERS => payload(info, |i| {
            let (i, parameters_count) = read_u1(i)?;
            let (i, parameters) = count(|i| parameter(i, cp), parameters_count as usize)(i)?;
            Ok((i, Attribute::MethodParameters { parameters: parameters }))
        }),

        names::MODULE => payload(info, |i| module(i, cp)),

        names::MODULE_PACKAGES => payload(info, |i| {
            let (i, package_index) = cp_index_list(i, cp, "ModulePackages")?;
            Ok((i, Attribute::ModulePackages { package_index: package_index }))
        }),

        names::MODULE_MAIN_CLASS => payload(info, |i| {
            let (i, main_class_index) = cp_index(i, cp, "ModuleMainClass")?;
            Ok((i, Attribute::ModuleMainClass { main_class_index: main_class_index }))
        }),

        names::NEST_HOST => payload(info, |i| {
            let (i, host_class_index) = cp_index(i, cp, "NestHost")?;
            Ok((i, Attribute::NestHost { host_class_index: host_class_index }))
        }),

        names::NEST_MEMBERS => payload(info, |i| {
            let (i, classes) = cp_index_list(i, cp, "NestMembers")?;
            Ok((i, Attribute::NestMembers { classes: classes }))
        }),

        names::RECORD => payload(info, |i| {
            let nested = p_try!(deeper(depth));
            let (i, components_count) = read_u2(i)?;
            let (i, components) = count(|i| record_component(i, cp, options, nested),
                                        components_count as usize)(i)?;
            Ok((i, Attribute::Record { components: components }))
        }),

        names::PERMITTED_SUBCLASSES => payload(info, |i| {
            let (i, classes) = cp_index_list(i, cp, "PermittedSubclasses")?;
            Ok((i, Attribute::PermittedSubclasses { classes: classes }))
        }),

        _ => return Ok(None),
    };
    attribute.map(Some)
}

/// Parses one attribute envelope and, where possible, its payload.
pub fn attribute<'a>(input: Input<'a>, constant_pool: &ConstantPool, options: &DecodeOptions)
                     -> ParseResult<'a, AttributeInfo> {
    attribute_at(input, constant_pool, options, 0)
}

fn attribute_at<'a>(input: Input<'a>, constant_pool: &ConstantPool, options: &DecodeOptions,
                    depth: usize)
                    -> ParseResult<'a, AttributeInfo> {
    let (input, attribute_name_index) = read_u2(input)?;
    let (input, attribute_length) = read_u4(input)?;
    let (input, info) = read_bytes(input, attribute_length as usize)?;

    let attribute = match constant_pool.utf8(attribute_name_index) {
        Some(name) if options.structured_attributes => {
            match structured_attribute_at(name, info, constant_pool, options, depth) {
                Ok(Some(attribute)) => attribute,
                Ok(None) => Attribute::Opaque { info: info.to_vec() },
                Err(e) => {
                    if options.strict_attributes {
                        p_fail!(e);
                    }
                    warn!("keeping {} attribute as raw bytes: {}",
                          String::from_utf8_lossy(name), e);
                    Attribute::Opaque { info: info.to_vec() }
                }
            }
        }
        _ => Attribute::Opaque { info: info.to_vec() },
    };
    trace!("attribute #{} ({} bytes): {:?}", attribute_name_index, attribute_length, attribute);

    Ok((input, AttributeInfo { attribute_name_index: attribute_name_index, attribute: attribute }))
}

/// Parses an `attributes_count` followed by that many attributes.
pub fn attributes<'a>(input: Input<'a>, constant_pool: &ConstantPool, options: &DecodeOptions)
                      -> ParseResult<'a, Vec<AttributeInfo>> {
    attributes_at(input, constant_pool, options, 0)
}

fn attributes_at<'a>(input: Input<'a>, constant_pool: &ConstantPool, options: &DecodeOptions,
                     depth: usize)
                     -> ParseResult<'a, Vec<AttributeInfo>> {
    let (input, attributes_count) = read_u2(input)?;
    count(|i| attribute_at(i, constant_pool, options, depth), attributes_count as usize)(input)
}
