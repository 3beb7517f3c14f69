use byteorder::WriteBytesExt;

use crate::error::{Error, Result};
use crate::model::class_file::{Attribute, AttributeInfo};
use crate::model::class_file::attributes::{BootstrapMethod, ExceptionTableEntry, InnerClass,
                                           LineNumberInfo, LocalVariableInfo,
                                           LocalVariableTypeInfo, ModulePackageAccess,
                                           ModuleProvides, ModuleRequires, Parameter,
                                           RecordComponentInfo, StackMapFrame,
                                           VerificationTypeInfo};
use crate::model::class_file::attributes::annotations::{target_type, Annotation, ElementValue,
                                                        ElementValuePair,
                                                        LocalVariableTargetInfo, TargetInfo,
                                                        TypeAnnotation, TypePathPart};

use super::{write_u1_length, write_u1_list, write_u2_list, write_u4_length, Serialize};

/// Writes the name index, then the payload preceded by its length. Structured payloads are
/// written to a scratch buffer first so that the length can be recomputed.
impl Serialize for AttributeInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.attribute_name_index.serialize(writer)?;
        match self.attribute {
            Attribute::Opaque { ref info } => {
                write_u4_length(writer, info.len(), "attribute_info")?;
                writer.write_all(info)?;
            }
            ref attribute => {
                let mut info = Vec::new();
                attribute.serialize(&mut info)?;
                write_u4_length(writer, info.len(), "attribute_info")?;
                writer.write_all(&info)?;
            }
        }
        Ok(())
    }
}

/// Writes the payload of an attribute, without its name index and length.
impl Serialize for Attribute {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        match *self {
            Attribute::ConstantValue { constant_value_index } =>
                constant_value_index.serialize(writer),

            Attribute::Code { max_stack, max_locals, ref code, ref exception_table,
                              ref attributes } => {
                max_stack.serialize(writer)?;
                max_locals.serialize(writer)?;
                write_u4_length(writer, code.len(), "code")?;
                writer.write_all(code)?;
                write_u2_list(writer, exception_table, "exception_table")?;
                write_u2_list(writer, attributes, "attributes")
            }

            Attribute::StackMapTable { ref entries } =>
                write_u2_list(writer, entries, "StackMapTable entries"),

            Attribute::Exceptions { ref exception_index_table } =>
                write_u2_list(writer, exception_index_table, "exception_index_table"),

            Attribute::InnerClasses { ref classes } =>
                write_u2_list(writer, classes, "InnerClasses classes"),

            Attribute::EnclosingMethod { class_index, method_index } => {
                class_index.serialize(writer)?;
                method_index.serialize(writer)
            }

            Attribute::Synthetic | Attribute::Deprecated => Ok(()),

            Attribute::Signature { signature_index } => signature_index.serialize(writer),

            Attribute::SourceFile { sourcefile_index } => sourcefile_index.serialize(writer),

            Attribute::SourceDebugExtension { ref debug_extension } => {
                writer.write_all(debug_extension)?;
                Ok(())
            }

            Attribute::LineNumberTable { ref line_number_table } =>
                write_u2_list(writer, line_number_table, "line_number_table"),

            Attribute::LocalVariableTable { ref local_variable_table } =>
                write_u2_list(writer, local_variable_table, "local_variable_table"),

            Attribute::LocalVariableTypeTable { ref local_variable_type_table } =>
                write_u2_list(writer, local_variable_type_table, "local_variable_type_table"),

            Attribute::RuntimeVisibleAnnotations { ref annotations } |
            Attribute::RuntimeInvisibleAnnotations { ref annotations } =>
                write_u2_list(writer, annotations, "annotations"),

            Attribute::RuntimeVisibleParameterAnnotations { ref parameter_annotations } |
            Attribute::RuntimeInvisibleParameterAnnotations { ref parameter_annotations } => {
                write_u1_length(writer, parameter_annotations.len(), "parameter_annotations")?;
                for annotations in parameter_annotations {
                    write_u2_list(writer, annotations, "annotations")?;
                }
                Ok(())
            }

            Attribute::RuntimeVisibleTypeAnnotations { ref annotations } |
            Attribute::RuntimeInvisibleTypeAnnotations { ref annotations } =>
                write_u2_list(writer, annotations, "type annotations"),

            Attribute::AnnotationDefault { ref default_value } => default_value.serialize(writer),

            Attribute::BootstrapMethods { ref bootstrap_methods } =>
                write_u2_list(writer, bootstrap_methods, "bootstrap_methods"),

            Attribute::MethodParameters { ref parameters } =>
                write_u1_list(writer, parameters, "parameters"),

            Attribute::Module { module_name_index, module_flags, module_version_index,
                                ref requires, ref exports, ref opens, ref uses_index,
                                ref provides } => {
                module_name_index.serialize(writer)?;
                module_flags.serialize(writer)?;
                module_version_index.serialize(writer)?;
                write_u2_list(writer, requires, "requires")?;
                write_u2_list(writer, exports, "exports")?;
                write_u2_list(writer, opens, "opens")?;
                write_u2_list(writer, uses_index, "uses_index")?;
                write_u2_list(writer, provides, "provides")
            }

            Attribute::ModulePackages { ref package_index } =>
                write_u2_list(writer, package_index, "package_index"),

            Attribute::ModuleMainClass { main_class_index } => main_class_index.serialize(writer),

            Attribute::NestHost { host_class_index } => host_class_index.serialize(writer),

            Attribute::NestMembers { ref classes } |
            Attribute::PermittedSubclasses { ref classes } =>
                write_u2_list(writer, classes, "classes"),

            Attribute::Record { ref components } =>
                write_u2_list(writer, components, "components"),

            Attribute::Opaque { ref info } => {
                writer.write_all(info)?;
                Ok(())
            }
        }
    }
}

impl Serialize for ExceptionTableEntry {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.start_pc.serialize(writer)?;
        self.end_pc.serialize(writer)?;
        self.handler_pc.serialize(writer)?;
        self.catch_type.serialize(writer)
    }
}

impl Serialize for VerificationTypeInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        use crate::model::class_file::attributes::stack_map_frame::verification_type_info as tags;

        match *self {
            VerificationTypeInfo::Top => tags::TOP.serialize(writer),
            VerificationTypeInfo::Integer => tags::INTEGER.serialize(writer),
            VerificationTypeInfo::Float => tags::FLOAT.serialize(writer),
            VerificationTypeInfo::Double => tags::DOUBLE.serialize(writer),
            VerificationTypeInfo::Long => tags::LONG.serialize(writer),
            VerificationTypeInfo::Null => tags::NULL.serialize(writer),
            VerificationTypeInfo::UninitializedThis => tags::UNINITIALIZED_THIS.serialize(writer),
            VerificationTypeInfo::Object { class_index } => {
                tags::OBJECT.serialize(writer)?;
                class_index.serialize(writer)
            }
            VerificationTypeInfo::Uninitialized { offset } => {
                tags::UNINITIALIZED.serialize(writer)?;
                offset.serialize(writer)
            }
        }
    }
}

/// The value that does not fit the frame kind, for frames whose `frame_type` cannot be formed.
fn frame_overflow(frame: &StackMapFrame) -> Error {
    let length = match *frame {
        StackMapFrame::SameFrame { offset_delta } |
        StackMapFrame::SameLocals1StackItemFrame { offset_delta, .. } => offset_delta as usize,
        StackMapFrame::ChopFrame { num_chopped, .. } => num_chopped as usize,
        StackMapFrame::AppendFrame { ref locals, .. } => locals.len(),
        _ => 0,
    };
    Error::LengthOverflow { what: "stack map frame", length: length }
}

impl Serialize for StackMapFrame {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        let frame_type = self.frame_type().ok_or_else(|| frame_overflow(self))?;
        frame_type.serialize(writer)?;
        match *self {
            StackMapFrame::SameFrame { .. } => Ok(()),
            StackMapFrame::SameLocals1StackItemFrame { ref stack_item, .. } =>
                stack_item.serialize(writer),
            StackMapFrame::SameLocals1StackItemFrameExtended { offset_delta, ref stack_item } => {
                offset_delta.serialize(writer)?;
                stack_item.serialize(writer)
            }
            StackMapFrame::ChopFrame { offset_delta, .. } |
            StackMapFrame::SameFrameExtended { offset_delta } => offset_delta.serialize(writer),
            StackMapFrame::AppendFrame { offset_delta, ref locals } => {
                offset_delta.serialize(writer)?;
                for local in locals {
                    local.serialize(writer)?;
                }
                Ok(())
            }
            StackMapFrame::FullFrame { offset_delta, ref locals, ref stack } => {
                offset_delta.serialize(writer)?;
                write_u2_list(writer, locals, "locals")?;
                write_u2_list(writer, stack, "stack")
            }
        }
    }
}

impl Serialize for InnerClass {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.inner_class_info_index.serialize(writer)?;
        self.outer_class_info_index.serialize(writer)?;
        self.inner_name_index.serialize(writer)?;
        self.inner_class_access_flags.serialize(writer)
    }
}

impl Serialize for LineNumberInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.start_pc.serialize(writer)?;
        self.line_number.serialize(writer)
    }
}

impl Serialize for LocalVariableInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.start_pc.serialize(writer)?;
        self.length.serialize(writer)?;
        self.name_index.serialize(writer)?;
        self.descriptor_index.serialize(writer)?;
        self.index.serialize(writer)
    }
}

impl Serialize for LocalVariableTypeInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.start_pc.serialize(writer)?;
        self.length.serialize(writer)?;
        self.name_index.serialize(writer)?;
        self.signature_index.serialize(writer)?;
        self.index.serialize(writer)
    }
}

impl Serialize for ElementValue {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.tag().serialize(writer)?;
        match *self {
            ElementValue::Byte { const_value_index } |
            ElementValue::Char { const_value_index } |
            ElementValue::Double { const_value_index } |
            ElementValue::Float { const_value_index } |
            ElementValue::Int { const_value_index } |
            ElementValue::Long { const_value_index } |
            ElementValue::Short { const_value_index } |
            ElementValue::Boolean { const_value_index } |
            ElementValue::String { const_value_index } => const_value_index.serialize(writer),
            ElementValue::Enum { type_name_index, const_name_index } => {
                type_name_index.serialize(writer)?;
                const_name_index.serialize(writer)
            }
            ElementValue::Class { class_info_index } => class_info_index.serialize(writer),
            ElementValue::Annotation { ref annotation_value } => annotation_value.serialize(writer),
            ElementValue::Array { ref values } => write_u2_list(writer, values, "values"),
        }
    }
}

impl Serialize for ElementValuePair {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.element_name_index.serialize(writer)?;
        self.value.serialize(writer)
    }
}

impl Serialize for Annotation {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.type_index.serialize(writer)?;
        write_u2_list(writer, &self.element_value_pairs, "element_value_pairs")
    }
}

impl Serialize for LocalVariableTargetInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.start_pc.serialize(writer)?;
        self.length.serialize(writer)?;
        self.index.serialize(writer)
    }
}

impl Serialize for TargetInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        match *self {
            TargetInfo::TypeParameter { type_parameter_index } =>
                type_parameter_index.serialize(writer),
            TargetInfo::Supertype { supertype_index } => supertype_index.serialize(writer),
            TargetInfo::TypeParameterBound { type_parameter_index, bound_index } => {
                type_parameter_index.serialize(writer)?;
                bound_index.serialize(writer)
            }
            TargetInfo::Empty => Ok(()),
            TargetInfo::FormalParameter { formal_parameter_index } =>
                formal_parameter_index.serialize(writer),
            TargetInfo::Throws { throws_type_index } => throws_type_index.serialize(writer),
            TargetInfo::LocalVariable { ref table } => write_u2_list(writer, table, "table"),
            TargetInfo::Catch { exception_table_index } => exception_table_index.serialize(writer),
            TargetInfo::Offset { offset } => offset.serialize(writer),
            TargetInfo::TypeArgument { offset, type_argument_index } => {
                offset.serialize(writer)?;
                type_argument_index.serialize(writer)
            }
        }
    }
}

impl Serialize for TypePathPart {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.type_path_kind.serialize(writer)?;
        self.type_argument_index.serialize(writer)
    }
}

/// The `target_type` byte must select the layout of `target_info`; otherwise the annotation
/// could not be read back.
impl Serialize for TypeAnnotation {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        if target_type::Tag::from(self.target_type) != self.target_info.tag() {
            return Err(Error::UnknownTargetType { target_type: self.target_type });
        }
        self.target_type.serialize(writer)?;
        self.target_info.serialize(writer)?;
        write_u1_list(writer, &self.target_path.path, "type_path")?;
        self.type_index.serialize(writer)?;
        write_u2_list(writer, &self.element_value_pairs, "element_value_pairs")
    }
}

impl Serialize for BootstrapMethod {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.bootstrap_method_ref.serialize(writer)?;
        write_u2_list(writer, &self.bootstrap_arguments, "bootstrap_arguments")
    }
}

impl Serialize for Parameter {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.name_index.serialize(writer)?;
        self.access_flags.serialize(writer)
    }
}

impl Serialize for ModuleRequires {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.requires_index.serialize(writer)?;
        self.requires_flags.serialize(writer)?;
        self.requires_version_index.serialize(writer)
    }
}

impl Serialize for ModulePackageAccess {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.package_index.serialize(writer)?;
        self.flags.serialize(writer)?;
        write_u2_list(writer, &self.to_index, "to_index")
    }
}

impl Serialize for ModuleProvides {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.provides_index.serialize(writer)?;
        write_u2_list(writer, &self.provides_with_index, "provides_with_index")
    }
}

impl Serialize for RecordComponentInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.name_index.serialize(writer)?;
        self.descriptor_index.serialize(writer)?;
        write_u2_list(writer, &self.attributes, "attributes")
    }
}
