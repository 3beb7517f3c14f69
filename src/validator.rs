//! Structural validation of a decoded `ClassFile`.
//!
//! `validate` checks that every constant pool reference in the class resolves: indices must
//! name a real entry (not zero, not past the end, not the slot after a `Long` or `Double`), and
//! references whose target kind is fixed by the format must point at an entry of that kind.
//! References inside structured attributes are only checked for bounds. A structured attribute
//! must also be named by its own name, or it would come back as a different variant once
//! written out and read again. The first violation found is returned.

use crate::error::{Error, Result};
use crate::model::class_file::{constant_pool_index, AttributeInfo, Attribute, ClassFile,
                               ConstantPool, ConstantPoolInfo, MemberInfo, MAGIC};
use crate::model::class_file::attributes::{deeper, StackMapFrame, VerificationTypeInfo};
use crate::model::class_file::attributes::annotations::{Annotation, ElementValue,
                                                        TypeAnnotation};
use crate::model::class_file::constant_pool::{ReferenceKind, Tag};

pub fn validate(class_file: &ClassFile) -> Result<()> {
    if class_file.magic != MAGIC {
        return Err(Error::Magic { found: class_file.magic });
    }

    let pool = &class_file.constant_pool;
    for (index, info) in pool.entries() {
        trace!("validating constant pool #{}", index);
        constant_pool_entry(pool, info)?;
    }

    pool.resolve_tag(class_file.this_class, Tag::Class, "this_class")?;
    if class_file.super_class != 0 {
        pool.resolve_tag(class_file.super_class, Tag::Class, "super_class")?;
    }
    for &interface in &class_file.interfaces {
        pool.resolve_tag(interface, Tag::Class, "interfaces")?;
    }

    for field in &class_file.fields {
        member(pool, field, "field_info")?;
    }
    for method in &class_file.methods {
        member(pool, method, "method_info")?;
    }
    attributes(pool, &class_file.attributes, 0)
}

fn constant_pool_entry(pool: &ConstantPool, info: &ConstantPoolInfo) -> Result<()> {
    match *info {
        ConstantPoolInfo::Utf8 { .. } |
        ConstantPoolInfo::Integer { .. } |
        ConstantPoolInfo::Float { .. } |
        ConstantPoolInfo::Long { .. } |
        ConstantPoolInfo::Double { .. } => {}

        ConstantPoolInfo::Class { name_index } => {
            pool.resolve_tag(name_index, Tag::Utf8, "CONSTANT_Class")?;
        }

        ConstantPoolInfo::String { string_index } => {
            pool.resolve_tag(string_index, Tag::Utf8, "CONSTANT_String")?;
        }

        ConstantPoolInfo::FieldRef { class_index, name_and_type_index } |
        ConstantPoolInfo::MethodRef { class_index, name_and_type_index } |
        ConstantPoolInfo::InterfaceMethodRef { class_index, name_and_type_index } => {
            pool.resolve_tag(class_index, Tag::Class, "CONSTANT_Fieldref/Methodref")?;
            pool.resolve_tag(name_and_type_index, Tag::NameAndType,
                             "CONSTANT_Fieldref/Methodref")?;
        }

        ConstantPoolInfo::NameAndType { name_index, descriptor_index } => {
            pool.resolve_tag(name_index, Tag::Utf8, "CONSTANT_NameAndType")?;
            pool.resolve_tag(descriptor_index, Tag::Utf8, "CONSTANT_NameAndType")?;
        }

        ConstantPoolInfo::MethodHandle { reference_kind, reference_index } => {
            method_handle_reference(pool, reference_kind, reference_index)?;
        }

        ConstantPoolInfo::MethodType { descriptor_index } => {
            pool.resolve_tag(descriptor_index, Tag::Utf8, "CONSTANT_MethodType")?;
        }

        // bootstrap_method_attr_index points into the BootstrapMethods attribute.
        ConstantPoolInfo::Dynamic { name_and_type_index, .. } |
        ConstantPoolInfo::InvokeDynamic { name_and_type_index, .. } => {
            pool.resolve_tag(name_and_type_index, Tag::NameAndType,
                             "CONSTANT_Dynamic/InvokeDynamic")?;
        }

        ConstantPoolInfo::Module { name_index } => {
            pool.resolve_tag(name_index, Tag::Utf8, "CONSTANT_Module")?;
        }

        ConstantPoolInfo::Package { name_index } => {
            pool.resolve_tag(name_index, Tag::Utf8, "CONSTANT_Package")?;
        }
    }
    Ok(())
}

/// Field handles must reference a `FieldRef`, `InvokeInterface` handles an
/// `InterfaceMethodRef`, `InvokeVirtual` and `NewInvokeSpecial` handles a `MethodRef`, and
/// `InvokeStatic` and `InvokeSpecial` handles either kind of method reference.
fn method_handle_reference(pool: &ConstantPool, kind: ReferenceKind,
                           reference_index: constant_pool_index)
                           -> Result<()> {
    const REFERRER: &str = "CONSTANT_MethodHandle";
    let actual = pool.resolve(reference_index, REFERRER)?.tag();
    let expected = match kind {
        ReferenceKind::GetField |
        ReferenceKind::GetStatic |
        ReferenceKind::PutField |
        ReferenceKind::PutStatic => Tag::FieldRef,
        ReferenceKind::InvokeVirtual | ReferenceKind::NewInvokeSpecial => Tag::MethodRef,
        ReferenceKind::InvokeStatic | ReferenceKind::InvokeSpecial => {
            if actual == Tag::InterfaceMethodRef {
                return Ok(());
            }
            Tag::MethodRef
        }
        ReferenceKind::InvokeInterface => Tag::InterfaceMethodRef,
    };
    if actual != expected {
        return Err(Error::UnexpectedConstantPoolType {
            index: reference_index,
            referrer: REFERRER,
            expected: expected,
            actual: actual,
        });
    }
    Ok(())
}

fn member(pool: &ConstantPool, member: &MemberInfo, referrer: &'static str) -> Result<()> {
    pool.resolve_tag(member.name_index, Tag::Utf8, referrer)?;
    pool.resolve_tag(member.descriptor_index, Tag::Utf8, referrer)?;
    attributes(pool, &member.attributes, 0)
}

fn attributes(pool: &ConstantPool, attributes: &[AttributeInfo], depth: usize) -> Result<()> {
    for attribute in attributes {
        let name_index = attribute.attribute_name_index;
        pool.resolve_tag(name_index, Tag::Utf8, "attribute_info")?;
        if let Some(name) = attribute.attribute.name() {
            if pool.utf8(name_index) != Some(name) {
                return Err(Error::AttributeNameMismatch {
                    index: name_index,
                    expected: std::str::from_utf8(name).unwrap_or_default(),
                });
            }
        }
        attribute_contents(pool, &attribute.attribute, depth)?;
    }
    Ok(())
}

fn index(pool: &ConstantPool, index: constant_pool_index, referrer: &'static str) -> Result<()> {
    pool.resolve(index, referrer).map(|_| ())
}

fn optional_index(pool: &ConstantPool, i: constant_pool_index, referrer: &'static str)
                  -> Result<()> {
    if i == 0 {
        return Ok(());
    }
    index(pool, i, referrer)
}

fn indices(pool: &ConstantPool, list: &[constant_pool_index], referrer: &'static str)
           -> Result<()> {
    for &i in list {
        index(pool, i, referrer)?;
    }
    Ok(())
}

fn attribute_contents(pool: &ConstantPool, attribute: &Attribute, depth: usize) -> Result<()> {
    match *attribute {
        Attribute::ConstantValue { constant_value_index } =>
            index(pool, constant_value_index, "ConstantValue"),

        Attribute::Code { ref exception_table, ref attributes, .. } => {
            for entry in exception_table {
                optional_index(pool, entry.catch_type, "exception_table")?;
            }
            self::attributes(pool, attributes, deeper(depth)?)
        }

        Attribute::StackMapTable { ref entries } => {
            for frame in entries {
                stack_map_frame(pool, frame)?;
            }
            Ok(())
        }

        Attribute::Exceptions { ref exception_index_table } =>
            indices(pool, exception_index_table, "Exceptions"),

        Attribute::InnerClasses { ref classes } => {
            for class in classes {
                index(pool, class.inner_class_info_index, "InnerClasses")?;
                optional_index(pool, class.outer_class_info_index, "InnerClasses")?;
                optional_index(pool, class.inner_name_index, "InnerClasses")?;
            }
            Ok(())
        }

        Attribute::EnclosingMethod { class_index, method_index } => {
            index(pool, class_index, "EnclosingMethod")?;
            optional_index(pool, method_index, "EnclosingMethod")
        }

        Attribute::Signature { signature_index } => index(pool, signature_index, "Signature"),

        Attribute::SourceFile { sourcefile_index } => index(pool, sourcefile_index, "SourceFile"),

        Attribute::LocalVariableTable { ref local_variable_table } => {
            for entry in local_variable_table {
                index(pool, entry.name_index, "LocalVariableTable")?;
                index(pool, entry.descriptor_index, "LocalVariableTable")?;
            }
            Ok(())
        }

        Attribute::LocalVariableTypeTable { ref local_variable_type_table } => {
            for entry in local_variable_type_table {
                index(pool, entry.name_index, "LocalVariableTypeTable")?;
                index(pool, entry.signature_index, "LocalVariableTypeTable")?;
            }
            Ok(())
        }

        Attribute::RuntimeVisibleAnnotations { ref annotations } |
        Attribute::RuntimeInvisibleAnnotations { ref annotations } => {
            for a in annotations {
                annotation(pool, a, depth)?;
            }
            Ok(())
        }

        Attribute::RuntimeVisibleParameterAnnotations { ref parameter_annotations } |
        Attribute::RuntimeInvisibleParameterAnnotations { ref parameter_annotations } => {
            for a in parameter_annotations.iter().flatten() {
                annotation(pool, a, depth)?;
            }
            Ok(())
        }

        Attribute::RuntimeVisibleTypeAnnotations { ref annotations } |
        Attribute::RuntimeInvisibleTypeAnnotations { ref annotations } => {
            for a in annotations {
                type_annotation(pool, a, depth)?;
            }
            Ok(())
        }

        Attribute::AnnotationDefault { ref default_value } =>
            element_value(pool, default_value, depth),

        Attribute::BootstrapMethods { ref bootstrap_methods } => {
            for method in bootstrap_methods {
                index(pool, method.bootstrap_method_ref, "BootstrapMethods")?;
                indices(pool, &method.bootstrap_arguments, "BootstrapMethods")?;
            }
            Ok(())
        }

        Attribute::MethodParameters { ref parameters } => {
            for parameter in parameters {
                optional_index(pool, parameter.name_index, "MethodParameters")?;
            }
            Ok(())
        }

        Attribute::Module { module_name_index, module_version_index, ref requires,
                            ref exports, ref opens, ref uses_index, ref provides, .. } => {
            index(pool, module_name_index, "Module")?;
            optional_index(pool, module_version_index, "Module")?;
            for r in requires {
                index(pool, r.requires_index, "Module")?;
                optional_index(pool, r.requires_version_index, "Module")?;
            }
            for access in exports.iter().chain(opens) {
                index(pool, access.package_index, "Module")?;
                indices(pool, &access.to_index, "Module")?;
            }
            indices(pool, uses_index, "Module")?;
            for p in provides {
                index(pool, p.provides_index, "Module")?;
                indices(pool, &p.provides_with_index, "Module")?;
            }
            Ok(())
        }

        Attribute::ModulePackages { ref package_index } =>
            indices(pool, package_index, "ModulePackages"),

        Attribute::ModuleMainClass { main_class_index } =>
            index(pool, main_class_index, "ModuleMainClass"),

        Attribute::NestHost { host_class_index } => index(pool, host_class_index, "NestHost"),

        Attribute::NestMembers { ref classes } => indices(pool, classes, "NestMembers"),

        Attribute::PermittedSubclasses { ref classes } =>
            indices(pool, classes, "PermittedSubclasses"),

        Attribute::Record { ref components } => {
            let nested = deeper(depth)?;
            for component in components {
                index(pool, component.name_index, "Record")?;
                index(pool, component.descriptor_index, "Record")?;
                self::attributes(pool, &component.attributes, nested)?;
            }
            Ok(())
        }

        Attribute::Synthetic |
        Attribute::Deprecated |
        Attribute::SourceDebugExtension { .. } |
        Attribute::LineNumberTable { .. } |
        Attribute::Opaque { .. } => Ok(()),
    }
}

fn verification_type_info(pool: &ConstantPool, info: &VerificationTypeInfo) -> Result<()> {
    match *info {
        VerificationTypeInfo::Object { class_index } => index(pool, class_index, "StackMapTable"),
        _ => Ok(()),
    }
}

fn stack_map_frame(pool: &ConstantPool, frame: &StackMapFrame) -> Result<()> {
    match *frame {
        StackMapFrame::SameLocals1StackItemFrame { ref stack_item, .. } |
        StackMapFrame::SameLocals1StackItemFrameExtended { ref stack_item, .. } =>
            verification_type_info(pool, stack_item),
        StackMapFrame::AppendFrame { ref locals, .. } => {
            for local in locals {
                verification_type_info(pool, local)?;
            }
            Ok(())
        }
        StackMapFrame::FullFrame { ref locals, ref stack, .. } => {
            for info in locals.iter().chain(stack) {
                verification_type_info(pool, info)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn annotation(pool: &ConstantPool, annotation: &Annotation, depth: usize) -> Result<()> {
    index(pool, annotation.type_index, "annotation")?;
    for pair in &annotation.element_value_pairs {
        index(pool, pair.element_name_index, "element_value_pairs")?;
        element_value(pool, &pair.value, depth)?;
    }
    Ok(())
}

fn type_annotation(pool: &ConstantPool, annotation: &TypeAnnotation, depth: usize) -> Result<()> {
    index(pool, annotation.type_index, "type_annotation")?;
    for pair in &annotation.element_value_pairs {
        index(pool, pair.element_name_index, "element_value_pairs")?;
        element_value(pool, &pair.value, depth)?;
    }
    Ok(())
}

fn element_value(pool: &ConstantPool, value: &ElementValue, depth: usize) -> Result<()> {
    match *value {
        ElementValue::Byte { const_value_index } |
        ElementValue::Char { const_value_index } |
        ElementValue::Double { const_value_index } |
        ElementValue::Float { const_value_index } |
        ElementValue::Int { const_value_index } |
        ElementValue::Long { const_value_index } |
        ElementValue::Short { const_value_index } |
        ElementValue::Boolean { const_value_index } |
        ElementValue::String { const_value_index } =>
            index(pool, const_value_index, "element_value"),
        ElementValue::Enum { type_name_index, const_name_index } => {
            index(pool, type_name_index, "element_value")?;
            index(pool, const_name_index, "element_value")
        }
        ElementValue::Class { class_info_index } => index(pool, class_info_index, "element_value"),
        ElementValue::Annotation { ref annotation_value } =>
            annotation(pool, annotation_value, deeper(depth)?),
        ElementValue::Array { ref values } => {
            let nested = deeper(depth)?;
            for v in values {
                element_value(pool, v, nested)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::class_file::attributes::{ExceptionTableEntry, MAX_NESTING_DEPTH};

    /// 1 "Foo", 2 Class #1, 3 "Code", 4 "()V", 5 "run", 6 Long, 8 "java/lang/Object",
    /// 9 Class #8
    fn foo() -> ClassFile {
        let mut class = ClassFile::new(52, 0);
        class.constant_pool = ConstantPool::from(vec![
            ConstantPoolInfo::utf8("Foo"),
            ConstantPoolInfo::Class { name_index: 1 },
            ConstantPoolInfo::utf8("Code"),
            ConstantPoolInfo::utf8("()V"),
            ConstantPoolInfo::utf8("run"),
            ConstantPoolInfo::long(1),
            ConstantPoolInfo::utf8("java/lang/Object"),
            ConstantPoolInfo::Class { name_index: 8 },
        ]);
        class.this_class = 2;
        class.super_class = 9;
        class
    }

    fn method(attribute: Attribute) -> MemberInfo {
        MemberInfo {
            access_flags: 0x0001,
            name_index: 5,
            descriptor_index: 4,
            attributes: vec![AttributeInfo { attribute_name_index: 3, attribute: attribute }],
        }
    }

    fn code(catch_type: constant_pool_index) -> Attribute {
        Attribute::Code {
            max_stack: 0,
            max_locals: 1,
            code: vec![0xB1],
            exception_table: vec![ExceptionTableEntry {
                start_pc: 0,
                end_pc: 1,
                handler_pc: 0,
                catch_type: catch_type,
            }],
            attributes: vec![],
        }
    }

    #[test]
    fn test_valid() {
        let mut class = foo();
        class.methods.push(method(code(0)));
        class.methods.push(method(code(9)));
        assert!(validate(&class).is_ok());
    }

    #[test]
    fn test_this_class_must_be_class() {
        let mut class = foo();
        class.this_class = 1;
        match validate(&class) {
            Err(Error::UnexpectedConstantPoolType { index: 1, expected: Tag::Class,
                                                    actual: Tag::Utf8, .. }) => {}
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn test_placeholder_slot_is_dangling() {
        let mut class = foo();
        class.interfaces.push(7);
        match validate(&class) {
            Err(Error::DanglingReference { index: 7, referrer: "interfaces" }) => {}
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn test_nested_code_reference() {
        let mut class = foo();
        class.methods.push(method(code(40)));
        match validate(&class) {
            Err(Error::DanglingReference { index: 40, referrer: "exception_table" }) => {}
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn test_pool_internal_reference() {
        let mut class = foo();
        class.constant_pool.push(ConstantPoolInfo::String { string_index: 2 });
        match validate(&class) {
            Err(Error::UnexpectedConstantPoolType { index: 2, expected: Tag::Utf8, .. }) => {}
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn test_method_handle_kind() {
        let mut class = foo();
        class.constant_pool.push(ConstantPoolInfo::NameAndType { name_index: 5, descriptor_index: 4 });
        class.constant_pool.push(ConstantPoolInfo::MethodRef { class_index: 2, name_and_type_index: 10 });
        class.constant_pool.push(ConstantPoolInfo::MethodHandle {
            reference_kind: ReferenceKind::InvokeStatic,
            reference_index: 11,
        });
        assert!(validate(&class).is_ok());

        class.constant_pool.push(ConstantPoolInfo::MethodHandle {
            reference_kind: ReferenceKind::GetField,
            reference_index: 11,
        });
        match validate(&class) {
            Err(Error::UnexpectedConstantPoolType { index: 11, expected: Tag::FieldRef,
                                                    actual: Tag::MethodRef, .. }) => {}
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn test_attribute_name_must_be_utf8() {
        let mut class = foo();
        class.attributes.push(AttributeInfo {
            attribute_name_index: 2,
            attribute: Attribute::Opaque { info: vec![] },
        });
        match validate(&class) {
            Err(Error::UnexpectedConstantPoolType { index: 2, referrer: "attribute_info", .. }) => {}
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn test_attribute_name_must_match_contents() {
        let mut class = foo();
        class.attributes.push(AttributeInfo {
            attribute_name_index: 3,
            attribute: Attribute::Opaque { info: vec![0x00, 0x01] },
        });
        assert!(validate(&class).is_ok());

        class.attributes.push(AttributeInfo {
            attribute_name_index: 1,
            attribute: Attribute::SourceFile { sourcefile_index: 1 },
        });
        match validate(&class) {
            Err(Error::AttributeNameMismatch { index: 1, expected: "SourceFile" }) => {}
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn test_nesting_limit() {
        fn nested(levels: usize) -> ClassFile {
            let mut value = ElementValue::Int { const_value_index: 1 };
            for _ in 0..levels {
                value = ElementValue::Array { values: vec![value] };
            }
            let mut class = foo();
            let name_index = class.constant_pool.push(ConstantPoolInfo::utf8("AnnotationDefault"));
            class.attributes.push(AttributeInfo {
                attribute_name_index: name_index as constant_pool_index,
                attribute: Attribute::AnnotationDefault { default_value: value },
            });
            class
        }

        assert!(validate(&nested(MAX_NESTING_DEPTH)).is_ok());
        match validate(&nested(MAX_NESTING_DEPTH + 1)) {
            Err(Error::NestingTooDeep { limit: MAX_NESTING_DEPTH }) => {}
            Err(e) => panic!("{}", e),
            Ok(()) => panic!("validated"),
        }
    }
}
