//! Every structured attribute, written out and read back.

use classfile::codec::{self, DecodeOptions, EncodeOptions};
use classfile::model::class_file::attributes::annotations::{Annotation, ElementValue,
                                                            ElementValuePair,
                                                            LocalVariableTargetInfo, TargetInfo,
                                                            TypeAnnotation, TypePath,
                                                            TypePathPart};
use classfile::model::class_file::attributes::{names, Attribute, AttributeInfo, BootstrapMethod,
                                               ExceptionTableEntry, InnerClass, LineNumberInfo,
                                               LocalVariableInfo, LocalVariableTypeInfo,
                                               ModulePackageAccess, ModuleProvides,
                                               ModuleRequires, Parameter, RecordComponentInfo,
                                               StackMapFrame, VerificationTypeInfo};
use classfile::model::class_file::constant_pool::ReferenceKind;
use classfile::model::class_file::{ClassFile, ConstantPoolInfo, MemberInfo};
use classfile::Error;

const FOO: u16 = 1;
const FOO_CLASS: u16 = 2;
const OBJECT_CLASS: u16 = 4;
const DESCRIPTOR: u16 = 5;
const RUN: u16 = 6;
const INT_42: u16 = 7;
const NAME_AND_TYPE: u16 = 8;
const METHOD_REF: u16 = 9;
const HANDLE: u16 = 10;
const MODULE: u16 = 12;
const PACKAGE: u16 = 13;

const NAMES: [&[u8]; 30] = [
    names::CONSTANT_VALUE,
    names::CODE,
    names::STACK_MAP_TABLE,
    names::EXCEPTIONS,
    names::INNER_CLASSES,
    names::ENCLOSING_METHOD,
    names::SYNTHETIC,
    names::SIGNATURE,
    names::SOURCE_FILE,
    names::SOURCE_DEBUG_EXTENSION,
    names::LINE_NUMBER_TABLE,
    names::LOCAL_VARIABLE_TABLE,
    names::LOCAL_VARIABLE_TYPE_TABLE,
    names::DEPRECATED,
    names::RUNTIME_VISIBLE_ANNOTATIONS,
    names::RUNTIME_INVISIBLE_ANNOTATIONS,
    names::RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS,
    names::RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS,
    names::RUNTIME_VISIBLE_TYPE_ANNOTATIONS,
    names::RUNTIME_INVISIBLE_TYPE_ANNOTATIONS,
    names::ANNOTATION_DEFAULT,
    names::BOOTSTRAP_METHODS,
    names::METHOD_PARAMETERS,
    names::MODULE,
    names::MODULE_PACKAGES,
    names::MODULE_MAIN_CLASS,
    names::NEST_HOST,
    names::NEST_MEMBERS,
    names::RECORD,
    names::PERMITTED_SUBCLASSES,
];

/// `Foo extends java/lang/Object`, with the constants above followed by every attribute name.
fn base() -> ClassFile {
    let mut class = ClassFile::new(61, 0);
    let entries = vec![
        ConstantPoolInfo::utf8("Foo"),
        ConstantPoolInfo::Class { name_index: FOO },
        ConstantPoolInfo::utf8("java/lang/Object"),
        ConstantPoolInfo::Class { name_index: 3 },
        ConstantPoolInfo::utf8("()V"),
        ConstantPoolInfo::utf8("run"),
        ConstantPoolInfo::Integer { bytes: 42 },
        ConstantPoolInfo::NameAndType { name_index: RUN, descriptor_index: DESCRIPTOR },
        ConstantPoolInfo::MethodRef { class_index: FOO_CLASS, name_and_type_index: NAME_AND_TYPE },
        ConstantPoolInfo::MethodHandle {
            reference_kind: ReferenceKind::InvokeStatic,
            reference_index: METHOD_REF,
        },
        ConstantPoolInfo::utf8("foo.module"),
        ConstantPoolInfo::Module { name_index: 11 },
        ConstantPoolInfo::Package { name_index: FOO },
    ];
    for entry in entries {
        class.constant_pool.push(entry);
    }
    for &name in NAMES.iter() {
        class.constant_pool.push(ConstantPoolInfo::Utf8 { bytes: name.to_vec() });
    }
    class.this_class = FOO_CLASS;
    class.super_class = OBJECT_CLASS;
    class
}

/// Wraps `attribute`, naming it by the `Utf8` entry that holds its name.
fn info(class: &ClassFile, attribute: Attribute) -> AttributeInfo {
    let name = attribute.name().expect("structured attribute");
    let (index, _) = class.constant_pool.entries()
        .find(|&(_, entry)| *entry == ConstantPoolInfo::Utf8 { bytes: name.to_vec() })
        .expect("attribute name in the constant pool");
    AttributeInfo { attribute_name_index: index as u16, attribute: attribute }
}

fn pair(value: ElementValue) -> ElementValuePair {
    ElementValuePair { element_name_index: RUN, value: value }
}

fn annotation() -> Annotation {
    Annotation {
        type_index: FOO,
        element_value_pairs: vec![
            pair(ElementValue::Int { const_value_index: INT_42 }),
            pair(ElementValue::Enum { type_name_index: FOO, const_name_index: RUN }),
            pair(ElementValue::Array {
                values: vec![
                    ElementValue::Class { class_info_index: DESCRIPTOR },
                    ElementValue::String { const_value_index: FOO },
                    ElementValue::Annotation {
                        annotation_value: Annotation { type_index: FOO, element_value_pairs: vec![] },
                    },
                ],
            }),
        ],
    }
}

fn type_annotation(target_type: u8, target_info: TargetInfo) -> TypeAnnotation {
    TypeAnnotation {
        target_type: target_type,
        target_info: target_info,
        target_path: TypePath {
            path: vec![TypePathPart { type_path_kind: 3, type_argument_index: 0 },
                       TypePathPart { type_path_kind: 0, type_argument_index: 0 }],
        },
        type_index: FOO,
        element_value_pairs: vec![pair(ElementValue::Char { const_value_index: INT_42 })],
    }
}

fn code(class: &ClassFile) -> Attribute {
    use VerificationTypeInfo::*;

    let stack_map_table = Attribute::StackMapTable {
        entries: vec![
            StackMapFrame::SameFrame { offset_delta: 4 },
            StackMapFrame::SameLocals1StackItemFrame {
                offset_delta: 63,
                stack_item: Object { class_index: OBJECT_CLASS },
            },
            StackMapFrame::SameLocals1StackItemFrameExtended {
                offset_delta: 300,
                stack_item: Uninitialized { offset: 0 },
            },
            StackMapFrame::ChopFrame { offset_delta: 1, num_chopped: 3 },
            StackMapFrame::SameFrameExtended { offset_delta: 64 },
            StackMapFrame::AppendFrame { offset_delta: 2, locals: vec![Integer, Float, Long] },
            StackMapFrame::FullFrame {
                offset_delta: 7,
                locals: vec![UninitializedThis, Double, Top],
                stack: vec![Null, Object { class_index: FOO_CLASS }],
            },
        ],
    };
    Attribute::Code {
        max_stack: 2,
        max_locals: 3,
        code: vec![0x2A, 0xB7, 0x00, 0x09, 0xB1],
        exception_table: vec![
            ExceptionTableEntry { start_pc: 0, end_pc: 4, handler_pc: 4, catch_type: OBJECT_CLASS },
            ExceptionTableEntry { start_pc: 0, end_pc: 4, handler_pc: 4, catch_type: 0 },
        ],
        attributes: vec![
            info(class, stack_map_table),
            info(class, Attribute::LineNumberTable {
                line_number_table: vec![LineNumberInfo { start_pc: 0, line_number: 1 },
                                        LineNumberInfo { start_pc: 4, line_number: 2 }],
            }),
            info(class, Attribute::LocalVariableTable {
                local_variable_table: vec![LocalVariableInfo {
                    start_pc: 0,
                    length: 5,
                    name_index: RUN,
                    descriptor_index: DESCRIPTOR,
                    index: 0,
                }],
            }),
            info(class, Attribute::LocalVariableTypeTable {
                local_variable_type_table: vec![LocalVariableTypeInfo {
                    start_pc: 0,
                    length: 5,
                    name_index: RUN,
                    signature_index: DESCRIPTOR,
                    index: 0,
                }],
            }),
        ],
    }
}

/// One or more values for every recognized attribute.
fn table(class: &ClassFile) -> Vec<Attribute> {
    vec![
        Attribute::ConstantValue { constant_value_index: INT_42 },
        code(class),
        Attribute::Exceptions { exception_index_table: vec![OBJECT_CLASS, FOO_CLASS] },
        Attribute::InnerClasses {
            classes: vec![
                InnerClass {
                    inner_class_info_index: FOO_CLASS,
                    outer_class_info_index: OBJECT_CLASS,
                    inner_name_index: FOO,
                    inner_class_access_flags: 0x0009,
                },
                InnerClass {
                    inner_class_info_index: FOO_CLASS,
                    outer_class_info_index: 0,
                    inner_name_index: 0,
                    inner_class_access_flags: 0x1000,
                },
            ],
        },
        Attribute::EnclosingMethod { class_index: OBJECT_CLASS, method_index: NAME_AND_TYPE },
        Attribute::EnclosingMethod { class_index: OBJECT_CLASS, method_index: 0 },
        Attribute::Synthetic,
        Attribute::Signature { signature_index: DESCRIPTOR },
        Attribute::SourceFile { sourcefile_index: FOO },
        Attribute::SourceDebugExtension { debug_extension: b"SMAP\nFoo.java\nJava\n".to_vec() },
        Attribute::SourceDebugExtension { debug_extension: vec![] },
        Attribute::Deprecated,
        Attribute::RuntimeVisibleAnnotations { annotations: vec![annotation()] },
        Attribute::RuntimeInvisibleAnnotations { annotations: vec![] },
        Attribute::RuntimeVisibleParameterAnnotations {
            parameter_annotations: vec![vec![annotation()], vec![]],
        },
        Attribute::RuntimeInvisibleParameterAnnotations { parameter_annotations: vec![] },
        Attribute::RuntimeVisibleTypeAnnotations {
            annotations: vec![
                type_annotation(0x00, TargetInfo::TypeParameter { type_parameter_index: 1 }),
                type_annotation(0x10, TargetInfo::Supertype { supertype_index: 0xFFFF }),
                type_annotation(0x11, TargetInfo::TypeParameterBound {
                    type_parameter_index: 0,
                    bound_index: 1,
                }),
                type_annotation(0x13, TargetInfo::Empty),
                type_annotation(0x16, TargetInfo::FormalParameter { formal_parameter_index: 2 }),
                type_annotation(0x17, TargetInfo::Throws { throws_type_index: 0 }),
            ],
        },
        Attribute::RuntimeInvisibleTypeAnnotations {
            annotations: vec![
                type_annotation(0x40, TargetInfo::LocalVariable {
                    table: vec![LocalVariableTargetInfo { start_pc: 0, length: 5, index: 1 },
                                LocalVariableTargetInfo { start_pc: 2, length: 3, index: 2 }],
                }),
                type_annotation(0x42, TargetInfo::Catch { exception_table_index: 0 }),
                type_annotation(0x43, TargetInfo::Offset { offset: 4 }),
                type_annotation(0x47, TargetInfo::TypeArgument { offset: 4, type_argument_index: 0 }),
            ],
        },
        Attribute::AnnotationDefault {
            default_value: ElementValue::Array {
                values: vec![
                    ElementValue::Byte { const_value_index: INT_42 },
                    ElementValue::Short { const_value_index: INT_42 },
                    ElementValue::Boolean { const_value_index: INT_42 },
                    ElementValue::Array { values: vec![] },
                ],
            },
        },
        Attribute::BootstrapMethods {
            bootstrap_methods: vec![BootstrapMethod {
                bootstrap_method_ref: HANDLE,
                bootstrap_arguments: vec![INT_42, FOO_CLASS],
            }],
        },
        Attribute::MethodParameters {
            parameters: vec![Parameter { name_index: RUN, access_flags: 0x0010 },
                             Parameter { name_index: 0, access_flags: 0x1000 }],
        },
        Attribute::Module {
            module_name_index: MODULE,
            module_flags: 0x0020,
            module_version_index: 0,
            requires: vec![ModuleRequires {
                requires_index: MODULE,
                requires_flags: 0x8000,
                requires_version_index: FOO,
            }],
            exports: vec![ModulePackageAccess {
                package_index: PACKAGE,
                flags: 0,
                to_index: vec![MODULE],
            }],
            opens: vec![ModulePackageAccess { package_index: PACKAGE, flags: 0, to_index: vec![] }],
            uses_index: vec![FOO_CLASS],
            provides: vec![ModuleProvides {
                provides_index: FOO_CLASS,
                provides_with_index: vec![OBJECT_CLASS],
            }],
        },
        Attribute::ModulePackages { package_index: vec![PACKAGE] },
        Attribute::ModuleMainClass { main_class_index: FOO_CLASS },
        Attribute::NestHost { host_class_index: OBJECT_CLASS },
        Attribute::NestMembers { classes: vec![FOO_CLASS, OBJECT_CLASS] },
        Attribute::Record {
            components: vec![
                RecordComponentInfo {
                    name_index: RUN,
                    descriptor_index: DESCRIPTOR,
                    attributes: vec![
                        info(class, Attribute::Signature { signature_index: DESCRIPTOR }),
                        info(class, Attribute::RuntimeVisibleAnnotations {
                            annotations: vec![annotation()],
                        }),
                    ],
                },
                RecordComponentInfo { name_index: FOO, descriptor_index: DESCRIPTOR, attributes: vec![] },
            ],
        },
        Attribute::PermittedSubclasses { classes: vec![FOO_CLASS] },
    ]
}

/// The names of `attributes` and of the attributes nested inside them.
fn collect_names(attributes: &[AttributeInfo], out: &mut Vec<&'static [u8]>) {
    for info in attributes {
        out.extend(info.attribute.name());
        match info.attribute {
            Attribute::Code { ref attributes, .. } => collect_names(attributes, out),
            Attribute::Record { ref components } => {
                for component in components {
                    collect_names(&component.attributes, out);
                }
            }
            _ => {}
        }
    }
}

#[test]
fn test_table_covers_every_name() {
    let class = base();
    let attributes: Vec<AttributeInfo> = table(&class).into_iter()
        .map(|attribute| info(&class, attribute))
        .collect();
    let mut found = Vec::new();
    collect_names(&attributes, &mut found);
    found.sort();
    found.dedup();
    let mut expected = NAMES.to_vec();
    expected.sort();
    assert_eq!(found, expected);
}

/// Encodes `class` with validation, decodes it back, and checks both directions.
fn assert_round_trips(class: &ClassFile, what: &str) {
    let bytes = codec::encode_with(class, &EncodeOptions { validate: true })
        .unwrap_or_else(|e| panic!("{}: {}", what, e));
    let strict = DecodeOptions { strict_attributes: true, ..DecodeOptions::default() };
    let decoded = codec::decode_with(&bytes, &strict)
        .unwrap_or_else(|e| panic!("{}: {}", what, e));
    assert!(decoded.is_valid(), "{}: {:?}", what, decoded.validation);
    assert_eq!(&decoded.class_file, class, "{}", what);
    assert_eq!(decoded.class_file.to_bytes().unwrap(), bytes, "{}", what);
}

#[test]
fn test_each_attribute_round_trips() {
    let base = base();
    for attribute in table(&base) {
        let what = format!("{:?}", attribute.name().map(String::from_utf8_lossy));
        let mut class = base.clone();
        let attribute = info(&class, attribute);
        class.attributes.push(attribute);
        assert_round_trips(&class, &what);
    }
}

#[test]
fn test_all_attributes_round_trip_together() {
    let mut class = base();
    let attributes: Vec<AttributeInfo> = table(&class).into_iter()
        .map(|attribute| info(&class, attribute))
        .collect();
    class.attributes = attributes.clone();
    class.fields.push(MemberInfo {
        access_flags: 0x0019,
        name_index: RUN,
        descriptor_index: DESCRIPTOR,
        attributes: vec![info(&class, Attribute::ConstantValue { constant_value_index: INT_42 })],
    });
    class.methods.push(MemberInfo {
        access_flags: 0x0001,
        name_index: RUN,
        descriptor_index: DESCRIPTOR,
        attributes: attributes,
    });
    assert_round_trips(&class, "all attributes");
}

#[test]
fn test_attribute_named_by_another_name() {
    // #3 "Custom" names a SourceFile attribute.
    let mut class = ClassFile::new(52, 0);
    class.constant_pool.push(ConstantPoolInfo::utf8("Foo"));
    class.constant_pool.push(ConstantPoolInfo::Class { name_index: 1 });
    class.constant_pool.push(ConstantPoolInfo::utf8("Custom"));
    class.this_class = 2;
    class.attributes.push(AttributeInfo {
        attribute_name_index: 3,
        attribute: Attribute::SourceFile { sourcefile_index: 1 },
    });

    match codec::encode_with(&class, &EncodeOptions { validate: true }) {
        Err(Error::AttributeNameMismatch { index: 3, expected: "SourceFile" }) => {}
        r => panic!("{:?}", r),
    }

    // Written without validation it reads back as raw bytes.
    let bytes = codec::encode(&class).unwrap();
    let decoded = codec::decode(&bytes).unwrap();
    assert_eq!(decoded.class_file.attributes[0].attribute,
               Attribute::Opaque { info: vec![0x00, 0x01] });
}
