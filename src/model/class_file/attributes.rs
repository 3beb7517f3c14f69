pub mod annotations;

use crate::error::Error;

use super::u1;
use super::u2;
use super::constant_pool_index;
use super::access_flags::inner_class_access_flags;
use super::access_flags::module_flags;
use super::access_flags::parameter_access_flags;

pub use self::annotations::{Annotation, ElementValue, ElementValuePair, TypeAnnotation};
pub use self::stack_map_frame::{StackMapFrame, VerificationTypeInfo};

/// How many levels attributes and element values may nest inside one another. Decoding and
/// validation both fail with `Error::NestingTooDeep` past this depth.
pub const MAX_NESTING_DEPTH: usize = 64;

/// The depth one level below `depth`.
pub(crate) fn deeper(depth: usize) -> Result<usize, Error> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(Error::NestingTooDeep { limit: MAX_NESTING_DEPTH });
    }
    Ok(depth + 1)
}

/// Names of the attributes that are decoded into structured `Attribute` variants.
pub mod names {
    pub const CONSTANT_VALUE: &[u8] = b"ConstantValue";
    pub const CODE: &[u8] = b"Code";
    pub const STACK_MAP_TABLE: &[u8] = b"StackMapTable";
    pub const EXCEPTIONS: &[u8] = b"Exceptions";
    pub const INNER_CLASSES: &[u8] = b"InnerClasses";
    pub const ENCLOSING_METHOD: &[u8] = b"EnclosingMethod";
    pub const SYNTHETIC: &[u8] = b"Synthetic";
    pub const SIGNATURE: &[u8] = b"Signature";
    pub const SOURCE_FILE: &[u8] = b"SourceFile";
    pub const SOURCE_DEBUG_EXTENSION: &[u8] = b"SourceDebugExtension";
    pub const LINE_NUMBER_TABLE: &[u8] = b"LineNumberTable";
    pub const LOCAL_VARIABLE_TABLE: &[u8] = b"LocalVariableTable";
    pub const LOCAL_VARIABLE_TYPE_TABLE: &[u8] = b"LocalVariableTypeTable";
    pub const DEPRECATED: &[u8] = b"Deprecated";
    pub const RUNTIME_VISIBLE_ANNOTATIONS: &[u8] = b"RuntimeVisibleAnnotations";
    pub const RUNTIME_INVISIBLE_ANNOTATIONS: &[u8] = b"RuntimeInvisibleAnnotations";
    pub const RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS: &[u8] = b"RuntimeVisibleParameterAnnotations";
    pub const RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS: &[u8] =
        b"RuntimeInvisibleParameterAnnotations";
    pub const RUNTIME_VISIBLE_TYPE_ANNOTATIONS: &[u8] = b"RuntimeVisibleTypeAnnotations";
    pub const RUNTIME_INVISIBLE_TYPE_ANNOTATIONS: &[u8] = b"RuntimeInvisibleTypeAnnotations";
    pub const ANNOTATION_DEFAULT: &[u8] = b"AnnotationDefault";
    pub const BOOTSTRAP_METHODS: &[u8] = b"BootstrapMethods";
    pub const METHOD_PARAMETERS: &[u8] = b"MethodParameters";
    pub const MODULE: &[u8] = b"Module";
    pub const MODULE_PACKAGES: &[u8] = b"ModulePackages";
    pub const MODULE_MAIN_CLASS: &[u8] = b"ModuleMainClass";
    pub const NEST_HOST: &[u8] = b"NestHost";
    pub const NEST_MEMBERS: &[u8] = b"NestMembers";
    pub const RECORD: &[u8] = b"Record";
    pub const PERMITTED_SUBCLASSES: &[u8] = b"PermittedSubclasses";
}

/// Each `ExceptionTableEntry` describes one exception handler in the `code`
/// array. The order of the handlers in an `exception_table` array is
/// significant (§2.10).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionTableEntry {
    /// Indicates the (inclusive) start of the range in the `code` array at
    /// which the exception handler is active. The exception handler is active
    /// in the range `[start_pc, end_pc)`.
    pub start_pc: u2,
    /// Indicates the (exclusive) end of the range in the `code` array at which
    /// the exception handler is active.
    pub end_pc: u2,
    /// The start of the exception handler.
    pub handler_pc: u2,
    /// If the value of the `catch_type` item is nonzero, it must be a valid
    /// index into the `constant_pool` table. The `constant_pool` entry at that
    /// index must be a `ConstantPoolInfo::Class` structure representing a class
    /// of exceptions that this exception handler is designated to catch. Zero
    /// catches everything.
    pub catch_type: constant_pool_index,
}

pub mod stack_map_frame {
    use super::super::u1;
    use super::super::u2;
    use super::super::constant_pool_index;

    pub mod verification_type_info {
        use super::super::super::u1;

        pub const TOP: u1 = 0;
        pub const INTEGER: u1 = 1;
        pub const FLOAT: u1 = 2;
        pub const DOUBLE: u1 = 3;
        pub const LONG: u1 = 4;
        pub const NULL: u1 = 5;
        pub const UNINITIALIZED_THIS: u1 = 6;
        pub const OBJECT: u1 = 7;
        pub const UNINITIALIZED: u1 = 8;
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum VerificationTypeInfo {
        Top,
        Integer,
        Float,
        Long,
        Double,
        Null,
        UninitializedThis,
        Object { class_index: constant_pool_index },
        Uninitialized {
            /// The offset in the `code` array of the `Code` attribute that contains
            /// this `StackMapTable` attribute, of the _new_ instruction that
            /// created the object stored in the location.
            offset: u2,
        },
    }

    /// A `StackMapFrame` variant stores a relative bytecode offset, the
    /// verification types (§4.10.1.2) for the local variables, and the verification
    /// types for the operand stack. Each variant stores a bytecode offset _relative
    /// to the previous_ `StackMapFrame`. The actual bytecode offset can be
    /// calculated as described in (§4.7.4).
    ///
    /// Where the class file packs part of a frame into its `frame_type` byte, the
    /// unpacked value is stored: `SameFrame` and `SameLocals1StackItemFrame` hold an
    /// `offset_delta` in `0..=63`, `ChopFrame` holds `num_chopped` in `1..=3`, and
    /// `AppendFrame` holds between one and three `locals`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StackMapFrame {
        SameFrame { offset_delta: u1 },
        SameLocals1StackItemFrame { offset_delta: u1, stack_item: VerificationTypeInfo },
        SameLocals1StackItemFrameExtended { offset_delta: u2, stack_item: VerificationTypeInfo },
        ChopFrame { offset_delta: u2, num_chopped: u1 },
        SameFrameExtended { offset_delta: u2 },
        AppendFrame { offset_delta: u2, locals: Vec<VerificationTypeInfo> },
        FullFrame {
            offset_delta: u2,
            locals: Vec<VerificationTypeInfo>,
            stack: Vec<VerificationTypeInfo>,
        },
    }

    #[derive(Debug, PartialEq)]
    pub enum Tag {
        SameFrame(u1),
        SameLocals1StackItemFrame(u1),
        SameLocals1StackItemFrameExtended(u1),
        ChopFrame(u1),
        SameFrameExtended(u1),
        AppendFrame(u1),
        FullFrame(u1),
        Reserved(u1),
    }

    impl From<u1> for Tag {
        fn from(t: u1) -> Self {
            match t {
                0..=63 => Tag::SameFrame(t),
                64..=127 => Tag::SameLocals1StackItemFrame(t),
                128..=246 => Tag::Reserved(t),
                247 => Tag::SameLocals1StackItemFrameExtended(t),
                248..=250 => Tag::ChopFrame(t),
                251 => Tag::SameFrameExtended(t),
                252..=254 => Tag::AppendFrame(t),
                255 => Tag::FullFrame(t),
            }
        }
    }

    impl StackMapFrame {
        /// The `frame_type` byte this frame is written with, or `None` if a packed value is
        /// out of range for its frame kind.
        pub fn frame_type(&self) -> Option<u1> {
            match *self {
                StackMapFrame::SameFrame { offset_delta } if offset_delta <= 63 =>
                    Some(offset_delta),
                StackMapFrame::SameLocals1StackItemFrame { offset_delta, .. }
                    if offset_delta <= 63 => Some(64 + offset_delta),
                StackMapFrame::SameLocals1StackItemFrameExtended { .. } => Some(247),
                StackMapFrame::ChopFrame { num_chopped, .. } if num_chopped >= 1 && num_chopped <= 3 =>
                    Some(251 - num_chopped),
                StackMapFrame::SameFrameExtended { .. } => Some(251),
                StackMapFrame::AppendFrame { ref locals, .. } if locals.len() >= 1 && locals.len() <= 3 =>
                    Some(251 + locals.len() as u1),
                StackMapFrame::FullFrame { .. } => Some(255),
                _ => None,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapMethod {
    /// An index into the `constant_pool` to a `ConstantPoolInfo::MethodHandle` structure.
    pub bootstrap_method_ref: constant_pool_index,
    /// The indices into the `constant_pool` of loadable constants passed to the
    /// bootstrap method.
    pub bootstrap_arguments: Vec<constant_pool_index>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClass {
    pub inner_class_info_index: constant_pool_index,
    /// Zero if the inner class is not a member of a class or interface.
    pub outer_class_info_index: constant_pool_index,
    /// Zero if the inner class is anonymous.
    pub inner_name_index: constant_pool_index,
    pub inner_class_access_flags: inner_class_access_flags::t,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Zero if the formal parameter has no name.
    pub name_index: constant_pool_index,
    pub access_flags: parameter_access_flags::t,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNumberInfo {
    pub start_pc: u2,
    pub line_number: u2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariableInfo {
    pub start_pc: u2,
    pub length: u2,
    pub name_index: constant_pool_index,
    pub descriptor_index: constant_pool_index,
    pub index: u2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariableTypeInfo {
    pub start_pc: u2,
    pub length: u2,
    pub name_index: constant_pool_index,
    pub signature_index: constant_pool_index,
    pub index: u2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRequires {
    /// A `ConstantPoolInfo::Module` entry.
    pub requires_index: constant_pool_index,
    pub requires_flags: module_flags::t,
    /// Zero if no version information is present.
    pub requires_version_index: constant_pool_index,
}

/// An `exports` or `opens` entry of a `Module` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePackageAccess {
    /// A `ConstantPoolInfo::Package` entry.
    pub package_index: constant_pool_index,
    pub flags: module_flags::t,
    /// `ConstantPoolInfo::Module` entries. An empty list means the package is unqualified.
    pub to_index: Vec<constant_pool_index>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleProvides {
    /// The service interface, a `ConstantPoolInfo::Class` entry.
    pub provides_index: constant_pool_index,
    /// The implementations, `ConstantPoolInfo::Class` entries.
    pub provides_with_index: Vec<constant_pool_index>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordComponentInfo {
    pub name_index: constant_pool_index,
    pub descriptor_index: constant_pool_index,
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    ConstantValue { constant_value_index: constant_pool_index },
    Code {
        max_stack: u2,
        max_locals: u2,
        code: Vec<u1>,
        exception_table: Vec<ExceptionTableEntry>,
        attributes: Vec<AttributeInfo>,
    },
    StackMapTable {
        entries: Vec<StackMapFrame>,
    },
    Exceptions {
        /// Contains indices into the `constant_pool` table for the class type
        /// that the method is declared to throw.
        exception_index_table: Vec<constant_pool_index>,
    },
    InnerClasses {
        classes: Vec<InnerClass>,
    },
    EnclosingMethod {
        class_index: constant_pool_index,
        /// Zero if the class is not immediately enclosed by a method or constructor.
        method_index: constant_pool_index,
    },
    Synthetic,
    Signature {
        /// A valid index into the `constant_pool` table for a `ConstantPoolInfo::Utf8` structure.
        signature_index: constant_pool_index,
    },
    SourceFile {
        sourcefile_index: constant_pool_index,
    },
    SourceDebugExtension {
        debug_extension: Vec<u1>,
    },
    LineNumberTable {
        line_number_table: Vec<LineNumberInfo>,
    },
    LocalVariableTable {
        local_variable_table: Vec<LocalVariableInfo>,
    },
    LocalVariableTypeTable {
        local_variable_type_table: Vec<LocalVariableTypeInfo>,
    },
    Deprecated,
    RuntimeVisibleAnnotations {
        annotations: Vec<Annotation>,
    },
    RuntimeInvisibleAnnotations {
        annotations: Vec<Annotation>,
    },
    RuntimeVisibleParameterAnnotations {
        parameter_annotations: Vec<Vec<Annotation>>,
    },
    RuntimeInvisibleParameterAnnotations {
        parameter_annotations: Vec<Vec<Annotation>>,
    },
    RuntimeVisibleTypeAnnotations {
        annotations: Vec<TypeAnnotation>,
    },
    RuntimeInvisibleTypeAnnotations {
        annotations: Vec<TypeAnnotation>,
    },
    AnnotationDefault {
        default_value: ElementValue,
    },
    BootstrapMethods {
        bootstrap_methods: Vec<BootstrapMethod>,
    },
    MethodParameters {
        parameters: Vec<Parameter>,
    },
    Module {
        module_name_index: constant_pool_index,
        module_flags: module_flags::t,
        /// Zero if no version information is present.
        module_version_index: constant_pool_index,
        requires: Vec<ModuleRequires>,
        exports: Vec<ModulePackageAccess>,
        opens: Vec<ModulePackageAccess>,
        uses_index: Vec<constant_pool_index>,
        provides: Vec<ModuleProvides>,
    },
    ModulePackages {
        package_index: Vec<constant_pool_index>,
    },
    ModuleMainClass {
        main_class_index: constant_pool_index,
    },
    NestHost {
        host_class_index: constant_pool_index,
    },
    NestMembers {
        classes: Vec<constant_pool_index>,
    },
    Record {
        components: Vec<RecordComponentInfo>,
    },
    PermittedSubclasses {
        classes: Vec<constant_pool_index>,
    },

    /// An attribute kept as raw bytes: either its name is not one of `names`, or its payload
    /// could not be decoded. Written back byte for byte.
    Opaque {
        info: Vec<u1>,
    },
}

impl Attribute {
    /// The attribute name that selects this variant, or `None` for `Opaque`.
    pub fn name(&self) -> Option<&'static [u8]> {
        let name = match *self {
            Attribute::ConstantValue { .. } => names::CONSTANT_VALUE,
            Attribute::Code { .. } => names::CODE,
            Attribute::StackMapTable { .. } => names::STACK_MAP_TABLE,
            Attribute::Exceptions { .. } => names::EXCEPTIONS,
            Attribute::InnerClasses { .. } => names::INNER_CLASSES,
            Attribute::EnclosingMethod { .. } => names::ENCLOSING_METHOD,
            Attribute::Synthetic => names::SYNTHETIC,
            Attribute::Signature { .. } => names::SIGNATURE,
            Attribute::SourceFile { .. } => names::SOURCE_FILE,
            Attribute::SourceDebugExtension { .. } => names::SOURCE_DEBUG_EXTENSION,
            Attribute::LineNumberTable { .. } => names::LINE_NUMBER_TABLE,
            Attribute::LocalVariableTable { .. } => names::LOCAL_VARIABLE_TABLE,
            Attribute::LocalVariableTypeTable { .. } => names::LOCAL_VARIABLE_TYPE_TABLE,
            Attribute::Deprecated => names::DEPRECATED,
            Attribute::RuntimeVisibleAnnotations { .. } => names::RUNTIME_VISIBLE_ANNOTATIONS,
            Attribute::RuntimeInvisibleAnnotations { .. } => names::RUNTIME_INVISIBLE_ANNOTATIONS,
            Attribute::RuntimeVisibleParameterAnnotations { .. } =>
                names::RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS,
            Attribute::RuntimeInvisibleParameterAnnotations { .. } =>
                names::RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS,
            Attribute::RuntimeVisibleTypeAnnotations { .. } =>
                names::RUNTIME_VISIBLE_TYPE_ANNOTATIONS,
            Attribute::RuntimeInvisibleTypeAnnotations { .. } =>
                names::RUNTIME_INVISIBLE_TYPE_ANNOTATIONS,
            Attribute::AnnotationDefault { .. } => names::ANNOTATION_DEFAULT,
            Attribute::BootstrapMethods { .. } => names::BOOTSTRAP_METHODS,
            Attribute::MethodParameters { .. } => names::METHOD_PARAMETERS,
            Attribute::Module { .. } => names::MODULE,
            Attribute::ModulePackages { .. } => names::MODULE_PACKAGES,
            Attribute::ModuleMainClass { .. } => names::MODULE_MAIN_CLASS,
            Attribute::NestHost { .. } => names::NEST_HOST,
            Attribute::NestMembers { .. } => names::NEST_MEMBERS,
            Attribute::Record { .. } => names::RECORD,
            Attribute::PermittedSubclasses { .. } => names::PERMITTED_SUBCLASSES,
            Attribute::Opaque { .. } => return None,
        };
        Some(name)
    }
}

/// An attribute together with the constant pool index of its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    /// A valid index into the `constant_pool` table. The `constant_pool`
    /// entry at that index must be a valid `ConstantPoolInfo::Utf8`
    /// structure representing the name of the attribute.
    pub attribute_name_index: constant_pool_index,
    pub attribute: Attribute,
}
