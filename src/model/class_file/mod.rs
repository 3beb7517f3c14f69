//! Structures for the [Java SE 17 JVM class file
//! format](https://docs.oracle.com/javase/specs/jvms/se17/html/jvms-4.html).
//!
//! Count fields (`constant_pool_count`, `interfaces_count`, ...) are not stored; each is the
//! length of the sequence it counts and is recomputed when the structure is written.

pub mod access_flags;
pub mod attributes;
pub mod constant_pool;

pub use self::access_flags::class_access_flags;
pub use self::access_flags::field_access_flags;
pub use self::access_flags::method_access_flags;
pub use self::attributes::{Attribute, AttributeInfo};
pub use self::constant_pool::ConstantPoolInfo;
pub use self::constant_pool::ConstantPool;

use crate::error::{Error, Result};

/// Represents an unsigned one-byte quantity.
#[allow(non_camel_case_types)]
pub type u1 = u8;

/// Represents an unsigned two-byte quantity.
#[allow(non_camel_case_types)]
pub type u2 = u16;

/// Represents an unsigned four-byte quantity.
#[allow(non_camel_case_types)]
pub type u4 = u32;

/// Represents an index into the constant pool.
#[allow(non_camel_case_types)]
pub type constant_pool_index = constant_pool::constant_pool_index;

/// The magic number that begins every class file.
pub const MAGIC: u4 = 0xCAFE_BABE;

/// A field or method. Both share the same layout in the class file; see `FieldInfo` and
/// `MethodInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    /// Mask of flags used to denote access permissions to and properties of this member. Fields
    /// use `field_access_flags`, methods use `method_access_flags`.
    pub access_flags: u2,
    /// A valid index into the `constant_pool` table. The `constant_pool` entry at that index
    /// must be a `ConstantPoolInfo::Utf8` structure representing a valid unqualified name.
    pub name_index: constant_pool_index,
    /// A valid index into the `constant_pool` table. The `constant_pool` entry at that index
    /// must be a `ConstantPoolInfo::Utf8` structure representing a valid field or method
    /// descriptor.
    pub descriptor_index: constant_pool_index,
    /// The attributes associated with this member.
    pub attributes: Vec<AttributeInfo>,
}

pub type FieldInfo = MemberInfo;
pub type MethodInfo = MemberInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
    /// Must be `MAGIC`. Writing a class file with any other value fails.
    pub magic: u4,
    /// Minor version number
    pub minor_version: u2,
    /// Major version number
    pub major_version: u2,
    /// Table of structures representing various string constants, class and
    /// interface names, field names, and other constants. The `constant_pool`
    /// table is indexed from 1 to `constant_pool_count - 1`.
    pub constant_pool: ConstantPool,
    /// Mask of flags used to denote access permissions to and properties of
    /// this class or interface. See `class_access_flags` for the
    /// interpretation of each flag.
    pub access_flags: class_access_flags::t,
    /// A valid index into the `constant_pool` table. The `constant_pool` entry
    /// at that index must be a `ConstantPoolInfo::Class` structure representing
    /// the class or interface defined by this class file.
    pub this_class: constant_pool_index,
    /// For a class, must be either zero or a valid index into the
    /// `constant_pool` table. If the value of `super_class` is non-zero, then
    /// the `constant_pool` entry at that index must be a `ConstantPoolInfo::Class`
    /// structure denoting the direct superclass of the class defined by this
    /// class file. Only `java/lang/Object` has a `super_class` of zero.
    pub super_class: constant_pool_index,
    /// Each value in `interfaces` must be a valid index into the `constant_pool`
    /// table. The `constant_pool` entry at each value of `interfaces[i]`, where
    /// `0 ≤ i < interfaces_count`, must be a `ConstantPoolInfo::Class` structure
    /// representing an interface that is a direct superinterface of this class
    /// or interface type, in the left-to-right order given in the source for
    /// the type.
    pub interfaces: Vec<constant_pool_index>,
    /// Contains only those fields declared by this class or interface. Does not
    /// include items representing fields that are inherited from superclasses
    /// or superinterfaces.
    pub fields: Vec<FieldInfo>,
    /// Contains only those methods declared by this class or interface. Does
    /// not include items representing methods that are inherited from
    /// superclasses or superinterfaces.
    pub methods: Vec<MethodInfo>,
    /// Contains the attributes of this class.
    pub attributes: Vec<AttributeInfo>,
}

impl ClassFile {
    /// Creates an empty class file of the given version with `MAGIC` set. The caller fills in
    /// the constant pool and the `this_class` index.
    pub fn new(major_version: u2, minor_version: u2) -> Self {
        ClassFile {
            magic: MAGIC,
            minor_version: minor_version,
            major_version: major_version,
            constant_pool: ConstantPool::new(),
            access_flags: 0,
            this_class: 0,
            super_class: 0,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// The pre-flight check run before a class file is written: only the magic number is
    /// verified. Use `validator::validate` for a full structural check.
    pub fn check(&self) -> Result<()> {
        if self.magic != MAGIC {
            return Err(Error::Magic { found: self.magic });
        }
        Ok(())
    }

    /// The internal binary name of this class, if `this_class` resolves to a `Class` entry
    /// whose name is a `Utf8` entry.
    pub fn this_class_name(&self) -> Option<&[u1]> {
        self.constant_pool.class_name(self.this_class)
    }
}
