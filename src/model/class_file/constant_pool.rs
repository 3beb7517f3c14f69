use super::u1;
use super::u2;
use super::u4;
use crate::error::Error;
use crate::util::OneIndexedVec;

#[allow(non_camel_case_types)]
pub type constant_pool_index = u2;

pub mod tags {
    use super::super::u1;
    pub const UTF_8: u1 = 1;
    pub const INTEGER: u1 = 3;
    pub const FLOAT: u1 = 4;
    pub const LONG: u1 = 5;
    pub const DOUBLE: u1 = 6;
    pub const CLASS: u1 = 7;
    pub const STRING: u1 = 8;
    pub const FIELD_REF: u1 = 9;
    pub const METHOD_REF: u1 = 10;
    pub const INTERFACE_METHOD_REF: u1 = 11;
    pub const NAME_AND_TYPE: u1 = 12;
    pub const METHOD_HANDLE: u1 = 15;
    pub const METHOD_TYPE: u1 = 16;
    pub const DYNAMIC: u1 = 17;
    pub const INVOKE_DYNAMIC: u1 = 18;
    pub const MODULE: u1 = 19;
    pub const PACKAGE: u1 = 20;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Utf8,
    Integer,
    Float,
    Long,
    Double,
    Class,
    String,
    FieldRef,
    MethodRef,
    InterfaceMethodRef,
    NameAndType,
    MethodHandle,
    MethodType,
    Dynamic,
    InvokeDynamic,
    Module,
    Package,
    Unknown(u1),
}

impl Tag {
    /// Whether an entry with this tag takes up two slots in the constant pool.
    pub fn is_double_slot(self) -> bool {
        self == Tag::Long || self == Tag::Double
    }
}

impl From<u1> for Tag {
    fn from(tag: u1) -> Self {
        match tag {
            tags::UTF_8 => Tag::Utf8,
            tags::INTEGER => Tag::Integer,
            tags::FLOAT => Tag::Float,
            tags::LONG => Tag::Long,
            tags::DOUBLE => Tag::Double,
            tags::CLASS => Tag::Class,
            tags::STRING => Tag::String,
            tags::FIELD_REF => Tag::FieldRef,
            tags::METHOD_REF => Tag::MethodRef,
            tags::INTERFACE_METHOD_REF => Tag::InterfaceMethodRef,
            tags::NAME_AND_TYPE => Tag::NameAndType,
            tags::METHOD_HANDLE => Tag::MethodHandle,
            tags::METHOD_TYPE => Tag::MethodType,
            tags::DYNAMIC => Tag::Dynamic,
            tags::INVOKE_DYNAMIC => Tag::InvokeDynamic,
            tags::MODULE => Tag::Module,
            tags::PACKAGE => Tag::Package,
            _ => Tag::Unknown(tag),
        }
    }
}

impl From<Tag> for u1 {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Utf8 => tags::UTF_8,
            Tag::Integer => tags::INTEGER,
            Tag::Float => tags::FLOAT,
            Tag::Long => tags::LONG,
            Tag::Double => tags::DOUBLE,
            Tag::Class => tags::CLASS,
            Tag::String => tags::STRING,
            Tag::FieldRef => tags::FIELD_REF,
            Tag::MethodRef => tags::METHOD_REF,
            Tag::InterfaceMethodRef => tags::INTERFACE_METHOD_REF,
            Tag::NameAndType => tags::NAME_AND_TYPE,
            Tag::MethodHandle => tags::METHOD_HANDLE,
            Tag::MethodType => tags::METHOD_TYPE,
            Tag::Dynamic => tags::DYNAMIC,
            Tag::InvokeDynamic => tags::INVOKE_DYNAMIC,
            Tag::Module => tags::MODULE,
            Tag::Package => tags::PACKAGE,
            Tag::Unknown(t) => t,
        }
    }
}

/// The kind of a `ConstantPoolInfo::MethodHandle`, which determines the bytecode behavior of
/// the handle (§5.4.3.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    GetField,
    GetStatic,
    PutField,
    PutStatic,
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

impl TryFrom<u1> for ReferenceKind {
    type Error = Error;

    fn try_from(kind: u1) -> Result<Self, Error> {
        match kind {
            1 => Ok(ReferenceKind::GetField),
            2 => Ok(ReferenceKind::GetStatic),
            3 => Ok(ReferenceKind::PutField),
            4 => Ok(ReferenceKind::PutStatic),
            5 => Ok(ReferenceKind::InvokeVirtual),
            6 => Ok(ReferenceKind::InvokeStatic),
            7 => Ok(ReferenceKind::InvokeSpecial),
            8 => Ok(ReferenceKind::NewInvokeSpecial),
            9 => Ok(ReferenceKind::InvokeInterface),
            _ => Err(Error::UnknownReferenceKind { kind: kind }),
        }
    }
}

impl From<ReferenceKind> for u1 {
    fn from(kind: ReferenceKind) -> Self {
        match kind {
            ReferenceKind::GetField => 1,
            ReferenceKind::GetStatic => 2,
            ReferenceKind::PutField => 3,
            ReferenceKind::PutStatic => 4,
            ReferenceKind::InvokeVirtual => 5,
            ReferenceKind::InvokeStatic => 6,
            ReferenceKind::InvokeSpecial => 7,
            ReferenceKind::NewInvokeSpecial => 8,
            ReferenceKind::InvokeInterface => 9,
        }
    }
}

/// One entry of the constant pool. `Float` and `Double` keep their raw bits so that every bit
/// pattern, NaNs included, is written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantPoolInfo {
    /// Modified UTF-8 bytes. The contents are not checked.
    Utf8 { bytes: Vec<u1> },
    Integer { bytes: u4 },
    Float { bytes: u4 },
    Long { high_bytes: u4, low_bytes: u4 },
    Double { high_bytes: u4, low_bytes: u4 },
    Class { name_index: constant_pool_index },
    String { string_index: constant_pool_index },
    FieldRef { class_index: constant_pool_index, name_and_type_index: constant_pool_index },
    MethodRef { class_index: constant_pool_index, name_and_type_index: constant_pool_index },
    InterfaceMethodRef {
        class_index: constant_pool_index,
        name_and_type_index: constant_pool_index,
    },
    NameAndType {
        name_index: constant_pool_index,
        descriptor_index: constant_pool_index,
    },
    MethodHandle { reference_kind: ReferenceKind, reference_index: constant_pool_index },
    MethodType { descriptor_index: constant_pool_index },
    Dynamic {
        /// A valid index into the `bootstrap_methods` array of the bootstrap
        /// method table. This is not a constant pool index.
        bootstrap_method_attr_index: u2,
        name_and_type_index: constant_pool_index,
    },
    InvokeDynamic {
        /// A valid index into the `bootstrap_methods` array of the bootstrap
        /// method table. This is not a constant pool index.
        bootstrap_method_attr_index: u2,
        /// A valid index into the `constant_pool` table. The `constant_pool`
        /// entry at that index must be a `ConstantPoolInfo::NameAndType` structure.
        name_and_type_index: constant_pool_index,
    },
    Module { name_index: constant_pool_index },
    Package { name_index: constant_pool_index },
}

impl ConstantPoolInfo {
    pub fn tag(&self) -> Tag {
        match *self {
            ConstantPoolInfo::Utf8 { .. } => Tag::Utf8,
            ConstantPoolInfo::Integer { .. } => Tag::Integer,
            ConstantPoolInfo::Float { .. } => Tag::Float,
            ConstantPoolInfo::Long { .. } => Tag::Long,
            ConstantPoolInfo::Double { .. } => Tag::Double,
            ConstantPoolInfo::Class { .. } => Tag::Class,
            ConstantPoolInfo::String { .. } => Tag::String,
            ConstantPoolInfo::FieldRef { .. } => Tag::FieldRef,
            ConstantPoolInfo::MethodRef { .. } => Tag::MethodRef,
            ConstantPoolInfo::InterfaceMethodRef { .. } => Tag::InterfaceMethodRef,
            ConstantPoolInfo::NameAndType { .. } => Tag::NameAndType,
            ConstantPoolInfo::MethodHandle { .. } => Tag::MethodHandle,
            ConstantPoolInfo::MethodType { .. } => Tag::MethodType,
            ConstantPoolInfo::Dynamic { .. } => Tag::Dynamic,
            ConstantPoolInfo::InvokeDynamic { .. } => Tag::InvokeDynamic,
            ConstantPoolInfo::Module { .. } => Tag::Module,
            ConstantPoolInfo::Package { .. } => Tag::Package,
        }
    }

    pub fn utf8(s: &str) -> Self {
        ConstantPoolInfo::Utf8 { bytes: s.as_bytes().to_vec() }
    }

    pub fn long(value: i64) -> Self {
        let bits = value as u64;
        ConstantPoolInfo::Long { high_bytes: (bits >> 32) as u4, low_bytes: bits as u4 }
    }

    pub fn double(value: f64) -> Self {
        let bits = value.to_bits();
        ConstantPoolInfo::Double { high_bytes: (bits >> 32) as u4, low_bytes: bits as u4 }
    }
}

/// A slot in the constant pool. A `Long` or `Double` entry is always followed by an `Unusable`
/// slot, which keeps later indices aligned with the class file numbering. `Unusable` slots are
/// never written out and can never be the target of a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Entry(ConstantPoolInfo),
    Unusable,
}

/// The constant pool, indexed from 1. Index 0 is never valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstantPool {
    slots: OneIndexedVec<Slot>,
}

impl ConstantPool {
    pub fn new() -> Self {
        ConstantPool { slots: OneIndexedVec::new() }
    }

    /// Appends an entry and returns its index. `Long` and `Double` entries also reserve the
    /// following slot.
    pub fn push(&mut self, info: ConstantPoolInfo) -> usize {
        let double_slot = info.tag().is_double_slot();
        let index = self.slots.push(Slot::Entry(info));
        if double_slot {
            self.slots.push(Slot::Unusable);
        }
        index
    }

    /// Returns the entry at `index`, or `None` if the index is zero, out of bounds, or an
    /// unusable slot.
    pub fn get(&self, index: constant_pool_index) -> Option<&ConstantPoolInfo> {
        match self.slots.get(index as usize) {
            Some(&Slot::Entry(ref info)) => Some(info),
            _ => None,
        }
    }

    /// Returns the slot at `index`, or `None` if the index is zero or out of bounds.
    pub fn slot(&self, index: constant_pool_index) -> Option<&Slot> {
        self.slots.get(index as usize)
    }

    /// Looks up the entry at `index`, failing with `DanglingReference` if there is none.
    pub fn resolve(&self, index: constant_pool_index, referrer: &'static str)
                   -> Result<&ConstantPoolInfo, Error> {
        self.get(index).ok_or(Error::DanglingReference { index: index, referrer: referrer })
    }

    /// Like `resolve`, but also requires the entry to have the given tag.
    pub fn resolve_tag(&self, index: constant_pool_index, tag: Tag, referrer: &'static str)
                       -> Result<&ConstantPoolInfo, Error> {
        let info = self.resolve(index, referrer)?;
        if info.tag() != tag {
            return Err(Error::UnexpectedConstantPoolType {
                index: index,
                referrer: referrer,
                expected: tag,
                actual: info.tag(),
            });
        }
        Ok(info)
    }

    /// Returns the bytes of the `Utf8` entry at `index`.
    pub fn utf8(&self, index: constant_pool_index) -> Option<&[u1]> {
        match self.get(index) {
            Some(&ConstantPoolInfo::Utf8 { ref bytes }) => Some(bytes.as_slice()),
            _ => None,
        }
    }

    /// Returns the name of the `Class` entry at `index`.
    pub fn class_name(&self, index: constant_pool_index) -> Option<&[u1]> {
        match self.get(index) {
            Some(&ConstantPoolInfo::Class { name_index }) => self.utf8(name_index),
            _ => None,
        }
    }

    /// The number of slots, including the unusable ones. Valid indices are `1..=len()`.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The value of the `constant_pool_count` item in the class file: one more than the number
    /// of slots.
    pub fn count(&self) -> usize {
        self.slots.len() + 1
    }

    /// Iterates over the entries in index order, with their indices. Unusable slots are
    /// skipped.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &ConstantPoolInfo)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match *slot {
            Slot::Entry(ref info) => Some((i + 1, info)),
            Slot::Unusable => None,
        })
    }
}

impl FromIterator<ConstantPoolInfo> for ConstantPool {
    fn from_iter<I: IntoIterator<Item = ConstantPoolInfo>>(iter: I) -> Self {
        let mut pool = ConstantPool::new();
        for info in iter {
            pool.push(info);
        }
        pool
    }
}

impl From<Vec<ConstantPoolInfo>> for ConstantPool {
    fn from(entries: Vec<ConstantPoolInfo>) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_long_takes_two_slots() {
        let pool: ConstantPool = vec![
            ConstantPoolInfo::utf8("a"),
            ConstantPoolInfo::utf8("b"),
            ConstantPoolInfo::long(7),
            ConstantPoolInfo::utf8("c"),
        ].into();
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.count(), 6);
        assert_eq!(pool.get(3), Some(&ConstantPoolInfo::Long { high_bytes: 0, low_bytes: 7 }));
        assert_eq!(pool.slot(4), Some(&Slot::Unusable));
        assert_eq!(pool.get(4), None);
        assert_eq!(pool.utf8(5), Some(&b"c"[..]));
        let indices: Vec<usize> = pool.entries().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_resolve() {
        let pool: ConstantPool = vec![
            ConstantPoolInfo::utf8("Foo"),
            ConstantPoolInfo::Class { name_index: 1 },
        ].into();
        assert_eq!(pool.class_name(2), Some(&b"Foo"[..]));
        assert!(pool.resolve_tag(2, Tag::Class, "this_class").is_ok());
        match pool.resolve_tag(1, Tag::Class, "this_class") {
            Err(Error::UnexpectedConstantPoolType { index: 1, expected: Tag::Class,
                                                    actual: Tag::Utf8, .. }) => {}
            r => panic!("{:?}", r),
        }
        match pool.resolve(0, "super_class") {
            Err(Error::DanglingReference { index: 0, referrer: "super_class" }) => {}
            r => panic!("{:?}", r),
        }
        assert!(pool.resolve(3, "x").is_err());
    }

    #[test]
    fn test_tag_round_trip() {
        for t in 0..=255u8 {
            assert_eq!(u1::from(Tag::from(t)), t);
        }
        assert_eq!(Tag::from(0), Tag::Unknown(0));
        assert!(Tag::Double.is_double_slot());
        assert!(!Tag::Integer.is_double_slot());
    }

    #[test]
    fn test_reference_kind() {
        assert_eq!(ReferenceKind::try_from(6).ok(), Some(ReferenceKind::InvokeStatic));
        assert_eq!(u1::from(ReferenceKind::InvokeInterface), 9);
        assert!(ReferenceKind::try_from(0).is_err());
        assert!(ReferenceKind::try_from(10).is_err());
    }
}
