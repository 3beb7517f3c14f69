//! Structures for the [Java SE 17 JVM class file
//! format](https://docs.oracle.com/javase/specs/jvms/se17/html/jvms-4.html).

pub mod class_file;
