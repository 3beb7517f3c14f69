#![allow(dead_code)]

/// Builds class file bytes by hand.
#[derive(Default)]
pub struct Asm {
    pub bytes: Vec<u8>,
}

impl Asm {
    pub fn new() -> Self {
        Asm::default()
    }

    pub fn u1(&mut self, value: u8) -> &mut Self {
        self.bytes.push(value);
        self
    }

    pub fn u2(&mut self, value: u16) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn u4(&mut self, value: u32) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// A `CONSTANT_Utf8` entry.
    pub fn utf8(&mut self, s: &str) -> &mut Self {
        self.u1(1).u2(s.len() as u16).raw(s.as_bytes())
    }

    /// An attribute envelope around `payload`.
    pub fn attribute(&mut self, name_index: u16, payload: &[u8]) -> &mut Self {
        self.u2(name_index).u4(payload.len() as u32).raw(payload)
    }

    pub fn finish(&mut self) -> Vec<u8> {
        ::std::mem::take(&mut self.bytes)
    }
}

/// `HelloWorld`, as javac 8 would write it for
///
/// ```java
/// public class HelloWorld {
///     public static void main(String[] args) {
///         System.out.println("Hello, World!");
///     }
/// }
/// ```
pub fn hello_world() -> Vec<u8> {
    let mut asm = Asm::new();
    asm.u4(0xCAFE_BABE).u2(0).u2(52);

    asm.u2(29);
    asm.u1(10).u2(2).u2(3);         // #1 Methodref java/lang/Object.<init>:()V
    asm.u1(7).u2(4);                // #2 Class java/lang/Object
    asm.u1(12).u2(5).u2(6);         // #3 NameAndType <init>:()V
    asm.utf8("java/lang/Object");   // #4
    asm.utf8("<init>");             // #5
    asm.utf8("()V");                // #6
    asm.u1(9).u2(8).u2(9);          // #7 Fieldref java/lang/System.out
    asm.u1(7).u2(10);               // #8 Class java/lang/System
    asm.u1(12).u2(11).u2(12);       // #9 NameAndType out:Ljava/io/PrintStream;
    asm.utf8("java/lang/System");   // #10
    asm.utf8("out");                // #11
    asm.utf8("Ljava/io/PrintStream;"); // #12
    asm.u1(8).u2(14);               // #13 String "Hello, World!"
    asm.utf8("Hello, World!");      // #14
    asm.u1(10).u2(16).u2(17);       // #15 Methodref java/io/PrintStream.println
    asm.u1(7).u2(18);               // #16 Class java/io/PrintStream
    asm.u1(12).u2(19).u2(20);       // #17 NameAndType println:(Ljava/lang/String;)V
    asm.utf8("java/io/PrintStream"); // #18
    asm.utf8("println");            // #19
    asm.utf8("(Ljava/lang/String;)V"); // #20
    asm.u1(7).u2(22);               // #21 Class HelloWorld
    asm.utf8("HelloWorld");         // #22
    asm.utf8("Code");               // #23
    asm.utf8("LineNumberTable");    // #24
    asm.utf8("main");               // #25
    asm.utf8("([Ljava/lang/String;)V"); // #26
    asm.utf8("SourceFile");         // #27
    asm.utf8("HelloWorld.java");    // #28

    asm.u2(0x0021).u2(21).u2(2);
    asm.u2(0); // interfaces
    asm.u2(0); // fields

    asm.u2(2);

    let init_code = Asm::new()
        .u2(1).u2(1)
        .u4(5).raw(&[0x2A, 0xB7, 0x00, 0x01, 0xB1]) // aload_0; invokespecial #1; return
        .u2(0)
        .u2(1).attribute(24, &[0x00, 0x01, 0x00, 0x00, 0x00, 0x01])
        .finish();
    asm.u2(0x0001).u2(5).u2(6).u2(1).attribute(23, &init_code);

    let main_code = Asm::new()
        .u2(2).u2(1)
        // getstatic #7; ldc #13; invokevirtual #15; return
        .u4(9).raw(&[0xB2, 0x00, 0x07, 0x12, 0x0D, 0xB6, 0x00, 0x0F, 0xB1])
        .u2(0)
        .u2(1).attribute(24, &[0x00, 0x02, 0x00, 0x00, 0x00, 0x03, 0x00, 0x08, 0x00, 0x04])
        .finish();
    asm.u2(0x0009).u2(25).u2(26).u2(1).attribute(23, &main_code);

    asm.u2(1).attribute(27, &[0x00, 0x1C]);
    asm.finish()
}
