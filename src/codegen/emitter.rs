//! The assembly text sink.
//!
//! Formats SPIM/MIPS instructions, pseudo-ops, labels and comments into an
//! append-only buffer, and owns the monotonic control-flow label counter.
//! Every value is one word: `push` stores to `0($sp)` and drops `$sp` by 4,
//! `pop` loads from `4($sp)` and raises it by 4.

use std::fmt;

/// Runtime encoding of the boolean literals.
pub const TRUE: i32 = 1;
pub const FALSE: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    T0,
    T1,
    V0,
    A0,
    Ra,
    Fp,
    Sp,
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg::T0 => "$t0",
            Reg::T1 => "$t1",
            Reg::V0 => "$v0",
            Reg::A0 => "$a0",
            Reg::Ra => "$ra",
            Reg::Fp => "$fp",
            Reg::Sp => "$sp",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Default)]
pub struct Emitter {
    out: String,
    labels: u32,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    /// A fresh control-flow label: `.L0`, `.L1`, ...
    pub fn next_label(&mut self) -> String {
        let label = format!(".L{}", self.labels);
        self.labels += 1;
        label
    }

    fn line(&mut self, text: String) {
        self.out.push_str(&text);
        self.out.push('\n');
    }

    /// A bare directive such as `.text` or `.data`.
    pub fn directive(&mut self, directive: &str) {
        self.line(format!("\t{}", directive));
    }

    pub fn label(&mut self, label: &str) {
        self.line(format!("{}:", label));
    }

    /// `label:<tab>directive arg`, e.g. `_x:  .space 4`.
    pub fn labeled_directive(&mut self, label: &str, directive: &str, arg: &str) {
        if arg.is_empty() {
            self.line(format!("{}:\t{}", label, directive));
        } else {
            self.line(format!("{}:\t{} {}", label, directive, arg));
        }
    }

    pub fn comment(&mut self, text: &str) {
        self.line(format!("\t\t# {}", text));
    }

    pub fn op0(&mut self, op: &str) {
        self.line(format!("\t{}", op));
    }

    pub fn op0_note(&mut self, op: &str, note: &str) {
        self.line(format!("\t{}\t\t# {}", op, note));
    }

    pub fn op1(&mut self, op: &str, a: impl fmt::Display) {
        self.line(format!("\t{}\t{}", op, a));
    }

    pub fn op2(&mut self, op: &str, a: impl fmt::Display, b: impl fmt::Display) {
        self.line(format!("\t{}\t{}, {}", op, a, b));
    }

    pub fn op2_note(&mut self, op: &str, a: impl fmt::Display, b: impl fmt::Display, note: &str) {
        self.line(format!("\t{}\t{}, {}\t# {}", op, a, b, note));
    }

    pub fn op3(
        &mut self,
        op: &str,
        a: impl fmt::Display,
        b: impl fmt::Display,
        c: impl fmt::Display,
    ) {
        self.line(format!("\t{}\t{}, {}, {}", op, a, b, c));
    }

    pub fn op3_note(
        &mut self,
        op: &str,
        a: impl fmt::Display,
        b: impl fmt::Display,
        c: impl fmt::Display,
        note: &str,
    ) {
        self.line(format!("\t{}\t{}, {}, {}\t# {}", op, a, b, c, note));
    }

    /// `op reg, offset(base)` — frame- and stack-relative loads and stores.
    pub fn indexed(&mut self, op: &str, reg: Reg, base: Reg, offset: i32) {
        self.line(format!("\t{}\t{}, {}({})", op, reg, offset, base));
    }

    pub fn indexed_note(&mut self, op: &str, reg: Reg, base: Reg, offset: i32, note: &str) {
        self.line(format!("\t{}\t{}, {}({})\t# {}", op, reg, offset, base, note));
    }

    pub fn push(&mut self, reg: Reg) {
        self.indexed("sw", reg, Reg::Sp, 0);
        self.op3("subu", Reg::Sp, Reg::Sp, 4);
    }

    pub fn pop(&mut self, reg: Reg) {
        self.indexed("lw", reg, Reg::Sp, 4);
        self.op3("addu", Reg::Sp, Reg::Sp, 4);
    }
}
