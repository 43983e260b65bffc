use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum AsmError {
    #[error("line {line}: duplicate label \"{name}\"")]
    DuplicateLabel { line: usize, name: String },
    #[error("line {line}: undefined label \"{name}\"")]
    UndefinedLabel { line: usize, name: String },
    #[error("line {line}: unknown mnemonic \"{mnemonic}\"")]
    UnknownMnemonic { line: usize, mnemonic: String },
    #[error("line {line}: expected {expected} operand(s), found {found}")]
    OperandCount { line: usize, expected: usize, found: usize },
    #[error("line {line}: malformed operand \"{text}\"")]
    BadOperand { line: usize, text: String },
    #[error("line {line}: malformed data directive")]
    BadDataLine { line: usize },
    #[error("line {line}: value {value} does not fit in {bits} bits")]
    ImmediateOutOfRange { line: usize, value: i64, bits: u32 },
    #[error("program has no .text section")]
    MissingTextSection,
}

#[derive(Clone, Debug, Error)]
pub enum DisasmError {
    #[error("trailing {remaining} byte(s) do not form a complete instruction")]
    TrailingBytes { remaining: usize },
}
