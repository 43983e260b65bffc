//! Two-pass assembler: source text to machine-code bytes.
//!
//! Mirrors the shape of `snacchus-vcpu`'s `vasm` crate (`data.rs` processing a
//! `.data` section into a flat byte vector, `instructions.rs` resolving labels
//! in a second pass) with `pest` swapped for a hand-rolled line lexer, since
//! this architecture's assembly syntax is line-oriented rather than the
//! teacher's free-form grammar and the `.pest` grammar file isn't part of the
//! retrieved pack.

use std::collections::HashMap;

use miscvm::isa::{self, Instruction, OpCode};

use crate::error::AsmError;
use crate::labels::LabelMap;

const INSTRUCTION_BYTES: u16 = 2;

enum DataDirective {
    Byte { addr: i64, value: i64 },
    Str { addr: i64, values: Vec<i64> },
}

struct CodeLine {
    mnemonic: String,
    operands: Vec<String>,
}

struct RawLine {
    number: usize,
    text: String,
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_int_literal(text: &str, line: usize) -> Result<i64, AsmError> {
    let lower = text.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16)
            .map_err(|_| AsmError::BadOperand { line, text: text.to_owned() });
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        return i64::from_str_radix(bin, 2)
            .map_err(|_| AsmError::BadOperand { line, text: text.to_owned() });
    }
    text.parse::<i64>().map_err(|_| AsmError::BadOperand { line, text: text.to_owned() })
}

fn parse_char_literal(text: &str, line: usize) -> Option<Result<i64, AsmError>> {
    if !(text.starts_with('\'') && text.ends_with('\'') && text.len() >= 3) {
        return None;
    }
    let inner = &text[1..text.len() - 1];
    let value = match inner {
        "\\n" => Some('\n'),
        "\\t" => Some('\t'),
        "\\r" => Some('\r'),
        "\\\\" => Some('\\'),
        "\\'" => Some('\''),
        _ if inner.chars().count() == 1 => inner.chars().next(),
        _ => None,
    };
    Some(value.map(|c| c as i64).ok_or(AsmError::BadOperand { line, text: text.to_owned() }))
}

fn looks_like_label_reference(text: &str) -> bool {
    text.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Resolves a numeric operand: a character literal, a known label, a register
/// name is rejected here (callers that expect a register use [`parse_register`]).
fn parse_value(text: &str, labels: &LabelMap, line: usize) -> Result<i64, AsmError> {
    let text = text.trim();
    if let Some(result) = parse_char_literal(text, line) {
        return result;
    }
    if let Some(&addr) = labels.get(&text.to_ascii_lowercase()) {
        return Ok(addr as i64);
    }
    if looks_like_label_reference(text) {
        return Err(AsmError::UndefinedLabel { line, name: text.to_owned() });
    }
    parse_int_literal(text, line)
}

fn parse_register(text: &str, line: usize) -> Result<u8, AsmError> {
    let text = text.trim();
    let lower = text.to_ascii_lowercase();
    let digits = lower
        .strip_prefix('r')
        .ok_or_else(|| AsmError::BadOperand { line, text: text.to_owned() })?;
    let index: u32 =
        digits.parse().map_err(|_| AsmError::BadOperand { line, text: text.to_owned() })?;
    if index > 15 {
        return Err(AsmError::BadOperand { line, text: text.to_owned() });
    }
    Ok(index as u8)
}

fn require_range(value: i64, bits: u32, line: usize) -> Result<(), AsmError> {
    let (lo, hi) = (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1);
    let unsigned_hi = (1i64 << bits) - 1;
    if (0..=unsigned_hi).contains(&value) || (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(AsmError::ImmediateOutOfRange { line, value, bits })
    }
}

fn split_raw_lines(source: &str) -> Vec<RawLine> {
    source
        .lines()
        .enumerate()
        .map(|(i, raw)| RawLine { number: i + 1, text: strip_comment(raw).trim().to_owned() })
        .filter(|l| !l.text.is_empty())
        .collect()
}

fn build_instruction(
    mnemonic: &str,
    operands: &[String],
    labels: &LabelMap,
    line: usize,
) -> Result<Instruction, AsmError> {
    let op = isa::mnemonic_to_opcode(mnemonic)
        .ok_or_else(|| AsmError::UnknownMnemonic { line, mnemonic: mnemonic.to_owned() })?;

    let expect = |n: usize| -> Result<(), AsmError> {
        if operands.len() == n {
            Ok(())
        } else {
            Err(AsmError::OperandCount { line, expected: n, found: operands.len() })
        }
    };

    Ok(match op {
        OpCode::Nop => {
            expect(1)?;
            let imm = parse_value(&operands[0], labels, line)?;
            require_range(imm, 12, line)?;
            Instruction::Nop { imm: (imm & 0xFFF) as u16 }
        }
        OpCode::Syscall => {
            expect(1)?;
            let id = parse_value(&operands[0], labels, line)?;
            require_range(id, 12, line)?;
            Instruction::Syscall { id: (id & 0xFFF) as u16 }
        }
        OpCode::MovRegImm => {
            expect(2)?;
            let d = parse_register(&operands[0], line)?;
            let imm = parse_value(&operands[1], labels, line)?;
            require_range(imm, 8, line)?;
            Instruction::MovRegImm { d, imm: imm as u8 }
        }
        OpCode::Not => {
            expect(1)?;
            let d = parse_register(&operands[0], line)?;
            Instruction::Not { d }
        }
        OpCode::Jmp => {
            expect(2)?;
            let d = parse_register(&operands[0], line)?;
            let imm = parse_value(&operands[1], labels, line)?;
            require_range(imm, 8, line)?;
            Instruction::Jmp { d, imm: imm as u8 }
        }
        OpCode::MovRegRegShr => {
            expect(3)?;
            let (d, s) = (parse_register(&operands[0], line)?, parse_register(&operands[1], line)?);
            let imm = parse_value(&operands[2], labels, line)?;
            require_range(imm, 4, line)?;
            Instruction::MovRegRegShr { d, s, imm: imm as u8 }
        }
        OpCode::MovRegRegShl => {
            expect(3)?;
            let (d, s) = (parse_register(&operands[0], line)?, parse_register(&operands[1], line)?);
            let imm = parse_value(&operands[2], labels, line)?;
            require_range(imm, 4, line)?;
            Instruction::MovRegRegShl { d, s, imm: imm as u8 }
        }
        OpCode::MovRegRegAdd => {
            expect(3)?;
            let (d, s) = (parse_register(&operands[0], line)?, parse_register(&operands[1], line)?);
            let imm = parse_value(&operands[2], labels, line)?;
            require_range(imm, 4, line)?;
            Instruction::MovRegRegAdd { d, s, imm: imm as u8 }
        }
        OpCode::LdRegMem => {
            expect(3)?;
            let (d, s) = (parse_register(&operands[0], line)?, parse_register(&operands[1], line)?);
            let imm = parse_value(&operands[2], labels, line)?;
            require_range(imm, 4, line)?;
            Instruction::LdRegMem { d, s, imm: imm as i8 }
        }
        OpCode::StMemReg => {
            expect(3)?;
            let (d, s) = (parse_register(&operands[0], line)?, parse_register(&operands[1], line)?);
            let imm = parse_value(&operands[2], labels, line)?;
            require_range(imm, 4, line)?;
            Instruction::StMemReg { d, s, imm: imm as i8 }
        }
        OpCode::Add => {
            expect(3)?;
            let (d, s) = (parse_register(&operands[0], line)?, parse_register(&operands[1], line)?);
            let imm = parse_value(&operands[2], labels, line)?;
            require_range(imm, 4, line)?;
            Instruction::Add { d, s, imm: imm as i8 }
        }
        OpCode::Sub => {
            expect(3)?;
            let (d, s) = (parse_register(&operands[0], line)?, parse_register(&operands[1], line)?);
            let imm = parse_value(&operands[2], labels, line)?;
            require_range(imm, 4, line)?;
            Instruction::Sub { d, s, imm: imm as i8 }
        }
        OpCode::And => {
            expect(2)?;
            Instruction::And {
                d: parse_register(&operands[0], line)?,
                s: parse_register(&operands[1], line)?,
            }
        }
        OpCode::Or => {
            expect(2)?;
            Instruction::Or {
                d: parse_register(&operands[0], line)?,
                s: parse_register(&operands[1], line)?,
            }
        }
        OpCode::Xor => {
            expect(2)?;
            Instruction::Xor {
                d: parse_register(&operands[0], line)?,
                s: parse_register(&operands[1], line)?,
            }
        }
        OpCode::Jz => {
            expect(3)?;
            let (d, s) = (parse_register(&operands[0], line)?, parse_register(&operands[1], line)?);
            let imm = parse_value(&operands[2], labels, line)?;
            require_range(imm, 4, line)?;
            Instruction::Jz { d, s, imm: imm as u8 }
        }
    })
}

fn parse_data_line(text: &str, line: usize) -> Result<Vec<DataDirective>, AsmError> {
    let mut parts = text.splitn(3, char::is_whitespace);
    let directive = parts.next().ok_or(AsmError::BadDataLine { line })?;
    let addr_str = parts.next().ok_or(AsmError::BadDataLine { line })?;
    let rest = parts.next().unwrap_or_default();
    let addr = parse_value(addr_str.trim_end_matches(',').trim(), &LabelMap::new(), line)?;

    match directive.to_ascii_lowercase().as_str() {
        "byte" => {
            let value = parse_value(rest.trim(), &LabelMap::new(), line)?;
            Ok(vec![DataDirective::Byte { addr, value }])
        }
        "str" => {
            let mut values = Vec::new();
            for (i, token) in tokenize_str_values(rest).into_iter().enumerate() {
                let value = parse_value(&token, &LabelMap::new(), line)?;
                values.push(value);
                let _ = i;
            }
            Ok(vec![DataDirective::Str { addr, values }])
        }
        _ => Err(AsmError::BadDataLine { line }),
    }
}

/// Splits a `str` directive's argument list into tokens, keeping `'...'`
/// character literals intact.
fn tokenize_str_values(rest: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = rest.trim().chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '\'' {
            let mut tok = String::new();
            tok.push(chars.next().unwrap());
            while let Some(&c) = chars.peek() {
                tok.push(chars.next().unwrap());
                if c == '\'' && tok.len() > 1 {
                    break;
                }
            }
            tokens.push(tok);
        } else {
            let mut tok = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                tok.push(c);
                chars.next();
            }
            tokens.push(tok);
        }
    }
    tokens
}

fn split_operands(text: &str) -> Vec<String> {
    text.split(',').map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()).collect()
}

/// Assembles a complete program (optional `.data` section, followed by a
/// mandatory `.text` section) into its byte representation.
pub fn assemble(source: &str) -> Result<Vec<u8>, AsmError> {
    #[derive(PartialEq)]
    enum Section {
        None,
        Data,
        Text,
    }

    let lines = split_raw_lines(source);
    let mut section = Section::None;
    let mut seen_text_section = false;
    let mut data_directives = Vec::new();
    let mut code_lines: Vec<(usize, CodeLine)> = Vec::new();
    let mut labels: LabelMap = HashMap::new();
    let mut pc: u16 = 0;

    for raw in &lines {
        match raw.text.to_ascii_lowercase().as_str() {
            ".data" => {
                section = Section::Data;
                continue;
            }
            ".text" => {
                section = Section::Text;
                seen_text_section = true;
                continue;
            }
            _ => {}
        }

        match section {
            Section::Data => {
                data_directives.extend(parse_data_line(&raw.text, raw.number)?);
            }
            Section::Text | Section::None => {
                if let Some(name) = raw.text.strip_suffix(':') {
                    let key = name.trim().to_ascii_lowercase();
                    if labels.insert(key, pc).is_some() {
                        return Err(AsmError::DuplicateLabel { line: raw.number, name: name.to_owned() });
                    }
                } else {
                    let mut parts = raw.text.splitn(2, char::is_whitespace);
                    let mnemonic = parts.next().unwrap_or_default().to_ascii_uppercase();
                    let operands = split_operands(parts.next().unwrap_or_default());
                    code_lines.push((raw.number, CodeLine { mnemonic, operands }));
                    pc += INSTRUCTION_BYTES;
                }
            }
        }
    }

    if !seen_text_section {
        return Err(AsmError::MissingTextSection);
    }

    let mut output = Vec::new();

    if !data_directives.is_empty() {
        output.extend_from_slice(&miscvm::constants::PRELOAD_SENTINEL);
        for directive in &data_directives {
            match directive {
                DataDirective::Byte { addr, value } => {
                    output.push((*addr & 0xFF) as u8);
                    output.push((*value & 0xFF) as u8);
                }
                DataDirective::Str { addr, values } => {
                    for (i, value) in values.iter().enumerate() {
                        output.push(((*addr + i as i64) & 0xFF) as u8);
                        output.push((*value & 0xFF) as u8);
                    }
                }
            }
        }
        output.extend_from_slice(&miscvm::constants::PRELOAD_TERMINATOR);
    }

    let data_section_len = output.len() as u16;
    let labels: LabelMap = labels.into_iter().map(|(k, v)| (k, v + data_section_len)).collect();

    for (line, code_line) in &code_lines {
        let instr = build_instruction(&code_line.mnemonic, &code_line.operands, &labels, *line)?;
        output.extend_from_slice(&isa::encode(instr).to_le_bytes());
    }

    Ok(output)
}
