#[macro_use]
extern crate clap;

use clap::Arg;
use std::path::Path;

fn main() {
    let matches = app_from_crate!()
        .arg(Arg::with_name("INPUT").help("Sets the input binary file to disassemble").required(true).index(1))
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();

    if let Err(err) = vdisasm(input) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn vdisasm(input: &str) -> Result<(), String> {
    let bytes = std::fs::read(Path::new(input)).map_err(|err| format!("reading \"{input}\": {err}"))?;
    let text = misc_asm::disassemble(&bytes).map_err(|err| format!("disassembling \"{input}\": {err}"))?;
    println!("{text}");
    Ok(())
}
