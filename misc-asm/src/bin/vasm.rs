#[macro_use]
extern crate clap;

use clap::Arg;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum IoErrorContext {
    ReadInput,
    WriteOutput,
}

#[derive(Debug)]
enum Error {
    Asm(misc_asm::AsmError),
    Io(std::io::Error, IoErrorContext, PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, context, path) => write!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IoErrorContext::ReadInput => "Reading input",
                    IoErrorContext::WriteOutput => "Writing output",
                },
                path.display(),
                err
            ),
            Error::Asm(err) => write!(f, "Assembling input failed: {err}"),
        }
    }
}

fn main() {
    let matches = app_from_crate!()
        .arg(Arg::with_name("INPUT").help("Sets the input assembly file").required(true).index(1))
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("OUTPUT")
                .help("Sets the output file to write the assembled bytes to"),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();
    let output = matches.value_of("output");

    if let Err(err) = vasm(input, output) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn vasm(input: &str, output: Option<&str>) -> Result<(), Error> {
    let input_path = Path::new(input);
    let input_file = File::open(input_path)
        .map_err(|err| Error::Io(err, IoErrorContext::ReadInput, input_path.to_owned()))?;
    let mut reader = BufReader::new(input_file);
    let mut source = String::new();
    reader
        .read_to_string(&mut source)
        .map_err(|err| Error::Io(err, IoErrorContext::ReadInput, input_path.to_owned()))?;

    let bytes = misc_asm::assemble(&source).map_err(Error::Asm)?;

    match output {
        Some(output) => {
            let output_path = PathBuf::from(output);
            std::fs::write(&output_path, &bytes)
                .map_err(|err| Error::Io(err, IoErrorContext::WriteOutput, output_path))?;
        }
        None => {
            let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
            println!("{hex}");
        }
    }

    Ok(())
}
