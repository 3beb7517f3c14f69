#[macro_use]
extern crate log;

use std::io::Read;
use std::process;

use classfile::codec;
use classfile::logging::SimpleLogger;

const USAGE: &str = "usage: classfile [-v...] <path>";

fn run(file_name: &str) -> classfile::Result<bool> {
    let mut file = std::fs::File::open(file_name)?;
    let mut bytes = vec![];
    file.read_to_end(&mut bytes)?;
    debug!("read {} bytes from {}", bytes.len(), file_name);

    let decoded = codec::decode(&bytes)?;
    println!("{:#?}", decoded.class_file);
    match decoded.validation {
        Ok(()) => println!("validation: ok"),
        Err(ref e) => println!("validation: {}", e),
    }

    let round_trips = codec::round_trips(&bytes)?;
    println!("round trip: {}", if round_trips { "identical" } else { "differs" });
    Ok(decoded.is_valid() && round_trips)
}

fn main() {
    let mut verbosity = 0;
    let mut file_name = None;
    for arg in std::env::args().skip(1) {
        if arg.starts_with("-v") && arg[1..].chars().all(|c| c == 'v') {
            verbosity += arg.len() - 1;
        } else if file_name.is_none() {
            file_name = Some(arg);
        } else {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    }
    let file_name = match file_name {
        Some(file_name) => file_name,
        None => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    if let Err(e) = SimpleLogger::init_with_level(SimpleLogger::level_for_verbosity(verbosity)) {
        eprintln!("could not install logger: {}", e);
    }

    match run(&file_name) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", file_name, e);
            process::exit(1);
        }
    }
}
