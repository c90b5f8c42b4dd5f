use std::io::{self, BufRead, Write as _};

use clap::{Parser, ValueEnum};
use webcrypto_ops::{
    codec::{from_binary_string, from_hex, to_hex},
    digest, AlgorithmName, EventKind, Operation,
};

fn main() {
    let Args {
        algorithm,
        chunk_size,
        input_encoding,
        log_level,
    } = Args::parse();

    println!("- Using algorithm {algorithm:?}, chunk size {chunk_size}, input encoding {input_encoding:?}");

    if let Some(log_level) = log_level {
        println!("- Using log level {log_level}");
        simple_logger::init_with_level(log_level).unwrap();
    }

    let print_before_input = || {
        println!("--------------------------------------------------------------------------");
        println!("- Enter a phrase to be hashed, confirm with [ENTER], abort with [CTRL+C]");
        print!("- To be hashed:  ");
        io::stdout().flush().unwrap();
    };

    print_before_input();

    let stdin = io::stdin();
    let lines = stdin
        .lock()
        .lines()
        .take_while(Result::is_ok)
        .map(Result::unwrap);

    lines.for_each(|line| {
        let input = match input_encoding {
            InputEncoding::Binary => from_binary_string(&line),
            InputEncoding::Hex => from_hex(line.trim()),
        };

        match input {
            Ok(input) => hash_in_chunks(algorithm.into(), &input, chunk_size),
            Err(err) => println!("- Invalid input: {err}"),
        }

        print_before_input();
    });
}

fn hash_in_chunks(algorithm: AlgorithmName, input: &[u8], chunk_size: usize) {
    let mut operation = digest(algorithm, None).unwrap();
    operation.on(EventKind::Progress, |event| println!("- {event:?}"));

    for chunk in input.chunks(chunk_size.max(1)) {
        operation.process(chunk).unwrap();
    }
    operation.finish().unwrap();

    match operation.into_result() {
        Ok(hash) => println!("- {algorithm}: {}", to_hex(hash)),
        Err(err) => println!("- Hashing failed: {err}"),
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(value_enum, short, long, default_value_t = ArgAlgorithm::Sha256)]
    algorithm: ArgAlgorithm,
    #[arg(short, long, default_value_t = 16)]
    chunk_size: usize,
    #[arg(value_enum, short, long, default_value_t = InputEncoding::Binary)]
    input_encoding: InputEncoding,
    #[arg(short, long)]
    log_level: Option<log::Level>,
}

/// how a line of input is turned into bytes
#[derive(ValueEnum, Clone, Copy, Debug)]
enum InputEncoding {
    /// every character is one byte
    Binary,
    /// hex encoded bytes
    Hex,
}

// We need to redeclare here, as we need to derive ValueEnum to use it with clap...
#[derive(ValueEnum, Clone, Copy, Debug)]
enum ArgAlgorithm {
    Sha1,
    #[cfg(not(feature = "ring"))]
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl From<ArgAlgorithm> for AlgorithmName {
    fn from(val: ArgAlgorithm) -> Self {
        match val {
            ArgAlgorithm::Sha1 => AlgorithmName::Sha1,
            #[cfg(not(feature = "ring"))]
            ArgAlgorithm::Sha224 => AlgorithmName::Sha224,
            ArgAlgorithm::Sha256 => AlgorithmName::Sha256,
            ArgAlgorithm::Sha384 => AlgorithmName::Sha384,
            ArgAlgorithm::Sha512 => AlgorithmName::Sha512,
        }
    }
}
