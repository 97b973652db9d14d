use clap::*;
use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFile,
    term::{
        emit,
        termcolor::{ColorChoice, StandardStream},
    },
};
use std::{
    fmt,
    fs::{read_to_string, write},
    io::{self, Read, Write},
    process::ExitCode,
};
use tapec::{asm::Cell, compile_statement, parse::ParseMode, Config};

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum EmitType {
    /// The bare tape machine op-codes.
    Bf,
    /// The op-codes, one block per line, with comments.
    Annotated,
    /// The parsed statement.
    Ast,
    /// `NAME=VALUE`, computed without the tape.
    Value,
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// The file holding the `NAME=EXPR` statement (`-` or omitted for stdin).
    #[clap(value_parser)]
    input: Option<String>,

    /// The file to write the output of the compiler to (stdout if omitted).
    #[clap(short, long, value_parser)]
    output: Option<String>,

    /// What to emit.
    #[clap(short, long, value_parser, default_value = "bf")]
    emit: EmitType,

    /// The cell used to build printed characters.
    #[clap(long, value_parser = value_parser!(u16), default_value = "10")]
    print_cell: u16,

    /// Accept unclosed parentheses and ignore trailing input.
    #[clap(long)]
    lenient: bool,

    /// Log more (-v info, -vv debug, -vvv trace). Defaults to `RUST_LOG`.
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

enum Error {
    IO(io::Error),
    Compile(tapec::Error),
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IO(e) => write!(f, "IO error: {:?}", e),
            Error::Compile(e) => write!(f, "Compile error: {:?}", e),
        }
    }
}

fn init_logger(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        2 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.init();
}

fn read_input(name: Option<&str>) -> Result<String, Error> {
    match name {
        None | Some("-") => {
            let mut src = String::new();
            io::stdin().read_to_string(&mut src).map_err(Error::IO)?;
            Ok(src)
        }
        Some(name) => read_to_string(name).map_err(Error::IO),
    }
}

fn write_output(name: Option<&str>, contents: String) -> Result<(), Error> {
    match name {
        Some(name) => write(name, contents).map_err(Error::IO),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes()).map_err(Error::IO)?;
            stdout.flush().map_err(Error::IO)
        }
    }
}

fn compile(src: &str, args: &Args) -> Result<String, Error> {
    let config = Config {
        print_cell: Cell(usize::from(args.print_cell)),
        parse_mode: if args.lenient {
            ParseMode::Lenient
        } else {
            ParseMode::Strict
        },
        annotate: matches!(args.emit, EmitType::Annotated),
    };
    let compiled = compile_statement(src, &config).map_err(Error::Compile)?;

    Ok(match args.emit {
        EmitType::Bf => format!("{}\n", compiled.program),
        EmitType::Annotated => format!("{:#}", compiled.program),
        EmitType::Ast => format!("{:#?}\n", compiled.statement),
        EmitType::Value => format!("{}={}\n", compiled.statement.name, compiled.value),
    })
}

/// Print a compile error to stderr, pointing into the source if possible.
fn report(filename: &str, src: &str, err: &tapec::Error) {
    let file = SimpleFile::new(filename, src);
    let mut diagnostic = Diagnostic::error().with_message(err.to_string());
    if let Some(offset) = err.offset() {
        let end = (offset + err.width()).min(src.len());
        diagnostic = diagnostic.with_labels(vec![
            Label::primary((), offset.min(end)..end).with_message(format!("{err}"))
        ]);
    }

    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = codespan_reporting::term::Config::default();
    if emit(&mut writer.lock(), &config, &file, &diagnostic).is_err() {
        eprintln!("error: {err}");
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    let src = match read_input(args.input.as_deref()) {
        Ok(src) => src,
        Err(e) => {
            eprintln!("{e:?}");
            return ExitCode::FAILURE;
        }
    };

    let result = compile(&src, &args).and_then(|out| write_output(args.output.as_deref(), out));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Compile(e)) => {
            let filename = match args.input.as_deref() {
                None | Some("-") => "<stdin>",
                Some(name) => name,
            };
            report(filename, &src, &e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{e:?}");
            ExitCode::FAILURE
        }
    }
}
