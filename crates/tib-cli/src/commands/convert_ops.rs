use std::fs::{self, File};
use std::io::{self, BufReader, Write};

use tib_core::filter::{CharSource, EwtsFilter, ForwardSource, ReaderSource, StrSource};
use tib_core::translit::{Mode, TableConverter, Transliterate};

/// Input for `tibtool convert`: inline text, a file, or stdin.
pub enum Input<'a> {
    Text(&'a str),
    File(&'a str),
    Stdin,
}

/// Convert everything `filter` yields. With `offsets`, each output char is
/// paired with the input offset it maps back to.
pub fn render<S: CharSource, C: Transliterate>(
    filter: &mut EwtsFilter<S, C>,
    offsets: bool,
) -> io::Result<String> {
    let text = filter.read_to_string()?;
    if !offsets {
        return Ok(text);
    }
    let mut out = String::new();
    for (pos, c) in text.chars().enumerate() {
        out.push_str(&format!("{pos}\t{}\t{c}\n", filter.correct_offset(pos)));
    }
    let end = text.chars().count();
    out.push_str(&format!("{end}\t{}\n", filter.correct_offset(end)));
    Ok(out)
}

fn run<S: CharSource>(source: S, converter: TableConverter, mode: Mode, offsets: bool) -> String {
    let mut filter = EwtsFilter::new(source, converter, mode);
    die!(render(&mut filter, offsets), "Error converting input: {}")
}

pub fn convert(input: Input<'_>, mode: Mode, table: Option<&str>, offsets: bool) {
    let converter = match table {
        Some(path) => {
            let content = die!(fs::read_to_string(path), "Error reading {path}: {}");
            die!(TableConverter::from_toml(&content), "Error in {path}: {}")
        }
        None => TableConverter::new(),
    };

    let out = match input {
        Input::Text(text) => run(StrSource::new(text), converter, mode, offsets),
        Input::File(path) => {
            let file = die!(File::open(path), "Error opening {path}: {}");
            run(ReaderSource::new(BufReader::new(file)), converter, mode, offsets)
        }
        Input::Stdin => run(
            ForwardSource::new(io::stdin().lock()),
            converter,
            mode,
            offsets,
        ),
    };

    let mut stdout = io::stdout().lock();
    die!(
        stdout.write_all(out.as_bytes()).and_then(|()| {
            if offsets || out.ends_with('\n') {
                Ok(())
            } else {
                stdout.write_all(b"\n")
            }
        }),
        "Error writing output: {}"
    );
}
