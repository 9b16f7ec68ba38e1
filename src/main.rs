use std::error::Error;
use std::io::{stdin, BufRead};
use std::process::exit;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use kanjitools::kana::{CharType, ConvertFlags, Converter};
use kanjitools::kanji::{next_arg, DebugMode, KanjiData, KanjiType};
use kanjitools::utf8::{parse_unicode, to_utf8, to_unicode, BracketType};

fn unwrap<T, E: Error>(t: Result<T, E>) -> T {
  match t {
    Ok(t) => t,
    Err(e) => {
      eprintln!("{}", e);
      exit(1);
    }
  }
}

fn convert_flags(args: &ArgMatches) -> ConvertFlags {
  let mut flags = ConvertFlags::NONE;
  if let Some(values) = args.values_of("flags") {
    for value in values {
      flags = flags
        | match value {
          "h" => ConvertFlags::HEPBURN,
          "k" => ConvertFlags::KUNREI,
          "n" => ConvertFlags::NO_PROLONG_MARK,
          _ => ConvertFlags::REMOVE_SPACES,
        };
    }
  }
  flags
}

fn convert(args: &ArgMatches) {
  let target = if args.is_present("katakana") {
    CharType::Katakana
  } else if args.is_present("romaji") {
    CharType::Romaji
  } else {
    CharType::Hiragana
  };
  let source = if args.is_present("hiragana_source") {
    Some(CharType::Hiragana)
  } else if args.is_present("katakana_source") {
    Some(CharType::Katakana)
  } else if args.is_present("romaji_source") {
    Some(CharType::Romaji)
  } else {
    None
  };
  let converter = Converter::new(target, convert_flags(args));
  let convert_line = |line: &str| match source {
    Some(source) => converter.convert_from(source, line),
    None => converter.convert(line),
  };
  if args.is_present("interactive") {
    let stdin = stdin();
    for line in stdin.lock().lines() {
      println!("{}", convert_line(unwrap(line).trim_end()));
    }
    return;
  }
  let output = match args.values_of("strings") {
    Some(strings) => strings.map(convert_line).collect::<Vec<_>>().join(" "),
    None => {
      let stdin = stdin();
      let mut lines = vec![];
      for line in stdin.lock().lines() {
        lines.push(convert_line(unwrap(line).trim_end()));
      }
      lines.join("\n")
    }
  };
  if args.is_present("no_newline") {
    print!("{}", output);
  } else {
    println!("{}", output);
  }
}

// load the catalog and print a summary, then show details for any kanji (or
// u<hex> code point) arguments
fn info(args: &[String]) {
  let data = unwrap(KanjiData::from_args(args));
  println!(
    "loaded {} kanji from '{}'", data.total(), data.data_dir().display()
  );
  for &t in KanjiType::ALL {
    println!("  {} {}", t, data.types(t).len());
  }
  let mut i = next_arg(args, 0);
  while i < args.len() {
    let arg = &args[i];
    let name = if arg.starts_with('u') {
      match parse_unicode(&arg[1..]) {
        Some(code) => to_utf8(code),
        None => {
          eprintln!("'{}' is not a valid 4 or 5 digit hex code", &arg[1..]);
          exit(1);
        }
      }
    } else {
      arg.clone()
    };
    match data.find_by_name(&name) {
      Some(kanji) => println!(
        "{} {} {}",
        kanji.qualified_name(),
        to_unicode(
          kanjitools::utf8::from_utf8_max(kanji.name(), 1)[0], BracketType::Square
        ),
        data.kanji_info(kanji)
      ),
      None => println!("{} not found", name),
    }
    i = next_arg(args, i);
  }
}

fn init_logger(args: &[String]) {
  let verbosity = match unwrap(kanjitools::kanji::get_debug_mode(args)) {
    DebugMode::Full => 3,
    DebugMode::Info => 2,
    DebugMode::Off => 1,
  };
  stderrlog::new().verbosity(verbosity).init().unwrap();
}

fn print_usage() {
  println!(
    "usage: kanjitools [-data <dir>] [-debug|-info] [kanji|u<hex> ...]\n\
     \x20      kanjitools convert [options] [text ...]\n\
     \n\
     -data <dir>  use <dir> instead of searching up for a 'data' directory\n\
     -debug       full diagnostic output\n\
     -info        summary diagnostic output\n\
     -h           show this help\n\
     \n\
     see 'kanjitools convert --help' for the conversion options"
  );
}

fn main() {
  let args: Vec<String> = std::env::args().collect();
  // only a leading -h is top-level help ('convert' has its own -h flag)
  if args.get(1).map(String::as_str) == Some("-h") {
    print_usage();
    return;
  }
  if args.get(1).map(String::as_str) == Some("convert") {
    let convert_subcommand = SubCommand::with_name("convert")
      .about("Convert between Hiragana, Katakana and Romaji")
      .setting(AppSettings::DisableHelpFlags)
      .arg(Arg::with_name("hiragana").short("h").help("output Hiragana (the default)"))
      .arg(
        Arg::with_name("katakana")
          .short("k")
          .conflicts_with("hiragana")
          .help("output Katakana"),
      )
      .arg(
        Arg::with_name("romaji")
          .short("r")
          .conflicts_with_all(&["hiragana", "katakana"])
          .help("output Romaji"),
      )
      .arg(
        Arg::with_name("hiragana_source")
          .short("H")
          .help("only convert Hiragana input"),
      )
      .arg(
        Arg::with_name("katakana_source")
          .short("K")
          .conflicts_with("hiragana_source")
          .help("only convert Katakana input"),
      )
      .arg(
        Arg::with_name("romaji_source")
          .short("R")
          .conflicts_with_all(&["hiragana_source", "katakana_source"])
          .help("only convert Romaji input"),
      )
      .arg(
        Arg::with_name("flags")
          .short("f")
          .takes_value(true)
          .multiple(true)
          .possible_values(&["h", "k", "n", "r"])
          .help("h=Hepburn, k=Kunrei, n=NoProlongMark, r=RemoveSpaces"),
      )
      .arg(Arg::with_name("no_newline").short("n").help("suppress the trailing newline"))
      .arg(
        Arg::with_name("interactive")
          .short("i")
          .help("read and convert lines from stdin"),
      )
      .arg(Arg::with_name("strings").takes_value(true).multiple(true).help("text to convert"));
    let app = App::new("kanjitools").subcommand(convert_subcommand);
    let matches = app.get_matches();
    convert(matches.subcommand_matches("convert").unwrap());
  } else {
    init_logger(&args);
    info(&args);
  }
}
