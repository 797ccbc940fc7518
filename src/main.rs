// declview: C declaration parser and terminal browser

use std::fs;
use std::io;
use std::path::Path;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use declview::explain::{declaration_to_c, Explainer};
use declview::parser::ast::TranslationUnit;
use declview::parser::parse::Parser;
use declview::ui::App;

/// Command-line options
struct Options {
    file: String,
    dump: bool,
    typedefs: Vec<String>,
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} <file.c> [--dump] [--typedef NAME]...", program_name);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --dump           Print every declaration with its explanation and exit");
    eprintln!("  --typedef NAME   Treat NAME as a type name declared elsewhere (repeatable)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} demos/declarations.c           # Browse the bundled sample", program_name);
    eprintln!("  {} api.h --typedef size_t --dump   # Explain a header", program_name);
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut file = None;
    let mut dump = false;
    let mut typedefs = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dump" => dump = true,
            "--typedef" => match iter.next() {
                Some(name) => typedefs.push(name.clone()),
                None => return Err("--typedef requires a name".to_string()),
            },
            other if other.starts_with("--") => {
                return Err(format!("Unknown option '{}'", other));
            }
            other => {
                if file.is_some() {
                    return Err(format!("Unexpected extra argument '{}'", other));
                }
                file = Some(other.to_string());
            }
        }
    }

    let file = file.ok_or_else(|| "No input file provided".to_string())?;
    Ok(Options {
        file,
        dump,
        typedefs,
    })
}

/// Print each declaration as C, followed by its explanation
fn dump(unit: &TranslationUnit) {
    let explainer = Explainer::for_unit(unit);
    for item in &unit.items {
        println!("{}:  {}", item.span.start.line, declaration_to_c(&item.declaration));
        for sentence in explainer.explain_item(item) {
            println!("    {}", sentence);
        }
    }
    for diagnostic in &unit.diagnostics {
        eprintln!("{}", diagnostic);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("declview");

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_usage(program_name);
            std::process::exit(1);
        }
    };

    if !Path::new(&options.file).exists() {
        eprintln!("Error: File '{}' not found", options.file);
        print_usage(program_name);
        std::process::exit(1);
    }

    let source = fs::read_to_string(&options.file)?;

    eprintln!("Parsing {}...", options.file);
    let mut parser = match Parser::new(&source) {
        Ok(parser) => parser,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    for name in &options.typedefs {
        parser.declare_typedef(name.as_str());
    }

    let unit = match parser.parse_translation_unit() {
        Ok(unit) => unit,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    eprintln!(
        "Found {} top-level declarations, {} recovered errors.",
        unit.items.len(),
        unit.diagnostics.len()
    );

    if options.dump {
        dump(&unit);
        if !unit.diagnostics.is_empty() {
            std::process::exit(2);
        }
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(unit, source, options.file.clone());
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let options =
            parse_args(&args(&["declview", "a.c", "--typedef", "size_t", "--dump"])).unwrap();
        assert_eq!(options.file, "a.c");
        assert!(options.dump);
        assert_eq!(options.typedefs, vec!["size_t"]);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["declview"])).is_err());
        assert!(parse_args(&args(&["declview", "a.c", "--typedef"])).is_err());
        assert!(parse_args(&args(&["declview", "a.c", "b.c"])).is_err());
        assert!(parse_args(&args(&["declview", "--verbose", "a.c"])).is_err());
    }
}
