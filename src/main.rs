use mermview::render::{render, DiagramColors, Theme, DEFAULT_FONT};
use mermview::{catalog, fit};
use std::io::{self, Read};

fn print_help() {
    println!("mermview - Render Mermaid diagrams to themed SVG");
    println!();
    println!("Usage: mermview [OPTIONS] [INPUT]");
    println!();
    println!("Reads a Mermaid diagram from a file path, inline text, or stdin");
    println!("and outputs SVG.");
    println!();
    println!("Options:");
    println!("  -h, --help            Show this help message");
    println!("  -t, --theme THEME     Color theme: default or dark");
    println!("  -o, --output FILE     Write the SVG to FILE instead of stdout");
    println!("  -e, --example KEY     Render a built-in example (see --list-examples)");
    println!("  -l, --list-examples   List built-in examples and exit");
    println!("      --transparent     Omit the background fill");
    println!("      --fit WxH         Print fit metadata for a WxH panel instead of SVG");
    println!();
    println!("Example:");
    println!("  echo 'graph LR\\n  A --> B' | mermview -t dark");
    println!("  mermview -e todo_app -o todo.svg");
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        return;
    }

    if args.iter().any(|a| a == "-l" || a == "--list-examples") {
        for category in catalog::CATALOG {
            println!("{}:", category.name);
            for example in category.examples {
                println!("  {}", catalog::example_key(example.name));
            }
        }
        return;
    }

    let mut theme = Theme::default();
    let mut output: Option<String> = None;
    let mut example: Option<String> = None;
    let mut transparent = false;
    let mut fit_panel: Option<(f64, f64)> = None;
    let mut positional: Option<String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-t" | "--theme" => match iter.next() {
                Some(value) => theme = Theme::parse(value),
                None => fail("--theme requires a value"),
            },
            "-o" | "--output" => match iter.next() {
                Some(value) => output = Some(value.clone()),
                None => fail("--output requires a value"),
            },
            "-e" | "--example" => match iter.next() {
                Some(value) => example = Some(value.clone()),
                None => fail("--example requires a value"),
            },
            "--transparent" => transparent = true,
            "--fit" => match iter.next().map(|v| parse_panel(v)) {
                Some(Some(panel)) => fit_panel = Some(panel),
                _ => fail("--fit requires a WxH value, e.g. --fit 1000x800"),
            },
            other if other.starts_with('-') => {
                fail(&format!("unknown option: {}", other));
            }
            other => positional = Some(other.replace("\\n", "\n")),
        }
    }

    let input = match example {
        Some(key) => match catalog::find(&key) {
            Some(example) => example.source.to_string(),
            None => fail(&format!("unknown example: {}", key)),
        },
        None => match positional {
            // A positional that names a readable file is read; anything
            // else is taken as inline diagram text.
            Some(arg) => match std::fs::read_to_string(&arg) {
                Ok(text) => text,
                Err(_) => arg,
            },
            None => {
                let mut buf = String::new();
                if io::stdin().read_to_string(&mut buf).is_err() {
                    fail("failed to read from stdin");
                }
                buf
            }
        },
    };

    if input.trim().is_empty() {
        fail("no input provided");
    }

    let colors = DiagramColors::from_theme(theme);
    let rendered = match render(&input, &colors, DEFAULT_FONT, transparent) {
        Ok(rendered) => rendered,
        Err(e) => fail(&e.to_string()),
    };

    if let Some((panel_w, panel_h)) = fit_panel {
        let computed = fit::fit(panel_w, panel_h, rendered.width, rendered.height)
            .unwrap_or(fit::ViewportFit::IDENTITY);
        let metadata = serde_json::json!({
            "width": rendered.width,
            "height": rendered.height,
            "fit": computed,
            "transform": computed.to_css(),
        });
        println!("{}", metadata);
        return;
    }

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &rendered.svg) {
                fail(&format!("cannot write {}: {}", path, e));
            }
        }
        None => println!("{}", rendered.svg),
    }
}

/// Parse a `WxH` panel size like `1000x800`.
fn parse_panel(value: &str) -> Option<(f64, f64)> {
    let (w, h) = value.split_once(['x', 'X'])?;
    let w: f64 = w.trim().parse().ok()?;
    let h: f64 = h.trim().parse().ok()?;
    (w > 0.0 && h > 0.0).then_some((w, h))
}
