use glosilo::{BuildReport, ConvertDetails};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

const PREVIEW_CHARS: usize = 60;

pub fn print_conversion(details: &ConvertDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    let title = format!("⚙  Converting: \"{}\"", preview(&details.text));
    println!("\n{}", palette.bold(palette.paint(title, ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Masking ━━━", ansi::GRAY));
    println!(
        "  {} {}  {} {}",
        palette.paint("skip spans:", ansi::BLUE),
        palette.paint(details.skip_spans.to_string(), ansi::YELLOW),
        palette.paint("local spans:", ansi::BLUE),
        palette.paint(details.local_spans.to_string(), ansi::YELLOW),
    );

    println!("\n{}", palette.paint("━━━ Stages ━━━", ansi::GRAY));
    for stage in &details.stages {
        let counts = if stage.considered > 0 {
            if stage.applied > 0 {
                palette.paint(format!("✓ {} of {} rules", stage.applied, stage.considered), ansi::GREEN)
            } else {
                palette.dim(format!("✗ 0 of {} rules", stage.considered))
            }
        } else {
            String::new()
        };
        println!(
            "  {} {}  {}",
            palette.paint(format!("{:<11}", stage.name), ansi::BLUE),
            palette.dim(format!("{:>12}", format!("{:?}", stage.duration))),
            counts
        );
    }

    println!("\n{}", palette.paint("━━━ Output ━━━", ansi::GRAY));
    if details.output == details.text {
        println!("{}", palette.dim("  Output equals input"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • The rule database has no rule for these words");
        println!("  • The text sits inside %...% skip markers");
        println!("\n{}", palette.dim("  Tip: Set RUST_LOG=glosilo=debug to see masking and pass traces"));
    } else {
        for line in details.output.lines() {
            println!("  {}", palette.bold(palette.paint(line, ansi::GREEN)));
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Chunks: {}",
        palette.paint(format!("{:?}", details.elapsed), ansi::GREEN),
        palette.paint(details.chunks.to_string(), ansi::CYAN),
    );
    println!();
}

/// Written to stderr: stdout may carry the rule database.
pub fn print_build(report: &BuildReport, color: bool) {
    let palette = ansi::Palette::new(color);
    eprintln!("\n{}", palette.bold(palette.paint("⚙  Rule build", ansi::CYAN)));

    eprintln!("\n{}", palette.paint("━━━ Stages ━━━", ansi::GRAY));
    for (idx, (name, entries)) in report.stages.iter().enumerate() {
        eprintln!(
            "  {} {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.paint(format!("{:<24}", name), ansi::BLUE),
            palette.paint(entries.to_string(), ansi::YELLOW),
        );
    }

    eprintln!("\n{}", palette.paint("━━━ Tables ━━━", ansi::GRAY));
    eprintln!(
        "  {} {}  {} {}  {} {}",
        palette.dim("global:"),
        palette.bold(palette.paint(report.global_rules.to_string(), ansi::GREEN)),
        palette.dim("two-char:"),
        palette.bold(palette.paint(report.two_char_rules.to_string(), ansi::GREEN)),
        palette.dim("local:"),
        palette.bold(palette.paint(report.local_rules.to_string(), ansi::GREEN)),
    );

    if !report.skipped.is_empty() {
        let header = format!("━━━ Skipped directives ({}) ━━━", report.skipped.len());
        eprintln!("\n{}", palette.paint(header, ansi::GRAY));
        for skipped in &report.skipped {
            eprintln!(
                "  {} {} {}",
                palette.paint(format!("{} #{}", skipped.list, skipped.index), ansi::YELLOW),
                palette.dim("│"),
                skipped.reason
            );
        }
    }

    eprintln!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    eprintln!("  Total: {}", palette.paint(format!("{:?}", report.elapsed), ansi::GREEN));
    eprintln!();
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect::<String>().replace('\n', "⏎");
    if text.chars().count() > PREVIEW_CHARS {
        out.push('…');
    }
    out
}
